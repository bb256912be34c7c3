//! Wizard state — tracks the active step and the fields collected so far.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::WizardError;

/// State of a linear data-collection wizard.
///
/// Steps are 1-indexed. `collected` holds a validated value for every step
/// below `current_step`; values are never removed once set, only overwritten
/// when a step is revisited.
#[derive(Debug, Clone, Serialize)]
pub struct WizardState {
    current_step: u32,
    /// Highest step ever reached; bounds out-of-band navigation.
    furthest_reached: u32,
    total_steps: u32,
    collected: Map<String, Value>,
}

impl WizardState {
    /// Fresh state positioned at step 1.
    pub fn new(total_steps: u32) -> Result<Self, WizardError> {
        if total_steps == 0 {
            return Err(WizardError::NoSteps);
        }
        Ok(Self {
            current_step: 1,
            furthest_reached: 1,
            total_steps,
            collected: Map::new(),
        })
    }

    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    pub fn furthest_reached(&self) -> u32 {
        self.furthest_reached
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// Whether the active step is the final one.
    pub fn on_last_step(&self) -> bool {
        self.current_step == self.total_steps
    }

    /// Progress fraction for display.
    pub fn progress(&self) -> f32 {
        self.current_step as f32 / self.total_steps as f32
    }

    /// Store a validated step output under its key.
    pub fn record(&mut self, key: impl Into<String>, value: Value) {
        self.collected.insert(key.into(), value);
    }

    /// Move forward one step. Not valid on the last step — reaching past it
    /// is the engine's submission transition, not a step move.
    pub fn advance_step(&mut self) -> Result<u32, WizardError> {
        if self.on_last_step() {
            return Err(WizardError::AlreadySubmitted);
        }
        self.current_step += 1;
        self.furthest_reached = self.furthest_reached.max(self.current_step);
        Ok(self.current_step)
    }

    /// Move back one step. Collected values persist for re-display.
    pub fn retreat_step(&mut self) -> Result<u32, WizardError> {
        if self.current_step <= 1 {
            return Err(WizardError::AtFirstStep);
        }
        self.current_step -= 1;
        Ok(self.current_step)
    }

    /// Jump directly to an already-visited step (progress-indicator
    /// navigation). Steps beyond the furthest reached are out of range.
    pub fn jump(&mut self, step: u32) -> Result<u32, WizardError> {
        if step < 1 || step > self.furthest_reached {
            return Err(WizardError::StepOutOfRange {
                requested: step,
                furthest: self.furthest_reached,
            });
        }
        self.current_step = step;
        Ok(self.current_step)
    }

    pub fn collected(&self) -> &Map<String, Value> {
        &self.collected
    }

    /// Hand the full collected mapping to the caller on submission.
    pub fn clone_collected(&self) -> Map<String, Value> {
        self.collected.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_state_starts_at_step_one() {
        let state = WizardState::new(3).unwrap();
        assert_eq!(state.current_step(), 1);
        assert_eq!(state.furthest_reached(), 1);
        assert!(!state.on_last_step());
        assert!(state.collected().is_empty());
    }

    #[test]
    fn zero_steps_rejected() {
        assert!(matches!(WizardState::new(0), Err(WizardError::NoSteps)));
    }

    #[test]
    fn advance_walks_to_last_step_then_stops() {
        let mut state = WizardState::new(3).unwrap();
        assert_eq!(state.advance_step().unwrap(), 2);
        assert_eq!(state.advance_step().unwrap(), 3);
        assert!(state.on_last_step());
        assert!(state.advance_step().is_err());
    }

    #[test]
    fn progress_fraction_tracks_current_step() {
        let mut state = WizardState::new(4).unwrap();
        assert_eq!(state.progress(), 0.25);
        state.advance_step().unwrap();
        assert_eq!(state.progress(), 0.5);
    }

    #[test]
    fn retreat_keeps_collected_values() {
        let mut state = WizardState::new(3).unwrap();
        state.record("first", json!({"name": "Rex"}));
        state.advance_step().unwrap();

        state.retreat_step().unwrap();
        assert_eq!(state.current_step(), 1);
        assert_eq!(state.collected()["first"], json!({"name": "Rex"}));
        // Furthest reached does not move backwards.
        assert_eq!(state.furthest_reached(), 2);
    }

    #[test]
    fn retreat_from_first_step_rejected() {
        let mut state = WizardState::new(3).unwrap();
        assert!(matches!(
            state.retreat_step(),
            Err(WizardError::AtFirstStep)
        ));
    }

    #[test]
    fn jump_bounded_by_furthest_reached() {
        let mut state = WizardState::new(4).unwrap();
        state.advance_step().unwrap();
        state.advance_step().unwrap(); // now at 3, furthest 3
        state.retreat_step().unwrap(); // back to 2

        assert_eq!(state.jump(3).unwrap(), 3);
        assert_eq!(state.jump(1).unwrap(), 1);
        assert!(matches!(
            state.jump(4),
            Err(WizardError::StepOutOfRange {
                requested: 4,
                furthest: 3
            })
        ));
        assert!(state.jump(0).is_err());
    }

    #[test]
    fn record_overwrites_on_revisit() {
        let mut state = WizardState::new(2).unwrap();
        state.record("first", json!({"name": "Rex"}));
        state.record("first", json!({"name": "Fido"}));
        assert_eq!(state.collected()["first"], json!({"name": "Fido"}));
        assert_eq!(state.collected().len(), 1);
    }
}
