//! Wizard engine — drives a flow's steps, validating each output before it
//! is recorded, and hands back one aggregate result on submission.

use serde_json::{Map, Value};
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::WizardError;
use crate::wizard::state::WizardState;

/// A fixed, ordered set of data-collection steps.
///
/// The flow owns the step count, the key each step's output is stored
/// under, and the per-step validation predicate. The engine owns the
/// transitions.
pub trait WizardFlow: Send + Sync {
    fn total_steps(&self) -> u32;

    /// Key the given step's validated output is stored under.
    fn step_key(&self, step: u32) -> &'static str;

    /// Validate a step's output. The error string is the step-specific
    /// message surfaced inline to the user.
    fn validate(&self, step: u32, output: &Value) -> Result<(), String>;
}

/// Invoked exactly once, with the full collected mapping, when the final
/// step validates successfully.
pub type CompletionHandler = Box<dyn FnOnce(Map<String, Value>) + Send>;

/// Result of a successful `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the given step.
    Moved(u32),
    /// The final step validated; the wizard is done.
    Submitted,
}

/// Pushed to subscribers on every wizard mutation.
#[derive(Debug, Clone)]
pub enum WizardEvent {
    StepChanged { step: u32, progress: f32 },
    ValidationFailed { step: u32, message: String },
    Submitted,
}

/// Drives one wizard instance from step 1 to submission.
///
/// Terminal once submitted; a new instance is created for a new run, never
/// reused.
pub struct WizardEngine<F: WizardFlow> {
    flow: F,
    state: WizardState,
    submitted: bool,
    on_complete: Option<CompletionHandler>,
    events: broadcast::Sender<WizardEvent>,
}

impl<F: WizardFlow> WizardEngine<F> {
    pub fn new(flow: F) -> Result<Self, WizardError> {
        let state = WizardState::new(flow.total_steps())?;
        let (events, _) = broadcast::channel(64);
        Ok(Self {
            flow,
            state,
            submitted: false,
            on_complete: None,
            events,
        })
    }

    /// Attach the completion handler fired on submission.
    pub fn with_completion(mut self, handler: CompletionHandler) -> Self {
        self.on_complete = Some(handler);
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WizardEvent> {
        self.events.subscribe()
    }

    /// Read-only view of the wizard state for rendering.
    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Submit the active step's output.
    ///
    /// On validation failure nothing changes and the step-specific message
    /// is surfaced; on success the output is recorded and the wizard moves
    /// forward — or, from the last step, transitions to submitted and fires
    /// the completion handler with the full collected mapping.
    pub fn advance(&mut self, output: Value) -> Result<Advance, WizardError> {
        if self.submitted {
            return Err(WizardError::AlreadySubmitted);
        }

        let step = self.state.current_step();
        if let Err(message) = self.flow.validate(step, &output) {
            debug!(step, %message, "wizard step rejected input");
            let _ = self.events.send(WizardEvent::ValidationFailed {
                step,
                message: message.clone(),
            });
            return Err(WizardError::Validation { step, message });
        }

        self.state.record(self.flow.step_key(step), output);

        if self.state.on_last_step() {
            self.submitted = true;
            debug!("wizard submitted");
            if let Some(handler) = self.on_complete.take() {
                handler(self.state.clone_collected());
            }
            let _ = self.events.send(WizardEvent::Submitted);
            return Ok(Advance::Submitted);
        }

        let step = self.state.advance_step()?;
        let _ = self.events.send(WizardEvent::StepChanged {
            step,
            progress: self.state.progress(),
        });
        Ok(Advance::Moved(step))
    }

    /// Go back one step. Collected values persist for re-display.
    pub fn retreat(&mut self) -> Result<u32, WizardError> {
        if self.submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        let step = self.state.retreat_step()?;
        let _ = self.events.send(WizardEvent::StepChanged {
            step,
            progress: self.state.progress(),
        });
        Ok(step)
    }

    /// Navigate directly to an already-visited step.
    pub fn jump_to(&mut self, step: u32) -> Result<u32, WizardError> {
        if self.submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        let step = self.state.jump(step)?;
        let _ = self.events.send(WizardEvent::StepChanged {
            step,
            progress: self.state.progress(),
        });
        Ok(step)
    }
}
