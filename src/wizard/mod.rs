//! Linear wizard — a fixed ordered sequence of validated data-collection
//! steps.
//!
//! Progresses forward only through validated `advance` calls, allows
//! backward navigation without losing collected values, and hands the full
//! collected mapping to the completion handler exactly once.

pub mod engine;
pub mod state;

pub use engine::{Advance, CompletionHandler, WizardEngine, WizardEvent, WizardFlow};
pub use state::WizardState;
