//! Dog profile capture — the concrete wizard flow and its save boundary.
//!
//! The wizard collects identity, age, and breed across three validated
//! steps; the aggregate result becomes a `DogProfile`, saved once through
//! the `ProfileSink` by the caller after submission.

pub mod flow;
pub mod model;
pub mod sink;

pub use flow::{DogProfileFlow, step_keys};
pub use model::{DogProfile, Sex};
pub use sink::{HttpProfileSink, ProfileSink};
