//! Type definitions shared across the form predictor

pub mod prediction;
pub mod submission;
pub mod verdict;

pub use prediction::{Label, Prediction};
pub use submission::FormSubmission;
pub use verdict::{Tone, Verdict, VerdictTable};
