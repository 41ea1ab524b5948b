//! Batch processing module
//!
//! Subject lists and the per-subject runner. Each subject is processed on its
//! own; a failure is recorded and the batch moves on to the next one.

mod runner;
pub mod subjects;

pub use runner::{BatchSummary, SubjectOutcome, analyze_subjects, quantify_subjects, run_batch};
pub use subjects::SubjectList;
