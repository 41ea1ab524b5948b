//! Native analysis module
//!
//! Anatomical workflows, invocation of the external analysis executable, and
//! collection of the quantification report text it produces.

mod native;
mod results;
pub mod workflow;

pub use native::{AnalysisOutcome, DEFAULT_PARAMETER_FILE, NativeAnalyzer};
pub use results::ResultsLog;
pub use workflow::Workflow;
