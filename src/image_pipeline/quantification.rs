//! Quantification pipeline module
//!
//! Orchestrates decode, calibration, the external denoising and clustering
//! steps, and the per-cluster statistics for one subject image.

mod collaborators;
mod pipeline;
mod timing;
pub mod types;


pub use collaborators::{Denoiser, LabelFileSegmenter, PassthroughDenoiser, Segmenter};
pub use pipeline::QuantificationPipeline;
pub use timing::{PipelineTimings, StepTiming, Timer};
pub use types::{QuantificationConfig, QuantificationConfigBuilder};
