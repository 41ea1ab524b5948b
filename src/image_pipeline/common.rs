//! Common utilities module
//!
//! This module contains the error type, the image container and the region of
//! interest shared across the pipeline stages.

pub mod error;
pub mod image;
pub mod roi;

pub use error::{PipelineError, Result};
pub use image::Image;
pub use roi::Roi;
