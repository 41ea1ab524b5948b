//! Seams for the external denoising and clustering steps.
//!
//! Neither algorithm lives in this crate. The pipeline only consumes their
//! outputs: a filtered density image and a label image.

use std::path::PathBuf;

use tracing::debug;

use crate::image_pipeline::analysis::Workflow;
use crate::image_pipeline::calibration::DensityImage;
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::statistics::LabelImage;
use crate::image_pipeline::tiff::read_label_image;

/// Filter applied to the density image before aggregation.
pub trait Denoiser {
    fn denoise(&self, density: DensityImage) -> Result<DensityImage>;
}

/// Leaves the density image untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughDenoiser;

impl Denoiser for PassthroughDenoiser {
    fn denoise(&self, density: DensityImage) -> Result<DensityImage> {
        Ok(density)
    }
}

/// Source of the per-pixel cluster assignment of a subject.
pub trait Segmenter {
    fn segment(&self, subject: &str, density: &DensityImage) -> Result<LabelImage>;
}

/// Loads label images that the clustering step already wrote to disk,
/// named `<subject>_<level>.Labels.tiff`.
#[derive(Debug, Clone)]
pub struct LabelFileSegmenter {
    labels_dir: PathBuf,
    workflow: Workflow,
}

impl LabelFileSegmenter {
    pub fn new(labels_dir: impl Into<PathBuf>, workflow: Workflow) -> Self {
        Self {
            labels_dir: labels_dir.into(),
            workflow,
        }
    }

    pub fn label_path(&self, subject: &str) -> Result<PathBuf> {
        let name = self
            .workflow
            .label_file_name(subject)
            .ok_or_else(|| PipelineError::UnsupportedFormat(format!("{} has no label images", self.workflow)))?;
        Ok(self.labels_dir.join(name))
    }
}

impl Segmenter for LabelFileSegmenter {
    fn segment(&self, subject: &str, _density: &DensityImage) -> Result<LabelImage> {
        let path = self.label_path(subject)?;
        debug!(path = %path.display(), "Loading label image");
        read_label_image(path)
    }
}
