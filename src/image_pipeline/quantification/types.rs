//! Quantification configuration types

use crate::image_pipeline::calibration::CalibrationParameters;
use crate::image_pipeline::common::roi::Roi;
use crate::image_pipeline::raw::RawImageDescriptor;
use crate::image_pipeline::tiff::TiffConfig;

/// Cluster count used by the tibia workflows.
pub const DEFAULT_CLUSTER_COUNT: usize = 4;

/// Configuration for one quantification run
#[derive(Debug, Clone)]
pub struct QuantificationConfig {
    /// Raw file layout and pixel spacing
    pub descriptor: RawImageDescriptor,
    /// Count-to-density transform
    pub calibration: CalibrationParameters,
    /// Number of clusters the label image is expected to hold
    pub cluster_count: usize,
    /// Region calibrated and aggregated, whole image when `None`
    pub roi: Option<Roi>,
    /// Whether to reject empty or oversized images after decoding
    pub validate_dimensions: bool,
    /// Largest accepted side length when validating
    pub max_dimension: Option<usize>,
    /// Settings for the optional density TIFF output
    pub tiff: TiffConfig,
}

impl Default for QuantificationConfig {
    fn default() -> Self {
        Self {
            descriptor: RawImageDescriptor::default(),
            calibration: CalibrationParameters::default(),
            cluster_count: DEFAULT_CLUSTER_COUNT,
            roi: None,
            validate_dimensions: true,
            max_dimension: Some(4096),
            tiff: TiffConfig::default(),
        }
    }
}

impl QuantificationConfig {
    pub fn builder() -> QuantificationConfigBuilder {
        QuantificationConfigBuilder::default()
    }

    pub fn pixel_area_mm2(&self) -> f64 {
        self.descriptor.pixel_area_mm2()
    }
}

/// Builder for QuantificationConfig
#[derive(Default)]
pub struct QuantificationConfigBuilder {
    descriptor: Option<RawImageDescriptor>,
    calibration: Option<CalibrationParameters>,
    cluster_count: Option<usize>,
    roi: Option<Option<Roi>>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
    tiff: Option<TiffConfig>,
}

impl QuantificationConfigBuilder {
    pub fn descriptor(mut self, descriptor: RawImageDescriptor) -> Self {
        self.descriptor = Some(descriptor);
        self
    }

    pub fn calibration(mut self, calibration: CalibrationParameters) -> Self {
        self.calibration = Some(calibration);
        self
    }

    pub fn cluster_count(mut self, count: usize) -> Self {
        self.cluster_count = Some(count);
        self
    }

    pub fn roi(mut self, roi: Option<Roi>) -> Self {
        self.roi = Some(roi);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn tiff(mut self, tiff: TiffConfig) -> Self {
        self.tiff = Some(tiff);
        self
    }

    pub fn build(self) -> QuantificationConfig {
        let default = QuantificationConfig::default();
        QuantificationConfig {
            descriptor: self.descriptor.unwrap_or(default.descriptor),
            calibration: self.calibration.unwrap_or(default.calibration),
            cluster_count: self.cluster_count.unwrap_or(default.cluster_count),
            roi: self.roi.unwrap_or(default.roi),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
            tiff: self.tiff.unwrap_or(default.tiff),
        }
    }
}
