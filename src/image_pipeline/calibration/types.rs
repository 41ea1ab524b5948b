//! Calibration configuration types

/// Default slope of the count-to-density transform.
pub const DEFAULT_SLOPE: f32 = 1724.0;

/// Default intercept of the count-to-density transform.
pub const DEFAULT_INTERCEPT: f32 = -322.0;

/// Affine calibration applied to every pixel of the region of interest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationParameters {
    /// Density units per 1000 centered counts
    pub slope: f32,
    /// Density offset added after scaling
    pub intercept: f32,
}

impl Default for CalibrationParameters {
    fn default() -> Self {
        Self {
            slope: DEFAULT_SLOPE,
            intercept: DEFAULT_INTERCEPT,
        }
    }
}

impl CalibrationParameters {
    pub fn new(slope: f32, intercept: f32) -> Self {
        Self { slope, intercept }
    }

    pub fn builder() -> CalibrationParametersBuilder {
        CalibrationParametersBuilder::default()
    }
}

/// Builder for CalibrationParameters
#[derive(Default)]
pub struct CalibrationParametersBuilder {
    slope: Option<f32>,
    intercept: Option<f32>,
}

impl CalibrationParametersBuilder {
    pub fn slope(mut self, slope: f32) -> Self {
        self.slope = Some(slope);
        self
    }

    pub fn intercept(mut self, intercept: f32) -> Self {
        self.intercept = Some(intercept);
        self
    }

    pub fn build(self) -> CalibrationParameters {
        let default = CalibrationParameters::default();
        CalibrationParameters {
            slope: self.slope.unwrap_or(default.slope),
            intercept: self.intercept.unwrap_or(default.intercept),
        }
    }
}
