//! Count-to-density calibration.
//!
//! The scanner stores signed samples; the calibrator sees them through the
//! unsigned-as-signed convention of the host, i.e. as the count
//! `v = sample + 32768`. For every pixel of the region:
//!
//! ```text
//! centered   = v - 32768
//! calibrated = round(slope * (centered / 1000) + intercept)
//! output     = calibrated - 32768
//! ```
//!
//! `DensityImage` keeps `calibrated`. The biased `output` value is what the
//! 16-bit store receives: use [`calibrate_sample`] for one count (`v = 32768`
//! gives `-33090`) and [`to_stored`] for a whole image.
//! No clamping is done: values outside the 16-bit range wrap when stored.

use tracing::{debug, instrument};

use crate::image_pipeline::calibration::types::CalibrationParameters;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::common::image::Image;
use crate::image_pipeline::common::roi::Roi;
use crate::image_pipeline::raw::types::PixelBuffer;

/// Bias between the signed sample and the unsigned count it is stored as.
pub const SIGNED_OFFSET: i32 = 32768;

/// Calibrated density per pixel.
pub type DensityImage = Image<i32>;

/// Calibrated density for the stored count `v`.
pub fn calibrated_density(v: i32, params: &CalibrationParameters) -> i32 {
    let centered = v.wrapping_sub(SIGNED_OFFSET) as f32;
    let scaled = params.slope * (centered / 1000.0) + params.intercept;
    // half-up rounding, ties go towards positive infinity
    (scaled + 0.5).floor() as i32
}

/// Biased output value written to the 16-bit store for the count `v`.
///
/// Not clamped, so it can fall outside the `i16` range.
pub fn calibrate_sample(v: i32, params: &CalibrationParameters) -> i32 {
    calibrated_density(v, params).wrapping_sub(SIGNED_OFFSET)
}

/// Applies the transform inside `roi` (whole image when `None`).
///
/// Pixels outside the region are left uncalibrated: their density is the
/// centered count, i.e. the raw signed sample.
#[instrument(skip(buffer, params), fields(width = buffer.width(), height = buffer.height()))]
pub fn calibrate(
    buffer: &PixelBuffer,
    roi: Option<Roi>,
    params: &CalibrationParameters,
) -> Result<DensityImage> {
    let (width, height) = buffer.dimensions();
    let roi = roi.unwrap_or_else(|| Roi::full(width, height));
    roi.validate(width, height)?;

    let mut density = buffer.map(i32::from);
    for (x, y) in roi.coordinates() {
        let idx = density.index(x, y);
        let count = density.data()[idx] + SIGNED_OFFSET;
        density.data_mut()[idx] = calibrated_density(count, params);
    }

    debug!(
        slope = params.slope,
        intercept = params.intercept,
        ?roi,
        "Calibration complete"
    );
    Ok(density)
}

/// 16-bit storage of a density image, biased by `-32768` and wrapped.
pub fn to_stored(density: &DensityImage) -> Image<u16> {
    density.map(|d| d.wrapping_sub(SIGNED_OFFSET) as u16)
}

/// Calibration stage holding its parameters.
#[derive(Debug, Clone, Default)]
pub struct DensityCalibrator {
    params: CalibrationParameters,
}

impl DensityCalibrator {
    pub fn new(params: CalibrationParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CalibrationParameters {
        &self.params
    }

    pub fn calibrate(&self, buffer: &PixelBuffer, roi: Option<Roi>) -> Result<DensityImage> {
        calibrate(buffer, roi, &self.params)
    }
}
