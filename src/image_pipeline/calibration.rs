//! Density calibration module
//!
//! Converts stored scanner counts into calibrated density values with a
//! per-pixel affine transform.

mod calibrator;
pub mod types;

pub use calibrator::{
    DensityCalibrator, DensityImage, SIGNED_OFFSET, calibrate, calibrate_sample,
    calibrated_density, to_stored,
};
pub use types::{CalibrationParameters, CalibrationParametersBuilder};
