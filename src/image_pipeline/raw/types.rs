//! pQCT raw image data types

use crate::image_pipeline::common::image::Image;

/// Length of the opaque scanner header preceding the pixel payload.
pub const DEFAULT_HEADER_LENGTH: usize = 1609;

/// In-plane pixel spacing of the scanner, in millimetres.
pub const DEFAULT_PIXEL_SPACING_MM: f64 = 0.8;

/// Decoded pixel samples, `side_length x side_length`, row-major.
pub type PixelBuffer = Image<i16>;

/// Layout of a raw pQCT file.
///
/// The payload is always little-endian signed 16-bit. The side length is not
/// stored anywhere and is derived from the payload size on every decode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawImageDescriptor {
    /// Number of header bytes skipped before the pixel payload
    pub header_length: usize,
    /// Pixel spacing along both axes, in millimetres
    pub pixel_spacing_mm: f64,
}

impl Default for RawImageDescriptor {
    fn default() -> Self {
        Self {
            header_length: DEFAULT_HEADER_LENGTH,
            pixel_spacing_mm: DEFAULT_PIXEL_SPACING_MM,
        }
    }
}

impl RawImageDescriptor {
    /// Physical area covered by one pixel, 0.64 mm^2 for the default spacing.
    pub fn pixel_area_mm2(&self) -> f64 {
        self.pixel_spacing_mm * self.pixel_spacing_mm
    }
}
