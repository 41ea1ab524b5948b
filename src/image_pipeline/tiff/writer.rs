use std::io::Write;

use crate::image_pipeline::calibration::DensityImage;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::statistics::LabelImage;
use crate::image_pipeline::tiff::types::TiffConfig;

pub trait TiffWriter {
    /// Writes the density image in its biased 16-bit storage form.
    fn write_density(&self, image: &DensityImage, output: &mut dyn Write, config: &TiffConfig) -> Result<()>;
    fn write_labels(&self, labels: &LabelImage, output: &mut dyn Write, config: &TiffConfig) -> Result<()>;
}
