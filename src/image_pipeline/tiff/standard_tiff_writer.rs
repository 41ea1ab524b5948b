use std::io::Write;

use tiff::encoder::colortype::Gray16;
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder};
use tiff::tags::Predictor;
use tracing::debug;

use crate::image_pipeline::calibration::{DensityImage, to_stored};
use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::statistics::LabelImage;
use crate::image_pipeline::tiff::types::{TiffCompression, TiffConfig};
use crate::image_pipeline::tiff::writer::TiffWriter;

pub struct StandardTiffWriter;

impl StandardTiffWriter {
    fn encode_gray16(
        &self,
        width: usize,
        height: usize,
        samples: &[u16],
        output: &mut dyn Write,
        config: &TiffConfig,
    ) -> Result<()> {
        debug!("Encoding TIFF image: {}x{}", width, height);

        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidDimensions(width, height));
        }

        let mut buffer = Vec::new();

        let compression = match config.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };

        let mut encoder = TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?
            .with_compression(compression);

        if let Some(predictor_val) = config.predictor {
            let predictor = match predictor_val {
                2 => Predictor::Horizontal,
                _ => Predictor::None,
            };
            encoder = encoder.with_predictor(predictor);
        }

        encoder
            .write_image::<Gray16>(width as u32, height as u32, samples)
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}

impl TiffWriter for StandardTiffWriter {
    fn write_density(&self, image: &DensityImage, output: &mut dyn Write, config: &TiffConfig) -> Result<()> {
        let stored = to_stored(image);
        self.encode_gray16(stored.width(), stored.height(), stored.data(), output, config)
    }

    fn write_labels(&self, labels: &LabelImage, output: &mut dyn Write, config: &TiffConfig) -> Result<()> {
        let samples = labels
            .data()
            .iter()
            .map(|&label| {
                u16::try_from(label).map_err(|_| {
                    PipelineError::UnsupportedFormat(format!("label {label} does not fit a 16-bit TIFF"))
                })
            })
            .collect::<Result<Vec<u16>>>()?;
        self.encode_gray16(labels.width(), labels.height(), &samples, output, config)
    }
}
