//! Reading of label images written by the clustering step.

use std::io::{Read, Seek};
use std::path::Path;

use tiff::decoder::{Decoder, DecodingResult};
use tracing::{debug, instrument};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::common::image::Image;
use crate::image_pipeline::statistics::LabelImage;

/// Decodes a single channel integer TIFF into a label image.
pub fn decode_label_tiff<R: Read + Seek>(input: R) -> Result<LabelImage> {
    let mut decoder = Decoder::new(input).map_err(|e| PipelineError::DecodeError(e.to_string()))?;
    let (width, height) = decoder
        .dimensions()
        .map_err(|e| PipelineError::DecodeError(e.to_string()))?;
    let image = decoder
        .read_image()
        .map_err(|e| PipelineError::DecodeError(e.to_string()))?;

    let labels: Vec<i32> = match image {
        DecodingResult::U8(data) => data.into_iter().map(i32::from).collect(),
        DecodingResult::U16(data) => data.into_iter().map(i32::from).collect(),
        DecodingResult::I8(data) => data.into_iter().map(i32::from).collect(),
        DecodingResult::I16(data) => data.into_iter().map(i32::from).collect(),
        DecodingResult::I32(data) => data,
        DecodingResult::U32(data) => data
            .into_iter()
            .map(|v| {
                i32::try_from(v)
                    .map_err(|_| PipelineError::UnsupportedFormat(format!("label {v} out of range")))
            })
            .collect::<Result<_>>()?,
        _ => {
            return Err(PipelineError::UnsupportedFormat(
                "label TIFF must hold integer samples".to_string(),
            ));
        }
    };

    debug!("Decoded label image: {}x{}", width, height);
    // multi-channel images fail here since the sample count won't match
    Image::new(width as usize, height as usize, labels)
}

/// Opens `path` and decodes it as a label image.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_label_image<P: AsRef<Path>>(path: P) -> Result<LabelImage> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| PipelineError::from_io(path, e))?;
    decode_label_tiff(std::io::BufReader::new(file))
}
