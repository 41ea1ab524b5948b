//! Reader for the fixed-offset pQCT raw format.
//!
//! The file layout is a header of `header_length` opaque bytes followed by
//! `side * side` little-endian `i16` samples in row-major order. Nothing in the
//! header is parsed; the side length comes from the payload size alone.

use std::io::{self, Read, Write};
use std::path::Path;

use tracing::{debug, instrument, warn};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::common::image::Image;
use crate::image_pipeline::raw::reader::PqctImageReader;
use crate::image_pipeline::raw::types::{PixelBuffer, RawImageDescriptor};

/// Size in bytes of one stored sample.
const BYTES_PER_SAMPLE: usize = 2;

/// Reader for raw pQCT files with a fixed-length header.
#[derive(Debug, Clone, Default)]
pub struct FixedHeaderReader {
    descriptor: RawImageDescriptor,
}

impl FixedHeaderReader {
    pub fn new(descriptor: RawImageDescriptor) -> Self {
        Self { descriptor }
    }

    pub fn descriptor(&self) -> &RawImageDescriptor {
        &self.descriptor
    }

    /// Builds the square buffer from the bytes following the header.
    ///
    /// Bytes beyond `2 * side^2` are dropped with a warning.
    fn decode_payload(&self, payload: &[u8]) -> Result<PixelBuffer> {
        let side = side_length_for(payload.len());
        let used = BYTES_PER_SAMPLE * side * side;

        if used != payload.len() {
            warn!(
                payload_bytes = payload.len(),
                side,
                discarded = payload.len() - used,
                "Payload is not a square 16-bit image, trailing bytes ignored"
            );
        }

        let samples: Vec<i16> = payload[..used]
            .chunks_exact(BYTES_PER_SAMPLE)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        debug!("Decoded pQCT image: {}x{}", side, side);
        Image::new(side, side, samples)
    }
}

impl PqctImageReader for FixedHeaderReader {
    fn read_pqct(&self, data: &[u8]) -> Result<PixelBuffer> {
        debug!("Decoding pQCT image, {} bytes", data.len());

        let header_length = self.descriptor.header_length;
        if data.len() < header_length {
            return Err(truncated_header(header_length, data.len()));
        }

        self.decode_payload(&data[header_length..])
    }

    fn read_pqct_from(&self, input: &mut dyn Read) -> Result<PixelBuffer> {
        let header_length = self.descriptor.header_length;
        let skipped = io::copy(&mut (&mut *input).take(header_length as u64), &mut io::sink())?;
        if skipped < header_length as u64 {
            return Err(truncated_header(header_length, skipped as usize));
        }

        let mut payload = Vec::new();
        input.read_to_end(&mut payload)?;
        self.decode_payload(&payload)
    }
}

fn truncated_header(expected: usize, actual: usize) -> PipelineError {
    PipelineError::Io(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("file holds {actual} bytes, header alone needs {expected}"),
    ))
}

/// Largest `side` with `2 * side^2 <= payload_bytes`.
pub fn side_length_for(payload_bytes: usize) -> usize {
    let samples = payload_bytes / BYTES_PER_SAMPLE;
    let mut side = (samples as f64).sqrt() as usize;
    // float sqrt can be off by one for large inputs
    while side * side > samples {
        side -= 1;
    }
    while (side + 1) * (side + 1) <= samples {
        side += 1;
    }
    side
}

/// Opens and decodes the file at `path` with the given descriptor.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn decode<P: AsRef<Path>>(path: P, descriptor: &RawImageDescriptor) -> Result<PixelBuffer> {
    let path = path.as_ref();
    let mut file = std::fs::File::open(path).map_err(|e| PipelineError::from_io(path, e))?;
    FixedHeaderReader::new(*descriptor).read_pqct_from(&mut file)
}

/// Writes `header` followed by the little-endian payload of `buffer`.
pub fn encode_pqct(header: &[u8], buffer: &PixelBuffer, output: &mut dyn Write) -> Result<()> {
    output.write_all(header)?;
    let payload: Vec<u8> = buffer.data().iter().flat_map(|v| v.to_le_bytes()).collect();
    output.write_all(&payload)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::image_pipeline::raw::types::DEFAULT_HEADER_LENGTH;

    fn file_bytes(header_len: usize, payload: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0xAB; header_len];
        bytes.extend_from_slice(payload);
        bytes
    }

    fn samples_payload(samples: &[i16]) -> Vec<u8> {
        samples.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn decodes_little_endian_signed_samples() {
        let payload = samples_payload(&[1, -2, 300, i16::MIN]);
        let data = file_bytes(DEFAULT_HEADER_LENGTH, &payload);

        let buffer = FixedHeaderReader::default().read_pqct(&data).unwrap();

        assert_eq!(buffer.dimensions(), (2, 2));
        assert_eq!(buffer.data(), &[1, -2, 300, i16::MIN]);
        assert_eq!(buffer.get(0, 1), Some(300));
    }

    #[test]
    fn trailing_bytes_are_truncated() {
        // nine samples and one odd byte
        let mut payload = samples_payload(&[7; 9]);
        payload.push(0xFF);
        let data = file_bytes(DEFAULT_HEADER_LENGTH, &payload);

        let buffer = FixedHeaderReader::default().read_pqct(&data).unwrap();

        assert_eq!(buffer.dimensions(), (3, 3));

        let mut payload = samples_payload(&[7; 8]);
        payload.push(0xFF);
        let data = file_bytes(DEFAULT_HEADER_LENGTH, &payload);
        let buffer = FixedHeaderReader::default().read_pqct(&data).unwrap();
        assert_eq!(buffer.dimensions(), (2, 2));
    }

    #[test]
    fn side_length_bounds_payload() {
        for bytes in [0usize, 1, 2, 7, 8, 17, 18, 160_178, 160_179, 1_000_001] {
            let side = side_length_for(bytes);
            assert!(2 * side * side <= bytes);
            assert!(bytes < 2 * (side + 1) * (side + 1));
        }
    }

    #[test]
    fn header_only_file_yields_empty_image() {
        let data = file_bytes(DEFAULT_HEADER_LENGTH, &[]);
        let buffer = FixedHeaderReader::default().read_pqct(&data).unwrap();
        assert_eq!(buffer.dimensions(), (0, 0));
    }

    #[test]
    fn short_file_is_an_io_error() {
        let data = vec![0u8; 100];
        let result = FixedHeaderReader::default().read_pqct(&data);
        assert!(matches!(result, Err(PipelineError::Io(_))));

        let result = FixedHeaderReader::default().read_pqct_from(&mut Cursor::new(data));
        assert!(matches!(result, Err(PipelineError::Io(_))));
    }

    #[test]
    fn stream_and_slice_agree() {
        let payload = samples_payload(&(0..16).map(|v| v * 100 - 700).collect::<Vec<i16>>());
        let data = file_bytes(16, &payload);
        let reader = FixedHeaderReader::new(RawImageDescriptor {
            header_length: 16,
            ..Default::default()
        });

        let from_slice = reader.read_pqct(&data).unwrap();
        let from_stream = reader.read_pqct_from(&mut Cursor::new(&data)).unwrap();

        assert_eq!(from_slice, from_stream);
        assert_eq!(from_slice.dimensions(), (4, 4));
    }

    #[test]
    fn payload_round_trips() {
        let header = vec![0x5A; DEFAULT_HEADER_LENGTH];
        let payload = samples_payload(&[-32768, -1, 0, 1, 255, 256, 4096, 32767, -4096]);
        let mut original = header.clone();
        original.extend_from_slice(&payload);

        let buffer = FixedHeaderReader::default().read_pqct(&original).unwrap();
        let mut encoded = Vec::new();
        encode_pqct(&header, &buffer, &mut encoded).unwrap();

        assert_eq!(&encoded[DEFAULT_HEADER_LENGTH..], &payload[..]);
    }

    #[test]
    fn decode_missing_file_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("I0000001.M01");
        let result = decode(&missing, &RawImageDescriptor::default());
        assert!(matches!(result, Err(PipelineError::FileNotFound(p)) if p == missing));
    }

    #[test]
    fn decode_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("I0036038.M01");
        let data = file_bytes(DEFAULT_HEADER_LENGTH, &samples_payload(&[10, 20, 30, 40]));
        std::fs::write(&path, data).unwrap();

        let buffer = decode(&path, &RawImageDescriptor::default()).unwrap();

        assert_eq!(buffer.data(), &[10, 20, 30, 40]);
    }
}
