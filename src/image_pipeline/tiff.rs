//! TIFF I/O module
//!
//! Writes density and label images as 16-bit grayscale TIFF files and reads
//! label images produced by the external clustering step.

mod writer;
mod standard_tiff_writer;
mod label_reader;
pub mod types;

pub use writer::TiffWriter;
pub use standard_tiff_writer::StandardTiffWriter;
pub use label_reader::{decode_label_tiff, read_label_image};
pub use types::{TiffCompression, TiffConfig, TiffConfigBuilder};
