//! pQCT raw image reading module
//!
//! This module locates the pixel payload behind the fixed-length proprietary
//! header and interprets it as a square image of signed 16-bit samples.

mod reader;
mod fixed_header_reader;
pub mod types;

pub use reader::PqctImageReader;
pub use fixed_header_reader::{FixedHeaderReader, decode, encode_pqct, side_length_for};
pub use types::{PixelBuffer, RawImageDescriptor};
