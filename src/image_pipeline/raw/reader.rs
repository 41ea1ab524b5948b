use std::io::Read;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::types::PixelBuffer;

pub trait PqctImageReader {
    /// Decodes a complete file image held in memory, header included.
    fn read_pqct(&self, data: &[u8]) -> Result<PixelBuffer>;

    /// Decodes from a byte stream positioned at the start of the header.
    fn read_pqct_from(&self, input: &mut dyn Read) -> Result<PixelBuffer> {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;
        self.read_pqct(&data)
    }
}
