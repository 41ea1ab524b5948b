//! Rectangular region of interest

use crate::image_pipeline::common::error::{PipelineError, Result};

/// Rectangular region in pixel coordinates, `x`/`y` being the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roi {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Roi {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    /// ROI covering a whole `width` x `height` image.
    pub fn full(width: usize, height: usize) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Fails with `RoiOutOfBounds` unless the region lies inside the image.
    pub fn validate(&self, width: usize, height: usize) -> Result<()> {
        let fits_x = self.x.checked_add(self.width).is_some_and(|end| end <= width);
        let fits_y = self.y.checked_add(self.height).is_some_and(|end| end <= height);
        if fits_x && fits_y {
            Ok(())
        } else {
            Err(PipelineError::RoiOutOfBounds {
                roi: *self,
                width,
                height,
            })
        }
    }

    /// Row-major iterator over the `(x, y)` coordinates of the region.
    pub fn coordinates(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| (x, y)))
    }
}
