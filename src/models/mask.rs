/// Compact bit-packed binary mask over an image
///
/// A set bit marks an ink (text) pixel; a cleared bit is background.
#[derive(Debug, Clone)]
pub struct BinaryMask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BinaryMask {
    /// Create an all-background mask with the given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let bytes_needed = (width * height).div_ceil(8);
        Self {
            width,
            height,
            data: vec![0; bytes_needed],
        }
    }

    /// Mask width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Mask height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the pixel at (x, y) is ink; out-of-bounds reads are background
    pub fn is_ink(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y * self.width + x;
        (self.data[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Mark or clear the pixel at (x, y); out-of-bounds writes are ignored
    pub fn set_ink(&mut self, x: usize, y: usize, ink: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        if ink {
            self.data[index / 8] |= 1 << (index % 8);
        } else {
            self.data[index / 8] &= !(1 << (index % 8));
        }
    }

    /// Total number of ink pixels
    pub fn ink_count(&self) -> usize {
        let mut count: usize = self.data.iter().map(|b| b.count_ones() as usize).sum();
        // Trailing bits past width*height are never set, but guard anyway
        let used = self.width * self.height;
        if used % 8 != 0 {
            let last = self.data.len().saturating_sub(1);
            let spare = self.data[last] >> (used % 8);
            count -= spare.count_ones() as usize;
        }
        count
    }
}

impl Default for BinaryMask {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
