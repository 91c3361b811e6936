use super::rect::Rect;

/// A connected component of ink pixels
///
/// Blobs carry inclusive min/max pixel bounds; they are converted to [`Rect`]
/// at the boundary of the grouping and refinement steps and never leave the
/// detection pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBlob {
    /// Leftmost ink pixel column
    pub min_x: usize,
    /// Topmost ink pixel row
    pub min_y: usize,
    /// Rightmost ink pixel column (inclusive)
    pub max_x: usize,
    /// Bottommost ink pixel row (inclusive)
    pub max_y: usize,
    /// Number of ink pixels in the component
    pub pixel_count: usize,
}

impl TextBlob {
    /// Bounding-box width in pixels
    pub fn width(&self) -> usize {
        self.max_x - self.min_x + 1
    }

    /// Bounding-box height in pixels
    pub fn height(&self) -> usize {
        self.max_y - self.min_y + 1
    }

    /// Bounding-box area in pixels
    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// Ink pixels per bounding-box pixel, in (0, 1]
    pub fn density(&self) -> f32 {
        let area = self.area();
        if area == 0 {
            return 0.0;
        }
        self.pixel_count as f32 / area as f32
    }

    /// Bounding box as a rectangle
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.min_x as f32,
            self.min_y as f32,
            self.width() as f32,
            self.height() as f32,
        )
    }

    /// Bounding-box center as (x, y)
    pub fn center(&self) -> (f32, f32) {
        (
            self.min_x as f32 + self.width() as f32 / 2.0,
            self.min_y as f32 + self.height() as f32 / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_geometry() {
        let blob = TextBlob {
            min_x: 50,
            min_y: 50,
            max_x: 89,
            max_y: 74,
            pixel_count: 1000,
        };
        assert_eq!(blob.width(), 40);
        assert_eq!(blob.height(), 25);
        assert_eq!(blob.area(), 1000);
        assert!((blob.density() - 1.0).abs() < 1e-6);
        assert_eq!(blob.to_rect(), Rect::new(50.0, 50.0, 40.0, 25.0));
        assert_eq!(blob.center(), (70.0, 62.5));
    }
}
