use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in image pixel coordinates
///
/// This is the only rectangle representation in the crate; blob min/max
/// bounds are converted to it at the edge of the blob subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle area in pixels
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Right edge (x + width)
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (y + height)
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point as (x, y)
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Euclidean distance between rectangle centers
    pub fn center_distance(&self, other: &Rect) -> f32 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        let dx = ax - bx;
        let dy = ay - by;
        (dx * dx + dy * dy).sqrt()
    }

    /// Shortest edge-to-edge distance; 0 when the rectangles touch or overlap
    pub fn gap_distance(&self, other: &Rect) -> f32 {
        let dx = (other.x - self.right()).max(self.x - other.right()).max(0.0);
        let dy = (other.y - self.bottom())
            .max(self.y - other.bottom())
            .max(0.0);
        (dx * dx + dy * dy).sqrt()
    }

    /// Area shared with another rectangle, 0 if disjoint
    pub fn intersection_area(&self, other: &Rect) -> f32 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x1 >= x2 || y1 >= y2 {
            return 0.0;
        }
        (x2 - x1) * (y2 - y1)
    }

    /// Whether the rectangles share any area
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.intersection_area(other) > 0.0
    }

    /// Intersection over union; 0 for disjoint rectangles
    pub fn iou(&self, other: &Rect) -> f32 {
        let intersection = self.intersection_area(other);
        if intersection <= 0.0 {
            return 0.0;
        }
        let union = self.area() + other.area() - intersection;
        if union > 0.0 { intersection / union } else { 0.0 }
    }

    /// Smallest rectangle enclosing both
    pub fn union_rect(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Grow by `amount` pixels on every side
    pub fn pad(&self, amount: f32) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    /// Clip to the image bounds `[0, width] x [0, height]`
    pub fn clamp_to(&self, image_width: f32, image_height: f32) -> Rect {
        let x = self.x.clamp(0.0, image_width);
        let y = self.y.clamp(0.0, image_height);
        let right = self.right().clamp(0.0, image_width);
        let bottom = self.bottom().clamp(0.0, image_height);
        Rect::new(x, y, (right - x).max(0.0), (bottom - y).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iou_identity() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.iou(&r), 1.0);
    }

    #[test]
    fn test_iou_disjoint() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 20.0, 10.0, 10.0);
        assert_eq!(a.iou(&b), 0.0);
        assert_eq!(b.iou(&a), 0.0);
    }

    #[test]
    fn test_iou_symmetry() {
        let a = Rect::new(0.0, 0.0, 20.0, 20.0);
        let b = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!((a.iou(&b) - b.iou(&a)).abs() < 1e-6);
        // 10x10 intersection over 400 + 400 - 100 union
        assert!((a.iou(&b) - 100.0 / 700.0).abs() < 1e-6);
    }

    #[test]
    fn test_gap_distance() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(13.0, 14.0, 10.0, 10.0);
        assert_eq!(a.gap_distance(&b), 5.0);

        let c = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.gap_distance(&c), 0.0);
    }

    #[test]
    fn test_clamp_to() {
        let r = Rect::new(-5.0, -5.0, 20.0, 20.0);
        let clamped = r.clamp_to(12.0, 10.0);
        assert_eq!(clamped, Rect::new(0.0, 0.0, 12.0, 10.0));
    }

    #[test]
    fn test_union_and_pad() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 5.0, 10.0, 10.0);
        let u = a.union_rect(&b);
        assert_eq!(u, Rect::new(0.0, 0.0, 30.0, 15.0));
        assert_eq!(u.pad(5.0), Rect::new(-5.0, -5.0, 40.0, 25.0));
    }
}
