//! Grouping text blobs into candidate regions (no-template path)

use crate::models::{CandidateRegion, RegionSource, RegionType, TextBlob};

/// Blobs whose top or left edges differ by less than this are treated as
/// row/column aligned, px
const ALIGNMENT_TOLERANCE: f32 = 20.0;
/// Padding added around a grouped region before clamping, px
const GROUP_PADDING: f32 = 5.0;

/// A cluster of nearby or aligned text blobs
#[derive(Debug, Clone)]
pub struct BlobGroup {
    /// Leftmost pixel column over all member blobs
    pub min_x: usize,
    /// Topmost pixel row
    pub min_y: usize,
    /// Rightmost pixel column (inclusive)
    pub max_x: usize,
    /// Bottommost pixel row (inclusive)
    pub max_y: usize,
    /// Total ink pixels across members
    pub pixel_count: usize,
    /// Number of member blobs
    pub blob_count: usize,
}

impl BlobGroup {
    fn from_seed(seed: &TextBlob) -> Self {
        Self {
            min_x: seed.min_x,
            min_y: seed.min_y,
            max_x: seed.max_x,
            max_y: seed.max_y,
            pixel_count: seed.pixel_count,
            blob_count: 1,
        }
    }

    fn absorb(&mut self, blob: &TextBlob) {
        self.min_x = self.min_x.min(blob.min_x);
        self.min_y = self.min_y.min(blob.min_y);
        self.max_x = self.max_x.max(blob.max_x);
        self.max_y = self.max_y.max(blob.max_y);
        self.pixel_count += blob.pixel_count;
        self.blob_count += 1;
    }

    /// Group bounding-box width
    pub fn width(&self) -> f32 {
        (self.max_x - self.min_x + 1) as f32
    }

    /// Group bounding-box height
    pub fn height(&self) -> f32 {
        (self.max_y - self.min_y + 1) as f32
    }

    /// Group bounding-box area
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Group center as (x, y)
    pub fn center(&self) -> (f32, f32) {
        (
            self.min_x as f32 + self.width() / 2.0,
            self.min_y as f32 + self.height() / 2.0,
        )
    }
}

/// Cluster blobs by proximity to a seed blob or row/column alignment with it
///
/// Blobs are processed largest-area-first; each joins the first group whose
/// seed it is near or aligned with, so assignment is greedy and every blob
/// lands in exactly one group. The alignment test catches text lines that are
/// far apart horizontally but share a top or left edge.
pub fn group_blobs(blobs: &[TextBlob], max_distance: f32) -> Vec<BlobGroup> {
    let mut order: Vec<usize> = (0..blobs.len()).collect();
    order.sort_by(|&a, &b| blobs[b].area().cmp(&blobs[a].area()));

    let mut used = vec![false; blobs.len()];
    let mut groups = Vec::new();

    for &i in &order {
        if used[i] {
            continue;
        }
        used[i] = true;
        let seed = &blobs[i];
        let mut group = BlobGroup::from_seed(seed);

        for &j in &order {
            if used[j] {
                continue;
            }
            let other = &blobs[j];
            if belongs_with(seed, other, max_distance) {
                used[j] = true;
                group.absorb(other);
            }
        }

        groups.push(group);
    }

    groups
}

fn belongs_with(seed: &TextBlob, other: &TextBlob, max_distance: f32) -> bool {
    let (sx, sy) = seed.center();
    let (ox, oy) = other.center();
    let dx = sx - ox;
    let dy = sy - oy;
    if (dx * dx + dy * dy).sqrt() < max_distance {
        return true;
    }

    let top_delta = (seed.min_y as f32 - other.min_y as f32).abs();
    let left_delta = (seed.min_x as f32 - other.min_x as f32).abs();
    top_delta < ALIGNMENT_TOLERANCE || left_delta < ALIGNMENT_TOLERANCE
}

/// Guess the semantic type of a group from its geometry relative to the page
pub fn guess_region_type(group: &BlobGroup, image_width: f32, image_height: f32) -> RegionType {
    let (cx, cy) = group.center();
    let aspect = if group.height() > 0.0 {
        group.width() / group.height()
    } else {
        0.0
    };

    // Wide strips near the top or bottom edge
    if cy < image_height * 0.2 && aspect > 2.0 {
        return RegionType::new(RegionType::HEADER);
    }
    if cy > image_height * 0.8 && aspect > 2.0 {
        return RegionType::new(RegionType::FOOTER);
    }

    // Narrow tall columns hugging a side
    let narrow = group.width() < image_width * 0.3;
    let tall = group.height() > image_height * 0.3;
    if narrow && tall {
        if cx < image_width * 0.3 {
            return RegionType::new(RegionType::LEFT_MARGIN);
        }
        if cx > image_width * 0.7 {
            return RegionType::new(RegionType::RIGHT_MARGIN);
        }
    }

    if cx < image_width * 0.5 {
        RegionType::new(RegionType::LEFT_TEXT)
    } else {
        RegionType::new(RegionType::RIGHT_TEXT)
    }
}

/// Confidence for a grouped region: equal-weight blend of ink density, size,
/// and member count, clamped to [0.1, 0.9]
pub fn group_confidence(group: &BlobGroup) -> f32 {
    let area = group.area();
    let density = if area > 0.0 {
        group.pixel_count as f32 / area
    } else {
        0.0
    };
    let density_score = (density * 10.0).min(1.0);
    let size_score = (area.sqrt() / 200.0).min(1.0);
    let count_score = (group.blob_count as f32 / 5.0).min(1.0);

    ((density_score + size_score + count_score) / 3.0).clamp(0.1, 0.9)
}

/// Turn blob groups into typed, scored candidate regions
pub fn build_regions(
    groups: &[BlobGroup],
    image_width: usize,
    image_height: usize,
) -> Vec<CandidateRegion> {
    let iw = image_width as f32;
    let ih = image_height as f32;

    groups
        .iter()
        .map(|group| {
            let kind = guess_region_type(group, iw, ih);
            let confidence = group_confidence(group);
            let rect = crate::models::Rect::new(
                group.min_x as f32,
                group.min_y as f32,
                group.width(),
                group.height(),
            )
            .pad(GROUP_PADDING)
            .clamp_to(iw, ih);

            CandidateRegion {
                rect,
                kind,
                confidence,
                source: RegionSource::AutoDetected,
                template_index: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(min_x: usize, min_y: usize, max_x: usize, max_y: usize, pixels: usize) -> TextBlob {
        TextBlob {
            min_x,
            min_y,
            max_x,
            max_y,
            pixel_count: pixels,
        }
    }

    #[test]
    fn test_nearby_blobs_group() {
        let blobs = vec![blob(0, 0, 20, 10, 100), blob(30, 0, 50, 10, 100)];
        let groups = group_blobs(&blobs, 80.0);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].blob_count, 2);
        assert_eq!(groups[0].pixel_count, 200);
    }

    #[test]
    fn test_aligned_blobs_group_despite_distance() {
        // Same top edge, 500px apart horizontally: alignment wins
        let blobs = vec![blob(0, 100, 40, 120, 200), blob(500, 102, 540, 122, 200)];
        let groups = group_blobs(&blobs, 80.0);
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn test_distant_unaligned_blobs_stay_apart() {
        let blobs = vec![blob(0, 0, 20, 20, 100), blob(300, 300, 320, 320, 100)];
        let groups = group_blobs(&blobs, 80.0);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_type_guess_header_footer() {
        // Wide strip near the top of a 1000x1000 page
        let top = BlobGroup {
            min_x: 100,
            min_y: 20,
            max_x: 899,
            max_y: 79,
            pixel_count: 10_000,
            blob_count: 3,
        };
        assert_eq!(
            guess_region_type(&top, 1000.0, 1000.0).as_str(),
            RegionType::HEADER
        );

        let bottom = BlobGroup {
            min_y: 900,
            max_y: 959,
            ..top.clone()
        };
        assert_eq!(
            guess_region_type(&bottom, 1000.0, 1000.0).as_str(),
            RegionType::FOOTER
        );
    }

    #[test]
    fn test_type_guess_margins_and_text() {
        // Narrow tall column at the left edge
        let margin = BlobGroup {
            min_x: 10,
            min_y: 200,
            max_x: 109,
            max_y: 799,
            pixel_count: 20_000,
            blob_count: 10,
        };
        assert_eq!(
            guess_region_type(&margin, 1000.0, 1000.0).as_str(),
            RegionType::LEFT_MARGIN
        );

        // Small block left of center on a wide page falls through to text
        let text = BlobGroup {
            min_x: 50,
            min_y: 50,
            max_x: 89,
            max_y: 74,
            pixel_count: 1000,
            blob_count: 1,
        };
        assert_eq!(
            guess_region_type(&text, 400.0, 200.0).as_str(),
            RegionType::LEFT_TEXT
        );
    }

    #[test]
    fn test_confidence_bounds() {
        let tiny = BlobGroup {
            min_x: 0,
            min_y: 0,
            max_x: 1,
            max_y: 1,
            pixel_count: 1,
            blob_count: 1,
        };
        let huge = BlobGroup {
            min_x: 0,
            min_y: 0,
            max_x: 999,
            max_y: 999,
            pixel_count: 1_000_000,
            blob_count: 50,
        };
        assert!(group_confidence(&tiny) >= 0.1);
        assert!(group_confidence(&huge) <= 0.9);
    }

    #[test]
    fn test_build_regions_pads_and_clamps() {
        let groups = vec![BlobGroup {
            min_x: 0,
            min_y: 0,
            max_x: 49,
            max_y: 19,
            pixel_count: 800,
            blob_count: 2,
        }];
        let regions = build_regions(&groups, 400, 200);
        assert_eq!(regions.len(), 1);
        let rect = regions[0].rect;
        // 5px padding, clamped at the page origin
        assert_eq!((rect.x, rect.y), (0.0, 0.0));
        assert_eq!((rect.width, rect.height), (55.0, 25.0));
        assert_eq!(regions[0].source, RegionSource::AutoDetected);
    }
}
