//! Template-guided region refinement
//!
//! Each user-supplied template rectangle is adjusted against the text blobs
//! found near it, honoring the per-type tuning: boundary expansion, minimum
//! size, width/height ratio limits, and the template-adherence weight. When
//! adherence is low enough, text nowhere near any template is recovered
//! through the grouping path as additional regions.

use tracing::debug;

use crate::config::{
    DEFAULT_BOUNDARY_EXPANSION, DEFAULT_MIN_HEIGHT, DEFAULT_MIN_WIDTH, DetectionConfig,
    RegionTypeConfig,
};
use crate::detector::grouping;
use crate::models::{CandidateRegion, Rect, RegionSource, TemplateRegion, TextBlob};

/// Distance within which leftover blobs still count as template-covered, px
const TEMPLATE_COVERAGE_DISTANCE: f32 = 50.0;
/// Confidence penalty applied to recovered additional regions
const ADDITIONAL_PENALTY: f32 = 0.2;
/// Confidence floor for recovered additional regions
const ADDITIONAL_FLOOR: f32 = 0.3;
/// Hard ceiling on refined-region confidence
const CONFIDENCE_CEILING: f32 = 0.95;

/// Refine template regions against the detected text blobs
pub fn refine_templates(
    templates: &[TemplateRegion],
    blobs: &[TextBlob],
    image_width: usize,
    image_height: usize,
    config: &DetectionConfig,
) -> Vec<CandidateRegion> {
    let iw = image_width as f32;
    let ih = image_height as f32;
    let adherence = config.template_adherence;
    let mut candidates = Vec::new();

    for (index, template) in templates.iter().enumerate() {
        let type_config = config.type_config(&template.kind);
        let expansion = type_config
            .boundary_expansion
            .unwrap_or(DEFAULT_BOUNDARY_EXPANSION);

        let relevant: Vec<&TextBlob> = blobs
            .iter()
            .filter(|blob| is_near(&template.rect, blob, expansion))
            .collect();

        if relevant.is_empty() {
            if adherence > 0.5 {
                // Trust the template even without supporting text
                let floor = type_config.min_confidence.unwrap_or(0.2);
                candidates.push(CandidateRegion {
                    rect: template.rect,
                    kind: template.kind.clone(),
                    confidence: floor.max(0.1),
                    source: RegionSource::TemplateOnly,
                    template_index: Some(index),
                });
            }
            continue;
        }

        let prefer_template =
            type_config.prefer_template_position == Some(true) && adherence > 0.5;
        let mut rect = if prefer_template {
            grow_to_cover(&template.rect, &relevant, expansion)
        } else {
            union_with_blobs(&template.rect, &relevant).pad(expansion)
        }
        .clamp_to(iw, ih);

        rect = enforce_min_size(&rect, &type_config).clamp_to(iw, ih);

        if violates_ratio_limits(&rect, &type_config, iw, ih) {
            debug!(
                template = index,
                kind = %template.kind,
                "refined region rejected by ratio limits"
            );
            continue;
        }

        let confidence = refined_confidence(
            &rect,
            &relevant,
            &type_config,
            RegionSource::TemplateRefined,
        );

        candidates.push(CandidateRegion {
            rect,
            kind: template.kind.clone(),
            confidence,
            source: RegionSource::TemplateRefined,
            template_index: Some(index),
        });
    }

    // Low adherence means the template may have missed text worth keeping
    if adherence < 0.8 {
        let leftover: Vec<TextBlob> = blobs
            .iter()
            .filter(|blob| {
                !templates
                    .iter()
                    .any(|t| is_near(&t.rect, blob, TEMPLATE_COVERAGE_DISTANCE))
            })
            .copied()
            .collect();

        if !leftover.is_empty() {
            let groups = grouping::group_blobs(&leftover, config.grouping_distance);
            for mut region in grouping::build_regions(&groups, image_width, image_height) {
                region.source = RegionSource::AutoDetectedAdditional;
                region.confidence = (region.confidence - ADDITIONAL_PENALTY).max(ADDITIONAL_FLOOR);
                candidates.push(region);
            }
        }
    }

    candidates
}

/// Whether a blob overlaps the rectangle or sits within `distance` of it
fn is_near(rect: &Rect, blob: &TextBlob, distance: f32) -> bool {
    let blob_rect = blob.to_rect();
    rect.overlaps(&blob_rect) || rect.gap_distance(&blob_rect) <= distance
}

/// Keep the template position, only growing outward to enclose blobs that
/// stick out, plus padding
fn grow_to_cover(template: &Rect, blobs: &[&TextBlob], expansion: f32) -> Rect {
    let mut left = template.x;
    let mut top = template.y;
    let mut right = template.right();
    let mut bottom = template.bottom();

    for blob in blobs {
        let b = blob.to_rect();
        if b.x < left {
            left = b.x - expansion;
        }
        if b.y < top {
            top = b.y - expansion;
        }
        if b.right() > right {
            right = b.right() + expansion;
        }
        if b.bottom() > bottom {
            bottom = b.bottom() + expansion;
        }
    }

    Rect::new(left, top, right - left, bottom - top)
}

/// Bounding box of the template and every relevant blob
fn union_with_blobs(template: &Rect, blobs: &[&TextBlob]) -> Rect {
    blobs
        .iter()
        .fold(*template, |acc, blob| acc.union_rect(&blob.to_rect()))
}

/// Expand symmetrically around the center up to the configured minimum size
fn enforce_min_size(rect: &Rect, type_config: &RegionTypeConfig) -> Rect {
    let min_width = type_config.min_width.unwrap_or(DEFAULT_MIN_WIDTH);
    let min_height = type_config.min_height.unwrap_or(DEFAULT_MIN_HEIGHT);
    let (cx, cy) = rect.center();

    let width = rect.width.max(min_width);
    let height = rect.height.max(min_height);
    Rect::new(cx - width / 2.0, cy - height / 2.0, width, height)
}

/// Per-type width/height ratio constraints; a violation rejects the whole
/// candidate rather than clamping it
fn violates_ratio_limits(
    rect: &Rect,
    type_config: &RegionTypeConfig,
    image_width: f32,
    image_height: f32,
) -> bool {
    if image_width <= 0.0 || image_height <= 0.0 {
        return false;
    }
    let width_ratio = rect.width / image_width;
    let height_ratio = rect.height / image_height;

    if let Some(max) = type_config.max_width_ratio
        && width_ratio > max
    {
        return true;
    }
    if let Some(min) = type_config.min_width_ratio
        && width_ratio < min
    {
        return true;
    }
    if let Some(max) = type_config.max_height_ratio
        && height_ratio > max
    {
        return true;
    }
    if let Some(min) = type_config.min_height_ratio
        && height_ratio < min
    {
        return true;
    }
    false
}

/// Confidence for a refined region: coverage, ink density, and size blend,
/// scaled by the source multiplier and clamped to the per-type floor
fn refined_confidence(
    rect: &Rect,
    blobs: &[&TextBlob],
    type_config: &RegionTypeConfig,
    source: RegionSource,
) -> f32 {
    let floor = type_config.min_confidence.unwrap_or(0.1);
    let region_area = rect.area();
    let text_area: f32 = blobs.iter().map(|b| b.area() as f32).sum();
    let text_pixels: usize = blobs.iter().map(|b| b.pixel_count).sum();

    let density = if text_area > 0.0 {
        text_pixels as f32 / text_area
    } else {
        0.0
    };

    if let Some(required) = type_config.require_text_density
        && density < required
    {
        return floor.min(CONFIDENCE_CEILING);
    }

    let coverage = if region_area > 0.0 {
        (text_area / region_area).min(1.0)
    } else {
        0.0
    };
    let size_score = (region_area.sqrt() / 200.0).min(1.0);

    let raw = 0.4 * coverage + 0.3 * density + 0.3 * size_score;
    (raw * source.confidence_multiplier()).clamp(floor, CONFIDENCE_CEILING)
}
