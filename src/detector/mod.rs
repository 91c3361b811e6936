//! Region detection pipeline
//!
//! The stages run in a fixed order: pixel classification, connected-component
//! extraction, then either template refinement or blob grouping, and finally
//! confidence filtering with overlap resolution. Every stage is a pure
//! function of its inputs and the configuration.

/// Connected-component flood fill over the binary mask
pub mod blobs;
/// Grayscale conversion and thresholding
pub mod classify;
/// Blob grouping and type guessing (no-template path)
pub mod grouping;
/// Template-guided refinement
pub mod refine;
/// Confidence filter, dedup, overlap resolution
pub mod resolve;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DetectionConfig;
use crate::error::DetectionError;
use crate::models::{CandidateRegion, RasterImage, TemplateRegion};

/// Counters describing one detection run, echoed back with the settings used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionMetadata {
    /// Text blobs surviving the minimum-size filter
    pub text_areas_found: usize,
    /// Regions returned after filtering and overlap resolution
    pub regions_proposed: usize,
    /// Whether template guidance was applied
    pub used_template: bool,
    /// Number of template rectangles supplied
    pub template_count: usize,
    /// Candidates rejected by overlap prevention
    pub overlaps_prevented: usize,
    /// The configuration the run used
    pub settings: DetectionConfig,
}

/// Result of one detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    /// Scored regions, confidence-descending, at most 25
    pub regions: Vec<CandidateRegion>,
    /// Run counters and the settings used
    pub metadata: DetectionMetadata,
}

/// Run the full pipeline on a raster image
pub fn detect_regions(
    image: &RasterImage,
    templates: &[TemplateRegion],
    config: &DetectionConfig,
) -> Result<DetectionReport, DetectionError> {
    config.validate()?;
    let gray = classify::to_grayscale(image)?;
    detect_on_grayscale(&gray, image.width, image.height, templates, config)
}

/// Run the full pipeline on a pre-computed grayscale buffer
///
/// The sweep engine uses this entry point to convert the page once and reuse
/// the buffer across every configuration.
pub fn detect_on_grayscale(
    gray: &[u8],
    width: usize,
    height: usize,
    templates: &[TemplateRegion],
    config: &DetectionConfig,
) -> Result<DetectionReport, DetectionError> {
    let expected = width * height;
    if gray.len() != expected {
        return Err(DetectionError::BufferSize {
            width,
            height,
            format: crate::models::PixelFormat::Gray8,
            expected,
            got: gray.len(),
        });
    }

    let mask = classify::classify(gray, width, height, config.threshold);
    let text_blobs = blobs::extract_blobs(&mask, config.min_region_size, config.seed_stride);
    debug!(blobs = text_blobs.len(), "text areas extracted");

    let use_template = config.use_template_guidance && !templates.is_empty();
    let candidates = if use_template {
        refine::refine_templates(templates, &text_blobs, width, height, config)
    } else {
        let groups = grouping::group_blobs(&text_blobs, config.grouping_distance);
        grouping::build_regions(&groups, width, height)
    };
    debug!(
        candidates = candidates.len(),
        used_template = use_template,
        "candidates proposed"
    );

    let (regions, stats) = resolve::finalize(candidates, config);

    Ok(DetectionReport {
        metadata: DetectionMetadata {
            text_areas_found: text_blobs.len(),
            regions_proposed: regions.len(),
            used_template: use_template,
            template_count: templates.len(),
            overlaps_prevented: stats.overlaps_prevented,
            settings: config.clone(),
        },
        regions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grayscale_buffer_length_checked() {
        let config = DetectionConfig::default();
        let result = detect_on_grayscale(&[0u8; 10], 4, 4, &[], &config);
        assert!(matches!(
            result,
            Err(DetectionError::BufferSize {
                expected: 16,
                got: 10,
                ..
            })
        ));
    }

    #[test]
    fn test_zero_area_image_is_empty_not_error() {
        let config = DetectionConfig::default();
        let report = detect_on_grayscale(&[], 0, 0, &[], &config).unwrap();
        assert!(report.regions.is_empty());
        assert_eq!(report.metadata.text_areas_found, 0);
    }

    #[test]
    fn test_template_guidance_toggle() {
        let mut config = DetectionConfig::default();
        config.use_template_guidance = false;
        let templates = vec![TemplateRegion::new(
            crate::models::Rect::new(0.0, 0.0, 10.0, 10.0),
            "header",
        )];
        let gray = vec![255u8; 100 * 100];
        let report = detect_on_grayscale(&gray, 100, 100, &templates, &config).unwrap();
        assert!(!report.metadata.used_template);
        assert_eq!(report.metadata.template_count, 1);
    }
}
