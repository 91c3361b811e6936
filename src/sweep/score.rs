//! Similarity scoring between detected regions and a user-drawn ideal set

use serde::{Deserialize, Serialize};

use crate::models::{CandidateRegion, TemplateRegion};

/// Best-IoU below which an ideal region counts as missed
const RECALL_IOU_FLOOR: f32 = 0.3;
/// Penalty per detected region beyond the ideal count
const EXTRA_REGION_PENALTY: f32 = 0.1;

/// How closely one detection run matched the ideal region set
///
/// All fields are derived in one pass and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityScore {
    /// Weighted blend of the components minus the extra-region penalty, >= 0
    pub overall: f32,
    /// Mean best-IoU over ideal regions
    pub avg_iou: f32,
    /// Fraction of ideal regions whose best match has the same type
    pub type_accuracy: f32,
    /// Fraction of ideal regions with best IoU above 0.3
    pub region_recall: f32,
    /// Mean center distance between ideal regions and their best matches, px
    pub avg_position_error: f32,
    /// Detected regions beyond the ideal count
    pub extra_regions: usize,
}

/// Score a detection result against the ideal regions
///
/// For every ideal region the detected region with the highest IoU is its
/// match; unmatched ideals contribute zero to every component.
pub fn score_detection(
    ideal: &[TemplateRegion],
    detected: &[CandidateRegion],
) -> SimilarityScore {
    let mut total_iou = 0.0f32;
    let mut type_matches = 0usize;
    let mut recalled = 0usize;
    let mut position_errors: Vec<f32> = Vec::new();

    for ideal_region in ideal {
        let mut best_iou = 0.0f32;
        let mut best_match: Option<&CandidateRegion> = None;

        for candidate in detected {
            let iou = ideal_region.rect.iou(&candidate.rect);
            if iou > best_iou {
                best_iou = iou;
                best_match = Some(candidate);
            }
        }

        if let Some(matched) = best_match {
            total_iou += best_iou;
            if matched.kind == ideal_region.kind {
                type_matches += 1;
            }
            if best_iou > RECALL_IOU_FLOOR {
                recalled += 1;
            }
            position_errors.push(ideal_region.rect.center_distance(&matched.rect));
        }
    }

    let ideal_count = ideal.len();
    let avg_iou = if ideal_count > 0 {
        total_iou / ideal_count as f32
    } else {
        0.0
    };
    let type_accuracy = if ideal_count > 0 {
        type_matches as f32 / ideal_count as f32
    } else {
        0.0
    };
    let region_recall = if ideal_count > 0 {
        recalled as f32 / ideal_count as f32
    } else {
        0.0
    };
    let avg_position_error = if position_errors.is_empty() {
        0.0
    } else {
        position_errors.iter().sum::<f32>() / position_errors.len() as f32
    };

    let extra_regions = detected.len().saturating_sub(ideal_count);
    let penalty = extra_regions as f32 * EXTRA_REGION_PENALTY;
    let overall = (0.4 * avg_iou + 0.3 * type_accuracy + 0.3 * region_recall) - penalty;

    SimilarityScore {
        overall: overall.max(0.0),
        avg_iou,
        type_accuracy,
        region_recall,
        avg_position_error,
        extra_regions,
    }
}
