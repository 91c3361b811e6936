//! Confidence filtering, deduplication, and overlap resolution
//!
//! Order matters throughout this stage and is part of the observable
//! behavior: deduplication keeps the earlier-inserted region, overlap
//! resolution greedily favors higher confidence.

use tracing::debug;

use crate::config::DetectionConfig;
use crate::models::CandidateRegion;

/// Overlap fraction of the smaller region above which two candidates are
/// duplicates
const DUPLICATE_OVERLAP_RATIO: f32 = 0.7;
/// Confidence gap below which the final sort falls back to source preference
const TIE_BAND: f32 = 0.1;
/// Hard cap on the number of returned regions
pub const MAX_REGIONS: usize = 25;

/// Counters reported back through detection metadata
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveStats {
    /// Candidates rejected because they overlapped an accepted region
    pub overlaps_prevented: usize,
}

/// Filter, deduplicate, resolve overlaps, sort, and cap the candidate list
pub fn finalize(
    candidates: Vec<CandidateRegion>,
    config: &DetectionConfig,
) -> (Vec<CandidateRegion>, ResolveStats) {
    let mut stats = ResolveStats::default();

    // Per-type confidence floor, global threshold as fallback
    let mut survivors: Vec<CandidateRegion> = candidates
        .into_iter()
        .filter(|c| c.confidence >= config.min_confidence_for(&c.kind))
        .collect();

    survivors = dedup_near_identical(survivors);

    if config.prevent_overlap {
        survivors = resolve_overlaps(survivors, config.overlap_tolerance, &mut stats);
    }

    sort_by_confidence_and_preference(&mut survivors);

    if survivors.len() > MAX_REGIONS {
        debug!(
            dropped = survivors.len() - MAX_REGIONS,
            "candidate list capped"
        );
        survivors.truncate(MAX_REGIONS);
    }

    (survivors, stats)
}

/// Confidence descending, with near-ties broken by source preference
///
/// The band rule is not a total order (within-band pairs chain across band
/// edges), so it cannot feed `sort_by` directly. Instead: one total stable
/// sort by confidence, then an insertion pass that hoists a preferred source
/// leftward while it stays within the band of its neighbor.
fn sort_by_confidence_and_preference(candidates: &mut [CandidateRegion]) {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    for i in 1..candidates.len() {
        let mut j = i;
        while j > 0
            && (candidates[j - 1].confidence - candidates[j].confidence).abs() < TIE_BAND
            && candidates[j].source.preference_rank()
                < candidates[j - 1].source.preference_rank()
        {
            candidates.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Drop any candidate overlapping an earlier-kept one by more than 70% of the
/// smaller region's area; first-inserted wins regardless of confidence
fn dedup_near_identical(candidates: Vec<CandidateRegion>) -> Vec<CandidateRegion> {
    let mut kept: Vec<CandidateRegion> = Vec::with_capacity(candidates.len());

    'outer: for candidate in candidates {
        for existing in &kept {
            let overlap = candidate.rect.intersection_area(&existing.rect);
            let smaller = candidate.rect.area().min(existing.rect.area());
            if smaller > 0.0 && overlap > smaller * DUPLICATE_OVERLAP_RATIO {
                continue 'outer;
            }
        }
        kept.push(candidate);
    }

    kept
}

/// Greedy overlap resolution: highest confidence first, accept only if the
/// shared area with every accepted region stays within tolerance
fn resolve_overlaps(
    mut candidates: Vec<CandidateRegion>,
    tolerance: f32,
    stats: &mut ResolveStats,
) -> Vec<CandidateRegion> {
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut accepted: Vec<CandidateRegion> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let fits = accepted
            .iter()
            .all(|a| candidate.rect.intersection_area(&a.rect) <= tolerance);
        if fits {
            accepted.push(candidate);
        } else {
            stats.overlaps_prevented += 1;
        }
    }

    accepted
}
