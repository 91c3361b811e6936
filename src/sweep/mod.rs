//! Configuration sweep: run many detection configurations against one page
//! and rank them by how closely each result matches a hand-drawn ideal set
//!
//! The page is converted to grayscale once; every configuration reuses that
//! buffer. A failing configuration is logged and counted, never fatal, and a
//! shared [`CancelToken`] lets callers stop a long sweep between runs.

pub mod score;
pub mod variants;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::DetectionConfig;
use crate::detector::{self, DetectionMetadata};
use crate::error::DetectionError;
use crate::models::{CandidateRegion, RasterImage, TemplateRegion};

pub use score::{SimilarityScore, score_detection};
pub use variants::{RegionVariant, margin_focused_table};

/// How many configurations a sweep generates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepMode {
    /// Ten hand-picked configurations
    Quick,
    /// Systematic grid over five global combinations
    Normal,
    /// Full grid plus region-size and margin-expansion series
    Thorough,
}

impl SweepMode {
    fn label(self) -> &'static str {
        match self {
            SweepMode::Quick => "quick",
            SweepMode::Normal => "normal",
            SweepMode::Thorough => "thorough",
        }
    }
}

/// One named configuration to evaluate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepConfig {
    /// Generated name encoding the knob values
    pub name: String,
    /// Which series produced it
    pub category: String,
    /// The configuration itself
    pub config: DetectionConfig,
}

/// Outcome of one successful configuration run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepResult {
    /// Configuration name
    pub name: String,
    /// Configuration series
    pub category: String,
    /// Similarity against the ideal regions
    pub score: SimilarityScore,
    /// The regions this configuration produced
    pub regions: Vec<CandidateRegion>,
    /// Pipeline counters for this run
    pub metadata: DetectionMetadata,
    /// The configuration that produced this result
    pub config: DetectionConfig,
}

/// Ranked sweep outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    /// Successful runs, best score first
    pub results: Vec<SweepResult>,
    /// Configurations attempted before cancellation
    pub evaluated: usize,
    /// Configurations that returned an error
    pub failed: usize,
    /// True when the token was tripped before all configurations ran
    pub cancelled: bool,
}

impl SweepReport {
    /// Best-scoring result, if any run succeeded
    pub fn best(&self) -> Option<&SweepResult> {
        self.results.first()
    }
}

/// Cooperative cancellation flag shared between a sweep and its caller
///
/// Checked between configuration runs; a run already in flight finishes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, untripped token
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the token; every clone observes it
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether the token has been tripped
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

fn derive_config(
    base: &DetectionConfig,
    threshold: u8,
    min_region_size: usize,
    confidence: f32,
    adherence: f32,
    prevent_overlap: bool,
    variant: RegionVariant,
) -> DetectionConfig {
    let mut config = base.clone();
    config.threshold = threshold;
    config.min_region_size = min_region_size;
    config.confidence_threshold = confidence;
    config.template_adherence = adherence;
    config.prevent_overlap = prevent_overlap;
    config.overlap_tolerance = if prevent_overlap { 5.0 } else { 0.0 };
    config.region_types = variant.apply(&base.region_types);
    config
}

/// Build the configuration list for a mode, layered over a base configuration
pub fn generate_configurations(mode: SweepMode, base: &DetectionConfig) -> Vec<SweepConfig> {
    let mut configs = Vec::new();

    match mode {
        SweepMode::Quick => {
            let quick: [(&str, u8, f32, f32, bool, RegionVariant); 10] = [
                ("Balanced_Default", 128, 0.7, 0.4, true, RegionVariant::Default),
                ("HighPrecision_Template", 120, 0.8, 0.5, true, RegionVariant::Precision),
                ("TextFocused_Loose", 140, 0.5, 0.3, true, RegionVariant::Loose),
                ("StrictTemplate_TightRegions", 110, 0.9, 0.6, true, RegionVariant::Strict),
                ("LooseDetection_BigMargins", 150, 0.4, 0.4, false, RegionVariant::Expanded),
                ("Conservative_SmallExpansion", 128, 0.6, 0.5, true, RegionVariant::Conservative),
                ("HighRecall_LooseMargins", 135, 0.7, 0.35, true, RegionVariant::LooseMargins),
                ("FineTuned_OptimalExpansion", 115, 0.75, 0.45, true, RegionVariant::Optimal),
                ("NoOverlap_TightBounds", 128, 0.5, 0.4, false, RegionVariant::Tight),
                ("OptimalMix_AdaptiveRegions", 125, 0.65, 0.4, true, RegionVariant::Adaptive),
            ];
            for (name, threshold, adherence, confidence, overlap, variant) in quick {
                configs.push(SweepConfig {
                    name: name.to_string(),
                    category: "quick".to_string(),
                    config: derive_config(base, threshold, 200, confidence, adherence, overlap, variant),
                });
            }
        }
        SweepMode::Normal => {
            let global_combos: [(u8, f32, f32); 5] = [
                (100, 0.4, 0.3),
                (115, 0.6, 0.4),
                (128, 0.7, 0.4),
                (140, 0.6, 0.5),
                (160, 0.8, 0.5),
            ];
            for (threshold, adherence, confidence) in global_combos {
                for variant in RegionVariant::NORMAL {
                    for prevent_overlap in [true, false] {
                        configs.push(SweepConfig {
                            name: format!(
                                "T{threshold}_A{adherence}_C{confidence}_{}_O{}",
                                variant.name(),
                                if prevent_overlap { "Y" } else { "N" },
                            ),
                            category: "normal".to_string(),
                            config: derive_config(
                                base,
                                threshold,
                                200,
                                confidence,
                                adherence,
                                prevent_overlap,
                                variant,
                            ),
                        });
                    }
                }
            }
        }
        SweepMode::Thorough => {
            let thresholds: [u8; 7] = [90, 100, 115, 128, 140, 160, 180];
            let adherence_values = [0.3f32, 0.5, 0.7, 0.9];
            let confidence_values = [0.3f32, 0.4, 0.5, 0.6];

            for threshold in thresholds {
                for adherence in adherence_values {
                    for confidence in confidence_values {
                        for variant in RegionVariant::THOROUGH {
                            configs.push(SweepConfig {
                                name: format!(
                                    "Thorough_T{threshold}_A{adherence}_C{confidence}_{}",
                                    variant.name(),
                                ),
                                category: "thorough".to_string(),
                                config: derive_config(
                                    base, threshold, 200, confidence, adherence, true, variant,
                                ),
                            });
                        }
                    }
                }
            }

            // Component-size series at otherwise middle-of-the-road settings
            for size in [150usize, 200, 250, 300] {
                for variant in RegionVariant::THOROUGH {
                    configs.push(SweepConfig {
                        name: format!("RegionSize_{size}_{}", variant.name()),
                        category: "region_focus".to_string(),
                        config: derive_config(base, 128, size, 0.4, 0.6, true, variant),
                    });
                }
            }

            // Margin-expansion series
            for expansion in [0.0f32, 3.0, 5.0, 8.0, 12.0, 20.0] {
                let mut config = derive_config(base, 128, 200, 0.4, 0.7, true, RegionVariant::Default);
                config.region_types = margin_focused_table(&base.region_types, expansion);
                configs.push(SweepConfig {
                    name: format!("MarginExpansion_{expansion}"),
                    category: "margin_tuning".to_string(),
                    config,
                });
            }
        }
    }

    debug!(
        mode = mode.label(),
        count = configs.len(),
        "generated sweep configurations"
    );
    configs
}

/// Run a sweep: every generated configuration against one page, ranked by
/// similarity to the ideal regions
///
/// The ideal regions double as the template set, so every configuration
/// exercises the template-guided path and the adherence dimension of the
/// generated grids actually varies behavior. The grayscale conversion
/// happens once up front, so only that step can fail the whole sweep.
/// Individual configurations that error are logged, counted in `failed`,
/// and skipped.
pub fn run_sweep(
    image: &RasterImage,
    ideal: &[TemplateRegion],
    mode: SweepMode,
    base: &DetectionConfig,
    cancel: &CancelToken,
) -> Result<SweepReport, DetectionError> {
    let started = Instant::now();
    let configs = generate_configurations(mode, base);
    let total = configs.len();
    let gray = detector::classify::to_grayscale(image)?;

    let mut results = Vec::with_capacity(total);
    let mut evaluated = 0usize;
    let mut failed = 0usize;
    let mut cancelled = false;

    for sweep_config in configs {
        if cancel.is_cancelled() {
            cancelled = true;
            info!(evaluated, total, "sweep cancelled");
            break;
        }
        evaluated += 1;

        match detector::detect_on_grayscale(
            &gray,
            image.width,
            image.height,
            ideal,
            &sweep_config.config,
        ) {
            Ok(report) => {
                let score = score_detection(ideal, &report.regions);
                results.push(SweepResult {
                    name: sweep_config.name,
                    category: sweep_config.category,
                    score,
                    regions: report.regions,
                    metadata: report.metadata,
                    config: sweep_config.config,
                });
            }
            Err(error) => {
                failed += 1;
                warn!(name = %sweep_config.name, %error, "sweep configuration failed");
            }
        }
    }

    // Stable, so equal scores keep generation order
    results.sort_by(|a, b| {
        b.score
            .overall
            .partial_cmp(&a.score.overall)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    info!(
        mode = mode.label(),
        evaluated,
        failed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "sweep complete"
    );

    Ok(SweepReport {
        results,
        evaluated,
        failed,
        cancelled,
    })
}
