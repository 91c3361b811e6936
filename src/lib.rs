//! pageseg - heuristic page-layout segmentation for scanned documents
//!
//! Classifies pixels into ink and background, extracts connected text
//! components, groups them into typed layout regions (margins, text columns,
//! header, footer), and optionally refines the result against user-drawn
//! template rectangles. A configuration sweep runs many tunings against one
//! page and ranks them by similarity to a hand-drawn ideal set.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Detection configuration (global knobs plus the per-type tuning table)
pub mod config;
/// Pixel classification, component extraction, grouping, refinement
pub mod detector;
/// Error types
pub mod error;
/// Core data structures (Rect, BinaryMask, regions, raster images)
pub mod models;
/// Configuration sweep and similarity scoring
pub mod sweep;

pub use config::{DetectionConfig, RegionTypeConfig, RegionTypeMap};
pub use detector::{DetectionMetadata, DetectionReport, detect_on_grayscale, detect_regions};
pub use error::DetectionError;
pub use models::{
    BinaryMask, CandidateRegion, PixelFormat, RasterImage, Rect, RegionSource, RegionType,
    TemplateRegion, TextBlob,
};
pub use sweep::{
    CancelToken, RegionVariant, SimilarityScore, SweepConfig, SweepMode, SweepReport, SweepResult,
    run_sweep, score_detection,
};

/// Segmentation front end holding a configuration and optional templates
///
/// Thin convenience over [`detect_regions`] and [`run_sweep`] for callers
/// that process many pages with the same settings.
///
/// # Example
/// ```
/// use pageseg::{DetectionConfig, Detector, RasterImage};
///
/// let detector = Detector::new(DetectionConfig::default());
/// let page = RasterImage::from_gray8(vec![255u8; 640 * 480], 640, 480);
/// let report = detector.detect(&page).unwrap();
/// assert!(report.regions.is_empty());
/// ```
pub struct Detector {
    config: DetectionConfig,
    templates: Vec<TemplateRegion>,
}

impl Detector {
    /// Create a detector with the given configuration and no templates
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            config,
            templates: Vec::new(),
        }
    }

    /// Set the template rectangles guiding refinement
    pub fn with_templates(mut self, templates: Vec<TemplateRegion>) -> Self {
        self.templates = templates;
        self
    }

    /// The active configuration
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Run the full pipeline on a raster image
    pub fn detect(&self, image: &RasterImage) -> Result<DetectionReport, DetectionError> {
        detect_regions(image, &self.templates, &self.config)
    }

    /// Run the pipeline on a pre-computed grayscale buffer
    pub fn detect_grayscale(
        &self,
        gray: &[u8],
        width: usize,
        height: usize,
    ) -> Result<DetectionReport, DetectionError> {
        self.config.validate()?;
        detect_on_grayscale(gray, width, height, &self.templates, &self.config)
    }

    /// Sweep configurations derived from this detector's settings and rank
    /// them against the ideal regions
    ///
    /// The ideal regions serve as the template set for every configuration;
    /// the detector's own templates only apply to [`Detector::detect`].
    pub fn sweep(
        &self,
        image: &RasterImage,
        ideal: &[TemplateRegion],
        mode: SweepMode,
        cancel: &CancelToken,
    ) -> Result<SweepReport, DetectionError> {
        run_sweep(image, ideal, mode, &self.config, cancel)
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(DetectionConfig::default())
    }
}
