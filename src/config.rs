//! Detection configuration
//!
//! One immutable [`DetectionConfig`] value is passed into every pipeline and
//! sweep call; there is no implicit "current" configuration anywhere in the
//! crate. External layers serialize configurations as plain JSON and the
//! shapes here accept that JSON verbatim, defaulting every missing field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DetectionError;
use crate::models::RegionType;

/// Fallback boundary expansion when a type has no override, in pixels
pub const DEFAULT_BOUNDARY_EXPANSION: f32 = 50.0;
/// Fallback refined-region minimum width, in pixels
pub const DEFAULT_MIN_WIDTH: f32 = 20.0;
/// Fallback refined-region minimum height, in pixels
pub const DEFAULT_MIN_HEIGHT: f32 = 10.0;

/// Per-region-type tuning
///
/// `None` means "not set for this type"; several variant transforms and the
/// refiner key on whether a field is present, mirroring the optional fields of
/// the external JSON shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegionTypeConfig {
    /// Confidence floor for this type; falls back to the global threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f32>,
    /// How far past the template to look for text and pad results, px
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary_expansion: Option<f32>,
    /// Maximum width as a fraction of page width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width_ratio: Option<f32>,
    /// Minimum width as a fraction of page width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width_ratio: Option<f32>,
    /// Maximum height as a fraction of page height
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height_ratio: Option<f32>,
    /// Minimum height as a fraction of page height
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height_ratio: Option<f32>,
    /// Stay anchored to the template rectangle, only growing outward
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefer_template_position: Option<bool>,
    /// Allow the refiner to move the vertical bounds freely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_height_adjustment: Option<bool>,
    /// Ink density below which confidence collapses to the floor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_text_density: Option<f32>,
    /// Minimum refined width in pixels (default 20)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f32>,
    /// Minimum refined height in pixels (default 10)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f32>,
}

/// Map from region type to its tuning
pub type RegionTypeMap = BTreeMap<RegionType, RegionTypeConfig>;

/// Full detection configuration: global knobs plus the per-type map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectionConfig {
    /// Binarization threshold; a pixel is ink when its luminance is below this
    pub threshold: u8,
    /// Minimum ink pixels for a connected component to count as text
    pub min_region_size: usize,
    /// Global confidence floor, used when a type has no override
    pub confidence_threshold: f32,
    /// Use supplied template rectangles to guide refinement
    pub use_template_guidance: bool,
    /// Greedily reject candidates that overlap accepted ones
    pub prevent_overlap: bool,
    /// Maximum shared area two accepted regions may have, px^2
    pub overlap_tolerance: f32,
    /// 0 = pure text-based detection, 1 = strict template adherence
    pub template_adherence: f32,
    /// Flood-fill seed sampling stride in pixels; 1 scans every pixel
    pub seed_stride: usize,
    /// Center distance below which blobs join a group, px
    pub grouping_distance: f32,
    /// Per-type tuning
    #[serde(rename = "regionTypeConfig", alias = "regionTypes")]
    pub region_types: RegionTypeMap,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold: 128,
            min_region_size: 200,
            confidence_threshold: 0.5,
            use_template_guidance: true,
            prevent_overlap: true,
            overlap_tolerance: 5.0,
            template_adherence: 0.7,
            seed_stride: 5,
            grouping_distance: 80.0,
            region_types: default_region_types(),
        }
    }
}

impl DetectionConfig {
    /// Look up the tuning for a type, empty config when the type is unknown
    pub fn type_config(&self, kind: &RegionType) -> RegionTypeConfig {
        self.region_types.get(kind).cloned().unwrap_or_default()
    }

    /// Confidence floor for a type, falling back to the global threshold
    pub fn min_confidence_for(&self, kind: &RegionType) -> f32 {
        self.region_types
            .get(kind)
            .and_then(|c| c.min_confidence)
            .unwrap_or(self.confidence_threshold)
    }

    /// Check that every fractional knob is within its documented range
    pub fn validate(&self) -> Result<(), DetectionError> {
        fn unit_range(name: &str, value: f32) -> Result<(), DetectionError> {
            if !(0.0..=1.0).contains(&value) {
                return Err(DetectionError::InvalidConfig {
                    message: format!("{name} must be within 0..=1, got {value}"),
                });
            }
            Ok(())
        }

        unit_range("confidenceThreshold", self.confidence_threshold)?;
        unit_range("templateAdherence", self.template_adherence)?;
        if self.overlap_tolerance < 0.0 {
            return Err(DetectionError::InvalidConfig {
                message: format!(
                    "overlapTolerance must be non-negative, got {}",
                    self.overlap_tolerance
                ),
            });
        }
        if self.seed_stride == 0 {
            return Err(DetectionError::InvalidConfig {
                message: "seedStride must be at least 1".to_string(),
            });
        }
        for (kind, cfg) in &self.region_types {
            if let Some(mc) = cfg.min_confidence {
                unit_range(&format!("regionTypeConfig.{kind}.minConfidence"), mc)?;
            }
        }
        Ok(())
    }

    /// Parse a configuration from the external layer's JSON, defaulting
    /// every missing field
    pub fn from_json(json: &str) -> Result<Self, DetectionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize for the external layer
    pub fn to_json(&self) -> Result<String, DetectionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The standard six-type tuning table
pub fn default_region_types() -> RegionTypeMap {
    let mut map = RegionTypeMap::new();
    map.insert(
        RegionType::new(RegionType::LEFT_MARGIN),
        RegionTypeConfig {
            min_confidence: Some(0.3),
            boundary_expansion: Some(5.0),
            max_width_ratio: Some(0.15),
            prefer_template_position: Some(true),
            ..Default::default()
        },
    );
    map.insert(
        RegionType::new(RegionType::RIGHT_MARGIN),
        RegionTypeConfig {
            min_confidence: Some(0.3),
            boundary_expansion: Some(5.0),
            max_width_ratio: Some(0.15),
            prefer_template_position: Some(true),
            ..Default::default()
        },
    );
    map.insert(
        RegionType::new(RegionType::LEFT_TEXT),
        RegionTypeConfig {
            min_confidence: Some(0.4),
            boundary_expansion: Some(10.0),
            min_width_ratio: Some(0.25),
            allow_height_adjustment: Some(true),
            ..Default::default()
        },
    );
    map.insert(
        RegionType::new(RegionType::RIGHT_TEXT),
        RegionTypeConfig {
            min_confidence: Some(0.4),
            boundary_expansion: Some(10.0),
            min_width_ratio: Some(0.25),
            allow_height_adjustment: Some(true),
            ..Default::default()
        },
    );
    map.insert(
        RegionType::new(RegionType::HEADER),
        RegionTypeConfig {
            min_confidence: Some(0.3),
            boundary_expansion: Some(8.0),
            max_height_ratio: Some(0.1),
            require_text_density: Some(0.05),
            ..Default::default()
        },
    );
    map.insert(
        RegionType::new(RegionType::FOOTER),
        RegionTypeConfig {
            min_confidence: Some(0.3),
            boundary_expansion: Some(8.0),
            max_height_ratio: Some(0.1),
            require_text_density: Some(0.05),
            ..Default::default()
        },
    );
    map
}
