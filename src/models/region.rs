use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Semantic tag for a page region
///
/// The six page-layout tags below are well known; any other string is a
/// user-defined custom type and flows through the pipeline unchanged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionType(String);

impl RegionType {
    /// Left page margin
    pub const LEFT_MARGIN: &'static str = "left-margin";
    /// Right page margin
    pub const RIGHT_MARGIN: &'static str = "right-margin";
    /// Left text column
    pub const LEFT_TEXT: &'static str = "left-text";
    /// Right text column
    pub const RIGHT_TEXT: &'static str = "right-text";
    /// Page header strip
    pub const HEADER: &'static str = "header";
    /// Page footer strip
    pub const FOOTER: &'static str = "footer";

    /// Create a region type from any tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The tag as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the two margin tags
    pub fn is_margin(&self) -> bool {
        self.0.contains("margin")
    }

    /// Whether this is one of the two text-column tags
    pub fn is_text(&self) -> bool {
        self.0.contains("text")
    }

    /// The six built-in page-layout tags
    pub fn well_known() -> [RegionType; 6] {
        [
            RegionType::new(Self::LEFT_MARGIN),
            RegionType::new(Self::RIGHT_MARGIN),
            RegionType::new(Self::LEFT_TEXT),
            RegionType::new(Self::RIGHT_TEXT),
            RegionType::new(Self::HEADER),
            RegionType::new(Self::FOOTER),
        ]
    }
}

impl From<&str> for RegionType {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl std::fmt::Display for RegionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a candidate region was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionSource {
    /// Template rectangle adjusted to the text found near it
    TemplateRefined,
    /// Template rectangle grown well beyond its original bounds
    TemplateExpanded,
    /// Template rectangle kept verbatim (no text nearby)
    TemplateOnly,
    /// Built from grouped text blobs without a template
    AutoDetected,
    /// Text the template missed, recovered after refinement
    AutoDetectedAdditional,
}

impl RegionSource {
    /// Confidence multiplier applied during scoring
    pub fn confidence_multiplier(&self) -> f32 {
        match self {
            RegionSource::TemplateRefined => 1.2,
            RegionSource::TemplateExpanded => 0.8,
            RegionSource::AutoDetected => 1.0,
            RegionSource::TemplateOnly | RegionSource::AutoDetectedAdditional => 0.9,
        }
    }

    /// Tie-break rank for the final sort; lower wins
    pub fn preference_rank(&self) -> u8 {
        match self {
            RegionSource::TemplateRefined => 0,
            RegionSource::TemplateExpanded => 1,
            RegionSource::AutoDetected => 2,
            RegionSource::AutoDetectedAdditional => 3,
            RegionSource::TemplateOnly => 4,
        }
    }
}

/// User-supplied template rectangle with its semantic tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRegion {
    /// Template bounds in image coordinates
    #[serde(flatten)]
    pub rect: Rect,
    /// Semantic tag
    #[serde(rename = "type")]
    pub kind: RegionType,
}

impl TemplateRegion {
    /// Create a template region
    pub fn new(rect: Rect, kind: impl Into<RegionType>) -> Self {
        Self {
            rect,
            kind: kind.into(),
        }
    }
}

/// A scored region proposed by the detection pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRegion {
    /// Region bounds in image coordinates
    #[serde(flatten)]
    pub rect: Rect,
    /// Semantic tag
    #[serde(rename = "type")]
    pub kind: RegionType,
    /// Confidence in [0, 1]
    pub confidence: f32,
    /// How the region was produced
    pub source: RegionSource,
    /// Index of the originating template, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_index: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_type_tags() {
        let header = RegionType::new(RegionType::HEADER);
        assert_eq!(header.as_str(), "header");
        assert!(!header.is_margin());
        assert!(RegionType::new("left-margin").is_margin());
        assert!(RegionType::new("right-text").is_text());

        // Custom tags are allowed
        let custom = RegionType::new("marginalia");
        assert_eq!(custom.as_str(), "marginalia");
    }

    #[test]
    fn test_source_serde_tags() {
        let json = serde_json::to_string(&RegionSource::AutoDetectedAdditional).unwrap();
        assert_eq!(json, "\"auto_detected_additional\"");
        let back: RegionSource = serde_json::from_str("\"template_refined\"").unwrap();
        assert_eq!(back, RegionSource::TemplateRefined);
    }

    #[test]
    fn test_template_region_flat_json() {
        let json = r#"{"x":0,"y":0,"width":100,"height":50,"type":"header"}"#;
        let region: TemplateRegion = serde_json::from_str(json).unwrap();
        assert_eq!(region.rect, Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(region.kind.as_str(), "header");
    }

    #[test]
    fn test_preference_rank_order() {
        assert!(
            RegionSource::TemplateRefined.preference_rank()
                < RegionSource::TemplateExpanded.preference_rank()
        );
        assert!(
            RegionSource::AutoDetected.preference_rank()
                < RegionSource::TemplateOnly.preference_rank()
        );
    }
}
