//! Per-type tuning variants applied on top of a base configuration

use serde::{Deserialize, Serialize};

use crate::config::RegionTypeMap;
use crate::models::RegionType;

/// Named transform over the per-type tuning table
///
/// Each variant rewrites a copy of the base table; the base is never
/// touched. Adjustments to optional fields only apply where the base
/// already sets them, while the table-rewriting variants (`Optimal`,
/// `Adaptive`, `LooseMargins`) assign values outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionVariant {
    /// Base table unchanged
    Default,
    /// Higher confidence floors, tighter expansions, anchor to templates
    Precision,
    /// Lower floors and wider expansions to find more regions
    Loose,
    /// Strong template adherence with minimal expansion
    Strict,
    /// Large boundary expansions
    Expanded,
    /// Small, careful adjustments
    Conservative,
    /// Loosen the margin types only
    LooseMargins,
    /// Balanced hand-tuned floors per type family
    Optimal,
    /// Different settings per region type family
    Adaptive,
    /// Minimal boundary expansion
    Tight,
}

impl RegionVariant {
    /// Variant set exercised by the normal sweep
    pub const NORMAL: [RegionVariant; 6] = [
        RegionVariant::Default,
        RegionVariant::Precision,
        RegionVariant::Loose,
        RegionVariant::Strict,
        RegionVariant::Expanded,
        RegionVariant::Conservative,
    ];

    /// Variant set exercised by the thorough sweep
    pub const THOROUGH: [RegionVariant; 8] = [
        RegionVariant::Default,
        RegionVariant::Precision,
        RegionVariant::Loose,
        RegionVariant::Strict,
        RegionVariant::Expanded,
        RegionVariant::Conservative,
        RegionVariant::Adaptive,
        RegionVariant::Tight,
    ];

    /// Short name used in generated configuration names
    pub fn name(self) -> &'static str {
        match self {
            RegionVariant::Default => "default",
            RegionVariant::Precision => "precision",
            RegionVariant::Loose => "loose",
            RegionVariant::Strict => "strict",
            RegionVariant::Expanded => "expanded",
            RegionVariant::Conservative => "conservative",
            RegionVariant::LooseMargins => "loose_margins",
            RegionVariant::Optimal => "optimal",
            RegionVariant::Adaptive => "adaptive",
            RegionVariant::Tight => "tight",
        }
    }

    /// Apply this variant to a copy of the base table
    pub fn apply(self, base: &RegionTypeMap) -> RegionTypeMap {
        let mut table = base.clone();
        match self {
            RegionVariant::Default => {}
            RegionVariant::Precision => {
                for cfg in table.values_mut() {
                    if let Some(mc) = cfg.min_confidence.as_mut() {
                        *mc = (*mc + 0.3).min(0.7);
                    }
                    if let Some(be) = cfg.boundary_expansion.as_mut() {
                        *be = (*be - 3.0).max(2.0);
                    }
                    if cfg.prefer_template_position.is_some() {
                        cfg.prefer_template_position = Some(true);
                    }
                }
            }
            RegionVariant::Loose => {
                for cfg in table.values_mut() {
                    if let Some(mc) = cfg.min_confidence.as_mut() {
                        *mc = (*mc - 0.2).max(0.2);
                    }
                    if let Some(be) = cfg.boundary_expansion.as_mut() {
                        *be += 8.0;
                    }
                    if cfg.allow_height_adjustment.is_some() {
                        cfg.allow_height_adjustment = Some(true);
                    }
                }
            }
            RegionVariant::Strict => {
                for cfg in table.values_mut() {
                    if let Some(mc) = cfg.min_confidence.as_mut() {
                        *mc = (*mc + 0.4).min(0.8);
                    }
                    if let Some(be) = cfg.boundary_expansion.as_mut() {
                        *be = (*be - 5.0).max(1.0);
                    }
                    if cfg.prefer_template_position.is_some() {
                        cfg.prefer_template_position = Some(true);
                    }
                    if cfg.allow_height_adjustment.is_some() {
                        cfg.allow_height_adjustment = Some(false);
                    }
                }
            }
            RegionVariant::Expanded => {
                for cfg in table.values_mut() {
                    if let Some(be) = cfg.boundary_expansion.as_mut() {
                        *be += 15.0;
                    }
                    if let Some(mc) = cfg.min_confidence.as_mut() {
                        *mc = (*mc - 0.15).max(0.25);
                    }
                }
            }
            RegionVariant::Conservative => {
                for cfg in table.values_mut() {
                    if let Some(be) = cfg.boundary_expansion.as_mut() {
                        *be = (*be - 2.0).max(2.0);
                    }
                    if let Some(mc) = cfg.min_confidence.as_mut() {
                        *mc = (*mc + 0.1).min(0.6);
                    }
                }
            }
            RegionVariant::LooseMargins => {
                for kind in [RegionType::LEFT_MARGIN, RegionType::RIGHT_MARGIN] {
                    if let Some(cfg) = table.get_mut(&RegionType::new(kind)) {
                        cfg.min_confidence = Some(0.2);
                        cfg.boundary_expansion = Some(15.0);
                        cfg.max_width_ratio = Some(0.25);
                    }
                }
            }
            RegionVariant::Optimal => {
                for (kind, cfg) in table.iter_mut() {
                    let (mc, be) = if kind.is_margin() {
                        (0.35, 8.0)
                    } else if kind.is_text() {
                        (0.45, 12.0)
                    } else {
                        (0.4, 10.0)
                    };
                    cfg.min_confidence = Some(mc);
                    cfg.boundary_expansion = Some(be);
                }
            }
            RegionVariant::Adaptive => {
                for (kind, cfg) in table.iter_mut() {
                    if kind.as_str() == RegionType::HEADER || kind.as_str() == RegionType::FOOTER {
                        cfg.min_confidence = Some(0.3);
                        cfg.boundary_expansion = Some(6.0);
                    } else if kind.is_margin() {
                        cfg.min_confidence = Some(0.25);
                        cfg.boundary_expansion = Some(3.0);
                        cfg.prefer_template_position = Some(true);
                    } else if kind.is_text() {
                        cfg.min_confidence = Some(0.5);
                        cfg.boundary_expansion = Some(15.0);
                        cfg.allow_height_adjustment = Some(true);
                    }
                }
            }
            RegionVariant::Tight => {
                for cfg in table.values_mut() {
                    if let Some(be) = cfg.boundary_expansion.as_mut() {
                        *be = (*be - 8.0).max(0.0);
                    }
                    if let Some(mc) = cfg.min_confidence.as_mut() {
                        *mc = (*mc + 0.2).min(0.7);
                    }
                }
            }
        }
        table
    }
}

/// Margin-tuning table: fix the margin expansion and pick a floor to match
///
/// No expansion demands high confidence, a large expansion tolerates less.
pub fn margin_focused_table(base: &RegionTypeMap, expansion: f32) -> RegionTypeMap {
    let mut table = base.clone();
    for kind in [RegionType::LEFT_MARGIN, RegionType::RIGHT_MARGIN] {
        if let Some(cfg) = table.get_mut(&RegionType::new(kind)) {
            cfg.boundary_expansion = Some(expansion);
            cfg.min_confidence = Some(if expansion == 0.0 {
                0.6
            } else if expansion > 10.0 {
                0.3
            } else {
                0.4
            });
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_region_types;

    fn get<'a>(table: &'a RegionTypeMap, kind: &str) -> &'a crate::config::RegionTypeConfig {
        table.get(&RegionType::new(kind)).unwrap()
    }

    #[test]
    fn test_default_leaves_table_untouched() {
        let base = default_region_types();
        assert_eq!(RegionVariant::Default.apply(&base), base);
    }

    #[test]
    fn test_precision_clamps_and_anchors() {
        let table = RegionVariant::Precision.apply(&default_region_types());
        // header: 0.3 + 0.3 = 0.6, expansion 8 - 3 = 5
        let header = get(&table, RegionType::HEADER);
        assert_eq!(header.min_confidence, Some(0.6));
        assert_eq!(header.boundary_expansion, Some(5.0));
        // margin expansion 5 - 3 = 2 hits the floor exactly
        let margin = get(&table, RegionType::LEFT_MARGIN);
        assert_eq!(margin.boundary_expansion, Some(2.0));
        assert_eq!(margin.prefer_template_position, Some(true));
        // text types have no preference flag in the base so none appears
        let text = get(&table, RegionType::LEFT_TEXT);
        assert_eq!(text.prefer_template_position, None);
    }

    #[test]
    fn test_loose_widens_and_allows_adjustment() {
        let table = RegionVariant::Loose.apply(&default_region_types());
        let text = get(&table, RegionType::LEFT_TEXT);
        assert_eq!(text.min_confidence, Some(0.2));
        assert_eq!(text.boundary_expansion, Some(18.0));
        assert_eq!(text.allow_height_adjustment, Some(true));
        // margins have no height-adjustment flag to flip
        let margin = get(&table, RegionType::LEFT_MARGIN);
        assert_eq!(margin.allow_height_adjustment, None);
    }

    #[test]
    fn test_loose_margins_touches_only_margins() {
        let base = default_region_types();
        let table = RegionVariant::LooseMargins.apply(&base);
        let margin = get(&table, RegionType::RIGHT_MARGIN);
        assert_eq!(margin.min_confidence, Some(0.2));
        assert_eq!(margin.boundary_expansion, Some(15.0));
        assert_eq!(margin.max_width_ratio, Some(0.25));
        assert_eq!(
            table.get(&RegionType::new(RegionType::HEADER)),
            base.get(&RegionType::new(RegionType::HEADER))
        );
    }

    #[test]
    fn test_adaptive_splits_by_family() {
        let table = RegionVariant::Adaptive.apply(&default_region_types());
        assert_eq!(get(&table, RegionType::HEADER).boundary_expansion, Some(6.0));
        assert_eq!(get(&table, RegionType::LEFT_MARGIN).boundary_expansion, Some(3.0));
        assert_eq!(get(&table, RegionType::RIGHT_TEXT).boundary_expansion, Some(15.0));
        assert_eq!(get(&table, RegionType::RIGHT_TEXT).min_confidence, Some(0.5));
    }

    #[test]
    fn test_tight_floors_at_zero() {
        let table = RegionVariant::Tight.apply(&default_region_types());
        // margin expansion 5 - 8 floors at 0
        assert_eq!(get(&table, RegionType::LEFT_MARGIN).boundary_expansion, Some(0.0));
        assert_eq!(get(&table, RegionType::LEFT_MARGIN).min_confidence, Some(0.5));
    }

    #[test]
    fn test_margin_focused_confidence_tiers() {
        let base = default_region_types();
        let none = margin_focused_table(&base, 0.0);
        assert_eq!(get(&none, RegionType::LEFT_MARGIN).min_confidence, Some(0.6));
        let moderate = margin_focused_table(&base, 8.0);
        assert_eq!(get(&moderate, RegionType::LEFT_MARGIN).min_confidence, Some(0.4));
        let large = margin_focused_table(&base, 12.0);
        assert_eq!(get(&large, RegionType::LEFT_MARGIN).min_confidence, Some(0.3));
        assert_eq!(get(&large, RegionType::LEFT_MARGIN).boundary_expansion, Some(12.0));
    }
}
