//! # Input Normalization
//!
//! Sanitizes externally supplied element records - manual form entry or the
//! AI drawing reader - before they enter the data model. Every correction is
//! a deterministic, reproducible transform of the input: no randomness, no
//! external calls, and nothing is silently dropped. Running [`normalize`] on
//! an already-normalized element is a no-op.
//!
//! ## Unit Heuristics
//!
//! Extracted rows regularly land in the wrong unit column. The magnitude
//! thresholds are inherently heuristic, so they live in named, unit-tested
//! functions that can be bypassed by anyone who disagrees with them:
//!
//! - a meters field above 4 was almost certainly centimeters (no 20 m wide
//!   column exists), so it is divided by 100;
//! - a centimeters field strictly between 0 and 1 was almost certainly
//!   meters (no 0.15 cm stirrup exists), so it is multiplied by 100.

use serde::{Deserialize, Serialize};

use crate::element::{
    BarGroup, BarShape, ElementKind, HookDirection, Placement, SteelItem, StirrupConfig, Support,
    UsageRole, DEFAULT_SPACING_CM,
};
use crate::gauges::BarGauge;
use crate::geometry::SectionModel;
use crate::reconcile::reconcile_extent;
use crate::takeoff::CAGE_COVER_CM;

/// Meters-field values above this are treated as mistaken centimeters
pub const METERS_AS_CM_THRESHOLD: f64 = 4.0;

/// Centimeters-field values below this (and above zero) are treated as
/// mistaken meters
pub const CM_AS_METERS_THRESHOLD: f64 = 1.0;

/// Margin added over the longest bar when raising a too-short nominal
/// length (cm)
pub const LENGTH_FLOOR_MARGIN_CM: f64 = 5.0;

/// Fallback stirrup dimension when nothing usable is supplied (cm)
const FALLBACK_STIRRUP_DIM_CM: f64 = 10.0;

/// A meters field carrying a suspiciously large value: `20` in a width
/// column is 20 cm, not a 20 m wide column.
pub fn meters_field_mistaken_as_cm(value: f64) -> bool {
    value > METERS_AS_CM_THRESHOLD
}

/// A centimeters field carrying a sub-unit value: `0.15` in a stirrup width
/// column is 0.15 m, not a 1.5 mm stirrup.
pub fn cm_field_mistaken_as_m(value: f64) -> bool {
    value > 0.0 && value < CM_AS_METERS_THRESHOLD
}

fn correct_meters_field(value: f64) -> f64 {
    if meters_field_mistaken_as_cm(value) {
        value / 100.0
    } else {
        value
    }
}

fn correct_cm_field(value: f64) -> f64 {
    if cm_field_mistaken_as_m(value) {
        value * 100.0
    } else {
        value
    }
}

// ============================================================================
// Raw record shapes
// ============================================================================

/// An element record as it arrives from the outside: every field optional,
/// nothing trusted yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSteelItem {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub kind: Option<ElementKind>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub length_m: Option<f64>,
    #[serde(default)]
    pub width_m: Option<f64>,
    #[serde(default)]
    pub height_m: Option<f64>,
    #[serde(default)]
    pub bars: Vec<RawBarGroup>,
    #[serde(default)]
    pub stirrups: Option<RawStirrupConfig>,
    #[serde(default)]
    pub supports: Vec<Support>,
    #[serde(default)]
    pub start_gap_cm: Option<f64>,
    #[serde(default)]
    pub end_gap_cm: Option<f64>,
}

/// A raw bar group row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBarGroup {
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub gauge: Option<BarGauge>,
    #[serde(default)]
    pub usage: Option<UsageRole>,
    #[serde(default)]
    pub placement: Option<Placement>,
    #[serde(default)]
    pub shape: Option<BarShape>,
    #[serde(default)]
    pub segment_a_cm: Option<f64>,
    #[serde(default)]
    pub segment_b_cm: Option<f64>,
    #[serde(default)]
    pub segment_c_cm: Option<f64>,
    #[serde(default)]
    pub segment_d_cm: Option<f64>,
    #[serde(default)]
    pub segment_e_cm: Option<f64>,
    #[serde(default)]
    pub offset_cm: Option<f64>,
    #[serde(default)]
    pub hook_start_cm: Option<f64>,
    #[serde(default)]
    pub hook_end_cm: Option<f64>,
}

/// A raw stirrup configuration row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStirrupConfig {
    #[serde(default)]
    pub gauge: Option<BarGauge>,
    #[serde(default)]
    pub spacing_cm: Option<f64>,
    #[serde(default)]
    pub model: Option<SectionModel>,
    #[serde(default)]
    pub width_cm: Option<f64>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub explicit_count: Option<u32>,
    #[serde(default)]
    pub position: Option<String>,
}

impl From<SteelItem> for RawSteelItem {
    fn from(item: SteelItem) -> Self {
        RawSteelItem {
            label: Some(item.label),
            kind: Some(item.kind),
            quantity: Some(item.quantity),
            length_m: Some(item.length_m),
            width_m: item.width_m,
            height_m: item.height_m,
            bars: item.bars.into_iter().map(RawBarGroup::from).collect(),
            stirrups: Some(RawStirrupConfig::from(item.stirrups)),
            supports: item.supports,
            start_gap_cm: Some(item.start_gap_cm),
            end_gap_cm: Some(item.end_gap_cm),
        }
    }
}

impl From<BarGroup> for RawBarGroup {
    fn from(bar: BarGroup) -> Self {
        RawBarGroup {
            count: Some(bar.count),
            gauge: Some(bar.gauge),
            usage: Some(bar.usage),
            placement: Some(bar.placement),
            shape: Some(bar.shape),
            segment_a_cm: Some(bar.segment_a_cm),
            segment_b_cm: Some(bar.segment_b_cm),
            segment_c_cm: Some(bar.segment_c_cm),
            segment_d_cm: Some(bar.segment_d_cm),
            segment_e_cm: Some(bar.segment_e_cm),
            offset_cm: Some(bar.offset_cm),
            hook_start_cm: Some(bar.hook_start_cm),
            hook_end_cm: Some(bar.hook_end_cm),
        }
    }
}

impl From<StirrupConfig> for RawStirrupConfig {
    fn from(cfg: StirrupConfig) -> Self {
        RawStirrupConfig {
            gauge: Some(cfg.gauge),
            spacing_cm: Some(cfg.spacing_cm),
            model: Some(cfg.model),
            width_cm: Some(cfg.width_cm),
            height_cm: Some(cfg.height_cm),
            explicit_count: cfg.explicit_count,
            position: Some(cfg.position),
        }
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Normalize a raw record into a canonical element.
///
/// Never fails: every malformed value is coerced to its nearest valid
/// interpretation. Idempotent: normalizing an already-normalized element
/// returns it unchanged.
pub fn normalize(raw: RawSteelItem) -> SteelItem {
    let width_m = raw
        .width_m
        .map(correct_meters_field)
        .filter(|v| *v > 0.0);
    let height_m = raw
        .height_m
        .map(correct_meters_field)
        .filter(|v| *v > 0.0);

    let stirrups = normalize_stirrups(raw.stirrups.unwrap_or_default(), width_m, height_m);
    let bars: Vec<BarGroup> = raw.bars.into_iter().map(normalize_bar).collect();

    let mut length_m = raw.length_m.unwrap_or(0.0).max(0.0);
    let length_cm = length_m * 100.0;

    // Explicit count + spacing with no declared gaps: the uncovered
    // remainder splits evenly into start and end gaps.
    let (start_gap_cm, end_gap_cm) = match (raw.start_gap_cm, raw.end_gap_cm) {
        (None, None) => infer_gaps(&stirrups, length_cm),
        (start, end) => (start.unwrap_or(0.0).max(0.0), end.unwrap_or(0.0).max(0.0)),
    };

    // Length floor: a bar longer than the declared element raises the
    // nominal length, with a small margin.
    let longest_base_cm = bars
        .iter()
        .map(|b| b.segment_a_cm)
        .fold(0.0, f64::max);
    if longest_base_cm > length_m * 100.0 {
        length_m = (longest_base_cm + LENGTH_FLOOR_MARGIN_CM) / 100.0;
    }

    let mut item = SteelItem {
        label: raw.label.unwrap_or_default(),
        kind: raw.kind.unwrap_or_default(),
        quantity: raw.quantity.unwrap_or(1).max(1),
        length_m,
        width_m,
        height_m,
        bars,
        stirrups,
        supports: raw.supports,
        start_gap_cm,
        end_gap_cm,
    };

    // Same invariant the mutation path keeps eagerly: offsets count too.
    reconcile_extent(&mut item);
    item
}

fn normalize_stirrups(
    raw: RawStirrupConfig,
    width_m: Option<f64>,
    height_m: Option<f64>,
) -> StirrupConfig {
    let spacing_cm = match raw.spacing_cm {
        Some(v) => correct_cm_field(v),
        None => DEFAULT_SPACING_CM,
    };
    let width_cm = normalize_stirrup_dim(raw.width_cm, width_m);
    let height_cm = normalize_stirrup_dim(raw.height_cm, height_m);

    StirrupConfig {
        gauge: raw.gauge.unwrap_or(BarGauge::Phi5_0),
        spacing_cm,
        model: raw.model.unwrap_or_default(),
        width_cm,
        height_cm,
        explicit_count: raw.explicit_count,
        position: raw.position.unwrap_or_default(),
    }
}

/// Stirrup dimensions must come out positive: correct the unit first, then
/// fall back to the element's cross dimension minus cover on both faces.
fn normalize_stirrup_dim(raw_cm: Option<f64>, element_dim_m: Option<f64>) -> f64 {
    if let Some(v) = raw_cm {
        let corrected = correct_cm_field(v);
        if corrected > 0.0 {
            return corrected;
        }
    }
    match element_dim_m {
        Some(dim) if dim * 100.0 - 2.0 * CAGE_COVER_CM > 0.0 => dim * 100.0 - 2.0 * CAGE_COVER_CM,
        _ => FALLBACK_STIRRUP_DIM_CM,
    }
}

fn normalize_bar(raw: RawBarGroup) -> BarGroup {
    let placement = raw.placement.unwrap_or_default();
    let hook_start_cm = raw.hook_start_cm.unwrap_or(0.0).max(0.0);
    let hook_end_cm = raw.hook_end_cm.unwrap_or(0.0).max(0.0);
    let segment_b_cm = raw.segment_b_cm.unwrap_or(0.0).max(0.0);
    let segment_c_cm = raw.segment_c_cm.unwrap_or(0.0).max(0.0);
    let segment_d_cm = raw.segment_d_cm.unwrap_or(0.0).max(0.0);
    let segment_e_cm = raw.segment_e_cm.unwrap_or(0.0).max(0.0);

    let hooks_present = hook_start_cm > 0.0
        || hook_end_cm > 0.0
        || segment_b_cm > 0.0
        || segment_c_cm > 0.0
        || segment_d_cm > 0.0
        || segment_e_cm > 0.0;

    let shape = match raw.shape {
        Some(declared) => declared,
        None if hooks_present => infer_shape_from_placement(&placement),
        None => BarShape::Straight,
    };

    let mut bar = BarGroup {
        count: raw.count.unwrap_or(1),
        gauge: raw.gauge.unwrap_or_default(),
        usage: raw.usage.unwrap_or_default(),
        placement,
        shape,
        segment_a_cm: raw.segment_a_cm.unwrap_or(0.0).max(0.0),
        segment_b_cm,
        segment_c_cm,
        segment_d_cm,
        segment_e_cm,
        offset_cm: raw.offset_cm.unwrap_or(0.0).max(0.0),
        hook_start_cm,
        hook_end_cm,
    };

    // A declared straight bar wins over any stray hook values.
    if bar.shape.is_straight() {
        bar.segment_b_cm = 0.0;
        bar.segment_c_cm = 0.0;
        bar.segment_d_cm = 0.0;
        bar.segment_e_cm = 0.0;
        bar.hook_start_cm = 0.0;
        bar.hook_end_cm = 0.0;
    }

    bar
}

/// Top bars hook downward into the section, bottom bars hook upward.
/// Anything else gets the bottom-bar treatment.
fn infer_shape_from_placement(placement: &Placement) -> BarShape {
    if placement.is_top() {
        BarShape::U(HookDirection::Down)
    } else {
        BarShape::U(HookDirection::Up)
    }
}

fn infer_gaps(stirrups: &StirrupConfig, length_cm: f64) -> (f64, f64) {
    let Some(count) = stirrups.explicit_count else {
        return (0.0, 0.0);
    };
    if count == 0 || stirrups.spacing_cm <= 0.0 || length_cm <= 0.0 {
        return (0.0, 0.0);
    }
    let covered = (count - 1) as f64 * stirrups.spacing_cm;
    let remainder = (length_cm - covered).max(0.0);
    (remainder / 2.0, remainder / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_column(width_m: f64) -> RawSteelItem {
        RawSteelItem {
            label: Some("P1".to_string()),
            kind: Some(ElementKind::Column),
            length_m: Some(3.0),
            width_m: Some(width_m),
            ..Default::default()
        }
    }

    #[test]
    fn test_threshold_functions() {
        assert!(meters_field_mistaken_as_cm(20.0));
        assert!(!meters_field_mistaken_as_cm(0.2));
        assert!(!meters_field_mistaken_as_cm(4.0));
        assert!(cm_field_mistaken_as_m(0.15));
        assert!(!cm_field_mistaken_as_m(15.0));
        assert!(!cm_field_mistaken_as_m(0.0));
    }

    #[test]
    fn test_meters_field_correction() {
        // Width "20" on a column is 20 cm that landed in a meters field
        let item = normalize(raw_column(20.0));
        assert_eq!(item.width_m, Some(0.20));
        // A plausible 0.2 m width passes through untouched
        let item = normalize(raw_column(0.2));
        assert_eq!(item.width_m, Some(0.2));
    }

    #[test]
    fn test_cm_field_correction() {
        let mut raw = raw_column(0.2);
        raw.stirrups = Some(RawStirrupConfig {
            width_cm: Some(0.15),
            height_cm: Some(34.0),
            spacing_cm: Some(0.2),
            ..Default::default()
        });
        let item = normalize(raw);
        assert_eq!(item.stirrups.width_cm, 15.0);
        assert_eq!(item.stirrups.height_cm, 34.0);
        assert_eq!(item.stirrups.spacing_cm, 20.0);
    }

    #[test]
    fn test_missing_stirrup_dims_default_from_element() {
        let mut raw = raw_column(0.2);
        raw.height_m = Some(0.4);
        raw.stirrups = Some(RawStirrupConfig::default());
        let item = normalize(raw);
        // 20 cm - 2x5 cover = 10, 40 - 10 = 30
        assert_eq!(item.stirrups.width_cm, 10.0);
        assert_eq!(item.stirrups.height_cm, 30.0);
    }

    #[test]
    fn test_straight_shape_forces_hooks_to_zero() {
        let raw = RawSteelItem {
            length_m: Some(3.0),
            bars: vec![RawBarGroup {
                count: Some(2),
                shape: Some(BarShape::Straight),
                segment_a_cm: Some(300.0),
                segment_b_cm: Some(25.0),
                hook_start_cm: Some(15.0),
                hook_end_cm: Some(15.0),
                ..Default::default()
            }],
            ..Default::default()
        };
        let item = normalize(raw);
        let bar = &item.bars[0];
        assert_eq!(bar.segment_b_cm, 0.0);
        assert_eq!(bar.hook_start_cm, 0.0);
        assert_eq!(bar.hook_end_cm, 0.0);
        assert_eq!(bar.extra_length_cm(), 0.0);
    }

    #[test]
    fn test_shape_inferred_from_placement() {
        let top_bar = RawBarGroup {
            count: Some(2),
            placement: Some(Placement::Legacy {
                role: crate::element::PlacementRole::Top,
            }),
            hook_end_cm: Some(15.0),
            ..Default::default()
        };
        let bottom_bar = RawBarGroup {
            count: Some(2),
            placement: Some(Placement::Legacy {
                role: crate::element::PlacementRole::Bottom,
            }),
            hook_end_cm: Some(15.0),
            ..Default::default()
        };
        let raw = RawSteelItem {
            length_m: Some(3.0),
            bars: vec![top_bar, bottom_bar],
            ..Default::default()
        };
        let item = normalize(raw);
        assert_eq!(item.bars[0].shape, BarShape::U(HookDirection::Down));
        assert_eq!(item.bars[1].shape, BarShape::U(HookDirection::Up));
    }

    #[test]
    fn test_no_hooks_means_straight() {
        let raw = RawSteelItem {
            length_m: Some(3.0),
            bars: vec![RawBarGroup {
                count: Some(3),
                segment_a_cm: Some(300.0),
                ..Default::default()
            }],
            ..Default::default()
        };
        let item = normalize(raw);
        assert_eq!(item.bars[0].shape, BarShape::Straight);
    }

    #[test]
    fn test_gap_inference_from_explicit_count() {
        let raw = RawSteelItem {
            length_m: Some(3.0),
            stirrups: Some(RawStirrupConfig {
                spacing_cm: Some(20.0),
                width_cm: Some(14.0),
                height_cm: Some(34.0),
                explicit_count: Some(11),
                ..Default::default()
            }),
            ..Default::default()
        };
        let item = normalize(raw);
        // 300 - 10x20 = 100 cm uncovered, split evenly
        assert_eq!(item.start_gap_cm, 50.0);
        assert_eq!(item.end_gap_cm, 50.0);
    }

    #[test]
    fn test_explicit_gaps_block_inference() {
        let raw = RawSteelItem {
            length_m: Some(3.0),
            start_gap_cm: Some(10.0),
            end_gap_cm: Some(0.0),
            stirrups: Some(RawStirrupConfig {
                spacing_cm: Some(20.0),
                explicit_count: Some(11),
                ..Default::default()
            }),
            ..Default::default()
        };
        let item = normalize(raw);
        assert_eq!(item.start_gap_cm, 10.0);
        assert_eq!(item.end_gap_cm, 0.0);
    }

    #[test]
    fn test_length_floor() {
        let raw = RawSteelItem {
            length_m: Some(3.0),
            bars: vec![RawBarGroup {
                count: Some(2),
                segment_a_cm: Some(350.0),
                ..Default::default()
            }],
            ..Default::default()
        };
        let item = normalize(raw);
        assert!((item.length_cm() - 355.0).abs() < 1e-9);
    }

    #[test]
    fn test_offset_feeds_reconciler() {
        let raw = RawSteelItem {
            length_m: Some(3.0),
            bars: vec![RawBarGroup {
                count: Some(1),
                segment_a_cm: Some(350.0),
                offset_cm: Some(20.0),
                ..Default::default()
            }],
            ..Default::default()
        };
        let item = normalize(raw);
        // floor raises to 355, then the 370 cm extent wins
        assert!((item.length_cm() - 370.0).abs() < 1e-9);
    }

    #[test]
    fn test_idempotent() {
        let raw = RawSteelItem {
            label: Some("V-7".to_string()),
            kind: Some(ElementKind::Beam),
            quantity: Some(2),
            length_m: Some(3.0),
            width_m: Some(20.0), // mistaken cm
            bars: vec![RawBarGroup {
                count: Some(3),
                gauge: Some(BarGauge::Phi12_5),
                segment_a_cm: Some(350.0),
                hook_end_cm: Some(15.0),
                placement: Some(Placement::Legacy {
                    role: crate::element::PlacementRole::Bottom,
                }),
                ..Default::default()
            }],
            stirrups: Some(RawStirrupConfig {
                spacing_cm: Some(0.15), // mistaken m
                width_cm: Some(14.0),
                height_cm: Some(34.0),
                explicit_count: Some(12),
                ..Default::default()
            }),
            ..Default::default()
        };

        let once = normalize(raw);
        let twice = normalize(RawSteelItem::from(once.clone()));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_raw_deserializes_from_sparse_json() {
        let raw: RawSteelItem = serde_json::from_str(
            r#"{ "label": "V-1", "length_m": 4.0, "bars": [ { "count": 2, "gauge": "10.0" } ] }"#,
        )
        .unwrap();
        let item = normalize(raw);
        assert_eq!(item.quantity, 1);
        assert_eq!(item.bars.len(), 1);
        assert_eq!(item.bars[0].gauge, BarGauge::Phi10_0);
    }
}
