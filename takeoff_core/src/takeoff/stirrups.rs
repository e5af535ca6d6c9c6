//! Stirrup quantification.
//!
//! Two modes, selected by the element kind:
//!
//! - **Tie mode** (beams, columns, drilled piers): closed stirrups placed
//!   along the element at a fixed spacing, skipping the start/end gaps and
//!   the exclusion zone of every support.
//! - **Cage mode** (footings): two independent bar families, one per planar
//!   direction, hooked down the footing height at both ends.
//!
//! Counts are hard-capped at [`MAX_STIRRUP_COUNT`] per element so a
//! pathological near-zero spacing can never run away.

use serde::{Deserialize, Serialize};

use crate::element::{SteelItem, DEFAULT_SPACING_CM};
use crate::gauges::BarGauge;
use crate::takeoff::TakeoffWarning;
use crate::units::Meters;

/// Hard cap on stirrup count per element
pub const MAX_STIRRUP_COUNT: u32 = 500;

/// Concrete cover deducted from the footing height for cage end hooks (cm)
pub const CAGE_COVER_CM: f64 = 5.0;

/// One direction of a footing cage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CageFamily {
    /// Bars in this direction (per element unit)
    pub count: u32,
    /// Fabricated length of one bar (cm), end hooks included
    pub cut_length_cm: f64,
}

/// Mode-specific detail of a stirrup takeoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum StirrupDetail {
    /// Transverse stirrups along the element
    Tie {
        /// Effective count (explicit override when present)
        count: u32,
        /// Count derived from spacing and gaps, kept for reporting
        computed_count: u32,
        /// Perimeter of one stirrup (cm), hook allowance included
        cut_length_cm: f64,
    },
    /// Footing cage, one family per planar direction
    Cage {
        lengthwise: CageFamily,
        widthwise: CageFamily,
    },
}

/// Stirrup quantities for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StirrupTakeoff {
    /// Stirrup gauge
    pub gauge: BarGauge,

    /// Total linear meters across all stirrups and element units
    pub linear_m: f64,

    /// Total weight (kg); zero when the gauge is unknown
    pub weight_kg: f64,

    /// Mode-specific breakdown
    pub detail: StirrupDetail,
}

/// Compute stirrup quantities for an element.
pub fn quantify_stirrups(item: &SteelItem, warnings: &mut Vec<TakeoffWarning>) -> StirrupTakeoff {
    let spacing_cm = effective_spacing(item, warnings);

    let (detail, total_cut_cm) = if item.kind.is_footing() {
        quantify_cage(item, spacing_cm, warnings)
    } else {
        quantify_ties(item, spacing_cm, warnings)
    };

    let linear_m = total_cut_cm / 100.0 * item.quantity as f64;
    let weight_kg = match item.stirrups.gauge.weight_kg_per_m() {
        Some(kg_per_m) => (Meters(linear_m) * kg_per_m).value(),
        None => {
            warnings.push(TakeoffWarning::UnknownGauge {
                gauge: item.stirrups.gauge.label().to_string(),
                context: "stirrups".to_string(),
            });
            0.0
        }
    };

    StirrupTakeoff {
        gauge: item.stirrups.gauge.clone(),
        linear_m,
        weight_kg,
        detail,
    }
}

fn effective_spacing(item: &SteelItem, warnings: &mut Vec<TakeoffWarning>) -> f64 {
    if item.stirrups.spacing_is_invalid() {
        warnings.push(TakeoffWarning::SpacingClamped {
            given_cm: item.stirrups.spacing_cm,
            used_cm: DEFAULT_SPACING_CM,
        });
    }
    item.stirrups.effective_spacing_cm()
}

/// Tie mode: floor-divide each stirrup-bearing segment by the spacing.
///
/// Segments are what remains of `[start_gap, length - end_gap]` after
/// removing every support's exclusion zone. The boundary convention is pure
/// floor division, no end-post +1.
fn quantify_ties(
    item: &SteelItem,
    spacing_cm: f64,
    warnings: &mut Vec<TakeoffWarning>,
) -> (StirrupDetail, f64) {
    let span_start = item.start_gap_cm;
    let span_end = item.length_cm() - item.end_gap_cm;

    let mut zones: Vec<(f64, f64)> = item
        .supports
        .iter()
        .map(|s| s.exclusion_span_cm())
        .collect();
    zones.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut computed: u64 = 0;
    let mut cursor = span_start;
    for (zone_start, zone_end) in zones {
        let segment_end = zone_start.min(span_end);
        if segment_end > cursor {
            computed += ((segment_end - cursor) / spacing_cm).floor() as u64;
        }
        cursor = cursor.max(zone_end);
    }
    if span_end > cursor {
        computed += ((span_end - cursor) / spacing_cm).floor() as u64;
    }

    let computed_count = cap_count(computed, "stirrups", warnings);
    let count = item.stirrups.explicit_count.unwrap_or(computed_count);

    let cut_length_cm = item
        .stirrups
        .model
        .perimeter_cm(item.stirrups.width_cm, item.stirrups.height_cm);

    let detail = StirrupDetail::Tie {
        count,
        computed_count,
        cut_length_cm,
    };
    (detail, count as f64 * cut_length_cm)
}

/// Cage mode: `ceil(other_dimension / spacing)` bars per direction, each
/// hooked down `height - cover` at both ends.
fn quantify_cage(
    item: &SteelItem,
    spacing_cm: f64,
    warnings: &mut Vec<TakeoffWarning>,
) -> (StirrupDetail, f64) {
    let length_cm = item.length_cm();
    let width_cm = item.width_cm().unwrap_or(length_cm);
    let height_cm = item.height_cm().unwrap_or(0.0);
    let hook_cm = (height_cm - CAGE_COVER_CM).max(0.0);

    let lengthwise = CageFamily {
        count: cap_count(
            (width_cm / spacing_cm).ceil() as u64,
            "lengthwise cage bars",
            warnings,
        ),
        cut_length_cm: length_cm + 2.0 * hook_cm,
    };
    let widthwise = CageFamily {
        count: cap_count(
            (length_cm / spacing_cm).ceil() as u64,
            "widthwise cage bars",
            warnings,
        ),
        cut_length_cm: width_cm + 2.0 * hook_cm,
    };

    let total_cut_cm = lengthwise.count as f64 * lengthwise.cut_length_cm
        + widthwise.count as f64 * widthwise.cut_length_cm;

    (
        StirrupDetail::Cage {
            lengthwise,
            widthwise,
        },
        total_cut_cm,
    )
}

fn cap_count(computed: u64, context: &str, warnings: &mut Vec<TakeoffWarning>) -> u32 {
    if computed > MAX_STIRRUP_COUNT as u64 {
        warnings.push(TakeoffWarning::StirrupCountCapped {
            computed,
            capped_to: MAX_STIRRUP_COUNT,
            context: context.to_string(),
        });
        MAX_STIRRUP_COUNT
    } else {
        computed as u32
    }
}
