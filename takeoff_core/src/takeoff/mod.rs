//! # Takeoff Quantification
//!
//! The quantifiers turn an immutable [`SteelItem`] into linear-meter and
//! weight quantities. Each follows the pattern:
//!
//! - borrow the element (and one of its parts)
//! - return a `*Takeoff` result struct (JSON-serializable)
//! - never fail: malformed values are coerced and reported as warnings
//!
//! Callers own all state and re-run [`quantify`] on every read; derived
//! quantities are never stored back onto the element.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::element::{BarGroup, ElementKind, SteelItem};
//! use takeoff_core::gauges::BarGauge;
//! use takeoff_core::takeoff::quantify;
//!
//! let mut item = SteelItem::new("V-1", ElementKind::Beam, 4.0);
//! item.add_bar(BarGroup::new(3, BarGauge::Phi10_0)).unwrap();
//!
//! let takeoff = quantify(&item);
//! println!("{:.1} m / {:.2} kg", takeoff.total_linear_m, takeoff.total_weight_kg);
//! ```

mod bars;
mod stirrups;

pub use bars::{quantify_bar_group, BarGroupTakeoff};
pub use stirrups::{
    quantify_stirrups, CageFamily, StirrupDetail, StirrupTakeoff, CAGE_COVER_CM,
    MAX_STIRRUP_COUNT,
};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::element::SteelItem;

/// A recoverable oddity found while quantifying.
///
/// Warnings ride along with the quantities instead of aborting them: a
/// half-edited element must still display totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TakeoffWarning {
    /// A gauge label outside the commercial set contributed zero weight
    UnknownGauge { gauge: String, context: String },

    /// A non-positive stirrup spacing was clamped to the default
    SpacingClamped { given_cm: f64, used_cm: f64 },

    /// A computed count hit the per-element hard cap
    StirrupCountCapped {
        computed: u64,
        capped_to: u32,
        context: String,
    },
}

impl std::fmt::Display for TakeoffWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TakeoffWarning::UnknownGauge { gauge, context } => {
                write!(f, "Unknown gauge \"{}\" in {} counted as zero weight", gauge, context)
            }
            TakeoffWarning::SpacingClamped { given_cm, used_cm } => {
                write!(f, "Stirrup spacing {} cm clamped to {} cm", given_cm, used_cm)
            }
            TakeoffWarning::StirrupCountCapped {
                computed,
                capped_to,
                context,
            } => {
                write!(f, "Count {} for {} capped to {}", computed, context, capped_to)
            }
        }
    }
}

/// Linear meters and weight accumulated for one gauge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GaugeSubtotal {
    pub linear_m: f64,
    pub weight_kg: f64,
}

/// Full takeoff for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementTakeoff {
    /// Element label, carried through for reporting
    pub label: String,

    /// One entry per bar group, in element order
    pub bar_groups: Vec<BarGroupTakeoff>,

    /// Stirrup quantities
    pub stirrups: StirrupTakeoff,

    /// Per-gauge subtotals across bars and stirrups, keyed by gauge label
    pub by_gauge: BTreeMap<String, GaugeSubtotal>,

    /// Total linear meters for the element (all units)
    pub total_linear_m: f64,

    /// Total weight for the element (all units)
    pub total_weight_kg: f64,

    /// Everything that was coerced or zeroed along the way
    pub warnings: Vec<TakeoffWarning>,
}

/// Quantify one element: every bar group plus its stirrups.
///
/// Pure function of the element; safe to call from parallel workers.
pub fn quantify(item: &SteelItem) -> ElementTakeoff {
    let mut warnings = Vec::new();

    let bar_groups: Vec<BarGroupTakeoff> = item
        .bars
        .iter()
        .map(|bar| quantify_bar_group(item, bar, &mut warnings))
        .collect();

    let stirrups = quantify_stirrups(item, &mut warnings);

    let mut by_gauge: BTreeMap<String, GaugeSubtotal> = BTreeMap::new();
    for group in &bar_groups {
        let entry = by_gauge.entry(group.gauge.label().to_string()).or_default();
        entry.linear_m += group.linear_m;
        entry.weight_kg += group.weight_kg;
    }
    let stirrup_entry = by_gauge.entry(stirrups.gauge.label().to_string()).or_default();
    stirrup_entry.linear_m += stirrups.linear_m;
    stirrup_entry.weight_kg += stirrups.weight_kg;

    let total_linear_m =
        bar_groups.iter().map(|g| g.linear_m).sum::<f64>() + stirrups.linear_m;
    let total_weight_kg =
        bar_groups.iter().map(|g| g.weight_kg).sum::<f64>() + stirrups.weight_kg;

    ElementTakeoff {
        label: item.label.clone(),
        bar_groups,
        stirrups,
        by_gauge,
        total_linear_m,
        total_weight_kg,
        warnings,
    }
}
