//! # Element Data Model
//!
//! A [`SteelItem`] describes one structural piece of a quote: a beam, column,
//! drilled pier, or footing, with its longitudinal bar groups, stirrup
//! configuration, supports, and end gaps.
//!
//! Elements are created empty and become "configured" once they carry at
//! least one bar group and a stirrup decision. Every bar mutation eagerly
//! re-runs the extent reconciler so downstream quantity calculations always
//! see a consistent length.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "label": "V-103",
//!   "kind": "beam",
//!   "quantity": 2,
//!   "length_m": 4.2,
//!   "bars": [
//!     { "count": 3, "gauge": "12.5", "usage": "principal",
//!       "placement": { "mode": "legacy", "role": "bottom" },
//!       "shape": { "u": "up" }, "segment_a_cm": 420.0,
//!       "segment_b_cm": 25.0, "segment_c_cm": 25.0 }
//!   ],
//!   "stirrups": {
//!     "gauge": "5.0", "spacing_cm": 15.0, "model": "rect",
//!     "width_cm": 14.0, "height_cm": 34.0
//!   },
//!   "supports": [
//!     { "position_cm": 200.0, "width_cm": 14.0,
//!       "left_gap_cm": 20.0, "right_gap_cm": 20.0 }
//!   ],
//!   "start_gap_cm": 0.0,
//!   "end_gap_cm": 0.0
//! }
//! ```

mod bar_group;

pub use bar_group::{BarGroup, BarShape, HookDirection, Placement, PlacementRole, UsageRole};

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::{TakeoffError, TakeoffResult};
use crate::gauges::BarGauge;
use crate::geometry::{grid_points, SectionModel};
use crate::reconcile::reconcile_extent;
use crate::units::{Centimeters, Meters};

/// Default stirrup spacing (cm) used when a record carries a non-positive
/// spacing; keeps the count computation away from division by zero.
pub const DEFAULT_SPACING_CM: f64 = 20.0;

/// Kind of structural element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    #[default]
    Beam,
    Column,
    DrilledPier,
    Footing,
}

impl ElementKind {
    pub const ALL: [ElementKind; 4] = [
        ElementKind::Beam,
        ElementKind::Column,
        ElementKind::DrilledPier,
        ElementKind::Footing,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ElementKind::Beam => "Beam",
            ElementKind::Column => "Column",
            ElementKind::DrilledPier => "Drilled pier",
            ElementKind::Footing => "Footing",
        }
    }

    /// Footings get cage reinforcement instead of transverse stirrups.
    pub fn is_footing(&self) -> bool {
        matches!(self, ElementKind::Footing)
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// An intermediate support along a beam.
///
/// Stirrups are omitted inside `[position - left_gap, position + right_gap]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Support {
    /// Center of the support, cm from the element's start
    pub position_cm: f64,

    /// Physical width of the support (cm)
    #[serde(default)]
    pub width_cm: f64,

    /// Exclusion reach to the left of the position (cm)
    #[serde(default)]
    pub left_gap_cm: f64,

    /// Exclusion reach to the right of the position (cm)
    #[serde(default)]
    pub right_gap_cm: f64,
}

impl Support {
    /// The stirrup-free zone this support carves out of the element.
    pub fn exclusion_span_cm(&self) -> (f64, f64) {
        (
            self.position_cm - self.left_gap_cm,
            self.position_cm + self.right_gap_cm,
        )
    }
}

/// Stirrup configuration, shared per element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StirrupConfig {
    /// Stirrup gauge
    pub gauge: BarGauge,

    /// Spacing between stirrups (cm); non-positive values are clamped to
    /// [`DEFAULT_SPACING_CM`] by the quantifier
    pub spacing_cm: f64,

    /// Cross-section model the stirrup wraps
    #[serde(default)]
    pub model: SectionModel,

    /// Stirrup width (cm)
    pub width_cm: f64,

    /// Stirrup height (cm)
    pub height_cm: f64,

    /// Externally supplied count; takes precedence over the computed count
    #[serde(default)]
    pub explicit_count: Option<u32>,

    /// Free-form position label ("every 15", "center third", ...)
    #[serde(default)]
    pub position: String,
}

impl Default for StirrupConfig {
    fn default() -> Self {
        StirrupConfig {
            gauge: BarGauge::Phi5_0,
            spacing_cm: DEFAULT_SPACING_CM,
            model: SectionModel::Rect,
            width_cm: 0.0,
            height_cm: 0.0,
            explicit_count: None,
            position: String::new(),
        }
    }
}

impl StirrupConfig {
    /// Spacing with the non-positive clamp applied.
    pub fn effective_spacing_cm(&self) -> f64 {
        if self.spacing_cm > 0.0 {
            self.spacing_cm
        } else {
            DEFAULT_SPACING_CM
        }
    }

    /// Whether the spacing needed clamping
    pub fn spacing_is_invalid(&self) -> bool {
        self.spacing_cm <= 0.0
    }

    /// A stirrup decision exists once either a spacing or an explicit count
    /// is present.
    pub fn is_decided(&self) -> bool {
        self.explicit_count.is_some() || self.spacing_cm > 0.0
    }
}

/// A structural piece of the quote: beam, column, drilled pier, or footing.
///
/// Invariant: `length_cm() >= max(bar.offset_cm + bar.segment_a_cm)` over all
/// bar groups - the concrete envelope contains every bar. Violations are
/// corrected upward by the extent reconciler, never downward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteelItem {
    /// User label (e.g. "V-103", "P2")
    #[serde(default)]
    pub label: String,

    /// Element kind
    #[serde(default)]
    pub kind: ElementKind,

    /// How many identical pieces this element represents
    pub quantity: u32,

    /// Nominal length (m)
    pub length_m: f64,

    /// Cross width (m) - columns and footings
    #[serde(default)]
    pub width_m: Option<f64>,

    /// Cross height (m) - columns and footings
    #[serde(default)]
    pub height_m: Option<f64>,

    /// Longitudinal bar groups
    #[serde(default)]
    pub bars: Vec<BarGroup>,

    /// Stirrup configuration
    #[serde(default)]
    pub stirrups: StirrupConfig,

    /// Intermediate supports (beams only)
    #[serde(default)]
    pub supports: Vec<Support>,

    /// Stirrup-free zone at the element's start (cm)
    #[serde(default)]
    pub start_gap_cm: f64,

    /// Stirrup-free zone at the element's end (cm)
    #[serde(default)]
    pub end_gap_cm: f64,
}

impl SteelItem {
    /// Create an empty element with no bars and a default stirrup config.
    pub fn new(label: impl Into<String>, kind: ElementKind, length_m: f64) -> Self {
        SteelItem {
            label: label.into(),
            kind,
            quantity: 1,
            length_m,
            width_m: None,
            height_m: None,
            bars: Vec::new(),
            stirrups: StirrupConfig::default(),
            supports: Vec::new(),
            start_gap_cm: 0.0,
            end_gap_cm: 0.0,
        }
    }

    /// Nominal length in cm
    pub fn length_cm(&self) -> f64 {
        Centimeters::from(Meters(self.length_m)).value()
    }

    /// Cross width in cm, if present
    pub fn width_cm(&self) -> Option<f64> {
        self.width_m.map(|w| Centimeters::from(Meters(w)).value())
    }

    /// Cross height in cm, if present
    pub fn height_cm(&self) -> Option<f64> {
        self.height_m.map(|h| Centimeters::from(Meters(h)).value())
    }

    /// An element is configured once it has at least one bar group and a
    /// stirrup decision.
    pub fn is_configured(&self) -> bool {
        !self.bars.is_empty() && self.stirrups.is_decided()
    }

    /// Validate the element's own fields (bars validate themselves on
    /// mutation).
    pub fn validate(&self) -> TakeoffResult<()> {
        if self.quantity == 0 {
            return Err(TakeoffError::invalid_input(
                "quantity",
                self.quantity.to_string(),
                "Quantity must be at least 1",
            ));
        }
        if self.length_m <= 0.0 {
            return Err(TakeoffError::invalid_input(
                "length_m",
                self.length_m.to_string(),
                "Length must be positive",
            ));
        }
        for gap in [self.start_gap_cm, self.end_gap_cm] {
            if gap < 0.0 {
                return Err(TakeoffError::invalid_input(
                    "start_gap_cm/end_gap_cm",
                    gap.to_string(),
                    "Gaps cannot be negative",
                ));
            }
        }
        Ok(())
    }

    // ========================================================================
    // Bar mutations - each one eagerly re-runs the extent reconciler
    // ========================================================================

    /// Add a bar group. Rejects placement conflicts with existing groups.
    pub fn add_bar(&mut self, bar: BarGroup) -> TakeoffResult<()> {
        bar.validate()?;
        self.check_placement_free(&bar, None)?;
        self.bars.push(bar);
        reconcile_extent(self);
        Ok(())
    }

    /// Replace the bar group at `index`.
    pub fn update_bar(&mut self, index: usize, bar: BarGroup) -> TakeoffResult<()> {
        if index >= self.bars.len() {
            return Err(TakeoffError::BarGroupNotFound {
                index,
                count: self.bars.len(),
            });
        }
        bar.validate()?;
        self.check_placement_free(&bar, Some(index))?;
        self.bars[index] = bar;
        reconcile_extent(self);
        Ok(())
    }

    /// Remove and return the bar group at `index`.
    pub fn remove_bar(&mut self, index: usize) -> TakeoffResult<BarGroup> {
        if index >= self.bars.len() {
            return Err(TakeoffError::BarGroupNotFound {
                index,
                count: self.bars.len(),
            });
        }
        let bar = self.bars.remove(index);
        reconcile_extent(self);
        Ok(bar)
    }

    // ========================================================================
    // Grid occupancy
    // ========================================================================

    /// All grid point ids currently held by bar groups of this element.
    pub fn occupancy(&self) -> BTreeSet<u32> {
        self.bars
            .iter()
            .filter_map(|b| b.placement.explicit_points())
            .flatten()
            .copied()
            .collect()
    }

    /// Which bar group (by index) holds a grid point, if any.
    pub fn occupant_of(&self, point_id: u32) -> Option<usize> {
        self.bars.iter().position(|b| {
            b.placement
                .explicit_points()
                .is_some_and(|points| points.contains(&point_id))
        })
    }

    /// Pin the bar group at `bar_index` to explicit grid points.
    ///
    /// Points must exist on the element's cross-section grid and must not be
    /// held by any other group; an occupied point is rejected, never stolen.
    pub fn assign_points(&mut self, bar_index: usize, points: Vec<u32>) -> TakeoffResult<()> {
        if bar_index >= self.bars.len() {
            return Err(TakeoffError::BarGroupNotFound {
                index: bar_index,
                count: self.bars.len(),
            });
        }
        let grid_len = grid_points(
            self.stirrups.model,
            self.stirrups.width_cm,
            self.stirrups.height_cm,
        )
        .len();
        for &p in &points {
            if p as usize >= grid_len {
                return Err(TakeoffError::PointOutOfRange {
                    point_id: p,
                    available: grid_len,
                });
            }
            if let Some(holder) = self.occupant_of(p) {
                if holder != bar_index {
                    return Err(TakeoffError::point_occupied(
                        p,
                        format!("bar group {}", holder),
                    ));
                }
            }
        }
        let mut updated = self.bars[bar_index].clone();
        updated.placement = Placement::Explicit { points };
        self.update_bar(bar_index, updated)
    }

    fn check_placement_free(&self, bar: &BarGroup, skip_index: Option<usize>) -> TakeoffResult<()> {
        let Some(points) = bar.placement.explicit_points() else {
            return Ok(());
        };
        for &p in points {
            if let Some(holder) = self.occupant_of(p) {
                if Some(holder) != skip_index {
                    return Err(TakeoffError::point_occupied(
                        p,
                        format!("bar group {}", holder),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_beam() -> SteelItem {
        let mut item = SteelItem::new("V-1", ElementKind::Beam, 4.0);
        item.stirrups = StirrupConfig {
            gauge: BarGauge::Phi5_0,
            spacing_cm: 15.0,
            model: SectionModel::Rect,
            width_cm: 14.0,
            height_cm: 34.0,
            explicit_count: None,
            position: String::new(),
        };
        item
    }

    #[test]
    fn test_new_element_is_unconfigured() {
        let item = test_beam();
        assert!(!item.is_configured());
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn test_length_conversion() {
        let item = test_beam();
        assert_eq!(item.length_cm(), 400.0);
        assert_eq!(item.width_cm(), None);
    }

    #[test]
    fn test_add_bar_configures_element() {
        let mut item = test_beam();
        item.add_bar(BarGroup::new(3, BarGauge::Phi10_0)).unwrap();
        assert!(item.is_configured());
    }

    #[test]
    fn test_add_bar_raises_length() {
        let mut item = test_beam();
        let bar = BarGroup::new(2, BarGauge::Phi12_5)
            .with_segments(430.0, 0.0, 0.0, 0.0, 0.0)
            .with_shape(BarShape::Straight)
            .with_offset(10.0);
        item.add_bar(bar).unwrap();
        // 10 + 430 = 440 cm > 400 cm nominal
        assert!((item.length_cm() - 440.0).abs() < 1e-9);
    }

    #[test]
    fn test_remove_bar_never_lowers_length() {
        let mut item = test_beam();
        let bar = BarGroup::new(1, BarGauge::Phi10_0).with_segments(500.0, 0.0, 0.0, 0.0, 0.0);
        item.add_bar(bar).unwrap();
        assert_eq!(item.length_cm(), 500.0);
        item.remove_bar(0).unwrap();
        assert_eq!(item.length_cm(), 500.0);
    }

    #[test]
    fn test_occupancy_exclusive() {
        let mut item = test_beam();
        let mut a = BarGroup::new(2, BarGauge::Phi10_0);
        a.placement = Placement::Explicit { points: vec![0, 1] };
        item.add_bar(a).unwrap();

        let mut b = BarGroup::new(2, BarGauge::Phi12_5);
        b.placement = Placement::Explicit { points: vec![1, 2] };
        let err = item.add_bar(b).unwrap_err();
        assert_eq!(err.error_code(), "POINT_OCCUPIED");

        // The rejected group must not have been stored
        assert_eq!(item.bars.len(), 1);
        assert_eq!(item.occupancy().into_iter().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_assign_points_rejects_occupied() {
        let mut item = test_beam();
        let mut a = BarGroup::new(2, BarGauge::Phi10_0);
        a.placement = Placement::Explicit { points: vec![4] };
        item.add_bar(a).unwrap();
        item.add_bar(BarGroup::new(2, BarGauge::Phi10_0)).unwrap();

        let err = item.assign_points(1, vec![4]).unwrap_err();
        assert!(err.is_recoverable());
        // Reassigning a group its own point is fine
        item.assign_points(0, vec![4, 5]).unwrap();
    }

    #[test]
    fn test_assign_points_rejects_out_of_range() {
        let mut item = test_beam();
        item.add_bar(BarGroup::new(2, BarGauge::Phi10_0)).unwrap();
        // Rect grid has 30 points, ids 0..30
        let err = item.assign_points(0, vec![30]).unwrap_err();
        assert_eq!(err.error_code(), "POINT_OUT_OF_RANGE");
    }

    #[test]
    fn test_support_exclusion_span() {
        let support = Support {
            position_cm: 200.0,
            width_cm: 14.0,
            left_gap_cm: 20.0,
            right_gap_cm: 25.0,
        };
        assert_eq!(support.exclusion_span_cm(), (180.0, 225.0));
    }

    #[test]
    fn test_validate_rejects_zero_quantity() {
        let mut item = test_beam();
        item.quantity = 0;
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut item = test_beam();
        item.add_bar(
            BarGroup::new(3, BarGauge::Phi12_5)
                .with_shape(BarShape::U(HookDirection::Up))
                .with_segments(400.0, 25.0, 25.0, 0.0, 0.0),
        )
        .unwrap();
        let json = serde_json::to_string_pretty(&item).unwrap();
        let roundtrip: SteelItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, roundtrip);
    }
}
