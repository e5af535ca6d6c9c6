//! # Bar Groups
//!
//! A bar group describes one or more identical longitudinal bars: gauge,
//! bend shape, the five length segments of the cut, and where the group sits
//! on the cross-section grid.
//!
//! ## Segment Model
//!
//! ```text
//!        B (left leg)                      C (right leg)
//!        ┌────────────── A (main run) ──────────────┐
//!        │                                          │
//!        D (inward return, C-shapes)                E
//! ```
//!
//! Cut length of one bar = A + B + C + D + E (cm). Older records carry only
//! `hook_start_cm`/`hook_end_cm` instead of B..E; the quantifier falls back
//! to those when no segment extras are present.

use serde::{Deserialize, Serialize};

use crate::errors::{TakeoffError, TakeoffResult};
use crate::gauges::BarGauge;

/// Direction a hook bends, in the section's y-down screen convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookDirection {
    Up,
    Down,
}

/// Bend shape of a bar, implying which ends carry hooks.
///
/// - `Straight` - no hooks at all; segments B..E must be zero
/// - `L` - hook at the end only
/// - `U` - hooks at both ends
/// - `C` - hooks at both ends plus inward returns (segments D/E)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarShape {
    Straight,
    L(HookDirection),
    U(HookDirection),
    C(HookDirection),
}

impl Default for BarShape {
    fn default() -> Self {
        BarShape::Straight
    }
}

impl BarShape {
    pub fn is_straight(&self) -> bool {
        matches!(self, BarShape::Straight)
    }

    /// Whether the shape carries a hook at the bar's start
    pub fn has_hook_start(&self) -> bool {
        matches!(self, BarShape::U(_) | BarShape::C(_))
    }

    /// Whether the shape carries a hook at the bar's end
    pub fn has_hook_end(&self) -> bool {
        matches!(self, BarShape::L(_) | BarShape::U(_) | BarShape::C(_))
    }

    /// Whether the shape has inward returns (segments D/E)
    pub fn has_returns(&self) -> bool {
        matches!(self, BarShape::C(_))
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BarShape::Straight => "Straight",
            BarShape::L(HookDirection::Up) => "L (up)",
            BarShape::L(HookDirection::Down) => "L (down)",
            BarShape::U(HookDirection::Up) => "U (up)",
            BarShape::U(HookDirection::Down) => "U (down)",
            BarShape::C(HookDirection::Up) => "C (up)",
            BarShape::C(HookDirection::Down) => "C (down)",
        }
    }
}

impl std::fmt::Display for BarShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Structural role of a bar group within its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageRole {
    /// Main longitudinal reinforcement
    #[default]
    Principal,
    /// Second layer stacked over the principal bars
    SecondLayer,
    /// Side-face (rib) bars
    Rib,
    /// Distribution bars running across the element's width
    Distribution,
}

impl UsageRole {
    pub const ALL: [UsageRole; 4] = [
        UsageRole::Principal,
        UsageRole::SecondLayer,
        UsageRole::Rib,
        UsageRole::Distribution,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            UsageRole::Principal => "Principal",
            UsageRole::SecondLayer => "Second layer",
            UsageRole::Rib => "Rib",
            UsageRole::Distribution => "Distribution",
        }
    }

    /// Distribution bars run across the width, so their base length falls
    /// back to the element's width rather than its length.
    pub fn runs_across_width(&self) -> bool {
        matches!(self, UsageRole::Distribution)
    }
}

impl std::fmt::Display for UsageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Legacy coarse placement labels, used before explicit grid points existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementRole {
    Top,
    Bottom,
    #[default]
    Distributed,
    Center,
}

impl PlacementRole {
    pub fn display_name(&self) -> &'static str {
        match self {
            PlacementRole::Top => "Top",
            PlacementRole::Bottom => "Bottom",
            PlacementRole::Distributed => "Distributed",
            PlacementRole::Center => "Center",
        }
    }
}

/// Where a bar group sits on the cross-section.
///
/// Current records pin the group to explicit grid point ids; older records
/// only carry a coarse role. Both the quantifier and the placement view
/// match on the variant instead of sniffing optional fields.
///
/// ## JSON Examples
///
/// ```json
/// { "mode": "explicit", "points": [0, 4, 25] }
/// { "mode": "legacy", "role": "bottom" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Placement {
    /// Pinned to specific grid point ids
    Explicit { points: Vec<u32> },
    /// Coarse legacy role
    Legacy { role: PlacementRole },
}

impl Default for Placement {
    fn default() -> Self {
        Placement::Legacy {
            role: PlacementRole::Distributed,
        }
    }
}

impl Placement {
    /// Explicit point ids, if this placement has them
    pub fn explicit_points(&self) -> Option<&[u32]> {
        match self {
            Placement::Explicit { points } => Some(points),
            Placement::Legacy { .. } => None,
        }
    }

    pub fn is_top(&self) -> bool {
        matches!(
            self,
            Placement::Legacy {
                role: PlacementRole::Top
            }
        )
    }

    pub fn is_bottom(&self) -> bool {
        matches!(
            self,
            Placement::Legacy {
                role: PlacementRole::Bottom
            }
        )
    }
}

/// One group of identical longitudinal bars.
///
/// ## JSON Example
///
/// ```json
/// {
///   "count": 3,
///   "gauge": "12.5",
///   "usage": "principal",
///   "placement": { "mode": "legacy", "role": "bottom" },
///   "shape": { "u": "up" },
///   "segment_a_cm": 420.0,
///   "segment_b_cm": 25.0,
///   "segment_c_cm": 25.0,
///   "offset_cm": 0.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarGroup {
    /// Number of identical bars in the group
    pub count: u32,

    /// Bar gauge (nominal diameter)
    pub gauge: BarGauge,

    /// Structural role (principal, second layer, rib, distribution)
    #[serde(default)]
    pub usage: UsageRole,

    /// Position on the cross-section grid
    #[serde(default)]
    pub placement: Placement,

    /// Bend shape, implying which hooks exist
    #[serde(default)]
    pub shape: BarShape,

    /// Main straight run (cm); zero means "use the element's length"
    #[serde(default)]
    pub segment_a_cm: f64,

    /// Left leg / start hook (cm)
    #[serde(default)]
    pub segment_b_cm: f64,

    /// Right leg / end hook (cm)
    #[serde(default)]
    pub segment_c_cm: f64,

    /// Inward return at the start, C-shapes (cm)
    #[serde(default)]
    pub segment_d_cm: f64,

    /// Inward return at the end, C-shapes (cm)
    #[serde(default)]
    pub segment_e_cm: f64,

    /// Longitudinal offset from the element's start (cm)
    #[serde(default)]
    pub offset_cm: f64,

    /// Legacy start-hook length (cm); only read when B..E are absent
    #[serde(default)]
    pub hook_start_cm: f64,

    /// Legacy end-hook length (cm); only read when B..E are absent
    #[serde(default)]
    pub hook_end_cm: f64,
}

impl BarGroup {
    /// Create a straight bar group with everything else defaulted.
    pub fn new(count: u32, gauge: BarGauge) -> Self {
        BarGroup {
            count,
            gauge,
            usage: UsageRole::default(),
            placement: Placement::default(),
            shape: BarShape::default(),
            segment_a_cm: 0.0,
            segment_b_cm: 0.0,
            segment_c_cm: 0.0,
            segment_d_cm: 0.0,
            segment_e_cm: 0.0,
            offset_cm: 0.0,
            hook_start_cm: 0.0,
            hook_end_cm: 0.0,
        }
    }

    /// Set the main run and leg segments
    pub fn with_segments(mut self, a: f64, b: f64, c: f64, d: f64, e: f64) -> Self {
        self.segment_a_cm = a;
        self.segment_b_cm = b;
        self.segment_c_cm = c;
        self.segment_d_cm = d;
        self.segment_e_cm = e;
        self
    }

    /// Set the bend shape
    pub fn with_shape(mut self, shape: BarShape) -> Self {
        self.shape = shape;
        self
    }

    /// Set the longitudinal offset
    pub fn with_offset(mut self, offset_cm: f64) -> Self {
        self.offset_cm = offset_cm;
        self
    }

    /// How far this group reaches along the element (cm).
    pub fn extent_cm(&self) -> f64 {
        self.offset_cm + self.segment_a_cm
    }

    /// Whether any of the B..E segments is explicitly set
    pub fn has_segment_extras(&self) -> bool {
        self.segment_b_cm > 0.0
            || self.segment_c_cm > 0.0
            || self.segment_d_cm > 0.0
            || self.segment_e_cm > 0.0
    }

    /// Hook and leg length beyond the main run (cm).
    ///
    /// Prefers the segment model; falls back to the legacy hook fields,
    /// gated by which hooks the shape actually has.
    pub fn extra_length_cm(&self) -> f64 {
        if self.has_segment_extras() {
            return self.segment_b_cm + self.segment_c_cm + self.segment_d_cm + self.segment_e_cm;
        }
        let mut extra = 0.0;
        if self.shape.has_hook_start() {
            extra += self.hook_start_cm;
        }
        if self.shape.has_hook_end() {
            extra += self.hook_end_cm;
        }
        extra
    }

    /// Validate the group's internal invariants.
    pub fn validate(&self) -> TakeoffResult<()> {
        if self.shape.is_straight() && self.has_segment_extras() {
            return Err(TakeoffError::invalid_input(
                "shape",
                self.shape.to_string(),
                "A straight bar cannot carry leg or hook segments",
            ));
        }
        for (field, value) in [
            ("segment_a_cm", self.segment_a_cm),
            ("segment_b_cm", self.segment_b_cm),
            ("segment_c_cm", self.segment_c_cm),
            ("segment_d_cm", self.segment_d_cm),
            ("segment_e_cm", self.segment_e_cm),
            ("offset_cm", self.offset_cm),
        ] {
            if value < 0.0 {
                return Err(TakeoffError::invalid_input(
                    field,
                    value.to_string(),
                    "Lengths cannot be negative",
                ));
            }
        }
        if let Placement::Explicit { points } = &self.placement {
            let mut seen = std::collections::BTreeSet::new();
            for &p in points {
                if !seen.insert(p) {
                    return Err(TakeoffError::invalid_input(
                        "placement",
                        p.to_string(),
                        "Duplicate grid point within the group",
                    ));
                }
            }
        }
        Ok(())
    }
}
