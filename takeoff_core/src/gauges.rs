//! # Bar Gauge Database
//!
//! The fixed set of commercial rebar diameters and their linear weights.
//! Every quantity the engine produces ultimately multiplies linear meters by
//! the weight-per-meter constant of a gauge in this table.
//!
//! ## Data Source
//!
//! Weights are the standard CA-50/CA-60 nominal masses (kg/m) for each
//! commercial diameter, e.g. a 10.0 mm bar weighs 0.617 kg per meter.
//!
//! ## Unknown Gauges
//!
//! Externally extracted records sometimes carry gauge labels outside the
//! commercial set. Those parse to [`BarGauge::Unknown`] instead of failing:
//! they contribute zero weight and the quantifier reports them in the
//! warning list of the takeoff result, so a bad label never aborts a quote.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::gauges::BarGauge;
//!
//! let gauge = BarGauge::from_label("10.0");
//! assert_eq!(gauge, BarGauge::Phi10_0);
//! assert_eq!(gauge.weight_kg_per_m().unwrap().0, 0.617);
//! ```

use once_cell::sync::Lazy;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

use crate::units::KgPerMeter;

/// Commercial bar gauge (nominal diameter in mm).
///
/// Serializes as its mm label string (`"10.0"`). Labels outside the
/// commercial set deserialize to `Unknown` rather than erroring.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BarGauge {
    /// 4.2 mm
    Phi4_2,
    /// 5.0 mm
    Phi5_0,
    /// 6.3 mm
    Phi6_3,
    /// 8.0 mm
    Phi8_0,
    /// 10.0 mm
    Phi10_0,
    /// 12.5 mm
    Phi12_5,
    /// 16.0 mm
    Phi16_0,
    /// 20.0 mm
    Phi20_0,
    /// 25.0 mm
    Phi25_0,
    /// 32.0 mm
    Phi32_0,
    /// A label outside the commercial set, kept verbatim
    Unknown(String),
}

impl Default for BarGauge {
    fn default() -> Self {
        BarGauge::Phi10_0
    }
}

/// All commercial gauges for iteration (excludes `Unknown`)
pub const COMMERCIAL_GAUGES: [BarGauge; 10] = [
    BarGauge::Phi4_2,
    BarGauge::Phi5_0,
    BarGauge::Phi6_3,
    BarGauge::Phi8_0,
    BarGauge::Phi10_0,
    BarGauge::Phi12_5,
    BarGauge::Phi16_0,
    BarGauge::Phi20_0,
    BarGauge::Phi25_0,
    BarGauge::Phi32_0,
];

static GAUGE_BY_LABEL: Lazy<HashMap<&'static str, BarGauge>> = Lazy::new(|| {
    COMMERCIAL_GAUGES
        .iter()
        .filter_map(|g| g.label_str().map(|label| (label, g.clone())))
        .collect()
});

impl BarGauge {
    /// Parse a gauge from its mm label.
    ///
    /// Accepts both `"10.0"` and `"10"`; anything that does not resolve to a
    /// commercial diameter becomes `Unknown` with the trimmed label kept.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        if let Some(gauge) = GAUGE_BY_LABEL.get(trimmed) {
            return gauge.clone();
        }
        // "10" and "10.00" should still resolve to the 10.0 mm gauge
        if let Ok(mm) = trimmed.parse::<f64>() {
            let canonical = format!("{:.1}", mm);
            if let Some(gauge) = GAUGE_BY_LABEL.get(canonical.as_str()) {
                return gauge.clone();
            }
        }
        BarGauge::Unknown(trimmed.to_string())
    }

    /// The mm label for commercial gauges, `None` for `Unknown`
    fn label_str(&self) -> Option<&'static str> {
        match self {
            BarGauge::Phi4_2 => Some("4.2"),
            BarGauge::Phi5_0 => Some("5.0"),
            BarGauge::Phi6_3 => Some("6.3"),
            BarGauge::Phi8_0 => Some("8.0"),
            BarGauge::Phi10_0 => Some("10.0"),
            BarGauge::Phi12_5 => Some("12.5"),
            BarGauge::Phi16_0 => Some("16.0"),
            BarGauge::Phi20_0 => Some("20.0"),
            BarGauge::Phi25_0 => Some("25.0"),
            BarGauge::Phi32_0 => Some("32.0"),
            BarGauge::Unknown(_) => None,
        }
    }

    /// The mm label, verbatim for unknown gauges
    pub fn label(&self) -> &str {
        match self {
            BarGauge::Unknown(label) => label,
            other => other.label_str().unwrap_or_default(),
        }
    }

    /// Nominal diameter in mm, `None` for unknown gauges
    pub fn diameter_mm(&self) -> Option<f64> {
        match self {
            BarGauge::Phi4_2 => Some(4.2),
            BarGauge::Phi5_0 => Some(5.0),
            BarGauge::Phi6_3 => Some(6.3),
            BarGauge::Phi8_0 => Some(8.0),
            BarGauge::Phi10_0 => Some(10.0),
            BarGauge::Phi12_5 => Some(12.5),
            BarGauge::Phi16_0 => Some(16.0),
            BarGauge::Phi20_0 => Some(20.0),
            BarGauge::Phi25_0 => Some(25.0),
            BarGauge::Phi32_0 => Some(32.0),
            BarGauge::Unknown(_) => None,
        }
    }

    /// Nominal linear weight (kg/m), `None` for unknown gauges.
    ///
    /// Callers treat `None` as zero weight and surface a warning; see
    /// [`crate::takeoff::TakeoffWarning::UnknownGauge`].
    pub fn weight_kg_per_m(&self) -> Option<KgPerMeter> {
        let kg_m = match self {
            BarGauge::Phi4_2 => 0.109,
            BarGauge::Phi5_0 => 0.154,
            BarGauge::Phi6_3 => 0.245,
            BarGauge::Phi8_0 => 0.395,
            BarGauge::Phi10_0 => 0.617,
            BarGauge::Phi12_5 => 0.963,
            BarGauge::Phi16_0 => 1.578,
            BarGauge::Phi20_0 => 2.466,
            BarGauge::Phi25_0 => 3.853,
            BarGauge::Phi32_0 => 6.313,
            BarGauge::Unknown(_) => return None,
        };
        Some(KgPerMeter(kg_m))
    }

    /// Check whether this is a commercial gauge
    pub fn is_known(&self) -> bool {
        !matches!(self, BarGauge::Unknown(_))
    }
}

impl std::fmt::Display for BarGauge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for BarGauge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for BarGauge {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LabelVisitor;

        impl<'de> de::Visitor<'de> for LabelVisitor {
            type Value = BarGauge;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a gauge label string like \"10.0\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<BarGauge, E> {
                Ok(BarGauge::from_label(v))
            }

            // AI-extracted rows occasionally carry the diameter as a bare number
            fn visit_f64<E: de::Error>(self, v: f64) -> Result<BarGauge, E> {
                Ok(BarGauge::from_label(&format!("{:.1}", v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<BarGauge, E> {
                Ok(BarGauge::from_label(&format!("{}.0", v)))
            }
        }

        deserializer.deserialize_any(LabelVisitor)
    }
}
