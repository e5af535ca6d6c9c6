//! # Unit Types
//!
//! Type-safe wrappers for the units the takeoff engine juggles. These provide
//! compile-time safety against unit confusion while remaining lightweight
//! (just f64 wrappers).
//!
//! ## Design Philosophy
//!
//! We use simple newtype wrappers rather than a full units library because:
//! - The engine uses a small, consistent set of units
//! - We want JSON serialization to be clean (just numbers)
//! - Minimal runtime overhead
//!
//! ## Unit Conventions
//!
//! The data model follows the conventions of the source quantities:
//! - Element lengths and cross dimensions: meters (m)
//! - Bar segments, offsets, gaps, stirrup dimensions and spacing: centimeters (cm)
//! - Output quantities: linear meters (m) and kilograms (kg)
//! - Gauge density: kilograms per meter (kg/m)
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::units::{Meters, Centimeters, KgPerMeter};
//!
//! let length = Meters(4.5);
//! let length_cm: Centimeters = length.into();
//! assert_eq!(length_cm.0, 450.0);
//!
//! let weight = Meters(12.0) * KgPerMeter(0.617);
//! assert!((weight.0 - 7.404).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

impl From<Meters> for Centimeters {
    fn from(m: Meters) -> Self {
        Centimeters(m.0 * 100.0)
    }
}

impl From<Centimeters> for Meters {
    fn from(cm: Centimeters) -> Self {
        Meters(cm.0 / 100.0)
    }
}

// ============================================================================
// Mass Units
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Linear density in kilograms per meter (the gauge weight tables)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgPerMeter(pub f64);

impl Mul<KgPerMeter> for Meters {
    type Output = Kilograms;
    fn mul(self, rhs: KgPerMeter) -> Kilograms {
        Kilograms(self.0 * rhs.0)
    }
}

impl Mul<Meters> for KgPerMeter {
    type Output = Kilograms;
    fn mul(self, rhs: Meters) -> Kilograms {
        Kilograms(self.0 * rhs.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Centimeters);
impl_arithmetic!(Kilograms);
impl_arithmetic!(KgPerMeter);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_to_centimeters() {
        let m = Meters(3.2);
        let cm: Centimeters = m.into();
        assert!((cm.0 - 320.0).abs() < 1e-9);
    }

    #[test]
    fn test_centimeters_to_meters() {
        let cm = Centimeters(450.0);
        let m: Meters = cm.into();
        assert!((m.0 - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_linear_density() {
        let weight = Meters(12.0) * KgPerMeter(0.617);
        assert!((weight.0 - 7.404).abs() < 1e-9);
    }

    #[test]
    fn test_arithmetic() {
        let a = Centimeters(180.0);
        let b = Centimeters(20.0);
        assert_eq!((a + b).0, 200.0);
        assert_eq!((a - b).0, 160.0);
        assert_eq!((a * 2.0).0, 360.0);
        assert_eq!((a / 2.0).0, 90.0);
    }

    #[test]
    fn test_serialization() {
        let m = Meters(4.2);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "4.2");

        let roundtrip: Meters = serde_json::from_str(&json).unwrap();
        assert_eq!(m, roundtrip);
    }
}
