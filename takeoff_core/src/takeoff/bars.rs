//! Longitudinal bar group quantification.
//!
//! Pure function of its inputs: element quantity, the element's length/width
//! fallbacks, and the bar group itself. No hidden state, so all bar groups of
//! all elements can be evaluated in parallel.

use serde::{Deserialize, Serialize};

use crate::element::{BarGroup, SteelItem, UsageRole};
use crate::gauges::BarGauge;
use crate::takeoff::TakeoffWarning;
use crate::units::Meters;

/// Quantities for one bar group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarGroupTakeoff {
    /// Structural role, carried through for reporting
    pub usage: UsageRole,

    /// Gauge of the group
    pub gauge: BarGauge,

    /// Bars in the group (per element unit)
    pub count: u32,

    /// Fabricated length of one bar (cm), A..E included
    pub cut_length_cm: f64,

    /// Total linear meters: element quantity x count x cut length
    pub linear_m: f64,

    /// Total weight (kg); zero when the gauge is unknown
    pub weight_kg: f64,
}

/// Compute linear meters and weight for one bar group of an element.
///
/// Base length resolution:
/// 1. `segment_a_cm` when set and positive;
/// 2. otherwise the element's width for width-direction (distribution) bars;
/// 3. otherwise the element's length.
pub fn quantify_bar_group(
    item: &SteelItem,
    bar: &BarGroup,
    warnings: &mut Vec<TakeoffWarning>,
) -> BarGroupTakeoff {
    let base_cm = if bar.segment_a_cm > 0.0 {
        bar.segment_a_cm
    } else if bar.usage.runs_across_width() {
        item.width_cm().unwrap_or_else(|| item.length_cm())
    } else {
        item.length_cm()
    };

    let cut_length_cm = base_cm + bar.extra_length_cm();
    let per_bar_m = cut_length_cm / 100.0;
    let linear_m = item.quantity as f64 * bar.count as f64 * per_bar_m;

    let weight_kg = match bar.gauge.weight_kg_per_m() {
        Some(kg_per_m) => (Meters(linear_m) * kg_per_m).value(),
        None => {
            warnings.push(TakeoffWarning::UnknownGauge {
                gauge: bar.gauge.label().to_string(),
                context: format!("bar group ({})", bar.usage),
            });
            0.0
        }
    };

    BarGroupTakeoff {
        usage: bar.usage,
        gauge: bar.gauge.clone(),
        count: bar.count,
        cut_length_cm,
        linear_m,
        weight_kg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{BarShape, ElementKind, HookDirection};

    fn test_item() -> SteelItem {
        SteelItem::new("V-1", ElementKind::Beam, 3.0)
    }

    #[test]
    fn test_weight_from_segments() {
        // Gauge 10.0, count 2, base 300 cm, qty 1
        let item = test_item();
        let bar = BarGroup::new(2, BarGauge::Phi10_0).with_segments(300.0, 0.0, 0.0, 0.0, 0.0);
        let mut warnings = Vec::new();
        let takeoff = quantify_bar_group(&item, &bar, &mut warnings);

        assert!((takeoff.linear_m - 6.0).abs() < 1e-9);
        assert!((takeoff.weight_kg - 6.0 * 0.617).abs() < 1e-9);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_base_falls_back_to_element_length() {
        let item = test_item(); // 3.0 m
        let bar = BarGroup::new(4, BarGauge::Phi8_0);
        let mut warnings = Vec::new();
        let takeoff = quantify_bar_group(&item, &bar, &mut warnings);
        assert!((takeoff.cut_length_cm - 300.0).abs() < 1e-9);
        assert!((takeoff.linear_m - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_distribution_bars_fall_back_to_width() {
        let mut item = test_item();
        item.width_m = Some(1.2);
        let mut bar = BarGroup::new(5, BarGauge::Phi8_0);
        bar.usage = UsageRole::Distribution;
        let mut warnings = Vec::new();
        let takeoff = quantify_bar_group(&item, &bar, &mut warnings);
        assert!((takeoff.cut_length_cm - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_element_quantity_multiplies() {
        let mut item = test_item();
        item.quantity = 3;
        let bar = BarGroup::new(2, BarGauge::Phi10_0).with_segments(200.0, 0.0, 0.0, 0.0, 0.0);
        let mut warnings = Vec::new();
        let takeoff = quantify_bar_group(&item, &bar, &mut warnings);
        assert!((takeoff.linear_m - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_hook_segments_add_to_cut() {
        let item = test_item();
        let bar = BarGroup::new(1, BarGauge::Phi12_5)
            .with_shape(BarShape::U(HookDirection::Up))
            .with_segments(300.0, 25.0, 25.0, 0.0, 0.0);
        let mut warnings = Vec::new();
        let takeoff = quantify_bar_group(&item, &bar, &mut warnings);
        assert!((takeoff.cut_length_cm - 350.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_gauge_zero_weight_with_warning() {
        let item = test_item();
        let bar = BarGroup::new(2, BarGauge::from_label("14.0")).with_segments(
            300.0, 0.0, 0.0, 0.0, 0.0,
        );
        let mut warnings = Vec::new();
        let takeoff = quantify_bar_group(&item, &bar, &mut warnings);

        assert_eq!(takeoff.weight_kg, 0.0);
        assert!((takeoff.linear_m - 6.0).abs() < 1e-9);
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            &warnings[0],
            TakeoffWarning::UnknownGauge { gauge, .. } if gauge == "14.0"
        ));
    }
}
