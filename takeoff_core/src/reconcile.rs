//! # Extent Reconciliation
//!
//! Keeps an element's declared length consistent with its longest bar's
//! physical reach. Runs eagerly on every bar mutation (not lazily), so
//! downstream quantity calculations never observe a stale nominal length.
//!
//! An inconsistent bar/element length is not an error: the reconciler always
//! wins over the nominal value, raising it and never lowering it.

use crate::element::SteelItem;
use crate::units::{Centimeters, Meters};

/// The element length every computation should use (cm): the nominal length,
/// raised to the longest bar extent when a bar reaches past it.
pub fn effective_length_cm(item: &SteelItem) -> f64 {
    let max_extent = item
        .bars
        .iter()
        .map(|bar| bar.extent_cm())
        .fold(0.0, f64::max);
    item.length_cm().max(max_extent)
}

/// Raise the element's nominal length to its effective length.
///
/// Called by every bar add/edit/remove on [`SteelItem`]; the nominal length
/// is only ever raised here, never lowered.
pub fn reconcile_extent(item: &mut SteelItem) {
    let effective = effective_length_cm(item);
    if effective > item.length_cm() {
        item.length_m = Meters::from(Centimeters(effective)).value();
    }
}
