//! # Quote Container
//!
//! The `Quote` struct is the root container for all elements of a steel
//! quote. Persistence is external - the UI layer ships the serialized shape
//! to its backing store; this module only owns the in-memory model and the
//! quote-wide quantification.
//!
//! ## Structure
//!
//! ```text
//! Quote
//! ├── meta: QuoteMetadata (version, client, job info, timestamps)
//! ├── settings: QuoteSettings (price per kg)
//! └── items: HashMap<Uuid, SteelItem> (all elements)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::element::{BarGroup, ElementKind, SteelItem};
//! use takeoff_core::gauges::BarGauge;
//! use takeoff_core::quote::Quote;
//!
//! let mut quote = Quote::new("Acme Construction", "25-017");
//! let mut item = SteelItem::new("V-1", ElementKind::Beam, 4.0);
//! item.add_bar(BarGroup::new(3, BarGauge::Phi10_0)).unwrap();
//! quote.add_item(item);
//!
//! let takeoff = quote.quantify_all();
//! println!("{:.2} kg total", takeoff.total_weight_kg);
//! ```

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::element::SteelItem;
use crate::errors::{TakeoffError, TakeoffResult};
use crate::takeoff::{quantify, ElementTakeoff, GaugeSubtotal};

/// Current schema version for serialized quotes
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root quote container.
///
/// Items are stored in a flat UUID-keyed map for O(1) lookups; element order
/// in reports comes from sorting by label at takeoff time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Quote metadata (version, client, job info)
    pub meta: QuoteMetadata,

    /// Quote-wide settings
    pub settings: QuoteSettings,

    /// All elements, keyed by UUID
    pub items: HashMap<Uuid, SteelItem>,
}

impl Quote {
    /// Create a new empty quote.
    pub fn new(client: impl Into<String>, job_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Quote {
            meta: QuoteMetadata {
                version: SCHEMA_VERSION.to_string(),
                client: client.into(),
                job_id: job_id.into(),
                created: now,
                modified: now,
            },
            settings: QuoteSettings::default(),
            items: HashMap::new(),
        }
    }

    /// Add an element to the quote. Returns the UUID assigned to it.
    pub fn add_item(&mut self, item: SteelItem) -> Uuid {
        let id = Uuid::new_v4();
        self.items.insert(id, item);
        self.touch();
        id
    }

    /// Get an element by UUID.
    pub fn get_item(&self, id: &Uuid) -> Option<&SteelItem> {
        self.items.get(id)
    }

    /// Get a mutable reference to an element by UUID.
    ///
    /// Getting a mutable reference marks the quote as modified.
    pub fn get_item_mut(&mut self, id: &Uuid) -> Option<&mut SteelItem> {
        if self.items.contains_key(id) {
            self.meta.modified = Utc::now();
            self.items.get_mut(id)
        } else {
            None
        }
    }

    /// Remove an element by UUID.
    pub fn remove_item(&mut self, id: &Uuid) -> TakeoffResult<SteelItem> {
        match self.items.remove(id) {
            Some(item) => {
                self.touch();
                Ok(item)
            }
            None => Err(TakeoffError::item_not_found(id.to_string())),
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Quantify every element of the quote.
    ///
    /// Each element's quantities are independent of every other element's,
    /// so they are evaluated in parallel, one task per element. Results come
    /// back sorted by element label for stable reporting.
    pub fn quantify_all(&self) -> QuoteTakeoff {
        let mut items: Vec<ItemTakeoff> = self
            .items
            .par_iter()
            .map(|(id, item)| ItemTakeoff {
                id: *id,
                takeoff: quantify(item),
            })
            .collect();
        items.sort_by(|a, b| {
            a.takeoff
                .label
                .cmp(&b.takeoff.label)
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut by_gauge: BTreeMap<String, GaugeSubtotal> = BTreeMap::new();
        for item in &items {
            for (label, subtotal) in &item.takeoff.by_gauge {
                let entry = by_gauge.entry(label.clone()).or_default();
                entry.linear_m += subtotal.linear_m;
                entry.weight_kg += subtotal.weight_kg;
            }
        }

        let total_linear_m = items.iter().map(|i| i.takeoff.total_linear_m).sum();
        let total_weight_kg: f64 = items.iter().map(|i| i.takeoff.total_weight_kg).sum();
        let total_cost = total_weight_kg * self.settings.price_per_kg;

        QuoteTakeoff {
            items,
            by_gauge,
            total_linear_m,
            total_weight_kg,
            total_cost,
        }
    }
}

impl Default for Quote {
    fn default() -> Self {
        Quote::new("", "")
    }
}

/// Quote metadata stored alongside the items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Client name
    pub client: String,

    /// Job/quote number
    pub job_id: String,

    /// When the quote was created
    pub created: DateTime<Utc>,

    /// When the quote was last modified
    pub modified: DateTime<Utc>,
}

/// Quote-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSettings {
    /// Steel price per kilogram; total cost is just weight times this
    pub price_per_kg: f64,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        QuoteSettings { price_per_kg: 0.0 }
    }
}

/// One element's takeoff, tagged with its quote id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTakeoff {
    pub id: Uuid,
    pub takeoff: ElementTakeoff,
}

/// Aggregated takeoff for a whole quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteTakeoff {
    /// Per-element takeoffs, sorted by element label
    pub items: Vec<ItemTakeoff>,

    /// Per-gauge subtotals across the whole quote
    pub by_gauge: BTreeMap<String, GaugeSubtotal>,

    /// Total linear meters across all elements
    pub total_linear_m: f64,

    /// Total weight across all elements
    pub total_weight_kg: f64,

    /// Total weight times the quote's price per kg
    pub total_cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{BarGroup, ElementKind};
    use crate::gauges::BarGauge;

    fn quote_with_two_beams() -> Quote {
        let mut quote = Quote::new("Acme Corp", "25-017");
        for label in ["V-1", "V-2"] {
            let mut item = SteelItem::new(label, ElementKind::Beam, 3.0);
            item.stirrups.width_cm = 14.0;
            item.stirrups.height_cm = 34.0;
            item.add_bar(
                BarGroup::new(2, BarGauge::Phi10_0).with_segments(300.0, 0.0, 0.0, 0.0, 0.0),
            )
            .unwrap();
            quote.add_item(item);
        }
        quote
    }

    #[test]
    fn test_quote_creation() {
        let quote = Quote::new("Acme Corp", "25-017");
        assert_eq!(quote.meta.client, "Acme Corp");
        assert_eq!(quote.meta.job_id, "25-017");
        assert_eq!(quote.meta.version, SCHEMA_VERSION);
        assert_eq!(quote.item_count(), 0);
    }

    #[test]
    fn test_add_remove_item() {
        let mut quote = Quote::new("Client", "25-001");
        let id = quote.add_item(SteelItem::new("V-1", ElementKind::Beam, 4.0));
        assert_eq!(quote.item_count(), 1);
        assert!(quote.get_item(&id).is_some());

        let removed = quote.remove_item(&id).unwrap();
        assert_eq!(removed.label, "V-1");
        assert_eq!(quote.item_count(), 0);

        let err = quote.remove_item(&id).unwrap_err();
        assert_eq!(err.error_code(), "ITEM_NOT_FOUND");
    }

    #[test]
    fn test_quantify_all_sums_elements() {
        let quote = quote_with_two_beams();
        let takeoff = quote.quantify_all();

        assert_eq!(takeoff.items.len(), 2);
        let item_sum: f64 = takeoff
            .items
            .iter()
            .map(|i| i.takeoff.total_weight_kg)
            .sum();
        assert!((takeoff.total_weight_kg - item_sum).abs() < 1e-9);
        // Sorted by label
        assert_eq!(takeoff.items[0].takeoff.label, "V-1");
        assert_eq!(takeoff.items[1].takeoff.label, "V-2");
    }

    #[test]
    fn test_price_multiplier() {
        let mut quote = quote_with_two_beams();
        quote.settings.price_per_kg = 7.5;
        let takeoff = quote.quantify_all();
        assert!((takeoff.total_cost - takeoff.total_weight_kg * 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_quote_by_gauge_merges_items() {
        let quote = quote_with_two_beams();
        let takeoff = quote.quantify_all();
        // Both beams carry 10.0 bars and 5.0 stirrups
        let phi10 = &takeoff.by_gauge["10.0"];
        assert!((phi10.linear_m - 12.0).abs() < 1e-9);
        assert!(takeoff.by_gauge.contains_key("5.0"));
    }

    #[test]
    fn test_quote_serialization() {
        let quote = quote_with_two_beams();
        let json = serde_json::to_string_pretty(&quote).unwrap();
        assert!(json.contains("Acme Corp"));

        let roundtrip: Quote = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.meta.client, "Acme Corp");
        assert_eq!(roundtrip.item_count(), 2);
    }
}
