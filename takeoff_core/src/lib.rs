//! # takeoff_core - Steel Reinforcement Takeoff Engine
//!
//! `takeoff_core` is the calculation heart of the rebar quoting module: it
//! turns a structural element's description (length, cross-section, bar
//! groups, stirrup spacing, gaps and supports) into exact linear-meter and
//! weight quantities per gauge, plus the discrete grid of attachment points
//! the placement view uses to seat bars and detect conflicts.
//!
//! ## Design Philosophy
//!
//! - **Pure**: quantifiers take an immutable element and return results;
//!   callers own all state and recompute on every read
//! - **Never fails mid-edit**: malformed values are coerced to the nearest
//!   valid interpretation and reported as warnings, not errors
//! - **JSON-First**: every model and result type serializes cleanly for the
//!   UI, the persistence layer, and the AI drawing reader
//! - **Deterministic**: grid points, normalization, and quantities are pure
//!   functions of their inputs
//!
//! ## Quick Start
//!
//! ```rust
//! use takeoff_core::element::{BarGroup, ElementKind, SteelItem};
//! use takeoff_core::gauges::BarGauge;
//! use takeoff_core::takeoff::quantify;
//!
//! let mut beam = SteelItem::new("V-1", ElementKind::Beam, 4.0);
//! beam.stirrups.width_cm = 14.0;
//! beam.stirrups.height_cm = 34.0;
//! beam.add_bar(BarGroup::new(3, BarGauge::Phi12_5)).unwrap();
//!
//! let takeoff = quantify(&beam);
//! println!("{:.2} kg", takeoff.total_weight_kg);
//! ```
//!
//! ## Modules
//!
//! - [`element`] - Data model: elements, bar groups, stirrups, placement
//! - [`gauges`] - Commercial bar gauges and weight-per-meter table
//! - [`geometry`] - Cross-section perimeters and attachment point grids
//! - [`takeoff`] - Quantity computation (bars, stirrups, per-gauge totals)
//! - [`normalize`] - Sanitization of externally supplied records
//! - [`reconcile`] - Element length vs. bar extent consistency
//! - [`quote`] - Quote container and parallel quote-wide takeoff
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod element;
pub mod errors;
pub mod gauges;
pub mod geometry;
pub mod normalize;
pub mod quote;
pub mod reconcile;
pub mod takeoff;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use element::{BarGroup, ElementKind, SteelItem, StirrupConfig};
pub use errors::{TakeoffError, TakeoffResult};
pub use gauges::BarGauge;
pub use geometry::{grid_points, GridPoint, SectionModel};
pub use normalize::{normalize, RawSteelItem};
pub use quote::Quote;
pub use reconcile::reconcile_extent;
pub use takeoff::{quantify, ElementTakeoff, TakeoffWarning};
