//! # Error Types
//!
//! Structured error types for takeoff_core. Quantity computation itself never
//! fails on well-shaped input (malformed values are coerced or surfaced as
//! warnings); these errors cover the operations that can legitimately refuse:
//! placement conflicts, explicit input validation, and quote item lookups.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::errors::{TakeoffError, TakeoffResult};
//!
//! fn validate_quantity(quantity: u32) -> TakeoffResult<()> {
//!     if quantity == 0 {
//!         return Err(TakeoffError::InvalidInput {
//!             field: "quantity".to_string(),
//!             value: quantity.to_string(),
//!             reason: "Quantity must be at least 1".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for takeoff_core operations
pub type TakeoffResult<T> = Result<T, TakeoffError>;

/// Structured error type for placement and container operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic handling by the UI and import layers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum TakeoffError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A grid point is already held by another bar group on the same element
    #[error("Point {point_id} is already occupied by {held_by}")]
    PointOccupied { point_id: u32, held_by: String },

    /// A grid point id does not exist on the element's cross-section grid
    #[error("Point {point_id} is outside the grid ({available} points available)")]
    PointOutOfRange { point_id: u32, available: usize },

    /// A bar group index does not exist on the element
    #[error("Bar group index {index} out of range ({count} bar groups)")]
    BarGroupNotFound { index: usize, count: usize },

    /// Quote item not found by id
    #[error("Item not found: {item_id}")]
    ItemNotFound { item_id: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl TakeoffError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        TakeoffError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a PointOccupied error
    pub fn point_occupied(point_id: u32, held_by: impl Into<String>) -> Self {
        TakeoffError::PointOccupied {
            point_id,
            held_by: held_by.into(),
        }
    }

    /// Create an ItemNotFound error
    pub fn item_not_found(item_id: impl Into<String>) -> Self {
        TakeoffError::ItemNotFound {
            item_id: item_id.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., user can pick another point)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TakeoffError::PointOccupied { .. } | TakeoffError::PointOutOfRange { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            TakeoffError::InvalidInput { .. } => "INVALID_INPUT",
            TakeoffError::PointOccupied { .. } => "POINT_OCCUPIED",
            TakeoffError::PointOutOfRange { .. } => "POINT_OUT_OF_RANGE",
            TakeoffError::BarGroupNotFound { .. } => "BAR_GROUP_NOT_FOUND",
            TakeoffError::ItemNotFound { .. } => "ITEM_NOT_FOUND",
            TakeoffError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}
