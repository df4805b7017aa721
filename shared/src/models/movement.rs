//! Stock movement model and adjustment previews

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    In,
    Out,
}

impl MovementDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementDirection::In => "in",
            MovementDirection::Out => "out",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in" => Some(MovementDirection::In),
            "out" => Some(MovementDirection::Out),
            _ => None,
        }
    }
}

/// A stock movement. Immutable once recorded; corrections are new
/// movements, not edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: i64,
    pub product_id: i64,
    pub direction: MovementDirection,
    pub quantity: i64,
    pub note: String,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Prospective quantity after applying a pending adjustment.
///
/// Outbound adjustments floor-clamp at zero; validation is expected to have
/// rejected an over-withdrawal before this is ever displayed or persisted,
/// so the clamp never masks an inconsistency.
pub fn preview_quantity(current: i64, direction: MovementDirection, quantity: i64) -> i64 {
    match direction {
        MovementDirection::In => current + quantity,
        MovementDirection::Out => (current - quantity).max(0),
    }
}

/// Validate a pending adjustment against the current on-hand quantity.
/// Runs before the preview so an over-withdrawal is a hard error, not a
/// silent clamp to zero.
pub fn validate_adjustment(
    current: i64,
    direction: MovementDirection,
    quantity: i64,
) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    if direction == MovementDirection::Out && quantity > current {
        return Err("Cannot remove more stock than available");
    }
    Ok(())
}
