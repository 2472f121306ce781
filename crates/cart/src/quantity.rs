//! Tons / pieces / meters conversion.

use serde::{Deserialize, Serialize};

use atlantmetal_catalog::PriceItem;
use atlantmetal_core::{DomainError, DomainResult, ValueObject};

/// Quantity as the customer typed it into the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
pub enum QuantityInput {
    Tons(f64),
    Pieces(u64),
    Meters(f64),
}

/// A quantity expressed all three ways.
///
/// Invariant: `pieces == round(tons * 1000 / weight_per_piece)` and
/// `meters == pieces * length_value`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineQuantity {
    pub tons: f64,
    pub pieces: u64,
    pub meters: f64,
}

impl ValueObject for LineQuantity {}

/// Conversion factors of one catalog item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConversion {
    /// kg per piece
    weight_per_piece: f64,
    /// m per piece
    length_value: f64,
}

impl ValueObject for UnitConversion {}

impl UnitConversion {
    pub fn new(weight_per_piece: f64, length_value: f64) -> DomainResult<Self> {
        if !(weight_per_piece.is_finite() && weight_per_piece > 0.0) {
            return Err(DomainError::validation("weight per piece must be positive"));
        }
        if !(length_value.is_finite() && length_value > 0.0) {
            return Err(DomainError::validation("unit length must be positive"));
        }
        Ok(Self {
            weight_per_piece,
            length_value,
        })
    }

    /// Catalog items are validated on construction, so this cannot fail.
    pub fn for_item(item: &PriceItem) -> Self {
        Self {
            weight_per_piece: item.weight_per_piece(),
            length_value: item.length_value(),
        }
    }

    pub fn pieces_for_tons(&self, tons: f64) -> u64 {
        // Float-to-int `as` saturates, so a huge tonnage cannot wrap.
        (tons * 1000.0 / self.weight_per_piece).round() as u64
    }

    pub fn meters_for_pieces(&self, pieces: u64) -> f64 {
        pieces as f64 * self.length_value
    }

    pub fn from_tons(&self, tons: f64) -> LineQuantity {
        let pieces = self.pieces_for_tons(tons);
        LineQuantity {
            tons,
            pieces,
            meters: self.meters_for_pieces(pieces),
        }
    }

    pub fn from_pieces(&self, pieces: u64) -> LineQuantity {
        LineQuantity {
            tons: pieces as f64 * self.weight_per_piece / 1000.0,
            pieces,
            meters: self.meters_for_pieces(pieces),
        }
    }

    /// Meters snap to whole pieces.
    pub fn from_meters(&self, meters: f64) -> LineQuantity {
        let pieces = (meters / self.length_value).round() as u64;
        self.from_pieces(pieces)
    }

    /// Validate and convert a calculator input.
    pub fn resolve(&self, input: QuantityInput) -> DomainResult<LineQuantity> {
        let quantity = match input {
            QuantityInput::Tons(tons) => {
                ensure_positive(tons, "tons")?;
                self.from_tons(tons)
            }
            QuantityInput::Pieces(pieces) => self.from_pieces(pieces),
            QuantityInput::Meters(meters) => {
                ensure_positive(meters, "meters")?;
                self.from_meters(meters)
            }
        };
        if quantity.tons <= 0.0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        Ok(quantity)
    }
}

pub(crate) fn ensure_positive(value: f64, what: &str) -> DomainResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DomainError::validation(format!(
            "{what} must be a positive number (got {value})"
        )))
    }
}
