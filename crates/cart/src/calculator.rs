//! Price calculator: turns a catalog pick into a cart line.

use serde::{Deserialize, Serialize};

use atlantmetal_catalog::PriceItem;
use atlantmetal_core::{DomainError, DomainResult, ValueObject};

use crate::item::NewCartItem;
use crate::quantity::{QuantityInput, UnitConversion};

/// Tenge per one rouble.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeRate(f64);

impl ValueObject for ExchangeRate {}

impl ExchangeRate {
    pub fn new(tenge_per_rub: f64) -> DomainResult<Self> {
        if tenge_per_rub.is_finite() && tenge_per_rub > 0.0 {
            Ok(Self(tenge_per_rub))
        } else {
            Err(DomainError::validation(format!(
                "exchange rate must be positive (got {tenge_per_rub})"
            )))
        }
    }

    pub fn tenge_per_rub(&self) -> f64 {
        self.0
    }

    /// Tenge to roubles, rounded to kopecks.
    pub fn to_rub(&self, tenge: f64) -> f64 {
        (tenge / self.0 * 100.0).round() / 100.0
    }
}

#[derive(Debug, Clone)]
pub struct Calculator {
    rate: ExchangeRate,
}

impl Calculator {
    pub fn new(rate: ExchangeRate) -> Self {
        Self { rate }
    }

    pub fn rate(&self) -> ExchangeRate {
        self.rate
    }

    /// Price `quantity` of `item` in the named tier and attach a delivery
    /// surcharge.
    pub fn quote(
        &self,
        item: &PriceItem,
        quantity: QuantityInput,
        price_category: &str,
        delivery_price: f64,
    ) -> DomainResult<NewCartItem> {
        let per_ton_tenge = item.price_for(price_category)?;
        let quantity = UnitConversion::for_item(item).resolve(quantity)?;
        if !(delivery_price.is_finite() && delivery_price >= 0.0) {
            return Err(DomainError::validation("delivery price must be non-negative"));
        }

        tracing::debug!(
            item = %item.id(),
            tons = quantity.tons,
            pieces = quantity.pieces,
            tier = price_category,
            "quote computed"
        );

        Ok(NewCartItem {
            item: item.clone(),
            quantity_tons: quantity.tons,
            price_per_ton_tenge: per_ton_tenge,
            price_per_ton_rub: self.rate.to_rub(per_ton_tenge),
            delivery_price,
            price_category: price_category.to_string(),
        })
    }
}
