use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atlantmetal_catalog::PriceItem;
use atlantmetal_core::{CartItemId, DomainError, DomainResult, Entity};

use crate::quantity::{UnitConversion, ensure_positive};

/// Input to `CartStore::add`: a cart line minus its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub item: PriceItem,
    pub quantity_tons: f64,
    pub price_per_ton_tenge: f64,
    pub price_per_ton_rub: f64,
    pub delivery_price: f64,
    pub price_category: String,
}

/// One cart line.
///
/// Persisted as a camelCase JSON record; `addedAt` is an RFC 3339 string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    id: CartItemId,
    item: PriceItem,
    quantity_tons: f64,
    quantity_pieces: u64,
    quantity_meters: f64,
    price_per_ton_tenge: f64,
    price_per_ton_rub: f64,
    total_price_tenge: f64,
    total_price_rub: f64,
    delivery_price: f64,
    total_with_delivery: f64,
    price_category: String,
    added_at: DateTime<Utc>,
}

impl CartItem {
    /// Build a line, deriving pieces, meters and every total from tons.
    pub fn new(id: CartItemId, added_at: DateTime<Utc>, new: NewCartItem) -> DomainResult<Self> {
        ensure_positive(new.quantity_tons, "tons")?;
        ensure_amount(new.price_per_ton_tenge, "price per ton (tenge)")?;
        ensure_amount(new.price_per_ton_rub, "price per ton (rub)")?;
        ensure_amount(new.delivery_price, "delivery price")?;

        let mut line = Self {
            id,
            item: new.item,
            quantity_tons: 0.0,
            quantity_pieces: 0,
            quantity_meters: 0.0,
            price_per_ton_tenge: new.price_per_ton_tenge,
            price_per_ton_rub: new.price_per_ton_rub,
            total_price_tenge: 0.0,
            total_price_rub: 0.0,
            delivery_price: new.delivery_price,
            total_with_delivery: 0.0,
            price_category: new.price_category,
            added_at,
        };
        line.apply_tons(new.quantity_tons);
        Ok(line)
    }

    /// Recompute quantities and totals for a new tonnage.
    ///
    /// Price per ton and delivery price stay as they were.
    pub(crate) fn apply_tons(&mut self, tons: f64) {
        let quantity = UnitConversion::for_item(&self.item).from_tons(tons);
        self.quantity_tons = quantity.tons;
        self.quantity_pieces = quantity.pieces;
        self.quantity_meters = quantity.meters;
        self.total_price_tenge = self.price_per_ton_tenge * tons;
        self.total_price_rub = self.price_per_ton_rub * tons;
        self.total_with_delivery = self.total_price_tenge + self.delivery_price;
    }

    pub fn id_typed(&self) -> CartItemId {
        self.id
    }

    pub fn item(&self) -> &PriceItem {
        &self.item
    }

    pub fn quantity_tons(&self) -> f64 {
        self.quantity_tons
    }

    pub fn quantity_pieces(&self) -> u64 {
        self.quantity_pieces
    }

    pub fn quantity_meters(&self) -> f64 {
        self.quantity_meters
    }

    pub fn price_per_ton_tenge(&self) -> f64 {
        self.price_per_ton_tenge
    }

    pub fn price_per_ton_rub(&self) -> f64 {
        self.price_per_ton_rub
    }

    pub fn total_price_tenge(&self) -> f64 {
        self.total_price_tenge
    }

    pub fn total_price_rub(&self) -> f64 {
        self.total_price_rub
    }

    pub fn delivery_price(&self) -> f64 {
        self.delivery_price
    }

    pub fn total_with_delivery(&self) -> f64 {
        self.total_with_delivery
    }

    pub fn price_category(&self) -> &str {
        &self.price_category
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }
}

impl Entity for CartItem {
    type Id = CartItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn ensure_amount(value: f64, what: &str) -> DomainResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DomainError::validation(format!(
            "{what} must be a non-negative amount (got {value})"
        )))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use atlantmetal_catalog::{PriceItemData, PriceTier, ProductCategory};
    use atlantmetal_core::CatalogItemId;

    pub(crate) fn circle_100() -> PriceItem {
        PriceItem::try_from(PriceItemData {
            id: CatalogItemId(3),
            category: ProductCategory::Circles,
            name: "Круг".to_string(),
            size: "100".to_string(),
            grade: "40Х".to_string(),
            gost: "ГОСТ 2590-2006".to_string(),
            branch: "Шымкент".to_string(),
            weight_per_piece: 370.0,
            length_value: 6.0,
            prices: vec![PriceTier {
                category: "retail".to_string(),
                per_ton_tenge: 500_000.0,
            }],
        })
        .unwrap()
    }

    pub(crate) fn new_line(tons: f64) -> NewCartItem {
        NewCartItem {
            item: circle_100(),
            quantity_tons: tons,
            price_per_ton_tenge: 500_000.0,
            price_per_ton_rub: 90_000.0,
            delivery_price: 10_000.0,
            price_category: "retail".to_string(),
        }
    }

    #[test]
    fn new_line_derives_quantities_and_totals() {
        let line = CartItem::new(CartItemId::new(), Utc::now(), new_line(1.0)).unwrap();
        // 1000 / 370 = 2.7 -> 3 pieces, 18 m
        assert_eq!(line.quantity_pieces(), 3);
        assert_eq!(line.quantity_meters(), 18.0);
        assert_eq!(line.total_price_tenge(), 500_000.0);
        assert_eq!(line.total_price_rub(), 90_000.0);
        assert_eq!(line.total_with_delivery(), 510_000.0);
    }

    #[test]
    fn apply_tons_keeps_prices_and_delivery() {
        let mut line = CartItem::new(CartItemId::new(), Utc::now(), new_line(1.0)).unwrap();
        line.apply_tons(2.0);
        assert_eq!(line.price_per_ton_tenge(), 500_000.0);
        assert_eq!(line.delivery_price(), 10_000.0);
        assert_eq!(line.total_with_delivery(), 1_010_000.0);
        assert_eq!(line.quantity_pieces(), 5);
        assert_eq!(line.quantity_meters(), 30.0);
    }

    #[test]
    fn rejects_negative_delivery() {
        let mut input = new_line(1.0);
        input.delivery_price = -1.0;
        let err = CartItem::new(CartItemId::new(), Utc::now(), input).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rejects_zero_tons() {
        assert!(CartItem::new(CartItemId::new(), Utc::now(), new_line(0.0)).is_err());
    }

    #[test]
    fn persisted_shape_uses_camel_case_and_string_dates() {
        let line = CartItem::new(CartItemId::new(), Utc::now(), new_line(1.0)).unwrap();
        let json = serde_json::to_value(&line).unwrap();
        assert!(json["totalWithDelivery"].is_number());
        assert!(json["quantityPieces"].is_number());
        assert_eq!(json["item"]["gost"], "ГОСТ 2590-2006");
        let added_at = json["addedAt"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(added_at).is_ok());
    }
}
