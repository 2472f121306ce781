use serde::{Deserialize, Serialize};

use atlantmetal_core::{CatalogItemId, DomainError, DomainResult, ValueObject};

/// Product category (one tab of the product browser).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    #[default]
    Circles,
    Pipes,
    Profile,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 3] = [
        ProductCategory::Circles,
        ProductCategory::Pipes,
        ProductCategory::Profile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Circles => "circles",
            ProductCategory::Pipes => "pipes",
            ProductCategory::Profile => "profile",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProductCategory::Circles => "Стальные круги",
            ProductCategory::Pipes => "Стальные трубы",
            ProductCategory::Profile => "Профильные трубы",
        }
    }
}

impl core::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named price tier, tenge per ton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTier {
    pub category: String,
    pub per_ton_tenge: f64,
}

impl ValueObject for PriceTier {}

/// Wire/storage shape of a [`PriceItem`].
///
/// Deserializing a `PriceItem` goes through this struct so persisted records
/// are validated the same way as freshly built ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceItemData {
    pub id: CatalogItemId,
    pub category: ProductCategory,
    pub name: String,
    pub size: String,
    pub grade: String,
    pub gost: String,
    pub branch: String,
    /// Mass of one piece, kg.
    pub weight_per_piece: f64,
    /// Length of one piece, m.
    pub length_value: f64,
    #[serde(default)]
    pub prices: Vec<PriceTier>,
}

/// Catalog record: one purchasable size/grade at one branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PriceItemData", into = "PriceItemData")]
pub struct PriceItem {
    id: CatalogItemId,
    category: ProductCategory,
    name: String,
    size: String,
    grade: String,
    gost: String,
    branch: String,
    weight_per_piece: f64,
    length_value: f64,
    prices: Vec<PriceTier>,
}

impl ValueObject for PriceItem {}

impl PriceItem {
    pub fn id(&self) -> CatalogItemId {
        self.id
    }

    pub fn category(&self) -> ProductCategory {
        self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn grade(&self) -> &str {
        &self.grade
    }

    pub fn gost(&self) -> &str {
        &self.gost
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn weight_per_piece(&self) -> f64 {
        self.weight_per_piece
    }

    pub fn length_value(&self) -> f64 {
        self.length_value
    }

    pub fn prices(&self) -> &[PriceTier] {
        &self.prices
    }

    /// `name size`, as shown in cart rows and lead comments.
    pub fn title(&self) -> String {
        format!("{} {}", self.name, self.size)
    }

    /// Price per ton for the named tier.
    pub fn price_for(&self, category: &str) -> DomainResult<f64> {
        self.prices
            .iter()
            .find(|tier| tier.category == category)
            .map(|tier| tier.per_ton_tenge)
            .ok_or_else(|| {
                DomainError::not_found(format!("price tier `{category}` for item {}", self.id))
            })
    }
}

impl TryFrom<PriceItemData> for PriceItem {
    type Error = DomainError;

    fn try_from(data: PriceItemData) -> Result<Self, Self::Error> {
        if data.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if data.size.trim().is_empty() {
            return Err(DomainError::validation("size cannot be empty"));
        }
        if !(data.weight_per_piece.is_finite() && data.weight_per_piece > 0.0) {
            return Err(DomainError::validation(format!(
                "weight per piece must be positive (item {})",
                data.id
            )));
        }
        if !(data.length_value.is_finite() && data.length_value > 0.0) {
            return Err(DomainError::validation(format!(
                "unit length must be positive (item {})",
                data.id
            )));
        }
        if let Some(tier) = data
            .prices
            .iter()
            .find(|t| !(t.per_ton_tenge.is_finite() && t.per_ton_tenge >= 0.0))
        {
            return Err(DomainError::validation(format!(
                "price tier `{}` must be a non-negative amount",
                tier.category
            )));
        }

        Ok(Self {
            id: data.id,
            category: data.category,
            name: data.name,
            size: data.size,
            grade: data.grade,
            gost: data.gost,
            branch: data.branch,
            weight_per_piece: data.weight_per_piece,
            length_value: data.length_value,
            prices: data.prices,
        })
    }
}

impl From<PriceItem> for PriceItemData {
    fn from(item: PriceItem) -> Self {
        Self {
            id: item.id,
            category: item.category,
            name: item.name,
            size: item.size,
            grade: item.grade,
            gost: item.gost,
            branch: item.branch,
            weight_per_piece: item.weight_per_piece,
            length_value: item.length_value,
            prices: item.prices,
        }
    }
}
