//! In-memory catalog: loaded once, read-only afterwards.

use std::collections::HashSet;

use atlantmetal_core::{CatalogItemId, DomainError, DomainResult};

use crate::item::{PriceItem, PriceItemData, PriceTier, ProductCategory};

/// Ordered, immutable list of price items with unique ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    items: Vec<PriceItem>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(items: Vec<PriceItem>) -> DomainResult<Self> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id()) {
                return Err(DomainError::invariant(format!(
                    "duplicate catalog id {}",
                    item.id()
                )));
            }
        }
        tracing::debug!(items = items.len(), "catalog loaded");
        Ok(Self { items })
    }

    /// Build a catalog from raw records (e.g. a price list exported as JSON).
    pub fn from_records(records: Vec<PriceItemData>) -> DomainResult<Self> {
        let items = records
            .into_iter()
            .map(PriceItem::try_from)
            .collect::<DomainResult<Vec<_>>>()?;
        Self::new(items)
    }

    pub fn items(&self) -> &[PriceItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: CatalogItemId) -> Option<&PriceItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn by_category(&self, category: ProductCategory) -> impl Iterator<Item = &PriceItem> {
        self.items
            .iter()
            .filter(move |item| item.category() == category)
    }

    /// Distinct branches in first-seen order.
    pub fn branches(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for item in &self.items {
            if !out.contains(&item.branch()) {
                out.push(item.branch());
            }
        }
        out
    }

    /// Case-insensitive substring match on name, size, grade and gost.
    pub fn search<'a>(&'a self, query: &str) -> Vec<&'a PriceItem> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.items.iter().collect();
        }
        self.items
            .iter()
            .filter(|item| {
                [item.name(), item.size(), item.grade(), item.gost()]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// The price list shipped with the storefront.
    pub fn builtin() -> DomainResult<Self> {
        Self::from_records(builtin_records())
    }
}

#[allow(clippy::too_many_arguments)]
fn record(
    id: u32,
    category: ProductCategory,
    name: &str,
    size: &str,
    grade: &str,
    gost: &str,
    branch: &str,
    weight_per_piece: f64,
    length_value: f64,
    retail: f64,
) -> PriceItemData {
    PriceItemData {
        id: CatalogItemId(id),
        category,
        name: name.to_string(),
        size: size.to_string(),
        grade: grade.to_string(),
        gost: gost.to_string(),
        branch: branch.to_string(),
        weight_per_piece,
        length_value,
        prices: vec![
            PriceTier {
                category: "retail".to_string(),
                per_ton_tenge: retail,
            },
            // 5% below retail from 5 t.
            PriceTier {
                category: "wholesale".to_string(),
                per_ton_tenge: (retail * 0.95).round(),
            },
        ],
    }
}

fn builtin_records() -> Vec<PriceItemData> {
    use ProductCategory::*;

    vec![
        record(1, Circles, "Круг", "20", "09Г2С", "ГОСТ 2590-2006", "Алматы", 14.8, 6.0, 420_000.0),
        record(2, Circles, "Круг", "50", "ст.45", "ГОСТ 2590-2006", "Алматы", 92.5, 6.0, 455_000.0),
        record(3, Circles, "Круг", "100", "40Х", "ГОСТ 2590-2006", "Шымкент", 369.9, 6.0, 510_000.0),
        record(4, Circles, "Круг", "280", "38ХС", "ГОСТ 2590-2006", "Шымкент", 2900.4, 6.0, 446_000.0),
        record(5, Circles, "Круг", "350", "09Г2С", "ГОСТ 2590-2006", "Астана", 4534.8, 6.0, 468_000.0),
        record(6, Pipes, "Труба бесшовная", "108×6", "ст.20", "ГОСТ 8732-78", "Алматы", 135.8, 9.0, 535_000.0),
        record(7, Pipes, "Труба электросварная", "89×4", "ст.3", "ГОСТ 10704-91", "Астана", 75.4, 9.0, 398_000.0),
        record(8, Pipes, "Труба бесшовная", "57×4", "ст.20", "ГОСТ 8732-78", "Шымкент", 47.9, 9.0, 549_000.0),
        record(9, Profile, "Труба профильная", "100×100×6", "ст.3", "ГОСТ 30245-2003", "Алматы", 103.8, 6.0, 412_000.0),
        record(10, Profile, "Труба профильная", "60×60×4", "ст.3", "ГОСТ 30245-2003", "Астана", 41.8, 6.0, 405_000.0),
        record(11, Profile, "Труба профильная", "40×20×2", "ст.3", "ГОСТ 30245-2003", "Шымкент", 10.1, 6.0, 398_000.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 11);
        assert!(catalog.get(CatalogItemId(4)).is_some());
        assert!(catalog.get(CatalogItemId(404)).is_none());
    }

    #[test]
    fn every_category_has_items() {
        let catalog = Catalog::builtin().unwrap();
        for category in ProductCategory::ALL {
            assert!(catalog.by_category(category).count() > 0, "{category} is empty");
        }
    }

    #[test]
    fn wholesale_is_cheaper_than_retail() {
        let catalog = Catalog::builtin().unwrap();
        for item in catalog.items() {
            assert!(item.price_for("wholesale").unwrap() < item.price_for("retail").unwrap());
        }
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut records = builtin_records();
        records[1].id = records[0].id;
        let err = Catalog::from_records(records).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn branches_are_distinct_in_first_seen_order() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.branches(), vec!["Алматы", "Шымкент", "Астана"]);
    }

    #[test]
    fn search_matches_grade_case_insensitively() {
        let catalog = Catalog::builtin().unwrap();
        let hits = catalog.search("38хс");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id(), CatalogItemId(4));
    }

    #[test]
    fn blank_search_returns_everything() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.search("   ").len(), catalog.len());
    }

    proptest! {
        /// Property: categories partition the catalog.
        #[test]
        fn categories_partition_catalog(ids in proptest::collection::hash_set(1u32..500, 0..30)) {
            let records: Vec<_> = ids
                .iter()
                .enumerate()
                .map(|(n, id)| {
                    let category = ProductCategory::ALL[n % 3];
                    record(*id, category, "Круг", "10", "ст.3", "ГОСТ", "Алматы", 1.0, 6.0, 1.0)
                })
                .collect();
            let catalog = Catalog::from_records(records).unwrap();
            let total: usize = ProductCategory::ALL
                .iter()
                .map(|c| catalog.by_category(*c).count())
                .sum();
            prop_assert_eq!(total, catalog.len());
        }
    }
}
