//! Cart store: ordered cart lines persisted to local storage.

use std::sync::Arc;

use chrono::Utc;

use atlantmetal_core::{CartItemId, CatalogItemId, DomainResult};
use atlantmetal_storage::KeyValueStorage;

use crate::changes::{CartChange, ChangeFeed, Subscription};
use crate::item::{CartItem, NewCartItem};
use crate::quantity::ensure_positive;

/// Storage key holding the JSON array of cart lines.
pub const DEFAULT_STORAGE_KEY: &str = "atlantmetal_cart";

/// Explicitly owned cart state.
///
/// Every mutation writes the whole collection back to storage and then
/// notifies subscribers. A failed write is logged; the in-memory cart stays
/// authoritative for the rest of the session.
pub struct CartStore {
    items: Vec<CartItem>,
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    feed: ChangeFeed<CartChange>,
}

impl core::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("items", &self.items.len())
            .finish()
    }
}

impl CartStore {
    /// Open the cart under [`DEFAULT_STORAGE_KEY`].
    pub fn open(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::open_with_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Open the cart, loading whatever was persisted under `key`.
    ///
    /// Unreadable or malformed data yields an empty cart; nothing is
    /// partially loaded.
    pub fn open_with_key(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let items = load(storage.as_ref(), &key);
        tracing::debug!(key = %key, lines = items.len(), "cart opened");
        Self {
            items,
            storage,
            key,
            feed: ChangeFeed::new(),
        }
    }

    pub fn subscribe(&self) -> Subscription<CartChange> {
        self.feed.subscribe()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|line| line.id_typed() == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Append a new line. Identical lines are never merged.
    pub fn add(&mut self, new: NewCartItem) -> DomainResult<CartItemId> {
        let line = CartItem::new(CartItemId::new(), Utc::now(), new)?;
        let id = line.id_typed();
        let catalog_id = line.item().id();
        self.items.push(line);

        tracing::debug!(%id, %catalog_id, lines = self.items.len(), "cart line added");
        self.commit(CartChange::Added { id, catalog_id });
        Ok(id)
    }

    /// Remove a line. Returns `false` (and changes nothing) if absent.
    pub fn remove(&mut self, id: CartItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|line| line.id_typed() != id);
        if self.items.len() == before {
            return false;
        }

        tracing::debug!(%id, lines = self.items.len(), "cart line removed");
        self.commit(CartChange::Removed { id });
        true
    }

    /// Set a line's tonnage and recompute pieces, meters and totals.
    ///
    /// Removing lines that fall below the minimum order step is the
    /// caller's decision. Returns `Ok(false)` if the line does not exist.
    pub fn set_quantity_tons(&mut self, id: CartItemId, tons: f64) -> DomainResult<bool> {
        ensure_positive(tons, "tons")?;

        let Some(line) = self.items.iter_mut().find(|line| line.id_typed() == id) else {
            return Ok(false);
        };
        line.apply_tons(tons);

        tracing::debug!(%id, tons, "cart line quantity changed");
        self.commit(CartChange::QuantityChanged { id, tons });
        Ok(true)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        tracing::debug!("cart cleared");
        self.commit(CartChange::Cleared);
    }

    /// Re-read the cart from storage, replacing in-memory state.
    pub fn reload(&mut self) {
        self.items = load(self.storage.as_ref(), &self.key);
        self.feed.publish(CartChange::Restored {
            lines: self.items.len(),
        });
    }

    /// Number of lines (not the sum of quantities).
    pub fn total_item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of every line's total including delivery, tenge.
    pub fn total_price(&self) -> f64 {
        self.items.iter().map(CartItem::total_with_delivery).sum()
    }

    /// Number of lines referencing a catalog item (badge count).
    pub fn count_for_catalog_item(&self, catalog_id: CatalogItemId) -> usize {
        self.items
            .iter()
            .filter(|line| line.item().id() == catalog_id)
            .count()
    }

    fn commit(&self, change: CartChange) {
        self.persist();
        self.feed.publish(change);
    }

    fn persist(&self) {
        let payload = match serde_json::to_string(&self.items) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!("failed to serialize cart: {err}");
                return;
            }
        };
        if let Err(err) = self.storage.set(&self.key, &payload) {
            tracing::error!(key = %self.key, "failed to persist cart: {err}");
        }
    }
}

fn load(storage: &dyn KeyValueStorage, key: &str) -> Vec<CartItem> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::warn!(key, "failed to read persisted cart, starting empty: {err}");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<CartItem>>(&raw) {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(key, "failed to parse persisted cart, starting empty: {err}");
            Vec::new()
        }
    }
}
