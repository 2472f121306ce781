//! Storefront session: catalog, cart and views wired from configuration.

use std::sync::Arc;

use anyhow::Context;
use atlantmetal_cart::{Calculator, CartStore, ExchangeRate, QuantityInput};
use atlantmetal_catalog::Catalog;
use atlantmetal_core::{CartItemId, CatalogItemId, DomainError};
use atlantmetal_leads::{HttpLeadClient, LeadSubmitter};
use atlantmetal_storage::{FileStorage, KeyValueStorage};

use crate::browser::ProductBrowser;
use crate::cart_view::CartView;
use crate::checkout::{CheckoutError, CheckoutFlow, ClientContext, SubmitState};
use crate::config::StorefrontConfig;

pub struct Storefront {
    config: StorefrontConfig,
    catalog: Catalog,
    calculator: Calculator,
    cart: CartStore,
    submitter: Arc<dyn LeadSubmitter>,
    browser: ProductBrowser,
    cart_view: CartView,
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("catalog_items", &self.catalog.len())
            .field("cart", &self.cart)
            .field("browser", &self.browser)
            .field("cart_view", &self.cart_view)
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// Host entry point: logging, env config, file storage and the HTTP
    /// lead client.
    pub fn bootstrap() -> anyhow::Result<Self> {
        atlantmetal_observability::init();
        Self::from_config(StorefrontConfig::from_env())
    }

    pub fn from_config(config: StorefrontConfig) -> anyhow::Result<Self> {
        let storage = match &config.data_dir {
            Some(dir) => FileStorage::open(dir),
            None => FileStorage::open_default(),
        }
        .context("failed to open cart storage")?;
        let client = HttpLeadClient::new(&config.lead).context("failed to build lead client")?;

        Self::with_parts(config, Arc::new(storage), Arc::new(client))
    }

    /// Build from explicit collaborators (tests, embedded hosts).
    pub fn with_parts(
        config: StorefrontConfig,
        storage: Arc<dyn KeyValueStorage>,
        submitter: Arc<dyn LeadSubmitter>,
    ) -> anyhow::Result<Self> {
        config.validate()?;
        let catalog = Catalog::builtin().context("built-in catalog is invalid")?;
        let rate = ExchangeRate::new(config.tenge_per_rub).context("invalid exchange rate")?;
        let cart = CartStore::open_with_key(storage, config.storage_key.clone());
        let cart_view = CartView::new(CheckoutFlow::from_config(&config));

        tracing::info!(
            catalog_items = catalog.len(),
            cart_lines = cart.total_item_count(),
            "storefront ready"
        );

        Ok(Self {
            calculator: Calculator::new(rate),
            config,
            catalog,
            cart,
            submitter,
            browser: ProductBrowser::new(),
            cart_view,
        })
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    pub fn browser(&self) -> &ProductBrowser {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut ProductBrowser {
        &mut self.browser
    }

    pub fn cart_view(&self) -> &CartView {
        &self.cart_view
    }

    pub fn cart_view_mut(&mut self) -> &mut CartView {
        &mut self.cart_view
    }

    /// Quote a catalog item and add it to the cart.
    ///
    /// `price_category` falls back to the configured default tier.
    pub fn add_to_cart(
        &mut self,
        catalog_id: CatalogItemId,
        quantity: QuantityInput,
        price_category: Option<&str>,
        delivery_price: f64,
    ) -> Result<CartItemId, DomainError> {
        let item = self
            .catalog
            .get(catalog_id)
            .ok_or_else(|| DomainError::not_found(format!("catalog item {catalog_id}")))?;
        let tier = price_category.unwrap_or(&self.config.default_price_category);
        let line = self.calculator.quote(item, quantity, tier, delivery_price)?;
        self.cart.add(line)
    }

    pub async fn submit_order(&mut self, ctx: &ClientContext) -> Result<&SubmitState, CheckoutError> {
        self.cart_view
            .submit_order(&mut self.cart, self.submitter.as_ref(), ctx)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use atlantmetal_leads::RecordingSubmitter;
    use atlantmetal_storage::MemoryStorage;

    fn storefront(storage: Arc<MemoryStorage>, submitter: Arc<RecordingSubmitter>) -> Storefront {
        Storefront::with_parts(StorefrontConfig::default(), storage, submitter).unwrap()
    }

    #[test]
    fn add_to_cart_quotes_with_default_tier() {
        let mut shop = storefront(Arc::new(MemoryStorage::new()), Arc::new(RecordingSubmitter::new()));

        let id = shop
            .add_to_cart(CatalogItemId::new(3), QuantityInput::Tons(1.0), None, 10_000.0)
            .unwrap();

        let line = shop.cart().get(id).unwrap();
        assert_eq!(line.price_category(), "retail");
        assert_eq!(line.price_per_ton_tenge(), 510_000.0);
        assert_eq!(line.total_with_delivery(), 520_000.0);
        assert_eq!(shop.cart().count_for_catalog_item(CatalogItemId::new(3)), 1);
    }

    #[test]
    fn unknown_catalog_item_is_not_found() {
        let mut shop = storefront(Arc::new(MemoryStorage::new()), Arc::new(RecordingSubmitter::new()));

        let err = shop
            .add_to_cart(CatalogItemId::new(999), QuantityInput::Pieces(1), None, 0.0)
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        assert!(shop.cart().is_empty());
    }

    #[test]
    fn cart_survives_a_new_session() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let mut shop = storefront(storage.clone(), Arc::new(RecordingSubmitter::new()));
            shop.add_to_cart(CatalogItemId::new(6), QuantityInput::Meters(90.0), Some("wholesale"), 0.0)
                .unwrap();
        }

        let shop = storefront(storage, Arc::new(RecordingSubmitter::new()));
        assert_eq!(shop.cart().total_item_count(), 1);
        assert_eq!(shop.cart().items()[0].quantity_pieces(), 10);
    }

    #[test]
    fn bad_config_is_rejected() {
        let config = StorefrontConfig {
            tenge_per_rub: -1.0,
            ..StorefrontConfig::default()
        };
        let result = Storefront::with_parts(
            config,
            Arc::new(MemoryStorage::new()),
            Arc::new(RecordingSubmitter::new()),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn order_round_trip() {
        let storage = Arc::new(MemoryStorage::new());
        let submitter = Arc::new(RecordingSubmitter::new());
        let mut shop = storefront(storage.clone(), submitter.clone());

        shop.add_to_cart(CatalogItemId::new(3), QuantityInput::Tons(1.0), None, 10_000.0)
            .unwrap();
        {
            let form = shop.cart_view_mut().checkout_mut().form_mut();
            form.name = "Иван".to_string();
            form.phone = "+7 747 219 93 69".to_string();
        }

        let ctx = ClientContext {
            page_url: "https://atlantmetal.kz/".to_string(),
            user_agent: "test-agent".to_string(),
        };
        let state = shop.submit_order(&ctx).await.unwrap();
        assert!(matches!(state, SubmitState::Success { .. }));
        assert!(shop.cart().is_empty());
        assert_eq!(storage.get("atlantmetal_cart").unwrap().as_deref(), Some("[]"));

        let sent = submitter.received();
        assert_eq!(sent[0].product_data.cart_items[0].price, 520_000.0);
        assert!(sent[0].comment.contains("Общая стоимость: 520\u{a0}000 ₸"));

        shop.cart_view_mut().open();
        assert!(shop.cart_view_mut().tick(Instant::now() + Duration::from_secs(5)));
        assert!(!shop.cart_view().is_open());
    }
}
