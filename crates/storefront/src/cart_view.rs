//! Cart panel view-model: line rows, quantity stepper and the order form.

use std::time::Instant;

use atlantmetal_cart::CartStore;
use atlantmetal_core::{CartItemId, DomainResult};
use atlantmetal_leads::LeadSubmitter;

use crate::checkout::{CheckoutError, CheckoutFlow, ClientContext, SubmitState};
use crate::format::{format_fixed, format_meters, format_tenge};

/// Tons added or removed by one stepper press.
pub const QUANTITY_STEP_TONS: f64 = 0.1;

/// Lines whose quantity drops below this are removed.
pub const MIN_LINE_TONS: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartPane {
    Lines,
    OrderForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityOutcome {
    Updated,
    Removed,
    /// No line with that id.
    Missing,
}

/// One rendered cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct CartRow {
    pub id: CartItemId,
    pub title: String,
    pub gost: String,
    pub branch: String,
    /// Tons, one decimal.
    pub tons: String,
    pub pieces: u64,
    pub meters: String,
    /// Line total with delivery, rounded and grouped.
    pub cost: String,
}

#[derive(Debug, Clone)]
pub struct CartView {
    open: bool,
    pane: CartPane,
    checkout: CheckoutFlow,
}

impl CartView {
    pub fn new(checkout: CheckoutFlow) -> Self {
        Self {
            open: false,
            pane: CartPane::Lines,
            checkout,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn pane(&self) -> CartPane {
        self.pane
    }

    pub fn checkout(&self) -> &CheckoutFlow {
        &self.checkout
    }

    pub fn checkout_mut(&mut self) -> &mut CheckoutFlow {
        &mut self.checkout
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Switch to the order form. Ignored for an empty cart.
    pub fn show_order_form(&mut self, cart: &CartStore) -> bool {
        if cart.is_empty() {
            return false;
        }
        self.pane = CartPane::OrderForm;
        true
    }

    pub fn back_to_cart(&mut self) {
        self.pane = CartPane::Lines;
    }

    /// Whether the empty-cart placeholder should be shown.
    pub fn shows_empty_state(&self, cart: &CartStore) -> bool {
        cart.is_empty() && matches!(self.checkout.state(), SubmitState::Idle)
    }

    pub fn rows(&self, cart: &CartStore) -> Vec<CartRow> {
        cart.items()
            .iter()
            .map(|line| CartRow {
                id: line.id_typed(),
                title: line.item().title(),
                gost: line.item().gost().to_string(),
                branch: line.item().branch().to_string(),
                tons: format_fixed(line.quantity_tons(), 1),
                pieces: line.quantity_pieces(),
                meters: format_meters(line.quantity_meters()),
                cost: format_tenge(line.total_with_delivery()),
            })
            .collect()
    }

    /// Header line, e.g. `3 товаров`.
    pub fn item_count_label(&self, cart: &CartStore) -> String {
        format!("{} товаров", cart.total_item_count())
    }

    pub fn total_label(&self, cart: &CartStore) -> String {
        format_tenge(cart.total_price())
    }

    /// Set a line to `tons`, removing it below [`MIN_LINE_TONS`].
    pub fn change_quantity(
        &mut self,
        cart: &mut CartStore,
        id: CartItemId,
        tons: f64,
    ) -> DomainResult<QuantityOutcome> {
        if tons < MIN_LINE_TONS {
            return Ok(if cart.remove(id) {
                QuantityOutcome::Removed
            } else {
                QuantityOutcome::Missing
            });
        }
        Ok(if cart.set_quantity_tons(id, tons)? {
            QuantityOutcome::Updated
        } else {
            QuantityOutcome::Missing
        })
    }

    pub fn step_up(&mut self, cart: &mut CartStore, id: CartItemId) -> DomainResult<QuantityOutcome> {
        self.step(cart, id, QUANTITY_STEP_TONS)
    }

    pub fn step_down(&mut self, cart: &mut CartStore, id: CartItemId) -> DomainResult<QuantityOutcome> {
        self.step(cart, id, -QUANTITY_STEP_TONS)
    }

    fn step(&mut self, cart: &mut CartStore, id: CartItemId, delta: f64) -> DomainResult<QuantityOutcome> {
        let Some(current) = cart.get(id).map(|line| line.quantity_tons()) else {
            return Ok(QuantityOutcome::Missing);
        };
        self.change_quantity(cart, id, current + delta)
    }

    pub fn remove_line(&mut self, cart: &mut CartStore, id: CartItemId) -> bool {
        cart.remove(id)
    }

    pub fn clear_cart(&mut self, cart: &mut CartStore) {
        cart.clear();
        self.pane = CartPane::Lines;
    }

    pub async fn submit_order(
        &mut self,
        cart: &mut CartStore,
        submitter: &dyn LeadSubmitter,
        ctx: &ClientContext,
    ) -> Result<&SubmitState, CheckoutError> {
        self.checkout.submit(cart, submitter, ctx).await
    }

    pub fn retry(&mut self) -> bool {
        self.checkout.retry()
    }

    /// Drive the post-order auto-close. Returns `true` when the panel closed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.checkout.tick(now) {
            return false;
        }
        self.pane = CartPane::Lines;
        self.open = false;
        true
    }
}
