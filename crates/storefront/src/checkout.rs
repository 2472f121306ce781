//! Order submission from the cart.
//!
//! `Idle -> Submitting -> Success | Error`, `Error -> Idle` on retry, and
//! `Success -> Idle` once the auto-close deadline passes.

use std::time::{Duration, Instant};

use atlantmetal_cart::CartStore;
use atlantmetal_leads::{LeadCartLine, LeadPayload, LeadSubmitter, ProductData};
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::StorefrontConfig;
use crate::format::{format_amount, format_fixed};

/// Notice shown when contact fields are blank.
pub const MISSING_CONTACT_NOTICE: &str = "Пожалуйста, заполните имя и телефон";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("{}", MISSING_CONTACT_NOTICE)]
    MissingContact,

    #[error("order is already being submitted")]
    AlreadySubmitting,

    #[error("order form is not accepting input")]
    NotReady,

    #[error("cart is empty")]
    EmptyCart,
}

/// Contact form fields, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderForm {
    pub name: String,
    pub phone: String,
    pub comment: String,
}

impl OrderForm {
    pub fn has_contact(&self) -> bool {
        !self.name.trim().is_empty() && !self.phone.trim().is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
    Success { closes_at: Instant },
    Error { message: String },
}

/// Where the order was placed from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientContext {
    pub page_url: String,
    pub user_agent: String,
}

/// Labels attached to every cart lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadLabels {
    pub form_type: String,
    pub source: String,
}

impl From<&StorefrontConfig> for LeadLabels {
    fn from(config: &StorefrontConfig) -> Self {
        Self {
            form_type: config.form_type.clone(),
            source: config.source.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckoutFlow {
    form: OrderForm,
    state: SubmitState,
    labels: LeadLabels,
    auto_close: Duration,
}

impl CheckoutFlow {
    pub fn new(labels: LeadLabels, auto_close: Duration) -> Self {
        Self {
            form: OrderForm::default(),
            state: SubmitState::Idle,
            labels,
            auto_close,
        }
    }

    pub fn from_config(config: &StorefrontConfig) -> Self {
        Self::new(LeadLabels::from(config), config.auto_close())
    }

    pub fn form(&self) -> &OrderForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut OrderForm {
        &mut self.form
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SubmitState::Submitting)
    }

    /// Validate, send the cart as a lead, and clear the cart on success.
    ///
    /// Validation failures return an error without touching state or the
    /// network. Submitter failures are not errors here: they land in
    /// [`SubmitState::Error`] with the cart left intact.
    pub async fn submit(
        &mut self,
        cart: &mut CartStore,
        submitter: &dyn LeadSubmitter,
        ctx: &ClientContext,
    ) -> Result<&SubmitState, CheckoutError> {
        match self.state {
            SubmitState::Idle => {}
            SubmitState::Submitting => return Err(CheckoutError::AlreadySubmitting),
            SubmitState::Success { .. } | SubmitState::Error { .. } => {
                return Err(CheckoutError::NotReady);
            }
        }
        if !self.form.has_contact() {
            return Err(CheckoutError::MissingContact);
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let lead = compose_lead(cart, &self.form, &self.labels, ctx, Utc::now());
        let in_flight = InFlight::enter(&mut self.state);

        let next = match submitter.submit_lead(&lead).await {
            Ok(receipt) if receipt.success => {
                tracing::info!(
                    lines = lead.product_data.cart_items.len(),
                    lead_id = ?receipt.lead_id,
                    "cart order submitted"
                );
                cart.clear();
                SubmitState::Success {
                    closes_at: Instant::now() + self.auto_close,
                }
            }
            Ok(receipt) => {
                let message = receipt
                    .error
                    .unwrap_or_else(|| "lead was not accepted".to_string());
                tracing::info!(error = %message, "cart order refused");
                SubmitState::Error { message }
            }
            Err(e) => {
                tracing::info!(error = %e, "cart order failed");
                SubmitState::Error {
                    message: e.to_string(),
                }
            }
        };
        in_flight.settle(next);
        Ok(&self.state)
    }

    /// Back to the form after a failed submission. Form fields are kept.
    pub fn retry(&mut self) -> bool {
        if matches!(self.state, SubmitState::Error { .. }) {
            self.state = SubmitState::Idle;
            true
        } else {
            false
        }
    }

    /// Finish a successful order once its deadline has passed.
    ///
    /// Returns `true` when the order closed; the form is reset.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.state {
            SubmitState::Success { closes_at } if now >= closes_at => {
                self.state = SubmitState::Idle;
                self.form.reset();
                true
            }
            _ => false,
        }
    }
}

/// Holds the flow in `Submitting` while a lead is in flight.
///
/// Dropped without [`InFlight::settle`] (the submit future was cancelled),
/// it puts the flow back to `Idle` so the order can be sent again.
struct InFlight<'a> {
    state: Option<&'a mut SubmitState>,
}

impl<'a> InFlight<'a> {
    fn enter(state: &'a mut SubmitState) -> Self {
        *state = SubmitState::Submitting;
        Self { state: Some(state) }
    }

    fn settle(mut self, next: SubmitState) {
        if let Some(state) = self.state.take() {
            *state = next;
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            tracing::warn!("cart order submission abandoned before completion");
            *state = SubmitState::Idle;
        }
    }
}

/// Build the CRM lead for the current cart.
pub fn compose_lead(
    cart: &CartStore,
    form: &OrderForm,
    labels: &LeadLabels,
    ctx: &ClientContext,
    at: DateTime<Utc>,
) -> LeadPayload {
    let lines: Vec<String> = cart
        .items()
        .iter()
        .map(|line| {
            format!(
                "{} {} - {} шт. ({} т) - {} ₸",
                line.item().name(),
                line.item().size(),
                line.quantity_pieces(),
                format_fixed(line.quantity_tons(), 2),
                format_amount(line.total_with_delivery()),
            )
        })
        .collect();

    let comment = format!(
        "{}\n\nТовары в корзине:\n{}\n\nОбщая стоимость: {} ₸",
        form.comment,
        lines.join("\n"),
        format_amount(cart.total_price()),
    );

    let cart_items = cart
        .items()
        .iter()
        .map(|line| LeadCartLine {
            name: line.item().name().to_string(),
            size: line.item().size().to_string(),
            quantity: line.quantity_pieces(),
            weight: line.quantity_tons(),
            price: line.total_with_delivery(),
            branch: line.item().branch().to_string(),
            gost: line.item().gost().to_string(),
        })
        .collect();

    LeadPayload {
        name: form.name.trim().to_string(),
        phone: form.phone.trim().to_string(),
        form_type: labels.form_type.clone(),
        comment,
        product_data: ProductData { cart_items },
        source: labels.source.clone(),
        url: ctx.page_url.clone(),
        user_agent: ctx.user_agent.clone(),
        timestamp: LeadPayload::format_timestamp(at),
    }
}
