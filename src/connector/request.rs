//! Order input and canonical payment request building.
//!
//! [`RequestBuilder`] is the first pipeline stage: it validates an
//! [`OrderInput`] and shapes it into the [`PaymentRequest`] wire format.
//! The transformation is pure apart from reporting dropped lines through
//! the injected [`Observe`] capability.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{error::BuildError, observe::Observe};

/// Sentinel address used when the order carries no customer email.
pub const DEFAULT_CUSTOMER_EMAIL: &str = "unknown@example.com";

/// Order data as handed over by the calling application.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderInput {
    /// Order identifier; must be non-empty.
    pub order_id: String,
    /// Customer email; a sentinel unknown address is used when absent.
    #[serde(default)]
    pub customer_email: Option<String>,
    /// Order lines in sale order.
    #[serde(default)]
    pub lines: Vec<OrderLine>,
}

/// One order line.
///
/// Lines without a product id are dropped during request building; an
/// absent quantity defaults to 1.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct OrderLine {
    /// Product identifier in the calling application.
    #[serde(default)]
    pub product_id: Option<i64>,
    /// Quantity ordered.
    #[serde(default, alias = "qty")]
    pub quantity: Option<Decimal>,
}

/// Canonical wire-format request for the validation endpoint.
///
/// Built once per validation attempt and immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Order identifier.
    pub order_id: String,
    /// Customer block.
    pub customer: Customer,
    /// Items that survived filtering; never empty.
    pub items: Vec<RequestItem>,
}

/// Customer block of the wire format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    /// Customer email address.
    pub email: String,
}

/// One item of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestItem {
    /// Product identifier.
    pub product_id: i64,
    /// Quantity ordered.
    pub quantity: Decimal,
}

/// Shapes an [`OrderInput`] into a [`PaymentRequest`].
pub struct RequestBuilder<'a> {
    observer: &'a dyn Observe,
}

impl<'a> RequestBuilder<'a> {
    /// Creates a builder reporting diagnostics to `observer`.
    #[must_use]
    pub fn new(observer: &'a dyn Observe) -> Self {
        Self { observer }
    }

    /// Builds the canonical payment request for `order`.
    ///
    /// Lines without a product id are dropped (reported through the
    /// observer, not fatal); the build fails only when the order id is
    /// empty, no lines are present, or filtering removes every line.
    ///
    /// # Errors
    ///
    /// Returns the matching [`BuildError`] variant for each rejection.
    pub fn build(&self, order: &OrderInput) -> Result<PaymentRequest, BuildError> {
        if order.order_id.is_empty() {
            return Err(BuildError::MissingOrderId);
        }
        if order.lines.is_empty() {
            return Err(BuildError::MissingLines);
        }

        let mut items = Vec::with_capacity(order.lines.len());
        for (index, line) in order.lines.iter().enumerate() {
            match line.product_id {
                Some(product_id) => items.push(RequestItem {
                    product_id,
                    quantity: line.quantity.unwrap_or(Decimal::ONE),
                }),
                None => self.observer.line_dropped(&order.order_id, index),
            }
        }

        if items.is_empty() {
            return Err(BuildError::NoValidItems);
        }

        let email = order
            .customer_email
            .clone()
            .unwrap_or_else(|| DEFAULT_CUSTOMER_EMAIL.to_owned());

        Ok(PaymentRequest {
            order_id: order.order_id.clone(),
            customer: Customer { email },
            items,
        })
    }
}

impl fmt::Debug for RequestBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder").finish_non_exhaustive()
    }
}
