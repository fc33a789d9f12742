//! Normalization of the API success payload into [`SubsidyResult`].
//!
//! The external API is inconsistent about which fields it populates: newer
//! revisions send top-level aggregates, older ones only per-line detail,
//! numbers arrive as JSON numbers, plain strings, comma-decimal strings or
//! boxed `{"doubleValue": ...}` objects. The extractor absorbs all of that
//! behind one rule set with explicit defaults, and recovers missing
//! aggregates from line-item sums.
//!
//! Extraction never fails. An internal fault (a body or line item that is
//! not a JSON object) degrades to a minimal result derived from the
//! `status` field alone. This is a deliberate best-effort contract: callers
//! never see an extraction crash.

use std::fmt;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::{
    connector::models::{SubsidyLineItem, SubsidyResult, SubsidyUser},
    observe::Observe,
};

/// Name used for line items the API sends without one.
pub const UNKNOWN_ITEM_NAME: &str = "unknown item";

/// Display name used on the degraded extraction path.
const UNIDENTIFIED_CUSTOMER: &str = "unidentified customer";

/// Coerces any JSON value to a decimal, never failing.
///
/// Accepted shapes, in order: JSON numbers (through their decimal string
/// form, preserving precision), strings with either `.` or `,` as decimal
/// separator, and objects boxing the number under a `doubleValue` key.
/// Anything unparsable coerces to zero.
pub(crate) fn coerce_decimal(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim().replace(',', ".").as_str()),
        Value::Object(map) => map.get("doubleValue").map_or(Decimal::ZERO, coerce_decimal),
        _ => Decimal::ZERO,
    }
}

fn parse_decimal(s: &str) -> Decimal {
    s.parse()
        .or_else(|_| Decimal::from_scientific(s))
        .unwrap_or(Decimal::ZERO)
}

/// Normalizes API success payloads into [`SubsidyResult`] values.
pub struct SubsidyExtractor<'a> {
    observer: &'a dyn Observe,
}

impl<'a> SubsidyExtractor<'a> {
    /// Creates an extractor reporting degradations to `observer`.
    #[must_use]
    pub fn new(observer: &'a dyn Observe) -> Self {
        Self { observer }
    }

    /// Extracts the canonical result from a parsed response body.
    ///
    /// Infallible: any internal fault degrades to the minimal result
    /// instead of propagating.
    #[must_use]
    pub fn extract(&self, body: &Value) -> SubsidyResult {
        match extract_inner(body) {
            Ok(result) => result,
            Err(fault) => {
                self.observer.extraction_degraded(&fault);
                minimal_result(body)
            }
        }
    }
}

impl fmt::Debug for SubsidyExtractor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubsidyExtractor").finish_non_exhaustive()
    }
}

fn extract_inner(body: &Value) -> Result<SubsidyResult, String> {
    let map = body
        .as_object()
        .ok_or_else(|| "response body is not a JSON object".to_owned())?;

    let mut result = SubsidyResult {
        valid: status_is_success(body),
        message: string_field(body, "message"),
        ..SubsidyResult::default()
    };

    if let Some(v) = map.get("amountCharged") {
        result.employee_share = coerce_decimal(v);
    }
    if let Some(v) = map.get("remainingBalance") {
        result.balance_after = coerce_decimal(v);
    }
    if let Some(v) = map.get("montantTotal") {
        result.total_amount = coerce_decimal(v);
    }
    if let Some(v) = map.get("partPatronale") {
        result.employer_share = coerce_decimal(v);
    }
    if let Some(v) = map.get("soldeActuel") {
        result.balance_before = coerce_decimal(v);
    }

    result.user = SubsidyUser {
        last_name: string_field(body, "utilisateurNom"),
        first_name: string_field(body, "utilisateurPrenom"),
        email: string_field(body, "utilisateurEmail"),
        category: string_field(body, "utilisateurCategorie"),
        full_name: string_field(body, "utilisateurNomComplet"),
    };

    if let Some(v) = map.get("transactionId") {
        let transaction_id = coerce_ident(v);
        result.transaction_id = transaction_id.clone();
        result.id_transaction = transaction_id.clone();
        result.id = transaction_id;
    }

    if let Some(articles) = map.get("articles").and_then(Value::as_array) {
        result.line_items = articles
            .iter()
            .map(line_item_from)
            .collect::<Result<Vec<_>, _>>()?;
    }

    // The API does not always populate the top-level aggregates,
    // particularly in earlier revisions; recover them from the lines.
    if result.total_amount.is_zero() && !result.line_items.is_empty() {
        let total: Decimal = result.line_items.iter().map(|item| item.total_amount).sum();
        let subsidy: Decimal = result.line_items.iter().map(|item| item.subsidy_amount).sum();

        result.total_amount = total;
        result.employer_share = subsidy;

        if result.employee_share.is_zero() {
            result.employee_share = total - subsidy;
        }
        if result.balance_before.is_zero() {
            result.balance_before = result.balance_after + result.employee_share;
        }
    }

    Ok(result)
}

fn line_item_from(article: &Value) -> Result<SubsidyLineItem, String> {
    let map = article
        .as_object()
        .ok_or_else(|| "line item is not a JSON object".to_owned())?;

    Ok(SubsidyLineItem {
        external_id: map.get("odooId").and_then(Value::as_i64),
        name: map
            .get("nom")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_ITEM_NAME)
            .to_owned(),
        quantity: decimal_field(map, "quantite"),
        unit_price: decimal_field(map, "prixUnitaire"),
        total_amount: decimal_field(map, "montantTotal"),
        subsidy_amount: decimal_field(map, "subventionTotale"),
        employee_share: decimal_field(map, "partSalariale"),
        subsidized_quantity: decimal_field(map, "quantiteAvecSubvention"),
        unsubsidized_quantity: decimal_field(map, "quantiteSansSubvention"),
    })
}

fn decimal_field(map: &serde_json::Map<String, Value>, key: &str) -> Decimal {
    map.get(key).map_or(Decimal::ZERO, coerce_decimal)
}

fn string_field(body: &Value, key: &str) -> String {
    body.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

fn status_is_success(body: &Value) -> bool {
    body.get("status").and_then(Value::as_str) == Some("success")
}

fn coerce_ident(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Fallback result when extraction hits an internal fault: validity from the
/// `status` field alone, empty collections, sentinel display name.
fn minimal_result(body: &Value) -> SubsidyResult {
    SubsidyResult {
        valid: status_is_success(body),
        message: string_field(body, "message"),
        user: SubsidyUser {
            full_name: UNIDENTIFIED_CUSTOMER.to_owned(),
            ..SubsidyUser::default()
        },
        ..SubsidyResult::default()
    }
}
