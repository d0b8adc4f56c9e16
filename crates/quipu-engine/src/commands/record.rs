//! Record a transaction: `<label>[-<currency>] <amount> <description...>`.

use super::{CommandContext, CommandError};
use crate::i18n;
use chrono::Utc;
use quipu_core::domain::{Category, Organization, User};
use tracing::error;

/// What a successful record execution hands to its render step.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordOutcome {
    pub category: Category,
    /// Currency the user stated, uppercased.
    pub currency: String,
    /// Signed amount in the stated currency.
    pub amount: f64,
    /// Signed amount in the organization's currency.
    pub converted: f64,
    pub description: String,
}

/// Validate, convert, and persist a transaction.
pub async fn execute(
    ctx: &CommandContext<'_>,
    org: &Organization,
    user: &User,
    body: &str,
    category: Category,
) -> Result<RecordOutcome, CommandError> {
    let tokens: Vec<&str> = body.split(' ').collect();

    // Label, amount, and at least one description token.
    if tokens.len() < 3 {
        return Err(CommandError::Length {
            body: body.to_string(),
        });
    }

    let value: f64 = tokens[1].parse().map_err(|_| CommandError::Value {
        token: tokens[1].to_string(),
    })?;
    // `parse` accepts "inf" and "NaN"; neither is a transaction.
    if !value.is_finite() {
        return Err(CommandError::Value {
            token: tokens[1].to_string(),
        });
    }
    // The sign comes from the category, never from the user.
    if value <= 0.0 {
        return Err(CommandError::Negative);
    }

    // An optional `-SUFFIX` on the leading token states the currency.
    let first = tokens[0].to_ascii_lowercase();
    let currency = match first.split_once('-') {
        Some((_, suffix)) => suffix.to_ascii_uppercase(),
        None => org.currency.as_str().to_string(),
    };

    // Description keeps the casing of the original message.
    let description = tokens[2..].join(" ");

    let converted = ctx
        .converter
        .convert(value, &currency, org.currency.as_str())
        .await;

    let amount = value * category.sense();
    let converted = converted * category.sense();

    ctx.store
        .insert_transaction(
            &user.id,
            Utc::now(),
            category,
            amount,
            &currency,
            converted,
            &description,
        )
        .await
        .map_err(|e| {
            error!("failed to persist transaction for user {}: {e}", user.id);
            CommandError::Internal
        })?;

    Ok(RecordOutcome {
        category,
        currency,
        amount,
        converted,
        description,
    })
}

/// Render the confirmation, with a converted line only when the stated and
/// converted amounts differ.
pub fn render(org: &Organization, outcome: &RecordOutcome) -> String {
    let lang = org.language;
    let mut message = i18n::transaction_recorded(
        lang,
        outcome.category,
        &outcome.currency,
        outcome.amount,
        &outcome.description,
    );

    if outcome.amount != outcome.converted {
        message.push_str(&i18n::converted_line(
            lang,
            org.currency.as_str(),
            outcome.converted,
        ));
    }

    message
}
