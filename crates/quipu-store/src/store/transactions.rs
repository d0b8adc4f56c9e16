//! Append-only financial events.

use super::{decode_ts, encode_ts, Store};
use chrono::{DateTime, Utc};
use quipu_core::domain::{Category, Transaction};
use quipu_core::error::QuipuError;
use tracing::info;
use uuid::Uuid;

impl Store {
    /// Record a transaction and return the stored record. Transactions are
    /// never updated or deleted.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_transaction(
        &self,
        user_id: &str,
        created_at: DateTime<Utc>,
        category: Category,
        amount: f64,
        currency: &str,
        converted: f64,
        description: &str,
    ) -> Result<Transaction, QuipuError> {
        let tx = Transaction {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            created_at,
            category,
            amount,
            currency: currency.to_string(),
            converted,
            description: description.to_string(),
        };

        sqlx::query(
            "INSERT INTO transactions \
             (id, user_id, created_at, label, value, currency, value_converted, description) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&tx.id)
        .bind(&tx.user_id)
        .bind(encode_ts(tx.created_at))
        .bind(tx.category.stored_label())
        .bind(tx.amount)
        .bind(&tx.currency)
        .bind(tx.converted)
        .bind(&tx.description)
        .execute(&self.pool)
        .await
        .map_err(|e| QuipuError::Storage(format!("insert transaction failed: {e}")))?;

        info!(
            "recorded {} transaction of {} {} for user {}",
            tx.category.stored_label(),
            tx.currency,
            tx.amount,
            tx.user_id
        );

        Ok(tx)
    }

    /// List all transactions belonging to an organization's users, created
    /// at or after `since`, oldest first.
    pub async fn list_transactions(
        &self,
        organization_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, QuipuError> {
        let rows: Vec<(String, String, String, String, f64, String, f64, String)> =
            sqlx::query_as(
                "SELECT t.id, t.user_id, t.created_at, t.label, t.value, t.currency, \
                        t.value_converted, t.description \
                 FROM transactions t \
                 JOIN users u ON u.id = t.user_id \
                 WHERE u.organization_id = ? AND t.created_at >= ? \
                 ORDER BY t.created_at ASC",
            )
            .bind(organization_id)
            .bind(encode_ts(since))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| QuipuError::Storage(format!("query transactions failed: {e}")))?;

        rows.into_iter()
            .map(
                |(id, user_id, created_at, label, value, currency, value_converted, description)| {
                    Ok(Transaction {
                        id,
                        user_id,
                        created_at: decode_ts(&created_at)?,
                        category: Category::from_stored_label(&label).ok_or_else(|| {
                            QuipuError::Storage(format!("bad transaction label {label:?}"))
                        })?,
                        amount: value,
                        currency,
                        converted: value_converted,
                        description,
                    })
                },
            )
            .collect()
    }
}
