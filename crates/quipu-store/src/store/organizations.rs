//! Tenant records.

use super::{decode_ts, encode_ts, Store};
use chrono::Utc;
use quipu_core::domain::{Currency, Language, Organization};
use quipu_core::error::QuipuError;
use uuid::Uuid;

impl Store {
    /// Create an organization and return the stored record.
    pub async fn insert_organization(
        &self,
        name: &str,
        language: Language,
        currency: Currency,
    ) -> Result<Organization, QuipuError> {
        let org = Organization {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            name: name.to_string(),
            language,
            currency,
        };

        sqlx::query(
            "INSERT INTO organizations (id, created_at, name, language, currency) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&org.id)
        .bind(encode_ts(org.created_at))
        .bind(&org.name)
        .bind(org.language.as_str())
        .bind(org.currency.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| QuipuError::Storage(format!("insert organization failed: {e}")))?;

        Ok(org)
    }

    /// Update an organization's display name, language, and currency in place.
    pub async fn update_organization(
        &self,
        org_id: &str,
        name: &str,
        language: Language,
        currency: Currency,
    ) -> Result<(), QuipuError> {
        let result = sqlx::query(
            "UPDATE organizations SET name = ?, language = ?, currency = ? WHERE id = ?",
        )
        .bind(name)
        .bind(language.as_str())
        .bind(currency.as_str())
        .bind(org_id)
        .execute(&self.pool)
        .await
        .map_err(|e| QuipuError::Storage(format!("update organization failed: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(QuipuError::Storage(format!(
                "organization {org_id} not found"
            )));
        }
        Ok(())
    }

    /// Find an organization by id.
    pub async fn find_organization(
        &self,
        org_id: &str,
    ) -> Result<Option<Organization>, QuipuError> {
        let row: Option<(String, String, String, String, String)> = sqlx::query_as(
            "SELECT id, created_at, name, language, currency FROM organizations WHERE id = ?",
        )
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| QuipuError::Storage(format!("query organization failed: {e}")))?;

        row.map(|(id, created_at, name, language, currency)| {
            Ok(Organization {
                id,
                created_at: decode_ts(&created_at)?,
                name,
                language: Language::parse(&language)
                    .ok_or_else(|| QuipuError::Storage(format!("bad language {language:?}")))?,
                currency: Currency::parse(&currency)
                    .ok_or_else(|| QuipuError::Storage(format!("bad currency {currency:?}")))?,
            })
        })
        .transpose()
    }
}
