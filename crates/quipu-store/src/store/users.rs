//! Membership records keyed by phone number.

use super::{decode_ts, encode_ts, Store};
use chrono::Utc;
use quipu_core::domain::User;
use quipu_core::error::QuipuError;
use uuid::Uuid;

type UserRow = (String, String, String, String, String, i64);

fn from_row(row: UserRow) -> Result<User, QuipuError> {
    let (id, organization_id, created_at, phone, name, is_admin) = row;
    Ok(User {
        id,
        organization_id,
        created_at: decode_ts(&created_at)?,
        phone,
        name,
        is_admin: is_admin != 0,
    })
}

impl Store {
    /// Create a user under an organization and return the stored record.
    pub async fn insert_user(
        &self,
        organization_id: &str,
        phone: &str,
        name: &str,
        is_admin: bool,
    ) -> Result<User, QuipuError> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            organization_id: organization_id.to_string(),
            created_at: Utc::now(),
            phone: phone.to_string(),
            name: name.to_string(),
            is_admin,
        };

        sqlx::query(
            "INSERT INTO users (id, organization_id, created_at, phone, name, is_admin) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.organization_id)
        .bind(encode_ts(user.created_at))
        .bind(&user.phone)
        .bind(&user.name)
        .bind(user.is_admin as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| QuipuError::Storage(format!("insert user failed: {e}")))?;

        Ok(user)
    }

    /// Update a user's display name and return the refreshed record.
    pub async fn update_user_name(&self, user_id: &str, name: &str) -> Result<User, QuipuError> {
        sqlx::query("UPDATE users SET name = ? WHERE id = ?")
            .bind(name)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| QuipuError::Storage(format!("update user name failed: {e}")))?;

        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, organization_id, created_at, phone, name, is_admin \
             FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| QuipuError::Storage(format!("query user failed: {e}")))?;

        row.map(from_row)
            .transpose()?
            .ok_or_else(|| QuipuError::Storage(format!("user {user_id} not found")))
    }

    /// Find a user by phone number. A phone resolves to at most one user.
    pub async fn find_user_by_phone(&self, phone: &str) -> Result<Option<User>, QuipuError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, organization_id, created_at, phone, name, is_admin \
             FROM users WHERE phone = ?",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| QuipuError::Storage(format!("query user failed: {e}")))?;

        row.map(from_row).transpose()
    }
}
