//! Tenant/access resolution: map a sender's phone number to their user and
//! organization records.

use quipu_core::domain::{Organization, User};
use quipu_core::error::QuipuError;
use quipu_store::Store;
use tracing::warn;

/// Resolve a sender. `Ok(None)` means the sender is not authorized: either
/// the phone is unknown or its organization reference is broken.
pub async fn resolve(
    store: &Store,
    phone: &str,
) -> Result<Option<(User, Organization)>, QuipuError> {
    let Some(user) = store.find_user_by_phone(phone).await? else {
        return Ok(None);
    };

    match store.find_organization(&user.organization_id).await? {
        Some(org) => Ok(Some((user, org))),
        None => {
            warn!(
                "user {} references missing organization {}",
                user.id, user.organization_id
            );
            Ok(None)
        }
    }
}
