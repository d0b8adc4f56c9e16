//! Membership commands: `name <name...>` and `add <phone>`.

use super::{CommandContext, CommandError};
use crate::i18n;
use quipu_core::domain::{Organization, User};
use tracing::{error, info, warn};

/// What a successful set-name execution hands to its render step.
#[derive(Debug, Clone, PartialEq)]
pub struct SetNameOutcome {
    pub name: String,
}

/// Update the calling user's display name. Any member may do this.
pub async fn set_name(
    ctx: &CommandContext<'_>,
    user: &User,
    body: &str,
) -> Result<SetNameOutcome, CommandError> {
    let tokens: Vec<&str> = body.split(' ').collect();
    if tokens.len() < 2 {
        return Err(CommandError::NameLength);
    }

    let name = tokens[1..].join(" ");

    ctx.store
        .update_user_name(&user.id, &name)
        .await
        .map_err(|e| {
            error!("failed to rename user {}: {e}", user.id);
            CommandError::Internal
        })?;

    Ok(SetNameOutcome { name })
}

pub fn render_set_name(org: &Organization, outcome: &SetNameOutcome) -> String {
    i18n::name_updated(org.language, &outcome.name)
}

/// What a successful add-user execution hands to its render step.
#[derive(Debug, Clone, PartialEq)]
pub struct AddUserOutcome {
    pub phone: String,
}

/// Invite a phone number into the admin's organization.
///
/// Welcome delivery is a precondition of persistence: if the platform does
/// not accept the message, no user row is written.
pub async fn add_user(
    ctx: &CommandContext<'_>,
    org: &Organization,
    user: &User,
    body: &str,
) -> Result<AddUserOutcome, CommandError> {
    let tokens: Vec<&str> = body.split(' ').collect();
    if tokens.len() < 2 {
        return Err(CommandError::AddLength);
    }

    if !user.is_admin {
        return Err(CommandError::NotAdmin);
    }

    let phone = tokens[1];
    if !is_e164(phone) {
        return Err(CommandError::InvalidPhone {
            token: phone.to_string(),
        });
    }

    let existing = ctx.store.find_user_by_phone(phone).await.map_err(|e| {
        error!("failed to look up phone {phone}: {e}");
        CommandError::Internal
    })?;
    if existing.is_some() {
        return Err(CommandError::AddedUserExists {
            phone: phone.to_string(),
        });
    }

    let welcome = i18n::welcome(org.language, &org.name);
    ctx.delivery
        .send_welcome(phone, &welcome)
        .await
        .map_err(|e| {
            warn!("welcome delivery to {phone} failed, user not added: {e}");
            CommandError::Delivery
        })?;

    ctx.store
        .insert_user(&org.id, phone, "", false)
        .await
        .map_err(|e| {
            error!("failed to persist invited user {phone}: {e}");
            CommandError::Internal
        })?;

    info!("user {phone} added to organization {}", org.id);
    Ok(AddUserOutcome {
        phone: phone.to_string(),
    })
}

pub fn render_add_user(org: &Organization, outcome: &AddUserOutcome) -> String {
    i18n::user_added(org.language, &outcome.phone, &org.name)
}

/// `+` followed by 1 to 15 digits.
fn is_e164(phone: &str) -> bool {
    match phone.strip_prefix('+') {
        Some(digits) => {
            (1..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::is_e164;

    #[test]
    fn test_is_e164() {
        assert!(is_e164("+1234"));
        assert!(is_e164("+573001112233"));
        assert!(is_e164("+123456789012345"));
        assert!(!is_e164("+1234567890123456")); // 16 digits
        assert!(!is_e164("573001112233")); // no plus
        assert!(!is_e164("+"));
        assert!(!is_e164("+12a4"));
    }
}
