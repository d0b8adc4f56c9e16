//! Configure an organization: `org <language> <currency> <name...>`.
//!
//! The one command an unregistered sender may use — it is how a sender
//! becomes a user. An existing admin re-issuing it updates the
//! organization in place; a regular member is rejected.

use super::{CommandContext, CommandError};
use crate::i18n;
use quipu_core::domain::{Currency, Language, Organization, User};
use tracing::{error, info};

/// What a successful configure execution hands to its render step.
#[derive(Debug, Clone)]
pub enum ConfigureOutcome {
    /// Brand-new organization with the sender as first admin.
    Created { org: Organization },
    /// Existing organization reconfigured by its admin.
    Updated { org: Organization },
}

/// Validate and apply the configuration.
pub async fn execute(
    ctx: &CommandContext<'_>,
    resolved: Option<(&User, &Organization)>,
    phone: &str,
    body: &str,
) -> Result<ConfigureOutcome, CommandError> {
    let tokens: Vec<&str> = body.split(' ').collect();

    // Keyword, language, currency, and at least one name token.
    if tokens.len() < 4 {
        return Err(CommandError::ConfigLength);
    }

    let language = Language::parse(tokens[1]).ok_or_else(|| CommandError::ConfigLanguage {
        token: tokens[1].to_string(),
    })?;
    let currency = Currency::parse(tokens[2]).ok_or_else(|| CommandError::ConfigCurrency {
        token: tokens[2].to_string(),
    })?;
    let name = tokens[3..].join(" ");

    match resolved {
        // Unregistered sender: create the organization and its first admin.
        None => {
            let org = ctx
                .store
                .insert_organization(&name, language, currency)
                .await
                .map_err(|e| {
                    error!("failed to create organization: {e}");
                    CommandError::Internal
                })?;

            ctx.store
                .insert_user(&org.id, phone, "", true)
                .await
                .map_err(|e| {
                    error!("failed to create admin user for org {}: {e}", org.id);
                    CommandError::Internal
                })?;

            info!("organization {} created by {phone}", org.id);
            Ok(ConfigureOutcome::Created { org })
        }

        // Registered sender: only the admin may reconfigure.
        Some((user, org)) => {
            if !user.is_admin {
                return Err(CommandError::NotAdmin);
            }

            ctx.store
                .update_organization(&org.id, &name, language, currency)
                .await
                .map_err(|e| {
                    error!("failed to update organization {}: {e}", org.id);
                    CommandError::Internal
                })?;

            info!("organization {} reconfigured by {phone}", org.id);
            Ok(ConfigureOutcome::Updated {
                org: Organization {
                    name,
                    language,
                    currency,
                    ..org.clone()
                },
            })
        }
    }
}

/// Render the confirmation in the organization's (possibly new) language.
pub fn render(outcome: &ConfigureOutcome) -> String {
    match outcome {
        ConfigureOutcome::Created { org } => i18n::org_created(org),
        ConfigureOutcome::Updated { org } => i18n::org_updated(org),
    }
}
