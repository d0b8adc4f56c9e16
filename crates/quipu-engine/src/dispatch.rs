//! The dispatcher: one entry point per inbound message.
//!
//! Classify → authorize → execute → render, always producing exactly one
//! reply string. The engine is built once at startup and holds only
//! read-only state plus connection handles, so it is shared freely across
//! concurrent requests.

use crate::commands::{self, members, org, record, report, Command, CommandContext};
use crate::commands::help;
use crate::i18n;
use crate::resolver;
use chrono::{FixedOffset, Offset, Utc};
use quipu_core::domain::Language;
use quipu_core::traits::WelcomeDelivery;
use quipu_rates::Converter;
use quipu_store::Store;
use std::sync::Arc;
use tracing::{error, info, warn};

/// The command dispatch engine.
pub struct Engine {
    store: Store,
    converter: Converter,
    delivery: Arc<dyn WelcomeDelivery>,
    tz: FixedOffset,
}

impl Engine {
    /// Build an engine. An out-of-range UTC offset falls back to UTC.
    pub fn new(
        store: Store,
        converter: Converter,
        delivery: Arc<dyn WelcomeDelivery>,
        utc_offset_minutes: i32,
    ) -> Self {
        let tz = match utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
        {
            Some(tz) => tz,
            None => {
                warn!("utc_offset_minutes {utc_offset_minutes} out of range, using UTC");
                Utc.fix()
            }
        };

        Self {
            store,
            converter,
            delivery,
            tz,
        }
    }

    /// Process one inbound message and produce the single reply.
    ///
    /// Never fails from the caller's perspective: storage and collaborator
    /// errors are logged and collapsed into localized notices.
    pub async fn handle_message(&self, phone: &str, body: &str) -> String {
        let body = body.trim();
        info!("processing message from {phone}");

        let resolved = match resolver::resolve(&self.store, phone).await {
            Ok(resolved) => resolved,
            Err(e) => {
                error!("sender resolution for {phone} failed: {e}");
                return i18n::UNEXPECTED_MSG.to_string();
            }
        };

        let Some(command) = Command::first_match(body) else {
            // Without an organization there is no language preference, so
            // the unknown sender gets the bilingual notice instead.
            return match resolved {
                Some((_, org)) => i18n::unsupported_command(org.language, body),
                None => i18n::unauthorized(phone),
            };
        };

        let ctx = CommandContext {
            store: &self.store,
            converter: &self.converter,
            delivery: self.delivery.as_ref(),
            tz: self.tz,
        };

        // Configure is always authorized: it is how a sender registers. Every
        // other command requires a resolved sender, which the match below
        // enforces per variant so no arm is unreachable.
        match (command, resolved) {
            (Command::Configure, resolved) => {
                // Errors render in the org's language when known, else in the
                // language the sender asked for, else English.
                let lang = resolved
                    .as_ref()
                    .map(|(_, org)| org.language)
                    .or_else(|| body.split(' ').nth(1).and_then(Language::parse))
                    .unwrap_or(Language::En);

                let pair = resolved.as_ref().map(|(user, org)| (user, org));
                match org::execute(&ctx, pair, phone, body).await {
                    Ok(outcome) => org::render(&outcome),
                    Err(err) => commands::render_error(lang, &err),
                }
            }

            (Command::Help, Some((user, org))) => help::render(&org, &user),

            (Command::Report, Some((_, org))) => report::execute(&ctx, &org)
                .await
                .map(|outcome| report::render(&org, &outcome))
                .unwrap_or_else(|err| commands::render_error(org.language, &err)),

            (Command::Record(category), Some((user, org))) => {
                record::execute(&ctx, &org, &user, body, category)
                    .await
                    .map(|outcome| record::render(&org, &outcome))
                    .unwrap_or_else(|err| commands::render_error(org.language, &err))
            }

            (Command::SetName, Some((user, org))) => members::set_name(&ctx, &user, body)
                .await
                .map(|outcome| members::render_set_name(&org, &outcome))
                .unwrap_or_else(|err| commands::render_error(org.language, &err)),

            (Command::AddUser, Some((user, org))) => members::add_user(&ctx, &org, &user, body)
                .await
                .map(|outcome| members::render_add_user(&org, &outcome))
                .unwrap_or_else(|err| commands::render_error(org.language, &err)),

            (_, None) => i18n::unauthorized(phone),
        }
    }
}
