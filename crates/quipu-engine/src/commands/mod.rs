//! The supported commands: classification, execution, and rendering.
//!
//! Commands are a closed set of variants tried in a fixed order; the first
//! whose pattern matches the leading token of the message wins, and the
//! patterns are mutually exclusive by construction. Each command module owns
//! an `execute` step (pure logic returning that command's outcome type or a
//! [`CommandError`]) and a `render` step (outcome to localized text).

pub mod help;
pub mod members;
pub mod org;
pub mod record;
pub mod report;

#[cfg(test)]
mod tests;

use crate::i18n;
use chrono::FixedOffset;
use quipu_core::domain::{Category, Language};
use quipu_core::traits::WelcomeDelivery;
use quipu_rates::Converter;
use quipu_store::Store;

/// Grouped collaborators for command execution.
pub struct CommandContext<'a> {
    pub store: &'a Store,
    pub converter: &'a Converter,
    pub delivery: &'a dyn WelcomeDelivery,
    /// Offset applied when bucketing transactions into local calendar months.
    pub tz: FixedOffset,
}

/// The closed set of supported commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Report,
    Record(Category),
    Configure,
    SetName,
    AddUser,
}

/// Dispatch order. First match wins, so this order is part of the contract,
/// even though the patterns never overlap.
pub const DISPATCH_ORDER: [Command; 8] = [
    Command::Help,
    Command::Report,
    Command::Record(Category::Essential),
    Command::Record(Category::NonEssential),
    Command::Record(Category::Income),
    Command::Configure,
    Command::SetName,
    Command::AddUser,
];

impl Command {
    /// Test this command's pattern against the leading whitespace-delimited
    /// token of the message, case-insensitively.
    pub fn matches(&self, body: &str) -> bool {
        let Some(first) = body.split_whitespace().next() else {
            return false;
        };
        let token = first.to_ascii_lowercase();

        match self {
            Self::Help => token == "help",
            Self::Report => token == "report",
            Self::Record(category) => matches_record(&token, category.keyword()),
            Self::Configure => token == "org",
            Self::SetName => token == "name",
            Self::AddUser => token == "add",
        }
    }

    /// Find the first command whose pattern matches `body`, if any.
    pub fn first_match(body: &str) -> Option<Self> {
        DISPATCH_ORDER.into_iter().find(|cmd| cmd.matches(body))
    }

    /// Usage text for the help listing; `None` excludes the command (the
    /// help command has no help of its own).
    pub fn help_text(&self, org: &quipu_core::domain::Organization) -> Option<String> {
        let lang = org.language;
        match self {
            Self::Help => None,
            Self::Report => Some(format!(
                "📲 ```report```\n{} 📊.",
                i18n::t("report_help", lang)
            )),
            Self::Record(category) => Some(i18n::transaction_help(
                lang,
                *category,
                org.currency.as_str(),
            )),
            Self::Configure => Some(format!(
                "📲 ```org <en|es> <COP|USD|EUR> <{}>```\n{} 🏡.",
                match lang {
                    Language::En => "name",
                    Language::Es => "nombre",
                },
                i18n::t("org_help", lang)
            )),
            Self::SetName => Some(format!(
                "📲 ```name <{}>```\n{} ✏️.",
                match lang {
                    Language::En => "your name",
                    Language::Es => "tu nombre",
                },
                i18n::t("name_help", lang)
            )),
            Self::AddUser => Some(format!(
                "📲 ```add <+573001112233>```\n{} 🤝.",
                i18n::t("add_help", lang)
            )),
        }
    }
}

/// `<keyword>` alone, or `<keyword>-<3 ASCII letters>` for a stated currency.
fn matches_record(token: &str, keyword: &str) -> bool {
    if token == keyword {
        return true;
    }
    match token.strip_prefix(keyword).and_then(|rest| rest.strip_prefix('-')) {
        Some(suffix) => suffix.len() == 3 && suffix.chars().all(|c| c.is_ascii_alphabetic()),
        None => false,
    }
}

/// Typed user-facing errors. Every variant renders to a localized,
/// descriptive message; the dispatcher never inspects these beyond handing
/// them to [`render_error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Transaction command with fewer than three tokens.
    Length { body: String },
    /// Transaction amount token is not a finite number.
    Value { token: String },
    /// Transaction amount is zero or negative.
    Negative,
    /// Org command with fewer than four tokens.
    ConfigLength,
    /// Org command with an unknown language code.
    ConfigLanguage { token: String },
    /// Org command with an unknown currency code.
    ConfigCurrency { token: String },
    /// Name command without a name.
    NameLength,
    /// Add command without a phone number.
    AddLength,
    /// Add command with a malformed phone number.
    InvalidPhone { token: String },
    /// Add command for a phone that already belongs to a user.
    AddedUserExists { phone: String },
    /// Admin-only command issued by a regular member.
    NotAdmin,
    /// Welcome delivery failed, so nothing was persisted.
    Delivery,
    /// Storage or other infrastructure failure; details are logged
    /// server-side, the user sees a generic notice.
    Internal,
}

/// Render a command error as the final user-facing reply.
pub fn render_error(lang: Language, error: &CommandError) -> String {
    let body = match error {
        CommandError::Length { body } => i18n::length_error(lang, body),
        CommandError::Value { token } => i18n::value_error(lang, token),
        CommandError::Negative => i18n::t("negative_error", lang).to_string(),
        CommandError::ConfigLength => i18n::t("config_length", lang).to_string(),
        CommandError::ConfigLanguage { token } => i18n::config_language_error(lang, token),
        CommandError::ConfigCurrency { token } => i18n::config_currency_error(lang, token),
        CommandError::NameLength => i18n::t("name_length", lang).to_string(),
        CommandError::AddLength => i18n::t("add_length", lang).to_string(),
        CommandError::InvalidPhone { token } => i18n::invalid_phone(lang, token),
        CommandError::AddedUserExists { phone } => i18n::added_user_exists(lang, phone),
        CommandError::NotAdmin => i18n::t("not_admin", lang).to_string(),
        CommandError::Delivery => i18n::t("delivery_failed", lang).to_string(),
        CommandError::Internal => return i18n::UNEXPECTED_MSG.to_string(),
    };
    i18n::error_frame(lang, &body)
}
