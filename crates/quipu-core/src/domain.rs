//! Domain entities: organizations, users, transactions, and the closed
//! language/currency/category sets that govern them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Languages an organization can report in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
}

impl Language {
    /// Parse a user-supplied language code, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

/// Settlement currencies an organization can be configured with.
///
/// Individual transactions may carry any 3-letter code the user types;
/// only the organization's reporting currency is drawn from this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Cop,
    Usd,
    Eur,
}

impl Currency {
    /// Parse a user-supplied currency code, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "COP" => Some(Self::Cop),
            "USD" => Some(Self::Usd),
            "EUR" => Some(Self::Eur),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cop => "COP",
            Self::Usd => "USD",
            Self::Eur => "EUR",
        }
    }
}

/// Transaction categories. Expenses credit the account (negative sense),
/// income debits it (positive sense).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Essential,
    NonEssential,
    Income,
}

impl Category {
    /// Sign multiplier applied to the user-entered amount.
    pub fn sense(&self) -> f64 {
        match self {
            Self::Income => 1.0,
            Self::Essential | Self::NonEssential => -1.0,
        }
    }

    /// The leading keyword the user types to record this category.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Essential => "ess",
            Self::NonEssential => "non",
            Self::Income => "inc",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Essential => "🌽",
            Self::NonEssential => "🍔",
            Self::Income => "💸",
        }
    }

    /// The label persisted on transaction rows.
    pub fn stored_label(&self) -> &'static str {
        match self {
            Self::Essential => "Essential",
            Self::NonEssential => "Non essential",
            Self::Income => "Income",
        }
    }

    /// Inverse of [`stored_label`](Self::stored_label).
    pub fn from_stored_label(s: &str) -> Option<Self> {
        match s {
            "Essential" => Some(Self::Essential),
            "Non essential" => Some(Self::NonEssential),
            "Income" => Some(Self::Income),
            _ => None,
        }
    }
}

/// A tenant: a group of users sharing one currency/language configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub language: Language,
    pub currency: Currency,
}

/// A sender bound to exactly one organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub organization_id: String,
    pub created_at: DateTime<Utc>,
    /// E.164 phone number, unique across all organizations.
    pub phone: String,
    /// Display name, may be empty until the user sets one.
    pub name: String,
    pub is_admin: bool,
}

/// An immutable financial event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub category: Category,
    /// Signed amount in the stated currency (income positive, expenses negative).
    pub amount: f64,
    /// Currency the user stated, not necessarily the organization's.
    pub currency: String,
    /// Signed amount restated in the organization's settlement currency.
    pub converted: f64,
    pub description: String,
}
