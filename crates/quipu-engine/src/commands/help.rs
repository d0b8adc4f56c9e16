//! The help menu: intro plus the usage text of every listed command.

use super::DISPATCH_ORDER;
use crate::i18n;
use quipu_core::domain::{Organization, User};

/// Render the full help menu for the user's organization.
pub fn render(org: &Organization, user: &User) -> String {
    let mut message = i18n::help_intro(org, &user.name);

    // Commands without usage text (help itself) are skipped.
    for command in DISPATCH_ORDER {
        if let Some(help) = command.help_text(org) {
            message.push_str(&help);
            message.push_str("\n\n");
        }
    }

    message
}
