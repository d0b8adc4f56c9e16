//! Format helpers for strings with interpolation.

use super::{category_label, t};
use quipu_core::domain::{Category, Language, Organization};

/// Render a monetary value with two decimals and thousands separators:
/// `$34,500.00`. Negative values keep their sign: `$-120.50`.
pub fn money(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("${sign}{grouped}.{dec_part}")
}

/// Wrap an error body in the standard error frame.
pub fn error_frame(lang: Language, body: &str) -> String {
    match lang {
        Language::En => {
            format!("🚫 {body}. Try again 🙏🏻 or use the ```help``` command for more info ℹ️.")
        }
        Language::Es => format!(
            "🚫 {body}. Intenta otra vez 🙏🏻 o usa el comando ```help``` para obtener más información ℹ️."
        ),
    }
}

/// Fixed bilingual notice for senders not bound to any organization.
pub fn unauthorized(phone: &str) -> String {
    format!(
        "🇬🇧\n\
         🚫 Your WhatsApp phone number 📞 {phone} is not part of an authorized organization.\n\
         🙏🏻 Please ask an admin to add you, or create your own organization with the ```org``` command.\
         \n\n\
         🇪🇸\n\
         🚫 Tu número de teléfono de WhatsApp 📞 {phone} no es parte de una organización autorizada.\n\
         🙏🏻 Por favor pide a un administrador que te agregue, o crea tu propia organización con el comando ```org```."
    )
}

/// "Command not valid" notice, echoing the raw message body.
pub fn unsupported_command(lang: Language, body: &str) -> String {
    let inner = match lang {
        Language::En => format!("The command (message body) \"{body}\" is not valid"),
        Language::Es => format!("El comando (cuerpo del mensaje) \"{body}\" no es válido"),
    };
    error_frame(lang, &inner)
}

/// Transaction-command body with too few tokens.
pub fn length_error(lang: Language, body: &str) -> String {
    match lang {
        Language::En => {
            format!("Command \"{body}\" should have at least 2 spaces to record a transaction")
        }
        Language::Es => format!(
            "El comando \"{body}\" debe tener al menos 2 espacios para registrar una transacción"
        ),
    }
}

/// Second token of a transaction command did not parse as a number.
pub fn value_error(lang: Language, token: &str) -> String {
    match lang {
        Language::En => {
            format!("Second element of the command should be a numerical transaction value: {token}")
        }
        Language::Es => {
            format!("El segundo elemento del comando debe ser un valor transaccional numérico: {token}")
        }
    }
}

/// Unknown language code in the org command.
pub fn config_language_error(lang: Language, token: &str) -> String {
    match lang {
        Language::En => format!("Language \"{token}\" is not supported (en, es)"),
        Language::Es => format!("El idioma \"{token}\" no está soportado (en, es)"),
    }
}

/// Unknown currency code in the org command.
pub fn config_currency_error(lang: Language, token: &str) -> String {
    match lang {
        Language::En => format!("Currency \"{token}\" is not supported (COP, USD, EUR)"),
        Language::Es => format!("La moneda \"{token}\" no está soportada (COP, USD, EUR)"),
    }
}

/// Phone number that is not `+` followed by 1–15 digits.
pub fn invalid_phone(lang: Language, token: &str) -> String {
    match lang {
        Language::En => format!(
            "Phone number \"{token}\" is not valid, use +<country code><number>, e.g. +573001112233"
        ),
        Language::Es => format!(
            "El número de teléfono \"{token}\" no es válido, usa +<código de país><número>, p. ej. +573001112233"
        ),
    }
}

/// Phone number that already belongs to a user.
pub fn added_user_exists(lang: Language, phone: &str) -> String {
    match lang {
        Language::En => format!("The number {phone} already belongs to an organization"),
        Language::Es => format!("El número {phone} ya pertenece a una organización"),
    }
}

/// Successful transaction confirmation.
pub fn transaction_recorded(
    lang: Language,
    category: Category,
    currency: &str,
    amount: f64,
    description: &str,
) -> String {
    format!(
        "✅ {} 🎉\n\
         \t❓ {}: {} {}\n\
         \t🤑 {}: {currency} {}\n\
         \t🔍 {}: {description}\n",
        t("recorded", lang),
        t("type_label", lang),
        category.emoji(),
        category_label(lang, category),
        t("value_label", lang),
        money(amount.abs()),
        t("description_label", lang),
    )
}

/// Secondary line shown when the stated and converted amounts differ.
pub fn converted_line(lang: Language, currency: &str, amount: f64) -> String {
    format!(
        "\t🌎 {}: {currency} {}\n",
        t("converted_label", lang),
        money(amount.abs())
    )
}

/// Usage text for one transaction command, shown in the help menu.
pub fn transaction_help(lang: Language, category: Category, org_currency: &str) -> String {
    let keyword = category.keyword();
    let label = category_label(lang, category);
    let emoji = category.emoji();
    match lang {
        Language::En => format!(
            "📲 ```{keyword} <value> <description>```\n\
             Record a transaction of type {label} {emoji}. \
             Add ```-CURRENCY``` if the transaction's currency is not {org_currency}, \
             for example ```{keyword}-usd``` 🇺🇸. \
             The app will automatically 🪄 convert it to {org_currency}.\n\
             💡 Examples:\n\
             ```{keyword} 3600 a sample transaction```\n\
             ```{keyword}-usd 87 a transaction in USD```"
        ),
        Language::Es => format!(
            "📲 ```{keyword} <valor> <descripción>```\n\
             Registra una transacción de tipo {label} {emoji}. \
             Agrega ```-MONEDA``` si la moneda de la transacción no es {org_currency}, \
             por ejemplo ```{keyword}-usd``` 🇺🇸. \
             La aplicación automáticamente 🪄 la va a convertir a {org_currency}.\n\
             💡 Ejemplos:\n\
             ```{keyword} 3600 una transacción de prueba```\n\
             ```{keyword}-usd 87 una transacción en USD```"
        ),
    }
}

/// Intro of the help menu, greeting the user with the organization's info.
pub fn help_intro(org: &Organization, user_name: &str) -> String {
    let lang = org.language;
    let hello = match lang {
        Language::En => "Hello",
        Language::Es => "¡Hola",
    };
    let info = match lang {
        Language::En => "This is the info of",
        Language::Es => "Ésta es la información de",
    };
    let greeted = if user_name.is_empty() { "👋" } else { user_name };
    format!(
        "👋 {hello} {greeted}!\n\
         {info} {} 🧙‍♀️:\n\
         \t🇬🇧🇪🇸 {}: {}\n\
         \t🌎 {}: {}\n\n\
         👻 {} 🤔:\n\n\
         📲 ```help```\n\
         {} 🥶.\n\n",
        org.name,
        t("language_label", lang),
        org.language.as_str(),
        t("currency_label", lang),
        org.currency.as_str(),
        t("help_greeting", lang),
        t("help_menu_entry", lang),
    )
}

/// Frame of the financial report: greeting, monthly totals, top expenses.
pub fn report(org: &Organization, monthly_block: &str, top_block: &str) -> String {
    let lang = org.language;
    match lang {
        Language::En => format!(
            "Hello {}!\n\
             *🤓 This is the financial report of {} in the currency {} 💵📊.*\n\n\n\
             *_{} 📅💯:_*\n\
             {monthly_block}\n\n\
             *_🙀 {} 🔝🚨:_*\n\
             {top_block}",
            org.name,
            org.name,
            org.currency.as_str(),
            t("monthly_totals", lang),
            t("top_expenses", lang),
        ),
        Language::Es => format!(
            "¡Hola {}!\n\
             *🤓 Éste es el reporte financiero de {} en la moneda {} 💵📊.*\n\n\n\
             *_{} 📅💯:_*\n\
             {monthly_block}\n\n\
             *_🙀 {} 🔝🚨:_*\n\
             {top_block}",
            org.name,
            org.name,
            org.currency.as_str(),
            t("monthly_totals", lang),
            t("top_expenses", lang),
        ),
    }
}

/// Confirmation after creating an organization.
pub fn org_created(org: &Organization) -> String {
    match org.language {
        Language::En => format!(
            "🎉 Organization \"{}\" created! You are its admin.\n\
             \t🇬🇧🇪🇸 Language: {}\n\
             \t🌎 Currency: {}\n\
             Type ```help``` to see what you can do 🧙‍♀️.",
            org.name,
            org.language.as_str(),
            org.currency.as_str(),
        ),
        Language::Es => format!(
            "🎉 ¡Organización \"{}\" creada! Eres su administrador.\n\
             \t🇬🇧🇪🇸 Idioma: {}\n\
             \t🌎 Moneda: {}\n\
             Escribe ```help``` para ver lo que puedes hacer 🧙‍♀️.",
            org.name,
            org.language.as_str(),
            org.currency.as_str(),
        ),
    }
}

/// Confirmation after updating an organization's configuration.
pub fn org_updated(org: &Organization) -> String {
    match org.language {
        Language::En => format!(
            "✅ Organization updated!\n\
             \t✏️ Name: {}\n\
             \t🇬🇧🇪🇸 Language: {}\n\
             \t🌎 Currency: {}",
            org.name,
            org.language.as_str(),
            org.currency.as_str(),
        ),
        Language::Es => format!(
            "✅ ¡Organización actualizada!\n\
             \t✏️ Nombre: {}\n\
             \t🇬🇧🇪🇸 Idioma: {}\n\
             \t🌎 Moneda: {}",
            org.name,
            org.language.as_str(),
            org.currency.as_str(),
        ),
    }
}

/// Confirmation after the user changes their display name.
pub fn name_updated(lang: Language, name: &str) -> String {
    match lang {
        Language::En => format!("✅ Nice to meet you, {name}! 👋"),
        Language::Es => format!("✅ ¡Mucho gusto, {name}! 👋"),
    }
}

/// Confirmation after inviting a new member.
pub fn user_added(lang: Language, phone: &str, org_name: &str) -> String {
    match lang {
        Language::En => {
            format!("✅ {phone} is now part of {org_name}! 🎉 A welcome message is on its way 📲.")
        }
        Language::Es => {
            format!("✅ ¡{phone} ahora es parte de {org_name}! 🎉 Un mensaje de bienvenida va en camino 📲.")
        }
    }
}

/// Body of the welcome message delivered to an invited phone number.
pub fn welcome(lang: Language, org_name: &str) -> String {
    match lang {
        Language::En => format!(
            "👋 Welcome to {org_name}! 🎉\n\
             You can now record transactions and ask for reports here.\n\
             Type ```help``` to see what you can do 🧙‍♀️."
        ),
        Language::Es => format!(
            "👋 ¡Bienvenido a {org_name}! 🎉\n\
             Ya puedes registrar transacciones y pedir reportes aquí.\n\
             Escribe ```help``` para ver lo que puedes hacer 🧙‍♀️."
        ),
    }
}
