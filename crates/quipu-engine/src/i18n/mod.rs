//! Internationalization — localized strings for command replies.
//!
//! Uses a simple `t(key, lang)` function for static captions and
//! `format_*()`-style helpers (in [`format`]) for strings with
//! interpolation. Supported languages: English and Spanish; the
//! organization's configured language picks the variant, there is no
//! fallback chain. The typed helpers make a missing slot a compile error.

mod format;


pub use format::*;

use quipu_core::domain::{Category, Language};

/// Fixed bilingual notice for sender-lookup or storage failures. Both
/// languages are included because the failure may have prevented learning
/// the sender's preference.
pub const UNEXPECTED_MSG: &str = "🇬🇧\n\
     🚫 Unexpected error. 🙏🏻 Please contact the app owner.\
     \n\n\
     🇪🇸\n\
     🚫 Error inesperado. 🙏🏻 Favor contactar al dueño de la app.";

/// Return a localized static caption for `key`.
pub fn t(key: &str, lang: Language) -> &'static str {
    match key {
        // --- Transaction replies ---
        "recorded" => match lang {
            Language::En => "Successfully recorded transaction!",
            Language::Es => "¡Transacción registrada exitosamente!",
        },
        "type_label" => match lang {
            Language::En => "Type",
            Language::Es => "Tipo",
        },
        "value_label" => match lang {
            Language::En => "Value",
            Language::Es => "Valor",
        },
        "converted_label" => match lang {
            Language::En => "Value (converted)",
            Language::Es => "Valor (convertido)",
        },
        "description_label" => match lang {
            Language::En => "Description",
            Language::Es => "Descripción",
        },

        // --- Report captions ---
        "monthly_totals" => match lang {
            Language::En => "Monthly totals",
            Language::Es => "Totales mensuales",
        },
        "top_expenses" => match lang {
            Language::En => "These are the top expenses this month",
            Language::Es => "Éstos son los gastos más altos del mes",
        },
        "savings" => match lang {
            Language::En => "Savings",
            Language::Es => "Ahorros",
        },
        "expenses" => match lang {
            Language::En => "Expenses",
            Language::Es => "Gastos",
        },

        // --- Help menu ---
        "help_greeting" => match lang {
            Language::En => "You asked for help! Here is what you can type",
            Language::Es => "¡Pediste ayuda! Esto es lo que puedes escribir",
        },
        "help_menu_entry" => match lang {
            Language::En => "Show this help menu",
            Language::Es => "Muestra este menú de ayuda",
        },
        "language_label" => match lang {
            Language::En => "Language",
            Language::Es => "Idioma",
        },
        "currency_label" => match lang {
            Language::En => "Currency",
            Language::Es => "Moneda",
        },
        "report_help" => match lang {
            Language::En => "Type this to get a financial report of your transactions",
            Language::Es => {
                "Usa este comando para obtener el reporte financiero de tus transacciones"
            }
        },
        "org_help" => match lang {
            Language::En => {
                "Create your organization, or update its language, currency, and name \
                 if you are the admin"
            }
            Language::Es => {
                "Crea tu organización, o actualiza su idioma, moneda y nombre \
                 si eres el administrador"
            }
        },
        "name_help" => match lang {
            Language::En => "Set the display name used to greet you",
            Language::Es => "Define el nombre con el que te saludamos",
        },
        "add_help" => match lang {
            Language::En => "Invite a phone number to your organization (admins only)",
            Language::Es => "Invita un número de teléfono a tu organización (sólo administradores)",
        },

        // --- Validation errors ---
        "negative_error" => match lang {
            Language::En => "Value should be greater than 0",
            Language::Es => "El valor debe ser mayor a 0",
        },
        "config_length" => match lang {
            Language::En => "The org command needs a language, a currency, and a name",
            Language::Es => "El comando org necesita un idioma, una moneda y un nombre",
        },
        "name_length" => match lang {
            Language::En => "The name command needs the new name",
            Language::Es => "El comando name necesita el nuevo nombre",
        },
        "add_length" => match lang {
            Language::En => "The add command needs the phone number to invite",
            Language::Es => "El comando add necesita el número de teléfono a invitar",
        },
        "not_admin" => match lang {
            Language::En => "Only your organization's admin can do this",
            Language::Es => "Sólo el administrador de tu organización puede hacer esto",
        },
        "delivery_failed" => match lang {
            Language::En => "The invitation could not be delivered, so the user was not added",
            Language::Es => "La invitación no pudo ser entregada, así que el usuario no fue agregado",
        },

        _ => "???",
    }
}

/// Localized category label shown next to the category emoji.
pub fn category_label(lang: Language, category: Category) -> &'static str {
    match category {
        Category::Essential => match lang {
            Language::En => "Essential",
            Language::Es => "Esencial",
        },
        Category::NonEssential => match lang {
            Language::En => "Non essential",
            Language::Es => "No esencial",
        },
        Category::Income => match lang {
            Language::En => "Income",
            Language::Es => "Ingreso",
        },
    }
}

/// Localized month name, 1-indexed. Out-of-range months render as `?`.
pub fn month_name(lang: Language, month: u32) -> &'static str {
    const EN: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    const ES: [&str; 12] = [
        "Enero",
        "Febrero",
        "Marzo",
        "Abril",
        "Mayo",
        "Junio",
        "Julio",
        "Agosto",
        "Septiembre",
        "Octubre",
        "Noviembre",
        "Diciembre",
    ];

    let table = match lang {
        Language::En => &EN,
        Language::Es => &ES,
    };
    match month {
        1..=12 => table[(month - 1) as usize],
        _ => "?",
    }
}
