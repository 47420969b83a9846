//! Supported content locales.
//!
//! Every user-facing text field on the backend is stored three times, once
//! per locale, with the locale code as a suffix (`name_tk`, `name_en`,
//! `name_ru`) or as the whole field name (`tk`, `en`, `ru`).

use serde::{Deserialize, Serialize};

/// Content and interface locale.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Tk,
    En,
    #[default]
    Ru,
}

impl Locale {
    /// Two-letter code, also used as the field-name suffix.
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Tk => "tk",
            Locale::En => "en",
            Locale::Ru => "ru",
        }
    }

    /// Parse a locale code. Case-insensitive, surrounding whitespace ignored.
    pub fn from_code(code: &str) -> Option<Locale> {
        match code.trim().to_ascii_lowercase().as_str() {
            "tk" => Some(Locale::Tk),
            "en" => Some(Locale::En),
            "ru" => Some(Locale::Ru),
            _ => None,
        }
    }

    /// All locales, in the order the dashboard shows its tabs.
    pub fn all() -> &'static [Locale] {
        &[Locale::Tk, Locale::En, Locale::Ru]
    }

    /// Human-readable tab label.
    pub fn label(&self) -> &'static str {
        match self {
            Locale::Tk => "Turkmen",
            Locale::En => "English",
            Locale::Ru => "Russian",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Split a locale-triple field name into its base and locale.
///
/// `"name_en"` yields `Some(("name", En))`, a bare `"ru"` yields
/// `Some(("", Ru))`, and `"link"` yields `None`.
pub fn split_localized(field: &str) -> Option<(&str, Locale)> {
    if let Some(locale) = Locale::from_code(field) {
        if field.len() == 2 {
            return Some(("", locale));
        }
    }
    let (base, suffix) = field.rsplit_once('_')?;
    let locale = Locale::from_code(suffix)?;
    if suffix.len() != 2 {
        return None;
    }
    Some((base, locale))
}
