//! Localized interface messages.
//!
//! Keys use dotted namespaces (`"view.load_failed"`). Lookups fall back to
//! English when a key is missing in the requested locale, and to the key
//! itself when English has no entry either, so a lookup never panics and
//! never returns an empty string.

use crate::locale::Locale;

pub const LOAD_FAILED: &str = "view.load_failed";
pub const SAVE_FAILED: &str = "view.save_failed";
pub const DELETE_FAILED: &str = "view.delete_failed";
pub const NOT_FOUND: &str = "view.not_found";
pub const REQUIRED_FIELD: &str = "form.required_field";
pub const UNTITLED: &str = "list.untitled";
pub const EMPTY_LIST: &str = "list.empty";

const EN: &[(&str, &str)] = &[
    (LOAD_FAILED, "Failed to load data"),
    (SAVE_FAILED, "Failed to save"),
    (DELETE_FAILED, "Failed to delete"),
    (NOT_FOUND, "No data found for this record"),
    (REQUIRED_FIELD, "Please fill in the required field"),
    (UNTITLED, "Untitled"),
    (EMPTY_LIST, "Nothing here yet"),
];

const RU: &[(&str, &str)] = &[
    (LOAD_FAILED, "Ошибка при получении данных"),
    (SAVE_FAILED, "Ошибка при сохранении"),
    (DELETE_FAILED, "Ошибка при удалении"),
    (NOT_FOUND, "Данные не найдены"),
    (REQUIRED_FIELD, "Заполните обязательное поле"),
    (UNTITLED, "Без названия"),
    (EMPTY_LIST, "Пока пусто"),
];

const TK: &[(&str, &str)] = &[
    (LOAD_FAILED, "Maglumatlary almakda ýalňyşlyk"),
    (SAVE_FAILED, "Ýatda saklamakda ýalňyşlyk"),
    (DELETE_FAILED, "Pozmakda ýalňyşlyk"),
    (NOT_FOUND, "Maglumat tapylmady"),
    (REQUIRED_FIELD, "Hökmany meýdançany dolduryň"),
];

fn catalog_for(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::Tk => TK,
        Locale::En => EN,
        Locale::Ru => RU,
    }
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Translate `key` into `locale`.
///
/// ```
/// use expo_admin_core::i18n::{t, LOAD_FAILED};
/// use expo_admin_core::locale::Locale;
///
/// assert_eq!(t(Locale::Ru, LOAD_FAILED), "Ошибка при получении данных");
/// assert_eq!(t(Locale::En, LOAD_FAILED), "Failed to load data");
/// ```
pub fn t<'a>(locale: Locale, key: &'a str) -> &'a str {
    lookup(catalog_for(locale), key)
        .or_else(|| lookup(EN, key))
        .unwrap_or(key)
}
