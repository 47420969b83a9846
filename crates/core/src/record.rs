//! Loosely-typed records as returned by the backend.
//!
//! Resources are described by field tables rather than one struct per
//! entity, so a fetched row is kept as its JSON object. Accessors turn the
//! common value shapes (strings, numbers, nulls) into form-ready text.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::locale::Locale;
use crate::markup::TrustedMarkup;
use crate::types::DbId;

/// One backend row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub Map<String, Value>);

impl Record {
    /// Server-assigned identifier. Accepts numbers and numeric strings.
    pub fn id(&self) -> Option<DbId> {
        self.foreign_id("id")
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Field rendered as form text: strings verbatim, numbers and booleans
    /// in their display form, `null`/missing as the empty string.
    pub fn text(&self, field: &str) -> String {
        match self.0.get(field) {
            Some(value) => value_to_text(value),
            None => String::new(),
        }
    }

    /// The `{base}_{locale}` triple of this record (or `{locale}` when
    /// `base` is empty), as trusted markup.
    pub fn localized(&self, base: &str, locale: Locale) -> TrustedMarkup {
        let name = localized_name(base, locale);
        TrustedMarkup::from_server(self.text(&name))
    }

    /// Identifier of a foreign-key field, if present and numeric.
    pub fn foreign_id(&self, field: &str) -> Option<DbId> {
        match self.0.get(field)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Record(map)
    }
}

/// Wire name of a locale-triple field.
pub fn localized_name(base: &str, locale: Locale) -> String {
    if base.is_empty() {
        locale.code().to_string()
    } else {
        format!("{base}_{}", locale.code())
    }
}

pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Convert a stored timestamp into the `YYYY-MM-DD` form a date input
/// expects.
///
/// RFC 3339 timestamps are converted to their UTC calendar date. Plain
/// dates pass through, naive date-times drop their time part. Returns
/// `None` when the value cannot be read as a date; an empty input yields
/// an empty date.
pub fn to_input_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(String::new());
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc).date_naive().format("%Y-%m-%d").to_string());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.format("%Y-%m-%d").to_string());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date().format("%Y-%m-%d").to_string());
        }
    }
    None
}
