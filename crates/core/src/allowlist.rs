//! Telegram admin allowlist records.

use serde::{Deserialize, Serialize};

use crate::record::to_input_date;
use crate::types::DbId;

/// A Telegram user allowed to administer the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramAdmin {
    pub id: DbId,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

impl TelegramAdmin {
    /// Date the admin was added, `YYYY-MM-DD`, when readable.
    pub fn added_on(&self) -> Option<String> {
        to_input_date(&self.created_at).filter(|d| !d.is_empty())
    }

    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("Not specified")
    }
}

/// Body of `POST admin/add`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewAdmin {
    pub username: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
}

/// Answer of `admin/add` and `admin/remove`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AllowlistReply {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Telegram usernames are entered without the leading `@`. Returns `None`
/// for a blank username.
pub fn normalize_username(raw: &str) -> Option<String> {
    let name = raw.trim().trim_start_matches('@').trim();
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn username_is_trimmed_and_unprefixed() {
        assert_eq!(normalize_username("  @merdan ").as_deref(), Some("merdan"));
        assert_eq!(normalize_username("aylar").as_deref(), Some("aylar"));
        assert_eq!(normalize_username(" @ "), None);
        assert_eq!(normalize_username(""), None);
    }

    #[test]
    fn new_admin_uses_camel_case_full_name() {
        let body = serde_json::to_value(NewAdmin {
            username: "a".into(),
            full_name: "B C".into(),
        })
        .unwrap();
        assert_eq!(body, json!({"username": "a", "fullName": "B C"}));
    }

    #[test]
    fn admin_row_parses_and_formats() {
        let admin: TelegramAdmin = serde_json::from_value(json!({
            "id": 1,
            "username": "merdan",
            "full_name": null,
            "created_at": "2025-03-04T08:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(admin.display_name(), "Not specified");
        assert_eq!(admin.added_on().as_deref(), Some("2025-03-04"));
    }

    #[test]
    fn reply_error_is_optional() {
        let ok: AllowlistReply = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(ok.success && ok.error.is_none());
    }
}
