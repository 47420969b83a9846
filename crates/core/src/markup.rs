//! Rich-text values.
//!
//! The backend stores editor output as raw HTML and the dashboard renders
//! it verbatim. The console performs no sanitization of its own, so every
//! rich-text value is wrapped in [`TrustedMarkup`] to keep the trust
//! boundary visible: the server is responsible for sanitizing markup
//! before it is stored.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Markup received from (or bound for) the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrustedMarkup(String);

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));

impl TrustedMarkup {
    /// Wrap markup that the server vouches for.
    pub fn from_server(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw markup, for renderers that inject HTML.
    pub fn as_trusted_html(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Text content with tags removed, common entities decoded, and
    /// whitespace collapsed. Used for terminal output and select labels.
    pub fn plain_text(&self) -> String {
        let stripped = TAG_RE.replace_all(&self.0, " ");
        let decoded = stripped
            .replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&");
        decoded.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl std::fmt::Display for TrustedMarkup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.plain_text())
    }
}
