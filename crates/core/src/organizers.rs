//! Repeatable organizer sub-records of a project form.
//!
//! Rows live in an ordered in-memory list. Removing a row only marks it
//! (soft-remove), so indices handed out earlier stay valid until the form
//! is submitted; the submit payload simply skips removed rows.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::locale::Locale;
use crate::payload::{FileAttachment, Part};
use crate::record::Record;
use crate::types::DbId;

/// Multipart name of the organizer JSON document.
pub const ORGANIZERS_PART: &str = "organizers";
/// Multipart name of each new organizer logo.
pub const ORGANIZER_LOGO_PART: &str = "organizer_logo";

/// One organizer row as the form edits it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizerDraft {
    /// Set for rows loaded from an existing project.
    pub id: Option<DbId>,
    pub organizer_tk: String,
    pub organizer_en: String,
    pub organizer_ru: String,
    /// Logo path already stored on the server.
    pub stored_logo: Option<String>,
    /// Replacement logo chosen in this form.
    pub new_logo: Option<FileAttachment>,
    removed: bool,
}

/// Wire shape of one organizer inside the `organizers` JSON part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizerEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub organizer_tk: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub organizer_en: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub organizer_ru: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer_logo: Option<String>,
}

/// Untranslated organizer names come back as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl OrganizerDraft {
    pub fn name(&self, locale: Locale) -> &str {
        match locale {
            Locale::Tk => &self.organizer_tk,
            Locale::En => &self.organizer_en,
            Locale::Ru => &self.organizer_ru,
        }
    }

    fn name_mut(&mut self, locale: Locale) -> &mut String {
        match locale {
            Locale::Tk => &mut self.organizer_tk,
            Locale::En => &mut self.organizer_en,
            Locale::Ru => &mut self.organizer_ru,
        }
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Whether the row carries anything worth sending.
    pub fn has_content(&self) -> bool {
        !self.organizer_tk.is_empty()
            || !self.organizer_en.is_empty()
            || !self.organizer_ru.is_empty()
            || self.new_logo.is_some()
            || self.stored_logo.is_some()
    }

    fn to_entry(&self) -> OrganizerEntry {
        OrganizerEntry {
            id: self.id,
            organizer_tk: self.organizer_tk.clone(),
            organizer_en: self.organizer_en.clone(),
            organizer_ru: self.organizer_ru.clone(),
            organizer_logo: self.stored_logo.clone(),
        }
    }
}

impl From<OrganizerEntry> for OrganizerDraft {
    fn from(entry: OrganizerEntry) -> Self {
        Self {
            id: entry.id,
            organizer_tk: entry.organizer_tk,
            organizer_en: entry.organizer_en,
            organizer_ru: entry.organizer_ru,
            stored_logo: entry.organizer_logo.filter(|p| !p.trim().is_empty()),
            new_logo: None,
            removed: false,
        }
    }
}

/// Ordered organizer rows with soft-remove.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizerList {
    rows: Vec<OrganizerDraft>,
}

impl OrganizerList {
    /// The initial state of an Add form: a single blank row.
    pub fn with_blank_row() -> Self {
        Self {
            rows: vec![OrganizerDraft::default()],
        }
    }

    /// Rows of an existing project. The backend sends `organizers` either
    /// as an array or as a JSON-encoded string. Rows are read one by one;
    /// an unreadable row is skipped with a warning and the others are kept.
    pub fn from_record(record: &Record) -> Self {
        let raw_rows = match record.get(ORGANIZERS_PART) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(rows)) => rows.clone(),
            Some(Value::String(raw)) if raw.trim().is_empty() => Vec::new(),
            Some(Value::String(raw)) => match serde_json::from_str::<Vec<Value>>(raw) {
                Ok(rows) => rows,
                Err(e) => {
                    tracing::warn!(error = %e, "Unreadable organizers document");
                    Vec::new()
                }
            },
            Some(other) => {
                tracing::warn!(value = %other, "Unexpected organizers value");
                Vec::new()
            }
        };

        let rows = raw_rows
            .into_iter()
            .enumerate()
            .filter_map(|(index, row)| match serde_json::from_value::<OrganizerEntry>(row) {
                Ok(entry) => Some(OrganizerDraft::from(entry)),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping unreadable organizer");
                    None
                }
            })
            .collect();
        Self { rows }
    }

    /// Append a blank row and return its index.
    pub fn add(&mut self) -> usize {
        self.rows.push(OrganizerDraft::default());
        self.rows.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&OrganizerDraft> {
        self.rows.get(index)
    }

    fn live_row(&mut self, index: usize) -> Result<&mut OrganizerDraft, CoreError> {
        match self.rows.get_mut(index) {
            Some(row) if !row.removed => Ok(row),
            Some(_) => Err(CoreError::Validation(format!(
                "organizer {index} has been removed"
            ))),
            None => Err(CoreError::Validation(format!(
                "no organizer at index {index}"
            ))),
        }
    }

    pub fn set_name(
        &mut self,
        index: usize,
        locale: Locale,
        value: impl Into<String>,
    ) -> Result<(), CoreError> {
        *self.live_row(index)?.name_mut(locale) = value.into();
        Ok(())
    }

    pub fn set_logo(&mut self, index: usize, file: FileAttachment) -> Result<(), CoreError> {
        self.live_row(index)?.new_logo = Some(file);
        Ok(())
    }

    /// Mark a row removed. Indices of the other rows are unchanged.
    pub fn soft_remove(&mut self, index: usize) -> Result<(), CoreError> {
        self.live_row(index)?.removed = true;
        Ok(())
    }

    /// Number of rows, removed ones included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows that will be submitted, in order.
    pub fn active(&self) -> impl Iterator<Item = &OrganizerDraft> {
        self.rows.iter().filter(|r| !r.removed && r.has_content())
    }

    /// Wire entries of the rows that will be submitted.
    pub fn entries(&self) -> Vec<OrganizerEntry> {
        self.active().map(OrganizerDraft::to_entry).collect()
    }

    /// Same rows as [`entries`](Self::entries), each with its row index,
    /// the index [`soft_remove`](Self::soft_remove) expects.
    pub fn indexed_entries(&self) -> Vec<(usize, OrganizerEntry)> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.removed && r.has_content())
            .map(|(index, r)| (index, r.to_entry()))
            .collect()
    }

    /// Append the organizer parts to a multipart body: the JSON document
    /// followed by one `organizer_logo` part per row with a new logo.
    ///
    /// A create omits the document when no row has content. An update
    /// always carries it, `[]` included, since it replaces the stored set.
    pub fn append_parts(&self, parts: &mut Vec<Part>, replacing: bool) -> Result<(), CoreError> {
        let entries = self.entries();
        if entries.is_empty() && !replacing {
            return Ok(());
        }
        let json = serde_json::to_string(&entries)
            .map_err(|e| CoreError::Internal(format!("organizer encoding failed: {e}")))?;
        parts.push(Part::text(ORGANIZERS_PART, json));
        for row in self.active() {
            if let Some(logo) = &row.new_logo {
                parts.push(Part::file(ORGANIZER_LOGO_PART, logo.clone()));
            }
        }
        Ok(())
    }
}
