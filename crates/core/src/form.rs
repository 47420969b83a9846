//! Per-field form state and payload building.
//!
//! A [`FormState`] holds the text of every scalar field of one resource,
//! the files chosen for upload, the paths already stored for file fields,
//! and the organizer rows. It knows nothing about the network; views turn
//! it into a [`Payload`] and hand that to the API.

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

use crate::error::CoreError;
use crate::organizers::OrganizerList;
use crate::payload::{FileAttachment, Part, Payload};
use crate::record::{to_input_date, value_to_text, Record};
use crate::resource::{Encoding, FieldKind, FieldSpec, ResourceDescriptor};

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    resource: &'static ResourceDescriptor,
    values: BTreeMap<&'static str, String>,
    new_files: BTreeMap<&'static str, FileAttachment>,
    stored_files: BTreeMap<&'static str, String>,
    /// Scalar values as loaded, sent back verbatim while their text is
    /// unchanged.
    loaded: BTreeMap<&'static str, Value>,
    organizers: OrganizerList,
}

fn is_scalar(field: &FieldSpec) -> bool {
    !matches!(field.kind, FieldKind::File { .. } | FieldKind::Organizers)
}

impl FormState {
    /// Every field at its neutral empty value. Forms with an organizer
    /// group start with one blank organizer row.
    pub fn empty(resource: &'static ResourceDescriptor) -> Self {
        let values = resource
            .fields
            .iter()
            .filter(|f| is_scalar(f))
            .map(|f| (f.name, String::new()))
            .collect();
        let organizers = if resource.has_organizers() {
            OrganizerList::with_blank_row()
        } else {
            OrganizerList::default()
        };
        Self {
            resource,
            values,
            new_files: BTreeMap::new(),
            stored_files: BTreeMap::new(),
            loaded: BTreeMap::new(),
            organizers,
        }
    }

    /// Pre-populate from an existing record. Date fields are converted to
    /// date-only input form; stored file paths are remembered so an update
    /// can forward them.
    pub fn from_record(resource: &'static ResourceDescriptor, record: &Record) -> Self {
        let mut state = Self::empty(resource);
        for field in resource.fields {
            match field.kind {
                FieldKind::Organizers => {
                    state.organizers = OrganizerList::from_record(record);
                }
                FieldKind::File { .. } => {
                    let path = record.text(field.name);
                    if !path.trim().is_empty() {
                        state.stored_files.insert(field.name, path);
                    }
                }
                FieldKind::Date => {
                    let raw = record.text(field.name);
                    let value = to_input_date(&raw).unwrap_or_else(|| {
                        tracing::warn!(
                            resource = resource.endpoint,
                            field = field.name,
                            value = %raw,
                            "Unreadable date, keeping raw value"
                        );
                        raw.clone()
                    });
                    state.values.insert(field.name, value);
                }
                _ => {
                    if let Some(value) = record.get(field.name) {
                        state.loaded.insert(field.name, value.clone());
                    }
                    state.values.insert(field.name, record.text(field.name));
                }
            }
        }
        state
    }

    pub fn resource(&self) -> &'static ResourceDescriptor {
        self.resource
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Set a scalar field.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), CoreError> {
        let field = self.resource.field(name)?;
        if !is_scalar(field) {
            return Err(CoreError::Validation(format!(
                "`{name}` is not a text field"
            )));
        }
        self.values.insert(field.name, value.into());
        Ok(())
    }

    /// Choose a replacement file for a file field.
    pub fn attach(&mut self, name: &str, file: FileAttachment) -> Result<(), CoreError> {
        let field = self.resource.field(name)?;
        if !field.is_file() {
            return Err(CoreError::Validation(format!(
                "`{name}` is not a file field"
            )));
        }
        self.new_files.insert(field.name, file);
        Ok(())
    }

    pub fn stored_file(&self, name: &str) -> Option<&str> {
        self.stored_files.get(name).map(String::as_str)
    }

    pub fn organizers(&self) -> &OrganizerList {
        &self.organizers
    }

    pub fn organizers_mut(&mut self) -> &mut OrganizerList {
        &mut self.organizers
    }

    /// Back to the initial empty state.
    pub fn reset(&mut self) {
        *self = Self::empty(self.resource);
    }

    /// Check required fields. On an edit, a file field is satisfied by its
    /// stored path.
    pub fn validate(&self, editing: bool) -> Result<(), CoreError> {
        for field in self.resource.fields {
            match field.kind {
                FieldKind::Organizers => {}
                FieldKind::File { .. } => {
                    let present = self.new_files.contains_key(field.name)
                        || (editing && self.stored_files.contains_key(field.name));
                    if field.required && !present {
                        return Err(CoreError::Validation(format!("{} is required", field.name)));
                    }
                }
                FieldKind::Integer | FieldKind::ForeignKey(_) => {
                    let value = self.value(field.name).unwrap_or("").trim();
                    if value.is_empty() {
                        if field.required {
                            return Err(CoreError::Validation(format!(
                                "{} is required",
                                field.name
                            )));
                        }
                    } else if value.parse::<i64>().is_err() {
                        return Err(CoreError::Validation(format!(
                            "{} must be a whole number",
                            field.name
                        )));
                    }
                }
                _ => {
                    let value = self.value(field.name).unwrap_or("");
                    if field.required && value.trim().is_empty() {
                        return Err(CoreError::Validation(format!("{} is required", field.name)));
                    }
                }
            }
        }
        Ok(())
    }

    /// Body of a `POST`: every scalar field, newly attached files, and the
    /// organizer group when it has content.
    pub fn create_payload(&self) -> Result<Payload, CoreError> {
        self.build_payload(false)
    }

    /// Body of a `PUT`: the full editable field set. File fields without a
    /// replacement are omitted, except those flagged `resend_existing`,
    /// which carry their stored path as text.
    pub fn update_payload(&self) -> Result<Payload, CoreError> {
        self.build_payload(true)
    }

    fn build_payload(&self, editing: bool) -> Result<Payload, CoreError> {
        match self.resource.encoding() {
            Encoding::Json => Ok(Payload::Json(Value::Object(self.json_body()))),
            Encoding::Multipart => self.multipart_body(editing).map(Payload::Multipart),
        }
    }

    fn json_body(&self) -> Map<String, Value> {
        let mut body = Map::new();
        for field in self.resource.fields.iter().filter(|f| is_scalar(f)) {
            let value = self.value(field.name).unwrap_or("");
            let json = match self.loaded.get(field.name) {
                Some(loaded) if value_to_text(loaded) == value => loaded.clone(),
                _ => json_value(field, value),
            };
            body.insert(field.name.to_string(), json);
        }
        body
    }

    fn multipart_body(&self, editing: bool) -> Result<Vec<Part>, CoreError> {
        let mut parts = Vec::new();
        for field in self.resource.fields {
            match field.kind {
                FieldKind::Organizers => self.organizers.append_parts(&mut parts, editing)?,
                FieldKind::File { resend_existing } => {
                    if let Some(file) = self.new_files.get(field.name) {
                        parts.push(Part::file(field.name, file.clone()));
                    } else if editing && resend_existing {
                        if let Some(path) = self.stored_files.get(field.name) {
                            parts.push(Part::text(field.name, path.clone()));
                        }
                    }
                }
                _ => {
                    let value = self.value(field.name).unwrap_or("");
                    parts.push(Part::text(field.name, value));
                }
            }
        }
        Ok(parts)
    }
}

/// Numeric fields travel as JSON numbers when they parse, everything else
/// as strings.
fn json_value(field: &FieldSpec, value: &str) -> Value {
    match field.kind {
        FieldKind::Integer | FieldKind::ForeignKey(_) => match value.trim().parse::<i64>() {
            Ok(n) => Value::Number(Number::from(n)),
            Err(_) => Value::String(value.to_string()),
        },
        _ => Value::String(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;
    use crate::resource::ResourceKind;
    use serde_json::json;

    fn record(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_form_has_every_scalar_blank() {
        let form = FormState::empty(ResourceKind::Reference.descriptor());
        for name in ["name_tk", "name_en", "name_ru", "date"] {
            assert_eq!(form.value(name), Some(""));
        }
        assert_eq!(form.value("file"), None);
    }

    #[test]
    fn project_form_starts_with_blank_organizer() {
        let form = FormState::empty(ResourceKind::Project.descriptor());
        assert_eq!(form.organizers().len(), 1);
    }

    #[test]
    fn set_rejects_unknown_and_file_fields() {
        let mut form = FormState::empty(ResourceKind::Slider.descriptor());
        assert!(form.set("bogus", "x").is_err());
        assert!(form.set("image", "x").is_err());
        assert!(form.attach("tk", FileAttachment::new("a.png")).is_err());
    }

    #[test]
    fn from_record_converts_dates_and_keeps_stored_files() {
        let form = FormState::from_record(
            ResourceKind::Reference.descriptor(),
            &record(json!({
                "id": 3,
                "file": "uploads\\refs\\a.pdf",
                "name_tk": "Salgy",
                "name_en": "Ref",
                "name_ru": "Ссылка",
                "date": "2024-02-10T00:00:00.000Z"
            })),
        );
        assert_eq!(form.value("date"), Some("2024-02-10"));
        assert_eq!(form.stored_file("file"), Some("uploads\\refs\\a.pdf"));
    }

    #[test]
    fn json_payload_sends_numbers_for_foreign_keys() {
        let mut form = FormState::empty(ResourceKind::ContactMail.descriptor());
        form.set("mail", "info@expo.tm").unwrap();
        form.set("location_id", "2").unwrap();
        assert_eq!(
            form.create_payload().unwrap(),
            Payload::Json(json!({"mail": "info@expo.tm", "location_id": 2}))
        );
    }

    #[test]
    fn unedited_json_values_keep_their_loaded_type() {
        let mut form = FormState::from_record(
            ResourceKind::ContactMail.descriptor(),
            &record(json!({"id": 1, "mail": "info@expo.tm", "location_id": "2"})),
        );
        assert_eq!(
            form.update_payload().unwrap(),
            Payload::Json(json!({"mail": "info@expo.tm", "location_id": "2"}))
        );

        form.set("location_id", "3").unwrap();
        assert_eq!(
            form.update_payload().unwrap(),
            Payload::Json(json!({"mail": "info@expo.tm", "location_id": 3}))
        );
    }

    #[test]
    fn update_resends_project_image_but_not_logo() {
        let form = FormState::from_record(
            ResourceKind::Project.descriptor(),
            &record(json!({"id": 1, "image": "uploads/p.png", "logo": "uploads/l.png"})),
        );
        let payload = form.update_payload().unwrap();
        assert_eq!(payload.text_value("image").as_deref(), Some("uploads/p.png"));
        assert!(!payload.contains("logo"));
    }

    #[test]
    fn update_omits_unchanged_gallery_image() {
        let form = FormState::from_record(
            ResourceKind::Gallery.descriptor(),
            &record(json!({"id": 1, "image": "uploads/g.png", "project_id": 5})),
        );
        let payload = form.update_payload().unwrap();
        assert!(!payload.contains("image"));
        assert_eq!(payload.text_value("project_id").as_deref(), Some("5"));
    }

    #[test]
    fn replacement_file_wins_over_stored_path() {
        let mut form = FormState::from_record(
            ResourceKind::Project.descriptor(),
            &record(json!({"id": 1, "image": "uploads/old.png"})),
        );
        form.attach("image", FileAttachment::new("/tmp/new.png")).unwrap();
        let payload = form.update_payload().unwrap();
        assert_eq!(payload.files("image").len(), 1);
        assert!(payload.text_value("image").is_none());
    }

    #[test]
    fn validate_reports_first_missing_required_field() {
        let mut form = FormState::empty(ResourceKind::ContactMail.descriptor());
        let err = form.validate(false).unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: mail is required");

        form.set("mail", "a@b.tm").unwrap();
        form.set("location_id", "x").unwrap();
        let err = form.validate(false).unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: location_id must be a whole number");
    }

    #[test]
    fn stored_file_satisfies_required_only_on_edit() {
        let form = FormState::from_record(
            ResourceKind::Slider.descriptor(),
            &record(json!({"id": 1, "image": "uploads/s.png"})),
        );
        assert!(form.validate(true).is_ok());
        assert!(form.validate(false).is_err());
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut form = FormState::empty(ResourceKind::Project.descriptor());
        form.set("link", "https://expo.tm").unwrap();
        form.attach("image", FileAttachment::new("a.png")).unwrap();
        form.organizers_mut().set_name(0, Locale::En, "Org").unwrap();

        form.reset();
        assert_eq!(form, FormState::empty(ResourceKind::Project.descriptor()));
    }
}
