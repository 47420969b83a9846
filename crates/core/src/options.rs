//! Options for foreign-key selects.

use serde::Serialize;

use crate::markup::TrustedMarkup;
use crate::record::Record;
use crate::resource::ResourceDescriptor;
use crate::types::DbId;

/// One entry of a select input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefOption {
    pub id: DbId,
    pub label: String,
}

/// Label of a row: the non-empty label fields as plain text, joined with
/// ` / `. Falls back to `"{name} {id}"`.
pub fn row_label(resource: &ResourceDescriptor, record: &Record) -> String {
    let parts: Vec<String> = resource
        .label_fields
        .iter()
        .map(|f| TrustedMarkup::from_server(record.text(f)).plain_text())
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        match record.id() {
            Some(id) => format!("{} {id}", resource.name),
            None => resource.name.to_string(),
        }
    } else {
        parts.join(" / ")
    }
}

/// Build select options from reference rows. Rows without an id are
/// skipped.
pub fn options_from_records(resource: &ResourceDescriptor, records: &[Record]) -> Vec<RefOption> {
    records
        .iter()
        .filter_map(|r| {
            Some(RefOption {
                id: r.id()?,
                label: row_label(resource, r),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceKind;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<Record> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn location_labels_join_all_locales() {
        let rows = records(json!([
            {"id": 1, "location_tk": "Aşgabat", "location_en": "Ashgabat", "location_ru": "Ашхабад"}
        ]));
        let opts = options_from_records(ResourceKind::Location.descriptor(), &rows);
        assert_eq!(
            opts,
            vec![RefOption {
                id: 1,
                label: "Ashgabat / Aşgabat / Ашхабад".into()
            }]
        );
    }

    #[test]
    fn project_labels_strip_markup_and_skip_blanks() {
        let rows = records(json!([{"id": 2, "en": "<p>Expo</p>", "tk": "", "ru": null}]));
        let opts = options_from_records(ResourceKind::Project.descriptor(), &rows);
        assert_eq!(opts[0].label, "Expo");
    }

    #[test]
    fn unlabeled_rows_fall_back_to_name_and_id() {
        let rows = records(json!([{"id": 3}, {"en": "no id"}]));
        let opts = options_from_records(ResourceKind::Project.descriptor(), &rows);
        assert_eq!(opts.len(), 1);
        assert_eq!(opts[0].label, "project 3");
    }
}
