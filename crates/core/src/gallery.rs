//! Gallery list grouping.
//!
//! The gallery endpoint returns a flat list of images, each tagged with the
//! project it belongs to (and that project's titles). The list view shows
//! one collapsible group per project.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: DbId,
    #[serde(default)]
    pub image: String,
    pub project_id: DbId,
    #[serde(default)]
    pub tk: Option<String>,
    #[serde(default)]
    pub en: Option<String>,
    #[serde(default)]
    pub ru: Option<String>,
}

impl GalleryItem {
    /// Read an item from a gallery row. Rows without a numeric `id` or
    /// `project_id` yield `None`.
    pub fn from_record(record: &Record) -> Option<Self> {
        let id = record.id()?;
        let project_id = record.foreign_id("project_id")?;
        let optional = |name: &str| {
            let text = record.text(name);
            (!text.is_empty()).then_some(text)
        };
        Some(Self {
            id,
            image: record.text("image"),
            project_id,
            tk: optional("tk"),
            en: optional("en"),
            ru: optional("ru"),
        })
    }
}

/// All images of one project. Titles come from the group's first item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryGroup {
    pub project_id: DbId,
    pub tk: Option<String>,
    pub en: Option<String>,
    pub ru: Option<String>,
    pub images: Vec<GalleryItem>,
}

/// Group items by `project_id`.
///
/// Every item lands in exactly one group. Groups appear in the order their
/// project first occurs in the input; items keep their input order inside
/// a group.
pub fn group_by_project(items: impl IntoIterator<Item = GalleryItem>) -> Vec<GalleryGroup> {
    let mut groups: Vec<GalleryGroup> = Vec::new();
    let mut index: HashMap<DbId, usize> = HashMap::new();

    for item in items {
        match index.get(&item.project_id) {
            Some(&slot) => groups[slot].images.push(item),
            None => {
                index.insert(item.project_id, groups.len());
                groups.push(GalleryGroup {
                    project_id: item.project_id,
                    tk: item.tk.clone(),
                    en: item.en.clone(),
                    ru: item.ru.clone(),
                    images: vec![item],
                });
            }
        }
    }

    groups
}
