//! Create / update request bodies.
//!
//! A [`Payload`] is the transport-neutral body of a write: either a JSON
//! document (text-only resources) or an ordered list of multipart parts.
//! The HTTP client turns it into the actual request body.

use std::path::{Path, PathBuf};

use serde_json::Value;

/// A local file chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub path: PathBuf,
    /// File name sent in the part's `Content-Disposition`.
    pub file_name: String,
}

impl FileAttachment {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Self { path, file_name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// One multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text { name: String, value: String },
    File { name: String, file: FileAttachment },
}

impl Part {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Part::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn file(name: impl Into<String>, file: FileAttachment) -> Self {
        Part::File {
            name: name.into(),
            file,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Part::Text { name, .. } | Part::File { name, .. } => name,
        }
    }
}

/// Body of a create or update call.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Multipart(Vec<Part>),
}

impl Payload {
    /// Text value of a field, whichever encoding carries it.
    ///
    /// JSON numbers are rendered as text; for multipart bodies the first
    /// text part with that name wins.
    pub fn text_value(&self, name: &str) -> Option<String> {
        match self {
            Payload::Json(Value::Object(map)) => map.get(name).map(crate::record::value_to_text),
            Payload::Json(_) => None,
            Payload::Multipart(parts) => parts.iter().find_map(|p| match p {
                Part::Text { name: n, value } if n == name => Some(value.clone()),
                _ => None,
            }),
        }
    }

    /// Whether any part or key carries `name`.
    pub fn contains(&self, name: &str) -> bool {
        match self {
            Payload::Json(Value::Object(map)) => map.contains_key(name),
            Payload::Json(_) => false,
            Payload::Multipart(parts) => parts.iter().any(|p| p.name() == name),
        }
    }

    /// Files attached under `name`, in part order.
    pub fn files(&self, name: &str) -> Vec<&FileAttachment> {
        match self {
            Payload::Json(_) => Vec::new(),
            Payload::Multipart(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    Part::File { name: n, file } if n == name => Some(file),
                    _ => None,
                })
                .collect(),
        }
    }
}
