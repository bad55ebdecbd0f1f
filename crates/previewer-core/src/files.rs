//! Component file records and input parsing.
//!
//! The generation workflow hands files over in a few shapes: an already
//! structured list, a JSON array encoded as text, or a bare source string.
//! Everything is normalized into an ordered `Vec<ComponentFile>` here.

use previewer_util::ContentHasher;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Filename given to a bare source string.
pub const DEFAULT_FILENAME: &str = "Section.tsx";

/// One source file of a component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentFile {
    /// Caller-supplied name, normalized later by the VFS.
    pub filename: String,
    /// Source text.
    pub content: String,
    /// Whether this file holds the component to mount.
    #[serde(rename = "isMain", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_main: bool,
}

impl ComponentFile {
    /// Create a non-main file.
    #[must_use]
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            is_main: false,
        }
    }

    /// Mark this file as the main component.
    #[must_use]
    pub fn main(mut self) -> Self {
        self.is_main = true;
        self
    }
}

/// Index of the main component: the first flagged file, else the first file.
#[must_use]
pub fn main_index(files: &[ComponentFile]) -> Option<usize> {
    if files.is_empty() {
        return None;
    }
    Some(files.iter().position(|f| f.is_main).unwrap_or(0))
}

/// Stable digest over the ordered `(filename, content, isMain)` records.
#[must_use]
pub fn fingerprint(files: &[ComponentFile]) -> String {
    let mut hasher = ContentHasher::new();
    hasher.field("component-files/v1");
    for file in files {
        hasher.field(&file.filename);
        hasher.field(&file.content);
        hasher.flag(file.is_main);
    }
    hasher.finish()
}

/// Normalize an arbitrary JSON value into component files.
///
/// - `null` yields no files.
/// - An array of `{filename, content, isMain?}` records is taken as-is;
///   entries that do not fit the shape are skipped.
/// - A string is parsed with [`parse_component_files_str`].
/// - Any other shape yields no files.
#[must_use]
pub fn parse_component_files(value: &Value) -> Vec<ComponentFile> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => {
            let looks_like_files = items.first().is_some_and(|first| {
                first.get("filename").is_some() && first.get("content").is_some()
            });
            if looks_like_files {
                records_from_array(items)
            } else {
                warn!(len = items.len(), "Array input is not a list of component files");
                Vec::new()
            }
        }
        Value::String(text) => parse_component_files_str(text),
        other => {
            warn!(kind = %value_kind(other), "Unknown component input format");
            Vec::new()
        }
    }
}

/// Normalize text into component files.
///
/// Text holding a JSON array is read as a list of records. Anything else,
/// including JSON that is not an array, is one main `Section.tsx` file whose
/// content is the text itself.
#[must_use]
pub fn parse_component_files_str(text: &str) -> Vec<ComponentFile> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => records_from_array(&items),
        Ok(_) => {
            debug!("JSON input is not an array, treating as a single source file");
            vec![ComponentFile::new(DEFAULT_FILENAME, text).main()]
        }
        Err(_) => vec![ComponentFile::new(DEFAULT_FILENAME, text).main()],
    }
}

fn records_from_array(items: &[Value]) -> Vec<ComponentFile> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match ComponentFile::deserialize(item) {
            Ok(file) => Some(file),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed component file record");
                None
            }
        })
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
