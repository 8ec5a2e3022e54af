//! Schema model
//!
//! A [`Schema`] wraps one parsed JSON Schema document together with its
//! identity and source location. The raw `serde_json::Value` stays the
//! single source of truth; typed accessors expose the pieces the renderer
//! needs. Schemas are immutable once loaded — everything computed during
//! rendering lands on decorations, never back on the document.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

/// Canonical schema identifier (the `$id` field or the relative path)
pub type SchemaId = String;

/// One loaded JSON Schema document
#[derive(Debug, Clone)]
pub struct Schema {
    /// Unique identifier: `$id` when present, slash-normalized relative path otherwise
    pub id: SchemaId,
    /// Source path relative to the input root
    pub path: PathBuf,
    /// Declared `title`, if any
    pub title: Option<String>,
    /// The parsed document
    pub content: Value,
}

impl Schema {
    /// Wrap a parsed document found at `relative_path` under the input root.
    pub fn from_value(content: Value, relative_path: &Path) -> Self {
        let id = content
            .get("$id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| path_id(relative_path));
        let title = content
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_string);
        Self {
            id,
            path: relative_path.to_path_buf(),
            title,
            content,
        }
    }

    /// Display title: the declared `title`, falling back to the file stem
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => {
                let stem = self
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("untitled");
                stem.strip_suffix(".schema").unwrap_or(stem).to_string()
            }
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.content.get("description").and_then(Value::as_str)
    }

    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.content.get("properties").and_then(Value::as_object)
    }

    pub fn pattern_properties(&self) -> Option<&Map<String, Value>> {
        self.content
            .get("patternProperties")
            .and_then(Value::as_object)
    }

    /// Names listed under `required`. Non-string entries are ignored.
    pub fn required(&self) -> BTreeSet<&str> {
        self.content
            .get("required")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn definitions(&self) -> Option<&Map<String, Value>> {
        self.content.get("definitions").and_then(Value::as_object)
    }

    pub fn definition(&self, name: &str) -> Option<&Value> {
        self.definitions().and_then(|defs| defs.get(name))
    }

    /// Top-level examples; `examples` may hold a single value or a sequence
    pub fn examples(&self) -> Vec<&Value> {
        examples_of(&self.content)
    }

    /// Whether undeclared properties are permitted. JSON Schema defaults to
    /// permissive when the keyword is absent.
    pub fn additional_properties(&self) -> bool {
        !matches!(
            self.content.get("additionalProperties"),
            Some(Value::Bool(false))
        )
    }
}

/// Normalize a relative path into a stable, slash-separated identifier.
pub fn path_id(relative_path: &Path) -> String {
    relative_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Extract examples from any schema-like value.
pub fn examples_of(value: &Value) -> Vec<&Value> {
    match value.get("examples") {
        Some(Value::Array(values)) => values.iter().collect(),
        Some(single) => vec![single],
        None => Vec::new(),
    }
}

/// Per-schema summary exposed for the repository index
#[derive(Debug, Clone, Serialize)]
pub struct SchemaSummary {
    pub title: String,
    pub id: SchemaId,
    /// Output path of the generated Markdown, relative to the output root
    pub relative_path: PathBuf,
}
