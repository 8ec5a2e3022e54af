//! Phase-1 loading
//!
//! Walks the input tree, parses every schema file, and registers it in the
//! write-once [`Corpus`]. Any unreadable, malformed, or invalid file aborts
//! the run: rendering never starts on a partial corpus, because any schema
//! may reference any other regardless of file order.

use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{DocgenError, Result};
use crate::schema::{path_id, Schema, SchemaId};

/// Write-once registry of loaded schemas, keyed by identifier and by
/// slash-normalized relative path.
#[derive(Debug, Default)]
pub struct Corpus {
    by_id: HashMap<SchemaId, Schema>,
    by_path: HashMap<String, SchemaId>,
}

impl Corpus {
    /// Build a corpus from already-parsed schemas. Identifiers must be
    /// unique across the whole set.
    pub fn from_schemas(schemas: impl IntoIterator<Item = Schema>) -> Result<Self> {
        let mut corpus = Corpus::default();
        for schema in schemas {
            corpus.insert(schema)?;
        }
        Ok(corpus)
    }

    fn insert(&mut self, schema: Schema) -> Result<()> {
        if self.by_id.contains_key(&schema.id) {
            return Err(DocgenError::DuplicateId {
                id: schema.id,
                path: schema.path,
            });
        }
        self.by_path.insert(path_id(&schema.path), schema.id.clone());
        self.by_id.insert(schema.id.clone(), schema);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Schema> {
        self.by_id.get(id)
    }

    /// Resolve a reference target: first as a `$id`, then as a relative path.
    pub fn resolve_target(&self, target: &str) -> Option<&Schema> {
        self.by_id
            .get(target)
            .or_else(|| self.by_path.get(target).and_then(|id| self.by_id.get(id)))
    }

    /// Schemas in deterministic identifier order
    pub fn schemas(&self) -> Vec<&Schema> {
        let mut all: Vec<&Schema> = self.by_id.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Load every `*.<extension>` file under `input` into a corpus.
///
/// When `meta_schema` is given, each file is validated against it and any
/// failure is fatal.
pub fn load_from_directory(
    input: &Path,
    extension: &str,
    meta_schema: Option<&Path>,
) -> Result<Corpus> {
    let meta_json = match meta_schema {
        Some(path) => Some((path, read_json(path)?)),
        None => None,
    };
    let validator = match &meta_json {
        Some((path, json)) => Some(JSONSchema::compile(json).map_err(|e| {
            DocgenError::MetaSchema {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?),
        None => None,
    };

    let suffix = format!(".{extension}");
    let mut corpus = Corpus::default();

    for entry in WalkDir::new(input)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if !name.ends_with(&suffix) {
            continue;
        }

        let json = read_json(path)?;

        if let Some(validator) = &validator {
            let mut messages = Vec::new();
            if let Err(errors) = validator.validate(&json) {
                for error in errors {
                    messages.push(error.to_string());
                }
            }
            if !messages.is_empty() {
                return Err(DocgenError::Validation {
                    path: path.to_path_buf(),
                    errors: messages.join("; "),
                });
            }
        }

        let relative = path.strip_prefix(input).unwrap_or(path);
        let schema = Schema::from_value(json, relative);
        debug!(id = %schema.id, path = %relative.display(), "registered schema");
        corpus.insert(schema)?;
    }

    Ok(corpus)
}

fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|source| DocgenError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DocgenError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn schema(id_path: &str, content: Value) -> Schema {
        Schema::from_value(content, &PathBuf::from(id_path))
    }

    #[test]
    fn duplicate_identifiers_are_rejected() {
        let result = Corpus::from_schemas([
            schema("a.schema.json", json!({"$id": "urn:x"})),
            schema("b.schema.json", json!({"$id": "urn:x"})),
        ]);
        assert!(matches!(result, Err(DocgenError::DuplicateId { .. })));
    }

    #[test]
    fn resolves_by_id_and_by_path() {
        let corpus = Corpus::from_schemas([
            schema("geo/point.schema.json", json!({"title": "Point"})),
            schema("addr.schema.json", json!({"$id": "urn:addr"})),
        ])
        .unwrap();

        assert!(corpus.resolve_target("urn:addr").is_some());
        assert!(corpus.resolve_target("geo/point.schema.json").is_some());
        assert!(corpus.resolve_target("nope.schema.json").is_none());
    }

    #[test]
    fn schemas_are_sorted_by_identifier() {
        let corpus = Corpus::from_schemas([
            schema("b.schema.json", json!({})),
            schema("a.schema.json", json!({})),
        ])
        .unwrap();
        let ids: Vec<&str> = corpus.schemas().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a.schema.json", "b.schema.json"]);
    }
}
