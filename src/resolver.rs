//! Local `$ref` resolution
//!
//! Only same-document pointers of the form `#/definitions/<name>` are
//! resolved here, against the owning schema's `definitions` map.
//! Cross-document references are the dependency graph's business; for type
//! display they stay unresolved and degrade to the generic reference label.

use crate::schema::Schema;
use serde_json::Value;

/// Pointer prefix for same-document definition references
pub const DEFINITIONS_POINTER: &str = "#/definitions/";

/// A `$ref` resolved against the owning schema's `definitions`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRef {
    /// Display title of the referenced definition
    pub title: String,
    /// Bare link target, consumed by the anchor slugger / cross-linker
    pub link: String,
}

/// Resolve `pointer` against `schema.definitions`.
///
/// Returns `None` when the pointer is not in local-definitions form or the
/// named definition is absent; the caller degrades to the fallback label.
/// A definition without a `title` of its own falls back to its name.
pub fn resolve_local_ref(pointer: &str, schema: &Schema) -> Option<ResolvedRef> {
    let name = pointer.strip_prefix(DEFINITIONS_POINTER)?;
    let definition = schema.definition(name)?;
    let title = definition
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or(name)
        .to_string();
    Some(ResolvedRef {
        link: title.clone(),
        title,
    })
}
