//! Render-phase diagnostics
//!
//! Rendering anomalies never abort a document: the offending property
//! degrades to a fallback label and the anomaly is collected here, one item
//! per degraded property. The pipeline logs the collection once the
//! document is written.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Diagnostic code for categorizing render-phase anomalies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCode {
    /// `$ref` target missing from the owning schema's `definitions`
    UnresolvedRef,
    /// Property matches none of the recognized type shapes
    UnmodeledType,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnresolvedRef => "W001",
            Self::UnmodeledType => "W002",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single diagnostic item
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticItem {
    pub code: DiagnosticCode,
    pub message: String,
}

impl fmt::Display for DiagnosticItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Diagnostics collected while assembling one document
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    items: Vec<DiagnosticItem>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        self.items.push(DiagnosticItem {
            code,
            message: message.into(),
        });
    }

    /// Record an unresolved reference, with the offending pointer
    pub fn unresolved_ref(&mut self, pointer: &str) {
        self.push(
            DiagnosticCode::UnresolvedRef,
            format!("unresolved reference: {pointer}"),
        );
    }

    /// Record an unmodeled type shape, with the offending property payload
    pub fn unmodeled_type(&mut self, property: &Value) {
        self.push(
            DiagnosticCode::UnmodeledType,
            format!("complex type: {property}"),
        );
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter()
    }

    /// Count of items carrying `code`
    pub fn count_of(&self, code: DiagnosticCode) -> usize {
        self.items.iter().filter(|i| i.code == code).count()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a DiagnosticItem;
    type IntoIter = std::slice::Iter<'a, DiagnosticItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collects_and_counts() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.unresolved_ref("#/definitions/Missing");
        diagnostics.unmodeled_type(&json!({"type": "null"}));

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.count_of(DiagnosticCode::UnresolvedRef), 1);
        assert!(diagnostics
            .iter()
            .any(|i| i.message.contains("#/definitions/Missing")));
    }
}
