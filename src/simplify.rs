//! Type simplification and property flattening
//!
//! Reduces each property definition to a short display label and merges the
//! owning schema's `required` list into per-property markers. Decoration is
//! a pure transform: the parsed schema is never mutated, so independent
//! documents sharing a definitions map can render concurrently.
//!
//! Dispatch over the property shape is a tagged variant with one exhaustive
//! match; shapes the renderer does not model fall into the explicit
//! [`PropertyShape::Unmodeled`] arm rather than an implicit else-branch.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

use crate::diagnostics::Diagnostics;
use crate::resolver;
use crate::schema::Schema;

/// Recognized primitive type keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    Integer,
}

impl PrimitiveKind {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "integer" => Some(Self::Integer),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
        }
    }
}

/// The shape of a property definition, in simplification precedence order:
/// `$ref` wins over `enum`, `enum` over `const`, `const` over `type`.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyShape<'a> {
    Reference(&'a str),
    Enum(&'a [Value]),
    Const(&'a Value),
    Primitive(PrimitiveKind),
    Object,
    Array(Option<&'a Value>),
    Unmodeled,
}

/// Classify one property definition.
pub fn detect_shape(property: &Value) -> PropertyShape<'_> {
    if let Some(pointer) = property.get("$ref").and_then(Value::as_str) {
        return PropertyShape::Reference(pointer);
    }
    if let Some(values) = property.get("enum").and_then(Value::as_array) {
        return PropertyShape::Enum(values.as_slice());
    }
    if let Some(value) = property.get("const") {
        return PropertyShape::Const(value);
    }
    match property.get("type").and_then(Value::as_str) {
        Some("object") => PropertyShape::Object,
        Some("array") => PropertyShape::Array(property.get("items")),
        Some(keyword) => match PrimitiveKind::from_keyword(keyword) {
            Some(kind) => PropertyShape::Primitive(kind),
            None => PropertyShape::Unmodeled,
        },
        None => PropertyShape::Unmodeled,
    }
}

/// Short display label for a property, computed once per render pass
#[derive(Debug, Clone, PartialEq)]
pub enum SimpleType {
    /// `$ref` resolved to a local definition
    Reference { title: String },
    /// `$ref` whose target could not be resolved
    UnresolvedReference,
    Enum,
    Const,
    Primitive(PrimitiveKind),
    Object,
    /// Array; `None` when items are absent or themselves unmodeled
    Array(Option<Box<SimpleType>>),
    Complex,
}

impl SimpleType {
    /// Bare label, e.g. `string`, `integer[]`, `Address`
    pub fn label(&self) -> String {
        match self {
            Self::Reference { title } => title.clone(),
            Self::UnresolvedReference => "reference".to_string(),
            Self::Enum => "enum".to_string(),
            Self::Const => "const".to_string(),
            Self::Primitive(kind) => kind.label().to_string(),
            Self::Object => "object".to_string(),
            Self::Array(None) => "array".to_string(),
            Self::Array(Some(inner)) => format!("{}[]", inner.label()),
            Self::Complex => "complex".to_string(),
        }
    }

    /// Markdown form: the label as a code span. The complex fallback stays
    /// bare so it is visually distinct from modeled labels.
    pub fn markdown(&self) -> String {
        match self {
            Self::Complex => self.label(),
            _ => format!("`{}`", self.label()),
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Self::Complex)
    }
}

/// A property decorated for rendering. Pure output of [`simplify`]; the
/// underlying property value is carried along untouched for template access
/// to `description`, `examples`, and friends.
#[derive(Debug, Clone)]
pub struct DecoratedProperty {
    /// The raw property definition
    pub schema: Value,
    /// Computed display label
    pub simple_type: SimpleType,
    pub is_required: bool,
    /// Resolved display title (code-spanned, `[]`-suffixed under arrays)
    /// when a `$ref` resolved
    pub title: Option<String>,
    /// Bare link target for the cross-linker
    pub link: Option<String>,
    /// `meta:enum` descriptions keyed by literal, including empty
    /// placeholders for literals the author has not documented yet
    pub enum_descriptions: BTreeMap<String, String>,
}

/// Simplify one property definition against its owning schema.
///
/// Exactly one diagnostic is recorded per degraded property, and calling
/// this twice on the same input yields the same decoration.
pub fn simplify(
    property: &Value,
    schema: &Schema,
    diagnostics: &mut Diagnostics,
) -> DecoratedProperty {
    let mut decorated = DecoratedProperty {
        schema: property.clone(),
        simple_type: SimpleType::Complex,
        is_required: false,
        title: None,
        link: None,
        enum_descriptions: BTreeMap::new(),
    };
    decorated.simple_type = simplify_shape(property, schema, &mut decorated, diagnostics);
    decorated
}

fn simplify_shape(
    property: &Value,
    schema: &Schema,
    decorated: &mut DecoratedProperty,
    diagnostics: &mut Diagnostics,
) -> SimpleType {
    match detect_shape(property) {
        PropertyShape::Reference(pointer) => {
            match resolver::resolve_local_ref(pointer, schema) {
                Some(resolved) => {
                    decorated.title = Some(format!("`{}`", resolved.title));
                    decorated.link = Some(resolved.link);
                    SimpleType::Reference {
                        title: resolved.title,
                    }
                }
                None => {
                    diagnostics.unresolved_ref(pointer);
                    SimpleType::UnresolvedReference
                }
            }
        }
        PropertyShape::Enum(values) => {
            decorated.enum_descriptions = enum_placeholders(property, values);
            SimpleType::Enum
        }
        PropertyShape::Const(_) => SimpleType::Const,
        PropertyShape::Primitive(kind) => SimpleType::Primitive(kind),
        // A property carrying `$ref` classifies as Reference before this arm
        // is reached, so there is no companion pointer left to resolve.
        PropertyShape::Object => SimpleType::Object,
        PropertyShape::Array(None) => SimpleType::Array(None),
        PropertyShape::Array(Some(items)) => {
            let inner = simplify_shape(items, schema, decorated, diagnostics);
            if inner.is_complex() {
                SimpleType::Array(None)
            } else {
                // The resolved item title gains the array suffix; the link
                // target stays bare.
                if let Some(link) = &decorated.link {
                    decorated.title = Some(format!("`{link}[]`"));
                }
                SimpleType::Array(Some(Box::new(inner)))
            }
        }
        PropertyShape::Unmodeled => {
            diagnostics.unmodeled_type(property);
            SimpleType::Complex
        }
    }
}

/// Existing `meta:enum` descriptions merged with empty placeholders for
/// literals the author has not documented yet. Existing entries are never
/// overwritten.
fn enum_placeholders(property: &Value, values: &[Value]) -> BTreeMap<String, String> {
    let mut descriptions: BTreeMap<String, String> = property
        .get("meta:enum")
        .and_then(Value::as_object)
        .map(|m| {
            m.iter()
                .map(|(k, v)| (k.clone(), v.as_str().unwrap_or_default().to_string()))
                .collect()
        })
        .unwrap_or_default();
    for value in values {
        descriptions.entry(enum_key(value)).or_default();
    }
    descriptions
}

/// String literals key by their value, other literals by compact JSON.
fn enum_key(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

/// Merge `required` into `properties` and simplify every property.
///
/// Names listed in `required` but absent from `properties` are ignored.
/// The returned map is keyed by property name; its ordering is the
/// lexicographic display order.
pub fn flatten_properties(
    schema: &Schema,
    diagnostics: &mut Diagnostics,
) -> BTreeMap<String, DecoratedProperty> {
    flatten(
        schema.properties(),
        &schema.required(),
        schema,
        diagnostics,
    )
}

/// Simplify every pattern-property. Patterns are never required.
pub fn flatten_pattern_properties(
    schema: &Schema,
    diagnostics: &mut Diagnostics,
) -> BTreeMap<String, DecoratedProperty> {
    flatten(
        schema.pattern_properties(),
        &BTreeSet::new(),
        schema,
        diagnostics,
    )
}

fn flatten(
    properties: Option<&Map<String, Value>>,
    required: &BTreeSet<&str>,
    schema: &Schema,
    diagnostics: &mut Diagnostics,
) -> BTreeMap<String, DecoratedProperty> {
    let mut flat = BTreeMap::new();
    if let Some(properties) = properties {
        for (name, property) in properties {
            let mut decorated = simplify(property, schema, diagnostics);
            decorated.is_required = required.contains(name.as_str());
            flat.insert(name.clone(), decorated);
        }
    }
    flat
}
