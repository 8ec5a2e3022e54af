//! Document assembly
//!
//! Builds the ordered render context for one schema and concatenates the
//! rendered section fragments into a single Markdown document. Section
//! order is fixed: front matter, header, examples, then the property
//! overview followed by one section per property and per pattern-property.
//! Anchor slugs are computed once per schema and shared by the overview and
//! the individual sections — a second slugger run would renumber collisions
//! and break intra-document links.

pub mod templates;

pub use templates::TemplateEngine;

use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::DocgenConfig;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::graph::{DependencyEntry, DependencyMap};
use crate::schema::{self, Schema, SchemaSummary};
use crate::simplify::{self, DecoratedProperty};
use crate::slug;

/// One (template, data) pair of the render context
#[derive(Debug, Clone)]
pub struct Section {
    pub template: &'static str,
    pub data: Value,
}

/// Ordered section list for one document, consumed strictly in order
pub type RenderContext = Vec<Section>;

/// A fully rendered document plus everything the driver needs to place it
#[derive(Debug)]
pub struct RenderedDocument {
    pub markdown: String,
    /// Output path relative to the output root
    pub relative_path: PathBuf,
    pub summary: SchemaSummary,
    /// Flattened, decorated properties (re-serialized by the schema-out
    /// artifact writer)
    pub properties: BTreeMap<String, DecoratedProperty>,
    pub diagnostics: Diagnostics,
}

/// Assembles one document per schema against the shared, read-only
/// dependency map and configuration.
pub struct DocumentAssembler<'a> {
    dependency_map: &'a DependencyMap,
    config: &'a DocgenConfig,
    engine: &'a TemplateEngine,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(
        dependency_map: &'a DependencyMap,
        config: &'a DocgenConfig,
        engine: &'a TemplateEngine,
    ) -> Self {
        Self {
            dependency_map,
            config,
            engine,
        }
    }

    /// Build the ordered render context for `schema`.
    pub fn assemble(
        &self,
        schema: &Schema,
    ) -> (
        RenderContext,
        BTreeMap<String, DecoratedProperty>,
        Diagnostics,
    ) {
        let mut diagnostics = Diagnostics::new();
        let mut sections = Vec::new();

        sections.push(Section {
            template: "frontmatter",
            data: json!({ "meta": self.config.meta }),
        });
        sections.push(Section {
            template: "header",
            data: self.header_data(schema),
        });
        sections.push(Section {
            template: "examples",
            data: json!({
                "title": schema.display_title(),
                "examples": stringify_examples(schema.examples()),
            }),
        });

        let properties = simplify::flatten_properties(schema, &mut diagnostics);
        let pattern_properties = simplify::flatten_pattern_properties(schema, &mut diagnostics);

        if !properties.is_empty() {
            // One slug pass for the whole property set; the overview and the
            // per-property sections must agree on collision numbering.
            let slugs = slug::slugify_all(properties.keys());

            sections.push(Section {
                template: "properties",
                data: overview_data(schema, &properties, &pattern_properties, &slugs),
            });
            for (name, property) in &properties {
                sections.push(Section {
                    template: "property",
                    data: property_data(name, property, &slugs),
                });
            }
            for (pattern, property) in &pattern_properties {
                sections.push(Section {
                    template: "pattern-property",
                    data: pattern_property_data(pattern, property),
                });
            }
        }

        (sections, properties, diagnostics)
    }

    /// Render `schema` to its final Markdown document.
    pub fn render(&self, schema: &Schema) -> Result<RenderedDocument> {
        let (sections, properties, diagnostics) = self.assemble(schema);

        let mut fragments = Vec::with_capacity(sections.len());
        for section in &sections {
            fragments.push(self.engine.render(section.template, &section.data)?);
        }
        let markdown = concat_fragments(&fragments);

        let relative_path = markdown_path(&schema.path, &self.config.extension);
        let summary = SchemaSummary {
            title: schema.display_title(),
            id: schema.id.clone(),
            relative_path: relative_path.clone(),
        };

        Ok(RenderedDocument {
            markdown,
            relative_path,
            summary,
            properties,
            diagnostics,
        })
    }

    fn header_data(&self, schema: &Schema) -> Value {
        let own_md = markdown_path(&schema.path, &self.config.extension);
        json!({
            "title": schema.display_title(),
            "id": schema.id,
            "description": schema.description(),
            "table": header_table(schema, &self.config.links),
            "dependencies": self.entry_rows(&own_md, self.dependency_map.dependencies_of(&schema.id)),
            "dependents": self.entry_rows(&own_md, self.dependency_map.dependents_of(&schema.id)),
        })
    }

    /// Dependency/dependent rows with document-relative markdown links
    fn entry_rows(&self, own_md: &Path, entries: Vec<DependencyEntry>) -> Vec<Value> {
        entries
            .iter()
            .map(|entry| {
                let target_md = markdown_path(&entry.path, &self.config.extension);
                json!({
                    "title": entry.title,
                    "id": entry.schema_id,
                    "definition": entry.definition,
                    "link": relative_link(own_md, &target_md),
                })
            })
            .collect()
    }
}

/// Header attribute rows. The caller-supplied link map attaches an
/// explanatory document to individual attributes by key.
fn header_table(schema: &Schema, links: &BTreeMap<String, String>) -> Vec<Value> {
    let mut rows = Vec::new();
    let mut row = |attribute: &str, key: &str, value: String| {
        rows.push(json!({
            "attribute": attribute,
            "value": value,
            "link": links.get(key),
        }));
    };

    row(
        "Identifiable",
        "identifiable",
        yes_no(schema.content.get("$id").is_some()),
    );
    if let Some(status) = schema.content.get("meta:status").and_then(Value::as_str) {
        row("Status", "status", status.to_string());
    }
    row(
        "Additional Properties",
        "additional-properties",
        yes_no(schema.additional_properties()),
    );
    row(
        "Defined In",
        "defined-in",
        format!("`{}`", schema::path_id(&schema.path)),
    );
    rows
}

fn yes_no(value: bool) -> String {
    if value { "Yes" } else { "No" }.to_string()
}

fn overview_data(
    schema: &Schema,
    properties: &BTreeMap<String, DecoratedProperty>,
    pattern_properties: &BTreeMap<String, DecoratedProperty>,
    slugs: &BTreeMap<String, String>,
) -> Value {
    let props: Vec<Value> = properties
        .iter()
        .map(|(name, property)| {
            json!({
                "name": name,
                "slug": slugs.get(name),
                "type": type_display(property),
                "required": property.is_required,
            })
        })
        .collect();
    let pprops: Vec<Value> = pattern_properties
        .iter()
        .map(|(pattern, property)| {
            json!({
                "pattern": pattern,
                "type": type_display(property),
            })
        })
        .collect();
    json!({
        "title": schema.display_title(),
        "props": props,
        "pprops": pprops,
        "additional": schema.additional_properties(),
    })
}

fn property_data(
    name: &str,
    property: &DecoratedProperty,
    slugs: &BTreeMap<String, String>,
) -> Value {
    json!({
        "name": name,
        "slug": slugs.get(name),
        "required": property.is_required,
        "type": property.simple_type.markdown(),
        "title": property.title,
        "description": property.schema.get("description").and_then(Value::as_str),
        "examples": stringify_examples(schema::examples_of(&property.schema)),
        "enum": property
            .enum_descriptions
            .iter()
            .map(|(value, description)| json!({"value": value, "description": description}))
            .collect::<Vec<Value>>(),
    })
}

fn pattern_property_data(pattern: &str, property: &DecoratedProperty) -> Value {
    json!({
        "pattern": pattern,
        "type": property.simple_type.markdown(),
        "title": property.title,
        "description": property.schema.get("description").and_then(Value::as_str),
        "examples": stringify_examples(schema::examples_of(&property.schema)),
    })
}

/// The resolved definition title when a reference resolved, the simplified
/// label otherwise.
fn type_display(property: &DecoratedProperty) -> String {
    property
        .title
        .clone()
        .unwrap_or_else(|| property.simple_type.markdown())
}

fn stringify_examples(examples: Vec<&Value>) -> Vec<String> {
    examples
        .into_iter()
        .map(|example| serde_json::to_string_pretty(example).unwrap_or_default())
        .collect()
}

/// Join rendered fragments, collapsing any run of blank lines down to a
/// single blank line, and normalize to one trailing newline.
fn concat_fragments(fragments: &[String]) -> String {
    let joined = fragments.join("\n");
    let mut out = String::with_capacity(joined.len());
    let mut newlines = 0usize;
    for ch in joined.chars() {
        if ch == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push(ch);
            }
        } else {
            newlines = 0;
            out.push(ch);
        }
    }
    let trimmed = out.trim_matches('\n');
    format!("{trimmed}\n")
}

/// Map a schema's relative source path to its Markdown output path: the
/// schema extension is replaced by `.md` (`a/b/foo.schema.json` -> `a/b/foo.md`).
pub fn markdown_path(relative: &Path, extension: &str) -> PathBuf {
    let name = relative
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("schema");
    let suffix = format!(".{extension}");
    let stem = match name.strip_suffix(suffix.as_str()) {
        Some(stem) => stem,
        None => name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name),
    };
    relative.with_file_name(format!("{stem}.md"))
}

/// Relative link from the directory of `from` to `to`, both given relative
/// to the same root.
fn relative_link(from: &Path, to: &Path) -> String {
    let from_dir: Vec<&str> = from
        .parent()
        .unwrap_or(Path::new(""))
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();
    let to_parts: Vec<&str> = to
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();

    let common = from_dir
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    for _ in common..from_dir.len() {
        parts.push("..");
    }
    parts.extend(&to_parts[common..]);
    parts.join("/")
}
