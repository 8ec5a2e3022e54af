//! Pipeline driver
//!
//! Owns I/O and the two-phase run. Every schema is loaded and registered
//! before the dependency graph is built or any document is rendered, so
//! references across files resolve regardless of discovery order. A load
//! failure aborts the whole run; render-phase anomalies degrade locally and
//! are only surfaced through logging.

use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::config::DocgenConfig;
use crate::error::{DocgenError, Result};
use crate::graph::DependencyMap;
use crate::loader;
use crate::render::{DocumentAssembler, TemplateEngine};
use crate::schema::{Schema, SchemaSummary};
use crate::simplify::DecoratedProperty;

/// Outcome of one full run
#[derive(Debug, Default)]
pub struct RunReport {
    /// One summary per written document
    pub documents: Vec<SchemaSummary>,
    /// Total render-phase warnings across all documents
    pub warnings: usize,
}

/// Two-phase documentation pipeline
pub struct Pipeline {
    config: DocgenConfig,
}

impl Pipeline {
    pub fn new(config: DocgenConfig) -> Self {
        Self { config }
    }

    /// Load everything, then render everything.
    pub fn run(&self) -> Result<RunReport> {
        // Phase 1: load and register. Fatal on any malformed file; no
        // partial output is ever produced for a corpus that fails to load.
        let corpus = loader::load_from_directory(
            &self.config.input,
            &self.config.extension,
            self.config.meta_schema.as_deref(),
        )?;
        info!(schemas = corpus.len(), "loaded schema corpus");

        // Phase 2: the dependency graph needs the complete corpus.
        let dependency_map = DependencyMap::build(&corpus);
        let engine = TemplateEngine::new(self.config.templates.as_deref())?;
        let assembler = DocumentAssembler::new(&dependency_map, &self.config, &engine);

        let mut report = RunReport::default();
        for schema in corpus.schemas() {
            let document = assembler.render(schema)?;

            for item in &document.diagnostics {
                warn!(schema = %schema.id, "{}", item);
            }
            report.warnings += document.diagnostics.len();

            let target = self.config.out.join(&document.relative_path);
            write_file(&target, &document.markdown)?;
            info!(path = %target.display(), "wrote document");

            if self.config.schema_out {
                self.write_schema_artifact(schema, &document.properties)?;
            }

            report.documents.push(document.summary);
        }

        if self.config.readme {
            let readme = readme_index(&report.documents);
            write_file(&self.config.out.join("README.md"), &readme)?;
        }

        Ok(report)
    }

    /// Re-serialize the original schema with the decorations computed during
    /// flattening merged back in, under `<out>/_new/`.
    fn write_schema_artifact(
        &self,
        schema: &Schema,
        properties: &BTreeMap<String, DecoratedProperty>,
    ) -> Result<()> {
        let content = decorated_content(schema, properties);
        let target = self.config.out.join("_new").join(&schema.path);
        write_file(&target, &format!("{}\n", serde_json::to_string_pretty(&content)?))
    }
}

/// The original schema content with `isrequired` markers and `meta:enum`
/// placeholder descriptions attached to its properties.
fn decorated_content(schema: &Schema, properties: &BTreeMap<String, DecoratedProperty>) -> Value {
    let mut content = schema.content.clone();
    if let Some(raw) = content.get_mut("properties").and_then(Value::as_object_mut) {
        for (name, decorated) in properties {
            let Some(property) = raw.get_mut(name) else {
                continue;
            };
            if decorated.is_required {
                property["isrequired"] = json!(true);
            }
            if !decorated.enum_descriptions.is_empty() {
                property["meta:enum"] = json!(decorated.enum_descriptions);
            }
        }
    }
    content
}

/// Repository-level index of all generated documents, sorted by title
fn readme_index(documents: &[SchemaSummary]) -> String {
    let mut sorted: Vec<&SchemaSummary> = documents.iter().collect();
    sorted.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));

    let mut out = String::from("# Schema Documentation\n\n");
    for document in sorted {
        out.push_str(&format!(
            "* [{}]({}) `{}`\n",
            document.title,
            document.relative_path.display(),
            document.id
        ));
    }
    out
}

fn write_file(target: &Path, content: &str) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|source| DocgenError::WriteFile {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(target, content).map_err(|source| DocgenError::WriteFile {
        path: target.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::simplify;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn readme_index_sorts_by_title() {
        let documents = vec![
            SchemaSummary {
                title: "Zeta".into(),
                id: "z".into(),
                relative_path: PathBuf::from("z.md"),
            },
            SchemaSummary {
                title: "Alpha".into(),
                id: "a".into(),
                relative_path: PathBuf::from("a.md"),
            },
        ];
        let readme = readme_index(&documents);
        let alpha = readme.find("Alpha").unwrap();
        let zeta = readme.find("Zeta").unwrap();
        assert!(alpha < zeta);
    }

    #[test]
    fn decorations_merge_into_artifact() {
        let schema = Schema::from_value(
            json!({
                "required": ["kind"],
                "properties": {
                    "kind": { "enum": ["a", "b"] }
                }
            }),
            Path::new("thing.schema.json"),
        );
        let mut diagnostics = Diagnostics::new();
        let properties = simplify::flatten_properties(&schema, &mut diagnostics);

        let artifact = decorated_content(&schema, &properties);
        assert_eq!(artifact["properties"]["kind"]["isrequired"], json!(true));
        assert_eq!(artifact["properties"]["kind"]["meta:enum"]["a"], json!(""));
        // the loaded schema itself stays untouched
        assert!(schema.content["properties"]["kind"].get("isrequired").is_none());
    }
}
