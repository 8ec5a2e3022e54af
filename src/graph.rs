//! Schema dependency graph
//!
//! Built once, after every schema is registered, so forward references
//! across files resolve regardless of load order. Edges point from the
//! referencing schema to the schema owning the referenced definition and
//! carry the definition name. Read-only after construction.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::loader::Corpus;
use crate::schema::SchemaId;

/// One dependency edge, annotated with the referenced definition
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DependencyEntry {
    /// Identifier of the schema on the other end of the edge
    pub schema_id: SchemaId,
    /// Referenced definition name; `None` for a whole-document reference
    pub definition: Option<String>,
    /// Display title of the other schema
    pub title: String,
    /// Relative source path of the other schema
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
struct RefEdge {
    definition: Option<String>,
}

/// Display metadata kept per node so entry lists need no corpus borrow
#[derive(Debug, Clone)]
struct NodeMeta {
    title: String,
    path: PathBuf,
}

/// Directed reference graph over the whole corpus
#[derive(Debug)]
pub struct DependencyMap {
    graph: DiGraph<SchemaId, RefEdge>,
    node_indices: HashMap<SchemaId, NodeIndex>,
    meta: HashMap<SchemaId, NodeMeta>,
}

impl DependencyMap {
    /// Build the full graph. Must run only after phase 1 has registered
    /// every schema.
    pub fn build(corpus: &Corpus) -> Self {
        let schemas = corpus.schemas();

        let mut graph = DiGraph::with_capacity(schemas.len(), schemas.len() * 2);
        let mut node_indices = HashMap::with_capacity(schemas.len());
        let mut meta = HashMap::with_capacity(schemas.len());

        for schema in &schemas {
            let idx = graph.add_node(schema.id.clone());
            node_indices.insert(schema.id.clone(), idx);
            meta.insert(
                schema.id.clone(),
                NodeMeta {
                    title: schema.display_title(),
                    path: schema.path.clone(),
                },
            );
        }

        for schema in &schemas {
            let mut pointers = Vec::new();
            collect_refs(&schema.content, &mut pointers);

            for pointer in pointers {
                let Some((document, definition)) = split_ref(pointer) else {
                    continue;
                };
                let target = corpus
                    .resolve_target(document)
                    .or_else(|| corpus.resolve_target(&normalize_target(document, &schema.path)));
                let Some(target) = target else {
                    continue;
                };
                if target.id == schema.id {
                    continue;
                }
                // A definition-level edge is only real when the target
                // schema actually owns that definition.
                let definition = match definition {
                    Some(name) => {
                        if target.definition(name).is_none() {
                            continue;
                        }
                        Some(name.to_string())
                    }
                    None => None,
                };

                let from = node_indices[&schema.id];
                let to = node_indices[&target.id];
                graph.add_edge(from, to, RefEdge { definition });
            }
        }

        Self {
            graph,
            node_indices,
            meta,
        }
    }

    /// Schemas that `id` references, sorted and deduplicated
    pub fn dependencies_of(&self, id: &str) -> Vec<DependencyEntry> {
        self.entries(id, Direction::Outgoing)
    }

    /// Schemas that reference `id`, sorted and deduplicated
    pub fn dependents_of(&self, id: &str) -> Vec<DependencyEntry> {
        self.entries(id, Direction::Incoming)
    }

    fn entries(&self, id: &str, direction: Direction) -> Vec<DependencyEntry> {
        let Some(&idx) = self.node_indices.get(id) else {
            return Vec::new();
        };
        let mut entries: Vec<DependencyEntry> = self
            .graph
            .edges_directed(idx, direction)
            .map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                let other_id = &self.graph[other];
                let node = &self.meta[other_id];
                DependencyEntry {
                    schema_id: other_id.clone(),
                    definition: edge.weight().definition.clone(),
                    title: node.title.clone(),
                    path: node.path.clone(),
                }
            })
            .collect();
        entries.sort();
        entries.dedup();
        entries
    }
}

/// Collect every `$ref` string anywhere in the document.
fn collect_refs<'a>(value: &'a Value, refs: &mut Vec<&'a str>) {
    match value {
        Value::Object(object) => {
            if let Some(pointer) = object.get("$ref").and_then(Value::as_str) {
                refs.push(pointer);
            }
            for nested in object.values() {
                collect_refs(nested, refs);
            }
        }
        Value::Array(values) => {
            for nested in values {
                collect_refs(nested, refs);
            }
        }
        _ => {}
    }
}

/// Split a reference into its document part and definition name.
///
/// Returns `None` for same-document pointers (empty document part), which
/// belong to the local resolver, not the graph. Fragments outside the
/// `/definitions/` space count as whole-document references.
fn split_ref(pointer: &str) -> Option<(&str, Option<&str>)> {
    let (document, fragment) = match pointer.split_once('#') {
        Some((document, fragment)) => (document, Some(fragment)),
        None => (pointer, None),
    };
    if document.is_empty() {
        return None;
    }
    let definition = fragment.and_then(|f| f.strip_prefix("/definitions/"));
    Some((document, definition))
}

/// Resolve a relative reference against the referencing schema's directory,
/// producing a slash-normalized path with `.`/`..` collapsed. Absolute URIs
/// pass through untouched (they resolve as `$id`s).
fn normalize_target(target: &str, from_path: &Path) -> String {
    if target.starts_with("http://") || target.starts_with("https://") {
        return target.to_string();
    }

    let parent = from_path.parent().unwrap_or(Path::new(""));
    let joined = parent.join(target);

    let mut components: Vec<String> = Vec::new();
    for component in joined.components() {
        match component {
            std::path::Component::ParentDir => {
                components.pop();
            }
            std::path::Component::Normal(s) => {
                components.push(s.to_string_lossy().to_string());
            }
            _ => {}
        }
    }
    components.join("/")
}
