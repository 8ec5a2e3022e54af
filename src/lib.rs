//! Markdown reference documentation from JSON Schema directories
//!
//! Loads a tree of JSON Schema files, resolves the reference graph between
//! them, and renders one cross-linked Markdown page per schema.
//!
//! ## Pipeline
//!
//! Processing runs in two strict phases with a hard barrier between them:
//!
//! 1. **Load** — every schema file is parsed and registered in the corpus.
//!    A malformed file aborts the run before anything is written.
//! 2. **Render** — the dependency graph is built over the full corpus, then
//!    each schema is flattened, slugged, and assembled into a document.
//!    Unresolved references and unmodeled type shapes degrade to fallback
//!    labels; the document is still produced.
//!
//! ```text
//! schemas/                      out/
//! ├── address.schema.json  ==>  ├── address.md
//! ├── customer.schema.json ==>  ├── customer.md
//! ├── geo/                      ├── geo/
//! │   └── point.schema.json     │   └── point.md
//! └── ...                       └── README.md
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod graph;
pub mod loader;
pub mod pipeline;
pub mod render;
pub mod resolver;
pub mod schema;
pub mod simplify;
pub mod slug;

pub use config::DocgenConfig;
pub use diagnostics::{DiagnosticCode, DiagnosticItem, Diagnostics};
pub use error::{DocgenError, Result};
pub use graph::{DependencyEntry, DependencyMap};
pub use loader::Corpus;
pub use pipeline::{Pipeline, RunReport};
pub use render::{DocumentAssembler, RenderedDocument, TemplateEngine};
pub use schema::{Schema, SchemaId, SchemaSummary};
pub use simplify::{DecoratedProperty, PropertyShape, SimpleType};
pub use slug::Slugger;
