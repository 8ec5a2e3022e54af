//! Configuration for the documentation generator
//!
//! Values come from three layers, lowest precedence first: built-in
//! defaults, an optional `docgen.toml` file, and `SCHEMADOC_*` environment
//! variables. The CLI applies its flags on top. The resulting value is
//! passed explicitly into the pipeline and assembler — there is no global
//! options store.
//!
//! ## Example config file (docgen.toml):
//! ```toml
//! input = "./schemas"
//! out = "./docs"
//! extension = "schema.json"
//! readme = true
//!
//! [meta]
//! template = "reference"
//!
//! [links]
//! status = "status.md"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main configuration for a documentation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocgenConfig {
    /// Directory containing the schema files (the base for relative paths)
    pub input: PathBuf,

    /// Output directory for generated Markdown
    pub out: PathBuf,

    /// Optional directory of handlebars templates overriding the built-ins
    pub templates: Option<PathBuf>,

    /// File extension identifying schema files
    pub extension: String,

    /// Front-matter metadata added to every generated document
    pub meta: BTreeMap<String, String>,

    /// Attribute name -> explanatory document path, linked from the header table
    pub links: BTreeMap<String, String>,

    /// Generate a README.md index in the output directory
    pub readme: bool,

    /// Write decorated schema JSON artifacts under `_new/`
    pub schema_out: bool,

    /// Optional meta schema used to validate every input file during load
    pub meta_schema: Option<PathBuf>,
}

impl Default for DocgenConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("."),
            out: PathBuf::from("out"),
            templates: None,
            extension: "schema.json".to_string(),
            meta: BTreeMap::new(),
            links: BTreeMap::new(),
            readme: true,
            schema_out: false,
            meta_schema: None,
        }
    }
}

impl DocgenConfig {
    /// Load configuration from defaults, an optional file, and environment.
    ///
    /// With no explicit `config_file`, a `docgen.toml` next to the working
    /// directory is picked up when present.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = match config_file {
            Some(path) => Config::builder().add_source(File::from(path.to_path_buf())),
            None => Config::builder().add_source(File::with_name("docgen").required(false)),
        };
        builder
            .add_source(Environment::with_prefix("SCHEMADOC").separator("__"))
            .build()?
            .try_deserialize()
    }
}
