//! Documentation generator CLI
//!
//! Generates one Markdown reference page per JSON Schema file found under
//! the input directory, plus an optional README index.

use anyhow::{bail, Context};
use clap::Parser;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use schemadoc::{DocgenConfig, Pipeline};

#[derive(Parser)]
#[command(name = "schemadoc")]
#[command(about = "Generate Markdown documentation from JSON Schema")]
struct Cli {
    /// Directory containing the JSON Schema files
    #[arg(short = 'd', long)]
    input: PathBuf,

    /// Output directory [default: out]
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Directory of handlebars templates overriding the built-ins
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Front-matter metadata added to every document, repeatable: -m key=value
    #[arg(short, long = "meta", value_name = "KEY=VALUE")]
    meta: Vec<String>,

    /// Attribute link entries for the header table, repeatable: --link status=status.md
    #[arg(long = "link", value_name = "ATTR=FILE")]
    links: Vec<String>,

    /// Schema file extension [default: schema.json]
    #[arg(short, long)]
    extension: Option<String>,

    /// Validate every schema against this meta schema before rendering
    #[arg(short = 's', long)]
    meta_schema: Option<PathBuf>,

    /// Do not generate a README.md index in the output directory
    #[arg(short = 'n', long)]
    no_readme: bool,

    /// Write decorated schema JSON artifacts under <out>/_new
    #[arg(short = 'x', long)]
    schema_out: bool,

    /// Configuration file (docgen.toml is picked up by default when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = DocgenConfig::load(cli.config.as_deref()).context("loading configuration")?;

    config.input = cli.input;
    if let Some(out) = cli.out {
        config.out = out;
    }
    if let Some(templates) = cli.templates {
        config.templates = Some(templates);
    }
    if let Some(extension) = cli.extension {
        config.extension = extension;
    }
    if let Some(meta_schema) = cli.meta_schema {
        config.meta_schema = Some(meta_schema);
    }
    if cli.no_readme {
        config.readme = false;
    }
    if cli.schema_out {
        config.schema_out = true;
    }
    parse_pairs(&cli.meta, "-m", &mut config.meta)?;
    parse_pairs(&cli.links, "--link", &mut config.links)?;

    if !config.input.exists() {
        bail!("input directory {} does not exist", config.input.display());
    }

    let report = Pipeline::new(config).run()?;
    println!(
        "Generated {} documents ({} warnings)",
        report.documents.len(),
        report.warnings
    );
    Ok(())
}

fn parse_pairs(
    pairs: &[String],
    flag: &str,
    into: &mut BTreeMap<String, String>,
) -> anyhow::Result<()> {
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("invalid {flag} value '{pair}', expected key=value");
        };
        into.insert(key.to_string(), value.to_string());
    }
    Ok(())
}
