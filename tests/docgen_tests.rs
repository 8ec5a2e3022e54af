//! End-to-end pipeline tests over the JSON fixtures

use std::fs;
use std::path::{Path, PathBuf};

use schemadoc::{DependencyMap, DocgenConfig, DocgenError, Pipeline};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn config_for(out: &Path) -> DocgenConfig {
    DocgenConfig {
        input: fixtures_dir(),
        out: out.to_path_buf(),
        ..DocgenConfig::default()
    }
}

#[test]
fn full_run_writes_one_document_per_schema() {
    let out = tempfile::tempdir().unwrap();
    let report = Pipeline::new(config_for(out.path())).run().unwrap();

    assert_eq!(report.documents.len(), 3);
    assert!(out.path().join("address.md").is_file());
    assert!(out.path().join("customer.md").is_file());
    assert!(out.path().join("geo/point.md").is_file());
    assert!(out.path().join("README.md").is_file());
}

#[test]
fn resolved_references_use_definition_titles() {
    let out = tempfile::tempdir().unwrap();
    Pipeline::new(config_for(out.path())).run().unwrap();

    let address = fs::read_to_string(out.path().join("address.md")).unwrap();
    // street resolves to the Street definition
    assert!(address.contains("`Street`"));
    // zip is a plain string and required
    assert!(address.contains("`string`"));
    assert!(address.contains("**Required**"));
    // lines is an array of strings
    assert!(address.contains("`string[]`"));
    // country is an enum with a documented and an undocumented value
    assert!(address.contains("`enum`"));
    assert!(address.contains("| `de` | Germany |"));
    assert!(address.contains("| `us` |  |"));
    // closed schema
    assert!(address.contains("No additional properties are allowed."));
}

#[test]
fn cross_document_references_degrade_with_warnings() {
    let out = tempfile::tempdir().unwrap();
    let report = Pipeline::new(config_for(out.path())).run().unwrap();

    let customer = fs::read_to_string(out.path().join("customer.md")).unwrap();
    assert!(customer.contains("`reference`"));
    // customer has two cross-document refs, both unresolved at type level
    assert_eq!(report.warnings, 2);
}

#[test]
fn slug_collisions_are_disambiguated_in_document_order() {
    let out = tempfile::tempdir().unwrap();
    Pipeline::new(config_for(out.path())).run().unwrap();

    let customer = fs::read_to_string(out.path().join("customer.md")).unwrap();
    assert!(customer.contains("[Type](#type)"));
    assert!(customer.contains("[type](#type-1)"));
    assert!(customer.contains("<a name=\"type\"></a>"));
    assert!(customer.contains("<a name=\"type-1\"></a>"));
}

#[test]
fn dependency_tables_link_across_directories() {
    let out = tempfile::tempdir().unwrap();
    Pipeline::new(config_for(out.path())).run().unwrap();

    let customer = fs::read_to_string(out.path().join("customer.md")).unwrap();
    assert!(customer.contains("[Address](address.md)"));
    assert!(customer.contains("`Street`"));
    assert!(customer.contains("[Geo Point](geo/point.md)"));

    // the referenced schema lists its dependents
    let address = fs::read_to_string(out.path().join("address.md")).unwrap();
    assert!(address.contains("## Referenced by"));
    assert!(address.contains("[Customer](customer.md)"));

    // links out of a subdirectory walk back up
    let point = fs::read_to_string(out.path().join("geo/point.md")).unwrap();
    assert!(point.contains("[Customer](../customer.md)"));
}

#[test]
fn dependency_edges_match_actual_definitions() {
    let corpus =
        schemadoc::loader::load_from_directory(&fixtures_dir(), "schema.json", None).unwrap();
    let map = DependencyMap::build(&corpus);

    for schema in corpus.schemas() {
        for entry in map.dependencies_of(&schema.id) {
            if let Some(definition) = &entry.definition {
                let target = corpus.get(&entry.schema_id).unwrap();
                assert!(
                    target.definition(definition).is_some(),
                    "{} -> {} names unknown definition {}",
                    schema.id,
                    entry.schema_id,
                    definition
                );
            }
        }
    }
}

#[test]
fn no_blank_line_runs_survive_concatenation() {
    let out = tempfile::tempdir().unwrap();
    Pipeline::new(config_for(out.path())).run().unwrap();

    for name in ["address.md", "customer.md", "geo/point.md"] {
        let markdown = fs::read_to_string(out.path().join(name)).unwrap();
        assert!(!markdown.contains("\n\n\n"), "{name} has blank-line runs");
    }
}

#[test]
fn front_matter_and_examples_render() {
    let out = tempfile::tempdir().unwrap();
    let mut config = config_for(out.path());
    config
        .meta
        .insert("template".to_string(), "reference".to_string());
    Pipeline::new(config).run().unwrap();

    let address = fs::read_to_string(out.path().join("address.md")).unwrap();
    assert!(address.starts_with("---"));
    assert!(address.contains("template: reference"));
    assert!(address.contains("## Address Examples"));
    assert!(address.contains("Alexanderplatz 1"));
}

#[test]
fn readme_lists_documents_and_can_be_suppressed() {
    let out = tempfile::tempdir().unwrap();
    Pipeline::new(config_for(out.path())).run().unwrap();
    let readme = fs::read_to_string(out.path().join("README.md")).unwrap();
    assert!(readme.contains("[Address](address.md)"));
    assert!(readme.contains("[Geo Point](geo/point.md)"));

    let out = tempfile::tempdir().unwrap();
    let mut config = config_for(out.path());
    config.readme = false;
    Pipeline::new(config).run().unwrap();
    assert!(!out.path().join("README.md").exists());
}

#[test]
fn schema_out_artifacts_carry_decorations() {
    let out = tempfile::tempdir().unwrap();
    let mut config = config_for(out.path());
    config.schema_out = true;
    Pipeline::new(config).run().unwrap();

    let artifact: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(out.path().join("_new/address.schema.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(
        artifact["properties"]["street"]["isrequired"],
        serde_json::json!(true)
    );
    assert_eq!(
        artifact["properties"]["country"]["meta:enum"]["us"],
        serde_json::json!("")
    );
    assert_eq!(
        artifact["properties"]["country"]["meta:enum"]["de"],
        serde_json::json!("Germany")
    );
}

#[test]
fn malformed_schema_aborts_the_whole_run() {
    let out = tempfile::tempdir().unwrap();
    let mut config = config_for(out.path());
    config.input = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures-bad");

    let result = Pipeline::new(config).run();
    assert!(matches!(result, Err(DocgenError::Parse { .. })));
    // nothing was written
    assert!(!out.path().join("README.md").exists());
}

#[test]
fn meta_schema_validation_is_fatal_on_mismatch() {
    let scratch = tempfile::tempdir().unwrap();
    let meta_path = scratch.path().join("meta.schema.json");

    // every fixture declares $schema, so this passes
    fs::write(
        &meta_path,
        r#"{"type": "object", "required": ["$schema"]}"#,
    )
    .unwrap();
    let out = tempfile::tempdir().unwrap();
    let mut config = config_for(out.path());
    config.meta_schema = Some(meta_path.clone());
    Pipeline::new(config).run().unwrap();

    // no fixture declares this key, so the run aborts
    fs::write(
        &meta_path,
        r#"{"type": "object", "required": ["x-never-present"]}"#,
    )
    .unwrap();
    let out = tempfile::tempdir().unwrap();
    let mut config = config_for(out.path());
    config.meta_schema = Some(meta_path);
    let result = Pipeline::new(config).run();
    assert!(matches!(result, Err(DocgenError::Validation { .. })));
}
