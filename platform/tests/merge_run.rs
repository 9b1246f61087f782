use std::fs;
use std::path::{Path, PathBuf};

use schema_merge_core::{
    EXTERNAL_CONFIG_NAME, EXTERNAL_CONFIG_REF, PLATFORM_CONFIG_NAME, PLATFORM_CONFIG_REF,
    SchemaError, load_schema,
};
use schema_merge_platform::{MergeConfig, PlatformError, run_merge_schemas};
use serde_json::{Value, json};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn values_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "properties": {
            "controlPlane": { "$ref": "#/$defs/ControlPlane" },
            "external": {
                "type": "object",
                "additionalProperties": false,
                "description": "External holds configuration for tools external to the instance."
            },
            "telemetry": { "type": "object" }
        },
        "$defs": {
            "ControlPlane": { "type": "object", "properties": { "replicas": { "type": "integer" } } }
        },
        "additionalProperties": false
    })
}

fn platform_schema() -> Value {
    json!({
        "properties": {
            "apiKey": { "type": "object", "description": "authored api key" },
            "autoSleep": { "$ref": "#/$defs/AutoSleep" }
        },
        "$defs": {
            "AutoSleep": {
                "type": "object",
                "properties": { "afterInactivity": { "type": "integer" } }
            }
        }
    })
}

struct Fixture {
    dir: TempDir,
    config: MergeConfig,
}

fn fixture(values: &Value, platform: &Value) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let values_path = write_json(dir.path(), "values.schema.json", values);
    let platform_path = write_json(dir.path(), "platform.schema.json", platform);
    let config = MergeConfig::new(
        values_path,
        platform_path,
        dir.path().join("out/values.schema.json"),
    )
    .with_root_type_output(dir.path().join("debug/platform-config.schema.json"));
    Fixture { dir, config }
}

fn read_value(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// Successful runs
// ---------------------------------------------------------------------------

#[test]
fn merge_run_grafts_platform_config() {
    let fx = fixture(&values_schema(), &platform_schema());

    let summary = run_merge_schemas(&fx.config).unwrap();
    assert!(summary.unresolved.is_empty(), "{:?}", summary.unresolved);
    assert_eq!(summary.property_count, 3);

    let merged = read_value(&fx.config.output);
    assert_eq!(
        merged["properties"]["external"],
        json!({
            "$ref": EXTERNAL_CONFIG_REF,
            "description": "External holds configuration for tools external to the instance."
        })
    );

    let external_config = &merged["$defs"][EXTERNAL_CONFIG_NAME];
    assert_eq!(external_config["$ref"], EXTERNAL_CONFIG_REF);
    assert_eq!(
        external_config["properties"]["platform"],
        json!({
            "$ref": PLATFORM_CONFIG_REF,
            "type": "object",
            "description": "platform holds platform configuration"
        })
    );

    let platform_config = &merged["$defs"][PLATFORM_CONFIG_NAME];
    assert_eq!(platform_config["type"], "object");
    let names: Vec<&str> = platform_config["properties"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(names, vec!["apiKey", "autoSleep", "project"]);
    assert_eq!(
        platform_config["properties"]["apiKey"]["$ref"],
        "#/$defs/PlatformAPIKey"
    );

    let definitions: Vec<&str> = merged["$defs"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        definitions,
        vec![
            "AutoSleep",
            "ControlPlane",
            "ExternalConfig",
            "PlatformAPIKey",
            "PlatformConfig"
        ]
    );
    assert_eq!(summary.definition_count, definitions.len());
}

#[test]
fn merge_run_keeps_host_property_order_and_keywords() {
    let fx = fixture(&values_schema(), &platform_schema());
    run_merge_schemas(&fx.config).unwrap();

    let merged = load_schema(&fx.config.output).unwrap();
    assert_eq!(
        merged.property_names(),
        vec!["controlPlane", "external", "telemetry"]
    );
    assert_eq!(
        merged.extra.get("$schema"),
        Some(&json!("https://json-schema.org/draft/2020-12/schema"))
    );
    assert!(merged.additional_properties.unwrap().is_disallowed());
}

#[test]
fn merge_run_writes_root_type_artifact() {
    let fx = fixture(&values_schema(), &platform_schema());
    run_merge_schemas(&fx.config).unwrap();

    let root_type = load_schema(&fx.config.root_type_output).unwrap();
    assert_eq!(root_type.property_names(), vec!["apiKey", "project"]);
    assert!(root_type.definitions.contains(PLATFORM_CONFIG_NAME));
    assert!(root_type.definitions.contains("PlatformAPIKey"));
}

#[test]
fn merge_run_twice_is_byte_identical() {
    let fx = fixture(&values_schema(), &platform_schema());

    run_merge_schemas(&fx.config).unwrap();
    let first = fs::read(&fx.config.output).unwrap();
    run_merge_schemas(&fx.config).unwrap();
    let second = fs::read(&fx.config.output).unwrap();

    assert_eq!(first, second);
    assert!(first.starts_with(b"{\n  \""));
}

#[test]
fn merge_run_updates_existing_external_config() {
    let mut values = values_schema();
    values["$defs"][EXTERNAL_CONFIG_NAME] = json!({
        "type": "object",
        "description": "stale",
        "properties": { "old": { "type": "string" } }
    });
    let fx = fixture(&values, &platform_schema());

    run_merge_schemas(&fx.config).unwrap();

    let merged = read_value(&fx.config.output);
    let external_config = &merged["$defs"][EXTERNAL_CONFIG_NAME];
    assert_eq!(external_config["type"], "object");
    assert_eq!(
        external_config["description"],
        "ExternalConfig holds external configuration"
    );
    assert!(external_config["properties"].get("old").is_none());
}

#[test]
fn merge_run_without_external_property() {
    let values = json!({
        "type": "object",
        "properties": { "x": { "type": "string" }, "y": { "type": "integer" } }
    });
    let fx = fixture(&values, &platform_schema());

    run_merge_schemas(&fx.config).unwrap();

    let merged = read_value(&fx.config.output);
    assert_eq!(merged["properties"], values["properties"]);
    assert!(merged["$defs"].get(PLATFORM_CONFIG_NAME).is_some());
}

#[test]
fn merge_run_accepts_definitions_keyword() {
    let values = json!({
        "properties": { "external": { "type": "object" } },
        "definitions": { "Legacy": { "type": "string" } }
    });
    let fx = fixture(&values, &platform_schema());

    run_merge_schemas(&fx.config).unwrap();

    let merged = read_value(&fx.config.output);
    assert!(merged.get("definitions").is_none());
    assert_eq!(merged["$defs"]["Legacy"]["type"], "string");
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn merge_run_rejects_definition_collision() {
    let mut values = values_schema();
    values["$defs"]["AutoSleep"] = json!({ "type": "string" });
    let fx = fixture(&values, &platform_schema());

    let err = run_merge_schemas(&fx.config).unwrap_err();
    match err {
        PlatformError::Schema(SchemaError::DefinitionCollision { name, .. }) => {
            assert_eq!(name, "AutoSleep");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!fx.config.output.exists());
}

#[test]
fn merge_run_reports_missing_values_schema() {
    let fx = fixture(&values_schema(), &platform_schema());
    let config = MergeConfig {
        values_schema: fx.dir.path().join("missing.json"),
        ..fx.config.clone()
    };

    let err = run_merge_schemas(&config).unwrap_err();
    assert!(matches!(err, PlatformError::Schema(SchemaError::Read { .. })));
    assert!(err.to_string().contains("missing.json"));
    assert!(!config.root_type_output.exists());
}

#[test]
fn merge_run_reports_malformed_platform_schema() {
    let fx = fixture(&values_schema(), &platform_schema());
    fs::write(&fx.config.platform_schema, "{ not json").unwrap();

    let err = run_merge_schemas(&fx.config).unwrap_err();
    assert!(matches!(
        err,
        PlatformError::Schema(SchemaError::Parse { .. })
    ));
}
