use std::path::Path;

use json_schema_table::{FieldTable, SchemaNode, transform};
use serde_json::Value;

fn run_fixture(path: &Path) {
    let source = std::fs::read_to_string(path).unwrap();
    let fixture: Value = serde_json::from_str(&source).unwrap();
    let name = fixture["name"].as_str().unwrap_or_default();

    let overrides = fixture
        .get("overrides")
        .map(|value| FieldTable::from_value(value.clone()).unwrap());
    let outcome = SchemaNode::from_value(fixture["schema"].clone())
        .and_then(|schema| transform(&schema, overrides.as_ref()));

    match (outcome, fixture.get("expect"), fixture.get("error")) {
        (Ok(table), Some(expect), None) => {
            assert_eq!(&serde_json::to_value(&table).unwrap(), expect, "{name}");
        }
        (Err(error), None, Some(kind)) => {
            assert_eq!(Some(error.kind()), kind.as_str(), "{name}: {error}");
        }
        (outcome, expect, error) => {
            panic!("{name}: outcome {outcome:?} does not match expect={expect:?} error={error:?}")
        }
    }
}

#[test]
fn all_fixtures_pass() {
    let pattern = format!("{}/fixtures/*.json", env!("CARGO_MANIFEST_DIR"));
    let mut count = 0;
    for entry in glob::glob(&pattern).unwrap() {
        run_fixture(&entry.unwrap());
        count += 1;
    }
    assert!(count >= 11, "expected the fixture set, found {count} files");
}
