// tests/common/mod.rs
//! Shared fixture loading for the integration tests.

use notion2obsidian::{RecordIndex, TreeSnapshot};
use std::path::PathBuf;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn load_index() -> RecordIndex {
    let text = std::fs::read_to_string(fixture_path("export_index.json"))
        .expect("index fixture should be readable");
    RecordIndex::from_json_str(&text).expect("index fixture should parse")
}

pub fn load_tree() -> TreeSnapshot {
    let text = std::fs::read_to_string(fixture_path("tree.json"))
        .expect("tree fixture should be readable");
    serde_json::from_str(&text).expect("tree fixture should parse")
}
