// tests/vault_delivery.rs
//! Writing a converted plan into a real directory.

mod common;

use common::{load_index, load_tree};
use notion2obsidian::{convert_export, convert_record, deliver, FileSystemAttachments, NodeId, RecordIndex};
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn test_fixture_vault_is_written() {
    let vault = TempDir::new().unwrap();
    let files = TempDir::new().unwrap();
    let conversion = convert_export(&load_index(), &load_tree()).unwrap();

    let report = deliver(
        conversion.plan,
        vault.path(),
        &FileSystemAttachments::new(files.path()),
    )
    .await
    .unwrap();

    assert!(report.is_success());
    assert_eq!(report.stats.operations_completed, 6);
    let intro = std::fs::read_to_string(vault.path().join("Intro.md")).unwrap();
    assert!(intro.starts_with("# Intro\n"));
    assert!(vault.path().join("Tasks/_.md").is_file());
    assert!(vault.path().join("transclusions/x1.md").is_file());
}

#[tokio::test]
async fn test_attachments_are_copied_next_to_their_page() {
    let index = RecordIndex::from_value(json!({"block": {
        "p": {"value": {"id": "p", "type": "page", "properties": {"title": [["Album"]]},
            "parent_id": "s", "parent_table": "space", "content": ["i", "j"]}},
        "i": {"value": {"id": "i", "type": "image", "parent_id": "p", "parent_table": "block",
            "properties": {"source": [["https://s3.example.com/f1/cat.png"]]}, "file_ids": ["f1"]}},
        "j": {"value": {"id": "j", "type": "image", "parent_id": "p", "parent_table": "block",
            "properties": {"source": [["https://s3.example.com/f2/dog.png"]]}, "file_ids": ["f2"]}}
    }}));
    let conversion = convert_record(&index, &NodeId::new("p")).unwrap();
    assert_eq!(conversion.plan.counts(), (1, 2));

    let vault = TempDir::new().unwrap();
    let files = TempDir::new().unwrap();
    std::fs::create_dir_all(files.path().join("f1")).unwrap();
    std::fs::write(files.path().join("f1/cat.png"), b"meow").unwrap();

    let report = deliver(
        conversion.plan,
        vault.path(),
        &FileSystemAttachments::new(files.path()),
    )
    .await
    .unwrap();

    // The dog picture is missing from the files directory
    assert_eq!(report.failed.len(), 1);
    assert_eq!(
        std::fs::read(vault.path().join("Album/cat.png")).unwrap(),
        b"meow"
    );
    assert!(vault.path().join("Album.md").is_file());
}
