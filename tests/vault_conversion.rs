// tests/vault_conversion.rs
//! End-to-end conversion of the fixture export into an output plan.

mod common;

use common::{load_index, load_tree};
use notion2obsidian::{convert_export, convert_record, NodeId, RecordIndex};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_intro_page_opens_with_title_and_bold_text() {
    let conversion = convert_export(&load_index(), &load_tree()).unwrap();
    let intro = conversion.plan.file_content("Intro.md").unwrap();
    assert!(intro.starts_with("# Intro\n\nHello **world**\n\n"));
}

#[test]
fn test_list_runs_are_regrouped() {
    let conversion = convert_export(&load_index(), &load_tree()).unwrap();
    let intro = conversion.plan.file_content("Intro.md").unwrap();
    let lines: Vec<&str> = intro.lines().collect();
    let one = lines.iter().position(|line| *line == "- One").unwrap();
    assert_eq!(lines[one + 1], "- Two");
    assert_eq!(lines[one + 2], "");
    for (offset, (number, text)) in [("1.", "Three"), ("2.", "Four")].into_iter().enumerate() {
        let line = lines[one + 3 + offset];
        assert!(line.starts_with(number) && line.ends_with(text), "{line:?}");
    }
    assert_eq!(lines[one + 5..one + 8], ["", "- Five", ""]);
    assert!(!intro.contains("<!-- end list -->"));
}

#[test]
fn test_shared_comment_thread_is_one_footnote() {
    let conversion = convert_export(&load_index(), &load_tree()).unwrap();
    let intro = conversion.plan.file_content("Intro.md").unwrap();
    assert_eq!(intro.matches("[^1]:").count(), 1);
    assert!(intro.contains("[^1]: Looks good"));
    assert!(!intro.contains("[^2]"));
}

#[test]
fn test_transclusions_and_nested_pages() {
    let conversion = convert_export(&load_index(), &load_tree()).unwrap();
    let intro = conversion.plan.file_content("Intro.md").unwrap();
    assert_eq!(intro.matches("![[transclusions/x1]]").count(), 2);
    assert!(intro.contains("[[Intro/Details|Details]]"));

    assert_eq!(
        conversion.plan.file_content("transclusions/x1.md"),
        Some("Shared\n")
    );
    assert_eq!(
        conversion.plan.file_content("Intro/Details.md"),
        Some("# Details\n\nSee [[Intro]]\n")
    );
}

#[test]
fn test_collection_index_and_members() {
    let conversion = convert_export(&load_index(), &load_tree()).unwrap();
    assert_eq!(
        conversion.plan.file_content("Tasks/_.md"),
        Some(concat!(
            "# Tasks\n\n",
            "## All tasks\n\n",
            "```dataview\nTABLE done\nFROM \"Tasks\"\nWHERE file.name != \"_\"\n```\n"
        ))
    );

    let write = conversion.plan.file_content("Tasks/Write.md").unwrap();
    let review = conversion.plan.file_content("Tasks/Review.md").unwrap();
    assert!(write.starts_with("---\n") && write.contains("✅") && write.ends_with("# Write\n"));
    assert!(review.contains("❌") && !review.contains("✅"));
}

#[test]
fn test_report_counts() {
    let conversion = convert_export(&load_index(), &load_tree()).unwrap();
    assert_eq!(conversion.plan.counts(), (6, 0));
    assert_eq!(conversion.report.documents, 6);
    assert_eq!(conversion.report.unrecognized_blocks, 1);
    assert!(conversion.report.skipped.is_empty());
}

#[test]
fn test_conversion_is_deterministic() {
    let index = load_index();
    let tree = load_tree();
    let first = convert_export(&index, &tree).unwrap();
    let second = convert_export(&load_index(), &tree).unwrap();
    assert_eq!(first.plan, second.plan);
}

#[test]
fn test_unresolvable_record_is_skipped_not_fatal() {
    let index = RecordIndex::from_value(json!({
        "block": {
            "orphan": {"value": {"id": "orphan", "type": "page",
                "properties": {"title": [["Lost"]]},
                "parent_id": "nowhere", "parent_table": "block"}}
        }
    }));
    let conversion = convert_record(&index, &NodeId::new("orphan")).unwrap();
    assert!(conversion.plan.is_empty());
    assert_eq!(conversion.report.skipped.len(), 1);
    assert_eq!(conversion.report.skipped[0].id, NodeId::new("orphan"));
}

#[test]
fn test_transclusion_satellite_is_byte_identical() {
    let first = convert_export(&load_index(), &load_tree()).unwrap();
    let second = convert_export(&load_index(), &load_tree()).unwrap();
    let alone = convert_record(&load_index(), &NodeId::new("intro")).unwrap();

    let satellite = first.plan.file_content("transclusions/x1.md").unwrap();
    assert_eq!(second.plan.file_content("transclusions/x1.md"), Some(satellite));
    assert_eq!(alone.plan.file_content("transclusions/x1.md"), Some(satellite));
}

#[test]
fn test_front_matter_follows_schema_order() {
    let index = RecordIndex::from_json_str(
        r#"{
            "block": {
                "tasks": {"value": {"id": "tasks", "type": "collection_view_page",
                    "parent_id": "space-1", "parent_table": "space", "collection_id": "c1"}},
                "row": {"value": {"id": "row", "type": "page",
                    "parent_id": "c1", "parent_table": "collection",
                    "properties": {"title": [["Row"]], "zstatus": [["Yes"]], "anote": [["hi"]]}}}
            },
            "collection": {
                "c1": {"value": {"id": "c1", "name": [["Tasks"]],
                    "parent_id": "tasks", "parent_table": "block",
                    "schema": {
                        "title": {"name": "Name", "type": "title"},
                        "zstatus": {"name": "Status", "type": "checkbox"},
                        "anote": {"name": "Note", "type": "text"}
                    }}}
            }
        }"#,
    )
    .unwrap();
    let conversion = convert_record(&index, &NodeId::new("row")).unwrap();
    assert_eq!(
        conversion.plan.file_content("Tasks/Row.md"),
        Some("---\nstatus: ✅\nnote: hi\n---\n\n# Row\n")
    );
}

#[test]
fn test_sibling_pages_with_one_title_get_distinct_paths() {
    let index = RecordIndex::from_value(json!({
        "block": {
            "home": {"value": {"id": "home", "type": "page", "properties": {"title": [["Home"]]},
                "parent_id": "space-1", "parent_table": "space", "content": ["aaaaaaaa-1", "bbbbbbbb-2"]}},
            "aaaaaaaa-1": {"value": {"id": "aaaaaaaa-1", "type": "page", "properties": {"title": [["Same"]]},
                "parent_id": "home", "parent_table": "block"}},
            "bbbbbbbb-2": {"value": {"id": "bbbbbbbb-2", "type": "page", "properties": {"title": [["Same"]]},
                "parent_id": "home", "parent_table": "block"}}
        }
    }));
    let conversion = convert_record(&index, &NodeId::new("home")).unwrap();
    assert_eq!(conversion.plan.file_content("Home/Same (aaaaaaaa).md"), Some("# Same\n"));
    assert_eq!(conversion.plan.file_content("Home/Same (bbbbbbbb).md"), Some("# Same\n"));
    assert!(conversion.plan.file_content("Home/Same.md").is_none());

    let home = conversion.plan.file_content("Home.md").unwrap();
    assert!(home.contains("[[Home/Same (aaaaaaaa)|Same]]"));
    assert!(home.contains("[[Home/Same (bbbbbbbb)|Same]]"));
}
