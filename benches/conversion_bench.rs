// benches/conversion_bench.rs
//! Benchmarks for conversion performance.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use notion2obsidian::formatting::lists::{assemble_children, regroup};
use notion2obsidian::{convert_record, NodeId, RecordIndex};
use serde_json::{json, Map, Value};

/// Builds an index with one page holding `breadth` blocks per level, `depth` levels deep.
fn create_sample_index(depth: usize, breadth: usize) -> RecordIndex {
    fn add_children(
        blocks: &mut Map<String, Value>,
        parent: &str,
        level: usize,
        max_depth: usize,
        breadth: usize,
    ) -> Vec<String> {
        if level > max_depth {
            return Vec::new();
        }
        (0..breadth)
            .map(|position| {
                let id = format!("{}-{}", parent, position);
                let kind = match position % 4 {
                    0 => "text",
                    1 => "bulleted_list",
                    2 => "bulleted_list",
                    _ => "numbered_list",
                };
                let content = add_children(blocks, &id, level + 1, max_depth, breadth);
                blocks.insert(
                    id.clone(),
                    json!({"value": {
                        "id": id, "type": kind, "parent_id": parent, "parent_table": "block",
                        "properties": {"title": [
                            [format!("Block at level {} ", level)],
                            ["bold", [["b"]]],
                            [" and ", [["i"]]],
                            ["a link", [["a", "https://example.com"]]]
                        ]},
                        "content": content
                    }}),
                );
                id
            })
            .collect()
    }

    let mut blocks = Map::new();
    let content = add_children(&mut blocks, "root", 1, depth, breadth);
    blocks.insert(
        "root".to_string(),
        json!({"value": {"id": "root", "type": "page", "parent_id": "s", "parent_table": "space",
            "properties": {"title": [["Benchmark"]]}, "content": content}}),
    );
    RecordIndex::from_value(json!({ "block": Value::Object(blocks) }))
}

fn bench_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_record");
    let root = NodeId::new("root");

    for (depth, breadth) in [(2, 10), (3, 8), (4, 5)] {
        let index = create_sample_index(depth, breadth);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", depth, breadth)),
            &index,
            |b, index| b.iter(|| convert_record(black_box(index), &root)),
        );
    }

    group.finish();
}

fn bench_list_regrouping(c: &mut Criterion) {
    let index = create_sample_index(3, 12);
    let root = NodeId::new("root");
    let Some(page) = index.block(&root) else {
        return;
    };

    c.bench_function("assemble_and_regroup", |b| {
        b.iter(|| regroup(assemble_children(black_box(&index), page)))
    });
}

criterion_group!(benches, bench_conversion, bench_list_regrouping);
criterion_main!(benches);
