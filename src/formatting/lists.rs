// src/formatting/lists.rs
//! Block tree assembly and the list regrouping pass.
//!
//! The export stores list items as flat siblings. Before transformation,
//! consecutive items of the same list kind are gathered under a synthetic
//! [`TreeNode::ListRun`] wrapper, which maps directly onto a Markdown list.

use crate::constants::MAX_TREE_DEPTH;
use crate::model::{BlockKind, BlockRecord, ListKind, RecordIndex};
use crate::types::NodeId;
use im_rc::HashSet;

/// A node of an assembled block tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode<'a> {
    Block {
        record: &'a BlockRecord,
        children: Vec<TreeNode<'a>>,
    },
    /// Synthetic wrapper around a run of list items; exists only during one conversion.
    ListRun {
        kind: ListKind,
        items: Vec<TreeNode<'a>>,
    },
}

impl<'a> TreeNode<'a> {
    pub fn leaf(record: &'a BlockRecord) -> Self {
        TreeNode::Block {
            record,
            children: Vec::new(),
        }
    }

    fn list_kind(&self) -> Option<ListKind> {
        match self {
            TreeNode::Block { record, .. } => record.kind.list_kind(),
            TreeNode::ListRun { .. } => None,
        }
    }
}

/// Assembles the children of `root` from the index.
///
/// Missing and deleted children are skipped. Nested pages are kept as leaves
/// since their content belongs to their own document. Assembly stops at
/// [`MAX_TREE_DEPTH`] and on a child list that loops back to an ancestor.
pub fn assemble_children<'a>(index: &'a RecordIndex, root: &'a BlockRecord) -> Vec<TreeNode<'a>> {
    let ancestors = HashSet::unit(root.id.clone());
    assemble_level(index, root, &ancestors, 0)
}

fn assemble_level<'a>(
    index: &'a RecordIndex,
    parent: &'a BlockRecord,
    ancestors: &HashSet<NodeId>,
    depth: usize,
) -> Vec<TreeNode<'a>> {
    if depth >= MAX_TREE_DEPTH {
        log::warn!(
            "Block tree under {} exceeds depth {}, truncating",
            parent.id,
            MAX_TREE_DEPTH
        );
        return Vec::new();
    }

    let mut children = Vec::with_capacity(parent.content.len());
    for child_id in &parent.content {
        let Some(child) = index.block(child_id) else {
            log::warn!("Child {} of {} not in index, skipping", child_id, parent.id);
            continue;
        };
        if !child.alive {
            log::debug!("Skipping deleted block {}", child_id);
            continue;
        }
        if ancestors.contains(child_id) {
            log::warn!("Cycle detected: {} is its own ancestor, skipping", child_id);
            continue;
        }

        let node = if matches!(child.kind, BlockKind::Page | BlockKind::CollectionViewPage) {
            TreeNode::leaf(child)
        } else {
            let nested = ancestors.update(child_id.clone());
            TreeNode::Block {
                record: child,
                children: assemble_level(index, child, &nested, depth + 1),
            }
        };
        children.push(node);
    }
    children
}

/// Gathers consecutive list items into list wrappers, at every level.
///
/// Bullet and checkbox items share an unordered wrapper, numbered items an
/// ordered one; any other node closes the open wrapper. Returns a new tree and
/// is idempotent.
pub fn regroup<'a>(children: Vec<TreeNode<'a>>) -> Vec<TreeNode<'a>> {
    let mut output: Vec<TreeNode<'a>> = Vec::with_capacity(children.len());
    let mut open: Option<(ListKind, Vec<TreeNode<'a>>)> = None;

    for child in children {
        let child = regroup_inside(child);
        match (child.list_kind(), open.as_mut()) {
            (Some(kind), Some((open_kind, items))) if *open_kind == kind => items.push(child),
            (Some(kind), _) => {
                if let Some((kind, items)) = open.take() {
                    output.push(TreeNode::ListRun { kind, items });
                }
                open = Some((kind, vec![child]));
            }
            (None, _) => {
                if let Some((kind, items)) = open.take() {
                    output.push(TreeNode::ListRun { kind, items });
                }
                output.push(child);
            }
        }
    }
    if let Some((kind, items)) = open {
        output.push(TreeNode::ListRun { kind, items });
    }
    output
}

fn regroup_inside(node: TreeNode<'_>) -> TreeNode<'_> {
    match node {
        TreeNode::Block { record, children } => TreeNode::Block {
            record,
            children: regroup(children),
        },
        TreeNode::ListRun { kind, items } => TreeNode::ListRun {
            kind,
            items: items.into_iter().map(regroup_inside).collect(),
        },
    }
}
