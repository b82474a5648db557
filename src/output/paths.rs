// src/output/paths.rs
//! Path resolution: the vault path of any record, derived from its ancestry.
//!
//! Every cross-link, embed, attachment and emitted document goes through the
//! same [`PathResolver`], so a record always resolves to one path no matter
//! who asks.

use crate::constants::{
    COLLECTION_INDEX_FILE, MAX_ANCESTOR_DEPTH, TRANSCLUSION_DIR, UNTITLED_SEGMENT,
};
use crate::error::AppError;
use crate::formatting::rich_text::{plain_text, record_title};
use crate::model::{BlockKind, BlockRecord, CollectionRecord, ParentTable, RecordIndex};
use crate::types::NodeId;
use std::collections::HashMap;
use std::path::Path;

/// Whether a resolved path carries its `.md` / `/` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trailing {
    /// `.md` for documents, `/` for collection directories.
    Suffixed,
    /// No suffix, as used for wikilink targets.
    Bare,
}

/// A record on an ancestor chain.
#[derive(Debug, Clone, Copy)]
pub enum Ancestor<'a> {
    Block(&'a BlockRecord),
    Collection(&'a CollectionRecord),
}

impl<'a> Ancestor<'a> {
    pub fn id(&self) -> &'a NodeId {
        match self {
            Ancestor::Block(block) => &block.id,
            Ancestor::Collection(collection) => &collection.id,
        }
    }

    fn parent(&self) -> (&'a ParentTable, Option<&'a NodeId>) {
        match self {
            Ancestor::Block(block) => (&block.parent_table, block.parent_id.as_ref()),
            Ancestor::Collection(collection) => {
                (&collection.parent_table, collection.parent_id.as_ref())
            }
        }
    }

    /// Pages and collections name a path segment; every other record is transparent.
    fn contributes_segment(&self) -> bool {
        match self {
            Ancestor::Block(block) => block.kind == BlockKind::Page,
            Ancestor::Collection(_) => true,
        }
    }
}

/// Key under which sibling titles are counted: the nearest segment-naming
/// ancestor, whether the entry is a collection, and its sanitized title.
type SiblingKey = (Option<NodeId>, bool, String);

/// Resolves vault paths for records of one index.
pub struct PathResolver<'a> {
    index: &'a RecordIndex,
    sibling_titles: HashMap<SiblingKey, usize>,
}

impl<'a> PathResolver<'a> {
    /// Builds a resolver, counting sanitized sibling titles up front so that
    /// colliding names can be disambiguated the same way on every lookup.
    pub fn new(index: &'a RecordIndex) -> Self {
        let mut resolver = PathResolver {
            index,
            sibling_titles: HashMap::new(),
        };

        let mut counts: HashMap<SiblingKey, usize> = HashMap::new();
        let pages = index
            .blocks
            .values()
            .filter(|block| block.alive && block.kind == BlockKind::Page)
            .map(Ancestor::Block);
        let collections = index.collections.values().map(Ancestor::Collection);
        for entry in pages.chain(collections) {
            match resolver.sibling_key(entry) {
                Ok(key) => *counts.entry(key).or_default() += 1,
                Err(e) => log::debug!("Not counting {} for collisions: {}", entry.id(), e),
            }
        }
        resolver.sibling_titles = counts;
        resolver
    }

    pub fn index(&self) -> &'a RecordIndex {
        self.index
    }

    /// Looks up a block or a collection by id.
    pub fn lookup(&self, id: &NodeId) -> Option<Ancestor<'a>> {
        self.index
            .block(id)
            .map(Ancestor::Block)
            .or_else(|| self.index.collection(id).map(Ancestor::Collection))
    }

    /// The record followed by its ancestors, nearest first, up to the workspace root.
    pub fn ancestry(&self, id: &NodeId) -> Result<Vec<Ancestor<'a>>, AppError> {
        let mut current = self
            .lookup(id)
            .ok_or_else(|| AppError::unresolved(id, "record not in index"))?;
        let mut chain = vec![current];

        loop {
            if chain.len() > MAX_ANCESTOR_DEPTH {
                return Err(AppError::RecursionLimitExceeded(MAX_ANCESTOR_DEPTH));
            }
            let (table, parent_id) = current.parent();
            if table.is_root() {
                break;
            }
            let Some(parent_id) = parent_id else {
                log::debug!("{} has no parent; treating it as a root", current.id());
                break;
            };
            current = match table {
                ParentTable::Block => self.index.block(parent_id).map(Ancestor::Block),
                ParentTable::Collection => {
                    self.index.collection(parent_id).map(Ancestor::Collection)
                }
                ParentTable::Missing => {
                    log::debug!("{} has no parent table; treating it as a root", current.id());
                    break;
                }
                ParentTable::Unrecognized(name) => {
                    return Err(AppError::unresolved(
                        current.id(),
                        format!("unknown parent table '{}'", name),
                    ))
                }
                ParentTable::Space | ParentTable::Team => break,
            }
            .ok_or_else(|| {
                AppError::unresolved(parent_id, format!("parent of {} not in index", current.id()))
            })?;
            chain.push(current);
        }
        Ok(chain)
    }

    /// Canonical path of a record: segments of every page and collection from
    /// the root down, `.md` for documents and `/` for collection directories.
    pub fn resolve_path(&self, id: &NodeId, trailing: Trailing) -> Result<String, AppError> {
        let chain = self.ancestry(id)?;
        let segments: Vec<String> = chain
            .iter()
            .rev()
            .filter(|entry| entry.contributes_segment())
            .map(|entry| self.segment(*entry))
            .collect();
        let mut path = segments.join("/");

        if trailing == Trailing::Suffixed {
            match chain.first() {
                Some(Ancestor::Collection(_)) => path.push('/'),
                _ => path.push_str(".md"),
            }
        }
        Ok(path)
    }

    /// Directory of a collection, without trailing slash.
    pub fn collection_dir(&self, collection: &NodeId) -> Result<String, AppError> {
        self.resolve_path(collection, Trailing::Bare)
    }

    /// Path of the document that represents a record in the vault.
    pub fn document_path(&self, id: &NodeId) -> Result<String, AppError> {
        let record = self
            .lookup(id)
            .ok_or_else(|| AppError::unresolved(id, "record not in index"))?;
        match record {
            Ancestor::Collection(collection) => self.collection_index_path(&collection.id),
            Ancestor::Block(block) => match block.kind {
                BlockKind::Page => self.resolve_path(&block.id, Trailing::Suffixed),
                BlockKind::CollectionViewPage | BlockKind::CollectionView => {
                    let collection = block.collection_id.as_ref().ok_or_else(|| {
                        AppError::unresolved(&block.id, "collection view without collection")
                    })?;
                    self.collection_index_path(collection)
                }
                BlockKind::TransclusionContainer => Ok(transclusion_path(&block.id)),
                _ => {
                    let owner = self.owning_document(&block.id)?;
                    self.document_path(owner.id())
                }
            },
        }
    }

    /// The nearest ancestor (excluding the block itself) that owns a document.
    pub fn owning_document(&self, id: &NodeId) -> Result<Ancestor<'a>, AppError> {
        self.ancestry(id)?
            .into_iter()
            .skip(1)
            .find(|entry| match entry {
                Ancestor::Block(block) => block.kind.is_document(),
                Ancestor::Collection(_) => true,
            })
            .ok_or_else(|| AppError::unresolved(id, "no enclosing document"))
    }

    /// Wikilink target (document path without `.md`) and display label.
    ///
    /// The label is the record's own title, falling back to the last
    /// meaningful path segment.
    pub fn link_target(&self, id: &NodeId) -> Result<(String, String), AppError> {
        let document = self.document_path(id)?;
        let target = document
            .strip_suffix(".md")
            .unwrap_or(&document)
            .to_string();

        let title = record_title(id, self.index).trim().to_string();
        let label = if title.is_empty() {
            target
                .rsplit('/')
                .find(|segment| !segment.is_empty() && *segment != "_")
                .unwrap_or(UNTITLED_SEGMENT)
                .to_string()
        } else {
            title
        };
        Ok((target, label))
    }

    fn collection_index_path(&self, collection: &NodeId) -> Result<String, AppError> {
        let dir = self.collection_dir(collection)?;
        Ok(if dir.is_empty() {
            COLLECTION_INDEX_FILE.to_string()
        } else {
            format!("{}/{}", dir, COLLECTION_INDEX_FILE)
        })
    }

    fn title_of(&self, entry: Ancestor<'a>) -> String {
        match entry {
            Ancestor::Block(block) => plain_text(block.title(), self.index),
            Ancestor::Collection(collection) => plain_text(&collection.name, self.index),
        }
    }

    fn sibling_key(&self, entry: Ancestor<'a>) -> Result<SiblingKey, AppError> {
        let owner = self
            .ancestry(entry.id())?
            .into_iter()
            .skip(1)
            .find(|ancestor| ancestor.contributes_segment())
            .map(|ancestor| ancestor.id().clone());
        let is_collection = matches!(entry, Ancestor::Collection(_));
        Ok((owner, is_collection, sanitize_segment(&self.title_of(entry))))
    }

    /// Path segment of a page or collection, disambiguated when its sanitized
    /// title collides with a sibling's.
    fn segment(&self, entry: Ancestor<'a>) -> String {
        let title = sanitize_segment(&self.title_of(entry));
        let collides = self
            .sibling_key(entry)
            .ok()
            .and_then(|key| self.sibling_titles.get(&key))
            .is_some_and(|count| *count > 1);
        if collides {
            format!("{} ({})", title, entry.id().short())
        } else {
            title
        }
    }
}

/// Path of the satellite document of a transclusion container.
pub fn transclusion_path(id: &NodeId) -> String {
    format!("{}/{}.md", TRANSCLUSION_DIR, id)
}

/// Sanitizes a title for use as one path segment.
///
/// Path separators and `:`, `?` become `_`, as do `#`, `|`, `[`, `]` and `^`,
/// which would end a wikilink target. Line breaks become spaces; an empty
/// result becomes `Untitled`.
pub fn sanitize_segment(title: &str) -> String {
    let sanitized: String = title
        .chars()
        .map(|c| match c {
            ':' | '/' | '\\' | '?' | '#' | '|' | '[' | ']' | '^' => '_',
            '\n' | '\r' | '\t' => ' ',
            c => c,
        })
        .collect();
    let sanitized = sanitized.trim();
    if sanitized.is_empty() {
        UNTITLED_SEGMENT.to_string()
    } else {
        sanitized.to_string()
    }
}

/// Calculates a relative path from one file to another.
pub fn get_relative_path(from: &Path, to: &Path) -> Result<String, AppError> {
    let from_dir = from.parent().unwrap_or_else(|| Path::new(""));

    let relative = pathdiff::diff_paths(to, from_dir).ok_or_else(|| {
        AppError::PathError(format!(
            "Could not calculate relative path from {} to {}",
            from.display(),
            to.display()
        ))
    })?;

    // Ensure forward slashes for Markdown compatibility
    Ok(relative.to_string_lossy().replace('\\', "/"))
}
