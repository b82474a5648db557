// src/formatting/markdown.rs
//! Serializes a structured [`Document`] into Obsidian-flavoured Markdown.
//!
//! Pipeline: document tree → comrak AST → CommonMark text. Escaping and block
//! layout belong to comrak's formatter. Vault syntax that CommonMark has no
//! node for (wikilinks, embeds, callout markers, math, footnotes, colored
//! spans) is lowered to raw inline or block HTML and printed verbatim.
//!
//! A node the formatter cannot express (an empty list or table) is dropped
//! with a warning; it never costs the rest of the document.

use super::document::{Document, Inline, ListItem, Node, TableCell};
use crate::constants::CHARS_PER_BLOCK_ESTIMATE;
use comrak::nodes::{
    Ast, AstNode, ListDelimType, ListType, NodeCode, NodeCodeBlock, NodeHeading, NodeHtmlBlock,
    NodeLink, NodeList, NodeTable, NodeValue, TableAlignment,
};
use comrak::{format_commonmark, Arena, ComrakOptions};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::cell::RefCell;
use thiserror::Error;

/// Characters percent-encoded in link and image destinations.
const DESTINATION: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'(')
    .add(b')')
    .add(b'<')
    .add(b'>');

/// Comment the formatter puts after a list that is followed by a list or a
/// code block.
const LIST_SEPARATOR: &str = "<!-- end list -->";

#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("front matter could not be rendered: {0}")]
    FrontMatter(#[from] serde_yaml::Error),

    #[error("comrak serialization failed: {0}")]
    Format(String),

    #[error("serialized output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Turns a structured document into target-format text.
pub trait DocumentSerializer {
    fn serialize(&self, document: &Document) -> Result<String, SerializeError>;
}

/// The Markdown pretty-printer used for every vault document.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownSerializer;

impl DocumentSerializer for MarkdownSerializer {
    fn serialize(&self, document: &Document) -> Result<String, SerializeError> {
        let arena = Arena::new();
        let root = new_node(&arena, NodeValue::Document);

        if !document.frontmatter.is_empty() {
            let mut yaml = serde_yaml::to_string(&document.frontmatter)?;
            if !yaml.ends_with('\n') {
                yaml.push('\n');
            }
            append(
                &arena,
                root,
                NodeValue::FrontMatter(format!("---\n{}---\n\n", yaml)),
            );
        }
        for node in &document.children {
            lower_block(&arena, root, node)?;
        }
        print(root, document.children.len())
    }
}

impl MarkdownSerializer {
    pub fn new() -> Self {
        MarkdownSerializer
    }

    /// Renders inline content as a single line, e.g. for a front matter value.
    pub fn inlines(&self, nodes: &[Inline]) -> Result<String, SerializeError> {
        let arena = Arena::new();
        let root = new_node(&arena, NodeValue::Document);
        let paragraph = append(&arena, root, NodeValue::Paragraph);
        lower_inlines(&arena, paragraph, nodes, LineMode::Single);
        Ok(print(root, 1)?.trim_end().to_string())
    }
}

fn comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    // Raw passthrough for vault syntax
    options.render.unsafe_ = true;
    options
}

fn print<'a>(root: &'a AstNode<'a>, blocks: usize) -> Result<String, SerializeError> {
    let mut output = Vec::with_capacity(blocks.max(1) * CHARS_PER_BLOCK_ESTIMATE);
    format_commonmark(root, &comrak_options(), &mut output)
        .map_err(|e| SerializeError::Format(e.to_string()))?;
    let markdown = String::from_utf8(output)?;
    Ok(drop_list_separators(&markdown))
}

/// Renders block content into a standalone Markdown fragment.
fn render_blocks(nodes: &[Node]) -> Result<String, SerializeError> {
    let arena = Arena::new();
    let root = new_node(&arena, NodeValue::Document);
    for node in nodes {
        lower_block(&arena, root, node)?;
    }
    print(root, nodes.len())
}

// --- Block lowering ---

fn new_node<'a>(arena: &'a Arena<AstNode<'a>>, value: NodeValue) -> &'a AstNode<'a> {
    arena.alloc(AstNode::new(RefCell::new(Ast::new(value, (0, 0).into()))))
}

fn append<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    value: NodeValue,
) -> &'a AstNode<'a> {
    let node = new_node(arena, value);
    parent.append(node);
    node
}

fn html_block<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, literal: String) {
    append(
        arena,
        parent,
        NodeValue::HtmlBlock(NodeHtmlBlock {
            block_type: 0,
            literal,
        }),
    );
}

fn lower_block<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    node: &Node,
) -> Result<(), SerializeError> {
    match node {
        Node::Paragraph { children } => {
            if !children.is_empty() {
                let paragraph = append(arena, parent, NodeValue::Paragraph);
                lower_inlines(arena, paragraph, children, LineMode::Flow);
            }
        }
        Node::Heading { depth, children } => {
            if !(1..=6).contains(depth) {
                log::warn!("Heading depth {} outside 1..=6, clamping", depth);
            }
            let heading = append(
                arena,
                parent,
                NodeValue::Heading(NodeHeading {
                    level: (*depth).clamp(1, 6),
                    setext: false,
                }),
            );
            let (_, inner, _) = trim_edges(children);
            lower_inlines(arena, heading, &inner, LineMode::Single);
        }
        Node::ThematicBreak => {
            append(arena, parent, NodeValue::ThematicBreak);
        }
        Node::Blockquote { children } => {
            let quote = append(arena, parent, NodeValue::BlockQuote);
            for child in children {
                lower_block(arena, quote, child)?;
            }
        }
        Node::List { ordered, items } => lower_list(arena, parent, *ordered, items)?,
        Node::Code { lang, value } => {
            let mut literal = value.trim_end_matches('\n').to_string();
            literal.push('\n');
            append(
                arena,
                parent,
                NodeValue::CodeBlock(NodeCodeBlock {
                    fenced: true,
                    fence_char: b'`',
                    fence_length: 3,
                    fence_offset: 0,
                    info: lang.clone().unwrap_or_default(),
                    literal,
                }),
            );
        }
        Node::Math { value } => html_block(arena, parent, format!("$$\n{}\n$$\n", value.trim())),
        Node::Table { rows } => lower_table(arena, parent, rows)?,
        Node::Embed { target } => {
            let paragraph = append(arena, parent, NodeValue::Paragraph);
            append(arena, paragraph, NodeValue::HtmlInline(format!("![[{}]]", target)));
        }
        Node::FootnoteDefinition { label, children } => {
            let body = render_blocks(children)?;
            let body = indent_continuation(body.trim_end(), "    ");
            html_block(arena, parent, format!("[^{}]: {}\n", label, body));
        }
    }
    Ok(())
}

fn lower_list<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    ordered: bool,
    items: &[ListItem],
) -> Result<(), SerializeError> {
    if items.is_empty() {
        log::warn!("Dropping list without items");
        return Ok(());
    }

    let list = NodeList {
        list_type: if ordered {
            ListType::Ordered
        } else {
            ListType::Bullet
        },
        marker_offset: 0,
        padding: 0,
        start: 1,
        delimiter: ListDelimType::Period,
        bullet_char: b'-',
        tight: true,
    };
    let list_node = append(arena, parent, NodeValue::List(list));
    for item in items {
        let value = match item.checked {
            Some(checked) => NodeValue::TaskItem(checked.then_some('x')),
            None => NodeValue::Item(list),
        };
        let item_node = append(arena, list_node, value);
        for child in &item.children {
            lower_block(arena, item_node, child)?;
        }
    }
    Ok(())
}

fn lower_table<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    rows: &[Vec<TableCell>],
) -> Result<(), SerializeError> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        log::warn!("Dropping table without cells");
        return Ok(());
    }

    let nonempty = rows
        .iter()
        .flatten()
        .filter(|cell| !cell.0.is_empty())
        .count();
    let table = append(
        arena,
        parent,
        NodeValue::Table(NodeTable {
            alignments: vec![TableAlignment::None; columns],
            num_columns: columns,
            num_rows: rows.len(),
            num_nonempty_cells: nonempty,
        }),
    );
    for (position, row) in rows.iter().enumerate() {
        let row_node = append(arena, table, NodeValue::TableRow(position == 0));
        for column in 0..columns {
            let cell = append(arena, row_node, NodeValue::TableCell);
            if let Some(content) = row.get(column) {
                lower_cell(arena, cell, &content.0)?;
            }
        }
    }
    Ok(())
}

/// Cells hold one line: paragraphs are joined with `<br>`, any other block
/// is rendered on its own and flattened.
fn lower_cell<'a>(
    arena: &'a Arena<AstNode<'a>>,
    cell: &'a AstNode<'a>,
    blocks: &[Node],
) -> Result<(), SerializeError> {
    for (position, block) in blocks.iter().enumerate() {
        if position > 0 {
            append(arena, cell, NodeValue::HtmlInline("<br>".to_string()));
        }
        match block {
            Node::Paragraph { children } => lower_inlines(arena, cell, children, LineMode::Cell),
            other => {
                let rendered = render_blocks(std::slice::from_ref(other))?;
                let flat = rendered.trim_end().replace('\n', "<br>");
                raw(arena, cell, &flat, LineMode::Cell);
            }
        }
    }
    Ok(())
}

// --- Inline lowering ---

/// How line breaks inside inline content are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineMode {
    /// Hard line breaks.
    Flow,
    /// Headings and front matter values: breaks become spaces.
    Single,
    /// Table cells: breaks become `<br>` and raw pipes are escaped.
    Cell,
}

fn lower_inlines<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    nodes: &[Inline],
    mode: LineMode,
) {
    for node in nodes {
        lower_inline(arena, parent, node, mode);
    }
}

fn lower_inline<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    node: &Inline,
    mode: LineMode,
) {
    match node {
        Inline::Text { value } => {
            for (position, line) in value.split('\n').enumerate() {
                if position > 0 {
                    line_break(arena, parent, mode);
                }
                if !line.is_empty() {
                    append(arena, parent, NodeValue::Text(line.to_string()));
                }
            }
        }
        Inline::Break => line_break(arena, parent, mode),
        Inline::Emphasis { children } => delimited(arena, parent, NodeValue::Emph, children, mode),
        Inline::Strong { children } => delimited(arena, parent, NodeValue::Strong, children, mode),
        Inline::Delete { children } => {
            delimited(arena, parent, NodeValue::Strikethrough, children, mode)
        }
        Inline::Underline { children } => {
            raw(arena, parent, "<u>", mode);
            lower_inlines(arena, parent, children, mode);
            raw(arena, parent, "</u>", mode);
        }
        Inline::Colored { color, children } => {
            raw(
                arena,
                parent,
                &format!("<span class=\"{}\">", color.css_class()),
                mode,
            );
            lower_inlines(arena, parent, children, mode);
            raw(arena, parent, "</span>", mode);
        }
        Inline::InlineCode { value } => {
            append(
                arena,
                parent,
                NodeValue::Code(NodeCode {
                    num_backticks: 1,
                    literal: value.replace('\n', " "),
                }),
            );
        }
        Inline::InlineMath { value } => raw(arena, parent, &format!("${}$", value.trim()), mode),
        Inline::Link { url, children } => {
            let link = append(
                arena,
                parent,
                NodeValue::Link(NodeLink {
                    url: destination(url),
                    title: String::new(),
                }),
            );
            if children.iter().all(|child| child.plain().trim().is_empty()) {
                append(arena, link, NodeValue::Text(url.clone()));
            } else {
                lower_inlines(arena, link, children, LineMode::Single);
            }
        }
        Inline::WikiLink { target, alias } => {
            let link = match alias {
                Some(alias) if !alias.is_empty() => {
                    format!("[[{}|{}]]", target, clean_alias(alias))
                }
                _ => format!("[[{}]]", target),
            };
            raw(arena, parent, &link, mode);
        }
        Inline::Image { url, alt } => {
            let image = append(
                arena,
                parent,
                NodeValue::Image(NodeLink {
                    url: destination(url),
                    title: String::new(),
                }),
            );
            if !alt.is_empty() {
                append(arena, image, NodeValue::Text(alt.replace('\n', " ")));
            }
        }
        Inline::FootnoteReference { label } => raw(arena, parent, &format!("[^{}]", label), mode),
        Inline::Raw { value } => raw(arena, parent, value, mode),
    }
}

fn line_break<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, mode: LineMode) {
    match mode {
        LineMode::Flow => {
            append(arena, parent, NodeValue::LineBreak);
        }
        LineMode::Single => {
            append(arena, parent, NodeValue::Text(" ".to_string()));
        }
        LineMode::Cell => {
            append(arena, parent, NodeValue::HtmlInline("<br>".to_string()));
        }
    }
}

/// Raw inline markup. Inside table cells a bare pipe would end the cell.
fn raw<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, markup: &str, mode: LineMode) {
    let markup = match mode {
        LineMode::Cell => markup.replace('|', "\\|"),
        _ => markup.to_string(),
    };
    append(arena, parent, NodeValue::HtmlInline(markup));
}

/// Wraps content in an emphasis-like node, keeping edge spaces outside so the
/// delimiters still parse.
fn delimited<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    value: NodeValue,
    children: &[Inline],
    mode: LineMode,
) {
    let (leading, inner, trailing) = trim_edges(children);
    if !leading.is_empty() {
        append(arena, parent, NodeValue::Text(leading));
    }
    if !inner.is_empty() {
        let wrapper = append(arena, parent, value);
        lower_inlines(arena, wrapper, &inner, mode);
    }
    if !trailing.is_empty() {
        append(arena, parent, NodeValue::Text(trailing));
    }
}

/// Splits the spaces at both edges off a run of inlines.
fn trim_edges(children: &[Inline]) -> (String, Vec<Inline>, String) {
    let mut inner = children.to_vec();
    let mut leading = String::new();
    let mut trailing = String::new();
    if let Some(Inline::Text { value }) = inner.first_mut() {
        let trimmed = value.trim_start_matches(' ');
        leading = value[..value.len() - trimmed.len()].to_string();
        *value = trimmed.to_string();
    }
    if let Some(Inline::Text { value }) = inner.last_mut() {
        let trimmed_len = value.trim_end_matches(' ').len();
        trailing = value[trimmed_len..].to_string();
        value.truncate(trimmed_len);
    }
    inner.retain(|node| !matches!(node, Inline::Text { value } if value.is_empty()));
    (leading, inner, trailing)
}

fn destination(url: &str) -> String {
    utf8_percent_encode(url, DESTINATION).to_string()
}

fn clean_alias(alias: &str) -> String {
    alias
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '|'))
        .collect::<String>()
        .replace('\n', " ")
}

fn indent_continuation(text: &str, indent: &str) -> String {
    let mut lines = text.lines();
    let mut output = lines.next().unwrap_or_default().to_string();
    for line in lines {
        output.push('\n');
        if !line.is_empty() {
            output.push_str(indent);
            output.push_str(line);
        }
    }
    output
}

// --- Output cleanup ---

/// Removes the separator comment between two adjacent lists, together with
/// the blank line after it. Before a code block it stays: there it keeps an
/// indented block out of the last list item.
fn drop_list_separators(markdown: &str) -> String {
    if !markdown.contains(LIST_SEPARATOR) {
        return markdown.to_string();
    }

    let lines: Vec<&str> = markdown.split_inclusive('\n').collect();
    let mut output = String::with_capacity(markdown.len());
    let mut skip_blank = false;
    for (position, line) in lines.iter().enumerate() {
        let content = container_content(line);
        if skip_blank && content.is_empty() {
            skip_blank = false;
            continue;
        }
        skip_blank = false;
        if content == LIST_SEPARATOR && next_opens_list(&lines[position + 1..]) {
            skip_blank = true;
            continue;
        }
        output.push_str(line);
    }
    output
}

/// A line without its blockquote and list indentation prefix.
fn container_content(line: &str) -> &str {
    line.trim_start_matches(|c: char| c == '>' || c == ' ').trim_end()
}

fn next_opens_list(rest: &[&str]) -> bool {
    let Some(next) = rest
        .iter()
        .map(|line| container_content(line))
        .find(|content| !content.is_empty())
    else {
        return false;
    };
    let digits = next.len() - next.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    next == "-" || next.starts_with("- ") || (digits > 0 && next[digits..].starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;
    use comrak::parse_document;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn render(children: Vec<Node>) -> String {
        MarkdownSerializer::new()
            .serialize(&Document::new(children))
            .unwrap()
    }

    fn text(value: &str) -> Inline {
        Inline::text(value)
    }

    fn paragraph(value: &str) -> Node {
        Node::paragraph(vec![text(value)])
    }

    /// Top-level node kinds of `markdown` as parsed back by comrak.
    fn parsed_kinds(markdown: &str) -> Vec<&'static str> {
        let arena = Arena::new();
        let root = parse_document(&arena, markdown, &comrak_options());
        root.children()
            .map(|child| match child.data.borrow().value {
                NodeValue::Paragraph => "paragraph",
                NodeValue::Heading(_) => "heading",
                NodeValue::List(ref list) if matches!(list.list_type, ListType::Ordered) => "ordered",
                NodeValue::List(_) => "bullet",
                NodeValue::BlockQuote => "quote",
                NodeValue::CodeBlock(_) => "code",
                NodeValue::Table(_) => "table",
                NodeValue::HtmlBlock(_) => "html",
                _ => "other",
            })
            .collect()
    }

    #[test]
    fn test_heading_and_marks() {
        let output = render(vec![
            Node::heading(1, vec![text("Intro")]),
            Node::paragraph(vec![
                text("Hello "),
                Inline::Strong {
                    children: vec![text("world")],
                },
            ]),
        ]);
        assert_eq!(output, "# Intro\n\nHello **world**\n");
    }

    #[test]
    fn test_edge_whitespace_moves_outside_delimiters() {
        let output = render(vec![Node::paragraph(vec![
            text("x"),
            Inline::Emphasis {
                children: vec![text(" a ")],
            },
            text("y"),
        ])]);
        assert_eq!(output, "x *a* y\n");
    }

    #[test]
    fn test_markup_in_text_stays_text() {
        let output = render(vec![
            paragraph("# not *a* heading"),
            paragraph("1. first"),
            paragraph("- dash"),
        ]);
        assert_eq!(parsed_kinds(&output), vec!["paragraph"; 3]);
        assert!(output.contains("\\*a\\*"));
    }

    #[test]
    fn test_nested_lists_and_checkboxes() {
        let nested = Node::List {
            ordered: true,
            items: vec![ListItem {
                checked: None,
                children: vec![paragraph("inner")],
            }],
        };
        let output = render(vec![Node::List {
            ordered: false,
            items: vec![
                ListItem {
                    checked: Some(true),
                    children: vec![paragraph("done"), nested],
                },
                ListItem {
                    checked: Some(false),
                    children: vec![paragraph("todo")],
                },
            ],
        }]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "- [x] done");
        assert!(lines[1].starts_with(" ") && lines[1].trim_start().starts_with("1."));
        assert!(lines[1].ends_with("inner"));
        assert_eq!(lines[2], "- [ ] todo");
    }

    #[test]
    fn test_adjacent_lists_stay_apart_without_separator() {
        let list = |ordered: bool, value: &str| Node::List {
            ordered,
            items: vec![ListItem {
                checked: None,
                children: vec![paragraph(value)],
            }],
        };
        let output = render(vec![list(false, "a"), list(true, "b"), list(false, "c")]);
        assert!(!output.contains(LIST_SEPARATOR));
        assert_eq!(parsed_kinds(&output), vec!["bullet", "ordered", "bullet"]);
    }

    #[test]
    fn test_blockquote_callout() {
        let output = render(vec![Node::Blockquote {
            children: vec![
                Node::marker("[!callout|icon=💡,color=gray_background]"),
                paragraph("Tip"),
            ],
        }]);
        assert!(output.starts_with("> [!callout|icon=💡,color=gray_background]\n>"));
        assert!(output.ends_with("> Tip\n"));
    }

    #[test]
    fn test_table_cells() {
        let cell = |value: &str| TableCell(vec![paragraph(value)]);
        let output = render(vec![Node::Table {
            rows: vec![
                vec![cell("a"), cell("b")],
                vec![
                    cell("x|y"),
                    TableCell(vec![Node::paragraph(vec![
                        text("1"),
                        Inline::Break,
                        Inline::WikiLink {
                            target: "T".to_string(),
                            alias: Some("t".to_string()),
                        },
                    ])]),
                ],
            ],
        }]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "| a | b |");
        assert_eq!(lines[1], "| --- | --- |");
        assert_eq!(lines[2], "| x\\|y | 1<br>[[T\\|t]] |");
        assert_eq!(parsed_kinds(&output), vec!["table"]);
    }

    #[test]
    fn test_empty_nodes_are_dropped_not_fatal() {
        let output = render(vec![
            Node::Table { rows: vec![] },
            Node::List {
                ordered: false,
                items: vec![],
            },
            Node::heading(7, vec![text("Deep")]),
            paragraph("kept"),
        ]);
        assert_eq!(output, "###### Deep\n\nkept\n");
    }

    #[test]
    fn test_heading_breaks_flatten_to_spaces() {
        let output = render(vec![Node::heading(
            2,
            vec![text("one"), Inline::Break, text("two\nthree")],
        )]);
        assert_eq!(output, "## one two three\n");
    }

    #[test]
    fn test_links_embeds_and_spans() {
        let output = render(vec![
            Node::paragraph(vec![
                Inline::WikiLink {
                    target: "Notes/Page".to_string(),
                    alias: Some("Page".to_string()),
                },
                text(" "),
                Inline::link("https://example.com/a b", vec![text("site")]),
                text(" "),
                Inline::Colored {
                    color: Color::Red,
                    children: vec![text("red")],
                },
                text(" "),
                Inline::Underline {
                    children: vec![text("under")],
                },
            ]),
            Node::Embed {
                target: "transclusions/x".to_string(),
            },
        ]);
        insta::assert_snapshot!(output.lines().next().unwrap(), @r#"[[Notes/Page|Page]] [site](https://example.com/a%20b) <span class="text-red">red</span> <u>under</u>"#);
        assert!(output.ends_with("![[transclusions/x]]\n"));
    }

    #[test]
    fn test_code_and_math_blocks() {
        let output = render(vec![
            Node::Code {
                lang: Some("js".to_string()),
                value: "let a = `x`;".to_string(),
            },
            Node::Math {
                value: "x^2".to_string(),
            },
        ]);
        assert_eq!(output, "```js\nlet a = `x`;\n```\n\n$$\nx^2\n$$\n");
    }

    #[test]
    fn test_footnote_definition_indents_continuations() {
        let output = render(vec![Node::FootnoteDefinition {
            label: "1".to_string(),
            children: vec![paragraph("first"), paragraph("second")],
        }]);
        assert_eq!(output, "[^1]: first\n\n    second\n");
    }

    #[test]
    fn test_front_matter() {
        let mut frontmatter = IndexMap::new();
        frontmatter.insert("status".to_string(), "done".to_string());
        frontmatter.insert("area".to_string(), "home".to_string());
        let document = Document::new(vec![Node::heading(1, vec![text("T")])])
            .with_frontmatter(frontmatter);
        let output = MarkdownSerializer::new().serialize(&document).unwrap();
        assert_eq!(output, "---\nstatus: done\narea: home\n---\n\n# T\n");
    }

    #[test]
    fn test_inline_value_is_one_line() {
        let value = MarkdownSerializer::new()
            .inlines(&[
                text("very "),
                Inline::Strong {
                    children: vec![text("important")],
                },
                Inline::Break,
                text("indeed"),
            ])
            .unwrap();
        assert_eq!(value, "very **important** indeed");
    }
}
