// src/formatting/rich_text/plain.rs
//! Plain-text rendering of rich text, used for titles, captions and code.

use crate::constants::{EQUATION_SENTINEL, MAX_TITLE_REFERENCE_DEPTH, REFERENCE_SENTINEL};
use crate::model::{BlockKind, DateLiteral, Decoration, RecordIndex, RichText};
use crate::types::NodeId;
use chrono::{NaiveDate, NaiveTime};

/// Concatenates the literals of `text`, replacing indirections by readable text.
///
/// Page references contribute the referenced record's own title, dates their
/// date text and equations their raw expression. Any other indirection
/// contributes nothing.
pub fn plain_text(text: &RichText, index: &RecordIndex) -> String {
    plain_text_at_depth(text, index, 0)
}

/// Title of any record: a block's `title`, or the name of a collection (also
/// for the view blocks that display one).
pub fn record_title(id: &NodeId, index: &RecordIndex) -> String {
    record_title_at_depth(id, index, 0)
}

fn plain_text_at_depth(text: &RichText, index: &RecordIndex, depth: usize) -> String {
    let mut output = String::new();
    for run in text.runs() {
        let indirection = run.decorations.first().filter(|d| d.is_indirection());
        let is_sentinel = run.text == REFERENCE_SENTINEL || run.text == EQUATION_SENTINEL;

        match (is_sentinel, indirection) {
            (true, Some(Decoration::PageRef(id))) => {
                if depth < MAX_TITLE_REFERENCE_DEPTH {
                    output.push_str(&record_title_at_depth(id, index, depth + 1));
                } else {
                    log::debug!("Title reference depth exceeded at {}", id);
                }
            }
            (true, Some(Decoration::Date(date))) => output.push_str(&date_text(date)),
            (true, Some(Decoration::Equation(expression))) => output.push_str(expression),
            (true, Some(_)) => {}
            _ => output.push_str(&run.text),
        }
    }
    output
}

fn record_title_at_depth(id: &NodeId, index: &RecordIndex, depth: usize) -> String {
    if let Some(block) = index.block(id) {
        let title = plain_text_at_depth(block.title(), index, depth);
        if !title.trim().is_empty() {
            return title;
        }
        if matches!(
            block.kind,
            BlockKind::CollectionViewPage | BlockKind::CollectionView
        ) {
            if let Some(collection) = block.collection_id.as_ref().and_then(|c| index.collection(c)) {
                return plain_text_at_depth(&collection.name, index, depth);
            }
        }
        return title;
    }
    index
        .collection(id)
        .map(|collection| plain_text_at_depth(&collection.name, index, depth))
        .unwrap_or_default()
}

/// Readable text of a date literal: `start[ time][ → end[ time]]`.
pub fn date_text(date: &DateLiteral) -> String {
    let mut text = date
        .start_date
        .as_deref()
        .map(checked_date)
        .unwrap_or_default();
    if let Some(time) = date.start_time.as_deref().filter(|t| !t.is_empty()) {
        text.push(' ');
        text.push_str(&checked_time(time));
    }
    if let Some(end) = date.end_date.as_deref().filter(|d| !d.is_empty()) {
        text.push_str(" → ");
        text.push_str(&checked_date(end));
        if let Some(time) = date.end_time.as_deref().filter(|t| !t.is_empty()) {
            text.push(' ');
            text.push_str(&checked_time(time));
        }
    }
    text
}

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";
const TIME_FORMATS: [&str; 3] = ["%H:%M", "%I:%M %p", "%H:%M:%S"];

/// Normalizes a date to `YYYY-MM-DD`; unparsable input is kept verbatim.
fn checked_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
        Ok(date) => date.format(DATE_FORMAT).to_string(),
        Err(e) => {
            log::debug!("Keeping unparsable date {:?} verbatim: {}", raw, e);
            raw.to_string()
        }
    }
}

/// Normalizes a 24h or 12h time to `HH:MM`; unparsable input is kept verbatim.
fn checked_time(raw: &str) -> String {
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(raw.trim(), format).ok())
        .map(|time| time.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| {
            log::debug!("Keeping unparsable time {:?} verbatim", raw);
            raw.to_string()
        })
}
