// src/model/rich_text.rs
//! Wire model of rich-text runs: `[literal, [[tag, param?], ...]?]`.
//!
//! Parsing is lenient. A property that is not an array of runs yields an empty
//! value, a malformed run is dropped, and a decoration whose tag is not known
//! is kept as [`Decoration::Unrecognized`] so it can be reported and ignored.

use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An ordered sequence of runs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct RichText(pub Vec<Run>);

/// One literal with the decorations applied to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub decorations: Vec<Decoration>,
}

/// A decoration entry of a run.
///
/// Marks (`b`, `i`, `s`, `_`, `c`, `h`, `a`, `m`) style the literal. The
/// remaining tags are indirections that are only meaningful on a sentinel
/// literal, where the first decoration selects what the run stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoration {
    Bold,
    Italic,
    Strike,
    Underline,
    Code,
    Color(String),
    Link(String),
    Comment(NodeId),
    PageRef(NodeId),
    Date(DateLiteral),
    User(NodeId),
    Equation(String),
    ExternalObject(NodeId),
    Unrecognized(String),
}

/// Parameter of a `d` decoration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateLiteral {
    #[serde(rename = "type", default)]
    pub date_type: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

impl Decoration {
    /// The wire tag of this decoration.
    pub fn tag(&self) -> &str {
        match self {
            Decoration::Bold => "b",
            Decoration::Italic => "i",
            Decoration::Strike => "s",
            Decoration::Underline => "_",
            Decoration::Code => "c",
            Decoration::Color(_) => "h",
            Decoration::Link(_) => "a",
            Decoration::Comment(_) => "m",
            Decoration::PageRef(_) => "p",
            Decoration::Date(_) => "d",
            Decoration::User(_) => "u",
            Decoration::Equation(_) => "e",
            Decoration::ExternalObject(_) => "eoi",
            Decoration::Unrecognized(tag) => tag,
        }
    }

    /// Whether this decoration selects what a sentinel run stands for.
    pub fn is_indirection(&self) -> bool {
        matches!(
            self,
            Decoration::PageRef(_)
                | Decoration::Date(_)
                | Decoration::User(_)
                | Decoration::Equation(_)
                | Decoration::ExternalObject(_)
        )
    }

    /// Parses one `[tag, param?]` entry.
    pub fn from_wire(entry: &Value) -> Decoration {
        let Some(parts) = entry.as_array() else {
            return Decoration::Unrecognized(entry.to_string());
        };
        let tag = parts.first().and_then(Value::as_str).unwrap_or_default();
        let param = parts.get(1);
        let text_param = || param.and_then(Value::as_str).map(str::to_string);
        let id_param = || text_param().map(NodeId::new);

        let parsed = match tag {
            "b" => Some(Decoration::Bold),
            "i" => Some(Decoration::Italic),
            "s" => Some(Decoration::Strike),
            "_" => Some(Decoration::Underline),
            "c" => Some(Decoration::Code),
            "h" => text_param().map(Decoration::Color),
            "a" => text_param().map(Decoration::Link),
            "m" => id_param().map(Decoration::Comment),
            "p" => id_param().map(Decoration::PageRef),
            "u" => id_param().map(Decoration::User),
            "e" => text_param().map(Decoration::Equation),
            "eoi" => id_param().map(Decoration::ExternalObject),
            "d" => param
                .cloned()
                .and_then(|v| serde_json::from_value::<DateLiteral>(v).ok())
                .map(Decoration::Date),
            _ => None,
        };
        parsed.unwrap_or_else(|| Decoration::Unrecognized(tag.to_string()))
    }
}

impl Run {
    /// A run without decorations.
    pub fn plain(text: impl Into<String>) -> Self {
        Run {
            text: text.into(),
            decorations: Vec::new(),
        }
    }

    /// A run with the given decorations.
    pub fn decorated(text: impl Into<String>, decorations: Vec<Decoration>) -> Self {
        Run {
            text: text.into(),
            decorations,
        }
    }

    fn from_wire(value: &Value) -> Option<Run> {
        let parts = value.as_array()?;
        let text = parts.first()?.as_str()?.to_string();
        let decorations = parts
            .get(1)
            .and_then(Value::as_array)
            .map(|entries| entries.iter().map(Decoration::from_wire).collect())
            .unwrap_or_default();
        Some(Run { text, decorations })
    }
}

impl RichText {
    pub fn runs(&self) -> &[Run] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Concatenated literals, sentinels included.
    pub fn raw_text(&self) -> String {
        self.0.iter().map(|run| run.text.as_str()).collect()
    }

    /// Every decoration tag in order of appearance.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .flat_map(|run| run.decorations.iter().map(Decoration::tag))
    }
}

impl From<Value> for RichText {
    fn from(value: Value) -> Self {
        let runs = match value {
            Value::Array(items) => items.iter().filter_map(Run::from_wire).collect(),
            Value::String(text) => vec![Run::plain(text)],
            _ => Vec::new(),
        };
        RichText(runs)
    }
}

impl From<Vec<Run>> for RichText {
    fn from(runs: Vec<Run>) -> Self {
        RichText(runs)
    }
}
