// src/types/ids.rs
use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Trailing 32-hex id of an origin URL, e.g. `https://www.notion.so/Title-0123…cdef?pvs=4`.
static ORIGIN_URL_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:https?://(?:www\.)?notion\.(?:so|site)/(?:[^/?#]+/)*)?/?(?:[^/?#]*-)?([0-9a-f]{32}|[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})(?:[?#].*)?$")
        .expect("origin link pattern is valid")
});

/// Identifier of any record in the export index (block, collection, view, discussion…).
///
/// Record ids are UUIDs in the export, but references to them show up both dashed and
/// undashed. Anything that parses as a UUID is stored in lowercase hyphenated form so
/// that every table lookup agrees; other strings are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    /// Normalizes any raw identifier. Never fails.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref().trim();
        match Uuid::try_parse(raw) {
            Ok(uuid) => NodeId(uuid.hyphenated().to_string()),
            Err(_) => NodeId(raw.to_string()),
        }
    }

    /// Parses an identifier that must be a UUID (dashed or undashed).
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Uuid::try_parse(input.trim())
            .map(|uuid| NodeId(uuid.hyphenated().to_string()))
            .map_err(|e| ValidationError::InvalidId(format!("{}: {}", input, e)))
    }

    /// Extracts the target id of an internal origin link (`/0123…` or an origin page URL).
    pub fn from_origin_link(link: &str) -> Option<Self> {
        ORIGIN_URL_ID
            .captures(link.trim())
            .and_then(|caps| caps.get(1))
            .and_then(|m| Self::parse(m.as_str()).ok())
    }

    /// Returns the normalized id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, used to disambiguate colliding file names.
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(raw: &str) -> Self {
        NodeId::new(raw)
    }
}

impl Serialize for NodeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(NodeId::new(s))
    }
}
