//! Core type definitions for the JS-Toolkit panel
//!
//! Records arrive from the capture side as loosely shaped JSON objects
//! (`RawRecord`). Only fully populated records are promoted to `Record`
//! and take part in filtering.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label shown for the unfiltered selection. Reserved at string boundaries.
pub const ALL_SENTINEL: &str = "All";

// =============================================================================
// Records
// =============================================================================

/// A captured record as stored by the extension, before validation.
///
/// Serializes with the canonical keys only. Reading captures, including the
/// legacy key names, goes through `ingest`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub endpoint: Option<String>,
    pub source_file: Option<String>,
    pub webpage: Option<String>,
}

impl RawRecord {
    pub fn new(endpoint: &str, source_file: &str, webpage: &str) -> Self {
        Self {
            endpoint: Some(endpoint.to_string()),
            source_file: Some(source_file.to_string()),
            webpage: Some(webpage.to_string()),
        }
    }
}

/// One observed endpoint with the script that referenced it and the page
/// that loaded that script.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub endpoint: String,
    pub source_file: String,
    pub webpage: String,
}

impl Record {
    pub fn new(endpoint: &str, source_file: &str, webpage: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            source_file: source_file.to_string(),
            webpage: webpage.to_string(),
        }
    }
}

/// Field that was missing or empty on a raw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Endpoint,
    SourceFile,
    Webpage,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Endpoint => "endpoint",
            Self::SourceFile => "sourceFile",
            Self::Webpage => "webpage",
        };
        f.write_str(name)
    }
}

impl TryFrom<RawRecord> for Record {
    type Error = MissingField;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let endpoint = non_empty(raw.endpoint).ok_or(MissingField::Endpoint)?;
        let source_file = non_empty(raw.source_file).ok_or(MissingField::SourceFile)?;
        let webpage = non_empty(raw.webpage).ok_or(MissingField::Webpage)?;
        Ok(Self { endpoint, source_file, webpage })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// =============================================================================
// Selections
// =============================================================================

/// Dropdown selection for the source and webpage filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Selection {
    /// No restriction
    #[default]
    All,
    /// Only records whose field equals this value
    Only(String),
}

impl Selection {
    /// Parse a selection coming from a string boundary.
    /// "All" is treated as the sentinel, never as a literal value.
    pub fn parse(s: &str) -> Self {
        if s == ALL_SENTINEL {
            Self::All
        } else {
            Self::Only(s.to_string())
        }
    }

    #[inline]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    #[inline]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == value,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_SENTINEL,
            Self::Only(value) => value,
        }
    }
}

impl From<&str> for Selection {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Search Case Policy
// =============================================================================

/// How the free-text search compares against endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchCase {
    /// Plain substring match
    #[default]
    Sensitive,
    /// Substring match with ASCII case folding
    Insensitive,
}

/// Byte offset of the first occurrence of `needle` in `haystack`.
///
/// The insensitive policy only folds ASCII letters, so match boundaries
/// always fall on char boundaries.
pub fn find_match(haystack: &str, needle: &str, case: SearchCase) -> Option<usize> {
    match case {
        SearchCase::Sensitive => haystack.find(needle),
        SearchCase::Insensitive => {
            let hay = haystack.as_bytes();
            let pat = needle.as_bytes();
            if pat.is_empty() {
                return Some(0);
            }
            if pat.len() > hay.len() {
                return None;
            }
            (0..=hay.len() - pat.len()).find(|&i| hay[i..i + pat.len()].eq_ignore_ascii_case(pat))
        }
    }
}
