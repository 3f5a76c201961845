//! Search match highlighting for endpoint cells.

use serde::Serialize;

use crate::types::{find_match, SearchCase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub matched: bool,
}

/// Split `text` into alternating unmatched/matched segments for every
/// non-overlapping occurrence of `query`.
pub fn highlight<'a>(text: &'a str, query: &str, case: SearchCase) -> Vec<Segment<'a>> {
    let mut segments = Vec::new();
    if query.is_empty() {
        if !text.is_empty() {
            segments.push(Segment { text, matched: false });
        }
        return segments;
    }

    let mut pos = 0;
    while let Some(offset) = find_match(&text[pos..], query, case) {
        let start = pos + offset;
        let end = start + query.len();
        if start > pos {
            segments.push(Segment { text: &text[pos..start], matched: false });
        }
        segments.push(Segment { text: &text[start..end], matched: true });
        pos = end;
    }
    if pos < text.len() {
        segments.push(Segment { text: &text[pos..], matched: false });
    }
    segments
}
