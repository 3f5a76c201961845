//! Data source adapter
//!
//! Turns whatever the record store holds into the four sequences the panel
//! renders from: every valid record, the distinct source scripts, the
//! distinct webpages, and the filtered subsequence. Derivation is a pure
//! function of the stored records and the filter; reading never mutates the
//! store.

use std::collections::HashSet;

use crate::filter::FilterState;
use crate::store::{RecordStore, StoreError};
use crate::types::{RawRecord, Record, SearchCase};
use crate::window::{WindowConfig, WindowState};

// =============================================================================
// Query Result
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    /// Every valid record, in capture order
    pub urls: Vec<Record>,
    /// Distinct source scripts, in first-seen order
    pub js_files: Vec<String>,
    /// Distinct owning webpages, in first-seen order
    pub webpages: Vec<String>,
    /// Indexes into `urls` passing the filter, ascending
    pub filtered: Vec<usize>,
    /// Raw records dropped for missing fields
    pub skipped: usize,
}

impl QueryResult {
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn filtered_urls(&self) -> impl Iterator<Item = &Record> + '_ {
        self.filtered.iter().map(move |&i| &self.urls[i])
    }

    /// Records inside the current window. `filtered` positions are returned
    /// alongside so rows can be keyed by their absolute index.
    pub fn visible(&self, window: &WindowState, config: &WindowConfig) -> Vec<(usize, &Record)> {
        let range = window.range(self.filtered.len(), config);
        self.filtered[range.clone()]
            .iter()
            .zip(range)
            .map(|(&i, pos)| (pos, &self.urls[i]))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Derive a query result from raw records.
pub fn derive(raw: Vec<RawRecord>, filter: &FilterState, case: SearchCase) -> QueryResult {
    let total = raw.len();
    let mut urls = Vec::with_capacity(total);
    for record in raw {
        match Record::try_from(record) {
            Ok(record) => urls.push(record),
            Err(field) => log::debug!("skipping capture record without {field}"),
        }
    }
    let skipped = total - urls.len();

    let js_files = distinct(urls.iter().map(|r| r.source_file.as_str()));
    let webpages = distinct(urls.iter().map(|r| r.webpage.as_str()));

    let filtered = urls
        .iter()
        .enumerate()
        .filter(|(_, r)| filter.matches(r, case))
        .map(|(i, _)| i)
        .collect();

    QueryResult { urls, js_files, webpages, filtered, skipped }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for value in values {
        if seen.insert(value) {
            out.push(value.to_string());
        }
    }
    out
}

// =============================================================================
// Data Source
// =============================================================================

/// Adapter over a record store.
pub struct DataSource<S: RecordStore> {
    store: S,
    case: SearchCase,
}

impl<S: RecordStore> DataSource<S> {
    pub fn new(store: S, case: SearchCase) -> Self {
        Self { store, case }
    }

    pub fn query(&self, filter: &FilterState) -> Result<QueryResult, StoreError> {
        let raw = self.store.load()?;
        Ok(derive(raw, filter, self.case))
    }

    pub fn clear_all(&mut self) -> Result<(), StoreError> {
        self.store.clear()
    }

    pub fn case(&self) -> SearchCase {
        self.case
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
