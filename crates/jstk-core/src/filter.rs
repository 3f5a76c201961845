//! Filter state and its reducer.
//!
//! The three filters combine conjunctively: a record is kept when it passes
//! the source selection, the webpage selection and the search query.

use crate::types::{find_match, Record, SearchCase, Selection};

// =============================================================================
// Filter State
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterState {
    /// Source script selection
    pub selected_location: Selection,
    /// Owning webpage selection
    pub selected_webpage: Selection,
    /// Substring matched against the endpoint
    pub search_query: String,
}

impl FilterState {
    pub fn new(location: Selection, webpage: Selection, query: &str) -> Self {
        Self {
            selected_location: location,
            selected_webpage: webpage,
            search_query: query.to_string(),
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.selected_location.is_all()
            && self.selected_webpage.is_all()
            && self.search_query.is_empty()
    }

    /// The conjunctive filter predicate.
    #[inline]
    pub fn matches(&self, record: &Record, case: SearchCase) -> bool {
        self.selected_location.matches(&record.source_file)
            && self.selected_webpage.matches(&record.webpage)
            && (self.search_query.is_empty()
                || find_match(&record.endpoint, &self.search_query, case).is_some())
    }
}

// =============================================================================
// Events
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    SelectLocation(Selection),
    SelectWebpage(Selection),
    Search(String),
    Reset,
}

/// Apply one event. Pure: the input state is left untouched.
pub fn reduce(state: &FilterState, event: FilterEvent) -> FilterState {
    let mut next = state.clone();
    match event {
        FilterEvent::SelectLocation(selection) => next.selected_location = selection,
        FilterEvent::SelectWebpage(selection) => next.selected_webpage = selection,
        FilterEvent::Search(query) => next.search_query = query,
        FilterEvent::Reset => next = FilterState::default(),
    }
    next
}
