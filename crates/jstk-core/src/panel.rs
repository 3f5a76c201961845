//! Endpoint table controller
//!
//! `Panel` is the view-state owner for the endpoint table. It composes the
//! filter and window reducers, tracks which dropdown is open, and keeps the
//! last query result that resolved successfully so the table can keep
//! rendering while a new query is in flight or after one failed.
//!
//! # Queries
//!
//! The record store may answer asynchronously. Every query is issued through
//! [`Panel::begin_query`], which hands out a [`QueryTicket`]. Only the ticket
//! from the most recent `begin_query` is accepted by
//! [`Panel::complete_query`]; changing a filter or clearing also invalidates
//! outstanding tickets. Late answers to superseded queries are dropped, so
//! out-of-order resolution can never bring back an older filter's rows.

use serde::Serialize;

use crate::adapter::{DataSource, QueryResult};
use crate::config::PanelConfig;
use crate::filter::{self, FilterEvent, FilterState};
use crate::highlight::{highlight, Segment};
use crate::route::PanelContext;
use crate::store::{RecordStore, StoreError};
use crate::types::{Selection, ALL_SENTINEL};
use crate::window::{self, ScrollMetrics, WindowConfig, WindowEvent, WindowState};

bitflags::bitflags! {
    /// What an event changed, so the host knows whether to re-query or only
    /// re-render.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ViewChange: u8 {
        const FILTER = 1 << 0;
        const WINDOW = 1 << 1;
        const DROPDOWN = 1 << 2;
    }
}

impl ViewChange {
    /// A filter change makes the current data stale.
    pub fn needs_query(&self) -> bool {
        self.contains(Self::FILTER)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dropdown {
    Location,
    Webpage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    ToggleDropdown(Dropdown),
    SelectLocation(Selection),
    SelectWebpage(Selection),
    Search(String),
    ResetFilters,
    Scroll(ScrollMetrics),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub generation: u64,
    pub filter: FilterState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    Applied,
    Failed,
    Stale,
}

// =============================================================================
// Panel
// =============================================================================

pub struct Panel {
    config: PanelConfig,
    window_config: WindowConfig,
    context: PanelContext,
    filter: FilterState,
    window: WindowState,
    location_open: bool,
    webpage_open: bool,
    data: QueryResult,
    generation: u64,
    pending: bool,
    error: Option<String>,
}

impl Panel {
    pub fn new(config: PanelConfig, context: PanelContext) -> Self {
        Self {
            window_config: WindowConfig::from(&config),
            config,
            context,
            filter: FilterState::default(),
            window: WindowState::default(),
            location_open: false,
            webpage_open: false,
            data: QueryResult::default(),
            generation: 0,
            pending: false,
            error: None,
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn window(&self) -> WindowState {
        self.window
    }

    pub fn data(&self) -> &QueryResult {
        &self.data
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_open(&self, dropdown: Dropdown) -> bool {
        match dropdown {
            Dropdown::Location => self.location_open,
            Dropdown::Webpage => self.webpage_open,
        }
    }

    /// Apply a UI event.
    pub fn apply(&mut self, event: PanelEvent) -> ViewChange {
        match event {
            PanelEvent::ToggleDropdown(dropdown) => {
                let open = self.dropdown_mut(dropdown);
                *open = !*open;
                ViewChange::DROPDOWN
            }
            PanelEvent::SelectLocation(selection) => {
                let mut change = self.close(Dropdown::Location);
                change |= self.apply_filter(FilterEvent::SelectLocation(selection));
                change
            }
            PanelEvent::SelectWebpage(selection) => {
                let mut change = self.close(Dropdown::Webpage);
                change |= self.apply_filter(FilterEvent::SelectWebpage(selection));
                change
            }
            PanelEvent::Search(query) => self.apply_filter(FilterEvent::Search(query)),
            PanelEvent::ResetFilters => self.apply_filter(FilterEvent::Reset),
            PanelEvent::Scroll(metrics) => self.apply_window(WindowEvent::Scrolled(metrics)),
        }
    }

    fn dropdown_mut(&mut self, dropdown: Dropdown) -> &mut bool {
        match dropdown {
            Dropdown::Location => &mut self.location_open,
            Dropdown::Webpage => &mut self.webpage_open,
        }
    }

    fn close(&mut self, dropdown: Dropdown) -> ViewChange {
        let open = self.dropdown_mut(dropdown);
        if std::mem::replace(open, false) {
            ViewChange::DROPDOWN
        } else {
            ViewChange::empty()
        }
    }

    fn apply_filter(&mut self, event: FilterEvent) -> ViewChange {
        let next = filter::reduce(&self.filter, event);
        let mut change = self.apply_window(WindowEvent::Reset);
        if next != self.filter {
            self.filter = next;
            self.generation += 1;
            change |= ViewChange::FILTER;
        }
        change
    }

    fn apply_window(&mut self, event: WindowEvent) -> ViewChange {
        let next = window::reduce(self.window, event, self.data.filtered_len(), &self.window_config);
        if next == self.window {
            ViewChange::empty()
        } else {
            self.window = next;
            ViewChange::WINDOW
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Start a query for the current filter, superseding any in flight.
    pub fn begin_query(&mut self) -> QueryTicket {
        self.generation += 1;
        self.pending = true;
        QueryTicket {
            generation: self.generation,
            filter: self.filter.clone(),
        }
    }

    /// Deliver the answer for a ticket.
    pub fn complete_query(
        &mut self,
        ticket: &QueryTicket,
        result: Result<QueryResult, StoreError>,
    ) -> QueryOutcome {
        if ticket.generation != self.generation || ticket.filter != self.filter {
            log::debug!(
                "dropping stale query result (generation {} != {})",
                ticket.generation,
                self.generation
            );
            return QueryOutcome::Stale;
        }
        self.pending = false;

        match result {
            Ok(data) => {
                self.data = data;
                self.error = None;
                self.window = self.window.clamped(self.data.filtered_len(), &self.window_config);
                QueryOutcome::Applied
            }
            Err(e) => {
                log::warn!("record query failed: {e}");
                self.error = Some(e.to_string());
                QueryOutcome::Failed
            }
        }
    }

    /// Synchronous query against a data source.
    pub fn refresh<S: RecordStore>(&mut self, source: &DataSource<S>) -> QueryOutcome {
        let ticket = self.begin_query();
        let result = source.query(&ticket.filter);
        self.complete_query(&ticket, result)
    }

    /// Wipe the store and reload. Safe to call repeatedly.
    pub fn clear_all<S: RecordStore>(&mut self, source: &mut DataSource<S>) -> QueryOutcome {
        // Anything in flight predates the wipe, so its answer will never land.
        self.generation += 1;
        self.pending = false;
        if let Err(e) = source.clear_all() {
            log::warn!("clearing records failed: {e}");
            self.error = Some(e.to_string());
            return QueryOutcome::Failed;
        }
        self.window = WindowState::default();
        self.refresh(source)
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    pub fn render(&self) -> PanelModel<'_> {
        let case = self.config.search_case;
        let rows = self
            .data
            .visible(&self.window, &self.window_config)
            .into_iter()
            .map(|(key, record)| RowModel {
                key,
                endpoint: highlight(&record.endpoint, &self.filter.search_query, case),
                source_file: &record.source_file,
                webpage: &record.webpage,
            })
            .collect();

        PanelModel {
            endpoint_count: self.data.filtered_len(),
            source_count: self.data.js_files.len(),
            webpage_count: self.data.webpages.len(),
            search_query: &self.filter.search_query,
            location_label: self.filter.selected_location.label(),
            webpage_label: self.filter.selected_webpage.label(),
            location_options: self.location_open.then(|| options(&self.data.js_files)),
            webpage_options: self.webpage_open.then(|| options(&self.data.webpages)),
            start_index: self.window.start,
            rows,
            error: self.error.as_deref(),
            pending: self.pending,
            show_nav_bar: self.context.show_nav_bar(),
            webpage_panel_link: self.context.webpage_panel_link(),
            output_link: self.context.output_link(),
        }
    }
}

fn options(values: &[String]) -> Vec<&str> {
    std::iter::once(ALL_SENTINEL)
        .chain(values.iter().map(String::as_str))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowModel<'a> {
    /// Absolute position in the filtered sequence
    pub key: usize,
    pub endpoint: Vec<Segment<'a>>,
    pub source_file: &'a str,
    pub webpage: &'a str,
}

/// Everything the table markup needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelModel<'a> {
    pub endpoint_count: usize,
    pub source_count: usize,
    pub webpage_count: usize,
    pub search_query: &'a str,
    pub location_label: &'a str,
    pub webpage_label: &'a str,
    pub location_options: Option<Vec<&'a str>>,
    pub webpage_options: Option<Vec<&'a str>>,
    pub start_index: usize,
    pub rows: Vec<RowModel<'a>>,
    pub error: Option<&'a str>,
    pub pending: bool,
    pub show_nav_bar: bool,
    pub webpage_panel_link: String,
    pub output_link: String,
}
