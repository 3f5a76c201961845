//! JS-Toolkit Core Library
//!
//! This crate holds the view logic behind the JS-Toolkit DevTools panel's
//! endpoint table. It does no capturing and no persistence: the extension
//! runtime records endpoints and hands them in through a [`RecordStore`].
//!
//! # Architecture
//!
//! User input (dropdown selection, search text, scroll) is applied to the
//! [`Panel`] as events. Filter events go through a pure filter reducer and
//! invalidate the current data; the host then re-queries the
//! [`DataSource`], which validates raw records and derives the distinct
//! source/webpage lists and the filtered subsequence. Scroll events go
//! through a pure window reducer that slides a fixed-size slice over the
//! filtered records.
//!
//! # Modules
//!
//! - `types`: records, selections and the search case policy
//! - `ingest`: capture dump parsing
//! - `config`: panel tuning knobs
//! - `filter`: filter state and reducer
//! - `window`: windowed list state and reducer
//! - `store`: record store trait and in-memory store
//! - `adapter`: query derivation over a record store
//! - `highlight`: search match segments for rendering
//! - `route`: panel routes and injected host context
//! - `panel`: the table controller tying it together

pub mod types;
pub mod ingest;
pub mod config;
pub mod filter;
pub mod window;
pub mod store;
pub mod adapter;
pub mod highlight;
pub mod route;
pub mod panel;

// Re-export commonly used types
pub use adapter::{DataSource, QueryResult};
pub use config::{ConfigError, PanelConfig};
pub use filter::{FilterEvent, FilterState};
pub use panel::{Dropdown, Panel, PanelEvent, PanelModel, QueryOutcome, QueryTicket, ViewChange};
pub use route::{PanelContext, Route};
pub use store::{MemoryStore, RecordStore, StoreError};
pub use types::{RawRecord, Record, SearchCase, Selection};
pub use window::{ScrollMetrics, WindowConfig, WindowEvent, WindowState};
