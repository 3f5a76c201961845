//! WebAssembly bindings for the JS-Toolkit DevTools panel
//!
//! The panel page owns the DOM and the extension storage. It forwards UI
//! events to an `EndpointPanel`, fetches records from storage when a query
//! is requested, and renders the model returned by `render`.

use jstk_core::{
    ingest, DataSource, Dropdown, MemoryStore, Panel, PanelConfig, PanelContext, PanelEvent,
    QueryOutcome, QueryTicket, RawRecord, ScrollMetrics, Selection, StoreError, ViewChange,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

#[wasm_bindgen]
pub struct EndpointPanel {
    panel: Panel,
    source: DataSource<MemoryStore>,
    ticket: Option<QueryTicket>,
}

#[wasm_bindgen]
impl EndpointPanel {
    /// `config_json` may be empty for the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(pathname: &str, origin: &str, config_json: Option<String>) -> Result<EndpointPanel, JsValue> {
        let config = match config_json.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => PanelConfig::from_json(text)
                .map_err(|e| JsValue::from_str(&format!("Invalid panel config: {}", e)))?,
            _ => PanelConfig::default(),
        };
        let context = PanelContext::new(pathname, origin);
        Ok(EndpointPanel {
            source: DataSource::new(MemoryStore::new(), config.search_case),
            panel: Panel::new(config, context),
            ticket: None,
        })
    }

    /// Build a panel for the page it is running in.
    pub fn for_current_page(config_json: Option<String>) -> Result<EndpointPanel, JsValue> {
        let location = web_sys::window()
            .ok_or_else(|| JsValue::from_str("No window available"))?
            .location();
        let pathname = location.pathname()?;
        let origin = location.origin()?;
        Self::new(&pathname, &origin, config_json)
    }

    pub fn toggle_location(&mut self) -> u8 {
        self.apply(PanelEvent::ToggleDropdown(Dropdown::Location))
    }

    pub fn toggle_webpage(&mut self) -> u8 {
        self.apply(PanelEvent::ToggleDropdown(Dropdown::Webpage))
    }

    pub fn select_location(&mut self, value: &str) -> u8 {
        self.apply(PanelEvent::SelectLocation(Selection::parse(value)))
    }

    pub fn select_webpage(&mut self, value: &str) -> u8 {
        self.apply(PanelEvent::SelectWebpage(Selection::parse(value)))
    }

    pub fn search(&mut self, query: &str) -> u8 {
        self.apply(PanelEvent::Search(query.to_string()))
    }

    pub fn reset_filters(&mut self) -> u8 {
        self.apply(PanelEvent::ResetFilters)
    }

    pub fn scroll(&mut self, scroll_top: f64, scroll_height: f64, client_height: f64) -> u8 {
        self.apply(PanelEvent::Scroll(ScrollMetrics::new(scroll_top, scroll_height, client_height)))
    }

    /// Returns the generation to pass back to `resolve_query`/`reject_query`.
    /// The generation is returned as f64 so it crosses into JS as a Number.
    pub fn begin_query(&mut self) -> f64 {
        let ticket = self.panel.begin_query();
        let generation = ticket.generation as f64;
        self.ticket = Some(ticket);
        generation
    }

    /// Deliver stored records for a query. Accepts an array of record
    /// objects, an object with a `urls` array, or a JSON string of either.
    /// Unreadable input fails the query and keeps the last good rows.
    /// Returns false when the answer was for a superseded query.
    pub fn resolve_query(&mut self, generation: f64, records: JsValue) -> bool {
        let Some(ticket) = self.current_ticket(generation) else {
            return false;
        };
        let result = records_from_js(&records).and_then(|records| {
            self.source.store_mut().replace(records);
            self.source.query(&ticket.filter)
        });
        self.finish(&ticket, result)
    }

    pub fn reject_query(&mut self, generation: f64, message: &str) -> bool {
        let Some(ticket) = self.current_ticket(generation) else {
            return false;
        };
        self.finish(&ticket, Err(StoreError::Unavailable(message.to_string())))
    }

    /// Drop all records. The page is responsible for wiping extension storage.
    pub fn clear_all(&mut self) -> bool {
        self.ticket = None;
        self.panel.clear_all(&mut self.source) == QueryOutcome::Applied
    }

    pub fn render(&self) -> Result<JsValue, JsValue> {
        let json = serde_json::to_string(&self.panel.render())
            .map_err(|e| JsValue::from_str(&format!("Failed to encode panel model: {}", e)))?;
        js_sys::JSON::parse(&json)
    }

    pub fn start_index(&self) -> u32 {
        self.panel.window().start as u32
    }

    pub fn filtered_count(&self) -> u32 {
        self.panel.data().filtered_len() as u32
    }
}

impl EndpointPanel {
    fn apply(&mut self, event: PanelEvent) -> u8 {
        self.panel.apply(event).bits()
    }

    fn current_ticket(&mut self, generation: f64) -> Option<QueryTicket> {
        match self.ticket.take() {
            Some(ticket) if ticket.generation as f64 == generation => Some(ticket),
            other => {
                log::debug!("ignoring answer for superseded query {}", generation);
                self.ticket = other;
                None
            }
        }
    }

    fn finish(&mut self, ticket: &QueryTicket, result: Result<jstk_core::QueryResult, StoreError>) -> bool {
        self.panel.complete_query(ticket, result) != QueryOutcome::Stale
    }
}

/// Change flags exposed to JS, matching the bits returned by event methods.
#[wasm_bindgen]
pub fn change_flags() -> JsValue {
    let result = js_sys::Object::new();
    let flags = [
        ("filter", ViewChange::FILTER),
        ("window", ViewChange::WINDOW),
        ("dropdown", ViewChange::DROPDOWN),
    ];
    for (name, flag) in flags {
        let _ = js_sys::Reflect::set(&result, &name.into(), &JsValue::from(flag.bits()));
    }
    result.into()
}

fn records_from_js(value: &JsValue) -> Result<Vec<RawRecord>, StoreError> {
    if let Some(text) = value.as_string() {
        return ingest::parse_capture(&text);
    }

    let items = if js_sys::Array::is_array(value) {
        js_sys::Array::from(value)
    } else if value.is_object() {
        match js_sys::Reflect::get(value, &"urls".into()) {
            Ok(urls) if js_sys::Array::is_array(&urls) => js_sys::Array::from(&urls),
            _ => return Err(StoreError::Shape("object without a `urls` array")),
        }
    } else {
        return Err(StoreError::Shape("neither an array nor an object"));
    };

    let mut records = Vec::with_capacity(items.length() as usize);
    for entry in items.iter() {
        if !entry.is_object() {
            continue;
        }
        records.push(RawRecord {
            endpoint: string_field(&entry, ingest::ENDPOINT_KEYS),
            source_file: string_field(&entry, ingest::SOURCE_FILE_KEYS),
            webpage: string_field(&entry, ingest::WEBPAGE_KEYS),
        });
    }
    Ok(records)
}

fn string_field(entry: &JsValue, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        js_sys::Reflect::get(entry, &(*key).into())
            .ok()
            .and_then(|value| value.as_string())
    })
}
