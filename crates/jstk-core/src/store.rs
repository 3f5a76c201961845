//! Record storage seam.
//!
//! Capture and persistence belong to the extension runtime. The core only
//! needs to read everything that was captured and to wipe it.

use crate::types::RawRecord;

/// Error type for record store access.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record store unavailable: {0}")]
    Unavailable(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed capture data: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Unrecognised capture shape: {0}")]
    Shape(&'static str),
}

pub trait RecordStore {
    /// All captured records in capture order.
    fn load(&self) -> Result<Vec<RawRecord>, StoreError>;

    /// Remove every stored record. Clearing an empty store is a no-op.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// In-memory store, fed by the host.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<RawRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: RawRecord) {
        self.records.push(record);
    }

    pub fn replace(&mut self, records: Vec<RawRecord>) {
        self.records = records;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> Result<Vec<RawRecord>, StoreError> {
        Ok(self.records.clone())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.records.clear();
        Ok(())
    }
}
