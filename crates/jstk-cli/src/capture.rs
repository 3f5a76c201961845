use std::fs;
use std::path::{Path, PathBuf};

use jstk_core::ingest::{parse_capture, write_capture};
use jstk_core::{PanelConfig, RawRecord, RecordStore, StoreError};

/// Record store backed by a capture dump on disk.
pub struct CaptureFile {
    path: PathBuf,
}

impl CaptureFile {
    pub fn new(path: &str) -> Self {
        Self { path: PathBuf::from(path) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for CaptureFile {
    fn load(&self) -> Result<Vec<RawRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records = parse_capture(&text)?;
        log::debug!("loaded {} records from '{}'", records.len(), self.path.display());
        Ok(records)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        if !self.path.exists() {
            log::debug!("nothing to clear at '{}'", self.path.display());
            return Ok(());
        }
        fs::write(&self.path, write_capture(&[])?)?;
        log::info!("cleared '{}'", self.path.display());
        Ok(())
    }
}

pub fn load_config(path: Option<&str>) -> Result<PanelConfig, String> {
    let Some(path) = path else {
        return Ok(PanelConfig::default());
    };
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path, e))?;
    PanelConfig::from_json(&text)
        .map_err(|e| format!("Invalid config '{}': {}", path, e))
}
