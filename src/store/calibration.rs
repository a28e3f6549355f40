//! Persisted temperature calibration offset.
//!
//! A single signed float, added to the raw temperature channel before
//! classification and before logging. Persisted synchronously on every
//! change — each change must survive an immediate power loss, so there
//! is no write coalescing here.

use log::{info, warn};

use crate::app::ports::FileStore;
use crate::error::StorageError;

/// Durable record name inside the data partition.
pub const OFFSET_FILE: &str = "offset.txt";

/// Owns the in-memory offset and its durable single-line record.
#[derive(Debug)]
pub struct CalibrationStore {
    offset: f32,
}

impl Default for CalibrationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CalibrationStore {
    pub const fn new() -> Self {
        Self { offset: 0.0 }
    }

    /// Current offset in °C.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Restore the last persisted offset.
    ///
    /// A missing or corrupt record is a recoverable "use default"
    /// condition, reported in the log but never propagated.
    pub fn load(&mut self, fs: &impl FileStore) {
        match fs.read_to_string(OFFSET_FILE) {
            Ok(contents) => {
                let line = contents.lines().next().unwrap_or("").trim();
                match line.parse::<f32>() {
                    Ok(value) if value.is_finite() => {
                        self.offset = value;
                        info!("calibration: restored offset {value:.2}");
                    }
                    _ => warn!("calibration: corrupt record, using offset 0.0"),
                }
            }
            Err(StorageError::NotFound) => {
                info!("calibration: no stored offset, using 0.0");
            }
            Err(e) => warn!("calibration: load failed ({e}), using 0.0"),
        }
    }

    /// Durably persist `value`, then adopt it in memory.
    ///
    /// On persistence failure the in-memory offset is left unchanged —
    /// a rejected change is safer than a divergent one.
    pub fn set_offset(
        &mut self,
        value: f32,
        fs: &mut impl FileStore,
    ) -> Result<(), StorageError> {
        fs.write_all(OFFSET_FILE, &format!("{value:.2}\n"))?;
        self.offset = value;
        Ok(())
    }
}
