//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! An MQTT state-topic adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::ReadingIngested {
                corrected_temp,
                band,
            } => {
                info!("READ  | T={corrected_temp:.1}\u{00b0}C band={}", band.name());
            }
            AppEvent::BandChanged { from, to } => {
                info!("BAND  | {} -> {}", from.name(), to.name());
            }
            AppEvent::LogAppended { index } => {
                info!("LOG   | appended #{index}");
            }
            AppEvent::LogDeleted { index } => {
                info!("LOG   | deleted #{index}");
            }
            AppEvent::LogsCleared => {
                info!("LOG   | cleared");
            }
            AppEvent::OffsetChanged { offset } => {
                info!("CAL   | offset={offset:.2}");
            }
            AppEvent::StorageDegraded => {
                warn!("STORE | durable write failed, in-memory only this cycle");
            }
            AppEvent::Activated => {
                info!("PHASE | active tracking");
            }
        }
    }
}
