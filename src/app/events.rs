//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them — log to serial, publish on the
//! state topic, update the web console, etc.

use crate::band::Band;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// A valid reading was ingested (corrected temperature shown).
    ReadingIngested { corrected_temp: f32, band: Band },

    /// The classified band changed from its previous value.
    BandChanged { from: Band, to: Band },

    /// A novel reading was appended to the log.
    LogAppended { index: usize },

    /// A log entry was deleted through the console.
    LogDeleted { index: usize },

    /// All log entries were cleared through the console.
    LogsCleared,

    /// The calibration offset changed (new absolute value).
    OffsetChanged { offset: f32 },

    /// A durable write failed and the cycle continued in-memory only.
    StorageDegraded,

    /// The engine entered the active tracking phase.
    Activated,
}
