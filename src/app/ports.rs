//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (file store, clock, actuators, event sinks) implement
//! these traits. The [`AppService`](super::service::AppService) consumes
//! them via generics, so the domain core never touches hardware directly.

use crate::band::Band;
use crate::error::StorageError;

// ───────────────────────────────────────────────────────────────
// File store port (domain ↔ durable line-oriented records)
// ───────────────────────────────────────────────────────────────

/// Durable storage for the line-oriented calibration and log records.
///
/// Names are flat file names inside the device's data partition
/// (SPIFFS on the target, a plain directory on the host). A mutation
/// reported `Ok` MUST be durable against an immediate power loss; the
/// calibration and log stores only update their in-memory state on `Ok`
/// (or explicitly downgrade to best-effort, for the log append path).
pub trait FileStore {
    /// Read the whole record. `StorageError::NotFound` when absent.
    fn read_to_string(&self, name: &str) -> Result<String, StorageError>;

    /// Replace the record atomically with the given contents.
    fn write_all(&mut self, name: &str, contents: &str) -> Result<(), StorageError>;

    /// Append a single line, creating the record if absent.
    fn append_line(&mut self, name: &str, line: &str) -> Result<(), StorageError>;

    /// Delete the record. `Ok(())` even if it did not exist.
    fn remove(&mut self, name: &str) -> Result<(), StorageError>;

    /// Check whether the record exists without reading it.
    fn exists(&self, name: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Clock port (domain ← monotonic time)
// ───────────────────────────────────────────────────────────────

/// Monotonic time source used to stamp log entries.
pub trait Clock {
    /// Seconds since boot.
    fn uptime_secs(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (domain → cosmetic outputs)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the cosmetic actuators: indicator LEDs, the
/// animated face, and the transition chime. Rendering lives entirely on
/// the adapter side; the domain only states *which band* is current.
pub trait ActuatorPort {
    /// Drive the indicator LEDs to the band's colour (Comfortable = off).
    fn set_band_colour(&mut self, band: Band);

    /// Update the face expression for the band.
    fn set_mood_expression(&mut self, band: Band);

    /// Fire the one-shot transition cue (short audio chime). Called at
    /// most once per actual band change.
    fn notify_transition(&mut self);

    /// All cosmetic outputs off — pre-ingest / invalid-reading state.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, MQTT
/// state topic, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
