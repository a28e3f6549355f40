//! Inbound commands to the application service.
//!
//! These represent actions requested by the remote console (or a device
//! button) that the [`AppService`](super::service::AppService) interprets
//! and acts upon. The transport that carried them is irrelevant here.

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsoleCommand {
    /// Shift the calibration offset by `delta` °C and re-evaluate the
    /// held-over reading.
    AdjustOffset(f32),

    /// Delete the log entry at `index` (oldest = 0).
    DeleteLogEntry(usize),

    /// Delete every log entry and the durable log record.
    ClearLogs,

    /// Append the held-over reading on demand (device button B),
    /// subject to the usual dedup policy.
    CaptureReading,
}
