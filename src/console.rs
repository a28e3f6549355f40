//! Remote console — the semantic control surface.
//!
//! The device serves a small web console (HTML generation and HTTP
//! transport live outside this crate). This module is the
//! transport-agnostic half: typed requests in, typed replies out, with a
//! 4xx/5xx-equivalent status for the handler to translate. Requests are
//! applied between whole control-loop passes, never mid-ingestion.

use serde::Serialize;

use crate::app::commands::ConsoleCommand;
use crate::app::ports::{ActuatorPort, Clock, EventSink, FileStore};
use crate::app::service::AppService;
use crate::band::Band;
use crate::error::{Error, LogError};
use crate::store::LogEntry;
use crate::telemetry::EnvReading;

/// A console request: one of the mutating commands, or a state read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConsoleRequest {
    Command(ConsoleCommand),
    GetSnapshot,
}

/// Reply to a console request.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleReply {
    /// The command took effect.
    Ok,
    /// JSON document of the current engine state.
    Snapshot(String),
    /// The request referenced nonexistent state; nothing changed.
    /// Retrying a delete of an already-deleted index lands here.
    BadRequest(&'static str),
    /// Durable storage rejected the change; in-memory state unchanged
    /// where the store guarantees it (offset), best-effort otherwise.
    StorageFailed,
}

/// Point-in-time view of the engine for the console page.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub reading: &'a EnvReading,
    pub offset: f32,
    pub band: Option<Band>,
    pub logs: &'a [LogEntry],
}

/// Apply one console request to the engine.
pub fn dispatch(
    service: &mut AppService,
    request: ConsoleRequest,
    fs: &mut impl FileStore,
    clock: &impl Clock,
    hw: &mut impl ActuatorPort,
    sink: &mut impl EventSink,
) -> ConsoleReply {
    match request {
        ConsoleRequest::GetSnapshot => {
            let snapshot = Snapshot {
                reading: service.reading(),
                offset: service.offset(),
                band: service.band(),
                logs: service.log_entries(),
            };
            match serde_json::to_string(&snapshot) {
                Ok(json) => ConsoleReply::Snapshot(json),
                Err(_) => ConsoleReply::StorageFailed,
            }
        }
        ConsoleRequest::Command(cmd) => {
            match service.handle_command(cmd, fs, clock, hw, sink) {
                Ok(()) => ConsoleReply::Ok,
                Err(Error::Log(LogError::IndexOutOfRange { .. })) => {
                    ConsoleReply::BadRequest("invalid index")
                }
                Err(Error::Storage(_)) => ConsoleReply::StorageFailed,
                Err(_) => ConsoleReply::BadRequest("rejected"),
            }
        }
    }
}
