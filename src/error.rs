//! Unified error types for the EnvMate firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level control loop's error handling uniform. All variants are `Copy`
//! and allocation-free.
//!
//! Nothing in this crate is fatal: storage failures degrade to in-memory
//! operation for the cycle, index errors are rejected back to the console,
//! and malformed input is skipped record-by-record.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Durable storage unavailable or a write failed.
    Storage(StorageError),
    /// A log-sequence operation failed.
    Log(LogError),
    /// An ingestion payload or stored line failed to parse.
    Malformed(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Log(e) => write!(f, "log: {e}"),
            Self::Malformed(msg) => write!(f, "malformed input: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

/// Failures from the durable file store.
///
/// A `NotFound` on load is a recoverable "use defaults" condition and is
/// handled where it occurs; it only propagates from operations that require
/// the record to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The durable record does not exist.
    NotFound,
    /// Reading the durable record failed.
    ReadFailed,
    /// Writing or appending the durable record failed.
    WriteFailed,
    /// Removing the durable record failed.
    RemoveFailed,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "record not found"),
            Self::ReadFailed => write!(f, "read failed"),
            Self::WriteFailed => write!(f, "write failed"),
            Self::RemoveFailed => write!(f, "remove failed"),
        }
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Log-sequence errors
// ---------------------------------------------------------------------------

/// Failures from log-sequence mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogError {
    /// A console request referenced an entry that does not exist.
    /// Rejected with no state change (the 4xx-equivalent of this core).
    IndexOutOfRange { index: usize, len: usize },
    /// The in-memory mutation succeeded but durability could not be
    /// guaranteed. Callers must treat the sequence as best-effort until
    /// the next successful rewrite.
    Storage(StorageError),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range (len {len})")
            }
            Self::Storage(e) => write!(f, "{e}"),
        }
    }
}

impl From<StorageError> for LogError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<LogError> for Error {
    fn from(e: LogError) -> Self {
        Self::Log(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
