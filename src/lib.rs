//! EnvMate firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod band;
pub mod config;
pub mod console;
pub mod store;
pub mod telemetry;
pub mod tracker;

mod error;

pub use error::{Error, LogError, Result, StorageError};

// Adapters compile on both targets; the ESP-IDF backends are guarded
// by cfg attributes inside.
pub mod adapters;
