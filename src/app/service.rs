//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the calibration store, the reading log, the band
//! tracker, and the held-over last reading. It exposes a clean,
//! hardware-agnostic API. All I/O flows through port traits injected at
//! call sites, making the entire engine testable with mock adapters.
//!
//! ```text
//!  telemetry ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                │       AppService        │
//!  FileStore ◀──▶│ Calibration · Log · Band │──▶ ActuatorPort
//!                └────────────────────────┘
//! ```
//!
//! Everything here runs on the single-threaded control loop: console
//! commands are applied between whole loop passes, never interleaved
//! with an ingestion pass, so no internal locking exists or is needed.

use log::{debug, info, warn};

use crate::band::Band;
use crate::config::SystemConfig;
use crate::error::{Error, LogError};
use crate::store::{CalibrationStore, LogEntry, LogStore};
use crate::telemetry::EnvReading;
use crate::tracker::BandTracker;

use super::commands::ConsoleCommand;
use super::events::AppEvent;
use super::ports::{ActuatorPort, Clock, EventSink, FileStore};

// ───────────────────────────────────────────────────────────────
// Boot phase
// ───────────────────────────────────────────────────────────────

/// Device boot phase. The engine ignores telemetry until the device
/// leaves the onboarding (QR) screen and explicitly enters tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Showing onboarding screens; ingestion not yet armed.
    Provisioning,
    /// Active tracking: classify, log, and drive actuators.
    Active,
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    config: SystemConfig,
    phase: Phase,
    calibration: CalibrationStore,
    log: LogStore,
    tracker: BandTracker,
    /// Held-over last reading, offset already applied. Re-evaluated when
    /// the console changes the offset.
    reading: EnvReading,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch storage — call [`load`](Self::load) next.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            config,
            phase: Phase::Provisioning,
            calibration: CalibrationStore::new(),
            log: LogStore::new(),
            tracker: BandTracker::new(),
            reading: EnvReading::not_yet_received(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Restore calibration and logs from the durable store. Missing or
    /// corrupt records degrade to defaults; nothing here is fatal.
    pub fn load(&mut self, fs: &impl FileStore) {
        self.calibration.load(fs);
        self.log.load(fs);
        info!(
            "engine: restored offset {:.2}, {} log entries",
            self.calibration.offset(),
            self.log.len()
        );
    }

    /// Leave the onboarding phase and arm ingestion.
    pub fn enter_active(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        if self.phase == Phase::Active {
            return;
        }
        self.phase = Phase::Active;
        hw.all_off();
        sink.emit(&AppEvent::Activated);
        info!("engine: entering active tracking phase");
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    // ── Ingestion ─────────────────────────────────────────────

    /// Process one raw reading from the telemetry topic.
    ///
    /// Invalid readings are rejected silently: no classification, no log
    /// mutation, no transition. Storage failures degrade to in-memory
    /// operation for this cycle and never stop the loop.
    pub fn ingest(
        &mut self,
        raw: EnvReading,
        fs: &mut impl FileStore,
        clock: &impl Clock,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        if self.phase != Phase::Active {
            debug!("engine: reading before active phase, ignored");
            return;
        }
        if !raw.valid {
            return;
        }

        let corrected = EnvReading::new(
            raw.temperature + self.calibration.offset(),
            raw.humidity,
            raw.pressure,
        );
        self.reading = corrected;

        let band = Band::classify(corrected.temperature, &self.config.bands);
        if let Some(t) = self.tracker.observe(band) {
            sink.emit(&AppEvent::BandChanged {
                from: t.from,
                to: t.to,
            });
        }
        self.apply_actuators(band, hw);
        sink.emit(&AppEvent::ReadingIngested {
            corrected_temp: corrected.temperature,
            band,
        });

        self.maybe_log(fs, clock, sink);
    }

    /// Drain the pending transition flag, firing the one-shot cue.
    ///
    /// Called exactly once per control-loop pass by the single consumer.
    /// Returns whether a transition was drained.
    pub fn drain_transition(&mut self, hw: &mut impl ActuatorPort) -> bool {
        if self.tracker.take_transition() {
            hw.notify_transition();
            true
        } else {
            false
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a console command (from the web console or a button).
    ///
    /// Errors are returned to the caller so the control surface can map
    /// them to its reply codes; the engine's own state never corrupts on
    /// a failed command.
    pub fn handle_command(
        &mut self,
        cmd: ConsoleCommand,
        fs: &mut impl FileStore,
        clock: &impl Clock,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Result<(), Error> {
        match cmd {
            ConsoleCommand::AdjustOffset(delta) => {
                let new_offset = self.calibration.offset() + delta;
                self.calibration.set_offset(new_offset, fs).map_err(|e| {
                    warn!("engine: offset change rejected ({e})");
                    Error::Storage(e)
                })?;
                sink.emit(&AppEvent::OffsetChanged { offset: new_offset });
                self.reevaluate_held_reading(delta, hw, sink);
                Ok(())
            }
            ConsoleCommand::DeleteLogEntry(index) => {
                match self.log.delete_at(index, fs) {
                    Ok(()) => {
                        sink.emit(&AppEvent::LogDeleted { index });
                        Ok(())
                    }
                    Err(e @ LogError::IndexOutOfRange { .. }) => Err(Error::Log(e)),
                    Err(LogError::Storage(e)) => {
                        // In-memory delete took effect; durability is
                        // best-effort until the next successful rewrite.
                        warn!("engine: log delete not durable ({e})");
                        sink.emit(&AppEvent::StorageDegraded);
                        sink.emit(&AppEvent::LogDeleted { index });
                        Ok(())
                    }
                }
            }
            ConsoleCommand::ClearLogs => {
                if let Err(e) = self.log.clear(fs) {
                    warn!("engine: log clear not durable ({e})");
                    sink.emit(&AppEvent::StorageDegraded);
                }
                sink.emit(&AppEvent::LogsCleared);
                Ok(())
            }
            ConsoleCommand::CaptureReading => {
                if self.reading.valid {
                    self.maybe_log(fs, clock, sink);
                }
                Ok(())
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Held-over last reading (offset applied), invalid until the first
    /// ingestion.
    pub fn reading(&self) -> &EnvReading {
        &self.reading
    }

    pub fn offset(&self) -> f32 {
        self.calibration.offset()
    }

    /// Band of the last valid reading, `None` before the first.
    pub fn band(&self) -> Option<Band> {
        self.tracker.current()
    }

    pub fn log_entries(&self) -> &[LogEntry] {
        self.log.entries()
    }

    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    /// Speech-bubble status line for the face renderer.
    pub fn status_line(&self) -> String {
        if !self.reading.valid {
            return "Waiting for sensor...".to_owned();
        }
        format!(
            "Now T:{:.1}C (off:{:.1})\nH:{:.0}% P:{:.0}hPa\nLogs:{}",
            self.reading.temperature,
            self.calibration.offset(),
            self.reading.humidity,
            self.reading.pressure,
            self.log.len()
        )
    }

    // ── Internal ──────────────────────────────────────────────

    /// Dedup check against the newest log entry, appending when novel.
    fn maybe_log(
        &mut self,
        fs: &mut impl FileStore,
        clock: &impl Clock,
        sink: &mut impl EventSink,
    ) {
        let d = &self.config.dedup;
        if let Some(last) = self.log.newest() {
            let novel = (self.reading.temperature - last.temperature).abs() >= d.temperature
                || (self.reading.humidity - last.humidity).abs() >= d.humidity
                || (self.reading.pressure - last.pressure).abs() >= d.pressure;
            if !novel {
                return;
            }
        }

        let entry = LogEntry::capture(&self.reading, clock);
        match self.log.append(entry, fs) {
            Ok(()) => sink.emit(&AppEvent::LogAppended {
                index: self.log.len() - 1,
            }),
            Err(e) => {
                warn!("engine: log append not durable ({e})");
                sink.emit(&AppEvent::StorageDegraded);
                sink.emit(&AppEvent::LogAppended {
                    index: self.log.len() - 1,
                });
            }
        }
    }

    /// After an offset change, re-run classification on the held-over
    /// reading so derived state stays consistent. A resulting band change
    /// raises a second transition, exactly like a fresh reading would.
    fn reevaluate_held_reading(
        &mut self,
        delta: f32,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        if !self.reading.valid || self.phase != Phase::Active {
            return;
        }
        self.reading.temperature += delta;
        let band = Band::classify(self.reading.temperature, &self.config.bands);
        if let Some(t) = self.tracker.observe(band) {
            sink.emit(&AppEvent::BandChanged {
                from: t.from,
                to: t.to,
            });
        }
        self.apply_actuators(band, hw);
    }

    /// Deterministic band → actuator targets.
    fn apply_actuators(&self, band: Band, hw: &mut impl ActuatorPort) {
        hw.set_band_colour(band);
        hw.set_mood_expression(band);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullHw;
    impl ActuatorPort for NullHw {
        fn set_band_colour(&mut self, _band: Band) {}
        fn set_mood_expression(&mut self, _band: Band) {}
        fn notify_transition(&mut self) {}
        fn all_off(&mut self) {}
    }

    struct NullSink;
    impl EventSink for NullSink {
        fn emit(&mut self, _event: &AppEvent) {}
    }

    #[test]
    fn starts_in_provisioning() {
        let app = AppService::new(SystemConfig::default());
        assert_eq!(app.phase(), Phase::Provisioning);
        assert!(!app.reading().valid);
        assert!(app.band().is_none());
    }

    #[test]
    fn enter_active_is_idempotent() {
        let mut app = AppService::new(SystemConfig::default());
        app.enter_active(&mut NullHw, &mut NullSink);
        app.enter_active(&mut NullHw, &mut NullSink);
        assert_eq!(app.phase(), Phase::Active);
    }

    #[test]
    fn status_line_before_first_reading() {
        let app = AppService::new(SystemConfig::default());
        assert_eq!(app.status_line(), "Waiting for sensor...");
    }
}
