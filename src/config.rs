//! System configuration parameters
//!
//! All tunable parameters for the EnvMate engine. Thresholds are
//! configuration, not data: the band table and dedup deltas ship with the
//! firmware defaults below and are never mutated by ingestion.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Temperature band boundaries (°C), applied to the corrected temperature.
///
/// The table is evaluated top-to-bottom: `< cold_below` → Cold,
/// `< cool_below` → Cool, `<= comfortable_to` → Comfortable,
/// `<= warm_to` → Warm, else Hot. A boundary value therefore always
/// belongs to the warmer band and exactly one band matches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BandThresholds {
    pub cold_below: f32,
    pub cool_below: f32,
    pub comfortable_to: f32,
    pub warm_to: f32,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            cold_below: 18.0,
            cool_below: 22.0,
            comfortable_to: 26.0,
            warm_to: 30.0,
        }
    }
}

/// Minimum per-channel change before a reading is considered novel enough
/// to log. Bounds log growth under a noisy but stable sensor. Accepted
/// limitation: a slow monotonic drift that never exceeds a single delta
/// is not logged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DedupDeltas {
    /// °C
    pub temperature: f32,
    /// %RH
    pub humidity: f32,
    /// hPa
    pub pressure: f32,
}

impl Default for DedupDeltas {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            humidity: 1.0,
            pressure: 0.5,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Band classification boundaries.
    pub bands: BandThresholds,
    /// Log deduplication deltas.
    pub dedup: DedupDeltas,
    /// Control loop interval (milliseconds).
    pub control_loop_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            bands: BandThresholds::default(),
            dedup: DedupDeltas::default(),
            control_loop_interval_ms: 10,
        }
    }
}

impl SystemConfig {
    /// Reject inverted or degenerate tables before the engine is built.
    pub fn validate(&self) -> Result<(), Error> {
        let b = &self.bands;
        if !(b.cold_below < b.cool_below
            && b.cool_below < b.comfortable_to
            && b.comfortable_to < b.warm_to)
        {
            return Err(Error::Config("band thresholds must be strictly increasing"));
        }
        if self.dedup.temperature <= 0.0
            || self.dedup.humidity <= 0.0
            || self.dedup.pressure <= 0.0
        {
            return Err(Error::Config("dedup deltas must be positive"));
        }
        if self.control_loop_interval_ms == 0 {
            return Err(Error::Config("control_loop_interval_ms must be non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = SystemConfig::default();
        assert!(c.validate().is_ok());
        assert!(c.bands.cold_below < c.bands.warm_to);
        assert!(c.dedup.temperature > 0.0);
        assert!(c.control_loop_interval_ms > 0);
    }

    #[test]
    fn inverted_band_table_rejected() {
        let mut c = SystemConfig::default();
        c.bands.cool_below = c.bands.cold_below - 1.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn zero_dedup_delta_rejected() {
        let mut c = SystemConfig::default();
        c.dedup.humidity = 0.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: SystemConfig = serde_json::from_str(&json).unwrap();
        assert!((c.bands.cold_below - c2.bands.cold_below).abs() < 0.001);
        assert!((c.dedup.pressure - c2.dedup.pressure).abs() < 0.001);
        assert_eq!(c.control_loop_interval_ms, c2.control_loop_interval_ms);
    }
}
