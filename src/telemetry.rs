//! Telemetry ingestion — the wire format of the environmental sensor node.
//!
//! The sensor node publishes a comma-separated triple
//! `temperature,humidity,pressure` on [`ENV_TOPIC`]. Anything that is not
//! exactly three finite numeric fields is discarded with no state change.

use serde::Serialize;

use crate::error::Error;

/// Canonical topic the sensor node publishes readings on.
pub const ENV_TOPIC: &str = "home/env/envmate1";

/// A single environmental reading.
///
/// `valid == false` means "no data received yet" and is distinct from a
/// legitimate zero reading; the engine treats invalid readings as a no-op.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EnvReading {
    /// °C. Raw from the sensor until the engine applies the offset.
    pub temperature: f32,
    /// %RH
    pub humidity: f32,
    /// hPa
    pub pressure: f32,
    pub valid: bool,
}

impl EnvReading {
    /// The "nothing received yet" placeholder shown at boot.
    pub const fn not_yet_received() -> Self {
        Self {
            temperature: f32::NAN,
            humidity: f32::NAN,
            pressure: f32::NAN,
            valid: false,
        }
    }

    pub const fn new(temperature: f32, humidity: f32, pressure: f32) -> Self {
        Self {
            temperature,
            humidity,
            pressure,
            valid: true,
        }
    }
}

impl Default for EnvReading {
    fn default() -> Self {
        Self::not_yet_received()
    }
}

/// Parse a `t,h,p` payload into a valid reading.
///
/// Rejects wrong field counts, non-numeric tokens, and non-finite values,
/// so NaN never enters the classification path.
pub fn parse_payload(payload: &str) -> Result<EnvReading, Error> {
    let mut fields = payload.trim().split(',');

    let mut next_field = |name: &'static str| -> Result<f32, Error> {
        let token = fields.next().ok_or(Error::Malformed("missing field"))?;
        let value: f32 = token
            .trim()
            .parse()
            .map_err(|_| Error::Malformed("non-numeric field"))?;
        if !value.is_finite() {
            return Err(Error::Malformed(name));
        }
        Ok(value)
    };

    let temperature = next_field("temperature not finite")?;
    let humidity = next_field("humidity not finite")?;
    let pressure = next_field("pressure not finite")?;

    if fields.next().is_some() {
        return Err(Error::Malformed("too many fields"));
    }

    Ok(EnvReading::new(temperature, humidity, pressure))
}
