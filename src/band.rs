//! Temperature band classification.
//!
//! A corrected temperature maps to exactly one [`Band`]. The classifier is
//! a pure function of the value and the configured [`BandThresholds`] —
//! no hidden state, same input always yields the same band.

use serde::Serialize;

use crate::config::BandThresholds;

/// Discrete classification of a corrected temperature, coldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Band {
    Cold,
    Cool,
    Comfortable,
    Warm,
    Hot,
}

/// Face expression shown for a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expression {
    Sad,
    Neutral,
    Happy,
    Doubt,
    Angry,
}

/// RGB colour commanded to the indicator LEDs, 0–255 per channel.
pub type Rgb = (u8, u8, u8);

impl Band {
    /// Classify a corrected temperature against the threshold table.
    ///
    /// Total over all floats: the comparison chain falls through to `Hot`
    /// for anything not caught earlier, including NaN. The engine rejects
    /// invalid readings before this is ever called, so NaN is unreachable
    /// in practice.
    pub fn classify(corrected_temp: f32, t: &BandThresholds) -> Self {
        if corrected_temp < t.cold_below {
            Self::Cold
        } else if corrected_temp < t.cool_below {
            Self::Cool
        } else if corrected_temp <= t.comfortable_to {
            Self::Comfortable
        } else if corrected_temp <= t.warm_to {
            Self::Warm
        } else {
            Self::Hot
        }
    }

    /// Indicator colour for this band. Comfortable maps to LEDs off.
    pub const fn colour(self) -> Rgb {
        match self {
            Self::Cold => (0, 0, 160),
            Self::Cool => (0, 120, 120),
            Self::Comfortable => (0, 0, 0),
            Self::Warm => (200, 120, 0),
            Self::Hot => (200, 40, 40),
        }
    }

    /// Face expression for this band.
    pub const fn expression(self) -> Expression {
        match self {
            Self::Cold => Expression::Sad,
            Self::Cool => Expression::Neutral,
            Self::Comfortable => Expression::Happy,
            Self::Warm => Expression::Doubt,
            Self::Hot => Expression::Angry,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Cold => "Cold",
            Self::Cool => "Cool",
            Self::Comfortable => "Comfortable",
            Self::Warm => "Warm",
            Self::Hot => "Hot",
        }
    }
}
