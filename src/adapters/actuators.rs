//! Cosmetic actuator adapter.
//!
//! Implements [`ActuatorPort`] by tracking the commanded state and
//! forwarding it to the rendering layer owned by the display task (LED
//! strips, face renderer, chime). Rendering itself lives outside this
//! crate; this adapter is the last thing the engine sees.
//!
//! ## Dual-target design
//!
//! On ESP-IDF the stored targets are picked up by the display task each
//! frame. On host/test the adapter only tracks state in-memory, which is
//! exactly what the integration mocks assert against.

use log::info;

use crate::app::ports::ActuatorPort;
use crate::band::{Band, Expression, Rgb};

pub struct StatusActuators {
    colour: Rgb,
    expression: Expression,
}

impl Default for StatusActuators {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusActuators {
    pub fn new() -> Self {
        Self {
            colour: (0, 0, 0),
            expression: Expression::Neutral,
        }
    }

    /// Colour currently commanded to the LED strips.
    pub fn current_colour(&self) -> Rgb {
        self.colour
    }

    /// Expression currently commanded to the face renderer.
    pub fn current_expression(&self) -> Expression {
        self.expression
    }
}

impl ActuatorPort for StatusActuators {
    fn set_band_colour(&mut self, band: Band) {
        self.colour = band.colour();
    }

    fn set_mood_expression(&mut self, band: Band) {
        self.expression = band.expression();
    }

    fn notify_transition(&mut self) {
        // The chime is fire-and-forget; the display task plays it once.
        info!("actuators: transition chime");
    }

    fn all_off(&mut self) {
        self.colour = (0, 0, 0);
        self.expression = Expression::Neutral;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colour_follows_band_table() {
        let mut act = StatusActuators::new();
        act.set_band_colour(Band::Hot);
        assert_eq!(act.current_colour(), Band::Hot.colour());
        act.set_band_colour(Band::Comfortable);
        assert_eq!(act.current_colour(), (0, 0, 0));
    }

    #[test]
    fn all_off_resets_state() {
        let mut act = StatusActuators::new();
        act.set_band_colour(Band::Cold);
        act.set_mood_expression(Band::Cold);
        act.all_off();
        assert_eq!(act.current_colour(), (0, 0, 0));
        assert_eq!(act.current_expression(), Expression::Neutral);
    }
}
