//! Band transition tracking.
//!
//! Holds the last observed band and a one-shot pending-transition flag.
//! The flag is a single slot, not a counter: however many readings arrive
//! between drains, at most one side effect fires per actual band change,
//! and exactly one consumer drains it per control-loop pass.

use crate::band::Band;

/// A band change detected by [`BandTracker::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Band,
    pub to: Band,
}

/// Tracks the last observed band and whether a transition is pending.
#[derive(Debug, Default)]
pub struct BandTracker {
    last_band: Option<Band>,
    pending_transition: bool,
}

impl BandTracker {
    pub const fn new() -> Self {
        Self {
            last_band: None,
            pending_transition: false,
        }
    }

    /// Record a classification result.
    ///
    /// The very first observation only initialises the tracker — a device
    /// that boots into a hot room must not immediately sound an alarm.
    /// Afterwards, a changed band raises the pending flag and returns the
    /// transition; an identical band is a no-op.
    pub fn observe(&mut self, band: Band) -> Option<Transition> {
        match self.last_band {
            None => {
                self.last_band = Some(band);
                None
            }
            Some(prev) if prev != band => {
                self.last_band = Some(band);
                self.pending_transition = true;
                Some(Transition { from: prev, to: band })
            }
            Some(_) => None,
        }
    }

    /// The band last observed, `None` until the first valid reading.
    pub fn current(&self) -> Option<Band> {
        self.last_band
    }

    /// Drain the pending flag: read-and-clear, single consumer per pass.
    pub fn take_transition(&mut self) -> bool {
        core::mem::take(&mut self.pending_transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_never_pends() {
        let mut tracker = BandTracker::new();
        assert_eq!(tracker.observe(Band::Hot), None);
        assert!(!tracker.take_transition());
        assert_eq!(tracker.current(), Some(Band::Hot));
    }

    #[test]
    fn change_pends_exactly_once() {
        let mut tracker = BandTracker::new();
        tracker.observe(Band::Cool);
        let t = tracker.observe(Band::Warm).unwrap();
        assert_eq!(t, Transition { from: Band::Cool, to: Band::Warm });
        assert!(tracker.take_transition());
        assert!(!tracker.take_transition());
    }

    #[test]
    fn identical_readings_do_not_re_pend() {
        let mut tracker = BandTracker::new();
        tracker.observe(Band::Cool);
        tracker.observe(Band::Warm);
        assert_eq!(tracker.observe(Band::Warm), None);
        assert_eq!(tracker.observe(Band::Warm), None);
        assert!(tracker.take_transition());
        assert!(!tracker.take_transition());
    }

    #[test]
    fn flag_is_a_slot_not_a_counter() {
        let mut tracker = BandTracker::new();
        tracker.observe(Band::Cold);
        tracker.observe(Band::Cool);
        tracker.observe(Band::Comfortable);
        // Two changes before a drain still drain as one.
        assert!(tracker.take_transition());
        assert!(!tracker.take_transition());
    }
}
