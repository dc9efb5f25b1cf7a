use std::time::{Duration, Instant};

use super::{Level, SharedFlag};

/// Turns a noisy raw pin reading into stable logical edges, inverting a
/// target flag once per qualifying press.
///
/// Polled on a fixed cadence from the main loop; never blocks. Any change
/// in the raw reading re-arms the stability window, and a reading is only
/// accepted once it has held for the full window *and* differs from the
/// current stable state — so a press held across many polls toggles the
/// flag exactly once.
pub struct DebouncedToggle {
    target: SharedFlag,
    delay: Duration,
    last_raw: Level,
    stable: Level,
    last_change: Option<Instant>,
}

impl DebouncedToggle {
    pub fn new(target: SharedFlag, delay: Duration) -> Self {
        // Pull-up wiring: both histories start at the released level.
        Self {
            target,
            delay,
            last_raw: Level::High,
            stable: Level::High,
            last_change: None,
        }
    }

    pub fn stable_state(&self) -> Level {
        self.stable
    }

    /// Feeds one raw reading. Returns true when a debounced edge was
    /// accepted this poll.
    pub fn poll(&mut self, reading: Level, now: Instant) -> bool {
        if reading != self.last_raw {
            self.last_change = Some(now);
        }

        let mut edge = false;
        let settled = self
            .last_change
            .map_or(true, |at| now.duration_since(at) >= self.delay);

        if settled && reading != self.stable {
            self.stable = reading;
            edge = true;

            if reading.is_pressed() {
                self.target.store(!self.target.load());
            }
        }

        self.last_raw = reading;
        edge
    }
}
