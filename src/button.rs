//! Edge-based press detection for the single control button.

use embedded_hal::digital::InputPin;

/// Turns raw per-cycle readings into press-edge events.
///
/// A press is reported once the reading has been pressed for `debounce_polls`
/// consecutive polls after having been released. With one poll this is a plain
/// released-to-pressed edge and the loop cadence is the only debounce. The detector
/// starts latched, so a button already held at power-on must be released before
/// it can register a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressDetector {
    debounce_polls: u8,
    streak: u8,
    latched: bool,
}

impl PressDetector {
    /// Creates a detector. A `debounce_polls` of zero is treated as one.
    pub fn new(debounce_polls: u8) -> Self {
        Self {
            debounce_polls: debounce_polls.max(1),
            streak: 0,
            latched: true,
        }
    }

    /// Feeds one reading; returns true on the cycle a press is recognized.
    pub fn update(&mut self, pressed: bool) -> bool {
        if !pressed {
            self.streak = 0;
            self.latched = false;
            return false;
        }

        self.streak = self.streak.saturating_add(1);
        if !self.latched && self.streak >= self.debounce_polls {
            self.latched = true;
            return true;
        }
        false
    }
}

/// A pulled-up, active-low momentary button.
pub struct Button<P: InputPin> {
    pin: P,
}

impl<P: InputPin> Button<P> {
    /// Wraps the input pin.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Returns true while the button is held down. Read errors count as released.
    pub fn is_pressed(&mut self) -> bool {
        self.pin.is_low().unwrap_or(false)
    }

    /// Gives back the input pin.
    pub fn release(self) -> P {
        self.pin
    }
}
