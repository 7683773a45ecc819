//! Hardware timer wrapper for the sidereal-drive clock trait.

use sidereal_drive::MonotonicClock;

/// Millisecond clock backed by the RP2040's 64-bit microsecond timer.
///
/// Truncated to `u32` milliseconds, so it wraps after ~49.7 days like the
/// rest of the drive's logical time.
pub struct HardwareClock {
    timer: rp_pico::hal::Timer,
}

impl HardwareClock {
    /// Create a new hardware clock wrapper
    pub fn new(timer: rp_pico::hal::Timer) -> Self {
        Self { timer }
    }
}

impl MonotonicClock for HardwareClock {
    fn millis(&self) -> u32 {
        (self.timer.get_counter().ticks() / 1_000) as u32
    }
}
