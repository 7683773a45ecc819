//! Logical time: a raw millisecond clock scaled by the boot-time acceleration factor.
//!
//! All arithmetic wraps on `u32`. At 1x the raw clock rolls over after roughly
//! 49.7 days (proportionally sooner when accelerated); behavior across that rollover
//! is not handled.

use crate::config::DriveConfig;
use embedded_hal::digital::InputPin;

/// Trait for abstracting the platform's monotonic millisecond counter.
pub trait MonotonicClock {
    /// Milliseconds since power-on.
    fn millis(&self) -> u32;
}

impl<T: MonotonicClock + ?Sized> MonotonicClock for &T {
    fn millis(&self) -> u32 {
        (**self).millis()
    }
}

/// A point in logical (accelerated) time, in milliseconds.
///
/// The counter wraps, so instants have no total order. Compare them with
/// [`LogicalInstant::millis_until`] or [`LogicalInstant::has_reached`], which
/// are valid while the two instants lie within `i32::MAX` ms of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LogicalInstant(pub u32);

impl LogicalInstant {
    /// Returns the instant as logical milliseconds.
    #[inline]
    pub fn as_millis(&self) -> u32 {
        self.0
    }

    /// Adds a logical duration, wrapping on overflow.
    #[inline]
    pub fn wrapping_add(self, millis: u32) -> Self {
        LogicalInstant(self.0.wrapping_add(millis))
    }

    /// Signed distance from `self` to `later`.
    ///
    /// Negative once `later` lies in the past.
    #[inline]
    pub fn millis_until(&self, later: Self) -> i32 {
        later.0.wrapping_sub(self.0) as i32
    }

    /// Returns true once `self` has reached or passed `deadline`.
    #[inline]
    pub fn has_reached(&self, deadline: Self) -> bool {
        self.millis_until(deadline) <= 0
    }
}

/// Time acceleration multiplier, fixed at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Acceleration(u32);

impl Acceleration {
    /// Real-time operation.
    pub const NORMAL: Acceleration = Acceleration(1);

    /// Creates a multiplier, returning `None` for zero.
    pub const fn new(factor: u32) -> Option<Self> {
        if factor == 0 { None } else { Some(Acceleration(factor)) }
    }

    /// Samples the boot button once: held down selects the accelerated factor.
    ///
    /// The button is wired active-low, so a low level means pressed. A read error
    /// counts as released.
    pub fn from_boot_button<B: InputPin>(button: &mut B, config: &DriveConfig) -> Self {
        let pressed = button.is_low().unwrap_or(false);
        if pressed {
            Acceleration(config.accelerated_factor())
        } else {
            Self::NORMAL
        }
    }

    /// Returns the multiplier.
    #[inline]
    pub fn factor(&self) -> u32 {
        self.0
    }

    /// Returns true for any factor above 1.
    #[inline]
    pub fn is_accelerated(&self) -> bool {
        self.0 > 1
    }

    /// Converts a logical duration to the wall-clock time it takes to elapse.
    #[inline]
    pub fn raw_duration_ms(&self, logical_ms: u32) -> u32 {
        logical_ms / self.0
    }
}

impl Default for Acceleration {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Produces logical time from a raw clock and the acceleration factor.
pub struct TimeSource<C: MonotonicClock> {
    clock: C,
    acceleration: Acceleration,
}

impl<C: MonotonicClock> TimeSource<C> {
    /// Creates a time source over `clock`.
    pub fn new(clock: C, acceleration: Acceleration) -> Self {
        Self {
            clock,
            acceleration,
        }
    }

    /// Returns the current logical time.
    #[inline]
    pub fn now(&self) -> LogicalInstant {
        LogicalInstant(self.clock.millis().wrapping_mul(self.acceleration.0))
    }

    /// Returns the acceleration factor this source was built with.
    pub fn acceleration(&self) -> Acceleration {
        self.acceleration
    }

    /// Returns the underlying clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Gives back the underlying clock.
    pub fn release(self) -> C {
        self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct StubClock(Cell<u32>);

    impl MonotonicClock for StubClock {
        fn millis(&self) -> u32 {
            self.0.get()
        }
    }

    #[test]
    fn now_scales_raw_clock() {
        let source = TimeSource::new(StubClock(Cell::new(1_500)), Acceleration::new(60).unwrap());
        assert_eq!(source.now(), LogicalInstant(90_000));

        source.clock().0.set(1_501);
        assert_eq!(source.now(), LogicalInstant(90_060));
    }

    #[test]
    fn normal_speed_is_identity() {
        let source = TimeSource::new(StubClock(Cell::new(42)), Acceleration::NORMAL);
        assert_eq!(source.now().as_millis(), 42);
        assert!(!source.acceleration().is_accelerated());
    }

    #[test]
    fn zero_factor_is_rejected() {
        assert!(Acceleration::new(0).is_none());
        assert_eq!(Acceleration::new(3).map(|a| a.factor()), Some(3));
    }

    #[test]
    fn millis_until_goes_negative_after_deadline() {
        let deadline = LogicalInstant(10_000);
        assert_eq!(LogicalInstant(9_000).millis_until(deadline), 1_000);
        assert_eq!(LogicalInstant(10_250).millis_until(deadline), -250);
        assert!(!LogicalInstant(9_999).has_reached(deadline));
        assert!(LogicalInstant(10_000).has_reached(deadline));
    }

    #[test]
    fn deadline_across_wrap() {
        let start = LogicalInstant(u32::MAX - 100);
        let deadline = start.wrapping_add(1_000);
        assert_eq!(deadline, LogicalInstant(899));
        assert_eq!(start.millis_until(deadline), 1_000);
        assert!(!start.has_reached(deadline));
    }

    #[test]
    fn wrapped_deadline_is_not_reached_early() {
        let now = LogicalInstant(u32::MAX - 10);
        let deadline = now.wrapping_add(3_000_000);
        assert!(deadline.as_millis() < now.as_millis());
        assert!(!now.has_reached(deadline));
        assert!(deadline.has_reached(now));
        assert_eq!(deadline.millis_until(now), -3_000_000);
    }

    #[test]
    fn raw_duration_divides_by_factor() {
        let accel = Acceleration::new(60).unwrap();
        assert_eq!(accel.raw_duration_ms(3_000_000), 50_000);
        assert_eq!(Acceleration::NORMAL.raw_duration_ms(3_000_000), 3_000_000);
    }
}
