//! Fixed-rate step pulse generation.
//!
//! [`StepPulseGenerator::fire`] is meant to be called from a periodic timer interrupt
//! every [`interval_us`](StepPulseGenerator::interval_us) microseconds. The only state
//! it shares with the control loop is the [`SteppingFlag`].

use crate::config::DriveConfig;
use crate::time::Acceleration;
use crate::types::Direction;
use core::sync::atomic::{AtomicBool, Ordering};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Single-writer, single-reader enable signal between the control loop and the
/// step interrupt.
///
/// Uses plain atomic loads and stores only, so it works on cores without
/// compare-and-swap (thumbv6m).
#[derive(Debug, Default)]
pub struct SteppingFlag(AtomicBool);

impl SteppingFlag {
    /// Creates a cleared flag. Usable in a `static`.
    pub const fn new() -> Self {
        SteppingFlag(AtomicBool::new(false))
    }

    /// Allows step pulses to be emitted.
    #[inline]
    pub fn enable(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Stops step pulses from the next firing on.
    #[inline]
    pub fn disable(&self) {
        self.0.store(false, Ordering::Release);
    }

    /// Returns true while stepping is allowed.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Emits one step pulse per firing while the shared flag is set.
///
/// # Type Parameters
/// * `'f` - Lifetime of the shared flag (normally `'static`)
/// * `S` - Step output pin
/// * `R` - Direction output pin
/// * `D` - Delay used for the pulse high time
pub struct StepPulseGenerator<'f, S: OutputPin, R: OutputPin, D: DelayNs> {
    step: S,
    dir: R,
    delay: D,
    flag: &'f SteppingFlag,
    interval_us: u32,
    pulse_width_us: u32,
    pulses: u32,
}

impl<'f, S: OutputPin, R: OutputPin, D: DelayNs> StepPulseGenerator<'f, S, R, D> {
    /// Creates a generator, drives the step line low and latches the direction output.
    ///
    /// The firing interval is the configured 1x microstep interval divided by the
    /// acceleration factor.
    pub fn new(
        mut step: S,
        mut dir: R,
        delay: D,
        flag: &'f SteppingFlag,
        config: &DriveConfig,
        acceleration: Acceleration,
    ) -> Self {
        let _ = step.set_low();
        let _ = match config.direction() {
            Direction::Forward => dir.set_high(),
            Direction::Reverse => dir.set_low(),
        };

        Self {
            step,
            dir,
            delay,
            flag,
            interval_us: config.base_microstep_interval_us() / acceleration.factor(),
            pulse_width_us: config.pulse_width_us(),
            pulses: 0,
        }
    }

    /// Timer callback body: one pulse if stepping is enabled, otherwise nothing.
    ///
    /// Returns true if a pulse was emitted.
    pub fn fire(&mut self) -> bool {
        if !self.flag.is_enabled() {
            return false;
        }

        let _ = self.step.set_high();
        self.delay.delay_us(self.pulse_width_us);
        let _ = self.step.set_low();

        self.pulses = self.pulses.wrapping_add(1);
        true
    }

    /// Period between firings in microseconds.
    #[inline]
    pub fn interval_us(&self) -> u32 {
        self.interval_us
    }

    /// Step pulse high time in microseconds.
    #[inline]
    pub fn pulse_width_us(&self) -> u32 {
        self.pulse_width_us
    }

    /// Pulses emitted since construction (wrapping).
    pub fn pulses_emitted(&self) -> u32 {
        self.pulses
    }

    /// Gives back the pins and delay.
    pub fn release(self) -> (S, R, D) {
        (self.step, self.dir, self.delay)
    }
}
