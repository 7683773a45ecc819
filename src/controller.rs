//! Button-driven control loop for the tracking platform.
//!
//! Provides [`DriveController`], which is polled once per main-loop cycle. Each poll
//! reads the button, decides the next [`DriveState`], applies that state's entry
//! effects exactly once when it changes, and keeps the countdown current while
//! running.

use crate::button::{Button, PressDetector};
use crate::config::DriveConfig;
use crate::display::{DisplayRenderer, Glyph, SegmentDisplay};
use crate::fmt::{debug, info};
use crate::pulse::SteppingFlag;
use crate::state::DriveState;
use crate::time::{Acceleration, LogicalInstant, MonotonicClock, TimeSource};
use embedded_hal::digital::{InputPin, OutputPin};

/// Drives the platform's state machine and everything the control loop owns.
///
/// # Type Parameters
/// * `'f` - Lifetime of the shared stepping flag
/// * `C` - Raw millisecond clock
/// * `D` - Seven-segment display driver
/// * `B` - Button input pin (pulled up, active-low)
/// * `E` - Motor driver enable output (active-low)
pub struct DriveController<'f, C, D, B, E>
where
    C: MonotonicClock,
    D: SegmentDisplay,
    B: InputPin,
    E: OutputPin,
{
    time: TimeSource<C>,
    display: DisplayRenderer<D>,
    button: Button<B>,
    enable: E,
    flag: &'f SteppingFlag,
    detector: PressDetector,
    config: DriveConfig,
    state: DriveState,
    deadline: Option<LogicalInstant>,
    energized: bool,
}

impl<'f, C, D, B, E> DriveController<'f, C, D, B, E>
where
    C: MonotonicClock,
    D: SegmentDisplay,
    B: InputPin,
    E: OutputPin,
{
    /// Creates a controller in `Init` with the motor released and stepping disabled.
    ///
    /// Applies the configured brightness to the display but writes no pattern; the
    /// first [`poll`](Self::poll) moves to `Idle` and shows its glyph.
    pub fn new(
        clock: C,
        display: D,
        button: B,
        enable: E,
        flag: &'f SteppingFlag,
        config: DriveConfig,
        acceleration: Acceleration,
    ) -> Self {
        flag.disable();

        let mut controller = Self {
            time: TimeSource::new(clock, acceleration),
            display: DisplayRenderer::new(
                display,
                config.brightness(),
                config.expired_threshold_ms(),
            ),
            button: Button::new(button),
            enable,
            flag,
            detector: PressDetector::new(config.debounce_polls()),
            config,
            state: DriveState::Init,
            deadline: None,
            energized: true,
        };
        controller.set_energized(false);
        controller
    }

    /// Runs one control cycle, reading the button itself.
    ///
    /// Call every [`DriveConfig::loop_period_ms`] milliseconds.
    pub fn poll(&mut self) -> DriveState {
        let pressed = self.button.is_pressed();
        self.cycle(pressed)
    }

    /// Runs one control cycle with an externally sampled button level.
    ///
    /// `pressed` is the logical level (true while held down), not the pin level.
    pub fn cycle(&mut self, pressed: bool) -> DriveState {
        let press = self.detector.update(pressed);
        let now = self.time.now();
        let expired = self.deadline.is_some_and(|deadline| now.has_reached(deadline));

        let next = self.state.next(press, expired);
        if next != self.state {
            if expired && !press {
                info!("run deadline reached at {=u32}ms", now.as_millis());
            }
            info!("{} -> {}", self.state, next);
            self.enter(next, now);
        } else if self.state == DriveState::Run {
            if let Some(remaining) = self.remaining_at(now) {
                self.display.show_countdown(remaining);
            }
        }

        self.state
    }

    fn enter(&mut self, next: DriveState, now: LogicalInstant) {
        match next {
            DriveState::Init => {}
            DriveState::Idle => {
                self.flag.disable();
                self.set_energized(false);
                self.deadline = None;
                self.display.show_glyph(Glyph::Idle);
            }
            DriveState::Hold => {
                self.flag.disable();
                self.set_energized(true);
                self.deadline = None;
                self.display.show_glyph(Glyph::Hold);
            }
            DriveState::Run => {
                let run_ms = self.config.max_run_duration_ms();
                let deadline = now.wrapping_add(run_ms);
                debug!("deadline {=u32}ms", deadline.as_millis());

                self.deadline = Some(deadline);
                self.display.show_countdown(run_ms as i32);
                self.set_energized(true);
                self.flag.enable();
            }
        }
        self.state = next;
    }

    fn set_energized(&mut self, on: bool) {
        if on == self.energized {
            return;
        }
        let _ = if on {
            self.enable.set_low()
        } else {
            self.enable.set_high()
        };
        self.energized = on;
    }

    fn remaining_at(&self, now: LogicalInstant) -> Option<i32> {
        self.deadline.map(|deadline| now.millis_until(deadline))
    }

    /// Returns the current state.
    pub fn state(&self) -> DriveState {
        self.state
    }

    /// Returns true while the shared flag allows step pulses.
    pub fn is_stepping(&self) -> bool {
        self.flag.is_enabled()
    }

    /// Returns true while the motor driver is enabled.
    pub fn motor_energized(&self) -> bool {
        self.energized
    }

    /// Logical milliseconds left in the current run, if running.
    pub fn remaining_ms(&self) -> Option<i32> {
        self.remaining_at(self.time.now())
    }

    /// The run deadline, if running.
    pub fn deadline(&self) -> Option<LogicalInstant> {
        self.deadline
    }

    /// Current logical time.
    pub fn now(&self) -> LogicalInstant {
        self.time.now()
    }

    /// The acceleration factor fixed at boot.
    pub fn acceleration(&self) -> Acceleration {
        self.time.acceleration()
    }

    /// The active configuration.
    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    /// The display renderer.
    pub fn display(&self) -> &DisplayRenderer<D> {
        &self.display
    }

    /// Stops stepping, releases the motor and gives back the hardware.
    pub fn release(mut self) -> (C, D, B, E) {
        self.flag.disable();
        self.set_energized(false);
        (
            self.time.release(),
            self.display.release(),
            self.button.release(),
            self.enable,
        )
    }
}
