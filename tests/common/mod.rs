//! Shared test infrastructure for sidereal-drive integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;
use core::convert::Infallible;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use sidereal_drive::{
    Acceleration, DriveConfig, DriveController, MonotonicClock, SegmentDisplay, SegmentPattern,
    SteppingFlag,
};

// ============================================================================
// Mock Clock
// ============================================================================

/// Mock raw millisecond clock with controllable time advancement
pub struct MockClock {
    millis: Cell<u32>,
}

impl MockClock {
    pub fn new() -> Self {
        Self {
            millis: Cell::new(0),
        }
    }

    /// Advance raw time by the given milliseconds
    pub fn advance(&self, millis: u32) {
        self.millis.set(self.millis.get().wrapping_add(millis));
    }

    pub fn set(&self, millis: u32) {
        self.millis.set(millis);
    }

    pub fn get(&self) -> u32 {
        self.millis.get()
    }
}

impl MonotonicClock for MockClock {
    fn millis(&self) -> u32 {
        self.millis.get()
    }
}

// ============================================================================
// Mock Display
// ============================================================================

/// Mock display that records brightness and every pattern written
pub struct MockDisplay {
    brightness: Option<u8>,
    history: heapless::Vec<SegmentPattern, 256>,
    last: Option<SegmentPattern>,
    writes: u32,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self {
            brightness: None,
            history: heapless::Vec::new(),
            last: None,
            writes: 0,
        }
    }

    pub fn brightness(&self) -> Option<u8> {
        self.brightness
    }

    /// The first 256 patterns written
    pub fn history(&self) -> &[SegmentPattern] {
        &self.history
    }

    pub fn last(&self) -> Option<SegmentPattern> {
        self.last
    }

    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl SegmentDisplay for MockDisplay {
    fn set_brightness(&mut self, level: u8) {
        self.brightness = Some(level);
    }

    fn write_segments(&mut self, segments: &[u8; 4]) {
        let _ = self.history.push(*segments);
        self.last = Some(*segments);
        self.writes += 1;
    }
}

// ============================================================================
// Mock Pins
// ============================================================================

/// Output pin that tracks its level and counts rising edges
pub struct MockOutput {
    high: Cell<bool>,
    rises: Cell<u32>,
    writes: Cell<u32>,
}

impl MockOutput {
    pub fn new(high: bool) -> Self {
        Self {
            high: Cell::new(high),
            rises: Cell::new(0),
            writes: Cell::new(0),
        }
    }

    pub fn is_high(&self) -> bool {
        self.high.get()
    }

    pub fn rises(&self) -> u32 {
        self.rises.get()
    }

    pub fn writes(&self) -> u32 {
        self.writes.get()
    }
}

impl ErrorType for &MockOutput {
    type Error = Infallible;
}

impl OutputPin for &MockOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high.set(false);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.high.get() {
            self.rises.set(self.rises.get() + 1);
        }
        self.high.set(true);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// Pulled-up, active-low button: the pin reads low while pressed
pub struct MockButton {
    pressed: Cell<bool>,
}

impl MockButton {
    pub fn new() -> Self {
        Self {
            pressed: Cell::new(false),
        }
    }

    pub fn press(&self) {
        self.pressed.set(true);
    }

    pub fn release(&self) {
        self.pressed.set(false);
    }
}

impl ErrorType for &MockButton {
    type Error = Infallible;
}

impl InputPin for &MockButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.pressed.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pressed.get())
    }
}

// ============================================================================
// Mock Delay
// ============================================================================

/// Delay that only accumulates the requested time
pub struct MockDelay {
    total_ns: Cell<u64>,
    calls: Cell<u32>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self {
            total_ns: Cell::new(0),
            calls: Cell::new(0),
        }
    }

    pub fn total_us(&self) -> u64 {
        self.total_ns.get() / 1_000
    }

    pub fn calls(&self) -> u32 {
        self.calls.get()
    }
}

impl DelayNs for &MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns.set(self.total_ns.get() + ns as u64);
        self.calls.set(self.calls.get() + 1);
    }
}

// ============================================================================
// Test Rig
// ============================================================================

pub type TestController<'a> =
    DriveController<'a, &'a MockClock, MockDisplay, &'a MockButton, &'a MockOutput>;

/// Hardware doubles for one controller
pub struct Rig {
    pub clock: MockClock,
    pub button: MockButton,
    pub enable: MockOutput,
    pub flag: SteppingFlag,
}

impl Rig {
    pub fn new() -> Self {
        Self {
            clock: MockClock::new(),
            button: MockButton::new(),
            // Driver enable idles high (released) through the pull-up
            enable: MockOutput::new(true),
            flag: SteppingFlag::new(),
        }
    }

    pub fn controller(&self, acceleration: Acceleration) -> TestController<'_> {
        self.controller_with(DriveConfig::default(), acceleration)
    }

    pub fn controller_with(
        &self,
        config: DriveConfig,
        acceleration: Acceleration,
    ) -> TestController<'_> {
        DriveController::new(
            &self.clock,
            MockDisplay::new(),
            &self.button,
            &self.enable,
            &self.flag,
            config,
            acceleration,
        )
    }

    /// Press, poll, release, poll: one press-edge over two cycles
    pub fn click(&self, controller: &mut TestController<'_>, cycle_ms: u32) {
        self.button.press();
        controller.poll();
        self.clock.advance(cycle_ms);
        self.button.release();
        controller.poll();
        self.clock.advance(cycle_ms);
    }

    /// Motor driver enable is active-low
    pub fn motor_energized(&self) -> bool {
        !self.enable.is_high()
    }
}

/// Decodes a pattern back into four decimal digits and the colon bit
pub fn decode(pattern: SegmentPattern) -> Option<([u8; 4], bool)> {
    let mut digits = [0u8; 4];
    for (slot, segments) in digits.iter_mut().zip(pattern) {
        let bare = segments & !sidereal_drive::SEG_SEPARATOR;
        *slot = (0..10).find(|&d| sidereal_drive::encode_digit(d) == bare)?;
    }
    Some((digits, pattern[1] & sidereal_drive::SEG_SEPARATOR != 0))
}
