//! Drive tunables and their validating builder.

use crate::types::{ConfigError, Direction};

/// Maximum length of one tracking run in logical milliseconds (50 minutes).
pub const MAX_RUN_DURATION_MS: u32 = 3_000_000;

/// Microstep period at real-time speed, from the mount's gear train and the sidereal day.
pub const BASE_MICROSTEP_INTERVAL_US: u32 = 100_093;

/// High time of one step pulse.
pub const STEP_PULSE_WIDTH_US: u32 = 100;

/// Delay between control loop cycles.
pub const LOOP_PERIOD_MS: u32 = 10;

/// Multiplier used when the button is held at power-on.
pub const ACCELERATED_FACTOR: u32 = 60;

/// Remaining times at or beyond this (100 minutes) render as `00:00`.
pub const EXPIRED_THRESHOLD_MS: u32 = 6_000_000;

/// Display brightness applied at startup (0-7 on TM1637-class drivers).
pub const DEFAULT_BRIGHTNESS: u8 = 7;

/// Validated drive configuration.
///
/// `Default` yields the stock platform constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriveConfig {
    max_run_duration_ms: u32,
    base_microstep_interval_us: u32,
    pulse_width_us: u32,
    loop_period_ms: u32,
    accelerated_factor: u32,
    expired_threshold_ms: u32,
    debounce_polls: u8,
    direction: Direction,
    brightness: u8,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            max_run_duration_ms: MAX_RUN_DURATION_MS,
            base_microstep_interval_us: BASE_MICROSTEP_INTERVAL_US,
            pulse_width_us: STEP_PULSE_WIDTH_US,
            loop_period_ms: LOOP_PERIOD_MS,
            accelerated_factor: ACCELERATED_FACTOR,
            expired_threshold_ms: EXPIRED_THRESHOLD_MS,
            debounce_polls: 1,
            direction: Direction::Forward,
            brightness: DEFAULT_BRIGHTNESS,
        }
    }
}

impl DriveConfig {
    /// Creates a builder seeded with the defaults.
    pub fn builder() -> DriveConfigBuilder {
        DriveConfigBuilder::new()
    }

    /// Logical length of a run before automatic return to Idle.
    pub fn max_run_duration_ms(&self) -> u32 {
        self.max_run_duration_ms
    }

    /// Microstep period at 1x.
    pub fn base_microstep_interval_us(&self) -> u32 {
        self.base_microstep_interval_us
    }

    /// Step pulse high time.
    pub fn pulse_width_us(&self) -> u32 {
        self.pulse_width_us
    }

    /// Control loop cadence, also the implicit debounce window.
    pub fn loop_period_ms(&self) -> u32 {
        self.loop_period_ms
    }

    /// Multiplier selected by holding the button at boot.
    pub fn accelerated_factor(&self) -> u32 {
        self.accelerated_factor
    }

    /// Countdown values at or beyond this render as `00:00`.
    pub fn expired_threshold_ms(&self) -> u32 {
        self.expired_threshold_ms
    }

    /// Consecutive pressed polls needed to register a press.
    pub fn debounce_polls(&self) -> u8 {
        self.debounce_polls
    }

    /// Fixed rotation sense.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Display brightness applied at startup.
    pub fn brightness(&self) -> u8 {
        self.brightness
    }
}

/// Builder for [`DriveConfig`].
#[derive(Debug, Clone, Copy)]
pub struct DriveConfigBuilder {
    config: DriveConfig,
}

impl DriveConfigBuilder {
    /// Creates a builder seeded with the defaults.
    pub fn new() -> Self {
        Self {
            config: DriveConfig::default(),
        }
    }

    /// Sets the maximum run duration in logical milliseconds.
    pub fn max_run_duration_ms(mut self, millis: u32) -> Self {
        self.config.max_run_duration_ms = millis;
        self
    }

    /// Sets the 1x microstep interval.
    pub fn base_microstep_interval_us(mut self, micros: u32) -> Self {
        self.config.base_microstep_interval_us = micros;
        self
    }

    /// Sets the step pulse width.
    pub fn pulse_width_us(mut self, micros: u32) -> Self {
        self.config.pulse_width_us = micros;
        self
    }

    /// Sets the control loop period.
    pub fn loop_period_ms(mut self, millis: u32) -> Self {
        self.config.loop_period_ms = millis;
        self
    }

    /// Sets the boot-selectable acceleration factor.
    pub fn accelerated_factor(mut self, factor: u32) -> Self {
        self.config.accelerated_factor = factor;
        self
    }

    /// Sets the countdown expiry threshold.
    pub fn expired_threshold_ms(mut self, millis: u32) -> Self {
        self.config.expired_threshold_ms = millis;
        self
    }

    /// Sets how many consecutive pressed polls register a press.
    pub fn debounce_polls(mut self, polls: u8) -> Self {
        self.config.debounce_polls = polls;
        self
    }

    /// Sets the fixed rotation sense.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.config.direction = direction;
        self
    }

    /// Sets the startup display brightness.
    pub fn brightness(mut self, level: u8) -> Self {
        self.config.brightness = level;
        self
    }

    /// Validates and returns the configuration.
    ///
    /// # Errors
    /// * `ZeroRunDuration` - run duration is zero
    /// * `ZeroAcceleration` - accelerated factor is zero
    /// * `PulseTooLong` - pulse width does not fit the accelerated interval
    /// * `ZeroDebounce` - debounce polls is zero
    /// * `ThresholdOutOfRange` - expiry threshold is above `i32::MAX` ms
    /// * `RunExceedsDisplay` - a fresh run would already render as expired
    pub fn build(self) -> Result<DriveConfig, ConfigError> {
        let config = self.config;

        if config.max_run_duration_ms == 0 {
            return Err(ConfigError::ZeroRunDuration);
        }

        if config.accelerated_factor == 0 {
            return Err(ConfigError::ZeroAcceleration);
        }

        let fastest_interval = config.base_microstep_interval_us / config.accelerated_factor;
        if config.pulse_width_us >= fastest_interval {
            return Err(ConfigError::PulseTooLong);
        }

        if config.debounce_polls == 0 {
            return Err(ConfigError::ZeroDebounce);
        }

        // Deadlines are compared through an i32 difference; the run is bounded by the threshold
        if config.expired_threshold_ms > i32::MAX as u32 {
            return Err(ConfigError::ThresholdOutOfRange);
        }

        if config.max_run_duration_ms >= config.expired_threshold_ms {
            return Err(ConfigError::RunExceedsDisplay);
        }

        Ok(config)
    }
}

impl Default for DriveConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
