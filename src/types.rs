//! Core types shared across the drive components.

/// Rotation sense of the tracking mechanism.
///
/// Chosen once when the pulse generator is built; the drive never reverses at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Direction output driven high.
    #[default]
    Forward,

    /// Direction output driven low, for mirrored mounts.
    Reverse,
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Maximum run duration is zero.
    ZeroRunDuration,

    /// Accelerated factor is zero.
    ZeroAcceleration,

    /// Step pulse does not fit inside the accelerated microstep interval.
    PulseTooLong,

    /// Debounce requires at least one poll.
    ZeroDebounce,

    /// Maximum run duration would render as an expired countdown.
    RunExceedsDisplay,

    /// Expiry threshold does not fit a signed wrapping millisecond difference.
    ThresholdOutOfRange,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroRunDuration => {
                write!(f, "maximum run duration must be non-zero")
            }
            ConfigError::ZeroAcceleration => {
                write!(f, "accelerated factor must be non-zero")
            }
            ConfigError::PulseTooLong => {
                write!(
                    f,
                    "step pulse width must be shorter than the accelerated microstep interval"
                )
            }
            ConfigError::ZeroDebounce => {
                write!(f, "debounce must span at least one poll")
            }
            ConfigError::RunExceedsDisplay => {
                write!(
                    f,
                    "maximum run duration must be below the countdown expiry threshold"
                )
            }
            ConfigError::ThresholdOutOfRange => {
                write!(f, "countdown expiry threshold must not exceed i32::MAX ms")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
