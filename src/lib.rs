#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`DriveController`**: Polled by the main loop; owns the button, display and motor enable line
//! - **`DriveState`**: `Init`, `Idle`, `Hold` or `Run`, with a pure transition rule
//! - **`StepPulseGenerator`**: Called from a periodic timer interrupt; emits step pulses while enabled
//! - **`SteppingFlag`**: The only state shared between the control loop and the interrupt
//! - **`TimeSource`**: Raw milliseconds scaled by the boot-time `Acceleration`
//! - **`DisplayRenderer`**: Glyphs and `MM:SS` countdowns with redundant-write suppression
//! - **`SegmentDisplay`** / **`MonotonicClock`**: Traits to implement for your hardware
//! - **`DriveConfig`**: Tunables with a validating builder
//!
//! Pins and delays use the `embedded-hal` 1.0 traits.

mod fmt;

pub mod button;
pub mod config;
pub mod controller;
pub mod display;
pub mod pulse;
pub mod state;
pub mod time;
pub mod types;

pub use button::{Button, PressDetector};
pub use config::{DriveConfig, DriveConfigBuilder};
pub use controller::DriveController;
pub use display::{
    DisplayRenderer, Glyph, SEG_SEPARATOR, SegmentDisplay, SegmentPattern, countdown_pattern,
    encode_digit,
};
pub use pulse::{StepPulseGenerator, SteppingFlag};
pub use state::DriveState;
pub use time::{Acceleration, LogicalInstant, MonotonicClock, TimeSource};
pub use types::{ConfigError, Direction};
