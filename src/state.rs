//! Drive state and the pure transition rule.
//!
//! Effects of entering a state live in the controller; this module only decides
//! what the next state is.

/// The current state of the drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveState {
    /// Power-on. Left unconditionally on the first cycle.
    Init,
    /// Motor off, not stepping.
    Idle,
    /// Motor energized and holding, not stepping.
    Hold,
    /// Motor energized and tracking; countdown running.
    Run,
}

impl DriveState {
    /// Returns the state for the next cycle.
    ///
    /// `pressed` is a press-edge seen this cycle. `expired` is whether the run deadline
    /// has been reached; it only matters in `Run`.
    pub fn next(self, pressed: bool, expired: bool) -> Self {
        use DriveState::*;

        match self {
            Init => Idle,
            Idle if pressed => Hold,
            Hold if pressed => Run,
            Run if pressed || expired => Idle,
            steady => steady,
        }
    }

    /// Whether the driver should be enabled.
    pub fn motor_energized(&self) -> bool {
        matches!(self, DriveState::Hold | DriveState::Run)
    }

    /// Whether step pulses should be emitted.
    pub fn stepping(&self) -> bool {
        matches!(self, DriveState::Run)
    }
}
