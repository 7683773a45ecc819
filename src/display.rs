//! Four-digit seven-segment rendering with change suppression.
//!
//! Provides [`DisplayRenderer`], which turns state glyphs and countdowns into
//! segment patterns and only forwards a pattern to the hardware when it differs
//! from the last one written. Also defines the [`SegmentDisplay`] trait for the
//! display driver.
//!
//! Segment bytes use the common `.gfedcba` layout: bit 0 is segment `a`, bit 6 is
//! segment `g`, bit 7 is the decimal point (the colon on clock-style modules).

/// Trait for abstracting a 4-digit seven-segment display driver.
///
/// Implement this for your display hardware (TM1637, MAX7219, shift registers, ...).
/// Handle any bus errors internally - these methods cannot fail.
pub trait SegmentDisplay {
    /// Sets the display brightness. Called once when the renderer is created.
    fn set_brightness(&mut self, level: u8);

    /// Writes four already-encoded digits, leftmost first.
    fn write_segments(&mut self, segments: &[u8; 4]);
}

/// Four encoded digit positions, leftmost first.
pub type SegmentPattern = [u8; 4];

/// Separator bit; lit on digit position 1 it forms the `MM:SS` colon.
pub const SEG_SEPARATOR: u8 = 0b1000_0000;

const DIGITS: [u8; 10] = [
    0b0011_1111, // 0
    0b0000_0110, // 1
    0b0101_1011, // 2
    0b0100_1111, // 3
    0b0110_0110, // 4
    0b0110_1101, // 5
    0b0111_1101, // 6
    0b0000_0111, // 7
    0b0111_1111, // 8
    0b0110_1111, // 9
];

/// Encodes a decimal digit; only the last decimal place of `digit` is used.
#[inline]
pub const fn encode_digit(digit: u8) -> u8 {
    DIGITS[(digit % 10) as usize]
}

/// `IdLE`
pub const IDLE_PATTERN: SegmentPattern = [0b0011_0000, 0b0101_1110, 0b0011_1000, 0b0111_1001];

/// `HoLd`
pub const HOLD_PATTERN: SegmentPattern = [0b0111_0110, 0b0101_1100, 0b0011_1000, 0b0101_1110];

/// `00:00`
pub const EXPIRED_PATTERN: SegmentPattern = [
    DIGITS[0],
    DIGITS[0] | SEG_SEPARATOR,
    DIGITS[0],
    DIGITS[0],
];

/// Fixed state indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Glyph {
    /// Shown while idle, motor off.
    Idle,
    /// Shown while holding position, motor energized.
    Hold,
}

impl Glyph {
    /// Returns the segment pattern for this glyph.
    pub const fn pattern(&self) -> SegmentPattern {
        match self {
            Glyph::Idle => IDLE_PATTERN,
            Glyph::Hold => HOLD_PATTERN,
        }
    }
}

/// Computes the `MM:SS` pattern for a remaining duration.
///
/// The duration is rounded up to the next whole second. Negative values, and values
/// whose magnitude reaches `expired_threshold_ms`, render as `00:00`. Minutes are shown
/// modulo 100. The separator is always lit.
pub fn countdown_pattern(remaining_ms: i32, expired_threshold_ms: u32) -> SegmentPattern {
    if remaining_ms < 0 || remaining_ms.unsigned_abs() >= expired_threshold_ms {
        return EXPIRED_PATTERN;
    }

    let seconds = (remaining_ms as u32).div_ceil(1000);
    let minutes = seconds / 60;
    let seconds = seconds % 60;

    [
        encode_digit(((minutes / 10) % 10) as u8),
        encode_digit((minutes % 10) as u8) | SEG_SEPARATOR,
        encode_digit((seconds / 10) as u8),
        encode_digit((seconds % 10) as u8),
    ]
}

/// Owns a display and suppresses redundant writes.
pub struct DisplayRenderer<D: SegmentDisplay> {
    display: D,
    last: Option<SegmentPattern>,
    expired_threshold_ms: u32,
    writes: u32,
}

impl<D: SegmentDisplay> DisplayRenderer<D> {
    /// Creates a renderer, applying `brightness` to the display.
    ///
    /// Nothing has been written yet, so the first [`render`](Self::render) always
    /// reaches the hardware.
    pub fn new(mut display: D, brightness: u8, expired_threshold_ms: u32) -> Self {
        display.set_brightness(brightness);

        Self {
            display,
            last: None,
            expired_threshold_ms,
            writes: 0,
        }
    }

    /// Writes `pattern` unless it is already on the display.
    ///
    /// Returns true if the hardware was written.
    pub fn render(&mut self, pattern: SegmentPattern) -> bool {
        if self.last == Some(pattern) {
            return false;
        }

        self.display.write_segments(&pattern);
        self.last = Some(pattern);
        self.writes = self.writes.wrapping_add(1);
        true
    }

    /// Shows a state glyph.
    pub fn show_glyph(&mut self, glyph: Glyph) -> bool {
        self.render(glyph.pattern())
    }

    /// Shows the remaining run time as `MM:SS`.
    pub fn show_countdown(&mut self, remaining_ms: i32) -> bool {
        self.render(countdown_pattern(remaining_ms, self.expired_threshold_ms))
    }

    /// Returns the last pattern written, if any.
    pub fn last_pattern(&self) -> Option<SegmentPattern> {
        self.last
    }

    /// Number of physical writes issued so far.
    pub fn writes(&self) -> u32 {
        self.writes
    }

    /// Returns the display driver.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Gives back the display driver.
    pub fn release(self) -> D {
        self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: u32 = 6_000_000;

    fn digits(pattern: SegmentPattern) -> [u8; 4] {
        let mut out = [0; 4];
        for (slot, segments) in out.iter_mut().zip(pattern) {
            *slot = DIGITS
                .iter()
                .position(|&d| d == segments & !SEG_SEPARATOR)
                .unwrap() as u8;
        }
        out
    }

    #[test]
    fn full_run_shows_fifty_minutes() {
        let pattern = countdown_pattern(3_000_000, THRESHOLD);
        assert_eq!(digits(pattern), [5, 0, 0, 0]);
        assert_ne!(pattern[1] & SEG_SEPARATOR, 0);
    }

    #[test]
    fn partial_seconds_round_up() {
        assert_eq!(digits(countdown_pattern(59_001, THRESHOLD)), [0, 1, 0, 0]);
        assert_eq!(digits(countdown_pattern(59_000, THRESHOLD)), [0, 0, 5, 9]);
        assert_eq!(digits(countdown_pattern(1, THRESHOLD)), [0, 0, 0, 1]);
        assert_eq!(digits(countdown_pattern(0, THRESHOLD)), [0, 0, 0, 0]);
    }

    #[test]
    fn expired_and_negative_render_zero() {
        assert_eq!(countdown_pattern(-1, THRESHOLD), EXPIRED_PATTERN);
        assert_eq!(countdown_pattern(i32::MIN, THRESHOLD), EXPIRED_PATTERN);
        assert_eq!(countdown_pattern(6_000_000, THRESHOLD), EXPIRED_PATTERN);
        assert_eq!(countdown_pattern(i32::MAX, THRESHOLD), EXPIRED_PATTERN);
    }

    #[test]
    fn ninety_nine_minutes_fit() {
        assert_eq!(digits(countdown_pattern(5_999_000, THRESHOLD)), [9, 9, 5, 9]);
    }

    #[test]
    fn glyphs_are_distinct_and_colon_free() {
        assert_ne!(Glyph::Idle.pattern(), Glyph::Hold.pattern());
        for glyph in [Glyph::Idle, Glyph::Hold] {
            assert!(glyph.pattern().iter().all(|s| s & SEG_SEPARATOR == 0));
        }
    }

    #[test]
    fn encode_digit_uses_last_decimal_place() {
        assert_eq!(encode_digit(7), DIGITS[7]);
        assert_eq!(encode_digit(12), DIGITS[2]);
    }
}
