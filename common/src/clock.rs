//! Clock hand angles and digital clock readout.
//!
//! Hand rotations are measured clockwise from 12 o'clock, the same convention
//! the needle renderer uses. Each hand is resolved through its own
//! [`RotationState`] with a forward hint, so at midnight the hour hand keeps
//! turning clockwise instead of sweeping back across the dial.

use core::fmt::Write;

use heapless::String;

use crate::rotation::RotationState;

pub const SECONDS_PER_DAY: u32 = 86_400;

/// Longest readout: `hh:MM:SS PM`.
pub const DIGITAL_LEN: usize = 11;

pub type DigitalReadout = String<DIGITAL_LEN>;

// =============================================================================
// Time of Day
// =============================================================================

/// Wall-clock time of day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl ClockTime {
    /// Build from seconds since midnight. Values past one day wrap.
    pub const fn from_seconds_of_day(seconds: u32) -> Self {
        let s = seconds % SECONDS_PER_DAY;
        Self {
            hour: (s / 3600) as u8,
            minute: (s / 60 % 60) as u8,
            second: (s % 60) as u8,
        }
    }

    /// Build from a Unix timestamp shifted by a UTC offset in minutes.
    pub const fn from_unix(
        unix_seconds: i64,
        utc_offset_minutes: i32,
    ) -> Self {
        let local = unix_seconds + utc_offset_minutes as i64 * 60;
        Self::from_seconds_of_day(local.rem_euclid(SECONDS_PER_DAY as i64) as u32)
    }

    /// Seconds since midnight.
    #[inline]
    pub const fn seconds_of_day(&self) -> u32 { self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32 }

    /// Second hand target, degrees clockwise from 12.
    #[inline]
    pub fn second_angle(&self) -> f32 { self.second as f32 * 6.0 }

    /// Minute hand target, creeping with the seconds.
    #[inline]
    pub fn minute_angle(&self) -> f32 { self.minute as f32 * 6.0 + self.second as f32 * 0.1 }

    /// Hour hand target, creeping with the minutes.
    #[inline]
    pub fn hour_angle(&self) -> f32 { (self.hour % 12) as f32 * 30.0 + self.minute as f32 * 0.5 }
}

// =============================================================================
// Analog Clock
// =============================================================================

/// Absolute hand rotations handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandAngles {
    pub hour: f32,
    pub minute: f32,
    pub second: f32,
}

/// Rotation memory for the three hands of an analog clock.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnalogClock {
    hour: RotationState,
    minute: RotationState,
    second: RotationState,
}

impl AnalogClock {
    pub const fn new() -> Self {
        Self {
            hour: RotationState::new(),
            minute: RotationState::new(),
            second: RotationState::new(),
        }
    }

    /// Resolve all three hands for `time`. Hands only move clockwise.
    pub fn update(
        &mut self,
        time: ClockTime,
    ) -> HandAngles {
        HandAngles {
            hour: self.hour.advance_with_hint(time.hour_angle(), Some(true)),
            minute: self.minute.advance_with_hint(time.minute_angle(), Some(true)),
            second: self.second.advance_with_hint(time.second_angle(), Some(true)),
        }
    }

    /// Shed whole turns from any hand that has accumulated too many.
    ///
    /// Returns the shift applied to each hand (zero when untouched).
    pub fn rebase_if_needed(&mut self) -> HandAngles {
        fn shed(state: &mut RotationState) -> f32 {
            if state.needs_rebase() { state.rebase() } else { 0.0 }
        }
        HandAngles {
            hour: shed(&mut self.hour),
            minute: shed(&mut self.minute),
            second: shed(&mut self.second),
        }
    }
}

// =============================================================================
// Digital Clock
// =============================================================================

/// Digital readout options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DigitalFormat {
    pub hour12: bool,
    pub show_seconds: bool,
}

/// Format `time` as `HH:MM[:SS]` or `hh:MM[:SS] AM/PM`.
pub fn format_digital(
    time: ClockTime,
    format: DigitalFormat,
) -> DigitalReadout {
    let mut out = DigitalReadout::new();
    let hour = if format.hour12 {
        match time.hour % 12 {
            0 => 12,
            h => h,
        }
    } else {
        time.hour
    };
    // Capacity covers the longest form, writes cannot fail
    let _ = write!(out, "{hour:02}:{:02}", time.minute);
    if format.show_seconds {
        let _ = write!(out, ":{:02}", time.second);
    }
    if format.hour12 {
        let _ = out.push_str(if time.hour < 12 { " AM" } else { " PM" });
    }
    out
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn at(
        h: u8,
        m: u8,
        s: u8,
    ) -> ClockTime {
        ClockTime {
            hour: h,
            minute: m,
            second: s,
        }
    }

    #[test]
    fn test_from_seconds_of_day() {
        assert_eq!(ClockTime::from_seconds_of_day(0), at(0, 0, 0));
        assert_eq!(ClockTime::from_seconds_of_day(3_661), at(1, 1, 1));
        assert_eq!(ClockTime::from_seconds_of_day(SECONDS_PER_DAY + 59), at(0, 0, 59), "Wraps past midnight");
        assert_eq!(at(1, 1, 1).seconds_of_day(), 3_661);
    }

    #[test]
    fn test_from_unix_with_offset() {
        // 1970-01-01 00:00:00 UTC at UTC+02:00
        assert_eq!(ClockTime::from_unix(0, 120), at(2, 0, 0));
        // Negative offset crosses back into the previous day
        assert_eq!(ClockTime::from_unix(0, -60), at(23, 0, 0));
    }

    #[test]
    fn test_hand_angles() {
        let t = at(15, 30, 30);
        assert_eq!(t.second_angle(), 180.0);
        assert_eq!(t.minute_angle(), 183.0);
        assert_eq!(t.hour_angle(), 105.0);
    }

    #[test]
    fn test_second_hand_crosses_twelve_forward() {
        let mut clock = AnalogClock::new();
        clock.update(at(10, 0, 59));
        let hands = clock.update(at(10, 1, 0));
        assert_eq!(hands.second, 360.0, "59s -> 0s moves forward 6 degrees");
    }

    #[test]
    fn test_hour_hand_crosses_midnight_forward() {
        let mut clock = AnalogClock::new();
        let before = clock.update(at(23, 59, 0));
        let after = clock.update(at(0, 0, 0));
        assert!(after.hour > before.hour, "Hour hand keeps turning clockwise");
        assert!((after.hour - 360.0).abs() < 1e-3);
    }

    #[test]
    fn test_hands_accumulate_over_a_minute() {
        let mut clock = AnalogClock::new();
        let mut hands = clock.update(at(0, 0, 0));
        for s in 1..=120u32 {
            hands = clock.update(ClockTime::from_seconds_of_day(s));
        }
        assert_eq!(hands.second, 720.0, "Two full turns of the second hand");
        assert!((hands.minute - 12.0).abs() < 1e-3);
    }

    #[test]
    fn test_rebase_untouched_below_threshold() {
        let mut clock = AnalogClock::new();
        clock.update(at(1, 2, 3));
        let shifts = clock.rebase_if_needed();
        assert_eq!(shifts, HandAngles { hour: 0.0, minute: 0.0, second: 0.0 });
    }

    #[test]
    fn test_format_24h() {
        let f = DigitalFormat { hour12: false, show_seconds: false };
        assert_eq!(format_digital(at(7, 5, 9), f).as_str(), "07:05");
        let f = DigitalFormat { hour12: false, show_seconds: true };
        assert_eq!(format_digital(at(23, 59, 1), f).as_str(), "23:59:01");
    }

    #[test]
    fn test_format_12h() {
        let f = DigitalFormat { hour12: true, show_seconds: true };
        assert_eq!(format_digital(at(0, 15, 0), f).as_str(), "12:15:00 AM");
        assert_eq!(format_digital(at(12, 0, 0), f).as_str(), "12:00:00 PM");
        let f = DigitalFormat { hour12: true, show_seconds: false };
        assert_eq!(format_digital(at(13, 7, 0), f).as_str(), "01:07 PM");
    }
}
