//! Gauge configuration validation.
//!
//! Configuration errors are never fatal. Every field that is out of range is
//! replaced with a documented default (or clamped into range) and reported as
//! a [`ConfigWarning`] that the caller logs once.
//!
//! # Compile-Time Validation
//!
//! Defaults and limits carry `const` assertions, so an inconsistent edit
//! (e.g. `DEFAULT_MIN >= DEFAULT_MAX`) fails to compile.

use heapless::Vec;

use crate::angles::{AngularRange, normalize_positive};
use crate::odometer::OdometerFormat;

// =============================================================================
// Defaults and Limits
// =============================================================================

/// Lower bound used when the configured bounds are unusable.
pub const DEFAULT_MIN: f32 = 0.0;

/// Upper bound used when the configured bounds are unusable.
pub const DEFAULT_MAX: f32 = 100.0;

/// Default arc start, just above 9 o'clock.
pub const DEFAULT_START_ANGLE: f32 = 200.0;

/// Default arc end, just below 9 o'clock. Sweeps 320° clockwise over the top.
pub const DEFAULT_END_ANGLE: f32 = 160.0;

/// Default decimal places in the readout.
pub const DEFAULT_DECIMALS: u8 = 0;

/// Most decimal places a readout may show.
pub const MAX_DECIMALS: u8 = 10;

/// Default needle/odometer animation duration in seconds.
pub const DEFAULT_ANIMATION_DURATION_S: f32 = 1.0;

/// Longest allowed animation duration in seconds.
pub const MAX_ANIMATION_DURATION_S: f32 = 10.0;

const _: () = assert!(DEFAULT_MIN < DEFAULT_MAX);
const _: () = assert!(DEFAULT_START_ANGLE >= 0.0 && DEFAULT_START_ANGLE < 360.0);
const _: () = assert!(DEFAULT_END_ANGLE >= 0.0 && DEFAULT_END_ANGLE < 360.0);
const _: () = assert!(DEFAULT_DECIMALS <= MAX_DECIMALS);
const _: () = assert!(DEFAULT_ANIMATION_DURATION_S > 0.0);
const _: () = assert!(DEFAULT_ANIMATION_DURATION_S <= MAX_ANIMATION_DURATION_S);

/// Most warnings a single validation can produce (one per field group).
pub const MAX_WARNINGS: usize = 5;

// =============================================================================
// Warnings
// =============================================================================

/// A configuration value that was corrected in place.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ConfigWarning {
    #[error("invalid bounds min={min} max={max}, using 0..100")]
    InvalidBounds { min: f32, max: f32 },
    #[error("invalid start angle, using 200")]
    InvalidStartAngle,
    #[error("invalid end angle, using 160")]
    InvalidEndAngle,
    #[error("decimals {given} out of range, using {used}")]
    DecimalsOutOfRange { given: i32, used: u8 },
    #[error("animation duration {given}s out of range, using {used}s")]
    AnimationDurationOutOfRange { given: f32, used: f32 },
}

// =============================================================================
// Raw and Validated Config
// =============================================================================

/// Gauge settings as they arrive from the config layer. `None` means
/// "not set" and takes the default silently.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RawGaugeConfig {
    pub min: Option<f32>,
    pub max: Option<f32>,
    pub start_angle: Option<f32>,
    pub end_angle: Option<f32>,
    pub decimals: Option<i32>,
    pub animation_duration_s: Option<f32>,
}

/// Validated gauge settings. Immutable once built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaugeConfig {
    min: f32,
    max: f32,
    start_angle: f32,
    end_angle: f32,
    decimals: u8,
    animation_duration_s: f32,
}

impl GaugeConfig {
    /// Validate `raw`, returning the corrected config and what was corrected.
    pub fn validated(raw: RawGaugeConfig) -> (Self, Vec<ConfigWarning, MAX_WARNINGS>) {
        let mut warnings = Vec::new();

        let min = raw.min.unwrap_or(DEFAULT_MIN);
        let max = raw.max.unwrap_or(DEFAULT_MAX);
        let (min, max) = if min.is_finite() && max.is_finite() && min < max {
            (min, max)
        } else {
            warnings.push(ConfigWarning::InvalidBounds { min, max }).ok();
            (DEFAULT_MIN, DEFAULT_MAX)
        };

        let start_angle = match raw.start_angle {
            Some(a) if a.is_finite() => normalize_positive(a),
            Some(_) => {
                warnings.push(ConfigWarning::InvalidStartAngle).ok();
                DEFAULT_START_ANGLE
            }
            None => DEFAULT_START_ANGLE,
        };

        let end_angle = match raw.end_angle {
            Some(a) if a.is_finite() => normalize_positive(a),
            Some(_) => {
                warnings.push(ConfigWarning::InvalidEndAngle).ok();
                DEFAULT_END_ANGLE
            }
            None => DEFAULT_END_ANGLE,
        };

        let decimals = match raw.decimals {
            Some(d) if (0..=i32::from(MAX_DECIMALS)).contains(&d) => d as u8,
            Some(d) => {
                let used = if d < 0 { 0 } else { MAX_DECIMALS };
                warnings.push(ConfigWarning::DecimalsOutOfRange { given: d, used }).ok();
                used
            }
            None => DEFAULT_DECIMALS,
        };

        let animation_duration_s = match raw.animation_duration_s {
            Some(s) if s.is_finite() && s > 0.0 && s <= MAX_ANIMATION_DURATION_S => s,
            Some(s) => {
                let used = if s.is_finite() && s > MAX_ANIMATION_DURATION_S {
                    MAX_ANIMATION_DURATION_S
                } else {
                    DEFAULT_ANIMATION_DURATION_S
                };
                warnings
                    .push(ConfigWarning::AnimationDurationOutOfRange { given: s, used })
                    .ok();
                used
            }
            None => DEFAULT_ANIMATION_DURATION_S,
        };

        let config = Self {
            min,
            max,
            start_angle,
            end_angle,
            decimals,
            animation_duration_s,
        };
        (config, warnings)
    }

    #[inline]
    pub const fn min(&self) -> f32 { self.min }

    #[inline]
    pub const fn max(&self) -> f32 { self.max }

    #[inline]
    pub const fn start_angle(&self) -> f32 { self.start_angle }

    #[inline]
    pub const fn end_angle(&self) -> f32 { self.end_angle }

    #[inline]
    pub const fn decimals(&self) -> u8 { self.decimals }

    #[inline]
    pub const fn animation_duration_s(&self) -> f32 { self.animation_duration_s }

    /// Animation duration in whole milliseconds.
    #[inline]
    pub fn animation_duration_ms(&self) -> u32 { (self.animation_duration_s * 1000.0 + 0.5) as u32 }

    /// The arc this gauge sweeps.
    #[inline]
    pub fn range(&self) -> AngularRange { AngularRange::new(self.start_angle, self.end_angle) }

    /// Clamp a value into `[min, max]`.
    #[inline]
    pub fn clamp(
        &self,
        value: f32,
    ) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Map a value to its needle angle (without the rest offset).
    #[inline]
    pub fn angle_for(
        &self,
        value: f32,
    ) -> f32 {
        self.range().map(value, self.min, self.max)
    }

    /// Readout format matching these bounds.
    #[inline]
    pub fn odometer_format(&self) -> OdometerFormat { OdometerFormat::new(self.min, self.max, self.decimals) }
}

impl Default for GaugeConfig {
    fn default() -> Self { Self::validated(RawGaugeConfig::default()).0 }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_warnings() {
        let (config, warnings) = GaugeConfig::validated(RawGaugeConfig::default());
        assert!(warnings.is_empty(), "Unset fields take defaults silently");
        assert_eq!(config.min(), DEFAULT_MIN);
        assert_eq!(config.max(), DEFAULT_MAX);
        assert_eq!(config.start_angle(), DEFAULT_START_ANGLE);
        assert_eq!(config.end_angle(), DEFAULT_END_ANGLE);
        assert_eq!(config.decimals(), DEFAULT_DECIMALS);
        assert_eq!(config.animation_duration_ms(), 1000);
    }

    #[test]
    fn test_inverted_bounds_fall_back() {
        let raw = RawGaugeConfig {
            min: Some(50.0),
            max: Some(10.0),
            ..RawGaugeConfig::default()
        };
        let (config, warnings) = GaugeConfig::validated(raw);
        assert_eq!((config.min(), config.max()), (0.0, 100.0));
        assert_eq!(warnings.as_slice(), &[ConfigWarning::InvalidBounds { min: 50.0, max: 10.0 }]);
    }

    #[test]
    fn test_equal_bounds_fall_back() {
        let raw = RawGaugeConfig {
            min: Some(5.0),
            max: Some(5.0),
            ..RawGaugeConfig::default()
        };
        let (config, warnings) = GaugeConfig::validated(raw);
        assert_eq!((config.min(), config.max()), (0.0, 100.0));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_angles_normalized() {
        let raw = RawGaugeConfig {
            start_angle: Some(-45.0),
            end_angle: Some(405.0),
            ..RawGaugeConfig::default()
        };
        let (config, warnings) = GaugeConfig::validated(raw);
        assert!(warnings.is_empty());
        assert_eq!(config.start_angle(), 315.0);
        assert_eq!(config.end_angle(), 45.0);
    }

    #[test]
    fn test_non_finite_angles_fall_back() {
        let raw = RawGaugeConfig {
            start_angle: Some(f32::NAN),
            end_angle: Some(f32::INFINITY),
            ..RawGaugeConfig::default()
        };
        let (config, warnings) = GaugeConfig::validated(raw);
        assert_eq!(config.start_angle(), DEFAULT_START_ANGLE);
        assert_eq!(config.end_angle(), DEFAULT_END_ANGLE);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_decimals_clamped() {
        let high = RawGaugeConfig {
            decimals: Some(14),
            ..RawGaugeConfig::default()
        };
        let (config, warnings) = GaugeConfig::validated(high);
        assert_eq!(config.decimals(), MAX_DECIMALS);
        assert_eq!(warnings.as_slice(), &[ConfigWarning::DecimalsOutOfRange { given: 14, used: 10 }]);

        let low = RawGaugeConfig {
            decimals: Some(-2),
            ..RawGaugeConfig::default()
        };
        assert_eq!(GaugeConfig::validated(low).0.decimals(), 0);
    }

    #[test]
    fn test_animation_duration_capped() {
        let raw = RawGaugeConfig {
            animation_duration_s: Some(30.0),
            ..RawGaugeConfig::default()
        };
        let (config, warnings) = GaugeConfig::validated(raw);
        assert_eq!(config.animation_duration_s(), MAX_ANIMATION_DURATION_S);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_animation_duration_non_positive_defaults() {
        for bad in [0.0, -1.0, f32::NAN] {
            let raw = RawGaugeConfig {
                animation_duration_s: Some(bad),
                ..RawGaugeConfig::default()
            };
            let (config, warnings) = GaugeConfig::validated(raw);
            assert_eq!(config.animation_duration_s(), DEFAULT_ANIMATION_DURATION_S, "{bad} should default");
            assert_eq!(warnings.len(), 1);
        }
    }

    #[test]
    fn test_angle_for_uses_range() {
        let config = GaugeConfig::default();
        assert!(config.angle_for(50.0).abs() < 1e-3, "Default 200->160 arc puts the midpoint at 0");
    }

    #[test]
    fn test_odometer_format_matches_bounds() {
        let raw = RawGaugeConfig {
            min: Some(-40.0),
            max: Some(120.0),
            decimals: Some(1),
            ..RawGaugeConfig::default()
        };
        let format = GaugeConfig::validated(raw).0.odometer_format();
        assert!(format.signed());
        assert_eq!(format.integer_width(), 3);
        assert_eq!(format.decimals(), 1);
    }
}
