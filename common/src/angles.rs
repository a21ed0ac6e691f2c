//! Value to angle mapping along a gauge arc.
//!
//! A gauge maps its `[min, max]` value range onto an arc that starts at
//! `start_angle` and sweeps clockwise to `end_angle`. Angles are in degrees
//! with 0° pointing right (3 o'clock) and increasing clockwise on screen.
//!
//! # Wrapping Arcs
//!
//! When `end_angle < start_angle` the arc passes through the 0°/360° seam:
//! ```text
//! start = 200°, end = 160°  ->  sweep = 360 - 200 + 160 = 320°
//! ```
//! The remaining 40° between `end` and `start` is the dead zone. No value maps
//! there; anything that lands in it (floating point drift at the ends) snaps to
//! the angularly closer endpoint.
//!
//! # Needle Orientation
//!
//! Needles are drawn pointing up at rest, so the renderer adds
//! [`NEEDLE_REST_OFFSET`] to the mapped angle before rotating. The mapper itself
//! never applies it.

use embedded_graphics::prelude::Point;
use micromath::F32;

use crate::scale::fraction;

// =============================================================================
// Constants
// =============================================================================

/// Offset added to a mapped angle to rotate an up-pointing needle graphic.
pub const NEEDLE_REST_OFFSET: f32 = 90.0;

/// Tolerance for angle comparisons. Absorbs `f32` drift in sweep arithmetic.
pub const ANGLE_EPSILON: f32 = 1e-3;

const FULL_TURN: f32 = 360.0;
const HALF_TURN: f32 = 180.0;

// =============================================================================
// Normalization Helpers
// =============================================================================

/// Normalize an angle into `[0, 360)`.
#[inline]
pub fn normalize_positive(degrees: f32) -> f32 {
    let mut d = degrees % FULL_TURN;
    if d < 0.0 {
        d += FULL_TURN;
    }
    // -1e-9 % 360 + 360 rounds up to exactly 360.0
    if d >= FULL_TURN { d - FULL_TURN } else { d }
}

/// Normalize an angle into `(-180, 180]`.
#[inline]
pub fn normalize_signed(degrees: f32) -> f32 {
    let d = normalize_positive(degrees);
    if d > HALF_TURN { d - FULL_TURN } else { d }
}

/// Minimum angular distance between two angles, considering the circle.
///
/// Takes the smallest of the direct difference and the two ±360 wrapped
/// differences, so it is correct for any pair of inputs in `(-360, 360)`.
#[inline]
pub fn wrap_aware_distance(
    a: f32,
    b: f32,
) -> f32 {
    let direct = a - b;
    let d0 = direct.abs();
    let d1 = (direct + FULL_TURN).abs();
    let d2 = (direct - FULL_TURN).abs();
    d0.min(d1).min(d2)
}

// =============================================================================
// Angular Range
// =============================================================================

/// A gauge arc: where it starts, where it ends, and how far it sweeps.
///
/// `total_sweep` is always in `(0, 360]`. Equal start and end angles describe
/// a full circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngularRange {
    start_angle: f32,
    end_angle: f32,
    total_sweep: f32,
}

impl AngularRange {
    /// Build a range from start and end angles (normalized into `[0, 360)`).
    pub fn new(
        start_angle: f32,
        end_angle: f32,
    ) -> Self {
        let start_angle = normalize_positive(start_angle);
        let end_angle = normalize_positive(end_angle);
        let total_sweep = if end_angle > start_angle {
            end_angle - start_angle
        } else {
            FULL_TURN - start_angle + end_angle
        };
        Self {
            start_angle,
            end_angle,
            total_sweep,
        }
    }

    #[inline]
    pub const fn start_angle(&self) -> f32 { self.start_angle }

    #[inline]
    pub const fn end_angle(&self) -> f32 { self.end_angle }

    #[inline]
    pub const fn total_sweep(&self) -> f32 { self.total_sweep }

    /// Whether the arc passes through the 0°/360° seam.
    #[inline]
    pub fn wraps(&self) -> bool { self.end_angle <= self.start_angle }

    /// Clockwise distance from `start_angle` to `angle`, in `[0, 360)`.
    #[inline]
    pub fn offset_from_start(
        &self,
        angle: f32,
    ) -> f32 {
        normalize_positive(angle - self.start_angle)
    }

    /// Whether `angle` lies on the swept arc (endpoints included).
    pub fn contains(
        &self,
        angle: f32,
    ) -> bool {
        let offset = self.offset_from_start(angle);
        offset <= self.total_sweep + ANGLE_EPSILON || offset >= FULL_TURN - ANGLE_EPSILON
    }

    /// Map `value` in `[min, max]` to an angle in `(-180, 180]`.
    ///
    /// Out-of-range values produce the angle of the nearest bound.
    pub fn map(
        &self,
        value: f32,
        min: f32,
        max: f32,
    ) -> f32 {
        let position = fraction(value, min, max);
        let raw = self.start_angle + self.total_sweep * position;

        if !self.wraps() {
            return normalize_signed(raw.clamp(self.start_angle, self.end_angle));
        }

        let angle = normalize_signed(raw);
        if self.contains(angle) {
            return angle;
        }

        // Dead zone: snap to whichever endpoint is closer
        let start = normalize_signed(self.start_angle);
        let end = normalize_signed(self.end_angle);
        if wrap_aware_distance(angle, start) <= wrap_aware_distance(angle, end) {
            start
        } else {
            end
        }
    }
}

/// Map a value onto a gauge arc. See [`AngularRange::map`].
#[inline]
pub fn map_value_to_angle(
    value: f32,
    min: f32,
    max: f32,
    start_angle: f32,
    end_angle: f32,
) -> f32 {
    AngularRange::new(start_angle, end_angle).map(value, min, max)
}

// =============================================================================
// Geometry
// =============================================================================

/// Tip of a needle of `length` pixels rotated `rotation` degrees clockwise
/// from 12 o'clock around `center`.
pub fn needle_tip(
    center: Point,
    length: f32,
    rotation: f32,
) -> Point {
    let radians = normalize_positive(rotation).to_radians();
    let dx = F32(radians).sin().0 * length;
    let dy = -F32(radians).cos().0 * length;
    Point::new(center.x + round_px(dx), center.y + round_px(dy))
}

#[inline]
fn round_px(v: f32) -> i32 {
    if v >= 0.0 { (v + 0.5) as i32 } else { (v - 0.5) as i32 }
}

// =============================================================================
// Tests
// =============================================================================
