//! Continuous rotation tracking for needles and clock hands.
//!
//! A rendered rotation is an absolute angle, not an angle modulo 360. If a
//! needle sits at 350° and the next target is 10°, rotating to `10` would
//! spin it 340° backwards. Instead the tracker resolves the target to `370`,
//! so the needle moves 20° forward across the seam.
//!
//! The stored absolute angle is never folded back into a small range. A
//! seconds hand ticking for an hour accumulates 60 full turns; the renderer
//! treats 21600° exactly like 0°. [`RotationState::rebase`] exists for
//! long-running clocks that want to shed whole turns without moving.

use crate::angles::{ANGLE_EPSILON, normalize_signed};

/// Turns accumulated before [`RotationState::needs_rebase`] reports true.
/// Below 360 turns (129600°) adjacent `f32` values are 1/128° apart, fine
/// enough for a minute hand stepping 0.1° a second.
pub const REBASE_TURNS: f32 = 360.0;

/// Resolve a target angle (mod 360) against the previous absolute angle.
///
/// - No previous angle: the target is returned unchanged.
/// - Otherwise the shortest signed difference in `(-180, 180]` is taken, then
///   forced forward (`Some(true)`) or backward (`Some(false)`) when the
///   direction hint disagrees with it.
///
/// ```ignore
/// assert_eq!(resolve_continuous_angle(Some(350.0), 10.0, Some(true)), 370.0);
/// ```
pub fn resolve_continuous_angle(
    previous_absolute: Option<f32>,
    target: f32,
    increasing: Option<bool>,
) -> f32 {
    let Some(previous) = previous_absolute else {
        return target;
    };

    let mut diff = normalize_signed(target - previous);
    match increasing {
        Some(true) if diff < -ANGLE_EPSILON => diff += 360.0,
        Some(false) if diff > ANGLE_EPSILON => diff -= 360.0,
        _ => {}
    }

    previous + diff
}

/// Direction of travel between two rendered values.
///
/// `None` on the first update and when the value did not change.
#[inline]
pub fn direction_hint(
    previous: Option<f32>,
    current: f32,
) -> Option<bool> {
    match previous {
        Some(prev) if current > prev => Some(true),
        Some(prev) if current < prev => Some(false),
        _ => None,
    }
}

// =============================================================================
// Rotation State
// =============================================================================

/// Per-needle rotation memory.
///
/// Created unset when a widget first renders and updated on every value
/// change. Left untouched while the widget displays an error, so the needle
/// resumes from its last good position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationState {
    previous_absolute_angle: Option<f32>,
    previous_value: Option<f32>,
}

impl RotationState {
    pub const fn new() -> Self {
        Self {
            previous_absolute_angle: None,
            previous_value: None,
        }
    }

    /// Last absolute angle handed to the renderer.
    #[inline]
    pub const fn absolute_angle(&self) -> Option<f32> { self.previous_absolute_angle }

    /// Last (clamped) value the angle was derived from.
    #[inline]
    pub const fn previous_value(&self) -> Option<f32> { self.previous_value }

    /// Record a new clamped value and its target angle, returning the new
    /// absolute angle. Direction is inferred from the previous value.
    pub fn advance(
        &mut self,
        clamped_value: f32,
        target_angle: f32,
    ) -> f32 {
        let hint = direction_hint(self.previous_value, clamped_value);
        self.previous_value = Some(clamped_value);
        self.advance_with_hint(target_angle, hint)
    }

    /// Resolve `target_angle` with an explicit direction hint.
    ///
    /// Clock hands use this with `Some(true)`: time only moves forward.
    pub fn advance_with_hint(
        &mut self,
        target_angle: f32,
        increasing: Option<bool>,
    ) -> f32 {
        let angle = resolve_continuous_angle(self.previous_absolute_angle, target_angle, increasing);
        self.previous_absolute_angle = Some(angle);
        angle
    }

    /// Whether the accumulated angle has grown past [`REBASE_TURNS`].
    #[inline]
    pub fn needs_rebase(&self) -> bool {
        self.previous_absolute_angle
            .is_some_and(|a| a.abs() >= REBASE_TURNS * 360.0)
    }

    /// Remove whole turns from the stored angle, keeping its orientation.
    ///
    /// Returns the shift (a multiple of 360, possibly zero) that was
    /// subtracted, so transitions derived from the old angle can follow.
    pub fn rebase(&mut self) -> f32 {
        let Some(angle) = self.previous_absolute_angle else {
            return 0.0;
        };
        let turns = (angle / 360.0) as i32;
        let shift = turns as f32 * 360.0;
        self.previous_absolute_angle = Some(angle - shift);
        shift
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_call_returns_target() {
        assert_eq!(resolve_continuous_angle(None, 42.0, Some(true)), 42.0);
        assert_eq!(resolve_continuous_angle(None, -170.0, None), -170.0);
    }

    #[test]
    fn test_forward_across_seam() {
        let angle = resolve_continuous_angle(Some(350.0), 10.0, Some(true));
        assert_eq!(angle, 370.0, "Increasing value should cross the seam forward");
    }

    #[test]
    fn test_backward_across_seam() {
        let angle = resolve_continuous_angle(Some(10.0), 350.0, Some(false));
        assert_eq!(angle, -10.0, "Decreasing value should cross the seam backward");
    }

    #[test]
    fn test_forced_forward_when_shortest_path_is_backward() {
        // Shortest path from 100 to 20 is -80, but the value is rising
        let angle = resolve_continuous_angle(Some(100.0), 20.0, Some(true));
        assert_eq!(angle, 380.0);
    }

    #[test]
    fn test_forced_backward_when_shortest_path_is_forward() {
        let angle = resolve_continuous_angle(Some(20.0), 100.0, Some(false));
        assert_eq!(angle, -260.0);
    }

    #[test]
    fn test_no_hint_takes_shortest_path() {
        assert_eq!(resolve_continuous_angle(Some(350.0), 10.0, None), 370.0);
        assert_eq!(resolve_continuous_angle(Some(10.0), 350.0, None), -10.0);
    }

    #[test]
    fn test_increasing_never_moves_backward() {
        let mut prev = 0.0f32;
        for target in (0..720).step_by(37) {
            let next = resolve_continuous_angle(Some(prev), target as f32 % 360.0, Some(true));
            assert!(next >= prev, "Forward hint moved {prev} -> {next}");
            prev = next;
        }
    }

    #[test]
    fn test_decreasing_never_moves_forward() {
        let mut prev = 0.0f32;
        for target in (0..720).step_by(41) {
            let next = resolve_continuous_angle(Some(prev), -(target as f32) % 360.0, Some(false));
            assert!(next <= prev, "Backward hint moved {prev} -> {next}");
            prev = next;
        }
    }

    #[test]
    fn test_unchanged_target_is_idempotent() {
        let mut state = RotationState::new();
        let first = state.advance(50.0, 10.0);
        for _ in 0..10 {
            assert_eq!(state.advance(50.0, 10.0), first, "Same value must not drift");
        }
    }

    #[test]
    fn test_unchanged_target_after_wrap_is_idempotent() {
        let mut state = RotationState::new();
        state.advance(90.0, 350.0);
        let wrapped = state.advance(95.0, 10.0);
        assert_eq!(wrapped, 370.0);
        assert_eq!(state.advance(95.0, 10.0), 370.0);
        assert_eq!(state.advance_with_hint(10.0, Some(true)), 370.0, "Zero diff is not forced forward");
    }

    #[test]
    fn test_direction_hint() {
        assert_eq!(direction_hint(None, 5.0), None);
        assert_eq!(direction_hint(Some(4.0), 5.0), Some(true));
        assert_eq!(direction_hint(Some(6.0), 5.0), Some(false));
        assert_eq!(direction_hint(Some(5.0), 5.0), None);
    }

    #[test]
    fn test_state_accumulates_turns() {
        let mut state = RotationState::new();
        let mut angle = 0.0;
        for tick in 0..=180 {
            angle = state.advance_with_hint((tick * 6 % 360) as f32, Some(true));
        }
        assert_eq!(angle, 1080.0, "180 ticks of 6 degrees = 3 full turns");
    }

    #[test]
    fn test_rebase_keeps_orientation() {
        let mut state = RotationState::new();
        state.advance_with_hint(370.0 + 360.0 * 4.0, None);
        let shift = state.rebase();
        assert_eq!(shift, 1800.0);
        assert_eq!(state.absolute_angle(), Some(10.0));
        assert_eq!(state.advance_with_hint(20.0, Some(true)), 20.0);
    }

    #[test]
    fn test_tenth_degree_steps_resolve_up_to_rebase() {
        let base = (REBASE_TURNS - 1.0) * 360.0;
        let mut state = RotationState::new();
        state.advance_with_hint(base, None);
        for tenth in 1..=600u16 {
            let target = f32::from(tenth) * 0.1;
            let angle = state.advance_with_hint(target, Some(true));
            assert!((angle - base - target).abs() < 0.01, "Step {tenth} resolved to {angle}");
        }
        assert!(!state.needs_rebase(), "Still one turn short of the rebase point");
    }

    #[test]
    fn test_rebase_unset_is_noop() {
        let mut state = RotationState::new();
        assert_eq!(state.rebase(), 0.0);
        assert!(!state.needs_rebase());
    }
}
