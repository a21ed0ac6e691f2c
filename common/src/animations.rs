//! Time-based transitions for needles, hands, and liquid columns.
//!
//! The rotation tracker decides *where* a needle ends up. This module decides
//! how it gets there: the displayed angle eases from wherever it is now to the
//! latest target over the configured animation duration.
//!
//! # Easing
//!
//! Transitions use an ease-out cubic curve so the needle starts quickly and
//! settles gently:
//! ```text
//! eased = 1 - (1 - t)^3,   t = elapsed / duration
//! ```
//!
//! # FPS Independence
//!
//! Progress is driven by elapsed milliseconds, not frame counts, so a needle
//! takes the same wall-clock time to settle at 20 FPS and at 60 FPS. The
//! caller measures the time between updates; this crate has no clock.

// =============================================================================
// Easing
// =============================================================================

/// Ease-out cubic over `t` in `[0, 1]`.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

// =============================================================================
// Needle Transition
// =============================================================================

/// Eases a displayed quantity (usually an absolute angle) toward a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NeedleTransition {
    from: f32,
    to: f32,
    current: Option<f32>,
    elapsed_ms: u32,
    duration_ms: u32,
}

impl NeedleTransition {
    /// Create an idle transition. The first target is shown without easing.
    pub const fn new(duration_ms: u32) -> Self {
        Self {
            from: 0.0,
            to: 0.0,
            current: None,
            elapsed_ms: 0,
            duration_ms,
        }
    }

    /// Currently displayed value, `None` before the first target.
    #[inline]
    pub const fn current(&self) -> Option<f32> { self.current }

    /// Value the transition is heading to.
    #[inline]
    pub const fn target(&self) -> Option<f32> {
        match self.current {
            Some(_) => Some(self.to),
            None => None,
        }
    }

    /// Whether the displayed value is still moving.
    #[inline]
    pub const fn is_active(&self) -> bool { self.current.is_some() && self.elapsed_ms < self.duration_ms }

    /// Start moving toward `target` from the currently displayed value.
    ///
    /// Returns `true` if a transition started. The first target snaps.
    pub fn retarget(
        &mut self,
        target: f32,
    ) -> bool {
        let Some(current) = self.current else {
            self.snap(target);
            return false;
        };
        if self.to == target {
            return false;
        }
        self.from = current;
        self.to = target;
        self.elapsed_ms = 0;
        if self.duration_ms == 0 {
            self.current = Some(target);
        }
        true
    }

    /// Jump straight to `value` with no easing.
    pub fn snap(
        &mut self,
        value: f32,
    ) {
        self.from = value;
        self.to = value;
        self.current = Some(value);
        self.elapsed_ms = self.duration_ms;
    }

    /// Advance by `delta_ms`. Returns `true` if the displayed value changed.
    pub fn update(
        &mut self,
        delta_ms: u32,
    ) -> bool {
        if !self.is_active() {
            return false;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms).min(self.duration_ms);
        let t = self.elapsed_ms as f32 / self.duration_ms as f32;
        let value = if self.elapsed_ms >= self.duration_ms {
            self.to
        } else {
            self.from + (self.to - self.from) * ease_out_cubic(t)
        };
        let changed = self.current != Some(value);
        self.current = Some(value);
        changed
    }

    /// Shift every stored value by `-by`. Used after a rotation rebase so the
    /// rendered orientation does not change.
    pub fn shift(
        &mut self,
        by: f32,
    ) {
        self.from -= by;
        self.to -= by;
        self.current = self.current.map(|c| c - by);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5, "Ease-out is ahead of linear at midpoint");
        assert_eq!(ease_out_cubic(3.0), 1.0, "Clamped above 1");
    }

    #[test]
    fn test_first_target_snaps() {
        let mut t = NeedleTransition::new(1000);
        assert!(!t.retarget(90.0));
        assert_eq!(t.current(), Some(90.0));
        assert!(!t.is_active());
    }

    #[test]
    fn test_transition_completes_at_duration() {
        let mut t = NeedleTransition::new(1000);
        t.retarget(0.0);
        assert!(t.retarget(100.0));
        assert!(t.is_active());

        t.update(500);
        let mid = t.current().unwrap();
        assert!(mid > 50.0 && mid < 100.0, "Eased midpoint {mid}");

        t.update(500);
        assert_eq!(t.current(), Some(100.0));
        assert!(!t.is_active());
        assert!(!t.update(16), "Idle transition reports no change");
    }

    #[test]
    fn test_retarget_mid_flight_starts_from_displayed() {
        let mut t = NeedleTransition::new(1000);
        t.retarget(0.0);
        t.retarget(100.0);
        t.update(500);
        let shown = t.current().unwrap();

        t.retarget(-50.0);
        t.update(1);
        let after = t.current().unwrap();
        assert!((after - shown).abs() < 1.0, "No jump on retarget: {shown} -> {after}");
    }

    #[test]
    fn test_same_target_does_not_restart() {
        let mut t = NeedleTransition::new(1000);
        t.retarget(0.0);
        t.retarget(100.0);
        t.update(400);
        assert!(!t.retarget(100.0));
        t.update(600);
        assert_eq!(t.current(), Some(100.0), "Original timeline kept");
    }

    #[test]
    fn test_zero_duration_is_instant() {
        let mut t = NeedleTransition::new(0);
        t.retarget(10.0);
        t.retarget(20.0);
        assert_eq!(t.current(), Some(20.0));
        assert!(!t.is_active());
    }

    #[test]
    fn test_shift_preserves_progress() {
        let mut t = NeedleTransition::new(1000);
        t.retarget(3600.0);
        t.retarget(3660.0);
        t.update(500);
        let before = t.current().unwrap();
        t.shift(3600.0);
        assert!((t.current().unwrap() - (before - 3600.0)).abs() < 1e-3);
        t.update(500);
        assert_eq!(t.current(), Some(60.0));
    }
}
