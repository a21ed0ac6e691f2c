//! Peak-hold needle.
//!
//! A secondary needle that marks the most extreme value seen recently. After
//! a new extreme it holds for `hold_ms`, then releases and decays back to the
//! live value (the decay itself is eased by the caller's transition).
//!
//! The peak needle keeps its own [`RotationState`] so it crosses the 0/360
//! seam independently of the main needle.

use crate::rotation::RotationState;

/// Default hold time after a new extreme.
pub const DEFAULT_HOLD_MS: u32 = 3000;

/// Which extreme the peak needle tracks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PeakMode {
    #[default]
    Max,
    Min,
}

impl PeakMode {
    #[inline]
    fn beats(
        self,
        candidate: f32,
        held: f32,
    ) -> bool {
        match self {
            Self::Max => candidate > held,
            Self::Min => candidate < held,
        }
    }
}

/// Peak tracking for one gauge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeakHold {
    mode: PeakMode,
    hold_ms: u32,
    value: Option<f32>,
    live: Option<f32>,
    remaining_ms: u32,
    rotation: RotationState,
}

impl PeakHold {
    pub const fn new(
        mode: PeakMode,
        hold_ms: u32,
    ) -> Self {
        Self {
            mode,
            hold_ms,
            value: None,
            live: None,
            remaining_ms: 0,
            rotation: RotationState::new(),
        }
    }

    #[inline]
    pub const fn mode(&self) -> PeakMode { self.mode }

    /// Value the peak needle points at.
    #[inline]
    pub const fn value(&self) -> Option<f32> { self.value }

    /// True while a fresh extreme is being held.
    #[inline]
    pub const fn is_new_peak(&self) -> bool { self.remaining_ms > 0 }

    /// Rotation memory for the peak needle.
    #[inline]
    pub fn rotation_mut(&mut self) -> &mut RotationState { &mut self.rotation }

    /// Feed the live (clamped) value. Returns `true` if the peak moved.
    pub fn observe(
        &mut self,
        value: f32,
    ) -> bool {
        self.live = Some(value);
        match self.value {
            Some(held) if !self.mode.beats(value, held) => {
                if self.remaining_ms == 0 && held != value {
                    // Released: follow the live value
                    self.value = Some(value);
                    return true;
                }
                false
            }
            _ => {
                self.value = Some(value);
                self.remaining_ms = self.hold_ms;
                true
            }
        }
    }

    /// Advance the hold timer. Returns `true` if the peak released this tick.
    pub fn tick(
        &mut self,
        delta_ms: u32,
    ) -> bool {
        if self.remaining_ms == 0 {
            return false;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(delta_ms);
        if self.remaining_ms > 0 {
            return false;
        }
        match (self.value, self.live) {
            (Some(held), Some(live)) if held != live => {
                self.value = Some(live);
                true
            }
            _ => false,
        }
    }
}

impl Default for PeakHold {
    fn default() -> Self { Self::new(PeakMode::Max, DEFAULT_HOLD_MS) }
}

// =============================================================================
// Tests
// =============================================================================
