//! Per-widget value lifecycle.
//!
//! ```text
//! Uninitialized --valid--> Displaying --error--> Erroring --valid--> Displaying
//!       |                                          ^
//!       +------------------error-------------------+
//! ```
//!
//! A read error never reaches the host. The widget shows a placeholder and
//! keeps its rotation and odometer state untouched, so when valid data comes
//! back the needle continues from its last good angle. Each distinct error is
//! logged once per error interval.

use crate::warnings::WarningLedger;

// =============================================================================
// Read Errors
// =============================================================================

/// Why a widget could not turn its entity state into a number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    /// The host has no entity with the configured id.
    #[error("entity not found")]
    MissingEntity,
    /// The host reports the entity as `unavailable` or `unknown`.
    #[error("entity is unavailable")]
    UnavailableState,
    /// The state string does not parse to a finite number.
    #[error("state is not numeric")]
    NonNumericState,
}

/// States a host uses for "no value right now".
pub const UNAVAILABLE_STATES: [&str; 2] = ["unavailable", "unknown"];

/// Classify a raw entity state string.
///
/// `None` means the entity does not exist.
pub fn classify_state(state: Option<&str>) -> Result<f32, ReadError> {
    let state = state.ok_or(ReadError::MissingEntity)?.trim();
    if UNAVAILABLE_STATES.contains(&state) {
        return Err(ReadError::UnavailableState);
    }
    match state.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ReadError::NonNumericState),
    }
}

// =============================================================================
// Lifecycle State Machine
// =============================================================================

/// Where a widget is in its value lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LifecycleState {
    /// No successful read yet.
    #[default]
    Uninitialized,
    /// Last read was a finite number.
    Displaying,
    /// Last read failed; a placeholder is shown.
    Erroring,
}

/// What a single observation did to the lifecycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transition {
    /// First valid value after creation.
    Initialized(f32),
    /// Another valid value while displaying.
    Updated(f32),
    /// Valid value after an error interval.
    Recovered(f32),
    /// Read failed. `first` is true on the transition into `Erroring`.
    Failed { error: ReadError, first: bool },
}

impl Transition {
    /// The value to render, if the read succeeded.
    #[inline]
    pub const fn value(&self) -> Option<f32> {
        match self {
            Self::Initialized(v) | Self::Updated(v) | Self::Recovered(v) => Some(*v),
            Self::Failed { .. } => None,
        }
    }
}

/// Tracks the lifecycle of one entity-bound widget.
pub struct ValueLifecycle {
    state: LifecycleState,
    error: Option<ReadError>,
    last_good: Option<f32>,
    warnings: WarningLedger,
}

impl ValueLifecycle {
    pub const fn new() -> Self {
        Self {
            state: LifecycleState::Uninitialized,
            error: None,
            last_good: None,
            warnings: WarningLedger::new(),
        }
    }

    #[inline]
    pub const fn state(&self) -> LifecycleState { self.state }

    /// The error currently displayed, if any.
    #[inline]
    pub const fn error(&self) -> Option<ReadError> { self.error }

    /// The last value that read successfully.
    #[inline]
    pub const fn last_good(&self) -> Option<f32> { self.last_good }

    /// Whether the widget should draw its placeholder.
    #[inline]
    pub fn shows_placeholder(&self) -> bool { self.state != LifecycleState::Displaying }

    /// Feed one read result for `entity_id` into the state machine.
    pub fn observe(
        &mut self,
        entity_id: &str,
        reading: Result<f32, ReadError>,
    ) -> Transition {
        match reading {
            Ok(value) => {
                let transition = match self.state {
                    LifecycleState::Uninitialized => Transition::Initialized(value),
                    LifecycleState::Displaying => Transition::Updated(value),
                    LifecycleState::Erroring => {
                        log::info!("{entity_id}: recovered with {value}");
                        self.warnings.clear();
                        Transition::Recovered(value)
                    }
                };
                self.state = LifecycleState::Displaying;
                self.error = None;
                self.last_good = Some(value);
                transition
            }
            Err(error) => {
                let first = self.state != LifecycleState::Erroring;
                self.warnings.report(format_args!("{entity_id}: {error}"));
                self.state = LifecycleState::Erroring;
                self.error = Some(error);
                Transition::Failed { error, first }
            }
        }
    }
}

impl Default for ValueLifecycle {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_numeric() {
        assert_eq!(classify_state(Some("42")), Ok(42.0));
        assert_eq!(classify_state(Some(" -3.5 ")), Ok(-3.5));
    }

    #[test]
    fn test_classify_errors() {
        assert_eq!(classify_state(None), Err(ReadError::MissingEntity));
        assert_eq!(classify_state(Some("unavailable")), Err(ReadError::UnavailableState));
        assert_eq!(classify_state(Some("unknown")), Err(ReadError::UnavailableState));
        assert_eq!(classify_state(Some("on")), Err(ReadError::NonNumericState));
        assert_eq!(classify_state(Some("")), Err(ReadError::NonNumericState));
        assert_eq!(classify_state(Some("NaN")), Err(ReadError::NonNumericState), "NaN is not displayable");
        assert_eq!(classify_state(Some("inf")), Err(ReadError::NonNumericState));
    }

    #[test]
    fn test_starts_uninitialized() {
        let lifecycle = ValueLifecycle::new();
        assert_eq!(lifecycle.state(), LifecycleState::Uninitialized);
        assert!(lifecycle.shows_placeholder());
    }

    #[test]
    fn test_first_value_initializes() {
        let mut lifecycle = ValueLifecycle::new();
        assert_eq!(lifecycle.observe("sensor.t", Ok(42.0)), Transition::Initialized(42.0));
        assert_eq!(lifecycle.state(), LifecycleState::Displaying);
        assert_eq!(lifecycle.observe("sensor.t", Ok(43.0)), Transition::Updated(43.0));
    }

    #[test]
    fn test_error_then_recovery() {
        let mut lifecycle = ValueLifecycle::new();
        lifecycle.observe("sensor.t", Ok(42.0));

        let t = lifecycle.observe("sensor.t", Err(ReadError::UnavailableState));
        assert_eq!(t, Transition::Failed { error: ReadError::UnavailableState, first: true });
        assert_eq!(lifecycle.state(), LifecycleState::Erroring);
        assert_eq!(lifecycle.last_good(), Some(42.0), "Last good value retained");

        let t = lifecycle.observe("sensor.t", Err(ReadError::UnavailableState));
        assert_eq!(t, Transition::Failed { error: ReadError::UnavailableState, first: false });

        let t = lifecycle.observe("sensor.t", Ok(45.0));
        assert_eq!(t, Transition::Recovered(45.0));
        assert_eq!(lifecycle.error(), None, "Error flag cleared on recovery");
        assert!(!lifecycle.shows_placeholder());
    }

    #[test]
    fn test_error_before_first_value() {
        let mut lifecycle = ValueLifecycle::new();
        let t = lifecycle.observe("sensor.t", Err(ReadError::MissingEntity));
        assert_eq!(t, Transition::Failed { error: ReadError::MissingEntity, first: true });
        assert_eq!(lifecycle.last_good(), None);
        assert_eq!(lifecycle.observe("sensor.t", Ok(1.0)), Transition::Recovered(1.0));
    }

    #[test]
    fn test_repeated_error_logged_once() {
        let mut lifecycle = ValueLifecycle::new();
        for _ in 0..5 {
            lifecycle.observe("sensor.t", Err(ReadError::NonNumericState));
        }
        assert_eq!(lifecycle.warnings.len(), 1, "One distinct message remembered");

        lifecycle.observe("sensor.t", Err(ReadError::UnavailableState));
        assert_eq!(lifecycle.warnings.len(), 2, "A different error is a new message");
    }

    #[test]
    fn test_transition_value() {
        assert_eq!(Transition::Updated(3.0).value(), Some(3.0));
        assert_eq!(
            Transition::Failed {
                error: ReadError::MissingEntity,
                first: true
            }
            .value(),
            None
        );
    }
}
