//! Platform-agnostic core for the dashboard widgets.
//!
//! This crate contains the logic every widget shares, with no dependency on
//! a clock source, an allocator, or a display:
//!
//! - [`angles`]: value to needle angle along a (possibly wrapping) arc
//! - [`rotation`]: continuous rotation tracking across the 0/360 seam
//! - [`odometer`]: flip-digit display with stepped interpolation
//! - [`lifecycle`]: per-widget value lifecycle and read-error taxonomy
//! - [`config`]: gauge configuration validation with corrected defaults
//! - [`animations`]: time-based needle transitions
//! - [`peak`]: peak-hold needle
//! - [`clock`]: analog hand angles and digital readout
//! - [`scale`]: linear value fractions
//! - [`warnings`]: log-once warning ledger
//! - [`colors`]: RGB565 palette
//!
//! # no_std Compatibility
//!
//! Durations are plain milliseconds so the crate can run on targets without
//! `std::time`. Tests build with `std` for the test harness.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod angles;
pub mod animations;
pub mod clock;
pub mod colors;
pub mod config;
pub mod lifecycle;
pub mod odometer;
pub mod peak;
pub mod rotation;
pub mod scale;
pub mod warnings;

// Re-export commonly used items
pub use angles::{AngularRange, map_value_to_angle};
pub use config::GaugeConfig;
pub use lifecycle::{LifecycleState, ReadError, ValueLifecycle};
pub use odometer::FlipDisplay;
pub use rotation::{RotationState, resolve_continuous_angle};
