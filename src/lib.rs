// Crate-level lints: Allow common embedded/graphics patterns that pedantic lints flag
#![allow(clippy::cast_possible_truncation)] // Intentional f32->i32, u32->i32 casts for pixel math
#![allow(clippy::cast_precision_loss)] // u32/i32->f32 in graphics calculations
#![allow(clippy::cast_possible_wrap)] // u32->i32 wrapping is acceptable for our value ranges
#![allow(clippy::cast_sign_loss)] // i32->u32 where we know sign is positive

//! Home-automation dashboard cards rendered with `embedded-graphics`.
//!
//! Each card binds to entities supplied by a [`host::Host`] and reflects them
//! with animated graphics: needle rotation, liquid-column height, flipping
//! odometer digits, clock hands, and digital readouts. The value math lives in
//! the `no_std` [`dashboard_widgets_common`] crate; this crate adds the host
//! interface, timers, configuration loading, layout, and drawing.
//!
//! # Cards
//!
//! | Card | Binds to | Animation |
//! |------|----------|-----------|
//! | [`widgets::GaugeCard`] | numeric sensor | needle, peak needle, odometer |
//! | [`widgets::ThermostatCard`] | climate entity | liquid column |
//! | [`widgets::AnalogClockCard`] | wall clock | hands |
//! | [`widgets::DigitalClockCard`] | wall clock | readout |
//! | [`widgets::EntitiesCard`] | any entities | none |
//! | [`widgets::ButtonCard`] | optional entity | none |
//!
//! # Update Model
//!
//! Single-threaded and cooperative. The host pushes state with
//! [`dashboard::Dashboard::set_hass`]; the frame loop calls
//! [`dashboard::Dashboard::frame`] which fires due timers, advances
//! transitions, and runs work deferred to the next frame.

pub mod config;
pub mod dashboard;
pub mod host;
pub mod layout;
pub mod scheduler;
pub mod styles;
pub mod widgets;

pub use dashboard_widgets_common::colors;
