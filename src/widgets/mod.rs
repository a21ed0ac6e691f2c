//! Dashboard cards.
//!
//! - [`gauge`]: needle gauge with peak needle and odometer readout
//! - [`thermostat`]: liquid column with setpoint buttons
//! - [`clock`]: analog and digital clocks
//! - [`entities`]: list of entity states
//! - [`button`]: tap action button
//! - [`primitives`]: shared drawing helpers
//!
//! # Card Contract
//!
//! Every card implements [`Card`]. The dashboard calls, in order:
//! 1. `set_hass` whenever the host publishes new state (synchronously, in
//!    delivery order)
//! 2. `tick` once per frame, which fires due timers, advances transitions,
//!    and runs frame-deferred work
//! 3. `draw` into the card's current layout rectangle
//!
//! `tap` is forwarded for presses inside the card.
//!
//! Draw is generic over the target, so cards are dispatched through the
//! [`AnyCard`] enum rather than trait objects.

pub mod button;
pub mod clock;
pub mod entities;
pub mod gauge;
pub mod primitives;
pub mod thermostat;

use std::time::Instant;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

pub use button::ButtonCard;
pub use clock::{AnalogClockCard, ClockAnchor, DigitalClockCard};
pub use entities::EntitiesCard;
pub use gauge::GaugeCard;
pub use thermostat::ThermostatCard;

use crate::config::CardConfig;
use crate::host::Host;

/// Behaviour shared by every card.
pub trait Card {
    /// Take in the host's latest state.
    fn set_hass(
        &mut self,
        host: &dyn Host,
        now: Instant,
    );

    /// Advance timers and animations to `now`.
    fn tick(
        &mut self,
        now: Instant,
    );

    /// Handle a press at `point` inside `area`. Returns `true` if handled.
    fn tap(
        &mut self,
        _host: &mut dyn Host,
        _point: Point,
        _area: Rectangle,
    ) -> bool {
        false
    }

    /// Draw the card into `area`.
    fn draw<D>(
        &self,
        display: &mut D,
        area: Rectangle,
    ) where
        D: DrawTarget<Color = Rgb565>;
}

/// Any card, for heterogeneous dashboards.
pub enum AnyCard {
    Gauge(GaugeCard),
    Thermostat(ThermostatCard),
    AnalogClock(AnalogClockCard),
    DigitalClock(DigitalClockCard),
    Entities(EntitiesCard),
    Button(ButtonCard),
}

impl AnyCard {
    /// Build the card a config entry describes.
    pub fn from_config(
        config: &CardConfig,
        anchor: ClockAnchor,
        now: Instant,
    ) -> Self {
        match config {
            CardConfig::Gauge(c) => Self::Gauge(GaugeCard::new(c)),
            CardConfig::Thermostat(c) => Self::Thermostat(ThermostatCard::new(c)),
            CardConfig::AnalogClock(c) => Self::AnalogClock(AnalogClockCard::new(c, anchor, now)),
            CardConfig::DigitalClock(c) => Self::DigitalClock(DigitalClockCard::new(c, anchor, now)),
            CardConfig::Entities(c) => Self::Entities(EntitiesCard::new(c)),
            CardConfig::Button(c) => Self::Button(ButtonCard::new(c)),
        }
    }
}

macro_rules! dispatch {
    ($self:expr, $card:ident => $body:expr) => {
        match $self {
            AnyCard::Gauge($card) => $body,
            AnyCard::Thermostat($card) => $body,
            AnyCard::AnalogClock($card) => $body,
            AnyCard::DigitalClock($card) => $body,
            AnyCard::Entities($card) => $body,
            AnyCard::Button($card) => $body,
        }
    };
}

impl Card for AnyCard {
    fn set_hass(
        &mut self,
        host: &dyn Host,
        now: Instant,
    ) {
        dispatch!(self, card => card.set_hass(host, now));
    }

    fn tick(
        &mut self,
        now: Instant,
    ) {
        dispatch!(self, card => card.tick(now));
    }

    fn tap(
        &mut self,
        host: &mut dyn Host,
        point: Point,
        area: Rectangle,
    ) -> bool {
        dispatch!(self, card => card.tap(host, point, area))
    }

    fn draw<D>(
        &self,
        display: &mut D,
        area: Rectangle,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        dispatch!(self, card => card.draw(display, area));
    }
}
