//! Thermostat card: a liquid column for the current temperature and a
//! setpoint with `-` / `+` tap zones.
//!
//! ```text
//! ┌──────────────────┐
//! │     Hallway      │
//! │   ┌─┐            │
//! │   │ │    21.5    │  setpoint
//! │   │█│            │
//! │   │█│   19.5 C   │  current
//! │  [ - ]    [ + ]  │
//! └──────────────────┘
//! ```
//!
//! The column height follows the same clamp-then-scale rule as the gauge
//! needle and eases over the configured animation duration. A tap on the left
//! third lowers the setpoint by one step, the right third raises it; the new
//! value is clamped to the column bounds and sent as
//! `climate.set_temperature`. The card never writes the setpoint itself: it
//! shows whatever the host reports back.

use std::fmt::Write;
use std::time::Instant;

use dashboard_widgets_common::animations::NeedleTransition;
use dashboard_widgets_common::config::GaugeConfig;
use dashboard_widgets_common::lifecycle::{ReadError, Transition, UNAVAILABLE_STATES, ValueLifecycle, classify_state};
use dashboard_widgets_common::odometer::PLACEHOLDER;
use dashboard_widgets_common::scale::{column_height, fraction};
use dashboard_widgets_common::warnings::WarningLedger;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;

use crate::colors::{ACCENT, GRAY, PLACEHOLDER as PLACEHOLDER_COLOR, RED};
use crate::config::{DEFAULT_SETPOINT_STEP, ThermostatCardConfig};
use crate::host::{Host, ServiceCall};
use crate::styles::{CENTERED, LABEL_FONT, LABEL_STYLE_DIM, TITLE_STYLE_WHITE};
use crate::widgets::Card;
use crate::widgets::primitives::{TITLE_HEIGHT, draw_card_background, draw_title};

const COLUMN_WIDTH: u32 = 10;
const BUTTON_HEIGHT: u32 = 18;

const COLUMN_OUTLINE: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_stroke(GRAY, 1);
const COLUMN_FILL: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_fill(RED);

/// Which setpoint button a tap landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SetpointZone {
    Lower,
    Raise,
}

impl SetpointZone {
    /// Left third lowers, right third raises, the middle does nothing.
    fn at(
        point: Point,
        area: Rectangle,
    ) -> Option<Self> {
        let third = area.size.width as i32 / 3;
        let x = point.x - area.top_left.x;
        if x < third {
            Some(Self::Lower)
        } else if x >= area.size.width as i32 - third {
            Some(Self::Raise)
        } else {
            None
        }
    }
}

pub struct ThermostatCard {
    entity: String,
    name: String,
    config: GaugeConfig,
    step: f32,
    unit: String,

    lifecycle: ValueLifecycle,
    column: NeedleTransition,
    setpoint: Option<f32>,

    warnings: WarningLedger,
    last_tick: Option<Instant>,
}

impl ThermostatCard {
    pub fn new(card: &ThermostatCardConfig) -> Self {
        let (config, corrections) = GaugeConfig::validated(card.raw());
        let mut warnings = WarningLedger::new();
        for correction in &corrections {
            warnings.report(format_args!("{}: {correction}", card.entity));
        }

        let step = match card.step {
            Some(step) if step.is_finite() && step > 0.0 => step,
            Some(step) => {
                warnings.report(format_args!("{}: step {step} is not positive, using {DEFAULT_SETPOINT_STEP}", card.entity));
                DEFAULT_SETPOINT_STEP
            }
            None => DEFAULT_SETPOINT_STEP,
        };

        Self {
            entity: card.entity.clone(),
            name: card.name.clone().unwrap_or_else(|| card.entity.clone()),
            config,
            step,
            unit: card.unit.clone().unwrap_or_default(),
            lifecycle: ValueLifecycle::new(),
            column: NeedleTransition::new(config.animation_duration_ms()),
            setpoint: None,
            warnings,
            last_tick: None,
        }
    }

    #[inline]
    pub const fn lifecycle(&self) -> &ValueLifecycle { &self.lifecycle }

    /// Setpoint as last reported by the host.
    #[inline]
    pub const fn setpoint(&self) -> Option<f32> { self.setpoint }

    /// Displayed column fill in `[0, 1]`.
    #[inline]
    pub const fn column_fraction(&self) -> Option<f32> { self.column.current() }

    /// Current temperature: the `current_temperature` attribute if present,
    /// else the state itself.
    fn read_current(
        &self,
        host: &dyn Host,
    ) -> Result<f32, ReadError> {
        let entity = host.entity(&self.entity).ok_or(ReadError::MissingEntity)?;
        if UNAVAILABLE_STATES.contains(&entity.state.trim()) {
            return Err(ReadError::UnavailableState);
        }
        match entity.number("current_temperature") {
            Some(value) => Ok(value),
            None => classify_state(Some(&entity.state)),
        }
    }

    fn format_value(
        &self,
        value: f32,
    ) -> String {
        let mut out = String::new();
        let decimals = usize::from(self.config.decimals());
        let _ = write!(out, "{value:.decimals$}");
        out
    }
}

impl Card for ThermostatCard {
    fn set_hass(
        &mut self,
        host: &dyn Host,
        _now: Instant,
    ) {
        if let Some(entity) = host.entity(&self.entity) {
            if let Some(setpoint) = entity.number("temperature") {
                self.setpoint = Some(setpoint);
            }
            if self.unit.is_empty()
                && let Some(unit) = entity.unit()
            {
                self.unit = unit.to_owned();
            }
        }

        let reading = self.read_current(host);
        if let Transition::Failed { error, first: true } = self.lifecycle.observe(&self.entity, reading) {
            log::debug!("{}: showing placeholder ({error})", self.entity);
        } else if let Some(value) = self.lifecycle.last_good()
            && !self.lifecycle.shows_placeholder()
        {
            self.column
                .retarget(fraction(value, self.config.min(), self.config.max()));
        }
    }

    fn tick(
        &mut self,
        now: Instant,
    ) {
        let delta_ms = self
            .last_tick
            .map_or(0, |last| now.saturating_duration_since(last).as_millis().min(u128::from(u32::MAX)) as u32);
        self.last_tick = Some(now);
        self.column.update(delta_ms);
    }

    fn tap(
        &mut self,
        host: &mut dyn Host,
        point: Point,
        area: Rectangle,
    ) -> bool {
        let Some(zone) = SetpointZone::at(point, area) else {
            return false;
        };
        let Some(setpoint) = self.setpoint else {
            self.warnings
                .report(format_args!("{}: no setpoint reported, ignoring tap", self.entity));
            return false;
        };

        let delta = match zone {
            SetpointZone::Lower => -self.step,
            SetpointZone::Raise => self.step,
        };
        let target = self.config.clamp(setpoint + delta);
        if target == setpoint {
            return true;
        }
        log::info!("{}: setpoint {setpoint} -> {target}", self.entity);
        host.call_service(
            ServiceCall::new("climate", "set_temperature")
                .with("entity_id", self.entity.as_str())
                .with("temperature", f64::from(target)),
        );
        true
    }

    fn draw<D>(
        &self,
        display: &mut D,
        area: Rectangle,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        draw_card_background(display, area);
        draw_title(display, area, &self.name);

        let top = area.top_left.y + TITLE_HEIGHT as i32 + 4;
        let full_height = area.size.height.saturating_sub(TITLE_HEIGHT + BUTTON_HEIGHT + 8);
        let column_x = area.top_left.x + area.size.width as i32 / 4 - COLUMN_WIDTH as i32 / 2;
        let tube = Rectangle::new(Point::new(column_x, top), Size::new(COLUMN_WIDTH, full_height));
        tube.into_styled(COLUMN_OUTLINE).draw(display).ok();

        if let Some(f) = self.column.current() {
            let fill = column_height(f, full_height.saturating_sub(2));
            Rectangle::new(
                Point::new(column_x + 1, top + full_height as i32 - 1 - fill as i32),
                Size::new(COLUMN_WIDTH - 2, fill),
            )
            .into_styled(COLUMN_FILL)
            .draw(display)
            .ok();
        }

        let text_x = area.top_left.x + area.size.width as i32 * 5 / 8;
        let setpoint = self
            .setpoint
            .map_or_else(|| PLACEHOLDER.to_string(), |v| self.format_value(v));
        Text::with_text_style(&setpoint, Point::new(text_x, top + 20), TITLE_STYLE_WHITE, CENTERED)
            .draw(display)
            .ok();

        let current_y = top + full_height as i32 - 4;
        if self.lifecycle.shows_placeholder() {
            let style = MonoTextStyle::new(LABEL_FONT, PLACEHOLDER_COLOR);
            let dashes: String = std::iter::repeat_n(PLACEHOLDER, 4).collect();
            Text::with_text_style(&dashes, Point::new(text_x, current_y), style, CENTERED)
                .draw(display)
                .ok();
        } else if let Some(value) = self.lifecycle.last_good() {
            let mut current = self.format_value(value);
            if !self.unit.is_empty() {
                current.push(' ');
                current.push_str(&self.unit);
            }
            Text::with_text_style(&current, Point::new(text_x, current_y), LABEL_STYLE_DIM, CENTERED)
                .draw(display)
                .ok();
        }

        let button_y = area.top_left.y + area.size.height as i32 - BUTTON_HEIGHT as i32 / 2;
        let third = area.size.width as i32 / 3;
        let accent = MonoTextStyle::new(LABEL_FONT, ACCENT);
        for (label, x) in [("-", area.top_left.x + third / 2), ("+", area.top_left.x + area.size.width as i32 - third / 2)] {
            Text::with_text_style(label, Point::new(x, button_y), accent, CENTERED)
                .draw(display)
                .ok();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
