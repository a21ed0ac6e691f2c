//! Analog and digital clock cards.
//!
//! Both cards recompute once a second from a repeating timer. Wall time comes
//! from a [`ClockAnchor`]: a time of day pinned to an `Instant`, advanced by
//! the monotonic clock the frame loop already passes in. Tests pin the
//! anchor; the simulator pins it to the system time.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use dashboard_widgets_common::animations::NeedleTransition;
use dashboard_widgets_common::clock::{AnalogClock, ClockTime, DigitalFormat, DigitalReadout, HandAngles, SECONDS_PER_DAY, format_digital};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Text;

use crate::colors::{ACCENT, GRAY, LABEL, RED, WHITE};
use crate::config::{AnalogClockCardConfig, DigitalClockCardConfig};
use crate::host::Host;
use crate::scheduler::{Scheduler, TaskHandle};
use crate::styles::{CLOCK_STYLE, MIDDLE_CENTERED};
use crate::widgets::Card;
use crate::widgets::primitives::{TITLE_HEIGHT, dial_radius, draw_card_background, draw_clock_face, draw_hub, draw_needle, draw_title};

/// Clock recompute period.
pub const CLOCK_PERIOD: Duration = Duration::from_secs(1);

/// Hand easing between ticks.
const HAND_TRANSITION_MS: u32 = 250;

// =============================================================================
// Clock Anchor
// =============================================================================

/// A time of day pinned to a monotonic instant.
#[derive(Clone, Copy, Debug)]
pub struct ClockAnchor {
    seconds_of_day: u32,
    at: Instant,
}

impl ClockAnchor {
    pub const fn new(
        time: ClockTime,
        at: Instant,
    ) -> Self {
        Self {
            seconds_of_day: time.seconds_of_day(),
            at,
        }
    }

    /// Pin the current system time, shifted by `utc_offset_minutes`.
    pub fn from_system(
        utc_offset_minutes: i32,
        at: Instant,
    ) -> Self {
        let unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs() as i64);
        Self::new(ClockTime::from_unix(unix, utc_offset_minutes), at)
    }

    /// Time of day at `now`.
    pub fn time_at(
        &self,
        now: Instant,
    ) -> ClockTime {
        let elapsed = now.saturating_duration_since(self.at).as_secs() % u64::from(SECONDS_PER_DAY);
        ClockTime::from_seconds_of_day(self.seconds_of_day + elapsed as u32)
    }
}

fn delta_ms(
    last: Option<Instant>,
    now: Instant,
) -> u32 {
    last.map_or(0, |last| now.saturating_duration_since(last).as_millis().min(u128::from(u32::MAX)) as u32)
}

// =============================================================================
// Analog Clock
// =============================================================================

pub struct AnalogClockCard {
    name: String,
    show_seconds: bool,
    anchor: ClockAnchor,
    clock: AnalogClock,
    hour: NeedleTransition,
    minute: NeedleTransition,
    second: NeedleTransition,
    timers: Scheduler<()>,
    _second_timer: TaskHandle,
    last_tick: Option<Instant>,
}

impl AnalogClockCard {
    pub fn new(
        card: &AnalogClockCardConfig,
        anchor: ClockAnchor,
        now: Instant,
    ) -> Self {
        let mut timers = Scheduler::new();
        let second_timer = timers.schedule_repeating(now, CLOCK_PERIOD, ());
        let mut this = Self {
            name: card.name.clone().unwrap_or_default(),
            show_seconds: card.show_seconds,
            anchor,
            clock: AnalogClock::new(),
            hour: NeedleTransition::new(HAND_TRANSITION_MS),
            minute: NeedleTransition::new(HAND_TRANSITION_MS),
            second: NeedleTransition::new(HAND_TRANSITION_MS),
            timers,
            _second_timer: second_timer,
            last_tick: None,
        };
        this.recompute(now);
        this
    }

    /// Displayed hand rotations, degrees clockwise from 12.
    pub fn hands(&self) -> Option<HandAngles> {
        Some(HandAngles {
            hour: self.hour.current()?,
            minute: self.minute.current()?,
            second: self.second.current()?,
        })
    }

    fn recompute(
        &mut self,
        now: Instant,
    ) {
        let time = self.anchor.time_at(now);
        let target = self.clock.update(time);
        self.hour.retarget(target.hour);
        self.minute.retarget(target.minute);
        self.second.retarget(target.second);

        let shift = self.clock.rebase_if_needed();
        for (hand, by) in [(&mut self.hour, shift.hour), (&mut self.minute, shift.minute), (&mut self.second, shift.second)] {
            if by != 0.0 {
                log::debug!("clock: rebased a hand by {by} degrees");
                hand.shift(by);
            }
        }
    }
}

impl Card for AnalogClockCard {
    fn set_hass(
        &mut self,
        _host: &dyn Host,
        _now: Instant,
    ) {
    }

    fn tick(
        &mut self,
        now: Instant,
    ) {
        let delta = delta_ms(self.last_tick, now);
        self.last_tick = Some(now);
        if !self.timers.poll(now).is_empty() {
            self.recompute(now);
        }
        self.hour.update(delta);
        self.minute.update(delta);
        self.second.update(delta);
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

        let radius = dial_radius(area, 4);
        if radius == 0 {
            return;
        }
        let center = Point::new(area.center().x, area.top_left.y + (TITLE_HEIGHT + radius) as i32 + 2);
        let r = radius as f32;
        draw_clock_face(display, center, r, GRAY);

        let Some(hands) = self.hands() else {
            return;
        };
        draw_needle(display, center, r * 0.5, hands.hour, WHITE, 3);
        draw_needle(display, center, r * 0.75, hands.minute, LABEL, 2);
        if self.show_seconds {
            draw_needle(display, center, r * 0.9, hands.second, RED, 1);
        }
        draw_hub(display, center, 5, ACCENT);
    }
}

// =============================================================================
// Digital Clock
// =============================================================================

pub struct DigitalClockCard {
    name: String,
    format: DigitalFormat,
    anchor: ClockAnchor,
    readout: DigitalReadout,
    timers: Scheduler<()>,
    _second_timer: TaskHandle,
}

impl DigitalClockCard {
    pub fn new(
        card: &DigitalClockCardConfig,
        anchor: ClockAnchor,
        now: Instant,
    ) -> Self {
        let format = DigitalFormat {
            hour12: card.hour12,
            show_seconds: card.show_seconds,
        };
        let mut timers = Scheduler::new();
        let second_timer = timers.schedule_repeating(now, CLOCK_PERIOD, ());
        Self {
            name: card.name.clone().unwrap_or_default(),
            format,
            anchor,
            readout: format_digital(anchor.time_at(now), format),
            timers,
            _second_timer: second_timer,
        }
    }

    #[inline]
    pub fn readout(&self) -> &str { &self.readout }
}

impl Card for DigitalClockCard {
    fn set_hass(
        &mut self,
        _host: &dyn Host,
        _now: Instant,
    ) {
    }

    fn tick(
        &mut self,
        now: Instant,
    ) {
        if !self.timers.poll(now).is_empty() {
            self.readout = format_digital(self.anchor.time_at(now), self.format);
        }
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
        let middle = Point::new(area.center().x, area.center().y + (TITLE_HEIGHT / 2) as i32);
        Text::with_text_style(&self.readout, middle, CLOCK_STYLE, MIDDLE_CENTERED)
            .draw(display)
            .ok();
    }
}

// =============================================================================
// Tests
// =============================================================================
