//! Needle gauge with an odometer readout.
//!
//! ```text
//! ┌──────────────────┐
//! │   Outdoor temp   │  title
//! │    .  '  '  .    │
//! │  '     /      '  │  dial + needle (+ peak needle)
//! │ .     o        . │
//! │                  │
//! │    [ 0][6][8] °C │  odometer slots + unit
//! └──────────────────┘
//! ```
//!
//! Each host update runs the value through the lifecycle machine. A valid
//! value is clamped, mapped to an angle, resolved against the needle's
//! rotation memory, and eased to; the odometer steps its digits from the last
//! rendered value on a repeating timer. A read error only swaps the readout
//! for dashes: the needle, its rotation memory, and any odometer animation
//! are left exactly as they were.

use std::time::{Duration, Instant};

use dashboard_widgets_common::angles::NEEDLE_REST_OFFSET;
use dashboard_widgets_common::animations::NeedleTransition;
use dashboard_widgets_common::config::GaugeConfig;
use dashboard_widgets_common::lifecycle::{Transition, ValueLifecycle};
use dashboard_widgets_common::odometer::{FlipDisplay, PLACEHOLDER, RenderOutcome, SlotKind};
use dashboard_widgets_common::peak::{PeakHold, PeakMode};
use dashboard_widgets_common::rotation::RotationState;
use dashboard_widgets_common::warnings::WarningLedger;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Text;

use crate::colors::{ACCENT, GRAY, WHITE, YELLOW};
use crate::config::GaugeCardConfig;
use crate::host::{Host, read_number};
use crate::scheduler::{FrameQueue, Scheduler, TaskHandle};
use crate::styles::{DIGIT_FONT, DIGIT_STYLE, LABEL_STYLE_DIM, LEFT_ALIGNED, MIDDLE_CENTERED, PLACEHOLDER_STYLE, SLOT_ALIGNED};
use crate::widgets::Card;
use crate::widgets::primitives::{
    TITLE_HEIGHT,
    dial_radius,
    draw_card_background,
    draw_char,
    draw_dial,
    draw_hub,
    draw_needle,
    draw_title,
};

/// Space below the dial for the odometer row.
const READOUT_HEIGHT: u32 = 28;

/// Frames to wait before measuring digit glyphs, so the row is laid out.
const MEASURE_DEFER_FRAMES: u32 = 2;

/// How long a digit takes to roll from its old face to its new one.
const DIGIT_ROLL: Duration = Duration::from_millis(120);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GaugeTimer {
    OdometerStep,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FrameTask {
    MeasureDigits,
}

/// A digit roll in progress: slots with a previous face slide by `pitch`.
#[derive(Clone, Copy, Debug)]
struct DigitRoll {
    pitch: i32,
    started: Instant,
}

pub struct GaugeCard {
    entity: String,
    name: String,
    config: GaugeConfig,

    lifecycle: ValueLifecycle,
    rotation: RotationState,
    needle: NeedleTransition,

    peak: Option<PeakHold>,
    peak_needle: NeedleTransition,

    odometer: FlipDisplay,
    timers: Scheduler<GaugeTimer>,
    odometer_timer: Option<TaskHandle>,
    frames: FrameQueue<FrameTask>,
    roll: Option<DigitRoll>,

    warnings: WarningLedger,
    last_tick: Option<Instant>,
}

impl GaugeCard {
    pub fn new(card: &GaugeCardConfig) -> Self {
        let (config, corrections) = GaugeConfig::validated(card.raw());
        let mut warnings = WarningLedger::new();
        for correction in &corrections {
            warnings.report(format_args!("{}: {correction}", card.entity));
        }

        let duration_ms = config.animation_duration_ms();
        let unit = card.unit.as_deref().unwrap_or("");
        Self {
            entity: card.entity.clone(),
            name: card.name.clone().unwrap_or_else(|| card.entity.clone()),
            config,
            lifecycle: ValueLifecycle::new(),
            rotation: RotationState::new(),
            needle: NeedleTransition::new(duration_ms),
            peak: card
                .peak
                .map(|peak| PeakHold::new(PeakMode::from(peak.mode), peak.hold_ms)),
            peak_needle: NeedleTransition::new(duration_ms),
            odometer: FlipDisplay::new(config.odometer_format(), unit, duration_ms),
            timers: Scheduler::new(),
            odometer_timer: None,
            frames: FrameQueue::new(),
            roll: None,
            warnings,
            last_tick: None,
        }
    }

    #[inline]
    pub const fn config(&self) -> &GaugeConfig { &self.config }

    #[inline]
    pub const fn lifecycle(&self) -> &ValueLifecycle { &self.lifecycle }

    #[inline]
    pub const fn odometer(&self) -> &FlipDisplay { &self.odometer }

    /// Absolute needle angle currently drawn (mapper convention, no rest offset).
    #[inline]
    pub const fn needle_angle(&self) -> Option<f32> { self.needle.current() }

    /// Absolute angle the needle is heading to.
    #[inline]
    pub const fn target_angle(&self) -> Option<f32> { self.rotation.absolute_angle() }

    /// Value the peak needle marks, if the peak needle is enabled.
    pub fn peak_value(&self) -> Option<f32> { self.peak.as_ref().and_then(PeakHold::value) }

    /// Whether the odometer step timer is scheduled.
    pub fn odometer_timer_active(&self) -> bool { self.odometer_timer.as_ref().is_some_and(TaskHandle::is_active) }

    fn show(
        &mut self,
        value: f32,
        now: Instant,
    ) {
        let clamped = self.config.clamp(value);
        let target = self.config.angle_for(clamped);
        let absolute = self.rotation.advance(clamped, target);
        self.needle.retarget(absolute);
        log::trace!("{}: {value} -> {target} (absolute {absolute})", self.entity);

        if self.peak.as_mut().is_some_and(|peak| peak.observe(clamped)) {
            self.follow_peak();
        }

        match self.odometer.render_value(value) {
            RenderOutcome::Animating { interval_ms, .. } => {
                // Replacing the handle cancels any superseded step timer
                let period = Duration::from_millis(u64::from(interval_ms));
                self.odometer_timer = Some(self.timers.schedule_repeating(now, period, GaugeTimer::OdometerStep));
            }
            RenderOutcome::Snapped | RenderOutcome::Direct => {
                self.odometer_timer = None;
                self.frames.defer(MEASURE_DEFER_FRAMES, FrameTask::MeasureDigits);
            }
            RenderOutcome::Unchanged => {}
            RenderOutcome::Rejected(err) => {
                self.odometer_timer = None;
                self.warnings.report(format_args!("{}: {err}", self.entity));
            }
        }
    }

    fn follow_peak(&mut self) {
        let Some(peak) = self.peak.as_mut() else {
            return;
        };
        let Some(value) = peak.value() else {
            return;
        };
        let absolute = peak.rotation_mut().advance(value, self.config.angle_for(value));
        self.peak_needle.retarget(absolute);
    }

    fn step_odometer(&mut self) {
        if !self.odometer.is_animating() {
            return;
        }
        let more = self.odometer.step();
        self.frames.defer(MEASURE_DEFER_FRAMES, FrameTask::MeasureDigits);
        if !more {
            self.odometer_timer = None;
        }
    }

    /// Number of placeholder dashes: one per readout slot.
    fn placeholder_width(&self) -> usize {
        let slots = self
            .odometer
            .slots()
            .iter()
            .filter(|s| s.kind() != SlotKind::Unit)
            .count();
        if slots > 0 {
            return slots;
        }
        let format = self.odometer.format();
        let fraction = if format.decimals() > 0 { usize::from(format.decimals()) + 1 } else { 0 };
        usize::from(format.signed()) + format.integer_width() + fraction
    }

    fn draw_readout<D>(
        &self,
        display: &mut D,
        center_x: i32,
        middle_y: i32,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let pitch = (DIGIT_FONT.character_size.width + DIGIT_FONT.character_spacing) as i32;
        let glyph_h = DIGIT_FONT.character_size.height;

        if self.lifecycle.shows_placeholder() {
            let dashes: String = std::iter::repeat_n(PLACEHOLDER, self.placeholder_width()).collect();
            Text::with_text_style(&dashes, Point::new(center_x, middle_y), PLACEHOLDER_STYLE, MIDDLE_CENTERED)
                .draw(display)
                .ok();
            return;
        }

        let digits: Vec<_> = self
            .odometer
            .slots()
            .iter()
            .filter(|s| s.kind() != SlotKind::Unit)
            .collect();
        let unit = self.odometer.unit();
        let unit_w = if unit.is_empty() { 0 } else { unit.len() as i32 * 6 + 4 };
        let total_w = digits.len() as i32 * pitch + unit_w;
        let x0 = center_x - total_w / 2;

        let row = Rectangle::new(
            Point::new(x0, middle_y - glyph_h as i32 / 2),
            Size::new((digits.len() as i32 * pitch).max(0) as u32, glyph_h),
        );
        let mut clipped = display.clipped(&row);
        let progress = self.roll_progress();

        for (i, slot) in digits.iter().enumerate() {
            let x = x0 + i as i32 * pitch;
            match (slot.previous_face(), progress) {
                (Some(old), Some((pitch_y, p))) => {
                    let shift = (pitch_y as f32 * p) as i32;
                    draw_char(&mut clipped, old, Point::new(x, middle_y - shift), DIGIT_STYLE, SLOT_ALIGNED);
                    draw_char(&mut clipped, slot.face(), Point::new(x, middle_y + pitch_y - shift), DIGIT_STYLE, SLOT_ALIGNED);
                }
                _ => draw_char(&mut clipped, slot.face(), Point::new(x, middle_y), DIGIT_STYLE, SLOT_ALIGNED),
            }
        }

        if !unit.is_empty() {
            let x = x0 + digits.len() as i32 * pitch + 4;
            Text::with_text_style(unit, Point::new(x, middle_y + 4), LABEL_STYLE_DIM, LEFT_ALIGNED)
                .draw(display)
                .ok();
        }
    }

    /// Roll pitch and progress in `[0, 1)`, while a roll is running.
    fn roll_progress(&self) -> Option<(i32, f32)> {
        let roll = self.roll?;
        let elapsed = self.last_tick?.saturating_duration_since(roll.started);
        if elapsed >= DIGIT_ROLL {
            return None;
        }
        Some((roll.pitch, elapsed.as_secs_f32() / DIGIT_ROLL.as_secs_f32()))
    }
}

impl Card for GaugeCard {
    fn set_hass(
        &mut self,
        host: &dyn Host,
        now: Instant,
    ) {
        let reading = read_number(host, &self.entity);
        match self.lifecycle.observe(&self.entity, reading) {
            Transition::Failed { error, first: true } => {
                log::debug!("{}: showing placeholder ({error})", self.entity);
            }
            Transition::Failed { .. } => {}
            transition => {
                if let Some(value) = transition.value() {
                    self.show(value, now);
                }
            }
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

        self.needle.update(delta_ms);
        if self.peak.as_mut().is_some_and(|peak| peak.tick(delta_ms)) {
            self.follow_peak();
        }
        self.peak_needle.update(delta_ms);

        for timer in self.timers.poll(now) {
            match timer {
                GaugeTimer::OdometerStep => self.step_odometer(),
            }
        }

        for task in self.frames.next_frame() {
            match task {
                FrameTask::MeasureDigits => {
                    self.roll = Some(DigitRoll {
                        pitch: DIGIT_FONT.character_size.height as i32,
                        started: now,
                    });
                }
            }
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

        let radius = dial_radius(area, READOUT_HEIGHT);
        let center = Point::new(
            area.center().x,
            area.top_left.y + (TITLE_HEIGHT + radius) as i32 + 2,
        );
        if radius > 0 {
            draw_dial(display, center, radius as f32, &self.config.range(), GRAY);

            if self.peak.is_some()
                && let Some(angle) = self.peak_needle.current()
            {
                draw_needle(display, center, radius as f32 * 0.9, angle + NEEDLE_REST_OFFSET, YELLOW, 1);
            }
            if let Some(angle) = self.needle.current() {
                draw_needle(display, center, radius as f32 * 0.85, angle + NEEDLE_REST_OFFSET, WHITE, 2);
            }
            draw_hub(display, center, 7, ACCENT);
        }

        let readout_y = area.top_left.y + area.size.height as i32 - (READOUT_HEIGHT / 2) as i32;
        self.draw_readout(display, area.center().x, readout_y);
    }
}

// =============================================================================
// Tests
// =============================================================================
