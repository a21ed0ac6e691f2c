//! Low-level drawing primitives shared across cards.
//!
//! Every function takes any `DrawTarget<Color = Rgb565>`, so cards draw the
//! same way into the simulator window, a test framebuffer, or a panel
//! driver. Draw errors are ignored (`.draw(display).ok()`): a failed
//! primitive must not stop the rest of the frame.
//!
//! # Card Background Inset
//!
//! `draw_card_background` fills the card rectangle with a 1px outline. The
//! layout already leaves a gap between cards, so no divider lines are drawn.

use dashboard_widgets_common::angles::{AngularRange, NEEDLE_REST_OFFSET, needle_tip};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle};
use embedded_graphics::text::{Text, TextStyle};

use crate::colors::{CARD_BG, GRAY};
use crate::styles::{CENTERED, LABEL_STYLE_WHITE};

/// Card fill with a subtle outline.
const CARD_STYLE: PrimitiveStyle<Rgb565> = PrimitiveStyleBuilder::new()
    .fill_color(CARD_BG)
    .stroke_color(GRAY)
    .stroke_width(1)
    .build();

/// Major ticks drawn along a dial arc (inclusive of both ends).
const DIAL_TICKS: u32 = 11;

/// Height reserved for a card title.
pub const TITLE_HEIGHT: u32 = 14;

/// Clear a card and draw its outline.
pub fn draw_card_background<D>(
    display: &mut D,
    area: Rectangle,
) where
    D: DrawTarget<Color = Rgb565>,
{
    area.into_styled(CARD_STYLE).draw(display).ok();
}

/// Draw a card title centered along the top edge.
pub fn draw_title<D>(
    display: &mut D,
    area: Rectangle,
    title: &str,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if title.is_empty() {
        return;
    }
    let x = area.center().x;
    let y = area.top_left.y + 11;
    Text::with_text_style(title, Point::new(x, y), LABEL_STYLE_WHITE, CENTERED)
        .draw(display)
        .ok();
}

/// Draw a single character. Used for per-slot odometer rendering.
pub fn draw_char<D>(
    display: &mut D,
    c: char,
    position: Point,
    style: MonoTextStyle<'_, Rgb565>,
    alignment: TextStyle,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let mut buf = [0u8; 4];
    let s = c.encode_utf8(&mut buf);
    Text::with_text_style(s, position, style, alignment).draw(display).ok();
}

/// Draw a straight needle from `center`, `rotation` degrees clockwise from
/// 12 o'clock, with a hub circle.
pub fn draw_needle<D>(
    display: &mut D,
    center: Point,
    length: f32,
    rotation: f32,
    color: Rgb565,
    width: u32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let tip = needle_tip(center, length, rotation);
    Line::new(center, tip)
        .into_styled(PrimitiveStyle::with_stroke(color, width))
        .draw(display)
        .ok();
}

/// Draw the hub that covers needle roots.
pub fn draw_hub<D>(
    display: &mut D,
    center: Point,
    diameter: u32,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    Circle::with_center(center, diameter)
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(display)
        .ok();
}

/// Draw tick marks along a gauge arc.
///
/// Angles come from the mapper's convention (0° right, clockwise), so each
/// tick is rotated by [`NEEDLE_REST_OFFSET`] like the needle itself.
pub fn draw_dial<D>(
    display: &mut D,
    center: Point,
    radius: f32,
    range: &AngularRange,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let style = PrimitiveStyle::with_stroke(color, 1);
    let inner = radius - (radius / 8.0).max(3.0);
    for i in 0..DIAL_TICKS {
        let angle = range.start_angle() + range.total_sweep() * i as f32 / (DIAL_TICKS - 1) as f32;
        let rotation = angle + NEEDLE_REST_OFFSET;
        Line::new(needle_tip(center, inner, rotation), needle_tip(center, radius, rotation))
            .into_styled(style)
            .draw(display)
            .ok();
    }
}

/// Draw twelve hour marks around a clock face.
pub fn draw_clock_face<D>(
    display: &mut D,
    center: Point,
    radius: f32,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    for hour in 0..12u8 {
        let rotation = f32::from(hour) * 30.0;
        let inner = if hour % 3 == 0 { radius * 0.8 } else { radius * 0.9 };
        Line::new(needle_tip(center, inner, rotation), needle_tip(center, radius, rotation))
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(display)
            .ok();
    }
}

/// Largest square dial radius that fits in `area` below the title and above
/// a readout of `footer` pixels.
pub fn dial_radius(
    area: Rectangle,
    footer: u32,
) -> u32 {
    let usable_h = area.size.height.saturating_sub(TITLE_HEIGHT + footer);
    (area.size.width.min(usable_h) / 2).saturating_sub(4)
}

// =============================================================================
// Tests
// =============================================================================
