//! Static text styles shared by every card.
//!
//! `MonoTextStyle` and `TextStyle` are `const`-constructible, so styles live
//! in read-only data instead of being rebuilt each frame. Cards that need a
//! dynamic color build `MonoTextStyle::new(LABEL_FONT, color)`; only the
//! color varies.

use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyle,
        ascii::{FONT_6X10, FONT_10X20},
    },
    pixelcolor::Rgb565,
    text::{Alignment, Baseline, TextStyle, TextStyleBuilder},
};
use profont::{PROFONT_18_POINT, PROFONT_24_POINT};

use crate::colors::{LABEL, PLACEHOLDER, WHITE};

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Centered text. Card titles, readouts, clock faces.
pub const CENTERED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Center).build();

/// Left-aligned text. Entity names and odometer slots.
pub const LEFT_ALIGNED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Left).build();

/// Right-aligned text. Entity states.
pub const RIGHT_ALIGNED: TextStyle = TextStyleBuilder::new().alignment(Alignment::Right).build();

/// Left-aligned, vertically centered on the anchor. Odometer slots roll
/// around this anchor.
pub const SLOT_ALIGNED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Middle)
    .build();

/// Centered both ways. Placeholder dashes and clock readouts.
pub const MIDDLE_CENTERED: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Middle)
    .build();

// =============================================================================
// Fonts
// =============================================================================

/// Small label font (6x10 pixels).
pub const LABEL_FONT: &MonoFont = &FONT_6X10;

/// Odometer digit font. Monospace, so every slot has the same pitch.
pub const DIGIT_FONT: &MonoFont = &PROFONT_18_POINT;

// =============================================================================
// Pre-computed Text Styles
// =============================================================================

/// Card titles.
pub const LABEL_STYLE_WHITE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_6X10, WHITE);

/// Units, entity names, secondary text.
pub const LABEL_STYLE_DIM: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_6X10, LABEL);

/// Medium text for button names and thermostat setpoints (10x20 pixels).
pub const TITLE_STYLE_WHITE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_10X20, WHITE);

/// Odometer digits.
pub const DIGIT_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_18_POINT, WHITE);

/// Placeholder dashes in the odometer area.
pub const PLACEHOLDER_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_18_POINT, PLACEHOLDER);

/// Large digital clock readout (`ProFont` 24pt).
pub const CLOCK_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_24_POINT, WHITE);
