//! Widget palette.
//!
//! All colors are `Rgb565` (5 bits red, 6 bits green, 5 bits blue), the
//! native format of the small SPI panels these cards are drawn on. Built-in
//! `RgbColor` constants are used where they exist.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Base Colors
// =============================================================================

/// Dashboard background behind the cards.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Primary text and needle color.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Heating setpoint and alert accents.
pub const RED: Rgb565 = Rgb565::RED;

/// Button "on" state.
pub const GREEN: Rgb565 = Rgb565::GREEN;

/// Peak-hold needle.
pub const YELLOW: Rgb565 = Rgb565::YELLOW;

// =============================================================================
// Card Colors
// =============================================================================

/// Card background. RGB565: (3, 6, 3).
pub const CARD_BG: Rgb565 = Rgb565::new(3, 6, 3);

/// Card outline and dial track. RGB565: (8, 16, 8), roughly 25% brightness.
pub const GRAY: Rgb565 = Rgb565::new(8, 16, 8);

/// Secondary labels (units, entity names). RGB565: (18, 36, 18).
pub const LABEL: Rgb565 = Rgb565::new(18, 36, 18);

/// Dial arc and thermostat liquid column. RGB565: (3, 40, 31).
pub const ACCENT: Rgb565 = Rgb565::new(3, 40, 31);

/// Placeholder glyph shown while a card has no valid value.
/// RGB565: (31, 32, 0), a darker orange than yellow.
pub const PLACEHOLDER: Rgb565 = Rgb565::new(31, 32, 0);
