//! Color constants for the gauge dashboard.
//!
//! Standard colors come from the `RgbColor` trait constants; the dial palette
//! is hand-picked in Rgb565 space (5 bits red, 6 bits green, 5 bits blue).

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Standard Colors (from RgbColor trait)
// =============================================================================

/// Pure black (0, 0, 0). Screen and dial background.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white (31, 63, 31). Scale labels and major ticks.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Pure red (31, 0, 0). Warning scale and lit lamp.
pub const RED: Rgb565 = Rgb565::RED;

// =============================================================================
// Dial Palette
// =============================================================================

/// Orange accent for the scale arc of a healthy dial.
/// RGB565: (31, 32, 0).
pub const ORANGE: Rgb565 = Rgb565::new(31, 32, 0);

/// Dark gray for the dial rim and minor ticks.
/// RGB565: (8, 16, 8) - roughly 25% brightness.
pub const GRAY: Rgb565 = Rgb565::new(8, 16, 8);

/// Dim red for an unlit warning lamp.
/// RGB565: (10, 0, 0).
pub const DARK_RED: Rgb565 = Rgb565::new(10, 0, 0);

/// Default needle color, (200, 0, 0) in 24-bit RGB.
pub const NEEDLE_RED: Rgb565 = rgb888(200, 0, 0);

/// Convert a 24-bit RGB triple to Rgb565 by dropping the low bits.
#[inline]
pub const fn rgb888(r: u8, g: u8, b: u8) -> Rgb565 {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}
