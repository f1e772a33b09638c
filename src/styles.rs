//! Pre-computed static text styles for dial faces.
//!
//! All styles are `const` so the faces can be rendered without building
//! style objects per label.

use embedded_graphics::{
    mono_font::{
        MonoTextStyle,
        ascii::{FONT_6X10, FONT_10X20},
    },
    pixelcolor::Rgb565,
    text::{Alignment, Baseline, TextStyle, TextStyleBuilder},
};
use profont::PROFONT_18_POINT;

use crate::colors::{RED, WHITE};

/// Text centered on its anchor point both ways. Used for scale labels and dial titles.
pub const CENTERED: TextStyle =
    TextStyleBuilder::new().alignment(Alignment::Center).baseline(Baseline::Middle).build();

/// Small white text for scale numbers on small dials.
pub const SCALE_STYLE_SMALL: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_6X10, WHITE);

/// Larger white text for scale numbers on big dials.
pub const SCALE_STYLE_LARGE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&FONT_10X20, WHITE);

/// Dial title (`ProFont` 18pt) on a healthy face.
pub const TITLE_STYLE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_18_POINT, WHITE);

/// Dial title on a warning face.
pub const TITLE_STYLE_WARNING: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(&PROFONT_18_POINT, RED);
