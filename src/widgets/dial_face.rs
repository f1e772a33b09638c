//! Procedural dial faces.
//!
//! Each dial needs two pre-rendered backgrounds: the normal face and the
//! warning face with the lamp lit. Both are painted once at startup into
//! [`FaceImage`]s, big-endian RGB565 buffers that the render loop blits with
//! `ImageRawBE` every time the dial repaints.
//!
//! # Face Layout
//!
//! ```text
//!            ╭──── major tick + label every 1/5 of the range
//!      ·  ·  |  ·  ·
//!   ·                ·      scale arc on the needle's outer radius,
//!  ·        hub       ·     red over the warning zone
//!  ·         ●        ·
//!   ·            TITLE      title and lamp sit in the middle of the
//!      ·          (●)       gap between the max and min marks
//! ```

use core::fmt::Write;
use std::f64::consts::TAU;

use embedded_graphics::image::ImageRawBE;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle};
use embedded_graphics::text::Text;
use heapless::String;

use super::primitives::{draw_arc, draw_lamp, draw_tick};
use crate::animations::FaceVariant;
use crate::colors::{BLACK, DARK_RED, GRAY, ORANGE, RED, WHITE};
use crate::config::GaugeConfig;
use crate::gauge::{AngleSpan, WarnDirection, polar};
use crate::styles::{CENTERED, SCALE_STYLE_LARGE, SCALE_STYLE_SMALL, TITLE_STYLE, TITLE_STYLE_WARNING};

/// Major scale divisions (labels at both ends and 4 in between).
const MAJOR_DIVISIONS: u32 = 5;

/// Minor ticks per major division.
const MINOR_PER_MAJOR: u32 = 4;

/// Dials with an outer radius above this get the large label font.
const LARGE_DIAL_RADIUS: u32 = 120;

// =============================================================================
// Image Buffer
// =============================================================================

/// A pre-rendered dial face, stored as big-endian RGB565.
pub struct FaceImage {
    size: Size,
    variant: FaceVariant,
    data: Vec<u8>,
}

impl FaceImage {
    /// Raw image view for `embedded_graphics::image::Image`.
    #[inline]
    pub fn raw(&self) -> ImageRawBE<'_, Rgb565> { ImageRawBE::new(&self.data, self.size.width) }

    #[inline]
    pub const fn size(&self) -> Size { self.size }

    #[inline]
    pub const fn variant(&self) -> FaceVariant { self.variant }

    /// Color at `p`, if inside the image.
    #[cfg(test)]
    fn pixel(&self, p: Point) -> Option<Rgb565> {
        use embedded_graphics::pixelcolor::raw::RawU16;

        let idx = pixel_index(self.size, p)? * 2;
        let raw = u16::from_be_bytes([self.data[idx], self.data[idx + 1]]);
        Some(Rgb565::from(RawU16::new(raw)))
    }
}

#[inline]
fn pixel_index(size: Size, p: Point) -> Option<usize> {
    let (x, y) = (u32::try_from(p.x).ok()?, u32::try_from(p.y).ok()?);
    (x < size.width && y < size.height).then(|| (y * size.width + x) as usize)
}

/// Off-screen draw target a face is painted into.
struct FaceCanvas {
    size: Size,
    pixels: Vec<Rgb565>,
}

impl FaceCanvas {
    fn new(size: Size) -> Self { Self { size, pixels: vec![BLACK; (size.width * size.height) as usize] } }

    fn into_image(self, variant: FaceVariant) -> FaceImage {
        let data = self.pixels.iter().flat_map(|&c| c.into_storage().to_be_bytes()).collect();
        FaceImage { size: self.size, variant, data }
    }
}

impl OriginDimensions for FaceCanvas {
    fn size(&self) -> Size { self.size }
}

impl DrawTarget for FaceCanvas {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(idx) = pixel_index(self.size, point) {
                self.pixels[idx] = color;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Face Rendering
// =============================================================================

/// Normal and warning faces for one dial.
pub struct DialFaces {
    pub normal: FaceImage,
    pub warning: FaceImage,
}

impl DialFaces {
    /// Paint both faces for a dial. Dials without a warning lamp get two
    /// identical faces.
    pub fn render(config: &GaugeConfig) -> Self {
        let normal = render_face(config, FaceVariant::Normal);
        let warning = if config.warning_lamp {
            render_face(config, FaceVariant::Warning)
        } else {
            let mut copy = render_face(config, FaceVariant::Normal);
            copy.variant = FaceVariant::Warning;
            copy
        };
        Self { normal, warning }
    }

    #[inline]
    pub const fn get(&self, variant: FaceVariant) -> &FaceImage {
        match variant {
            FaceVariant::Normal => &self.normal,
            FaceVariant::Warning => &self.warning,
        }
    }
}

/// Angle in the middle of the unused part of the dial.
fn gap_angle(span: &AngleSpan) -> f64 {
    let gap = TAU - span.sweep();
    if gap > 0.0 { span.end() + gap / 2.0 } else { TAU / 4.0 }
}

/// Format a scale label, with one decimal on narrow ranges.
fn scale_label(value: f64, range: f64) -> String<12> {
    let mut s = String::new();
    if range <= 10.0 {
        write!(s, "{value:.1}").ok();
    } else {
        write!(s, "{value:.0}").ok();
    }
    s
}

fn render_face(config: &GaugeConfig, variant: FaceVariant) -> FaceImage {
    let mut canvas = FaceCanvas::new(Size::new_equal(config.size));
    let half = (config.size / 2) as i32;
    let center = Point::new(half, half);
    let span = AngleSpan::from_degrees(config.min_angle_deg, config.max_angle_deg);
    let outer = f64::from(config.outer_radius);
    let range = config.max - config.min;
    let warning = variant == FaceVariant::Warning;
    let angle_of = |value: f64| span.angle_at((value - config.min) / range);

    // Rim
    Circle::with_center(center, config.size - 2)
        .into_styled(PrimitiveStyle::with_stroke(GRAY, 2))
        .draw(&mut canvas)
        .ok();

    // Scale arc, red over the warning zone
    let warn_angle = angle_of(config.warn);
    let (safe, hazard) = match config.warn_direction {
        WarnDirection::Above => ((span.start(), warn_angle), (warn_angle, span.end())),
        WarnDirection::Below => ((warn_angle, span.end()), (span.start(), warn_angle)),
    };
    draw_arc(&mut canvas, center, outer, safe.0, safe.1, ORANGE, 2);
    draw_arc(&mut canvas, center, outer, hazard.0, hazard.1, RED, 4);

    // Ticks and labels
    let label_style: MonoTextStyle<'static, Rgb565> =
        if config.outer_radius > LARGE_DIAL_RADIUS { SCALE_STYLE_LARGE } else { SCALE_STYLE_SMALL };
    let label_radius = outer * 0.72;
    let major_len = outer * 0.12;
    let minor_len = outer * 0.05;
    let total_ticks = MAJOR_DIVISIONS * MINOR_PER_MAJOR;
    for i in 0..=total_ticks {
        let frac = f64::from(i) / f64::from(total_ticks);
        let angle = span.angle_at(frac);
        if i % MINOR_PER_MAJOR == 0 {
            draw_tick(&mut canvas, center, angle, outer, major_len, WHITE, 2);
            let label = scale_label(frac.mul_add(range, config.min), range);
            Text::with_text_style(&label, polar(center, angle, label_radius), label_style, CENTERED)
                .draw(&mut canvas)
                .ok();
        } else {
            draw_tick(&mut canvas, center, angle, outer, minor_len, GRAY, 1);
        }
    }

    // Title and lamp in the gap
    let gap = gap_angle(&span);
    let title_style = if warning { TITLE_STYLE_WARNING } else { TITLE_STYLE };
    let title_pos = polar(center, gap, outer * 0.45);
    Text::with_text_style(config.channel.label(), title_pos, title_style, CENTERED).draw(&mut canvas).ok();
    Text::with_text_style(config.channel.unit(), title_pos + Point::new(0, 18), SCALE_STYLE_SMALL, CENTERED)
        .draw(&mut canvas)
        .ok();

    let lamp_diameter = (config.outer_radius / 6).max(8);
    let (lamp_fill, lamp_outline) = if warning { (RED, WHITE) } else { (DARK_RED, GRAY) };
    draw_lamp(&mut canvas, polar(center, gap, outer * 0.78), lamp_diameter, lamp_fill, lamp_outline);

    // Hub
    Circle::with_center(center, config.inner_radius)
        .into_styled(PrimitiveStyle::with_fill(GRAY))
        .draw(&mut canvas)
        .ok();

    canvas.into_image(variant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;

    fn coolant_config() -> GaugeConfig { DashboardConfig::default().gauges[1].clone() }

    fn lamp_center(config: &GaugeConfig) -> Point {
        let span = AngleSpan::from_degrees(config.min_angle_deg, config.max_angle_deg);
        let half = (config.size / 2) as i32;
        polar(Point::new(half, half), gap_angle(&span), f64::from(config.outer_radius) * 0.78)
    }

    #[test]
    fn test_face_buffer_size() {
        let config = coolant_config();
        let faces = DialFaces::render(&config);
        assert_eq!(faces.normal.size(), Size::new(200, 200));
        assert_eq!(faces.normal.data.len(), 200 * 200 * 2, "Two bytes per RGB565 pixel");
        assert_eq!(faces.get(FaceVariant::Warning).variant(), FaceVariant::Warning);
    }

    #[test]
    fn test_lamp_lit_only_on_warning_face() {
        let config = coolant_config();
        let faces = DialFaces::render(&config);
        let lamp = lamp_center(&config);
        assert_eq!(faces.warning.pixel(lamp), Some(RED), "Warning face has a lit lamp");
        assert_eq!(faces.normal.pixel(lamp), Some(DARK_RED), "Normal face has a dark lamp");
    }

    #[test]
    fn test_lampless_dial_has_identical_faces() {
        let mut config = coolant_config();
        config.warning_lamp = false;
        let faces = DialFaces::render(&config);
        assert_eq!(faces.normal.data, faces.warning.data, "Faces must match without a lamp");
        assert_eq!(faces.warning.variant(), FaceVariant::Warning);
    }

    #[test]
    fn test_hub_and_background() {
        let config = coolant_config();
        let face = DialFaces::render(&config).normal;
        assert_eq!(face.pixel(Point::new(100, 100)), Some(GRAY), "Hub fills the center");
        assert_eq!(face.pixel(Point::new(3, 3)), Some(BLACK), "Corners stay black");
        assert_eq!(face.pixel(Point::new(200, 0)), None, "Out of bounds");
    }

    #[test]
    fn test_stock_gap_is_bottom_right() {
        let span = AngleSpan::from_degrees(269.0, 0.0);
        let gap = gap_angle(&span);
        assert!(gap > 0.0 && gap < TAU / 4.0, "Gap between 3 and 6 o'clock, got {gap}");
    }

    #[test]
    fn test_scale_label_precision() {
        assert_eq!(scale_label(2.0, 5.0).as_str(), "2.0", "Narrow ranges get a decimal");
        assert_eq!(scale_label(100.0, 500.0).as_str(), "100");
    }
}
