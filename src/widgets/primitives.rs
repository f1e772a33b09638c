//! Low-level drawing primitives shared by the dial face renderer.
//!
//! All functions are generic over the draw target so the same code paints
//! into an in-memory face image or straight onto the display.
//!
//! # Scale Arcs
//!
//! Scale arcs are stroked as short line segments between points produced by
//! [`polar`], the same function that places the needle. Building the arc
//! from the needle's own trigonometry keeps scale and pointer in agreement
//! for any calibration, including sweeps that cross the 0 rad mark.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle};

use crate::gauge::polar;

/// Radians per arc segment. About 2.3°, smooth at a 185 px radius.
const ARC_SEGMENT_RAD: f64 = 0.04;

/// Stroke an arc from angle `from` clockwise to `to`.
///
/// # Parameters
/// - `center`: Arc center in target coordinates
/// - `radius`: Arc radius in pixels
/// - `from`, `to`: Angles in radians, `to >= from`
/// - `color`, `width`: Stroke style
pub fn draw_arc<D>(target: &mut D, center: Point, radius: f64, from: f64, to: f64, color: Rgb565, width: u32)
where
    D: DrawTarget<Color = Rgb565>,
{
    if to <= from {
        return;
    }
    let style = PrimitiveStyle::with_stroke(color, width);
    let segments = ((to - from) / ARC_SEGMENT_RAD).ceil().max(1.0) as u32;
    let step = (to - from) / f64::from(segments);

    let mut prev = polar(center, from, radius);
    for i in 1..=segments {
        let next = polar(center, step.mul_add(f64::from(i), from), radius);
        Line::new(prev, next).into_styled(style).draw(target).ok();
        prev = next;
    }
}

/// Draw a radial tick mark pointing inward from `radius`.
///
/// # Parameters
/// - `angle`: Direction of the tick in radians
/// - `radius`: Outer end of the tick
/// - `length`: Tick length toward the center
pub fn draw_tick<D>(target: &mut D, center: Point, angle: f64, radius: f64, length: f64, color: Rgb565, width: u32)
where
    D: DrawTarget<Color = Rgb565>,
{
    Line::new(polar(center, angle, radius), polar(center, angle, radius - length))
        .into_styled(PrimitiveStyle::with_stroke(color, width))
        .draw(target)
        .ok();
}

/// Draw a lamp: a filled disc with a thin outline.
pub fn draw_lamp<D>(target: &mut D, center: Point, diameter: u32, fill: Rgb565, outline: Rgb565)
where
    D: DrawTarget<Color = Rgb565>,
{
    Circle::with_center(center, diameter).into_styled(PrimitiveStyle::with_fill(fill)).draw(target).ok();
    Circle::with_center(center, diameter).into_styled(PrimitiveStyle::with_stroke(outline, 1)).draw(target).ok();
}
