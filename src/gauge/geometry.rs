//! Needle angle and pointer geometry.
//!
//! Angles follow screen conventions: 0 rad points right (3 o'clock) and
//! positive angles turn clockwise because the y axis points down.
//!
//! # Degree Spans
//!
//! A dial is calibrated with two degree marks, `min_angle_deg` and
//! `max_angle_deg`. Each is converted to a "swept" radian amount, with `0°`
//! meaning a full turn (2π) rather than nothing. The usable scale is the full
//! circle minus the gap between the two marks:
//!
//! ```text
//! sweep = 2π - (max_rad - min_rad)
//! angle = sweep * frac - min_rad
//! ```
//!
//! With the stock `269° / 0°` calibration the needle rests pointing straight
//! down at the minimum and sweeps clockwise 269° to 3 o'clock at the
//! maximum.

use std::f64::consts::TAU;

use embedded_graphics::prelude::Point;

use crate::config::NEEDLE_HALF_WIDTH;

/// Convert a degree mark to swept radians. `0°` means a full turn.
#[inline]
#[allow(clippy::float_cmp)]
pub fn swept_radians(degrees: f64) -> f64 {
    if degrees == 0.0 { TAU } else { TAU * degrees / 360.0 }
}

/// Angular calibration of one dial.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngleSpan {
    min_rad: f64,
    max_rad: f64,
}

impl AngleSpan {
    pub fn from_degrees(min_deg: f64, max_deg: f64) -> Self {
        Self { min_rad: swept_radians(min_deg), max_rad: swept_radians(max_deg) }
    }

    /// Radians covered between the minimum and maximum marks.
    #[inline]
    pub fn sweep(&self) -> f64 { TAU - (self.max_rad - self.min_rad) }

    /// Angle for a normalized position (`0.0` at min, `1.0` at max).
    #[inline]
    pub fn angle_at(&self, frac: f64) -> f64 { self.sweep().mul_add(frac, -self.min_rad) }

    /// Angle of the minimum mark.
    #[inline]
    pub fn start(&self) -> f64 { -self.min_rad }

    /// Angle of the maximum mark.
    #[inline]
    pub fn end(&self) -> f64 { self.angle_at(1.0) }
}

/// Point at `radius` pixels from `center` in direction `angle`.
#[inline]
pub fn polar(center: Point, angle: f64, radius: f64) -> Point {
    Point::new(
        center.x + (angle.cos() * radius).round() as i32,
        center.y + (angle.sin() * radius).round() as i32,
    )
}

/// The three corners of the pointer triangle for a needle at `angle`.
///
/// Two base corners sit on the inner radius either side of the needle axis,
/// the tip sits on the outer radius.
pub fn needle_points(angle: f64, inner_radius: f64, outer_radius: f64, center: Point) -> [Point; 3] {
    [
        polar(center, angle + NEEDLE_HALF_WIDTH, inner_radius),
        polar(center, angle, outer_radius),
        polar(center, angle - NEEDLE_HALF_WIDTH, inner_radius),
    ]
}
