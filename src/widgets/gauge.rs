//! A dial on screen: shared gauge state plus everything needed to paint it.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use super::dial_face::DialFaces;
use crate::animations::BlinkPhase;
use crate::colors::rgb888;
use crate::config::{GaugeConfig, NEEDLE_STROKE};
use crate::gauge::{SharedGauge, needle_points};
use crate::render::GaugeRenderState;
use crate::surface::RenderSurface;

/// One dial at a fixed screen position.
pub struct GaugeWidget {
    gauge: SharedGauge,
    position: Point,
    center: Point,
    inner_radius: f64,
    outer_radius: f64,
    needle_color: Rgb565,
    faces: DialFaces,
    render_state: GaugeRenderState,
    blink: BlinkPhase,
    /// Needle triangle from the last recompute, in screen coordinates.
    needle: [Point; 3],
}

impl GaugeWidget {
    /// Build the widget and paint its faces.
    pub fn new(config: &GaugeConfig, gauge: SharedGauge) -> Self {
        let position = Point::new(config.x, config.y);
        let half = (config.size / 2) as i32;
        let [r, g, b] = config.needle_color;
        Self {
            gauge,
            position,
            center: position + Point::new(half, half),
            inner_radius: f64::from(config.inner_radius),
            outer_radius: f64::from(config.outer_radius),
            needle_color: rgb888(r, g, b),
            faces: DialFaces::render(config),
            render_state: GaugeRenderState::new(),
            blink: BlinkPhase::new(),
            needle: [position; 3],
        }
    }

    #[inline]
    pub const fn gauge(&self) -> &SharedGauge { &self.gauge }

    #[inline]
    pub const fn blink(&self) -> BlinkPhase { self.blink }

    /// Times this dial has been painted.
    #[inline]
    pub const fn paints(&self) -> u64 { self.render_state.paints() }

    /// Advance the gauge one frame and paint it if anything changed.
    ///
    /// Returns whether the dial was painted.
    pub fn draw<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let frame = self.gauge.advance();
        let plan = self.render_state.plan(frame.moved, frame.warning);

        if plan.needle {
            self.needle = needle_points(frame.angle, self.inner_radius, self.outer_radius, self.center);
        }
        if plan.paint {
            surface.blit(self.faces.get(self.blink.face(frame.warning)), self.position);
            surface.draw_polygon(&self.needle, self.needle_color, NEEDLE_STROKE);
            self.render_state.mark_painted();
        }

        self.blink.advance();
        self.render_state.end_frame();
        plan.paint
    }
}
