//! Drawing surface abstraction.
//!
//! Dials only ever need three operations: paint a face image, stroke a
//! polygon, and push the finished frame to the screen. [`RenderSurface`]
//! captures exactly that plus input polling, so the render loop can run
//! against the SDL simulator window or against an in-memory recorder in tests.

use embedded_graphics::image::Image;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Polyline, PrimitiveStyle, Triangle};
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};

use crate::colors::BLACK;
use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::widgets::FaceImage;

/// Loop-control requests from the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Window closed, Escape or Q.
    Quit,
    /// F key.
    ToggleFullscreen,
}

/// Map a key press to a loop-control request.
#[inline]
pub fn key_action(keycode: Keycode) -> Option<InputEvent> {
    match keycode {
        Keycode::Escape | Keycode::Q => Some(InputEvent::Quit),
        Keycode::F => Some(InputEvent::ToggleFullscreen),
        _ => None,
    }
}

/// Something dials can be drawn on.
pub trait RenderSurface {
    /// Paint a face image with its top-left corner at `position`.
    fn blit(&mut self, face: &FaceImage, position: Point);

    /// Stroke a closed polygon through `points`.
    fn draw_polygon(&mut self, points: &[Point], color: Rgb565, stroke_width: u32);

    /// Show the finished frame.
    fn present(&mut self);

    /// Drain pending input.
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Switch between windowed and fullscreen presentation, if supported.
    fn set_fullscreen(&mut self, _fullscreen: bool) {}
}

/// Stroke a closed polygon on any draw target.
pub fn stroke_polygon<D>(target: &mut D, points: &[Point], color: Rgb565, stroke_width: u32)
where
    D: DrawTarget<Color = Rgb565>,
{
    let style = PrimitiveStyle::with_stroke(color, stroke_width);
    match points {
        [a, b, c] => {
            Triangle::new(*a, *b, *c).into_styled(style).draw(target).ok();
        }
        [first, ..] => {
            let mut closed = points.to_vec();
            closed.push(*first);
            Polyline::new(&closed).into_styled(style).draw(target).ok();
        }
        [] => {}
    }
}

// =============================================================================
// Simulator Window
// =============================================================================

/// SDL window backed by an `embedded-graphics` simulator display.
pub struct SimulatorSurface {
    display: SimulatorDisplay<Rgb565>,
    window: Window,
}

impl SimulatorSurface {
    /// Open the window and show a cleared frame.
    ///
    /// The simulator needs one `update()` before events can be polled.
    pub fn open(title: &str, scale: u32) -> Self {
        let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
        let output_settings = OutputSettingsBuilder::new().scale(scale.max(1)).build();
        let mut window = Window::new(title, &output_settings);

        display.clear(BLACK).ok();
        window.update(&display);

        Self { display, window }
    }
}

impl RenderSurface for SimulatorSurface {
    fn blit(&mut self, face: &FaceImage, position: Point) {
        let raw = face.raw();
        Image::new(&raw, position).draw(&mut self.display).ok();
    }

    fn draw_polygon(&mut self, points: &[Point], color: Rgb565, stroke_width: u32) {
        stroke_polygon(&mut self.display, points, color, stroke_width);
    }

    fn present(&mut self) { self.window.update(&self.display); }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.window
            .events()
            .filter_map(|ev| match ev {
                SimulatorEvent::Quit => Some(InputEvent::Quit),
                // Ignore OS key repeat so holding F does not flicker the mode
                SimulatorEvent::KeyDown { keycode, repeat: false, .. } => key_action(keycode),
                _ => None,
            })
            .collect()
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        // The simulator window has a fixed size and no mode switch.
        tracing::debug!(fullscreen, "fullscreen not supported by the simulator window");
    }
}

// =============================================================================
// Test Double
// =============================================================================
