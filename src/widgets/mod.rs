//! Visual components for the gauge dashboard.
//!
//! - [`dial_face`]: procedural normal and warning dial backgrounds
//! - [`gauge`]: [`GaugeWidget`], one dial with its redraw and blink state
//! - [`primitives`]: arcs, ticks and lamps shared by the face renderer
//!
//! # Drawing a Dial
//!
//! Every frame each widget:
//! 1. advances its gauge one step
//! 2. asks [`GaugeRenderState`](crate::render::GaugeRenderState) what needs doing
//! 3. recomputes the needle triangle if the value moved
//! 4. blits the face chosen by the blink phase and strokes the needle on top
//! 5. ticks the blink counter
//!
//! Faces are rendered once at startup, so a repaint is one image copy plus
//! one stroked triangle.

mod dial_face;
mod gauge;
mod primitives;

pub use dial_face::{DialFaces, FaceImage};
pub use gauge::GaugeWidget;
