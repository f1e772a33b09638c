// Crate-level lints: Allow common graphics patterns that pedantic lints flag
#![allow(clippy::cast_possible_truncation)] // Intentional f64->i32 casts for pixel math
#![allow(clippy::cast_precision_loss)] // u32/i32->f64 in geometry calculations
#![allow(clippy::cast_possible_wrap)] // u32->i32 wrapping is acceptable for screen coordinates
#![allow(clippy::cast_sign_loss)] // i32->u32 where we know sign is positive
#![allow(clippy::module_name_repetitions)]

//! Analog gauge dashboard for an ELM327-style OBD-II adapter.
//!
//! The dashboard polls four engine channels (coolant temperature, oil
//! temperature, fuel pressure, air flow) and renders each of them as a round
//! dial with a triangular needle and a blinking warning lamp.
//!
//! # Architecture
//!
//! ```text
//!  ValueSource ──read()──▶ Sampler thread ──set()──▶ SharedGauge ◀──advance()── Dashboard loop
//!  (obd | demo)            (500 ms cadence)          (per-gauge mutex)           (50 FPS, main thread)
//!                                                        ▲                               │
//!                                                        └────── IntroSequencer ◀────────┘
//! ```
//!
//! - [`gauge`]: the smoothing engine. [`gauge::GaugeState`] turns raw readings
//!   into a constant-velocity needle movement and evaluates the warning flag.
//! - [`sampler`]: background thread pulling from a [`source::ValueSource`].
//! - [`intro`]: tick-counted startup sweep (min, max, min) that gates the sampler.
//! - [`dashboard`]: the fixed-cadence render loop.
//! - [`widgets`]: procedural dial faces and the per-gauge draw logic.
//! - [`surface`]: the drawing seam, backed by `embedded-graphics-simulator`.
//!
//! # Frame Budget
//!
//! At 50 FPS each frame has 20 ms. A gauge whose needle is resting and whose
//! warning is inactive costs nothing: the face and needle are only redrawn
//! when the display value moved, while the lamp blinks, or on the first frame.

pub mod animations;
pub mod channel;
pub mod cli;
pub mod colors;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod gauge;
pub mod intro;
pub mod profiling;
pub mod render;
pub mod sampler;
pub mod source;
pub mod styles;
pub mod surface;
pub mod widgets;
