//! The gauge smoothing engine.
//!
//! - [`state`]: [`GaugeState`], the per-dial smoothing and warning logic
//! - [`geometry`]: degree-span normalization and needle triangle corners
//!
//! [`SharedGauge`] wraps a [`GaugeState`] in a mutex so the sampler thread
//! can retarget a dial while the render loop is advancing it.

mod geometry;
mod state;

use std::sync::Arc;

use parking_lot::Mutex;

pub use geometry::{AngleSpan, needle_points, polar, swept_radians};
pub use state::{Calibration, GaugeState, Motion, WarnDirection};

use crate::channel::Channel;

/// Everything the renderer needs from one `advance()`, read under one lock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaugeFrame {
    /// Whether the display value moved this frame.
    pub moved: bool,
    pub value: f64,
    pub warning: bool,
    pub angle: f64,
}

/// Thread-safe handle to one dial's state.
///
/// Cloning the handle shares the underlying state.
#[derive(Clone, Debug)]
pub struct SharedGauge {
    channel: Channel,
    state: Arc<Mutex<GaugeState>>,
}

impl SharedGauge {
    pub fn new(channel: Channel, calibration: Calibration) -> Self {
        Self { channel, state: Arc::new(Mutex::new(GaugeState::new(calibration))) }
    }

    #[inline]
    pub const fn channel(&self) -> Channel { self.channel }

    /// Retarget the dial. Safe to call from any thread at any time.
    #[inline]
    pub fn set(&self, value: f64, sample_window: u32) { self.state.lock().set(value, sample_window); }

    /// Advance one render frame and read back the result.
    pub fn advance(&self) -> GaugeFrame {
        let mut state = self.state.lock();
        let moved = state.advance();
        GaugeFrame {
            moved,
            value: state.current_value(),
            warning: state.is_warning(),
            angle: state.needle_angle(),
        }
    }

    /// Copy of the current state.
    #[inline]
    pub fn snapshot(&self) -> GaugeState { self.state.lock().clone() }

    /// Value range `(min, max)`.
    #[inline]
    pub fn range(&self) -> (f64, f64) {
        let state = self.state.lock();
        (state.min(), state.max())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    fn coolant() -> SharedGauge {
        SharedGauge::new(
            Channel::Coolant,
            Calibration {
                min: 40.0,
                max: 140.0,
                warn: 120.0,
                warn_direction: WarnDirection::Above,
                min_angle_deg: 269.0,
                max_angle_deg: 0.0,
            },
        )
    }

    #[test]
    fn test_clones_share_state() {
        let gauge = coolant();
        let writer = gauge.clone();
        writer.set(140.0, 1);
        let frame = gauge.advance();
        assert!(frame.moved);
        assert!((frame.value - 140.0).abs() < 1e-9, "Reader sees the writer's target");
        assert!(frame.warning);
    }

    #[test]
    fn test_range() {
        assert_eq!(coolant().range(), (40.0, 140.0));
    }

    #[test]
    fn test_concurrent_set_and_advance_stays_in_range() {
        let gauge = coolant();
        let writer = gauge.clone();

        let handle = thread::spawn(move || {
            for i in 0..1000u32 {
                // Sweeps well outside the range in both directions
                let value = f64::from(i % 37).mul_add(10.0, -60.0);
                writer.set(value, 1 + i % 10);
                if i % 100 == 0 {
                    thread::yield_now();
                }
            }
        });

        for _ in 0..1000 {
            let frame = gauge.advance();
            assert!((40.0..=140.0).contains(&frame.value), "Display left range: {}", frame.value);
        }
        handle.join().unwrap();

        let state = gauge.snapshot();
        assert!((40.0..=140.0).contains(&state.current_value()));
        assert!((40.0..=140.0).contains(&state.target_value()));
    }
}
