//! Per-gauge smoothing and warning state.
//!
//! # Smoothing Model
//!
//! A reading never moves the needle directly. [`GaugeState::set`] only records
//! a new target and derives a fixed per-frame step from the distance to the
//! previous target:
//!
//! ```text
//! step = |target - previous_target| / sample_window
//! ```
//!
//! [`GaugeState::advance`], called once per render frame, then walks the
//! display value toward the target by exactly that step. The result is
//! constant-velocity linear motion that covers a full transition in
//! `sample_window` frames, re-planned every time a new target arrives.
//!
//! # Motion State Machine
//!
//! ```text
//!            set() with target > previous        set() with target < previous
//!   Idle ───────────────────────────────▶ Up     Idle ─────────────────────────▶ Down
//!    ▲                                     │       ▲                               │
//!    └──── advance() reaches target ───────┘       └──── advance() reaches target ─┘
//! ```
//!
//! The direction comes from `target - previous_target`, not from where the
//! display currently sits. If a new target lands on the far side of a display
//! value that is still catching up, the motion is exhausted on the first
//! `advance()` and the gauge idles until the next `set()`.
//!
//! # Warning
//!
//! The warning flag is a pure function of the display value and the
//! threshold, evaluated on demand. It never looks at the blink phase.

use serde::{Deserialize, Serialize};

use super::geometry::AngleSpan;

/// Slack, relative to the step, when deciding the display has arrived.
/// Absorbs float error so `n` steps of `d / n` land exactly on the target.
const ARRIVAL_SLACK: f64 = 1e-6;

/// Which side of the threshold is the hazard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnDirection {
    /// Warn while the value is above the threshold (temperatures).
    #[default]
    Above,
    /// Warn while the value is below the threshold (fuel pressure).
    Below,
}

/// Direction the display value is currently travelling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    Idle,
    ConvergingUp,
    ConvergingDown,
}

/// Static calibration of one dial.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    pub min: f64,
    pub max: f64,
    pub warn: f64,
    pub warn_direction: WarnDirection,
    pub min_angle_deg: f64,
    pub max_angle_deg: f64,
}

/// Smoothing engine for one dial.
///
/// The display value starts at the minimum and always stays inside
/// `[min, max]`.
#[derive(Clone, Debug)]
pub struct GaugeState {
    min: f64,
    max: f64,
    warn: f64,
    warn_direction: WarnDirection,
    span: AngleSpan,

    target: f64,
    previous_target: f64,
    display: f64,
    step: f64,
    motion: Motion,
}

impl GaugeState {
    pub fn new(calibration: Calibration) -> Self {
        let Calibration { min, max, warn, warn_direction, min_angle_deg, max_angle_deg } = calibration;
        Self {
            min,
            max,
            warn,
            warn_direction,
            span: AngleSpan::from_degrees(min_angle_deg, max_angle_deg),
            target: min,
            previous_target: min,
            display: min,
            step: 0.0,
            motion: Motion::Idle,
        }
    }

    /// Clamp a raw reading into the dial range. NaN reads as the minimum.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() { self.min } else { value.clamp(self.min, self.max) }
    }

    /// Record a new target, spreading the move over `sample_window` frames.
    ///
    /// Does not touch the display value. A window of zero is treated as one.
    pub fn set(&mut self, value: f64, sample_window: u32) {
        self.previous_target = self.target;
        self.target = self.clamp(value);

        let delta = self.target - self.previous_target;
        self.step = delta.abs() / f64::from(sample_window.max(1));
        self.motion = if delta > 0.0 {
            Motion::ConvergingUp
        } else if delta < 0.0 {
            Motion::ConvergingDown
        } else {
            Motion::Idle
        };
    }

    /// Move the display value one step toward the target.
    ///
    /// Returns `true` when the display value changed.
    #[allow(clippy::float_cmp)]
    pub fn advance(&mut self) -> bool {
        let before = self.display;
        match self.motion {
            Motion::ConvergingUp if self.display < self.target => {
                let next = self.display + self.step;
                self.display = if self.target - next <= self.step * ARRIVAL_SLACK { self.target } else { next };
                self.display = self.display.min(self.max);
            }
            Motion::ConvergingDown if self.display > self.target => {
                let next = self.display - self.step;
                self.display = if next - self.target <= self.step * ARRIVAL_SLACK { self.target } else { next };
                self.display = self.display.max(self.min);
            }
            _ => self.go_idle(),
        }

        // Arrival ends the motion on the same frame.
        if self.display == self.target {
            self.go_idle();
        }

        self.display != before
    }

    #[inline]
    fn go_idle(&mut self) {
        self.step = 0.0;
        self.motion = Motion::Idle;
    }

    /// The smoothed value currently shown.
    #[inline]
    pub const fn current_value(&self) -> f64 { self.display }

    #[inline]
    pub const fn target_value(&self) -> f64 { self.target }

    #[inline]
    pub const fn step_size(&self) -> f64 { self.step }

    #[inline]
    pub const fn motion(&self) -> Motion { self.motion }

    #[inline]
    pub const fn min(&self) -> f64 { self.min }

    #[inline]
    pub const fn max(&self) -> f64 { self.max }

    #[inline]
    pub const fn span(&self) -> AngleSpan { self.span }

    /// Whether the display value is on the hazardous side of the threshold.
    #[inline]
    pub fn is_warning(&self) -> bool {
        match self.warn_direction {
            WarnDirection::Above => self.display > self.warn,
            WarnDirection::Below => self.display < self.warn,
        }
    }

    /// Position of the display value in the range, `0.0..=1.0`.
    #[inline]
    pub fn fraction(&self) -> f64 { (self.display - self.min) / (self.max - self.min) }

    /// Needle angle in radians for the display value.
    #[inline]
    pub fn needle_angle(&self) -> f64 { self.span.angle_at(self.fraction()) }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;

    use proptest::prelude::*;

    use super::*;

    const EPS: f64 = 1e-9;

    fn water() -> GaugeState {
        GaugeState::new(Calibration {
            min: 40.0,
            max: 140.0,
            warn: 120.0,
            warn_direction: WarnDirection::Above,
            min_angle_deg: 269.0,
            max_angle_deg: 0.0,
        })
    }

    fn fuel() -> GaugeState {
        GaugeState::new(Calibration {
            min: 0.0,
            max: 5.0,
            warn: 1.0,
            warn_direction: WarnDirection::Below,
            min_angle_deg: 269.0,
            max_angle_deg: 0.0,
        })
    }

    fn settle(gauge: &mut GaugeState) -> usize {
        let mut ticks = 0;
        while gauge.advance() {
            ticks += 1;
            assert!(ticks < 10_000, "Gauge never settled");
        }
        ticks
    }

    // -------------------------------------------------------------------------
    // set()
    // -------------------------------------------------------------------------

    #[test]
    fn test_new_gauge_rests_at_min() {
        let gauge = water();
        assert!((gauge.current_value() - 40.0).abs() < EPS);
        assert_eq!(gauge.motion(), Motion::Idle);
        assert!(!gauge.is_warning(), "Resting gauge must not warn");
    }

    #[test]
    fn test_set_does_not_move_display() {
        let mut gauge = water();
        gauge.set(100.0, 10);
        assert!((gauge.current_value() - 40.0).abs() < EPS, "set() must leave the display alone");
        assert!((gauge.target_value() - 100.0).abs() < EPS);
        assert!((gauge.step_size() - 6.0).abs() < EPS, "step = |100 - 40| / 10");
        assert_eq!(gauge.motion(), Motion::ConvergingUp);
    }

    #[test]
    fn test_set_clamps_out_of_range() {
        let mut gauge = water();
        gauge.set(500.0, 10);
        assert!((gauge.target_value() - 140.0).abs() < EPS, "Above max clamps to max");
        gauge.set(-20.0, 10);
        assert!((gauge.target_value() - 40.0).abs() < EPS, "Below min clamps to min");
        assert_eq!(gauge.motion(), Motion::ConvergingDown);
    }

    #[test]
    fn test_set_nan_reads_as_min() {
        let mut gauge = water();
        gauge.set(f64::NAN, 10);
        assert!((gauge.target_value() - 40.0).abs() < EPS);
        assert_eq!(gauge.motion(), Motion::Idle, "No distance to cover");
    }

    #[test]
    fn test_set_same_value_is_idle() {
        let mut gauge = water();
        gauge.set(90.0, 10);
        gauge.set(90.0, 10);
        assert!(gauge.step_size().abs() < EPS, "Unchanged target has no step");
        assert_eq!(gauge.motion(), Motion::Idle);
    }

    #[test]
    fn test_zero_window_treated_as_one() {
        let mut gauge = water();
        gauge.set(140.0, 0);
        assert!(gauge.advance());
        assert!((gauge.current_value() - 140.0).abs() < EPS, "Window of 0 jumps in one frame");
    }

    // -------------------------------------------------------------------------
    // advance()
    // -------------------------------------------------------------------------

    #[test]
    fn test_linear_sweep_to_max() {
        let mut gauge = water();
        gauge.set(140.0, 10);
        for call in 1..=10 {
            assert!(gauge.advance(), "Call {call} should move the needle");
            if call == 5 {
                assert!((gauge.current_value() - 90.0).abs() < EPS, "Halfway after 5 calls");
            }
        }
        assert!((gauge.current_value() - 140.0).abs() < EPS, "Arrived after 10 calls");
        assert_eq!(gauge.motion(), Motion::Idle);
        assert!(!gauge.advance(), "Arrived gauge does not move");
    }

    #[test]
    fn test_downward_sweep() {
        let mut gauge = water();
        gauge.set(140.0, 1);
        gauge.advance();
        gauge.set(40.0, 4);
        assert_eq!(settle(&mut gauge), 4, "100 units at 25 per frame");
        assert!((gauge.current_value() - 40.0).abs() < EPS);
    }

    #[test]
    fn test_arrival_snaps_despite_float_error() {
        let mut gauge = water();
        // 100 / 3 is not representable, three steps do not sum to exactly 100
        gauge.set(140.0, 3);
        assert_eq!(settle(&mut gauge), 3, "Three frames, no extra frame for rounding dust");
        assert!(gauge.current_value() <= 140.0);
        assert!((gauge.current_value() - 140.0).abs() < f64::EPSILON, "Lands exactly on the target");
        assert_eq!(gauge.motion(), Motion::Idle);
    }

    #[test]
    fn test_retarget_mid_sweep() {
        let mut gauge = water();
        gauge.set(140.0, 10);
        for _ in 0..3 {
            gauge.advance();
        }
        // Display at 70, new target 120 is still above it
        gauge.set(120.0, 10);
        assert_eq!(gauge.motion(), Motion::ConvergingDown, "Direction follows target - previous target");
        assert!(!gauge.advance(), "Display below a lower target has nothing to do");
        assert_eq!(gauge.motion(), Motion::Idle);
        assert!((gauge.current_value() - 70.0).abs() < EPS, "Display waits for the next set()");

        gauge.set(130.0, 10);
        assert_eq!(settle(&mut gauge), 60, "60 units at 1 per frame");
        assert!((gauge.current_value() - 130.0).abs() < EPS);
    }

    // -------------------------------------------------------------------------
    // Warning
    // -------------------------------------------------------------------------

    #[test]
    fn test_warning_follows_display_not_target() {
        let mut gauge = water();
        gauge.set(140.0, 10);
        assert!(!gauge.is_warning(), "Target alone must not trigger the warning");
        for _ in 0..8 {
            gauge.advance();
        }
        // 40 + 8 * 10 = 120, not strictly above
        assert!(!gauge.is_warning(), "Exactly at threshold is not a warning");
        gauge.advance();
        assert!(gauge.is_warning(), "130 is above the 120 threshold");
    }

    #[test]
    fn test_inverted_warning() {
        let mut gauge = fuel();
        assert!(gauge.is_warning(), "Zero fuel pressure is below the 1 bar threshold");
        gauge.set(3.0, 1);
        gauge.advance();
        assert!(!gauge.is_warning(), "3 bar is healthy");
    }

    // -------------------------------------------------------------------------
    // Needle Angle
    // -------------------------------------------------------------------------

    #[test]
    fn test_needle_angle_at_min_mid_max() {
        let min_rad = TAU * 269.0 / 360.0;
        let mut gauge = water();
        assert!((gauge.needle_angle() + min_rad).abs() < EPS, "Min reads -min_rad");

        gauge.set(90.0, 1);
        gauge.advance();
        assert!((gauge.needle_angle() - (0.5 * min_rad - min_rad)).abs() < EPS, "Midpoint is linear");

        gauge.set(140.0, 1);
        gauge.advance();
        assert!(gauge.needle_angle().abs() < EPS, "Max reads 2π - max_rad");
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    proptest! {
        #[test]
        fn prop_set_clamps_target(value in -1_000.0f64..1_000.0, window in 1u32..100) {
            let mut gauge = water();
            gauge.set(value, window);
            prop_assert!((gauge.target_value() - value.clamp(40.0, 140.0)).abs() < EPS);
        }

        #[test]
        fn prop_converges_monotonically_in_window_frames(
            start in 40.0f64..140.0,
            end in 40.0f64..140.0,
            window in 1u32..60,
        ) {
            prop_assume!((end - start).abs() > 1e-3);

            let mut gauge = water();
            gauge.set(start, 1);
            gauge.advance();
            gauge.set(end, window);

            let expected = window as usize;
            let rising = end > start;
            let mut last = gauge.current_value();
            let mut ticks = 0;
            while gauge.advance() {
                ticks += 1;
                let now = gauge.current_value();
                prop_assert!(if rising { now > last } else { now < last }, "Motion must be monotone");
                prop_assert!(if rising { now <= end } else { now >= end }, "Never overshoots");
                prop_assert!((40.0..=140.0).contains(&now));
                last = now;
            }
            prop_assert_eq!(ticks, expected);
            prop_assert!((gauge.current_value() - end).abs() < EPS);
        }
    }
}
