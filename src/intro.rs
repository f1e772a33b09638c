//! Startup sweep choreography.
//!
//! Before live data flows every needle sweeps from its minimum to its
//! maximum and back, so the driver can see the dials work. The sequence is
//! counted in render frames, not wall time, so it replays identically in
//! tests.
//!
//! # Timeline
//!
//! Frames are grouped into "samples" of `sample_window + 1` frames (the tick
//! counter runs `0..=sample_window`). Steps fire on the first frame of a
//! sample:
//!
//! | Sample | Step | Effect |
//! |--------|------|--------|
//! | 0 | [`IntroStep::SweepToMin`] | all gauges to min |
//! | [`INTRO_SWEEP_UP`] | [`IntroStep::SweepToMax`] | all gauges to max |
//! | [`INTRO_SWEEP_DOWN`] | [`IntroStep::SweepBack`] | all gauges to min, sampler thread starts |
//! | first > [`INTRO_LIVE_AFTER`] | [`IntroStep::GoLive`] | sampler begins reading |
//!
//! Sweeps use a window of `INTRO_WINDOW_FACTOR * sample_window` frames, so
//! each one finishes before the next step fires.

use crate::config::{INTRO_LIVE_AFTER, INTRO_SWEEP_DOWN, INTRO_SWEEP_UP, INTRO_WINDOW_FACTOR};
use crate::gauge::SharedGauge;

/// An action the render loop has to carry out this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntroStep {
    SweepToMin,
    SweepToMax,
    /// Sweep back down and start the sampler thread.
    SweepBack,
    /// Open the sampler's live gate. The intro is over.
    GoLive,
}

/// Frame-counted intro state machine.
#[derive(Clone, Debug)]
pub struct IntroSequencer {
    sample_window: u32,
    tick: u32,
    sample: u32,
    finished: bool,
}

impl IntroSequencer {
    pub const fn new(sample_window: u32) -> Self { Self { sample_window, tick: 0, sample: 0, finished: false } }

    #[inline]
    pub const fn is_finished(&self) -> bool { self.finished }

    #[cfg(test)]
    const fn position(&self) -> (u32, u32) { (self.sample, self.tick) }

    /// Frames each intro sweep is spread over.
    #[inline]
    pub const fn sweep_window(&self) -> u32 { self.sample_window.saturating_mul(INTRO_WINDOW_FACTOR) }

    /// Call once per frame. Returns the step due this frame, if any.
    pub fn step(&mut self) -> Option<IntroStep> {
        if self.finished {
            return None;
        }

        let step = if self.sample > INTRO_LIVE_AFTER {
            self.finished = true;
            Some(IntroStep::GoLive)
        } else if self.tick == 0 {
            match self.sample {
                0 => Some(IntroStep::SweepToMin),
                INTRO_SWEEP_UP => Some(IntroStep::SweepToMax),
                INTRO_SWEEP_DOWN => Some(IntroStep::SweepBack),
                _ => None,
            }
        } else {
            None
        };

        self.tick += 1;
        if self.tick > self.sample_window {
            self.tick = 0;
            self.sample += 1;
        }
        step
    }

    /// Retarget every gauge for a sweep step. `GoLive` touches no gauge.
    pub fn apply(&self, step: IntroStep, gauges: &[SharedGauge]) {
        let window = self.sweep_window();
        for gauge in gauges {
            let (min, max) = gauge.range();
            match step {
                IntroStep::SweepToMin | IntroStep::SweepBack => gauge.set(min, window),
                IntroStep::SweepToMax => gauge.set(max, window),
                IntroStep::GoLive => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;
    use crate::config::SAMPLE_WINDOW;
    use crate::gauge::{Calibration, WarnDirection};

    /// Run the intro to completion, returning `(frame, step)` for every step.
    fn schedule(sample_window: u32) -> Vec<(u32, IntroStep)> {
        let mut intro = IntroSequencer::new(sample_window);
        let mut steps = Vec::new();
        for frame in 0..10_000 {
            if let Some(step) = intro.step() {
                steps.push((frame, step));
            }
            if intro.is_finished() {
                break;
            }
        }
        steps
    }

    #[test]
    fn test_schedule_frames() {
        let steps = schedule(SAMPLE_WINDOW);
        // A sample is 11 frames at the default window
        assert_eq!(
            steps,
            vec![
                (0, IntroStep::SweepToMin),
                (55, IntroStep::SweepToMax),
                (110, IntroStep::SweepBack),
                (176, IntroStep::GoLive),
            ]
        );
    }

    #[test]
    fn test_sweep_window_saturates() {
        assert_eq!(IntroSequencer::new(SAMPLE_WINDOW).sweep_window(), 50);
        assert_eq!(IntroSequencer::new(u32::MAX).sweep_window(), u32::MAX, "Huge windows must not overflow");
    }

    #[test]
    fn test_finished_intro_is_silent() {
        let mut intro = IntroSequencer::new(2);
        while !intro.is_finished() {
            intro.step();
        }
        let position = intro.position();
        for _ in 0..100 {
            assert_eq!(intro.step(), None, "No steps after going live");
        }
        assert_eq!(intro.position(), position, "Counters stop once finished");
    }

    #[test]
    fn test_each_sweep_completes_before_next_step() {
        let steps = schedule(SAMPLE_WINDOW);
        let intro = IntroSequencer::new(SAMPLE_WINDOW);
        for pair in steps.windows(2) {
            let gap = pair[1].0 - pair[0].0;
            assert!(gap >= intro.sweep_window(), "{:?} fires before {:?} finished", pair[1].1, pair[0].1);
        }
    }

    #[test]
    fn test_sweep_drives_gauges_to_min_then_max() {
        let gauge = SharedGauge::new(
            Channel::FuelPressure,
            Calibration {
                min: 0.0,
                max: 5.0,
                warn: 1.0,
                warn_direction: WarnDirection::Below,
                min_angle_deg: 269.0,
                max_angle_deg: 0.0,
            },
        );
        let gauges = vec![gauge.clone()];
        let mut intro = IntroSequencer::new(SAMPLE_WINDOW);
        let mut saw_max = false;

        while !intro.is_finished() {
            if let Some(step) = intro.step() {
                intro.apply(step, &gauges);
            }
            let frame = gauge.advance();
            saw_max |= (frame.value - 5.0).abs() < 1e-9;
        }
        assert!(saw_max, "Needle must reach the maximum during the intro");
        assert!(gauge.snapshot().current_value().abs() < 1e-9, "Intro ends back at the minimum");
    }
}
