//! Frame timing statistics for the render loop.
//!
//! # Usage
//!
//! ```ignore
//! let mut metrics = ProfilingMetrics::new();
//!
//! // In main loop:
//! let frame_start = Instant::now();
//! // ... render work ...
//! let render_time = frame_start.elapsed();
//! // ... sleep ...
//! metrics.record_frame(frame_start.elapsed(), render_time, sleep_time);
//! metrics.log_if_due(METRICS_LOG_INTERVAL);
//! ```
//!
//! Summaries go to the `tracing` log at debug level, plus one info-level
//! summary at shutdown.

use core::fmt::Write;
use std::time::{Duration, Instant};

use heapless::String;

/// Frame timing and render statistics.
pub struct ProfilingMetrics {
    // Frame timing (microseconds for precision)
    /// Total frame time (render + sleep + overhead)
    pub frame_time_us: u32,
    /// Time spent advancing gauges and drawing
    pub render_time_us: u32,
    /// Time spent sleeping (rate limiting)
    pub sleep_time_us: u32,

    // Statistics (computed over time)
    /// Minimum frame time observed
    pub frame_time_min_us: u32,
    /// Maximum frame time observed
    pub frame_time_max_us: u32,
    /// Rolling average frame time (simple exponential moving average)
    frame_time_avg_us: f32,

    // Counters
    /// Total frames rendered since startup
    pub total_frames: u64,
    /// Dial repaints (face blit + needle); low when redraw suppression works
    pub dial_paints: u64,
    /// Frames that overran the frame budget
    pub overruns: u64,

    start_time: Instant,
    last_log: Instant,
}

impl ProfilingMetrics {
    /// Create new profiling metrics, starting the uptime timer.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_time_us: 0,
            render_time_us: 0,
            sleep_time_us: 0,
            frame_time_min_us: u32::MAX,
            frame_time_max_us: 0,
            frame_time_avg_us: 0.0,
            total_frames: 0,
            dial_paints: 0,
            overruns: 0,
            start_time: now,
            last_log: now,
        }
    }

    /// Exponential moving average alpha (0.1 for smooth updates).
    const EMA_ALPHA: f32 = 0.1;

    /// Record frame timing for this frame.
    ///
    /// A frame that did not sleep at all counts as an overrun.
    pub fn record_frame(&mut self, total_time: Duration, render_time: Duration, sleep_time: Duration) {
        let total_us = total_time.as_micros() as u32;
        let render_us = render_time.as_micros() as u32;
        let sleep_us = sleep_time.as_micros() as u32;

        self.frame_time_us = total_us;
        self.render_time_us = render_us;
        self.sleep_time_us = sleep_us;

        self.frame_time_min_us = self.frame_time_min_us.min(total_us);
        self.frame_time_max_us = self.frame_time_max_us.max(total_us);

        if self.total_frames == 0 {
            self.frame_time_avg_us = total_us as f32;
        } else {
            self.frame_time_avg_us =
                Self::EMA_ALPHA.mul_add(total_us as f32, (1.0 - Self::EMA_ALPHA) * self.frame_time_avg_us);
        }

        if sleep_time.is_zero() {
            self.overruns += 1;
        }
        self.total_frames += 1;
    }

    /// Add the dial repaints of one frame.
    #[inline]
    pub const fn add_paints(&mut self, n: u64) { self.dial_paints += n; }

    /// Get average frame time in microseconds.
    #[inline]
    pub const fn frame_time_avg_us(&self) -> u32 { self.frame_time_avg_us as u32 }

    /// Average frames per second derived from the rolling frame time.
    #[inline]
    pub fn fps(&self) -> f32 {
        if self.frame_time_avg_us > 0.0 { 1_000_000.0 / self.frame_time_avg_us } else { 0.0 }
    }

    /// Get uptime since metrics were created.
    #[inline]
    pub fn uptime(&self) -> Duration { self.start_time.elapsed() }

    /// Format uptime as HH:MM:SS string.
    pub fn uptime_string(&self) -> String<12> {
        let secs = self.uptime().as_secs();
        let mut s = String::new();
        write!(s, "{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60).ok();
        s
    }

    /// Log a debug summary if `interval` has passed since the last one.
    pub fn log_if_due(&mut self, interval: Duration) {
        if self.last_log.elapsed() >= interval {
            self.last_log = Instant::now();
            tracing::debug!(
                fps = self.fps(),
                avg_us = self.frame_time_avg_us(),
                min_us = self.frame_time_min_us,
                max_us = self.frame_time_max_us,
                render_us = self.render_time_us,
                dial_paints = self.dial_paints,
                overruns = self.overruns,
                "frame timing"
            );
        }
    }

    /// Info-level summary for shutdown.
    pub fn log_summary(&self) {
        tracing::info!(
            uptime = %self.uptime_string(),
            frames = self.total_frames,
            dial_paints = self.dial_paints,
            overruns = self.overruns,
            avg_us = self.frame_time_avg_us(),
            max_us = self.frame_time_max_us,
            "render loop finished"
        );
    }
}

impl Default for ProfilingMetrics {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Tests
// =============================================================================
