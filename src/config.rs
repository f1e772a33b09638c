//! Dashboard configuration: compile-time constants plus an optional TOML file.
//!
//! The constants describe the fixed parts of the system (screen, frame
//! cadence, intro choreography). [`DashboardConfig`] holds everything a user
//! may want to recalibrate: sampling cadence and the per-gauge layout, ranges
//! and warning thresholds. Its `Default` is the stock four-gauge layout, so a
//! config file only needs to name what it changes.
//!
//! ```toml
//! sample_interval_ms = 250
//!
//! [[gauges]]
//! channel = "fuel_pressure"
//! x = 600
//! y = 0
//! size = 200
//! inner_radius = 22
//! outer_radius = 90
//! min = 0.0
//! max = 6.0
//! warn = 1.5
//! warn_direction = "below"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::error::ConfigError;
use crate::gauge::{Calibration, WarnDirection};

// =============================================================================
// Display Configuration
// =============================================================================

/// Window width in pixels.
pub const SCREEN_WIDTH: u32 = 800;

/// Window height in pixels.
pub const SCREEN_HEIGHT: u32 = 480;

/// Window title.
pub const WINDOW_TITLE: &str = "Gauge Dashboard";

// =============================================================================
// Timing Configuration
// =============================================================================

/// Target frame time (~50 FPS). The render loop sleeps if a frame completes early.
pub const FRAME_TIME: Duration = Duration::from_millis(20);

/// Frames over which a live reading is spread. At 50 FPS a new value takes
/// 200 ms to reach, well inside the sampler cadence.
pub const SAMPLE_WINDOW: u32 = 10;

/// Longest accepted sample window (20 s of smoothing at 50 FPS).
pub const MAX_SAMPLE_WINDOW: u32 = 1_000;

/// Default sampler cadence.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(500);

/// Pause after the render loop exits so in-flight adapter I/O can finish
/// before the sampler is joined.
pub const SHUTDOWN_SETTLE: Duration = Duration::from_millis(500);

/// Interval between frame-timing summaries in the log.
pub const METRICS_LOG_INTERVAL: Duration = Duration::from_secs(10);

const _: () = assert!(FRAME_TIME.as_millis() * SAMPLE_WINDOW as u128 <= SAMPLE_INTERVAL.as_millis());

// =============================================================================
// Intro Choreography
// =============================================================================

/// Samples between the intro sweep steps (min, max, min).
pub const INTRO_LENGTH: u32 = 5;

/// Intro sweeps use a sample window this many times the live one.
pub const INTRO_WINDOW_FACTOR: u32 = 5;

/// Sample count at which every gauge sweeps up to its maximum.
pub const INTRO_SWEEP_UP: u32 = INTRO_LENGTH;

/// Sample count at which every gauge sweeps back down and the sampler starts.
pub const INTRO_SWEEP_DOWN: u32 = INTRO_LENGTH * 2;

/// Live readings flow once the sample count exceeds this.
pub const INTRO_LIVE_AFTER: u32 = INTRO_LENGTH * 3;

// A sweep spans INTRO_WINDOW_FACTOR * SAMPLE_WINDOW frames, which has to fit
// inside the INTRO_LENGTH * (SAMPLE_WINDOW + 1) frames before the next step.
const _: () = assert!(INTRO_WINDOW_FACTOR <= INTRO_LENGTH);
const _: () = assert!(INTRO_SWEEP_UP < INTRO_SWEEP_DOWN);
const _: () = assert!(INTRO_SWEEP_DOWN < INTRO_LIVE_AFTER);

// =============================================================================
// Needle and Link
// =============================================================================

/// Half the angular width of the needle triangle, in radians.
pub const NEEDLE_HALF_WIDTH: f64 = 0.03;

/// Needle outline stroke width in pixels.
pub const NEEDLE_STROKE: u32 = 5;

/// ELM327 adapters ship configured for 38400 baud.
pub const DEFAULT_BAUD_RATE: u32 = 38_400;

/// Default serial read timeout.
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Calibration and placement of one dial.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GaugeConfig {
    pub channel: Channel,
    /// Top-left corner of the dial face on screen.
    pub x: i32,
    pub y: i32,
    /// Side length of the square dial face.
    pub size: u32,
    pub inner_radius: u32,
    pub outer_radius: u32,
    pub min: f64,
    pub max: f64,
    pub warn: f64,
    #[serde(default)]
    pub warn_direction: WarnDirection,
    #[serde(default = "default_min_angle")]
    pub min_angle_deg: f64,
    #[serde(default)]
    pub max_angle_deg: f64,
    #[serde(default = "default_needle_color")]
    pub needle_color: [u8; 3],
    /// When false the warning face is identical to the normal one.
    #[serde(default = "default_true")]
    pub warning_lamp: bool,
}

const fn default_min_angle() -> f64 { 269.0 }

const fn default_needle_color() -> [u8; 3] { [200, 0, 0] }

const fn default_true() -> bool { true }

impl GaugeConfig {
    /// Small dial with the stock 269°-to-0° scale.
    #[allow(clippy::too_many_arguments)]
    const fn small(
        channel: Channel,
        x: i32,
        y: i32,
        min: f64,
        max: f64,
        warn: f64,
        warn_direction: WarnDirection,
        warning_lamp: bool,
    ) -> Self {
        Self {
            channel,
            x,
            y,
            size: 200,
            inner_radius: 22,
            outer_radius: 90,
            min,
            max,
            warn,
            warn_direction,
            min_angle_deg: default_min_angle(),
            max_angle_deg: 0.0,
            needle_color: default_needle_color(),
            warning_lamp,
        }
    }

    /// Value range and warning calibration for the smoothing engine.
    pub const fn calibration(&self) -> Calibration {
        Calibration {
            min: self.min,
            max: self.max,
            warn: self.warn,
            warn_direction: self.warn_direction,
            min_angle_deg: self.min_angle_deg,
            max_angle_deg: self.max_angle_deg,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason| ConfigError::InvalidGauge { channel: self.channel, reason };

        if !self.min.is_finite() || !self.max.is_finite() || !self.warn.is_finite() {
            return Err(invalid("range and warning threshold must be finite"));
        }
        if self.min >= self.max {
            return Err(invalid("min must be below max"));
        }
        if self.warn < self.min || self.warn > self.max {
            return Err(invalid("warn must lie inside [min, max]"));
        }
        if !(0.0..=360.0).contains(&self.min_angle_deg) || !(0.0..=360.0).contains(&self.max_angle_deg) {
            return Err(invalid("angles must lie inside [0, 360] degrees"));
        }
        if self.inner_radius >= self.outer_radius {
            return Err(invalid("inner_radius must be below outer_radius"));
        }
        // Widened to u64 so oversized TOML values cannot wrap
        let (size, outer) = (u64::from(self.size), u64::from(self.outer_radius));
        if outer * 2 > size {
            return Err(invalid("needle does not fit on the dial face"));
        }
        let (Ok(x), Ok(y)) = (u64::try_from(self.x), u64::try_from(self.y)) else {
            return Err(invalid("dial face does not fit on screen"));
        };
        if x + size > u64::from(SCREEN_WIDTH) || y + size > u64::from(SCREEN_HEIGHT) {
            return Err(invalid("dial face does not fit on screen"));
        }
        Ok(())
    }
}

/// Everything tunable at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Frames over which each live reading is spread.
    pub sample_window: u32,
    pub sample_interval_ms: u64,
    pub read_timeout_ms: u64,
    /// Simulator pixel scale.
    pub scale: u32,
    pub gauges: Vec<GaugeConfig>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sample_window: SAMPLE_WINDOW,
            sample_interval_ms: SAMPLE_INTERVAL.as_millis() as u64,
            read_timeout_ms: READ_TIMEOUT.as_millis() as u64,
            scale: 1,
            gauges: vec![
                GaugeConfig {
                    size: 400,
                    inner_radius: 45,
                    outer_radius: 185,
                    ..GaugeConfig::small(Channel::OilTemp, 0, 0, 40.0, 140.0, 120.0, WarnDirection::Above, true)
                },
                GaugeConfig::small(Channel::Coolant, 400, 0, 40.0, 140.0, 120.0, WarnDirection::Above, true),
                GaugeConfig::small(Channel::FuelPressure, 600, 0, 0.0, 5.0, 1.0, WarnDirection::Below, true),
                GaugeConfig::small(Channel::AirFlow, 500, 200, 0.0, 500.0, 1.0, WarnDirection::Above, false),
            ],
        }
    }
}

impl DashboardConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_window == 0 {
            return Err(ConfigError::ZeroSampleWindow);
        }
        if self.sample_window > MAX_SAMPLE_WINDOW {
            return Err(ConfigError::SampleWindowTooLarge { window: self.sample_window, max: MAX_SAMPLE_WINDOW });
        }
        if self.read_timeout_ms == 0 {
            return Err(ConfigError::ZeroReadTimeout);
        }
        if self.gauges.is_empty() {
            return Err(ConfigError::NoGauges);
        }
        for (i, gauge) in self.gauges.iter().enumerate() {
            if self.gauges[..i].iter().any(|g| g.channel == gauge.channel) {
                return Err(ConfigError::DuplicateGauge(gauge.channel));
            }
            gauge.validate()?;
        }
        Ok(())
    }

    #[inline]
    pub const fn sample_interval(&self) -> Duration { Duration::from_millis(self.sample_interval_ms) }

    #[inline]
    pub const fn read_timeout(&self) -> Duration { Duration::from_millis(self.read_timeout_ms) }
}

// =============================================================================
// Unit Tests
// =============================================================================
