//! Error types for configuration loading and value sources.
//!
//! Only startup can fail hard: a bad config file or an adapter that never
//! answers. Everything after that is recoverable and handled by the sampler.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::channel::Channel;

/// Problems loading or validating a dashboard configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("gauge {channel}: {reason}")]
    InvalidGauge { channel: Channel, reason: &'static str },

    #[error("gauge {0} is configured more than once")]
    DuplicateGauge(Channel),

    #[error("no gauges configured")]
    NoGauges,

    #[error("sample window must be at least one frame")]
    ZeroSampleWindow,

    #[error("sample window of {window} frames exceeds the {max} frame limit")]
    SampleWindowTooLarge { window: u32, max: u32 },

    #[error("read timeout must be at least one millisecond")]
    ZeroReadTimeout,
}

/// Failures talking to a value source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to open serial device {device}: {source}")]
    Open {
        device: String,
        #[source]
        source: serialport::Error,
    },

    #[error("serial I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("adapter did not answer within the read timeout")]
    Timeout,

    #[error("adapter handshake failed: {0}")]
    Handshake(String),
}

impl SourceError {
    /// Whether the sampler should keep polling after this error.
    ///
    /// Timeouts and I/O hiccups are retried on the next cycle; a failed
    /// handshake means the adapter is in an unknown state.
    #[inline]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Timeout)
    }
}
