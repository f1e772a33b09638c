//! Value sources feeding the sampler.
//!
//! - [`ObdSource`]: live readings from an ELM327 adapter over a serial line
//! - [`DemoSource`]: random-walk readings for running without a car
//!
//! The variant is picked once at startup from the command line and handed to
//! the sampler as a boxed [`ValueSource`].

mod demo;
mod obd;

pub use demo::DemoSource;
pub use obd::{ObdSource, SerialTransport, Transport, decode_response};

use crate::channel::Channel;
use crate::error::SourceError;

/// Outcome of one channel read.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reading {
    Value(f64),
    /// The adapter answered but had nothing for this channel.
    NoData,
}

impl Reading {
    /// Numeric value fed to the gauge. No data reads as zero, which the gauge
    /// then clamps to its minimum.
    #[inline]
    pub const fn value_or_zero(self) -> f64 {
        match self {
            Self::Value(v) => v,
            Self::NoData => 0.0,
        }
    }
}

/// Something that can be asked for the current value of a channel.
///
/// Reads may block; they only ever run on the sampler thread.
pub trait ValueSource: Send {
    fn read(&mut self, channel: Channel) -> Result<Reading, SourceError>;

    /// Short name for log output.
    fn name(&self) -> &'static str;
}

impl<S: ValueSource + ?Sized> ValueSource for Box<S> {
    fn read(&mut self, channel: Channel) -> Result<Reading, SourceError> { (**self).read(channel) }

    fn name(&self) -> &'static str { (**self).name() }
}
