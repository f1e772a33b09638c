//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::DEFAULT_BAUD_RATE;

/// Positional value that selects the simulated source.
pub const DEMO_SOURCE: &str = "demo";

#[derive(Parser, Debug)]
#[command(name = "gauge-dashboard", version, about = "Live OBD-II gauge dashboard")]
pub struct Cli {
    /// Serial device of the ELM327 adapter, or `demo` for simulated readings
    #[arg(value_name = "DEVICE|demo")]
    pub source: String,

    /// Serial baud rate
    #[arg(value_name = "BAUDRATE", default_value_t = DEFAULT_BAUD_RATE)]
    pub baud_rate: u32,

    /// Dashboard layout TOML (built-in layout when omitted)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Console log level (error|warn|info|debug|trace), overridden by RUST_LOG
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Where readings come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceSpec {
    Demo,
    Device { path: String, baud_rate: u32 },
}

impl Cli {
    pub fn source_spec(&self) -> SourceSpec {
        if self.source == DEMO_SOURCE {
            SourceSpec::Demo
        } else {
            SourceSpec::Device { path: self.source.clone(), baud_rate: self.baud_rate }
        }
    }
}
