//! Desktop gauge dashboard.
//!
//! Opens the simulator window, brings up the chosen value source, and hands
//! both to the render loop.
//!
//! ```text
//! gauge-dashboard demo
//! gauge-dashboard /dev/ttyUSB0 38400 --config dash.toml
//! ```

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use gauge_dashboard::cli::{Cli, SourceSpec};
use gauge_dashboard::config::{DashboardConfig, WINDOW_TITLE};
use gauge_dashboard::dashboard::Dashboard;
use gauge_dashboard::source::{DemoSource, ObdSource, SerialTransport, ValueSource};
use gauge_dashboard::surface::SimulatorSurface;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    config.validate().context("invalid dashboard configuration")?;

    let source = open_source(&cli.source_spec(), &config)?;
    tracing::info!(source = source.name(), dials = config.gauges.len(), "starting dashboard");

    let surface = SimulatorSurface::open(WINDOW_TITLE, config.scale);
    Dashboard::new(&config, surface, source).run();

    tracing::info!("dashboard closed");
    Ok(())
}

fn open_source(spec: &SourceSpec, config: &DashboardConfig) -> Result<Box<dyn ValueSource>> {
    match spec {
        SourceSpec::Demo => Ok(Box::new(DemoSource::new())),
        SourceSpec::Device { path, baud_rate } => {
            let source = ObdSource::<SerialTransport>::open(path, *baud_rate, config.read_timeout())
                .with_context(|| format!("opening OBD adapter on {path}"))?;
            Ok(Box::new(source))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_error_is_returned_not_logged() {
        let cli = Cli::try_parse_from(["gauge-dashboard", "demo", "--config", "/nonexistent/dash.toml"]).unwrap();
        let err = run(&cli).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.starts_with("loading /nonexistent/dash.toml"), "Context leads the report: {message}");
        assert!(message.contains("failed to read config file"), "Cause is chained: {message}");
    }
}
