//! The render loop.
//!
//! Runs on the main thread at a fixed cadence. Each frame:
//!
//! 1. check the shared shutdown flag
//! 2. drain window input (quit keys, fullscreen toggle)
//! 3. step the intro sequencer, starting the sampler when it says so
//! 4. advance and draw every dial
//! 5. present, then sleep out the rest of the frame budget
//!
//! On exit the loop raises the shutdown flag, waits [`SHUTDOWN_SETTLE`] for
//! adapter I/O in flight, and joins the sampler.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::{DashboardConfig, FRAME_TIME, METRICS_LOG_INTERVAL, SHUTDOWN_SETTLE};
use crate::gauge::SharedGauge;
use crate::intro::{IntroSequencer, IntroStep};
use crate::profiling::ProfilingMetrics;
use crate::sampler::{Sampler, SamplerSettings};
use crate::source::ValueSource;
use crate::surface::{InputEvent, RenderSurface};
use crate::widgets::GaugeWidget;

pub struct Dashboard<S: RenderSurface> {
    surface: S,
    widgets: Vec<GaugeWidget>,
    intro: IntroSequencer,
    /// Handed to the sampler when the intro starts it.
    source: Option<Box<dyn ValueSource>>,
    sampler: Option<Sampler>,
    settings: SamplerSettings,
    /// Shutdown flag shared with the sampler thread.
    shutdown: Arc<AtomicBool>,
    fullscreen: bool,
    metrics: ProfilingMetrics,
}

impl<S: RenderSurface> Dashboard<S> {
    /// Build the dials described by `config`. `config` must already be
    /// validated.
    pub fn new(config: &DashboardConfig, surface: S, source: Box<dyn ValueSource>) -> Self {
        let widgets = config
            .gauges
            .iter()
            .map(|g| GaugeWidget::new(g, SharedGauge::new(g.channel, g.calibration())))
            .collect();
        Self {
            surface,
            widgets,
            intro: IntroSequencer::new(config.sample_window),
            source: Some(source),
            sampler: None,
            settings: SamplerSettings { interval: config.sample_interval(), sample_window: config.sample_window },
            shutdown: Arc::new(AtomicBool::new(false)),
            fullscreen: false,
            metrics: ProfilingMetrics::new(),
        }
    }

    /// Flag that stops the loop and the sampler when set.
    #[inline]
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> { self.shutdown.clone() }

    /// Handles to every dial's state.
    pub fn gauges(&self) -> Vec<SharedGauge> { self.widgets.iter().map(|w| w.gauge().clone()).collect() }

    #[inline]
    pub const fn sampler(&self) -> Option<&Sampler> { self.sampler.as_ref() }

    #[inline]
    pub const fn surface(&self) -> &S { &self.surface }

    #[inline]
    pub const fn metrics(&self) -> &ProfilingMetrics { &self.metrics }

    #[inline]
    fn should_stop(&self) -> bool { self.shutdown.load(Ordering::Relaxed) }

    /// Render one frame without pacing. Returns `false` once the loop should end.
    pub fn frame(&mut self) -> bool {
        if self.should_stop() {
            return false;
        }

        for event in self.surface.poll_events() {
            match event {
                InputEvent::Quit => {
                    tracing::info!("quit requested");
                    self.shutdown.store(true, Ordering::Relaxed);
                }
                InputEvent::ToggleFullscreen => {
                    self.fullscreen = !self.fullscreen;
                    tracing::info!(fullscreen = self.fullscreen, "display mode toggled");
                    self.surface.set_fullscreen(self.fullscreen);
                }
            }
        }
        if self.should_stop() {
            return false;
        }

        if let Some(step) = self.intro.step() {
            self.run_intro_step(step);
        }

        let mut painted = 0;
        for widget in &mut self.widgets {
            if widget.draw(&mut self.surface) {
                painted += 1;
            }
        }
        self.surface.present();
        self.metrics.add_paints(painted);
        true
    }

    fn run_intro_step(&mut self, step: IntroStep) {
        tracing::debug!(?step, "intro step");
        self.intro.apply(step, &self.gauges());
        match step {
            IntroStep::SweepBack => self.start_sampler(),
            IntroStep::GoLive => {
                if let Some(sampler) = &self.sampler {
                    sampler.go_live();
                }
            }
            IntroStep::SweepToMin | IntroStep::SweepToMax => {}
        }
    }

    fn start_sampler(&mut self) {
        if let Some(source) = self.source.take() {
            tracing::info!(source = source.name(), "starting sampler");
            self.sampler = Some(Sampler::spawn(source, self.gauges(), self.settings, self.shutdown.clone()));
        }
    }

    /// Run at the target frame rate until quit, then shut down.
    pub fn run(mut self) {
        tracing::info!(dials = self.widgets.len(), "render loop started");
        loop {
            let frame_start = Instant::now();
            if !self.frame() {
                break;
            }
            let render_time = frame_start.elapsed();

            // Sleep to maintain target frame rate (~50 FPS)
            let pre_sleep = frame_start.elapsed();
            if let Some(left) = FRAME_TIME.checked_sub(pre_sleep) {
                thread::sleep(left);
            }
            let sleep_time = frame_start.elapsed().saturating_sub(pre_sleep);

            self.metrics.record_frame(frame_start.elapsed(), render_time, sleep_time);
            self.metrics.log_if_due(METRICS_LOG_INTERVAL);
        }
        self.shut_down(SHUTDOWN_SETTLE);
    }

    /// Stop the sampler after letting adapter I/O settle.
    pub fn shut_down(mut self, settle: Duration) {
        self.shutdown.store(true, Ordering::Relaxed);
        if self.sampler.is_some() {
            thread::sleep(settle);
        }
        if let Some(sampler) = self.sampler.take() {
            let cycles = sampler.cycles();
            drop(sampler);
            tracing::info!(cycles, "sampler stopped");
        }
        self.metrics.log_summary();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
