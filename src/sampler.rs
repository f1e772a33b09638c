//! Background sampling thread.
//!
//! Owns the [`ValueSource`] and pushes readings into the shared gauges on its
//! own cadence. Blocking adapter I/O happens only here, never on the render
//! thread.
//!
//! # Gating
//!
//! The thread starts during the intro sweep but does not read until the
//! intro opens the live gate, so the first real values never fight the
//! startup choreography.
//!
//! # Shutdown
//!
//! The render loop and the sampler share one shutdown flag. The thread checks
//! it before every channel read and while sleeping, so it stops within one
//! adapter timeout. Each `Sampler` spawns exactly one thread, joined on drop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::gauge::SharedGauge;
use crate::source::{Reading, ValueSource};

/// Longest single sleep, so shutdown is noticed promptly.
const SLEEP_SLICE: Duration = Duration::from_millis(20);

/// How the sampler paces itself.
#[derive(Clone, Copy, Debug)]
pub struct SamplerSettings {
    /// Time between the start of one cycle and the next.
    pub interval: Duration,
    /// Frames each reading is spread over.
    pub sample_window: u32,
}

pub struct Sampler {
    /// Shutdown flag shared with the render loop.
    shutdown: Arc<AtomicBool>,
    /// Opened by the intro once the sweep is over.
    live: Arc<AtomicBool>,
    /// Completed read cycles.
    cycles: Arc<AtomicU64>,
    /// Join handle for graceful thread cleanup
    join_handle: Option<JoinHandle<()>>,
}

impl Sampler {
    /// Spawn the sampling thread. It idles until [`Sampler::go_live`].
    pub fn spawn<S: ValueSource + 'static>(
        mut source: S,
        gauges: Vec<SharedGauge>,
        settings: SamplerSettings,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        let live = Arc::new(AtomicBool::new(false));
        let cycles = Arc::new(AtomicU64::new(0));
        let (shutdown_clone, live_clone, cycles_clone) = (shutdown.clone(), live.clone(), cycles.clone());

        let join_handle = thread::spawn(move || {
            tracing::debug!(source = source.name(), gauges = gauges.len(), "sampler thread started");
            while !shutdown_clone.load(Ordering::Relaxed) {
                if !live_clone.load(Ordering::Acquire) {
                    thread::sleep(SLEEP_SLICE);
                    continue;
                }

                let started = Instant::now();
                if !sample_once(&mut source, &gauges, settings.sample_window, &shutdown_clone) {
                    break;
                }
                cycles_clone.fetch_add(1, Ordering::Relaxed);

                let remaining = settings.interval.saturating_sub(started.elapsed());
                sleep_unless_shutdown(remaining, &shutdown_clone);
            }
            tracing::trace!("sampler thread exiting cleanly");
        });

        Self { shutdown, live, cycles, join_handle: Some(join_handle) }
    }

    /// Let live readings flow.
    pub fn go_live(&self) {
        if !self.live.swap(true, Ordering::AcqRel) {
            tracing::info!("live sampling started");
        }
    }

    #[inline]
    pub fn is_live(&self) -> bool { self.live.load(Ordering::Acquire) }

    /// Completed read cycles so far.
    #[inline]
    pub fn cycles(&self) -> u64 { self.cycles.load(Ordering::Relaxed) }
}

/// Read every gauge's channel once. Returns `false` if shutdown was requested
/// part way through.
pub fn sample_once<S: ValueSource + ?Sized>(
    source: &mut S,
    gauges: &[SharedGauge],
    sample_window: u32,
    shutdown: &AtomicBool,
) -> bool {
    for gauge in gauges {
        if shutdown.load(Ordering::Relaxed) {
            return false;
        }
        let channel = gauge.channel();
        match source.read(channel) {
            Ok(reading) => {
                if reading == Reading::NoData {
                    tracing::debug!(%channel, "no data, feeding zero");
                }
                gauge.set(reading.value_or_zero(), sample_window);
            }
            Err(e) if e.is_transient() => {
                tracing::warn!(%channel, error = %e, "read failed, retrying next cycle");
            }
            Err(e) => {
                tracing::error!(%channel, error = %e, "read failed, retrying next cycle");
            }
        }
    }
    true
}

fn sleep_unless_shutdown(duration: Duration, shutdown: &AtomicBool) {
    let mut left = duration;
    while !left.is_zero() && !shutdown.load(Ordering::Relaxed) {
        let slice = left.min(SLEEP_SLICE);
        thread::sleep(slice);
        left -= slice;
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);

        // The thread exits between reads, or after the read in flight returns
        // (bounded by the adapter read timeout).
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => tracing::trace!("sampler thread joined successfully"),
                Err(e) => tracing::warn!(?e, "sampler thread panicked during shutdown"),
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::channel::Channel;
    use crate::error::SourceError;
    use crate::gauge::{Calibration, WarnDirection};

    /// Returns the same reading for every channel and counts reads.
    struct FixedSource {
        reading: Result<Reading, ()>,
        reads: Arc<Mutex<Vec<Channel>>>,
    }

    impl ValueSource for FixedSource {
        fn read(&mut self, channel: Channel) -> Result<Reading, SourceError> {
            self.reads.lock().unwrap().push(channel);
            self.reading.map_err(|()| SourceError::Timeout)
        }

        fn name(&self) -> &'static str { "fixed" }
    }

    fn gauge(channel: Channel) -> SharedGauge {
        SharedGauge::new(
            channel,
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

    fn fixed(reading: Result<Reading, ()>) -> (FixedSource, Arc<Mutex<Vec<Channel>>>) {
        let reads = Arc::new(Mutex::new(Vec::new()));
        (FixedSource { reading, reads: reads.clone() }, reads)
    }

    fn wait_until(mut cond: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !cond() {
            assert!(Instant::now() < deadline, "condition not met within 5 s");
            thread::sleep(Duration::from_millis(5));
        }
    }

    // -------------------------------------------------------------------------
    // Single Cycle
    // -------------------------------------------------------------------------

    #[test]
    fn test_cycle_reads_every_channel_in_order() {
        let gauges: Vec<_> = Channel::ALL.into_iter().map(gauge).collect();
        let (mut source, reads) = fixed(Ok(Reading::Value(100.0)));
        assert!(sample_once(&mut source, &gauges, 10, &AtomicBool::new(false)));
        assert_eq!(*reads.lock().unwrap(), Channel::ALL.to_vec());
        for g in &gauges {
            assert!((g.snapshot().target_value() - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_no_data_feeds_zero_which_clamps_to_min() {
        let gauges = vec![gauge(Channel::Coolant)];
        gauges[0].set(100.0, 1);
        let (mut source, _) = fixed(Ok(Reading::NoData));
        sample_once(&mut source, &gauges, 10, &AtomicBool::new(false));
        let state = gauges[0].snapshot();
        assert!((state.target_value() - 40.0).abs() < 1e-9, "Zero clamps to the 40 minimum");
    }

    #[test]
    fn test_error_leaves_gauge_untouched() {
        let gauges = vec![gauge(Channel::Coolant)];
        gauges[0].set(100.0, 1);
        let (mut source, reads) = fixed(Err(()));
        assert!(sample_once(&mut source, &gauges, 10, &AtomicBool::new(false)));
        assert_eq!(reads.lock().unwrap().len(), 1, "Channel was attempted");
        assert!((gauges[0].snapshot().target_value() - 100.0).abs() < 1e-9, "Failed read keeps the old target");
    }

    #[test]
    fn test_shutdown_stops_mid_cycle() {
        let gauges: Vec<_> = Channel::ALL.into_iter().map(gauge).collect();
        let (mut source, reads) = fixed(Ok(Reading::Value(80.0)));
        assert!(!sample_once(&mut source, &gauges, 10, &AtomicBool::new(true)));
        assert!(reads.lock().unwrap().is_empty());
    }

    // -------------------------------------------------------------------------
    // Thread Lifecycle
    // -------------------------------------------------------------------------

    #[test]
    fn test_thread_waits_for_live_gate() {
        let gauges = vec![gauge(Channel::Coolant)];
        let (source, reads) = fixed(Ok(Reading::Value(90.0)));
        let settings = SamplerSettings { interval: Duration::from_millis(10), sample_window: 10 };
        let sampler = Sampler::spawn(source, gauges.clone(), settings, Arc::new(AtomicBool::new(false)));

        thread::sleep(Duration::from_millis(60));
        assert!(reads.lock().unwrap().is_empty(), "No reads before the gate opens");
        assert!(!sampler.is_live());

        sampler.go_live();
        wait_until(|| sampler.cycles() >= 3);
        assert!((gauges[0].snapshot().target_value() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_drop_joins_thread() {
        let shutdown = Arc::new(AtomicBool::new(false));
        let (source, _) = fixed(Ok(Reading::Value(90.0)));
        let settings = SamplerSettings { interval: Duration::from_secs(60), sample_window: 10 };
        let sampler = Sampler::spawn(source, vec![gauge(Channel::Coolant)], settings, shutdown.clone());
        sampler.go_live();
        wait_until(|| sampler.cycles() >= 1);

        let started = Instant::now();
        drop(sampler);
        assert!(shutdown.load(Ordering::Relaxed), "Drop raises the shared flag");
        assert!(started.elapsed() < Duration::from_secs(1), "Long interval sleep is interrupted");
    }
}
