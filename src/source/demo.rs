//! Synthetic readings for running the dashboard without a car.
//!
//! Each channel does an independent random walk: every read nudges the value
//! one step down, not at all, or one step up with equal odds. Walks are not
//! bounded; the gauge clamps whatever comes out.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Reading, ValueSource};
use crate::channel::Channel;
use crate::error::SourceError;

/// Starting value and step size for one channel's walk.
const fn walk_params(channel: Channel) -> (f64, f64) {
    match channel {
        Channel::Coolant | Channel::OilTemp => (70.0, 0.2),
        Channel::FuelPressure => (1.5, 0.02),
        Channel::AirFlow => (70.0, 0.5),
    }
}

/// Random-walk value source.
pub struct DemoSource {
    rng: StdRng,
    values: [f64; Channel::ALL.len()],
}

impl DemoSource {
    /// Walk seeded from the OS.
    pub fn new() -> Self { Self::from_rng(StdRng::from_os_rng()) }

    /// Deterministic walk for tests.
    pub fn with_seed(seed: u64) -> Self { Self::from_rng(StdRng::seed_from_u64(seed)) }

    fn from_rng(rng: StdRng) -> Self { Self { rng, values: Channel::ALL.map(|c| walk_params(c).0) } }
}

impl Default for DemoSource {
    fn default() -> Self { Self::new() }
}

impl ValueSource for DemoSource {
    fn read(&mut self, channel: Channel) -> Result<Reading, SourceError> {
        let (_, step) = walk_params(channel);
        let direction = f64::from(self.rng.random_range(-1i8..=1));
        let value = &mut self.values[channel as usize];
        *value = direction.mul_add(step, *value);
        Ok(Reading::Value(*value))
    }

    fn name(&self) -> &'static str { "demo" }
}
