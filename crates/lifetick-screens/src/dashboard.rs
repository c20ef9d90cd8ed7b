//! Temperature dashboard fed by a synthetic sensor.

use std::sync::Arc;

use lifetick_core::prelude::*;
use parking_lot::Mutex;
use web_time::SystemTime;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub celsius: f32,
    pub timestamp: SystemTime,
}

impl Reading {
    pub fn now(celsius: f32) -> Self {
        Self {
            celsius,
            timestamp: SystemTime::now(),
        }
    }
}

pub trait TemperatureSource: Send + 'static {
    fn next_celsius(&mut self) -> f32;
}

/// Deterministic pseudo-random temperatures, rounded to 0.1 °C.
#[derive(Clone, Debug)]
pub struct SyntheticTemperature {
    state: u64,
    min: f32,
    max: f32,
}

impl SyntheticTemperature {
    pub const DEFAULT_RANGE: (f32, f32) = (15.0, 35.0);

    pub fn new(seed: u64) -> Self {
        let (min, max) = Self::DEFAULT_RANGE;
        Self::with_range(seed, min, max)
    }

    pub fn with_range(seed: u64, min: f32, max: f32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            // xorshift has a fixed point at zero
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
            min,
            max,
        }
    }

    pub fn seeded_from_time() -> Self {
        Self::new(time_seed())
    }
}

impl TemperatureSource for SyntheticTemperature {
    fn next_celsius(&mut self) -> f32 {
        // xorshift64
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;

        // top 24 bits → [0, 1)
        let unit = (self.state >> 40) as f32 / (1u64 << 24) as f32;
        let raw = self.min + unit * (self.max - self.min);
        ((raw * 10.0).round() / 10.0).clamp(self.min, self.max)
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReadingStats {
    pub latest: f32,
    pub min: f32,
    pub max: f32,
    pub average: f32,
}

pub fn stats(window: &SlidingWindow<Reading>) -> Option<ReadingStats> {
    let latest = window.latest()?.celsius;
    let (mut min, mut max, mut sum) = (f32::INFINITY, f32::NEG_INFINITY, 0.0f32);
    for r in window.iter() {
        min = min.min(r.celsius);
        max = max.max(r.celsius);
        sum += r.celsius;
    }
    Some(ReadingStats {
        latest,
        min,
        max,
        average: sum / window.len() as f32,
    })
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DashboardConfig {
    pub window: usize,
    pub task: TaskConfig,
    pub range: (f32, f32),
    /// `None` seeds from the wall clock.
    pub seed: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window: 20,
            task: TaskConfig::every(2).running(),
            range: SyntheticTemperature::DEFAULT_RANGE,
            seed: None,
        }
    }
}

type Readings = SlidingWindow<Reading>;

pub struct DashboardModel {
    readings: ObservableState<Readings>,
    generator: Arc<PeriodicTaskController<Readings>>,
    scope: Scope,
}

impl DashboardModel {
    pub fn new(clock: SharedClock, config: DashboardConfig) -> Self {
        let (min, max) = config.range;
        let seed = config.seed.unwrap_or_else(time_seed);
        let source = SyntheticTemperature::with_range(seed, min, max);
        Self::with_source(clock, config, source)
    }

    pub fn with_source(
        clock: SharedClock,
        config: DashboardConfig,
        source: impl TemperatureSource,
    ) -> Self {
        let readings = observable(SlidingWindow::new(config.window));
        let source = Arc::new(Mutex::new(source));
        let generate = Mutation::infallible(move |window: &Readings| {
            let mut next = window.clone();
            next.push(Reading::now(source.lock().next_celsius()));
            next
        });
        let generator = Arc::new(PeriodicTaskController::with_mutation(
            "dashboard",
            readings.clone(),
            clock,
            config.task,
            generate,
        ));

        let scope = Scope::new("dashboard");
        scope.add_disposer({
            let generator = generator.clone();
            move || generator.stop()
        });

        Self {
            readings,
            generator,
            scope,
        }
    }

    pub fn readings(&self) -> &ObservableState<Readings> {
        &self.readings
    }

    pub fn controller(&self) -> &Arc<PeriodicTaskController<Readings>> {
        &self.generator
    }

    pub fn poll(&self) -> usize {
        self.generator.poll()
    }

    pub fn is_generating(&self) -> bool {
        self.generator.is_running()
    }

    /// Pauses or resumes generation; returns whether it is now running.
    pub fn toggle(&self) -> bool {
        if self.generator.is_running() {
            self.generator.stop();
            false
        } else {
            self.generator.resume()
        }
    }

    pub fn set_period(&self, secs: i64) {
        self.generator.set_period(secs);
    }

    pub fn stats(&self) -> Option<ReadingStats> {
        self.readings.with(stats)
    }

    pub fn destroy(&self) {
        self.scope.dispose();
    }
}
