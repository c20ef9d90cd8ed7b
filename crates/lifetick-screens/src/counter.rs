//! Auto-incrementing counter and its settings screen.
//!
//! All arithmetic saturates at the `i64` bounds.

use std::sync::Arc;

use lifetick_core::prelude::*;

pub fn increment(n: i64) -> i64 {
    n.saturating_add(1)
}

pub fn decrement(n: i64) -> i64 {
    n.saturating_sub(1)
}

pub fn reset(_: i64) -> i64 {
    0
}

pub fn auto_tick(n: i64) -> i64 {
    increment(n)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CounterConfig {
    pub initial: i64,
    pub task: TaskConfig,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            initial: 0,
            task: TaskConfig::every(1).running(),
        }
    }
}

pub struct CounterModel {
    count: ObservableState<i64>,
    ticker: Arc<PeriodicTaskController<i64>>,
    scope: Scope,
}

impl CounterModel {
    pub fn new(clock: SharedClock, config: CounterConfig) -> Self {
        let count = observable(config.initial);
        let ticker = Arc::new(PeriodicTaskController::with_mutation(
            "counter",
            count.clone(),
            clock,
            config.task,
            Mutation::infallible(|n: &i64| auto_tick(*n)),
        ));

        let scope = Scope::new("counter");
        scope.add_disposer({
            let ticker = ticker.clone();
            move || ticker.stop()
        });

        Self {
            count,
            ticker,
            scope,
        }
    }

    pub fn count(&self) -> &ObservableState<i64> {
        &self.count
    }

    pub fn controller(&self) -> &Arc<PeriodicTaskController<i64>> {
        &self.ticker
    }

    pub fn poll(&self) -> usize {
        self.ticker.poll()
    }

    pub fn increment(&self) {
        self.apply(increment);
    }

    pub fn decrement(&self) {
        self.apply(decrement);
    }

    pub fn reset(&self) {
        self.apply(reset);
    }

    fn apply(&self, op: fn(i64) -> i64) {
        // Button presses must not interleave with an auto tick's read-modify-write.
        self.ticker.exclusive(|count| count.update(|n| *n = op(*n)));
    }

    pub fn is_auto_running(&self) -> bool {
        self.ticker.is_running()
    }

    /// Returns whether auto-increment is now running.
    pub fn toggle_auto(&self) -> bool {
        if self.ticker.is_running() {
            self.ticker.stop();
            false
        } else {
            self.ticker.resume()
        }
    }

    pub fn interval(&self) -> Period {
        self.ticker.period()
    }

    pub fn set_interval(&self, secs: i64) {
        self.ticker.set_period(secs);
    }

    pub fn destroy(&self) {
        self.scope.dispose();
    }
}

/// Editable interval field of the settings screen.
pub struct SettingsModel {
    draft: ObservableState<String>,
    previous: Period,
}

impl SettingsModel {
    pub fn open(counter: &CounterModel) -> Self {
        let previous = counter.interval();
        Self {
            draft: observable(previous.secs().to_string()),
            previous,
        }
    }

    pub fn draft(&self) -> &ObservableState<String> {
        &self.draft
    }

    pub fn edit(&self, text: impl Into<String>) {
        self.draft.set(text.into());
    }

    pub fn validate(&self) -> Result<Period, ConfigError> {
        self.draft.with(|text| Period::parse(text))
    }

    /// Unparsable input keeps the interval the screen was opened with.
    pub fn interval(&self) -> Period {
        self.draft.with(|text| Period::parse_or(text, self.previous))
    }

    pub fn apply(&self, counter: &CounterModel) -> Period {
        let interval = self.interval();
        counter.set_interval(i64::from(interval.secs()));
        log::info!("Settings: auto-increment every {interval}");
        interval
    }
}
