//! Resumable periodic task bound to an [`ObservableState`].
//!
//! ```text
//!            start / resume
//!   Stopped ────────────────▶ Running ──┐
//!      ▲                        │   ▲   │ set_period / start
//!      └──────── stop ──────────┘   └───┘ (re-armed, new generation)
//! ```
//!
//! Every (re)arm or cancel bumps a generation counter. A tick carries the
//! generation it was scheduled under and is dropped if that generation is no
//! longer current by the time its result would be written back.
//!
//! A tick runs under the bound state's write pass, and so does every schedule
//! change. Lock order is the state's pass, then the controller's schedule;
//! nothing here takes the pass while holding the schedule.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::Mutex;
use web_time::Instant;

use crate::clock::SharedClock;
use crate::config::{MissedTicks, Period, TaskConfig};
use crate::driver::{TickSource, Wake};
use crate::error::{TickError, panic_message};
use crate::signal::ObservableState;

/// The function applied to the bound state on every tick.
pub struct Mutation<T>(Arc<dyn Fn(&T) -> anyhow::Result<T> + Send + Sync>);

impl<T> Clone for Mutation<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Mutation<T> {
    pub fn new(f: impl Fn(&T) -> anyhow::Result<T> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn infallible(f: impl Fn(&T) -> T + Send + Sync + 'static) -> Self {
        Self::new(move |v| Ok(f(v)))
    }

    fn apply(&self, v: &T) -> anyhow::Result<T> {
        (self.0)(v)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskState {
    Stopped,
    Running,
}

type ErrorHandler = Arc<dyn Fn(&TickError) + Send + Sync>;

#[derive(Clone, Copy, Debug)]
struct Armed {
    generation: u64,
    next_due: Instant,
}

struct Schedule<T> {
    period: Period,
    mutation: Option<Mutation<T>>,
    // Some iff running.
    timer: Option<Armed>,
    generation: u64,
    attempted: u64,
    applied: u64,
}

impl<T> Schedule<T> {
    fn arm(&mut self, now: Instant) -> Armed {
        self.generation += 1;
        let armed = Armed {
            generation: self.generation,
            next_due: now + self.period.as_duration(),
        };
        self.timer = Some(armed);
        armed
    }

    fn disarm(&mut self) -> bool {
        if self.timer.take().is_some() {
            self.generation += 1;
            true
        } else {
            false
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.timer.is_some_and(|t| t.generation == generation)
    }
}

/// Owns at most one timer that periodically rewrites an [`ObservableState`].
///
/// Drive it either by calling [`poll`](Self::poll) from a frame loop, or by
/// handing an `Arc` of it to a [`TickDriver`](crate::TickDriver).
pub struct PeriodicTaskController<T: 'static> {
    label: &'static str,
    state: ObservableState<T>,
    clock: SharedClock,
    missed_ticks: MissedTicks,
    schedule: Mutex<Schedule<T>>,
    on_error: Mutex<Option<ErrorHandler>>,
    wake: Arc<Wake>,
}

impl<T: Clone + Send + Sync + 'static> PeriodicTaskController<T> {
    /// A stopped controller with no mutation bound yet.
    pub fn new(
        label: &'static str,
        state: ObservableState<T>,
        clock: SharedClock,
        config: TaskConfig,
    ) -> Self {
        if config.start_running {
            log::warn!(
                "PeriodicTaskController '{label}': start_running ignored without a mutation"
            );
        }
        Self {
            label,
            state,
            clock,
            missed_ticks: config.missed_ticks,
            schedule: Mutex::new(Schedule {
                period: config.period,
                mutation: None,
                timer: None,
                generation: 0,
                attempted: 0,
                applied: 0,
            }),
            on_error: Mutex::new(None),
            wake: Arc::new(Wake::default()),
        }
    }

    /// Binds `mutation` and, when `config.start_running` is set, arms the timer.
    pub fn with_mutation(
        label: &'static str,
        state: ObservableState<T>,
        clock: SharedClock,
        config: TaskConfig,
        mutation: Mutation<T>,
    ) -> Self {
        let this = Self::new(label, state, clock, config.stopped());
        this.schedule.lock().mutation = Some(mutation);
        if config.start_running {
            this.resume();
        }
        this
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// (Re)starts ticking every `period_secs` (clamped to at least 1).
    ///
    /// Any existing timer is cancelled first; the first tick fires one full
    /// period after this call.
    pub fn start(&self, period_secs: i64, mutation: Mutation<T>) {
        let period = Period::from_secs(period_secs);
        let _pass = self.state.hold();
        let armed = {
            let mut s = self.schedule.lock();
            s.disarm();
            s.period = period;
            s.mutation = Some(mutation);
            s.arm(self.clock.now())
        };
        log::debug!(
            "PeriodicTaskController '{}': started every {period} (generation {})",
            self.label,
            armed.generation
        );
        self.wake.notify();
    }

    /// Re-arms with the stored period and mutation. Returns `false` when no
    /// mutation has been bound yet.
    pub fn resume(&self) -> bool {
        let _pass = self.state.hold();
        let armed = {
            let mut s = self.schedule.lock();
            if s.timer.is_some() {
                return true;
            }
            if s.mutation.is_none() {
                return false;
            }
            s.arm(self.clock.now())
        };
        log::debug!(
            "PeriodicTaskController '{}': resumed (generation {})",
            self.label,
            armed.generation
        );
        self.wake.notify();
        true
    }

    /// Cancels the timer. Idempotent.
    ///
    /// Waits for a tick in flight on another thread, so no cancelled tick is
    /// applied once this returns.
    pub fn stop(&self) {
        let _pass = self.state.hold();
        let stopped = self.schedule.lock().disarm();
        if stopped {
            log::debug!("PeriodicTaskController '{}': stopped", self.label);
            self.wake.notify();
        }
    }

    /// Running: restart at the new period with the same mutation.
    /// Stopped: remember the period for the next start.
    pub fn set_period(&self, period_secs: i64) {
        let period = Period::from_secs(period_secs);
        let _pass = self.state.hold();
        let rearmed = {
            let mut s = self.schedule.lock();
            s.period = period;
            if s.timer.is_some() {
                Some(s.arm(self.clock.now()))
            } else {
                None
            }
        };
        match rearmed {
            Some(armed) => {
                log::debug!(
                    "PeriodicTaskController '{}': period now {period} (generation {})",
                    self.label,
                    armed.generation
                );
                self.wake.notify();
            }
            None => log::debug!(
                "PeriodicTaskController '{}': stored period {period}",
                self.label
            ),
        }
    }

    pub fn on_error(&self, f: impl Fn(&TickError) + Send + Sync + 'static) {
        *self.on_error.lock() = Some(Arc::new(f));
    }

    pub fn is_running(&self) -> bool {
        self.schedule.lock().timer.is_some()
    }

    pub fn task_state(&self) -> TaskState {
        if self.is_running() {
            TaskState::Running
        } else {
            TaskState::Stopped
        }
    }

    pub fn period(&self) -> Period {
        self.schedule.lock().period
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.schedule.lock().timer.map(|t| t.next_due)
    }

    /// Number of ticks whose result was written back.
    pub fn ticks(&self) -> u64 {
        self.schedule.lock().applied
    }

    /// Runs `f` with ticks and other threads' writes to the state held off,
    /// for writes that must not interleave with a tick's read-modify-write
    /// (e.g. button handlers).
    pub fn exclusive<R>(&self, f: impl FnOnce(&ObservableState<T>) -> R) -> R {
        let _pass = self.state.hold();
        f(&self.state)
    }

    /// Runs every tick due at or before the current clock reading.
    /// Returns how many were applied.
    pub fn poll(&self) -> usize {
        let _pass = self.state.hold();
        let now = self.clock.now();
        let mut applied = 0;
        while let Some((generation, tick, mutation)) = self.take_due(now) {
            if self.run_tick(generation, tick, &mutation) {
                applied += 1;
            }
        }
        applied
    }

    fn take_due(&self, now: Instant) -> Option<(u64, u64, Mutation<T>)> {
        let mut guard = self.schedule.lock();
        let s = &mut *guard;
        let timer = s.timer.as_mut()?;
        if timer.next_due > now {
            return None;
        }
        let mutation = s.mutation.clone()?;
        let period = s.period.as_duration();
        timer.next_due += period;
        if self.missed_ticks == MissedTicks::Skip {
            while timer.next_due <= now {
                timer.next_due += period;
            }
        }
        s.attempted += 1;
        Some((timer.generation, s.attempted, mutation))
    }

    fn run_tick(&self, generation: u64, tick: u64, mutation: &Mutation<T>) -> bool {
        let current = self.state.get();
        let next = match catch_unwind(AssertUnwindSafe(|| mutation.apply(&current))) {
            Ok(Ok(next)) => next,
            Ok(Err(err)) => {
                self.report(TickError::Mutation {
                    tick,
                    source: err.into(),
                });
                return false;
            }
            Err(payload) => {
                self.report(TickError::Panicked {
                    tick,
                    message: panic_message(&*payload),
                });
                return false;
            }
        };

        {
            // The mutation may have stopped or re-armed us on this thread.
            let mut s = self.schedule.lock();
            if !s.is_current(generation) {
                log::debug!(
                    "PeriodicTaskController '{}': dropping stale tick {tick} (generation {generation})",
                    self.label
                );
                return false;
            }
            s.applied += 1;
        }
        self.state.set(next);
        true
    }

    fn report(&self, err: TickError) {
        log::warn!(
            "PeriodicTaskController '{}': {err}; timer stays armed",
            self.label
        );
        let handler = self.on_error.lock().clone();
        if let Some(handler) = handler {
            handler(&err);
        }
    }
}

impl<T: Clone + Send + Sync + 'static> TickSource for PeriodicTaskController<T> {
    fn label(&self) -> &'static str {
        self.label
    }
    fn poll(&self) -> usize {
        PeriodicTaskController::poll(self)
    }
    fn next_due(&self) -> Option<Instant> {
        PeriodicTaskController::next_due(self)
    }
    fn now(&self) -> Instant {
        self.clock.now()
    }
    fn wake(&self) -> Arc<Wake> {
        self.wake.clone()
    }
}

impl<T: 'static> Drop for PeriodicTaskController<T> {
    fn drop(&mut self) {
        if self.schedule.get_mut().timer.take().is_some() {
            log::debug!(
                "PeriodicTaskController '{}': dropped while running",
                self.label
            );
        }
    }
}
