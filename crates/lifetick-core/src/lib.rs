//! # State, Periodic Tasks, and Scopes
//!
//! Lifetick screens hold their state in a small reactive core instead of a
//! platform view-model. There are three main pieces:
//!
//! - `ObservableState<T>`: a single value that notifies subscribers.
//! - `PeriodicTaskController<T>`: one cancellable timer that rewrites an
//!   `ObservableState` every N seconds.
//! - `Scope`: the teardown owner that stops timers and drops subscriptions
//!   when a screen goes away.
//!
//! ## Observable state
//!
//! ```rust
//! use lifetick_core::*;
//!
//! let count = observable(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! `subscribe` returns a [`Dispose`] capability; running it removes exactly
//! that callback:
//!
//! ```rust
//! use lifetick_core::*;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicI32, Ordering};
//!
//! let count = observable(0);
//! let seen = Arc::new(AtomicI32::new(0));
//! let sub = count.subscribe({
//!     let seen = seen.clone();
//!     move |v| seen.store(*v, Ordering::SeqCst)
//! });
//! count.set(7);
//! sub.run();
//! count.set(8);
//! assert_eq!(seen.load(Ordering::SeqCst), 7);
//! ```
//!
//! ## Periodic tasks
//!
//! Controllers read time through a [`Clock`], so tests drive them with a
//! [`TestClock`] and `poll()`:
//!
//! ```rust
//! use lifetick_core::*;
//! use std::sync::Arc;
//! use web_time::Duration;
//!
//! let clock = TestClock::new();
//! let count = observable(0i64);
//! let ticker = PeriodicTaskController::new(
//!     "counter",
//!     count.clone(),
//!     Arc::new(clock.clone()),
//!     TaskConfig::default(),
//! );
//! ticker.start(2, Mutation::infallible(|n: &i64| n + 1));
//!
//! clock.advance(Duration::from_secs(5));
//! ticker.poll();
//! assert_eq!(count.get(), 2);
//!
//! ticker.stop();
//! assert!(!ticker.is_running());
//! ```
//!
//! Real hosts either call `poll()` from their frame loop or hand an
//! `Arc<PeriodicTaskController<T>>` to a [`TickDriver`], which sleeps on a
//! background thread until the next tick is due.
//!
//! ## Scopes and cleanup
//!
//! ```rust
//! use lifetick_core::*;
//!
//! let scope = Scope::new("screen");
//! let count = observable(0);
//! scope.keep(count.subscribe(|v| log::info!("count = {v}")));
//! assert_eq!(count.subscriber_count(), 1);
//! scope.dispose();
//! assert_eq!(count.subscriber_count(), 0);
//! ```

pub mod clock;
pub mod color;
pub mod config;
pub mod driver;
pub mod effects;
pub mod error;
pub mod history;
pub mod periodic;
pub mod prelude;
pub mod scope;
pub mod signal;

pub use clock::*;
pub use color::*;
pub use config::*;
pub use driver::TickDriver;
pub use effects::*;
pub use error::{ConfigError, TickError};
pub use history::*;
pub use periodic::*;
pub use scope::*;
pub use signal::*;
