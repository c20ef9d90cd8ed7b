//! # Lifetick screens
//!
//! Three view-models built on `lifetick-core`:
//!
//! - [`lifecycle`]: LifeTracker, a newest-first log of the host screen's
//!   lifecycle transitions with optional snackbar notifications.
//! - [`dashboard`]: a sliding window of synthetic temperature readings,
//!   generated on a timer.
//! - [`counter`]: a counter that auto-increments on a configurable interval,
//!   plus the settings screen that edits that interval.
//!
//! Each model owns a `Scope`; `destroy()` (or dropping the model) stops its
//! timer and drops its subscriptions. Rendering is left to the host, which
//! subscribes to the exposed `ObservableState`s.

pub mod counter;
pub mod dashboard;
pub mod lifecycle;
pub mod tests;

pub use counter::{CounterConfig, CounterModel, SettingsModel};
pub use dashboard::{
    DashboardConfig, DashboardModel, Reading, ReadingStats, SyntheticTemperature,
    TemperatureSource,
};
pub use lifecycle::{
    LifeTrackerConfig, LifeTrackerModel, LifecycleEntry, LifecycleEvent, LifecycleLogger,
    LifecycleObserver, LifecycleOwner,
};
