pub use crate::clock::{Clock, SharedClock, SystemClock, TestClock, system_clock};
pub use crate::color::Color;
pub use crate::config::{MissedTicks, Period, TaskConfig};
pub use crate::driver::TickDriver;
pub use crate::effects::Dispose;
pub use crate::error::{ConfigError, TickError};
pub use crate::history::{EventLog, SlidingWindow};
pub use crate::periodic::{Mutation, PeriodicTaskController, TaskState};
pub use crate::scope::Scope;
pub use crate::signal::{ObservableState, observable};
