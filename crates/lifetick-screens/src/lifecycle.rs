//! LifeTracker: logs every lifecycle transition of its host screen.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lifetick_core::prelude::*;
use web_time::SystemTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LifecycleEvent {
    Create,
    Start,
    Resume,
    Pause,
    Stop,
    Destroy,
    Any,
}

impl LifecycleEvent {
    pub const ALL: [LifecycleEvent; 7] = [
        LifecycleEvent::Create,
        LifecycleEvent::Start,
        LifecycleEvent::Resume,
        LifecycleEvent::Pause,
        LifecycleEvent::Stop,
        LifecycleEvent::Destroy,
        LifecycleEvent::Any,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LifecycleEvent::Create => "ON_CREATE",
            LifecycleEvent::Start => "ON_START",
            LifecycleEvent::Resume => "ON_RESUME",
            LifecycleEvent::Pause => "ON_PAUSE",
            LifecycleEvent::Stop => "ON_STOP",
            LifecycleEvent::Destroy => "ON_DESTROY",
            LifecycleEvent::Any => "ON_ANY",
        }
    }

    pub fn color(self) -> Color {
        match self {
            LifecycleEvent::Create | LifecycleEvent::Start => Color::from_argb(0xFF4CAF50),
            LifecycleEvent::Resume => Color::from_argb(0xFF2196F3),
            LifecycleEvent::Pause | LifecycleEvent::Stop => Color::from_argb(0xFFFFC107),
            LifecycleEvent::Destroy => Color::from_argb(0xFFF44336),
            LifecycleEvent::Any => Color::from_argb(0xFF9E9E9E),
        }
    }
}

/// One row of the log.
#[derive(Clone, Debug, PartialEq)]
pub struct LifecycleEntry {
    pub label: String,
    pub timestamp: SystemTime,
    pub color: Color,
}

impl LifecycleEntry {
    pub fn new(event: LifecycleEvent, timestamp: SystemTime) -> Self {
        Self {
            label: event.label().to_string(),
            timestamp,
            color: event.color(),
        }
    }

    pub fn now(event: LifecycleEvent) -> Self {
        Self::new(event, SystemTime::now())
    }
}

pub fn notification_text(label: &str) -> String {
    format!("Lifecycle event: {label}")
}

pub trait LifecycleObserver: Send + Sync {
    fn on_state_changed(&self, event: LifecycleEvent);
}

/// The host's side of the lifecycle: emits transitions to attached observers.
pub struct LifecycleOwner {
    current: ObservableState<Option<LifecycleEvent>>,
}

impl LifecycleOwner {
    pub fn new() -> Self {
        Self {
            current: observable(None),
        }
    }

    pub fn add_observer(&self, observer: Arc<dyn LifecycleObserver>) -> Dispose {
        self.current.subscribe(move |event| {
            if let Some(event) = event {
                observer.on_state_changed(*event);
            }
        })
    }

    pub fn emit(&self, event: LifecycleEvent) {
        log::debug!("LifecycleOwner: {}", event.label());
        self.current.set(Some(event));
    }

    pub fn current(&self) -> Option<LifecycleEvent> {
        self.current.get()
    }

    pub fn observer_count(&self) -> usize {
        self.current.subscriber_count()
    }
}

impl Default for LifecycleOwner {
    fn default() -> Self {
        Self::new()
    }
}

/// Records each lifecycle transition into a LifeTracker log.
pub struct LifecycleLogger {
    events: ObservableState<EventLog<LifecycleEntry>>,
}

impl LifecycleObserver for LifecycleLogger {
    fn on_state_changed(&self, event: LifecycleEvent) {
        self.events
            .update(|log| log.push(LifecycleEntry::now(event)));
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LifeTrackerConfig {
    /// `None` keeps every entry.
    pub log_capacity: Option<usize>,
    pub notifications: bool,
}

impl Default for LifeTrackerConfig {
    fn default() -> Self {
        Self {
            log_capacity: Some(EventLog::<LifecycleEntry>::DEFAULT_CAPACITY),
            notifications: true,
        }
    }
}

pub struct LifeTrackerModel {
    events: ObservableState<EventLog<LifecycleEntry>>,
    show_notifications: ObservableState<bool>,
    settings_open: ObservableState<bool>,
    scope: Scope,
}

impl LifeTrackerModel {
    pub fn new(config: LifeTrackerConfig) -> Self {
        let log = match config.log_capacity {
            Some(max) => EventLog::with_capacity(max),
            None => EventLog::unbounded(),
        };
        Self {
            events: observable(log),
            show_notifications: observable(config.notifications),
            settings_open: observable(false),
            scope: Scope::new("life-tracker"),
        }
    }

    pub fn events(&self) -> &ObservableState<EventLog<LifecycleEntry>> {
        &self.events
    }

    pub fn show_notifications(&self) -> &ObservableState<bool> {
        &self.show_notifications
    }

    pub fn settings_open(&self) -> &ObservableState<bool> {
        &self.settings_open
    }

    pub fn record(&self, event: LifecycleEvent) {
        self.record_entry(LifecycleEntry::now(event));
    }

    pub fn record_entry(&self, entry: LifecycleEntry) {
        self.events.update(|log| log.push(entry));
    }

    /// Label of the newest entry.
    pub fn current_state(&self) -> Option<String> {
        self.events.with(|log| log.latest().map(|e| e.label.clone()))
    }

    pub fn toggle_notifications(&self, enabled: bool) {
        self.show_notifications.set(enabled);
    }

    pub fn open_settings(&self) {
        self.settings_open.set(true);
    }

    pub fn dismiss_settings(&self) {
        self.settings_open.set(false);
    }

    /// Logs the host's transitions until this screen is destroyed.
    pub fn attach(&self, owner: &LifecycleOwner) {
        let logger = Arc::new(LifecycleLogger {
            events: self.events.clone(),
        });
        self.scope.keep(owner.add_observer(logger));
    }

    /// Calls `show` with a snackbar message for every new entry while
    /// notifications are enabled. Entries recorded while disabled are skipped.
    pub fn on_notification(&self, show: impl Fn(&str) + Send + Sync + 'static) -> Dispose {
        let seen = Arc::new(AtomicU64::new(self.events.with(|log| log.pushed())));
        let enabled = self.show_notifications.clone();
        let sub = self.events.subscribe(move |log| {
            let pushed = log.pushed();
            if seen.swap(pushed, Ordering::SeqCst) == pushed || !enabled.get() {
                return;
            }
            if let Some(latest) = log.latest() {
                show(&notification_text(&latest.label));
            }
        });
        self.scope.keep(sub.clone());
        sub
    }

    pub fn destroy(&self) {
        self.scope.dispose();
    }
}

impl Default for LifeTrackerModel {
    fn default() -> Self {
        Self::new(LifeTrackerConfig::default())
    }
}
