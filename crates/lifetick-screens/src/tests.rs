#[cfg(test)]
mod tests {
    use crate::counter::{self, CounterConfig, CounterModel, SettingsModel};
    use crate::dashboard::{self, *};
    use crate::lifecycle::*;
    use lifetick_core::prelude::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use web_time::{Duration, SystemTime};

    /// Emits 1.0, 2.0, 3.0, ...
    struct Ramp(f32);
    impl TemperatureSource for Ramp {
        fn next_celsius(&mut self) -> f32 {
            self.0 += 1.0;
            self.0
        }
    }

    fn tick_secs(clock: &TestClock, secs: u64) {
        clock.advance(Duration::from_secs(secs));
    }

    #[test]
    fn test_lifecycle_labels_and_colors() {
        assert_eq!(LifecycleEvent::Create.label(), "ON_CREATE");
        assert_eq!(LifecycleEvent::Destroy.label(), "ON_DESTROY");
        assert_eq!(LifecycleEvent::Start.color().to_hex(), "#4CAF50");
        assert_eq!(LifecycleEvent::Resume.color().to_hex(), "#2196F3");
        assert_eq!(LifecycleEvent::Stop.color().to_hex(), "#FFC107");
        assert_eq!(LifecycleEvent::Destroy.color().to_hex(), "#F44336");
        assert_eq!(LifecycleEvent::Any.color().to_hex(), "#9E9E9E");
    }

    #[test]
    fn test_tracker_logs_newest_first() {
        let tracker = LifeTrackerModel::default();
        assert_eq!(tracker.current_state(), None);

        let owner = LifecycleOwner::new();
        tracker.attach(&owner);
        for event in [
            LifecycleEvent::Create,
            LifecycleEvent::Start,
            LifecycleEvent::Resume,
        ] {
            owner.emit(event);
        }

        assert_eq!(tracker.current_state().as_deref(), Some("ON_RESUME"));
        let labels: Vec<String> = tracker
            .events()
            .with(|log| log.iter().map(|e| e.label.clone()).collect());
        assert_eq!(labels, ["ON_RESUME", "ON_START", "ON_CREATE"]);
    }

    #[test]
    fn test_tracker_detaches_on_destroy() {
        let tracker = LifeTrackerModel::default();
        let owner = LifecycleOwner::new();
        tracker.attach(&owner);
        assert_eq!(owner.observer_count(), 1);

        owner.emit(LifecycleEvent::Destroy);
        tracker.destroy();
        assert_eq!(owner.observer_count(), 0);

        owner.emit(LifecycleEvent::Create);
        assert_eq!(tracker.events().get().len(), 1);
    }

    #[test]
    fn test_tracker_log_is_capped() {
        let tracker = LifeTrackerModel::new(LifeTrackerConfig {
            log_capacity: Some(4),
            notifications: false,
        });
        for event in LifecycleEvent::ALL {
            tracker.record(event);
        }
        let log = tracker.events().get();
        assert_eq!(log.len(), 4);
        assert_eq!(log.latest().map(|e| e.label.as_str()), Some("ON_ANY"));
        assert_eq!(log.pushed(), 7);
    }

    #[test]
    fn test_notifications_follow_the_setting() {
        let tracker = LifeTrackerModel::default();
        let shown = Arc::new(Mutex::new(Vec::new()));
        tracker.on_notification({
            let shown = shown.clone();
            move |msg| shown.lock().push(msg.to_string())
        });

        tracker.record(LifecycleEvent::Create);
        tracker.toggle_notifications(false);
        tracker.record(LifecycleEvent::Start);
        tracker.toggle_notifications(true);
        tracker.record(LifecycleEvent::Resume);

        assert_eq!(
            *shown.lock(),
            ["Lifecycle event: ON_CREATE", "Lifecycle event: ON_RESUME"]
        );
    }

    #[test]
    fn test_settings_dialog_state() {
        let tracker = LifeTrackerModel::default();
        assert!(!tracker.settings_open().get());
        tracker.open_settings();
        assert!(tracker.settings_open().get());
        tracker.dismiss_settings();
        assert!(!tracker.settings_open().get());
    }

    #[test]
    fn test_entry_keeps_given_timestamp() {
        let at = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let entry = LifecycleEntry::new(LifecycleEvent::Pause, at);
        assert_eq!(entry.timestamp, at);
        assert_eq!(entry.label, "ON_PAUSE");
        assert_eq!(entry.color, LifecycleEvent::Pause.color());
    }

    #[test]
    fn test_dashboard_window_keeps_last_twenty() {
        let clock = TestClock::new();
        let model = DashboardModel::with_source(
            Arc::new(clock.clone()),
            DashboardConfig {
                task: TaskConfig::every(1).running(),
                ..DashboardConfig::default()
            },
            Ramp(0.0),
        );

        tick_secs(&clock, 25);
        assert_eq!(model.poll(), 25);

        let values: Vec<f32> = model
            .readings()
            .with(|w| w.iter().map(|r| r.celsius).collect());
        let expected: Vec<f32> = (6..=25).map(|v| v as f32).collect();
        assert_eq!(values, expected);

        let stats = model.stats().unwrap();
        assert_eq!(stats.latest, 25.0);
        assert_eq!(stats.min, 6.0);
        assert_eq!(stats.max, 25.0);
        assert!((stats.average - 15.5).abs() < 1e-4);
    }

    #[test]
    fn test_dashboard_starts_running_every_two_seconds() {
        let clock = TestClock::new();
        let model = DashboardModel::new(
            Arc::new(clock.clone()),
            DashboardConfig {
                seed: Some(7),
                ..DashboardConfig::default()
            },
        );
        assert!(model.is_generating());

        tick_secs(&clock, 1);
        assert_eq!(model.poll(), 0);
        tick_secs(&clock, 1);
        assert_eq!(model.poll(), 1);
        assert!(model.stats().is_some());
    }

    #[test]
    fn test_dashboard_toggle_pauses_generation() {
        let clock = TestClock::new();
        let model = DashboardModel::with_source(
            Arc::new(clock.clone()),
            DashboardConfig::default(),
            Ramp(0.0),
        );

        assert!(!model.toggle());
        tick_secs(&clock, 10);
        assert_eq!(model.poll(), 0);
        assert!(model.readings().get().is_empty());
        assert_eq!(model.stats(), None);

        assert!(model.toggle());
        tick_secs(&clock, 2);
        assert_eq!(model.poll(), 1);
    }

    #[test]
    fn test_dashboard_destroy_cancels_timer() {
        let clock = TestClock::new();
        let model = DashboardModel::with_source(
            Arc::new(clock.clone()),
            DashboardConfig::default(),
            Ramp(0.0),
        );
        let generator = model.controller().clone();

        model.destroy();
        assert!(!generator.is_running());
        tick_secs(&clock, 10);
        assert_eq!(generator.poll(), 0);
    }

    #[test]
    fn test_synthetic_temperature_stays_in_range() {
        let mut a = SyntheticTemperature::with_range(42, 18.0, 22.0);
        let mut b = SyntheticTemperature::with_range(42, 22.0, 18.0);
        for _ in 0..1_000 {
            let v = a.next_celsius();
            assert!((18.0..=22.0).contains(&v), "{v} out of range");
            assert_eq!(v, b.next_celsius());
        }

        // a zero seed must not pin the generator to a single value
        let mut zero = SyntheticTemperature::new(0);
        let first = zero.next_celsius();
        assert!((0..20).any(|_| zero.next_celsius() != first));
    }

    #[test]
    fn test_stats_of_empty_window() {
        assert_eq!(dashboard::stats(&SlidingWindow::new(20)), None);
    }

    #[test]
    fn test_counter_pure_ops() {
        for v in [-5i64, 0, 17, i64::MAX - 1] {
            assert_eq!(counter::decrement(counter::increment(v)), v);
            assert_eq!(counter::reset(v), 0);
        }
        assert_eq!(counter::increment(i64::MAX), i64::MAX);
        assert_eq!(counter::decrement(i64::MIN), i64::MIN);
        assert_eq!(counter::auto_tick(41), 42);
    }

    #[test]
    fn test_counter_auto_ticks_and_buttons() {
        let clock = TestClock::new();
        let model = CounterModel::new(Arc::new(clock.clone()), CounterConfig::default());
        assert!(model.is_auto_running());

        tick_secs(&clock, 3);
        model.poll();
        assert_eq!(model.count().get(), 3);

        model.increment();
        model.increment();
        model.decrement();
        assert_eq!(model.count().get(), 4);

        model.reset();
        assert_eq!(model.count().get(), 0);
    }

    #[test]
    fn test_counter_toggle_auto() {
        let clock = TestClock::new();
        let model = CounterModel::new(
            Arc::new(clock.clone()),
            CounterConfig {
                initial: 10,
                task: TaskConfig::every(2),
            },
        );
        assert!(!model.is_auto_running());
        tick_secs(&clock, 4);
        assert_eq!(model.poll(), 0);

        assert!(model.toggle_auto());
        tick_secs(&clock, 4);
        model.poll();
        assert_eq!(model.count().get(), 12);

        assert!(!model.toggle_auto());
        tick_secs(&clock, 4);
        assert_eq!(model.poll(), 0);
    }

    #[test]
    fn test_settings_apply_restarts_counter() {
        let clock = TestClock::new();
        let model = CounterModel::new(Arc::new(clock.clone()), CounterConfig::default());

        let settings = SettingsModel::open(&model);
        assert_eq!(settings.draft().get(), "1");

        settings.edit("3");
        assert_eq!(settings.validate(), Ok(Period::from_secs(3)));
        assert_eq!(settings.apply(&model), Period::from_secs(3));
        assert_eq!(model.interval().secs(), 3);

        tick_secs(&clock, 2);
        assert_eq!(model.poll(), 0);
        tick_secs(&clock, 1);
        assert_eq!(model.poll(), 1);
    }

    #[test]
    fn test_settings_fallbacks() {
        let clock = TestClock::new();
        let model = CounterModel::new(
            Arc::new(clock.clone()),
            CounterConfig {
                initial: 0,
                task: TaskConfig::every(5).running(),
            },
        );
        let settings = SettingsModel::open(&model);

        settings.edit("soon");
        assert!(settings.validate().is_err());
        assert_eq!(settings.apply(&model).secs(), 5);

        settings.edit("0");
        assert_eq!(settings.apply(&model).secs(), 1);
        assert_eq!(model.interval(), Period::MIN);
    }

    #[test]
    fn test_counter_destroy_stops_ticking() {
        let clock = TestClock::new();
        let model = CounterModel::new(Arc::new(clock.clone()), CounterConfig::default());
        model.destroy();
        assert!(!model.is_auto_running());

        tick_secs(&clock, 5);
        assert_eq!(model.poll(), 0);
        assert_eq!(model.count().get(), 0);
    }
}
