use std::thread;
use std::time::Duration;

use anyhow::Context;
use lifetick_core::prelude::*;
use lifetick_screens::*;

const DEFAULT_RUN_SECS: u64 = 7;

fn run_secs() -> anyhow::Result<u64> {
    match std::env::args().nth(1) {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("run length must be whole seconds, got {arg:?}")),
        None => Ok(DEFAULT_RUN_SECS),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let run = run_secs()?;
    let clock = system_clock();

    // LifeTracker
    let host = LifecycleOwner::new();
    let tracker = LifeTrackerModel::default();
    tracker.attach(&host);
    tracker.on_notification(|msg| log::info!("[snackbar] {msg}"));
    for event in [
        LifecycleEvent::Create,
        LifecycleEvent::Start,
        LifecycleEvent::Resume,
    ] {
        host.emit(event);
    }

    // Dashboard
    let dashboard = DashboardModel::new(clock.clone(), DashboardConfig::default());
    let _chart = dashboard.readings().subscribe(|window| {
        if let Some(r) = window.latest() {
            log::info!("[dashboard] {:.1} °C ({} readings)", r.celsius, window.len());
        }
    });

    // Counter
    let counter = CounterModel::new(clock.clone(), CounterConfig::default());
    counter.controller().on_error(|e| log::error!("[counter] {e}"));
    let _label = counter
        .count()
        .subscribe(|n| log::info!("[counter] count = {n}"));

    let dashboard_driver = TickDriver::spawn(dashboard.controller().clone())
        .context("spawning dashboard ticker")?;
    let counter_driver =
        TickDriver::spawn(counter.controller().clone()).context("spawning counter ticker")?;

    thread::sleep(Duration::from_secs(run / 2));

    counter.increment();
    counter.increment();
    let settings = SettingsModel::open(&counter);
    settings.edit("2");
    settings.apply(&counter);
    tracker.toggle_notifications(false);
    host.emit(LifecycleEvent::Pause);

    thread::sleep(Duration::from_secs(run - run / 2));

    host.emit(LifecycleEvent::Stop);
    host.emit(LifecycleEvent::Destroy);

    if let Some(stats) = dashboard.stats() {
        log::info!(
            "[dashboard] latest {:.1} °C, min {:.1}, max {:.1}, avg {:.1}",
            stats.latest,
            stats.min,
            stats.max,
            stats.average
        );
    }
    log::info!(
        "[counter] final count {} after {} auto ticks",
        counter.count().get(),
        counter.controller().ticks()
    );
    tracker.events().with(|events| {
        for entry in events.iter() {
            log::info!("[tracker] {} {}", entry.color, entry.label);
        }
    });

    dashboard.destroy();
    counter.destroy();
    tracker.destroy();
    dashboard_driver.shutdown();
    counter_driver.shutdown();
    Ok(())
}
