//! Background thread that drives a controller against the real clock.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};
use web_time::Instant;

use crate::PeriodicTaskController;

/// What a [`TickDriver`] needs from a controller, with the state type erased.
pub(crate) trait TickSource: Send + Sync {
    fn label(&self) -> &'static str;
    fn poll(&self) -> usize;
    fn next_due(&self) -> Option<Instant>;
    fn now(&self) -> Instant;
    fn wake(&self) -> Arc<Wake>;
}

#[derive(Default)]
pub(crate) struct Wake {
    flags: Mutex<WakeFlags>,
    cv: Condvar,
}

#[derive(Default)]
struct WakeFlags {
    // Schedule changed since the driver last looked.
    dirty: bool,
    shutdown: bool,
}

impl Wake {
    pub(crate) fn notify(&self) {
        self.flags.lock().dirty = true;
        self.cv.notify_all();
    }

    fn shutdown(&self) {
        self.flags.lock().shutdown = true;
        self.cv.notify_all();
    }
}

/// Owns one ticker thread. Dropping it stops and joins the thread; the
/// controller itself keeps its state and can be polled by hand afterwards.
pub struct TickDriver {
    name: String,
    wake: Arc<Wake>,
    handle: Option<JoinHandle<()>>,
}

impl TickDriver {
    pub fn spawn<T: Clone + Send + Sync + 'static>(
        controller: Arc<PeriodicTaskController<T>>,
    ) -> io::Result<Self> {
        let source: Arc<dyn TickSource> = controller;
        let name = format!("lifetick-{}", source.label());
        let wake = source.wake();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || run(&*source))?;
        log::debug!("TickDriver '{name}': spawned");
        Ok(Self {
            name,
            wake,
            handle: Some(handle),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shutdown(mut self) {
        self.stop_thread();
    }

    fn stop_thread(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.wake.shutdown();
        if handle.thread().id() == thread::current().id() {
            // Dropped from inside a tick; the loop exits on its own.
            return;
        }
        if handle.join().is_err() {
            log::error!("TickDriver '{}': ticker thread panicked", self.name);
        } else {
            log::debug!("TickDriver '{}': joined", self.name);
        }
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.stop_thread();
    }
}

fn run(source: &dyn TickSource) {
    let wake = source.wake();
    loop {
        source.poll();

        let mut flags = wake.flags.lock();
        if flags.shutdown {
            break;
        }
        if !flags.dirty {
            match source.next_due() {
                Some(due) => {
                    let now = source.now();
                    if due > now {
                        wake.cv.wait_for(&mut flags, due - now);
                    }
                }
                None => wake.cv.wait(&mut flags),
            }
        }
        if flags.shutdown {
            break;
        }
        flags.dirty = false;
    }
}
