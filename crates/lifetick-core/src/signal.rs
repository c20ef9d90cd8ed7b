use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex, ReentrantMutexGuard, RwLock};
use smallvec::SmallVec;

use crate::Dispose;
use crate::error::panic_message;

pub type SubId = u64;

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Single-value cell that notifies subscribers whenever the value is replaced.
///
/// Cloning yields another handle to the same cell.
pub struct ObservableState<T: 'static>(Arc<Inner<T>>);

struct Inner<T> {
    value: RwLock<T>,
    subs: Mutex<Subscribers<T>>,
    // Serialises write+notify passes between threads, and the read-modify-write
    // of any controller bound to this cell. Re-entrant, so a subscriber may
    // call `set` again on the notifying thread. Always taken before any
    // controller lock.
    pass: ReentrantMutex<()>,
}

struct Subscribers<T> {
    next_id: SubId,
    list: Vec<(SubId, Subscriber<T>)>,
}

impl<T: 'static> Clone for ObservableState<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Clone + Send + Sync + 'static> ObservableState<T> {
    pub fn new(value: T) -> Self {
        Self(Arc::new(Inner {
            value: RwLock::new(value),
            subs: Mutex::new(Subscribers {
                next_id: 0,
                list: Vec::new(),
            }),
            pass: ReentrantMutex::new(()),
        }))
    }

    pub fn get(&self) -> T {
        self.0.value.read().clone()
    }

    /// Borrowed read under the shared lock. Do not call `set` from `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.value.read())
    }

    pub fn set(&self, v: T) {
        let _pass = self.0.pass.lock();
        let published = v.clone();
        *self.0.value.write() = v;
        self.notify(&published);
    }

    /// Mutates a copy and publishes it, so readers never see a half-applied update.
    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        let _pass = self.0.pass.lock();
        let mut next = self.get();
        f(&mut next);
        self.set(next);
    }

    /// Registers `f`; running the returned [`Dispose`] removes exactly this callback.
    pub fn subscribe(&self, f: impl Fn(&T) + Send + Sync + 'static) -> Dispose {
        let id = {
            let mut subs = self.0.subs.lock();
            let id = subs.next_id;
            subs.next_id += 1;
            subs.list.push((id, Arc::new(f)));
            id
        };
        let weak: Weak<Inner<T>> = Arc::downgrade(&self.0);
        Dispose::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.subs.lock().list.retain(|(sid, _)| *sid != id);
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.subs.lock().list.len()
    }

    /// Holds off every other thread's `set`/`update` until the guard drops.
    pub(crate) fn hold(&self) -> ReentrantMutexGuard<'_, ()> {
        self.0.pass.lock()
    }

    fn notify(&self, value: &T) {
        // Snapshot: (un)subscribing from a callback only affects later passes.
        let subs: SmallVec<[(SubId, Subscriber<T>); 4]> =
            self.0.subs.lock().list.iter().cloned().collect();
        for (id, sub) in &subs {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| sub(value))) {
                log::error!(
                    "ObservableState: subscriber {id} panicked: {}",
                    panic_message(&*payload)
                );
            }
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for ObservableState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObservableState")
            .field(&*self.0.value.read())
            .finish()
    }
}

pub fn observable<T: Clone + Send + Sync + 'static>(value: T) -> ObservableState<T> {
    ObservableState::new(value)
}
