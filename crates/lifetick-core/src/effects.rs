use std::sync::Arc;

use parking_lot::Mutex;

/// Cancellation capability returned by `subscribe` and friends.
///
/// Cloning shares the same underlying cleanup; dropping does not run it.
#[derive(Clone)]
pub struct Dispose(Arc<Mutex<Option<Box<dyn FnOnce() + Send>>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + Send + 'static) -> Self {
        Self(Arc::new(Mutex::new(Some(Box::new(f)))))
    }

    /// A capability with nothing to clean up.
    pub fn noop() -> Self {
        Self(Arc::new(Mutex::new(None)))
    }

    /// Runs at most once (safe to call multiple times).
    pub fn run(&self) {
        // Taken before calling so the cleanup may itself touch this handle.
        let f = self.0.lock().take();
        if let Some(f) = f {
            f()
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.0.lock().is_none()
    }
}

impl std::fmt::Debug for Dispose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispose")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
