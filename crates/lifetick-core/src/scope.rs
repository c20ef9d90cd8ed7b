use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::Dispose;

/// Teardown owner for one screen.
///
/// Screens register their timers and subscriptions here; disposing the scope
/// (or dropping its last handle) stops them. Scopes are owned explicitly by
/// the host rather than looked up from ambient state.
pub struct Scope {
    inner: Rc<ScopeInner>,
}

struct ScopeInner {
    label: &'static str,
    disposers: RefCell<Vec<Box<dyn FnOnce()>>>,
    children: RefCell<Vec<Scope>>,
    disposed: Cell<bool>,
}

impl Scope {
    pub fn new(label: &'static str) -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                label,
                disposers: RefCell::new(Vec::new()),
                children: RefCell::new(Vec::new()),
                disposed: Cell::new(false),
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        self.inner.label
    }

    /// Registers a cleanup. On an already-disposed scope it runs immediately.
    pub fn add_disposer(&self, disposer: impl FnOnce() + 'static) {
        if self.inner.disposed.get() {
            disposer();
            return;
        }
        self.inner.disposers.borrow_mut().push(Box::new(disposer));
    }

    pub fn keep(&self, dispose: Dispose) {
        self.add_disposer(move || dispose.run());
    }

    pub fn child(&self, label: &'static str) -> Scope {
        let child = Scope::new(label);
        if self.inner.disposed.get() {
            child.inner.disposed.set(true);
        } else {
            self.inner.children.borrow_mut().push(child.clone());
        }
        child
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    pub fn dispose(&self) {
        self.inner.teardown();
    }
}

impl ScopeInner {
    fn teardown(&self) {
        if self.disposed.replace(true) {
            return;
        }
        log::debug!("Scope '{}': disposing", self.label);

        // Dispose children first
        let children = std::mem::take(&mut *self.children.borrow_mut());
        for child in children {
            child.dispose();
        }

        // Latest registration first, so later resources can lean on earlier ones.
        let disposers = std::mem::take(&mut *self.disposers.borrow_mut());
        for disposer in disposers.into_iter().rev() {
            disposer();
        }
    }
}

impl Clone for Scope {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        self.teardown();
    }
}
