use std::cell::RefCell;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::effects::Dispose;

thread_local! {
    static ACTIVE: RefCell<Option<Weak<ScopeInner>>> = const { RefCell::new(None) };
}

/// Holds the [`Dispose`] handles of one mounted lifetime (a widget, or a
/// phase of one such as "dropdown open") and releases them together, in
/// acquisition order, on [`Scope::dispose`] or when the last clone drops.
#[derive(Clone, Default)]
pub struct Scope {
    inner: Rc<ScopeInner>,
}

#[derive(Default)]
struct ScopeInner {
    held: RefCell<SmallVec<[Dispose; 4]>>,
}

impl ScopeInner {
    fn release(&self) {
        let held = std::mem::take(&mut *self.held.borrow_mut());
        for d in held {
            d.run();
        }
    }
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        self.release();
    }
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with this scope active, so [`effect`](crate::effect) calls
    /// inside it are held here. The previously active scope comes back
    /// afterwards, also on unwind.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        struct Restore(Option<Weak<ScopeInner>>);
        impl Drop for Restore {
            fn drop(&mut self) {
                let prev = self.0.take();
                ACTIVE.with(|active| *active.borrow_mut() = prev);
            }
        }

        let prev = ACTIVE.with(|active| active.borrow_mut().replace(Rc::downgrade(&self.inner)));
        let _restore = Restore(prev);
        f()
    }

    pub fn hold(&self, d: Dispose) {
        self.inner.held.borrow_mut().push(d);
    }

    /// Handles not yet released.
    pub fn held(&self) -> usize {
        self.inner.held.borrow().len()
    }

    pub fn dispose(self) {
        self.inner.release();
    }
}

pub(crate) fn active_scope() -> Option<Scope> {
    ACTIVE.with(|active| {
        active
            .borrow()
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| Scope { inner })
    })
}
