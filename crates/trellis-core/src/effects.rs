use std::cell::RefCell;
use std::rc::Rc;

/// Cleanup handle. Clones share the same cleanup, which runs at most once.
#[derive(Clone)]
pub struct Dispose(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    /// Runs at most once (safe to call multiple times).
    pub fn run(&self) {
        let f = self.0.borrow_mut().take();
        if let Some(f) = f {
            f()
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.0.borrow().is_none()
    }

    /// Wraps this handle so the cleanup also runs when the guard is dropped.
    pub fn guard(self) -> DisposeGuard {
        DisposeGuard(self)
    }
}

impl std::fmt::Debug for Dispose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Dispose")
            .field(&if self.is_disposed() { "done" } else { "armed" })
            .finish()
    }
}

/// Owned form of [`Dispose`] for struct fields: dropping the owner releases
/// the resource.
#[derive(Debug)]
pub struct DisposeGuard(Dispose);

impl DisposeGuard {
    pub fn dispose(self) {
        self.0.run();
    }
}

impl Drop for DisposeGuard {
    fn drop(&mut self) {
        self.0.run();
    }
}

/// Runs `f()` immediately and returns its `Dispose`, also held by the active
/// [`Scope`](crate::Scope) when there is one.
pub fn effect<F>(f: F) -> Dispose
where
    F: FnOnce() -> Dispose,
{
    let d = f();
    if let Some(scope) = crate::scope::active_scope() {
        scope.hold(d.clone());
    }
    d
}
