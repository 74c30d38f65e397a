use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    pub struct SubId;
}

/// Explicit observer list. Registration hands out a `SubId`; the same id must
/// be passed back to `unsubscribe` when the observer goes away.
pub struct Observers<A: ?Sized> {
    subs: RefCell<SlotMap<SubId, Rc<dyn Fn(&A)>>>,
}

impl<A: ?Sized> Default for Observers<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized> Observers<A> {
    pub fn new() -> Self {
        Self {
            subs: RefCell::new(SlotMap::with_key()),
        }
    }

    pub fn subscribe(&self, f: impl Fn(&A) + 'static) -> SubId {
        self.subs.borrow_mut().insert(Rc::new(f))
    }

    /// Returns false if `id` was not (or no longer) registered.
    pub fn unsubscribe(&self, id: SubId) -> bool {
        self.subs.borrow_mut().remove(id).is_some()
    }

    /// Calls every observer registered at the time of the call. Observers may
    /// subscribe or unsubscribe from inside the callback.
    pub fn notify(&self, value: &A) {
        let snapshot: Vec<Rc<dyn Fn(&A)>> = self.subs.borrow().values().cloned().collect();
        for f in snapshot {
            f(value);
        }
    }

    pub fn len(&self) -> usize {
        self.subs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.subs.borrow().is_empty()
    }
}

pub struct Signal<T: 'static>(Rc<Inner<T>>);

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

struct Inner<T: 'static> {
    value: RefCell<T>,
    subs: Observers<T>,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(Inner {
            value: RefCell::new(value),
            subs: Observers::new(),
        }))
    }
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.value.borrow().clone()
    }
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.value.borrow())
    }
    pub fn set(&self, v: T) {
        *self.0.value.borrow_mut() = v;
        self.0.subs.notify(&self.0.value.borrow());
    }
    pub fn update<F: FnOnce(&mut T)>(&self, f: F) {
        f(&mut self.0.value.borrow_mut());
        self.0.subs.notify(&self.0.value.borrow());
    }
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        self.0.subs.subscribe(f)
    }
    pub fn unsubscribe(&self, id: SubId) -> bool {
        self.0.subs.unsubscribe(id)
    }
}

pub fn signal<T>(t: T) -> Signal<T> {
    Signal::new(t)
}
