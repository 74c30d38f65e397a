//! Window- and document-level notifications.
//!
//! Widgets never keep listeners installed while idle: `EventHub::listen`
//! hands back a [`Dispose`] that the widget runs (directly or through a
//! [`Scope`](crate::Scope)) as soon as it stops caring.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use bitflags::bitflags;
use slotmap::{SlotMap, new_key_type};

use crate::Dispose;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EventMask: u8 {
        /// Window resized.
        const RESIZE = 1 << 0;
        /// Anything scrolled (captured at window level).
        const SCROLL = 1 << 1;
        /// The host's main content area changed size.
        const MAIN_RESIZED = 1 << 2;
    }
}

new_key_type! {
    pub struct ListenerId;
}

struct Listener {
    mask: EventMask,
    callback: Rc<dyn Fn(EventMask)>,
}

#[derive(Default)]
struct HubInner {
    listeners: SlotMap<ListenerId, Listener>,
}

#[derive(Clone, Default)]
pub struct EventHub {
    inner: Rc<RefCell<HubInner>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `f` for every event in `mask`. The returned handle removes it.
    pub fn listen(&self, mask: EventMask, f: impl Fn(EventMask) + 'static) -> Dispose {
        let id = self.inner.borrow_mut().listeners.insert(Listener {
            mask,
            callback: Rc::new(f),
        });
        log::trace!("listener {id:?} installed for {mask:?}");

        let weak: Weak<RefCell<HubInner>> = Rc::downgrade(&self.inner);
        Dispose::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.remove(id);
                log::trace!("listener {id:?} removed");
            }
        })
    }

    /// Delivers `event` to every listener whose mask intersects it.
    pub fn emit(&self, event: EventMask) {
        let targets: Vec<Rc<dyn Fn(EventMask)>> = self
            .inner
            .borrow()
            .listeners
            .values()
            .filter(|l| l.mask.intersects(event))
            .map(|l| l.callback.clone())
            .collect();
        for cb in targets {
            cb(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}
