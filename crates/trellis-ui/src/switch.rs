use std::cell::Cell;
use std::rc::Rc;

use trellis_core::*;

/// Controlled on/off toggle.
pub struct Switch {
    value: Signal<bool>,
    disabled: Cell<bool>,
    focused: Cell<bool>,
    on_change: Option<Rc<dyn Fn(bool)>>,
}

impl Switch {
    pub fn new(value: Signal<bool>) -> Self {
        Self {
            value,
            disabled: Cell::new(false),
            focused: Cell::new(false),
            on_change: None,
        }
    }

    pub fn on_change(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    pub fn is_on(&self) -> bool {
        self.value.get()
    }

    /// Reports the inverted value. The switch itself does not flip until the
    /// host writes the signal.
    pub fn toggle(&self) {
        if self.disabled.get() {
            return;
        }
        if let Some(cb) = &self.on_change {
            cb(!self.value.get());
        }
    }

    pub fn focus(&self) {
        self.focused.set(true);
    }

    pub fn blur(&self) {
        self.focused.set(false);
    }

    pub fn is_focused(&self) -> bool {
        self.focused.get()
    }
}
