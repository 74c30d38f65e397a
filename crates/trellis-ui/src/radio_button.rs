use std::cell::Cell;
use std::rc::Rc;

use trellis_core::*;

/// Controlled radio button.
///
/// Like a native radio input, a click only ever checks: clicking a button
/// that is already checked reports nothing. Unchecking is up to the host,
/// usually when a sibling in the same group gets checked.
pub struct RadioButton {
    checked: Signal<bool>,
    enabled: bool,
    focused: Cell<bool>,
    on_change: Option<Rc<dyn Fn(bool)>>,
}

impl RadioButton {
    pub fn new(checked: Signal<bool>) -> Self {
        Self {
            checked,
            enabled: true,
            focused: Cell::new(false),
            on_change: None,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn on_change(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_checked(&self) -> bool {
        self.checked.get()
    }

    pub fn click(&self) {
        if !self.enabled || self.checked.get() {
            return;
        }
        if let Some(cb) = &self.on_change {
            cb(true);
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
