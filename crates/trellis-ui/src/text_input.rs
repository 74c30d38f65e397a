//! Value-commit semantics of single-line inputs.
//!
//! Both inputs keep a raw edit buffer while the user types. What reaches the
//! host's `on_change`, and when, is decided by the [`CommitMode`]:
//!
//! - `OnChange`: every edit commits immediately.
//! - `OnEnter`: Enter (without shift) commits the buffer.
//! - `OnEnterOrTab`: Enter or Tab commits.
//!
//! Alt, ctrl and meta chords never commit. Losing focus discards the buffer,
//! so an uncommitted edit snaps back to the host's value.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use trellis_core::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CommitMode {
    #[default]
    OnChange,
    OnEnter,
    OnEnterOrTab,
}

/// Whether `ev` commits the edit buffer under `mode`.
pub fn is_commit_key(ev: &KeyEvent, mode: CommitMode) -> bool {
    if ev.modifiers.any_command() {
        return false;
    }
    match ev.key {
        Key::Enter => !ev.modifiers.shift && mode != CommitMode::OnChange,
        Key::Tab => mode == CommitMode::OnEnterOrTab,
        _ => false,
    }
}

pub fn default_format(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Lenient number parse: surrounding whitespace is ignored and blank input is
/// 0. Anything unparsable is NaN.
pub fn default_parse(text: &str) -> f64 {
    let t = text.trim();
    if t.is_empty() {
        return 0.0;
    }
    t.parse::<f64>().unwrap_or(f64::NAN)
}

type Format = dyn Fn(Option<f64>) -> String;
type Parse = dyn Fn(&str) -> f64;

/// Controlled numeric input. Only finite numbers are ever committed.
pub struct NumericInput {
    value: Signal<Option<f64>>,
    raw: RefCell<Option<String>>,
    allow_empty: bool,
    commit: CommitMode,
    disabled: Cell<bool>,
    format: Rc<Format>,
    parse: Rc<Parse>,
    on_change: Rc<dyn Fn(f64)>,
}

impl NumericInput {
    pub fn new(value: Signal<Option<f64>>, on_change: impl Fn(f64) + 'static) -> Self {
        Self {
            value,
            raw: RefCell::new(None),
            allow_empty: false,
            commit: CommitMode::OnChange,
            disabled: Cell::new(false),
            format: Rc::new(default_format),
            parse: Rc::new(default_parse),
            on_change: Rc::new(on_change),
        }
    }

    /// Let a blank input commit (as whatever `parse("")` yields).
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    pub fn commit(mut self, mode: CommitMode) -> Self {
        self.commit = mode;
        self
    }

    pub fn format(mut self, f: impl Fn(Option<f64>) -> String + 'static) -> Self {
        self.format = Rc::new(f);
        self
    }

    pub fn parse(mut self, f: impl Fn(&str) -> f64 + 'static) -> Self {
        self.parse = Rc::new(f);
        self
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    /// Text shown in the field: the edit buffer, or the formatted value.
    pub fn display_text(&self) -> String {
        match self.raw.borrow().as_ref() {
            Some(raw) => raw.clone(),
            None => (self.format)(self.value.get()),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.raw.borrow().is_some()
    }

    /// The user changed the text.
    pub fn edit(&self, text: &str) {
        if self.disabled.get() {
            return;
        }
        *self.raw.borrow_mut() = Some(text.to_string());
        if text.is_empty() && !self.allow_empty {
            return;
        }
        let n = (self.parse)(text);
        if n.is_finite() && self.commit == CommitMode::OnChange {
            (self.on_change)(n);
        }
    }

    pub fn key_down(&self, ev: &KeyEvent) {
        if !is_commit_key(ev, self.commit) {
            return;
        }
        let Some(raw) = self.raw.borrow_mut().take() else {
            return;
        };
        if raw.is_empty() && !self.allow_empty {
            return;
        }
        let n = (self.parse)(&raw);
        if n.is_finite() {
            log::debug!("numeric input committed {n}");
            (self.on_change)(n);
        }
    }

    pub fn blur(&self) {
        self.raw.borrow_mut().take();
    }
}

/// Controlled text input.
pub struct TextField {
    value: Signal<String>,
    old_value: Option<String>,
    edit: RefCell<Option<String>>,
    focused: Cell<bool>,
    enabled: bool,
    readonly: bool,
    password: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    commit: CommitMode,
    on_change: Option<Rc<dyn Fn(&str)>>,
}

impl TextField {
    pub fn new(value: Signal<String>) -> Self {
        Self {
            value,
            old_value: None,
            edit: RefCell::new(None),
            focused: Cell::new(false),
            enabled: true,
            readonly: false,
            password: false,
            min_length: None,
            max_length: None,
            commit: CommitMode::OnChange,
            on_change: None,
        }
    }

    pub fn on_change(mut self, f: impl Fn(&str) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }

    pub fn commit(mut self, mode: CommitMode) -> Self {
        self.commit = mode;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn password(mut self, password: bool) -> Self {
        self.password = password;
        self
    }

    /// Previous value shown alongside the current one.
    pub fn old_value(mut self, old: impl Into<String>) -> Self {
        self.old_value = Some(old.into());
        self
    }

    /// Once the text is at least `n` chars long, edits may not shrink it
    /// below `n`.
    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    /// Longer input is truncated.
    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn is_password(&self) -> bool {
        self.password
    }

    pub fn has_old_value(&self) -> bool {
        self.old_value.as_deref().is_some_and(|v| !v.is_empty())
    }

    pub fn old_value_text(&self) -> Option<&str> {
        self.old_value.as_deref()
    }

    /// Shown as read-only only while enabled.
    pub fn is_readonly(&self) -> bool {
        self.readonly && self.enabled
    }

    pub fn display_text(&self) -> String {
        match self.edit.borrow().as_ref() {
            Some(e) => e.clone(),
            None => self.value.get(),
        }
    }

    pub fn focus(&self) {
        self.focused.set(true);
    }

    pub fn is_focused(&self) -> bool {
        self.focused.get()
    }

    pub fn blur(&self) {
        self.edit.borrow_mut().take();
        self.focused.set(false);
    }

    pub fn edit(&self, text: &str) {
        if !self.enabled || self.readonly {
            return;
        }
        let current = self.edit.borrow().clone().unwrap_or_else(|| self.value.get());

        let mut next = match self.max_length {
            Some(max) if text.chars().count() > max => text.chars().take(max).collect(),
            _ => text.to_string(),
        };
        if let Some(min) = self.min_length.filter(|m| *m > 0) {
            if current.chars().count() >= min && next.chars().count() < min {
                log::trace!("edit refused: would drop below {min} chars");
                next = current;
            }
        }

        *self.edit.borrow_mut() = Some(next.clone());
        if self.commit == CommitMode::OnChange {
            if let Some(cb) = &self.on_change {
                cb(&next);
            }
        }
    }

    pub fn key_down(&self, ev: &KeyEvent) {
        if !is_commit_key(ev, self.commit) {
            return;
        }
        let Some(text) = self.edit.borrow_mut().take() else {
            return;
        };
        if let Some(cb) = &self.on_change {
            log::debug!("text field committed");
            cb(&text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: Key) -> KeyEvent {
        KeyEvent::new(k)
    }

    fn recorder() -> (Rc<RefCell<Vec<f64>>>, impl Fn(f64) + 'static) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        (log, move |v| l.borrow_mut().push(v))
    }

    #[test]
    fn test_commit_keys() {
        let shift = Modifiers {
            shift: true,
            ..Default::default()
        };
        let ctrl = Modifiers {
            ctrl: true,
            ..Default::default()
        };
        assert!(is_commit_key(&key(Key::Enter), CommitMode::OnEnter));
        assert!(!is_commit_key(&key(Key::Enter), CommitMode::OnChange));
        assert!(!is_commit_key(&key(Key::Tab), CommitMode::OnEnter));
        assert!(is_commit_key(&key(Key::Tab), CommitMode::OnEnterOrTab));
        assert!(!is_commit_key(&key(Key::Enter).with_modifiers(shift), CommitMode::OnEnter));
        assert!(is_commit_key(&key(Key::Tab).with_modifiers(shift), CommitMode::OnEnterOrTab));
        assert!(!is_commit_key(&key(Key::Enter).with_modifiers(ctrl), CommitMode::OnEnterOrTab));
    }

    #[test]
    fn test_numeric_on_change_commits_finite_only() {
        let (log, f) = recorder();
        let input = NumericInput::new(signal(Some(1.0)), f);
        input.edit("1");
        input.edit("1e");
        input.edit("");
        input.edit("12.5");
        assert_eq!(*log.borrow(), vec![1.0, 12.5]);
        assert_eq!(input.display_text(), "12.5");
        input.blur();
        assert_eq!(input.display_text(), "1");
    }

    #[test]
    fn test_numeric_allow_empty_commits_zero() {
        let (log, f) = recorder();
        let input = NumericInput::new(signal(None), f).allow_empty(true);
        input.edit("");
        assert_eq!(*log.borrow(), vec![0.0]);
    }

    #[test]
    fn test_numeric_on_enter() {
        let (log, f) = recorder();
        let input = NumericInput::new(signal(Some(3.0)), f).commit(CommitMode::OnEnter);
        input.key_down(&key(Key::Enter));
        input.edit("42");
        assert!(log.borrow().is_empty());
        input.key_down(&key(Key::Tab));
        input.key_down(&key(Key::Enter));
        assert_eq!(*log.borrow(), vec![42.0]);
        assert!(!input.is_editing());
    }

    #[test]
    fn test_numeric_disabled_ignores_edits() {
        let (log, f) = recorder();
        let input = NumericInput::new(signal(Some(3.0)), f);
        input.set_disabled(true);
        input.edit("4");
        assert!(log.borrow().is_empty());
        assert_eq!(input.display_text(), "3");
    }

    #[test]
    fn test_text_min_length_guard() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let field = TextField::new(signal("abcd".to_string()))
            .min_length(3)
            .on_change(move |v| s.borrow_mut().push(v.to_string()));

        field.edit("abc");
        field.edit("ab");
        field.edit("abx");
        assert_eq!(*seen.borrow(), vec!["abc", "abc", "abx"]);
    }

    #[test]
    fn test_text_on_enter_or_tab() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let field = TextField::new(signal(String::new()))
            .commit(CommitMode::OnEnterOrTab)
            .max_length(4)
            .on_change(move |v| s.borrow_mut().push(v.to_string()));

        field.focus();
        field.edit("hello");
        assert_eq!(field.display_text(), "hell");
        field.key_down(&key(Key::Tab));
        field.edit("x");
        field.blur();
        field.key_down(&key(Key::Enter));
        assert_eq!(*seen.borrow(), vec!["hell"]);
        assert!(!field.is_focused());
    }
}
