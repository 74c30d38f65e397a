//! # Spin field
//!
//! Numeric input flanked by decrement and increment buttons. Both buttons are
//! [`Holdable`]s. Holding a button steps the value, repeating faster the
//! longer it is held, until a bound is reached. A short tap does not step.
//!
//! The value is controlled: each step reports `value ∓ step` through
//! `on_change` and the next step reads the host's updated signal.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use trellis_core::*;

use crate::holdable::{HoldCallbacks, Holdable};
use crate::text_input::{NumericInput, default_format};

/// Static configuration of a spin field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinFieldProps {
    pub enabled: bool,
    pub readonly: bool,
    pub focus: bool,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub step_size: f64,
    pub side_value: Option<f64>,
}

impl Default for SpinFieldProps {
    fn default() -> Self {
        Self {
            enabled: false,
            readonly: false,
            focus: false,
            min_value: None,
            max_value: None,
            step_size: 1.0,
            side_value: None,
        }
    }
}

struct SpinInner {
    props: SpinFieldProps,
    value: Signal<Option<f64>>,
    focus: Cell<bool>,
    on_change: Rc<dyn Fn(f64)>,
}

impl SpinInner {
    fn can_decrement(&self) -> bool {
        let p = &self.props;
        match self.value.get() {
            Some(v) => !p.readonly && p.enabled && p.min_value.is_none_or(|min| v > min),
            None => false,
        }
    }

    fn can_increment(&self) -> bool {
        let p = &self.props;
        match self.value.get() {
            Some(v) => !p.readonly && p.enabled && p.max_value.is_none_or(|max| v < max),
            None => false,
        }
    }

    /// One step; returns whether holding may continue.
    fn step(&self, sign: f64) -> bool {
        let Some(v) = self.value.get() else {
            return false;
        };
        let allowed = if sign < 0.0 {
            self.can_decrement()
        } else {
            self.can_increment()
        };
        if allowed {
            (self.on_change)(v + sign * self.props.step_size);
        }
        allowed
    }
}

pub struct SpinField {
    inner: Rc<SpinInner>,
    input: NumericInput,
    decrement: Holdable,
    increment: Holdable,
}

impl SpinField {
    /// Reads the [`hold_config`] local for both buttons.
    pub fn new(
        timers: Rc<dyn TimerHost>,
        props: SpinFieldProps,
        value: Signal<Option<f64>>,
        on_change: impl Fn(f64) + 'static,
    ) -> Result<Self> {
        let on_change: Rc<dyn Fn(f64)> = Rc::new(on_change);
        let inner = Rc::new(SpinInner {
            props,
            value: value.clone(),
            focus: Cell::new(props.focus),
            on_change: on_change.clone(),
        });

        let button = |sign: f64| {
            let weak: Weak<SpinInner> = Rc::downgrade(&inner);
            Holdable::new(
                timers.clone(),
                HoldCallbacks::new(move |_, _| weak.upgrade().is_some_and(|s| s.step(sign))),
            )
        };
        let decrement = button(-1.0)?;
        let increment = button(1.0)?;

        let input = NumericInput::new(value, move |v| on_change(v));
        input.set_disabled(props.readonly || !props.enabled);

        Ok(Self {
            inner,
            input,
            decrement,
            increment,
        })
    }

    pub fn props(&self) -> &SpinFieldProps {
        &self.inner.props
    }

    pub fn input(&self) -> &NumericInput {
        &self.input
    }

    /// Forward press events of the "-" button here.
    pub fn decrement_button(&self) -> &Holdable {
        &self.decrement
    }

    /// Forward press events of the "+" button here.
    pub fn increment_button(&self) -> &Holdable {
        &self.increment
    }

    pub fn can_decrement(&self) -> bool {
        self.inner.can_decrement()
    }

    pub fn can_increment(&self) -> bool {
        self.inner.can_increment()
    }

    /// Focus tracking only happens while enabled.
    pub fn focus(&self) {
        if self.inner.props.enabled {
            self.inner.focus.set(true);
        }
    }

    pub fn blur(&self) {
        if self.inner.props.enabled {
            self.inner.focus.set(false);
        }
    }

    pub fn is_focused(&self) -> bool {
        self.inner.focus.get()
    }

    /// The min/max strip shows while focused, if there is a bound.
    pub fn range_visible(&self) -> bool {
        let p = &self.inner.props;
        self.is_focused() && (p.min_value.is_some() || p.max_value.is_some())
    }

    pub fn range_labels(&self) -> (String, String) {
        let p = &self.inner.props;
        (default_format(p.min_value), default_format(p.max_value))
    }

    pub fn side_value_text(&self) -> Option<String> {
        self.inner.props.side_value.map(|v| default_format(Some(v)))
    }

    pub fn unmount(&self) {
        self.decrement.unmount();
        self.increment.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use web_time::Duration;

    fn field(props: SpinFieldProps, start: Option<f64>) -> (Rc<TimerQueue>, Signal<Option<f64>>, SpinField) {
        let q = TimerQueue::new();
        let value = signal(start);
        let v = value.clone();
        let f = SpinField::new(q.clone(), props, value.clone(), move |n| v.set(Some(n)))
            .unwrap();
        (q, value, f)
    }

    #[test]
    fn test_disabled_by_default() {
        let (_, _, f) = field(SpinFieldProps::default(), Some(1.0));
        assert!(!f.can_increment());
        assert!(f.input().is_disabled());
        f.focus();
        assert!(!f.is_focused());
    }

    #[test]
    fn test_hold_stops_at_max() {
        let props = SpinFieldProps {
            enabled: true,
            max_value: Some(4.0),
            ..Default::default()
        };
        let (q, value, f) = field(props, Some(0.0));
        f.increment_button()
            .handle(&PressEvent::mouse(PressEventKind::Start, Vec2::default()));
        q.advance(Duration::from_secs(10));
        assert_eq!(value.get(), Some(4.0));
        assert!(!f.increment_button().is_holding());
        assert!(f.can_decrement());
    }

    #[test]
    fn test_no_value_never_steps() {
        let props = SpinFieldProps {
            enabled: true,
            ..Default::default()
        };
        let (q, value, f) = field(props, None);
        f.decrement_button()
            .handle(&PressEvent::mouse(PressEventKind::Start, Vec2::default()));
        q.advance(Duration::from_secs(1));
        assert_eq!(value.get(), None);
        assert!(!f.decrement_button().is_holding());
    }

    #[test]
    fn test_range_visible_on_focus() {
        let props = SpinFieldProps {
            enabled: true,
            min_value: Some(-5.0),
            step_size: 0.5,
            ..Default::default()
        };
        let (_, _, f) = field(props, Some(0.0));
        assert!(!f.range_visible());
        f.focus();
        assert!(f.range_visible());
        assert_eq!(f.range_labels(), ("-5".to_string(), String::new()));
    }
}
