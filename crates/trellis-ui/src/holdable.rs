//! # Press and hold
//!
//! `Holdable` turns one press into a self-cancelling sequence of repeat
//! callbacks, the way a spin button keeps counting while it is held down.
//!
//! Timeline of a session:
//!
//! - press start: timer armed for `initial_delay` (250 ms by default).
//! - delay elapsed: `on_hold(event, 0)`.
//! - iteration `n >= 1` follows after [`repeat_interval`]`(n)`, which
//!   shrinks exponentially down to a floor.
//! - press end: `on_hold_complete(event, moved)` if the delay had elapsed,
//!   otherwise `on_press(event)` (a tap), unless the pointer moved too far.
//!
//! Moving any contact point more than `motion_threshold` on either axis marks
//! the session as aborted: the timer keeps running but the next iteration
//! stops the chain instead of calling `on_hold`.
//!
//! ```rust
//! use std::rc::Rc;
//! use trellis_core::*;
//! use trellis_ui::holdable::{HoldCallbacks, Holdable};
//! use web_time::Duration;
//!
//! let timers = TimerQueue::new();
//! let hold = Holdable::new(
//!     timers.clone(),
//!     HoldCallbacks::new(|_ev, iteration| iteration < 3),
//! )
//! .unwrap();
//!
//! let down = PressEvent::mouse(PressEventKind::Start, Vec2::default());
//! hold.handle(&down);
//! assert!(down.default_prevented());
//! timers.advance(Duration::from_secs(5));
//! assert!(!hold.is_holding());
//! ```

use std::cell::RefCell;
use std::f64::consts::E;
use std::rc::{Rc, Weak};

use trellis_core::*;
use web_time::Duration;

/// Exponential decay of `initial` at step `x`.
pub fn decay(initial: f64, x: f64, rate: f64) -> f64 {
    if initial == 0.0 {
        return 0.0;
    }
    (1.0 - x * rate).exp() / E * initial
}

/// Delay between iteration `n - 1` and iteration `n`.
pub fn repeat_interval(config: &HoldConfig, n: u32) -> Duration {
    let ms = decay(config.base_interval_ms as f64, n as f64, config.decay_rate)
        .max(config.minimum_interval_ms as f64);
    Duration::from_micros((ms * 1000.0).round() as u64)
}

type HoldFn = dyn Fn(&PressEvent, u32) -> bool;
type HoldCompleteFn = dyn Fn(&PressEvent, bool);
type PressFn = dyn Fn(&PressEvent);

/// Callbacks of a holdable. `on_hold` returns `true` to keep repeating.
#[derive(Clone)]
pub struct HoldCallbacks {
    on_hold: Rc<HoldFn>,
    on_hold_complete: Option<Rc<HoldCompleteFn>>,
    on_press: Option<Rc<PressFn>>,
}

impl HoldCallbacks {
    pub fn new(on_hold: impl Fn(&PressEvent, u32) -> bool + 'static) -> Self {
        Self {
            on_hold: Rc::new(on_hold),
            on_hold_complete: None,
            on_press: None,
        }
    }

    /// Called once per session that got past the initial delay. The flag
    /// tells whether the pointer moved beyond the threshold.
    pub fn on_hold_complete(mut self, f: impl Fn(&PressEvent, bool) + 'static) -> Self {
        self.on_hold_complete = Some(Rc::new(f));
        self
    }

    /// Called when the press ends before the initial delay without moving.
    pub fn on_press(mut self, f: impl Fn(&PressEvent) + 'static) -> Self {
        self.on_press = Some(Rc::new(f));
        self
    }
}

/// Per-press state. `timer` is `Some` exactly while a hold is in progress.
#[derive(Default)]
struct HoldSession {
    start_points: Option<ContactPoints>,
    start_event: Option<PressEvent>,
    iteration: u32,
    exceeded_initial_delay: bool,
    should_abort: bool,
    timer: Option<TimerId>,
}

struct HoldInner {
    timers: Rc<dyn TimerHost>,
    config: HoldConfig,
    callbacks: HoldCallbacks,
    session: RefCell<HoldSession>,
}

/// Press-and-hold controller for one element. Cloning yields another handle
/// to the same controller.
#[derive(Clone)]
pub struct Holdable {
    inner: Rc<HoldInner>,
}

impl Holdable {
    /// Uses the [`hold_config`] local for timing.
    pub fn new(timers: Rc<dyn TimerHost>, callbacks: HoldCallbacks) -> Result<Self> {
        Self::with_config(timers, callbacks, hold_config())
    }

    /// Fails with [`Error::InvalidConfig`] if `config` does not validate.
    pub fn with_config(
        timers: Rc<dyn TimerHost>,
        callbacks: HoldCallbacks,
        config: HoldConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner: Rc::new(HoldInner {
                timers,
                config,
                callbacks,
                session: RefCell::new(HoldSession::default()),
            }),
        })
    }

    pub fn config(&self) -> &HoldConfig {
        &self.inner.config
    }

    /// True from press start until the session stops.
    pub fn is_holding(&self) -> bool {
        self.inner.session.borrow().timer.is_some()
    }

    /// Index of the last iteration delivered to `on_hold` in this session.
    pub fn iteration(&self) -> u32 {
        self.inner.session.borrow().iteration
    }

    /// Routes a press event by kind.
    pub fn handle(&self, ev: &PressEvent) {
        match ev.kind {
            PressEventKind::Start => self.press_start(ev),
            PressEventKind::Move => self.press_move(ev),
            PressEventKind::End | PressEventKind::Leave | PressEventKind::Cancel => {
                self.press_end(ev)
            }
        }
    }

    pub fn press_start(&self, ev: &PressEvent) {
        ev.prevent_default();

        let inner = &self.inner;
        let mut s = inner.session.borrow_mut();
        if s.timer.is_some() {
            log::trace!("press start ignored: hold already active");
            return;
        }

        s.exceeded_initial_delay = false;
        s.should_abort = false;
        s.iteration = 0;
        s.start_points = Some(ev.points.clone());
        s.start_event = Some(ev.clone());

        let weak = Rc::downgrade(inner);
        s.timer = Some(inner.timers.set_timeout(
            inner.config.initial_delay(),
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    HoldInner::initial_delay_elapsed(&inner);
                }
            }),
        ));
        log::debug!("hold armed ({} contact points)", ev.points.len());
    }

    pub fn press_move(&self, ev: &PressEvent) {
        self.inner.check_motion(ev.contact_points());
    }

    pub fn press_end(&self, ev: &PressEvent) {
        self.inner.stop(ev);
    }

    /// Cancels an armed timer without firing any callback.
    pub fn unmount(&self) {
        self.inner.cancel();
    }
}

impl HoldInner {
    fn check_motion(&self, points: &[ContactPoint]) {
        let mut s = self.session.borrow_mut();
        let Some(start) = s.start_points.as_ref() else {
            return;
        };
        let delta = max_displacement(start, points);
        log::trace!("hold motion {delta:.1}px");
        if delta > self.config.motion_threshold {
            s.should_abort = true;
        }
    }

    fn initial_delay_elapsed(this: &Rc<Self>) {
        let event = {
            let mut s = this.session.borrow_mut();
            s.exceeded_initial_delay = true;
            s.start_event.clone()
        };
        let Some(event) = event else {
            return;
        };
        if this.iterate(0, &event) {
            Self::schedule_next(this, 1, event);
        }
    }

    fn schedule_next(this: &Rc<Self>, n: u32, event: PressEvent) {
        let interval = repeat_interval(&this.config, n);
        log::trace!("hold iteration {n} in {interval:?}");

        let weak: Weak<Self> = Rc::downgrade(this);
        let id = this.timers.set_timeout(
            interval,
            Box::new(move || {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                if inner.session.borrow().timer.is_none() {
                    return;
                }
                if inner.iterate(n, &event) {
                    Self::schedule_next(&inner, n + 1, event);
                }
            }),
        );
        this.session.borrow_mut().timer = Some(id);
    }

    /// Runs iteration `n`. Returns false when the chain must halt: the session
    /// is stopped here, or was already stopped from inside `on_hold`.
    fn iterate(&self, n: u32, event: &PressEvent) -> bool {
        let aborted = {
            let mut s = self.session.borrow_mut();
            if s.timer.is_none() {
                return false;
            }
            s.iteration = n;
            s.should_abort
        };

        let keep_going = !aborted && (self.callbacks.on_hold)(event, n);
        if !keep_going {
            log::debug!("hold halted at iteration {n} (aborted: {aborted})");
            self.stop(event);
            return false;
        }
        self.session.borrow().timer.is_some()
    }

    fn stop(&self, ev: &PressEvent) {
        ev.prevent_default();

        let timer = self.session.borrow_mut().timer.take();
        let Some(timer) = timer else {
            self.session.borrow_mut().start_points = None;
            return;
        };
        self.timers.clear_timeout(timer);
        self.check_motion(ev.contact_points());

        let (exceeded, moved) = {
            let mut s = self.session.borrow_mut();
            s.start_points = None;
            s.start_event = None;
            (s.exceeded_initial_delay, s.should_abort)
        };

        if exceeded {
            log::debug!("hold complete (moved: {moved})");
            if let Some(cb) = &self.callbacks.on_hold_complete {
                cb(ev, moved);
            }
        } else if !moved {
            log::debug!("press");
            if let Some(cb) = &self.callbacks.on_press {
                cb(ev);
            }
        }
    }

    fn cancel(&self) {
        let timer = {
            let mut s = self.session.borrow_mut();
            s.start_points = None;
            s.start_event = None;
            s.timer.take()
        };
        if let Some(id) = timer {
            self.timers.clear_timeout(id);
            log::trace!("hold timer cancelled");
        }
    }
}

impl Drop for HoldInner {
    fn drop(&mut self) {
        if let Some(id) = self.session.get_mut().timer.take() {
            self.timers.clear_timeout(id);
        }
    }
}
