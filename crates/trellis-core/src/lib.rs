//! # Signals, Scopes, and the Surface
//!
//! Trellis widgets are plain state machines. They never own an element tree or
//! a clock; instead they are handed a few small capabilities from this crate:
//!
//! - `Signal<T>` and `Observers<A>`: observable values and explicit observer
//!   lists.
//! - `Scope` / `Dispose`: ownership of cleanups for one mounted lifetime.
//! - `Surface`: measured element geometry, the viewport, and window events.
//! - `TimerHost`: one-shot timers.
//!
//! ## Signals
//!
//! ```rust
//! use trellis_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! Subscribing hands back a `SubId`. There is no implicit dependency tracking:
//! whoever subscribes must unsubscribe with the same id.
//!
//! ## Scopes and cleanup
//!
//! ```rust
//! use trellis_core::*;
//!
//! let surface = Surface::new(Size::new(800.0, 600.0));
//! let scope = Scope::new();
//! scope.run(|| {
//!     effect(|| surface.events().listen(EventMask::RESIZE, |_| log::info!("resized")))
//! });
//! assert_eq!(surface.events().listener_count(), 1);
//! scope.dispose();
//! assert_eq!(surface.events().listener_count(), 0);
//! ```
//!
//! A widget typically keeps one scope per lifecycle phase ("dropdown open",
//! "resize in progress") and disposes it when the phase ends, which removes
//! every listener installed for that phase.
//!
//! ## Timers
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use trellis_core::*;
//! use web_time::Duration;
//!
//! let timers = TimerQueue::new();
//! let fired = Rc::new(Cell::new(false));
//! let f = fired.clone();
//! timers.set_timeout(Duration::from_millis(250), Box::new(move || f.set(true)));
//!
//! timers.advance(Duration::from_millis(249));
//! assert!(!fired.get());
//! timers.advance(Duration::from_millis(1));
//! assert!(fired.get());
//! ```

pub mod config;
pub mod effects;
pub mod error;
pub mod events;
pub mod geometry;
pub mod input;
pub mod scope;
pub mod signal;
pub mod surface;
pub mod tests;
pub mod timer;

pub use config::*;
pub use effects::*;
pub use error::*;
pub use events::*;
pub use geometry::*;
pub use input::*;
pub use scope::*;
pub use signal::*;
pub use surface::*;
pub use timer::*;
