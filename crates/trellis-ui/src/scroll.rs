//! # Scroll synchronization
//!
//! A data table renders its header and body as two separate grids. Only the
//! body scrolls under user input; the header follows the body's horizontal
//! offset so columns stay aligned.
//!
//! `ScrollSync` holds the shared offsets as signals. The body reports every
//! scroll through [`ScrollSync::on_scroll`]; anything that needs to follow
//! reads [`ScrollSync::scroll_left`] or subscribes.

use trellis_core::*;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollPosition {
    pub left: f32,
    pub top: f32,
}

#[derive(Clone)]
pub struct ScrollSync {
    scroll_left: Signal<f32>,
    scroll_top: Signal<f32>,
}

impl Default for ScrollSync {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollSync {
    pub fn new() -> Self {
        Self {
            scroll_left: signal(0.0),
            scroll_top: signal(0.0),
        }
    }

    /// Records the scrolled grid's offsets. Negative values are clamped to 0.
    pub fn on_scroll(&self, pos: ScrollPosition) {
        let left = pos.left.max(0.0);
        let top = pos.top.max(0.0);
        if self.scroll_left.get() != left {
            self.scroll_left.set(left);
        }
        if self.scroll_top.get() != top {
            self.scroll_top.set(top);
        }
    }

    pub fn scroll_left(&self) -> f32 {
        self.scroll_left.get()
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top.get()
    }

    pub fn position(&self) -> ScrollPosition {
        ScrollPosition {
            left: self.scroll_left.get(),
            top: self.scroll_top.get(),
        }
    }

    /// Follows horizontal changes only; vertical scrolling is the body's own
    /// business.
    pub fn subscribe_left(&self, f: impl Fn(f32) + 'static) -> SubId {
        self.scroll_left.subscribe(move |v| f(*v))
    }

    pub fn unsubscribe_left(&self, id: SubId) -> bool {
        self.scroll_left.unsubscribe(id)
    }
}
