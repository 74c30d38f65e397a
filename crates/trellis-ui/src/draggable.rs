use std::cell::Cell;
use std::rc::Rc;

use trellis_core::{PressEvent, PressEventKind};

/// Horizontal drag handle, e.g. a column resize grip.
///
/// Each move reports `delta_x`, the cumulative horizontal distance from where
/// the drag started. The handle itself never moves, so deltas do not
/// accumulate across drags.
#[derive(Clone)]
pub struct DragHandle {
    start_x: Rc<Cell<Option<f32>>>,
    on_drag: Rc<dyn Fn(f32)>,
    on_stop: Rc<dyn Fn()>,
}

impl DragHandle {
    pub fn new(on_drag: impl Fn(f32) + 'static, on_stop: impl Fn() + 'static) -> Self {
        Self {
            start_x: Rc::new(Cell::new(None)),
            on_drag: Rc::new(on_drag),
            on_stop: Rc::new(on_stop),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.start_x.get().is_some()
    }

    /// Leaving the handle does not end a drag; only release or cancel do.
    pub fn handle(&self, ev: &PressEvent) {
        let x = ev.contact_points().first().map(|p| p.x);
        match ev.kind {
            PressEventKind::Start => {
                if let Some(x) = x {
                    ev.prevent_default();
                    self.start_x.set(Some(x));
                }
            }
            PressEventKind::Move => {
                if let (Some(start), Some(x)) = (self.start_x.get(), x) {
                    (self.on_drag)(x - start);
                }
            }
            PressEventKind::End | PressEventKind::Cancel => {
                if self.start_x.take().is_some() {
                    (self.on_stop)();
                }
            }
            PressEventKind::Leave => {}
        }
    }
}
