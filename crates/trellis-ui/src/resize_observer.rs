use trellis_core::{DisposeGuard, EventMask, Surface};

/// Calls `on_resize` whenever the host reports that its main content area
/// changed size. Listening stops when the observer is dropped.
pub struct ResizeObserver {
    _listener: DisposeGuard,
}

impl ResizeObserver {
    pub fn new(surface: &Surface, on_resize: impl Fn() + 'static) -> Self {
        let listener = surface
            .events()
            .listen(EventMask::MAIN_RESIZED, move |_| on_resize())
            .guard();
        Self {
            _listener: listener,
        }
    }

    pub fn unmount(self) {}
}
