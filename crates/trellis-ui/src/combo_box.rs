//! # Combo box
//!
//! A value line that opens a floating dropdown list of items. The dropdown is
//! rendered through a [`Portal`] and placed by [`compute_placement`] relative
//! to the combo box's on-screen box:
//!
//! - rows are as tall as the value line;
//! - up to `visible_items` rows are shown, the rest scroll;
//! - the list opens below unless it does not fit there and there is more room
//!   above;
//! - it is clipped to the room on the chosen side;
//! - it is left-aligned with the anchor and exactly as wide.
//!
//! While open, the combo box listens to window resize and scroll and
//! recomputes the placement on each event. Listeners are installed in a scope
//! that is disposed on close, so a closed combo box costs nothing.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use trellis_core::*;

use crate::portal::Portal;
use crate::virtual_list::VirtualList;

pub const PLACEHOLDER: &str = "Please select …";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropdownSide {
    Above,
    Below,
}

/// Where the dropdown goes, in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropdownPlacement {
    pub side: DropdownSide,
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
    pub item_height: f32,
}

pub fn compute_placement(
    anchor: &BoundingBox,
    viewport: ViewportSize,
    item_count: usize,
    visible_items: usize,
) -> DropdownPlacement {
    let item_height = anchor.height;
    let space_below = viewport.height - anchor.bottom;
    let space_above = anchor.top;

    let height = item_count.min(visible_items) as f32 * item_height;
    let show_above = space_below < height && space_above > space_below;
    let height = height.min(if show_above { space_above } else { space_below });

    let (side, top) = if show_above {
        (DropdownSide::Above, anchor.top - height)
    } else {
        (DropdownSide::Below, anchor.bottom)
    };

    DropdownPlacement {
        side,
        top,
        left: anchor.left,
        width: anchor.width,
        height,
        item_height,
    }
}

/// One rendered dropdown row.
#[derive(Clone, Debug, PartialEq)]
pub struct DropdownRow {
    pub index: usize,
    /// Offset inside the dropdown's scroll content, px.
    pub top: f32,
    pub text: String,
    /// The row shows the current value.
    pub active: bool,
    /// Every second row gets the alternate background.
    pub striped: bool,
}

struct OpenDropdown {
    scope: Scope,
    portal: Portal,
    placement: Option<DropdownPlacement>,
}

impl Drop for OpenDropdown {
    fn drop(&mut self) {
        self.scope.clone().dispose();
    }
}

type RenderItem<T> = dyn Fn(&T) -> String;

struct ComboInner<T: 'static> {
    surface: Rc<Surface>,
    anchor: NodeId,
    config: DropdownConfig,
    items: RefCell<Vec<T>>,
    value: Signal<Option<T>>,
    render_item: Rc<RenderItem<T>>,
    on_change: RefCell<Option<Rc<dyn Fn(&T)>>>,
    disabled: Cell<bool>,
    open: RefCell<Option<OpenDropdown>>,
}

/// Controlled combo box: `value` belongs to the host, selection is reported
/// through `on_change`.
pub struct ComboBox<T: 'static> {
    inner: Rc<ComboInner<T>>,
}

impl<T> Clone for ComboBox<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + PartialEq + ToString + 'static> ComboBox<T> {
    /// Items are rendered with `ToString`.
    pub fn new(
        surface: Rc<Surface>,
        anchor: NodeId,
        items: Vec<T>,
        value: Signal<Option<T>>,
    ) -> Result<Self> {
        Self::with_renderer(surface, anchor, items, value, |item: &T| item.to_string())
    }
}

impl<T: Clone + PartialEq + 'static> ComboBox<T> {
    /// `anchor` is the combo box's own node; its measured box drives placement.
    /// Reads the [`dropdown_config`] local and fails if it does not validate.
    pub fn with_renderer(
        surface: Rc<Surface>,
        anchor: NodeId,
        items: Vec<T>,
        value: Signal<Option<T>>,
        render_item: impl Fn(&T) -> String + 'static,
    ) -> Result<Self> {
        let config = dropdown_config();
        config.validate()?;
        Ok(Self {
            inner: Rc::new(ComboInner {
                surface,
                anchor,
                config,
                items: RefCell::new(items),
                value,
                render_item: Rc::new(render_item),
                on_change: RefCell::new(None),
                disabled: Cell::new(false),
                open: RefCell::new(None),
            }),
        })
    }

    pub fn on_change(&self, f: impl Fn(&T) + 'static) {
        *self.inner.on_change.borrow_mut() = Some(Rc::new(f));
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.inner.disabled.set(disabled);
    }

    pub fn is_disabled(&self) -> bool {
        self.inner.disabled.get()
    }

    pub fn set_items(&self, items: Vec<T>) {
        *self.inner.items.borrow_mut() = items;
        self.update_dropdown();
    }

    pub fn item_count(&self) -> usize {
        self.inner.items.borrow().len()
    }

    pub fn is_open(&self) -> bool {
        self.inner.open.borrow().is_some()
    }

    /// Text of the value line.
    pub fn display_text(&self) -> String {
        self.inner.value.with(|v| match v {
            Some(v) => (self.inner.render_item)(v),
            None => PLACEHOLDER.to_string(),
        })
    }

    /// Click on the value line.
    pub fn toggle_open(&self) {
        if self.inner.disabled.get() {
            log::trace!("combo box disabled, toggle ignored");
            return;
        }
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    fn open(&self) {
        let scope = Scope::new();
        let weak: Weak<ComboInner<T>> = Rc::downgrade(&self.inner);
        let surface = self.inner.surface.clone();
        scope.run(|| {
            effect(move || {
                surface
                    .events()
                    .listen(EventMask::RESIZE | EventMask::SCROLL, move |_| {
                        if let Some(inner) = weak.upgrade() {
                            ComboBox { inner }.update_dropdown();
                        }
                    })
            });
        });

        let portal = Portal::new(self.inner.surface.clone(), true);
        *self.inner.open.borrow_mut() = Some(OpenDropdown {
            scope,
            portal,
            placement: None,
        });
        log::debug!("combo box opened");
        self.update_dropdown();
    }

    /// Closes the dropdown, releasing its listeners and portal host.
    pub fn close(&self) {
        let open = self.inner.open.borrow_mut().take();
        if open.is_some() {
            log::debug!("combo box closed");
        }
        drop(open);
    }

    /// Re-reads the anchor geometry and viewport. No-op while closed.
    pub fn update_dropdown(&self) {
        let placement = self.inner.surface.bounds(self.inner.anchor).map(|anchor| {
            compute_placement(
                &anchor,
                self.inner.surface.viewport(),
                self.item_count(),
                self.inner.config.visible_items,
            )
        });
        if let Some(open) = self.inner.open.borrow_mut().as_mut() {
            log::trace!("dropdown placement {placement:?}");
            open.placement = placement;
        }
    }

    /// `None` while closed or while the anchor has not been measured.
    pub fn placement(&self) -> Option<DropdownPlacement> {
        self.inner.open.borrow().as_ref().and_then(|o| o.placement)
    }

    /// Node the dropdown is rendered into while open.
    pub fn portal_host(&self) -> Option<NodeId> {
        self.inner.open.borrow().as_ref().and_then(|o| o.portal.host())
    }

    /// Rows to render for the dropdown scrolled to `scroll_offset`.
    pub fn dropdown_rows(&self, scroll_offset: f32) -> Vec<DropdownRow> {
        let Some(p) = self.placement() else {
            return Vec::new();
        };
        let items = self.inner.items.borrow();
        let list = VirtualList::new(items.len(), p.item_height, Size::new(p.width, p.height));
        list.set_offset(scroll_offset);

        self.inner.value.with(|value| {
            list.rows()
                .into_iter()
                .map(|row| {
                    let item = &items[row.index];
                    DropdownRow {
                        index: row.index,
                        top: row.top,
                        text: (self.inner.render_item)(item),
                        active: value.as_ref() == Some(item),
                        striped: row.index % 2 == 1,
                    }
                })
                .collect()
        })
    }

    /// Click on a dropdown row.
    pub fn select(&self, index: usize) {
        let item = self.inner.items.borrow().get(index).cloned();
        let Some(item) = item else {
            log::warn!("combo box: no item at index {index}");
            return;
        };

        let changed = self.inner.value.with(|v| v.as_ref() != Some(&item));
        if changed {
            let cb = self.inner.on_change.borrow().clone();
            if let Some(cb) = cb {
                cb(&item);
            }
        }
        self.close();
    }

    pub fn unmount(&self) {
        self.close();
    }
}
