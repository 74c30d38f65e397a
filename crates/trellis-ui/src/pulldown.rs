//! # Pulldown menus
//!
//! A [`PulldownMenuButton`] owns a button node and, while it is not closed, a
//! [`Pulldown`] surface listing items and groups of items.
//!
//! Open and close are animated by the host; the menu only learns that an
//! animation finished through [`PulldownMenuButton::animation_end`]:
//!
//! ```text
//!            click                 animation end (child)
//!  Closed ───────────▶ Opening ─────────────────────────▶ Open
//!    ▲                   │ click / blur / item click        │
//!    │                   ▼                                  │
//!    └──────────────── Closing ◀────────────────────────────┘
//!     animation end (self)          click / blur / item click
//! ```
//!
//! The open animation runs on the pulldown's children, so its end arrives
//! from a descendant; the close animation runs on the pulldown container
//! itself.
//!
//! Items observe the open/close transitions: once the pulldown is fully open,
//! an active item asks to be revealed (scrolled into view). Observers are
//! registered when the pulldown mounts and released when it unmounts.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use trellis_core::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MenuState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl MenuState {
    /// Opening and Open want the pulldown shown.
    pub fn wants_open(self) -> bool {
        matches!(self, MenuState::Opening | MenuState::Open)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PulldownItem<D> {
    pub caption: Option<String>,
    pub icon: Option<String>,
    pub disabled: bool,
    pub is_active: bool,
    pub data: Option<D>,
}

impl<D> Default for PulldownItem<D> {
    fn default() -> Self {
        Self {
            caption: None,
            icon: None,
            disabled: false,
            is_active: false,
            data: None,
        }
    }
}

impl<D> PulldownItem<D> {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: Some(caption.into()),
            ..Self::default()
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }

    pub fn data(mut self, data: D) -> Self {
        self.data = Some(data);
        self
    }

    /// Icon without caption.
    pub fn is_icon_only(&self) -> bool {
        self.icon.is_some() && self.caption.is_none()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PulldownGroup<D> {
    pub caption: String,
    pub items: Vec<PulldownItem<D>>,
}

impl<D> PulldownGroup<D> {
    pub fn new(caption: impl Into<String>, items: Vec<PulldownItem<D>>) -> Self {
        Self {
            caption: caption.into(),
            items,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PulldownEntry<D> {
    Item(PulldownItem<D>),
    Group(PulldownGroup<D>),
}

/// Position of an item: `group` indexes the entry list when the item sits in
/// a group, `item` is the index in the group (or in the entry list).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemPath {
    pub group: Option<usize>,
    pub item: usize,
}

impl ItemPath {
    pub fn top(item: usize) -> Self {
        Self { group: None, item }
    }

    pub fn grouped(group: usize, item: usize) -> Self {
        Self {
            group: Some(group),
            item,
        }
    }
}

fn item_paths<D>(entries: &[PulldownEntry<D>]) -> Vec<(ItemPath, &PulldownItem<D>)> {
    let mut out = Vec::new();
    for (i, e) in entries.iter().enumerate() {
        match e {
            PulldownEntry::Item(item) => out.push((ItemPath::top(i), item)),
            PulldownEntry::Group(g) => {
                out.extend(g.items.iter().enumerate().map(|(j, item)| (ItemPath::grouped(i, j), item)))
            }
        }
    }
    out
}

fn lookup<D: Clone>(
    entries: &[PulldownEntry<D>],
    path: ItemPath,
) -> Option<(Option<PulldownGroup<D>>, PulldownItem<D>)> {
    match path.group {
        None => match entries.get(path.item)? {
            PulldownEntry::Item(item) => Some((None, item.clone())),
            PulldownEntry::Group(_) => None,
        },
        Some(g) => match entries.get(g)? {
            PulldownEntry::Group(group) => {
                let item = group.items.get(path.item)?.clone();
                Some((Some(group.clone()), item))
            }
            PulldownEntry::Item(_) => None,
        },
    }
}

/// The mounted pulldown surface. Exists only while its menu is not closed.
pub struct Pulldown {
    surface: Rc<Surface>,
    node: NodeId,
    is_open: Cell<bool>,
    observers: Observers<bool>,
    item_subscriptions: RefCell<SmallVec<[SubId; 8]>>,
    on_opened_closed: Box<dyn Fn(bool)>,
}

impl Pulldown {
    fn mount<D>(
        surface: Rc<Surface>,
        parent: Option<NodeId>,
        entries: &[PulldownEntry<D>],
        is_open: bool,
        on_reveal: Option<Rc<dyn Fn(ItemPath)>>,
        on_opened_closed: impl Fn(bool) + 'static,
    ) -> Self {
        let node = surface.create_node(parent);
        let pulldown = Self {
            surface,
            node,
            is_open: Cell::new(is_open),
            observers: Observers::new(),
            item_subscriptions: RefCell::new(SmallVec::new()),
            on_opened_closed: Box::new(on_opened_closed),
        };

        for (path, item) in item_paths(entries) {
            let active = item.is_active;
            let reveal = on_reveal.clone();
            let id = pulldown.subscribe_open_close(move |open| {
                if *open && active {
                    if let Some(reveal) = &reveal {
                        log::trace!("revealing active item {path:?}");
                        reveal(path);
                    }
                }
            });
            pulldown.item_subscriptions.borrow_mut().push(id);
        }
        log::debug!("pulldown mounted with {} items", pulldown.observers.len());
        pulldown
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn is_open(&self) -> bool {
        self.is_open.get()
    }

    fn set_open(&self, open: bool) {
        self.is_open.set(open);
    }

    pub fn subscribe_open_close(&self, f: impl Fn(&bool) + 'static) -> SubId {
        self.observers.subscribe(f)
    }

    pub fn unsubscribe_open_close(&self, id: SubId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    /// Completion of the open animation (on a descendant) or of the close
    /// animation (on the container itself). Events not delivered to this
    /// pulldown's node are ignored.
    pub fn animation_end(&self, ev: &AnimationEndEvent) {
        if ev.current_target != self.node {
            log::trace!("animation end for another node ignored");
            return;
        }
        let opened = match (self.is_open.get(), ev.from_self()) {
            (true, false) => true,
            (false, true) => false,
            _ => return,
        };
        (self.on_opened_closed)(opened);
        self.observers.notify(&opened);
    }

    /// Drops the item observers and detaches the node. Idempotent.
    fn release(&self) {
        let subs = std::mem::take(&mut *self.item_subscriptions.borrow_mut());
        for id in subs {
            self.observers.unsubscribe(id);
        }
        if self.surface.remove_node(self.node) {
            log::debug!("pulldown unmounted");
        }
    }
}

impl Drop for Pulldown {
    fn drop(&mut self) {
        self.release();
    }
}

type ItemClick<D> = dyn Fn(Option<&PulldownGroup<D>>, &PulldownItem<D>);

struct MenuInner<D: 'static> {
    surface: Rc<Surface>,
    container: NodeId,
    button: NodeId,
    entries: RefCell<Vec<PulldownEntry<D>>>,
    state: Cell<MenuState>,
    pulldown: RefCell<Option<Rc<Pulldown>>>,
    on_click: RefCell<Option<Rc<ItemClick<D>>>>,
    on_button_click: RefCell<Option<Rc<dyn Fn()>>>,
    on_reveal: RefCell<Option<Rc<dyn Fn(ItemPath)>>>,
}

impl<D> Drop for MenuInner<D> {
    fn drop(&mut self) {
        self.pulldown.get_mut().take();
        self.surface.remove_node(self.container);
    }
}

/// Button that opens a pulldown menu.
pub struct PulldownMenuButton<D: 'static> {
    inner: Rc<MenuInner<D>>,
}

impl<D> Clone for PulldownMenuButton<D> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<D: Clone + 'static> PulldownMenuButton<D> {
    /// Creates the menu's container under `parent` with the button inside it.
    pub fn new(surface: Rc<Surface>, parent: Option<NodeId>, entries: Vec<PulldownEntry<D>>) -> Self {
        let container = surface.create_node(parent);
        let button = surface.create_node(Some(container));
        Self {
            inner: Rc::new(MenuInner {
                surface,
                container,
                button,
                entries: RefCell::new(entries),
                state: Cell::new(MenuState::Closed),
                pulldown: RefCell::new(None),
                on_click: RefCell::new(None),
                on_button_click: RefCell::new(None),
                on_reveal: RefCell::new(None),
            }),
        }
    }

    /// Enabled item clicked. The menu is already closing when this runs.
    pub fn on_click(&self, f: impl Fn(Option<&PulldownGroup<D>>, &PulldownItem<D>) + 'static) {
        *self.inner.on_click.borrow_mut() = Some(Rc::new(f));
    }

    pub fn on_button_click(&self, f: impl Fn() + 'static) {
        *self.inner.on_button_click.borrow_mut() = Some(Rc::new(f));
    }

    /// Asked to scroll an active item into view once fully open.
    pub fn on_reveal(&self, f: impl Fn(ItemPath) + 'static) {
        *self.inner.on_reveal.borrow_mut() = Some(Rc::new(f));
    }

    pub fn state(&self) -> MenuState {
        self.inner.state.get()
    }

    pub fn button_node(&self) -> NodeId {
        self.inner.button
    }

    pub fn pulldown(&self) -> Option<Rc<Pulldown>> {
        self.inner.pulldown.borrow().clone()
    }

    pub fn pulldown_node(&self) -> Option<NodeId> {
        self.inner.pulldown.borrow().as_ref().map(|p| p.node())
    }

    pub fn is_pulldown_present(&self) -> bool {
        self.inner.pulldown.borrow().is_some()
    }

    pub fn entries(&self) -> Vec<PulldownEntry<D>> {
        self.inner.entries.borrow().clone()
    }

    /// Replaces the menu content. A mounted pulldown is rebuilt so item
    /// observers match the new items.
    pub fn set_entries(&self, entries: Vec<PulldownEntry<D>>) {
        *self.inner.entries.borrow_mut() = entries;
        let old = self.inner.pulldown.borrow_mut().take();
        if let Some(p) = old {
            p.release();
        }
        self.sync_pulldown();
    }

    fn set_state(&self, next: MenuState) {
        let prev = self.inner.state.replace(next);
        if prev != next {
            log::debug!("menu {prev:?} -> {next:?}");
        }
        self.sync_pulldown();
    }

    /// Mounts or unmounts the pulldown to match the state and entries.
    fn sync_pulldown(&self) {
        let state = self.inner.state.get();
        let present = state != MenuState::Closed && !self.inner.entries.borrow().is_empty();

        if !present {
            let old = self.inner.pulldown.borrow_mut().take();
            if let Some(p) = old {
                p.release();
            }
            return;
        }

        if let Some(p) = self.inner.pulldown.borrow().as_ref() {
            p.set_open(state.wants_open());
            return;
        }

        let weak: Weak<MenuInner<D>> = Rc::downgrade(&self.inner);
        let pulldown = Pulldown::mount(
            self.inner.surface.clone(),
            Some(self.inner.container),
            &self.inner.entries.borrow(),
            state.wants_open(),
            self.inner.on_reveal.borrow().clone(),
            move |opened| {
                if let Some(inner) = weak.upgrade() {
                    PulldownMenuButton { inner }.opened_closed(opened);
                }
            },
        );
        *self.inner.pulldown.borrow_mut() = Some(Rc::new(pulldown));
    }

    fn opened_closed(&self, opened: bool) {
        self.set_state(if opened { MenuState::Open } else { MenuState::Closed });
    }

    pub fn button_click(&self) {
        let next = match self.state() {
            MenuState::Closed | MenuState::Closing => MenuState::Opening,
            MenuState::Opening | MenuState::Open => MenuState::Closing,
        };
        self.set_state(next);

        let cb = self.inner.on_button_click.borrow().clone();
        if let Some(cb) = cb {
            cb();
        }
    }

    /// Focus left the button or the pulldown. Focus moving inside either of
    /// them keeps the menu open.
    pub fn blur(&self, ev: &FocusEvent) {
        if !self.state().wants_open() {
            return;
        }
        if let Some(target) = ev.related_target {
            let surface = &self.inner.surface;
            let inside_button = surface.is_ancestor_or_self(self.inner.button, target);
            let inside_pulldown = self
                .pulldown_node()
                .is_some_and(|p| surface.is_ancestor_or_self(p, target));
            if inside_button || inside_pulldown {
                log::trace!("focus moved within the menu");
                return;
            }
        }
        self.set_state(MenuState::Closing);
    }

    /// Animation end bubbling up to the pulldown container.
    pub fn animation_end(&self, ev: &AnimationEndEvent) {
        // Keep the pulldown alive while it notifies; the transition may
        // unmount it.
        let pulldown = self.pulldown();
        match pulldown {
            Some(p) => p.animation_end(ev),
            None => log::trace!("animation end without pulldown"),
        }
    }

    /// Click on the item at `path`. Disabled items ignore clicks.
    pub fn item_click(&self, path: ItemPath) {
        let found = lookup(&self.inner.entries.borrow(), path);
        let Some((group, item)) = found else {
            log::warn!("pulldown: no item at {path:?}");
            return;
        };
        if item.disabled {
            log::trace!("click on disabled item {path:?} ignored");
            return;
        }

        self.set_state(MenuState::Closing);
        let cb = self.inner.on_click.borrow().clone();
        if let Some(cb) = cb {
            cb(group.as_ref(), &item);
        }
    }

    /// Tears down the pulldown and releases item observers.
    pub fn unmount(&self) {
        self.inner.state.set(MenuState::Closed);
        let old = self.inner.pulldown.borrow_mut().take();
        if let Some(p) = old {
            p.release();
        }
    }
}
