//! # Surface
//!
//! The host side of the library: a tree of element nodes with their last
//! measured geometry, the viewport size, and the window/document event hub.
//!
//! A platform runner keeps the surface in sync with its real element tree
//! (`set_bounds` after layout, `resize_viewport` on window resize,
//! `notify_scroll` on scroll). Widgets only read from it and listen to it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

use crate::{BoundingBox, EventHub, EventMask, ViewportSize};

new_key_type! {
    pub struct NodeId;
}

#[derive(Default)]
struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    bounds: Option<BoundingBox>,
}

pub struct Surface {
    nodes: RefCell<SlotMap<NodeId, NodeData>>,
    root: NodeId,
    viewport: Cell<ViewportSize>,
    events: EventHub,
}

impl Surface {
    pub fn new(viewport: ViewportSize) -> Rc<Self> {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeData::default());
        Rc::new(Self {
            nodes: RefCell::new(nodes),
            root,
            viewport: Cell::new(viewport),
            events: EventHub::new(),
        })
    }

    /// The document body; portals attach their hosts here.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn events(&self) -> &EventHub {
        &self.events
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport.get()
    }

    pub fn resize_viewport(&self, size: ViewportSize) {
        self.viewport.set(size);
        self.events.emit(EventMask::RESIZE);
    }

    pub fn notify_scroll(&self) {
        self.events.emit(EventMask::SCROLL);
    }

    /// Signals that the host's main content area changed size.
    pub fn notify_main_resized(&self) {
        self.events.emit(EventMask::MAIN_RESIZED);
    }

    /// Creates a node under `parent` (the root when `None`).
    pub fn create_node(&self, parent: Option<NodeId>) -> NodeId {
        let parent = parent.unwrap_or(self.root);
        let mut nodes = self.nodes.borrow_mut();
        let id = nodes.insert(NodeData {
            parent: Some(parent),
            ..Default::default()
        });
        if let Some(p) = nodes.get_mut(parent) {
            p.children.push(id);
        }
        id
    }

    /// Removes `node` and its whole subtree. The root cannot be removed.
    pub fn remove_node(&self, node: NodeId) -> bool {
        if node == self.root {
            log::warn!("attempted to remove the surface root");
            return false;
        }
        let mut nodes = self.nodes.borrow_mut();
        let Some(data) = nodes.remove(node) else {
            return false;
        };
        if let Some(parent) = data.parent.and_then(|p| nodes.get_mut(p)) {
            parent.children.retain(|c| *c != node);
        }
        let mut stack = data.children;
        while let Some(child) = stack.pop() {
            if let Some(d) = nodes.remove(child) {
                stack.extend(d.children);
            }
        }
        true
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.borrow().contains_key(node)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow().get(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .borrow()
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// True when `ancestor` is `node` itself or one of its parents.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    pub fn set_bounds(&self, node: NodeId, bounds: BoundingBox) {
        if let Some(n) = self.nodes.borrow_mut().get_mut(node) {
            n.bounds = Some(bounds);
        }
    }

    /// Last measured geometry; `None` while the node is unmounted or not yet
    /// laid out.
    pub fn bounds(&self, node: NodeId) -> Option<BoundingBox> {
        self.nodes.borrow().get(node).and_then(|n| n.bounds)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.borrow().len()
    }
}
