use std::cell::Cell;

use smallvec::SmallVec;

use crate::{NodeId, Vec2};

/// A single pointer or touch coordinate at one instant.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContactPoint {
    pub x: f32,
    pub y: f32,
}

impl ContactPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Vec2> for ContactPoint {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// Contact points of one event. Mouse events carry exactly one, touch events
/// one per active finger.
pub type ContactPoints = SmallVec<[ContactPoint; 2]>;

/// Largest per-axis displacement between two point lists, pairing points by
/// index over the shorter list.
pub fn max_displacement(a: &[ContactPoint], b: &[ContactPoint]) -> f32 {
    a.iter()
        .zip(b.iter())
        .fold(0.0f32, |max, (p, q)| {
            max.max((q.x - p.x).abs()).max((q.y - p.y).abs())
        })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressEventKind {
    /// mouse-down / touch-start
    Start,
    /// mouse-move / touch-move
    Move,
    /// mouse-up / touch-end
    End,
    /// mouse-leave
    Leave,
    /// touch-cancel
    Cancel,
}

/// Pointer event normalized at the boundary: downstream code only ever looks
/// at the contact point list.
#[derive(Clone, Debug)]
pub struct PressEvent {
    pub pointer: PointerKind,
    pub kind: PressEventKind,
    pub points: ContactPoints,
    default_prevented: Cell<bool>,
}

impl PressEvent {
    pub fn mouse(kind: PressEventKind, position: Vec2) -> Self {
        let mut points = ContactPoints::new();
        points.push(position.into());
        Self {
            pointer: PointerKind::Mouse,
            kind,
            points,
            default_prevented: Cell::new(false),
        }
    }

    /// `touches` are the fingers still on the surface, so a touch-end usually
    /// carries fewer points than its touch-start.
    pub fn touch(kind: PressEventKind, touches: impl IntoIterator<Item = ContactPoint>) -> Self {
        Self {
            pointer: PointerKind::Touch,
            kind,
            points: touches.into_iter().collect(),
            default_prevented: Cell::new(false),
        }
    }

    pub fn contact_points(&self) -> &[ContactPoint] {
        &self.points
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool, // Cmd on Mac, Win key on Windows
}

impl Modifiers {
    /// alt, ctrl or meta held; shift is not a command modifier.
    pub fn any_command(&self) -> bool {
        self.alt || self.ctrl || self.meta
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Character(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    Space,
}

#[derive(Clone, Debug)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Focus leaving an element. `related_target` is the element receiving focus,
/// if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusEvent {
    pub related_target: Option<NodeId>,
}

/// Animation completion, bubbling: `target` is the node whose animation ended,
/// `current_target` the node whose handler is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationEndEvent {
    pub target: NodeId,
    pub current_target: NodeId,
}

impl AnimationEndEvent {
    pub fn from_self(&self) -> bool {
        self.target == self.current_target
    }
}
