//! # Behaviour configuration
//!
//! Gesture timings, dropdown sizing and table metrics are read from
//! thread‑local "composition locals", the same way a theme would be:
//!
//! ```rust
//! use trellis_core::*;
//!
//! let sluggish = HoldConfig {
//!     initial_delay_ms: 400,
//!     ..HoldConfig::default()
//! };
//!
//! with_hold_config(sluggish, || {
//!     assert_eq!(hold_config().initial_delay_ms, 400);
//! });
//! assert_eq!(hold_config().initial_delay_ms, 250);
//! ```
//!
//! Widgets read the locals once, at construction.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

use web_time::Duration;

use crate::{Error, Result};

thread_local! {
    static LOCALS_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = RefCell::new(Vec::new());
}

/// Press-and-hold timing.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HoldConfig {
    /// Time a press must last before it counts as a hold.
    pub initial_delay_ms: u64,
    /// Interval scale of the repeat decay schedule.
    pub base_interval_ms: u64,
    pub decay_rate: f64,
    /// Floor of the repeat interval.
    pub minimum_interval_ms: u64,
    /// Displacement (device-independent px) after which a press is a drag.
    pub motion_threshold: f32,
}

impl Default for HoldConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 250,
            base_interval_ms: 700,
            decay_rate: 0.5,
            minimum_interval_ms: 30,
            motion_threshold: 10.0,
        }
    }
}

impl HoldConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.decay_rate.is_finite() || self.decay_rate < 0.0 {
            return Err(Error::InvalidConfig {
                field: "decay_rate",
                reason: format!("must be finite and >= 0, got {}", self.decay_rate),
            });
        }
        if self.minimum_interval_ms == 0 {
            return Err(Error::InvalidConfig {
                field: "minimum_interval_ms",
                reason: "must be > 0".into(),
            });
        }
        if !self.motion_threshold.is_finite() || self.motion_threshold < 0.0 {
            return Err(Error::InvalidConfig {
                field: "motion_threshold",
                reason: format!("must be finite and >= 0, got {}", self.motion_threshold),
            });
        }
        Ok(())
    }
}

/// Combo box dropdown sizing.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DropdownConfig {
    /// Rows shown before the list starts scrolling.
    pub visible_items: usize,
}

impl Default for DropdownConfig {
    fn default() -> Self {
        Self { visible_items: 5 }
    }
}

impl DropdownConfig {
    pub fn validate(&self) -> Result<()> {
        if self.visible_items == 0 {
            return Err(Error::InvalidConfig {
                field: "visible_items",
                reason: "must be > 0".into(),
            });
        }
        Ok(())
    }
}

/// Data table metrics, in px.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TableConfig {
    pub header_height: f32,
    pub row_height: f32,
    /// Hard floor for resized columns.
    pub min_column_width: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            header_height: 45.0,
            row_height: 40.0,
            min_column_width: 60.0,
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<()> {
        for (field, v) in [
            ("header_height", self.header_height),
            ("row_height", self.row_height),
            ("min_column_width", self.min_column_width),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::InvalidConfig {
                    field,
                    reason: format!("must be finite and >= 0, got {v}"),
                });
            }
        }
        if self.row_height == 0.0 {
            return Err(Error::InvalidConfig {
                field: "row_height",
                reason: "must be > 0".into(),
            });
        }
        Ok(())
    }
}

fn with_locals_frame<R>(f: impl FnOnce() -> R) -> R {
    // Non-panicking frame guard (ensures pop on unwind)
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            LOCALS_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    LOCALS_STACK.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}

fn set_local_boxed(t: TypeId, v: Box<dyn Any>) {
    LOCALS_STACK.with(|st| {
        if let Some(top) = st.borrow_mut().last_mut() {
            top.insert(t, v);
        } else {
            // no frame: create a temporary one
            let mut m = HashMap::new();
            m.insert(t, v);
            st.borrow_mut().push(m);
        }
    });
}

fn local<T: Copy + Default + 'static>() -> T {
    LOCALS_STACK.with(|st| {
        for frame in st.borrow().iter().rev() {
            if let Some(v) = frame.get(&TypeId::of::<T>())
                && let Some(t) = v.downcast_ref::<T>()
            {
                return *t;
            }
        }
        T::default()
    })
}

pub fn with_hold_config<R>(config: HoldConfig, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<HoldConfig>(), Box::new(config));
        f()
    })
}

pub fn hold_config() -> HoldConfig {
    local::<HoldConfig>()
}

pub fn with_dropdown_config<R>(config: DropdownConfig, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<DropdownConfig>(), Box::new(config));
        f()
    })
}

pub fn dropdown_config() -> DropdownConfig {
    local::<DropdownConfig>()
}

pub fn with_table_config<R>(config: TableConfig, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<TableConfig>(), Box::new(config));
        f()
    })
}

pub fn table_config() -> TableConfig {
    local::<TableConfig>()
}
