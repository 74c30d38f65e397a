//! Widget behaviour for line-of-business interfaces.
//!
//! Every widget here is headless: it owns state machines, geometry and
//! callback plumbing, and leaves drawing to the host. Widgets talk to the host
//! through the primitives in `trellis_core`: a [`Surface`](trellis_core::Surface)
//! for node geometry and window events, a [`TimerHost`](trellis_core::TimerHost)
//! for timeouts, and [`Signal`](trellis_core::Signal)s for controlled values.
//!
//! The larger pieces:
//!
//! - [`Holdable`]: press-and-hold gesture with accelerating repeat.
//! - [`ComboBox`]: value line plus a viewport-aware floating dropdown.
//! - [`DataTable`]: sortable, resizable, virtualized table layout.
//! - [`PulldownMenuButton`]: button-anchored menu with an animated lifecycle.
//!
//! ```
//! use trellis_core::*;
//! use trellis_ui::*;
//!
//! let timers = TimerQueue::new();
//! let value = signal(Some(3.0));
//! let v = value.clone();
//! let props = SpinFieldProps { enabled: true, ..Default::default() };
//! let field = SpinField::new(timers.clone(), props, value.clone(), move |n| v.set(Some(n)))
//!     .unwrap();
//!
//! field
//!     .increment_button()
//!     .handle(&PressEvent::mouse(PressEventKind::Start, Vec2::default()));
//! timers.advance(web_time::Duration::from_millis(250));
//! assert_eq!(value.get(), Some(4.0));
//! ```

pub mod combo_box;
pub mod data_table;
pub mod draggable;
pub mod holdable;
pub mod navigation_path;
pub mod portal;
pub mod pulldown;
pub mod radio_button;
pub mod resize_observer;
pub mod scroll;
pub mod spin_field;
pub mod switch;
pub mod text_input;
pub mod virtual_list;

pub use combo_box::{ComboBox, DropdownPlacement, DropdownRow, DropdownSide, compute_placement};
pub use data_table::{
    BodyCell, CellValue, Column, DataTable, HeaderCell, Record, RowParity, SortDirection,
    SortState, TableLayout, TableRow,
};
pub use draggable::DragHandle;
pub use holdable::{HoldCallbacks, Holdable, decay, repeat_interval};
pub use navigation_path::{NavigationPath, PathSegment};
pub use portal::Portal;
pub use pulldown::{
    ItemPath, MenuState, Pulldown, PulldownEntry, PulldownGroup, PulldownItem,
    PulldownMenuButton,
};
pub use radio_button::RadioButton;
pub use resize_observer::ResizeObserver;
pub use scroll::{ScrollPosition, ScrollSync};
pub use spin_field::{SpinField, SpinFieldProps};
pub use switch::Switch;
pub use text_input::{CommitMode, NumericInput, TextField};
pub use virtual_list::{GridHandle, VirtualGrid, VirtualList};
