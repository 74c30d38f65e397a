//! Virtualized windows over lists and grids.
//!
//! Only the rows (and columns) intersecting the viewport, plus a small
//! overscan, are handed to the renderer. Sizes are explicit: the host tells
//! the window how large it is, nothing here measures anything.

use std::cell::{Cell, RefCell};

use trellis_core::{Rect, Size};

/// Rows/columns rendered beyond each edge of the viewport.
const OVERSCAN: usize = 2;

/// Capability of a virtualized grid to drop cached sizes and lay out again.
pub trait GridHandle {
    fn recompute_size(&self);
}

/// A rendered row of a [`VirtualList`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ListRow {
    pub index: usize,
    /// Offset from the top of the content, px.
    pub top: f32,
}

fn visible_span(offset: f32, extent: f32, item: f32, count: usize) -> std::ops::Range<usize> {
    if count == 0 || item <= 0.0 || extent <= 0.0 {
        return 0..0;
    }
    let first = (offset / item).floor().max(0.0) as usize;
    let last = ((offset + extent) / item).ceil() as usize;
    first.saturating_sub(OVERSCAN)..(last + OVERSCAN).min(count)
}

/// Single-column list with fixed row height.
pub struct VirtualList {
    row_count: Cell<usize>,
    row_height: Cell<f32>,
    viewport: Cell<Size>,
    scroll_offset: Cell<f32>,
}

impl VirtualList {
    pub fn new(row_count: usize, row_height: f32, viewport: Size) -> Self {
        Self {
            row_count: Cell::new(row_count),
            row_height: Cell::new(row_height.max(0.0)),
            viewport: Cell::new(viewport),
            scroll_offset: Cell::new(0.0),
        }
    }

    pub fn set_row_count(&self, n: usize) {
        self.row_count.set(n);
        self.clamp_offset();
    }

    pub fn set_row_height(&self, h: f32) {
        self.row_height.set(h.max(0.0));
        self.clamp_offset();
    }

    pub fn set_viewport(&self, size: Size) {
        self.viewport.set(size);
        self.clamp_offset();
    }

    pub fn viewport(&self) -> Size {
        self.viewport.get()
    }

    pub fn row_count(&self) -> usize {
        self.row_count.get()
    }

    pub fn row_height(&self) -> f32 {
        self.row_height.get()
    }

    pub fn content_height(&self) -> f32 {
        self.row_count.get() as f32 * self.row_height.get()
    }

    pub fn set_offset(&self, off: f32) {
        let max_off = (self.content_height() - self.viewport.get().height).max(0.0);
        self.scroll_offset.set(off.clamp(0.0, max_off));
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset.get()
    }

    fn clamp_offset(&self) {
        self.set_offset(self.scroll_offset.get());
    }

    pub fn visible_range(&self) -> std::ops::Range<usize> {
        visible_span(
            self.scroll_offset.get(),
            self.viewport.get().height,
            self.row_height.get(),
            self.row_count.get(),
        )
    }

    pub fn rows(&self) -> Vec<ListRow> {
        let h = self.row_height.get();
        self.visible_range()
            .map(|index| ListRow {
                index,
                top: index as f32 * h,
            })
            .collect()
    }
}

impl GridHandle for VirtualList {
    fn recompute_size(&self) {
        self.clamp_offset();
    }
}

/// A rendered cell of a [`VirtualGrid`], positioned in content coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridCell {
    pub row: usize,
    pub column: usize,
    pub rect: Rect,
}

/// Grid with per-column widths and a fixed row height.
///
/// Column offsets are computed from `column_width` on first use and cached
/// until [`GridHandle::recompute_size`]; a changed width is not picked up
/// before that.
pub struct VirtualGrid {
    column_count: Cell<usize>,
    column_width: Box<dyn Fn(usize) -> f32>,
    row_count: Cell<usize>,
    row_height: f32,
    viewport: Cell<Size>,
    scroll_left: Cell<f32>,
    scroll_top: Cell<f32>,
    // offsets[i] = left edge of column i; offsets[column_count] = total width
    offsets: RefCell<Option<Vec<f32>>>,
}

impl VirtualGrid {
    pub fn new(
        column_count: usize,
        column_width: impl Fn(usize) -> f32 + 'static,
        row_count: usize,
        row_height: f32,
        viewport: Size,
    ) -> Self {
        Self {
            column_count: Cell::new(column_count),
            column_width: Box::new(column_width),
            row_count: Cell::new(row_count),
            row_height: row_height.max(0.0),
            viewport: Cell::new(viewport),
            scroll_left: Cell::new(0.0),
            scroll_top: Cell::new(0.0),
            offsets: RefCell::new(None),
        }
    }

    pub fn set_column_count(&self, n: usize) {
        if self.column_count.replace(n) != n {
            self.offsets.replace(None);
        }
    }

    pub fn set_row_count(&self, n: usize) {
        self.row_count.set(n);
        self.clamp_scroll();
    }

    pub fn set_viewport(&self, size: Size) {
        self.viewport.set(size);
        self.clamp_scroll();
    }

    pub fn viewport(&self) -> Size {
        self.viewport.get()
    }

    fn with_offsets<R>(&self, f: impl FnOnce(&[f32]) -> R) -> R {
        let mut cache = self.offsets.borrow_mut();
        let offsets = cache.get_or_insert_with(|| {
            let n = self.column_count.get();
            let mut v = Vec::with_capacity(n + 1);
            let mut x = 0.0f32;
            v.push(x);
            for i in 0..n {
                x += (self.column_width)(i).max(0.0);
                v.push(x);
            }
            v
        });
        f(offsets)
    }

    pub fn column_offset(&self, column: usize) -> f32 {
        self.with_offsets(|o| o[column.min(o.len() - 1)])
    }

    pub fn total_width(&self) -> f32 {
        self.with_offsets(|o| o.last().copied().unwrap_or(0.0))
    }

    pub fn total_height(&self) -> f32 {
        self.row_count.get() as f32 * self.row_height
    }

    /// Whether the rows overflow the viewport vertically.
    pub fn has_vertical_overflow(&self) -> bool {
        self.total_height() > self.viewport.get().height
    }

    pub fn set_scroll(&self, left: f32, top: f32) {
        let vp = self.viewport.get();
        let max_left = (self.total_width() - vp.width).max(0.0);
        let max_top = (self.total_height() - vp.height).max(0.0);
        self.scroll_left.set(left.clamp(0.0, max_left));
        self.scroll_top.set(top.clamp(0.0, max_top));
    }

    pub fn scroll_left(&self) -> f32 {
        self.scroll_left.get()
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top.get()
    }

    fn clamp_scroll(&self) {
        self.set_scroll(self.scroll_left.get(), self.scroll_top.get());
    }

    fn visible_columns(&self) -> std::ops::Range<usize> {
        let left = self.scroll_left.get();
        let right = left + self.viewport.get().width;
        self.with_offsets(|o| {
            let n = o.len() - 1;
            if n == 0 || right <= left {
                return 0..0;
            }
            // first column whose right edge is past `left`
            let first = o[1..].partition_point(|edge| *edge <= left);
            let last = o[..n].partition_point(|edge| *edge < right);
            first.saturating_sub(OVERSCAN)..(last + OVERSCAN).min(n)
        })
    }

    pub fn visible_cells(&self) -> Vec<GridCell> {
        let rows = visible_span(
            self.scroll_top.get(),
            self.viewport.get().height,
            self.row_height,
            self.row_count.get(),
        );
        let cols = self.visible_columns();
        self.with_offsets(|o| {
            let mut cells = Vec::with_capacity(rows.len() * cols.len());
            for row in rows.clone() {
                for column in cols.clone() {
                    cells.push(GridCell {
                        row,
                        column,
                        rect: Rect {
                            x: o[column],
                            y: row as f32 * self.row_height,
                            w: o[column + 1] - o[column],
                            h: self.row_height,
                        },
                    });
                }
            }
            cells
        })
    }
}

impl GridHandle for VirtualGrid {
    fn recompute_size(&self) {
        self.offsets.replace(None);
        self.clamp_scroll();
        log::trace!("grid recomputed: {:.0}px wide", self.total_width());
    }
}
