//! # Data table
//!
//! A sortable, column-resizable table built from two virtualized grids: a
//! one-row header grid and the body grid. `DataTable` coordinates them:
//!
//! - both grids share the column widths, plus a trailing *filler* column that
//!   soaks up leftover container width;
//! - the header follows the body's horizontal scroll ([`ScrollSync`]);
//! - the header is narrower than the body by the body's vertical scrollbar
//!   width, so the last column lines up with the scrollbar edge;
//! - sort state and an in-progress column resize live here, not in the host.
//!
//! Grids are reached through [`GridHandle`]s the host attaches; the table only
//! keeps weak references and skips grids that have gone away.
//!
//! ```rust
//! use trellis_ui::data_table::{Column, DataTable, Record, cell};
//!
//! let rows: Vec<Record> = vec![
//!     [("name", cell("Ada")), ("age", cell(36.0))].into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
//!     [("name", cell("Linus")), ("age", cell(28.0))].into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
//! ];
//! let table = DataTable::new(
//!     vec![Column::new("name", "Name", 120.0), Column::new("age", "Age", 80.0)],
//!     rows,
//! )
//! .unwrap();
//!
//! table.sort_by_column("age");
//! assert_eq!(table.body_cell(0, 0).text(), Some("Ada"));
//! ```

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::rc::{Rc, Weak};

use trellis_core::*;

use crate::draggable::DragHandle;
use crate::resize_observer::ResizeObserver;
use crate::scroll::{ScrollPosition, ScrollSync};
use crate::virtual_list::GridHandle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Raw cell value. Sorting compares raw values, never rendered text.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

pub fn cell(v: impl Into<CellValue>) -> CellValue {
    v.into()
}

impl CellValue {
    fn rank(&self) -> u8 {
        match self {
            CellValue::Empty => 0,
            CellValue::Bool(_) => 1,
            CellValue::Number(_) => 2,
            CellValue::Text(_) => 3,
        }
    }
}

/// Total order over cells: empty < bool < number < text, then by value.
/// Numbers use [`f64::total_cmp`], so a (positive) NaN sorts above every number.
pub fn compare_cells(a: &CellValue, b: &CellValue) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    match (a, b) {
        (CellValue::Bool(x), CellValue::Bool(y)) => x.cmp(y),
        (CellValue::Number(x), CellValue::Number(y)) => x.total_cmp(y),
        (CellValue::Text(x), CellValue::Text(y)) => x.cmp(y),
        _ => a.rank().cmp(&b.rank()),
    }
}

/// Anything a table can display: one raw value per column key.
pub trait TableRow {
    fn cell(&self, key: &str) -> CellValue;
}

/// A row keyed by column key.
pub type Record = BTreeMap<String, CellValue>;

impl TableRow for Record {
    fn cell(&self, key: &str) -> CellValue {
        self.get(key).cloned().unwrap_or_default()
    }
}

type CellRenderer = dyn Fn(&CellValue) -> String;

#[derive(Clone)]
pub struct Column {
    pub key: String,
    pub label: String,
    pub width: f32,
    pub class_name: Option<String>,
    renderer: Option<Rc<CellRenderer>>,
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("width", &self.width)
            .field("class_name", &self.class_name)
            .finish_non_exhaustive()
    }
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>, width: f32) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            width,
            class_name: None,
            renderer: None,
        }
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Replaces the default `Display` rendering of cells.
    pub fn renderer(mut self, f: impl Fn(&CellValue) -> String + 'static) -> Self {
        self.renderer = Some(Rc::new(f));
        self
    }

    pub fn render(&self, value: &CellValue) -> String {
        match &self.renderer {
            Some(r) => r(value),
            None => value.to_string(),
        }
    }
}

fn validate_columns(columns: &[Column]) -> Result<()> {
    if columns.is_empty() {
        return Err(Error::NoColumns);
    }
    let mut seen = HashSet::new();
    for c in columns {
        if !seen.insert(c.key.as_str()) {
            return Err(Error::DuplicateColumnKey(c.key.clone()));
        }
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq)]
pub struct SortState {
    pub sort_by: String,
    pub direction: SortDirection,
}

/// An in-progress column drag. At most one exists at a time.
#[derive(Clone, Debug, PartialEq)]
pub struct ResizeState {
    pub key: String,
    pub original_width: f32,
    pub current_width: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowParity {
    Even,
    Odd,
}

impl RowParity {
    fn of(row: usize) -> Self {
        if row % 2 == 0 {
            RowParity::Even
        } else {
            RowParity::Odd
        }
    }
}

/// Header cell description. The filler column has `key == None`.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderCell {
    pub key: Option<String>,
    pub label: String,
    pub width: f32,
    pub first: bool,
    pub sorted: Option<SortDirection>,
    /// Highlighted because its context menu is open.
    pub selected: bool,
    pub resizable: bool,
}

/// Body cell description.
#[derive(Clone, Debug, PartialEq)]
pub enum BodyCell {
    /// Row index past the data; renders nothing.
    Spacer,
    /// Styled but empty cell of the filler column.
    Filler { parity: RowParity },
    Data {
        text: String,
        parity: RowParity,
        first: bool,
        selected: bool,
        class_name: Option<String>,
    },
}

impl BodyCell {
    pub fn text(&self) -> Option<&str> {
        match self {
            BodyCell::Data { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Size and content of one grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub width: f32,
    pub height: f32,
    pub column_count: usize,
    pub row_count: usize,
    pub row_height: f32,
    pub scroll_left: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableLayout {
    pub header: GridLayout,
    pub body: GridLayout,
    pub filler_width: f32,
    pub resize_indicator_left: Option<f32>,
}

struct TableInner<R: 'static> {
    config: TableConfig,
    columns: RefCell<Vec<Column>>,
    rows: RefCell<Vec<R>>,
    // sorted position -> index into `rows`
    order: RefCell<Vec<usize>>,
    sort: RefCell<SortState>,
    resize: RefCell<Option<ResizeState>>,
    on_resize_column: RefCell<Option<Rc<dyn Fn(&str, f32)>>>,
    container: Cell<Size>,
    scrollbar_offset: Cell<f32>,
    scroll: ScrollSync,
    header_menu: RefCell<Option<String>>,
    header_grid: RefCell<Option<Weak<dyn GridHandle>>>,
    body_grid: RefCell<Option<Weak<dyn GridHandle>>>,
    resize_observer: RefCell<Option<ResizeObserver>>,
}

pub struct DataTable<R: 'static> {
    inner: Rc<TableInner<R>>,
}

impl<R> Clone for DataTable<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<R: TableRow + 'static> DataTable<R> {
    /// Initially sorted by the first column, descending. Reads the
    /// [`table_config`] local; it must validate.
    pub fn new(columns: Vec<Column>, rows: Vec<R>) -> Result<Self> {
        validate_columns(&columns)?;
        let config = table_config();
        config.validate()?;
        let sort = SortState {
            sort_by: columns[0].key.clone(),
            direction: SortDirection::Descending,
        };
        let table = Self {
            inner: Rc::new(TableInner {
                config,
                columns: RefCell::new(columns),
                rows: RefCell::new(rows),
                order: RefCell::new(Vec::new()),
                sort: RefCell::new(sort),
                resize: RefCell::new(None),
                on_resize_column: RefCell::new(None),
                container: Cell::new(Size::ZERO),
                scrollbar_offset: Cell::new(0.0),
                scroll: ScrollSync::new(),
                header_menu: RefCell::new(None),
                header_grid: RefCell::new(None),
                body_grid: RefCell::new(None),
                resize_observer: RefCell::new(None),
            }),
        };
        table.resort();
        Ok(table)
    }

    pub fn config(&self) -> &TableConfig {
        &self.inner.config
    }

    /// Replaces the column set, e.g. after the host applied a resize.
    pub fn set_columns(&self, columns: Vec<Column>) -> Result<()> {
        validate_columns(&columns)?;
        let sort_by = self.inner.sort.borrow().sort_by.clone();
        if !columns.iter().any(|c| c.key == sort_by) {
            log::warn!("sorted column `{sort_by}` no longer exists");
        }
        *self.inner.columns.borrow_mut() = columns;
        self.resort();
        Ok(())
    }

    pub fn columns(&self) -> Vec<Column> {
        self.inner.columns.borrow().clone()
    }

    pub fn set_rows(&self, rows: Vec<R>) {
        *self.inner.rows.borrow_mut() = rows;
        self.resort();
    }

    /// Enables column resizing. The host receives `(key, width)` on release
    /// and is expected to update the columns.
    pub fn set_on_resize_column(&self, f: impl Fn(&str, f32) + 'static) {
        *self.inner.on_resize_column.borrow_mut() = Some(Rc::new(f));
    }

    pub fn clear_on_resize_column(&self) {
        self.inner.on_resize_column.borrow_mut().take();
    }

    pub fn is_resizable(&self) -> bool {
        self.inner.on_resize_column.borrow().is_some()
    }

    // ---- Sorting ----

    pub fn sort_state(&self) -> SortState {
        self.inner.sort.borrow().clone()
    }

    /// Header click.
    pub fn sort_by_column(&self, key: &str) {
        if !self.inner.columns.borrow().iter().any(|c| c.key == key) {
            log::warn!("sort requested for unknown column `{key}`");
            return;
        }
        {
            let mut sort = self.inner.sort.borrow_mut();
            let direction = if sort.sort_by == key && sort.direction == SortDirection::Descending {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            };
            sort.sort_by = key.to_string();
            sort.direction = direction;
            log::debug!("sort by `{key}` {direction:?}");
        }
        self.resort();
    }

    fn resort(&self) {
        let rows = self.inner.rows.borrow();
        let sort = self.inner.sort.borrow();
        let keys: Vec<CellValue> = rows.iter().map(|r| r.cell(&sort.sort_by)).collect();

        let mut order: Vec<usize> = (0..rows.len()).collect();
        order.sort_by(|&a, &b| {
            let ord = compare_cells(&keys[a], &keys[b]);
            match sort.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
        *self.inner.order.borrow_mut() = order;
    }

    /// Indices into the row list, in display order.
    pub fn sorted_indices(&self) -> Vec<usize> {
        self.inner.order.borrow().clone()
    }

    pub fn data_row_count(&self) -> usize {
        self.inner.order.borrow().len()
    }

    // ---- Geometry ----

    pub fn set_container_size(&self, size: Size) {
        self.inner.container.set(size);
    }

    /// Body scrollbar width (`offsetWidth - clientWidth`); 0 without one.
    /// A change re-lays out the header.
    pub fn set_scrollbar_offset(&self, offset: f32) {
        let offset = offset.max(0.0);
        if self.inner.scrollbar_offset.replace(offset) != offset {
            log::debug!("scrollbar offset {offset}px");
            recompute(&self.inner.header_grid, "header");
        }
    }

    pub fn scrollbar_offset(&self) -> f32 {
        self.inner.scrollbar_offset.get()
    }

    /// Body grid scrolled.
    pub fn on_body_scroll(&self, pos: ScrollPosition) {
        self.inner.scroll.on_scroll(pos);
    }

    pub fn scroll_sync(&self) -> &ScrollSync {
        &self.inner.scroll
    }

    pub fn filler_width(&self) -> f32 {
        let sum: f32 = self.inner.columns.borrow().iter().map(|c| c.width).sum();
        (self.inner.container.get().width - sum - self.inner.scrollbar_offset.get()).max(0.0)
    }

    /// Columns plus the filler column when it has positive width.
    pub fn column_count(&self) -> usize {
        let n = self.inner.columns.borrow().len();
        if self.filler_width() > 0.0 { n + 1 } else { n }
    }

    /// Width of grid column `index`; indices past the data columns are the
    /// filler.
    pub fn column_width(&self, index: usize) -> f32 {
        let w = self.inner.columns.borrow().get(index).map(|c| c.width);
        w.unwrap_or_else(|| self.filler_width())
    }

    /// Body rows; never 0 so an empty table still renders one spacer row.
    pub fn row_count(&self) -> usize {
        self.data_row_count().max(1)
    }

    pub fn layout(&self) -> TableLayout {
        let cfg = &self.inner.config;
        let size = self.inner.container.get();
        let column_count = self.column_count();
        let scroll_left = self.inner.scroll.scroll_left();
        TableLayout {
            header: GridLayout {
                width: (size.width - self.inner.scrollbar_offset.get()).max(0.0),
                height: cfg.header_height,
                column_count,
                row_count: 1,
                row_height: cfg.header_height,
                scroll_left,
            },
            body: GridLayout {
                width: size.width,
                height: (size.height - cfg.header_height).max(0.0),
                column_count,
                row_count: self.row_count(),
                row_height: cfg.row_height,
                scroll_left,
            },
            filler_width: self.filler_width(),
            resize_indicator_left: self.resize_indicator_left(),
        }
    }

    // ---- Grids ----

    /// Attaches the grids to recompute on resize. Only weak references are
    /// kept.
    pub fn attach_grids(&self, header: &Rc<dyn GridHandle>, body: &Rc<dyn GridHandle>) {
        *self.inner.header_grid.borrow_mut() = Some(Rc::downgrade(header));
        *self.inner.body_grid.borrow_mut() = Some(Rc::downgrade(body));
    }

    pub fn detach_grids(&self) {
        self.inner.header_grid.borrow_mut().take();
        self.inner.body_grid.borrow_mut().take();
    }

    /// Both grids drop cached sizes and lay out again.
    pub fn recompute_grids(&self) {
        recompute(&self.inner.header_grid, "header");
        recompute(&self.inner.body_grid, "body");
    }

    /// Recomputes the grids whenever the host's main area is resized, until
    /// [`DataTable::unmount`].
    pub fn attach_resize_observer(&self, surface: &Surface) {
        let weak = Rc::downgrade(&self.inner);
        let observer = ResizeObserver::new(surface, move || {
            if let Some(inner) = weak.upgrade() {
                DataTable { inner }.recompute_grids();
            }
        });
        *self.inner.resize_observer.borrow_mut() = Some(observer);
    }

    // ---- Column resize ----

    /// One drag step on `key`'s resize handle, `delta` px from where the drag
    /// started. Ignored unless resizing is enabled.
    pub fn resize_column(&self, key: &str, delta: f32) {
        if !self.is_resizable() {
            log::trace!("resize ignored: no resize callback");
            return;
        }
        let Some(width) = self.column_by_key(key).map(|c| c.width) else {
            log::warn!("resize requested for unknown column `{key}`");
            return;
        };

        let mut resize = self.inner.resize.borrow_mut();
        let original_width = match resize.as_ref() {
            Some(r) if r.key == key => r.original_width,
            _ => width,
        };
        let current_width = (original_width + delta).max(self.inner.config.min_column_width);
        log::trace!("resizing `{key}` to {current_width}px");
        *resize = Some(ResizeState {
            key: key.to_string(),
            original_width,
            current_width,
        });
    }

    /// Release of the resize handle: reports the width, clears the state and
    /// recomputes both grids.
    pub fn finish_resize(&self) {
        let cb = self.inner.on_resize_column.borrow().clone();
        let Some(cb) = cb else {
            return;
        };
        let state = self.inner.resize.borrow_mut().take();
        let Some(state) = state else {
            return;
        };
        log::debug!("column `{}` resized to {}px", state.key, state.current_width);
        cb(&state.key, state.current_width);
        self.recompute_grids();
    }

    pub fn resize_state(&self) -> Option<ResizeState> {
        self.inner.resize.borrow().clone()
    }

    /// Left edge of the resize indicator line, in header/body viewport
    /// coordinates.
    pub fn resize_indicator_left(&self) -> Option<f32> {
        let resize = self.inner.resize.borrow();
        let r = resize.as_ref()?;
        let offset: f32 = self
            .inner
            .columns
            .borrow()
            .iter()
            .take_while(|c| c.key != r.key)
            .map(|c| c.width)
            .sum();
        Some(offset + r.current_width - self.inner.scroll.scroll_left())
    }

    /// Drag handle for `key`'s header, or `None` when resizing is disabled.
    pub fn resize_handle(&self, key: &str) -> Option<DragHandle> {
        if !self.is_resizable() {
            return None;
        }
        let (on_drag, on_stop) = (Rc::downgrade(&self.inner), Rc::downgrade(&self.inner));
        let key = key.to_string();
        Some(DragHandle::new(
            move |dx| {
                if let Some(inner) = on_drag.upgrade() {
                    DataTable { inner }.resize_column(&key, dx);
                }
            },
            move || {
                if let Some(inner) = on_stop.upgrade() {
                    DataTable { inner }.finish_resize();
                }
            },
        ))
    }

    // ---- Header menu ----

    /// Header context menu opened on `key`.
    pub fn open_header_menu(&self, key: &str) {
        *self.inner.header_menu.borrow_mut() = Some(key.to_string());
    }

    /// Header menu of `key` lost focus. Ignored if another header's menu has
    /// taken over since.
    pub fn blur_header_menu(&self, key: &str) {
        let mut menu = self.inner.header_menu.borrow_mut();
        if menu.as_deref() == Some(key) {
            *menu = None;
        }
    }

    pub fn header_menu_key(&self) -> Option<String> {
        self.inner.header_menu.borrow().clone()
    }

    // ---- Render descriptions ----

    fn column_by_key(&self, key: &str) -> Option<Column> {
        self.inner.columns.borrow().iter().find(|c| c.key == key).cloned()
    }

    pub fn header_cells(&self) -> Vec<HeaderCell> {
        let sort = self.inner.sort.borrow();
        let menu = self.inner.header_menu.borrow();
        let resizable = self.is_resizable();

        let mut cells: Vec<HeaderCell> = self
            .inner
            .columns
            .borrow()
            .iter()
            .enumerate()
            .map(|(i, c)| HeaderCell {
                key: Some(c.key.clone()),
                label: c.label.clone(),
                width: c.width,
                first: i == 0,
                sorted: (sort.sort_by == c.key).then_some(sort.direction),
                selected: menu.as_deref() == Some(c.key.as_str()),
                resizable,
            })
            .collect();

        let filler = self.filler_width();
        if filler > 0.0 {
            cells.push(HeaderCell {
                key: None,
                label: String::new(),
                width: filler,
                first: false,
                sorted: None,
                selected: false,
                resizable: false,
            });
        }
        cells
    }

    /// Cell at grid position (`row`, `column`) of the body.
    pub fn body_cell(&self, row: usize, column: usize) -> BodyCell {
        let order = self.inner.order.borrow();
        let Some(&data_index) = order.get(row) else {
            return BodyCell::Spacer;
        };
        let parity = RowParity::of(row);

        let columns = self.inner.columns.borrow();
        let Some(col) = columns.get(column) else {
            return BodyCell::Filler { parity };
        };

        let value = self.inner.rows.borrow()[data_index].cell(&col.key);
        BodyCell::Data {
            text: col.render(&value),
            parity,
            first: column == 0,
            selected: self.inner.header_menu.borrow().as_deref() == Some(col.key.as_str()),
            class_name: col.class_name.clone(),
        }
    }

    /// Releases the resize observer and the grid references.
    pub fn unmount(&self) {
        self.inner.resize_observer.borrow_mut().take();
        self.detach_grids();
        self.inner.resize.borrow_mut().take();
    }
}

fn recompute(slot: &RefCell<Option<Weak<dyn GridHandle>>>, which: &str) {
    let grid = slot.borrow().as_ref().map(|w| w.upgrade());
    match grid {
        Some(Some(grid)) => grid.recompute_size(),
        Some(None) => log::trace!("{which} grid gone, recompute skipped"),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, CellValue)]) -> Record {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn table() -> DataTable<Record> {
        DataTable::new(
            vec![
                Column::new("name", "Name", 100.0),
                Column::new("qty", "Qty", 80.0),
            ],
            vec![
                record(&[("name", cell("b")), ("qty", cell(2.0))]),
                record(&[("name", cell("c")), ("qty", cell(1.0))]),
                record(&[("name", cell("a")), ("qty", cell(2.0))]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_bad_columns() {
        assert!(matches!(
            DataTable::<Record>::new(vec![], vec![]),
            Err(Error::NoColumns)
        ));
        let dup = vec![Column::new("a", "A", 10.0), Column::new("a", "B", 10.0)];
        assert_eq!(
            DataTable::<Record>::new(dup, vec![]).err(),
            Some(Error::DuplicateColumnKey("a".into()))
        );
    }

    #[test]
    fn test_initial_sort_first_column_descending() {
        let t = table();
        assert_eq!(
            t.sort_state(),
            SortState {
                sort_by: "name".into(),
                direction: SortDirection::Descending
            }
        );
        assert_eq!(t.sorted_indices(), vec![1, 0, 2]);
    }

    #[test]
    fn test_sort_is_stable() {
        let t = table();
        t.sort_by_column("qty");
        // rows 0 and 2 tie on qty=2 and keep their relative order
        assert_eq!(t.sorted_indices(), vec![0, 2, 1]);
        t.sort_by_column("qty");
        assert_eq!(t.sorted_indices(), vec![1, 0, 2]);
    }

    #[test]
    fn test_invalid_table_config_rejected() {
        let cfg = TableConfig {
            min_column_width: f32::NAN,
            ..TableConfig::default()
        };
        let res = with_table_config(cfg, || {
            DataTable::<Record>::new(vec![Column::new("a", "A", 10.0)], vec![])
        });
        assert!(matches!(
            res.err(),
            Some(Error::InvalidConfig {
                field: "min_column_width",
                ..
            })
        ));
    }

    #[test]
    fn test_compare_cells_ranks_kinds() {
        use CellValue::*;
        assert_eq!(compare_cells(&Empty, &Bool(false)), Ordering::Less);
        assert_eq!(compare_cells(&Number(9.0), &Text("a".into())), Ordering::Less);
        assert_eq!(compare_cells(&Number(f64::NAN), &Number(1.0)), Ordering::Greater);
        assert_eq!(compare_cells(&Number(1.0), &Number(f64::NAN)), Ordering::Less);
        assert_eq!(compare_cells(&Number(f64::NAN), &Number(f64::NAN)), Ordering::Equal);
    }

    #[test]
    fn test_sort_with_nan_cells() {
        let rows: Vec<Record> = (0..64)
            .map(|i| {
                let n = if i % 3 == 0 { f64::NAN } else { i as f64 };
                record(&[("n", cell(n))])
            })
            .collect();
        let t = DataTable::new(vec![Column::new("n", "N", 50.0)], rows).unwrap();
        // first column, descending: NaN rows first, in source order
        let order = t.sorted_indices();
        let nans: Vec<usize> = (0..64).filter(|i| i % 3 == 0).collect();
        assert_eq!(order[..nans.len()], nans[..]);

        t.sort_by_column("n");
        let order = t.sorted_indices();
        assert_eq!(order.len(), 64);
        assert_eq!(order[..3], [1, 2, 4]);
        assert_eq!(order[64 - nans.len()..], nans[..]);
    }

    #[test]
    fn test_unknown_sort_key_ignored() {
        let t = table();
        t.sort_by_column("nope");
        assert_eq!(t.sort_state().sort_by, "name");
    }

    #[test]
    fn test_filler_and_layout() {
        let t = table();
        t.set_container_size(Size::new(300.0, 245.0));
        assert_eq!(t.filler_width(), 120.0);
        assert_eq!(t.column_count(), 3);
        assert_eq!(t.column_width(2), 120.0);

        t.set_scrollbar_offset(15.0);
        let l = t.layout();
        assert_eq!(l.filler_width, 105.0);
        assert_eq!(l.header.width, 285.0);
        assert_eq!(l.body.width, 300.0);
        assert_eq!(l.body.height, 200.0);
        assert_eq!(l.body.row_count, 3);

        t.set_container_size(Size::new(150.0, 245.0));
        assert_eq!(t.filler_width(), 0.0);
        assert_eq!(t.column_count(), 2);
        assert_eq!(t.header_cells().len(), 2);
    }

    #[test]
    fn test_body_cells() {
        let t = table();
        t.set_container_size(Size::new(300.0, 245.0));
        t.open_header_menu("qty");

        assert_eq!(
            t.body_cell(1, 1),
            BodyCell::Data {
                text: "2".into(),
                parity: RowParity::Odd,
                first: false,
                selected: true,
                class_name: None,
            }
        );
        assert_eq!(t.body_cell(0, 2), BodyCell::Filler { parity: RowParity::Even });
        assert_eq!(t.body_cell(3, 0), BodyCell::Spacer);

        t.blur_header_menu("name");
        assert_eq!(t.header_menu_key().as_deref(), Some("qty"));
        t.blur_header_menu("qty");
        assert_eq!(t.header_menu_key(), None);
    }

    #[test]
    fn test_empty_table_renders_one_spacer_row() {
        let t = DataTable::<Record>::new(vec![Column::new("a", "A", 50.0)], vec![]).unwrap();
        assert_eq!(t.row_count(), 1);
        assert_eq!(t.body_cell(0, 0), BodyCell::Spacer);
    }

    #[test]
    fn test_resize_requires_callback() {
        let t = table();
        assert!(t.resize_handle("name").is_none());
        t.resize_column("name", 40.0);
        assert_eq!(t.resize_state(), None);
    }

    #[test]
    fn test_resize_indicator_follows_scroll() {
        let t = table();
        t.set_on_resize_column(|_, _| {});
        t.resize_column("qty", 20.0);
        assert_eq!(t.resize_indicator_left(), Some(200.0));
        t.on_body_scroll(ScrollPosition { left: 30.0, top: 0.0 });
        assert_eq!(t.resize_indicator_left(), Some(170.0));
    }

    #[test]
    fn test_stale_grid_skipped() {
        struct Counting(Cell<u32>);
        impl GridHandle for Counting {
            fn recompute_size(&self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let t = table();
        let header: Rc<dyn GridHandle> = Rc::new(Counting(Cell::new(0)));
        let body = Rc::new(Counting(Cell::new(0)));
        let body_dyn: Rc<dyn GridHandle> = body.clone();
        t.attach_grids(&header, &body_dyn);
        drop(header);
        drop(body_dyn);

        t.recompute_grids();
        assert_eq!(body.0.get(), 1);
    }
}
