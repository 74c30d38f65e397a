use std::cell::{Cell, RefCell};
use std::rc::Rc;

use insta::assert_snapshot;
use trellis_core::*;
use trellis_ui::data_table::{BodyCell, Column, DataTable, Record, SortDirection, cell};
use trellis_ui::virtual_list::GridHandle;

fn record(name: &str, qty: f64) -> Record {
    [("name", cell(name)), ("qty", cell(qty))]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn stock() -> DataTable<Record> {
    DataTable::new(
        vec![
            Column::new("name", "Name", 100.0),
            Column::new("qty", "Qty", 80.0).class_name("num"),
        ],
        vec![record("Ada", 3.0), record("Bob", 1.0), record("Cy", 2.0)],
    )
    .unwrap()
}

/// Plain-text picture of what the host would draw.
fn render(t: &DataTable<Record>) -> String {
    let header: Vec<String> = t
        .header_cells()
        .iter()
        .map(|h| {
            let label = if h.key.is_none() { "~" } else { h.label.as_str() };
            let marker = match h.sorted {
                Some(SortDirection::Descending) => " v",
                Some(SortDirection::Ascending) => " ^",
                None => "",
            };
            let selected = if h.selected { "*" } else { "" };
            format!("{selected}{label}{marker}")
        })
        .collect();

    let mut out = header.join(" | ");
    for row in 0..t.row_count() {
        let cells: Vec<String> = (0..t.column_count())
            .map(|c| match t.body_cell(row, c) {
                BodyCell::Data { text, selected, .. } => {
                    if selected { format!("*{text}") } else { text }
                }
                BodyCell::Filler { .. } => ".".to_string(),
                BodyCell::Spacer => String::new(),
            })
            .collect();
        out.push('\n');
        out.push_str(&format!("{row}: {}", cells.join(" | ")));
    }
    out
}

#[test]
fn header_click_toggles_direction() {
    let t = DataTable::<Record>::new(
        vec![
            Column::new("x", "X", 50.0),
            Column::new("a", "A", 50.0),
            Column::new("b", "B", 50.0),
        ],
        vec![],
    )
    .unwrap();

    let mut seen = Vec::new();
    for key in ["a", "a", "b", "b", "b", "a"] {
        t.sort_by_column(key);
        let s = t.sort_state();
        seen.push((s.sort_by, s.direction));
    }
    use SortDirection::*;
    assert_eq!(
        seen,
        vec![
            ("a".to_string(), Descending),
            ("a".to_string(), Ascending),
            ("b".to_string(), Descending),
            ("b".to_string(), Ascending),
            ("b".to_string(), Descending),
            ("a".to_string(), Descending),
        ]
    );
}

#[test]
fn renders_sorted_table_with_filler() {
    let t = stock();
    t.set_container_size(Size::new(300.0, 200.0));
    t.sort_by_column("qty");
    t.open_header_menu("name");

    assert_snapshot!(render(&t), @r"
    *Name | Qty v | ~
    0: *Ada | 3 | .
    1: *Cy | 2 | .
    2: *Bob | 1 | .
    ");
}

#[test]
fn resize_floor_holds() {
    let t = stock();
    let reported = Rc::new(RefCell::new(Vec::new()));
    let r = reported.clone();
    t.set_on_resize_column(move |key, w| r.borrow_mut().push((key.to_string(), w)));

    t.resize_column("name", -60.0);
    assert_eq!(t.resize_state().map(|s| s.current_width), Some(60.0));
    t.resize_column("name", -200.0);
    let state = t.resize_state().unwrap();
    assert_eq!((state.original_width, state.current_width), (100.0, 60.0));

    t.finish_resize();
    assert_eq!(*reported.borrow(), vec![("name".to_string(), 60.0)]);
    assert_eq!(t.resize_state(), None);
}

struct Counting(Cell<u32>);

impl GridHandle for Counting {
    fn recompute_size(&self) {
        self.0.set(self.0.get() + 1);
    }
}

#[test]
fn drag_release_recomputes_both_grids() {
    let t = stock();
    t.set_on_resize_column(|_, _| {});
    let header = Rc::new(Counting(Cell::new(0)));
    let body = Rc::new(Counting(Cell::new(0)));
    let (h, b): (Rc<dyn GridHandle>, Rc<dyn GridHandle>) = (header.clone(), body.clone());
    t.attach_grids(&h, &b);

    let handle = t.resize_handle("qty").unwrap();
    let at = |kind, x| PressEvent::mouse(kind, Vec2 { x, y: 0.0 });
    handle.handle(&at(PressEventKind::Start, 200.0));
    handle.handle(&at(PressEventKind::Move, 230.0));
    assert_eq!(t.resize_indicator_left(), Some(210.0));
    handle.handle(&at(PressEventKind::End, 230.0));

    assert_eq!((header.0.get(), body.0.get()), (1, 1));
    assert_eq!(t.resize_indicator_left(), None);
}

#[test]
fn scrollbar_change_recomputes_header_only() {
    let t = stock();
    let header = Rc::new(Counting(Cell::new(0)));
    let body = Rc::new(Counting(Cell::new(0)));
    let (h, b): (Rc<dyn GridHandle>, Rc<dyn GridHandle>) = (header.clone(), body.clone());
    t.attach_grids(&h, &b);

    t.set_scrollbar_offset(17.0);
    t.set_scrollbar_offset(17.0);
    assert_eq!((header.0.get(), body.0.get()), (1, 0));
}

#[test]
fn main_resize_signal_recomputes_until_unmount() {
    let surface = Surface::new(Size::new(800.0, 600.0));
    let t = stock();
    let header = Rc::new(Counting(Cell::new(0)));
    let body = Rc::new(Counting(Cell::new(0)));
    let (h, b): (Rc<dyn GridHandle>, Rc<dyn GridHandle>) = (header.clone(), body.clone());
    t.attach_grids(&h, &b);
    t.attach_resize_observer(&surface);

    surface.notify_main_resized();
    assert_eq!(body.0.get(), 1);

    t.unmount();
    surface.notify_main_resized();
    assert_eq!(body.0.get(), 1);
    assert_eq!(surface.events().listener_count(), 0);
}

#[test]
fn header_follows_body_scroll() {
    let t = stock();
    t.set_container_size(Size::new(120.0, 300.0));
    t.on_body_scroll(trellis_ui::ScrollPosition { left: 40.0, top: 12.0 });
    let l = t.layout();
    assert_eq!(l.header.scroll_left, 40.0);
    assert_eq!(l.body.scroll_left, 40.0);
    assert_eq!(l.filler_width, 0.0);
}
