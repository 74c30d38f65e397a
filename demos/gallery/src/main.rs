//! Scripted walk through the widgets, printing what a renderer would draw.
//!
//! Run with `RUST_LOG=debug` to see the state machines at work. An optional
//! JSON file overrides the behaviour configuration:
//!
//! ```json
//! { "hold": { "initial_delay_ms": 400 }, "table": { "row_height": 32 } }
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use serde::Deserialize;
use trellis_core::*;
use trellis_ui::*;
use web_time::Duration;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GalleryConfig {
    hold: HoldConfig,
    dropdown: DropdownConfig,
    table: TableConfig,
}

impl GalleryConfig {
    fn load(path: Option<String>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
        let cfg: Self = serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
        cfg.hold.validate()?;
        cfg.dropdown.validate()?;
        cfg.table.validate()?;
        Ok(cfg)
    }
}

fn spin_field_demo(timers: &Rc<TimerQueue>) -> anyhow::Result<()> {
    let value = signal(Some(0.0));
    let v = value.clone();
    let props = SpinFieldProps {
        enabled: true,
        min_value: Some(0.0),
        max_value: Some(10.0),
        ..Default::default()
    };
    let field = SpinField::new(timers.clone(), props, value.clone(), move |n| v.set(Some(n)))?;

    field
        .increment_button()
        .handle(&PressEvent::mouse(PressEventKind::Start, Vec2::default()));
    for _ in 0..6 {
        timers.advance(Duration::from_millis(250));
        println!("spin field: {}", field.input().display_text());
    }
    field
        .increment_button()
        .handle(&PressEvent::mouse(PressEventKind::End, Vec2::default()));
    field.unmount();
    Ok(())
}

fn combo_box_demo(surface: &Rc<Surface>) -> anyhow::Result<()> {
    let anchor = surface.create_node(None);
    surface.set_bounds(anchor, BoundingBox::new(24.0, 520.0, 240.0, 36.0));

    let value = signal(None);
    let combo = ComboBox::new(
        surface.clone(),
        anchor,
        vec!["Lathe", "Mill", "Press", "Saw", "Welder", "Grinder"],
        value.clone(),
    )?;
    let v = value.clone();
    combo.on_change(move |item| v.set(Some(*item)));

    println!("combo box: {}", combo.display_text());
    combo.toggle_open();
    if let Some(p) = combo.placement() {
        println!(
            "dropdown {:?} at top {} height {} ({} rows)",
            p.side,
            p.top,
            p.height,
            combo.dropdown_rows(0.0).len()
        );
    }
    combo.select(2);
    println!("combo box: {} (open: {})", combo.display_text(), combo.is_open());
    Ok(())
}

fn data_table_demo(surface: &Rc<Surface>) -> anyhow::Result<()> {
    let rows: Vec<Record> = [("Lathe", 12.0, true), ("Mill", 4.0, false), ("Press", 9.0, true)]
        .into_iter()
        .map(|(name, hours, running)| {
            Record::from([
                ("name".to_string(), CellValue::from(name)),
                ("hours".to_string(), CellValue::from(hours)),
                ("running".to_string(), CellValue::from(running)),
            ])
        })
        .collect();

    let table = DataTable::new(
        vec![
            Column::new("name", "Machine", 140.0),
            Column::new("hours", "Hours", 90.0).renderer(|v| format!("{v} h")),
            Column::new("running", "Running", 90.0),
        ],
        rows,
    )?;
    table.set_container_size(Size::new(480.0, 300.0));
    table.attach_resize_observer(surface);

    let layout = table.layout();
    let grid = |g: trellis_ui::data_table::GridLayout| -> Rc<dyn GridHandle> {
        let t = table.clone();
        Rc::new(VirtualGrid::new(
            g.column_count,
            move |i| t.column_width(i),
            g.row_count,
            g.row_height,
            Size::new(g.width, g.height),
        ))
    };
    let (header_grid, body_grid) = (grid(layout.header), grid(layout.body));
    table.attach_grids(&header_grid, &body_grid);

    let widths = Rc::new(RefCell::new(table.columns()));
    let (w, t) = (widths.clone(), table.clone());
    table.set_on_resize_column(move |key, width| {
        let mut cols = w.borrow_mut();
        if let Some(c) = cols.iter_mut().find(|c| c.key == key) {
            c.width = width;
        }
        if let Err(e) = t.set_columns(cols.clone()) {
            log::error!("rejected columns: {e}");
        }
    });

    table.sort_by_column("hours");
    print_table(&table);

    if let Some(handle) = table.resize_handle("name") {
        let at = |kind, x| PressEvent::mouse(kind, Vec2 { x, y: 10.0 });
        handle.handle(&at(PressEventKind::Start, 140.0));
        handle.handle(&at(PressEventKind::Move, 20.0));
        handle.handle(&at(PressEventKind::End, 20.0));
    }
    print_table(&table);
    table.clear_on_resize_column();
    table.unmount();
    Ok(())
}

fn print_table(table: &DataTable<Record>) {
    let header: Vec<String> = table
        .header_cells()
        .iter()
        .map(|h| format!("{}({})", h.label, h.width))
        .collect();
    println!("{}", header.join(" "));
    for row in 0..table.row_count() {
        let cells: Vec<String> = (0..table.column_count())
            .map(|c| match table.body_cell(row, c) {
                BodyCell::Data { text, .. } => text,
                BodyCell::Filler { .. } | BodyCell::Spacer => String::new(),
            })
            .collect();
        println!("  {}", cells.join(" | "));
    }
}

fn pulldown_demo(surface: &Rc<Surface>) {
    let menu = PulldownMenuButton::new(
        surface.clone(),
        None,
        vec![
            PulldownEntry::Item(PulldownItem::new("Start").data("start")),
            PulldownEntry::Item(PulldownItem::new("Stop").data("stop").disabled(true)),
            PulldownEntry::Group(PulldownGroup::new(
                "Mode",
                vec![
                    PulldownItem::new("Auto").data("auto").active(true),
                    PulldownItem::new("Manual").data("manual"),
                ],
            )),
        ],
    );
    menu.on_reveal(|path| println!("menu: reveal {path:?}"));
    menu.on_click(|_, item| println!("menu: clicked {:?}", item.data));

    menu.button_click();
    println!("menu: {:?}", menu.state());
    if let Some(node) = menu.pulldown_node() {
        let content = surface.create_node(Some(node));
        menu.animation_end(&AnimationEndEvent {
            target: content,
            current_target: node,
        });
    }
    println!("menu: {:?}", menu.state());

    menu.item_click(ItemPath::grouped(2, 1));
    println!("menu: {:?}", menu.state());
    if let Some(node) = menu.pulldown_node() {
        menu.animation_end(&AnimationEndEvent {
            target: node,
            current_target: node,
        });
    }
    println!("menu: {:?}", menu.state());
    menu.unmount();
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cfg = GalleryConfig::load(std::env::args().nth(1))?;
    log::info!("configuration: {cfg:?}");

    let timers = TimerQueue::new();
    let surface = Surface::new(Size::new(1280.0, 600.0));

    with_hold_config(cfg.hold, || spin_field_demo(&timers))?;
    with_dropdown_config(cfg.dropdown, || combo_box_demo(&surface))?;
    with_table_config(cfg.table, || data_table_demo(&surface))?;
    pulldown_demo(&surface);

    let path = NavigationPath::new(vec!["Plant".into(), "Hall 2".into(), "Line 4".into()])
        .on_click(|i| println!("navigate to segment {i}"));
    for seg in path.segments() {
        println!("path: {}{}", seg.label, if seg.last { " (here)" } else { "" });
    }
    path.click(1);

    let late = timers.poll();
    log::info!("{late} timers fired catching up, {} left pending", timers.pending());
    Ok(())
}
