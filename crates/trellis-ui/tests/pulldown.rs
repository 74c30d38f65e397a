use std::cell::RefCell;
use std::rc::Rc;

use trellis_core::*;
use trellis_ui::pulldown::{
    ItemPath, MenuState, PulldownEntry, PulldownGroup, PulldownItem, PulldownMenuButton,
};

fn view_menu(surface: &Rc<Surface>) -> PulldownMenuButton<&'static str> {
    PulldownMenuButton::new(
        surface.clone(),
        None,
        vec![
            PulldownEntry::Item(PulldownItem::new("Refresh").data("refresh")),
            PulldownEntry::Group(PulldownGroup::new(
                "Zoom",
                vec![
                    PulldownItem::new("50%").data("z50"),
                    PulldownItem::new("100%").data("z100").active(true),
                    PulldownItem::new("200%").data("z200"),
                ],
            )),
        ],
    )
}

/// Open animation finished: fires on a child of the pulldown.
fn fade_in_done(surface: &Surface, m: &PulldownMenuButton<&'static str>) {
    let pulldown = m.pulldown_node().unwrap();
    let content = surface.create_node(Some(pulldown));
    m.animation_end(&AnimationEndEvent {
        target: content,
        current_target: pulldown,
    });
}

/// Close animation finished: fires on the pulldown itself.
fn collapse_done(m: &PulldownMenuButton<&'static str>) {
    let pulldown = m.pulldown_node().unwrap();
    m.animation_end(&AnimationEndEvent {
        target: pulldown,
        current_target: pulldown,
    });
}

#[test]
fn full_open_close_cycle() {
    let surface = Surface::new(Size::new(800.0, 600.0));
    let m = view_menu(&surface);
    let transitions = Rc::new(RefCell::new(Vec::new()));

    assert_eq!(m.state(), MenuState::Closed);
    m.button_click();
    assert_eq!(m.state(), MenuState::Opening);

    let t = transitions.clone();
    m.pulldown()
        .unwrap()
        .subscribe_open_close(move |open| t.borrow_mut().push(*open));

    // The container's own animation while opening is not the signal.
    collapse_done(&m);
    assert_eq!(m.state(), MenuState::Opening);

    fade_in_done(&surface, &m);
    assert_eq!(m.state(), MenuState::Open);

    m.button_click();
    assert_eq!(m.state(), MenuState::Closing);
    assert!(m.is_pulldown_present());

    collapse_done(&m);
    assert_eq!(m.state(), MenuState::Closed);
    assert!(!m.is_pulldown_present());
    assert_eq!(*transitions.borrow(), vec![true, false]);
}

#[test]
fn item_click_closes_before_forwarding() {
    let surface = Surface::new(Size::new(800.0, 600.0));
    let m = view_menu(&surface);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let (s, menu) = (seen.clone(), m.clone());
    m.on_click(move |group, item| {
        s.borrow_mut().push((
            group.map(|g| g.caption.clone()),
            item.data,
            menu.state(),
        ));
    });

    m.button_click();
    fade_in_done(&surface, &m);
    m.item_click(ItemPath::grouped(1, 2));

    assert_eq!(
        *seen.borrow(),
        vec![(Some("Zoom".to_string()), Some("z200"), MenuState::Closing)]
    );
    assert_eq!(m.state(), MenuState::Closing);
}

#[test]
fn active_item_revealed_once_fully_open() {
    let surface = Surface::new(Size::new(800.0, 600.0));
    let m = view_menu(&surface);
    let revealed = Rc::new(RefCell::new(Vec::new()));
    let r = revealed.clone();
    m.on_reveal(move |path| r.borrow_mut().push(path));

    m.button_click();
    assert!(revealed.borrow().is_empty());
    fade_in_done(&surface, &m);
    assert_eq!(*revealed.borrow(), vec![ItemPath::grouped(1, 1)]);

    m.button_click();
    collapse_done(&m);
    assert_eq!(revealed.borrow().len(), 1);
}

#[test]
fn blur_to_button_child_keeps_menu() {
    let surface = Surface::new(Size::new(800.0, 600.0));
    let m = view_menu(&surface);
    m.button_click();
    let icon = surface.create_node(Some(m.button_node()));
    m.blur(&FocusEvent {
        related_target: Some(icon),
    });
    assert_eq!(m.state(), MenuState::Opening);
}

#[test]
fn unmount_detaches_everything() {
    let surface = Surface::new(Size::new(800.0, 600.0));
    let before = surface.node_count();
    let m = view_menu(&surface);
    m.button_click();
    let p = m.pulldown().unwrap();
    assert_eq!(p.subscriber_count(), 4);

    m.unmount();
    assert_eq!(p.subscriber_count(), 0);
    assert!(!surface.contains(p.node()));
    drop(m);
    assert_eq!(surface.node_count(), before);
}
