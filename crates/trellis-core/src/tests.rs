#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::effects::*;
    use crate::events::*;
    use crate::input::*;
    use crate::scope::*;
    use crate::signal::*;
    use crate::surface::*;
    use crate::timer::*;
    use crate::{BoundingBox, Error, Rect, Size, Vec2};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use web_time::Duration;

    #[test]
    fn test_signal_basic() {
        let sig = signal(42);
        assert_eq!(sig.get(), 42);

        sig.set(100);
        assert_eq!(sig.get(), 100);

        sig.update(|v| *v += 1);
        assert_eq!(sig.get(), 101);
    }

    #[test]
    fn test_signal_subscription() {
        let sig = signal(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_clone = seen.clone();
        let id = sig.subscribe(move |v| seen_clone.borrow_mut().push(*v));

        sig.set(42);
        assert!(sig.unsubscribe(id));
        sig.set(7);
        assert_eq!(*seen.borrow(), vec![42]);
        assert!(!sig.unsubscribe(id));
    }

    #[test]
    fn test_observers_unsubscribe_during_notify() {
        let obs: Rc<Observers<u32>> = Rc::new(Observers::new());
        let hits = Rc::new(Cell::new(0));
        let slot: Rc<Cell<Option<SubId>>> = Rc::new(Cell::new(None));

        let id = {
            let obs = obs.clone();
            let hits = hits.clone();
            let slot = slot.clone();
            obs.clone().subscribe(move |_| {
                hits.set(hits.get() + 1);
                if let Some(id) = slot.get() {
                    obs.unsubscribe(id);
                }
            })
        };
        slot.set(Some(id));

        obs.notify(&1);
        obs.notify(&2);
        assert_eq!(hits.get(), 1);
        assert!(obs.is_empty());
    }

    #[test]
    fn test_scope_explicit_dispose() {
        let cleaned_up = Rc::new(Cell::new(false));

        let scope = Scope::new();
        let c = cleaned_up.clone();
        scope.hold(Dispose::new(move || c.set(true)));

        assert!(!cleaned_up.get());
        scope.dispose();
        assert!(cleaned_up.get());
    }

    #[test]
    fn test_scope_drop_releases_in_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        {
            let scope = Scope::new();
            for name in ["first", "second"] {
                let o = order.clone();
                scope.hold(Dispose::new(move || o.borrow_mut().push(name)));
            }
            let _clone = scope.clone();
        }
        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_effect_held_by_active_scope() {
        let ran = Rc::new(Cell::new(0));
        let scope = Scope::new();
        let d = scope.run(|| {
            let ran = ran.clone();
            effect(move || Dispose::new(move || ran.set(ran.get() + 1)))
        });
        assert_eq!(scope.held(), 1);
        // Outside `run` nothing is collected.
        let _outside = effect(|| Dispose::new(|| {}));
        assert_eq!(scope.held(), 1);

        d.run();
        scope.dispose();
        // Dispose runs at most once even though both paths fired it.
        assert_eq!(ran.get(), 1);
    }

    #[test]
    fn test_nested_run_restores_outer_scope() {
        let outer = Scope::new();
        let inner = Scope::new();
        outer.run(|| {
            inner.run(|| effect(|| Dispose::new(|| {})));
            effect(|| Dispose::new(|| {}));
        });
        assert_eq!((outer.held(), inner.held()), (1, 1));
    }

    #[test]
    fn test_dispose_guard_drop() {
        let ran = Rc::new(Cell::new(false));
        let r = ran.clone();
        let guard = Dispose::new(move || r.set(true)).guard();
        assert!(!ran.get());
        drop(guard);
        assert!(ran.get());
    }

    #[test]
    fn test_event_hub_mask_and_dispose() {
        let hub = EventHub::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let d = hub.listen(EventMask::RESIZE | EventMask::SCROLL, move |_| {
            h.set(h.get() + 1)
        });

        hub.emit(EventMask::RESIZE);
        hub.emit(EventMask::SCROLL);
        hub.emit(EventMask::MAIN_RESIZED);
        assert_eq!(hits.get(), 2);

        d.run();
        assert_eq!(hub.listener_count(), 0);
        hub.emit(EventMask::RESIZE);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_surface_tree() {
        let s = Surface::new(Size::new(800.0, 600.0));
        let a = s.create_node(None);
        let b = s.create_node(Some(a));
        let c = s.create_node(Some(b));
        let other = s.create_node(None);

        assert!(s.is_ancestor_or_self(a, c));
        assert!(s.is_ancestor_or_self(c, c));
        assert!(!s.is_ancestor_or_self(other, c));
        assert_eq!(s.children(a), vec![b]);

        assert!(s.bounds(b).is_none());
        s.set_bounds(b, BoundingBox::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(s.bounds(b).map(|bb| bb.bottom), Some(60.0));

        assert!(s.remove_node(a));
        assert!(!s.contains(c));
        assert!(!s.remove_node(s.root()));
        assert_eq!(s.node_count(), 2);
    }

    #[test]
    fn test_surface_resize_emits() {
        let s = Surface::new(Size::new(800.0, 600.0));
        let seen = Rc::new(Cell::new(EventMask::empty()));
        let seen_c = seen.clone();
        let _d = s.events().listen(EventMask::all(), move |e| seen_c.set(e));
        s.resize_viewport(Size::new(400.0, 300.0));
        assert_eq!(seen.get(), EventMask::RESIZE);
        assert_eq!(s.viewport().width, 400.0);
    }

    #[test]
    fn test_timer_queue_order_and_clear() {
        let q = TimerQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        q.set_timeout(Duration::from_millis(20), Box::new(move || l.borrow_mut().push("b")));
        let l = log.clone();
        q.set_timeout(Duration::from_millis(10), Box::new(move || l.borrow_mut().push("a")));
        let l = log.clone();
        let dead = q.set_timeout(Duration::from_millis(5), Box::new(move || l.borrow_mut().push("x")));
        q.clear_timeout(dead);

        assert_eq!(q.advance(Duration::from_millis(30)), 2);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert_eq!(q.now(), Duration::from_millis(30));
        assert_eq!(q.pending(), 0);
    }

    #[test]
    fn test_timer_queue_rearm_during_advance() {
        let q = TimerQueue::new();
        let fired_at = Rc::new(RefCell::new(Vec::new()));

        let q2 = q.clone();
        let f = fired_at.clone();
        q.set_timeout(
            Duration::from_millis(10),
            Box::new(move || {
                f.borrow_mut().push(q2.now());
                let f2 = f.clone();
                let q3 = q2.clone();
                q2.set_timeout(
                    Duration::from_millis(10),
                    Box::new(move || f2.borrow_mut().push(q3.now())),
                );
            }),
        );

        q.advance(Duration::from_millis(25));
        assert_eq!(
            *fired_at.borrow(),
            vec![Duration::from_millis(10), Duration::from_millis(20)]
        );
    }

    #[test]
    fn test_max_displacement() {
        let a = [ContactPoint::new(0.0, 0.0), ContactPoint::new(5.0, 5.0)];
        let b = [ContactPoint::new(3.0, -4.0)];
        assert_eq!(max_displacement(&a, &b), 4.0);
        assert_eq!(max_displacement(&a, &[]), 0.0);
    }

    #[test]
    fn test_press_event_prevent_default() {
        let ev = PressEvent::mouse(PressEventKind::End, Vec2 { x: 1.0, y: 2.0 });
        assert!(!ev.default_prevented());
        ev.prevent_default();
        assert!(ev.default_prevented());
        assert_eq!(ev.contact_points().len(), 1);
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect {
            x: 10.0,
            y: 10.0,
            w: 100.0,
            h: 50.0,
        };

        assert!(rect.contains(Vec2 { x: 50.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 5.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 50.0, y: 70.0 }));
        assert_eq!(BoundingBox::from(rect).right, 110.0);
    }

    #[test]
    fn test_config_locals_nest() {
        assert_eq!(hold_config(), HoldConfig::default());
        with_table_config(
            TableConfig {
                row_height: 32.0,
                ..TableConfig::default()
            },
            || {
                with_table_config(
                    TableConfig {
                        row_height: 24.0,
                        ..TableConfig::default()
                    },
                    || assert_eq!(table_config().row_height, 24.0),
                );
                assert_eq!(table_config().row_height, 32.0);
                assert_eq!(dropdown_config().visible_items, 5);
            },
        );
        assert_eq!(table_config().row_height, 40.0);
    }

    #[test]
    fn test_config_validate() {
        assert!(HoldConfig::default().validate().is_ok());
        let bad = HoldConfig {
            minimum_interval_ms: 0,
            ..HoldConfig::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(Error::InvalidConfig {
                field: "minimum_interval_ms",
                ..
            })
        ));
        assert!(DropdownConfig { visible_items: 0 }.validate().is_err());
        let t = TableConfig {
            row_height: f32::NAN,
            ..TableConfig::default()
        };
        assert_eq!(
            t.validate().map_err(|e| e.to_string()),
            Err("invalid `row_height`: must be finite and >= 0, got NaN".to_string())
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serde_defaults() {
        let cfg: HoldConfig = serde_json::from_str(r#"{ "initial_delay_ms": 400 }"#).unwrap();
        assert_eq!(cfg.initial_delay_ms, 400);
        assert_eq!(cfg.base_interval_ms, 700);
    }
}
