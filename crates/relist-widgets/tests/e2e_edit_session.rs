//! Edit mode: long press in, Save or Cancel out.

mod harness;

use harness::{Harness, plain};
use relist_runtime::{HapticStrength, Observable};
use relist_widgets::Key;

const H: f32 = 40.0;

#[test]
fn long_press_then_cancel_without_drag() {
    let mut h = Harness::new(plain(&["a", "b", "c"]), H, false);
    h.long_press("a");
    assert!(h.list.is_editing());
    assert!(!h.list.navigation_flag().get());

    h.list.cancel();
    h.settle();
    h.flush();

    let d = h.delegate.borrow();
    assert_eq!(d.cancels, 1);
    assert_eq!(d.saves, 0);
    assert_eq!(d.edit_modes, vec![true, false]);
    assert!(d.reorders.is_empty());
    assert!(h.list.navigation_flag().get());
}

#[test]
fn short_hold_does_not_drag_outside_edit_mode() {
    let mut h = Harness::new(plain(&["a", "b"]), H, false);
    h.lift("a");
    assert!(!h.list.is_dragging());
    h.move_by("a", H);
    h.release("a", H);
    h.settle();
    h.flush();
    assert!(h.delegate.borrow().reorders.is_empty());
    assert!(!h.list.is_editing());
}

#[test]
fn reorderable_list_has_no_edit_mode() {
    let mut h = Harness::new(plain(&["a", "b"]), H, true);
    h.pointer("a", relist_core::PointerEvent::down(10.0, 10.0));
    h.advance(std::time::Duration::from_millis(700));
    assert!(!h.list.is_editing());
    assert!(h.list.is_dragging());
}

#[test]
fn drag_in_edit_mode_then_save_keeps_order() {
    let mut h = Harness::new(plain(&["a", "b", "c"]), H, false);
    h.long_press("a");
    assert!(h.list.rows().iter().all(|r| r.is_editing()));

    h.drag("c", -2.0 * H);
    assert_eq!(h.order(), ["c", "a", "b"]);
    h.list.save();
    h.settle();
    h.flush();

    assert_eq!(h.order(), ["c", "a", "b"]);
    let d = h.delegate.borrow();
    assert_eq!(d.saves, 1);
    assert_eq!(d.edit_modes, vec![true, false]);
    assert_eq!(d.reorders.len(), 1);
    assert_eq!(
        h.haptics.pulses(),
        vec![HapticStrength::Medium, HapticStrength::Heavy]
    );
    assert!(h.list.rows().iter().all(|r| !r.is_editing()));
}

#[test]
fn cancel_restores_order_from_before_edit() {
    let mut h = Harness::new(plain(&["a", "b", "c"]), H, false);
    h.long_press("a");
    h.drag("c", -2.0 * H);
    assert_eq!(h.order(), ["c", "a", "b"]);

    h.list.cancel();
    h.settle();
    assert_eq!(h.order(), ["a", "b", "c"]);
    assert_eq!(harness::ids(h.list.data()), ["a", "b", "c"]);
    assert_eq!(h.offset_of("c"), 2.0 * H);

    h.flush();
    {
        let d = h.delegate.borrow();
        assert_eq!(d.cancels, 1);
        assert_eq!(d.reorders.len(), 1);
        assert_eq!(harness::ids(&d.reorders[0]), ["c", "a", "b"]);
    }

    let version = h.list.engine().order().version();
    h.list.set_data(plain(&["a", "b", "c"]));
    assert_eq!(h.list.engine().order().version(), version);
}

#[test]
fn header_grows_with_scroll_compensation() {
    let mut h = Harness::new(plain(&["a", "b"]), H, false);
    h.scroll.set(100.0);
    h.long_press("a");
    h.settle();
    assert_eq!(h.list.header_height(), 56.0);
    assert_eq!(h.scroll.get(), 156.0);

    h.list.cancel();
    h.settle();
    assert_eq!(h.list.header_height(), 0.0);
    assert_eq!(h.scroll.get(), 100.0);
}

#[test]
fn save_during_live_drag_cancels_the_drag_first() {
    let mut h = Harness::new(plain(&["a", "b", "c"]), H, false);
    h.long_press("a");
    h.lift("b");
    h.move_by("b", 45.0);
    assert_eq!(h.order(), ["a", "c", "b"]);

    h.list.save();
    assert!(!h.list.is_dragging());
    assert_eq!(h.order(), ["a", "b", "c"]);
    h.release("b", 45.0);
    h.settle();
    h.flush();

    let d = h.delegate.borrow();
    assert_eq!(d.reorders.len(), 1);
    assert_eq!(harness::ids(&d.reorders[0]), ["a", "b", "c"]);
    assert_eq!(d.saves, 1);
}

#[test]
fn save_and_cancel_outside_edit_mode_are_no_ops() {
    let mut h = Harness::new(plain(&["a"]), H, false);
    h.list.save();
    h.list.cancel();
    assert!(h.list.effects().is_empty());
}

#[test]
fn host_navigation_flag_is_shared() {
    let nav = Observable::new(true);
    let mut list = relist_widgets::ReorderableList::new(|r: &harness::Row| {
        Key::from(r.id.as_str())
    })
    .with_navigation_flag(nav.clone());
    list.set_data(plain(&["a"]));
    list.report_height(&Key::from("a"), H);

    let t0 = web_time::Instant::now();
    list.handle_pointer(&Key::from("a"), &relist_core::PointerEvent::down(0.0, 0.0), t0);
    list.on_frame(t0 + std::time::Duration::from_millis(600));
    assert!(list.is_editing());
    assert!(!nav.get());
}
