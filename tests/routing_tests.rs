// Routing tests for the Orbit GUI root manager

use std::cell::RefCell;
use std::rc::Rc;

use orbit_gui::events::{
    ON_CHAR, ON_CURSOR, ON_CURSOR_ENTER, ON_CURSOR_LEAVE, ON_FOCUS, ON_FOCUS_LOST, ON_KEY_DOWN, ON_MOUSE_DOWN,
    ON_MOUSE_DOWN_OUT, ON_SCROLL,
};
use orbit_gui::prelude::*;

type Log = Rc<RefCell<Vec<String>>>;

fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn placed(root: &mut Root, parent: PanelId, x: f32, y: f32, w: f32, h: f32) -> PanelId {
    let id = root.create_panel(w, h);
    root.set_position(id, x, y);
    root.add_child(parent, id).unwrap();
    id
}

fn record(root: &mut Root, id: PanelId, name: &'static str, label: &str, log: &Log) {
    let log = log.clone();
    let label = label.to_string();
    root.subscribe(id, name, move |_, _| log.borrow_mut().push(format!("{label}:{name}")));
}

fn record_hover(root: &mut Root, id: PanelId, label: &str, log: &Log) {
    record(root, id, ON_CURSOR_ENTER, label, log);
    record(root, id, ON_CURSOR_LEAVE, label, log);
}

#[test]
fn test_topmost_panel_wins() {
    let mut root = Root::new(400.0, 400.0);
    let top = root.root_panel();
    let low = placed(&mut root, top, 0.0, 0.0, 200.0, 200.0);
    let high = placed(&mut root, top, 50.0, 50.0, 200.0, 200.0);
    let middle = placed(&mut root, top, 100.0, 100.0, 200.0, 200.0);
    root.set_z(low, 1.0);
    root.set_z(high, 5.0);
    root.set_z(middle, 3.0);

    root.handle_event(&InputEvent::cursor(150.0, 150.0));
    assert_eq!(root.target(), Some(high));

    root.handle_event(&InputEvent::cursor(20.0, 20.0));
    assert_eq!(root.target(), Some(low));

    root.handle_event(&InputEvent::cursor(280.0, 280.0));
    assert_eq!(root.target(), Some(middle));

    // Among equal z the later sibling is drawn on top
    root.set_z(high, 0.0);
    root.set_z(middle, 0.0);
    root.set_z(low, 0.0);
    root.handle_event(&InputEvent::cursor(150.0, 150.0));
    assert_eq!(root.target(), Some(middle));
}

#[test]
fn test_invisible_panels_never_receive_cursor_events() {
    let mut root = Root::new(400.0, 400.0);
    let top = root.root_panel();
    let container = placed(&mut root, top, 0.0, 0.0, 200.0, 200.0);
    let inner = placed(&mut root, container, 10.0, 10.0, 50.0, 50.0);
    let log = new_log();
    record_hover(&mut root, inner, "inner", &log);
    record(&mut root, inner, ON_CURSOR, "inner", &log);

    root.set_visible(container, false);
    root.handle_event(&InputEvent::cursor(20.0, 20.0));
    root.handle_event(&InputEvent::cursor(30.0, 30.0));

    assert_eq!(root.target(), None);
    assert!(log.borrow().is_empty());
}

#[test]
fn test_disabled_panels_only_hear_outside_clicks() {
    let mut root = Root::new(400.0, 400.0);
    let top = root.root_panel();
    let panel = placed(&mut root, top, 0.0, 0.0, 100.0, 100.0);
    let log = new_log();
    record(&mut root, panel, ON_MOUSE_DOWN, "panel", &log);
    record(&mut root, panel, ON_MOUSE_DOWN_OUT, "panel", &log);
    record(&mut root, panel, ON_CURSOR_ENTER, "panel", &log);

    root.set_enabled(panel, false);
    root.handle_event(&InputEvent::cursor(50.0, 50.0));
    root.handle_event(&InputEvent::mouse_down(MouseButton::Left, 50.0, 50.0));

    assert_eq!(*log.borrow(), vec!["panel:mouse-down-outside"]);
    assert_eq!(root.target(), None);
}

#[test]
fn test_enter_leave_between_siblings_spares_common_ancestor() {
    let mut root = Root::new(400.0, 400.0);
    let top = root.root_panel();
    let container = placed(&mut root, top, 0.0, 0.0, 300.0, 100.0);
    let a = placed(&mut root, container, 0.0, 0.0, 100.0, 100.0);
    let b = placed(&mut root, container, 200.0, 0.0, 100.0, 100.0);
    let log = new_log();
    record_hover(&mut root, container, "container", &log);
    record_hover(&mut root, a, "a", &log);
    record_hover(&mut root, b, "b", &log);

    root.handle_event(&InputEvent::cursor(50.0, 50.0));
    assert_eq!(*log.borrow(), vec!["a:cursor-enter", "container:cursor-enter"]);

    log.borrow_mut().clear();
    root.handle_event(&InputEvent::cursor(250.0, 50.0));
    assert_eq!(*log.borrow(), vec!["a:cursor-leave", "b:cursor-enter"]);

    // Repeated motion inside the same target changes nothing
    log.borrow_mut().clear();
    root.handle_event(&InputEvent::cursor(260.0, 60.0));
    assert!(log.borrow().is_empty());

    root.handle_event(&InputEvent::cursor(390.0, 390.0));
    assert_eq!(*log.borrow(), vec!["b:cursor-leave", "container:cursor-leave"]);
}

#[test]
fn test_enter_leave_with_nesting() {
    let mut root = Root::new(400.0, 400.0);
    let top = root.root_panel();
    let parent = placed(&mut root, top, 0.0, 0.0, 200.0, 200.0);
    let child = placed(&mut root, parent, 50.0, 50.0, 50.0, 50.0);
    let log = new_log();
    record_hover(&mut root, parent, "parent", &log);
    record_hover(&mut root, child, "child", &log);

    root.handle_event(&InputEvent::cursor(10.0, 10.0));
    root.handle_event(&InputEvent::cursor(60.0, 60.0));
    assert_eq!(*log.borrow(), vec!["parent:cursor-enter", "child:cursor-enter"]);

    log.borrow_mut().clear();
    root.handle_event(&InputEvent::cursor(10.0, 10.0));
    assert_eq!(*log.borrow(), vec!["child:cursor-leave"]);
    assert!(root.panel(parent).unwrap().cursor_entered());
}

#[test]
fn test_key_focus_is_exclusive() {
    let mut root = Root::new(400.0, 400.0);
    let top = root.root_panel();
    let container = placed(&mut root, top, 0.0, 0.0, 300.0, 300.0);
    let first = placed(&mut root, container, 0.0, 0.0, 100.0, 100.0);
    let second = placed(&mut root, container, 150.0, 0.0, 100.0, 100.0);
    let log = new_log();
    for (id, label) in [(container, "container"), (first, "first"), (second, "second")] {
        record(&mut root, id, ON_KEY_DOWN, label, &log);
        record(&mut root, id, ON_CHAR, label, &log);
        record(&mut root, id, ON_FOCUS, label, &log);
        record(&mut root, id, ON_FOCUS_LOST, label, &log);
    }

    root.set_key_focus(Some(first));
    root.set_key_focus(Some(second));
    // The cursor hovering the first panel does not steer key events
    root.handle_event(&InputEvent::cursor(50.0, 50.0));
    root.handle_event(&InputEvent::key_down(Key::Other(65)));
    root.handle_event(&InputEvent::char('a'));

    assert_eq!(
        *log.borrow(),
        vec![
            "first:focus-gained",
            "first:focus-lost",
            "second:focus-gained",
            "second:key-down",
            "second:char",
        ]
    );
}

#[test]
fn test_modal_panel_contains_delivery() {
    let mut root = Root::new(400.0, 400.0);
    let top = root.root_panel();
    let dialog = placed(&mut root, top, 200.0, 200.0, 150.0, 150.0);
    let ok = placed(&mut root, dialog, 10.0, 10.0, 50.0, 20.0);
    let outside = placed(&mut root, top, 0.0, 0.0, 100.0, 100.0);
    let inner = placed(&mut root, outside, 10.0, 10.0, 20.0, 20.0);
    let log = new_log();
    for (id, label) in [(ok, "ok"), (outside, "outside"), (inner, "inner")] {
        record(&mut root, id, ON_MOUSE_DOWN, label, &log);
        record(&mut root, id, ON_MOUSE_DOWN_OUT, label, &log);
        record(&mut root, id, ON_CURSOR, label, &log);
        record_hover(&mut root, id, label, &log);
    }

    root.set_modal(Some(dialog));
    let routing = root.handle_event(&InputEvent::cursor(15.0, 15.0));
    assert_eq!(routing, Routing::Consumed);
    root.handle_event(&InputEvent::mouse_down(MouseButton::Left, 15.0, 15.0));
    assert_eq!(*log.borrow(), vec!["ok:mouse-down-outside"]);

    log.borrow_mut().clear();
    root.handle_event(&InputEvent::mouse_down(MouseButton::Left, 215.0, 215.0));
    assert_eq!(*log.borrow(), vec!["ok:cursor-enter", "ok:mouse-down"]);

    root.set_modal(None);
    log.borrow_mut().clear();
    let routing = root.handle_event(&InputEvent::mouse_down(MouseButton::Left, 500.0, 500.0));
    assert!(routing.is_forwarded());
}

#[test]
fn test_gui_stop_shields_panels_behind() {
    let mut root = Root::new(400.0, 400.0);
    let top = root.root_panel();
    let parent = placed(&mut root, top, 0.0, 0.0, 200.0, 200.0);
    let leaf = placed(&mut root, parent, 10.0, 10.0, 50.0, 50.0);
    let log = new_log();
    record(&mut root, parent, ON_MOUSE_DOWN, "parent", &log);
    record(&mut root, leaf, ON_MOUSE_DOWN, "leaf", &log);

    let routing = root.handle_event(&InputEvent::mouse_down(MouseButton::Left, 20.0, 20.0));
    assert_eq!(*log.borrow(), vec!["leaf:mouse-down", "parent:mouse-down"]);
    assert!(routing.is_forwarded());

    root.subscribe(leaf, ON_MOUSE_DOWN, |root, _| root.stop_propagation(Stop::GUI));
    log.borrow_mut().clear();
    let routing = root.handle_event(&InputEvent::mouse_down(MouseButton::Left, 20.0, 20.0));
    assert_eq!(*log.borrow(), vec!["leaf:mouse-down"]);
    assert!(routing.is_forwarded());

    root.subscribe(leaf, ON_MOUSE_DOWN, |root, _| root.stop_propagation(Stop::HOST));
    let routing = root.handle_event(&InputEvent::mouse_down(MouseButton::Left, 20.0, 20.0));
    assert_eq!(routing, Routing::Consumed);
}

#[test]
fn test_key_events_taken_by_focus_are_consumed() {
    let mut root = Root::new(400.0, 400.0);
    let top = root.root_panel();
    let field = placed(&mut root, top, 0.0, 0.0, 100.0, 20.0);
    let log = new_log();
    record(&mut root, field, ON_KEY_DOWN, "field", &log);

    root.set_key_focus(Some(field));
    assert_eq!(root.handle_event(&InputEvent::key_down(Key::Enter)), Routing::Consumed);
    assert_eq!(root.handle_event(&InputEvent::char('x')), Routing::Consumed);
    assert_eq!(*log.borrow(), vec!["field:key-down"]);

    root.set_key_focus(None);
    assert_eq!(root.handle_event(&InputEvent::key_down(Key::Enter)), Routing::Forward);
    assert_eq!(root.handle_event(&InputEvent::char('x')), Routing::Forward);
}

#[test]
fn test_cursor_over_a_panel_is_consumed() {
    let mut root = Root::new(400.0, 400.0);
    let top = root.root_panel();
    let panel = placed(&mut root, top, 0.0, 0.0, 100.0, 100.0);
    let log = new_log();
    record(&mut root, panel, ON_CURSOR, "panel", &log);

    assert_eq!(root.handle_event(&InputEvent::cursor(50.0, 50.0)), Routing::Consumed);
    assert_eq!(*log.borrow(), vec!["panel:cursor"]);

    assert_eq!(root.handle_event(&InputEvent::cursor(300.0, 300.0)), Routing::Forward);
    assert_eq!(root.target(), None);
}

#[test]
fn test_scroll_is_consumed_by_focus_or_target() {
    let mut root = Root::new(400.0, 400.0);
    let top = root.root_panel();
    let panel = placed(&mut root, top, 0.0, 0.0, 100.0, 100.0);
    let log = new_log();
    record(&mut root, panel, ON_SCROLL, "panel", &log);
    let scroll = InputEvent::Scroll { dx: 0.0, dy: 1.0 };

    root.handle_event(&InputEvent::cursor(300.0, 300.0));
    assert_eq!(root.handle_event(&scroll), Routing::Forward);
    assert!(log.borrow().is_empty());

    root.handle_event(&InputEvent::cursor(50.0, 50.0));
    assert_eq!(root.handle_event(&scroll), Routing::Consumed);

    root.handle_event(&InputEvent::cursor(300.0, 300.0));
    root.set_scroll_focus(Some(panel));
    assert_eq!(root.handle_event(&scroll), Routing::Consumed);
    assert_eq!(*log.borrow(), vec!["panel:scroll", "panel:scroll"]);
}

#[test]
fn test_disabled_parent_hears_nothing_from_enabled_child() {
    let mut root = Root::new(400.0, 400.0);
    let top = root.root_panel();
    let parent = placed(&mut root, top, 0.0, 0.0, 200.0, 200.0);
    let child = placed(&mut root, parent, 10.0, 10.0, 50.0, 50.0);
    let log = new_log();
    record_hover(&mut root, parent, "parent", &log);
    for name in [ON_CURSOR, ON_SCROLL, ON_KEY_DOWN, ON_FOCUS] {
        record(&mut root, parent, name, "parent", &log);
    }
    record(&mut root, child, ON_CURSOR_ENTER, "child", &log);

    root.set_enabled(parent, false);
    root.handle_event(&InputEvent::cursor(20.0, 20.0));
    root.handle_event(&InputEvent::Scroll { dx: 0.0, dy: 1.0 });
    root.set_key_focus(Some(parent));
    let routing = root.handle_event(&InputEvent::key_down(Key::Enter));

    assert_eq!(root.target(), Some(child));
    assert_eq!(root.key_focus(), None);
    assert_eq!(routing, Routing::Forward);
    assert_eq!(*log.borrow(), vec!["child:cursor-enter"]);
}

#[test]
fn test_cursor_event_stops_at_first_subscriber() {
    let mut root = Root::new(400.0, 400.0);
    let top = root.root_panel();
    let outer = placed(&mut root, top, 0.0, 0.0, 200.0, 200.0);
    let middle = placed(&mut root, outer, 0.0, 0.0, 100.0, 100.0);
    let leaf = placed(&mut root, middle, 0.0, 0.0, 50.0, 50.0);
    let log = new_log();
    record(&mut root, outer, ON_CURSOR, "outer", &log);
    record(&mut root, middle, ON_CURSOR, "middle", &log);

    root.handle_event(&InputEvent::cursor(10.0, 10.0));
    assert_eq!(root.target(), Some(leaf));
    assert_eq!(*log.borrow(), vec!["middle:cursor"]);
}

#[test]
fn test_handler_disposing_hit_panel_mid_dispatch() {
    let mut root = Root::new(400.0, 400.0);
    let top = root.root_panel();
    let parent = placed(&mut root, top, 0.0, 0.0, 200.0, 200.0);
    let child = placed(&mut root, parent, 10.0, 10.0, 50.0, 50.0);
    let log = new_log();
    root.subscribe(child, ON_MOUSE_DOWN, |root, ev| {
        root.dispose(ev.panel).unwrap();
    });
    record(&mut root, child, ON_MOUSE_DOWN, "child", &log);
    record(&mut root, parent, ON_MOUSE_DOWN, "parent", &log);
    root.set_key_focus(Some(child));

    root.handle_event(&InputEvent::mouse_down(MouseButton::Left, 20.0, 20.0));

    assert_eq!(*log.borrow(), vec!["parent:mouse-down"]);
    assert!(!root.tree().contains(child));
    assert_eq!(root.key_focus(), None);
}

#[test]
fn test_enter_handler_disposing_target() {
    let mut root = Root::new(400.0, 400.0);
    let top = root.root_panel();
    let parent = placed(&mut root, top, 0.0, 0.0, 200.0, 200.0);
    let child = placed(&mut root, parent, 10.0, 10.0, 50.0, 50.0);
    let log = new_log();
    root.subscribe(child, ON_CURSOR_ENTER, |root, ev| {
        root.dispose(ev.panel).unwrap();
    });
    record(&mut root, parent, ON_CURSOR_ENTER, "parent", &log);
    record(&mut root, parent, ON_CURSOR, "parent", &log);

    root.handle_event(&InputEvent::cursor(20.0, 20.0));
    assert_eq!(*log.borrow(), vec!["parent:cursor-enter"]);
    assert_eq!(root.target(), None);

    // The next motion resolves to the parent without a second enter
    root.handle_event(&InputEvent::cursor(25.0, 25.0));
    assert_eq!(root.target(), Some(parent));
    assert_eq!(*log.borrow(), vec!["parent:cursor-enter", "parent:cursor"]);
}

#[test]
fn test_modal_policy_from_config() {
    let config = RootConfig::from_json_str(r#"{ "modal_policy": "key_and_cursor" }"#).unwrap();
    let mut root = Root::with_config(400.0, 400.0, config);
    let top = root.root_panel();
    let dialog = placed(&mut root, top, 0.0, 0.0, 100.0, 100.0);
    let slider = placed(&mut root, top, 200.0, 0.0, 100.0, 100.0);

    root.set_mouse_focus(Some(slider));
    root.set_modal(Some(dialog));
    assert_eq!(root.mouse_focus(), Some(slider));
    assert_eq!(root.config().modal_policy, ModalPolicy::KeyAndCursor);
}
