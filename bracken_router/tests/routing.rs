// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end routing scenarios driven through the public router API.

use bracken_io::event::{Event, Filter};
use bracken_io::key::{FocusDirection, KeyEvent, KeyFilter, Name};
use bracken_io::pointer::{
    Cursor, PointerEvent, PointerFilter, PointerId, PointerKind, Priority, ScrollBounds,
};
use bracken_io::scene::{ClipShape, SceneOp};
use bracken_io::transfer::{TransferData, TransferEvent};
use bracken_io::window::Actions;
use bracken_router::{Command, Router, SceneError};
use kurbo::{Point, Rect, Vec2};

const ALL: PointerKind = PointerKind::all();

fn ptr_filter(kinds: PointerKind) -> Filter {
    Filter::Pointer(PointerFilter {
        kinds,
        ..PointerFilter::default()
    })
}

fn scroll_filter(bounds: ScrollBounds) -> Filter {
    Filter::Pointer(PointerFilter {
        kinds: PointerKind::SCROLL,
        scroll: bounds,
    })
}

/// One sibling clip rect per handler, in declaration order.
fn rect_ops(rects: &[(u32, Rect)]) -> Vec<SceneOp<u32>> {
    let mut ops = Vec::new();
    for (tag, rect) in rects {
        ops.push(SceneOp::PushClip {
            shape: ClipShape::Rect,
            rect: *rect,
        });
        ops.push(SceneOp::Handler(*tag));
        ops.push(SceneOp::PopClip);
    }
    ops
}

/// Handlers nested inside each other, sharing one hit chain.
fn nested_ops(rects: &[(u32, Rect)]) -> Vec<SceneOp<u32>> {
    let mut ops = Vec::new();
    for (tag, rect) in rects {
        ops.push(SceneOp::PushClip {
            shape: ClipShape::Rect,
            rect: *rect,
        });
        ops.push(SceneOp::Handler(*tag));
    }
    for _ in rects {
        ops.push(SceneOp::PopClip);
    }
    ops
}

fn mv(x: f64, y: f64) -> Event {
    Event::Pointer(PointerEvent {
        kind: PointerKind::MOVE,
        position: Point::new(x, y),
        ..PointerEvent::default()
    })
}

fn press(x: f64, y: f64) -> Event {
    Event::Pointer(PointerEvent {
        kind: PointerKind::PRESS,
        position: Point::new(x, y),
        ..PointerEvent::default()
    })
}

fn release(x: f64, y: f64) -> Event {
    Event::Pointer(PointerEvent {
        kind: PointerKind::RELEASE,
        position: Point::new(x, y),
        ..PointerEvent::default()
    })
}

fn scroll(x: f64, y: f64, delta: Vec2) -> Event {
    Event::Pointer(PointerEvent {
        kind: PointerKind::SCROLL,
        position: Point::new(x, y),
        scroll: delta,
        ..PointerEvent::default()
    })
}

fn kinds(events: &[Event]) -> Vec<PointerKind> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Pointer(p) => Some(p.kind),
            _ => None,
        })
        .collect()
}

fn scrolls(events: &[Event]) -> Vec<Vec2> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Pointer(p) if p.kind == PointerKind::SCROLL => Some(p.scroll),
            _ => None,
        })
        .collect()
}

#[test]
fn overlapping_handlers_route_to_the_topmost() {
    let mut r = Router::new();
    let ops = rect_ops(&[
        (1, Rect::new(0.0, 0.0, 100.0, 100.0)),
        (2, Rect::new(50.0, 50.0, 200.0, 200.0)),
    ]);
    r.events(1, &[ptr_filter(ALL)]);
    r.events(2, &[ptr_filter(ALL)]);
    r.frame(&ops).unwrap();

    // (50,50) lies in both rects; only the later declared handler is
    // entered.
    r.queue(mv(50.0, 50.0));
    assert!(kinds(&r.events(1, &[ptr_filter(ALL)])).is_empty());
    assert_eq!(
        kinds(&r.events(2, &[ptr_filter(ALL)])),
        vec![PointerKind::ENTER, PointerKind::MOVE]
    );

    // (45,45) only hits the first handler.
    r.queue(mv(45.0, 45.0));
    assert_eq!(
        kinds(&r.events(2, &[ptr_filter(ALL)])),
        vec![PointerKind::LEAVE]
    );
    assert_eq!(
        kinds(&r.events(1, &[ptr_filter(ALL)])),
        vec![PointerKind::ENTER, PointerKind::MOVE]
    );
}

#[test]
fn enter_and_leave_stay_balanced() {
    let mut r = Router::new();
    let ops = rect_ops(&[
        (1, Rect::new(0.0, 0.0, 100.0, 100.0)),
        (2, Rect::new(50.0, 50.0, 200.0, 200.0)),
    ]);
    r.events(1, &[ptr_filter(ALL)]);
    r.events(2, &[ptr_filter(ALL)]);
    r.frame(&ops).unwrap();

    let walk = [
        (45.0, 45.0),
        (60.0, 60.0),
        (150.0, 150.0),
        (45.0, 45.0),
        (300.0, 300.0),
        (60.0, 60.0),
    ];
    let mut balance = [0_i32; 2];
    for (x, y) in walk {
        r.queue(mv(x, y));
        for (i, tag) in [1, 2].into_iter().enumerate() {
            for kind in kinds(&r.events(tag, &[ptr_filter(ALL)])) {
                match kind {
                    PointerKind::ENTER => balance[i] += 1,
                    PointerKind::LEAVE => balance[i] -= 1,
                    _ => {}
                }
                assert!(
                    (0..=1).contains(&balance[i]),
                    "handler {tag} enter/leave out of balance"
                );
            }
        }
    }
}

#[test]
fn grab_cancels_the_other_claimants_once() {
    let mut r = Router::new();
    let ops = nested_ops(&[
        (1, Rect::new(0.0, 0.0, 100.0, 100.0)),
        (2, Rect::new(0.0, 0.0, 100.0, 100.0)),
        (3, Rect::new(0.0, 0.0, 100.0, 100.0)),
    ]);
    for t in [1, 2, 3] {
        r.events(t, &[ptr_filter(ALL)]);
    }
    r.frame(&ops).unwrap();
    r.queue(press(50.0, 50.0));
    r.execute(Command::Grab {
        pointer: PointerId(0),
        tag: 2,
    });

    for loser in [1, 3] {
        let cancels = kinds(&r.events(loser, &[ptr_filter(ALL)]))
            .into_iter()
            .filter(|k| *k == PointerKind::CANCEL)
            .count();
        assert_eq!(cancels, 1, "handler {loser} expects exactly one cancel");
    }
    // Subsequent delivery reaches the grabber alone, at grabbed
    // priority.
    r.queue(mv(55.0, 50.0));
    assert!(kinds(&r.events(1, &[ptr_filter(ALL)])).is_empty());
    assert!(kinds(&r.events(3, &[ptr_filter(ALL)])).is_empty());
    let evts = r.events(2, &[ptr_filter(ALL)]);
    let drag = evts
        .iter()
        .find_map(|e| match e {
            Event::Pointer(p) if p.kind == PointerKind::DRAG => Some(p.clone()),
            _ => None,
        })
        .expect("grabber receives the drag");
    assert_eq!(drag.priority, Priority::Grabbed);
}

#[test]
fn scroll_split_never_exceeds_the_offered_delta() {
    let mut r = Router::new();
    let ops = nested_ops(&[
        (1, Rect::new(0.0, 0.0, 100.0, 100.0)),
        (2, Rect::new(0.0, 0.0, 100.0, 50.0)),
    ]);
    r.events(1, &[scroll_filter(ScrollBounds::horizontal(0.0, 100.0))]);
    r.events(2, &[scroll_filter(ScrollBounds::horizontal(0.0, 20.0))]);
    r.frame(&ops).unwrap();

    r.queue(scroll(50.0, 25.0, Vec2::new(50.0, 0.0)));
    // The topmost handler clamps to its 20 budget and the ancestor gets
    // the remaining 30; the sum equals the offered delta.
    assert_eq!(
        scrolls(&r.events(2, &[scroll_filter(ScrollBounds::horizontal(0.0, 20.0))])),
        vec![Vec2::new(20.0, 0.0)]
    );
    assert_eq!(
        scrolls(&r.events(1, &[scroll_filter(ScrollBounds::horizontal(0.0, 100.0))])),
        vec![Vec2::new(30.0, 0.0)]
    );
}

#[test]
fn scroll_budget_shrinks_as_the_handler_re_declares() {
    // A scrollable widget declares how much it can still scroll; after
    // consuming 60 of a 100 budget it re-declares the remaining 40, so a
    // second scroll of 60 is clamped and the overflow stays available to
    // an enclosing handler.
    let mut r = Router::new();
    let ops = nested_ops(&[
        (1, Rect::new(0.0, 0.0, 200.0, 200.0)),
        (2, Rect::new(0.0, 0.0, 100.0, 100.0)),
    ]);
    r.events(1, &[scroll_filter(ScrollBounds::horizontal(0.0, 1000.0))]);
    r.events(2, &[scroll_filter(ScrollBounds::horizontal(0.0, 100.0))]);
    r.frame(&ops).unwrap();

    r.queue(scroll(50.0, 50.0, Vec2::new(60.0, 0.0)));
    assert_eq!(
        scrolls(&r.events(2, &[scroll_filter(ScrollBounds::horizontal(0.0, 100.0))])),
        vec![Vec2::new(60.0, 0.0)]
    );
    r.events(1, &[scroll_filter(ScrollBounds::horizontal(0.0, 1000.0))]);

    r.frame(&ops).unwrap();
    r.events(1, &[scroll_filter(ScrollBounds::horizontal(0.0, 1000.0))]);
    r.events(2, &[scroll_filter(ScrollBounds::horizontal(0.0, 40.0))]);
    r.queue(scroll(50.0, 50.0, Vec2::new(60.0, 0.0)));
    assert_eq!(
        scrolls(&r.events(2, &[scroll_filter(ScrollBounds::horizontal(0.0, 40.0))])),
        vec![Vec2::new(40.0, 0.0)]
    );
    // The 20 beyond the re-declared budget went to the ancestor.
    assert_eq!(
        scrolls(&r.events(1, &[scroll_filter(ScrollBounds::horizontal(0.0, 1000.0))])),
        vec![Vec2::new(20.0, 0.0)]
    );
}

#[test]
fn drag_without_a_source_initiates_nothing() {
    let mut r = Router::new();
    let ops = rect_ops(&[(1, Rect::new(0.0, 0.0, 100.0, 100.0))]);
    r.events(1, &[ptr_filter(ALL)]);
    r.frame(&ops).unwrap();
    r.queue(press(50.0, 50.0));
    r.queue(mv(60.0, 50.0));
    let evts = r.events(1, &[ptr_filter(ALL)]);
    assert!(
        !evts
            .iter()
            .any(|e| matches!(e, Event::Transfer(TransferEvent::Initiate))),
        "no source mime was declared"
    );
}

#[test]
fn drop_over_a_matching_target_requests_data_once() {
    let mut r = Router::new();
    let ops = rect_ops(&[
        (1, Rect::new(0.0, 0.0, 100.0, 100.0)),
        (2, Rect::new(100.0, 0.0, 200.0, 100.0)),
    ]);
    let source = Filter::TransferSource {
        mime: "text/plain".into(),
    };
    let target = Filter::TransferTarget {
        mime: "text/plain".into(),
    };
    r.events(1, &[ptr_filter(ALL), source.clone()]);
    r.events(2, &[target.clone()]);
    r.frame(&ops).unwrap();

    r.queue(press(50.0, 50.0));
    r.queue(mv(60.0, 50.0));
    let initiated = r
        .events(2, &[target.clone()])
        .iter()
        .filter(|e| matches!(e, Event::Transfer(TransferEvent::Initiate)))
        .count();
    assert_eq!(initiated, 1);

    r.queue(mv(150.0, 50.0));
    r.queue(release(150.0, 50.0));
    let requests: Vec<String> = r
        .events(1, &[source])
        .into_iter()
        .filter_map(|e| match e {
            Event::Transfer(TransferEvent::Request { mime }) => Some(mime),
            _ => None,
        })
        .collect();
    assert_eq!(requests, vec!["text/plain".to_string()]);

    // The source answers. The target already observed its transfer
    // events this frame, so the offer waits for the frame boundary and
    // replays there.
    r.execute(Command::Offer {
        tag: 1,
        data: TransferData {
            mime: "text/plain".into(),
            bytes: b"payload".to_vec(),
        },
    });
    r.frame(&ops).unwrap();
    let evts = r.events(2, &[target]);
    let handle = evts
        .iter()
        .find_map(|e| match e {
            Event::Transfer(TransferEvent::Data { handle, .. }) => Some(*handle),
            _ => None,
        })
        .expect("target receives the data event");
    let data = r.claim_data(handle).expect("payload claimable once");
    assert_eq!(data.bytes, b"payload");
    assert_eq!(r.claim_data(handle), None);
}

#[test]
fn drop_without_a_target_cancels_the_transfer() {
    let mut r = Router::new();
    let ops = rect_ops(&[
        (1, Rect::new(0.0, 0.0, 100.0, 100.0)),
        (2, Rect::new(100.0, 0.0, 200.0, 100.0)),
    ]);
    let source = Filter::TransferSource {
        mime: "text/plain".into(),
    };
    let target = Filter::TransferTarget {
        mime: "text/plain".into(),
    };
    r.events(1, &[ptr_filter(ALL), source.clone()]);
    r.events(2, &[target.clone()]);
    r.frame(&ops).unwrap();

    r.queue(press(50.0, 50.0));
    r.queue(mv(60.0, 50.0));
    // Release over neither handler's target region.
    r.queue(release(60.0, 50.0));
    let source_cancelled = r
        .events(1, &[source])
        .iter()
        .any(|e| matches!(e, Event::Transfer(TransferEvent::Cancel)));
    let target_cancelled = r
        .events(2, &[target])
        .iter()
        .any(|e| matches!(e, Event::Transfer(TransferEvent::Cancel)));
    assert!(source_cancelled && target_cancelled);
}

#[test]
fn focus_is_idempotent_and_navigation_needs_handlers() {
    let mut r = Router::<u32>::new();
    // Directional navigation over an empty handler set changes nothing.
    for dir in [
        FocusDirection::Left,
        FocusDirection::Right,
        FocusDirection::Up,
        FocusDirection::Down,
        FocusDirection::Forward,
        FocusDirection::Backward,
    ] {
        assert!(!r.move_focus(dir));
        assert_eq!(r.focused(), None);
    }

    let ops = rect_ops(&[(1, Rect::new(0.0, 0.0, 10.0, 10.0))]);
    r.events(1, &[Filter::Focus]);
    r.frame(&ops).unwrap();
    r.execute(Command::SetFocus(Some(1)));
    let gained = r.events(1, &[Filter::Focus]);
    assert_eq!(gained.len(), 1);
    // Refocusing the holder produces nothing.
    r.execute(Command::SetFocus(Some(1)));
    assert!(r.events(1, &[Filter::Focus]).is_empty());
}

#[test]
fn tab_and_directional_navigation_follow_the_layout() {
    let mut r = Router::new();
    // A two by two grid of focusable handlers.
    let ops = rect_ops(&[
        (1, Rect::new(0.0, 0.0, 10.0, 10.0)),
        (2, Rect::new(20.0, 0.0, 30.0, 10.0)),
        (3, Rect::new(0.0, 20.0, 10.0, 30.0)),
        (4, Rect::new(20.0, 20.0, 30.0, 30.0)),
    ]);
    for t in [1, 2, 3, 4] {
        r.events(t, &[Filter::Focus]);
    }
    r.frame(&ops).unwrap();

    r.move_focus(FocusDirection::Forward);
    assert_eq!(r.focused(), Some(1));
    r.move_focus(FocusDirection::Right);
    assert_eq!(r.focused(), Some(2));
    r.move_focus(FocusDirection::Down);
    assert_eq!(r.focused(), Some(4));
    r.move_focus(FocusDirection::Left);
    assert_eq!(r.focused(), Some(3));
    r.move_focus(FocusDirection::Up);
    assert_eq!(r.focused(), Some(1));
    // Backward from the first handler wraps to the last.
    r.move_focus(FocusDirection::Backward);
    assert_eq!(r.focused(), Some(4));
}

#[test]
fn focus_is_dropped_when_the_handler_vanishes() {
    let mut r = Router::new();
    let ops = rect_ops(&[(1, Rect::new(0.0, 0.0, 10.0, 10.0))]);
    r.events(1, &[Filter::Focus]);
    r.frame(&ops).unwrap();
    r.execute(Command::SetFocus(Some(1)));
    r.events(1, &[Filter::Focus]);
    assert_eq!(r.focused(), Some(1));

    // The next frame does not declare the handler.
    r.frame(&[]).unwrap();
    assert_eq!(r.focused(), None);
}

#[test]
fn key_events_route_to_focus_then_fall_back() {
    let mut r = Router::new();
    let ops = nested_ops(&[
        (1, Rect::new(0.0, 0.0, 100.0, 100.0)),
        (2, Rect::new(0.0, 0.0, 50.0, 50.0)),
    ]);
    // The outer handler accepts the escape key, the inner one only tab.
    r.events(1, &[Filter::Key(KeyFilter::named(Name::ESCAPE))]);
    r.events(
        2,
        &[Filter::Key(KeyFilter::named(Name::TAB)), Filter::Focus],
    );
    r.frame(&ops).unwrap();
    r.execute(Command::SetFocus(Some(2)));
    r.events(2, &[Filter::Focus]);

    // Tab is accepted by the focused handler itself.
    r.queue(Event::Key(KeyEvent {
        name: Name::TAB,
        ..KeyEvent::default()
    }));
    assert_eq!(
        r.events(2, &[Filter::Key(KeyFilter::named(Name::TAB))]).len(),
        1
    );
    // Escape is not; it falls back to the enclosing acceptor.
    r.queue(Event::Key(KeyEvent {
        name: Name::ESCAPE,
        ..KeyEvent::default()
    }));
    assert_eq!(
        r.events(1, &[Filter::Key(KeyFilter::named(Name::ESCAPE))]).len(),
        1
    );
}

#[test]
fn cursor_follows_the_hovered_area() {
    let mut r = Router::new();
    let ops = vec![
        SceneOp::PushClip {
            shape: ClipShape::Rect,
            rect: Rect::new(0.0, 0.0, 100.0, 100.0),
        },
        SceneOp::Cursor(Cursor::Text),
        SceneOp::Handler(1),
        SceneOp::PopClip,
    ];
    r.events(1, &[ptr_filter(ALL)]);
    r.frame(&ops).unwrap();
    r.queue(mv(50.0, 50.0));
    r.events(1, &[ptr_filter(ALL)]);
    assert_eq!(r.cursor(), Cursor::Text);
    r.queue(mv(500.0, 500.0));
    r.events(1, &[ptr_filter(ALL)]);
    assert_eq!(r.cursor(), Cursor::Default);
}

#[test]
fn window_actions_attach_to_their_area() {
    let mut r = Router::<u32>::new();
    let ops = vec![
        SceneOp::PushClip {
            shape: ClipShape::Rect,
            rect: Rect::new(0.0, 0.0, 100.0, 20.0),
        },
        SceneOp::WindowAction(Actions::MOVE),
        SceneOp::PopClip,
    ];
    r.frame(&ops).unwrap();
    assert_eq!(r.action_at(Point::new(50.0, 10.0)), Some(Actions::MOVE));
    assert_eq!(r.action_at(Point::new(50.0, 50.0)), None);
}

#[test]
fn semantic_ids_survive_a_rebuild() {
    let mut r = Router::<u32>::new();
    let ops = |labels: &[&str]| -> Vec<SceneOp<u32>> {
        let mut ops = Vec::new();
        for (i, label) in labels.iter().enumerate() {
            ops.push(SceneOp::PushClip {
                shape: ClipShape::Rect,
                rect: Rect::new(0.0, i as f64 * 10.0, 100.0, (i + 1) as f64 * 10.0),
            });
            ops.push(SceneOp::SemanticLabel(label.to_string()));
            ops.push(SceneOp::PopClip);
        }
        ops
    };
    r.frame(&ops(&["save", "load"])).unwrap();
    let before = r.semantics();
    let save = r.semantic_at(Point::new(50.0, 5.0)).unwrap();

    r.frame(&ops(&["save", "load"])).unwrap();
    let after = r.semantics();
    assert_eq!(before, after, "unchanged content keeps its ids");
    assert_eq!(r.semantic_at(Point::new(50.0, 5.0)), Some(save));

    r.frame(&ops(&["save as", "load"])).unwrap();
    assert_ne!(r.semantic_at(Point::new(50.0, 5.0)), Some(save));
}

#[test]
fn malformed_streams_are_fatal() {
    let mut r = Router::<u32>::new();
    assert_eq!(r.frame(&[SceneOp::PopClip]), Err(SceneError::UnbalancedClipPop));
    assert_eq!(r.frame(&[SceneOp::PopPass]), Err(SceneError::UnbalancedPassPop));
    assert_eq!(
        r.frame(&[SceneOp::LoadTransform(7)]),
        Err(SceneError::UnknownTransformSlot(7))
    );
}

#[test]
fn overlay_handlers_pass_hits_through() {
    let mut r = Router::new();
    let mut ops = rect_ops(&[(1, Rect::new(0.0, 0.0, 100.0, 100.0))]);
    ops.push(SceneOp::PushPass);
    ops.extend(rect_ops(&[(2, Rect::new(0.0, 0.0, 100.0, 100.0))]));
    ops.push(SceneOp::PopPass);
    r.events(1, &[ptr_filter(ALL)]);
    r.events(2, &[ptr_filter(ALL)]);
    r.frame(&ops).unwrap();

    // The overlay is declared in pass mode: both it and the handler
    // beneath receive the hit.
    r.queue(mv(50.0, 50.0));
    assert_eq!(
        kinds(&r.events(1, &[ptr_filter(ALL)])),
        vec![PointerKind::ENTER, PointerKind::MOVE]
    );
    assert_eq!(
        kinds(&r.events(2, &[ptr_filter(ALL)])),
        vec![PointerKind::ENTER, PointerKind::MOVE]
    );
}
