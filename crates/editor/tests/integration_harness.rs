//! Integration tests for HeadlessEditor.
//!
//! Drives the selection and manipulation machines through raw pointer
//! frames, the way a device would.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Vec2, Vec3};
use scene_placer_lib::harness::HeadlessEditor;
use scene_placer_lib::input::{PointerFrame, Touch, TouchPhase};
use scene_placer_lib::state::manipulation::ManipulationMode;
use scene_placer_lib::state::scene::RenderLayer;
use scene_placer_lib::state::{EditorEvent, EventCategory, EventFilter, SelectionState};

fn recorder(h: &mut HeadlessEditor, filter: EventFilter) -> Rc<RefCell<Vec<EditorEvent>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    h.session
        .subscribe(filter, move |e| sink.borrow_mut().push(e.clone()));
    seen
}

#[test]
fn test_placement_flow_highlights_new_object() {
    let mut h = HeadlessEditor::new();
    let events = recorder(&mut h, EventFilter::Categories(vec![EventCategory::Selection]));

    let id = h.place("crate", 3.0, 3.0).unwrap();
    assert_eq!(h.object(&id).unwrap().layer, RenderLayer::Highlighted);
    assert_eq!(
        events.borrow().as_slice(),
        &[EditorEvent::StartEditing { object: id.clone() }]
    );

    h.deselect();
    assert_eq!(h.object(&id).unwrap().layer, RenderLayer::Item);
    assert_eq!(events.borrow().last(), Some(&EditorEvent::StopEditing));
}

#[test]
fn test_placement_waits_for_release() {
    let mut h = HeadlessEditor::new();
    assert!(h.pick_entry("lamp"));
    let pos = h.screen_of(1.0, 1.0);

    h.pointer(pos, TouchPhase::Begin, false);
    h.pointer(pos, TouchPhase::Moving, false);
    assert_eq!(h.object_count(), 0);

    // Releasing over UI does not place
    h.pointer(pos, TouchPhase::End, true);
    assert_eq!(h.object_count(), 0);

    h.pointer(pos, TouchPhase::End, false);
    assert_eq!(h.object_count(), 1);
}

#[test]
fn test_two_finger_begin_does_not_select() {
    let mut h = HeadlessEditor::new();
    h.place("crate", 0.0, 0.0).unwrap();
    h.deselect();

    let pos = h.screen_of(0.0, 0.0);
    h.frame(PointerFrame {
        touches: vec![
            Touch::new(pos, TouchPhase::Begin),
            Touch::new(pos + Vec2::new(40.0, 0.0), TouchPhase::Begin),
        ],
        over_ui: false,
    });
    assert!(h.selected().is_none());

    h.frame(PointerFrame::single(pos, TouchPhase::Begin));
    assert!(h.selected().is_some());
}

#[test]
fn test_tap_selects_topmost_of_stacked_objects() {
    let mut h = HeadlessEditor::new();
    h.place("crate", 0.0, 0.0).unwrap();
    let lamp = h.place("lamp", 0.0, 0.0).unwrap();
    h.deselect();

    // Top-down rays hit the taller lamp first
    h.tap(0.0, 0.0);
    assert_eq!(h.selected(), Some(&lamp));
}

#[test]
fn test_switching_selection_via_empty_tap() {
    let mut h = HeadlessEditor::new();
    let a = h.place("crate", -5.0, 0.0).unwrap();
    let b = h.place("crate", 5.0, 0.0).unwrap();
    assert_eq!(h.selected(), Some(&b));

    // A tap on another item keeps the current selection
    h.tap(-5.0, 0.0);
    assert_eq!(h.selected(), Some(&b));

    h.tap(0.0, 10.0);
    assert!(h.selected().is_none());
    h.tap(-5.0, 0.0);
    assert_eq!(h.selected(), Some(&a));
}

#[test]
fn test_mode_from_ui_then_drag() {
    let mut h = HeadlessEditor::new();
    let id = h.place("crate", 0.0, 0.0).unwrap();

    // Button press over UI sets the mode; the drag starts there
    let start = h.screen_of(0.0, 0.0);
    h.pointer(start, TouchPhase::Begin, true);
    h.set_mode(ManipulationMode::Translate);
    assert_eq!(h.session.manipulation_mode(), ManipulationMode::Translate);

    let mid = h.screen_of(2.0, 0.0);
    let end = h.screen_of(-6.0, 4.0);
    h.pointer(mid, TouchPhase::Moving, false);
    h.pointer(end, TouchPhase::Moving, false);
    assert_eq!(h.history_len(), 1);

    h.frame(PointerFrame::idle());
    assert_eq!(h.session.manipulation_mode(), ManipulationMode::None);
    assert_eq!(h.history_len(), 2);
    assert!((h.position(&id).unwrap() - Vec3::new(-6.0, 0.0, 4.0)).length() < 1e-4);
}

#[test]
fn test_delete_selected_then_undo() {
    let mut h = HeadlessEditor::new();
    let id = h.place("crate", 2.0, 2.0).unwrap();
    assert!(h.delete_selected());
    assert_eq!(h.object_count(), 0);
    assert!(h.object(&id).is_some_and(|o| !o.enabled));
    assert_eq!(h.session.selection().state(), &SelectionState::NoSelection);

    assert!(h.undo());
    assert_eq!(h.object_count(), 1);
    assert!(h.object(&id).unwrap().enabled);

    // The restored object is pickable again
    h.tap(2.0, 2.0);
    assert_eq!(h.selected(), Some(&id));
}

#[test]
fn test_undo_mid_gesture_commits_then_reverts() {
    let mut h = HeadlessEditor::new();
    let id = h.place("crate", 0.0, 0.0).unwrap();

    let start = h.screen_of(0.0, 0.0);
    h.session
        .set_manipulation_mode_at(ManipulationMode::Translate, start);
    let to = h.screen_of(8.0, 0.0);
    h.pointer(to, TouchPhase::Moving, false);

    // Deselecting commits the translate, which undo then reverts
    assert!(h.undo());
    assert!((h.position(&id).unwrap() - Vec3::ZERO).length() < 1e-4);
    assert_eq!(h.history_len(), 1);
}

#[test]
fn test_history_events() {
    let mut h = HeadlessEditor::new();
    let events = recorder(&mut h, EventFilter::Categories(vec![EventCategory::History]));

    h.place("crate", 0.0, 0.0).unwrap();
    h.undo();

    assert_eq!(events.borrow().len(), 2);
    assert!(matches!(events.borrow()[0], EditorEvent::ActionApplied { .. }));
    assert!(matches!(events.borrow()[1], EditorEvent::ActionUndone { .. }));
}
