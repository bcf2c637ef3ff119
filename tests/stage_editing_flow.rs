//! Headless walk through the long-press edit flow: place, open the radial
//! menu, press a sub-function button, and watch storage change.
use std::time::Duration;

use bevy::prelude::*;
use stage_editor::core::config::EditorConfig;
use stage_editor::stage::{
    EditMenuEvent, PropStorage, StageCommand, StageEditing, StageObject, StageObjectData, StageObjectKind,
    StageObjectStored, SubfunctionAction, SubfunctionButton,
};
use stage_editor::{PointerSignal, StageEditorPlugin, TouchUp, Touchable};

fn test_config() -> EditorConfig {
    let mut cfg = EditorConfig::default();
    cfg.touch.activate_wait_secs = 1.0;
    cfg.touch.button_activate_secs = 0.25;
    cfg.radial.button_separate_radius = 100.0;
    cfg.radial.button_half_extent = 20.0;
    cfg.radial.actions = vec![SubfunctionAction::Store, SubfunctionAction::Close];
    cfg.stage.storage = vec![
        StageObjectData::new("Crate", StageObjectKind::Prop),
        StageObjectData::new("Spotlight", StageObjectKind::Effect),
    ];
    cfg
}

fn editor_app(cfg: EditorConfig) -> App {
    let mut app = App::new();
    // No TimePlugin: tests drive the clock by hand.
    app.insert_resource(Time::<()>::default());
    app.insert_resource(cfg);
    app.add_plugins(StageEditorPlugin);
    app.update();
    app
}

fn step(app: &mut App, secs: f32) {
    app.world_mut().resource_mut::<Time>().advance_by(Duration::from_secs_f32(secs));
    app.update();
}

fn press(app: &mut App, at: Vec2) {
    app.world_mut().send_event(PointerSignal::Down { position: at });
    step(app, 0.0);
}

fn release(app: &mut App) {
    app.world_mut().send_event(PointerSignal::Up);
    step(app, 0.0);
}

fn drain<E: Event>(app: &mut App) -> Vec<E> {
    app.world_mut().resource_mut::<Events<E>>().drain().collect()
}

fn place_from_storage(app: &mut App, index: usize, at: Vec2) -> Entity {
    app.world_mut().send_event(StageCommand::PlaceFromStorage { index, position: at });
    step(app, 0.0);
    *app.world().resource::<StageEditing>().placed().last().expect("placed")
}

fn button(app: &mut App, action: SubfunctionAction) -> (Entity, Vec2) {
    let mut q = app.world_mut().query::<(Entity, &SubfunctionButton, &Transform)>();
    q.iter(app.world())
        .find(|(_, b, _)| b.action == action)
        .map(|(e, _, tf)| (e, tf.translation.truncate()))
        .expect("button spawned")
}

fn is_enabled(app: &App, entity: Entity) -> bool {
    app.world().get::<Touchable>(entity).expect("touchable").is_enabled()
}

/// Long-presses `at` until the prop activates, then lets go.
fn open_menu(app: &mut App, at: Vec2) {
    press(app, at);
    step(app, 0.6);
    step(app, 0.6);
    release(app);
}

#[test]
fn place_from_storage_moves_item_on_stage() {
    let mut app = editor_app(test_config());
    let prop = place_from_storage(&mut app, 0, Vec2::new(10.0, 20.0));

    let object = app.world().get::<StageObject>(prop).expect("stage object");
    assert_eq!(object.data.name, "Crate");
    let tf = app.world().get::<Transform>(prop).expect("transform");
    assert_eq!(tf.translation, Vec3::new(10.0, 20.0, 0.0));

    let storage = app.world().resource::<PropStorage>();
    assert_eq!(storage.len(), 1);
    assert_eq!(storage.get(0).map(|d| d.name.as_str()), Some("Spotlight"));
}

#[test]
fn place_from_missing_index_changes_nothing() {
    let mut app = editor_app(test_config());
    app.world_mut().send_event(StageCommand::PlaceFromStorage { index: 7, position: Vec2::ZERO });
    step(&mut app, 0.0);
    assert!(app.world().resource::<StageEditing>().placed().is_empty());
    assert_eq!(app.world().resource::<PropStorage>().len(), 2);
}

#[test]
fn long_press_opens_menu_around_pointer() {
    let mut app = editor_app(test_config());
    let prop = place_from_storage(&mut app, 0, Vec2::ZERO);
    let (store, _) = button(&mut app, SubfunctionAction::Store);
    assert!(!is_enabled(&app, store));

    press(&mut app, Vec2::new(5.0, 5.0));
    step(&mut app, 0.6);
    assert!(!app.world().resource::<StageEditing>().is_menu_open());
    step(&mut app, 0.6);

    let menu = drain::<EditMenuEvent>(&mut app);
    assert_eq!(menu, vec![EditMenuEvent::Opened { target: prop, center: Vec2::new(5.0, 5.0) }]);
    assert_eq!(app.world().resource::<StageEditing>().target(), Some(prop));

    let (store, store_at) = button(&mut app, SubfunctionAction::Store);
    let (close, close_at) = button(&mut app, SubfunctionAction::Close);
    assert!(store_at.distance(Vec2::new(5.0, -95.0)) < 1e-3);
    assert!(close_at.distance(Vec2::new(5.0, 105.0)) < 1e-3);
    assert!(is_enabled(&app, store) && is_enabled(&app, close));
    assert_eq!(app.world().get::<Visibility>(store), Some(&Visibility::Visible));
}

#[test]
fn store_button_returns_prop_to_storage() {
    let mut app = editor_app(test_config());
    let prop = place_from_storage(&mut app, 0, Vec2::ZERO);
    open_menu(&mut app, Vec2::ZERO);
    let (store, store_at) = button(&mut app, SubfunctionAction::Store);
    let (close, _) = button(&mut app, SubfunctionAction::Close);

    press(&mut app, store_at);
    assert_eq!(app.world().resource::<StageEditing>().pressed_button(), Some(store));
    assert!(!is_enabled(&app, close), "sibling is gated while store is held");

    step(&mut app, 0.3);
    let stored = drain::<StageObjectStored>(&mut app);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].entity, prop);
    assert!(app.world().get_entity(prop).is_err());

    let editing = app.world().resource::<StageEditing>();
    assert!(editing.placed().is_empty());
    assert!(!editing.is_menu_open());
    assert_eq!(editing.pressed_button(), None);
    let names: Vec<_> = app.world().resource::<PropStorage>().iter().map(|d| d.name.clone()).collect();
    assert_eq!(names, ["Spotlight", "Crate"]);

    assert!(!is_enabled(&app, store) && !is_enabled(&app, close));
    assert_eq!(app.world().get::<Visibility>(close), Some(&Visibility::Hidden));

    // The press that closed the menu was cancelled, so letting go reports nothing.
    drain::<TouchUp>(&mut app);
    release(&mut app);
    assert!(drain::<TouchUp>(&mut app).is_empty());
}

#[test]
fn releasing_a_button_early_restores_its_siblings() {
    let mut app = editor_app(test_config());
    place_from_storage(&mut app, 0, Vec2::ZERO);
    open_menu(&mut app, Vec2::ZERO);
    let (store, _) = button(&mut app, SubfunctionAction::Store);
    let (_, close_at) = button(&mut app, SubfunctionAction::Close);

    press(&mut app, close_at);
    assert!(!is_enabled(&app, store));
    step(&mut app, 0.1);
    release(&mut app);

    assert!(is_enabled(&app, store));
    let editing = app.world().resource::<StageEditing>();
    assert!(editing.is_menu_open());
    assert_eq!(editing.pressed_button(), None);
}

#[test]
fn tap_then_press_in_one_frame_hands_the_menu_to_the_second_button() {
    let mut app = editor_app(test_config());
    let prop = place_from_storage(&mut app, 0, Vec2::ZERO);
    open_menu(&mut app, Vec2::ZERO);
    let (store, store_at) = button(&mut app, SubfunctionAction::Store);
    let (close, close_at) = button(&mut app, SubfunctionAction::Close);

    app.world_mut().send_event(PointerSignal::Down { position: close_at });
    app.world_mut().send_event(PointerSignal::Up);
    app.world_mut().send_event(PointerSignal::Down { position: store_at });
    step(&mut app, 0.0);

    assert_eq!(app.world().resource::<StageEditing>().pressed_button(), Some(store));
    assert!(app.world().get::<Touchable>(store).unwrap().hold().is_pointer_engaged());
    assert!(!is_enabled(&app, close));

    step(&mut app, 0.3);
    let stored = drain::<StageObjectStored>(&mut app);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].entity, prop);
}

#[test]
fn put_to_storage_without_stage_data_is_dropped() {
    let mut app = editor_app(test_config());
    let prop = place_from_storage(&mut app, 0, Vec2::ZERO);
    app.world_mut().entity_mut(prop).remove::<StageObject>();

    app.world_mut().send_event(StageCommand::PutToStorage { entity: prop });
    step(&mut app, 0.0);

    assert!(drain::<StageObjectStored>(&mut app).is_empty());
    assert_eq!(app.world().resource::<StageEditing>().placed(), [prop]);
    assert_eq!(app.world().resource::<PropStorage>().len(), 1);
    assert!(app.world().get_entity(prop).is_ok());
}

#[test]
fn close_button_dismisses_menu_without_storing() {
    let mut app = editor_app(test_config());
    let prop = place_from_storage(&mut app, 0, Vec2::ZERO);
    open_menu(&mut app, Vec2::ZERO);
    drain::<EditMenuEvent>(&mut app);
    let (_, close_at) = button(&mut app, SubfunctionAction::Close);

    press(&mut app, close_at);
    step(&mut app, 0.3);

    assert_eq!(drain::<EditMenuEvent>(&mut app), vec![EditMenuEvent::Closed]);
    assert!(drain::<StageObjectStored>(&mut app).is_empty());
    let editing = app.world().resource::<StageEditing>();
    assert!(!editing.is_menu_open());
    assert_eq!(editing.placed(), [prop]);
}

#[test]
fn edit_permission_gates_the_menu() {
    let mut app = editor_app(test_config());
    place_from_storage(&mut app, 0, Vec2::ZERO);
    app.world_mut().send_event(StageCommand::SetEditPermission { can_edit: false });
    step(&mut app, 0.0);

    open_menu(&mut app, Vec2::ZERO);
    assert!(!app.world().resource::<StageEditing>().is_menu_open());

    app.world_mut().send_event(StageCommand::SetEditPermission { can_edit: true });
    step(&mut app, 0.0);
    open_menu(&mut app, Vec2::ZERO);
    assert!(app.world().resource::<StageEditing>().is_menu_open());

    // Revoking permission closes an open menu.
    drain::<EditMenuEvent>(&mut app);
    app.world_mut().send_event(StageCommand::SetEditPermission { can_edit: false });
    step(&mut app, 0.0);
    assert!(!app.world().resource::<StageEditing>().is_menu_open());
    assert_eq!(drain::<EditMenuEvent>(&mut app), vec![EditMenuEvent::Closed]);
}

#[test]
fn short_tap_does_not_open_menu() {
    let mut app = editor_app(test_config());
    place_from_storage(&mut app, 0, Vec2::ZERO);
    press(&mut app, Vec2::ZERO);
    step(&mut app, 0.5);
    release(&mut app);
    step(&mut app, 2.0);
    assert!(!app.world().resource::<StageEditing>().is_menu_open());
    assert!(drain::<EditMenuEvent>(&mut app).is_empty());
}
