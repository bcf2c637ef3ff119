//! Scripted session end to end: presses from config drive a long-press edit
//! and a store, then the app asks to exit.
use std::time::Duration;

use bevy::prelude::*;
use stage_editor::core::config::{EditorConfig, ScriptedPress};
use stage_editor::interaction::session::smoke_run::{RunTally, SmokeRun, SmokeRunPlugin};
use stage_editor::stage::{PropStorage, StageCommand, StageEditing, StageObjectData, StageObjectKind};
use stage_editor::StageEditorPlugin;

fn scripted_config(exit_after_secs: f32) -> EditorConfig {
    let mut cfg = EditorConfig::default();
    cfg.touch.activate_wait_secs = 1.0;
    cfg.touch.button_activate_secs = 0.25;
    cfg.radial.button_separate_radius = 100.0;
    cfg.stage.storage = vec![StageObjectData::new("Crate", StageObjectKind::Prop)];
    cfg.session.exit_after_secs = exit_after_secs;
    cfg.session.presses = vec![
        // Long-press the prop at the origin to open its menu.
        ScriptedPress { at_secs: 0.05, position: [0.0, 0.0], hold_secs: 1.5 },
        // Store sits straight below the center for a two-button menu.
        ScriptedPress { at_secs: 2.05, position: [0.0, -100.0], hold_secs: 0.5 },
    ];
    cfg
}

fn scripted_app(cfg: EditorConfig) -> App {
    let mut app = App::new();
    app.insert_resource(Time::<()>::default())
        .insert_resource(cfg)
        .add_plugins((StageEditorPlugin, SmokeRunPlugin));
    app.update();
    app.world_mut().send_event(StageCommand::PlaceFromStorage { index: 0, position: Vec2::ZERO });
    app.update();
    app
}

fn run_until_exit(app: &mut App, max_frames: usize) -> Option<AppExit> {
    for _ in 0..max_frames {
        app.world_mut().resource_mut::<Time>().advance_by(Duration::from_millis(100));
        app.update();
        if let Some(exit) = app.should_exit() {
            return Some(exit);
        }
    }
    None
}

#[test]
fn scripted_presses_store_the_prop_then_exit() {
    let mut app = scripted_app(scripted_config(1.0));
    assert_eq!(app.world().resource::<StageEditing>().placed().len(), 1);

    assert_eq!(run_until_exit(&mut app, 40), Some(AppExit::Success));

    assert!(app.world().resource::<StageEditing>().placed().is_empty());
    let storage = app.world().resource::<PropStorage>();
    assert_eq!(storage.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(), ["Crate"]);
    let tally = app.world().resource::<SmokeRun>().tally();
    assert_eq!(tally, RunTally { placed: 1, stored: 1, menus_opened: 1 });
}

#[test]
fn exit_waits_for_the_script_to_finish() {
    let mut app = scripted_app(scripted_config(0.5));
    // Last release is scripted at 2.55s, well past the 0.5s deadline.
    assert_eq!(run_until_exit(&mut app, 20), None);
    assert_eq!(run_until_exit(&mut app, 20), Some(AppExit::Success));
}

#[test]
fn unscripted_session_stays_idle() {
    let mut cfg = scripted_config(0.0);
    cfg.session.presses.clear();
    let mut app = scripted_app(cfg);
    assert!(!app.world().contains_resource::<SmokeRun>());
    assert_eq!(run_until_exit(&mut app, 30), None);
    assert_eq!(app.world().resource::<StageEditing>().placed().len(), 1);
}
