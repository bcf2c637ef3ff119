use std::fs;
use std::time::Duration;

use stage_editor::core::config::EditorConfig;
use stage_editor::stage::{StageObjectKind, SubfunctionAction};

const BASE: &str = r#"
(
    window: (width: 800.0, height: 600.0, title: "Base"),
    touch: (activate_wait_secs: 1.5, button_activate_secs: 0.3),
    radial: (button_separate_radius: 120.0, button_half_extent: 24.0, actions: ["Close"]),
    stage: (
        can_edit: true,
        storage: [
            (name: "Crate", kind: "Prop"),
            (name: "Backdrop", kind: "Scenery", size: Some((240.0, 120.0))),
        ],
    ),
)
"#;

#[test]
fn overlay_overrides_only_the_fields_it_names() {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = dir.path().join("base.ron");
    let local = dir.path().join("local.ron");
    fs::write(&base, BASE).unwrap();
    fs::write(&local, r#"(touch: (activate_wait_secs: 0.5), stage: (can_edit: false))"#).unwrap();

    let (cfg, used, errors) = EditorConfig::load_layered([&base, &local]);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(used.len(), 2);

    assert_eq!(cfg.touch.prop_threshold(), Duration::from_millis(500));
    assert!((cfg.touch.button_activate_secs - 0.3).abs() < 1e-6, "sibling field kept from base");
    assert!(!cfg.stage.can_edit);
    assert_eq!(cfg.window.title, "Base");
    assert_eq!(cfg.radial.actions, vec![SubfunctionAction::Close]);
    assert_eq!(cfg.stage.storage.len(), 2);
    assert_eq!(cfg.stage.storage[1].kind, StageObjectKind::Scenery);
    assert_eq!(cfg.stage.storage[1].size, Some([240.0, 120.0]));
}

#[test]
fn missing_and_broken_layers_are_reported_not_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = dir.path().join("base.ron");
    let broken = dir.path().join("broken.ron");
    let missing = dir.path().join("missing.ron");
    fs::write(&base, BASE).unwrap();
    fs::write(&broken, "(touch: (activate_wait_secs: ").unwrap();

    let (cfg, used, errors) = EditorConfig::load_layered([&base, &broken, &missing]);
    assert_eq!(used, vec![base.display().to_string()]);
    assert_eq!(errors.len(), 2);
    assert!(errors[0].contains("parse error"), "{}", errors[0]);
    assert!(errors[1].contains("read error"), "{}", errors[1]);
    assert!((cfg.touch.activate_wait_secs - 1.5).abs() < 1e-6);
}

#[test]
fn nothing_loaded_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (cfg, used, errors) = EditorConfig::load_layered([dir.path().join("nope.ron")]);
    assert!(used.is_empty());
    assert_eq!(errors.len(), 1);
    assert_eq!(cfg, EditorConfig::default());
}

#[test]
fn unknown_enum_name_is_a_load_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad_action.ron");
    fs::write(&path, r#"(radial: (actions: ["Store", "Juggle"]))"#).unwrap();

    let err = EditorConfig::load_from_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Juggle"), "{err:#}");

    let (cfg, _, errors) = EditorConfig::load_layered([&path]);
    assert_eq!(cfg, EditorConfig::default());
    assert!(errors.iter().any(|e| e.contains("failed to deserialize")));
}

#[test]
fn validate_flags_suspicious_values() {
    let mut cfg = EditorConfig::default();
    cfg.touch.activate_wait_secs = -1.0;
    cfg.radial.actions.clear();
    cfg.stage.storage[0].name = "  ".into();

    let warnings = cfg.validate();
    assert!(warnings.iter().any(|w| w.contains("activate_wait_secs") && w.contains("clamped")));
    assert!(warnings.iter().any(|w| w.contains("radial.actions is empty")));
    assert!(warnings.iter().any(|w| w.contains("stage.storage[0]")));
    assert_eq!(cfg.touch.prop_threshold(), Duration::ZERO);
}

#[test]
fn shipped_config_loads_and_validates() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/config/stage_editor.ron");
    let cfg = EditorConfig::load_from_file(path).expect("shipped config parses");
    assert!(cfg.validate().is_empty(), "{:?}", cfg.validate());
    assert!(!cfg.stage.storage.is_empty());
}
