use anyhow::{Context, Result};
use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path, time::Duration};

use crate::stage::data::{StageObjectData, StageObjectKind};
use crate::stage::editing::SubfunctionAction;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Stage Editor".into(),
        }
    }
}

/// Hold thresholds for the two kinds of touchable objects.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TouchConfig {
    pub activate_wait_secs: f32,
    pub button_activate_secs: f32,
}
impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            activate_wait_secs: 1.0,
            button_activate_secs: 0.25,
        }
    }
}
impl TouchConfig {
    pub fn prop_threshold(&self) -> Duration {
        secs_to_duration(self.activate_wait_secs)
    }
    pub fn button_threshold(&self) -> Duration {
        secs_to_duration(self.button_activate_secs)
    }
}

fn secs_to_duration(secs: f32) -> Duration {
    Duration::try_from_secs_f32(secs.max(0.0)).unwrap_or(Duration::MAX)
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RadialMenuConfig {
    pub button_separate_radius: f32,
    pub button_half_extent: f32,
    pub actions: Vec<SubfunctionAction>,
}
impl Default for RadialMenuConfig {
    fn default() -> Self {
        Self {
            button_separate_radius: 96.0,
            button_half_extent: 28.0,
            actions: vec![SubfunctionAction::Store, SubfunctionAction::Close],
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StageConfig {
    pub can_edit: bool,
    pub default_prop_size: [f32; 2],
    /// Items present in storage at startup.
    pub storage: Vec<StageObjectData>,
}
impl Default for StageConfig {
    fn default() -> Self {
        Self {
            can_edit: true,
            default_prop_size: [64.0, 64.0],
            storage: vec![
                StageObjectData::new("Crate", StageObjectKind::Prop),
                StageObjectData::new("Spotlight", StageObjectKind::Effect),
                StageObjectData::new("Backdrop", StageObjectKind::Scenery),
            ],
        }
    }
}

/// One scripted press: down at `position` after `at_secs`, up `hold_secs` later.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScriptedPress {
    pub at_secs: f32,
    pub position: [f32; 2],
    pub hold_secs: f32,
}

/// Unattended runs. Presses are replayed as pointer input; with
/// `exit_after_secs > 0` the app exits once that time has passed and every
/// scripted press has been released.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SessionConfig {
    pub exit_after_secs: f32,
    pub presses: Vec<ScriptedPress>,
}

impl SessionConfig {
    pub fn is_scripted(&self) -> bool {
        self.exit_after_secs > 0.0 || !self.presses.is_empty()
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq, Default)]
#[serde(default)]
pub struct EditorConfig {
    pub window: WindowConfig,
    pub touch: TouchConfig,
    pub radial: RadialMenuConfig,
    pub stage: StageConfig,
    pub session: SessionConfig,
}

impl EditorConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        ron::from_str(&data).with_context(|| format!("parse RON {}", path.display()))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(format!("{e:#}"))),
        }
    }

    /// Loads every readable file in order and deep-merges them, later files
    /// overriding earlier ones field by field. Returns the config, the paths
    /// that contributed, and per-file errors (missing files included).
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        fn merge_value(base: &mut Value, overlay: Value) {
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let mut incoming = Some(v);
                        for (ek, ev) in bm.iter_mut() {
                            if *ek == k {
                                if let Some(val) = incoming.take() {
                                    merge_value(ev, val);
                                }
                                break;
                            }
                        }
                        if let Some(val) = incoming {
                            bm.insert(k, val);
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        if let Some(cur) = &mut merged {
                            merge_value(cur, val);
                        } else {
                            merged = Some(val);
                        }
                        used.push(path_ref.display().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        let Some(val) = merged else {
            return (Self::default(), used, errors);
        };
        match val.into_rust::<EditorConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!("failed to deserialize merged config; using defaults: {e}"));
                (Self::default(), used, errors)
            }
        }
    }

    /// Non-fatal sanity warnings. An empty vector means nothing looked off.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.touch.activate_wait_secs < 0.0 {
            w.push(format!(
                "touch.activate_wait_secs {} negative -> clamped to 0",
                self.touch.activate_wait_secs
            ));
        } else if self.touch.activate_wait_secs == 0.0 {
            w.push("touch.activate_wait_secs is 0; props activate on the first frame they are held".into());
        }
        if self.touch.button_activate_secs < 0.0 {
            w.push(format!(
                "touch.button_activate_secs {} negative -> clamped to 0",
                self.touch.button_activate_secs
            ));
        }
        if self.touch.button_activate_secs > self.touch.activate_wait_secs {
            w.push(format!(
                "touch.button_activate_secs {} longer than activate_wait_secs {}; menu buttons will feel sluggish",
                self.touch.button_activate_secs, self.touch.activate_wait_secs
            ));
        }
        if self.radial.actions.is_empty() {
            w.push("radial.actions is empty; long-pressing a prop opens nothing".into());
        }
        if self.radial.button_half_extent <= 0.0 {
            w.push("radial.button_half_extent must be > 0".into());
        }
        if self.radial.button_separate_radius < self.radial.button_half_extent * 2.0
            && self.radial.actions.len() > 1
        {
            w.push(format!(
                "radial.button_separate_radius {} small for button size {}; buttons will overlap",
                self.radial.button_separate_radius, self.radial.button_half_extent
            ));
        }
        let [sx, sy] = self.stage.default_prop_size;
        if sx <= 0.0 || sy <= 0.0 {
            w.push("stage.default_prop_size components must be > 0".into());
        }
        for (i, item) in self.stage.storage.iter().enumerate() {
            if item.name.trim().is_empty() {
                w.push(format!("stage.storage[{i}] has an empty name"));
            }
            if let Some([x, y]) = item.size {
                if x <= 0.0 || y <= 0.0 {
                    w.push(format!("stage.storage[{i}] ({}) size must be > 0", item.name));
                }
            }
        }
        if self.session.exit_after_secs < 0.0 {
            w.push(format!(
                "session.exit_after_secs {} negative -> never exits on its own",
                self.session.exit_after_secs
            ));
        }
        for (i, press) in self.session.presses.iter().enumerate() {
            if press.at_secs < 0.0 || press.hold_secs < 0.0 {
                w.push(format!("session.presses[{i}] has negative timing -> clamped to 0"));
            }
        }
        w
    }
}
