use bevy::prelude::*;
use std::{collections::HashMap, path::PathBuf, time::SystemTime};

use crate::core::config::EditorConfig;

/// Files polled for changes, in layering order.
#[derive(Resource, Debug, Clone)]
pub struct ConfigReloadSettings {
    pub paths: Vec<PathBuf>,
    pub interval_secs: f32,
}
impl Default for ConfigReloadSettings {
    fn default() -> Self {
        Self { paths: vec![PathBuf::from("assets/config/stage_editor.ron")], interval_secs: 0.5 }
    }
}
impl ConfigReloadSettings {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths, ..default() }
    }
}

#[derive(Resource, Debug)]
struct ConfigReloadState {
    last_mod: HashMap<PathBuf, SystemTime>,
    timer: Timer,
}
impl FromWorld for ConfigReloadState {
    fn from_world(world: &mut World) -> Self {
        let secs = world
            .get_resource::<ConfigReloadSettings>()
            .map_or(0.5, |s| s.interval_secs.max(0.05));
        Self { last_mod: HashMap::new(), timer: Timer::from_seconds(secs, TimerMode::Repeating) }
    }
}

/// Re-reads the layered config when any file's mtime moves forward.
///
/// Only affects what reads the config afterwards (placements, menu layout);
/// touchables already spawned keep the threshold they were built with.
pub struct ConfigHotReloadPlugin;
impl Plugin for ConfigHotReloadPlugin {
    fn build(&self, app: &mut App) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            app.init_resource::<ConfigReloadSettings>()
                .init_resource::<ConfigReloadState>()
                .add_systems(Startup, prime_modification_times)
                .add_systems(Update, poll_and_reload_config);
        }
    }
}

fn modified_paths(settings: &ConfigReloadSettings, state: &mut ConfigReloadState) -> bool {
    let mut dirty = false;
    for path in &settings.paths {
        let Ok(mod_time) = std::fs::metadata(path).and_then(|m| m.modified()) else { continue; };
        let entry = state.last_mod.entry(path.clone()).or_insert(SystemTime::UNIX_EPOCH);
        if mod_time > *entry {
            *entry = mod_time;
            dirty = true;
        }
    }
    dirty
}

fn prime_modification_times(settings: Res<ConfigReloadSettings>, mut state: ResMut<ConfigReloadState>) {
    modified_paths(&settings, &mut state);
}

fn poll_and_reload_config(
    time: Res<Time>,
    settings: Res<ConfigReloadSettings>,
    mut state: ResMut<ConfigReloadState>,
    mut cfg_res: ResMut<EditorConfig>,
    mut windows: Query<&mut Window>,
) {
    if !state.timer.tick(time.delta()).finished() {
        return;
    }
    if !modified_paths(&settings, &mut state) {
        return;
    }
    let (new_cfg, used, errors) = EditorConfig::load_layered(settings.paths.iter());
    for e in errors {
        warn!("CONFIG HOT-RELOAD issue: {e}");
    }
    if used.is_empty() {
        warn!("CONFIG HOT-RELOAD: no file readable, keeping current config");
        return;
    }
    for w in new_cfg.validate() {
        warn!("CONFIG HOT-RELOAD warning: {w}");
    }
    if *cfg_res == new_cfg {
        return;
    }
    info!("Config hot-reload applied");
    if let Ok(mut window) = windows.single_mut() {
        if window.width() != new_cfg.window.width || window.height() != new_cfg.window.height {
            window.resolution.set(new_cfg.window.width, new_cfg.window.height);
        }
        if window.title != new_cfg.window.title {
            window.title = new_cfg.window.title.clone();
        }
    }
    *cfg_res = new_cfg;
}
