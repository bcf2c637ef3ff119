// This file is part of Stage Editor.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use anyhow::{bail, Result};
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;

use stage_editor::interaction::session::config_hot_reload::{ConfigHotReloadPlugin, ConfigReloadSettings};
use stage_editor::interaction::session::smoke_run::SmokeRunPlugin;
use stage_editor::stage::visuals::StageVisualsPlugin;
use stage_editor::stage::{PropStorage, StageCommand};
use stage_editor::{EditorConfig, StageEditorPlugin};

#[derive(Parser, Debug)]
#[command(author, version, about = "Hold-to-edit stage editor", long_about = None)]
struct Args {
    /// Config files, layered in order (later files override earlier ones).
    #[arg(long = "config", default_value = "assets/config/stage_editor.ron")]
    configs: Vec<PathBuf>,
    /// Load and validate the config, print findings, then exit.
    #[arg(long)]
    check: bool,
}

/// Load results kept until logging is up.
#[derive(Resource, Debug, Default)]
struct ConfigReport {
    used: Vec<String>,
    errors: Vec<String>,
    warnings: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (cfg, used, errors) = EditorConfig::load_layered(&args.configs);
    let warnings = cfg.validate();

    if args.check {
        for u in &used {
            println!("loaded {u}");
        }
        for e in &errors {
            eprintln!("error: {e}");
        }
        for w in &warnings {
            eprintln!("warning: {w}");
        }
        if used.is_empty() {
            bail!("no config file could be loaded");
        }
        if !errors.is_empty() {
            bail!("{} config layer(s) failed to load", errors.len());
        }
        return Ok(());
    }

    let exit = App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: cfg.window.title.clone(),
                        resolution: (cfg.window.width, cfg.window.height).into(),
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: "info,wgpu=error,naga=warn,stage_editor=debug".into(),
                    ..default()
                }),
        )
        .insert_resource(cfg)
        .insert_resource(ConfigReport { used, errors, warnings })
        .insert_resource(ConfigReloadSettings::new(args.configs))
        .add_plugins((StageEditorPlugin, StageVisualsPlugin, ConfigHotReloadPlugin, SmokeRunPlugin))
        .add_systems(Startup, (report_config, setup_scene))
        .run();

    match exit {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => bail!("app exited with code {code}"),
    }
}

fn report_config(report: Res<ConfigReport>) {
    if report.used.is_empty() {
        warn!("no config file loaded; running on defaults");
    } else {
        info!("config loaded from {}", report.used.join(", "));
    }
    for e in &report.errors {
        error!("CONFIG ERROR: {e}");
    }
    for w in &report.warnings {
        warn!("CONFIG WARNING: {w}");
    }
}

/// Camera plus the first couple of storage items on stage, so there is
/// something to long-press.
fn setup_scene(mut commands: Commands, storage: Res<PropStorage>, mut cmds: EventWriter<StageCommand>) {
    commands.spawn(Camera2d);
    let spots = [Vec2::new(-220.0, 0.0), Vec2::new(0.0, 40.0), Vec2::new(220.0, 0.0)];
    for position in spots.into_iter().take(storage.len()) {
        // Each placement removes index 0, so the next item shifts into it.
        cmds.write(StageCommand::PlaceFromStorage { index: 0, position });
    }
}
