// This file is part of Stage Editor.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;

use crate::core::config::EditorConfig;
use crate::interaction::touchable::TouchablePlugin;
use crate::stage::StagePlugin;

/// Everything needed for hold-to-edit stage interaction, minus rendering.
///
/// Reads [`EditorConfig`] if one was inserted before the plugin is added and
/// falls back to defaults otherwise.
pub struct StageEditorPlugin;

impl Plugin for StageEditorPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<EditorConfig>() {
            app.insert_resource(EditorConfig::default());
        }
        app.add_plugins((TouchablePlugin, StagePlugin));
    }
}
