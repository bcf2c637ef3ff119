use bevy::prelude::*;

use crate::interaction::touchable::{TouchArea, Touchable};
use crate::stage::data::{StageObject, StageObjectKind};
use crate::stage::editing::SubfunctionButton;

/// Sprites and labels for stage objects and menu buttons. Purely cosmetic;
/// headless apps and tests leave it out.
pub struct StageVisualsPlugin;

impl Plugin for StageVisualsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (attach_object_sprites, attach_button_sprites, press_hint));
    }
}

fn kind_color(kind: StageObjectKind) -> Color {
    match kind {
        StageObjectKind::Prop => Color::srgb(0.85, 0.62, 0.32),
        StageObjectKind::Actor => Color::srgb(0.35, 0.7, 0.45),
        StageObjectKind::Orchestra => Color::srgb(0.6, 0.4, 0.85),
        StageObjectKind::Effect => Color::srgb(0.95, 0.9, 0.35),
        StageObjectKind::Scenery => Color::srgb(0.35, 0.5, 0.8),
    }
}

fn label(parent: &mut EntityCommands, text: String, size: f32) {
    parent.with_children(|p| {
        p.spawn((
            Text2d::new(text),
            TextFont { font_size: size, ..default() },
            TextColor(Color::BLACK),
            Transform::from_xyz(0.0, 0.0, 0.1),
        ));
    });
}

fn attach_object_sprites(
    mut commands: Commands,
    q: Query<(Entity, &StageObject, &TouchArea), Added<StageObject>>,
) {
    for (entity, object, area) in &q {
        let mut ec = commands.entity(entity);
        ec.insert(Sprite::from_color(kind_color(object.data.kind), area.half_extents * 2.0));
        label(&mut ec, object.data.name.clone(), 14.0);
    }
}

fn attach_button_sprites(
    mut commands: Commands,
    q: Query<(Entity, &SubfunctionButton, &TouchArea), Added<SubfunctionButton>>,
) {
    for (entity, button, area) in &q {
        let mut ec = commands.entity(entity);
        ec.insert(Sprite::from_color(Color::srgb(0.92, 0.92, 0.92), area.half_extents * 2.0));
        label(&mut ec, button.action.label().to_string(), 12.0);
    }
}

/// Slight scale-up while held, as a hint that holding does something.
/// Follows engagement state rather than up events, since a press cancelled by
/// disabling never reports an up.
fn press_hint(mut q: Query<(&mut Transform, &Touchable), Changed<Touchable>>) {
    for (mut tf, touchable) in &mut q {
        let scale = if touchable.hold().is_pointer_engaged() { PRESS_SCALE } else { 1.0 };
        if tf.scale.x != scale {
            tf.scale = Vec3::splat(scale);
        }
    }
}

const PRESS_SCALE: f32 = 1.08;
