use bevy::prelude::*;
use hold_activation::HoldActivation;
use std::time::Duration;

use crate::core::system::system_order::TouchSet;
use crate::interaction::input::pointer::{collect_pointer_input, PointerSignal};

/// Hold-to-activate interaction attached to an entity.
#[derive(Component, Debug)]
pub struct Touchable {
    hold: HoldActivation,
    last_pointer: Option<Vec2>,
}

impl Touchable {
    pub fn new(activation_threshold: Duration) -> Self {
        Self { hold: HoldActivation::new(activation_threshold), last_pointer: None }
    }
    pub fn hold(&self) -> &HoldActivation { &self.hold }
    pub fn hold_mut(&mut self) -> &mut HoldActivation { &mut self.hold }
    /// World position of the down that started the current (or last) engagement.
    pub fn last_pointer(&self) -> Option<Vec2> { self.last_pointer }
    pub fn is_enabled(&self) -> bool { self.hold.is_enabled() }
    pub fn set_enabled(&mut self, enabled: bool) -> bool { self.hold.set_enabled(enabled) }
}

/// Axis-aligned hit box centred on the entity translation.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct TouchArea {
    pub half_extents: Vec2,
}

impl TouchArea {
    pub fn square(half_extent: f32) -> Self {
        Self { half_extents: Vec2::splat(half_extent) }
    }
    #[inline]
    pub fn contains(&self, center: Vec2, point: Vec2) -> bool {
        let d = (point - center).abs();
        d.x <= self.half_extents.x && d.y <= self.half_extents.y
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TouchDown {
    pub entity: Entity,
    pub position: Vec2,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TouchUp {
    pub entity: Entity,
    pub was_activated: bool,
}

/// Down and up edges in the order dispatch applied them. `TouchDown` and
/// `TouchUp` are separate streams, so readers that care about interleaving
/// within a frame (press, release, press again) read this instead.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEdge {
    Down(Entity),
    Up(Entity),
}

/// Sustained hold crossed the entity's threshold. Sent at most once per engagement.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TouchActivated {
    pub entity: Entity,
    pub position: Vec2,
}

pub struct TouchablePlugin;

impl Plugin for TouchablePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PointerSignal>()
            .add_event::<TouchDown>()
            .add_event::<TouchUp>()
            .add_event::<TouchEdge>()
            .add_event::<TouchActivated>()
            .configure_sets(
                Update,
                (TouchSet::Collect, TouchSet::Dispatch, TouchSet::Tick, TouchSet::React).chain(),
            )
            .add_systems(
                Update,
                (
                    collect_pointer_input.in_set(TouchSet::Collect),
                    dispatch_pointer_signals.in_set(TouchSet::Dispatch),
                    tick_touchables.in_set(TouchSet::Tick),
                ),
            );
    }
}

/// Down goes to the topmost enabled touchable under the pointer; up goes to
/// every engaged touchable, wherever the pointer is by then.
pub fn dispatch_pointer_signals(
    mut signals: EventReader<PointerSignal>,
    mut q: Query<(Entity, &Transform, &TouchArea, &mut Touchable)>,
    mut downs: EventWriter<TouchDown>,
    mut ups: EventWriter<TouchUp>,
    mut edges: EventWriter<TouchEdge>,
) {
    for signal in signals.read() {
        match *signal {
            PointerSignal::Down { position } => {
                let target = q
                    .iter()
                    .filter(|(_, tf, area, t)| {
                        t.is_enabled() && area.contains(tf.translation.truncate(), position)
                    })
                    .max_by(|a, b| a.1.translation.z.total_cmp(&b.1.translation.z))
                    .map(|(e, ..)| e);
                let Some(entity) = target else {
                    trace!(target: "touch", "down at {position} hit nothing");
                    continue;
                };
                let Ok((_, _, _, mut touchable)) = q.get_mut(entity) else { continue; };
                if touchable.hold.on_pointer_down() {
                    touchable.last_pointer = Some(position);
                    debug!(target: "touch", "down {entity} at {position}");
                    downs.write(TouchDown { entity, position });
                    edges.write(TouchEdge::Down(entity));
                }
            }
            PointerSignal::Up => {
                for (entity, _, _, mut touchable) in q.iter_mut() {
                    if !touchable.hold.is_pointer_engaged() {
                        continue;
                    }
                    let was_activated = touchable.hold.is_activated();
                    if touchable.hold.on_pointer_up() {
                        debug!(target: "touch", "up {entity} (activated={was_activated})");
                        ups.write(TouchUp { entity, was_activated });
                        edges.write(TouchEdge::Up(entity));
                    }
                }
            }
        }
    }
}

pub fn tick_touchables(
    time: Res<Time>,
    mut q: Query<(Entity, &Transform, &mut Touchable)>,
    mut activated: EventWriter<TouchActivated>,
) {
    let dt = time.delta();
    for (entity, tf, mut touchable) in q.iter_mut() {
        if !touchable.hold.is_pointer_engaged() {
            continue;
        }
        if touchable.hold.tick(dt) {
            let position = touchable.last_pointer.unwrap_or_else(|| tf.translation.truncate());
            info!(target: "touch", "activated {entity}");
            activated.write(TouchActivated { entity, position });
        }
    }
}
