use bevy::prelude::*;
use hold_activation::ExclusiveGroup;
use serde::Deserialize;
use std::str::FromStr;

use crate::core::config::EditorConfig;
use crate::core::layer::LayerZ;
use crate::core::system::system_order::TouchSet;
use crate::interaction::touchable::{TouchActivated, TouchArea, TouchEdge, Touchable};
use crate::stage::data::{PropStorage, StageObject, StageObjectData};
use crate::stage::radial::radial_layout;

/// What a radial menu button does to the object being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum SubfunctionAction {
    /// Take the object off stage and put its data back in storage.
    Store,
    /// Dismiss the menu.
    Close,
}

impl SubfunctionAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Store => "Store",
            Self::Close => "Close",
        }
    }
}

impl FromStr for SubfunctionAction {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "store" => Ok(Self::Store),
            "close" => Ok(Self::Close),
            _ => Err(format!("unknown sub-function action '{s}'")),
        }
    }
}

impl TryFrom<String> for SubfunctionAction {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct SubfunctionButton {
    pub action: SubfunctionAction,
    pub slot: usize,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub enum StageCommand {
    Place { data: StageObjectData, position: Vec2 },
    /// Removes the storage item at `index` and places it.
    PlaceFromStorage { index: usize, position: Vec2 },
    PutToStorage { entity: Entity },
    SetEditPermission { can_edit: bool },
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct StageObjectPlaced {
    pub entity: Entity,
    pub data: StageObjectData,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct StageObjectStored {
    pub entity: Entity,
    pub data: StageObjectData,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum EditMenuEvent {
    Opened { target: Entity, center: Vec2 },
    Closed,
}

/// Stage bookkeeping: what is placed, whether editing is allowed, and the
/// radial menu (its buttons and the object it currently targets).
#[derive(Resource, Debug, Default)]
pub struct StageEditing {
    placed: Vec<Entity>,
    can_edit: bool,
    buttons: ExclusiveGroup<Entity>,
    target: Option<Entity>,
}

impl StageEditing {
    pub fn new(can_edit: bool) -> Self {
        Self { can_edit, ..default() }
    }
    pub fn placed(&self) -> &[Entity] { &self.placed }
    pub fn is_placed(&self, entity: Entity) -> bool { self.placed.contains(&entity) }
    pub fn can_edit(&self) -> bool { self.can_edit }
    pub fn buttons(&self) -> &[Entity] { self.buttons.members() }
    /// Button currently pressed inside the open menu, if any.
    pub fn pressed_button(&self) -> Option<Entity> { self.buttons.holder() }
    pub fn target(&self) -> Option<Entity> { self.target }
    pub fn is_menu_open(&self) -> bool { self.target.is_some() }
}

type ButtonGate<'w, 's> =
    Query<'w, 's, (&'static mut Touchable, &'static mut Visibility), With<SubfunctionButton>>;

pub struct StagePlugin;

impl Plugin for StagePlugin {
    fn build(&self, app: &mut App) {
        let cfg = app.world().get_resource::<EditorConfig>().cloned().unwrap_or_default();
        app.insert_resource(StageEditing::new(cfg.stage.can_edit))
            .insert_resource(PropStorage::from_items(cfg.stage.storage.iter().cloned()))
            .add_event::<StageCommand>()
            .add_event::<StageObjectPlaced>()
            .add_event::<StageObjectStored>()
            .add_event::<EditMenuEvent>()
            .add_systems(Startup, spawn_subfunction_buttons)
            .add_systems(
                Update,
                (gate_menu_buttons, open_edit_menu, run_subfunction_actions, apply_stage_commands)
                    .chain()
                    .in_set(TouchSet::React),
            );
    }
}

pub fn spawn_stage_object(
    commands: &mut Commands,
    cfg: &EditorConfig,
    data: StageObjectData,
    position: Vec2,
) -> Entity {
    let half_extents = data.half_extents(cfg.stage.default_prop_size);
    commands
        .spawn((
            Name::new(data.name.clone()),
            StageObject { data },
            Touchable::new(cfg.touch.prop_threshold()),
            TouchArea { half_extents },
            Transform::from_xyz(position.x, position.y, LayerZ::StageCenter.z()),
            Visibility::default(),
        ))
        .id()
}

fn spawn_subfunction_buttons(
    mut commands: Commands,
    cfg: Res<EditorConfig>,
    mut editing: ResMut<StageEditing>,
) {
    for (slot, action) in cfg.radial.actions.iter().copied().enumerate() {
        let mut touchable = Touchable::new(cfg.touch.button_threshold());
        touchable.set_enabled(false);
        let entity = commands
            .spawn((
                Name::new(format!("{} button", action.label())),
                SubfunctionButton { action, slot },
                touchable,
                TouchArea::square(cfg.radial.button_half_extent),
                Transform::from_xyz(0.0, 0.0, LayerZ::Foreground.z() + 0.5),
                Visibility::Hidden,
            ))
            .id();
        editing.buttons.insert(entity);
    }
    debug!(target: "stage", "spawned {} sub-function buttons", editing.buttons.len());
}

fn close_menu(editing: &mut StageEditing, buttons: &mut ButtonGate<'_, '_>, menu_ev: &mut EventWriter<EditMenuEvent>) {
    if editing.target.take().is_none() {
        return;
    }
    editing.buttons.reset(|_, _| {});
    for (mut touchable, mut visibility) in buttons.iter_mut() {
        touchable.set_enabled(false);
        *visibility = Visibility::Hidden;
    }
    debug!(target: "stage", "edit menu closed");
    menu_ev.write(EditMenuEvent::Closed);
}

/// Pressing one menu button locks out its siblings until it is released.
///
/// Dispatch has already applied every edge of the frame by the time this
/// runs, so the edges are replayed against the group with a no-op gate and
/// only the outcome is pushed to the buttons. Gating eagerly would cancel a
/// press that landed after an earlier press and release in the same frame.
fn gate_menu_buttons(
    mut edges: EventReader<TouchEdge>,
    mut editing: ResMut<StageEditing>,
    mut buttons: Query<&mut Touchable, With<SubfunctionButton>>,
) {
    let mut changed = false;
    for edge in edges.read() {
        changed |= match *edge {
            TouchEdge::Down(entity) => editing.buttons.claim(entity, |_, _| {}),
            TouchEdge::Up(entity) => editing.buttons.release(entity, |_, _| {}),
        };
    }
    if !changed || !editing.is_menu_open() {
        return;
    }
    editing.buttons.apply(|button, enabled| {
        if let Ok(mut t) = buttons.get_mut(button) {
            t.set_enabled(enabled);
        }
    });
}

fn open_edit_menu(
    mut activated: EventReader<TouchActivated>,
    cfg: Res<EditorConfig>,
    mut editing: ResMut<StageEditing>,
    objects: Query<(), (With<StageObject>, Without<SubfunctionButton>)>,
    mut buttons: Query<(&SubfunctionButton, &mut Touchable, &mut Transform, &mut Visibility)>,
    mut menu_ev: EventWriter<EditMenuEvent>,
) {
    for ev in activated.read() {
        if objects.get(ev.entity).is_err() {
            continue;
        }
        if !editing.can_edit {
            debug!(target: "stage", "edit permission off; ignoring long-press on {}", ev.entity);
            continue;
        }
        let positions = radial_layout(editing.buttons.len(), ev.position, cfg.radial.button_separate_radius);
        editing.buttons.reset(|_, _| {});
        for (button, mut touchable, mut tf, mut visibility) in buttons.iter_mut() {
            let Some(pos) = positions.get(button.slot) else { continue; };
            tf.translation = *pos;
            touchable.set_enabled(true);
            *visibility = Visibility::Visible;
        }
        editing.target = Some(ev.entity);
        info!(target: "stage", "edit menu opened for {} at {}", ev.entity, ev.position);
        menu_ev.write(EditMenuEvent::Opened { target: ev.entity, center: ev.position });
    }
}

fn run_subfunction_actions(
    mut activated: EventReader<TouchActivated>,
    mut editing: ResMut<StageEditing>,
    actions: Query<&SubfunctionButton>,
    mut buttons: ButtonGate<'_, '_>,
    mut stage_cmds: EventWriter<StageCommand>,
    mut menu_ev: EventWriter<EditMenuEvent>,
) {
    for ev in activated.read() {
        let Ok(button) = actions.get(ev.entity) else { continue; };
        let Some(target) = editing.target else {
            warn!(target: "stage", "{:?} activated with no edit target", button.action);
            continue;
        };
        match button.action {
            SubfunctionAction::Store => {
                stage_cmds.write(StageCommand::PutToStorage { entity: target });
            }
            SubfunctionAction::Close => {}
        }
        close_menu(&mut editing, &mut buttons, &mut menu_ev);
    }
}

fn apply_stage_commands(
    mut commands: Commands,
    mut stage_cmds: EventReader<StageCommand>,
    cfg: Res<EditorConfig>,
    mut editing: ResMut<StageEditing>,
    mut storage: ResMut<PropStorage>,
    objects: Query<&StageObject>,
    mut buttons: ButtonGate<'_, '_>,
    mut placed_ev: EventWriter<StageObjectPlaced>,
    mut stored_ev: EventWriter<StageObjectStored>,
    mut menu_ev: EventWriter<EditMenuEvent>,
) {
    for cmd in stage_cmds.read() {
        match cmd {
            StageCommand::Place { data, position } => {
                let entity = spawn_stage_object(&mut commands, &cfg, data.clone(), *position);
                editing.placed.push(entity);
                info!(target: "stage", "placed {:?} '{}' as {entity}", data.kind, data.name);
                placed_ev.write(StageObjectPlaced { entity, data: data.clone() });
            }
            StageCommand::PlaceFromStorage { index, position } => {
                let Some(data) = storage.take(*index) else {
                    warn!(target: "stage", "no storage item at index {index} ({} stored)", storage.len());
                    continue;
                };
                let entity = spawn_stage_object(&mut commands, &cfg, data.clone(), *position);
                editing.placed.push(entity);
                info!(target: "stage", "placed {:?} '{}' from storage as {entity}", data.kind, data.name);
                placed_ev.write(StageObjectPlaced { entity, data });
            }
            StageCommand::PutToStorage { entity } => {
                let entity = *entity;
                let Some(idx) = editing.placed.iter().position(|e| *e == entity) else {
                    warn!(target: "stage", "{entity} is not on stage; nothing to store");
                    continue;
                };
                let Ok(object) = objects.get(entity) else {
                    warn!(target: "stage", "{entity} has no stage data; put-to-storage dropped");
                    continue;
                };
                editing.placed.remove(idx);
                storage.add(object.data.clone());
                commands.entity(entity).despawn();
                if editing.target == Some(entity) {
                    close_menu(&mut editing, &mut buttons, &mut menu_ev);
                }
                info!(target: "stage", "stored '{}' ({} in storage)", object.data.name, storage.len());
                stored_ev.write(StageObjectStored { entity, data: object.data.clone() });
            }
            StageCommand::SetEditPermission { can_edit } => {
                editing.can_edit = *can_edit;
                if !*can_edit {
                    close_menu(&mut editing, &mut buttons, &mut menu_ev);
                }
                info!(target: "stage", "edit permission set to {can_edit}");
            }
        }
    }
}
