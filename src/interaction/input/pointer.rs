use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use smallvec::SmallVec;

/// Raw pointer edge in world space, the only input touchables consume.
/// Produced from mouse / touch by [`collect_pointer_input`]; anything else
/// (tests, replays, remote input) can write these directly.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PointerSignal {
    Down { position: Vec2 },
    Up,
}

fn cursor_world_pos(camera_q: &Query<(&Camera, &GlobalTransform)>, screen_pos: Vec2) -> Option<Vec2> {
    let (camera, cam_tf) = camera_q.iter().next()?;
    camera.viewport_to_world_2d(cam_tf, screen_pos).ok()
}

fn primary_pointer_world_pos(
    window: &Window,
    touches: Option<&Touches>,
    camera_q: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    if let Some(touch) = touches.and_then(|t| t.iter().next()) {
        return cursor_world_pos(camera_q, touch.position());
    }
    let cursor = window.cursor_position()?;
    cursor_world_pos(camera_q, cursor)
}

/// Orders one frame's pointer edges. When a press and a release land in the
/// same frame, `held_now` says which came last: still held means the frame
/// ended on a fresh press (up, then down), otherwise it was a tap (down, then
/// up). A press with no world position is dropped; the release never is.
pub fn frame_edges(
    pressed: bool,
    released: bool,
    held_now: bool,
    down_at: impl FnOnce() -> Option<Vec2>,
) -> SmallVec<[PointerSignal; 2]> {
    let mut edges = SmallVec::new();
    let down = if pressed {
        let position = down_at();
        if position.is_none() {
            debug!(target: "pointer", "pointer pressed outside any camera viewport");
        }
        position.map(|position| PointerSignal::Down { position })
    } else {
        None
    };
    let repressed = released && held_now;
    if repressed {
        edges.push(PointerSignal::Up);
    }
    edges.extend(down);
    if released && !repressed {
        edges.push(PointerSignal::Up);
    }
    edges
}

/// Left mouse button and the first touch both count as "the pointer".
/// Input resources are optional so headless apps can run without `InputPlugin`.
pub fn collect_pointer_input(
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    touches: Option<Res<Touches>>,
    windows_q: Query<&Window, With<PrimaryWindow>>,
    camera_q: Query<(&Camera, &GlobalTransform)>,
    mut signals: EventWriter<PointerSignal>,
) {
    let buttons = buttons.as_deref();
    let touches = touches.as_deref();
    let pressed = buttons.is_some_and(|b| b.just_pressed(MouseButton::Left))
        || touches.is_some_and(|t| t.iter_just_pressed().next().is_some());
    let released = buttons.is_some_and(|b| b.just_released(MouseButton::Left))
        || touches.is_some_and(|t| t.iter_just_released().next().is_some());
    if !pressed && !released {
        return;
    }
    let held_now = buttons.is_some_and(|b| b.pressed(MouseButton::Left))
        || touches.is_some_and(|t| t.iter().next().is_some());
    let edges = frame_edges(pressed, released, held_now, || {
        touches
            .and_then(|t| t.iter_just_pressed().next())
            .and_then(|touch| cursor_world_pos(&camera_q, touch.position()))
            .or_else(|| {
                let window = windows_q.single().ok()?;
                primary_pointer_world_pos(window, touches, &camera_q)
            })
    });
    for edge in edges {
        trace!(target: "pointer", "{edge:?}");
        signals.write(edge);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_frame_tap_is_down_then_up() {
        let at = Vec2::new(3.0, 4.0);
        let edges = frame_edges(true, true, false, || Some(at));
        assert_eq!(edges.as_slice(), [PointerSignal::Down { position: at }, PointerSignal::Up]);
    }

    #[test]
    fn release_then_repress_is_up_then_down() {
        let at = Vec2::new(-1.0, 0.5);
        let edges = frame_edges(true, true, true, || Some(at));
        assert_eq!(edges.as_slice(), [PointerSignal::Up, PointerSignal::Down { position: at }]);
    }

    #[test]
    fn unprojectable_press_keeps_the_release() {
        let edges = frame_edges(true, true, false, || None);
        assert_eq!(edges.as_slice(), [PointerSignal::Up]);
    }

    fn drain(app: &mut App) -> Vec<PointerSignal> {
        app.world_mut().resource_mut::<Events<PointerSignal>>().drain().collect()
    }

    #[test]
    fn release_survives_missing_primary_window() {
        let mut app = App::new();
        app.add_event::<PointerSignal>().add_systems(Update, collect_pointer_input);
        let mut mouse = ButtonInput::<MouseButton>::default();
        mouse.press(MouseButton::Left);
        mouse.release(MouseButton::Left);
        app.insert_resource(mouse);
        app.update();
        assert_eq!(drain(&mut app), vec![PointerSignal::Up]);
    }

    #[test]
    fn headless_app_without_input_resources_stays_quiet() {
        let mut app = App::new();
        app.add_event::<PointerSignal>().add_systems(Update, collect_pointer_input);
        app.world_mut().spawn((Window::default(), PrimaryWindow));
        app.update();
        assert!(drain(&mut app).is_empty());
    }
}
