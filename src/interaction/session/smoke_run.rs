use bevy::prelude::*;
use std::time::Duration;

use crate::core::config::{EditorConfig, SessionConfig};
use crate::core::system::system_order::TouchSet;
use crate::interaction::input::pointer::PointerSignal;
use crate::stage::{EditMenuEvent, StageObjectPlaced, StageObjectStored};

/// Counts of what happened on stage during a scripted run, logged on exit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunTally {
    pub placed: usize,
    pub stored: usize,
    pub menus_opened: usize,
}

/// Scripted pointer timeline plus the exit deadline.
#[derive(Resource, Debug)]
pub struct SmokeRun {
    timeline: Vec<(Duration, PointerSignal)>,
    next: usize,
    elapsed: Duration,
    exit_at: Option<Duration>,
    finished: bool,
    tally: RunTally,
}

fn secs(s: f32) -> Duration {
    Duration::try_from_secs_f32(s.max(0.0)).unwrap_or(Duration::MAX)
}

impl SmokeRun {
    pub fn from_config(session: &SessionConfig) -> Self {
        let mut timeline = Vec::with_capacity(session.presses.len() * 2);
        for press in &session.presses {
            let down_at = secs(press.at_secs);
            let position = Vec2::from(press.position);
            timeline.push((down_at, PointerSignal::Down { position }));
            timeline.push((down_at.saturating_add(secs(press.hold_secs)), PointerSignal::Up));
        }
        // Stable, so a press and its zero-length release keep their order.
        timeline.sort_by_key(|(at, _)| *at);
        let last_edge = timeline.last().map_or(Duration::ZERO, |(at, _)| *at);
        let exit_at = (session.exit_after_secs > 0.0).then(|| secs(session.exit_after_secs).max(last_edge));
        Self { timeline, next: 0, elapsed: Duration::ZERO, exit_at, finished: false, tally: RunTally::default() }
    }

    pub fn tally(&self) -> RunTally { self.tally }
    pub fn exit_at(&self) -> Option<Duration> { self.exit_at }
    pub fn remaining_edges(&self) -> usize { self.timeline.len() - self.next }
}

/// Replays `session.presses` as pointer input and exits once
/// `session.exit_after_secs` has passed and the script is done. Does nothing
/// unless the session is scripted.
pub struct SmokeRunPlugin;

impl Plugin for SmokeRunPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_smoke_run)
            .add_systems(Update, replay_scripted_presses.in_set(TouchSet::Collect))
            .add_systems(Update, (tally_stage_events, finish_smoke_run).chain().after(TouchSet::React));
    }
}

fn setup_smoke_run(mut commands: Commands, cfg: Res<EditorConfig>) {
    if !cfg.session.is_scripted() {
        return;
    }
    let run = SmokeRun::from_config(&cfg.session);
    info!(
        presses = cfg.session.presses.len(),
        exit_at = ?run.exit_at,
        "SmokeRun: scripted session armed"
    );
    commands.insert_resource(run);
}

fn replay_scripted_presses(
    time: Res<Time>,
    run: Option<ResMut<SmokeRun>>,
    mut signals: EventWriter<PointerSignal>,
) {
    let Some(mut run) = run else { return; };
    run.elapsed = run.elapsed.saturating_add(time.delta());
    while let Some(&(at, signal)) = run.timeline.get(run.next) {
        if at > run.elapsed {
            break;
        }
        debug!(target: "session", "scripted {signal:?} at {at:?}");
        signals.write(signal);
        run.next += 1;
    }
}

fn tally_stage_events(
    run: Option<ResMut<SmokeRun>>,
    mut placed: EventReader<StageObjectPlaced>,
    mut stored: EventReader<StageObjectStored>,
    mut menus: EventReader<EditMenuEvent>,
) {
    let Some(mut run) = run else { return; };
    run.tally.placed += placed.read().count();
    run.tally.stored += stored.read().count();
    run.tally.menus_opened += menus.read().filter(|e| matches!(e, EditMenuEvent::Opened { .. })).count();
}

fn finish_smoke_run(run: Option<ResMut<SmokeRun>>, mut ev_exit: EventWriter<AppExit>) {
    let Some(mut run) = run else { return; };
    let Some(exit_at) = run.exit_at else { return; };
    if run.finished || run.elapsed < exit_at || run.remaining_edges() > 0 {
        return;
    }
    run.finished = true;
    let t = run.tally;
    info!(
        placed = t.placed,
        stored = t.stored,
        menus_opened = t.menus_opened,
        "SmokeRun: script complete, requesting app exit"
    );
    ev_exit.write(AppExit::Success);
}
