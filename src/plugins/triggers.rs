use crate::components::*;
use crate::events::*;
use crate::game_logic::animation::Pose;
use crate::game_logic::collision::CollisionRegistry;
use crate::game_logic::grid::GridCoord;
use crate::plugins::player::drive_player;
use crate::resources::GameState;
use bevy::prelude::*;

/// Payload that makes the player lie down when stepped on
pub const BED_PAYLOAD: &str = "bed";

/// How long a scripted beat keeps the player still
pub const SCRIPTED_PAUSE_SECS: f32 = 1.5;

pub struct TriggerPlugin;

impl Plugin for TriggerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScriptedPause>().add_systems(
            Update,
            (react_to_completed_moves, tick_scripted_pause)
                .chain()
                // Arrivals must be handled before the controller can start its next hop
                .after(drive_player)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// What arriving on a cell should set off
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriggerOutcome {
    pub lie_down: bool,
    /// Payload on the arrival cell, other than the bed, that starts a scripted beat
    pub scripted_beat: Option<String>,
    /// Interactables on or next to the arrival cell
    pub nearby: Vec<(GridCoord, String)>,
}

/// Decide what happens when the player lands on `cell`
pub fn evaluate_arrival(registry: &CollisionRegistry, cell: GridCoord) -> TriggerOutcome {
    let here = registry.occupant_at(cell).and_then(|o| o.payload());
    TriggerOutcome {
        lie_down: here == Some(BED_PAYLOAD),
        scripted_beat: here
            .filter(|payload| *payload != BED_PAYLOAD)
            .map(str::to_string),
        nearby: registry
            .interactables_near(cell)
            .into_iter()
            .map(|(c, payload)| (c, payload.to_string()))
            .collect(),
    }
}

fn react_to_completed_moves(
    mut completed: EventReader<MoveCompleted>,
    registry: Res<CollisionRegistry>,
    mut players: Query<&mut Player>,
    mut pause: ResMut<ScriptedPause>,
    mut interactions: EventWriter<InteractionAvailable>,
    mut locks: EventWriter<SetMovementLock>,
) {
    for arrival in completed.read() {
        let outcome = evaluate_arrival(&registry, arrival.cell);

        for (cell, payload) in outcome.nearby {
            debug!("Interaction '{payload}' available at {cell}");
            interactions.write(InteractionAvailable { cell, payload });
        }

        if outcome.lie_down {
            if let Ok(mut player) = players.single_mut() {
                info!("Lying down at {}", arrival.cell);
                player.mover.request_pose(Pose::Lying);
            }
        }

        if let Some(payload) = outcome.scripted_beat {
            info!("Scripted beat '{payload}' at {}", arrival.cell);
            locks.write(SetMovementLock { locked: true });
            pause.timer = Some(Timer::from_seconds(SCRIPTED_PAUSE_SECS, TimerMode::Once));
        }
    }
}

fn tick_scripted_pause(
    time: Res<Time>,
    mut pause: ResMut<ScriptedPause>,
    mut locks: EventWriter<SetMovementLock>,
) {
    let Some(timer) = pause.timer.as_mut() else {
        return;
    };
    if timer.tick(time.delta()).finished() {
        pause.timer = None;
        locks.write(SetMovementLock { locked: false });
    }
}
