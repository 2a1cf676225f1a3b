use lightcycle_core::events::GameEvent;
use lightcycle_core::player::PlayerId;

use crate::CycleState;

/// Points a survivor earns each time an opponent crashes.
pub const SURVIVAL_POINTS: u32 = 1;

/// Credit every alive cycle other than `crashed` for outliving it.
pub fn award_survivors(cycles: &mut [CycleState], crashed: PlayerId, events: &mut Vec<GameEvent>) {
    for (player, cycle) in cycles.iter_mut().enumerate() {
        if player != crashed && cycle.is_alive() {
            cycle.score += SURVIVAL_POINTS;
            events.push(GameEvent::ScoreUpdate {
                player,
                score: cycle.score,
            });
        }
    }
}
