use serde::{Deserialize, Serialize};

use crate::player::PlayerId;

/// Events emitted by the simulation during a tick, consumed by render/audio
/// collaborators and the headless runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A cycle hit an occupied cell; `x`/`y` is the clamped collision cell.
    CycleCrashed { player: PlayerId, x: i32, y: i32 },
    /// A crashed cycle finished exploding and left play.
    CycleGone { player: PlayerId },
    /// A survivor was credited for outliving a crashed opponent.
    ScoreUpdate { player: PlayerId, score: u32 },
    /// At most one cycle is left; `winner` is `None` on a draw.
    RoundComplete { winner: Option<PlayerId> },
}

impl GameEvent {
    pub fn is_round_complete(&self) -> bool {
        matches!(self, GameEvent::RoundComplete { .. })
    }
}
