use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Top-level state of an arena session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Menu,
    Playing,
    Paused,
    /// The round finished; waiting for play-again or menu.
    RoundOver,
}

/// A requested mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeAction {
    /// Fresh match: scores zeroed, new round.
    StartMatch,
    Pause,
    Resume,
    /// The simulation reported the round complete.
    FinishRound,
    /// Next round with scores kept.
    PlayAgain,
    ReturnToMenu,
}

impl GameMode {
    /// Whether the round controller should advance the simulation.
    pub fn is_ticking(self) -> bool {
        self == GameMode::Playing
    }

    /// The mode reached by applying `action`, or `InvalidTransition`.
    pub fn apply(self, action: ModeAction) -> Result<GameMode, SimError> {
        use GameMode::*;
        use ModeAction::*;

        let next = match (self, action) {
            (Menu | RoundOver, StartMatch) => Playing,
            (Playing, Pause) => Paused,
            (Paused, Resume) => Playing,
            (Playing, FinishRound) => RoundOver,
            (RoundOver, PlayAgain) => Playing,
            (Playing | Paused | RoundOver, ReturnToMenu) => Menu,
            (from, action) => return Err(SimError::InvalidTransition { from, action }),
        };
        Ok(next)
    }
}
