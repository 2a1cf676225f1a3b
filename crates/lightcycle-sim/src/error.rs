use lightcycle_core::player::PlayerId;

use crate::mode::{GameMode, ModeAction};

/// Errors surfaced by the simulation. All of them are recoverable: the
/// offending call is a no-op and the simulation state stays consistent.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A grid cell outside `[0, size)` was addressed.
    OutOfRange { x: i32, y: i32 },
    UnknownPlayer(PlayerId),
    /// The player has crashed or left play and cannot steer.
    NotAlive(PlayerId),
    /// The player's trail has no room for another segment.
    TrailFull { player: PlayerId, capacity: usize },
    InvalidConfig(String),
    InvalidTransition { from: GameMode, action: ModeAction },
    /// Steering outside of play.
    NotPlaying(GameMode),
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { x, y } => write!(f, "cell ({x}, {y}) is outside the arena"),
            Self::UnknownPlayer(p) => write!(f, "no player in slot {p}"),
            Self::NotAlive(p) => write!(f, "player {p} is not alive"),
            Self::TrailFull { player, capacity } => {
                write!(f, "trail of player {player} is full ({capacity} segments)")
            },
            Self::InvalidConfig(m) => write!(f, "invalid arena config: {m}"),
            Self::InvalidTransition { from, action } => {
                write!(f, "cannot {action:?} while in {from:?}")
            },
            Self::NotPlaying(mode) => write!(f, "cannot steer while in {mode:?}"),
        }
    }
}

impl std::error::Error for SimError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_cell() {
        let e = SimError::OutOfRange { x: -1, y: 200 };
        assert_eq!(e.to_string(), "cell (-1, 200) is outside the arena");
    }

    #[test]
    fn display_names_the_transition() {
        let e = SimError::InvalidTransition {
            from: GameMode::Menu,
            action: ModeAction::Pause,
        };
        assert_eq!(e.to_string(), "cannot Pause while in Menu");
    }
}
