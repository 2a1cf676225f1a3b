use serde::{Deserialize, Serialize};

/// Slot index of a player in the arena (0-based, stable for a whole match).
pub type PlayerId = usize;

/// Who steers a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pilot {
    /// Steered by the input layer; only ever turns through `turn()`.
    Human,
    /// Steered by the AI once per frame.
    Computer,
}

impl Pilot {
    pub fn is_computer(self) -> bool {
        self == Pilot::Computer
    }
}

/// A participant in the arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    pub color: PlayerColor,
    pub pilot: Pilot,
}

impl Player {
    /// Build the player for slot `id` with the palette color for that slot.
    pub fn new(id: PlayerId, display_name: impl Into<String>, pilot: Pilot) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            color: PlayerColor::for_slot(id),
            pilot,
        }
    }
}

/// Cycle and trail color handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for PlayerColor {
    fn default() -> Self {
        Self::PALETTE[0]
    }
}

impl PlayerColor {
    /// One color per arena slot; slots beyond the palette wrap around.
    pub const PALETTE: &[PlayerColor] = &[
        PlayerColor {
            r: 255,
            g: 230,
            b: 26,
        }, // Yellow
        PlayerColor {
            r: 255,
            g: 51,
            b: 26,
        }, // Red
        PlayerColor {
            r: 26,
            g: 230,
            b: 77,
        }, // Green
        PlayerColor {
            r: 230,
            g: 230,
            b: 230,
        }, // White
    ];

    pub fn for_slot(slot: PlayerId) -> Self {
        Self::PALETTE[slot % Self::PALETTE.len()]
    }
}
