//! Read-only lookahead queries over the collision grid, used by AI pilots.
//! Nothing here mutates the simulation; decisions go back through
//! [`SimulationState::turn`].

use lightcycle_core::player::PlayerId;

use crate::{Direction, SimulationState};

impl SimulationState {
    /// Number of consecutive free cells ahead of cell `(x, y)` along
    /// `direction`, not counting the start cell, capped at `limit`.
    pub fn free_distance_from(&self, x: i32, y: i32, direction: Direction, limit: i32) -> i32 {
        let (dx, dy) = direction.step();
        let mut free = 0;
        while free < limit {
            let next = (x + dx * (free + 1), y + dy * (free + 1));
            if self.grid().is_blocked(next.0, next.1) {
                break;
            }
            free += 1;
        }
        free
    }

    /// Free cells ahead of `player`'s current cell along `direction`.
    /// Zero for unknown players.
    pub fn free_distance(&self, player: PlayerId, direction: Direction, limit: i32) -> i32 {
        match self.cycle(player) {
            Some(cycle) => {
                let (x, y) = cycle.cell();
                self.free_distance_from(x, y, direction, limit)
            },
            None => 0,
        }
    }

    /// Whether `player` can keep going along `direction` for at least the
    /// configured freeway distance without hitting anything.
    pub fn is_freeway(&self, player: PlayerId, direction: Direction) -> bool {
        let needed = self.config().ai.freeway_cells;
        self.free_distance(player, direction, needed) >= needed
    }

    /// The cell `distance` cells ahead of `player` along its heading. May
    /// lie outside the arena; callers test it against the grid.
    pub fn project_point(&self, player: PlayerId, distance: i32) -> Option<(i32, i32)> {
        let cycle = self.cycle(player)?;
        let (x, y) = cycle.cell();
        let (dx, dy) = cycle.direction.step();
        Some((x + dx * distance, y + dy * distance))
    }
}
