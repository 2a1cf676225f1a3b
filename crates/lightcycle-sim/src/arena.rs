use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Direction;

/// How spawned cycles are oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpawnFacing {
    /// Each cycle gets a random compass direction.
    Random,
    /// Each cycle faces the arena centre.
    Inward,
}

/// A spawn position with starting direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
    pub direction: Direction,
}

/// Place `player_count` cycles symmetrically on a circle around the arena
/// centre: player `i` sits at angle `i * 2π / player_count`.
pub fn spawn_points(
    grid_size: u32,
    player_count: usize,
    radius_fraction: f32,
    facing: SpawnFacing,
    rng: &mut impl Rng,
) -> Vec<SpawnPoint> {
    let size = grid_size as f32;
    let center = size / 2.0;
    let radius = size * radius_fraction;

    (0..player_count)
        .map(|i| {
            let angle = std::f32::consts::TAU * (i as f32) / (player_count.max(1) as f32);
            let x = center + radius * angle.cos();
            let y = center + radius * angle.sin();
            let direction = match facing {
                SpawnFacing::Random => Direction::from_index(rng.random_range(0..4)),
                SpawnFacing::Inward => inward(center - x, center - y),
            };
            SpawnPoint { x, y, direction }
        })
        .collect()
}

fn inward(dx: f32, dy: f32) -> Direction {
    if dx.abs() > dy.abs() {
        if dx > 0.0 {
            Direction::East
        } else {
            Direction::West
        }
    } else if dy > 0.0 {
        Direction::North
    } else {
        Direction::South
    }
}
