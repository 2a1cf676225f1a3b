use lightcycle_core::player::PlayerId;

use crate::{Direction, SimulationState, TurnDirection};

/// Cells travelled along a turned lane before the second lookahead step.
const SECOND_STEP_CELLS: i32 = 3;

/// Pick a turn for a computer pilot from the current grid, or `None` to
/// keep going straight. Reads the simulation only through its query
/// surface; the caller applies the decision with `turn()`.
pub fn decide(sim: &SimulationState, bot_id: PlayerId) -> Option<TurnDirection> {
    let cycle = sim.cycle(bot_id)?;
    if !cycle.is_alive() {
        return None;
    }

    let ai = &sim.config().ai;
    let look = ai.lookahead_cells;
    let straight = sim.free_distance(bot_id, cycle.direction, look);
    let left_dir = cycle.direction.left();
    let right_dir = cycle.direction.right();

    if straight < ai.danger_cells {
        let left = sim.free_distance(bot_id, left_dir, look);
        let right = sim.free_distance(bot_id, right_dir, look);
        let cell = cycle.cell();
        let left_score = left + second_step_best(sim, cell, left_dir, left, look);
        let right_score = right + second_step_best(sim, cell, right_dir, right, look);

        // Both sides are worse than the lane we are on.
        if left_score.max(right_score) <= straight {
            return None;
        }
        return if left_score >= right_score {
            Some(TurnDirection::Left)
        } else {
            Some(TurnDirection::Right)
        };
    }

    // Rare wander turns on an open lane keep bots from circling forever.
    let noise = pseudo_random(bot_id, sim.elapsed_ms());
    if noise < ai.wander_chance && straight >= ai.danger_cells * 3 {
        let (preferred, other) = if noise < ai.wander_chance / 2.0 {
            (TurnDirection::Left, TurnDirection::Right)
        } else {
            (TurnDirection::Right, TurnDirection::Left)
        };
        return [preferred, other]
            .into_iter()
            .find(|&turn| sim.is_freeway(bot_id, cycle.direction.turned(turn)));
    }
    None
}

/// 2-step lookahead: travel a short way along `first_dir`, then return the
/// best open distance from there.
fn second_step_best(
    sim: &SimulationState,
    (x, y): (i32, i32),
    first_dir: Direction,
    first_open: i32,
    look: i32,
) -> i32 {
    let travel = first_open.min(SECOND_STEP_CELLS);
    if travel == 0 {
        return 0;
    }
    let (dx, dy) = first_dir.step();
    let (sx, sy) = (x + dx * travel, y + dy * travel);

    [first_dir, first_dir.left(), first_dir.right()]
        .into_iter()
        .map(|dir| sim.free_distance_from(sx, sy, dir, look))
        .max()
        .unwrap_or(0)
}

/// Simple deterministic pseudo-random float [0, 1) from bot id + sim time.
fn pseudo_random(bot_id: PlayerId, elapsed_ms: u64) -> f32 {
    let bits = (bot_id as u32).wrapping_add(1).wrapping_mul(2654435761) ^ (elapsed_ms as u32);
    (bits % 1000) as f32 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CycleStatus;
    use crate::config::{AiConfig, ArenaConfig};

    fn arena() -> SimulationState {
        SimulationState::new(ArenaConfig {
            grid_size: 60,
            players: 2,
            human_players: 0,
            seed: Some(3),
            ai: AiConfig {
                wander_chance: 0.0,
                ..AiConfig::default()
            },
            ..ArenaConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn no_decision_for_missing_player() {
        assert_eq!(decide(&arena(), 99), None);
    }

    #[test]
    fn no_decision_for_crashed_player() {
        let mut sim = arena();
        sim.place_cycle(0, 58.5, 30.5, Direction::East).unwrap();
        sim.move_players(200);
        assert_eq!(sim.cycle(0).unwrap().status, CycleStatus::Crashed);
        assert_eq!(decide(&sim, 0), None);
    }

    #[test]
    fn keeps_straight_on_an_open_lane() {
        let mut sim = arena();
        sim.place_cycle(0, 10.5, 30.5, Direction::East).unwrap();
        sim.place_cycle(1, 5.5, 5.5, Direction::North).unwrap();
        assert_eq!(decide(&sim, 0), None);
    }

    #[test]
    fn turns_before_the_wall() {
        let mut sim = arena();
        sim.place_cycle(0, 57.5, 30.5, Direction::East).unwrap();
        sim.place_cycle(1, 5.5, 5.5, Direction::North).unwrap();
        assert!(decide(&sim, 0).is_some(), "bot should turn away from the wall");
    }

    #[test]
    fn turns_toward_the_open_side() {
        let mut sim = arena();
        // Near the top wall heading east into the corner: only south is open.
        sim.place_cycle(0, 56.5, 58.5, Direction::East).unwrap();
        sim.place_cycle(1, 5.5, 5.5, Direction::North).unwrap();
        assert_eq!(decide(&sim, 0), Some(TurnDirection::Right));
    }

    #[test]
    fn wanders_only_onto_freeways() {
        let mut sim = SimulationState::new(ArenaConfig {
            grid_size: 60,
            players: 1,
            human_players: 0,
            seed: Some(3),
            ai: AiConfig {
                wander_chance: 1.0,
                ..AiConfig::default()
            },
            ..ArenaConfig::default()
        })
        .unwrap();
        // Against the bottom wall: only a left turn (north) is a freeway.
        sim.place_cycle(0, 5.5, 0.5, Direction::East).unwrap();
        assert_eq!(decide(&sim, 0), Some(TurnDirection::Left));
    }

    #[test]
    fn bots_survive_a_while_on_an_open_arena() {
        let mut sim = SimulationState::new(ArenaConfig {
            players: 2,
            human_players: 0,
            seed: Some(11),
            ..ArenaConfig::default()
        })
        .unwrap();
        for _ in 0..100 {
            for bot in 0..2 {
                if let Some(turn) = decide(&sim, bot) {
                    sim.turn(bot, turn).unwrap();
                }
            }
            sim.move_players(20);
        }
        assert!(sim.cycles().iter().all(|c| c.is_alive()));
    }

    #[test]
    fn pseudo_random_bounded() {
        for id in 0..100 {
            for t in 0..100u64 {
                let val = pseudo_random(id, t * 37);
                assert!((0.0..1.0).contains(&val));
            }
        }
    }
}
