use lightcycle_core::player::PlayerId;

use super::{CycleState, CycleStatus, TurnDirection};
use crate::collision::{cell_of, detect_collision, mark_path};
use crate::config::ArenaConfig;
use crate::error::SimError;
use crate::grid::CollisionGrid;

/// Turn the cycle 90 degrees and pivot its trail at the current position.
///
/// Refused for cycles that are not alive and for full trails; a refused
/// turn leaves direction and trail untouched.
pub fn apply_turn(
    cycle: &mut CycleState,
    player: PlayerId,
    turn: TurnDirection,
    now_ms: u64,
) -> Result<(), SimError> {
    if !cycle.is_alive() {
        return Err(SimError::NotAlive(player));
    }
    cycle
        .trail
        .pivot(cycle.x, cycle.y)
        .map_err(|full| SimError::TrailFull {
            player,
            capacity: full.capacity,
        })?;

    cycle.last_direction = cycle.direction;
    cycle.turn_time_ms = now_ms;
    cycle.direction = cycle.direction.turned(turn);
    Ok(())
}

/// Move an alive cycle for `dt` milliseconds, test the cells it enters and
/// mark them in the grid. Returns the collision cell if the cycle crashed.
pub fn advance_cycle(
    cycle: &mut CycleState,
    grid: &mut CollisionGrid,
    dt: f32,
    collisions_enabled: bool,
) -> Option<(i32, i32)> {
    if !cycle.is_alive() {
        return None;
    }

    let (ux, uy) = cycle.direction.unit();
    let distance = dt / 100.0 * cycle.speed;
    let from = (cycle.x, cycle.y);
    let mut to = (cycle.x + distance * ux, cycle.y + distance * uy);

    let mut crash = None;
    let cell_changed = cell_of(from.0) != cell_of(to.0) || cell_of(from.1) != cell_of(to.1);
    if collisions_enabled && cell_changed {
        if let Some((cx, cy)) = detect_collision(grid, from, to, cycle.direction) {
            // Stop on the obstacle instead of passing through it.
            to = (cx as f32, cy as f32);
            cycle.status = CycleStatus::Crashed;
            crash = Some((cx, cy));
        }
    }

    mark_path(grid, from, to, cycle.direction);
    cycle.x = to.0;
    cycle.y = to.1;
    cycle.trail.extend_live(to.0, to.1);
    crash
}

/// Advance the explosion and trail fade of a crashed or gone cycle.
/// Returns true on the tick the cycle leaves play.
pub fn advance_wreck(cycle: &mut CycleState, dt: f32, config: &ArenaConfig) -> bool {
    let mut gone = false;
    if cycle.explosion_radius < config.explosion_radius_max {
        cycle.explosion_radius += dt * config.explosion_radius_delta;
    } else if cycle.status == CycleStatus::Crashed {
        cycle.status = CycleStatus::Gone;
        gone = true;
    }

    if config.erase_crashed && cycle.trail_height > 0.0 {
        cycle.trail_height = (cycle.trail_height - dt * config.trail_height / 1000.0).max(0.0);
    }
    gone
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Direction;
    use crate::grid::CellState;

    fn default_cycle() -> CycleState {
        CycleState::spawned(50.0, 50.0, Direction::East, 5.0, 1000, 3.5)
    }

    #[test]
    fn cycle_moves_forward() {
        let mut cycle = default_cycle();
        let mut grid = CollisionGrid::new(200);

        let crash = advance_cycle(&mut cycle, &mut grid, 20.0, true);

        assert_eq!(crash, None);
        assert!((cycle.x - 51.0).abs() < 1e-4, "x={}", cycle.x);
        assert_eq!(cycle.y, 50.0);
        assert_eq!(cycle.trail.live().end(), (cycle.x, cycle.y));
        assert_eq!(grid.test(51, 50), CellState::Occupied);
    }

    #[test]
    fn small_steps_accumulate_within_a_cell() {
        let mut cycle = CycleState {
            x: 50.1,
            ..default_cycle()
        };
        let mut grid = CollisionGrid::new(200);

        advance_cycle(&mut cycle, &mut grid, 2.0, true);
        assert!((cycle.x - 50.2).abs() < 1e-4);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn crash_stops_on_the_obstacle() {
        let mut cycle = default_cycle();
        let mut grid = CollisionGrid::new(200);
        grid.set(53, 50).unwrap();

        let crash = advance_cycle(&mut cycle, &mut grid, 100.0, true);

        assert_eq!(crash, Some((53, 50)));
        assert_eq!(cycle.status, CycleStatus::Crashed);
        assert_eq!((cycle.x, cycle.y), (53.0, 50.0));
        assert_eq!(grid.test(54, 50), CellState::Free);
    }

    #[test]
    fn disabled_collisions_drive_through_trails() {
        let mut cycle = default_cycle();
        let mut grid = CollisionGrid::new(200);
        grid.set(53, 50).unwrap();

        let crash = advance_cycle(&mut cycle, &mut grid, 100.0, false);

        assert_eq!(crash, None);
        assert!(cycle.is_alive());
        assert!((cycle.x - 55.0).abs() < 1e-4);
    }

    #[test]
    fn crashed_cycle_does_not_move() {
        let mut cycle = default_cycle();
        cycle.status = CycleStatus::Crashed;
        let mut grid = CollisionGrid::new(200);
        assert_eq!(advance_cycle(&mut cycle, &mut grid, 100.0, true), None);
        assert_eq!(cycle.x, 50.0);
    }

    #[test]
    fn turn_changes_direction_and_pivots() {
        let mut cycle = default_cycle();
        cycle.x = 57.5;
        cycle.trail.extend_live(57.5, 50.0);

        apply_turn(&mut cycle, 0, TurnDirection::Left, 1234).unwrap();

        assert_eq!(cycle.direction, Direction::North);
        assert_eq!(cycle.last_direction, Direction::East);
        assert_eq!(cycle.turn_time_ms, 1234);
        assert_eq!(cycle.trail.committed_len(), 1);
        assert_eq!(cycle.trail.live().start(), (57.5, 50.0));

        apply_turn(&mut cycle, 0, TurnDirection::Right, 1300).unwrap();
        assert_eq!(cycle.direction, Direction::East);
    }

    #[test]
    fn turn_refused_when_not_alive() {
        let mut cycle = default_cycle();
        cycle.status = CycleStatus::Crashed;
        assert_eq!(
            apply_turn(&mut cycle, 3, TurnDirection::Left, 0),
            Err(SimError::NotAlive(3))
        );
        assert_eq!(cycle.direction, Direction::East);
        assert_eq!(cycle.trail.committed_len(), 0);
    }

    #[test]
    fn turn_refused_when_trail_full() {
        let mut cycle = CycleState::spawned(50.0, 50.0, Direction::East, 5.0, 2, 3.5);
        apply_turn(&mut cycle, 1, TurnDirection::Left, 0).unwrap();

        assert_eq!(
            apply_turn(&mut cycle, 1, TurnDirection::Left, 10),
            Err(SimError::TrailFull {
                player: 1,
                capacity: 2
            })
        );
        assert_eq!(cycle.direction, Direction::North);
    }

    #[test]
    fn wreck_explodes_then_leaves_play() {
        let config = ArenaConfig::default();
        let mut cycle = default_cycle();
        cycle.status = CycleStatus::Crashed;

        // 30 / 0.01 = 3000 ms of explosion.
        assert!(!advance_wreck(&mut cycle, 1500.0, &config));
        assert!(!advance_wreck(&mut cycle, 1500.0, &config));
        assert!(cycle.explosion_radius >= config.explosion_radius_max);
        assert_eq!(cycle.status, CycleStatus::Crashed);

        assert!(advance_wreck(&mut cycle, 20.0, &config));
        assert_eq!(cycle.status, CycleStatus::Gone);
        assert!(!advance_wreck(&mut cycle, 20.0, &config));
    }

    #[test]
    fn trail_fades_only_when_erasing() {
        let mut config = ArenaConfig::default();
        let mut cycle = default_cycle();
        cycle.status = CycleStatus::Crashed;

        advance_wreck(&mut cycle, 500.0, &config);
        assert_eq!(cycle.trail_height, 3.5);

        config.erase_crashed = true;
        advance_wreck(&mut cycle, 500.0, &config);
        assert!((cycle.trail_height - 1.75).abs() < 1e-4);
        advance_wreck(&mut cycle, 5000.0, &config);
        assert_eq!(cycle.trail_height, 0.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn direction() -> impl Strategy<Value = Direction> {
            prop_oneof![
                Just(Direction::East),
                Just(Direction::North),
                Just(Direction::West),
                Just(Direction::South),
            ]
        }

        proptest! {
            #[test]
            fn collision_cell_is_always_inside_the_arena(
                x in 0.0f32..40.0,
                y in 0.0f32..40.0,
                dir in direction(),
                dt in 1.0f32..2000.0,
            ) {
                let mut grid = CollisionGrid::new(40);
                let mut cycle = CycleState::spawned(x, y, dir, 4.2, 100, 3.5);

                if let Some((cx, cy)) = advance_cycle(&mut cycle, &mut grid, dt, true) {
                    prop_assert!((0..40).contains(&cx));
                    prop_assert!((0..40).contains(&cy));
                    prop_assert_eq!(cycle.status, CycleStatus::Crashed);
                }
                prop_assert!(cycle.x > -1.0 && cycle.x < 41.0);
            }

            #[test]
            fn trail_end_follows_position(
                dt in 1.0f32..200.0,
                dir in direction(),
            ) {
                let mut grid = CollisionGrid::new(200);
                let mut cycle = CycleState::spawned(100.5, 100.5, dir, 4.2, 100, 3.5);
                advance_cycle(&mut cycle, &mut grid, dt, true);
                prop_assert_eq!(cycle.trail.live().end(), (cycle.x, cycle.y));
                prop_assert_eq!(cycle.trail.live().start(), (100.5, 100.5));
            }
        }
    }
}
