pub mod arena;
pub mod bot;
pub mod camera;
pub mod collision;
pub mod config;
pub mod error;
pub mod grid;
pub mod mode;
pub mod physics;
pub mod query;
pub mod raster;
pub mod round;
pub mod scoring;
pub mod trail;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use lightcycle_core::events::GameEvent;
use lightcycle_core::player::PlayerId;

use collision::cell_of;
use config::ArenaConfig;
use error::SimError;
use grid::CollisionGrid;
use trail::Trail;

/// Compass direction on the arena grid, numbered counter-clockwise from +x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    East,
    North,
    West,
    South,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::North,
        Direction::West,
        Direction::South,
    ];

    /// 0 = East, 1 = North, 2 = West, 3 = South.
    pub fn index(self) -> i32 {
        match self {
            Direction::East => 0,
            Direction::North => 1,
            Direction::West => 2,
            Direction::South => 3,
        }
    }

    /// Inverse of [`Direction::index`], taken modulo 4.
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(4) as usize]
    }

    /// One-cell step along this direction.
    pub fn step(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::North => (0, 1),
            Direction::West => (-1, 0),
            Direction::South => (0, -1),
        }
    }

    pub fn unit(self) -> (f32, f32) {
        let (dx, dy) = self.step();
        (dx as f32, dy as f32)
    }

    pub fn turned(self, turn: TurnDirection) -> Self {
        Self::from_index(self.index() + turn.offset())
    }

    pub fn left(self) -> Self {
        self.turned(TurnDirection::Left)
    }

    pub fn right(self) -> Self {
        self.turned(TurnDirection::Right)
    }
}

/// Relative steering input, the only way to change a cycle's heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnDirection {
    Left,
    Right,
}

impl TurnDirection {
    /// Offset added to the direction index: `+1` or `+3` (≡ −1) modulo 4.
    pub fn offset(self) -> i32 {
        match self {
            TurnDirection::Left => 1,
            TurnDirection::Right => 3,
        }
    }

    /// Map a signed offset back to a turn. Only ±1 (mod 4) is meaningful.
    pub fn from_offset(offset: i32) -> Option<Self> {
        match offset.rem_euclid(4) {
            1 => Some(TurnDirection::Left),
            3 => Some(TurnDirection::Right),
            _ => None,
        }
    }
}

/// Life cycle of a cycle within one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleStatus {
    Alive,
    /// Hit something; the explosion is running.
    Crashed,
    /// Explosion finished; no longer counted as running.
    Gone,
}

/// Per-player kinematic state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleState {
    pub x: f32,
    pub y: f32,
    pub direction: Direction,
    /// Heading before the most recent turn (for turn interpolation).
    pub last_direction: Direction,
    /// Simulation time of the most recent turn.
    pub turn_time_ms: u64,
    /// Cruising speed; also kept while crashed.
    pub speed: f32,
    pub status: CycleStatus,
    pub trail_height: f32,
    pub explosion_radius: f32,
    /// Cumulative across rounds until `reset_scores`.
    pub score: u32,
    pub trail: Trail,
}

impl CycleState {
    /// A fresh alive cycle at `(x, y)` with a single-point trail.
    pub fn spawned(
        x: f32,
        y: f32,
        direction: Direction,
        speed: f32,
        trail_capacity: usize,
        trail_height: f32,
    ) -> Self {
        Self {
            x,
            y,
            direction,
            last_direction: direction,
            turn_time_ms: 0,
            speed,
            status: CycleStatus::Alive,
            trail_height,
            explosion_radius: 0.0,
            score: 0,
            trail: Trail::new(trail_capacity, x, y),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.status == CycleStatus::Alive
    }

    /// The integer cell the cycle currently occupies.
    pub fn cell(&self) -> (i32, i32) {
        (cell_of(self.x), cell_of(self.y))
    }
}

/// Round bookkeeping exposed to the overlay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub players: usize,
    /// Cycles not yet gone.
    pub running: usize,
    /// `None` while the round runs, and on a draw.
    pub winner: Option<PlayerId>,
    pub finished: bool,
    /// 1-based round counter within the session.
    pub number: u32,
}

/// Everything one arena owns: grid, cycles with their trails, and round
/// bookkeeping. Owned by the round controller; the AI and renderers only
/// borrow it.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationState {
    config: ArenaConfig,
    grid: CollisionGrid,
    cycles: Vec<CycleState>,
    round: RoundState,
    /// Simulated milliseconds since the round started.
    elapsed_ms: u64,
    #[serde(skip)]
    rng: StdRng,
}

impl SimulationState {
    pub fn new(config: ArenaConfig) -> Result<Self, SimError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut state = Self {
            grid: CollisionGrid::new(config.grid_size),
            cycles: Vec::with_capacity(config.players),
            round: RoundState::default(),
            elapsed_ms: 0,
            rng,
            config,
        };
        state.reset_round();
        Ok(state)
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn grid(&self) -> &CollisionGrid {
        &self.grid
    }

    pub fn cycles(&self) -> &[CycleState] {
        &self.cycles
    }

    pub fn cycle(&self, player: PlayerId) -> Option<&CycleState> {
        self.cycles.get(player)
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn scores(&self) -> Vec<u32> {
        self.cycles.iter().map(|c| c.score).collect()
    }

    /// Clear the grid and respawn every cycle on the spawn circle. Scores
    /// carry over.
    pub fn reset_round(&mut self) {
        self.grid.reset();
        let spawns = arena::spawn_points(
            self.config.grid_size,
            self.config.players,
            self.config.spawn_radius,
            self.config.spawn_facing,
            &mut self.rng,
        );

        let cycles: Vec<CycleState> = spawns
            .iter()
            .enumerate()
            .map(|(i, sp)| CycleState {
                score: self.cycles.get(i).map_or(0, |c| c.score),
                ..CycleState::spawned(
                    sp.x,
                    sp.y,
                    sp.direction,
                    self.config.speed,
                    self.config.trail_capacity,
                    self.config.trail_height,
                )
            })
            .collect();
        self.cycles = cycles;

        for cycle in &self.cycles {
            let (x, y) = cycle.cell();
            // Spawn points always lie inside the arena.
            let _ = self.grid.set(x, y);
        }

        self.elapsed_ms = 0;
        self.round = RoundState {
            players: self.cycles.len(),
            running: self.cycles.len(),
            winner: None,
            finished: false,
            number: self.round.number + 1,
        };
        tracing::info!(
            round = self.round.number,
            players = self.round.players,
            "Round reset"
        );
    }

    /// Zero every cumulative score. Positions and trails are untouched.
    pub fn reset_scores(&mut self) {
        for cycle in &mut self.cycles {
            cycle.score = 0;
        }
    }

    /// Zero the scores and the round counter, then lay out round 1.
    pub fn reset_match(&mut self) {
        self.reset_scores();
        self.round.number = 0;
        self.reset_round();
    }

    /// Turn a cycle left or right, pivoting its trail at the current position.
    pub fn turn(&mut self, player: PlayerId, turn: TurnDirection) -> Result<(), SimError> {
        let now = self.elapsed_ms;
        let cycle = self
            .cycles
            .get_mut(player)
            .ok_or(SimError::UnknownPlayer(player))?;
        physics::apply_turn(cycle, player, turn, now).inspect_err(|e| {
            tracing::warn!(player, error = %e, "Turn rejected");
        })
    }

    /// Test setup: move a cycle to `(x, y)` heading `direction` with a fresh
    /// trail, before the round has run. Its previous trail is removed from
    /// the grid.
    #[cfg(test)]
    pub(crate) fn place_cycle(
        &mut self,
        player: PlayerId,
        x: f32,
        y: f32,
        direction: Direction,
    ) -> Result<(), SimError> {
        let (cx, cy) = (cell_of(x), cell_of(y));
        if !self.grid.in_bounds(cx, cy) {
            return Err(SimError::OutOfRange { x: cx, y: cy });
        }
        let cycle = self
            .cycles
            .get_mut(player)
            .ok_or(SimError::UnknownPlayer(player))?;
        raster::clear_player_trail(&mut self.grid, &cycle.trail);

        let was_running = cycle.status != CycleStatus::Gone;
        *cycle = CycleState {
            score: cycle.score,
            ..CycleState::spawned(
                x,
                y,
                direction,
                self.config.speed,
                self.config.trail_capacity,
                self.config.trail_height,
            )
        };
        if !was_running {
            self.round.running += 1;
        }

        raster::rasterize_all_trails(&mut self.grid, &self.cycles);
        Ok(())
    }

    /// Advance every cycle by `dt_ms` in player-index order.
    ///
    /// The grid is updated as each cycle moves, so later cycles already
    /// collide with cells entered earlier in the same tick. Does nothing
    /// once the round is finished.
    pub fn move_players(&mut self, dt_ms: u64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.round.finished {
            return events;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        let dt = dt_ms as f32;
        let collisions = !self.config.disable_collisions;

        for player in 0..self.cycles.len() {
            if self.cycles[player].is_alive() {
                let crash =
                    physics::advance_cycle(&mut self.cycles[player], &mut self.grid, dt, collisions);
                if let Some((x, y)) = crash {
                    self.on_crash(player, x, y, &mut events);
                }
            } else if physics::advance_wreck(&mut self.cycles[player], dt, &self.config) {
                tracing::debug!(player, "Cycle gone");
                self.round.running = self.round.running.saturating_sub(1);
                events.push(GameEvent::CycleGone { player });
            }
        }

        if self.round_is_over() {
            self.finish_round(&mut events);
        }
        events
    }

    fn on_crash(&mut self, player: PlayerId, x: i32, y: i32, events: &mut Vec<GameEvent>) {
        tracing::debug!(player, x, y, "Cycle crashed");
        events.push(GameEvent::CycleCrashed { player, x, y });
        if !self.config.demo_mode {
            scoring::award_survivors(&mut self.cycles, player, events);
        }
        if self.config.erase_crashed {
            raster::clear_player_trail(&mut self.grid, &self.cycles[player].trail);
            raster::rasterize_all_trails(&mut self.grid, &self.cycles);
        }
    }

    fn round_is_over(&self) -> bool {
        let running = self.round.running;
        running == 0 || (self.round.players >= 2 && running <= 1)
    }

    fn finish_round(&mut self, events: &mut Vec<GameEvent>) {
        let winner = self.cycles.iter().position(CycleState::is_alive);
        self.round.winner = winner;
        self.round.finished = true;
        tracing::info!(round = self.round.number, ?winner, "Round complete");
        events.push(GameEvent::RoundComplete { winner });
    }
}
