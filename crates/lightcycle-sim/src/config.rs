use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::arena::SpawnFacing;
use crate::camera::CameraMode;
use crate::error::SimError;

/// Environment variable naming a TOML config file.
pub const CONFIG_ENV: &str = "LIGHTCYCLE_CONFIG";
/// Debug switch: when set, cycles drive through trails and walls.
pub const NO_COLLISIONS_ENV: &str = "LIGHTCYCLE_NO_COLLISIONS";
const DEFAULT_CONFIG_PATH: &str = "config/lightcycle.toml";

/// Data-driven configuration for the arena, injected once at init.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Side length of the square arena, in cells.
    pub grid_size: u32,
    /// Number of player slots.
    pub players: usize,
    /// The first `human_players` slots are human-steered.
    pub human_players: usize,
    /// Maximum trail segments per player per round, including the live one.
    pub trail_capacity: usize,
    /// Cruising speed; a cycle covers `speed * dt / 100` cells per tick.
    pub speed: f32,
    /// Remove a crashed player's trail from the grid.
    pub erase_crashed: bool,
    /// Fast-forward once every human has finished exploding.
    pub fast_finish: bool,
    /// Screen-saver mode: every slot is a computer and nobody scores.
    pub demo_mode: bool,
    /// Spawn circle radius as a fraction of `grid_size`.
    pub spawn_radius: f32,
    pub spawn_facing: SpawnFacing,
    /// Seed for spawn facing. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Explosion radius at which a crashed cycle leaves play.
    pub explosion_radius_max: f32,
    /// Explosion growth per millisecond.
    pub explosion_radius_delta: f32,
    /// Trail wall height; it decays to zero over one second after a crash.
    pub trail_height: f32,
    pub pacing: PacingConfig,
    pub ai: AiConfig,
    pub camera: CameraMode,
    /// Debug only. Never enabled by default.
    pub disable_collisions: bool,
}

/// Frame pacing of the round controller (all values in milliseconds).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Frames closer together than this are skipped (unless fast-finishing).
    pub min_frame_ms: u64,
    /// Gaps longer than this rebase the frame clock.
    pub max_frame_gap_ms: u64,
    /// `dt` used for the first frame after a rebase.
    pub resume_dt_ms: u64,
    pub fast_finish_steps: u32,
    pub fast_finish_dt_ms: u64,
}

/// Tuning for the reference AI (distances in cells).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Cells that must be free for `is_freeway` to hold.
    pub freeway_cells: i32,
    /// How far the bot scans along a lane.
    pub lookahead_cells: i32,
    /// A lane shorter than this is dangerous.
    pub danger_cells: i32,
    /// Probability of a random turn on an open lane.
    pub wander_chance: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            grid_size: 200,
            players: 4,
            human_players: 1,
            trail_capacity: 1000,
            speed: 4.2,
            erase_crashed: false,
            fast_finish: true,
            demo_mode: false,
            spawn_radius: 0.25,
            spawn_facing: SpawnFacing::Random,
            seed: None,
            explosion_radius_max: 30.0,
            explosion_radius_delta: 0.01,
            trail_height: 3.5,
            pacing: PacingConfig::default(),
            ai: AiConfig::default(),
            camera: CameraMode::Follow,
            disable_collisions: false,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_frame_ms: 10,
            max_frame_gap_ms: 1000,
            resume_dt_ms: 20,
            fast_finish_steps: 40,
            fast_finish_dt_ms: 20,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            freeway_cells: 3,
            lookahead_cells: 40,
            danger_cells: 6,
            wander_chance: 0.02,
        }
    }
}

impl ArenaConfig {
    /// Load config from `LIGHTCYCLE_CONFIG` or `config/lightcycle.toml`,
    /// falling back to defaults.
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = if Path::new(&path).exists() {
            match Self::load_from(&path) {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!("Failed to load {path}: {e}, using defaults");
                    Self::default()
                },
            }
        } else {
            Self::default()
        };
        if std::env::var_os(NO_COLLISIONS_ENV).is_some() {
            config.disable_collisions = true;
        }
        if config.disable_collisions {
            tracing::warn!("Collision detection disabled (debug)");
        }
        config
    }

    /// Parse and validate a TOML config file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SimError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, SimError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let fail = |m: &str| Err(SimError::InvalidConfig(m.to_string()));
        if self.grid_size == 0 || self.grid_size > i32::MAX as u32 {
            return fail("grid_size must be positive");
        }
        if self.players == 0 {
            return fail("at least one player is required");
        }
        if self.human_players > self.players {
            return fail("human_players exceeds players");
        }
        if self.trail_capacity == 0 {
            return fail("trail_capacity must be positive");
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return fail("speed must be positive and finite");
        }
        if !(0.0..0.5).contains(&self.spawn_radius) {
            return fail("spawn_radius must be in [0, 0.5)");
        }
        if self.pacing.fast_finish_steps == 0 {
            return fail("fast_finish_steps must be positive");
        }
        Ok(())
    }

    /// Number of human-steered slots once demo mode is applied.
    pub fn effective_humans(&self) -> usize {
        if self.demo_mode {
            0
        } else {
            self.human_players.min(self.players)
        }
    }
}
