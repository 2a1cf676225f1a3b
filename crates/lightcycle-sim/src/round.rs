use lightcycle_core::events::GameEvent;
use lightcycle_core::player::{Pilot, Player, PlayerId};

use crate::bot;
use crate::camera::ChaseCamera;
use crate::config::ArenaConfig;
use crate::error::SimError;
use crate::mode::{GameMode, ModeAction};
use crate::{SimulationState, TurnDirection};

/// What one call to [`RoundController::idle`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Simulation sub-steps run this frame (0 when the frame was skipped).
    pub substeps: u32,
    /// `dt` of each sub-step.
    pub dt_ms: u64,
    pub fast_finish: bool,
    /// AI pilots consulted after the sub-steps.
    pub ai_decisions: usize,
    pub events: Vec<GameEvent>,
}

impl FrameReport {
    pub fn skipped(&self) -> bool {
        self.substeps == 0
    }
}

/// One player per slot: the first `effective_humans()` are human.
pub fn default_roster(config: &ArenaConfig) -> Vec<Player> {
    let humans = config.effective_humans();
    (0..config.players)
        .map(|i| {
            let pilot = if i < humans {
                Pilot::Human
            } else {
                Pilot::Computer
            };
            Player::new(i, format!("Player {}", i + 1), pilot)
        })
        .collect()
}

/// Owns the simulation and drives it from frame callbacks: pacing,
/// fast-finish, AI, cameras and the game mode.
#[derive(Debug)]
pub struct RoundController {
    sim: SimulationState,
    players: Vec<Player>,
    cameras: Vec<ChaseCamera>,
    mode: GameMode,
    last_frame_ms: u64,
}

impl RoundController {
    pub fn new(config: ArenaConfig, mut players: Vec<Player>) -> Result<Self, SimError> {
        if players.len() != config.players {
            return Err(SimError::InvalidConfig(format!(
                "{} players configured but {} given",
                config.players,
                players.len()
            )));
        }
        if config.demo_mode {
            for player in &mut players {
                player.pilot = Pilot::Computer;
            }
        }
        let sim = SimulationState::new(config)?;
        let mut controller = Self {
            sim,
            players,
            cameras: Vec::new(),
            mode: GameMode::Menu,
            last_frame_ms: 0,
        };
        controller.reset_cameras();
        Ok(controller)
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn sim(&self) -> &SimulationState {
        &self.sim
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn cameras(&self) -> &[ChaseCamera] {
        &self.cameras
    }

    fn transition(&mut self, action: ModeAction) -> Result<(), SimError> {
        let next = self.mode.apply(action)?;
        tracing::debug!(from = ?self.mode, to = ?next, ?action, "Mode change");
        self.mode = next;
        Ok(())
    }

    /// Zero all scores and start the first round of a match.
    pub fn start_match(&mut self, now_ms: u64) -> Result<(), SimError> {
        self.transition(ModeAction::StartMatch)?;
        self.sim.reset_match();
        self.prepare_round(now_ms);
        tracing::info!(players = self.players.len(), "Match started");
        Ok(())
    }

    /// Next round of the same match; scores carry over.
    pub fn play_again(&mut self, now_ms: u64) -> Result<(), SimError> {
        self.transition(ModeAction::PlayAgain)?;
        self.sim.reset_round();
        self.prepare_round(now_ms);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), SimError> {
        self.transition(ModeAction::Pause)
    }

    /// Resume play; time spent paused never reaches the simulation.
    pub fn resume(&mut self, now_ms: u64) -> Result<(), SimError> {
        self.transition(ModeAction::Resume)?;
        self.last_frame_ms = now_ms;
        Ok(())
    }

    pub fn return_to_menu(&mut self) -> Result<(), SimError> {
        self.transition(ModeAction::ReturnToMenu)
    }

    /// Steering input from the input layer. Only accepted while playing.
    pub fn turn(&mut self, player: PlayerId, turn: TurnDirection) -> Result<(), SimError> {
        if !self.mode.is_ticking() {
            return Err(SimError::NotPlaying(self.mode));
        }
        self.sim.turn(player, turn)
    }

    fn prepare_round(&mut self, now_ms: u64) {
        self.reset_cameras();
        self.last_frame_ms = now_ms;
    }

    fn reset_cameras(&mut self) {
        let mode = self.sim.config().camera;
        self.cameras = self
            .sim
            .cycles()
            .iter()
            .map(|cycle| ChaseCamera::new(mode, cycle))
            .collect();
    }

    /// Fast-forward once every human has finished exploding. Rounds without
    /// a human never fast-forward, so demo rounds play out in real time.
    fn fast_finish_active(&self) -> bool {
        if !self.sim.config().fast_finish {
            return false;
        }
        let max = self.sim.config().explosion_radius_max;
        let mut humans = self
            .players
            .iter()
            .filter(|p| p.pilot == Pilot::Human)
            .filter_map(|p| self.sim.cycle(p.id))
            .peekable();
        humans.peek().is_some() && humans.all(|c| c.explosion_radius >= max)
    }

    /// Frame callback. Decides how many sub-steps to run for the time since
    /// the previous frame, then lets the AI pilots act once and moves the
    /// cameras.
    pub fn idle(&mut self, now_ms: u64) -> FrameReport {
        let mut report = FrameReport::default();
        if !self.mode.is_ticking() {
            return report;
        }

        let pacing = self.sim.config().pacing.clone();
        let fast = self.fast_finish_active();

        if now_ms.saturating_sub(self.last_frame_ms) > pacing.max_frame_gap_ms {
            tracing::debug!(
                gap_ms = now_ms.saturating_sub(self.last_frame_ms),
                "Frame gap clamped"
            );
            self.last_frame_ms = now_ms.saturating_sub(pacing.resume_dt_ms);
        }
        let elapsed = now_ms.saturating_sub(self.last_frame_ms);
        if elapsed < pacing.min_frame_ms && !fast {
            return report;
        }
        self.last_frame_ms = now_ms;

        let (steps, dt) = if fast {
            (pacing.fast_finish_steps, pacing.fast_finish_dt_ms)
        } else {
            (1, elapsed)
        };
        report.fast_finish = fast;
        report.dt_ms = dt;
        for _ in 0..steps {
            report.events.extend(self.sim.move_players(dt));
            report.substeps += 1;
            if self.sim.round().finished {
                break;
            }
        }

        if self.sim.round().finished {
            if let Err(e) = self.transition(ModeAction::FinishRound) {
                tracing::warn!(error = %e, "Round finished outside of play");
            }
        } else {
            report.ai_decisions = self.run_ai();
        }
        self.update_cameras(dt as f32);
        report
    }

    /// One decision per alive computer pilot. Returns how many were consulted.
    fn run_ai(&mut self) -> usize {
        let mut consulted = 0;
        for player in self.players.iter().filter(|p| p.pilot.is_computer()) {
            let alive = self.sim.cycle(player.id).is_some_and(|c| c.is_alive());
            if !alive {
                continue;
            }
            consulted += 1;
            if let Some(turn) = bot::decide(&self.sim, player.id) {
                // Rejections are already logged by the simulation.
                let _ = self.sim.turn(player.id, turn);
            }
        }
        consulted
    }

    fn update_cameras(&mut self, dt: f32) {
        for (camera, cycle) in self.cameras.iter_mut().zip(self.sim.cycles()) {
            camera.update(cycle, dt);
        }
    }
}
