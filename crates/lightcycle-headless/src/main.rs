use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use serde::Serialize;
use tracing_subscriber::EnvFilter;

use lightcycle_core::events::GameEvent;
use lightcycle_core::player::{Pilot, PlayerId};
use lightcycle_core::time::{Clock, ManualClock, SystemClock};
use lightcycle_sim::config::ArenaConfig;
use lightcycle_sim::error::SimError;
use lightcycle_sim::mode::GameMode;
use lightcycle_sim::round::{RoundController, default_roster};

/// Give up on a round after this many frames.
const MAX_FRAMES_PER_ROUND: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq)]
struct Args {
    rounds: u32,
    seed: Option<u64>,
    frame_ms: u64,
    demo: bool,
    json: bool,
    realtime: bool,
    config: Option<PathBuf>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            rounds: 3,
            seed: None,
            frame_ms: 16,
            demo: false,
            json: false,
            realtime: false,
            config: None,
        }
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Args {
    let mut parsed = Args::default();
    for arg in args {
        if let Some(v) = arg.strip_prefix("--rounds=") {
            parsed.rounds = v.parse().unwrap_or(parsed.rounds);
        } else if let Some(v) = arg.strip_prefix("--seed=") {
            parsed.seed = v.parse().ok();
        } else if let Some(v) = arg.strip_prefix("--frame-ms=") {
            parsed.frame_ms = v.parse::<u64>().map_or(parsed.frame_ms, |ms| ms.max(1));
        } else if let Some(v) = arg.strip_prefix("--config=") {
            parsed.config = Some(PathBuf::from(v));
        } else {
            match arg.as_str() {
                "--demo" => parsed.demo = true,
                "--json" => parsed.json = true,
                "--realtime" => parsed.realtime = true,
                other => tracing::warn!("Ignoring unknown argument {other}"),
            }
        }
    }
    parsed
}

#[derive(Debug, Clone, Serialize)]
struct RoundSummary {
    round: u32,
    winner: Option<PlayerId>,
    duration_ms: u64,
    crashes: usize,
}

#[derive(Debug, Clone, Serialize)]
struct ScoreLine {
    player: PlayerId,
    name: String,
    pilot: Pilot,
    score: u32,
}

#[derive(Debug, Clone, Serialize)]
struct Scoreboard {
    rounds: Vec<RoundSummary>,
    scores: Vec<ScoreLine>,
}

impl Scoreboard {
    fn render_text(&self) -> String {
        let mut out = String::new();
        for r in &self.rounds {
            let winner = r
                .winner
                .map_or_else(|| "draw".to_string(), |w| format!("player {}", w + 1));
            out.push_str(&format!(
                "round {:>3}  {:<10} {:>7} ms  {} crashes\n",
                r.round, winner, r.duration_ms, r.crashes
            ));
        }
        for s in &self.scores {
            out.push_str(&format!("{:<12} {:>4}\n", s.name, s.score));
        }
        out
    }
}

/// Play `rounds` rounds, pulling frame timestamps from `next_frame`.
fn run_match(
    rc: &mut RoundController,
    rounds: u32,
    mut next_frame: impl FnMut() -> u64,
) -> Result<Scoreboard, SimError> {
    let mut summaries = Vec::new();
    for i in 0..rounds {
        let now = next_frame();
        if i == 0 {
            rc.start_match(now)?;
        } else {
            rc.play_again(now)?;
        }

        let mut crashes = 0;
        let mut frames = 0;
        while rc.mode() != GameMode::RoundOver {
            if frames == MAX_FRAMES_PER_ROUND {
                tracing::warn!(round = i + 1, "Round did not finish, abandoning it");
                break;
            }
            frames += 1;
            let report = rc.idle(next_frame());
            crashes += report
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::CycleCrashed { .. }))
                .count();
        }

        let round = rc.sim().round();
        tracing::info!(
            round = i + 1,
            winner = ?round.winner,
            sim_ms = rc.sim().elapsed_ms(),
            "Round over"
        );
        summaries.push(RoundSummary {
            round: i + 1,
            winner: round.winner,
            duration_ms: rc.sim().elapsed_ms(),
            crashes,
        });
    }

    let scores = rc
        .players()
        .iter()
        .zip(rc.sim().scores())
        .map(|(p, score)| ScoreLine {
            player: p.id,
            name: p.display_name.clone(),
            pilot: p.pilot,
            score,
        })
        .collect();
    Ok(Scoreboard {
        rounds: summaries,
        scores,
    })
}

fn load_config(args: &Args) -> Result<ArenaConfig, SimError> {
    let mut config = match &args.config {
        Some(path) => ArenaConfig::load_from(path)?,
        None => ArenaConfig::load(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.demo {
        config.demo_mode = true;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = parse_args(std::env::args().skip(1));
    let config = match load_config(&args) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        },
    };

    let roster = default_roster(&config);
    let mut rc = match RoundController::new(config, roster) {
        Ok(rc) => rc,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        },
    };

    let frame_ms = args.frame_ms;
    let result = if args.realtime {
        let clock = SystemClock::new();
        run_match(&mut rc, args.rounds, || {
            std::thread::sleep(Duration::from_millis(frame_ms));
            clock.now_ms()
        })
    } else {
        let mut clock = ManualClock::default();
        run_match(&mut rc, args.rounds, || clock.advance(frame_ms))
    };

    let board = match result {
        Ok(b) => b,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        },
    };

    if args.json {
        match serde_json::to_string_pretty(&board) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                tracing::error!("Failed to encode scoreboard: {e}");
                return ExitCode::FAILURE;
            },
        }
    } else {
        print!("{}", board.render_text());
    }
    ExitCode::SUCCESS
}
