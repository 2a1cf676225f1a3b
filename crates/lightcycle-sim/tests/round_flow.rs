//! Whole-round flows driven through the round controller with virtual time.

use lightcycle_core::events::GameEvent;
use lightcycle_core::test_helpers::make_bots;
use lightcycle_core::time::{Clock, ManualClock};
use lightcycle_sim::config::ArenaConfig;
use lightcycle_sim::mode::GameMode;
use lightcycle_sim::round::{RoundController, default_roster};

const FRAME_MS: u64 = 20;
const MAX_FRAMES: usize = 20_000;

fn small_arena(seed: u64) -> ArenaConfig {
    ArenaConfig {
        grid_size: 40,
        players: 4,
        human_players: 0,
        seed: Some(seed),
        ..ArenaConfig::default()
    }
}

/// Run frames until the round is over. Returns every event emitted.
fn play_round(rc: &mut RoundController, clock: &mut ManualClock) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..MAX_FRAMES {
        let report = rc.idle(clock.advance(FRAME_MS));
        events.extend(report.events);
        if rc.mode() == GameMode::RoundOver {
            return events;
        }
    }
    panic!("round did not finish within {MAX_FRAMES} frames");
}

#[test]
fn bot_round_runs_to_completion() {
    let mut clock = ManualClock::default();
    let mut rc = RoundController::new(small_arena(1), make_bots(4)).unwrap();
    rc.start_match(clock.now_ms()).unwrap();

    let events = play_round(&mut rc, &mut clock);

    let round = rc.sim().round();
    assert!(round.finished);
    assert!(round.running <= 1);
    let completions: Vec<_> = events.iter().filter(|e| e.is_round_complete()).collect();
    assert_eq!(completions.len(), 1);

    let crashes = events
        .iter()
        .filter(|e| matches!(e, GameEvent::CycleCrashed { .. }))
        .count();
    assert!(crashes >= 3);
    if let Some(winner) = round.winner {
        assert!(rc.sim().cycle(winner).unwrap().is_alive());
        // The winner outlived every other cycle.
        assert_eq!(rc.sim().scores()[winner], 3);
    }
}

#[test]
fn collision_cells_stay_inside_the_arena() {
    let mut clock = ManualClock::default();
    let mut rc = RoundController::new(small_arena(2), make_bots(4)).unwrap();
    rc.start_match(clock.now_ms()).unwrap();

    for event in play_round(&mut rc, &mut clock) {
        if let GameEvent::CycleCrashed { x, y, .. } = event {
            assert!((0..40).contains(&x), "x={x}");
            assert!((0..40).contains(&y), "y={y}");
        }
    }
}

#[test]
fn same_seed_same_round() {
    let outcome = |seed| {
        let mut clock = ManualClock::default();
        let mut rc = RoundController::new(small_arena(seed), make_bots(4)).unwrap();
        rc.start_match(clock.now_ms()).unwrap();
        let events = play_round(&mut rc, &mut clock);
        (events, rc.sim().scores(), rc.sim().elapsed_ms())
    };
    assert_eq!(outcome(9), outcome(9));
}

#[test]
fn demo_rounds_never_score() {
    let config = ArenaConfig {
        demo_mode: true,
        human_players: 1,
        ..small_arena(4)
    };
    let roster = default_roster(&config);
    let mut clock = ManualClock::default();
    let mut rc = RoundController::new(config, roster).unwrap();
    assert!(rc.players().iter().all(|p| p.pilot.is_computer()));
    rc.start_match(clock.now_ms()).unwrap();

    let events = play_round(&mut rc, &mut clock);
    assert!(!events.iter().any(|e| matches!(e, GameEvent::ScoreUpdate { .. })));
    assert!(rc.sim().scores().iter().all(|&s| s == 0));
}

#[test]
fn scores_carry_across_rounds_until_a_new_match() {
    let mut clock = ManualClock::default();
    let mut rc = RoundController::new(small_arena(6), make_bots(4)).unwrap();
    rc.start_match(clock.now_ms()).unwrap();
    play_round(&mut rc, &mut clock);
    let first: u32 = rc.sim().scores().iter().sum();
    assert!(first > 0);

    rc.play_again(clock.now_ms()).unwrap();
    assert_eq!(rc.sim().round().number, 2);
    assert_eq!(rc.sim().grid().occupied_count(), 4);
    play_round(&mut rc, &mut clock);
    let second: u32 = rc.sim().scores().iter().sum();
    assert!(second > first);

    rc.return_to_menu().unwrap();
    rc.start_match(clock.now_ms()).unwrap();
    assert_eq!(rc.sim().scores(), vec![0; 4]);
}

#[test]
fn snapshot_dumps_as_json() {
    let mut clock = ManualClock::default();
    let mut rc = RoundController::new(small_arena(3), make_bots(4)).unwrap();
    rc.start_match(clock.now_ms()).unwrap();
    for _ in 0..10 {
        rc.idle(clock.advance(FRAME_MS));
    }
    let json = serde_json::to_string(rc.sim()).unwrap();
    assert!(json.contains("\"cycles\""));
    assert!(json.contains("\"Alive\""));
}
