//! Replay determinism
//!
//! A materialized log must replay to the same state, hash the same after a
//! save/load cycle, and a match resumed from a snapshot must continue
//! exactly as the uninterrupted one would have.

use realms_engine::config::GameConfig;
use realms_engine::core::PlayerId;
use realms_engine::events::{GameAction, LogicalClock};
use realms_engine::game::simulate::next_roots;
use realms_engine::game::{
    compute_state_hash, replay, Engine, GameLoop, GameSnapshot, GameState, SeededShuffler, VerbosityLevel,
};
use realms_engine::loader::CardRegistry;
use similar_asserts::assert_eq;

fn players() -> Vec<PlayerId> {
    vec![PlayerId::new("alice"), PlayerId::new("bob")]
}

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("realms_{}_{}.json", name, std::process::id()))
}

/// Drive `steps` greedy root batches, returning each batch as submitted
fn greedy_batches(engine: &mut Engine<'_>, base: &GameState, steps: usize) -> Vec<Vec<GameAction>> {
    let mut state = base.clone();
    let mut batches = Vec::new();
    let mut clock = LogicalClock::new();
    for _ in 0..steps {
        let roots = next_roots(&state, engine.registry()).unwrap();
        if roots.is_empty() || state.is_game_over() {
            break;
        }
        let stamped: Vec<_> = roots.iter().cloned().map(|a| a.stamped(&mut clock)).collect();
        state = engine.materialize(&state, &stamped).unwrap().state;
        batches.push(roots);
    }
    batches
}

#[test]
fn test_materialize_and_replay_agree() {
    let registry = CardRegistry::standard();
    let mut engine = Engine::seeded(registry, 3);
    engine.logger_mut().set_verbosity(VerbosityLevel::Silent);
    let base = engine.setup(&players()).unwrap();

    let result = GameLoop::new(&mut engine)
        .with_max_turns(40)
        .run_game(&base, &mut LogicalClock::new())
        .unwrap();

    let replayed = replay(&base, &result.events, registry).unwrap();
    assert_eq!(replayed, result.state);
    assert_eq!(compute_state_hash(&replayed), compute_state_hash(&result.state));

    // Replaying twice never diverges
    assert_eq!(replay(&base, &result.events, registry).unwrap(), replayed);
}

#[test]
fn test_same_seed_same_match() {
    let registry = CardRegistry::standard();
    let play = |seed| {
        let mut engine = Engine::seeded(registry, seed);
        engine.logger_mut().set_verbosity(VerbosityLevel::Silent);
        let base = engine.setup(&players()).unwrap();
        GameLoop::new(&mut engine)
            .with_max_turns(30)
            .run_game(&base, &mut LogicalClock::new())
            .unwrap()
    };

    let a = play(99);
    let b = play(99);
    assert_eq!(a.events, b.events);
    assert_eq!(a.state, b.state);
    assert_eq!(a.end_reason, b.end_reason);
}

#[test]
fn test_snapshot_reload_hashes_the_same() {
    let registry = CardRegistry::standard();
    let mut engine = Engine::seeded(registry, 8);
    engine.logger_mut().set_verbosity(VerbosityLevel::Silent);
    let base = engine.setup(&players()).unwrap();
    let result = GameLoop::new(&mut engine)
        .with_max_turns(20)
        .run_game(&base, &mut LogicalClock::new())
        .unwrap();

    let mut snapshot = GameSnapshot::new(base, GameConfig::default());
    snapshot.events = result.events.clone().into();

    let path = temp_path("hash");
    snapshot.save_to_file(&path).unwrap();
    let loaded = GameSnapshot::load_from_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let state = loaded.current_state(registry).unwrap();
    assert_eq!(compute_state_hash(&state), compute_state_hash(&result.state));
    assert_eq!(state, result.state);
}

#[test]
fn test_resumed_match_matches_uninterrupted_one() {
    let registry = CardRegistry::standard();
    let config = GameConfig::default();

    // Reference run, never saved
    let mut reference_shuffler = SeededShuffler::new(21);
    let (base, batches) = {
        let mut engine = Engine::new(registry, config.clone(), Box::new(&mut reference_shuffler));
        engine.logger_mut().set_verbosity(VerbosityLevel::Silent);
        let base = engine.setup(&players()).unwrap();
        let batches = greedy_batches(&mut engine, &base, 120);
        (base, batches)
    };
    let split = batches.len() / 2;
    assert!(split > 0);

    let stamp = |batch: &[GameAction], t: u64| -> Vec<_> { batch.iter().cloned().map(|a| a.at(t)).collect() };

    // Uninterrupted run over the same batches
    let mut straight = SeededShuffler::new(21);
    let full = {
        let mut engine = Engine::new(registry, config.clone(), Box::new(&mut straight));
        engine.logger_mut().set_verbosity(VerbosityLevel::Silent);
        let start = engine.setup(&players()).unwrap();
        assert_eq!(start, base);
        let mut state = start;
        for (t, batch) in batches.iter().enumerate() {
            state = engine.materialize(&state, &stamp(batch, t as u64)).unwrap().state;
        }
        state
    };

    // First half, save, reload, second half
    let mut first = SeededShuffler::new(21);
    let mut snapshot = {
        let mut engine = Engine::new(registry, config.clone(), Box::new(&mut first));
        engine.logger_mut().set_verbosity(VerbosityLevel::Silent);
        let start = engine.setup(&players()).unwrap();
        let mut snapshot = GameSnapshot::new(start.clone(), config.clone());
        let mut state = start;
        for (t, batch) in batches[..split].iter().enumerate() {
            let step = engine.materialize(&state, &stamp(batch, t as u64)).unwrap();
            snapshot.append(&step);
            state = step.state;
        }
        snapshot
    };
    snapshot.shuffler = Some(first);

    let path = temp_path("resume");
    snapshot.save_to_file(&path).unwrap();
    let mut loaded = GameSnapshot::load_from_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let mut resumed = loaded.shuffler.take().unwrap_or_default();
    let finished = {
        let mut engine = Engine::new(registry, loaded.config.clone(), Box::new(&mut resumed));
        engine.logger_mut().set_verbosity(VerbosityLevel::Silent);
        let mut state = loaded.current_state(registry).unwrap();
        for (t, batch) in batches[split..].iter().enumerate() {
            state = engine.materialize(&state, &stamp(batch, (split + t) as u64)).unwrap().state;
        }
        state
    };

    assert_eq!(compute_state_hash(&finished), compute_state_hash(&full));
    assert_eq!(finished, full);
}
