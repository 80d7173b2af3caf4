use std::time::{Duration, Instant};

use chrono::Utc;
use tempfile::tempdir;

use ticket_rush::{
    config::Config,
    game::{Game, Phase},
    stats::{SessionStats, StatsRepository, HISTORY_LIMIT, STATS_KEY},
    store::{KeyValueStore, SqliteStore},
};

fn repository_at(path: &std::path::Path) -> StatsRepository {
    StatsRepository::new(Box::new(SqliteStore::open(path).expect("open sqlite store")))
}

#[test]
fn stats_survive_reopening_the_database() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("nested").join("stats.db");

    {
        let mut repository = repository_at(&db);
        let mut stats = SessionStats::default();
        stats.record(420, 510, Utc::now());
        stats.record(250, 320, Utc::now());
        repository.save(&stats).unwrap();
    }

    let loaded = repository_at(&db).load();
    assert_eq!(loaded.attempt_count, 2);
    assert_eq!(loaded.best_time, Some(250));
    assert_eq!(loaded.reaction_times, vec![420, 250]);
    assert_eq!(loaded.history.len(), 2);
    assert_eq!(loaded.history.back().map(|a| a.attempt), Some(2));
}

#[test]
fn game_rounds_are_persisted_and_history_is_capped() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("stats.db");
    let config = Config {
        min_wait_ms: 0,
        max_wait_ms: 0,
        ..Config::default()
    };

    let mut now = Instant::now();
    let mut game = Game::new(config, repository_at(&db), Some(4), now);
    let rounds = HISTORY_LIMIT as u64 + 5;
    for i in 0..rounds {
        now += Duration::from_millis(10);
        game.on_tick(now);
        let target = match game.phase() {
            Phase::Ticketing(round) => round.target,
            other => panic!("expected ticketing, got {other:?}"),
        };
        game.select_seat(target);
        game.reserve(now + Duration::from_millis(200 + i)).expect("reserve");
        game.start_round(now);
    }
    drop(game);

    let stats = repository_at(&db).load();
    assert_eq!(stats.attempt_count, rounds);
    assert_eq!(stats.history.len(), HISTORY_LIMIT);
    assert_eq!(stats.history.front().map(|a| a.attempt), Some(6));
    assert_eq!(stats.history.back().map(|a| a.attempt), Some(rounds));
    assert_eq!(stats.reaction_times.len() as u64, rounds);
    assert_eq!(stats.best_time, Some(200));
}

#[test]
fn corrupt_blob_falls_back_to_empty_stats() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("stats.db");

    let mut store = SqliteStore::open(&db).unwrap();
    store.set(STATS_KEY, "{not json").unwrap();
    drop(store);

    let repository = repository_at(&db);
    assert!(repository.try_load().is_err());
    assert_eq!(repository.load(), SessionStats::default());
}

#[test]
fn clearing_removes_saved_stats() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("stats.db");

    let mut repository = repository_at(&db);
    let mut stats = SessionStats::default();
    stats.record(300, 400, Utc::now());
    repository.save(&stats).unwrap();
    repository.clear().unwrap();

    let store = SqliteStore::open(&db).unwrap();
    assert_eq!(store.get(STATS_KEY).unwrap(), None);
    assert_eq!(repository_at(&db).load(), SessionStats::default());
}
