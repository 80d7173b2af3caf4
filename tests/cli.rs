use assert_cmd::Command;
use chrono::Utc;
use tempfile::{tempdir, TempDir};

use ticket_rush::{
    stats::{SessionStats, StatsRepository},
    store::SqliteStore,
};

fn command(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ticket-rush").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn stats_flag_prints_empty_summary() {
    let home = tempdir().unwrap();
    let db = home.path().join("stats.db");

    let output = command(&home)
        .args(["--db", db.to_str().unwrap(), "--stats"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("attempts: 0"), "unexpected output: {stdout}");
    assert!(stdout.contains("best: -"));
}

#[test]
fn unopenable_database_falls_back_to_empty_stats() {
    let home = tempdir().unwrap();
    let blocker = home.path().join("blocker");
    std::fs::write(&blocker, "a file where a directory should be").unwrap();
    let db = blocker.join("stats.db");

    let output = command(&home)
        .args(["--db", db.to_str().unwrap(), "--stats"])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("attempts: 0"));
}

#[test]
fn stats_flag_reads_saved_attempts() {
    let home = tempdir().unwrap();
    let db = home.path().join("stats.db");
    {
        let mut repository = StatsRepository::new(Box::new(SqliteStore::open(&db).unwrap()));
        let mut stats = SessionStats::default();
        stats.record(300, 420, Utc::now());
        stats.record(500, 1800, Utc::now());
        repository.save(&stats).unwrap();
    }

    let output = command(&home)
        .args(["--db", db.to_str().unwrap(), "--stats"])
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("attempts: 2"), "unexpected output: {stdout}");
    assert!(stdout.contains("best: 300 ms"));
    assert!(stdout.contains("avg: 400 ms"));
    assert!(stdout.contains("avg queue: 1,110"));
}

#[test]
fn reset_stats_flag_clears_database() {
    let home = tempdir().unwrap();
    let db = home.path().join("stats.db");
    {
        let mut repository = StatsRepository::new(Box::new(SqliteStore::open(&db).unwrap()));
        let mut stats = SessionStats::default();
        stats.record(300, 420, Utc::now());
        repository.save(&stats).unwrap();
    }

    command(&home)
        .args(["--db", db.to_str().unwrap(), "--reset-stats"])
        .assert()
        .success();

    let stats = StatsRepository::new(Box::new(SqliteStore::open(&db).unwrap())).load();
    assert_eq!(stats, SessionStats::default());
}

#[test]
#[cfg(target_os = "linux")]
fn save_config_writes_overrides() {
    let home = tempdir().unwrap();
    let db = home.path().join("stats.db");

    command(&home)
        .args([
            "--db",
            db.to_str().unwrap(),
            "--min-wait-ms",
            "250",
            "--columns",
            "10",
            "--save-config",
            "--stats",
        ])
        .assert()
        .success();

    let config_file = home
        .path()
        .join("config")
        .join("ticket-rush")
        .join("config.json");
    let saved = std::fs::read_to_string(&config_file).unwrap();
    let json: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(json["min_wait_ms"], 250);
    assert_eq!(json["columns"], 10);
}

#[test]
fn interactive_mode_requires_a_tty() {
    let home = tempdir().unwrap();
    let db = home.path().join("stats.db");

    command(&home)
        .args(["--db", db.to_str().unwrap()])
        .write_stdin("")
        .assert()
        .failure();
}
