use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use ticket_rush::{
    app::{App, Control},
    config::Config,
    game::{Game, Phase},
    runtime::{EventChannel, RushEvent, Runner, Stamped},
    stats::StatsRepository,
    store::MemoryStore,
    ui,
};

const AREA: Rect = Rect {
    x: 0,
    y: 0,
    width: 80,
    height: 24,
};

fn instant_config() -> Config {
    Config {
        min_wait_ms: 0,
        max_wait_ms: 0,
        ..Config::default()
    }
}

fn new_app(config: Config) -> App {
    let repository = StatsRepository::new(Box::new(MemoryStore::new()));
    App::new(Game::new(config, repository, Some(21), Instant::now()))
}

/// Drive the app from the runner until `done` holds or the step budget runs out
fn pump(runner: &Runner, app: &mut App, steps: u32, done: impl Fn(&App) -> bool) -> bool {
    for _ in 0..steps {
        let Stamped { event, at: now } = runner.step();
        match event {
            RushEvent::Key(key) => {
                if app.on_key(key, now) == Control::Quit {
                    return done(app);
                }
            }
            RushEvent::Mouse(mouse) => app.on_mouse(mouse, AREA),
            RushEvent::Resize | RushEvent::Tick => {}
        }
        app.on_tick(now);
        if done(app) {
            return true;
        }
    }
    false
}

fn target_of(app: &App) -> u32 {
    match app.game.phase() {
        Phase::Ticketing(round) => round.target,
        other => panic!("expected ticketing, got {other:?}"),
    }
}

#[test]
fn headless_click_and_reserve_flow() {
    let mut app = new_app(instant_config());
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(EventChannel::new(rx), Duration::from_millis(5));

    assert!(pump(&runner, &mut app, 50, |a| matches!(
        a.game.phase(),
        Phase::Ticketing(_)
    )));

    let target = target_of(&app);
    let cell = ui::seat_grid_layout(AREA, app.game.config())
        .cell_rect(target)
        .expect("target seat should be on screen");

    tx.send(RushEvent::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: cell.x + 2,
        row: cell.y,
        modifiers: KeyModifiers::NONE,
    }))
    .unwrap();
    tx.send(RushEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
        .unwrap();

    assert!(pump(&runner, &mut app, 50, |a| matches!(
        a.game.phase(),
        Phase::Result(_)
    )));

    let Phase::Result(result) = app.game.phase() else {
        unreachable!();
    };
    assert_eq!(result.seat, target);
    assert!(result.attempt.queue_position >= 1);
    assert_eq!(app.game.summary().attempts, 1);
}

#[test]
fn headless_wrong_seat_cannot_be_reserved() {
    let mut app = new_app(instant_config());
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(EventChannel::new(rx), Duration::from_millis(5));

    assert!(pump(&runner, &mut app, 50, |a| matches!(
        a.game.phase(),
        Phase::Ticketing(_)
    )));

    let Phase::Ticketing(round) = app.game.phase().clone() else {
        unreachable!();
    };
    let wrong = round
        .available
        .iter()
        .copied()
        .find(|&s| s != round.target)
        .expect("round has decoy seats");
    let cell = ui::seat_grid_layout(AREA, app.game.config())
        .cell_rect(wrong)
        .expect("decoy visible");

    tx.send(RushEvent::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: cell.x,
        row: cell.y,
        modifiers: KeyModifiers::NONE,
    }))
    .unwrap();
    tx.send(RushEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
        .unwrap();

    pump(&runner, &mut app, 10, |_| false);

    match app.game.phase() {
        Phase::Ticketing(round) => assert_eq!(round.selected, Some(wrong)),
        other => panic!("wrong seat must not reserve, got {other:?}"),
    }
    assert_eq!(app.game.summary().attempts, 0);
}

#[test]
fn headless_retry_starts_a_new_wait() {
    let mut app = new_app(Config {
        min_wait_ms: 30,
        max_wait_ms: 30,
        ..Config::default()
    });
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(EventChannel::new(rx), Duration::from_millis(5));

    assert!(pump(&runner, &mut app, 200, |a| matches!(
        a.game.phase(),
        Phase::Ticketing(_)
    )));
    app.cursor = target_of(&app);
    for code in [KeyCode::Char(' '), KeyCode::Enter, KeyCode::Char('r')] {
        tx.send(RushEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
            .unwrap();
    }

    assert!(pump(&runner, &mut app, 3, |a| a.game.summary().attempts == 1));
    pump(&runner, &mut app, 1, |_| false);
    assert!(matches!(
        app.game.phase(),
        Phase::Waiting(_) | Phase::Ticketing(_)
    ));

    tx.send(RushEvent::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)))
        .unwrap();
    assert!(pump(&runner, &mut app, 5, |a| a.game.summary().attempts == 1));
}

#[test]
fn headless_reaction_time_covers_the_full_wait() {
    let mut app = new_app(instant_config());
    let (tx, rx) = mpsc::channel();
    // a long tick keeps the runner blocked while the key is in flight
    let runner = Runner::new(EventChannel::new(rx), Duration::from_millis(400));

    assert!(pump(&runner, &mut app, 5, |a| matches!(
        a.game.phase(),
        Phase::Ticketing(_)
    )));
    let target = target_of(&app);
    app.game.select_seat(target);

    let delay = Duration::from_millis(120);
    let sender = thread::spawn(move || {
        thread::sleep(delay);
        tx.send(RushEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
            .unwrap();
    });

    assert!(pump(&runner, &mut app, 3, |a| matches!(
        a.game.phase(),
        Phase::Result(_)
    )));
    sender.join().unwrap();

    let Phase::Result(result) = app.game.phase() else {
        unreachable!();
    };
    assert!(
        result.attempt.reaction_time >= delay.as_millis() as u64,
        "reaction {} ms is shorter than the {} ms the player waited",
        result.attempt.reaction_time,
        delay.as_millis()
    );
}
