use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
use ticket_rush::{
    app::{App, Control},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    game::Game,
    logging,
    runtime::{EventChannel, RushEvent, Runner, Stamped},
    stats::StatsRepository,
    store::{KeyValueStore, MemoryStore, SqliteStore},
};

/// practice grabbing a seat the moment tickets go on sale
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal trainer for ticket rushes: wait for the sale to open, find your seat in the hall, reserve it, and see where your reaction time would have put you in the queue."
)]
pub struct Cli {
    /// shortest wait before the sale opens, in milliseconds
    #[clap(long)]
    min_wait_ms: Option<u64>,

    /// longest wait before the sale opens, in milliseconds
    #[clap(long)]
    max_wait_ms: Option<u64>,

    /// number of seats in the hall
    #[clap(long)]
    seats: Option<u32>,

    /// seats per row
    #[clap(long)]
    columns: Option<u16>,

    /// seed for reproducible rounds
    #[clap(long)]
    seed: Option<u64>,

    /// statistics database to use instead of the default location
    #[clap(long)]
    db: Option<PathBuf>,

    /// print saved statistics and exit
    #[clap(long)]
    stats: bool,

    /// clear saved statistics and exit
    #[clap(long)]
    reset_stats: bool,

    /// write the effective settings to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer command line overrides on top of the stored config
    fn apply(&self, base: Config) -> Config {
        Config {
            min_wait_ms: self.min_wait_ms.unwrap_or(base.min_wait_ms),
            max_wait_ms: self.max_wait_ms.unwrap_or(base.max_wait_ms),
            total_seats: self.seats.unwrap_or(base.total_seats),
            columns: self.columns.unwrap_or(base.columns),
            ..base
        }
        .sanitized()
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(AppDirs::log_path().as_deref()) {
        eprintln!("logging disabled: {e}");
    }

    let config_store = FileConfigStore::new();
    let config = cli.apply(config_store.load());
    if cli.save_config {
        config_store.save(&config)?;
        log::info!("saved config to {}", config_store.path().display());
    }

    let mut repository = StatsRepository::new(open_store(cli.db.as_deref()));

    if cli.reset_stats {
        repository.clear()?;
        println!("statistics cleared");
        return Ok(());
    }
    if cli.stats {
        println!("{}", repository.load().summary());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let game = Game::new(config, repository, cli.seed, Instant::now());
    let mut app = App::new(game);
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen,
    )?;
    terminal.show_cursor()?;

    result
}

/// SQLite at `db` or the default location, or an in-memory store when the
/// database cannot be opened so the session still runs
fn open_store(db: Option<&Path>) -> Box<dyn KeyValueStore> {
    let opened = match db {
        Some(path) => SqliteStore::open(path),
        None => SqliteStore::open_default(),
    };
    match opened {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::error!("Failed to open stats database, statistics will not be saved: {e}");
            Box::new(MemoryStore::new())
        }
    }
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let tick = Duration::from_millis(app.game.config().tick_ms);
    let runner = Runner::new(EventChannel::crossterm(), tick);

    let mut area = Rect::default();
    terminal.draw(|f| {
        area = f.area();
        f.render_widget(&*app, area);
    })?;

    loop {
        let Stamped { event, at: now } = runner.step();
        let mut redraw = match event {
            RushEvent::Key(key) => match app.on_key(key, now) {
                Control::Quit => break,
                Control::OpenUrl(url) => {
                    if let Err(e) = webbrowser::open(&url) {
                        log::warn!("could not open browser: {e}");
                    }
                    true
                }
                Control::Continue => true,
            },
            RushEvent::Mouse(mouse) => {
                app.on_mouse(mouse, area);
                true
            }
            RushEvent::Resize => true,
            RushEvent::Tick => false,
        };

        // timers are polled after every event so key bursts cannot starve the countdown
        redraw |= app.on_tick(now);

        if redraw {
            terminal.draw(|f| {
                area = f.area();
                f.render_widget(&*app, area);
            })?;
        }
    }

    Ok(())
}
