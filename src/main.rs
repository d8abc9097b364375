use std::io;
use std::panic;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use grid_snake::app::{App, Control};
use grid_snake::food::FoodSpawner;
use grid_snake::game::GameSession;
use grid_snake::input::map_key_event;
use grid_snake::logging::{default_log_path, init_logging};
use grid_snake::renderer;
use grid_snake::score::FileHighScoreStore;
use grid_snake::settings::{user_settings_path, Settings, SettingsOverrides};
use grid_snake::terminal_runtime::{cleanup_terminal_best_effort, TerminalSession};
use log::{info, LevelFilter};

#[derive(Debug, Parser)]
#[command(name = "grid-snake", version, about = "Grid snake for the terminal")]
struct Cli {
    /// Grid width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Simulation ticks per second.
    #[arg(long = "tick-rate")]
    tick_rate: Option<u32>,

    /// Seed for reproducible food placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Never spawn food on the snake or on other food.
    #[arg(long = "avoid-occupied-spawn")]
    avoid_occupied_spawn: bool,

    /// High score record (defaults to the platform data directory).
    #[arg(long = "high-score-file")]
    high_score_file: Option<PathBuf>,

    /// Settings file (defaults to the platform config directory).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log file (defaults to the platform data directory).
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace.
    #[arg(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    if let Err(error) = init_logging(&log_path, cli.log_level) {
        eprintln!("Logging disabled: {error}");
    }

    let settings = load_settings(&cli);
    let grid = settings.grid();
    let policy = settings.spawn_policy();
    let session = match cli.seed {
        Some(seed) => GameSession::with_spawner(grid, FoodSpawner::with_seed(policy, seed)),
        None => GameSession::new(grid, policy),
    }
    .with_tick_rate(settings.ticks_per_second);

    let store = cli
        .high_score_file
        .clone()
        .map_or_else(FileHighScoreStore::at_default_path, FileHighScoreStore::new);
    info!(
        "starting {}x{} grid at {} ticks/s, {:?} spawns, high score file {}",
        grid.width,
        grid.height,
        settings.ticks_per_second,
        policy,
        store.path().display()
    );
    let mut app = App::new(session, Box::new(store));

    install_panic_hook();

    let mut terminal = TerminalSession::enter()?;
    app.set_release_events(terminal.release_events());
    let result = run(&mut terminal, &mut app);
    drop(terminal);

    info!("exiting with high score {}", app.high_score());
    result
}

fn load_settings(cli: &Cli) -> Settings {
    let overrides = SettingsOverrides {
        grid_width: cli.width,
        grid_height: cli.height,
        ticks_per_second: cli.tick_rate,
        avoid_occupied_spawn: cli.avoid_occupied_spawn,
    };

    let from_file = match cli.settings.clone().or_else(user_settings_path) {
        Some(path) => Settings::load(&path).unwrap_or_else(|error| {
            eprintln!("Ignoring settings: {error}");
            Settings::default()
        }),
        None => Settings::default(),
    };

    let settings = from_file.with_overrides(overrides);
    match settings.validate() {
        Ok(()) => settings,
        Err(error) => {
            eprintln!("Ignoring command-line overrides: {error}");
            from_file
        }
    }
}

fn run(terminal: &mut TerminalSession, app: &mut App) -> io::Result<()> {
    let snapshot = app.snapshot();
    terminal
        .terminal_mut()
        .draw(|frame| renderer::render(frame, &snapshot))?;

    let mut next_tick = Instant::now() + app.session().tick_interval();

    loop {
        let now = Instant::now();
        if next_tick > now {
            thread::sleep(next_tick - now);
        }

        if drain_input(app)? == Control::Quit {
            return Ok(());
        }

        app.tick();

        let snapshot = app.snapshot();
        terminal
            .terminal_mut()
            .draw(|frame| renderer::render(frame, &snapshot))?;

        next_tick += app.session().tick_interval();
        let now = Instant::now();
        if next_tick < now {
            next_tick = now + app.session().tick_interval();
        }
    }
}

fn drain_input(app: &mut App) -> io::Result<Control> {
    while event::poll(Duration::ZERO)? {
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match key.kind {
            KeyEventKind::Release => app.release(),
            KeyEventKind::Repeat => {}
            KeyEventKind::Press => {
                let Some(input) = map_key_event(key) else {
                    continue;
                };
                if app.handle_input(input) == Control::Quit {
                    return Ok(Control::Quit);
                }
            }
        }
    }

    Ok(Control::Continue)
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = cleanup_terminal_best_effort(true);
        default_hook(panic_info);
    }));
}
