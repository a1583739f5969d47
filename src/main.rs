use chromatap::{
    app::{App, AppAction},
    app_dirs::AppDirs,
    color::RandomColorSource,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    record::{MemoryRecordStore, RecordStore, SqliteRecordStore},
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, Runner},
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};

/// color reaction tui: hit the matching color before the countdown runs out
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A color reaction game for the terminal. A target color is shown; press its key before the countdown expires. Scores are kept for the session and the best-ever score is stored between runs."
)]
pub struct Cli {
    /// length of a round in seconds
    #[clap(short = 's', long, value_parser = clap::value_parser!(u32).range(1..))]
    round_secs: Option<u32>,

    /// milliseconds per countdown step
    #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: Option<u64>,

    /// seed for a reproducible color sequence
    #[clap(long)]
    seed: Option<u64>,

    /// config file to use instead of the default location
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// write the effective settings back to the config file
    #[clap(long)]
    save_config: bool,

    /// keep the best-ever record in memory only
    #[clap(long)]
    no_records: bool,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Stored config with command line overrides applied
    fn resolve_config(&self, store: &impl ConfigStore) -> Config {
        store
            .load()
            .with_overrides(self.round_secs, self.tick_ms, self.seed)
            .sanitized()
    }

    fn record_store(&self) -> Box<dyn RecordStore> {
        if self.no_records {
            return Box::new(MemoryRecordStore::new());
        }
        match SqliteRecordStore::new() {
            Ok(store) => Box::new(store),
            Err(e) => {
                tracing::warn!("record database unavailable, keeping records in memory: {e}");
                Box::new(MemoryRecordStore::new())
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let _log_guard = AppDirs::log_dir().and_then(|dir| logging::init(&dir));

    let config_store = cli.config_store();
    let config = cli.resolve_config(&config_store);
    if cli.save_config {
        config_store.save(&config)?;
        tracing::info!(path = %config_store.path().display(), "config saved");
    }
    tracing::info!(?config, "starting");

    let ticker = FixedTicker::from_millis(config.tick_ms);
    let source = Box::new(RandomColorSource::from_seed(config.seed));
    let mut app = App::new(config, source, cli.record_store());

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, ticker);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!("exited with error: {e}");
    }
    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    ticker: FixedTicker,
) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(CrosstermEventSource::new(), ticker);

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            GameEvent::Tick => app.on_tick(),
            GameEvent::Resize => {}
            GameEvent::Key(key) => match app.on_key(key) {
                AppAction::Quit => break,
                // the first second of a round gets the full interval
                AppAction::RoundStarted => runner.reset_schedule(),
                AppAction::None => {}
            },
        }
    }

    Ok(())
}
