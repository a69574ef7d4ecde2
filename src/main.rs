use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use laptrack::{
    app::{Action, App},
    calories::WeightUnit,
    config::{ConfigError, UserProfile},
    format::summary_report,
    runtime::{CrosstermEventSource, FixedTicker, Runner, TrackEvent},
    stats::compute_stats,
    storage::{self, FileStore},
};
use log::{info, warn};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};

/// indoor running lap timer with pace, split and finish-time analytics
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal lap timer for indoor running. Tap a key every lap and get pace, consistency, split analysis, finish-time projections and a calorie estimate."
)]
pub struct Cli {
    /// lap distance in meters, up to 2000 (remembered between runs)
    #[clap(short = 'd', long)]
    lap_distance: Option<f64>,

    /// runner name shown in the header and race summary
    #[clap(short = 'n', long)]
    name: Option<String>,

    /// body weight, enables the calorie estimate
    #[clap(short = 'w', long)]
    weight: Option<f64>,

    /// unit the weight is given in
    #[clap(short = 'u', long, value_enum, default_value_t = WeightUnit::Kg)]
    unit: WeightUnit,

    /// directory holding the saved session and preferences
    #[clap(long)]
    data_dir: Option<PathBuf>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Command {
    /// print statistics for the saved session and exit
    Summary,
    /// discard the saved session
    Reset,
}

impl Cli {
    fn store(&self) -> FileStore {
        match &self.data_dir {
            Some(dir) => FileStore::with_dir(dir),
            None => FileStore::new(),
        }
    }

    /// Profile implied by the flags, merged over the stored one
    fn profile(&self, stored: Option<&UserProfile>) -> Option<Result<UserProfile, ConfigError>> {
        if self.name.is_none() && self.weight.is_none() {
            return None;
        }
        let name = self
            .name
            .clone()
            .or_else(|| stored.map(|p| p.name.clone()))
            .unwrap_or_else(|| "Runner".to_string());
        let (weight, unit) = match (self.weight, stored) {
            (Some(w), _) => (Some(w), self.unit),
            (None, Some(p)) => (p.display_weight(), p.weight_unit),
            (None, None) => (None, self.unit),
        };
        Some(UserProfile::new(&name, weight, unit))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let store = cli.store();

    match cli.command {
        Some(Command::Summary) => {
            let session = storage::load_session(&store).unwrap_or_default();
            let weight = storage::load_profile(&store).and_then(|p| p.weight_kg());
            print!("{}", summary_report(&compute_stats(&session.laps, weight), &session.laps));
            return Ok(());
        }
        Some(Command::Reset) => {
            storage::clear_session(&store)?;
            println!("session cleared");
            return Ok(());
        }
        None => {}
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::with_file_store(store);
    if let Some(meters) = cli.lap_distance {
        if app.timer.has_started() {
            warn!("lap distance is locked while a session is in progress; reset first");
        } else {
            app.set_lap_distance(meters)?;
        }
    }
    if let Some(profile) = cli.profile(app.profile.as_ref()) {
        app.set_profile(profile?);
    }
    info!("starting with {} m laps", app.timer.lap_distance());

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step(app.is_ticking()) {
            Some(TrackEvent::Tick) => app.on_tick(),
            Some(TrackEvent::Resize) => {}
            Some(TrackEvent::Key(key)) => {
                if app.handle_key(&key) {
                    break;
                }
            }
            None => {
                app.apply(Action::Quit);
                break;
            }
        }
    }

    Ok(())
}
