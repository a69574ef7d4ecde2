use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{info, warn};

use crate::clock::{LapTimer, SystemTimeSource, TimeSource};
use crate::config::{cycle_preset, validate_lap_distance, ConfigError, UserProfile};
use crate::lap::Lap;
use crate::stats::{compute_stats, RunStats};
use crate::storage::{self, FileStore, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Tracking,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    StartPause,
    Lap,
    UndoLap,
    Reset,
    Finish,
    NewRace,
    NextPreset,
    PrevPreset,
    Quit,
}

impl Action {
    pub fn from_key(key: &KeyEvent, screen: Screen) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }
        match (screen, key.code) {
            (_, KeyCode::Esc) | (_, KeyCode::Char('q')) => Some(Action::Quit),
            (Screen::Tracking, KeyCode::Char(' ')) => Some(Action::StartPause),
            (Screen::Tracking, KeyCode::Char('l')) | (Screen::Tracking, KeyCode::Enter) => {
                Some(Action::Lap)
            }
            (Screen::Tracking, KeyCode::Char('u')) | (Screen::Tracking, KeyCode::Backspace) => {
                Some(Action::UndoLap)
            }
            (Screen::Tracking, KeyCode::Char('r')) => Some(Action::Reset),
            (Screen::Tracking, KeyCode::Char('f')) => Some(Action::Finish),
            (Screen::Tracking, KeyCode::Char('+')) | (Screen::Tracking, KeyCode::Right) => {
                Some(Action::NextPreset)
            }
            (Screen::Tracking, KeyCode::Char('-')) | (Screen::Tracking, KeyCode::Left) => {
                Some(Action::PrevPreset)
            }
            (Screen::Summary, KeyCode::Char('n')) => Some(Action::NewRace),
            _ => None,
        }
    }
}

/// Host state: the lap timer plus the preferences and storage around it.
pub struct App<S: KeyValueStore = FileStore, T: TimeSource = SystemTimeSource> {
    pub timer: LapTimer<T>,
    pub profile: Option<UserProfile>,
    pub screen: Screen,
    /// laps frozen when the race was finished
    pub final_laps: Vec<Lap>,
    store: S,
}

impl App {
    pub fn with_file_store(store: FileStore) -> Self {
        Self::new(store, SystemTimeSource)
    }
}

impl<S: KeyValueStore, T: TimeSource> App<S, T> {
    /// Restore the last session and preferences from `store`.
    pub fn new(store: S, time_source: T) -> Self {
        let lap_distance = storage::load_lap_distance(&store);
        let profile = storage::load_profile(&store);

        let mut timer = match storage::load_session(&store) {
            Some(session) => {
                info!("restored session with {} laps", session.laps.len());
                LapTimer::restore(session, time_source)
            }
            None => LapTimer::with_time_source(lap_distance, time_source),
        };
        timer.set_lap_distance(lap_distance);

        Self {
            timer,
            profile,
            screen: Screen::Tracking,
            final_laps: Vec::new(),
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn weight_kg(&self) -> Option<f64> {
        self.profile.as_ref().and_then(UserProfile::weight_kg)
    }

    /// Statistics for the screen being shown
    pub fn stats(&self) -> RunStats<'_> {
        let laps = match self.screen {
            Screen::Tracking => self.timer.laps(),
            Screen::Summary => self.final_laps.as_slice(),
        };
        compute_stats(laps, self.weight_kg())
    }

    /// The display only needs refreshing while the clock runs.
    pub fn is_ticking(&self) -> bool {
        self.screen == Screen::Tracking && self.timer.is_running()
    }

    pub fn on_tick(&mut self) {
        self.timer.on_tick();
    }

    /// Apply a user action. Returns `true` when the app should exit.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::StartPause => {
                if self.timer.is_running() {
                    self.timer.pause();
                } else {
                    self.timer.start();
                }
                self.persist();
            }
            Action::Lap => {
                if self.timer.lap().is_some() {
                    self.persist();
                }
            }
            Action::UndoLap => {
                if self.timer.undo_lap().is_some() {
                    self.persist();
                }
            }
            Action::Reset => self.reset(),
            Action::Finish => {
                if self.timer.has_started() {
                    self.timer.pause();
                    self.persist();
                    self.final_laps = self.timer.laps().to_vec();
                    self.screen = Screen::Summary;
                }
            }
            Action::NewRace => {
                self.reset();
                self.final_laps.clear();
                self.screen = Screen::Tracking;
            }
            Action::NextPreset | Action::PrevPreset => {
                // the distance is locked once the run has started
                if !self.timer.has_started() {
                    let next = cycle_preset(self.timer.lap_distance(), action == Action::NextPreset);
                    if let Err(e) = self.set_lap_distance(next) {
                        warn!("{e}");
                    }
                }
            }
            Action::Quit => {
                self.on_tick();
                self.persist();
                return true;
            }
        }
        false
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match Action::from_key(key, self.screen) {
            Some(action) => self.apply(action),
            None => false,
        }
    }

    pub fn set_lap_distance(&mut self, meters: f64) -> Result<(), ConfigError> {
        let meters = validate_lap_distance(meters)?;
        self.timer.set_lap_distance(meters);
        if let Err(e) = storage::save_lap_distance(&self.store, meters) {
            warn!("could not save lap distance: {e}");
        }
        self.persist();
        Ok(())
    }

    pub fn set_profile(&mut self, profile: UserProfile) {
        if let Err(e) = storage::save_profile(&self.store, &profile) {
            warn!("could not save profile: {e}");
        }
        self.profile = Some(profile);
    }

    fn reset(&mut self) {
        self.timer.reset();
        if let Err(e) = storage::clear_session(&self.store) {
            warn!("could not clear stored session: {e}");
        }
    }

    fn persist(&self) {
        if let Err(e) = storage::save_session(&self.store, self.timer.session()) {
            warn!("could not save session: {e}");
        }
    }
}
