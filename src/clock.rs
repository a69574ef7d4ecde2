use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use log::debug;

use crate::lap::Lap;
use crate::session::Session;
use crate::util::span_ms;

/// Source of wall-clock instants in epoch milliseconds
pub trait TimeSource {
    fn now_ms(&self) -> i64;
}

/// Production time source backed by the system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Time source that only moves when told to. Clones share the same instant.
#[derive(Clone, Debug, Default)]
pub struct ManualTimeSource {
    now: Arc<AtomicI64>,
}

impl ManualTimeSource {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(start_ms)),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl TimeSource for ManualTimeSource {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Running/paused stopwatch that records laps into a [`Session`].
///
/// Total and open-lap time are each tracked as a committed base plus the
/// instant accrual last resumed. Only start, pause, lap, undo and reset touch
/// the bases; `on_tick` merely refreshes the values stored in the session.
#[derive(Debug)]
pub struct LapTimer<T: TimeSource = SystemTimeSource> {
    session: Session,
    time_source: T,
    base_elapsed: u64,
    base_lap: u64,
    resumed_at: Option<i64>,
    lap_resumed_at: Option<i64>,
}

impl LapTimer<SystemTimeSource> {
    pub fn new(lap_distance: f64) -> Self {
        Self::with_time_source(lap_distance, SystemTimeSource)
    }
}

impl<T: TimeSource> LapTimer<T> {
    pub fn with_time_source(lap_distance: f64, time_source: T) -> Self {
        Self::restore(Session::new(lap_distance), time_source)
    }

    /// Rebuild a timer from a stored session. The timer always comes back paused.
    pub fn restore(mut session: Session, time_source: T) -> Self {
        session.is_running = false;
        Self {
            base_elapsed: session.elapsed_time,
            base_lap: session.current_lap_time,
            session,
            time_source,
            resumed_at: None,
            lap_resumed_at: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn laps(&self) -> &[Lap] {
        &self.session.laps
    }

    pub fn lap_distance(&self) -> f64 {
        self.session.lap_distance
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running
    }

    pub fn has_started(&self) -> bool {
        self.session.has_started()
    }

    pub fn has_laps(&self) -> bool {
        self.session.has_laps()
    }

    /// Live total elapsed time, excluding paused intervals
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_at(self.time_source.now_ms())
    }

    /// Live time of the lap that is still open
    pub fn current_lap_ms(&self) -> u64 {
        self.current_lap_at(self.time_source.now_ms())
    }

    fn elapsed_at(&self, now: i64) -> u64 {
        match self.resumed_at {
            Some(resumed) => self.base_elapsed + span_ms(resumed, now),
            None => self.base_elapsed,
        }
    }

    fn current_lap_at(&self, now: i64) -> u64 {
        match self.lap_resumed_at {
            Some(resumed) => self.base_lap + span_ms(resumed, now),
            None => self.base_lap,
        }
    }

    pub fn start(&mut self) {
        if self.session.is_running {
            return;
        }
        let now = self.time_source.now_ms();
        self.base_elapsed = self.session.elapsed_time;
        self.base_lap = self.session.current_lap_time;
        self.resumed_at = Some(now);
        self.lap_resumed_at = Some(now);

        self.session.is_running = true;
        self.session.start_time.get_or_insert(now);
        self.session.current_lap_start_time.get_or_insert(now);
        debug!("clock started at {now} with {} ms banked", self.base_elapsed);
    }

    pub fn pause(&mut self) {
        if !self.session.is_running {
            return;
        }
        let now = self.time_source.now_ms();
        self.base_elapsed = self.elapsed_at(now);
        self.base_lap = self.current_lap_at(now);
        self.resumed_at = None;
        self.lap_resumed_at = None;

        self.session.is_running = false;
        self.session.elapsed_time = self.base_elapsed;
        self.session.current_lap_time = self.base_lap;
        debug!("clock paused at {} ms", self.base_elapsed);
    }

    /// Refresh the displayed times. Never commits anything.
    pub fn on_tick(&mut self) {
        if !self.session.is_running {
            return;
        }
        let now = self.time_source.now_ms();
        self.session.elapsed_time = self.elapsed_at(now);
        self.session.current_lap_time = self.current_lap_at(now);
    }

    /// Close the open lap. Returns `None` while paused.
    pub fn lap(&mut self) -> Option<&Lap> {
        if !self.session.is_running {
            return None;
        }
        let now = self.time_source.now_ms();
        let lap_time = self.current_lap_at(now);
        let lap = Lap::new(
            self.session.laps.len() + 1,
            lap_time,
            self.session.lap_distance,
        );
        debug!("lap {} recorded: {} ms over {} m", lap.lap_number, lap.time, lap.distance);

        self.base_lap = 0;
        self.lap_resumed_at = Some(now);
        self.session.current_lap_start_time = Some(now);
        self.session.current_lap_time = 0;
        self.session.elapsed_time = self.elapsed_at(now);
        self.session.laps.push(lap);
        self.session.laps.last()
    }

    /// Drop the last lap and fold its time back into the open lap.
    pub fn undo_lap(&mut self) -> Option<Lap> {
        let lap = self.session.laps.pop()?;
        self.base_lap += lap.time;

        let now = self.time_source.now_ms();
        self.session.current_lap_time = self.current_lap_at(now);
        self.session.elapsed_time = self.elapsed_at(now);
        debug!("lap {} undone", lap.lap_number);
        Some(lap)
    }

    pub fn reset(&mut self) {
        self.base_elapsed = 0;
        self.base_lap = 0;
        self.resumed_at = None;
        self.lap_resumed_at = None;
        self.session = Session::new(self.session.lap_distance);
        debug!("clock reset");
    }

    /// Applies to laps recorded from now on.
    pub fn set_lap_distance(&mut self, lap_distance: f64) {
        self.session.lap_distance = lap_distance;
    }
}
