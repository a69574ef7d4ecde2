use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Display refresh cadence while the clock runs
pub const TICK_RATE_MS: u64 = 50;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum TrackEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait TrackEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<TrackEvent, RecvTimeoutError>;

    /// Block until an event arrives. `None` once the source is gone.
    fn recv(&self) -> Option<TrackEvent>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<TrackEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        // exits on the first send after the receiver is dropped
        std::thread::spawn(move || loop {
            let ev = match event::read() {
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => TrackEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => TrackEvent::Resize,
                Ok(_) => continue,
                Err(_) => break,
            };
            if tx.send(ev).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TrackEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn recv(&self) -> Option<TrackEvent> {
        self.rx.recv().ok()
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<TrackEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<TrackEvent>) -> Self {
        Self { rx }
    }
}

impl TrackEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TrackEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn recv(&self) -> Option<TrackEvent> {
        self.rx.recv().ok()
    }
}

/// Runner that advances the application one event/tick at a time.
///
/// Ticks are timeouts on the event channel, so there is no timer to stop:
/// when the caller stops asking for ticks, none are produced.
pub struct Runner<E: TrackEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: TrackEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// With `ticking`, blocks up to one tick interval and yields `Tick` on
    /// timeout. Without it, blocks for the next event. `None` when the event
    /// source has shut down.
    pub fn step(&self, ticking: bool) -> Option<TrackEvent> {
        if !ticking {
            return self.event_source.recv();
        }
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) => Some(TrackEvent::Tick),
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
