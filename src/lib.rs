// Library surface for the binary, headless/integration tests and reuse.
pub mod app;
pub mod calories;
pub mod clock;
pub mod config;
pub mod format;
pub mod lap;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod util;

pub use clock::{LapTimer, ManualTimeSource, SystemTimeSource, TimeSource};
pub use lap::Lap;
pub use session::Session;
pub use stats::{compute_stats, RunStats};
