//! Pure timing logic library with no platform dependencies.
//! Testable on host with a simulated clock, hosted by any front end that
//! implements [`Presenter`] and [`Scheduler`].

pub mod boundary;
pub mod controls;
pub mod countdown;
pub mod input;
pub mod mode;
pub mod scheduler;
pub mod stopwatch;

#[cfg(test)]
mod test_utils;

use std::fmt;

pub use boundary::Presenter;
pub use controls::{apply_controls, enabled_controls, Control, ControlSet};
pub use countdown::CountdownEngine;
pub use input::{clamp_field, read_countdown_ms, CountdownTarget};
pub use mode::{Mode, TimerWidget};
pub use scheduler::{ManualScheduler, Scheduler, TickHandle};
pub use stopwatch::StopwatchEngine;

/// Stopwatch sampling period, roughly 60 samples per second.
pub const STOPWATCH_INTERVAL_MS: u64 = 16;
/// Countdown sampling period. Also the amount removed per countdown tick.
pub const COUNTDOWN_INTERVAL_MS: u64 = 50;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    /// Countdown reached zero. Behaves like `Idle` for starting.
    Completed,
}

/// What a delivered tick did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TickOutcome {
    Continue,
    /// The countdown hit zero on this tick.
    Completed,
    /// Nobody owns the handle any more (cancelled before delivery).
    Stale,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TimingConfig {
    pub stopwatch_interval_ms: u64,
    /// Countdown sampling period; every tick removes exactly this much.
    pub countdown_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            stopwatch_interval_ms: STOPWATCH_INTERVAL_MS,
            countdown_interval_ms: COUNTDOWN_INTERVAL_MS,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StartError {
    /// The countdown inputs add up to zero.
    EmptyDuration,
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartError::EmptyDuration => write!(f, "countdown duration must be greater than zero"),
        }
    }
}

impl std::error::Error for StartError {}

/// Format milliseconds as "MM:SS.cs" (centiseconds, truncated).
///
/// Minutes are not wrapped into hours; 100 minutes or more simply widens the
/// field, e.g. `"123:04.50"`.
pub fn format_clock(ms: u64) -> String {
    let total_secs = ms / 1000;
    let cs = (ms % 1000) / 10;
    let m = total_secs / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}.{:02}", m, s, cs)
}
