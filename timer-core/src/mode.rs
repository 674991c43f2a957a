//! Mode selection and the shared control surface.

use crate::boundary::Presenter;
use crate::controls::{apply_controls, enabled_controls};
use crate::countdown::CountdownEngine;
use crate::scheduler::{ManualScheduler, Scheduler, TickHandle};
use crate::stopwatch::StopwatchEngine;
use crate::{format_clock, StartError, TickOutcome, TimerState, TimingConfig};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Mode {
    #[default]
    Stopwatch,
    Countdown,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Stopwatch => "Stopwatch",
            Mode::Countdown => "Countdown",
        }
    }

    pub fn other(self) -> Mode {
        match self {
            Mode::Stopwatch => Mode::Countdown,
            Mode::Countdown => Mode::Stopwatch,
        }
    }
}

/// Both engines behind one start/pause/reset/lap surface.
///
/// Only the engine for the active mode ever samples or talks to the
/// presenter. The host feeds fired scheduler handles into
/// [`on_tick`](Self::on_tick).
pub struct TimerWidget<S, P> {
    mode: Mode,
    stopwatch: StopwatchEngine,
    countdown: CountdownEngine,
    scheduler: S,
    presenter: P,
}

impl<S: Scheduler, P: Presenter> TimerWidget<S, P> {
    /// Creates both engines in their reset state, showing the stopwatch.
    pub fn new(timing: TimingConfig, scheduler: S, mut presenter: P) -> Self {
        let mode = Mode::Stopwatch;
        presenter.render_time(&format_clock(0));
        presenter.set_input_visible(false);
        apply_controls(&mut presenter, enabled_controls(mode, TimerState::Idle));
        Self {
            mode,
            stopwatch: StopwatchEngine::new(timing.stopwatch_interval_ms),
            countdown: CountdownEngine::new(timing.countdown_interval_ms),
            scheduler,
            presenter,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch modes. The outgoing engine stops sampling but keeps its
    /// progress; the incoming engine is always reset.
    pub fn set_mode(&mut self, next: Mode) {
        if next == self.mode {
            return;
        }
        match self.mode {
            Mode::Stopwatch => self.stopwatch.suspend(&mut self.scheduler),
            Mode::Countdown => self.countdown.suspend(&mut self.scheduler),
        }
        self.mode = next;
        log::debug!("mode switched to {:?}", next);
        self.presenter.set_input_visible(next == Mode::Countdown);
        match next {
            Mode::Stopwatch => self.stopwatch.reset(&mut self.scheduler, &mut self.presenter),
            Mode::Countdown => self.countdown.reset(&mut self.scheduler, &mut self.presenter),
        }
    }

    pub fn start(&mut self) -> Result<(), StartError> {
        match self.mode {
            Mode::Stopwatch => {
                self.stopwatch.start(&mut self.scheduler, &mut self.presenter);
                Ok(())
            }
            Mode::Countdown => self.countdown.start(&mut self.scheduler, &mut self.presenter),
        }
    }

    pub fn pause(&mut self) {
        match self.mode {
            Mode::Stopwatch => self.stopwatch.pause(&mut self.scheduler, &mut self.presenter),
            Mode::Countdown => self.countdown.pause(&mut self.scheduler, &mut self.presenter),
        }
    }

    pub fn reset(&mut self) {
        match self.mode {
            Mode::Stopwatch => self.stopwatch.reset(&mut self.scheduler, &mut self.presenter),
            Mode::Countdown => self.countdown.reset(&mut self.scheduler, &mut self.presenter),
        }
    }

    /// Record a lap. Only meaningful in stopwatch mode; ignored otherwise.
    pub fn lap(&mut self) {
        if self.mode != Mode::Stopwatch {
            log::trace!("lap ignored in {:?} mode", self.mode);
            return;
        }
        self.stopwatch.lap(&mut self.presenter);
    }

    /// Deliver one fired registration to whichever engine owns it.
    pub fn on_tick(&mut self, handle: TickHandle) -> TickOutcome {
        if self.stopwatch.sampler() == Some(handle) {
            self.stopwatch.tick(&self.scheduler, &mut self.presenter);
            TickOutcome::Continue
        } else if self.countdown.sampler() == Some(handle) {
            self.countdown.tick(&mut self.scheduler, &mut self.presenter)
        } else {
            log::trace!("dropping stale tick {:?}", handle);
            TickOutcome::Stale
        }
    }

    /// State of the engine for the active mode.
    pub fn active_state(&self) -> TimerState {
        match self.mode {
            Mode::Stopwatch => self.stopwatch.state(),
            Mode::Countdown => self.countdown.state(),
        }
    }

    /// Stop all sampling, e.g. before shutting the host down.
    pub fn halt(&mut self) {
        self.stopwatch.suspend(&mut self.scheduler);
        self.countdown.suspend(&mut self.scheduler);
    }

    pub fn stopwatch(&self) -> &StopwatchEngine {
        &self.stopwatch
    }

    pub fn countdown(&self) -> &CountdownEngine {
        &self.countdown
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }
}

impl<P: Presenter> TimerWidget<ManualScheduler, P> {
    /// Advance simulated time by `ms`, delivering every tick due on the way.
    /// Returns how many countdown runs completed.
    pub fn run_for(&mut self, ms: u64) -> usize {
        let until = self.scheduler.now_ms() + ms;
        let mut completed = 0;
        while let Some(handle) = self.scheduler.pop_due(until) {
            if self.on_tick(handle) == TickOutcome::Completed {
                completed += 1;
            }
        }
        self.scheduler.settle(until);
        completed
    }
}
