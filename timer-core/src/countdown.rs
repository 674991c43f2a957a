use crate::boundary::Presenter;
use crate::controls::{apply_controls, enabled_controls};
use crate::input::read_countdown_ms;
use crate::mode::Mode;
use crate::scheduler::{Scheduler, TickHandle};
use crate::{format_clock, StartError, TickOutcome, TimerState};

pub const MSG_STARTED: &str = "Countdown started";
pub const MSG_PAUSED: &str = "Countdown paused";
pub const MSG_RESET: &str = "Countdown reset";
pub const MSG_COMPLETE: &str = "Countdown complete";
pub const MSG_EMPTY: &str = "Set a countdown time greater than zero";

/// Tick-down engine. `remaining_ms` drops by exactly one quantum per tick,
/// floors at zero, and the run completes on the tick that reaches zero.
pub struct CountdownEngine {
    state: TimerState,
    remaining_ms: u64,
    target_ms: u64,
    quantum_ms: u64,
    sampler: Option<TickHandle>,
}

impl CountdownEngine {
    /// `quantum_ms` is both the sampling period and the per-tick decrement.
    pub fn new(quantum_ms: u64) -> Self {
        Self {
            state: TimerState::Idle,
            remaining_ms: 0,
            target_ms: 0,
            quantum_ms: quantum_ms.max(1),
            sampler: None,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// The value the current run was started (or last reset) from.
    pub fn target_ms(&self) -> u64 {
        self.target_ms
    }

    pub fn sampler(&self) -> Option<TickHandle> {
        self.sampler
    }

    /// Start, or resume from pause. Either way the target is re-read from
    /// the inputs, so edits made while paused replace the paused progress.
    pub fn start<S: Scheduler, P: Presenter>(
        &mut self,
        sched: &mut S,
        ui: &mut P,
    ) -> Result<(), StartError> {
        if self.state == TimerState::Running {
            log::trace!("countdown start ignored: already running");
            return Ok(());
        }
        let target = read_countdown_ms(ui);
        if target == 0 {
            log::debug!("countdown start rejected in {:?}: empty duration", self.state);
            ui.set_input_invalid(true);
            ui.announce(MSG_EMPTY);
            return Err(StartError::EmptyDuration);
        }

        self.target_ms = target;
        self.remaining_ms = target;
        ui.render_time(&format_clock(self.remaining_ms));
        self.sampler = Some(sched.schedule_periodic(self.quantum_ms));
        self.state = TimerState::Running;
        log::debug!("countdown started with {} ms", target);
        self.sync_controls(ui);
        ui.set_input_invalid(false);
        ui.announce(MSG_STARTED);
        Ok(())
    }

    pub fn tick<S: Scheduler, P: Presenter>(&mut self, sched: &mut S, ui: &mut P) -> TickOutcome {
        if self.state != TimerState::Running {
            return TickOutcome::Stale;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(self.quantum_ms);
        ui.render_time(&format_clock(self.remaining_ms));
        if self.remaining_ms > 0 {
            return TickOutcome::Continue;
        }

        self.cancel_sampler(sched);
        self.state = TimerState::Completed;
        log::debug!("countdown of {} ms completed", self.target_ms);
        self.sync_controls(ui);
        ui.announce(MSG_COMPLETE);
        TickOutcome::Completed
    }

    pub fn pause<S: Scheduler, P: Presenter>(&mut self, sched: &mut S, ui: &mut P) {
        if self.state != TimerState::Running {
            log::trace!("countdown pause ignored in {:?}", self.state);
            return;
        }
        self.cancel_sampler(sched);
        self.state = TimerState::Paused;
        log::debug!("countdown paused with {} ms left", self.remaining_ms);
        self.sync_controls(ui);
        ui.announce(MSG_PAUSED);
    }

    /// Always recomputes from the (clamped) inputs.
    pub fn reset<S: Scheduler, P: Presenter>(&mut self, sched: &mut S, ui: &mut P) {
        self.cancel_sampler(sched);
        self.target_ms = read_countdown_ms(ui);
        self.remaining_ms = self.target_ms;
        self.state = TimerState::Idle;
        log::debug!("countdown reset to {} ms", self.remaining_ms);
        ui.render_time(&format_clock(self.remaining_ms));
        self.sync_controls(ui);
        ui.announce(MSG_RESET);
    }

    /// Stop sampling without touching the presenter; remaining time is kept.
    pub fn suspend<S: Scheduler>(&mut self, sched: &mut S) {
        if self.state == TimerState::Running {
            self.cancel_sampler(sched);
            self.state = TimerState::Paused;
            log::debug!("countdown suspended with {} ms left", self.remaining_ms);
        }
    }

    fn cancel_sampler<S: Scheduler>(&mut self, sched: &mut S) {
        if let Some(handle) = self.sampler.take() {
            sched.cancel(handle);
        }
    }

    fn sync_controls<P: Presenter>(&self, ui: &mut P) {
        apply_controls(ui, enabled_controls(Mode::Countdown, self.state));
    }
}
