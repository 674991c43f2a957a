use crate::boundary::Presenter;
use crate::controls::{apply_controls, enabled_controls};
use crate::mode::Mode;
use crate::scheduler::{Scheduler, TickHandle};
use crate::{format_clock, TimerState};

pub const MSG_STARTED: &str = "Stopwatch started";
pub const MSG_PAUSED: &str = "Stopwatch paused";
pub const MSG_RESET: &str = "Stopwatch reset";

/// Elapsed-time engine.
///
/// While running, elapsed is `accumulated_ms + (now - segment_start_ms)`.
/// `accumulated_ms` only changes when a running segment is folded in (pause)
/// or on reset.
pub struct StopwatchEngine {
    state: TimerState,
    accumulated_ms: u64,
    segment_start_ms: Option<u64>,
    interval_ms: u64,
    sampler: Option<TickHandle>,
    displayed: String,
    laps: Vec<String>,
}

impl StopwatchEngine {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            state: TimerState::Idle,
            accumulated_ms: 0,
            segment_start_ms: None,
            interval_ms,
            sampler: None,
            displayed: format_clock(0),
            laps: Vec::new(),
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn sampler(&self) -> Option<TickHandle> {
        self.sampler
    }

    /// The string most recently rendered.
    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    pub fn laps(&self) -> &[String] {
        &self.laps
    }

    pub fn accumulated_ms(&self) -> u64 {
        self.accumulated_ms
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        match (self.state, self.segment_start_ms) {
            (TimerState::Running, Some(start)) => {
                self.accumulated_ms + now_ms.saturating_sub(start)
            }
            _ => self.accumulated_ms,
        }
    }

    pub fn start<S: Scheduler, P: Presenter>(&mut self, sched: &mut S, ui: &mut P) {
        if self.state == TimerState::Running {
            log::trace!("stopwatch start ignored: already running");
            return;
        }
        let now = sched.now_ms();
        self.segment_start_ms = Some(now);
        self.sampler = Some(sched.schedule_periodic(self.interval_ms));
        self.state = TimerState::Running;
        log::debug!("stopwatch started at {} ms (accumulated {} ms)", now, self.accumulated_ms);
        self.sync_controls(ui);
        ui.announce(MSG_STARTED);
    }

    /// Render the current elapsed time. Never mutates the accumulator.
    pub fn tick<S: Scheduler, P: Presenter>(&mut self, sched: &S, ui: &mut P) {
        if self.state != TimerState::Running {
            return;
        }
        let elapsed = self.elapsed_ms(sched.now_ms());
        self.render(ui, elapsed);
    }

    pub fn pause<S: Scheduler, P: Presenter>(&mut self, sched: &mut S, ui: &mut P) {
        if self.state != TimerState::Running {
            log::trace!("stopwatch pause ignored in {:?}", self.state);
            return;
        }
        self.halt(sched);
        log::debug!("stopwatch paused at {} ms elapsed", self.accumulated_ms);
        self.render(ui, self.accumulated_ms);
        self.sync_controls(ui);
        ui.announce(MSG_PAUSED);
    }

    pub fn reset<S: Scheduler, P: Presenter>(&mut self, sched: &mut S, ui: &mut P) {
        self.cancel_sampler(sched);
        self.accumulated_ms = 0;
        self.segment_start_ms = None;
        self.state = TimerState::Idle;
        self.laps.clear();
        log::debug!("stopwatch reset");
        self.render(ui, 0);
        ui.clear_laps();
        self.sync_controls(ui);
        ui.announce(MSG_RESET);
    }

    /// Snapshot the displayed string into the lap list. No recomputation:
    /// the lap is exactly what the user was looking at.
    pub fn lap<P: Presenter>(&mut self, ui: &mut P) {
        let snapshot = self.displayed.clone();
        log::debug!("lap {} recorded: {}", self.laps.len() + 1, snapshot);
        ui.append_lap(&snapshot);
        self.laps.push(snapshot);
    }

    /// Stop sampling without touching the presenter. Progress is folded in
    /// and kept; used when another mode takes over the display.
    pub fn suspend<S: Scheduler>(&mut self, sched: &mut S) {
        if self.is_running() {
            self.halt(sched);
            log::debug!("stopwatch suspended at {} ms elapsed", self.accumulated_ms);
        }
    }

    fn halt<S: Scheduler>(&mut self, sched: &mut S) {
        self.cancel_sampler(sched);
        self.accumulated_ms = self.elapsed_ms(sched.now_ms());
        self.segment_start_ms = None;
        self.state = TimerState::Paused;
    }

    fn cancel_sampler<S: Scheduler>(&mut self, sched: &mut S) {
        if let Some(handle) = self.sampler.take() {
            sched.cancel(handle);
        }
    }

    fn render<P: Presenter>(&mut self, ui: &mut P, elapsed_ms: u64) {
        self.displayed = format_clock(elapsed_ms);
        ui.render_time(&self.displayed);
    }

    fn sync_controls<P: Presenter>(&self, ui: &mut P) {
        apply_controls(ui, enabled_controls(Mode::Stopwatch, self.state));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::Control;
    use crate::scheduler::ManualScheduler;
    use crate::test_utils::RecordingPresenter;

    fn run(sw: &mut StopwatchEngine, sched: &mut ManualScheduler, ui: &mut RecordingPresenter, ms: u64) {
        let until = sched.now_ms() + ms;
        while let Some(h) = sched.pop_due(until) {
            assert_eq!(sw.sampler(), Some(h));
            sw.tick(&*sched, ui);
        }
        sched.settle(until);
    }

    #[test]
    fn test_start_pause_accumulates() {
        let mut sched = ManualScheduler::starting_at(1_000);
        let mut ui = RecordingPresenter::new();
        let mut sw = StopwatchEngine::new(16);

        sw.start(&mut sched, &mut ui);
        assert_eq!(sw.state(), TimerState::Running);
        run(&mut sw, &mut sched, &mut ui, 1_500);
        sw.pause(&mut sched, &mut ui);

        assert_eq!(sw.state(), TimerState::Paused);
        assert_eq!(sw.accumulated_ms(), 1_500);
        assert_eq!(ui.displayed(), "00:01.50");
        assert_eq!(ui.status(), MSG_PAUSED);
        assert_eq!(sched.active_count(), 0);

        // Time passing while paused does not count
        sched.settle(sched.now_ms() + 10_000);
        assert_eq!(sw.elapsed_ms(sched.now_ms()), 1_500);

        sw.start(&mut sched, &mut ui);
        run(&mut sw, &mut sched, &mut ui, 500);
        assert_eq!(sw.elapsed_ms(sched.now_ms()), 2_000);
    }

    #[test]
    fn test_tick_renders_without_mutating() {
        let mut sched = ManualScheduler::new();
        let mut ui = RecordingPresenter::new();
        let mut sw = StopwatchEngine::new(16);

        sw.start(&mut sched, &mut ui);
        sched.settle(320);
        sw.tick(&sched, &mut ui);
        sw.tick(&sched, &mut ui);
        assert_eq!(sw.accumulated_ms(), 0);
        assert_eq!(ui.renders[ui.renders.len() - 2..], ["00:00.32", "00:00.32"]);
    }

    #[test]
    fn test_elapsed_never_decreases() {
        let mut sched = ManualScheduler::new();
        let mut ui = RecordingPresenter::new();
        let mut sw = StopwatchEngine::new(16);

        let mut last = 0;
        for round in 0..5u64 {
            sw.start(&mut sched, &mut ui);
            for _ in 0..10 {
                run(&mut sw, &mut sched, &mut ui, 7 + round);
                let elapsed = sw.elapsed_ms(sched.now_ms());
                assert!(elapsed >= last);
                last = elapsed;
            }
            sw.pause(&mut sched, &mut ui);
            sched.settle(sched.now_ms() + 333);
        }
        // 10 * (7 + 8 + 9 + 10 + 11)
        assert_eq!(sw.accumulated_ms(), 450);
    }

    #[test]
    fn test_invalid_transitions_are_ignored() {
        let mut sched = ManualScheduler::new();
        let mut ui = RecordingPresenter::new();
        let mut sw = StopwatchEngine::new(16);

        sw.pause(&mut sched, &mut ui);
        assert_eq!(sw.state(), TimerState::Idle);
        assert!(ui.announcements.is_empty());

        sw.start(&mut sched, &mut ui);
        let first = sw.sampler();
        sw.start(&mut sched, &mut ui);
        assert_eq!(sw.sampler(), first);
        assert_eq!(sched.active_count(), 1);
        assert_eq!(ui.count_announced(MSG_STARTED), 1);
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut sched = ManualScheduler::new();
        let mut ui = RecordingPresenter::new();
        let mut sw = StopwatchEngine::new(16);

        sw.start(&mut sched, &mut ui);
        run(&mut sw, &mut sched, &mut ui, 2_000);
        sw.lap(&mut ui);
        sw.lap(&mut ui);
        sw.reset(&mut sched, &mut ui);

        assert_eq!(sw.state(), TimerState::Idle);
        assert_eq!(ui.displayed(), "00:00.00");
        assert!(ui.laps.is_empty());
        assert!(sw.laps().is_empty());
        assert_eq!(sched.active_count(), 0);
        assert!(ui.enabled(Control::Start));
        assert!(!ui.enabled(Control::Pause));
        assert!(!ui.enabled(Control::Reset));
        assert!(!ui.enabled(Control::Lap));
        assert_eq!(ui.status(), MSG_RESET);

        // Resetting an idle stopwatch is still fine
        sw.reset(&mut sched, &mut ui);
        assert_eq!(ui.displayed(), "00:00.00");
    }

    #[test]
    fn test_lap_snapshots_displayed_string() {
        let mut sched = ManualScheduler::new();
        let mut ui = RecordingPresenter::new();
        let mut sw = StopwatchEngine::new(16);

        sw.start(&mut sched, &mut ui);
        run(&mut sw, &mut sched, &mut ui, 45_300);
        assert_eq!(ui.displayed(), "00:45.29");
        // Clock moves on but no tick has rendered yet
        sched.settle(sched.now_ms() + 5);
        sw.lap(&mut ui);
        assert_eq!(ui.laps, vec!["00:45.29"]);
        assert_eq!(sw.laps(), ["00:45.29"]);
    }

    #[test]
    fn test_controls_follow_state() {
        let mut sched = ManualScheduler::new();
        let mut ui = RecordingPresenter::new();
        let mut sw = StopwatchEngine::new(16);

        sw.start(&mut sched, &mut ui);
        assert!(!ui.enabled(Control::Start));
        assert!(ui.enabled(Control::Pause));
        assert!(ui.enabled(Control::Reset));
        assert!(ui.enabled(Control::Lap));

        sw.pause(&mut sched, &mut ui);
        assert!(ui.enabled(Control::Start));
        assert!(!ui.enabled(Control::Pause));
        assert!(ui.enabled(Control::Reset));
        assert!(!ui.enabled(Control::Lap));
    }

    #[test]
    fn test_suspend_is_silent() {
        let mut sched = ManualScheduler::new();
        let mut ui = RecordingPresenter::new();
        let mut sw = StopwatchEngine::new(16);

        sw.start(&mut sched, &mut ui);
        run(&mut sw, &mut sched, &mut ui, 800);
        let announced = ui.announcements.len();
        let rendered = ui.renders.len();

        assert!(sw.is_running());
        sw.suspend(&mut sched);
        assert!(!sw.is_running());
        assert_eq!(sw.state(), TimerState::Paused);
        assert_eq!(sw.accumulated_ms(), 800);
        assert_eq!(sched.active_count(), 0);
        assert_eq!(ui.announcements.len(), announced);
        assert_eq!(ui.renders.len(), rendered);
    }
}
