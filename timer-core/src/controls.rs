//! Control enablement table.
//!
//! Enablement is a pure function of the active mode and the active engine's
//! state. Engines push the whole table to the presenter after every
//! transition, so there are no piecemeal enable/disable calls to keep in sync.

use crate::boundary::Presenter;
use crate::mode::Mode;
use crate::TimerState;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Control {
    Start,
    Pause,
    Reset,
    Lap,
}

impl Control {
    pub const ALL: [Control; 4] = [Control::Start, Control::Pause, Control::Reset, Control::Lap];

    fn bit(self) -> u8 {
        match self {
            Control::Start => 0b0001,
            Control::Pause => 0b0010,
            Control::Reset => 0b0100,
            Control::Lap => 0b1000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Control::Start => "Start",
            Control::Pause => "Pause",
            Control::Reset => "Reset",
            Control::Lap => "Lap",
        }
    }
}

/// A set of enabled controls.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct ControlSet(u8);

impl ControlSet {
    pub const EMPTY: ControlSet = ControlSet(0);

    pub fn of(controls: &[Control]) -> Self {
        controls.iter().fold(Self::EMPTY, |set, &c| set.with(c))
    }

    pub fn with(self, control: Control) -> Self {
        Self(self.0 | control.bit())
    }

    pub fn without(self, control: Control) -> Self {
        Self(self.0 & !control.bit())
    }

    pub fn contains(self, control: Control) -> bool {
        self.0 & control.bit() != 0
    }

    pub fn iter(self) -> impl Iterator<Item = Control> {
        Control::ALL.into_iter().filter(move |&c| self.contains(c))
    }
}

pub fn enabled_controls(mode: Mode, state: TimerState) -> ControlSet {
    use Control::*;
    match (mode, state) {
        (_, TimerState::Idle) => ControlSet::of(&[Start]),
        (Mode::Stopwatch, TimerState::Running) => ControlSet::of(&[Pause, Reset, Lap]),
        (Mode::Countdown, TimerState::Running) => ControlSet::of(&[Pause, Reset]),
        (_, TimerState::Paused) | (_, TimerState::Completed) => ControlSet::of(&[Start, Reset]),
    }
}

/// Push the enabled/disabled state of every control.
pub fn apply_controls<P: Presenter>(ui: &mut P, set: ControlSet) {
    for control in Control::ALL {
        ui.set_control_enabled(control, set.contains(control));
    }
}
