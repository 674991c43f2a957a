//! Terminal presenter: holds everything the engines push through the
//! boundary and draws it with crossterm.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;

use timer_core::{Control, ControlSet, Mode, Presenter};

const MAX_INPUT_LEN: usize = 6;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputField {
    Minutes,
    Seconds,
}

pub struct TerminalPresenter {
    time: String,
    status: String,
    enabled: ControlSet,
    minutes_input: String,
    seconds_input: String,
    input_invalid: bool,
    input_visible: bool,
    laps: Vec<String>,
    focus: InputField,
    notice: Option<String>,
    help_visible: bool,
}

impl TerminalPresenter {
    pub fn new(minutes: &str, seconds: &str) -> Self {
        Self {
            time: String::new(),
            status: String::new(),
            enabled: ControlSet::EMPTY,
            minutes_input: minutes.to_string(),
            seconds_input: seconds.to_string(),
            input_invalid: false,
            input_visible: false,
            laps: Vec::new(),
            focus: InputField::Minutes,
            notice: None,
            help_visible: false,
        }
    }

    pub fn is_enabled(&self, control: Control) -> bool {
        self.enabled.contains(control)
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            InputField::Minutes => InputField::Seconds,
            InputField::Seconds => InputField::Minutes,
        };
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            InputField::Minutes => &mut self.minutes_input,
            InputField::Seconds => &mut self.seconds_input,
        }
    }

    /// Type into the focused field. Text stays raw until the core reads
    /// and clamps it.
    pub fn push_char(&mut self, c: char) {
        if !(c.is_ascii_digit() || matches!(c, '-' | '+' | '.')) {
            return;
        }
        let field = self.focused_mut();
        if field.len() < MAX_INPUT_LEN {
            field.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.focused_mut().pop();
    }

    pub fn set_inputs(&mut self, minutes: u32, seconds: u32) {
        self.minutes_input = minutes.to_string();
        self.seconds_input = seconds.to_string();
    }

    pub fn show_notice(&mut self, message: &str) {
        self.notice = Some(message.to_string());
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn draw<W: Write>(&self, out: &mut W, mode: Mode, rows: u16) -> io::Result<()> {
        queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        if self.help_visible {
            return self.draw_help(out);
        }

        for (i, m) in [Mode::Stopwatch, Mode::Countdown].into_iter().enumerate() {
            let attr = if m == mode { Attribute::Reverse } else { Attribute::Dim };
            queue!(
                out,
                MoveTo(2 + i as u16 * 14, 0),
                SetAttribute(attr),
                Print(format!(" {} ", m.label())),
                SetAttribute(Attribute::Reset)
            )?;
        }

        queue!(
            out,
            MoveTo(4, 2),
            SetAttribute(Attribute::Bold),
            Print(&self.time),
            SetAttribute(Attribute::Reset)
        )?;

        let mut x = 2;
        for control in Control::ALL {
            if control == Control::Lap && mode != Mode::Stopwatch {
                continue;
            }
            let attr = if self.is_enabled(control) { Attribute::Bold } else { Attribute::Dim };
            let label = format!("[{}]", control.label());
            queue!(out, MoveTo(x, 4), SetAttribute(attr), Print(&label), SetAttribute(Attribute::Reset))?;
            x += label.len() as u16 + 1;
        }

        if self.input_visible {
            let color = if self.input_invalid { Color::Red } else { Color::Reset };
            let fields = [
                (InputField::Minutes, "Minutes", &self.minutes_input, 2),
                (InputField::Seconds, "Seconds", &self.seconds_input, 22),
            ];
            for (field, name, value, col) in fields {
                let attr = if field == self.focus { Attribute::Underlined } else { Attribute::NoUnderline };
                queue!(
                    out,
                    MoveTo(col, 6),
                    Print(format!("{}: ", name)),
                    SetForegroundColor(color),
                    SetAttribute(attr),
                    Print(format!("{:>6}", value)),
                    SetAttribute(Attribute::Reset),
                    ResetColor
                )?;
            }
        }

        queue!(out, MoveTo(2, 8), Print(&self.status))?;
        if let Some(notice) = self.notice() {
            queue!(
                out,
                MoveTo(2, 9),
                SetAttribute(Attribute::Reverse),
                Print(format!(" {} ", notice)),
                SetAttribute(Attribute::Reset)
            )?;
        }

        if mode == Mode::Stopwatch && !self.laps.is_empty() {
            // Newest laps win when the terminal is short
            let room = rows.saturating_sub(13) as usize;
            let skip = self.laps.len().saturating_sub(room);
            for (row, (i, lap)) in self.laps.iter().enumerate().skip(skip).enumerate() {
                queue!(out, MoveTo(2, 11 + row as u16), Print(format!("Lap {:>3}  {}", i + 1, lap)))?;
            }
        }

        queue!(
            out,
            MoveTo(2, rows.saturating_sub(1)),
            SetAttribute(Attribute::Dim),
            Print("space=start p=pause r=reset l=lap tab=mode ?=help q=quit"),
            SetAttribute(Attribute::Reset)
        )?;
        out.flush()
    }

    fn draw_help<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let help = [
            "TIMER HELP",
            "",
            "space / s / enter   start (or resume)",
            "p                   pause",
            "r                   reset",
            "l                   lap (stopwatch, while running)",
            "tab / m             switch stopwatch / countdown",
            "",
            "Countdown inputs:",
            "  0-9 - . backspace edit the focused field",
            "  f / arrows        switch minutes / seconds",
            "  F1 F2 F3          presets: 1, 5, 10 minutes",
            "",
            "q / esc / ctrl-c    quit",
            "",
            "Press any key to close",
        ];
        for (row, line) in help.iter().enumerate() {
            queue!(out, MoveTo(2, 1 + row as u16), Print(line))?;
        }
        out.flush()
    }
}

impl Presenter for TerminalPresenter {
    fn render_time(&mut self, text: &str) {
        self.time = text.to_string();
    }

    fn announce(&mut self, text: &str) {
        self.status = text.to_string();
    }

    fn set_control_enabled(&mut self, control: Control, enabled: bool) {
        self.enabled = if enabled {
            self.enabled.with(control)
        } else {
            self.enabled.without(control)
        };
    }

    fn set_input_invalid(&mut self, invalid: bool) {
        self.input_invalid = invalid;
    }

    fn append_lap(&mut self, text: &str) {
        self.laps.push(text.to_string());
    }

    fn clear_laps(&mut self) {
        self.laps.clear();
    }

    fn read_minutes_input(&self) -> String {
        self.minutes_input.clone()
    }

    fn read_seconds_input(&self) -> String {
        self.seconds_input.clone()
    }

    fn write_minutes_input(&mut self, minutes: u32) {
        self.minutes_input = minutes.to_string();
    }

    fn write_seconds_input(&mut self, seconds: u32) {
        self.seconds_input = seconds.to_string();
    }

    fn set_input_visible(&mut self, visible: bool) {
        self.input_visible = visible;
    }
}
