//! Presenter double that records everything pushed through the boundary.

use std::collections::HashMap;

use crate::boundary::Presenter;
use crate::controls::Control;

#[derive(Default)]
pub struct RecordingPresenter {
    pub renders: Vec<String>,
    pub announcements: Vec<String>,
    pub controls: HashMap<Control, bool>,
    pub input_invalid: bool,
    pub input_visible: bool,
    pub laps: Vec<String>,
    pub minutes_input: String,
    pub seconds_input: String,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::with_inputs("0", "0")
    }

    pub fn with_inputs(minutes: &str, seconds: &str) -> Self {
        Self {
            minutes_input: minutes.to_string(),
            seconds_input: seconds.to_string(),
            ..Self::default()
        }
    }

    pub fn set_inputs(&mut self, minutes: &str, seconds: &str) {
        self.minutes_input = minutes.to_string();
        self.seconds_input = seconds.to_string();
    }

    pub fn displayed(&self) -> &str {
        self.renders.last().map(String::as_str).unwrap_or("")
    }

    pub fn status(&self) -> &str {
        self.announcements.last().map(String::as_str).unwrap_or("")
    }

    pub fn enabled(&self, control: Control) -> bool {
        self.controls.get(&control).copied().unwrap_or(false)
    }

    pub fn count_announced(&self, text: &str) -> usize {
        self.announcements.iter().filter(|a| a.as_str() == text).count()
    }
}

impl Presenter for RecordingPresenter {
    fn render_time(&mut self, text: &str) {
        self.renders.push(text.to_string());
    }

    fn announce(&mut self, text: &str) {
        self.announcements.push(text.to_string());
    }

    fn set_control_enabled(&mut self, control: Control, enabled: bool) {
        self.controls.insert(control, enabled);
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
