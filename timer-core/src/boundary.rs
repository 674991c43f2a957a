use crate::controls::Control;

/// Everything the engines need from whatever draws the widget.
///
/// Engines only push state through here. They never read back anything except
/// the raw countdown input text.
pub trait Presenter {
    /// Replace the displayed time.
    fn render_time(&mut self, text: &str);

    /// Replace the status text. Announcements never accumulate.
    fn announce(&mut self, text: &str);

    fn set_control_enabled(&mut self, control: Control, enabled: bool);

    /// Mark the countdown inputs as invalid (or clear the mark).
    fn set_input_invalid(&mut self, invalid: bool);

    fn append_lap(&mut self, text: &str);

    fn clear_laps(&mut self);

    /// Raw, unparsed minutes field.
    fn read_minutes_input(&self) -> String;

    /// Raw, unparsed seconds field.
    fn read_seconds_input(&self) -> String;

    fn write_minutes_input(&mut self, minutes: u32);

    fn write_seconds_input(&mut self, seconds: u32);

    /// Show or hide the countdown-only inputs.
    fn set_input_visible(&mut self, visible: bool);
}
