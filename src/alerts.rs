use std::io::Write;

use crate::ui::TerminalPresenter;

const BELL: &[u8] = b"\x07";

#[derive(Clone, Debug)]
pub struct AlertConfig {
    pub bell: bool,
    pub notification: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            bell: true,
            notification: true,
        }
    }
}

pub fn fire_alert<W: Write>(config: &AlertConfig, out: &mut W, ui: &mut TerminalPresenter, message: &str) {
    log::info!("alert: {}", message);
    if config.bell {
        out.write_all(BELL).and_then(|_| out.flush()).ok();
    }
    if config.notification {
        ui.show_notice(message);
    }
}
