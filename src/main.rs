mod alerts;
mod config;
mod pump;
mod ui;

use std::fs::File;
use std::io::{self, Stdout, Write};
use std::sync::mpsc::{self, Sender};

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, terminal};
use simplelog::{Config, WriteLogger};
use timer_core::{Control, Mode, TickHandle, TickOutcome, TimerWidget};

use crate::alerts::{fire_alert, AlertConfig};
use crate::config::{AppConfig, Args};
use crate::pump::PumpScheduler;
use crate::ui::TerminalPresenter;

const APP_NAME: &str = "timer-widget";

/// Countdown presets on F1..F3, in minutes.
const PRESETS: [(u8, u32); 3] = [(1, 1), (2, 5), (3, 10)];

pub enum AppEvent {
    Key(KeyEvent),
    Tick(TickHandle),
    Resize,
    InputClosed,
}

struct TimerApp {
    widget: TimerWidget<PumpScheduler, TerminalPresenter>,
    alert_config: AlertConfig,
    out: Stdout,
    rows: u16,
    quit: bool,
}

impl TimerApp {
    fn new(config: &AppConfig, events: Sender<AppEvent>) -> Self {
        let scheduler = PumpScheduler::spawn(events);
        let presenter = TerminalPresenter::new(&config.minutes, &config.seconds);
        let mut widget = TimerWidget::new(config.timing, scheduler, presenter);
        widget.set_mode(config.mode);
        let rows = terminal::size().map(|(_, rows)| rows).unwrap_or(24);
        Self {
            widget,
            alert_config: config.alerts.clone(),
            out: io::stdout(),
            rows,
            quit: false,
        }
    }

    fn redraw(&mut self) {
        let mode = self.widget.mode();
        if let Err(e) = self.widget.presenter().draw(&mut self.out, mode, self.rows) {
            log::error!("redraw failed: {}", e);
        }
    }

    fn handle_tick(&mut self, handle: TickHandle) {
        match self.widget.on_tick(handle) {
            TickOutcome::Completed => {
                let status = self.widget.presenter().status().to_string();
                fire_alert(&self.alert_config, &mut self.out, self.widget.presenter_mut(), &status);
            }
            TickOutcome::Stale => return,
            TickOutcome::Continue => {}
        }
        self.redraw();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return;
        }

        // Help screen: any key dismisses it
        if self.widget.presenter().help_visible() {
            self.widget.presenter_mut().toggle_help();
            self.redraw();
            return;
        }
        self.widget.presenter_mut().dismiss_notice();

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('?') => self.widget.presenter_mut().toggle_help(),
            KeyCode::Char(' ') | KeyCode::Char('s') | KeyCode::Enter => self.press(Control::Start),
            KeyCode::Char('p') => self.press(Control::Pause),
            KeyCode::Char('r') => self.press(Control::Reset),
            KeyCode::Char('l') => self.press(Control::Lap),
            KeyCode::Tab | KeyCode::Char('m') => {
                let next = self.widget.mode().other();
                log::info!("switching to {} mode", next.label());
                self.widget.set_mode(next);
            }
            _ if self.widget.mode() == Mode::Countdown => self.handle_input_key(key.code),
            _ => {}
        }
        self.redraw();
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        let ui = self.widget.presenter_mut();
        match code {
            KeyCode::Char('f') | KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down => {
                ui.toggle_focus()
            }
            KeyCode::Backspace => ui.backspace(),
            KeyCode::Char(c) => ui.push_char(c),
            KeyCode::F(n) => {
                if let Some(&(_, minutes)) = PRESETS.iter().find(|(key, _)| *key == n) {
                    ui.set_inputs(minutes, 0);
                    self.widget.reset();
                }
            }
            _ => {}
        }
    }

    /// Controls behave like buttons: a disabled one does nothing.
    fn press(&mut self, control: Control) {
        if !self.widget.presenter().is_enabled(control) {
            log::trace!("{} is disabled", control.label());
            return;
        }
        match control {
            Control::Start => {
                if let Err(e) = self.widget.start() {
                    log::warn!("start rejected: {}", e);
                }
            }
            Control::Pause => self.widget.pause(),
            Control::Reset => self.widget.reset(),
            Control::Lap => self.widget.lap(),
        }
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick(handle) => self.handle_tick(handle),
            AppEvent::Resize => {
                self.rows = terminal::size().map(|(_, rows)| rows).unwrap_or(self.rows);
                self.redraw();
            }
            AppEvent::InputClosed => self.quit = true,
        }
    }
}

fn input_thread(events: Sender<AppEvent>) {
    loop {
        let forwarded = match event::read() {
            Ok(Event::Key(key)) => events.send(AppEvent::Key(key)),
            Ok(Event::Resize(_, _)) => events.send(AppEvent::Resize),
            Ok(_) => Ok(()),
            Err(e) => {
                log::error!("terminal input failed: {}", e);
                events.send(AppEvent::InputClosed).ok();
                return;
            }
        };
        if forwarded.is_err() {
            return;
        }
    }
}

/// Raw mode and the alternate screen, undone on drop so every exit path
/// (including a failed setup) leaves the terminal usable.
struct TerminalGuard;

impl TerminalGuard {
    fn enter<W: Write>(out: &mut W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = TerminalGuard;
        execute!(out, terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen).ok();
        if let Err(e) = terminal::disable_raw_mode() {
            log::error!("can't leave raw mode: {}", e);
        }
    }
}

fn main() -> io::Result<()> {
    let config = AppConfig::from(Args::parse());

    match File::create(&config.log_file) {
        Ok(file) => {
            WriteLogger::init(config.log_level, Config::default(), file).ok();
        }
        Err(e) => eprintln!("can't create log file {}: {}", config.log_file.display(), e),
    }
    log::info!(
        "{} starting: stopwatch every {} ms, countdown every {} ms, mode {}",
        APP_NAME,
        config.timing.stopwatch_interval_ms,
        config.timing.countdown_interval_ms,
        config.mode.label()
    );

    let guard = TerminalGuard::enter(&mut io::stdout())?;

    let (tx, rx) = mpsc::channel();
    let input_tx = tx.clone();
    std::thread::spawn(move || input_thread(input_tx));

    let mut app = TimerApp::new(&config, tx);
    app.redraw();

    while !app.quit {
        match rx.recv() {
            Ok(event) => app.handle_event(event),
            Err(_) => break,
        }
    }

    // Clean up
    app.widget.halt();
    app.out.flush().ok();
    drop(app);
    drop(guard);
    log::info!("{} exiting", APP_NAME);
    Ok(())
}
