use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use simplelog::LevelFilter;
use timer_core::{Mode, TimingConfig, COUNTDOWN_INTERVAL_MS, STOPWATCH_INTERVAL_MS};

use crate::alerts::AlertConfig;

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum StartMode {
    Stopwatch,
    Countdown,
}

impl From<StartMode> for Mode {
    fn from(mode: StartMode) -> Self {
        match mode {
            StartMode::Stopwatch => Mode::Stopwatch,
            StartMode::Countdown => Mode::Countdown,
        }
    }
}

/// Stopwatch and countdown timer for the terminal
#[derive(Parser, Debug)]
#[command(name = "timer-widget")]
#[command(about = "Stopwatch and countdown timer for the terminal", long_about = None)]
pub struct Args {
    /// Stopwatch refresh period in milliseconds
    #[arg(long, default_value_t = STOPWATCH_INTERVAL_MS)]
    pub stopwatch_interval_ms: u64,

    /// Countdown tick period in milliseconds (also the amount removed per tick)
    #[arg(long, default_value_t = COUNTDOWN_INTERVAL_MS)]
    pub countdown_interval_ms: u64,

    /// Initial countdown minutes field
    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    pub minutes: String,

    /// Initial countdown seconds field
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub seconds: String,

    /// Mode shown at startup
    #[arg(long, value_enum, default_value_t = StartMode::Stopwatch)]
    pub mode: StartMode,

    /// Don't ring the terminal bell when a countdown completes
    #[arg(long)]
    pub no_bell: bool,

    /// Don't show the completion banner
    #[arg(long)]
    pub no_notification: bool,

    /// Log file (the terminal is in raw mode, so logs never go to stderr)
    #[arg(long, default_value = "timer-widget.log")]
    pub log_file: PathBuf,

    /// off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub timing: TimingConfig,
    pub alerts: AlertConfig,
    pub mode: Mode,
    pub minutes: String,
    pub seconds: String,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        Self {
            timing: TimingConfig {
                stopwatch_interval_ms: args.stopwatch_interval_ms.max(1),
                countdown_interval_ms: args.countdown_interval_ms.max(1),
            },
            alerts: AlertConfig {
                bell: !args.no_bell,
                notification: !args.no_notification,
            },
            mode: args.mode.into(),
            minutes: args.minutes,
            seconds: args.seconds,
            log_file: args.log_file,
            log_level: args.log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> AppConfig {
        let mut full = vec!["timer-widget"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap().into()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.timing, TimingConfig::default());
        assert_eq!(config.mode, Mode::Stopwatch);
        assert_eq!(config.minutes, "1");
        assert_eq!(config.seconds, "0");
        assert!(config.alerts.bell);
        assert!(config.alerts.notification);
        assert_eq!(config.log_file, PathBuf::from("timer-widget.log"));
        assert_eq!(config.log_level, LevelFilter::Info);
    }

    #[test]
    fn test_overrides() {
        let config = parse(&[
            "--mode",
            "countdown",
            "--countdown-interval-ms",
            "100",
            "--minutes",
            "-5",
            "--seconds",
            "75",
            "--no-bell",
            "--log-level",
            "debug",
        ]);
        assert_eq!(config.mode, Mode::Countdown);
        assert_eq!(config.timing.countdown_interval_ms, 100);
        assert_eq!(config.timing.stopwatch_interval_ms, STOPWATCH_INTERVAL_MS);
        // Raw text is kept; the core clamps it
        assert_eq!(config.minutes, "-5");
        assert_eq!(config.seconds, "75");
        assert!(!config.alerts.bell);
        assert!(config.alerts.notification);
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_zero_interval_clamped() {
        let config = parse(&["--stopwatch-interval-ms", "0"]);
        assert_eq!(config.timing.stopwatch_interval_ms, 1);
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(Args::try_parse_from(["timer-widget", "--mode", "pomodoro"]).is_err());
    }
}
