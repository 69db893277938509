use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::{Local, Utc};
use chrono_tz::Tz;
use clap::Parser;

use crate::view::ViewTab;

#[derive(Parser, Clone, Debug)]
#[clap(
    name = "trade-dash",
    about = "Terminal dashboard for sample assets, predictions and trades"
)]
pub struct CliParams {
    /// View shown on start (dashboard, predictions, or history)
    #[clap(long = "tab", value_name = "VIEW", default_value = "dashboard")]
    pub tab: ViewTab,

    /// Input poll and redraw interval (e.g., 100ms, 1s)
    #[clap(long = "tick-rate", value_name = "DURATION", default_value = "100ms")]
    pub tick_rate: DurationSpec,

    /// Time zone of the header clock: `local` or an IANA name such as Europe/Moscow
    #[clap(
        long = "timezone",
        env = "TRADE_DASH_TZ",
        value_name = "ZONE",
        default_value = "local"
    )]
    pub timezone: ConfiguredTimeZone,

    /// Render a single frame to stdout and exit
    #[clap(long = "snapshot", conflicts_with = "summary_json")]
    pub snapshot: bool,

    /// Snapshot width in columns
    #[clap(long = "width", default_value_t = 120)]
    pub width: u16,

    /// Snapshot height in rows
    #[clap(long = "height", default_value_t = 40)]
    pub height: u16,

    /// Print the derived dashboard metrics as JSON and exit
    #[clap(long = "summary-json")]
    pub summary_json: bool,

    /// Write logs to this file (the interactive UI never logs to the terminal)
    #[clap(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[clap(long = "log-level", value_name = "FILTER", default_value = "info")]
    pub log_level: String,
}

impl CliParams {
    pub fn interactive(&self) -> bool {
        !self.snapshot && !self.summary_json
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate.as_duration()
    }
}

#[derive(Copy, Clone, Debug)]
pub struct DurationSpec(Duration);

impl DurationSpec {
    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl FromStr for DurationSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let duration = parse_duration_spec(s)?;
        Ok(DurationSpec(duration))
    }
}

fn parse_duration_spec(input: &str) -> Result<Duration, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("duration spec cannot be empty (examples: 100ms, 1s)".to_string());
    }
    let split_idx = trimmed
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .ok_or_else(|| "duration spec must end with a unit like ms, s, or m".to_string())?;
    if split_idx == 0 {
        return Err("duration spec must start with a number (examples: 100ms, 1s)".to_string());
    }
    let (value_part, unit_part) = trimmed.split_at(split_idx);
    let value: f64 = value_part.parse().map_err(|_| {
        format!(
            "invalid numeric portion `{}` in duration spec `{}`",
            value_part, trimmed
        )
    })?;
    let unit = unit_part.trim().to_lowercase();
    if matches!(unit.as_str(), "ms" | "msec" | "millis" | "milliseconds") {
        return checked_duration(value / 1000.0, trimmed);
    }
    let seconds_multiplier = match unit.as_str() {
        "s" | "sec" | "secs" | "second" | "seconds" => 1.0,
        "m" | "min" | "mins" | "minute" | "minutes" => 60.0,
        "h" | "hr" | "hrs" | "hour" | "hours" => 60.0 * 60.0,
        "d" | "day" | "days" => 60.0 * 60.0 * 24.0,
        other => {
            return Err(format!(
                "unsupported duration unit `{}` (use ms, s, m, h, or d)",
                other
            ));
        }
    };
    checked_duration(value * seconds_multiplier, trimmed)
}

fn checked_duration(seconds: f64, trimmed: &str) -> Result<Duration, String> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(format!("duration must be positive: `{}`", trimmed));
    }
    let max_seconds = Duration::MAX.as_secs_f64();
    if seconds > max_seconds {
        return Err(format!("duration `{}` is too large", trimmed));
    }
    Ok(Duration::from_secs_f64(seconds))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConfiguredTimeZone {
    Local,
    Named(Tz),
}

impl ConfiguredTimeZone {
    pub fn now_label(&self, fmt: &str) -> String {
        match self {
            ConfiguredTimeZone::Local => Local::now().format(fmt).to_string(),
            ConfiguredTimeZone::Named(tz) => {
                Utc::now().with_timezone(tz).format(fmt).to_string()
            }
        }
    }

    pub fn label(&self) -> String {
        match self {
            ConfiguredTimeZone::Local => "local".to_string(),
            ConfiguredTimeZone::Named(tz) => tz.name().to_string(),
        }
    }
}

impl FromStr for ConfiguredTimeZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("local") {
            return Ok(ConfiguredTimeZone::Local);
        }
        trimmed
            .parse::<Tz>()
            .map(ConfiguredTimeZone::Named)
            .map_err(|err| format!("unknown time zone `{trimmed}`: {err}"))
    }
}
