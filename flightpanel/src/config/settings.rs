//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime, Weekday};

use crate::display::TimeFormat;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Tracked flight
    pub flight: FlightSettings,
    /// Operational window
    pub window: WindowSettings,
    /// Provider call budgets
    pub budget: BudgetSettings,
    /// Poll loop timing
    pub poll: PollSettings,
    /// Provider endpoints
    pub providers: ProviderSettings,
    /// Display rendering
    pub display: DisplaySettings,
    /// Data file locations
    pub data: DataSettings,
}

/// The flight to track.
#[derive(Debug, Clone)]
pub struct FlightSettings {
    /// Flight identifier (callsign or commercial flight number).
    /// Empty means "must be supplied on the command line".
    pub ident: String,
    /// Optional departure date restriction.
    pub date: Option<NaiveDate>,
}

/// Operational window configuration.
#[derive(Debug, Clone)]
pub struct WindowSettings {
    /// Window opening time of day.
    pub start: NaiveTime,
    /// Window closing time of day (exclusive). May be before `start` for
    /// windows spanning midnight.
    pub end: NaiveTime,
    /// Days the window applies on.
    pub days: Vec<Weekday>,
}

/// Per-provider call quotas.
#[derive(Debug, Clone)]
pub struct BudgetSettings {
    /// Position calls permitted per window.
    pub position_quota: u32,
    /// Position budget window length in seconds.
    pub position_window_secs: u64,
    /// Schedule calls permitted per window.
    pub schedule_quota: u32,
    /// Schedule budget window length in seconds.
    pub schedule_window_secs: u64,
    /// Weather calls permitted per window.
    pub weather_quota: u32,
    /// Weather budget window length in seconds.
    pub weather_window_secs: u64,
}

/// Poll loop timing.
#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Seconds between ticks.
    pub interval_secs: u64,
    /// Per-call timeout in seconds for provider requests.
    pub request_timeout_secs: u64,
}

/// Provider endpoint URLs.
///
/// Overridable mainly for testing against local fixtures.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// OAuth2 token endpoint for the position provider.
    pub position_token_url: String,
    /// State-vector endpoint for the position provider.
    pub position_states_url: String,
    /// Flights endpoint for the schedule provider.
    pub schedule_flights_url: String,
    /// Current-conditions endpoint for the weather provider.
    pub weather_url: String,
}

/// Display rendering options.
#[derive(Debug, Clone)]
pub struct DisplaySettings {
    /// Clock style for rendered times.
    pub time_format: TimeFormat,
}

/// Locations of auxiliary data files.
#[derive(Debug, Clone)]
pub struct DataSettings {
    /// Airport index JSON file.
    pub airports_file: PathBuf,
    /// Budget usage persistence file.
    pub usage_file: PathBuf,
}
