//! Default values and constants for all configuration settings.

use chrono::{NaiveTime, Weekday};

use super::settings::*;
use crate::display::TimeFormat;

/// Default operational window opening hour (08:00 local).
pub const DEFAULT_WINDOW_START_HOUR: u32 = 8;

/// Default operational window closing hour (20:00 local).
pub const DEFAULT_WINDOW_END_HOUR: u32 = 20;

/// Default position calls per window.
pub const DEFAULT_POSITION_QUOTA: u32 = 120;

/// Default schedule calls per window. The schedule provider is the
/// metered one, so the default is deliberately small.
pub const DEFAULT_SCHEDULE_QUOTA: u32 = 10;

/// Default weather calls per window.
pub const DEFAULT_WEATHER_QUOTA: u32 = 30;

/// Default budget window length: one hour.
pub const DEFAULT_BUDGET_WINDOW_SECS: u64 = 3600;

/// Default seconds between poll ticks.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Default per-call timeout for provider requests.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default OAuth2 token endpoint for the position provider.
pub const DEFAULT_POSITION_TOKEN_URL: &str =
    "https://auth.opensky-network.org/auth/realms/opensky-network/protocol/openid-connect/token";

/// Default state-vector endpoint for the position provider.
pub const DEFAULT_POSITION_STATES_URL: &str = "https://opensky-network.org/api/states/all";

/// Default flights endpoint for the schedule provider.
pub const DEFAULT_SCHEDULE_FLIGHTS_URL: &str =
    "https://aeroapi.flightaware.com/aeroapi/flights";

/// Default current-conditions endpoint for the weather provider.
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// All days of the week, Monday first.
pub const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn hour(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap_or(NaiveTime::MIN)
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            flight: FlightSettings::default(),
            window: WindowSettings::default(),
            budget: BudgetSettings::default(),
            poll: PollSettings::default(),
            providers: ProviderSettings::default(),
            display: DisplaySettings::default(),
            data: DataSettings::default(),
        }
    }
}

impl Default for FlightSettings {
    fn default() -> Self {
        Self {
            ident: String::new(),
            date: None,
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            start: hour(DEFAULT_WINDOW_START_HOUR),
            end: hour(DEFAULT_WINDOW_END_HOUR),
            days: ALL_WEEKDAYS.to_vec(),
        }
    }
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            position_quota: DEFAULT_POSITION_QUOTA,
            position_window_secs: DEFAULT_BUDGET_WINDOW_SECS,
            schedule_quota: DEFAULT_SCHEDULE_QUOTA,
            schedule_window_secs: DEFAULT_BUDGET_WINDOW_SECS,
            weather_quota: DEFAULT_WEATHER_QUOTA,
            weather_window_secs: DEFAULT_BUDGET_WINDOW_SECS,
        }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            position_token_url: DEFAULT_POSITION_TOKEN_URL.to_string(),
            position_states_url: DEFAULT_POSITION_STATES_URL.to_string(),
            schedule_flights_url: DEFAULT_SCHEDULE_FLIGHTS_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            time_format: TimeFormat::default(),
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        let dir = super::file::config_directory();
        Self {
            airports_file: dir.join("airports.json"),
            usage_file: dir.join("usage.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_daytime_every_day() {
        let window = WindowSettings::default();
        assert_eq!(window.start, hour(8));
        assert_eq!(window.end, hour(20));
        assert_eq!(window.days.len(), 7);
    }

    #[test]
    fn default_flight_is_unset() {
        assert!(FlightSettings::default().ident.is_empty());
    }

    #[test]
    fn schedule_quota_is_the_smallest() {
        let budget = BudgetSettings::default();
        assert!(budget.schedule_quota < budget.position_quota);
        assert!(budget.schedule_quota < budget.weather_quota);
    }
}
