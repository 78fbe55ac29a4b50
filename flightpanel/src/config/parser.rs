//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct
//! fields. Parsing starts from `ConfigFile::default()` and overlays any
//! values found in the INI.

use chrono::{NaiveDate, NaiveTime, Weekday};
use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::display::TimeFormat;

/// Parse an `Ini` object into a `ConfigFile`.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [flight] section
    if let Some(section) = ini.section(Some("flight")) {
        if let Some(v) = section.get("number") {
            config.flight.ident = v.trim().to_uppercase();
        }
        if let Some(v) = section.get("date") {
            config.flight.date = Some(NaiveDate::parse_from_str(v, "%Y-%m-%d").map_err(|_| {
                invalid("flight", "date", v, "expected a date like '2026-08-07'")
            })?);
        }
    }

    // [operational_window] section
    if let Some(section) = ini.section(Some("operational_window")) {
        if let Some(v) = section.get("start") {
            config.window.start = parse_time("operational_window", "start", v)?;
        }
        if let Some(v) = section.get("end") {
            config.window.end = parse_time("operational_window", "end", v)?;
        }
        if let Some(v) = section.get("days") {
            config.window.days = parse_days(v)?;
        }
    }

    // [budget] section
    if let Some(section) = ini.section(Some("budget")) {
        if let Some(v) = section.get("position_quota") {
            config.budget.position_quota = parse_number("budget", "position_quota", v)?;
        }
        if let Some(v) = section.get("position_window_secs") {
            config.budget.position_window_secs =
                parse_number("budget", "position_window_secs", v)?;
        }
        if let Some(v) = section.get("schedule_quota") {
            config.budget.schedule_quota = parse_number("budget", "schedule_quota", v)?;
        }
        if let Some(v) = section.get("schedule_window_secs") {
            config.budget.schedule_window_secs =
                parse_number("budget", "schedule_window_secs", v)?;
        }
        if let Some(v) = section.get("weather_quota") {
            config.budget.weather_quota = parse_number("budget", "weather_quota", v)?;
        }
        if let Some(v) = section.get("weather_window_secs") {
            config.budget.weather_window_secs =
                parse_number("budget", "weather_window_secs", v)?;
        }
    }

    // [poll] section
    if let Some(section) = ini.section(Some("poll")) {
        if let Some(v) = section.get("interval_secs") {
            let interval: u64 = parse_number("poll", "interval_secs", v)?;
            if interval == 0 {
                return Err(invalid("poll", "interval_secs", v, "must be at least 1"));
            }
            config.poll.interval_secs = interval;
        }
        if let Some(v) = section.get("request_timeout_secs") {
            let timeout: u64 = parse_number("poll", "request_timeout_secs", v)?;
            if timeout == 0 {
                return Err(invalid(
                    "poll",
                    "request_timeout_secs",
                    v,
                    "must be at least 1",
                ));
            }
            config.poll.request_timeout_secs = timeout;
        }
    }

    // [providers] section
    if let Some(section) = ini.section(Some("providers")) {
        if let Some(v) = section.get("position_token_url") {
            config.providers.position_token_url = v.trim().to_string();
        }
        if let Some(v) = section.get("position_states_url") {
            config.providers.position_states_url = v.trim().to_string();
        }
        if let Some(v) = section.get("schedule_flights_url") {
            config.providers.schedule_flights_url = v.trim().to_string();
        }
        if let Some(v) = section.get("weather_url") {
            config.providers.weather_url = v.trim().to_string();
        }
    }

    // [display] section
    if let Some(section) = ini.section(Some("display")) {
        if let Some(v) = section.get("time_format") {
            config.display.time_format = match v.to_lowercase().as_str() {
                "24h" => TimeFormat::TwentyFourHour,
                "12h" => TimeFormat::TwelveHour,
                _ => return Err(invalid("display", "time_format", v, "must be '24h' or '12h'")),
            };
        }
    }

    // [data] section
    if let Some(section) = ini.section(Some("data")) {
        if let Some(v) = section.get("airports_file") {
            config.data.airports_file = v.trim().into();
        }
        if let Some(v) = section.get("usage_file") {
            config.data.usage_file = v.trim().into();
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_time(section: &str, key: &str, value: &str) -> Result<NaiveTime, ConfigFileError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| invalid(section, key, value, "expected a time like '08:00'"))
}

fn parse_number<T: std::str::FromStr>(
    section: &str,
    key: &str,
    value: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, "must be a non-negative integer"))
}

/// Parse a day list: "all" or comma-separated three-letter names.
fn parse_days(value: &str) -> Result<Vec<Weekday>, ConfigFileError> {
    if value.trim().eq_ignore_ascii_case("all") {
        return Ok(super::defaults::ALL_WEEKDAYS.to_vec());
    }

    let mut days = Vec::new();
    for part in value.split(',') {
        let day = match part.trim().to_lowercase().as_str() {
            "mon" => Weekday::Mon,
            "tue" => Weekday::Tue,
            "wed" => Weekday::Wed,
            "thu" => Weekday::Thu,
            "fri" => Weekday::Fri,
            "sat" => Weekday::Sat,
            "sun" => Weekday::Sun,
            _ => {
                return Err(invalid(
                    "operational_window",
                    "days",
                    value,
                    "expected 'all' or a list like 'mon,tue,fri'",
                ))
            }
        };
        if !days.contains(&day) {
            days.push(day);
        }
    }

    Ok(days)
}
