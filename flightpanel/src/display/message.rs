//! One-line display message formatting.
//!
//! Builds the text the display adapter renders. Segments are only included
//! when their data is present, so a sparse snapshot degrades to whatever is
//! known instead of printing placeholders like "N/A".

use chrono::NaiveDateTime;

use super::mode::DisplayMode;
use crate::status::FlightStatusSnapshot;

/// Clock style for rendered times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFormat {
    /// 24-hour clock, e.g. "14:30".
    #[default]
    TwentyFourHour,
    /// 12-hour clock, e.g. "02:30".
    TwelveHour,
}

impl TimeFormat {
    fn clock(&self, now: NaiveDateTime) -> String {
        match self {
            TimeFormat::TwentyFourHour => now.format("%H:%M").to_string(),
            TimeFormat::TwelveHour => now.format("%I:%M").to_string(),
        }
    }
}

/// Render the display line for one tick.
pub fn format_message(
    mode: DisplayMode,
    snapshot: &FlightStatusSnapshot,
    ident: &str,
    now: NaiveDateTime,
    time_format: TimeFormat,
) -> String {
    match mode {
        DisplayMode::NotFound => format!("{} NOT FOUND", ident.to_uppercase()),
        DisplayMode::Standby => format!(
            "{}  {}",
            now.format("%m/%d/%y"),
            time_format.clock(now)
        ),
        DisplayMode::Tracking => format_tracking(snapshot, ident, now, time_format),
    }
}

fn format_tracking(
    snapshot: &FlightStatusSnapshot,
    ident: &str,
    now: NaiveDateTime,
    time_format: TimeFormat,
) -> String {
    let callsign = snapshot
        .position
        .as_ref()
        .map(|p| p.callsign.as_str())
        .unwrap_or(ident);

    let mut parts = vec![callsign.to_uppercase()];

    let route = route_segment(snapshot);
    if let Some(route) = &route {
        parts.push(route.clone());
    } else {
        parts.push(time_format.clock(now));
    }

    if let Some(fix) = &snapshot.position {
        parts.push(format!("{}FT", fix.altitude_ft));
        if route.is_none() {
            parts.push(format!("{}KT", fix.ground_speed_kt));
        }
    }

    if let Some(gate) = snapshot.schedule.as_ref().and_then(|s| s.gate.as_deref()) {
        parts.push(format!("GATE {}", gate));
    }

    if let Some(weather) = &snapshot.weather {
        parts.push(format!(
            "{} {}F",
            weather.condition.to_uppercase(),
            weather.temperature_f
        ));
    }

    // Wider gaps when a route is shown, matching the sign's reading rhythm
    if route.is_some() {
        parts.join("   ")
    } else {
        parts.join(" ")
    }
}

/// Route segment from whichever schedule endpoints are known.
fn route_segment(snapshot: &FlightStatusSnapshot) -> Option<String> {
    let schedule = snapshot.schedule.as_ref()?;
    match (schedule.origin.as_deref(), schedule.destination.as_deref()) {
        (Some(origin), Some(destination)) => Some(format!("{} > {}", origin, destination)),
        (Some(origin), None) => Some(format!("(FROM:{})", origin)),
        (None, Some(destination)) => Some(format!("(TO:{})", destination)),
        (None, None) => None,
    }
}
