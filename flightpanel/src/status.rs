//! Core data model for flight tracking.
//!
//! These are plain data types shared by the provider clients, the
//! orchestrator and the display layer. The snapshot is rebuilt from scratch
//! on every poll tick; nothing here carries state between ticks.

use chrono::{DateTime, NaiveDate, Utc};

/// The flight being tracked, fixed at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightQuery {
    /// Flight identifier (ICAO callsign or commercial flight number, e.g. "BAW123").
    pub ident: String,

    /// Optional departure date used to disambiguate the schedule lookup.
    pub date: Option<NaiveDate>,
}

impl FlightQuery {
    /// Create a query for a flight identifier with no date restriction.
    pub fn new(ident: impl Into<String>) -> Self {
        Self {
            ident: ident.into(),
            date: None,
        }
    }

    /// Restrict the query to a specific departure date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// Live position report from the position provider.
///
/// Altitude and speed are already converted to the display units
/// (feet and knots) by the position client.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionFix {
    /// Callsign as reported by the provider, trimmed.
    pub callsign: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Barometric altitude in feet.
    pub altitude_ft: i32,
    /// Ground speed in knots.
    pub ground_speed_kt: i32,
    /// True track in degrees from north.
    pub heading: i32,
}

/// Schedule information from the schedule provider.
///
/// `origin` and `destination` hold display codes (IATA where the airport
/// index can resolve them, otherwise the code as reported).
/// `destination_icao` keeps the raw reported code for lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightSchedule {
    /// Origin airport display code.
    pub origin: Option<String>,
    /// Destination airport display code.
    pub destination: Option<String>,
    /// Destination airport code as reported by the provider.
    pub destination_icao: Option<String>,
    /// Scheduled departure time.
    pub scheduled_out: Option<DateTime<Utc>>,
    /// Scheduled arrival time.
    pub scheduled_in: Option<DateTime<Utc>>,
    /// Arrival gate.
    pub gate: Option<String>,
    /// Arrival terminal.
    pub terminal: Option<String>,
}

/// Current conditions at the destination, from the weather provider.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// Condition word, e.g. "Clouds" or "Rain".
    pub condition: String,
    /// Temperature in degrees Fahrenheit.
    pub temperature_f: i32,
}

/// Composite status for one poll tick.
///
/// Each field is independently present or absent depending on which
/// provider call succeeded this tick. Fields only ever come from their own
/// provider; there is no cross-provider reconciliation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightStatusSnapshot {
    /// Live position, when the position call succeeded.
    pub position: Option<PositionFix>,
    /// Schedule data, when the schedule call succeeded.
    pub schedule: Option<FlightSchedule>,
    /// Destination weather, when the weather call succeeded.
    pub weather: Option<WeatherReport>,
    /// Set when the position provider definitively reported the flight
    /// as unknown (not a transient failure).
    pub flight_not_found: bool,
}

impl FlightStatusSnapshot {
    /// Snapshot for a flight the position provider does not know.
    pub fn not_found() -> Self {
        Self {
            flight_not_found: true,
            ..Self::default()
        }
    }

    /// True when at least one provider field is populated.
    pub fn has_data(&self) -> bool {
        self.position.is_some() || self.schedule.is_some() || self.weather.is_some()
    }
}
