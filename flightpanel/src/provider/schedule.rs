//! Flight schedule provider client.
//!
//! The [`ScheduleClient`] trait abstracts the schedule source. The
//! [`AeroApiClient`] implementation queries a FlightAware AeroAPI-style
//! `/flights/{ident}` endpoint authenticated with an `x-apikey` header and
//! maps the most recent flight record to a [`FlightSchedule`].

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::http::AsyncHttpClient;
use super::types::ProviderError;
use crate::status::{FlightQuery, FlightSchedule};

/// Trait for fetching the tracked flight's schedule.
pub trait ScheduleClient: Send + Sync {
    /// Fetch schedule data for the queried flight.
    fn query(
        &self,
        query: &FlightQuery,
    ) -> impl Future<Output = Result<FlightSchedule, ProviderError>> + Send;
}

/// Flights endpoint response.
#[derive(Deserialize)]
struct FlightsResponse {
    #[serde(default)]
    flights: Vec<ScheduledFlight>,
}

/// One flight record; only the fields we render are deserialized.
#[derive(Deserialize)]
struct ScheduledFlight {
    origin: Option<AirportRef>,
    destination: Option<AirportRef>,
    scheduled_out: Option<String>,
    scheduled_in: Option<String>,
    gate_destination: Option<String>,
    terminal_destination: Option<String>,
}

#[derive(Deserialize)]
struct AirportRef {
    code: Option<String>,
}

/// Schedule client for an AeroAPI-style flights endpoint.
pub struct AeroApiClient<H: AsyncHttpClient> {
    http: H,
    api_key: String,
    flights_url: String,
}

impl<H: AsyncHttpClient> AeroApiClient<H> {
    /// Create a client for the given flights endpoint and API key.
    pub fn new(http: H, api_key: String, flights_url: String) -> Self {
        Self {
            http,
            api_key,
            flights_url,
        }
    }

    fn flight_url(&self, query: &FlightQuery) -> String {
        let base = format!(
            "{}/{}",
            self.flights_url.trim_end_matches('/'),
            query.ident
        );
        match query.date {
            Some(date) => {
                let end = date.succ_opt().unwrap_or(date);
                format!("{}?start={}&end={}", base, date, end)
            }
            None => base,
        }
    }
}

impl<H: AsyncHttpClient> ScheduleClient for AeroApiClient<H> {
    async fn query(&self, query: &FlightQuery) -> Result<FlightSchedule, ProviderError> {
        let url = self.flight_url(query);
        let body = self
            .http
            .get_with_headers(
                &url,
                &[("x-apikey", &self.api_key), ("Accept", "application/json")],
            )
            .await?;

        let parsed: FlightsResponse =
            serde_json::from_slice(&body).map_err(|e| ProviderError::Malformed(e.to_string()))?;

        debug!(
            ident = %query.ident,
            flights = parsed.flights.len(),
            "schedule provider responded"
        );

        // The endpoint returns the most recent flight first
        let flight = parsed
            .flights
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NotFound(query.ident.clone()))?;

        Ok(convert_flight(flight))
    }
}

fn convert_flight(flight: ScheduledFlight) -> FlightSchedule {
    let origin = flight.origin.and_then(|a| a.code).filter(|c| !c.is_empty());
    let destination = flight
        .destination
        .and_then(|a| a.code)
        .filter(|c| !c.is_empty());

    FlightSchedule {
        origin,
        destination_icao: destination.clone(),
        destination,
        scheduled_out: parse_timestamp(flight.scheduled_out.as_deref()),
        scheduled_in: parse_timestamp(flight.scheduled_in.as_deref()),
        gate: flight.gate_destination.filter(|g| !g.is_empty()),
        terminal: flight.terminal_destination.filter(|t| !t.is_empty()),
    }
}

/// Parse an RFC 3339 timestamp, tolerating absent or unparseable values.
fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?;
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            debug!(value = value, error = %e, "ignoring unparseable schedule timestamp");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::http::tests::MockAsyncHttpClient;
    use super::*;

    const FLIGHTS_BODY: &str = r#"{
        "flights": [
            {
                "ident": "BAW123",
                "origin": {"code": "EGLL", "name": "Heathrow"},
                "destination": {"code": "KJFK", "name": "John F Kennedy Intl"},
                "scheduled_out": "2026-08-07T14:30:00Z",
                "scheduled_in": "2026-08-07T22:05:00Z",
                "gate_destination": "4",
                "terminal_destination": "7",
                "status": "En Route"
            }
        ]
    }"#;

    fn client(http: MockAsyncHttpClient) -> AeroApiClient<MockAsyncHttpClient> {
        AeroApiClient::new(
            http,
            "key".to_string(),
            "http://api.test/flights".to_string(),
        )
    }

    #[tokio::test]
    async fn query_parses_flight_record() {
        let http = MockAsyncHttpClient::with_response(FLIGHTS_BODY);

        let schedule = client(http).query(&FlightQuery::new("BAW123")).await.unwrap();
        assert_eq!(schedule.origin.as_deref(), Some("EGLL"));
        assert_eq!(schedule.destination.as_deref(), Some("KJFK"));
        assert_eq!(schedule.destination_icao.as_deref(), Some("KJFK"));
        assert_eq!(schedule.gate.as_deref(), Some("4"));
        assert_eq!(schedule.terminal.as_deref(), Some("7"));
        assert!(schedule.scheduled_out.is_some());
        assert!(schedule.scheduled_in.is_some());
    }

    #[tokio::test]
    async fn empty_flights_list_maps_to_not_found() {
        let http = MockAsyncHttpClient::with_response(r#"{"flights": []}"#);

        let result = client(http).query(&FlightQuery::new("BAW123")).await;
        assert_eq!(result, Err(ProviderError::NotFound("BAW123".to_string())));
    }

    #[tokio::test]
    async fn missing_airports_leave_fields_absent() {
        let body = r#"{"flights": [{"scheduled_out": null, "scheduled_in": null}]}"#;
        let http = MockAsyncHttpClient::with_response(body);

        let schedule = client(http).query(&FlightQuery::new("BAW123")).await.unwrap();
        assert!(schedule.origin.is_none());
        assert!(schedule.destination.is_none());
        assert!(schedule.scheduled_out.is_none());
        assert!(schedule.gate.is_none());
    }

    #[tokio::test]
    async fn unparseable_timestamp_is_tolerated() {
        let body = r#"{"flights": [{"scheduled_out": "not-a-timestamp"}]}"#;
        let http = MockAsyncHttpClient::with_response(body);

        let schedule = client(http).query(&FlightQuery::new("BAW123")).await.unwrap();
        assert!(schedule.scheduled_out.is_none());
    }

    #[tokio::test]
    async fn date_restriction_lands_in_url() {
        let http = MockAsyncHttpClient::with_response(FLIGHTS_BODY);
        let client = client(http);

        let query = FlightQuery::new("BAW123")
            .with_date(chrono::NaiveDate::from_ymd_opt(2026, 8, 7).unwrap());
        client.query(&query).await.unwrap();

        let urls = client.http.requested_urls();
        assert_eq!(
            urls[0],
            "http://api.test/flights/BAW123?start=2026-08-07&end=2026-08-08"
        );
    }

    #[tokio::test]
    async fn http_error_passes_through() {
        let http = MockAsyncHttpClient::with_error(ProviderError::Http("HTTP 503".to_string()));

        let result = client(http).query(&FlightQuery::new("BAW123")).await;
        assert_eq!(result, Err(ProviderError::Http("HTTP 503".to_string())));
    }
}
