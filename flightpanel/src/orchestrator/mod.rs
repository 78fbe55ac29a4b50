//! Provider query orchestration.
//!
//! Issues the per-tick calls to the position, schedule and weather
//! providers, asking the budget tracker for permission before each one and
//! bounding each call with its own timeout. Partial results merge into one
//! [`FlightStatusSnapshot`]; a failure or budget denial for one provider
//! never blocks the others. No provider failure aborts a tick, and nothing
//! is retried within a tick; the next poll retries naturally.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::airports::AirportIndex;
use crate::budget::BudgetTracker;
use crate::provider::{
    PositionClient, ProviderError, ProviderId, ScheduleClient, WeatherClient,
};
use crate::status::{FlightQuery, FlightStatusSnapshot};

/// Result of one tick's provider fan-out.
#[derive(Debug, Clone)]
pub struct LookupOutcome {
    /// Whatever the providers yielded this tick.
    pub snapshot: FlightStatusSnapshot,
    /// True when at least one provider call was permitted by the budget.
    pub any_call_permitted: bool,
}

/// Queries the three providers and merges their results.
pub struct QueryOrchestrator<P, S, W> {
    position: P,
    schedule: S,
    weather: W,
    airports: AirportIndex,
    call_timeout: Duration,
}

impl<P, S, W> QueryOrchestrator<P, S, W>
where
    P: PositionClient,
    S: ScheduleClient,
    W: WeatherClient,
{
    /// Create an orchestrator over the given provider clients.
    pub fn new(
        position: P,
        schedule: S,
        weather: W,
        airports: AirportIndex,
        call_timeout: Duration,
    ) -> Self {
        Self {
            position,
            schedule,
            weather,
            airports,
            call_timeout,
        }
    }

    /// Run one tick's lookups.
    ///
    /// The position provider goes first: a definitive not-found makes the
    /// schedule and weather lookups moot, and their budget is left
    /// untouched. The weather lookup only runs once a location has been
    /// established this tick.
    pub async fn lookup(
        &self,
        query: &FlightQuery,
        budget: &mut BudgetTracker,
        now: DateTime<Utc>,
    ) -> LookupOutcome {
        let mut snapshot = FlightStatusSnapshot::default();
        let mut any_call_permitted = false;

        if budget.try_consume(ProviderId::Position, now) {
            any_call_permitted = true;
            match self.bounded(ProviderId::Position, self.position.query(query)).await {
                Ok(fix) => snapshot.position = Some(fix),
                Err(ProviderError::NotFound(ident)) => {
                    info!(flight = %ident, "position provider does not know this flight");
                    snapshot.flight_not_found = true;
                    return LookupOutcome {
                        snapshot,
                        any_call_permitted,
                    };
                }
                Err(_) => {}
            }
        }

        if budget.try_consume(ProviderId::Schedule, now) {
            any_call_permitted = true;
            if let Ok(mut schedule) = self
                .bounded(ProviderId::Schedule, self.schedule.query(query))
                .await
            {
                if let Some(code) = schedule.origin.take() {
                    schedule.origin = Some(self.airports.display_code(&code));
                }
                if let Some(code) = schedule.destination.take() {
                    schedule.destination = Some(self.airports.display_code(&code));
                }
                snapshot.schedule = Some(schedule);
            }
        }

        match self.weather_location(&snapshot) {
            Some((latitude, longitude)) => {
                if budget.try_consume(ProviderId::Weather, now) {
                    any_call_permitted = true;
                    if let Ok(report) = self
                        .bounded(ProviderId::Weather, self.weather.query(latitude, longitude))
                        .await
                    {
                        snapshot.weather = Some(report);
                    }
                }
            }
            None => debug!("no location established this tick, skipping weather lookup"),
        }

        LookupOutcome {
            snapshot,
            any_call_permitted,
        }
    }

    /// Await a provider call under the configured timeout. A timeout
    /// surfaces as an HTTP-class transient error; not-found passes through
    /// since only the position lookup treats it specially.
    async fn bounded<T>(
        &self,
        id: ProviderId,
        call: impl std::future::Future<Output = Result<T, ProviderError>>,
    ) -> Result<T, ProviderError> {
        match timeout(self.call_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) if e.is_not_found() => {
                debug!(provider = %id, error = %e, "provider reported not found");
                Err(e)
            }
            Ok(Err(e)) => {
                warn!(provider = %id, error = %e, "provider call failed");
                Err(e)
            }
            Err(_) => {
                warn!(
                    provider = %id,
                    timeout_secs = self.call_timeout.as_secs(),
                    "provider call timed out"
                );
                Err(ProviderError::Http(format!(
                    "call timed out after {}s",
                    self.call_timeout.as_secs()
                )))
            }
        }
    }

    /// Where to query weather this tick.
    ///
    /// Requires a position fix, since without one no location was established.
    /// Prefers the destination airport's coordinates when the schedule
    /// named one the index resolves, falling back to the aircraft's
    /// current coordinates.
    fn weather_location(&self, snapshot: &FlightStatusSnapshot) -> Option<(f64, f64)> {
        let fix = snapshot.position.as_ref()?;

        if let Some(icao) = snapshot
            .schedule
            .as_ref()
            .and_then(|s| s.destination_icao.as_deref())
        {
            if let Some(coords) = self.airports.coordinates(icao) {
                return Some(coords);
            }
        }

        Some((fix.latitude, fix.longitude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airports::Airport;
    use crate::config::BudgetSettings;
    use crate::status::{FlightSchedule, PositionFix, WeatherReport};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // ========================================================================
    // Mock provider clients
    // ========================================================================

    struct MockPosition {
        result: Mutex<Result<PositionFix, ProviderError>>,
        calls: AtomicUsize,
    }

    impl MockPosition {
        fn ok() -> Self {
            Self::with(Ok(fix()))
        }

        fn not_found() -> Self {
            Self::with(Err(ProviderError::NotFound("BAW123".to_string())))
        }

        fn failing() -> Self {
            Self::with(Err(ProviderError::Http("HTTP 503".to_string())))
        }

        fn with(result: Result<PositionFix, ProviderError>) -> Self {
            Self {
                result: Mutex::new(result),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PositionClient for MockPosition {
        async fn query(&self, _query: &FlightQuery) -> Result<PositionFix, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.lock().unwrap().clone()
        }
    }

    struct MockSchedule {
        result: Mutex<Result<FlightSchedule, ProviderError>>,
        calls: AtomicUsize,
    }

    impl MockSchedule {
        fn ok() -> Self {
            Self::with(Ok(schedule()))
        }

        fn failing() -> Self {
            Self::with(Err(ProviderError::Http("HTTP 500".to_string())))
        }

        fn with(result: Result<FlightSchedule, ProviderError>) -> Self {
            Self {
                result: Mutex::new(result),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ScheduleClient for MockSchedule {
        async fn query(&self, _query: &FlightQuery) -> Result<FlightSchedule, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.lock().unwrap().clone()
        }
    }

    struct MockWeather {
        result: Mutex<Result<WeatherReport, ProviderError>>,
        calls: AtomicUsize,
        queried: Mutex<Vec<(f64, f64)>>,
    }

    impl MockWeather {
        fn ok() -> Self {
            Self::with(Ok(WeatherReport {
                condition: "Clouds".to_string(),
                temperature_f: 72,
            }))
        }

        fn failing() -> Self {
            Self::with(Err(ProviderError::Http("timed out".to_string())))
        }

        fn with(result: Result<WeatherReport, ProviderError>) -> Self {
            Self {
                result: Mutex::new(result),
                calls: AtomicUsize::new(0),
                queried: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl WeatherClient for MockWeather {
        async fn query(&self, latitude: f64, longitude: f64) -> Result<WeatherReport, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queried.lock().unwrap().push((latitude, longitude));
            self.result.lock().unwrap().clone()
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn fix() -> PositionFix {
        PositionFix {
            callsign: "BAW123".to_string(),
            latitude: 51.47,
            longitude: -0.45,
            altitude_ft: 35000,
            ground_speed_kt: 450,
            heading: 270,
        }
    }

    fn schedule() -> FlightSchedule {
        FlightSchedule {
            origin: Some("EGLL".to_string()),
            destination: Some("KJFK".to_string()),
            destination_icao: Some("KJFK".to_string()),
            ..Default::default()
        }
    }

    fn airports() -> AirportIndex {
        AirportIndex::from_entries([
            (
                "EGLL".to_string(),
                Airport {
                    iata: "LHR".to_string(),
                    lat: 51.4775,
                    lon: -0.4614,
                },
            ),
            (
                "KJFK".to_string(),
                Airport {
                    iata: "JFK".to_string(),
                    lat: 40.6398,
                    lon: -73.7789,
                },
            ),
        ])
    }

    fn budget() -> BudgetTracker {
        BudgetTracker::new(
            &BudgetSettings {
                position_quota: 10,
                position_window_secs: 3600,
                schedule_quota: 10,
                schedule_window_secs: 3600,
                weather_quota: 10,
                weather_window_secs: 3600,
            },
            Utc::now(),
        )
    }

    fn empty_budget() -> BudgetTracker {
        BudgetTracker::new(
            &BudgetSettings {
                position_quota: 0,
                position_window_secs: 3600,
                schedule_quota: 0,
                schedule_window_secs: 3600,
                weather_quota: 0,
                weather_window_secs: 3600,
            },
            Utc::now(),
        )
    }

    fn orchestrator(
        position: MockPosition,
        schedule: MockSchedule,
        weather: MockWeather,
    ) -> QueryOrchestrator<MockPosition, MockSchedule, MockWeather> {
        QueryOrchestrator::new(
            position,
            schedule,
            weather,
            airports(),
            Duration::from_secs(5),
        )
    }

    // ========================================================================
    // Tests
    // ========================================================================

    #[tokio::test]
    async fn full_lookup_populates_all_fields() {
        let orch = orchestrator(MockPosition::ok(), MockSchedule::ok(), MockWeather::ok());
        let mut budget = budget();

        let outcome = orch
            .lookup(&FlightQuery::new("BAW123"), &mut budget, Utc::now())
            .await;

        assert!(outcome.any_call_permitted);
        assert!(outcome.snapshot.position.is_some());
        assert!(outcome.snapshot.weather.is_some());
        let schedule = outcome.snapshot.schedule.unwrap();
        // Display codes resolved through the airport index
        assert_eq!(schedule.origin.as_deref(), Some("LHR"));
        assert_eq!(schedule.destination.as_deref(), Some("JFK"));
    }

    #[tokio::test]
    async fn not_found_short_circuits_schedule_and_weather() {
        let orch = orchestrator(
            MockPosition::not_found(),
            MockSchedule::ok(),
            MockWeather::ok(),
        );
        let mut budget = budget();

        let outcome = orch
            .lookup(&FlightQuery::new("BAW123"), &mut budget, Utc::now())
            .await;

        assert!(outcome.snapshot.flight_not_found);
        assert!(!outcome.snapshot.has_data());
        assert_eq!(orch.schedule.call_count(), 0);
        assert_eq!(orch.weather.call_count(), 0);
        // Their budget is untouched too
        assert_eq!(budget.usage(ProviderId::Schedule, Utc::now()).0, 0);
        assert_eq!(budget.usage(ProviderId::Weather, Utc::now()).0, 0);
    }

    #[tokio::test]
    async fn weather_failure_leaves_other_fields_intact() {
        let orch = orchestrator(MockPosition::ok(), MockSchedule::ok(), MockWeather::failing());
        let mut budget = budget();

        let outcome = orch
            .lookup(&FlightQuery::new("BAW123"), &mut budget, Utc::now())
            .await;

        assert!(outcome.snapshot.position.is_some());
        assert!(outcome.snapshot.schedule.is_some());
        assert!(outcome.snapshot.weather.is_none());
        assert!(!outcome.snapshot.flight_not_found);
    }

    #[tokio::test]
    async fn position_failure_does_not_block_schedule() {
        let orch = orchestrator(MockPosition::failing(), MockSchedule::ok(), MockWeather::ok());
        let mut budget = budget();

        let outcome = orch
            .lookup(&FlightQuery::new("BAW123"), &mut budget, Utc::now())
            .await;

        assert!(outcome.snapshot.position.is_none());
        assert!(outcome.snapshot.schedule.is_some());
        // No position fix, so no location was established for weather
        assert_eq!(orch.weather.call_count(), 0);
        assert!(outcome.snapshot.weather.is_none());
    }

    #[tokio::test]
    async fn exhausted_budget_skips_every_call() {
        let orch = orchestrator(MockPosition::ok(), MockSchedule::ok(), MockWeather::ok());
        let mut budget = empty_budget();

        let outcome = orch
            .lookup(&FlightQuery::new("BAW123"), &mut budget, Utc::now())
            .await;

        assert!(!outcome.any_call_permitted);
        assert!(!outcome.snapshot.has_data());
        assert_eq!(orch.position.call_count(), 0);
        assert_eq!(orch.schedule.call_count(), 0);
        assert_eq!(orch.weather.call_count(), 0);
    }

    #[tokio::test]
    async fn weather_queries_destination_airport_coordinates() {
        let orch = orchestrator(MockPosition::ok(), MockSchedule::ok(), MockWeather::ok());
        let mut budget = budget();

        orch.lookup(&FlightQuery::new("BAW123"), &mut budget, Utc::now())
            .await;

        let queried = orch.weather.queried.lock().unwrap().clone();
        assert_eq!(queried.len(), 1);
        // KJFK coordinates from the airport index, not the aircraft's
        assert!((queried[0].0 - 40.6398).abs() < 0.0001);
        assert!((queried[0].1 - (-73.7789)).abs() < 0.0001);
    }

    #[tokio::test]
    async fn weather_falls_back_to_aircraft_coordinates() {
        let orch = orchestrator(MockPosition::ok(), MockSchedule::failing(), MockWeather::ok());
        let mut budget = budget();

        let outcome = orch
            .lookup(&FlightQuery::new("BAW123"), &mut budget, Utc::now())
            .await;

        assert!(outcome.snapshot.weather.is_some());
        let queried = orch.weather.queried.lock().unwrap().clone();
        assert!((queried[0].0 - 51.47).abs() < 0.0001);
        assert!((queried[0].1 - (-0.45)).abs() < 0.0001);
    }

    #[tokio::test]
    async fn partial_budget_still_counts_as_permitted() {
        let orch = orchestrator(MockPosition::ok(), MockSchedule::ok(), MockWeather::ok());
        // Only the schedule provider has budget left
        let mut budget = BudgetTracker::new(
            &BudgetSettings {
                position_quota: 0,
                position_window_secs: 3600,
                schedule_quota: 1,
                schedule_window_secs: 3600,
                weather_quota: 0,
                weather_window_secs: 3600,
            },
            Utc::now(),
        );

        let outcome = orch
            .lookup(&FlightQuery::new("BAW123"), &mut budget, Utc::now())
            .await;

        assert!(outcome.any_call_permitted);
        assert!(outcome.snapshot.position.is_none());
        assert!(outcome.snapshot.schedule.is_some());
    }
}
