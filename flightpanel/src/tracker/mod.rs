//! Poll loop driver.
//!
//! Owns one instance of each component for the process lifetime and runs
//! the tick cycle: window check → provider lookup (consuming budget) →
//! display decision → render → persist usage → sleep. Single-threaded and
//! cooperative; provider calls are sequential within a tick, each bounded
//! by its own timeout. Cancellation is whole-process termination.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use tracing::{debug, info, warn};

use crate::budget::BudgetTracker;
use crate::display::{decide, DisplayAdapter, DisplayMode};
use crate::orchestrator::QueryOrchestrator;
use crate::provider::{PositionClient, ProviderId, ScheduleClient, WeatherClient};
use crate::status::FlightQuery;
use crate::window::OperationalWindow;

/// The poll loop: ticks at a fixed interval and drives the display.
pub struct FlightTracker<P, S, W, D> {
    query: FlightQuery,
    orchestrator: QueryOrchestrator<P, S, W>,
    budget: BudgetTracker,
    window: OperationalWindow,
    display: D,
    poll_interval: Duration,
    usage_path: Option<PathBuf>,
}

impl<P, S, W, D> FlightTracker<P, S, W, D>
where
    P: PositionClient,
    S: ScheduleClient,
    W: WeatherClient,
    D: DisplayAdapter,
{
    /// Assemble a tracker from its components.
    pub fn new(
        query: FlightQuery,
        orchestrator: QueryOrchestrator<P, S, W>,
        budget: BudgetTracker,
        window: OperationalWindow,
        display: D,
        poll_interval: Duration,
    ) -> Self {
        Self {
            query,
            orchestrator,
            budget,
            window,
            display,
            poll_interval,
            usage_path: None,
        }
    }

    /// Persist budget usage to the given file after every tick.
    pub fn with_usage_path(mut self, path: PathBuf) -> Self {
        self.usage_path = Some(path);
        self
    }

    /// Run until process termination.
    pub async fn run(mut self) {
        info!(
            flight = %self.query.ident,
            poll_interval_secs = self.poll_interval.as_secs(),
            "flight tracker started"
        );

        loop {
            let now_utc = Utc::now();
            let now_local = Local::now().naive_local();

            self.tick(now_utc, now_local).await;

            let sleep = self.sleep_duration(now_local);
            debug!(sleep_secs = sleep.as_secs(), "tick complete");
            tokio::time::sleep(sleep).await;
        }
    }

    /// One full pass. Separated from [`run`](Self::run) so tests can drive
    /// ticks with injected clocks.
    pub async fn tick(&mut self, now_utc: DateTime<Utc>, now_local: NaiveDateTime) -> DisplayMode {
        let window_ok = self.window.contains(now_local);

        let outcome = self
            .orchestrator
            .lookup(&self.query, &mut self.budget, now_utc)
            .await;

        let mode = decide(&outcome.snapshot, window_ok, outcome.any_call_permitted);

        self.log_usage(now_utc);
        self.persist_usage();

        if let Err(e) = self.display.render(mode, &outcome.snapshot, now_local) {
            warn!(error = %e, "display render failed");
        }

        mode
    }

    /// How long to sleep after a tick.
    ///
    /// Inside the window this is the poll interval. Outside, the sleep is
    /// shortened so the tracker wakes right when the window opens instead
    /// of up to one interval late. It never sleeps longer than the poll
    /// interval, because the standby clock still has to advance.
    fn sleep_duration(&self, now_local: NaiveDateTime) -> Duration {
        if self.window.contains(now_local) {
            return self.poll_interval;
        }

        match self.window.next_opening(now_local) {
            Some(opening) => {
                let until = (opening - now_local)
                    .to_std()
                    .unwrap_or(Duration::ZERO)
                    .max(Duration::from_secs(1));
                until.min(self.poll_interval)
            }
            None => self.poll_interval,
        }
    }

    fn log_usage(&self, now: DateTime<Utc>) {
        let (position_used, position_quota) = self.budget.usage(ProviderId::Position, now);
        let (schedule_used, schedule_quota) = self.budget.usage(ProviderId::Schedule, now);
        let (weather_used, weather_quota) = self.budget.usage(ProviderId::Weather, now);
        info!(
            position_used,
            position_quota,
            schedule_used,
            schedule_quota,
            weather_used,
            weather_quota,
            "provider budget usage"
        );
    }

    fn persist_usage(&self) {
        if let Some(path) = &self.usage_path {
            if let Err(e) = self.budget.to_usage_state().save(path) {
                warn!(path = %path.display(), error = %e, "failed to persist budget usage");
            }
        }
    }
}
