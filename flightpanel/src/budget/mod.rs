//! Per-provider call budget enforcement.
//!
//! Providers impose hard rate limits; exceeding them risks account
//! suspension, so the quota is enforced client-side before any network
//! call is attempted. Each provider gets an independent quota over a fixed
//! window. A denied consumption is final for the tick, with no retries.
//!
//! Time is injected as an explicit `now` parameter so the tracker stays
//! unit-testable without real clock manipulation.

mod usage;

pub use usage::{ProviderUsage, UsageError, UsageState};

use chrono::{DateTime, Duration, Utc};

use crate::config::BudgetSettings;
use crate::provider::ProviderId;

/// Call budget for a single provider over a fixed window.
#[derive(Debug, Clone)]
pub struct ProviderBudget {
    quota: u32,
    window: Duration,
    count: u32,
    window_start: DateTime<Utc>,
}

impl ProviderBudget {
    /// Create a fresh budget whose first window starts at `now`.
    pub fn new(quota: u32, window: Duration, now: DateTime<Utc>) -> Self {
        Self {
            quota,
            window,
            count: 0,
            window_start: now,
        }
    }

    fn window_expired(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.window_start) >= self.window
    }

    /// Reset the window if it has expired. Runs before any evaluation so a
    /// stale window never denies a call it should permit.
    fn roll(&mut self, now: DateTime<Utc>) {
        if self.window_expired(now) {
            self.count = 0;
            self.window_start = now;
        }
    }

    fn try_consume(&mut self, now: DateTime<Utc>) -> bool {
        self.roll(now);
        if self.count < self.quota {
            self.count += 1;
            true
        } else {
            false
        }
    }

    /// Calls consumed in the window containing `now`, without mutating.
    fn used(&self, now: DateTime<Utc>) -> u32 {
        if self.window_expired(now) {
            0
        } else {
            self.count
        }
    }
}

/// Tracks call budgets for all three providers.
#[derive(Debug, Clone)]
pub struct BudgetTracker {
    position: ProviderBudget,
    schedule: ProviderBudget,
    weather: ProviderBudget,
}

impl BudgetTracker {
    /// Build a tracker from configured quotas, all windows starting at `now`.
    pub fn new(settings: &BudgetSettings, now: DateTime<Utc>) -> Self {
        Self {
            position: ProviderBudget::new(
                settings.position_quota,
                Duration::seconds(settings.position_window_secs as i64),
                now,
            ),
            schedule: ProviderBudget::new(
                settings.schedule_quota,
                Duration::seconds(settings.schedule_window_secs as i64),
                now,
            ),
            weather: ProviderBudget::new(
                settings.weather_quota,
                Duration::seconds(settings.weather_window_secs as i64),
                now,
            ),
        }
    }

    fn budget(&self, id: ProviderId) -> &ProviderBudget {
        match id {
            ProviderId::Position => &self.position,
            ProviderId::Schedule => &self.schedule,
            ProviderId::Weather => &self.weather,
        }
    }

    fn budget_mut(&mut self, id: ProviderId) -> &mut ProviderBudget {
        match id {
            ProviderId::Position => &mut self.position,
            ProviderId::Schedule => &mut self.schedule,
            ProviderId::Weather => &mut self.weather,
        }
    }

    /// Consume one call from a provider's budget.
    ///
    /// Returns true and increments the counter iff the quota allows it.
    /// A rejection has no side effects (beyond a window reset if the
    /// window had expired) and is final for this tick.
    pub fn try_consume(&mut self, id: ProviderId, now: DateTime<Utc>) -> bool {
        let granted = self.budget_mut(id).try_consume(now);
        if !granted {
            tracing::debug!(provider = %id, "call budget exhausted, skipping call");
        }
        granted
    }

    /// `(used, quota)` for a provider's current window.
    pub fn usage(&self, id: ProviderId, now: DateTime<Utc>) -> (u32, u32) {
        let budget = self.budget(id);
        (budget.used(now), budget.quota)
    }

    /// Snapshot the counters for persistence.
    pub fn to_usage_state(&self) -> UsageState {
        let provider_usage = |b: &ProviderBudget| ProviderUsage {
            count: b.count,
            window_start: b.window_start,
        };
        UsageState {
            position: provider_usage(&self.position),
            schedule: provider_usage(&self.schedule),
            weather: provider_usage(&self.weather),
        }
    }

    /// Adopt persisted counters whose windows are still current.
    ///
    /// An expired persisted window is ignored; the fresh window from
    /// construction already covers it. Counts are capped at the configured
    /// quota so a lowered quota takes effect immediately.
    pub fn restore(&mut self, state: &UsageState, now: DateTime<Utc>) {
        let entries = [
            (ProviderId::Position, &state.position),
            (ProviderId::Schedule, &state.schedule),
            (ProviderId::Weather, &state.weather),
        ];
        for (id, persisted) in entries {
            let budget = self.budget_mut(id);
            let age = now.signed_duration_since(persisted.window_start);
            if age >= Duration::zero() && age < budget.window {
                budget.window_start = persisted.window_start;
                budget.count = persisted.count.min(budget.quota);
            }
        }
    }
}
