//! Display mode decision.

use crate::status::FlightStatusSnapshot;

/// What the display should show this tick.
///
/// Recomputed from scratch every tick. There is no persisted state
/// machine, so a single good tick after many bad ones immediately
/// restores [`DisplayMode::Tracking`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// The position provider definitively does not know the flight.
    NotFound,
    /// Tracking is paused: outside the operational window, or no provider
    /// call was permitted by the budget this tick.
    Standby,
    /// Actively tracking; whatever snapshot fields are present render.
    Tracking,
}

/// Decide the display mode for one tick.
///
/// Precedence: a not-found snapshot wins regardless of window or budget,
/// then window/budget gating, then active tracking.
pub fn decide(
    snapshot: &FlightStatusSnapshot,
    window_ok: bool,
    budget_available: bool,
) -> DisplayMode {
    if snapshot.flight_not_found {
        return DisplayMode::NotFound;
    }
    if !window_ok || !budget_available {
        return DisplayMode::Standby;
    }
    DisplayMode::Tracking
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::PositionFix;

    fn tracking_snapshot() -> FlightStatusSnapshot {
        FlightStatusSnapshot {
            position: Some(PositionFix {
                callsign: "BAW123".to_string(),
                latitude: 51.47,
                longitude: -0.45,
                altitude_ft: 35000,
                ground_speed_kt: 450,
                heading: 270,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn not_found_wins_over_open_window_and_full_budget() {
        let snapshot = FlightStatusSnapshot::not_found();
        assert_eq!(decide(&snapshot, true, true), DisplayMode::NotFound);
        assert_eq!(decide(&snapshot, false, false), DisplayMode::NotFound);
    }

    #[test]
    fn closed_window_forces_standby() {
        let snapshot = tracking_snapshot();
        assert_eq!(decide(&snapshot, false, true), DisplayMode::Standby);
    }

    #[test]
    fn exhausted_budget_forces_standby() {
        let snapshot = tracking_snapshot();
        assert_eq!(decide(&snapshot, true, false), DisplayMode::Standby);
    }

    #[test]
    fn open_window_with_budget_tracks() {
        let snapshot = tracking_snapshot();
        assert_eq!(decide(&snapshot, true, true), DisplayMode::Tracking);
    }

    #[test]
    fn empty_snapshot_with_budget_still_tracks() {
        // All three calls may have failed transiently; the mode is still
        // active tracking and the display renders placeholders.
        let snapshot = FlightStatusSnapshot::default();
        assert_eq!(decide(&snapshot, true, true), DisplayMode::Tracking);
    }

    #[test]
    fn decide_is_deterministic() {
        let snapshot = tracking_snapshot();
        let first = decide(&snapshot, true, true);
        let second = decide(&snapshot, true, true);
        assert_eq!(first, second);
    }
}
