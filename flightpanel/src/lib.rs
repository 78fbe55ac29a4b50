//! FlightPanel, a single-flight tracker for a small character display.
//!
//! Polls three third-party providers (live position, flight schedule,
//! destination weather) for one user-specified flight and decides, on
//! every tick, what the display should show: whether the flight exists,
//! whether tracking is permitted by the configured time-of-day window,
//! and whether enough provider call budget remains.
//!
//! # Architecture
//!
//! ```text
//! Poll Loop (tracker) ── per tick ──► OperationalWindow  ─► bool
//!                                     BudgetTracker      ─► per-provider permits
//!                                     QueryOrchestrator  ─► FlightStatusSnapshot
//!                                     decide()           ─► DisplayMode
//!                                     DisplayAdapter     ─► rendered line
//! ```
//!
//! The snapshot is rebuilt from scratch every tick and the display mode
//! is a pure function of the tick's inputs, so a single good tick after
//! any number of bad ones immediately restores active tracking.

pub mod airports;
pub mod budget;
pub mod config;
pub mod display;
pub mod logging;
pub mod orchestrator;
pub mod provider;
pub mod status;
pub mod tracker;
pub mod window;

/// Version of the FlightPanel library and CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
