//! Display adapters.
//!
//! The poll loop hands `(DisplayMode, FlightStatusSnapshot)` to a
//! [`DisplayAdapter`] once per tick and makes no assumption about display
//! geometry or refresh mechanics. [`ConsoleDisplay`] prints the rendered
//! line to stdout, standing in for the physical sign when developing on a
//! desktop.

use std::io::Write;

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::info;

use super::message::{format_message, TimeFormat};
use super::mode::DisplayMode;
use crate::status::FlightStatusSnapshot;

/// Display adapter errors.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// Writing to the display failed
    #[error("display write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Sink for the per-tick display output.
pub trait DisplayAdapter: Send {
    /// Render one tick's mode and snapshot.
    fn render(
        &mut self,
        mode: DisplayMode,
        snapshot: &FlightStatusSnapshot,
        now: NaiveDateTime,
    ) -> Result<(), DisplayError>;
}

/// Prints the display line to stdout.
pub struct ConsoleDisplay {
    ident: String,
    time_format: TimeFormat,
}

impl ConsoleDisplay {
    /// Create a console display for the tracked flight.
    pub fn new(ident: impl Into<String>, time_format: TimeFormat) -> Self {
        Self {
            ident: ident.into(),
            time_format,
        }
    }
}

impl DisplayAdapter for ConsoleDisplay {
    fn render(
        &mut self,
        mode: DisplayMode,
        snapshot: &FlightStatusSnapshot,
        now: NaiveDateTime,
    ) -> Result<(), DisplayError> {
        let message = format_message(mode, snapshot, &self.ident, now, self.time_format);
        info!(mode = ?mode, message = %message, "display updated");

        let mut stdout = std::io::stdout();
        writeln!(stdout, "{}", message)?;
        Ok(())
    }
}
