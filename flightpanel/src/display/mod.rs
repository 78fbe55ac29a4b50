//! Display decision and rendering seam.
//!
//! [`decide`] reduces one tick's snapshot, window evaluation and budget
//! availability to a [`DisplayMode`]; [`format_message`] turns mode +
//! snapshot into the one-line text; [`DisplayAdapter`] is the seam to the
//! physical display.

mod console;
mod message;
mod mode;

pub use console::{ConsoleDisplay, DisplayAdapter, DisplayError};
pub use message::{format_message, TimeFormat};
pub use mode::{decide, DisplayMode};
