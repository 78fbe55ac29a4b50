//! Operational window evaluation.
//!
//! Decides whether a wall-clock instant falls inside the configured
//! tracking hours. Pure functions of `now` and static configuration,
//! with no internal state and no system clock access.

use chrono::{Datelike, Days, NaiveDateTime, NaiveTime, Weekday};

/// Time-of-day window during which active tracking is permitted.
///
/// The window covers `[start, end)`, inclusive of start and exclusive of
/// end, restricted to the applicable days. Windows spanning midnight
/// (start > end) wrap: the after-midnight segment belongs to the day the
/// window opened, so days = {Mon} with 22:00–06:00 covers Tuesday 01:00
/// but not Monday 01:00. Equal start and end is an empty window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationalWindow {
    start: NaiveTime,
    end: NaiveTime,
    days: [bool; 7],
}

impl OperationalWindow {
    /// Window restricted to the given days of the week.
    pub fn new(start: NaiveTime, end: NaiveTime, days: &[Weekday]) -> Self {
        let mut flags = [false; 7];
        for day in days {
            flags[day.num_days_from_monday() as usize] = true;
        }
        Self {
            start,
            end,
            days: flags,
        }
    }

    /// Window applicable on every day of the week.
    pub fn all_days(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start,
            end,
            days: [true; 7],
        }
    }

    fn applies_on(&self, day: Weekday) -> bool {
        self.days[day.num_days_from_monday() as usize]
    }

    /// True when `now` falls inside the window.
    pub fn contains(&self, now: NaiveDateTime) -> bool {
        let time = now.time();
        if self.start <= self.end {
            self.applies_on(now.weekday()) && time >= self.start && time < self.end
        } else {
            // Wraps midnight: the evening segment belongs to today, the
            // early-morning segment to the day the window opened.
            (time >= self.start && self.applies_on(now.weekday()))
                || (time < self.end && self.applies_on(now.weekday().pred()))
        }
    }

    /// Next instant at which the window opens, strictly after `now`.
    ///
    /// Returns `None` when no day is applicable (the window never opens).
    pub fn next_opening(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        if self.days.iter().all(|applies| !applies) {
            return None;
        }

        for offset in 0..=7u64 {
            let date = now.date().checked_add_days(Days::new(offset))?;
            if !self.applies_on(date.weekday()) {
                continue;
            }
            let candidate = date.and_time(self.start);
            if candidate > now {
                return Some(candidate);
            }
        }
        None
    }
}
