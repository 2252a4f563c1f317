// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Resolution of an assignment's calendar window.
//!
//! An assignment is placed on the calendar using, in order of preference:
//! - its explicit end date, used as-is with no working-day adjustment
//! - its start date advanced by its duration in working days
//!
//! Assignments that cannot be placed are skipped, never treated as errors.

use crate::calendar::advance_by_working_days;
use crate::error::DomainError;
use crate::types::WorkAssignment;
use serde::{Deserialize, Serialize};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Inclusive start and end dates of one assignment.
///
/// Invariant: `start <= end`. Either date may fall on a weekend; weekends are
/// only excluded when the window is iterated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedWindow {
    start: Date,
    end: Date,
}

impl ResolvedWindow {
    /// Creates a window, returning `None` if `end` precedes `start`.
    #[must_use]
    pub fn new(start: Date, end: Date) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Returns the first day of the window.
    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Returns the last day of the window (inclusive).
    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }
}

/// Why an assignment could not be placed on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The assignment has no start date.
    MissingStartDate,
    /// The start date could not be parsed.
    UnparsableStartDate,
    /// Neither a usable end date nor a duration is present.
    NoEndOrDuration,
    /// The resolved end date precedes the start date.
    EndBeforeStart,
}

impl SkipReason {
    /// Returns the string form used in logs and responses.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingStartDate => "missing_start_date",
            Self::UnparsableStartDate => "unparsable_start_date",
            Self::NoEndOrDuration => "no_end_or_duration",
            Self::EndBeforeStart => "end_before_start",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a calendar date from a string.
///
/// Accepts `YYYY-MM-DD`. A trailing time component (`2024-01-01T09:30:00Z`
/// or `2024-01-01 09:30:00`) is discarded, normalizing the value to midnight.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the date part is not a valid
/// calendar date.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    let trimmed: &str = value.trim();
    let date_part: &str = trimmed
        .split_once(['T', ' '])
        .map_or(trimmed, |(date, _)| date);

    Date::parse(date_part, DATE_FORMAT).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Resolves the calendar window of an assignment.
///
/// # Arguments
///
/// * `assignment` - The assignment to place
///
/// # Returns
///
/// The resolved window, or the reason the assignment must be skipped.
///
/// # Errors
///
/// Returns a `SkipReason` if:
/// - The start date is missing or unparsable
/// - There is neither a parsable end date nor a duration
/// - The resolved end date precedes the start date
pub fn resolve_window(assignment: &WorkAssignment) -> Result<ResolvedWindow, SkipReason> {
    let raw_start: &str = assignment
        .start_date
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(SkipReason::MissingStartDate)?;

    let start: Date = parse_date(raw_start).map_err(|_| SkipReason::UnparsableStartDate)?;

    let explicit_end: Option<Date> = assignment
        .end_date
        .as_deref()
        .and_then(|raw| parse_date(raw).ok());

    let end: Date = match (explicit_end, assignment.duration_days) {
        (Some(end), _) => end,
        (None, Some(duration)) => advance_by_working_days(start, duration),
        (None, None) => return Err(SkipReason::NoEndOrDuration),
    };

    ResolvedWindow::new(start, end).ok_or(SkipReason::EndBeforeStart)
}
