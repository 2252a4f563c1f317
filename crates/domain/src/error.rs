// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur while constructing domain values.
///
/// The aggregation pipeline itself never fails; these errors only arise at
/// the edges where raw input is turned into validated values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Failed to parse a date from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Horizon length is outside the supported range.
    InvalidHorizon {
        /// The rejected number of weeks.
        weeks: u32,
        /// The largest accepted number of weeks.
        max: u32,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::InvalidHorizon { weeks, max } => {
                write!(
                    f,
                    "Invalid horizon: {weeks} weeks. Must be between 1 and {max}"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
