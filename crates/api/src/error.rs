// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use workload_domain::DomainError;

/// Failures of the external data collaborator.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The store could not be reached or refused the request.
    #[error("workload source unavailable: {0}")]
    Unavailable(String),
    /// A snapshot file could not be read.
    #[error("failed to read snapshot '{path}': {source}")]
    Io {
        /// The file that was being read.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// A snapshot document was not valid.
    #[error("invalid snapshot document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// API-level errors.
///
/// The engine itself never fails. These represent bad request parameters and
/// upstream fetch failures, both of which are reported before any grid is
/// computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The assignment snapshot, allocations, or roster could not be fetched.
    SourceUnavailable {
        /// A description of the upstream failure.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::SourceUnavailable { message } => {
                write!(f, "Workload data unavailable: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<SourceError> for ApiError {
    fn from(err: SourceError) -> Self {
        Self::SourceUnavailable {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API input error.
///
/// Domain errors only arise while validating request values, so each maps
/// onto the request field it came from.
impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let field: &str = match &err {
            DomainError::DateParseError { .. } => "reference_date",
            DomainError::InvalidHorizon { .. } => "horizon_weeks",
        };
        Self::InvalidInput {
            field: field.to_string(),
            message: err.to_string(),
        }
    }
}
