// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use crate::error::ApiError;
use crate::source::WorkloadSnapshot;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use workload_domain::{AggregationDiagnostics, Heatmap, Horizon, parse_date};

/// Raw heatmap parameters as they arrive from a query string or JSON body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapParams {
    /// Reference date (ISO 8601). Defaults to today (UTC).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<String>,
    /// Number of weekly buckets. Defaults to the configured horizon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon_weeks: Option<u32>,
}

/// Validated heatmap request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeatmapRequest {
    /// The day bucket 0 starts on. `None` means today (UTC).
    pub reference_date: Option<Date>,
    /// Number of weekly buckets. `None` means the default horizon.
    pub horizon: Option<Horizon>,
}

impl HeatmapRequest {
    /// Validates raw parameters.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` if the reference date cannot be
    /// parsed or the horizon is out of range.
    pub fn from_params(params: &HeatmapParams) -> Result<Self, ApiError> {
        let reference_date: Option<Date> = params
            .reference_date
            .as_deref()
            .map(parse_date)
            .transpose()?;
        let horizon: Option<Horizon> = params.horizon_weeks.map(Horizon::new).transpose()?;

        Ok(Self {
            reference_date,
            horizon,
        })
    }

    /// Fills in the horizon if the request did not specify one.
    #[must_use]
    pub fn with_default_horizon(mut self, horizon: Horizon) -> Self {
        self.horizon.get_or_insert(horizon);
        self
    }

    /// Returns the reference date, using today's UTC date if unset.
    #[must_use]
    pub fn reference_date_or_today(&self) -> Date {
        self.reference_date
            .unwrap_or_else(|| OffsetDateTime::now_utc().date())
    }

    /// Returns the horizon, using the default if unset.
    #[must_use]
    pub fn horizon_or_default(&self) -> Horizon {
        self.horizon.unwrap_or_default()
    }
}

/// Heatmap request carrying its own snapshot instead of reading the
/// server's current one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineHeatmapRequest {
    /// The data to aggregate.
    pub snapshot: WorkloadSnapshot,
    /// Reference date and horizon.
    #[serde(flatten)]
    pub params: HeatmapParams,
}

/// API response for a computed heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapResponse {
    /// The render-ready grid, with exact and rounded hours per cell.
    pub heatmap: Heatmap,
    /// What the run kept and dropped.
    pub diagnostics: AggregationDiagnostics,
}
