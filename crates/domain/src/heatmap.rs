// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Render-ready heatmap built from an aggregated grid.
//!
//! Presentation never mutates the grid. Each cell carries both the exact
//! hours and the rounded value its band was derived from.

use crate::aggregation::AggregatedGrid;
use crate::bucket::BucketLabel;
use crate::types::ResourceId;
use serde::{Deserialize, Serialize};
use time::Date;

/// Severity band of a cell, derived from its rounded hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    /// No work (0 hours).
    None,
    /// 1 to 10 hours.
    Low,
    /// 11 to 20 hours.
    Medium,
    /// 21 to 30 hours.
    High,
    /// 31 hours or more.
    Critical,
}

impl Band {
    /// Classifies a rounded hour value.
    #[must_use]
    pub const fn from_rounded_hours(hours: i64) -> Self {
        match hours {
            i64::MIN..=0 => Self::None,
            1..=10 => Self::Low,
            11..=20 => Self::Medium,
            21..=30 => Self::High,
            _ => Self::Critical,
        }
    }

    /// Returns the string form used by the presentation layer.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rounds hours to the nearest integer, with ties rounding up.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_hours(hours: f64) -> i64 {
    // Saturating float-to-int cast; NaN becomes 0
    (hours + 0.5).floor() as i64
}

/// One (resource, bucket) cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    /// The bucket (column) index.
    pub bucket_index: u32,
    /// Exact hours, for tooltips.
    pub hours: f64,
    /// Hours rounded for display.
    pub rounded_hours: i64,
    /// Severity band of the rounded hours.
    pub band: Band,
}

impl HeatmapCell {
    /// Builds a cell from exact hours.
    #[must_use]
    pub fn from_hours(bucket_index: u32, hours: f64) -> Self {
        let rounded_hours: i64 = round_hours(hours);
        Self {
            bucket_index,
            hours,
            rounded_hours,
            band: Band::from_rounded_hours(rounded_hours),
        }
    }
}

/// One resource's row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapRow {
    /// The resource.
    pub resource_id: ResourceId,
    /// The resource's display name.
    pub display_name: String,
    /// Exact hours summed over the horizon.
    pub total_hours: f64,
    /// Cells in bucket order.
    pub cells: Vec<HeatmapCell>,
}

/// Dense resource x bucket grid ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    /// The day bucket 0 starts on.
    #[serde(with = "crate::iso_date")]
    pub reference_date: Date,
    /// Number of buckets.
    pub horizon_weeks: u32,
    /// Column metadata in bucket order.
    pub buckets: Vec<BucketLabel>,
    /// Rows in roster order.
    pub rows: Vec<HeatmapRow>,
}

impl Heatmap {
    /// Returns the row for a resource, if it is on the roster.
    #[must_use]
    pub fn row(&self, resource_id: &ResourceId) -> Option<&HeatmapRow> {
        self.rows.iter().find(|row| &row.resource_id == resource_id)
    }

    /// Returns the cell for a resource and bucket.
    #[must_use]
    pub fn cell(&self, resource_id: &ResourceId, bucket_index: u32) -> Option<&HeatmapCell> {
        self.row(resource_id)
            .and_then(|row| row.cells.iter().find(|c| c.bucket_index == bucket_index))
    }
}

/// Builds the heatmap for an aggregated grid.
#[must_use]
pub fn present_heatmap(grid: &AggregatedGrid) -> Heatmap {
    let rows: Vec<HeatmapRow> = grid
        .roster()
        .iter()
        .map(|resource| {
            let cells: Vec<HeatmapCell> = grid
                .bucket_indices()
                .map(|bucket_index| {
                    HeatmapCell::from_hours(bucket_index, grid.hours(&resource.id, bucket_index))
                })
                .collect();

            HeatmapRow {
                resource_id: resource.id.clone(),
                display_name: resource.display_name.clone(),
                total_hours: grid.resource_total(&resource.id),
                cells,
            }
        })
        .collect();

    Heatmap {
        reference_date: grid.reference_date(),
        horizon_weeks: grid.horizon().weeks(),
        buckets: grid.bucket_labels(),
        rows,
    }
}
