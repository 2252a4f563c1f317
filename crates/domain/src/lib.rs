// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Resource workload aggregation.
//!
//! Computes, per resource and per one-week bucket, the hours of work
//! assigned to that resource, skipping weekends, for display as a capacity
//! heatmap. Everything here is a pure function of the supplied snapshot.

mod aggregation;
mod bucket;
mod calendar;
mod distribution;
mod engine;
mod error;
mod heatmap;
mod task_window;
mod types;

#[cfg(test)]
mod tests;

// `YYYY-MM-DD` serde representation for `Date` fields.
time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

pub use aggregation::{
    AggregatedGrid, AggregationDiagnostics, Aggregator, BucketKey, SkippedAssignment,
};
pub use bucket::{BucketLabel, BucketMapper};
pub use calendar::{
    WorkingDays, advance_by_working_days, count_working_days_inclusive, is_working_day,
    working_days,
};
pub use distribution::{
    AllocationTable, DEFAULT_ALLOCATION_PERCENTAGE, HOURS_PER_WORKING_DAY, HoursDistribution,
    HoursStrategy, ResourceContribution, distribute_hours,
};
pub use engine::aggregate_workload;
pub use error::DomainError;
pub use heatmap::{Band, Heatmap, HeatmapCell, HeatmapRow, present_heatmap, round_hours};
pub use task_window::{ResolvedWindow, SkipReason, parse_date, resolve_window};
pub use types::{
    DEFAULT_HORIZON_WEEKS, Horizon, MAX_HORIZON_WEEKS, ProjectId, Resource, ResourceId,
    WorkAssignment,
};
