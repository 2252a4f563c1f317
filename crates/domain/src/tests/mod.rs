// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! End-to-end tests of the aggregation pipeline.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::float_cmp)]


use crate::{AllocationTable, Horizon, Resource, ResourceId, WorkAssignment};
use time::Date;
use time::macros::date;

/// Monday 2024-01-01, used as the reference date unless a test says otherwise.
pub const REFERENCE: Date = date!(2024 - 01 - 01);

pub fn roster() -> Vec<Resource> {
    vec![
        Resource::new("ada", "Ada Lovelace"),
        Resource::new("grace", "Grace Hopper"),
        Resource::new("idle", "Idle Person"),
    ]
}

pub fn ada() -> ResourceId {
    ResourceId::new("ada")
}

pub fn grace() -> ResourceId {
    ResourceId::new("grace")
}

pub fn idle() -> ResourceId {
    ResourceId::new("idle")
}

/// A mixed snapshot exercising both strategies, weekend spans, skips, and
/// work on both sides of the horizon.
pub fn mixed_snapshot() -> Vec<WorkAssignment> {
    vec![
        WorkAssignment::new("design", "apollo", Some("2024-01-01"))
            .with_end_date("2024-01-05")
            .with_duration(5)
            .with_resource("ada"),
        WorkAssignment::new("build", "apollo", Some("2024-01-03"))
            .with_duration(12)
            .with_resource("ada")
            .with_resource("grace")
            .with_work_hours("grace", 30.0),
        WorkAssignment::new("review", "gemini", Some("2024-01-05"))
            .with_end_date("2024-01-08")
            .with_resource("grace"),
        WorkAssignment::new("history", "gemini", Some("2023-11-01"))
            .with_end_date("2023-12-15")
            .with_resource("ada"),
        WorkAssignment::new("far-future", "gemini", Some("2024-06-03"))
            .with_duration(4)
            .with_resource("grace"),
        WorkAssignment::new("straddle", "apollo", Some("2024-03-18"))
            .with_end_date("2024-04-05")
            .with_resource("ada")
            .with_work_hours("ada", 60.0),
        WorkAssignment::new("undated", "apollo", Some("2024-01-10")).with_resource("ada"),
        WorkAssignment::new("garbled", "apollo", Some("tomorrow"))
            .with_duration(2)
            .with_resource("grace"),
    ]
}

pub fn allocations() -> AllocationTable {
    let mut table: AllocationTable = AllocationTable::new();
    table.insert(
        crate::ProjectId::new("apollo"),
        ResourceId::new("ada"),
        50,
    );
    table
}

pub fn horizon() -> Horizon {
    Horizon::default()
}
