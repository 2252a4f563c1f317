// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::atomic::{AtomicUsize, Ordering};
use time::Date;
use time::macros::date;
use workload_domain::{ProjectId, Resource, ResourceId, WorkAssignment};

use crate::{
    AllocationEntry, HeatmapRequest, SnapshotSource, SourceError, WorkloadSnapshot,
    WorkloadSource,
};

/// Monday 2024-01-01.
pub const REFERENCE: Date = date!(2024 - 01 - 01);

pub fn ada() -> ResourceId {
    ResourceId::new("ada")
}

pub fn grace() -> ResourceId {
    ResourceId::new("grace")
}

/// Two rostered resources, one allocation, and one assignment of each kind
/// the boundary layer has to handle.
///
/// - `design`: ada at 50% on apollo for Mon-Fri of week 0, so 20 hours
/// - `review`: grace with 10 explicit hours over Mon-Fri of week 1
/// - `orphan`: assigned to a resource with no roster row
/// - `undated`: no start date, skipped
pub fn create_test_snapshot() -> WorkloadSnapshot {
    WorkloadSnapshot {
        assignments: vec![
            WorkAssignment::new("design", "apollo", Some("2024-01-01"))
                .with_end_date("2024-01-05")
                .with_resource("ada"),
            WorkAssignment::new("review", "gemini", Some("2024-01-08"))
                .with_end_date("2024-01-12")
                .with_resource("grace")
                .with_work_hours("grace", 10.0),
            WorkAssignment::new("orphan", "apollo", Some("2024-01-01"))
                .with_duration(3)
                .with_resource("ghost"),
            WorkAssignment::new("undated", "apollo", None)
                .with_duration(3)
                .with_resource("ada"),
        ],
        allocations: vec![AllocationEntry {
            project_id: ProjectId::new("apollo"),
            resource_id: ada(),
            percentage: 50,
        }],
        resources: vec![
            Resource::new("ada", "Ada Lovelace"),
            Resource::new("grace", "Grace Hopper"),
        ],
    }
}

pub fn create_test_request() -> HeatmapRequest {
    HeatmapRequest {
        reference_date: Some(REFERENCE),
        horizon: None,
    }
}

/// Wraps a `SnapshotSource` and counts allocation lookups.
pub struct CountingSource {
    inner: SnapshotSource,
    allocation_lookups: AtomicUsize,
}

impl CountingSource {
    pub fn new(snapshot: WorkloadSnapshot) -> Self {
        Self {
            inner: SnapshotSource::new(snapshot),
            allocation_lookups: AtomicUsize::new(0),
        }
    }

    pub fn allocation_lookups(&self) -> usize {
        self.allocation_lookups.load(Ordering::SeqCst)
    }
}

impl WorkloadSource for CountingSource {
    async fn fetch_assignments(&self) -> Result<Vec<WorkAssignment>, SourceError> {
        self.inner.fetch_assignments().await
    }

    async fn fetch_allocation_percentage(
        &self,
        project_id: &ProjectId,
        resource_id: &ResourceId,
    ) -> Result<Option<u32>, SourceError> {
        self.allocation_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner
            .fetch_allocation_percentage(project_id, resource_id)
            .await
    }

    async fn fetch_resource_roster(&self) -> Result<Vec<Resource>, SourceError> {
        self.inner.fetch_resource_roster().await
    }
}

/// Which fetch a `FailingSource` rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Assignments,
    Allocations,
    Roster,
}

/// A source that serves the test snapshot except for one failing fetch.
pub struct FailingSource {
    inner: SnapshotSource,
    fail_point: FailPoint,
}

impl FailingSource {
    pub fn new(fail_point: FailPoint) -> Self {
        Self {
            inner: SnapshotSource::new(create_test_snapshot()),
            fail_point,
        }
    }

    fn check(&self, point: FailPoint) -> Result<(), SourceError> {
        if self.fail_point == point {
            return Err(SourceError::Unavailable(format!("{point:?} store offline")));
        }
        Ok(())
    }
}

impl WorkloadSource for FailingSource {
    async fn fetch_assignments(&self) -> Result<Vec<WorkAssignment>, SourceError> {
        self.check(FailPoint::Assignments)?;
        self.inner.fetch_assignments().await
    }

    async fn fetch_allocation_percentage(
        &self,
        project_id: &ProjectId,
        resource_id: &ResourceId,
    ) -> Result<Option<u32>, SourceError> {
        self.check(FailPoint::Allocations)?;
        self.inner
            .fetch_allocation_percentage(project_id, resource_id)
            .await
    }

    async fn fetch_resource_roster(&self) -> Result<Vec<Resource>, SourceError> {
        self.check(FailPoint::Roster)?;
        self.inner.fetch_resource_roster().await
    }
}
