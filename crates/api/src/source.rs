// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The external task/assignment store, as seen by the engine.
//!
//! The engine never talks to storage itself. Callers hand it whatever a
//! `WorkloadSource` returns; any fetch failure stops the request before
//! aggregation starts.

use crate::error::SourceError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::Path;
use tracing::info;
use workload_domain::{AllocationTable, ProjectId, Resource, ResourceId, WorkAssignment};

/// Read access to the data a heatmap is computed from.
pub trait WorkloadSource {
    /// Returns every assignment in the aggregation scope.
    fn fetch_assignments(
        &self,
    ) -> impl Future<Output = Result<Vec<WorkAssignment>, SourceError>> + Send;

    /// Returns the allocation percentage of a resource on a project, or
    /// `None` if none is recorded (the engine then assumes 100).
    fn fetch_allocation_percentage(
        &self,
        project_id: &ProjectId,
        resource_id: &ResourceId,
    ) -> impl Future<Output = Result<Option<u32>, SourceError>> + Send;

    /// Returns the resources that get a heatmap row, in display order.
    fn fetch_resource_roster(
        &self,
    ) -> impl Future<Output = Result<Vec<Resource>, SourceError>> + Send;
}

/// One recorded allocation percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationEntry {
    /// The project.
    pub project_id: ProjectId,
    /// The resource.
    pub resource_id: ResourceId,
    /// Percentage of the resource's time committed to the project.
    pub percentage: u32,
}

/// A complete point-in-time copy of the data a heatmap needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkloadSnapshot {
    /// Assignments in scope.
    #[serde(default)]
    pub assignments: Vec<WorkAssignment>,
    /// Recorded allocation percentages.
    #[serde(default)]
    pub allocations: Vec<AllocationEntry>,
    /// The resource roster.
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl WorkloadSnapshot {
    /// Parses a snapshot from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Parse` if the document is not a valid snapshot.
    pub fn from_json(document: &str) -> Result<Self, SourceError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Reads a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid snapshot.
    pub fn from_json_file(path: &Path) -> Result<Self, SourceError> {
        let document: String =
            std::fs::read_to_string(path).map_err(|source| SourceError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let snapshot: Self = Self::from_json(&document)?;

        info!(
            path = %path.display(),
            assignments = snapshot.assignments.len(),
            resources = snapshot.resources.len(),
            "Loaded workload snapshot"
        );

        Ok(snapshot)
    }

    /// Builds the allocation lookup table. Later entries for the same pair
    /// replace earlier ones.
    #[must_use]
    pub fn allocation_table(&self) -> AllocationTable {
        let mut table: AllocationTable = AllocationTable::new();
        for entry in &self.allocations {
            table.insert(
                entry.project_id.clone(),
                entry.resource_id.clone(),
                entry.percentage,
            );
        }
        table
    }
}

/// A `WorkloadSource` serving a fixed in-memory snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    snapshot: WorkloadSnapshot,
    allocations: AllocationTable,
}

impl SnapshotSource {
    /// Creates a source over a snapshot.
    #[must_use]
    pub fn new(snapshot: WorkloadSnapshot) -> Self {
        let allocations: AllocationTable = snapshot.allocation_table();
        Self {
            snapshot,
            allocations,
        }
    }

    /// Returns the snapshot being served.
    #[must_use]
    pub const fn snapshot(&self) -> &WorkloadSnapshot {
        &self.snapshot
    }
}

impl WorkloadSource for SnapshotSource {
    async fn fetch_assignments(&self) -> Result<Vec<WorkAssignment>, SourceError> {
        Ok(self.snapshot.assignments.clone())
    }

    async fn fetch_allocation_percentage(
        &self,
        project_id: &ProjectId,
        resource_id: &ResourceId,
    ) -> Result<Option<u32>, SourceError> {
        Ok(self.allocations.get(project_id, resource_id))
    }

    async fn fetch_resource_roster(&self) -> Result<Vec<Resource>, SourceError> {
        Ok(self.snapshot.resources.clone())
    }
}
