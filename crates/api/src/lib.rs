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
    clippy::all
)]

mod error;
mod request_response;
mod source;

#[cfg(test)]
mod tests;

use futures::future::try_join_all;
use std::collections::{BTreeSet, HashSet};
use time::Date;
use tracing::info;
use workload_domain::{
    AggregatedGrid, AllocationTable, Horizon, ProjectId, Resource, ResourceId, WorkAssignment,
    aggregate_workload, present_heatmap,
};

pub use error::{ApiError, SourceError};
pub use request_response::{HeatmapParams, HeatmapRequest, HeatmapResponse, InlineHeatmapRequest};
pub use source::{AllocationEntry, SnapshotSource, WorkloadSnapshot, WorkloadSource};

/// Computes the resource workload heatmap.
///
/// Fetches the assignments and roster concurrently, then the allocation
/// percentages needed by assignments without explicit hours, then runs the
/// aggregation engine on the fetched snapshot.
///
/// # Arguments
///
/// * `source` - The external task/assignment store
/// * `request` - Reference date and horizon
///
/// # Returns
///
/// The heatmap (exact and rounded hours, bands, week labels) together with
/// the run's diagnostics.
///
/// # Errors
///
/// Returns `ApiError::SourceUnavailable` if any fetch fails. No partial grid
/// is produced in that case.
pub async fn compute_heatmap<S>(
    source: &S,
    request: &HeatmapRequest,
) -> Result<HeatmapResponse, ApiError>
where
    S: WorkloadSource + Sync,
{
    let reference_date: Date = request.reference_date_or_today();
    let horizon: Horizon = request.horizon_or_default();

    let (assignments, roster): (Vec<WorkAssignment>, Vec<Resource>) =
        futures::try_join!(source.fetch_assignments(), source.fetch_resource_roster())?;

    let allocations: AllocationTable =
        fetch_allocations(source, &assignments, &roster).await?;

    let grid: AggregatedGrid =
        aggregate_workload(&assignments, &roster, &allocations, reference_date, horizon);

    info!(
        reference_date = %reference_date,
        horizon_weeks = horizon.weeks(),
        assignments = assignments.len(),
        resources = grid.roster().len(),
        skipped = grid.diagnostics().skipped_count(),
        "Computed workload heatmap"
    );

    Ok(HeatmapResponse {
        heatmap: present_heatmap(&grid),
        diagnostics: grid.diagnostics().clone(),
    })
}

/// Looks up allocation percentages for every (project, resource) pair that
/// will fall back to the allocation strategy.
///
/// Pairs with explicit hours, and resources without a roster row, never
/// read an allocation, so they are not fetched.
async fn fetch_allocations<S>(
    source: &S,
    assignments: &[WorkAssignment],
    roster: &[Resource],
) -> Result<AllocationTable, SourceError>
where
    S: WorkloadSource + Sync,
{
    let rostered: HashSet<&ResourceId> = roster.iter().map(|r| &r.id).collect();

    let mut pairs: BTreeSet<(&ProjectId, &ResourceId)> = BTreeSet::new();
    for assignment in assignments {
        for resource_id in assignment.distinct_resources() {
            if rostered.contains(resource_id) && assignment.explicit_hours_for(resource_id).is_none()
            {
                pairs.insert((&assignment.project_id, resource_id));
            }
        }
    }

    let lookups = pairs.into_iter().map(|(project_id, resource_id)| async move {
        source
            .fetch_allocation_percentage(project_id, resource_id)
            .await
            .map(|percentage| (project_id, resource_id, percentage))
    });

    let mut table: AllocationTable = AllocationTable::new();
    for (project_id, resource_id, percentage) in try_join_all(lookups).await? {
        if let Some(percentage) = percentage {
            table.insert(project_id.clone(), resource_id.clone(), percentage);
        }
    }

    Ok(table)
}
