// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The workload aggregation pipeline.
//!
//! snapshot -> window resolution -> hours distribution -> working-day
//! iteration -> bucket mapping -> accumulation.
//!
//! The pipeline is a pure function of its inputs. Nothing is shared between
//! runs, so concurrent callers cannot interfere with each other.

use crate::aggregation::{
    AggregatedGrid, AggregationDiagnostics, Aggregator, BucketKey, SkippedAssignment,
};
use crate::bucket::BucketMapper;
use crate::distribution::{AllocationTable, HoursDistribution, distribute_hours};
use crate::task_window::{ResolvedWindow, resolve_window};
use crate::types::{Horizon, Resource, WorkAssignment};
use time::Date;
use tracing::debug;

/// Aggregates assigned hours per resource per week.
///
/// # Arguments
///
/// * `assignments` - The task/assignment snapshot
/// * `roster` - Resources that get a row, in display order
/// * `allocations` - Allocation percentages for assignments without explicit hours
/// * `reference_date` - The day bucket 0 starts on
/// * `horizon` - Number of weekly buckets to report
///
/// # Returns
///
/// A dense grid over roster x horizon. Unresolvable assignments, empty
/// windows, and out-of-horizon days are counted in the grid's diagnostics
/// instead of failing the run.
#[must_use]
pub fn aggregate_workload(
    assignments: &[WorkAssignment],
    roster: &[Resource],
    allocations: &AllocationTable,
    reference_date: Date,
    horizon: Horizon,
) -> AggregatedGrid {
    let roster: Vec<Resource> = dedup_roster(roster);
    let mapper: BucketMapper = BucketMapper::new(reference_date, horizon);
    let mut aggregator: Aggregator = Aggregator::new(&roster, horizon);
    let mut diagnostics: AggregationDiagnostics = AggregationDiagnostics {
        assignments_total: assignments.len(),
        ..AggregationDiagnostics::default()
    };

    for assignment in assignments {
        let window: ResolvedWindow = match resolve_window(assignment) {
            Ok(window) => window,
            Err(reason) => {
                debug!(
                    assignment_id = %assignment.id,
                    reason = %reason,
                    "Skipping unresolvable assignment"
                );
                diagnostics.skipped.push(SkippedAssignment {
                    assignment_id: assignment.id.clone(),
                    reason,
                });
                continue;
            }
        };
        diagnostics.assignments_resolved += 1;

        for resource_id in assignment.distinct_resources() {
            if !aggregator.has_resource(resource_id) {
                diagnostics.unrostered_resource_assignments += 1;
                continue;
            }

            let Some(distribution) =
                distribute_hours(assignment, window, resource_id, allocations)
            else {
                diagnostics.zero_working_day_windows += 1;
                continue;
            };

            accumulate(&distribution, &mapper, &mut aggregator, &mut diagnostics);
        }
    }

    debug!(
        assignments = diagnostics.assignments_total,
        resolved = diagnostics.assignments_resolved,
        skipped = diagnostics.skipped_count(),
        outside_horizon = diagnostics.contributions_outside_horizon,
        "Workload aggregation complete"
    );

    AggregatedGrid::new(mapper, roster, aggregator, diagnostics)
}

/// Adds one distribution's in-horizon contributions to the aggregator.
///
/// Only the part of the window overlapping the horizon is iterated; the
/// remaining working days are counted as dropped.
fn accumulate(
    distribution: &HoursDistribution,
    mapper: &BucketMapper,
    aggregator: &mut Aggregator,
    diagnostics: &mut AggregationDiagnostics,
) {
    let horizon_start: Date = mapper.reference_date();
    let horizon_end: Date = mapper.horizon_end();
    let mut kept: usize = 0;

    for contribution in distribution.contributions_between(horizon_start, horizon_end) {
        let Some(bucket_index) = mapper.bucket_for(contribution.date) else {
            continue;
        };
        let key: BucketKey = BucketKey::new(&contribution.resource_id, bucket_index);
        if aggregator.add(&key, contribution.hours) {
            kept += 1;
        }
    }

    let total_days: usize = distribution.working_days() as usize;
    diagnostics.contributions_outside_horizon += total_days.saturating_sub(kept);
}

/// Removes repeated roster entries, keeping the first occurrence.
fn dedup_roster(roster: &[Resource]) -> Vec<Resource> {
    let mut unique: Vec<Resource> = Vec::with_capacity(roster.len());
    for resource in roster {
        if !unique.iter().any(|r| r.id == resource.id) {
            unique.push(resource.clone());
        }
    }
    unique
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::{ProjectId, ResourceId};
    use time::macros::date;

    fn roster() -> Vec<Resource> {
        vec![Resource::new("r1", "Ada"), Resource::new("r2", "Grace")]
    }

    #[test]
    fn test_counts_window_days_outside_horizon() {
        // Window Mon 2024-01-01 .. Fri 2024-01-12 (10 working days), reference
        // 2024-01-08 so the first week falls before bucket 0.
        let assignments: Vec<WorkAssignment> = vec![
            WorkAssignment::new("t1", "p1", Some("2024-01-01"))
                .with_end_date("2024-01-12")
                .with_resource("r1"),
        ];
        let grid: AggregatedGrid = aggregate_workload(
            &assignments,
            &roster(),
            &AllocationTable::new(),
            date!(2024 - 01 - 08),
            Horizon::default(),
        );

        let r1: ResourceId = ResourceId::new("r1");
        assert_eq!(grid.hours(&r1, 0), 40.0);
        assert_eq!(grid.resource_total(&r1), 40.0);
        assert_eq!(grid.diagnostics().contributions_outside_horizon, 5);
    }

    #[test]
    fn test_unrostered_resources_are_counted_not_added() {
        let assignments: Vec<WorkAssignment> = vec![
            WorkAssignment::new("t1", "p1", Some("2024-01-01"))
                .with_duration(2)
                .with_resource("r1")
                .with_resource("contractor"),
        ];
        let grid: AggregatedGrid = aggregate_workload(
            &assignments,
            &roster(),
            &AllocationTable::new(),
            date!(2024 - 01 - 01),
            Horizon::default(),
        );

        assert_eq!(grid.diagnostics().unrostered_resource_assignments, 1);
        assert_eq!(grid.roster().len(), 2);
        assert_eq!(grid.resource_total(&ResourceId::new("r1")), 16.0);
    }

    #[test]
    fn test_duplicate_resource_on_assignment_counted_once() {
        let assignments: Vec<WorkAssignment> = vec![
            WorkAssignment::new("t1", "p1", Some("2024-01-01"))
                .with_end_date("2024-01-01")
                .with_resource("r1")
                .with_resource("r1"),
        ];
        let grid: AggregatedGrid = aggregate_workload(
            &assignments,
            &roster(),
            &AllocationTable::new(),
            date!(2024 - 01 - 01),
            Horizon::default(),
        );
        assert_eq!(grid.resource_total(&ResourceId::new("r1")), 8.0);
    }

    #[test]
    fn test_duplicate_roster_entries_collapse() {
        let mut duplicated: Vec<Resource> = roster();
        duplicated.push(Resource::new("r1", "Ada again"));

        let grid: AggregatedGrid = aggregate_workload(
            &[],
            &duplicated,
            &AllocationTable::new(),
            date!(2024 - 01 - 01),
            Horizon::default(),
        );
        assert_eq!(grid.roster().len(), 2);
        assert_eq!(grid.roster()[0].display_name, "Ada");
    }

    #[test]
    fn test_allocation_percentage_scales_fallback_hours() {
        let assignments: Vec<WorkAssignment> = vec![
            WorkAssignment::new("t1", "p1", Some("2024-01-01"))
                .with_end_date("2024-01-05")
                .with_duration(5)
                .with_resource("r1")
                .with_resource("r2"),
        ];
        let mut allocations: AllocationTable = AllocationTable::new();
        allocations.insert(ProjectId::new("p1"), ResourceId::new("r2"), 50);

        let grid: AggregatedGrid = aggregate_workload(
            &assignments,
            &roster(),
            &allocations,
            date!(2024 - 01 - 01),
            Horizon::default(),
        );

        assert_eq!(grid.hours(&ResourceId::new("r1"), 0), 40.0);
        assert_eq!(grid.hours(&ResourceId::new("r2"), 0), 20.0);
    }

    #[test]
    fn test_zero_working_day_window_is_counted() {
        let assignments: Vec<WorkAssignment> = vec![
            WorkAssignment::new("t1", "p1", Some("2024-01-06"))
                .with_end_date("2024-01-07")
                .with_resource("r1"),
        ];
        let grid: AggregatedGrid = aggregate_workload(
            &assignments,
            &roster(),
            &AllocationTable::new(),
            date!(2024 - 01 - 01),
            Horizon::default(),
        );

        assert_eq!(grid.diagnostics().assignments_resolved, 1);
        assert_eq!(grid.diagnostics().zero_working_day_windows, 1);
        assert_eq!(grid.resource_total(&ResourceId::new("r1")), 0.0);
    }
}
