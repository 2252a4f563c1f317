// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Distribution of an assignment's hours across its working days.
//!
//! A resource's total hours on a task come from one of two strategies:
//! - `Explicit`: the task records total hours for the resource; that value
//!   is authoritative and used as-is
//! - `AllocationFallback`: the task only records a duration, so the total
//!   is `duration * HOURS_PER_WORKING_DAY * allocation / 100`
//!
//! The total is then spread evenly over the working days of the window.

use crate::calendar::{count_working_days_inclusive, working_days};
use crate::task_window::ResolvedWindow;
use crate::types::{ProjectId, ResourceId, WorkAssignment};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::Date;

/// Length of a full-time working day, in hours.
pub const HOURS_PER_WORKING_DAY: f64 = 8.0;

/// Allocation percentage assumed when none is recorded.
pub const DEFAULT_ALLOCATION_PERCENTAGE: u32 = 100;

/// Allocation percentages keyed by (project, resource).
///
/// Built by the caller from the external store before the run. Lookups for
/// pairs with no entry return `DEFAULT_ALLOCATION_PERCENTAGE`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationTable {
    entries: HashMap<ProjectId, HashMap<ResourceId, u32>>,
}

impl AllocationTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the allocation percentage for a (project, resource) pair.
    pub fn insert(&mut self, project_id: ProjectId, resource_id: ResourceId, percentage: u32) {
        self.entries
            .entry(project_id)
            .or_default()
            .insert(resource_id, percentage);
    }

    /// Returns the recorded percentage for a pair, if any.
    #[must_use]
    pub fn get(&self, project_id: &ProjectId, resource_id: &ResourceId) -> Option<u32> {
        self.entries
            .get(project_id)
            .and_then(|resources| resources.get(resource_id))
            .copied()
    }

    /// Returns the allocation percentage for a pair, defaulting to 100.
    #[must_use]
    pub fn percentage_for(&self, project_id: &ProjectId, resource_id: &ResourceId) -> u32 {
        self.get(project_id, resource_id)
            .unwrap_or(DEFAULT_ALLOCATION_PERCENTAGE)
    }

    /// Returns the number of recorded pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    /// Returns `true` if no pair has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How a resource's total hours on a task were determined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum HoursStrategy {
    /// Hours recorded on the task for this resource.
    Explicit {
        /// The recorded total hours.
        total_hours: f64,
    },
    /// Hours derived from duration and allocation percentage.
    AllocationFallback {
        /// The task's stated duration, or its working-day count if it has none.
        effective_duration_days: u32,
        /// The resource's allocation to the task's project.
        allocation_percentage: u32,
    },
}

impl HoursStrategy {
    /// Picks the strategy for one resource on one assignment.
    ///
    /// # Arguments
    ///
    /// * `assignment` - The assignment being distributed
    /// * `resource_id` - The participating resource
    /// * `allocations` - Allocation percentages for the fallback strategy
    /// * `working_days` - Working days in the assignment's resolved window
    #[must_use]
    pub fn select(
        assignment: &WorkAssignment,
        resource_id: &ResourceId,
        allocations: &AllocationTable,
        working_days: u32,
    ) -> Self {
        if let Some(total_hours) = assignment.explicit_hours_for(resource_id) {
            return Self::Explicit { total_hours };
        }

        // Negative durations contribute nothing rather than negative hours
        let effective_duration_days: u32 = assignment.duration_days.map_or(working_days, |d| {
            u32::try_from(d.max(0)).unwrap_or(u32::MAX)
        });

        Self::AllocationFallback {
            effective_duration_days,
            allocation_percentage: allocations
                .percentage_for(&assignment.project_id, resource_id),
        }
    }

    /// Returns the resource's total hours on the task.
    #[must_use]
    pub fn total_hours(&self) -> f64 {
        match *self {
            Self::Explicit { total_hours } => total_hours,
            Self::AllocationFallback {
                effective_duration_days,
                allocation_percentage,
            } => {
                f64::from(effective_duration_days)
                    * HOURS_PER_WORKING_DAY
                    * (f64::from(allocation_percentage) / 100.0)
            }
        }
    }
}

/// Hours one resource works on one date for one assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceContribution {
    /// The resource doing the work.
    pub resource_id: ResourceId,
    /// The working day the hours fall on.
    #[serde(with = "crate::iso_date")]
    pub date: Date,
    /// Hours of work on that day.
    pub hours: f64,
}

/// A resource's hours on one assignment, spread evenly over its working days.
#[derive(Debug, Clone, PartialEq)]
pub struct HoursDistribution {
    resource_id: ResourceId,
    window: ResolvedWindow,
    strategy: HoursStrategy,
    working_days: u32,
    hours_per_working_day: f64,
}

impl HoursDistribution {
    /// Returns the resource this distribution belongs to.
    #[must_use]
    pub const fn resource_id(&self) -> &ResourceId {
        &self.resource_id
    }

    /// Returns the window the hours are spread over.
    #[must_use]
    pub const fn window(&self) -> ResolvedWindow {
        self.window
    }

    /// Returns the strategy that produced the total.
    #[must_use]
    pub const fn strategy(&self) -> HoursStrategy {
        self.strategy
    }

    /// Returns the number of working days in the window.
    #[must_use]
    pub const fn working_days(&self) -> u32 {
        self.working_days
    }

    /// Returns the hours placed on each working day.
    #[must_use]
    pub const fn hours_per_working_day(&self) -> f64 {
        self.hours_per_working_day
    }

    /// Returns the total hours across the whole window.
    #[must_use]
    pub fn total_hours(&self) -> f64 {
        self.strategy.total_hours()
    }

    /// Yields one contribution per working day of the window.
    pub fn contributions(&self) -> impl Iterator<Item = ResourceContribution> + '_ {
        self.contributions_between(self.window.start(), self.window.end())
    }

    /// Yields the contributions falling in `[from, to]`.
    ///
    /// The per-day amount is always derived from the full window; this only
    /// restricts which days are produced.
    pub fn contributions_between(
        &self,
        from: Date,
        to: Date,
    ) -> impl Iterator<Item = ResourceContribution> + '_ {
        let start: Date = from.max(self.window.start());
        let end: Date = to.min(self.window.end());

        working_days(start, end).map(move |date| ResourceContribution {
            resource_id: self.resource_id.clone(),
            date,
            hours: self.hours_per_working_day,
        })
    }
}

/// Computes how one resource's hours on an assignment are distributed.
///
/// # Arguments
///
/// * `assignment` - The assignment being distributed
/// * `window` - The assignment's resolved window
/// * `resource_id` - The participating resource
/// * `allocations` - Allocation percentages for the fallback strategy
///
/// # Returns
///
/// `None` when the window has no working days, so nothing is divided by zero.
#[must_use]
pub fn distribute_hours(
    assignment: &WorkAssignment,
    window: ResolvedWindow,
    resource_id: &ResourceId,
    allocations: &AllocationTable,
) -> Option<HoursDistribution> {
    let working_days: u32 = count_working_days_inclusive(window.start(), window.end());
    if working_days == 0 {
        return None;
    }

    let strategy: HoursStrategy =
        HoursStrategy::select(assignment, resource_id, allocations, working_days);
    let hours_per_working_day: f64 = strategy.total_hours() / f64::from(working_days);

    Some(HoursDistribution {
        resource_id: resource_id.clone(),
        window,
        strategy,
        working_days,
        hours_per_working_day,
    })
}
