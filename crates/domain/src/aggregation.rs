// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Accumulation of contributions into (resource, bucket) totals.

use crate::bucket::{BucketLabel, BucketMapper};
use crate::task_window::SkipReason;
use crate::types::{Horizon, Resource, ResourceId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;
use time::Date;

/// Grid coordinate: one resource in one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketKey {
    /// The resource (row).
    pub resource_id: ResourceId,
    /// The bucket (column).
    pub bucket_index: u32,
}

impl BucketKey {
    /// Creates a new key.
    #[must_use]
    pub fn new(resource_id: &ResourceId, bucket_index: u32) -> Self {
        Self {
            resource_id: resource_id.clone(),
            bucket_index,
        }
    }
}

/// Running hour totals, dense over roster x horizon.
///
/// Every key starts at zero, so a resource with no work still has a full
/// row. Summation is associative and commutative: aggregators built over
/// disjoint parts of the input can be combined with [`Aggregator::merge`]
/// in any order.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregator {
    horizon: Horizon,
    totals: HashMap<BucketKey, f64>,
}

impl Aggregator {
    /// Creates an aggregator with a zero total for every roster resource in
    /// every bucket of the horizon.
    #[must_use]
    pub fn new(roster: &[Resource], horizon: Horizon) -> Self {
        let mut totals: HashMap<BucketKey, f64> =
            HashMap::with_capacity(roster.len() * horizon.weeks() as usize);

        for resource in roster {
            for bucket_index in 0..horizon.weeks() {
                totals.insert(BucketKey::new(&resource.id, bucket_index), 0.0);
            }
        }

        Self { horizon, totals }
    }

    /// Returns `true` if the resource has a row in this aggregator.
    #[must_use]
    pub fn has_resource(&self, resource_id: &ResourceId) -> bool {
        self.totals.contains_key(&BucketKey::new(resource_id, 0))
    }

    /// Adds hours to a cell.
    ///
    /// # Returns
    ///
    /// `false` if the key is not part of the grid (resource not on the
    /// roster, or bucket outside the horizon). Nothing is added in that case.
    pub fn add(&mut self, key: &BucketKey, hours: f64) -> bool {
        self.totals.get_mut(key).is_some_and(|total| {
            *total += hours;
            true
        })
    }

    /// Folds another aggregator's totals into this one.
    ///
    /// Keys the other aggregator has but this one lacks are ignored, so both
    /// should be built over the same roster and horizon.
    pub fn merge(&mut self, other: Self) {
        for (key, hours) in other.totals {
            self.add(&key, hours);
        }
    }

    /// Returns the current total for a cell (0 for unknown keys).
    #[must_use]
    pub fn total(&self, key: &BucketKey) -> f64 {
        self.totals.get(key).copied().unwrap_or(0.0)
    }

    /// Returns the horizon the aggregator covers.
    #[must_use]
    pub const fn horizon(&self) -> Horizon {
        self.horizon
    }

    /// Consumes the aggregator, returning its totals.
    #[must_use]
    pub fn into_totals(self) -> HashMap<BucketKey, f64> {
        self.totals
    }
}

/// An assignment excluded from aggregation and the reason why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedAssignment {
    /// The assignment's identifier.
    pub assignment_id: String,
    /// Why it was excluded.
    pub reason: SkipReason,
}

/// Counters describing what an aggregation run kept and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationDiagnostics {
    /// Assignments in the input snapshot.
    pub assignments_total: usize,
    /// Assignments whose window resolved.
    pub assignments_resolved: usize,
    /// Assignments that could not be placed on the calendar.
    pub skipped: Vec<SkippedAssignment>,
    /// (assignment, resource) pairs whose window had no working days.
    pub zero_working_day_windows: usize,
    /// Per-day contributions dropped for falling outside the horizon.
    pub contributions_outside_horizon: usize,
    /// (assignment, resource) pairs whose resource is not on the roster.
    pub unrostered_resource_assignments: usize,
}

impl AggregationDiagnostics {
    /// Returns the number of skipped assignments.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Result of one aggregation run.
///
/// Holds the unrounded totals (for tooltips and exact reads) keyed by
/// (resource, bucket), the roster defining the rows, and the mapper
/// defining the columns.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedGrid {
    mapper: BucketMapper,
    roster: Vec<Resource>,
    totals: HashMap<BucketKey, f64>,
    diagnostics: AggregationDiagnostics,
}

impl AggregatedGrid {
    /// Assembles a grid from a finished aggregator.
    #[must_use]
    pub fn new(
        mapper: BucketMapper,
        roster: Vec<Resource>,
        aggregator: Aggregator,
        diagnostics: AggregationDiagnostics,
    ) -> Self {
        Self {
            mapper,
            roster,
            totals: aggregator.into_totals(),
            diagnostics,
        }
    }

    /// Returns the unrounded hours for a resource in a bucket.
    #[must_use]
    pub fn hours(&self, resource_id: &ResourceId, bucket_index: u32) -> f64 {
        self.totals
            .get(&BucketKey::new(resource_id, bucket_index))
            .copied()
            .unwrap_or(0.0)
    }

    /// Returns a resource's unrounded hours summed over the horizon.
    #[must_use]
    pub fn resource_total(&self, resource_id: &ResourceId) -> f64 {
        self.bucket_indices()
            .map(|bucket_index| self.hours(resource_id, bucket_index))
            .sum()
    }

    /// Returns the raw totals map.
    #[must_use]
    pub const fn totals(&self) -> &HashMap<BucketKey, f64> {
        &self.totals
    }

    /// Returns the roster, in row order.
    #[must_use]
    pub fn roster(&self) -> &[Resource] {
        &self.roster
    }

    /// Returns the bucket indices, in column order.
    #[must_use]
    pub fn bucket_indices(&self) -> Range<u32> {
        0..self.mapper.horizon().weeks()
    }

    /// Returns the column labels.
    #[must_use]
    pub fn bucket_labels(&self) -> Vec<BucketLabel> {
        self.mapper.labels()
    }

    /// Returns the date bucket 0 starts on.
    #[must_use]
    pub const fn reference_date(&self) -> Date {
        self.mapper.reference_date()
    }

    /// Returns the horizon.
    #[must_use]
    pub const fn horizon(&self) -> Horizon {
        self.mapper.horizon()
    }

    /// Returns the run's diagnostics.
    #[must_use]
    pub const fn diagnostics(&self) -> &AggregationDiagnostics {
        &self.diagnostics
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn roster() -> Vec<Resource> {
        vec![Resource::new("r1", "Ada"), Resource::new("r2", "Grace")]
    }

    fn horizon(weeks: u32) -> Horizon {
        Horizon::new(weeks).unwrap()
    }

    #[test]
    fn test_new_aggregator_is_dense_and_zero() {
        let aggregator: Aggregator = Aggregator::new(&roster(), horizon(4));
        let totals: HashMap<BucketKey, f64> = aggregator.into_totals();
        assert_eq!(totals.len(), 8);
        assert!(totals.values().all(|hours| *hours == 0.0));
    }

    #[test]
    fn test_add_accumulates() {
        let mut aggregator: Aggregator = Aggregator::new(&roster(), horizon(4));
        let key: BucketKey = BucketKey::new(&ResourceId::new("r1"), 2);

        assert!(aggregator.add(&key, 3.5));
        assert!(aggregator.add(&key, 4.5));
        assert_eq!(aggregator.total(&key), 8.0);
    }

    #[test]
    fn test_add_rejects_unknown_resource() {
        let mut aggregator: Aggregator = Aggregator::new(&roster(), horizon(4));
        let key: BucketKey = BucketKey::new(&ResourceId::new("ghost"), 0);

        assert!(!aggregator.add(&key, 8.0));
        assert!(!aggregator.has_resource(&ResourceId::new("ghost")));
        assert_eq!(aggregator.into_totals().len(), 8);
    }

    #[test]
    fn test_add_rejects_bucket_outside_horizon() {
        let mut aggregator: Aggregator = Aggregator::new(&roster(), horizon(4));
        let key: BucketKey = BucketKey::new(&ResourceId::new("r1"), 4);
        assert!(!aggregator.add(&key, 8.0));
    }

    #[test]
    fn test_merge_is_order_independent() {
        let r1: ResourceId = ResourceId::new("r1");
        let r2: ResourceId = ResourceId::new("r2");

        let build = |entries: &[(&ResourceId, u32, f64)]| {
            let mut aggregator: Aggregator = Aggregator::new(&roster(), horizon(3));
            for (resource, bucket, hours) in entries {
                aggregator.add(&BucketKey::new(resource, *bucket), *hours);
            }
            aggregator
        };

        let a: Aggregator = build(&[(&r1, 0, 8.0), (&r2, 1, 2.0)]);
        let b: Aggregator = build(&[(&r1, 0, 4.0), (&r1, 2, 1.0)]);

        let mut ab: Aggregator = a.clone();
        ab.merge(b.clone());
        let mut ba: Aggregator = b;
        ba.merge(a);

        assert_eq!(ab, ba);
        assert_eq!(ab.total(&BucketKey::new(&r1, 0)), 12.0);
        assert_eq!(ab.total(&BucketKey::new(&r2, 1)), 2.0);
    }
}
