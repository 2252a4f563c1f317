// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of weeks reported when the caller does not choose a horizon.
pub const DEFAULT_HORIZON_WEEKS: u32 = 12;

/// Largest horizon a single aggregation run will cover.
pub const MAX_HORIZON_WEEKS: u32 = 104;

/// Identifies a resource (a person or team that can be assigned work).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Creates a new `ResourceId`.
    ///
    /// # Arguments
    ///
    /// * `value` - The external identifier of the resource
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies the project an assignment belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Creates a new `ProjectId`.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A roster entry. Every roster resource gets a heatmap row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// The resource identifier.
    pub id: ResourceId,
    /// Human-readable name shown next to the row.
    pub display_name: String,
}

impl Resource {
    /// Creates a new roster entry.
    #[must_use]
    pub fn new(id: &str, display_name: &str) -> Self {
        Self {
            id: ResourceId::new(id),
            display_name: display_name.to_string(),
        }
    }
}

/// A scheduled unit of work as read from the task store.
///
/// Dates are kept as the raw strings the store returned. Turning them into
/// calendar dates is the window resolver's job, because an unparsable date
/// must skip the assignment rather than fail the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkAssignment {
    /// The task identifier.
    pub id: String,
    /// The project the task belongs to. Used for allocation lookups.
    pub project_id: ProjectId,
    /// Start date (ISO 8601).
    #[serde(default)]
    pub start_date: Option<String>,
    /// Explicit end date (ISO 8601, inclusive).
    #[serde(default)]
    pub end_date: Option<String>,
    /// Duration in working days after the start day.
    #[serde(default)]
    pub duration_days: Option<i64>,
    /// Resources assigned to the task.
    #[serde(default)]
    pub resource_ids: Vec<ResourceId>,
    /// Explicit total hours per resource for this task.
    #[serde(default)]
    pub resource_work_hours: Option<BTreeMap<ResourceId, f64>>,
}

impl WorkAssignment {
    /// Creates an assignment with a start date and no end, duration, or
    /// resources. Use the `with_*` builders to fill in the rest.
    #[must_use]
    pub fn new(id: &str, project_id: &str, start_date: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            project_id: ProjectId::new(project_id),
            start_date: start_date.map(str::to_string),
            end_date: None,
            duration_days: None,
            resource_ids: Vec::new(),
            resource_work_hours: None,
        }
    }

    /// Sets the explicit end date.
    #[must_use]
    pub fn with_end_date(mut self, end_date: &str) -> Self {
        self.end_date = Some(end_date.to_string());
        self
    }

    /// Sets the duration in working days.
    #[must_use]
    pub const fn with_duration(mut self, duration_days: i64) -> Self {
        self.duration_days = Some(duration_days);
        self
    }

    /// Adds a resource to the assignment.
    #[must_use]
    pub fn with_resource(mut self, resource_id: &str) -> Self {
        self.resource_ids.push(ResourceId::new(resource_id));
        self
    }

    /// Records explicit total hours for a resource.
    #[must_use]
    pub fn with_work_hours(mut self, resource_id: &str, hours: f64) -> Self {
        self.resource_work_hours
            .get_or_insert_with(BTreeMap::new)
            .insert(ResourceId::new(resource_id), hours);
        self
    }

    /// Returns the explicitly recorded hours for a resource, if any.
    #[must_use]
    pub fn explicit_hours_for(&self, resource_id: &ResourceId) -> Option<f64> {
        self.resource_work_hours
            .as_ref()
            .and_then(|hours| hours.get(resource_id))
            .copied()
    }

    /// Returns the assigned resources with duplicates removed, in first-seen order.
    #[must_use]
    pub fn distinct_resources(&self) -> Vec<&ResourceId> {
        let mut seen: Vec<&ResourceId> = Vec::with_capacity(self.resource_ids.len());
        for resource_id in &self.resource_ids {
            if !seen.contains(&resource_id) {
                seen.push(resource_id);
            }
        }
        seen
    }
}

/// Number of one-week buckets an aggregation run reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Horizon(u32);

impl Horizon {
    /// Creates a validated horizon.
    ///
    /// # Arguments
    ///
    /// * `weeks` - Number of one-week buckets, counted from the reference date
    ///
    /// # Errors
    ///
    /// Returns an error if `weeks` is zero or exceeds `MAX_HORIZON_WEEKS`.
    pub const fn new(weeks: u32) -> Result<Self, DomainError> {
        if weeks == 0 || weeks > MAX_HORIZON_WEEKS {
            return Err(DomainError::InvalidHorizon {
                weeks,
                max: MAX_HORIZON_WEEKS,
            });
        }
        Ok(Self(weeks))
    }

    /// Returns the number of weeks.
    #[must_use]
    pub const fn weeks(self) -> u32 {
        self.0
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self(DEFAULT_HORIZON_WEEKS)
    }
}

impl TryFrom<u32> for Horizon {
    type Error = DomainError;

    fn try_from(weeks: u32) -> Result<Self, Self::Error> {
        Self::new(weeks)
    }
}

impl From<Horizon> for u32 {
    fn from(horizon: Horizon) -> Self {
        horizon.0
    }
}
