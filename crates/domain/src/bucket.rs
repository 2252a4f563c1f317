// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mapping of dates onto one-week buckets relative to a reference date.
//!
//! ## Invariants
//!
//! - Bucket `i` covers `reference + 7i` through `reference + 7i + 6`
//! - Only buckets in `[0, horizon)` exist; other dates map to no bucket
//! - Out-of-range dates are dropped, never clamped into an edge bucket

use crate::types::Horizon;
use serde::{Deserialize, Serialize};
use time::{Date, Duration};

const DAYS_PER_BUCKET: i64 = 7;

/// Column metadata for one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketLabel {
    /// Zero-based bucket index.
    pub index: u32,
    /// Display label, `"Week N"` with N starting at 1.
    pub label: String,
    /// First day covered by the bucket.
    #[serde(with = "crate::iso_date")]
    pub start_date: Date,
    /// Last day covered by the bucket (inclusive).
    #[serde(with = "crate::iso_date")]
    pub end_date: Date,
}

/// Maps dates onto bucket indices for one aggregation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketMapper {
    reference_date: Date,
    horizon: Horizon,
}

impl BucketMapper {
    /// Creates a mapper for a run.
    ///
    /// # Arguments
    ///
    /// * `reference_date` - The day bucket 0 starts on (normally today)
    /// * `horizon` - Number of buckets retained
    #[must_use]
    pub const fn new(reference_date: Date, horizon: Horizon) -> Self {
        Self {
            reference_date,
            horizon,
        }
    }

    /// Returns the reference date.
    #[must_use]
    pub const fn reference_date(&self) -> Date {
        self.reference_date
    }

    /// Returns the horizon.
    #[must_use]
    pub const fn horizon(&self) -> Horizon {
        self.horizon
    }

    /// Returns `floor((date - reference) / 7)`, without any horizon check.
    #[must_use]
    pub fn raw_bucket_index(&self, date: Date) -> i64 {
        (date - self.reference_date)
            .whole_days()
            .div_euclid(DAYS_PER_BUCKET)
    }

    /// Returns the bucket a date falls into, or `None` if it lies before
    /// the reference date or at/after the end of the horizon.
    #[must_use]
    pub fn bucket_for(&self, date: Date) -> Option<u32> {
        u32::try_from(self.raw_bucket_index(date))
            .ok()
            .filter(|index| *index < self.horizon.weeks())
    }

    /// Returns the first day of a bucket.
    #[must_use]
    pub fn bucket_start(&self, index: u32) -> Date {
        self.reference_date
            .checked_add(Duration::days(i64::from(index) * DAYS_PER_BUCKET))
            .unwrap_or(Date::MAX)
    }

    /// Returns the last day of a bucket (inclusive).
    #[must_use]
    pub fn bucket_end(&self, index: u32) -> Date {
        self.bucket_start(index)
            .checked_add(Duration::days(DAYS_PER_BUCKET - 1))
            .unwrap_or(Date::MAX)
    }

    /// Returns the last day covered by the horizon (inclusive).
    #[must_use]
    pub fn horizon_end(&self) -> Date {
        self.bucket_end(self.horizon.weeks() - 1)
    }

    /// Returns the label for a bucket.
    #[must_use]
    pub fn label(&self, index: u32) -> BucketLabel {
        BucketLabel {
            index,
            label: format!("Week {}", index + 1),
            start_date: self.bucket_start(index),
            end_date: self.bucket_end(index),
        }
    }

    /// Returns the labels of every bucket in the horizon, in order.
    #[must_use]
    pub fn labels(&self) -> Vec<BucketLabel> {
        (0..self.horizon.weeks()).map(|i| self.label(i)).collect()
    }
}
