// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Working-day calendar arithmetic.
//!
//! Working days are Monday through Friday. There is no holiday calendar.
//! All functions are pure and saturate at `Date::MAX` instead of failing.
//! Their cost does not depend on the length of the range.

use time::{Date, Duration, Weekday};

/// Returns `true` for Monday through Friday.
#[must_use]
pub const fn is_working_day(date: Date) -> bool {
    is_working_weekday(date.weekday())
}

const fn is_working_weekday(weekday: Weekday) -> bool {
    !matches!(weekday, Weekday::Saturday | Weekday::Sunday)
}

/// Advances `start` by `n` working days.
///
/// Counting begins strictly after `start`: the start day itself is day 0,
/// and the returned date is the `n`th working day after it. For `n <= 0`
/// the start date is returned unchanged.
///
/// # Example
///
/// ```text
/// start = 2024-01-05 (Friday), n = 1  ->  2024-01-08 (Monday)
/// start = 2024-01-01 (Monday), n = 5  ->  2024-01-08 (Monday)
/// ```
#[must_use]
pub fn advance_by_working_days(start: Date, n: i64) -> Date {
    if n <= 0 {
        return start;
    }

    // Any seven consecutive days hold exactly five working days. Keep 1..=5
    // days for the walk so the result never lands on a weekend.
    let full_weeks: i64 = (n - 1) / 5;
    let remainder: i64 = n - full_weeks * 5;

    let Some(current) = advance_by_weeks(start, full_weeks) else {
        return Date::MAX;
    };
    walk_working_days(current, remainder)
}

/// Moves `start` forward by whole weeks, or `None` past `Date::MAX`.
fn advance_by_weeks(start: Date, weeks: i64) -> Option<Date> {
    let days: i64 = weeks.checked_mul(7)?;
    if days > (Date::MAX - start).whole_days() {
        return None;
    }
    start.checked_add(Duration::days(days))
}

/// Steps one day at a time until `n` working days have been counted.
fn walk_working_days(start: Date, n: i64) -> Date {
    let mut current: Date = start;
    let mut remaining: i64 = n;

    while remaining > 0 {
        let Some(next) = current.next_day() else {
            return Date::MAX;
        };
        current = next;

        if is_working_day(current) {
            remaining -= 1;
        }
    }

    current
}

/// Counts the working days in `[start, end]`, both ends inclusive.
///
/// Returns 0 when `start > end`.
#[must_use]
pub fn count_working_days_inclusive(start: Date, end: Date) -> u32 {
    if start > end {
        return 0;
    }

    let total_days: i64 = (end - start).whole_days() + 1;
    let full_weeks: i64 = total_days / 7;
    let remainder: i64 = total_days % 7;

    let mut count: i64 = full_weeks * 5;
    let mut weekday: Weekday = start.weekday();
    for _ in 0..remainder {
        if is_working_weekday(weekday) {
            count += 1;
        }
        weekday = weekday.next();
    }

    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Returns an iterator over the working days in `[start, end]`.
#[must_use]
pub const fn working_days(start: Date, end: Date) -> WorkingDays {
    WorkingDays {
        next: Some(start),
        end,
    }
}

/// Iterator produced by [`working_days`].
#[derive(Debug, Clone)]
pub struct WorkingDays {
    next: Option<Date>,
    end: Date,
}

impl Iterator for WorkingDays {
    type Item = Date;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.next {
            if current > self.end {
                self.next = None;
                return None;
            }
            self.next = current.next_day();
            if is_working_day(current) {
                return Some(current);
            }
        }
        None
    }
}
