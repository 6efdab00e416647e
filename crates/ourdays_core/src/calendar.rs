//! Relationship calendar arithmetic.
//!
//! # Responsibility
//! - Compute whole-day differences and the inclusive "days together" count.
//! - Find the next milestone (round hundreds, anniversaries, special totals).
//!
//! # Invariants
//! - All functions are pure; time-of-day never influences a day count.
//! - Day 1 is the start date itself.
//! - A milestone is always strictly in the future, never "today".

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

/// Day totals that get celebrated regardless of round-number rules.
pub const SPECIAL_DAY_COUNTS: [i64; 4] = [520, 1314, 2000, 5200];

const DAYS_PER_ANNIVERSARY: i64 = 365;

/// Renders a date as `YYYY.MM.DD` with zero-padded month and day.
pub fn format_date(date: NaiveDate) -> String {
    format!("{}.{:02}.{:02}", date.year(), date.month(), date.day())
}

/// Whole-day difference between two calendar dates.
///
/// Negative when `a` precedes `b`. For any dates `a` and `b`:
/// `days_between(a, b) == -days_between(b, a)` and `days_between(a, a) == 0`.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    a.signed_duration_since(b).num_days()
}

/// Whole-day difference between two timestamps, ignoring time-of-day.
pub fn days_between_timestamps(a: NaiveDateTime, b: NaiveDateTime) -> i64 {
    days_between(a.date(), b.date())
}

/// Days elapsed since `start`, counting the start date as day 1.
///
/// Zero or negative when `today` is before `start`.
pub fn day_count(today: NaiveDate, start: NaiveDate) -> i64 {
    days_between(today, start) + 1
}

/// What kind of day count a milestone celebrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilestoneKind {
    /// A plain day total (round hundred or one of [`SPECIAL_DAY_COUNTS`]).
    Days,
    /// A multiple of 365 days.
    Anniversary { years: i64 },
}

/// The nearest future milestone relative to a current day count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Milestone {
    /// Target day count (day 1 = start date).
    pub day: i64,
    pub kind: MilestoneKind,
    /// Calendar date on which day `day` occurs.
    pub date: NaiveDate,
    /// `day - current_days` at the time of computation.
    pub days_left: i64,
}

impl Milestone {
    /// Human-readable description of the milestone.
    pub fn label(&self) -> String {
        match self.kind {
            MilestoneKind::Days => format!("{} days together", self.day),
            MilestoneKind::Anniversary { years } => format!("{years}-year anniversary"),
        }
    }
}

/// Finds the nearest milestone strictly after `current_days`.
///
/// Candidates are the next multiple of 100, the next multiple of 365 and any
/// special total exceeding `current_days`. The smallest day count wins; on a
/// tie the earlier-constructed candidate wins (hundred, then anniversary,
/// then special totals), which a stable sort preserves.
///
/// `current_days` may be zero or negative (start date in the future); the
/// "next multiple" is then still the smallest multiple strictly above it,
/// which can be zero itself.
pub fn next_milestone(current_days: i64, start: NaiveDate) -> Milestone {
    let mut candidates: Vec<(i64, MilestoneKind)> = Vec::new();

    candidates.push((next_multiple(current_days, 100), MilestoneKind::Days));

    let anniversary_day = next_multiple(current_days, DAYS_PER_ANNIVERSARY);
    candidates.push((
        anniversary_day,
        MilestoneKind::Anniversary {
            years: anniversary_day / DAYS_PER_ANNIVERSARY,
        },
    ));

    for &target in SPECIAL_DAY_COUNTS.iter() {
        if target > current_days {
            candidates.push((target, MilestoneKind::Days));
        }
    }

    candidates.sort_by_key(|(day, _)| *day);
    let (day, kind) = candidates[0];

    Milestone {
        day,
        kind,
        date: start + Duration::days(day - 1),
        days_left: day - current_days,
    }
}

/// Smallest multiple of `step` strictly greater than `value`.
///
/// Euclidean division keeps the rounding direction correct for negative
/// values (`next_multiple(-50, 100) == 0`).
fn next_multiple(value: i64, step: i64) -> i64 {
    (value.div_euclid(step) + 1) * step
}
