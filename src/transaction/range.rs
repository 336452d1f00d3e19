//! Inclusive date ranges used to filter transactions.

use std::ops::RangeInclusive;

use time::{Date, Duration, macros::date};

/// The first day of the month that `date` falls in.
pub fn first_of_month(date: Date) -> Date {
    date - Duration::days(i64::from(date.day()) - 1)
}

/// The first and last day of the month that `date` falls in.
pub fn month_range(date: Date) -> RangeInclusive<Date> {
    let first = first_of_month(date);
    // 31 days after the first always lands in the next month.
    let last = first_of_month(first + Duration::days(31)) - Duration::days(1);

    first..=last
}

/// A range that covers every date a transaction could have.
pub fn all_time() -> RangeInclusive<Date> {
    date!(0001 - 01 - 01)..=date!(9999 - 12 - 31)
}

/// Build the range `from..=to`, filling in missing bounds from `default`.
pub fn range_or_default(
    from: Option<Date>,
    to: Option<Date>,
    default: RangeInclusive<Date>,
) -> RangeInclusive<Date> {
    let (default_from, default_to) = default.into_inner();

    from.unwrap_or(default_from)..=to.unwrap_or(default_to)
}
