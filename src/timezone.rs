//! Conversions from the configured canonical timezone name to local offsets and dates.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// Get the current UTC offset for a canonical timezone name, e.g. "Pacific/Auckland".
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Get today's date in the timezone `canonical_timezone`.
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if the timezone name is not recognised.
pub fn get_local_date(canonical_timezone: &str) -> Result<Date, Error> {
    let Some(local_offset) = get_local_offset(canonical_timezone) else {
        tracing::error!("Invalid timezone {}", canonical_timezone);
        return Err(Error::InvalidTimezoneError(canonical_timezone.to_owned()));
    };

    Ok(OffsetDateTime::now_utc().to_offset(local_offset).date())
}
