//! Age-based retention policy
//!
//! A mailbox may be archived and removed once it has not been modified for at
//! least `min_age_days` whole days.

use chrono::{DateTime, TimeZone};

use crate::error::{MailBackupError, MailBackupResult};

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days between `modified` and `now`, rounded down
///
/// A modification time in the future yields a negative age.
pub fn age_in_days<Tz: TimeZone>(modified: &DateTime<Tz>, now: &DateTime<Tz>) -> i64 {
    now.clone()
        .signed_duration_since(modified.clone())
        .num_seconds()
        .div_euclid(SECONDS_PER_DAY)
}

/// True iff the mailbox is at least `min_age_days` whole days old
pub fn is_eligible_for_deletion<Tz: TimeZone>(
    modified: &DateTime<Tz>,
    now: &DateTime<Tz>,
    min_age_days: u32,
) -> bool {
    age_in_days(modified, now) >= i64::from(min_age_days)
}

/// Parse a minimum age typed by the user
///
/// Blank input means `default`.
pub fn parse_min_age(input: &str, default: u32) -> MailBackupResult<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    trimmed.parse::<u32>().map_err(|_| {
        MailBackupError::InvalidArgument(format!(
            "minimum age must be a whole number of days, got '{}'",
            trimmed
        ))
    })
}
