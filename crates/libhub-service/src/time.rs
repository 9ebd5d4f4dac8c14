//! Conversions between instants and library local time.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};

use libhub_core::error::AppError;

/// Local calendar date of `now` in `tz`.
pub fn local_date(now: DateTime<Utc>, tz: FixedOffset) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Local wall-clock time of `now` in `tz`, truncated to whole seconds.
pub fn local_time(now: DateTime<Utc>, tz: FixedOffset) -> NaiveTime {
    let time = now.with_timezone(&tz).time();
    time.with_nanosecond(0).unwrap_or(time)
}

/// Parse a cutoff written as `HH:MM` or `HH:MM:SS`.
pub fn parse_cutoff(raw: &str) -> Result<NaiveTime, AppError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| {
            AppError::configuration(format!("Invalid study section cutoff '{raw}', expected HH:MM"))
        })
}

/// Parse a due date given as RFC 3339 or as a plain `YYYY-MM-DD`, which
/// means local midnight.
pub fn parse_due_date(raw: &str, tz: FixedOffset) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid due date '{raw}'")))?;
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| AppError::validation(format!("Invalid due date '{raw}'")))
}
