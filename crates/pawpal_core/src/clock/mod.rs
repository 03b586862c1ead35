//! Local wall-clock helpers and the date/time formats accepted from callers.
//!
//! Scheduled times carry no offset: they are interpreted in the machine's
//! local zone, falling back to UTC when the local offset cannot be determined.

use crate::error::AppError;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

const DATETIME_SECONDS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const DATETIME_MINUTES: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");
const DATE_ONLY: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

pub fn local_now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc().to_offset(local_offset());
    PrimitiveDateTime::new(now.date(), now.time())
}

pub fn local_today() -> Date {
    local_now().date()
}

/// Parses `YYYY-MM-DD HH:MM[:SS]` (a `T` separator is also accepted).
/// A bare date means midnight.
pub fn parse_datetime(raw: &str) -> Result<PrimitiveDateTime, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("datetime is required"));
    }

    let normalized = trimmed.replacen('T', " ", 1);
    PrimitiveDateTime::parse(&normalized, DATETIME_SECONDS)
        .or_else(|_| PrimitiveDateTime::parse(&normalized, DATETIME_MINUTES))
        .or_else(|_| Date::parse(&normalized, DATE_ONLY).map(Date::midnight))
        .map_err(|_| {
            AppError::invalid_input(format!(
                "datetime must look like YYYY-MM-DD HH:MM, got '{trimmed}'"
            ))
        })
}

pub fn parse_date(raw: &str) -> Result<Date, AppError> {
    let trimmed = raw.trim();
    Date::parse(trimmed, DATE_ONLY).map_err(|_| {
        AppError::invalid_input(format!("date must look like YYYY-MM-DD, got '{trimmed}'"))
    })
}

/// `YYYY-MM-DD HH:MM`, the form used in listings.
pub fn display_datetime(value: PrimitiveDateTime) -> String {
    format!(
        "{} {:02}:{:02}",
        value.date(),
        value.hour(),
        value.minute()
    )
}
