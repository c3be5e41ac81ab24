use chrono::{FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PeriodError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("start date {start} is after end date {end}")]
    Reversed { start: String, end: String },
    #[error("invalid UTC offset: {0} hours")]
    InvalidOffset(i32),
}

fn parse_day(raw: &str) -> Result<NaiveDate, PeriodError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| PeriodError::InvalidDate(raw.to_string()))
}

fn offset(utc_offset_hours: i32) -> Result<FixedOffset, PeriodError> {
    FixedOffset::east_opt(utc_offset_hours * 3600).ok_or(PeriodError::InvalidOffset(utc_offset_hours))
}

/// Calendar days to an inclusive millisecond window:
/// start day at 00:00:00.000, end day at 23:59:59.999 local time.
pub fn date_range_to_ms(
    start: &str,
    end: &str,
    utc_offset_hours: i32,
) -> Result<(i64, i64), PeriodError> {
    let start_day = parse_day(start)?;
    let end_day = parse_day(end)?;
    if start_day > end_day {
        return Err(PeriodError::Reversed {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    let tz = offset(utc_offset_hours)?;
    let to_ms = |local: Option<NaiveDateTime>, day: NaiveDate| -> Result<i64, PeriodError> {
        local
            .and_then(|local| tz.from_local_datetime(&local).single())
            .map(|dt| dt.timestamp_millis())
            .ok_or_else(|| PeriodError::InvalidDate(day.to_string()))
    };

    Ok((
        to_ms(start_day.and_hms_opt(0, 0, 0), start_day)?,
        to_ms(end_day.and_hms_milli_opt(23, 59, 59, 999), end_day)?,
    ))
}

/// Today as "YYYY-MM-DD" in the given offset
pub fn today(utc_offset_hours: i32) -> String {
    let now = Utc::now();
    match offset(utc_offset_hours) {
        Ok(tz) => now.with_timezone(&tz).format("%Y-%m-%d").to_string(),
        Err(_) => now.format("%Y-%m-%d").to_string(),
    }
}
