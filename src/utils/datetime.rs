use chrono::{DateTime, NaiveDate, Utc};

/// Parses a `YYYY-MM-DD` date as midnight UTC of that day.
pub fn parse_date_midnight_utc(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Unix seconds for a UTC instant, clamped at zero for pre-epoch dates.
pub fn unix_seconds(value: DateTime<Utc>) -> u64 {
    value.timestamp().max(0) as u64
}
