//! Explicit parsing of query-string parameters
//!
//! Every helper here rejects malformed input with [`QueryError::InvalidInput`] instead of
//! falling back to a zero value.

use alloy_primitives::Address;
use chrono::{DateTime, Utc};

use crate::error::QueryError;
use crate::utils::datetime::parse_date_midnight_utc;

fn required<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str, QueryError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| QueryError::InvalidInput(format!("missing parameter '{}'", name)))
}

/// `0x` followed by exactly 40 hex digits, any letter case
pub fn parse_address(name: &str, value: Option<&str>) -> Result<Address, QueryError> {
    let value = required(name, value)?;

    let digits = value.strip_prefix("0x").ok_or_else(|| {
        QueryError::InvalidInput(format!("'{}' must be 0x-prefixed, got '{}'", name, value))
    })?;

    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(QueryError::InvalidInput(format!(
            "'{}' must be 40 hex digits after 0x, got '{}'",
            name, value
        )));
    }

    value.parse::<Address>().map_err(|e| {
        QueryError::InvalidInput(format!("'{}' is not a valid address: {}", name, e))
    })
}

/// Decimal block number; absent means genesis
pub fn parse_start_block(name: &str, value: Option<&str>) -> Result<u64, QueryError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(0),
        Some(v) => v.parse::<u64>().map_err(|_| {
            QueryError::InvalidInput(format!(
                "'{}' must be a non-negative decimal integer, got '{}'",
                name, v
            ))
        }),
    }
}

/// `YYYY-MM-DD`, interpreted at midnight UTC
pub fn parse_date(name: &str, value: Option<&str>) -> Result<DateTime<Utc>, QueryError> {
    let value = required(name, value)?;

    parse_date_midnight_utc(value).map_err(|e| {
        QueryError::InvalidInput(format!(
            "'{}' must be a YYYY-MM-DD date, got '{}': {}",
            name, value, e
        ))
    })
}
