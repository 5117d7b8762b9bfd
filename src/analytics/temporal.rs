//! Temporal bucketing of registration timestamps

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::error::{DashboardError, ErrorCode, Result};
use crate::model::{BaseTable, DatedRecord, Field, RejectReason, RejectedRow, YearTable};

/// Date-time layouts tried after RFC 3339, first match wins
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Date-only layouts; `%m/%d/%Y` is month first
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Zoned layout produced by Postgres when casting `timestamptz` to text
const ZONED_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%#z";

/// Calendar year of a textual timestamp, if it parses
pub fn parse_year(raw: &str) -> Option<i32> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.year());
    }
    if let Ok(dt) = DateTime::parse_from_str(value, ZONED_FORMAT) {
        return Some(dt.year());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
    {
        return Some(dt.year());
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(value, f).ok())
        .map(|d| d.year())
}

/// Derive the calendar year of `ts_field` for every row
///
/// Rows whose timestamp is missing or unparseable are excluded and listed in
/// [`YearTable::rejected`]; they never fail the operation.
pub fn year_from_timestamp(table: &BaseTable, ts_field: Field) -> Result<YearTable> {
    if !ts_field.is_timestamp() {
        return Err(DashboardError::config_with_code(
            ErrorCode::CONFIG_NOT_A_TIMESTAMP,
            format!("field '{}' does not hold timestamps", ts_field),
        ));
    }

    let mut dated = Vec::with_capacity(table.len());
    let mut rejected = Vec::new();

    for record in table.iter() {
        let raw = record.text(ts_field);
        match raw.map(str::trim).filter(|v| !v.is_empty()) {
            None => rejected.push(RejectedRow {
                student_id: record.student_id.clone(),
                raw: raw.map(str::to_string),
                reason: RejectReason::Missing,
            }),
            Some(value) => match parse_year(value) {
                Some(year) => dated.push(DatedRecord {
                    record: record.clone(),
                    year,
                }),
                None => {
                    debug!(
                        "Excluding student {}: unparseable {} '{}'",
                        record.student_id, ts_field, value
                    );
                    rejected.push(RejectedRow {
                        student_id: record.student_id.clone(),
                        raw: Some(value.to_string()),
                        reason: RejectReason::Unparseable,
                    });
                }
            },
        }
    }

    if !rejected.is_empty() {
        let unparseable = rejected
            .iter()
            .filter(|r| r.reason == RejectReason::Unparseable)
            .count();
        warn!(
            "Excluded {} of {} rows from yearly grouping ({} missing, {} unparseable)",
            rejected.len(),
            table.len(),
            rejected.len() - unparseable,
            unparseable
        );
    }

    Ok(YearTable::new(ts_field, dated, rejected))
}
