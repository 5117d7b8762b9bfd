//! Immutable in-memory tables

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use super::field::{Field, KeyValue};
use super::record::StudentRecord;
use crate::error::{DashboardError, ErrorCode, Result};

/// Read access shared by every table that can be grouped
pub trait Dataset {
    /// Short description used in error messages
    fn describe(&self) -> &'static str;

    fn row_count(&self) -> usize;

    /// Whether rows of this table carry a value for `field`
    fn carries(&self, field: Field) -> bool;

    /// Group-key cell of `field` in row `row`
    ///
    /// Callers must check [`Dataset::carries`] first; absent fields read as `Null`.
    fn key(&self, row: usize, field: Field) -> KeyValue;

    /// Fail with a configuration error unless the table carries `field`
    fn require(&self, field: Field) -> Result<()> {
        if self.carries(field) {
            Ok(())
        } else {
            Err(DashboardError::field_not_available(field, self.describe()))
        }
    }
}

/// The complete student dataset of a session
///
/// Rows are shared behind an `Arc` and never mutated; transforms derive new tables.
#[derive(Debug, Clone)]
pub struct BaseTable {
    rows: Arc<[StudentRecord]>,
}

impl BaseTable {
    /// Build a table, enforcing that every row has a unique, non-blank identifier
    pub fn new(rows: Vec<StudentRecord>) -> Result<Self> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            if row.student_id.trim().is_empty() {
                return Err(DashboardError::storage_with_code(
                    ErrorCode::STORAGE_INTEGRITY,
                    format!("row {} has no student identifier", index + 1),
                ));
            }
            if !seen.insert(row.student_id.as_str()) {
                return Err(DashboardError::storage_with_code(
                    ErrorCode::STORAGE_INTEGRITY,
                    format!(
                        "student identifier '{}' appears more than once (row {})",
                        row.student_id,
                        index + 1
                    ),
                ));
            }
        }

        Ok(Self { rows: rows.into() })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &StudentRecord> {
        self.rows.iter()
    }
}

impl Dataset for BaseTable {
    fn describe(&self) -> &'static str {
        "student table"
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn carries(&self, field: Field) -> bool {
        !field.is_derived()
    }

    fn key(&self, row: usize, field: Field) -> KeyValue {
        self.rows
            .get(row)
            .map(|r| KeyValue::from_text(r.text(field)))
            .unwrap_or(KeyValue::Null)
    }
}

/// A student row together with its registration year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedRecord {
    pub record: StudentRecord,
    pub year: i32,
}

/// Why a row was left out of temporal bucketing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The timestamp is null or blank
    Missing,
    /// The timestamp could not be parsed as a date/time
    Unparseable,
}

/// A row excluded from temporal bucketing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    pub student_id: String,
    pub raw: Option<String>,
    pub reason: RejectReason,
}

/// Rows with a derived registration year, plus the rows that could not be dated
#[derive(Debug, Clone)]
pub struct YearTable {
    source: Field,
    rows: Vec<DatedRecord>,
    rejected: Vec<RejectedRow>,
}

impl YearTable {
    pub(crate) fn new(source: Field, rows: Vec<DatedRecord>, rejected: Vec<RejectedRow>) -> Self {
        Self {
            source,
            rows,
            rejected,
        }
    }

    /// The timestamp field the years were derived from
    pub fn source(&self) -> Field {
        self.source
    }

    pub fn rejected(&self) -> &[RejectedRow] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Dataset for YearTable {
    fn describe(&self) -> &'static str {
        "dated student table"
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn carries(&self, _field: Field) -> bool {
        true
    }

    fn key(&self, row: usize, field: Field) -> KeyValue {
        match self.rows.get(row) {
            Some(dated) if field == Field::Year => KeyValue::Year(dated.year),
            Some(dated) => KeyValue::from_text(dated.record.text(field)),
            None => KeyValue::Null,
        }
    }
}
