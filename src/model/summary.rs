//! Aggregated output tables

use serde::Serialize;

use super::field::{Field, KeyValue};

/// One group of a summary: its key tuple, row count and optional share of the total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub keys: Vec<KeyValue>,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

impl SummaryRow {
    pub fn new(keys: Vec<KeyValue>, count: u64) -> Self {
        Self {
            keys,
            count,
            percentage: None,
        }
    }

    /// Key tuple rendered as a single label
    pub fn label(&self) -> String {
        self.keys
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// Ordered result of an aggregation
///
/// `rows[i].keys` is aligned with `key_fields`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    pub key_fields: Vec<Field>,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn new(key_fields: Vec<Field>, rows: Vec<SummaryRow>) -> Self {
        Self { key_fields, rows }
    }

    /// Convenience constructor for single-key summaries
    pub fn from_counts<'a>(field: Field, counts: impl IntoIterator<Item = (&'a str, u64)>) -> Self {
        let rows = counts
            .into_iter()
            .map(|(label, count)| SummaryRow::new(vec![KeyValue::Text(label.to_string())], count))
            .collect();
        Self::new(vec![field], rows)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of counts over every row
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|r| r.count).sum()
    }

    /// Whether every row carries a percentage
    pub fn has_percentages(&self) -> bool {
        !self.rows.is_empty() && self.rows.iter().all(|r| r.percentage.is_some())
    }

    /// Position of `field` within the key tuple
    pub fn column_of(&self, field: Field) -> Option<usize> {
        self.key_fields.iter().position(|f| *f == field)
    }
}
