//! Percentages and long-tail collapsing

use super::ranking::rank_desc;
use crate::model::{KeyValue, SummaryRow, SummaryTable};

fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Annotate every row with its share of the table total
///
/// The total covers every row of `summary`, not just the rows that end up displayed.
pub fn add_percentage(summary: &SummaryTable) -> SummaryTable {
    let total = summary.total();
    let rows = summary
        .rows
        .iter()
        .map(|row| SummaryRow {
            percentage: Some(percent(row.count, total)),
            ..row.clone()
        })
        .collect();
    SummaryTable::new(summary.key_fields.clone(), rows)
}

/// Merge rows below `threshold_pct` into a single "Other" row
///
/// Rows at or above the threshold are kept. The merged row carries "Other" in every key
/// column, enters the count ordering like any other row and, on equal counts, sorts after
/// the kept rows. A lone minor row is only renamed.
pub fn collapse_minor(summary: &SummaryTable, threshold_pct: f64) -> SummaryTable {
    let annotated = if summary.has_percentages() {
        summary.clone()
    } else {
        add_percentage(summary)
    };
    let total = annotated.total();

    let (mut major, minor): (Vec<SummaryRow>, Vec<SummaryRow>) = annotated
        .rows
        .into_iter()
        .partition(|row| row.percentage.unwrap_or(0.0) >= threshold_pct);

    if !minor.is_empty() {
        let count: u64 = minor.iter().map(|row| row.count).sum();
        major.push(SummaryRow {
            keys: vec![KeyValue::other(); annotated.key_fields.len()],
            count,
            percentage: Some(percent(count, total)),
        });
    }

    rank_desc(&SummaryTable::new(annotated.key_fields, major), None)
}
