//! Ranking and top-k selection

use crate::model::SummaryTable;

/// Sort by count descending, keeping input order among equal counts
///
/// With `Some(n)` only the first `n` rows are kept.
pub fn rank_desc(summary: &SummaryTable, n: Option<usize>) -> SummaryTable {
    let mut rows = summary.rows.clone();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    if let Some(n) = n {
        rows.truncate(n);
    }
    SummaryTable::new(summary.key_fields.clone(), rows)
}
