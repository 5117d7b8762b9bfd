//! Head-and-tail table preview

use crate::model::{BaseTable, StudentRecord};

/// The first and last `n` rows, or every row when the table has at most `2n`
pub fn preview(table: &BaseTable, n: usize) -> Vec<StudentRecord> {
    let rows = table.records();
    if rows.len() > n.saturating_mul(2) {
        rows[..n]
            .iter()
            .chain(&rows[rows.len() - n..])
            .cloned()
            .collect()
    } else {
        rows.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(len: usize) -> BaseTable {
        BaseTable::new((0..len).map(|i| StudentRecord::new(i.to_string())).collect()).unwrap()
    }

    fn ids(rows: &[StudentRecord]) -> Vec<String> {
        rows.iter().map(|r| r.student_id.clone()).collect()
    }

    #[test]
    fn test_small_table_is_shown_whole() {
        assert_eq!(preview(&table(14), 7).len(), 14);
        assert!(preview(&table(0), 7).is_empty());
    }

    #[test]
    fn test_head_and_tail() {
        let rows = preview(&table(20), 3);
        assert_eq!(ids(&rows), vec!["0", "1", "2", "17", "18", "19"]);
    }
}
