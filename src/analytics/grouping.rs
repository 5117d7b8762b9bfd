//! Group-count aggregation

use std::collections::HashMap;

use crate::error::{DashboardError, ErrorCode, Result};
use crate::model::{Dataset, Field, KeyValue, SummaryRow, SummaryTable};

/// Count rows per distinct key tuple
///
/// Groups come out in order of first appearance. Missing values form their own group.
pub fn group_count<D: Dataset + ?Sized>(table: &D, key_fields: &[Field]) -> Result<SummaryTable> {
    if key_fields.is_empty() {
        return Err(DashboardError::config_with_code(
            ErrorCode::CONFIG_EMPTY_GROUP_KEY,
            "group_count needs at least one key field",
        ));
    }
    for field in key_fields {
        table.require(*field)?;
    }

    let mut index: HashMap<Vec<KeyValue>, usize> = HashMap::new();
    let mut rows: Vec<SummaryRow> = Vec::new();

    for row in 0..table.row_count() {
        let keys: Vec<KeyValue> = key_fields.iter().map(|f| table.key(row, *f)).collect();
        match index.get(&keys) {
            Some(&position) => rows[position].count += 1,
            None => {
                index.insert(keys.clone(), rows.len());
                rows.push(SummaryRow::new(keys, 1));
            }
        }
    }

    Ok(SummaryTable::new(key_fields.to_vec(), rows))
}

/// Stable ascending sort by key tuple
///
/// Missing values sort first, then years numerically, then text.
pub fn order_by_keys(summary: &SummaryTable) -> SummaryTable {
    let mut rows = summary.rows.clone();
    rows.sort_by(|a, b| a.keys.cmp(&b.keys));
    SummaryTable::new(summary.key_fields.clone(), rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BaseTable, StudentRecord};

    fn text(s: &str) -> KeyValue {
        KeyValue::Text(s.to_string())
    }

    fn table() -> BaseTable {
        BaseTable::new(vec![
            StudentRecord::new("1").with_province("B").with_faculty("Law"),
            StudentRecord::new("2").with_province("A").with_faculty("Law"),
            StudentRecord::new("3").with_province("B").with_faculty("Arts"),
            StudentRecord::new("4").with_faculty("Law"),
            StudentRecord::new("5").with_province("B").with_faculty("Law"),
        ])
        .unwrap()
    }

    #[test]
    fn test_single_key_first_appearance_order() {
        let summary = group_count(&table(), &[Field::Province]).unwrap();
        let got: Vec<_> = summary
            .rows
            .iter()
            .map(|r| (r.keys[0].clone(), r.count))
            .collect();
        assert_eq!(
            got,
            vec![(text("B"), 3), (text("A"), 1), (KeyValue::Null, 1)]
        );
        assert_eq!(summary.total(), 5);
    }

    #[test]
    fn test_multi_key_cross_tab() {
        let summary = group_count(&table(), &[Field::Province, Field::Faculty]).unwrap();
        assert_eq!(summary.key_fields, vec![Field::Province, Field::Faculty]);
        assert_eq!(summary.len(), 4);
        assert_eq!(summary.rows[0].keys, vec![text("B"), text("Law")]);
        assert_eq!(summary.rows[0].count, 2);
        assert_eq!(summary.total(), 5);
    }

    #[test]
    fn test_empty_key_list_is_rejected() {
        let err = group_count(&table(), &[]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_EMPTY_GROUP_KEY);
    }

    #[test]
    fn test_year_is_not_a_base_field() {
        let err = group_count(&table(), &[Field::Year]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_FIELD_NOT_AVAILABLE);
    }

    #[test]
    fn test_empty_table_yields_empty_summary() {
        let empty = BaseTable::new(Vec::new()).unwrap();
        let summary = group_count(&empty, &[Field::Faculty]).unwrap();
        assert!(summary.is_empty());
        assert_eq!(summary.total(), 0);
    }

    #[test]
    fn test_order_by_keys() {
        let summary = group_count(&table(), &[Field::Province]).unwrap();
        let ordered = order_by_keys(&summary);
        let keys: Vec<_> = ordered.rows.iter().map(|r| r.keys[0].clone()).collect();
        assert_eq!(keys, vec![KeyValue::Null, text("A"), text("B")]);
    }
}
