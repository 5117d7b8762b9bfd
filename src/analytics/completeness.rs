//! Null/completeness checks

use crate::error::Result;
use crate::model::{BaseTable, Dataset, Field};

/// Identifiers of every row whose `field` is missing, in table order
pub fn find_missing(table: &BaseTable, field: Field) -> Result<Vec<String>> {
    table.require(field)?;

    Ok(table
        .iter()
        .filter(|record| record.text(field).is_none())
        .map(|record| record.student_id.clone())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::model::StudentRecord;

    fn table() -> BaseTable {
        BaseTable::new(vec![
            StudentRecord::new("s3").with_school("A"),
            StudentRecord::new("s1"),
            StudentRecord::new("s2").with_school("B"),
            StudentRecord::new("s0"),
        ])
        .unwrap()
    }

    #[test]
    fn test_missing_schools_in_row_order() {
        assert_eq!(find_missing(&table(), Field::School).unwrap(), vec!["s1", "s0"]);
    }

    #[test]
    fn test_identifier_is_never_missing() {
        assert!(find_missing(&table(), Field::StudentId).unwrap().is_empty());
    }

    #[test]
    fn test_derived_field_is_rejected() {
        let err = find_missing(&table(), Field::Year).unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_FIELD_NOT_AVAILABLE);
    }
}
