//! Student store reading a CSV export of the table

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use crate::config::ColumnMapping;
use crate::model::{Field, StudentRecord};
use crate::storage::error::{StoreError, StoreResult};
use crate::storage::traits::StudentStore;

/// Reads a headered CSV file whose columns follow the configured mapping
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
    columns: ColumnMapping,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>, columns: ColumnMapping) -> Self {
        Self {
            path: path.into(),
            columns,
        }
    }
}

#[async_trait]
impl StudentStore for CsvStore {
    async fn load_students(&self) -> StoreResult<Vec<StudentRecord>> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::connection(format!("CSV file not found: {}", self.path.display()))
            } else {
                StoreError::Io(e)
            }
        })?;
        debug!("Read {} bytes from {}", content.len(), self.path.display());
        parse_students(&content, &self.columns)
    }

    fn describe(&self) -> String {
        format!("csv file {}", self.path.display())
    }
}

/// Parse a CSV export, mapping headers through `columns`
///
/// Blank cells read as missing values.
pub fn parse_students(content: &str, columns: &ColumnMapping) -> StoreResult<Vec<StudentRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let mut positions = Vec::with_capacity(5);
    for (field, column) in columns.pairs() {
        let index = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(column))
            .ok_or_else(|| {
                StoreError::schema(format!(
                    "column '{}' ({}) is missing from the CSV header",
                    column, field
                ))
            })?;
        positions.push((field, index));
    }

    let mut students = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result?;
        let cell = |field: Field| -> Option<String> {
            positions
                .iter()
                .find(|(f, _)| *f == field)
                .and_then(|(_, index)| record.get(*index))
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let student_id = cell(Field::StudentId).ok_or_else(|| {
            StoreError::integrity(format!("data row {} has no student identifier", line + 1))
        })?;

        students.push(StudentRecord {
            student_id,
            province: cell(Field::Province),
            school: cell(Field::School),
            faculty: cell(Field::Faculty),
            registered_at: cell(Field::RegisteredAt),
        });
    }

    Ok(students)
}
