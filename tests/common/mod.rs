//! Shared fixtures for integration tests

#![allow(dead_code)]

use anyhow::Result;
use campus_insights::model::{BaseTable, StudentRecord};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Header row using the legacy `student_list` column names
pub const CSV_HEADER: &str = "stu_id,names,school_eng,fac_eng,ste_reg";

/// Ten students: six from Songkhla, three from Pattani, one from Yala
pub fn sample_records() -> Vec<StudentRecord> {
    let rows = [
        ("6401", "Songkhla", Some("Hatyai Wittayalai"), "Engineering", "2021-05-10 09:12:00"),
        ("6402", "Songkhla", Some("Mahavajiravudh"), "Science", "2021-05-11 10:00:00"),
        ("6403", "Pattani", None, "Engineering", "2022-06-01 08:30:00"),
        ("6404", "Songkhla", Some("Hatyai Wittayalai"), "Medicine", "2022-06-02 13:45:00"),
        ("6405", "Yala", Some("Satree Yala"), "Science", "not a date"),
        ("6406", "Pattani", Some("Benjamarachutit"), "Engineering", "2023-01-15"),
        ("6407", "Songkhla", None, "Science", "2023-01-16T08:00:00+07:00"),
        ("6408", "Songkhla", Some("Mahavajiravudh"), "Engineering", "2021-07-20 11:11:11"),
        ("6409", "Pattani", Some("Benjamarachutit"), "Medicine", ""),
        ("6410", "Songkhla", Some("Hatyai Wittayalai"), "Engineering", "2022-08-08 08:08:08"),
    ];

    rows.iter()
        .map(|(id, province, school, faculty, registered)| {
            let mut record = StudentRecord::new(*id)
                .with_province(*province)
                .with_faculty(*faculty);
            if let Some(school) = school {
                record = record.with_school(*school);
            }
            if !registered.is_empty() {
                record = record.with_registered_at(*registered);
            }
            record
        })
        .collect()
}

pub fn sample_table() -> BaseTable {
    BaseTable::new(sample_records()).expect("sample ids are unique")
}

/// The sample records as CSV text with the legacy header
pub fn sample_csv() -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');
    for record in sample_records() {
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            record.student_id,
            record.province.unwrap_or_default(),
            record.school.unwrap_or_default(),
            record.faculty.unwrap_or_default(),
            record.registered_at.unwrap_or_default(),
        ));
    }
    csv
}

/// A temporary directory holding `students.csv`
pub struct CsvFixture {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl CsvFixture {
    pub fn new(content: &str) -> Result<Self> {
        let dir = TempDir::new()?;
        let path = dir.path().join("students.csv");
        fs::write(&path, content)?;
        Ok(Self { dir, path })
    }

    pub fn sample() -> Result<Self> {
        Self::new(&sample_csv())
    }
}
