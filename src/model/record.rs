//! Student rows as loaded from the backing store

use serde::{Deserialize, Serialize};

use super::field::Field;

/// One row of the student table
///
/// Only the identifier is mandatory. The registration timestamp is kept verbatim so that
/// rows with unparseable dates can be reported instead of silently coerced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: String,
    pub province: Option<String>,
    pub school: Option<String>,
    pub faculty: Option<String>,
    pub registered_at: Option<String>,
}

impl StudentRecord {
    pub fn new(student_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            province: None,
            school: None,
            faculty: None,
            registered_at: None,
        }
    }

    pub fn with_province(mut self, province: impl Into<String>) -> Self {
        self.province = Some(province.into());
        self
    }

    pub fn with_school(mut self, school: impl Into<String>) -> Self {
        self.school = Some(school.into());
        self
    }

    pub fn with_faculty(mut self, faculty: impl Into<String>) -> Self {
        self.faculty = Some(faculty.into());
        self
    }

    pub fn with_registered_at(mut self, registered_at: impl Into<String>) -> Self {
        self.registered_at = Some(registered_at.into());
        self
    }

    /// Textual value of a stored field; derived fields have none
    pub fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::StudentId => Some(self.student_id.as_str()),
            Field::Province => self.province.as_deref(),
            Field::School => self.school.as_deref(),
            Field::Faculty => self.faculty.as_deref(),
            Field::RegisteredAt => self.registered_at.as_deref(),
            Field::Year => None,
        }
    }
}
