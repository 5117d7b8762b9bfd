//! Addressable columns and group-key cells

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;

/// Label of the synthetic row produced by long-tail collapsing
pub const OTHER_LABEL: &str = "Other";

/// A column of the student table, or a column derived from it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    StudentId,
    Province,
    School,
    Faculty,
    RegisteredAt,
    /// Calendar year derived from the registration timestamp
    Year,
}

impl Field {
    /// Fields carried by every row of the student table
    pub const BASE: [Field; 5] = [
        Field::StudentId,
        Field::Province,
        Field::School,
        Field::Faculty,
        Field::RegisteredAt,
    ];

    /// Every addressable field, derived ones included
    pub const ALL: [Field; 6] = [
        Field::StudentId,
        Field::Province,
        Field::School,
        Field::Faculty,
        Field::RegisteredAt,
        Field::Year,
    ];

    /// Canonical snake_case name
    pub fn name(self) -> &'static str {
        match self {
            Self::StudentId => "student_id",
            Self::Province => "province",
            Self::School => "school",
            Self::Faculty => "faculty",
            Self::RegisteredAt => "registered_at",
            Self::Year => "year",
        }
    }

    /// Column name used by the original `student_list` table
    pub fn legacy_column(self) -> Option<&'static str> {
        match self {
            Self::StudentId => Some("stu_id"),
            Self::Province => Some("names"),
            Self::School => Some("school_eng"),
            Self::Faculty => Some("fac_eng"),
            Self::RegisteredAt => Some("ste_reg"),
            Self::Year => None,
        }
    }

    /// Human-readable axis label
    pub fn label(self) -> &'static str {
        match self {
            Self::StudentId => "Student ID",
            Self::Province => "Province",
            Self::School => "School",
            Self::Faculty => "Faculty",
            Self::RegisteredAt => "Registration Date",
            Self::Year => "Year",
        }
    }

    /// Whether values of this field are timestamps
    pub fn is_timestamp(self) -> bool {
        matches!(self, Self::RegisteredAt)
    }

    /// Whether this field only exists on derived tables
    pub fn is_derived(self) -> bool {
        matches!(self, Self::Year)
    }

    fn accepted_names() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Self::ALL.iter().map(|f| f.name()).collect();
        names.extend(Self::ALL.iter().filter_map(|f| f.legacy_column()));
        names
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name() == wanted || f.legacy_column() == Some(wanted.as_str()))
            .ok_or_else(|| DashboardError::unknown_field(s, &Self::accepted_names()))
    }
}

/// One cell of a group-key tuple
///
/// Variant order defines key ordering: missing values first, then years, then text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum KeyValue {
    Null,
    Year(i32),
    Text(String),
}

impl KeyValue {
    pub fn from_text(value: Option<&str>) -> Self {
        match value {
            Some(v) => Self::Text(v.to_string()),
            None => Self::Null,
        }
    }

    /// The "Other" bucket label
    pub fn other() -> Self {
        Self::Text(OTHER_LABEL.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("(missing)"),
            Self::Year(y) => write!(f, "{}", y),
            Self::Text(t) => f.write_str(t),
        }
    }
}
