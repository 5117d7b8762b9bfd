//! Navigation surface: the seven dashboard views
//!
//! Each [`View`] maps to one transform chain over the base table, producing a [`Page`]
//! of sections that the render layer turns into HTML, SVG or exports.

pub mod builder;
pub mod page;

pub use builder::build_page;
pub use page::{ChartKind, ChartSpec, Page, Section};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;

/// Navigation entries, in sidebar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum View {
    BasicStatistics,
    ProvinceSummary,
    TopProvincesAndFaculties,
    FacultySummary,
    ProvinceAndFacultyDistribution,
    ProvinceFacultyAndSchoolDistribution,
    StudentRegistrationDate,
}

impl View {
    pub const ALL: [View; 7] = [
        View::BasicStatistics,
        View::ProvinceSummary,
        View::TopProvincesAndFaculties,
        View::FacultySummary,
        View::ProvinceAndFacultyDistribution,
        View::ProvinceFacultyAndSchoolDistribution,
        View::StudentRegistrationDate,
    ];

    /// URL-safe identifier
    pub fn slug(self) -> &'static str {
        match self {
            Self::BasicStatistics => "basic-statistics",
            Self::ProvinceSummary => "province-summary",
            Self::TopProvincesAndFaculties => "top-provinces-and-faculties",
            Self::FacultySummary => "faculty-summary",
            Self::ProvinceAndFacultyDistribution => "province-and-faculty-distribution",
            Self::ProvinceFacultyAndSchoolDistribution => {
                "province-faculty-and-school-distribution"
            }
            Self::StudentRegistrationDate => "student-registration-date",
        }
    }

    /// Sidebar label
    pub fn title(self) -> &'static str {
        match self {
            Self::BasicStatistics => "Basic Statistics",
            Self::ProvinceSummary => "Province Summary",
            Self::TopProvincesAndFaculties => "Top Provinces and Faculties",
            Self::FacultySummary => "Faculty Summary",
            Self::ProvinceAndFacultyDistribution => "Province and Faculty Distribution",
            Self::ProvinceFacultyAndSchoolDistribution => {
                "Province, Faculty, and School Distribution"
            }
            Self::StudentRegistrationDate => "Student Registration Date",
        }
    }

    fn variant_name(self) -> &'static str {
        match self {
            Self::BasicStatistics => "BasicStatistics",
            Self::ProvinceSummary => "ProvinceSummary",
            Self::TopProvincesAndFaculties => "TopProvincesAndFaculties",
            Self::FacultySummary => "FacultySummary",
            Self::ProvinceAndFacultyDistribution => "ProvinceAndFacultyDistribution",
            Self::ProvinceFacultyAndSchoolDistribution => "ProvinceFacultyAndSchoolDistribution",
            Self::StudentRegistrationDate => "StudentRegistrationDate",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for View {
    type Err = DashboardError;

    /// Accepts the slug, the variant name or the sidebar title, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|v| {
                v.slug().eq_ignore_ascii_case(wanted)
                    || v.variant_name().eq_ignore_ascii_case(wanted)
                    || v.title().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| DashboardError::unknown_view(wanted))
    }
}

/// Tunables shared by the views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    /// Rows kept by the "top" charts
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Share below which provinces collapse into "Other" on the pie chart
    #[serde(default = "default_other_threshold_pct")]
    pub other_threshold_pct: f64,

    /// Head and tail size of the table preview
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            other_threshold_pct: default_other_threshold_pct(),
            preview_rows: default_preview_rows(),
        }
    }
}

fn default_top_n() -> usize {
    5
}

fn default_other_threshold_pct() -> f64 {
    3.0
}

fn default_preview_rows() -> usize {
    7
}

impl ViewSettings {
    /// Validation messages, empty when the settings are usable
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.top_n == 0 {
            problems.push("views.top_n must be at least 1".to_string());
        }
        if self.preview_rows == 0 {
            problems.push("views.preview_rows must be at least 1".to_string());
        }
        if !(0.0..=100.0).contains(&self.other_threshold_pct) {
            problems.push(format!(
                "views.other_threshold_pct {} must be between 0 and 100",
                self.other_threshold_pct
            ));
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_view_names() {
        assert_eq!(
            "province-summary".parse::<View>().unwrap(),
            View::ProvinceSummary
        );
        assert_eq!(
            "StudentRegistrationDate".parse::<View>().unwrap(),
            View::StudentRegistrationDate
        );
        assert_eq!(
            "Province, Faculty, and School Distribution".parse::<View>().unwrap(),
            View::ProvinceFacultyAndSchoolDistribution
        );
    }

    #[test]
    fn test_unknown_view() {
        let err = "enrollment-forecast".parse::<View>().unwrap_err();
        assert_eq!(err.code(), ErrorCode::VIEW_UNKNOWN);
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_slugs_round_trip() {
        for view in View::ALL {
            assert_eq!(view.slug().parse::<View>().unwrap(), view);
        }
    }

    #[test]
    fn test_settings_problems() {
        assert!(ViewSettings::default().problems().is_empty());
        let settings = ViewSettings {
            top_n: 0,
            other_threshold_pct: f64::NAN,
            preview_rows: 0,
        };
        assert_eq!(settings.problems().len(), 3);
    }
}
