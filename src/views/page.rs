//! Computed page model handed to the render layer

use serde::Serialize;

use super::View;
use crate::model::{Field, StudentRecord, SummaryTable};

/// Name of the value axis of every chart
pub const VALUE_COLUMN: &str = "total_students";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
}

/// A fully computed chart: its data plus axis bindings
///
/// Bars are placed along `x`; when `color` is set, bars sharing an `x` value are stacked
/// by that field. Pie sectors are labelled by `x`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub table: SummaryTable,
    pub x: Field,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Field>,
    pub show_values: bool,
}

impl ChartSpec {
    pub fn bar(title: impl Into<String>, table: SummaryTable, x: Field) -> Self {
        Self {
            kind: ChartKind::Bar,
            title: title.into(),
            table,
            x,
            color: None,
            show_values: false,
        }
    }

    pub fn pie(title: impl Into<String>, table: SummaryTable, x: Field) -> Self {
        Self {
            kind: ChartKind::Pie,
            title: title.into(),
            table,
            x,
            color: None,
            show_values: false,
        }
    }

    pub fn stacked_by(mut self, color: Field) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_values(mut self) -> Self {
        self.show_values = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Section {
    Metric { title: String, value: u64 },
    IdList { title: String, ids: Vec<String> },
    Preview { title: String, rows: Vec<StudentRecord> },
    Chart(ChartSpec),
    Note { title: String, text: String },
}

/// Everything one view shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub view: View,
    pub slug: &'static str,
    pub title: String,
    pub sections: Vec<Section>,
}

impl Page {
    pub fn new(view: View) -> Self {
        Self {
            view,
            slug: view.slug(),
            title: view.title().to_string(),
            sections: Vec::new(),
        }
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Charts in display order
    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        self.sections.iter().filter_map(|s| match s {
            Section::Chart(chart) => Some(chart),
            _ => None,
        })
    }

    pub fn chart(&self, index: usize) -> Option<&ChartSpec> {
        self.charts().nth(index)
    }
}
