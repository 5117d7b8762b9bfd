//! Page exports: JSON, CSV and Markdown

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DashboardError, ErrorCode, Result};
use crate::model::{Field, StudentRecord, SummaryTable};
use crate::views::page::VALUE_COLUMN;
use crate::views::{ChartSpec, Page, Section};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    pub fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Markdown => "markdown",
        }
    }

    pub fn exporter(self) -> Box<dyn PageExporter> {
        match self {
            Self::Json => Box::new(JsonExporter),
            Self::Csv => Box::new(CsvExporter),
            Self::Markdown => Box::new(MarkdownExporter),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(DashboardError::render_with_code(
                ErrorCode::RENDER_UNSUPPORTED_FORMAT,
                format!(
                    "unsupported export format '{}' (expected json, csv or markdown)",
                    other
                ),
            )),
        }
    }
}

pub trait PageExporter: Send + Sync {
    fn export(&self, page: &Page) -> Result<Vec<u8>>;
    fn content_type(&self) -> &'static str;
}

pub struct JsonExporter;

impl PageExporter for JsonExporter {
    fn export(&self, page: &Page) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(page)?)
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}

/// Flattens the page into one CSV table
///
/// Pages with charts produce one row per chart row, with a column per key field used by any
/// chart. Pages without charts export their preview rows.
pub struct CsvExporter;

impl CsvExporter {
    fn write_charts(&self, page: &Page) -> Result<Vec<u8>> {
        let charts: Vec<&ChartSpec> = page.charts().collect();
        let mut fields: Vec<Field> = charts
            .iter()
            .flat_map(|c| c.table.key_fields.iter().copied())
            .collect();
        fields.sort();
        fields.dedup();

        let mut writer = csv::Writer::from_writer(Vec::new());
        let mut header = vec!["chart".to_string()];
        header.extend(fields.iter().map(|f| f.name().to_string()));
        header.push(VALUE_COLUMN.to_string());
        header.push("percentage".to_string());
        writer.write_record(&header).map_err(csv_error)?;

        for chart in charts {
            for row in &chart.table.rows {
                let mut record = vec![chart.title.clone()];
                for field in &fields {
                    let value = chart
                        .table
                        .column_of(*field)
                        .and_then(|i| row.keys.get(i))
                        .filter(|k| !k.is_null())
                        .map(|k| k.to_string())
                        .unwrap_or_default();
                    record.push(value);
                }
                record.push(row.count.to_string());
                record.push(
                    row.percentage
                        .map(|p| format!("{:.4}", p))
                        .unwrap_or_default(),
                );
                writer.write_record(&record).map_err(csv_error)?;
            }
        }

        writer.into_inner().map_err(|e| csv_error(e.into_error()))
    }

    fn write_records(&self, rows: &[StudentRecord]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in rows {
            writer.serialize(row).map_err(csv_error)?;
        }
        if rows.is_empty() {
            writer
                .write_record(Field::BASE.iter().map(|f| f.name()))
                .map_err(csv_error)?;
        }
        writer.into_inner().map_err(|e| csv_error(e.into_error()))
    }
}

fn csv_error(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> DashboardError {
    let err = err.into();
    DashboardError::render_with_code(ErrorCode::RENDER_SERIALIZATION, err.to_string())
        .with_source(err)
}

impl PageExporter for CsvExporter {
    fn export(&self, page: &Page) -> Result<Vec<u8>> {
        if page.charts().next().is_some() {
            return self.write_charts(page);
        }
        let preview = page.sections.iter().find_map(|s| match s {
            Section::Preview { rows, .. } => Some(rows.as_slice()),
            _ => None,
        });
        self.write_records(preview.unwrap_or_default())
    }

    fn content_type(&self) -> &'static str {
        "text/csv; charset=utf-8"
    }
}

pub struct MarkdownExporter;

impl MarkdownExporter {
    fn summary_table(markdown: &mut String, table: &SummaryTable) {
        let with_pct = table.has_percentages();

        markdown.push('|');
        for field in &table.key_fields {
            markdown.push_str(&format!(" {} |", field.label()));
        }
        markdown.push_str(&format!(" {} |", VALUE_COLUMN));
        if with_pct {
            markdown.push_str(" percentage |");
        }
        markdown.push_str("\n|");
        for _ in 0..table.key_fields.len() + 1 + usize::from(with_pct) {
            markdown.push_str(" --- |");
        }
        markdown.push('\n');

        for row in &table.rows {
            markdown.push('|');
            for key in &row.keys {
                markdown.push_str(&format!(" {} |", escape_cell(&key.to_string())));
            }
            markdown.push_str(&format!(" {} |", row.count));
            if let Some(pct) = row.percentage {
                markdown.push_str(&format!(" {:.1}% |", pct));
            }
            markdown.push('\n');
        }
        markdown.push('\n');
    }

    fn ascii_bars(markdown: &mut String, table: &SummaryTable) {
        let max = table.rows.iter().map(|r| r.count).max().unwrap_or(0);
        if max == 0 {
            return;
        }
        let scale = 30.0 / max as f64;
        let labels: Vec<String> = table.rows.iter().map(|r| r.label()).collect();
        let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        markdown.push_str("```text\n");
        for (label, row) in labels.iter().zip(&table.rows) {
            let bar = "█".repeat((row.count as f64 * scale).round() as usize);
            markdown.push_str(&format!(
                "{:<width$} {} {}\n",
                label,
                bar,
                row.count,
                width = width
            ));
        }
        markdown.push_str("```\n\n");
    }
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

impl PageExporter for MarkdownExporter {
    fn export(&self, page: &Page) -> Result<Vec<u8>> {
        let mut markdown = String::new();
        markdown.push_str(&format!("# {}\n\n", page.title));

        for section in &page.sections {
            match section {
                Section::Metric { title, value } => {
                    markdown.push_str(&format!("## {}\n\n**{}**\n\n", title, value));
                }
                Section::IdList { title, ids } => {
                    markdown.push_str(&format!("## {}\n\n{}\n\n", title, ids.join(", ")));
                }
                Section::Preview { title, rows } => {
                    markdown.push_str(&format!("## {}\n\n|", title));
                    for field in Field::BASE {
                        markdown.push_str(&format!(" {} |", field.name()));
                    }
                    markdown.push_str("\n|");
                    for _ in Field::BASE {
                        markdown.push_str(" --- |");
                    }
                    markdown.push('\n');
                    for row in rows {
                        markdown.push('|');
                        for field in Field::BASE {
                            let value = row.text(field).unwrap_or("(missing)");
                            markdown.push_str(&format!(" {} |", escape_cell(value)));
                        }
                        markdown.push('\n');
                    }
                    markdown.push('\n');
                }
                Section::Chart(chart) => {
                    markdown.push_str(&format!("## {}\n\n", chart.title));
                    Self::summary_table(&mut markdown, &chart.table);
                    if chart.color.is_none() {
                        Self::ascii_bars(&mut markdown, &chart.table);
                    }
                }
                Section::Note { title, text } => {
                    markdown.push_str(&format!("## {}\n\n> {}\n\n", title, text));
                }
            }
        }

        Ok(markdown.into_bytes())
    }

    fn content_type(&self) -> &'static str {
        "text/markdown; charset=utf-8"
    }
}

/// Export `page` as UTF-8 text
pub fn export_page(page: &Page, format: ExportFormat) -> Result<String> {
    let bytes = format.exporter().export(page)?;
    String::from_utf8(bytes).map_err(|e| {
        DashboardError::render_with_code(ErrorCode::RENDER_SERIALIZATION, e.to_string())
    })
}
