//! Transform chains behind each view

use tracing::debug;

use super::page::{ChartSpec, Page, Section};
use super::{View, ViewSettings};
use crate::analytics::{
    add_percentage, collapse_minor, find_missing, group_count, order_by_keys, preview, rank_desc,
    year_from_timestamp,
};
use crate::error::Result;
use crate::model::{BaseTable, Field};

/// Compute the page of `view` from the session's base table
pub fn build_page(view: View, table: &BaseTable, settings: &ViewSettings) -> Result<Page> {
    debug!("Computing view {} over {} rows", view, table.len());
    let mut page = Page::new(view);

    match view {
        View::BasicStatistics => {
            let missing = find_missing(table, Field::School)?;
            if !missing.is_empty() {
                page.push(Section::IdList {
                    title: "Students with Missing School Information".to_string(),
                    ids: missing,
                });
            }
            page.push(Section::Metric {
                title: "Total Number of Students".to_string(),
                value: table.len() as u64,
            });
            page.push(Section::Preview {
                title: "Preview of Student Table".to_string(),
                rows: preview(table, settings.preview_rows),
            });
        }

        View::ProvinceSummary => {
            let ranked = rank_desc(&group_count(table, &[Field::Province])?, None);
            let shares = collapse_minor(&add_percentage(&ranked), settings.other_threshold_pct);
            page.push(Section::Chart(ChartSpec::bar(
                "Total Number of Students in Each Province",
                ranked,
                Field::Province,
            )));
            page.push(Section::Chart(ChartSpec::pie(
                "Proportion of Students in Each Province",
                shares,
                Field::Province,
            )));
        }

        View::TopProvincesAndFaculties => {
            for field in [Field::Province, Field::Faculty] {
                page.push(top_chart(table, field, settings.top_n)?);
            }
        }

        View::FacultySummary => {
            let counts = order_by_keys(&group_count(table, &[Field::Faculty])?);
            page.push(Section::Chart(ChartSpec::bar(
                "Total Number of Students in Each Faculty",
                counts,
                Field::Faculty,
            )));
            page.push(top_chart(table, Field::Faculty, settings.top_n)?);
        }

        View::ProvinceAndFacultyDistribution => {
            let counts = order_by_keys(&group_count(table, &[Field::Province, Field::Faculty])?);
            page.push(Section::Chart(
                ChartSpec::bar(
                    "Total Number of Students from Each Province Enrolled in Each Faculty",
                    counts,
                    Field::Faculty,
                )
                .stacked_by(Field::Province),
            ));
        }

        View::ProvinceFacultyAndSchoolDistribution => {
            let counts = order_by_keys(&group_count(
                table,
                &[Field::Province, Field::Faculty, Field::School],
            )?);
            page.push(Section::Chart(
                ChartSpec::bar(
                    "Total Number of Students from Each Province Enrolled in Each Faculty by School",
                    counts,
                    Field::Faculty,
                )
                .stacked_by(Field::Province),
            ));
        }

        View::StudentRegistrationDate => {
            let years = year_from_timestamp(table, Field::RegisteredAt)?;
            let yearly = order_by_keys(&group_count(&years, &[Field::Year])?);
            let shares = add_percentage(&yearly);

            page.push(Section::Chart(
                ChartSpec::bar("Total Number of Students in Each Year", yearly, Field::Year)
                    .with_values(),
            ));
            page.push(Section::Chart(ChartSpec::pie(
                "Proportion of Students in Each Year",
                shares,
                Field::Year,
            )));

            if !years.rejected().is_empty() {
                page.push(Section::Note {
                    title: "Excluded Registrations".to_string(),
                    text: format!(
                        "{} of {} students have a missing or unreadable registration date and are not counted above.",
                        years.rejected().len(),
                        table.len()
                    ),
                });
            }
        }
    }

    Ok(page)
}

fn top_chart(table: &BaseTable, field: Field, n: usize) -> Result<Section> {
    let top = rank_desc(&group_count(table, &[field])?, Some(n));
    let noun = match field {
        Field::Faculty => "Faculties",
        _ => "Provinces",
    };
    Ok(Section::Chart(ChartSpec::bar(
        format!("Top {} {} with the Highest Number of Students", n, noun),
        top,
        field,
    )))
}
