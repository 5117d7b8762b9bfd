//! HTML pages with sidebar navigation

use serde::Serialize;
use tera::{Context, Tera};

use super::svg::render_chart;
use crate::error::Result;
use crate::model::{Field, StudentRecord};
use crate::views::{Page, Section, View};

#[derive(Debug, Serialize)]
struct NavEntry {
    slug: &'static str,
    title: &'static str,
    active: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum SectionView<'a> {
    Metric {
        title: &'a str,
        value: u64,
    },
    IdList {
        title: &'a str,
        ids: String,
    },
    Preview {
        title: &'a str,
        columns: Vec<&'static str>,
        rows: Vec<Vec<String>>,
    },
    Chart {
        title: &'a str,
        index: usize,
        svg: String,
    },
    Note {
        title: &'a str,
        text: &'a str,
    },
}

fn preview_rows(rows: &[StudentRecord]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| {
            Field::BASE
                .iter()
                .map(|f| row.text(*f).unwrap_or("(missing)").to_string())
                .collect()
        })
        .collect()
}

fn navigation(active: Option<View>) -> Vec<NavEntry> {
    View::ALL
        .iter()
        .map(|v| NavEntry {
            slug: v.slug(),
            title: v.title(),
            active: Some(*v) == active,
        })
        .collect()
}

/// Renders pages through embedded Tera templates
pub struct HtmlRenderer {
    templates: Tera,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self> {
        let mut templates = Tera::default();
        templates.add_raw_templates(vec![
            ("base.html", BASE_TEMPLATE),
            ("page.html", PAGE_TEMPLATE),
            ("error.html", ERROR_TEMPLATE),
        ])?;
        Ok(Self { templates })
    }

    pub fn render_page(&self, page: &Page) -> Result<String> {
        let mut chart_index = 0;
        let sections: Vec<SectionView> = page
            .sections
            .iter()
            .map(|section| match section {
                Section::Metric { title, value } => SectionView::Metric {
                    title,
                    value: *value,
                },
                Section::IdList { title, ids } => SectionView::IdList {
                    title,
                    ids: ids.join(", "),
                },
                Section::Preview { title, rows } => SectionView::Preview {
                    title,
                    columns: Field::BASE.iter().map(|f| f.name()).collect(),
                    rows: preview_rows(rows),
                },
                Section::Chart(chart) => {
                    chart_index += 1;
                    SectionView::Chart {
                        title: &chart.title,
                        index: chart_index - 1,
                        svg: render_chart(chart),
                    }
                }
                Section::Note { title, text } => SectionView::Note { title, text },
            })
            .collect();

        let mut context = Context::new();
        context.insert("nav", &navigation(Some(page.view)));
        context.insert("title", &page.title);
        context.insert("slug", page.slug);
        context.insert("sections", &sections);
        Ok(self.templates.render("page.html", &context)?)
    }

    pub fn render_error(&self, title: &str, message: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("nav", &navigation(None));
        context.insert("title", title);
        context.insert("message", message);
        Ok(self.templates.render("error.html", &context)?)
    }
}

const BASE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }} · Campus Insights</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 0;
            display: flex;
            min-height: 100vh;
            color: #262730;
            background-color: #ffffff;
        }
        nav {
            width: 260px;
            flex-shrink: 0;
            background-color: #f0f2f6;
            padding: 24px 16px;
        }
        nav h2 { font-size: 1.1em; margin-top: 0; }
        nav a {
            display: block;
            padding: 6px 10px;
            margin-bottom: 2px;
            border-radius: 6px;
            color: inherit;
            text-decoration: none;
        }
        nav a.active { background-color: #ff4b4b; color: #ffffff; }
        main { flex-grow: 1; padding: 24px 40px; max-width: 1100px; }
        .metric { font-size: 2.2em; font-weight: 600; }
        .note { border-left: 4px solid #ffa15a; padding: 4px 12px; background-color: #fff8f0; }
        .error { border-left: 4px solid #ef553b; padding: 4px 12px; background-color: #fff0f0; }
        table { border-collapse: collapse; font-size: 0.9em; }
        th, td { border: 1px solid #e5e5e5; padding: 4px 10px; text-align: left; }
        th { background-color: #f7f7f9; }
        .chart svg { max-width: 100%; height: auto; }
        .chart-links { font-size: 0.85em; }
    </style>
</head>
<body>
    <nav>
        <h2>Student Menu</h2>
        {% for entry in nav %}
        <a href="/views/{{ entry.slug }}"{% if entry.active %} class="active"{% endif %}>{{ entry.title }}</a>
        {% endfor %}
    </nav>
    <main>
        {% block content %}{% endblock content %}
    </main>
</body>
</html>
"#;

const PAGE_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block content %}
<h1>{{ title }}</h1>
{% for section in sections %}
<section>
    <h2>{{ section.title }}</h2>
    {% if section.kind == "metric" %}
    <p class="metric">{{ section.value }}</p>
    {% elif section.kind == "id_list" %}
    <p>{{ section.ids }}</p>
    {% elif section.kind == "preview" %}
    <table>
        <thead><tr>{% for column in section.columns %}<th>{{ column }}</th>{% endfor %}</tr></thead>
        <tbody>
        {% for row in section.rows %}
            <tr>{% for cell in row %}<td>{{ cell }}</td>{% endfor %}</tr>
        {% endfor %}
        </tbody>
    </table>
    {% elif section.kind == "chart" %}
    <div class="chart">{{ section.svg | safe }}</div>
    <p class="chart-links"><a href="/api/views/{{ slug }}/charts/{{ section.index }}.svg">SVG</a></p>
    {% elif section.kind == "note" %}
    <p class="note">{{ section.text }}</p>
    {% endif %}
</section>
{% endfor %}
<p class="chart-links">
    Export:
    <a href="/api/views/{{ slug }}/export?format=csv">CSV</a> ·
    <a href="/api/views/{{ slug }}/export?format=json">JSON</a> ·
    <a href="/api/views/{{ slug }}/export?format=markdown">Markdown</a>
</p>
{% endblock content %}
"#;

const ERROR_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block content %}
<h1>{{ title }}</h1>
<p class="error">{{ message }}</p>
{% endblock content %}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SummaryTable;
    use crate::views::ChartSpec;

    fn page() -> Page {
        let mut page = Page::new(View::FacultySummary);
        page.push(Section::Metric {
            title: "Total Number of Students".into(),
            value: 42,
        });
        page.push(Section::Chart(ChartSpec::bar(
            "Faculties",
            SummaryTable::from_counts(Field::Faculty, [("Law & Politics", 3)]),
            Field::Faculty,
        )));
        page.push(Section::Preview {
            title: "Preview".into(),
            rows: vec![StudentRecord::new("<b>1</b>")],
        });
        page
    }

    #[test]
    fn test_page_has_sidebar_and_sections() {
        let html = HtmlRenderer::new().unwrap().render_page(&page()).unwrap();
        assert!(html.contains("<h2>Student Menu</h2>"));
        assert!(html.contains(r#"<a href="/views/faculty-summary" class="active">Faculty Summary</a>"#));
        assert!(html.contains(r#"<a href="/views/basic-statistics">Basic Statistics</a>"#));
        assert!(html.contains(r#"<p class="metric">42</p>"#));
        assert!(html.contains("/api/views/faculty-summary/charts/0.svg"));
    }

    #[test]
    fn test_svg_is_embedded_but_text_is_escaped() {
        let html = HtmlRenderer::new().unwrap().render_page(&page()).unwrap();
        assert!(html.contains("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(html.contains("Law &amp; Politics"));
        assert!(html.contains("&lt;b&gt;1&lt;&#x2F;b&gt;"));
        assert!(!html.contains("<b>1</b>"));
    }

    #[test]
    fn test_error_page() {
        let html = HtmlRenderer::new()
            .unwrap()
            .render_error("Unknown view", "no view named 'x'")
            .unwrap();
        assert!(html.contains("<h1>Unknown view</h1>"));
        assert!(html.contains("no view named &#x27;x&#x27;"));
        assert!(!html.contains("class=\"active\""));
    }
}
