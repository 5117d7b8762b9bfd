//! Standalone SVG charts

use std::collections::HashMap;
use std::f64::consts::PI;

use crate::model::{KeyValue, SummaryTable};
use crate::views::{ChartKind, ChartSpec};

const WIDTH: f64 = 760.0;
const HEIGHT: f64 = 440.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 48.0;
const MARGIN_BOTTOM: f64 = 96.0;
const LEGEND_WIDTH: f64 = 200.0;
const LEGEND_ROW: f64 = 18.0;
const FONT: &str = "system-ui, sans-serif";

/// Categorical palette, reused cyclically
const PALETTE: &[&str] = &[
    "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3", "#ff6692", "#b6e880",
    "#ff97ff", "#fecb52",
];

fn color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render one chart as an SVG document
pub fn render_chart(chart: &ChartSpec) -> String {
    if chart.table.is_empty() || chart.table.total() == 0 {
        return no_data(&chart.title);
    }
    match (chart.kind, chart.color) {
        (ChartKind::Pie, _) => pie(chart),
        (ChartKind::Bar, Some(_)) => stacked_bar(chart),
        (ChartKind::Bar, None) => bar(chart),
    }
}

fn open(out: &mut String, width: f64, height: f64, title: &str) {
    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" font-family="{font}" role="img">"#,
        w = width,
        h = height,
        font = FONT,
    ));
    out.push('\n');
    out.push_str(&format!("<title>{}</title>\n", escape_xml(title)));
    out.push_str(&format!(
        r#"<text x="{}" y="28" font-size="16" font-weight="600">{}</text>"#,
        MARGIN_LEFT,
        escape_xml(title)
    ));
    out.push('\n');
}

fn no_data(title: &str) -> String {
    let mut out = String::new();
    open(&mut out, WIDTH, HEIGHT, title);
    out.push_str(&format!(
        r##"<text x="{}" y="{}" font-size="14" text-anchor="middle" fill="#666">No data</text>"##,
        WIDTH / 2.0,
        HEIGHT / 2.0
    ));
    out.push_str("\n</svg>\n");
    out
}

/// Key cell of `row` at `column`, the first key column when unset
fn cell(table: &SummaryTable, row: usize, column: Option<usize>) -> String {
    table.rows[row]
        .keys
        .get(column.unwrap_or(0))
        .map(KeyValue::to_string)
        .unwrap_or_default()
}

/// A round step so that roughly five gridlines cover `max`
fn tick_step(max: u64) -> u64 {
    let raw = (max as f64 / 5.0).max(1.0);
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * magnitude);
    step.max(1.0) as u64
}

struct Plot {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    max: u64,
}

impl Plot {
    fn new(width: f64, max: u64) -> Self {
        let step = tick_step(max);
        Self {
            left: MARGIN_LEFT,
            right: width - MARGIN_RIGHT,
            top: MARGIN_TOP,
            bottom: HEIGHT - MARGIN_BOTTOM,
            max: max.div_ceil(step).max(1) * step,
        }
    }

    fn y(&self, value: u64) -> f64 {
        self.bottom - (value as f64 / self.max as f64) * (self.bottom - self.top)
    }

    fn band(&self, count: usize) -> f64 {
        (self.right - self.left) / count.max(1) as f64
    }

    fn axes(&self, out: &mut String, x_labels: &[String], y_title: &str) {
        let step = tick_step(self.max);
        let mut value = 0;
        while value <= self.max {
            let y = self.y(value);
            out.push_str(&format!(
                r##"<line x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="#e5e5e5"/>"##,
                self.left, self.right
            ));
            out.push_str(&format!(
                r##"<text x="{}" y="{y}" font-size="11" text-anchor="end" dominant-baseline="middle" fill="#444">{value}</text>"##,
                self.left - 6.0
            ));
            out.push('\n');
            value += step;
        }

        let band = self.band(x_labels.len());
        let rotate = x_labels.len() > 6;
        for (i, label) in x_labels.iter().enumerate() {
            let x = self.left + band * (i as f64 + 0.5);
            let y = self.bottom + 16.0;
            if rotate {
                out.push_str(&format!(
                    r##"<text x="{x}" y="{y}" font-size="11" text-anchor="end" transform="rotate(-35 {x} {y})" fill="#444">{}</text>"##,
                    escape_xml(label)
                ));
            } else {
                out.push_str(&format!(
                    r##"<text x="{x}" y="{y}" font-size="11" text-anchor="middle" fill="#444">{}</text>"##,
                    escape_xml(label)
                ));
            }
            out.push('\n');
        }

        out.push_str(&format!(
            r##"<line x1="{l}" y1="{b}" x2="{r}" y2="{b}" stroke="#444"/>"##,
            l = self.left,
            r = self.right,
            b = self.bottom
        ));
        out.push_str(&format!(
            r##"<text x="16" y="{y}" font-size="12" text-anchor="middle" transform="rotate(-90 16 {y})" fill="#444">{}</text>"##,
            escape_xml(y_title),
            y = (self.top + self.bottom) / 2.0
        ));
        out.push('\n');
    }
}

/// Canvas height that fits the chart and a legend of `entries` rows
fn canvas_height(entries: usize) -> f64 {
    (MARGIN_TOP + LEGEND_ROW * entries as f64 + 16.0).max(HEIGHT)
}

fn legend(out: &mut String, x: f64, entries: &[(String, &'static str)]) {
    for (i, (label, fill)) in entries.iter().enumerate() {
        let y = MARGIN_TOP + LEGEND_ROW * i as f64;
        out.push_str(&format!(
            r#"<rect x="{x}" y="{}" width="12" height="12" fill="{fill}"/>"#,
            y - 10.0
        ));
        out.push_str(&format!(
            r##"<text x="{}" y="{y}" font-size="12" fill="#222">{}</text>"##,
            x + 18.0,
            escape_xml(label)
        ));
        out.push('\n');
    }
}

fn bar(chart: &ChartSpec) -> String {
    let table = &chart.table;
    let column = table.column_of(chart.x);
    let labels: Vec<String> = (0..table.len()).map(|i| cell(table, i, column)).collect();
    let max = table.rows.iter().map(|r| r.count).max().unwrap_or(0);

    let plot = Plot::new(WIDTH, max);
    let mut out = String::new();
    open(&mut out, WIDTH, HEIGHT, &chart.title);
    plot.axes(&mut out, &labels, crate::views::page::VALUE_COLUMN);

    let band = plot.band(labels.len());
    let width = band * 0.7;
    for (i, row) in table.rows.iter().enumerate() {
        let x = plot.left + band * i as f64 + (band - width) / 2.0;
        let y = plot.y(row.count);
        out.push_str(&format!(
            r#"<rect x="{x}" y="{y}" width="{width}" height="{}" fill="{}"><title>{}: {}</title></rect>"#,
            plot.bottom - y,
            color(0),
            escape_xml(&labels[i]),
            row.count
        ));
        if chart.show_values {
            out.push_str(&format!(
                r##"<text x="{}" y="{}" font-size="11" text-anchor="middle" fill="#222">{}</text>"##,
                x + width / 2.0,
                y - 4.0,
                row.count
            ));
        }
        out.push('\n');
    }

    out.push_str("</svg>\n");
    out
}

fn stacked_bar(chart: &ChartSpec) -> String {
    let table = &chart.table;
    let x_column = table.column_of(chart.x);
    let color_column = chart.color.and_then(|c| table.column_of(c));

    // Categories and series in order of first appearance
    let mut categories: Vec<String> = Vec::new();
    let mut series: Vec<String> = Vec::new();
    let mut values: HashMap<(usize, usize), u64> = HashMap::new();
    for i in 0..table.len() {
        let category = cell(table, i, x_column);
        let key = cell(table, i, color_column);
        let c = match categories.iter().position(|x| *x == category) {
            Some(c) => c,
            None => {
                categories.push(category);
                categories.len() - 1
            }
        };
        let s = match series.iter().position(|x| *x == key) {
            Some(s) => s,
            None => {
                series.push(key);
                series.len() - 1
            }
        };
        *values.entry((c, s)).or_insert(0) += table.rows[i].count;
    }

    let totals: Vec<u64> = (0..categories.len())
        .map(|c| (0..series.len()).filter_map(|s| values.get(&(c, s))).sum())
        .collect();
    let max = totals.iter().copied().max().unwrap_or(0);

    let width = WIDTH + LEGEND_WIDTH;
    let mut plot = Plot::new(width, max);
    plot.right -= LEGEND_WIDTH;
    let mut out = String::new();
    open(&mut out, width, canvas_height(series.len()), &chart.title);
    plot.axes(&mut out, &categories, crate::views::page::VALUE_COLUMN);

    let band = plot.band(categories.len());
    let bar_width = band * 0.7;
    for (c, category) in categories.iter().enumerate() {
        let x = plot.left + band * c as f64 + (band - bar_width) / 2.0;
        let mut base = 0;
        for (s, key) in series.iter().enumerate() {
            let Some(&value) = values.get(&(c, s)) else {
                continue;
            };
            let top = plot.y(base + value);
            out.push_str(&format!(
                r#"<rect x="{x}" y="{top}" width="{bar_width}" height="{}" fill="{}"><title>{} / {}: {}</title></rect>"#,
                plot.y(base) - top,
                color(s),
                escape_xml(category),
                escape_xml(key),
                value
            ));
            out.push('\n');
            base += value;
        }
    }

    let entries: Vec<(String, &'static str)> = series
        .iter()
        .enumerate()
        .map(|(s, key)| (key.clone(), color(s)))
        .collect();
    legend(&mut out, plot.right + 24.0, &entries);

    out.push_str("</svg>\n");
    out
}

fn pie(chart: &ChartSpec) -> String {
    let table = &chart.table;
    let column = table.column_of(chart.x);
    let total = table.total() as f64;

    let mut out = String::new();
    open(&mut out, WIDTH, canvas_height(table.len()), &chart.title);

    let radius = (HEIGHT - MARGIN_TOP - 40.0) / 2.0;
    let cx = MARGIN_LEFT + radius;
    let cy = MARGIN_TOP + 10.0 + radius;

    let mut entries = Vec::with_capacity(table.len());
    let mut start = -PI / 2.0;
    for (i, row) in table.rows.iter().enumerate() {
        let label = cell(table, i, column);
        let share = row
            .percentage
            .unwrap_or_else(|| row.count as f64 / total * 100.0);
        entries.push((format!("{} ({:.1}%)", label, share), color(i)));
        if row.count == 0 {
            continue;
        }

        let sweep = row.count as f64 / total * 2.0 * PI;
        if (sweep - 2.0 * PI).abs() < 1e-9 {
            out.push_str(&format!(
                r#"<circle cx="{cx}" cy="{cy}" r="{radius}" fill="{}"><title>{}</title></circle>"#,
                color(i),
                escape_xml(&label)
            ));
        } else {
            let end = start + sweep;
            let (x0, y0) = (cx + radius * start.cos(), cy + radius * start.sin());
            let (x1, y1) = (cx + radius * end.cos(), cy + radius * end.sin());
            let large = if sweep > PI { 1 } else { 0 };
            out.push_str(&format!(
                r#"<path d="M {cx} {cy} L {x0:.3} {y0:.3} A {radius} {radius} 0 {large} 1 {x1:.3} {y1:.3} Z" fill="{}" stroke="white" stroke-width="1"><title>{}: {} ({:.1}%)</title></path>"#,
                color(i),
                escape_xml(&label),
                row.count,
                share
            ));
        }
        out.push('\n');
        start += sweep;
    }

    legend(&mut out, cx + radius + 48.0, &entries);
    out.push_str("</svg>\n");
    out
}
