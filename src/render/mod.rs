//! Presentation of computed pages
//!
//! Pages are rendered as HTML for the browser, as standalone SVG charts, or exported
//! to JSON, CSV and Markdown for the command line and the API.

pub mod export;
pub mod html;
pub mod svg;

pub use export::{export_page, ExportFormat, PageExporter};
pub use html::HtmlRenderer;
pub use svg::render_chart;
