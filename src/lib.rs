//! # Campus Insights
//!
//! A read-only student enrollment dashboard. The student table is fetched once per session,
//! and every view is a small chain of aggregations over it (missing-value reports, group
//! counts, top-N rankings, shares with a collapsed long tail, registrations per year).
//!
//! ## Usage
//!
//! ```bash
//! campus-insights serve [--host H] [--port P]
//! campus-insights --csv students.csv view province-summary --format markdown
//! ```
//!
//! ## Modules
//!
//! - `analytics` - Pure table transforms: grouping, ranking, shares, year extraction
//! - `config` - Layered configuration (defaults, TOML file, environment)
//! - `error` - Application error type and error code registry
//! - `model` - Student records, base/derived tables and summary tables
//! - `render` - HTML pages, SVG charts and JSON/CSV/Markdown exports
//! - `server` - axum HTTP dashboard
//! - `session` - Per-session base table and memoized view pages
//! - `storage` - Acquisition of the student table from SQL databases or CSV exports
//! - `views` - The navigation entries and the transform chain behind each
pub mod analytics;
pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod server;
pub mod session;
pub mod storage;
pub mod views;

pub use error::{DashboardError, ErrorCode, Result};
pub use session::Session;
pub use views::View;
