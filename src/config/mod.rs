//! Dashboard configuration.
//!
//! `DashboardConfig` is the single entry point for all settings. Values are layered:
//!
//! 1. Hardcoded defaults (lowest priority)
//! 2. TOML file (`--config`, else `./campus-insights.toml` when present)
//! 3. Environment variables (`CAMPUS_*` prefix) (highest priority)
//!
//! Validation accumulates every problem so that all of them are reported at once.
//!
//! # Example
//!
//! ```ignore
//! use campus_insights::config::{load_config_with, MockEnv};
//!
//! let env = MockEnv::new()
//!     .with_file("dash.toml", "[database]\ntable = \"students\"")
//!     .with_env("CAMPUS_LOG_LEVEL", "debug");
//!
//! let config = load_config_with(&env, Some("dash.toml".as_ref())).unwrap();
//! assert_eq!(config.database.table, "students");
//! assert_eq!(config.log_level, "debug");
//! ```

pub mod loader;

#[cfg(test)]
mod tests;

pub use loader::{load_config, load_config_with, ConfigEnv, MockEnv, RealEnv, DEFAULT_CONFIG_FILE};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::{DashboardError, ErrorCode, Result};
use crate::model::Field;
use crate::views::ViewSettings;

/// Valid log levels for configuration validation.
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Placeholder shown instead of secrets.
pub const REDACTED: &str = "***";

/// Plain SQL identifier, optionally schema-qualified.
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$").expect("Valid regex pattern")
});

/// Check whether `name` can be spliced into a query as a table or column name.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Logging level used when no `-v` flag is given.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Where the student table comes from.
    #[serde(default)]
    pub source: SourceConfig,

    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Tunables of the individual views.
    #[serde(default)]
    pub views: ViewSettings,
}

/// Kinds of student table sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Relational database reached through `[database]` (default).
    #[default]
    Database,
    /// CSV export of the table.
    Csv,
}

/// Source selection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,

    /// Path of the CSV export, required when `kind = "csv"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_path: Option<PathBuf>,
}

/// Database connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL (`mysql://`, `postgres://` or `sqlite://`).
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Password spliced into the URL, kept apart so the URL can be shared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Table holding one row per student.
    #[serde(default = "default_table")]
    pub table: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long to wait for a connection, e.g. `"10s"`.
    #[serde(default = "default_connect_timeout", with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// Physical column names of the logical fields.
    #[serde(default)]
    pub columns: ColumnMapping,
}

/// Logical field to physical column mapping.
///
/// Defaults follow the column names of the `student_list` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    #[serde(default = "default_student_id_column")]
    pub student_id: String,
    #[serde(default = "default_province_column")]
    pub province: String,
    #[serde(default = "default_school_column")]
    pub school: String,
    #[serde(default = "default_faculty_column")]
    pub faculty: String,
    #[serde(default = "default_registered_at_column")]
    pub registered_at: String,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            source: SourceConfig::default(),
            database: DatabaseConfig::default(),
            server: ServerConfig::default(),
            views: ViewSettings::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            password: None,
            table: default_table(),
            max_connections: default_max_connections(),
            connect_timeout: default_connect_timeout(),
            columns: ColumnMapping::default(),
        }
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            student_id: default_student_id_column(),
            province: default_province_column(),
            school: default_school_column(),
            faculty: default_faculty_column(),
            registered_at: default_registered_at_column(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// Default value functions for serde
fn default_log_level() -> String {
    "info".to_string()
}

fn default_database_url() -> String {
    "mysql://root@localhost:3306/student_list".to_string()
}

fn default_table() -> String {
    "student_list".to_string()
}

fn default_max_connections() -> u32 {
    2
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_student_id_column() -> String {
    "stu_id".to_string()
}

fn default_province_column() -> String {
    "names".to_string()
}

fn default_school_column() -> String {
    "school_eng".to_string()
}

fn default_faculty_column() -> String {
    "fac_eng".to_string()
}

fn default_registered_at_column() -> String {
    "ste_reg".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

impl ColumnMapping {
    /// Every stored field with its physical column, in table order.
    pub fn pairs(&self) -> [(Field, &str); 5] {
        [
            (Field::StudentId, self.student_id.as_str()),
            (Field::Province, self.province.as_str()),
            (Field::School, self.school.as_str()),
            (Field::Faculty, self.faculty.as_str()),
            (Field::RegisteredAt, self.registered_at.as_str()),
        ]
    }
}

impl DatabaseConfig {
    /// The URL handed to the driver, with the password spliced in.
    pub fn connection_url(&self) -> Result<String> {
        let Some(password) = self.password.as_deref() else {
            return Ok(self.url.clone());
        };

        let mut url = Url::parse(&self.url).map_err(|e| {
            DashboardError::config_with_code(
                ErrorCode::CONFIG_VALIDATION_FAILED,
                format!("database.url is not a valid URL: {}", e),
            )
        })?;
        url.set_password(Some(password)).map_err(|_| {
            DashboardError::config_with_code(
                ErrorCode::CONFIG_VALIDATION_FAILED,
                "database.url cannot carry a password",
            )
        })?;
        Ok(url.to_string())
    }

    /// A copy safe to print: secrets replaced by a placeholder.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.password.is_some() {
            copy.password = Some(REDACTED.to_string());
        }
        if let Ok(mut url) = Url::parse(&copy.url) {
            if url.password().is_some() && url.set_password(Some(REDACTED)).is_ok() {
                copy.url = url.to_string();
            }
        }
        copy
    }
}

impl ServerConfig {
    /// `host:port` pair for the listener.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DashboardConfig {
    /// A copy safe to print.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.database = self.database.redacted();
        copy
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            DashboardError::render_with_code(ErrorCode::RENDER_SERIALIZATION, e.to_string())
        })
    }

    /// Check every setting, reporting all problems together.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            errors.push(format!(
                "log_level '{}' must be one of: {}",
                self.log_level,
                VALID_LOG_LEVELS.join(", ")
            ));
        }

        match self.source.kind {
            SourceKind::Csv if self.source.csv_path.is_none() => {
                errors.push("source.csv_path is required when source.kind = \"csv\"".to_string());
            }
            SourceKind::Database if self.database.url.trim().is_empty() => {
                errors.push("database.url cannot be empty".to_string());
            }
            _ => {}
        }

        if self.database.max_connections == 0 {
            errors.push("database.max_connections must be at least 1".to_string());
        }

        if self.database.connect_timeout.is_zero() {
            errors.push("database.connect_timeout must be greater than zero".to_string());
        }

        if !is_identifier(&self.database.table) {
            errors.push(format!(
                "database.table '{}' is not a plain SQL identifier",
                self.database.table
            ));
        }

        for (field, column) in self.database.columns.pairs() {
            if !is_identifier(column) || column.contains('.') {
                errors.push(format!(
                    "database.columns.{} '{}' is not a plain SQL identifier",
                    field, column
                ));
            }
        }

        if self.server.host.trim().is_empty() {
            errors.push("server.host cannot be empty".to_string());
        }

        errors.extend(self.views.problems());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DashboardError::config_with_code(
                ErrorCode::CONFIG_VALIDATION_FAILED,
                errors.join("; "),
            ))
        }
    }
}
