//! Layered configuration loading.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{DashboardConfig, SourceKind};
use crate::error::{DashboardError, ErrorCode, Result};

/// Configuration file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "campus-insights.toml";

/// Access to the process environment, abstracted for tests.
pub trait ConfigEnv {
    fn var(&self, key: &str) -> Option<String>;
    fn exists(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;
}

/// The real process environment and file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealEnv;

impl ConfigEnv for RealEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// An in-memory environment for tests.
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: HashMap<String, String>,
    files: HashMap<PathBuf, String>,
}

impl MockEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }
}

impl ConfigEnv for MockEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, path.display().to_string())
        })
    }
}

/// Load configuration from the real environment.
pub fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    load_config_with(&RealEnv, path)
}

/// Load configuration: defaults, then the TOML file, then `CAMPUS_*` variables.
///
/// An explicit `path` must exist; the default file is optional.
pub fn load_config_with<E: ConfigEnv>(env: &E, path: Option<&Path>) -> Result<DashboardConfig> {
    let mut config = match path {
        Some(path) => {
            if !env.exists(path) {
                return Err(DashboardError::config_with_code(
                    ErrorCode::CONFIG_NOT_FOUND,
                    format!("configuration file not found: {}", path.display()),
                ));
            }
            read_file(env, path)?
        }
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if env.exists(default) {
                read_file(env, default)?
            } else {
                debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                DashboardConfig::default()
            }
        }
    };

    apply_env_overrides(env, &mut config)?;
    config.validate()?;
    Ok(config)
}

fn read_file<E: ConfigEnv>(env: &E, path: &Path) -> Result<DashboardConfig> {
    debug!("Loading configuration from {}", path.display());
    let content = env.read_to_string(path).map_err(|e| {
        DashboardError::config_with_code(
            ErrorCode::CONFIG_NOT_FOUND,
            format!("cannot read {}", path.display()),
        )
        .with_source(e)
    })?;

    toml::from_str(&content).map_err(|e| {
        DashboardError::config_with_code(
            ErrorCode::CONFIG_PARSE_ERROR,
            format!("invalid TOML in {}: {}", path.display(), e.message()),
        )
        .with_source(e)
    })
}

fn apply_env_overrides<E: ConfigEnv>(env: &E, config: &mut DashboardConfig) -> Result<()> {
    if let Some(level) = env.var("CAMPUS_LOG_LEVEL") {
        config.log_level = level.to_lowercase();
    }
    if let Some(url) = env.var("CAMPUS_DATABASE_URL") {
        config.database.url = url;
    }
    if let Some(password) = env.var("CAMPUS_DATABASE_PASSWORD") {
        config.database.password = Some(password);
    }
    if let Some(table) = env.var("CAMPUS_DATABASE_TABLE") {
        config.database.table = table;
    }
    if let Some(host) = env.var("CAMPUS_SERVER_HOST") {
        config.server.host = host;
    }
    if let Some(port) = env.var("CAMPUS_SERVER_PORT") {
        config.server.port = port.trim().parse().map_err(|_| {
            DashboardError::config_with_code(
                ErrorCode::CONFIG_PARSE_ERROR,
                format!("CAMPUS_SERVER_PORT '{}' is not a valid port", port),
            )
        })?;
    }
    if let Some(path) = env.var("CAMPUS_CSV_PATH") {
        config.source.kind = SourceKind::Csv;
        config.source.csv_path = Some(PathBuf::from(path));
    }
    Ok(())
}
