use std::fmt::Display;
use thiserror::Error;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// The unified error type for Campus Insights
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Storage error: {message}")]
    Storage {
        code: u16,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] View error: {message}")]
    View {
        code: u16,
        message: String,
        view: Option<String>,
    },

    #[error("[E{code:04}] Render error: {message}")]
    Render {
        code: u16,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Server error: {message}")]
    Server {
        code: u16,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl DashboardError {
    /// Create a configuration error with specific code
    pub fn config_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create a storage error with specific code
    pub fn storage_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Storage {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create a view error with specific code and view name
    pub fn view_with_code(code: u16, message: impl Into<String>, view: Option<String>) -> Self {
        Self::View {
            code,
            message: message.into(),
            view,
        }
    }

    /// Create a render error with specific code
    pub fn render_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Render {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create a server error with specific code
    pub fn server_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Server {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// A field name that does not refer to any known column
    pub fn unknown_field(name: &str, expected: &[&str]) -> Self {
        Self::config_with_code(
            ErrorCode::CONFIG_UNKNOWN_FIELD,
            format!(
                "unknown field '{}' (expected one of: {})",
                name,
                expected.join(", ")
            ),
        )
    }

    /// A known field requested from a table that does not carry it
    pub fn field_not_available(field: impl Display, table: &str) -> Self {
        Self::config_with_code(
            ErrorCode::CONFIG_FIELD_NOT_AVAILABLE,
            format!("field '{}' is not available on the {}", field, table),
        )
    }

    /// An unknown navigation entry
    pub fn unknown_view(name: &str) -> Self {
        Self::view_with_code(
            ErrorCode::VIEW_UNKNOWN,
            format!("unknown view '{}'", name),
            Some(name.to_string()),
        )
    }

    /// Add a source error to this error
    pub fn with_source(mut self, source: impl Into<BoxedSource>) -> Self {
        match &mut self {
            Self::Config { source: src, .. }
            | Self::Storage { source: src, .. }
            | Self::Render { source: src, .. }
            | Self::Server { source: src, .. } => {
                *src = Some(source.into());
            }
            Self::View { .. } => {}
        }
        self
    }

    /// Add context to the error message
    pub fn with_context(mut self, context: impl Display) -> Self {
        match &mut self {
            Self::Config { message, .. }
            | Self::Storage { message, .. }
            | Self::View { message, .. }
            | Self::Render { message, .. }
            | Self::Server { message, .. } => {
                *message = format!("{}: {}", message, context);
            }
        }
        self
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. }
            | Self::Storage { code, .. }
            | Self::View { code, .. }
            | Self::Render { code, .. }
            | Self::Server { code, .. } => *code,
        }
    }

    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            Self::Storage { .. } => 3,
            Self::View { .. } => 4,
            Self::Render { .. } => 5,
            Self::Server { .. } => 6,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message, .. } => format!("Configuration problem: {}", message),
            Self::Storage { code, message, .. } => match *code {
                ErrorCode::STORAGE_CONNECTION => {
                    format!("Could not reach the student database: {}", message)
                }
                ErrorCode::STORAGE_SCHEMA => {
                    format!("The student table does not look as expected: {}", message)
                }
                _ => format!("Could not load student data: {}", message),
            },
            Self::View { message, view, .. } => match view {
                Some(v) => format!("View '{}': {}", v, message),
                None => format!("View error: {}", message),
            },
            Self::Render { message, .. } => format!("Render error: {}", message),
            Self::Server { message, .. } => format!("Server error: {}", message),
        }
    }

    /// Whether this is a configuration-kind error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Whether this error happened at the acquisition boundary
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}

impl From<tera::Error> for DashboardError {
    fn from(err: tera::Error) -> Self {
        Self::render_with_code(ErrorCode::RENDER_TEMPLATE, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::render_with_code(ErrorCode::RENDER_SERIALIZATION, err.to_string()).with_source(err)
    }
}

/// Type alias for Results using DashboardError
pub type Result<T> = std::result::Result<T, DashboardError>;
