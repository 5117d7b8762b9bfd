/// Error code registry for Campus Insights
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 2000-2999: Storage (data acquisition) errors
/// - 3000-3999: View errors
/// - 4000-4999: Render errors
/// - 5000-5999: Server errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_PARSE_ERROR: u16 = 1002;
    pub const CONFIG_VALIDATION_FAILED: u16 = 1003;
    pub const CONFIG_UNKNOWN_FIELD: u16 = 1004;
    pub const CONFIG_FIELD_NOT_AVAILABLE: u16 = 1005;
    pub const CONFIG_NOT_A_TIMESTAMP: u16 = 1006;
    pub const CONFIG_EMPTY_GROUP_KEY: u16 = 1007;

    // Storage errors (2000-2999)
    pub const STORAGE_CONNECTION: u16 = 2001;
    pub const STORAGE_SCHEMA: u16 = 2002;
    pub const STORAGE_INTEGRITY: u16 = 2003;
    pub const STORAGE_QUERY: u16 = 2004;
    pub const STORAGE_IO_ERROR: u16 = 2005;
    pub const STORAGE_CSV_ERROR: u16 = 2006;
    pub const STORAGE_CONFIGURATION: u16 = 2007;

    // View errors (3000-3999)
    pub const VIEW_UNKNOWN: u16 = 3001;
    pub const VIEW_CHART_NOT_FOUND: u16 = 3002;

    // Render errors (4000-4999)
    pub const RENDER_TEMPLATE: u16 = 4001;
    pub const RENDER_SERIALIZATION: u16 = 4002;
    pub const RENDER_UNSUPPORTED_FORMAT: u16 = 4003;

    // Server errors (5000-5999)
    pub const SERVER_BIND_FAILED: u16 = 5001;
    pub const SERVER_STOPPED: u16 = 5002;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        ErrorCode::CONFIG_NOT_FOUND => "Configuration file not found",
        ErrorCode::CONFIG_PARSE_ERROR => "Configuration file could not be parsed",
        ErrorCode::CONFIG_VALIDATION_FAILED => "Configuration validation failed",
        ErrorCode::CONFIG_UNKNOWN_FIELD => "Field name does not refer to a known column",
        ErrorCode::CONFIG_FIELD_NOT_AVAILABLE => "Field is not carried by this table",
        ErrorCode::CONFIG_NOT_A_TIMESTAMP => "Field does not hold timestamps",
        ErrorCode::CONFIG_EMPTY_GROUP_KEY => "Grouping requires at least one key field",

        ErrorCode::STORAGE_CONNECTION => "Backing store unreachable or credentials rejected",
        ErrorCode::STORAGE_SCHEMA => "Expected table or columns are absent",
        ErrorCode::STORAGE_INTEGRITY => "Student identifiers are missing or duplicated",
        ErrorCode::STORAGE_QUERY => "Query against the backing store failed",
        ErrorCode::STORAGE_IO_ERROR => "Storage I/O error",
        ErrorCode::STORAGE_CSV_ERROR => "CSV source could not be read",
        ErrorCode::STORAGE_CONFIGURATION => "Storage backend is misconfigured",

        ErrorCode::VIEW_UNKNOWN => "Unknown view",
        ErrorCode::VIEW_CHART_NOT_FOUND => "Chart not found on view",

        ErrorCode::RENDER_TEMPLATE => "Template rendering failed",
        ErrorCode::RENDER_SERIALIZATION => "Serialization of rendered output failed",
        ErrorCode::RENDER_UNSUPPORTED_FORMAT => "Unsupported export format",

        ErrorCode::SERVER_BIND_FAILED => "Could not bind the dashboard listener",
        ErrorCode::SERVER_STOPPED => "Dashboard server stopped unexpectedly",

        _ => "Unknown error code",
    }
}
