use crate::utils::output::OutputStyle;
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Schema conflict in namespace '{namespace}': {reason}")]
    SchemaConflict { namespace: String, reason: String },

    #[error("Namespace '{0}' does not exist")]
    NamespaceNotFound(String),

    #[error("Write error: {0}")]
    Write(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Result type alias for consistent error handling across the application
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Process exit status for errors that end the program.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => 2,
            _ => 1,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NamespaceNotFound(_))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

pub fn report_error(out: &mut dyn Write, err: &AppError) {
    let line = match err {
        AppError::StoreUnavailable(_) | AppError::Connection(_) => {
            format!("🌐 {}", OutputStyle::error(&err.to_string()))
        }
        AppError::NamespaceNotFound(_) | AppError::InvalidInput(_) => {
            format!("⚠️  {}", OutputStyle::warning(&err.to_string()))
        }
        _ => format!("❌ {}", OutputStyle::error(&err.to_string())),
    };
    // Output failures here have nowhere better to go.
    let _ = writeln!(out, "{}", line);
}
