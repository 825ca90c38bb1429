use crate::error::*;
use tracing::{error, warn};

/// Logging and client-facing rendering shared by every error type in the workspace.
pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    /// Text safe to show a client. Never carries query text or internal paths.
    fn user_friendly_message(&self) -> String;
    /// Stable machine-readable identifier, sent as the `code` field of error responses.
    fn error_code(&self) -> &'static str;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        match self {
            CoreError::Database(e) => {
                e.log_error();
            }
            CoreError::Config(e) => {
                e.log_error();
            }
            _ => error!(code = self.error_code(), "{}", self),
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!(code = self.error_code(), "{}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::Database(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Validation(e) => e.user_friendly_message(),
            CoreError::InvalidInput { message } => message.clone(),
            CoreError::Timeout { .. } => "request timed out".to_string(),
            CoreError::Io(_) | CoreError::Randomness { .. } => "internal error".to_string(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CoreError::Database(_) => "DATABASE",
            CoreError::Config(_) => "CONFIG",
            CoreError::Validation(_) => "VALIDATION",
            CoreError::Io(_) => "IO",
            CoreError::InvalidInput { .. } => "INVALID_INPUT",
            CoreError::Randomness { .. } => "RANDOMNESS",
            CoreError::Timeout { .. } => "TIMEOUT",
        }
    }
}

impl ErrorExt for DatabaseError {
    fn log_error(&self) -> &Self {
        match self {
            DatabaseError::Sql(e) => error!(code = self.error_code(), "sqlx: {:?}", e),
            _ => error!(code = self.error_code(), "{}", self),
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!(code = self.error_code(), "{}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            DatabaseError::ConstraintViolation { .. } => "post already exists".to_string(),
            DatabaseError::ConnectionFailed { .. } => "storage unavailable".to_string(),
            _ => "storage error".to_string(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            DatabaseError::ConnectionFailed { .. } => "DB_CONNECTION_FAILED",
            DatabaseError::MigrationFailed { .. } => "DB_MIGRATION_FAILED",
            DatabaseError::QueryFailed { .. } => "DB_QUERY_FAILED",
            DatabaseError::ConstraintViolation { .. } => "DB_CONSTRAINT_VIOLATION",
            DatabaseError::Sql(_) => "DB_SQL_ERROR",
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!(code = self.error_code(), "{}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!(code = self.error_code(), "{}", self);
        self
    }

    // Config errors only surface at startup, to whoever runs the binary.
    fn user_friendly_message(&self) -> String {
        self.to_string()
    }

    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND",
            ConfigError::Read { .. } => "CONFIG_READ_FAILED",
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE",
            ConfigError::ValidationFailed { .. } => "CONFIG_VALIDATION_FAILED",
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR",
        }
    }
}

impl ErrorExt for ValidationError {
    fn log_error(&self) -> &Self {
        error!(code = self.error_code(), "{}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!(code = self.error_code(), "{}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        self.to_string()
    }

    fn error_code(&self) -> &'static str {
        match self {
            ValidationError::MissingTitle => "POST_MISSING_TITLE",
            ValidationError::InvalidLink { .. } => "POST_INVALID_LINK",
            ValidationError::LinkAndContent => "POST_LINK_AND_CONTENT",
        }
    }
}
