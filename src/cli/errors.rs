//! CLI-specific error types
//!
//! Only I/O failures end a session; everything else becomes an error
//! response and the session continues.

use std::fmt;
use std::io;

use crate::parking::ParkingError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file or flags rejected
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Request line is not a valid request
    BadRequest,
    /// Engine refused the request; carries the engine's error code
    Parking(&'static str),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "PARKLOT_CLI_CONFIG_ERROR",
            Self::IoError => "PARKLOT_CLI_IO_ERROR",
            Self::BadRequest => "PARKLOT_CLI_BAD_REQUEST",
            Self::Parking(code) => *code,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BadRequest, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether a request session must stop
    pub fn is_fatal(&self) -> bool {
        matches!(self.code, CliErrorCode::IoError | CliErrorCode::ConfigError)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<ParkingError> for CliError {
    fn from(e: ParkingError) -> Self {
        Self::new(CliErrorCode::Parking(e.code()), e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
