//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Record errors
//! - 2xxx: Food safety errors
//! - 3xxx: Finance / import errors
//! - 4xxx: Sync errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 so the same value can be written to the sheet or
/// shown in a toast without a lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Records ====================
    /// Record not found in its store
    RecordNotFound = 1001,
    /// Record was already deleted
    RecordDeleted = 1002,
    /// Wizard step has unmet requirements
    StepIncomplete = 1003,
    /// Wizard step index does not exist or cannot be reached
    StepUnreachable = 1004,

    // ==================== 2xxx: Food safety ====================
    /// Method already validated, no more batches accepted
    MethodAlreadyValidated = 2001,
    /// Batch recorded out of order
    BatchOutOfOrder = 2002,
    /// Temperature reading is not a number
    InvalidTemperature = 2003,

    // ==================== 3xxx: Finance ====================
    /// CSV type could not be detected from the header
    CsvTypeNotDetected = 3001,
    /// CSV file has no rows or is unreadable
    CsvUnreadable = 3002,
    /// Date cell could not be parsed
    InvalidDate = 3004,
    /// Date range is empty or reversed
    InvalidDateRange = 3005,

    // ==================== 4xxx: Sync ====================
    /// Remote endpoint not configured
    RemoteNotConfigured = 4001,
    /// Remote request failed
    RemoteRequestFailed = 4002,
    /// Remote answered with a non-success status
    RemoteRejected = 4003,
    /// Sync queue is closed
    SyncQueueClosed = 4004,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Local storage error (read/write failed)
    StorageError = 9002,
    /// Local storage blob is corrupted
    StorageCorrupted = 9003,
    /// Configuration error
    ConfigError = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",

            // Records
            ErrorCode::RecordNotFound => "Record not found",
            ErrorCode::RecordDeleted => "Record has been deleted",
            ErrorCode::StepIncomplete => "Complete the required fields before continuing",
            ErrorCode::StepUnreachable => "Step cannot be reached yet",

            // Food safety
            ErrorCode::MethodAlreadyValidated => "Method is already validated",
            ErrorCode::BatchOutOfOrder => "Batches must be recorded in order",
            ErrorCode::InvalidTemperature => "Temperature reading is invalid",

            // Finance
            ErrorCode::CsvTypeNotDetected => "CSV type not detected",
            ErrorCode::CsvUnreadable => "CSV file could not be read",
            ErrorCode::InvalidDate => "Date could not be parsed",
            ErrorCode::InvalidDateRange => "Date range is invalid",

            // Sync
            ErrorCode::RemoteNotConfigured => "Remote sheet is not configured",
            ErrorCode::RemoteRequestFailed => "Remote request failed",
            ErrorCode::RemoteRejected => "Remote sheet rejected the request",
            ErrorCode::SyncQueueClosed => "Sync queue is closed",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::StorageError => "Local storage error",
            ErrorCode::StorageCorrupted => "Local storage data is corrupted",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),

            // Records
            1001 => Ok(ErrorCode::RecordNotFound),
            1002 => Ok(ErrorCode::RecordDeleted),
            1003 => Ok(ErrorCode::StepIncomplete),
            1004 => Ok(ErrorCode::StepUnreachable),

            // Food safety
            2001 => Ok(ErrorCode::MethodAlreadyValidated),
            2002 => Ok(ErrorCode::BatchOutOfOrder),
            2003 => Ok(ErrorCode::InvalidTemperature),

            // Finance
            3001 => Ok(ErrorCode::CsvTypeNotDetected),
            3002 => Ok(ErrorCode::CsvUnreadable),
            3004 => Ok(ErrorCode::InvalidDate),
            3005 => Ok(ErrorCode::InvalidDateRange),

            // Sync
            4001 => Ok(ErrorCode::RemoteNotConfigured),
            4002 => Ok(ErrorCode::RemoteRequestFailed),
            4003 => Ok(ErrorCode::RemoteRejected),
            4004 => Ok(ErrorCode::SyncQueueClosed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageError),
            9003 => Ok(ErrorCode::StorageCorrupted),
            9004 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
