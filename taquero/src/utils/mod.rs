//! Utilities - logging, validation and date helpers

pub mod logger;
pub mod time;
pub mod validation;

pub use shared::{AppError, AppResult, ErrorCategory, ErrorCode};
