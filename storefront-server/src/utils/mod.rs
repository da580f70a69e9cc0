//! Utility module - common types and helpers
//!
//! - [`AppError`] / [`AppResult`] - application error type used by handlers
//! - [`logger`] - tracing setup

pub mod error;
pub mod logger;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
