//! API response plumbing
//!
//! Error/confirmation bodies and the pagination header names the catalog
//! listing communicates its metadata through (the body stays a bare array).

use serde::{Deserialize, Serialize};

/// Pagination metadata headers (X-Total-Count etc.), exposed through CORS
/// so the SPA can read them. Lowercase because HTTP/2 header names are and
/// `HeaderName::from_static` insists.
pub const X_TOTAL_COUNT: &str = "x-total-count";
pub const X_PAGE: &str = "x-page";
pub const X_PAGE_SIZE: &str = "x-page-size";
pub const X_TOTAL_PAGES: &str = "x-total-pages";

/// `{"message": "..."}` - client-error bodies and simple confirmations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{"error": "..."}` - opaque server errors and the unknown-endpoint fallback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
