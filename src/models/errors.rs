//! Centralized Error Handling Module
//!
//! Every failure carries a unique code so degraded scans stay explainable:
//! provider errors are rendered into scan warnings as `[CODE] message`.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - ADDR_xxx: caller input errors (the only errors surfaced as failures)
//! - UPSTREAM_xxx: chain-data provider errors (always degraded to warnings)
//! - ORACLE_xxx: sanctions oracle errors
//! - API_xxx / CFG_xxx: calling-layer and configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    /// Prefix the message with the upstream that produced it
    pub fn context(mut self, upstream: &str) -> Self {
        self.message = format!("{}: {}", upstream, self.message);
        self
    }

    /// Render as a scan warning line
    pub fn to_warning(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Caller Input Errors
    // ============================================
    /// Address is malformed (rejected before any network call)
    InvalidAddress,

    // ============================================
    // Upstream Provider Errors
    // ============================================
    /// Provider did not answer within the request timeout
    UpstreamTimeout,
    /// Provider could not be reached
    UpstreamUnavailable,
    /// Provider answered with a non-success HTTP status
    UpstreamHttpStatus,
    /// Provider answered with a body we could not interpret
    UpstreamMalformed,

    // ============================================
    // Sanctions Oracle Errors
    // ============================================
    /// Oracle returned something other than an ABI-encoded bool
    OracleMalformed,

    // ============================================
    // Configuration / API Errors
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,
    /// Invalid request format
    ApiBadRequest,
    /// Internal server error
    ApiInternalError,

    // ============================================
    // Generic Errors
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidAddress => "ADDR_INVALID",

            Self::UpstreamTimeout => "UPSTREAM_TIMEOUT",
            Self::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
            Self::UpstreamHttpStatus => "UPSTREAM_HTTP_STATUS",
            Self::UpstreamMalformed => "UPSTREAM_MALFORMED",

            Self::OracleMalformed => "ORACLE_MALFORMED",

            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiInternalError => "API_INTERNAL_ERROR",

            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidAddress | Self::ApiBadRequest | Self::ConfigInvalidValue => 400,
            Self::UpstreamTimeout => 504,
            Self::UpstreamUnavailable | Self::UpstreamHttpStatus | Self::UpstreamMalformed => 502,
            _ => 500,
        }
    }

    /// Check if a caller may retry. The engine itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::UpstreamTimeout | Self::UpstreamUnavailable | Self::UpstreamHttpStatus
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Malformed address supplied by the caller
    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidAddress, msg)
    }

    /// Upstream timeout
    pub fn upstream_timeout(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamTimeout, msg)
    }

    /// Upstream unreachable
    pub fn upstream_unavailable(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamUnavailable, msg)
    }

    /// Upstream returned a non-success status
    pub fn upstream_status(status: u16) -> Self {
        Self::new(ErrorCode::UpstreamHttpStatus, format!("HTTP error: {}", status))
    }

    /// Upstream body could not be interpreted
    pub fn upstream_malformed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamMalformed, msg)
    }

    /// Oracle result could not be decoded
    pub fn oracle_malformed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::OracleMalformed, msg)
    }

    /// Invalid configuration value
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidValue, msg)
    }

    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ErrorCode::UpstreamTimeout, "Request timed out")
        } else if err.is_connect() {
            Self::new(ErrorCode::UpstreamUnavailable, "Connection failed")
        } else if err.is_decode() {
            Self::new(ErrorCode::UpstreamMalformed, "Response body could not be decoded")
        } else if let Some(status) = err.status() {
            Self::upstream_status(status.as_u16())
        } else {
            Self::new(ErrorCode::UpstreamUnavailable, "Request failed")
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::UpstreamMalformed, "JSON parse error", err)
    }
}
