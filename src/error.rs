/// Application error handling
///
/// Internal failure kinds stay distinct for logging and tests. They are
/// collapsed into a small set of outward responses only at the HTTP boundary:
/// every identity failure becomes the same 401, ownership and role failures
/// become 403, and infrastructure faults become a generic 500.

use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError, ResponseError},
    http::StatusCode,
    HttpRequest, HttpResponse,
};
use std::error::Error as StdError;
use std::fmt;

use crate::store::StoreError;

// ============================================================================
// DOMAIN-SPECIFIC ERROR TYPES
// ============================================================================

/// Validation errors for request bodies and query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyField(&'static str),
    TooLong(&'static str, usize),
    InvalidFormat(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{} is empty", field),
            ValidationError::TooLong(field, max) => {
                write!(f, "{} is too long (maximum {} characters)", field, max)
            }
            ValidationError::InvalidFormat(field) => write!(f, "{} has invalid format", field),
        }
    }
}

impl StdError for ValidationError {}

/// Identity resolution failures. All of them surface as 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No usable credential under the expected scheme
    MissingCredential,
    SignatureInvalid,
    Expired,
    IssuerMismatch,
    Malformed,
    PasswordMismatch,
    /// The stored password hash could not be parsed
    MalformedHash,
    /// Refresh token unknown to the store
    NotFound,
    Revoked,
    ApiKeyMismatch,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingCredential => write!(f, "Missing credential"),
            AuthError::SignatureInvalid => write!(f, "Token signature is invalid"),
            AuthError::Expired => write!(f, "Token has expired"),
            AuthError::IssuerMismatch => write!(f, "Token issuer mismatch"),
            AuthError::Malformed => write!(f, "Token is malformed"),
            AuthError::PasswordMismatch => write!(f, "Password mismatch"),
            AuthError::MalformedHash => write!(f, "Stored password hash is malformed"),
            AuthError::NotFound => write!(f, "Refresh token not found"),
            AuthError::Revoked => write!(f, "Refresh token has been revoked"),
            AuthError::ApiKeyMismatch => write!(f, "API key mismatch"),
        }
    }
}

impl StdError for AuthError {}

/// Infrastructure faults. Logged and surfaced as a generic server error.
#[derive(Debug)]
pub enum InfraError {
    Persistence(String),
    DuplicateToken,
    EntropyFailure(String),
    HashingFailure(String),
}

impl fmt::Display for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfraError::Persistence(msg) => write!(f, "Persistence error: {}", msg),
            InfraError::DuplicateToken => write!(f, "Refresh token collided with an existing row"),
            InfraError::EntropyFailure(msg) => write!(f, "Random source unavailable: {}", msg),
            InfraError::HashingFailure(msg) => write!(f, "Password hashing failed: {}", msg),
        }
    }
}

impl StdError for InfraError {}

// ============================================================================
// UNIFIED APPLICATION ERROR TYPE
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    Auth(AuthError),
    /// Identity is valid but not entitled to the resource
    Forbidden(String),
    NotFound(String),
    /// Unique constraint on a user-supplied value (e.g. email)
    Conflict(String),
    Infra(InfraError),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Infra(e) => write!(f, "{}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<InfraError> for AppError {
    fn from(err: InfraError) -> Self {
        AppError::Infra(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(what) => AppError::Conflict(what),
            StoreError::Backend(msg) => AppError::Infra(InfraError::Persistence(msg)),
        }
    }
}

// ============================================================================
// HTTP RESPONSE MAPPING
// ============================================================================

#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    /// Unique error ID, also present in the server log line
    pub error_id: String,
    pub message: String,
    pub code: String,
    pub status: u16,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_id: String, message: String, code: String, status: u16) -> Self {
        Self {
            error_id,
            message,
            code,
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Converts errors to HTTP responses with proper logging
pub trait ErrorHandler {
    fn error_response(&self, error_id: &str) -> (StatusCode, ErrorResponse);
    fn log_error(&self, error_id: &str);
}

impl ErrorHandler for AppError {
    fn error_response(&self, error_id: &str) -> (StatusCode, ErrorResponse) {
        let (code, message) = match self {
            AppError::Validation(e) => ("VALIDATION_ERROR", e.to_string()),
            AppError::Auth(_) => ("UNAUTHORIZED", "Unauthorized".to_string()),
            AppError::Forbidden(_) => ("FORBIDDEN", "Forbidden".to_string()),
            AppError::NotFound(_) => ("NOT_FOUND", "Resource not found".to_string()),
            AppError::Conflict(what) => ("DUPLICATE_ENTRY", format!("{} already exists", what)),
            AppError::Infra(_) | AppError::Internal(_) => {
                ("INTERNAL_ERROR", "Internal server error".to_string())
            }
        };
        let status = self.status_code();

        (
            status,
            ErrorResponse::new(
                error_id.to_string(),
                message,
                code.to_string(),
                status.as_u16(),
            ),
        )
    }

    fn log_error(&self, error_id: &str) {
        match self {
            AppError::Validation(e) => {
                tracing::warn!(error_id = error_id, error = %e, "Validation error");
            }
            AppError::Auth(e) => {
                tracing::warn!(error_id = error_id, kind = ?e, "Authentication failed");
            }
            AppError::Forbidden(reason) => {
                tracing::warn!(error_id = error_id, reason = %reason, "Authorization denied");
            }
            AppError::NotFound(what) => {
                tracing::debug!(error_id = error_id, what = %what, "Resource not found");
            }
            AppError::Conflict(what) => {
                tracing::warn!(error_id = error_id, what = %what, "Duplicate entry attempt");
            }
            AppError::Infra(e) => {
                tracing::error!(error_id = error_id, error = %e, "Infrastructure fault");
            }
            AppError::Internal(msg) => {
                tracing::error!(error_id = error_id, error = %msg, "Internal error");
            }
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let error_id = uuid::Uuid::new_v4().to_string();
        self.log_error(&error_id);

        let (status, body) = <Self as ErrorHandler>::error_response(self, &error_id);

        HttpResponse::build(status).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Infra(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// ============================================================================
// EXTRACTOR REJECTIONS
// ============================================================================

// Parser text goes to the log only. Clients get the generic validation body.

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(path = %req.path(), error = %err, "Rejected request body");
    AppError::Validation(ValidationError::InvalidFormat("body")).into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(path = %req.path(), error = %err, "Rejected query string");
    AppError::Validation(ValidationError::InvalidFormat("query")).into()
}

pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(path = %req.path(), error = %err, "Rejected path parameters");
    AppError::NotFound(req.path().to_string()).into()
}
