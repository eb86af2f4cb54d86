//! Error handling for the API server
//!
//! Handlers return `ApiResult<T>`; every error renders as the failure
//! envelope:
//!
//! ```json
//! {
//!   "success": false,
//!   "error": { "code": "NOT_FOUND", "message": "Campaign not found" }
//! }
//! ```
//!
//! | Variant              | Status | Code                  |
//! |----------------------|--------|-----------------------|
//! | `Validation`         | 400    | `VALIDATION_ERROR`    |
//! | `UserExists`         | 400    | `USER_EXISTS`         |
//! | `InvalidId`          | 400    | `INVALID_ID`          |
//! | `DuplicateEntry`     | 400    | `DUPLICATE_ENTRY`     |
//! | `InvalidCredentials` | 401    | `INVALID_CREDENTIALS` |
//! | `Unauthorized`       | 401    | `UNAUTHORIZED`        |
//! | `NotFound`           | 404    | `NOT_FOUND`           |
//! | `Internal`           | 500    | `INTERNAL_ERROR`      |

use avafund_shared::{
    auth::{jwt::JwtError, middleware::AuthError, password::PasswordError},
    ledger::{amount::AmountError, LedgerError},
    store::StoreError,
};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::ValidationErrors;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

const INVALID_INPUT: &str = "Invalid input data";

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Request body or parameters failed validation
    Validation {
        message: String,
        details: Vec<ValidationErrorDetail>,
    },

    /// Signup with an email that is already registered
    UserExists,

    /// Unknown email or wrong password
    InvalidCredentials,

    /// Missing or invalid bearer token
    Unauthorized(String),

    NotFound(String),

    /// Path identifier is not a campaign ID
    InvalidId(String),

    /// A unique constraint other than the user email rejected a write
    DuplicateEntry,

    /// Logged server-side, never exposed to clients
    Internal(String),
}

/// One failed field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    pub field: String,
    pub message: String,
}

/// Failure envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ApiError {
    /// Validation failure on a single field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: INVALID_INPUT.to_string(),
            details: vec![ValidationErrorDetail {
                field: field.into(),
                message: message.into(),
            }],
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. }
            | ApiError::UserExists
            | ApiError::InvalidId(_)
            | ApiError::DuplicateEntry => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::UserExists => "USER_EXISTS",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InvalidId(_) => "INVALID_ID",
            ApiError::DuplicateEntry => "DUPLICATE_ENTRY",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation { message, details } => {
                write!(f, "{}: {} field errors", message, details.len())
            }
            ApiError::UserExists => write!(f, "User with this email already exists"),
            ApiError::InvalidCredentials => write!(f, "Invalid email or password"),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InvalidId(msg) => write!(f, "Invalid ID: {}", msg),
            ApiError::DuplicateEntry => write!(f, "A record with this value already exists"),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().to_string();

        let (message, details) = match self {
            ApiError::Validation { message, details } => (message, Some(details)),
            ApiError::Unauthorized(msg) | ApiError::NotFound(msg) | ApiError::InvalidId(msg) => {
                (msg, None)
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ("An unexpected error occurred".to_string(), None)
            }
            other => (other.to_string(), None),
        };

        let body = Json(ErrorResponse {
            success: false,
            error: ErrorBody {
                code,
                message,
                details,
            },
        });

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("Resource not found".to_string()),
            StoreError::Duplicate { constraint } if constraint.contains("email") => {
                ApiError::UserExists
            }
            StoreError::Duplicate { .. } => ApiError::DuplicateEntry,
            StoreError::Ledger(err) => err.into(),
            StoreError::Database(err) => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Invalid { field, message } => ApiError::invalid_field(field, message),
            // A non-positive rate comes from configuration, not the client
            LedgerError::Amount(AmountError::NonPositiveRate) => {
                ApiError::Internal("Configured conversion rate is not positive".to_string())
            }
            LedgerError::Amount(err) => ApiError::invalid_field("amount", err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => {
                ApiError::Unauthorized("Authentication required".to_string())
            }
            AuthError::InvalidFormat => {
                ApiError::Unauthorized("Expected a Bearer token".to_string())
            }
            AuthError::InvalidToken(JwtError::Expired) => {
                ApiError::Unauthorized("Token expired".to_string())
            }
            AuthError::InvalidToken(_) => ApiError::Unauthorized("Invalid token".to_string()),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => {
                ApiError::Internal(format!("Token creation failed: {}", msg))
            }
            other => AuthError::InvalidToken(other).into(),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: camel_case(field),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", camel_case(field))),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::Validation {
            message: INVALID_INPUT.to_string(),
            details,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_field("body", rejection.body_text())
    }
}

/// `wallet_address` -> `walletAddress`, matching the wire names
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
