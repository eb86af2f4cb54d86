//! Authentication endpoints
//!
//! - `POST /api/auth/signup` - Create an account and get a token
//! - `POST /api/auth/login` - Exchange email and password for a token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    response::ApiResponse,
};
use avafund_shared::{
    auth::{jwt, password},
    models::user::{is_valid_wallet_address, CreateUser, PublicUser},
};
use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Signup request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// 2 to 100 characters once surrounding whitespace is removed
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// `0x` followed by 40 hex digits
    #[validate(custom(function = "validate_wallet_address"))]
    pub wallet_address: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Returned by both signup and login
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token, valid for seven days
    pub token: String,
    pub user: PublicUser,
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if (2..=100).contains(&len) {
        Ok(())
    } else {
        let mut error = ValidationError::new("length");
        error.message = Some("Name must be 2 to 100 characters".into());
        Err(error)
    }
}

fn validate_wallet_address(address: &str) -> Result<(), ValidationError> {
    if is_valid_wallet_address(address) {
        Ok(())
    } else {
        let mut error = ValidationError::new("wallet_address");
        error.message = Some("Invalid wallet address".into());
        Err(error)
    }
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/signup
/// Content-Type: application/json
///
/// {
///   "name": "Amina Wanjiru",
///   "email": "amina@example.com",
///   "password": "secret123",
///   "walletAddress": "0x52908400098527886E0F7030069857D2E4169EE7"
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "token": "eyJ...",
///     "user": { "id": "uuid", "name": "Amina Wanjiru", "email": "amina@example.com",
///               "walletAddress": "0x5290...", "createdAt": "2025-10-01T08:00:00Z" }
///   }
/// }
/// ```
///
/// # Errors
///
/// - `400 VALIDATION_ERROR`: a field failed validation
/// - `400 USER_EXISTS`: the email is already registered (any letter case)
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> ApiResult<(StatusCode, ApiResponse<AuthResponse>)> {
    if state.store.find_user_by_email(&req.email).await?.is_some() {
        return Err(ApiError::UserExists);
    }

    let password_hash = password::hash_password(&req.password)?;

    // A concurrent signup can still win the race; the unique index maps to USER_EXISTS
    let user = state
        .store
        .create_user(CreateUser {
            name: req.name.trim().to_string(),
            email: req.email.trim().to_string(),
            password_hash,
            wallet_address: req.wallet_address,
        })
        .await?;

    let token = jwt::issue_token(user.id, &user.email, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "User signed up");

    Ok(ApiResponse::created(AuthResponse {
        token,
        user: PublicUser::from(&user),
    }))
}

/// Log in with email and password
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// { "email": "amina@example.com", "password": "secret123" }
/// ```
///
/// # Errors
///
/// - `400 VALIDATION_ERROR`: malformed request
/// - `401 INVALID_CREDENTIALS`: unknown email or wrong password (indistinguishable)
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<ApiResponse<AuthResponse>> {
    let Some(user) = state.store.find_user_by_email(req.email.trim()).await? else {
        tracing::info!("Login failed: unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::info!(user_id = %user.id, "Login failed: wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = jwt::issue_token(user.id, &user.email, state.jwt_secret())?;

    Ok(ApiResponse::ok(AuthResponse {
        token,
        user: PublicUser::from(&user),
    }))
}
