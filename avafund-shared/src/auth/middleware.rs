//! Bearer token authentication
//!
//! [`authenticate_bearer`] reads `Authorization: Bearer <token>` and yields
//! the [`AuthContext`] that protected handlers receive through request
//! extensions. The API crate wires it into an axum middleware layer.
//!
//! # Example
//!
//! ```
//! use axum::http::{header, HeaderMap, HeaderValue};
//! use avafund_shared::auth::{jwt::issue_token, middleware::authenticate_bearer};
//! use uuid::Uuid;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let secret = "your-secret-key-at-least-32-bytes";
//! let user_id = Uuid::new_v4();
//! let token = issue_token(user_id, "kamau@example.com", secret)?;
//!
//! let mut headers = HeaderMap::new();
//! headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token))?);
//!
//! let auth = authenticate_bearer(&headers, secret)?;
//! assert_eq!(auth.user_id, user_id);
//! # Ok(())
//! # }
//! ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};

/// Identity of the caller, inserted into request extensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
}

/// Why a request could not be authenticated
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingCredentials,

    #[error("Expected a Bearer token")]
    InvalidFormat,

    #[error(transparent)]
    InvalidToken(#[from] JwtError),
}

/// Authenticates a request from its headers
///
/// # Errors
///
/// - [`AuthError::MissingCredentials`] without an `Authorization` header
/// - [`AuthError::InvalidFormat`] if the scheme is not `Bearer`
/// - [`AuthError::InvalidToken`] if the token fails validation
pub fn authenticate_bearer(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidFormat)?;

    let claims = validate_token(token, secret)?;

    Ok(AuthContext {
        user_id: claims.sub,
        email: claims.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{create_token, issue_token, Claims};
    use axum::http::HeaderValue;
    use chrono::Duration;

    const SECRET: &str = "middleware-secret-key-at-least-32-bytes";

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_valid_bearer_token() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, "njeri@example.com", SECRET).unwrap();

        let auth = authenticate_bearer(&headers(&format!("Bearer {}", token)), SECRET).unwrap();
        assert_eq!(auth.user_id, user_id);
        assert_eq!(auth.email, "njeri@example.com");
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            authenticate_bearer(&HeaderMap::new(), SECRET),
            Err(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_wrong_scheme() {
        assert!(matches!(
            authenticate_bearer(&headers("Basic dXNlcjpwYXNz"), SECRET),
            Err(AuthError::InvalidFormat)
        ));
        assert!(matches!(
            authenticate_bearer(&headers("Bearer "), SECRET),
            Err(AuthError::InvalidFormat)
        ));
    }

    #[test]
    fn test_expired_token() {
        let claims = Claims::with_expiration(Uuid::new_v4(), "a@example.com", Duration::days(-1));
        let token = create_token(&claims, SECRET).unwrap();

        assert!(matches!(
            authenticate_bearer(&headers(&format!("Bearer {}", token)), SECRET),
            Err(AuthError::InvalidToken(JwtError::Expired))
        ));
    }
}
