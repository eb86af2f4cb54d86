//! Authentication primitives
//!
//! # Modules
//!
//! - [`password`]: Argon2id password hashing and verification
//! - [`jwt`]: bearer token issuance and validation (HS256)
//! - [`middleware`]: turning an `Authorization` header into an [`middleware::AuthContext`]
//!
//! # Example
//!
//! ```
//! use avafund_shared::auth::password::{hash_password, verify_password};
//! use avafund_shared::auth::jwt::{issue_token, validate_token};
//! use uuid::Uuid;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let hash = hash_password("hunter22")?;
//! assert!(verify_password("hunter22", &hash)?);
//!
//! let secret = "a-secret-of-at-least-thirty-two-bytes!";
//! let token = issue_token(Uuid::new_v4(), "amina@example.com", secret)?;
//! let claims = validate_token(&token, secret)?;
//! assert_eq!(claims.email, "amina@example.com");
//! # Ok(())
//! # }
//! ```

pub mod jwt;
pub mod middleware;
pub mod password;
