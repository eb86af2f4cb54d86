//! User model
//!
//! Users sign up with a name, an email address, a password and the Avalanche
//! wallet address they donate from. Records are immutable after signup.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE users (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     name VARCHAR(100) NOT NULL,
//!     email VARCHAR(255) NOT NULL,
//!     password_hash VARCHAR(255) NOT NULL,
//!     wallet_address VARCHAR(42) NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//!
//! CREATE UNIQUE INDEX users_email_key ON users (LOWER(email));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of a `0x`-prefixed EVM address
pub const WALLET_ADDRESS_LEN: usize = 42;

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address, unique ignoring case
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// `0x`-prefixed, 40 hex digit wallet address
    pub wallet_address: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,

    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,

    pub wallet_address: String,
}

/// The client-facing view of a user
///
/// Returned by signup and login alongside the bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub wallet_address: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            wallet_address: user.wallet_address.clone(),
            created_at: user.created_at,
        }
    }
}

/// Checks the `0x` + 40 hex digit wallet address format
///
/// # Example
///
/// ```
/// use avafund_shared::models::user::is_valid_wallet_address;
///
/// assert!(is_valid_wallet_address("0x52908400098527886E0F7030069857D2E4169EE7"));
/// assert!(!is_valid_wallet_address("52908400098527886E0F7030069857D2E4169EE7"));
/// ```
pub fn is_valid_wallet_address(address: &str) -> bool {
    address.len() == WALLET_ADDRESS_LEN
        && address.starts_with("0x")
        && address[2..].chars().all(|c| c.is_ascii_hexdigit())
}
