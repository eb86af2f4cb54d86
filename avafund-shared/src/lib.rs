//! # AvaFund Shared Library
//!
//! Domain types, ledger rules and persistence used by the AvaFund API
//! server.
//!
//! ## Module Organization
//!
//! - `ledger`: campaign creation, donation accounting and derived views
//! - `models`: stored records and their schemas
//! - `store`: the `LedgerStore` repository with PostgreSQL and in-memory backends
//! - `auth`: password hashing, bearer tokens and request authentication
//! - `db`: connection pool and migrations

pub mod auth;
pub mod db;
pub mod ledger;
pub mod models;
pub mod store;

/// Current version of the AvaFund shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
