//! # AvaFund API Server Library
//!
//! HTTP surface of the AvaFund crowdfunding backend: accounts, campaigns,
//! donations and the AVAX/KES rate.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Validating JSON extractor
//! - `response`: Success envelope
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod response;
pub mod routes;
