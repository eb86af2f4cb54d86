//! API route handlers, organized by resource
//!
//! - `auth`: signup and login
//! - `campaigns`: campaign listing, detail, creation and donations
//! - `price`: AVAX/KES conversion rate
//! - `health`: liveness and store connectivity

pub mod auth;
pub mod campaigns;
pub mod health;
pub mod price;
