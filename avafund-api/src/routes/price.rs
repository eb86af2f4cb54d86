//! AVAX/KES price endpoint
//!
//! Serves the configured fallback rate until a live price feed is wired in.
//! The USD legs are fixed reference figures.

use crate::{app::AppState, response::ApiResponse};
use avafund_shared::ledger::now_seconds;
use axum::extract::State;
use serde::{Deserialize, Serialize};

/// Reference AVAX/USD price reported alongside the rate
pub const REFERENCE_AVAX_USD: f64 = 35.50;

/// Reference USD/KES rate reported alongside the rate
pub const REFERENCE_USD_KES: f64 = 4126.76;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSources {
    #[serde(rename = "AVAX_USD")]
    pub avax_usd: String,

    #[serde(rename = "USD_KES")]
    pub usd_kes: String,
}

/// Conversion rate payload
///
/// Field names are part of the client contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceResponse {
    #[serde(rename = "KES_per_AVAX")]
    pub kes_per_avax: f64,

    /// `1 / KES_per_AVAX`, 8 decimal places
    #[serde(rename = "AVAX_per_KES")]
    pub avax_per_kes: f64,

    /// Unix seconds
    pub timestamp: i64,

    pub sources: PriceSources,

    #[serde(rename = "AVAX_USD_price")]
    pub avax_usd_price: f64,

    #[serde(rename = "USD_KES_rate")]
    pub usd_kes_rate: f64,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Current KES per AVAX
///
/// # Endpoint
///
/// ```text
/// GET /api/price/avax-kes
/// ```
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "KES_per_AVAX": 146500.0,
///     "AVAX_per_KES": 0.00000683,
///     "timestamp": 1760000000,
///     "sources": { "AVAX_USD": "chainlink", "USD_KES": "exchangerate.host" },
///     "AVAX_USD_price": 35.5,
///     "USD_KES_rate": 4126.76
///   }
/// }
/// ```
pub async fn avax_kes(State(state): State<AppState>) -> ApiResponse<PriceResponse> {
    let kes_per_avax = state.config.pricing.fallback_kes_per_avax.to_f64();

    ApiResponse::ok(PriceResponse {
        kes_per_avax,
        avax_per_kes: round_to(1.0 / kes_per_avax, 8),
        timestamp: now_seconds(),
        sources: PriceSources {
            avax_usd: "chainlink".to_string(),
            usd_kes: "exchangerate.host".to_string(),
        },
        avax_usd_price: REFERENCE_AVAX_USD,
        usd_kes_rate: REFERENCE_USD_KES,
    })
}
