//! Common test utilities for integration tests
//!
//! Every test gets its own router over a fresh in-memory store, so tests
//! run in parallel without a database.

#![allow(dead_code)]

use avafund_api::app::{build_router, AppState};
use avafund_api::config::Config;
use avafund_shared::store::InMemoryStore;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

pub const WALLET: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

/// Test context holding the router under test
pub struct TestContext {
    pub app: axum::Router,
    pub store: Arc<InMemoryStore>,
}

impl TestContext {
    pub fn new() -> Self {
        let vars: HashMap<&str, &str> = [
            ("JWT_SECRET", JWT_SECRET),
            ("NETWORK", "test"),
            ("FALLBACK_KES_PER_AVAX", "146500"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_vars(|key| vars.get(key).map(|v| v.to_string()))
            .expect("test config");

        let store = Arc::new(InMemoryStore::new());
        let app = build_router(AppState::new(store.clone(), config));

        Self { app, store }
    }

    /// Sends a request and returns the status and parsed JSON body
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!("non-JSON body ({}): {}", status, String::from_utf8_lossy(&bytes))
            })
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, token, Some(body)).await
    }

    /// Signs up a user and returns the bearer token
    pub async fn signup(&self, email: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/signup",
                None,
                json!({
                    "name": "Test User",
                    "email": email,
                    "password": "secret123",
                    "walletAddress": WALLET,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);

        body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Creates a 1000 KES campaign (milestones 600 + 400) and returns its ID
    pub async fn create_campaign(&self, token: &str, title: &str) -> i64 {
        let (status, body) = self
            .post("/api/campaigns", Some(token), campaign_body(title, 1000))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);

        body["data"]["campaignId"].as_i64().unwrap()
    }
}

/// Unix seconds `days` from now
pub fn days_from_now(days: i64) -> i64 {
    chrono::Utc::now().timestamp() + days * 86_400
}

/// Campaign body whose two milestones split `goal_kes` 60/40
pub fn campaign_body(title: &str, goal_kes: i64) -> Value {
    let first = goal_kes * 6 / 10;
    json!({
        "title": title,
        "description": "Two boreholes and a storage tank",
        "goalKES": goal_kes,
        "deadline": days_from_now(30),
        "milestones": [
            { "description": "Drill borehole", "amountKES": first },
            { "description": "Install tank", "amountKES": goal_kes - first },
        ],
    })
}
