//! Common test utilities and fixtures.

#![cfg(feature = "server")]
#![allow(dead_code)]

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use tempfile::TempDir;
use sendboard::server::{
    AppState, Config, CorsConfig, DatabaseConfig, LoggingConfig, ServerConfig, router,
};

/// A fixed instant the trend tests chart back from (a Wednesday).
pub const AS_OF: &str = "2024-06-12T12:00:00Z";

/// Test application wrapper that manages a temporary send store.
pub struct TestApp {
    pub server: TestServer,
    _temp_dir: TempDir, // Keep alive for test duration
}

impl TestApp {
    /// Create a new test application with a fresh temporary store.
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("db");
        let config = Config {
            server: ServerConfig {
                bind: "127.0.0.1".into(),
                port: 0,
            },
            cors: CorsConfig::default(),
            logging: LoggingConfig::default(),
            databases: vec![DatabaseConfig {
                name: "test".into(),
                path: db_path.to_string_lossy().into(),
            }],
        };
        let state = AppState::from_config(&config)?;
        let server = TestServer::new(router(state))?;
        Ok(Self {
            server,
            _temp_dir: temp_dir,
        })
    }

    /// Post a raw send and return the stored record.
    pub async fn add_send(&self, send: Value) -> anyhow::Result<Value> {
        let response = self.server.post("/api/v1/db/test/sends").json(&send).await;
        response.assert_status(StatusCode::CREATED);
        Ok(response.json())
    }

    /// Post several raw sends, returning their assigned ids in order.
    pub async fn add_sends(&self, sends: &[Value]) -> anyhow::Result<Vec<String>> {
        let mut ids = Vec::with_capacity(sends.len());
        for send in sends {
            let stored = self.add_send(send.clone()).await?;
            ids.push(stored["id"].as_str().unwrap_or_default().to_string());
        }
        Ok(ids)
    }

    /// Make `user` follow `target`.
    pub async fn follow(&self, user: &str, target: &str) {
        self.server
            .put(&format!("/api/v1/db/test/users/{}/following/{}", user, target))
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }
}

/// A shared send with the given user, grade, status and attempts.
pub fn shared_send(user: &str, grade: &str, status: &str, attempts: &str) -> Value {
    json!({
        "userId": user,
        "userName": user.to_uppercase(),
        "grade": grade,
        "status": status,
        "attempts": attempts,
        "color": "Blue",
        "isShared": true,
        "timestamp": "2024-06-10T18:00:00Z",
    })
}

/// Assert that a JSON error body carries the given code.
pub fn assert_error_code(body: &Value, code: &str) {
    assert_eq!(
        body["error"]["code"].as_str(),
        Some(code),
        "unexpected error body: {}",
        body
    );
}

/// Collect the `userId` of every element in a JSON array.
pub fn user_ids(body: &Value) -> Vec<String> {
    body.as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["userId"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
