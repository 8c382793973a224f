// Not every test binary uses every helper
#![allow(dead_code)]

use character_favorites::{
    create_app, AppConfig, AuthConfig, MetricsType, ServerConfig, StorageConfig,
};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::sleep;

// ============================================================================
// Test Setup
// ============================================================================

/// In-memory configuration with a cheap bcrypt cost and no demo account.
pub fn test_config(metrics: MetricsType) -> AppConfig {
    // ---
    AppConfig {
        server: ServerConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            metrics,
        },
        auth: AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            token_ttl: Duration::from_secs(3600),
            bcrypt_cost: 4,
            seed_demo_user: false,
        },
        storage: StorageConfig::Memory,
    }
}

pub struct TestServer {
    pub addr: std::net::SocketAddr,
    pub client: Client,
}

impl TestServer {
    // ---
    pub async fn new() -> Self {
        Self::start(test_config(MetricsType::Noop)).await
    }

    pub async fn start(config: AppConfig) -> Self {
        // ---
        // Enable debug logging only when requested
        if std::env::var("TEST_DEBUG").is_ok() {
            tracing_subscriber::fmt()
                .with_env_filter("debug")
                .with_ansi(false)
                .try_init()
                .ok();
        }

        let app = create_app(config)
            .await
            .expect("Should be able to create router");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start
        sleep(Duration::from_millis(100)).await;

        Self {
            addr,
            client: Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        // ---
        format!("http://{}{}", self.addr, path)
    }

    /// API root as the client side expects it.
    pub fn api_root(&self) -> String {
        self.url("/api")
    }

    /// Registers a fresh account and returns its token.
    pub async fn register(&self, email: &str) -> String {
        // ---
        let response = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({
                "email": email,
                "password": "secret123",
                "firstName": "Jon",
                "lastName": "Snow"
            }))
            .send()
            .await
            .expect("Failed to register");

        assert_eq!(response.status(), 201);
        let body: Value = response.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }
}

pub fn character(url: &str, name: &str) -> Value {
    json!({
        "url": url,
        "name": name,
        "culture": "Northmen",
        "aliases": ["Lord Snow"]
    })
}
