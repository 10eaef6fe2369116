use std::sync::Arc;

use account_service::domain::account::service::AccountService;
use account_service::domain::account::service::DEFAULT_SESSION_TTL_HOURS;
use account_service::inbound::http::router::create_router;
use account_service::outbound::notifications::LoggingResetNotifier;
use account_service::outbound::repositories::InMemoryUserRepository;
use auth::Authenticator;
use auth::TokenIssuer;
use auth::WorkFactor;
use serde_json::json;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub repository: InMemoryUserRepository,
    pub api_client: reqwest::Client,
    pub token_issuer: TokenIssuer,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let address = format!("http://{}", listener.local_addr().unwrap());

        let repository = InMemoryUserRepository::new();

        // Cheap work factor keeps the suite fast; production uses Argon2 defaults
        let authenticator = Arc::new(
            Authenticator::with_work_factor(
                TEST_SECRET,
                WorkFactor {
                    memory_kib: 1024,
                    iterations: 1,
                    parallelism: 1,
                },
            )
            .expect("Failed to create authenticator"),
        );

        let account_service = Arc::new(AccountService::new(
            Arc::new(repository.clone()),
            Arc::new(LoggingResetNotifier::new()),
            Arc::clone(&authenticator),
            chrono::Duration::hours(DEFAULT_SESSION_TTL_HOURS),
        ));

        let router = create_router(account_service, authenticator);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            repository,
            api_client: reqwest::Client::new(),
            token_issuer: TokenIssuer::new(TEST_SECRET),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register an account and return the response
    pub async fn register(&self, username: &str, email: &str, password: &str) -> reqwest::Response {
        self.post("/auth/register")
            .json(&json!({
                "username": username,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the response
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/auth/login")
            .json(&json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register an account and return its assigned id
    pub async fn register_user_id(&self, username: &str, email: &str, password: &str) -> i64 {
        let body: serde_json::Value = self
            .register(username, email, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");

        body["data"]["id"]
            .as_i64()
            .expect("Register did not return an id")
    }

    /// Register, log in and return the session token
    pub async fn register_and_login(&self, username: &str, email: &str, password: &str) -> String {
        self.register(username, email, password).await;

        let body: serde_json::Value = self
            .login(email, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");

        body["data"]["token"]
            .as_str()
            .expect("Login did not return a token")
            .to_string()
    }
}
