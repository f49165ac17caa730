#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;
use workout_service::domain::token::ports::TokenServicePort;
use workout_service::domain::token::service::TokenService;
use workout_service::domain::user::service::UserService;
use workout_service::domain::workout::service::WorkoutService;
use workout_service::inbound::http::router::create_router;
use workout_service::outbound::repositories::InMemoryStore;

pub const PASSWORD: &str = "pass_word!";

/// Test application that spawns a real server over the in-memory store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<InMemoryStore>,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application with 24 hour tokens
    pub async fn spawn() -> Self {
        Self::spawn_with_token_ttl(chrono::Duration::hours(24)).await
    }

    /// Spawn the application with tokens of the given lifetime
    pub async fn spawn_with_token_ttl(token_ttl: chrono::Duration) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let token_service = Arc::new(TokenService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            password_hasher(),
            token_ttl,
        ));

        Self::serve(store, token_service, Duration::from_secs(30)).await
    }

    /// Spawn the application with a substitute token service
    pub async fn spawn_with_token_service(
        token_service: Arc<dyn TokenServicePort>,
        request_timeout: Duration,
    ) -> Self {
        Self::serve(Arc::new(InMemoryStore::new()), token_service, request_timeout).await
    }

    /// Spawn the application in a background task and return TestApp
    async fn serve(
        store: Arc<InMemoryStore>,
        token_service: Arc<dyn TokenServicePort>,
        request_timeout: Duration,
    ) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let user_service = Arc::new(UserService::new(Arc::clone(&store), password_hasher()));
        let workout_service = Arc::new(WorkoutService::new(Arc::clone(&store)));

        let router = create_router(user_service, token_service, workout_service, request_timeout);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            store,
            api_client: reqwest::Client::new(),
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

    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(format!("{}{}", self.address, path))
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    /// Register a user with [`PASSWORD`] and return the created user JSON
    pub async fn register(&self, username: &str) -> Value {
        let response = self
            .post("/users")
            .json(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": PASSWORD,
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.expect("Failed to parse response");
        body["user"].clone()
    }

    /// Log in and return the plaintext bearer token
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .post("/tokens/authentication")
            .json(&json!({ "username": username, "password": PASSWORD }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.expect("Failed to parse response");
        body["auth_token"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }

    /// Register then log in; returns (user id, token)
    pub async fn signed_in(&self, username: &str) -> (i64, String) {
        let user = self.register(username).await;
        let token = self.login(username).await;
        (user["id"].as_i64().expect("Missing user id"), token)
    }

    /// Create a workout as the token owner and return the workout JSON
    pub async fn create_workout(&self, token: &str, body: Value) -> Value {
        let response = self
            .post("/workouts")
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.expect("Failed to parse response");
        body["workout"].clone()
    }
}

/// Cheapest Argon2 parameters; hashing cost is not under test
fn password_hasher() -> auth::PasswordHasher {
    auth::PasswordHasher::with_params(8, 1, 1).expect("Failed to build hasher")
}

pub fn leg_day() -> Value {
    json!({
        "title": "Leg day",
        "description": "squats and lunges",
        "duration_minutes": 60,
        "calories_burned": 450,
        "entries": [
            { "exercise_name": "Squat", "sets": 5, "reps": 5, "weight": 100.0, "order_index": 1 },
            { "exercise_name": "Wall sit", "sets": 3, "duration_seconds": 45, "order_index": 0 }
        ]
    })
}
