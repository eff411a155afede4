#![allow(dead_code)]

use std::net::TcpListener;

use chirpy::configuration::{ApplicationSettings, AuthSettings};
use chirpy::startup::run;
use chirpy::state::AppState;
use chirpy::store::MemoryStore;
use serde_json::{json, Value};

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-chars";
pub const TEST_POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub store: MemoryStore,
}

pub struct LoggedIn {
    pub id: String,
    pub token: String,
    pub refresh_token: String,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_on_platform("dev").await
}

pub async fn spawn_app_on_platform(platform: &str) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let store = MemoryStore::new();
    let state = AppState::new(
        AuthSettings {
            secret: TEST_SECRET.to_string(),
            polka_key: TEST_POLKA_KEY.to_string(),
        },
        ApplicationSettings {
            host: "127.0.0.1".to_string(),
            port,
            platform: platform.to_string(),
            static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/public").to_string(),
        },
        store.clone(),
    );

    let server = run(listener, state).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        client: reqwest::Client::new(),
        store,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn create_user(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/users"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Register and log in, returning the issued credentials
    pub async fn signed_up(&self, email: &str, password: &str) -> LoggedIn {
        let created = self.create_user(email, password).await;
        assert_eq!(201, created.status().as_u16());

        let response = self.login(email, password).await;
        assert_eq!(200, response.status().as_u16());
        let body: Value = response.json().await.expect("Failed to parse response");

        LoggedIn {
            id: body["user_id"].as_str().unwrap().to_string(),
            token: body["token"].as_str().unwrap().to_string(),
            refresh_token: body["refresh_token"].as_str().unwrap().to_string(),
        }
    }

    pub async fn post_with_bearer(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn create_chirp(&self, token: &str, body: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/chirps"))
            .bearer_auth(token)
            .json(&json!({ "body": body }))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
