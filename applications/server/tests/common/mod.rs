//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use pulse_core::{CreateUser, MetadataReader, UserId};
use pulse_metadata::LoftyMetadataReader;
use pulse_server::{
    api,
    config::ServerConfig,
    services::{AuthService, MediaStore},
    state::AppState,
};
use serde_json::Value;
use sqlx::SqlitePool;
use std::{path::PathBuf, sync::Arc};
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Lowest bcrypt cost, keeps tests fast
pub const TEST_BCRYPT_COST: u32 = 4;

pub const TEST_SECRET: &str = "test-secret-key";

pub const MULTIPART_BOUNDARY: &str = "pulse-test-boundary";

/// Create an auth service with test settings
pub fn create_test_auth_service() -> AuthService {
    AuthService::new(TEST_SECRET.to_string(), 1, TEST_BCRYPT_COST)
}

/// Full application over a temp-file database and temp media directories
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub media: Arc<MediaStore>,
    pub auth_service: Arc<AuthService>,
    pub uploads_path: PathBuf,
    pub library_path: PathBuf,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_metadata_reader(Arc::new(LoftyMetadataReader::new())).await
    }

    /// Same as `new` but with a custom tag reader
    pub async fn with_metadata_reader(metadata: Arc<dyn MetadataReader>) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

        let pool = pulse_storage::create_pool(&db_url).await.unwrap();
        pulse_storage::run_migrations(&pool).await.unwrap();

        let uploads_path = temp_dir.path().join("uploads");
        let library_path = temp_dir.path().join("library");
        let media = Arc::new(MediaStore::new(uploads_path.clone(), library_path.clone()));
        media.initialize().await.unwrap();

        let auth_service = Arc::new(create_test_auth_service());

        let mut config = ServerConfig::default();
        config.auth.jwt_secret = TEST_SECRET.to_string();
        config.auth.bcrypt_cost = TEST_BCRYPT_COST;
        config.server.web_dir = temp_dir.path().join("web");

        let app_state = AppState::new(
            pool.clone(),
            Arc::clone(&auth_service),
            Arc::clone(&media),
            metadata,
        );
        let router = api::create_router(app_state, &config);

        Self {
            router,
            pool,
            media,
            auth_service,
            uploads_path,
            library_path,
            _temp_dir: temp_dir,
        }
    }

    /// Send a request, returning status and JSON body (Null when not JSON)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request(Method::GET, uri, token, Body::empty()))
            .await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request(Method::DELETE, uri, token, Body::empty()))
            .await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(json_request(Method::POST, uri, token, &body)).await
    }

    pub async fn patch_json(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(json_request(Method::PATCH, uri, token, &body)).await
    }

    /// POST a multipart body with one `file` field per entry
    pub async fn upload(&self, uri: &str, token: &str, files: &[(&str, &[u8])]) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(Body::from(multipart_body(files)))
            .unwrap();
        self.send(request).await
    }

    /// Register through the API and return a session token
    pub async fn register_and_login(&self, username: &str, password: &str) -> String {
        let email = format!("{username}@example.com");
        let (status, _) = self
            .post_json(
                "/api/register",
                None,
                serde_json::json!({ "username": username, "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "registration of {username} failed");

        self.login(&email, password).await
    }

    /// Create an admin directly in storage and return a session token
    pub async fn create_admin(&self, username: &str) -> (UserId, String) {
        let password = "admin-password";
        let email = format!("{username}@example.com");
        let user = pulse_storage::users::create(
            &self.pool,
            CreateUser {
                username: username.to_string(),
                email: email.clone(),
                password_hash: self.auth_service.hash_password(password).unwrap(),
                is_admin: true,
            },
        )
        .await
        .unwrap();

        (user.id, self.login(&email, password).await)
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .post_json(
                "/api/login",
                None,
                serde_json::json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login of {email} failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Id of the user behind a token
    pub async fn user_id(&self, token: &str) -> UserId {
        let (_, body) = self.get("/api/me", Some(token)).await;
        body["id"].as_i64().unwrap()
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(body).unwrap()
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Encode files as multipart/form-data under [`MULTIPART_BOUNDARY`]
pub fn multipart_body(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, data) in files {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

/// Bytes that are not a decodable audio file
pub const FAKE_AUDIO: &[u8] = b"not really audio, metadata falls back";
