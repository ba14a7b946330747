use std::sync::Once;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
};
use cookie::{Cookie, SameSite};
use serde_json::{Value, json};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use tower::ServiceExt;
use tracing::{Level, info};
use tracing_subscriber::fmt::format::FmtSpan;

use crate::{
    AppState,
    config::{AppConfig, CookieConfig, JwtConfig},
    models::{
        product::{Product, ProductFields},
        user::Role,
    },
    services::auth_service::JoinRequest,
};

static INIT: Once = Once::new();

pub const PASSWORD: &str = "password123";

/// Initialize logging exactly once
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_target(false)
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_max_level(Level::ERROR)
            .with_span_events(FmtSpan::NONE)
            .init();
    });
}

/// Each in-memory connection is its own database, so the pool is pinned to
/// one connection that never gets recycled.
pub async fn setup_test_db() -> SqlitePool {
    init_tracing();

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    crate::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn test_config() -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".into(),
        database_url: "sqlite::memory:".into(),
        jwt: JwtConfig {
            secret: "test-secret".into(),
            access_ttl_secs: 1200,
            refresh_ttl_secs: 604800,
        },
        cookies: CookieConfig {
            secure: false,
            same_site: SameSite::Lax,
            max_age_secs: 3600,
        },
        bcrypt_cost: 4,
        init_admin: None,
    }
}

pub fn test_state(pool: SqlitePool) -> AppState {
    AppState::new(pool, test_config())
}

pub fn create_test_app(pool: SqlitePool) -> Router {
    crate::create_router(test_state(pool))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub headers: HeaderMap,
}

impl TestResponse {
    pub fn code(&self) -> &str {
        self.body["resultCode"].as_str().unwrap_or_default()
    }

    /// Cookies the server set (or expired) on this response.
    pub fn set_cookies(&self) -> Vec<Cookie<'static>> {
        self.headers
            .get_all("set-cookie")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|s| Cookie::parse(s.to_string()).ok())
            .collect()
    }

    pub fn cookie(&self, name: &str) -> Option<Cookie<'static>> {
        self.set_cookies().into_iter().rev().find(|c| c.name() == name)
    }

    pub fn cookie_value(&self, name: &str) -> String {
        self.cookie(name)
            .map(|c| c.value().to_string())
            .unwrap_or_default()
    }
}

pub async fn test_request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    headers: Option<HeaderMap>,
    cookies: &[(&str, &str)],
) -> TestResponse {
    info!(method = %method, uri = %uri, "Making test request");

    let body = match body {
        Some(json) => Body::from(serde_json::to_string(&json).unwrap()),
        None => Body::empty(),
    };

    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    if !cookies.is_empty() {
        let cookie_header = cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");
        request = request.header("cookie", cookie_header);
    }

    if let Some(custom_headers) = headers {
        for (key, value) in custom_headers.iter() {
            request = request.header(key, value);
        }
    }

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    info!(status = %status, body = %body, "Test response received");
    TestResponse {
        status,
        body,
        headers,
    }
}

pub fn join_body(username: &str) -> Value {
    json!({
        "username": username,
        "password": PASSWORD,
        "nickname": format!("{username}-nick"),
        "email": format!("{username}@example.com"),
        "address": "1 Main Street"
    })
}

pub async fn register(app: &Router, username: &str) -> TestResponse {
    let res = test_request(app, "POST", "/api/v1/users", Some(join_body(username)), None, &[]).await;
    assert_eq!(res.status, StatusCode::CREATED, "join failed: {}", res.body);
    res
}

pub async fn login(app: &Router, username: &str) -> TestResponse {
    let res = test_request(
        app,
        "POST",
        "/api/v1/users/login",
        Some(json!({ "username": username, "password": PASSWORD })),
        None,
        &[],
    )
    .await;
    assert_eq!(res.status, StatusCode::OK, "login failed: {}", res.body);
    res
}

/// The three auth cookies from a login response, ready to send back.
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub api_key: String,
}

impl Session {
    pub fn from_login(res: &TestResponse) -> Self {
        Self {
            access_token: res.cookie_value("accessToken"),
            refresh_token: res.cookie_value("refreshToken"),
            api_key: res.cookie_value("apiKey"),
        }
    }

    pub fn access(&self) -> [(&str, &str); 1] {
        [("accessToken", self.access_token.as_str())]
    }

    pub fn cookies(&self) -> [(&str, &str); 3] {
        [
            ("accessToken", self.access_token.as_str()),
            ("refreshToken", self.refresh_token.as_str()),
            ("apiKey", self.api_key.as_str()),
        ]
    }
}

pub async fn register_and_login(app: &Router, username: &str) -> Session {
    register(app, username).await;
    Session::from_login(&login(app, username).await)
}

pub async fn admin_session(app: &Router, pool: &SqlitePool) -> Session {
    test_state(pool.clone())
        .auth_service()
        .create_user(
            JoinRequest {
                username: "admin",
                password: PASSWORD,
                nickname: "Admin",
                email: "admin@example.com",
                address: "HQ",
            },
            Role::Admin,
        )
        .await
        .expect("Failed to create admin");
    Session::from_login(&login(app, "admin").await)
}

pub async fn seed_product(pool: &SqlitePool, name: &str) -> i64 {
    Product::create(
        pool,
        ProductFields {
            name,
            price: 1500,
            description: "A fine product",
            stock: 10,
        },
    )
    .await
    .expect("Failed to seed product")
    .id
}
