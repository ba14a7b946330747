use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use serde_json::json;
use time::Duration;

use super::helpers::{
    PASSWORD, Session, create_test_app, join_body, login, register, register_and_login,
    setup_test_db, test_request,
};

#[tokio::test]
async fn test_join_success() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);

    let res = register(&app, "alice").await;

    assert_eq!(res.code(), "201-1");
    assert_eq!(res.body["data"]["username"], "alice");
    assert_eq!(res.body["data"]["role"], "USER");
    assert!(res.body["data"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_join_validation_failure() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);

    let mut body = join_body("alice");
    body["username"] = json!("a");
    body["email"] = json!("not-an-email");

    let res = test_request(&app, "POST", "/api/v1/users", Some(body), None, &[]).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.code(), "400-1");
    let message = res.body["message"].as_str().unwrap();
    let lines: Vec<&str> = message.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("email-email-"));
    assert!(lines[1].starts_with("username-length-"));
}

#[tokio::test]
async fn test_join_duplicates_conflict() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);
    register(&app, "alice").await;

    let res = test_request(&app, "POST", "/api/v1/users", Some(join_body("alice")), None, &[]).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.code(), "409-1");

    let mut body = join_body("alicia");
    body["email"] = json!("alice@example.com");
    let res = test_request(&app, "POST", "/api/v1/users", Some(body), None, &[]).await;
    assert_eq!(res.code(), "409-2");
}

#[tokio::test]
async fn test_availability_checks() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);
    register(&app, "alice").await;

    let taken = test_request(&app, "GET", "/api/v1/users/check-username?username=alice", None, None, &[]).await;
    assert_eq!(taken.status, StatusCode::OK);
    assert_eq!(taken.body, json!(false));

    let free = test_request(&app, "GET", "/api/v1/users/check-email?email=bob@example.com", None, None, &[]).await;
    assert_eq!(free.body, json!(true));
}

#[tokio::test]
async fn test_login_sets_auth_cookies() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);
    register(&app, "alice").await;

    let res = login(&app, "alice").await;

    assert_eq!(res.code(), "200-1");
    assert_eq!(res.body["data"]["role"], "USER");
    for name in ["accessToken", "refreshToken", "apiKey"] {
        let cookie = res.cookie(name).unwrap_or_else(|| panic!("{name} not set"));
        assert!(!cookie.value().is_empty());
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }
}

#[tokio::test]
async fn test_login_wrong_password() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);
    register(&app, "alice").await;

    let res = test_request(
        &app,
        "POST",
        "/api/v1/users/login",
        Some(json!({ "username": "alice", "password": "wrong-password" })),
        None,
        &[],
    )
    .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.code(), "401-2");
    assert!(res.set_cookies().is_empty());
}

#[tokio::test]
async fn test_login_unknown_username() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);

    let res = test_request(
        &app,
        "POST",
        "/api/v1/users/login",
        Some(json!({ "username": "ghost", "password": PASSWORD })),
        None,
        &[],
    )
    .await;

    assert_eq!(res.code(), "401-7");
}

#[tokio::test]
async fn test_api_key_is_stable_across_logins() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);
    register(&app, "alice").await;

    let first = Session::from_login(&login(&app, "alice").await);
    let second = Session::from_login(&login(&app, "alice").await);

    assert_eq!(first.api_key, second.api_key);
    assert_ne!(first.refresh_token, second.refresh_token);
}

#[tokio::test]
async fn test_me_with_access_token_cookie() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);
    let session = register_and_login(&app, "alice").await;

    let res = test_request(
        &app,
        "GET",
        "/api/v1/users/me",
        None,
        None,
        &[("accessToken", session.access_token.as_str())],
    )
    .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["username"], "alice");
    assert!(res.headers.get(AUTHORIZATION).is_none());
}

#[tokio::test]
async fn test_me_without_credentials_is_unauthenticated() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);

    let res = test_request(&app, "GET", "/api/v1/users/me", None, None, &[]).await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.code(), "401-1");
}

#[tokio::test]
async fn test_api_key_in_authorization_header() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);
    let session = register_and_login(&app, "alice").await;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, format!("Bearer {}", session.api_key).parse().unwrap());
    let res = test_request(&app, "GET", "/api/v1/users/me", None, Some(headers), &[]).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["username"], "alice");
}

#[tokio::test]
async fn test_access_token_in_authorization_header_wins_over_api_key() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);
    let session = register_and_login(&app, "alice").await;

    // The api key segment is unknown; a store lookup on it would fail with 401-3.
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        format!("Bearer unknown-key {}", session.access_token).parse().unwrap(),
    );
    let res = test_request(&app, "GET", "/api/v1/orders", None, Some(headers), &[]).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.code(), "200-1");
    assert!(res.set_cookies().is_empty());
}

#[tokio::test]
async fn test_unknown_api_key_is_rejected() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, "Bearer not-a-key".parse().unwrap());
    let res = test_request(&app, "GET", "/api/v1/orders", None, Some(headers), &[]).await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.code(), "401-3");
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
    let res = test_request(&app, "GET", "/api/v1/orders", None, Some(headers), &[]).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.code(), "400-2");
}

#[tokio::test]
async fn test_invalid_access_token_is_renewed_from_refresh_token() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);
    let session = register_and_login(&app, "alice").await;

    let res = test_request(
        &app,
        "GET",
        "/api/v1/users/me",
        None,
        None,
        &[
            ("accessToken", "garbage.token.value"),
            ("refreshToken", session.refresh_token.as_str()),
        ],
    )
    .await;

    assert_eq!(res.status, StatusCode::OK);
    let renewed = res.cookie_value("accessToken");
    assert!(!renewed.is_empty());
    assert_eq!(
        res.headers.get(AUTHORIZATION).unwrap().to_str().unwrap(),
        format!("Bearer {renewed}")
    );

    // The renewed token works on its own.
    let res = test_request(&app, "GET", "/api/v1/users/me", None, None, &[("accessToken", renewed.as_str())]).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_replaced_refresh_token_clears_all_cookies() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);
    let stale = register_and_login(&app, "alice").await;
    login(&app, "alice").await;

    let res = test_request(
        &app,
        "GET",
        "/api/v1/users/me",
        None,
        None,
        &[("refreshToken", stale.refresh_token.as_str())],
    )
    .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.code(), "401-4");
    for name in ["accessToken", "refreshToken", "apiKey"] {
        let cookie = res.cookie(name).unwrap_or_else(|| panic!("{name} not cleared"));
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}

#[tokio::test]
async fn test_unparseable_refresh_token_clears_only_refresh_cookie() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);

    let res = test_request(
        &app,
        "GET",
        "/api/v1/orders",
        None,
        None,
        &[("refreshToken", "not-a-jwt")],
    )
    .await;

    assert_eq!(res.code(), "401-6");
    assert_eq!(res.cookie("refreshToken").unwrap().value(), "");
    assert!(res.cookie("accessToken").is_none());
    assert!(res.cookie("apiKey").is_none());
}

#[tokio::test]
async fn test_token_refresh_endpoint() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);
    let session = register_and_login(&app, "alice").await;

    let res = test_request(
        &app,
        "POST",
        "/api/v1/users/token/refresh",
        None,
        None,
        &[("refreshToken", session.refresh_token.as_str())],
    )
    .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["username"], "alice");
    assert!(!res.cookie_value("accessToken").is_empty());
}

#[tokio::test]
async fn test_token_refresh_without_cookie() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);

    let res = test_request(&app, "POST", "/api/v1/users/token/refresh", None, None, &[]).await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.code(), "401-8");
}

#[tokio::test]
async fn test_logout_invalidates_refresh_token() {
    let pool = setup_test_db().await;
    let app = create_test_app(pool);
    let session = register_and_login(&app, "alice").await;

    let res = test_request(&app, "DELETE", "/api/v1/users/logout", None, None, &session.cookies()).await;

    assert_eq!(res.status, StatusCode::OK);
    for name in ["accessToken", "refreshToken", "apiKey"] {
        assert_eq!(res.cookie(name).unwrap().max_age(), Some(Duration::ZERO));
    }

    let res = test_request(
        &app,
        "POST",
        "/api/v1/users/token/refresh",
        None,
        None,
        &[("refreshToken", session.refresh_token.as_str())],
    )
    .await;
    assert_eq!(res.code(), "401-4");
}
