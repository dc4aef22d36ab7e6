// =====================================================
// 인증 HTTP API 통합 테스트
// =====================================================
// DB 에 닿기 전에 끝나는 경로만 검증합니다
// (본문 형식 오류, 입력값 검사, 토큰 누락).
// =====================================================

mod common;
use common::*;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use stock_api::build_app;

async fn post(app: &Router, uri: &str, content_type: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn app() -> Router {
    let ctx = setup().await;
    build_app(ctx.state)
}

#[tokio::test]
async fn test_signup_with_missing_fields_is_bad_request() {
    let app = app().await;

    let (status, body) = post(&app, "/api/auth/signup", "application/json", "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Corps de requête JSON invalide.");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_auth_bodies_reject_malformed_json_and_wrong_content_type() {
    let app = app().await;

    for uri in ["/api/auth/signin", "/api/auth/refresh", "/api/auth/logout"] {
        let (status, body) = post(&app, uri, "application/json", "{ not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["message"].is_string(), "{}", uri);
    }

    let (status, body) = post(&app, "/api/auth/signin", "text/plain", "email=a").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_signup_input_checks_run_before_storage() {
    let app = app().await;

    let (status, body) = post(
        &app,
        "/api/auth/signup",
        "application/json",
        r#"{"email":"user@example.com","password":"court"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Le mot de passe doit contenir au moins 8 caractères."
    );
}

#[tokio::test]
async fn test_me_requires_bearer_token() {
    let app = app().await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/auth/me")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Jeton d'authentification manquant.");

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
