use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::domains::auth::models::{
    LogoutRequest, RefreshTokenRequest, RefreshTokenResponse, SigninRequest, SigninResponse,
    SignupRequest, SignupResponse, UserResponse,
};
use crate::domains::auth::services::AuthService;
use crate::domains::stock::models::MessageResponse;
use crate::shared::errors::{json_body, ApiError, AuthError};
use crate::shared::middleware::auth::AuthenticatedUser;
use crate::shared::services::AppState;

// =====================================================
// Auth Handler
// =====================================================
// 본문은 모두 `json_body` 를 거치므로 형식이 틀리면 400,
// 서비스 오류는 AuthError 변환 규칙 (400 / 401 / 500) 을 따름
// =====================================================

fn auth_service(app_state: &AppState) -> &AuthService {
    &app_state.auth_state.auth_service
}

fn into_api_error(err: AuthError) -> ApiError {
    err.into()
}

/// 회원가입 (역할은 항상 `user`)
/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Compte créé", body = SignupResponse),
        (status = 400, description = "Invalid body, invalid input or email already used"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn signup(
    State(app_state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<SignupResponse>, ApiError> {
    let request = json_body(payload)?;

    let user = auth_service(&app_state)
        .signup(request)
        .await
        .map_err(into_api_error)?;

    Ok(Json(SignupResponse {
        user: user.into(),
        message: "Compte créé avec succès".to_string(),
    }))
}

/// 로그인: access token + refresh token 발급 (이전 refresh token 은 무효화)
#[utoipa::path(
    post,
    path = "/api/auth/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Connexion réussie", body = SigninResponse),
        (status = 400, description = "Invalid body"),
        (status = 401, description = "Invalid email or password"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn signin(
    State(app_state): State<AppState>,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> Result<Json<SigninResponse>, ApiError> {
    let request = json_body(payload)?;
    let service = auth_service(&app_state);

    let (user, refresh_token) = service.signin(request).await.map_err(into_api_error)?;
    let access_token = service.issue_access_token(&user).map_err(into_api_error)?;

    Ok(Json(SigninResponse {
        user: user.into(),
        access_token,
        refresh_token,
        message: "Connexion réussie".to_string(),
    }))
}

/// Refresh token 회전
/// Rotate a refresh token
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Jetons renouvelés", body = RefreshTokenResponse),
        (status = 400, description = "Invalid body"),
        (status = 401, description = "Invalid or expired refresh token"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn refresh(
    State(app_state): State<AppState>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<Json<RefreshTokenResponse>, ApiError> {
    let request = json_body(payload)?;

    let (access_token, refresh_token) = auth_service(&app_state)
        .refresh_access_token(&request.refresh_token)
        .await
        .map_err(into_api_error)?;

    Ok(Json(RefreshTokenResponse {
        access_token,
        refresh_token,
        message: "Jetons renouvelés avec succès".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    request_body = LogoutRequest,
    responses(
        (status = 200, description = "Déconnexion réussie", body = MessageResponse),
        (status = 400, description = "Invalid body"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn logout(
    State(app_state): State<AppState>,
    payload: Result<Json<LogoutRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let request = json_body(payload)?;

    auth_service(&app_state)
        .logout(&request.refresh_token)
        .await
        .map_err(into_api_error)?;

    Ok(Json(MessageResponse {
        message: "Déconnexion réussie".to_string(),
    }))
}

/// 현재 사용자 정보
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Auth"
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    caller: AuthenticatedUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = auth_service(&app_state)
        .get_user_info(caller.user_id)
        .await
        .map_err(into_api_error)?;

    Ok(Json(user.into()))
}
