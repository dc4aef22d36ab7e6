use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use crate::domains::auth::models::user::UserResponse;

// 회원가입 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = SignupRequest)]
pub struct SignupRequest {
    /// Email address (login identifier)
    #[schema(example = "magasinier@example.com")]
    pub email: String,

    /// Password (argon2 해싱 후 저장)
    #[schema(example = "password123")]
    pub password: String,

    #[schema(example = "magasinier")]
    pub username: Option<String>,
}

// 회원가입 응답 모델
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = SignupResponse)]
pub struct SignupResponse {
    pub user: UserResponse,
    pub message: String,
}

// 로그인 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = SigninRequest)]
pub struct SigninRequest {
    #[schema(example = "magasinier@example.com")]
    pub email: String,

    #[schema(example = "password123")]
    pub password: String,
}

// 로그인 응답 모델
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = SigninResponse)]
pub struct SigninResponse {
    pub user: UserResponse,

    /// JWT Access Token (짧은 수명, Bearer 헤더로 전달)
    /// JWT access token (short lifetime, sent as Bearer header)
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,

    /// Refresh Token (긴 수명, DB에는 해시만 저장)
    /// Refresh token (long lifetime, only its hash is stored)
    #[schema(example = "abc123def456...")]
    pub refresh_token: String,

    pub message: String,
}

// 토큰 갱신 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = RefreshTokenRequest)]
pub struct RefreshTokenRequest {
    #[schema(example = "abc123def456...")]
    pub refresh_token: String,
}

// 토큰 갱신 응답 모델
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = RefreshTokenResponse)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub message: String,
}

// 로그아웃 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = LogoutRequest)]
pub struct LogoutRequest {
    #[schema(example = "abc123def456...")]
    pub refresh_token: String,
}
