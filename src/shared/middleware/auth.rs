use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::domains::auth::models::Role;
use crate::shared::errors::{ApiError, AuthError};
use crate::shared::services::AppState;

/// 인증된 사용자 (JWT 클레임에서 추출)
/// Caller identity taken from a verified access token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: u64,
    pub email: String,
    /// 출고 권한 정책에 사용
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// `Authorization: Bearer <token>` 에서 토큰 부분만 추출
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    match value.strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// 보호된 핸들러의 인자로 쓰면 토큰 검증 후 호출자를 주입
///
/// 실패 시 401 + `{"message", "error"}` (AuthError 변환 규칙)
#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = bearer_token(&parts.headers)
            .and_then(|token| state.auth_state.jwt_service.verify_access_token(token))
            .map_err(|e| {
                tracing::debug!(error = %e, "rejected bearer token");
                ApiError::from(e)
            })?;

        Ok(AuthenticatedUser {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(value) = value {
            map.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn bearer_token_extracts_the_token() {
        assert_eq!(bearer_token(&headers(Some("Bearer abc.def"))).unwrap(), "abc.def");
    }

    #[test]
    fn bearer_token_rejects_missing_and_malformed_headers() {
        assert!(matches!(bearer_token(&headers(None)), Err(AuthError::MissingToken)));
        assert!(matches!(
            bearer_token(&headers(Some("Basic dXNlcjpwYXNz"))),
            Err(AuthError::MalformedHeader)
        ));
        assert!(matches!(bearer_token(&headers(Some("Bearer "))), Err(AuthError::MalformedHeader)));
    }
}
