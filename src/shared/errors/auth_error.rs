use axum::{http::StatusCode, Json};
use serde_json::json;
use thiserror::Error;

/// 인증 관련 에러
/// Authentication-related errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Cette adresse e-mail est déjà utilisée.")]
    EmailAlreadyExists { email: String },

    #[error("E-mail ou mot de passe incorrect.")]
    InvalidCredentials,

    /// 회원가입 입력값 오류
    #[error("{0}")]
    InvalidInput(String),

    #[error("Échec du hachage du mot de passe : {0}")]
    PasswordHashingFailed(String),

    #[error("Échec de la vérification du mot de passe : {0}")]
    PasswordVerificationFailed(String),

    #[error("Erreur de base de données : {0}")]
    DatabaseError(String),

    #[error("Erreur interne : {0}")]
    Internal(String),

    /// 잘못된 또는 만료된 토큰
    #[error("Jeton invalide ou expiré.")]
    InvalidToken,

    #[error("Jeton d'authentification manquant.")]
    MissingToken,

    /// Authorization 헤더가 "Bearer <token>" 형식이 아님
    #[error("En-tête d'autorisation invalide, format attendu : Bearer <jeton>.")]
    MalformedHeader,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::EmailAlreadyExists { .. } | AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::MissingToken
            | AuthError::MalformedHeader => StatusCode::UNAUTHORIZED,
            AuthError::PasswordHashingFailed(_)
            | AuthError::PasswordVerificationFailed(_)
            | AuthError::DatabaseError(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// AuthError를 HTTP 응답으로 변환
///
/// 4xx 는 `message` + `error` 에 같은 문구, 5xx 는 내부 내용을 숨김
impl From<AuthError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: AuthError) -> Self {
        let status = err.status();
        if status.is_server_error() {
            tracing::error!(error = %err, "auth request failed");
            return (status, Json(json!({ "error": "Erreur interne du serveur" })));
        }

        let message = err.to_string();
        (status, Json(json!({ "message": message, "error": message })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_expose_their_message() {
        let (status, Json(body)): (StatusCode, Json<serde_json::Value>) = AuthError::MissingToken.into();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Jeton d'authentification manquant.");
        assert_eq!(body["message"], body["error"]);
    }

    #[test]
    fn server_errors_hide_details() {
        let (status, Json(body)): (StatusCode, Json<serde_json::Value>) =
            AuthError::DatabaseError("connection refused".to_string()).into();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Erreur interne du serveur");
        assert!(body.get("message").is_none());
    }
}
