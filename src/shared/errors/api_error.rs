use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use serde_json::json;

/// 핸들러 공통 에러 응답 (상태 코드 + JSON 본문)
pub type ApiError = (StatusCode, Json<serde_json::Value>);

/// 잘못된 JSON 본문은 400 으로 응답
/// Malformed, incomplete or non-JSON bodies are answered with 400
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "rejected request body");
            Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "Corps de requête JSON invalide.", "error": rejection.body_text() })),
            ))
        }
    }
}
