// Routes module: 라우팅 설정
// 역할: 모든 도메인의 라우터를 조합
// Routes module: combines all domain routers

use axum::{routing::get, Json, Router};
use serde_json::json;
use crate::shared::services::AppState;

// 각 도메인의 routes import
use crate::domains::auth::routes::create_auth_router;
use crate::domains::stock::routes::{
    create_materiel_router, create_reception_router, create_sortie_router,
};

/// Create main router (combines all domain routers)
/// 메인 라우터 생성 (모든 도메인 라우터 조합)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", create_auth_router())
        .nest("/api/sorties", create_sortie_router())
        .nest("/api/materiels", create_materiel_router())
        .nest("/api/receptions", create_reception_router())
}

/// Liveness check
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
