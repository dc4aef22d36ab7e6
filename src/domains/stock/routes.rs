use axum::{
    routing::{get, put},
    Router,
};
use crate::shared::services::AppState;

use super::handlers;

/// 출고 라우터 생성
/// Create sortie router
///
/// # Routes
/// - `GET    /api/sorties` - 출고 목록
/// - `POST   /api/sorties` - 출고 생성 (재고 차감)
/// - `GET    /api/sorties/:bon_sortie` - 출고 조회
/// - `PUT    /api/sorties/:bon_sortie` - 출고 수정 (재고 재정산)
/// - `PATCH  /api/sorties/:bon_sortie` - PUT 과 동일
/// - `DELETE /api/sorties/:bon_sortie` - 출고 삭제 (재고 복원)
pub fn create_sortie_router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sorties).post(handlers::create_sortie))
        .route(
            "/:bon_sortie",
            put(handlers::update_sortie)
                .patch(handlers::update_sortie)
                .get(handlers::get_sortie)
                .delete(handlers::delete_sortie),
        )
}

/// 자재 라우터 생성
/// - `GET  /api/materiels`
/// - `POST /api/materiels`
/// - `GET  /api/materiels/:code_materiel`
pub fn create_materiel_router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_materiels).post(handlers::create_materiel))
        .route("/:code_materiel", get(handlers::get_materiel))
}

/// 입고 라우터 생성
/// - `GET  /api/receptions`
/// - `POST /api/receptions`
/// - `GET  /api/receptions/:bon_reception`
pub fn create_reception_router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_receptions).post(handlers::create_reception))
        .route("/:bon_reception", get(handlers::get_reception))
}
