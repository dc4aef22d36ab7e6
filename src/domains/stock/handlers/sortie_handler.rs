use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use super::{into_api_error, json_body, ApiError};
use crate::domains::stock::models::{
    CreateSortieResponse, MessageResponse, SortieRequest, SortieResponse, SortieWithUser,
    UpdateSortieResponse,
};
use crate::shared::middleware::auth::AuthenticatedUser;
use crate::shared::services::AppState;

// =====================================================
// Sortie Handler
// =====================================================
// HTTP Request → Handler → SortieService → StockStore → Response
// =====================================================

/// 출고 목록 조회
/// List sorties
#[utoipa::path(
    get,
    path = "/api/sorties",
    responses(
        (status = 200, description = "All sorties with their owner", body = Vec<SortieWithUser>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Sorties"
)]
pub async fn list_sorties(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<SortieWithUser>>, ApiError> {
    let sorties = app_state
        .stock_state
        .sortie_service
        .list()
        .await
        .map_err(into_api_error)?;

    Ok(Json(sorties))
}

/// 출고 단건 조회
/// Get one sortie
#[utoipa::path(
    get,
    path = "/api/sorties/{bon_sortie}",
    params(
        ("bon_sortie" = String, Path, description = "BonSortie")
    ),
    responses(
        (status = 200, description = "Sortie found", body = SortieResponse),
        (status = 404, description = "Sortie non trouvée")
    ),
    tag = "Sorties"
)]
pub async fn get_sortie(
    State(app_state): State<AppState>,
    Path(bon_sortie): Path<String>,
) -> Result<Json<SortieResponse>, ApiError> {
    let sortie = app_state
        .stock_state
        .sortie_service
        .show(&bon_sortie)
        .await
        .map_err(into_api_error)?;

    Ok(Json(SortieResponse { sortie }))
}

/// 출고 생성 (재고 차감)
/// Create a sortie and withdraw its quantity
///
/// # Response
/// - 200: 생성 성공 (`sortie`, `user`)
/// - 400: 검증 실패 / 재고 부족
/// - 401: 인증 실패
/// - 404: 자재 없음
#[utoipa::path(
    post,
    path = "/api/sorties",
    request_body = SortieRequest,
    responses(
        (status = 200, description = "Sortie created", body = CreateSortieResponse),
        (status = 400, description = "Validation failed or insufficient stock"),
        (status = 401, description = "Unauthorized (authentication required)"),
        (status = 404, description = "Materiel not found")
    ),
    tag = "Sorties",
    security(
        ("BearerAuth" = [])
    )
)]
pub async fn create_sortie(
    State(app_state): State<AppState>,
    actor: AuthenticatedUser,
    payload: Result<Json<SortieRequest>, JsonRejection>,
) -> Result<Json<CreateSortieResponse>, ApiError> {
    let request = json_body(payload)?;

    let created = app_state
        .stock_state
        .sortie_service
        .create(&actor, &request)
        .await
        .map_err(into_api_error)?;

    Ok(Json(CreateSortieResponse {
        sortie: created.sortie,
        user: created.user,
    }))
}

/// 출고 수정 (재고 재정산). PUT/PATCH 모두 전체 필드 필요
/// Update a sortie and re-apply its withdrawal
#[utoipa::path(
    put,
    path = "/api/sorties/{bon_sortie}",
    params(
        ("bon_sortie" = String, Path, description = "BonSortie")
    ),
    request_body = SortieRequest,
    responses(
        (status = 200, description = "Sortie mise à jour avec succès", body = UpdateSortieResponse),
        (status = 400, description = "Validation failed or insufficient stock"),
        (status = 401, description = "Unauthorized (authentication required)"),
        (status = 403, description = "Not the owner of the sortie"),
        (status = 404, description = "Sortie non trouvée")
    ),
    tag = "Sorties",
    security(
        ("BearerAuth" = [])
    )
)]
pub async fn update_sortie(
    State(app_state): State<AppState>,
    actor: AuthenticatedUser,
    Path(bon_sortie): Path<String>,
    payload: Result<Json<SortieRequest>, JsonRejection>,
) -> Result<Json<UpdateSortieResponse>, ApiError> {
    let request = json_body(payload)?;

    let sortie = app_state
        .stock_state
        .sortie_service
        .update(&actor, &bon_sortie, &request)
        .await
        .map_err(into_api_error)?;

    Ok(Json(UpdateSortieResponse {
        message: "Sortie mise à jour avec succès".to_string(),
        sortie,
    }))
}

/// 출고 삭제 (재고 복원)
/// Delete a sortie and restore its quantity
#[utoipa::path(
    delete,
    path = "/api/sorties/{bon_sortie}",
    params(
        ("bon_sortie" = String, Path, description = "BonSortie")
    ),
    responses(
        (status = 200, description = "Sortie supprimée avec succès", body = MessageResponse),
        (status = 401, description = "Unauthorized (authentication required)"),
        (status = 403, description = "Not the owner of the sortie"),
        (status = 404, description = "Sortie non trouvée")
    ),
    tag = "Sorties",
    security(
        ("BearerAuth" = [])
    )
)]
pub async fn delete_sortie(
    State(app_state): State<AppState>,
    actor: AuthenticatedUser,
    Path(bon_sortie): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    app_state
        .stock_state
        .sortie_service
        .delete(&actor, &bon_sortie)
        .await
        .map_err(into_api_error)?;

    Ok(Json(MessageResponse {
        message: "Sortie supprimée avec succès".to_string(),
    }))
}
