use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use super::{into_api_error, json_body, ApiError};
use crate::domains::stock::models::{
    CreateMaterielRequest, CreateMaterielResponse, Materiel, MaterielResponse,
};
use crate::shared::middleware::auth::AuthenticatedUser;
use crate::shared::services::AppState;

/// 자재 목록 조회
/// List materiels
#[utoipa::path(
    get,
    path = "/api/materiels",
    responses(
        (status = 200, description = "All materiels with their stock", body = Vec<Materiel>)
    ),
    tag = "Materiels"
)]
pub async fn list_materiels(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Materiel>>, ApiError> {
    let materiels = app_state
        .stock_state
        .materiel_service
        .list()
        .await
        .map_err(into_api_error)?;

    Ok(Json(materiels))
}

#[utoipa::path(
    get,
    path = "/api/materiels/{code_materiel}",
    params(
        ("code_materiel" = String, Path, description = "CodeMateriel")
    ),
    responses(
        (status = 200, description = "Materiel found", body = MaterielResponse),
        (status = 404, description = "Matériel non trouvé.")
    ),
    tag = "Materiels"
)]
pub async fn get_materiel(
    State(app_state): State<AppState>,
    Path(code_materiel): Path<String>,
) -> Result<Json<MaterielResponse>, ApiError> {
    let materiel = app_state
        .stock_state
        .materiel_service
        .show(&code_materiel)
        .await
        .map_err(into_api_error)?;

    Ok(Json(MaterielResponse { materiel }))
}

/// 자재 생성 (초기 재고)
/// Create a materiel with its initial stock
#[utoipa::path(
    post,
    path = "/api/materiels",
    request_body = CreateMaterielRequest,
    responses(
        (status = 200, description = "Materiel created", body = CreateMaterielResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized (authentication required)")
    ),
    tag = "Materiels",
    security(
        ("BearerAuth" = [])
    )
)]
pub async fn create_materiel(
    State(app_state): State<AppState>,
    _actor: AuthenticatedUser,
    payload: Result<Json<CreateMaterielRequest>, JsonRejection>,
) -> Result<Json<CreateMaterielResponse>, ApiError> {
    let request = json_body(payload)?;

    let materiel = app_state
        .stock_state
        .materiel_service
        .create(&request)
        .await
        .map_err(into_api_error)?;

    Ok(Json(CreateMaterielResponse {
        message: "Matériel créé avec succès".to_string(),
        materiel,
    }))
}
