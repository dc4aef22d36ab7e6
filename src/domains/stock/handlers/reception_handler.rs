use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use super::{into_api_error, json_body, ApiError};
use crate::domains::stock::models::{
    CreateReceptionRequest, CreateReceptionResponse, Reception, ReceptionResponse,
};
use crate::shared::middleware::auth::AuthenticatedUser;
use crate::shared::services::AppState;

#[utoipa::path(
    get,
    path = "/api/receptions",
    responses(
        (status = 200, description = "All receptions", body = Vec<Reception>)
    ),
    tag = "Receptions"
)]
pub async fn list_receptions(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Reception>>, ApiError> {
    let receptions = app_state
        .stock_state
        .reception_service
        .list()
        .await
        .map_err(into_api_error)?;

    Ok(Json(receptions))
}

#[utoipa::path(
    get,
    path = "/api/receptions/{bon_reception}",
    params(
        ("bon_reception" = String, Path, description = "BonReception")
    ),
    responses(
        (status = 200, description = "Reception found", body = ReceptionResponse),
        (status = 404, description = "Réception non trouvée")
    ),
    tag = "Receptions"
)]
pub async fn get_reception(
    State(app_state): State<AppState>,
    Path(bon_reception): Path<String>,
) -> Result<Json<ReceptionResponse>, ApiError> {
    let reception = app_state
        .stock_state
        .reception_service
        .show(&bon_reception)
        .await
        .map_err(into_api_error)?;

    Ok(Json(ReceptionResponse { reception }))
}

/// 입고 등록 (재고 수량은 변경하지 않음)
/// Record a reception
#[utoipa::path(
    post,
    path = "/api/receptions",
    request_body = CreateReceptionRequest,
    responses(
        (status = 200, description = "Reception recorded", body = CreateReceptionResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized (authentication required)")
    ),
    tag = "Receptions",
    security(
        ("BearerAuth" = [])
    )
)]
pub async fn create_reception(
    State(app_state): State<AppState>,
    actor: AuthenticatedUser,
    payload: Result<Json<CreateReceptionRequest>, JsonRejection>,
) -> Result<Json<CreateReceptionResponse>, ApiError> {
    let request = json_body(payload)?;

    let reception = app_state
        .stock_state
        .reception_service
        .create(&actor, &request)
        .await
        .map_err(into_api_error)?;

    Ok(Json(CreateReceptionResponse {
        message: "Réception créée avec succès".to_string(),
        reception,
    }))
}
