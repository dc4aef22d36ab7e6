// Stock management API
// 자재 / 입고 / 출고 관리 서버

pub mod domains;
pub mod routes;
pub mod shared;

use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::routes::create_router;
use crate::shared::services::AppState;

// Import models for OpenAPI schema
use crate::domains::auth::models::*;
use crate::domains::stock::models::*;

// OpenAPI 스키마 정의: Swagger 문서 자동 생성
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::domains::auth::handlers::auth_handler::signup,
        crate::domains::auth::handlers::auth_handler::signin,
        crate::domains::auth::handlers::auth_handler::refresh,
        crate::domains::auth::handlers::auth_handler::logout,
        crate::domains::auth::handlers::auth_handler::get_me,
        crate::domains::stock::handlers::sortie_handler::list_sorties,
        crate::domains::stock::handlers::sortie_handler::get_sortie,
        crate::domains::stock::handlers::sortie_handler::create_sortie,
        crate::domains::stock::handlers::sortie_handler::update_sortie,
        crate::domains::stock::handlers::sortie_handler::delete_sortie,
        crate::domains::stock::handlers::materiel_handler::list_materiels,
        crate::domains::stock::handlers::materiel_handler::get_materiel,
        crate::domains::stock::handlers::materiel_handler::create_materiel,
        crate::domains::stock::handlers::reception_handler::list_receptions,
        crate::domains::stock::handlers::reception_handler::get_reception,
        crate::domains::stock::handlers::reception_handler::create_reception
    ),
    components(schemas(
        SignupRequest,
        SignupResponse,
        SigninRequest,
        SigninResponse,
        RefreshTokenRequest,
        RefreshTokenResponse,
        LogoutRequest,
        UserResponse,
        Role,
        Materiel,
        CreateMaterielRequest,
        MaterielResponse,
        CreateMaterielResponse,
        Reception,
        CreateReceptionRequest,
        ReceptionResponse,
        CreateReceptionResponse,
        Sortie,
        SortieWithUser,
        SortieRequest,
        SortieResponse,
        CreateSortieResponse,
        UpdateSortieResponse,
        MessageResponse
    )),
    modifiers(
        &SecurityAddon
    ),
    tags(
        (name = "Auth", description = "Authentication API endpoints"),
        (name = "Sorties", description = "Outgoing stock (withdrawals) with stock reconciliation"),
        (name = "Materiels", description = "Inventory items and their stock"),
        (name = "Receptions", description = "Incoming stock events")
    ),
    info(
        title = "Stock API Server",
        description = "Stock management API: materiels, receptions and sorties",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

// Security scheme 정의: Swagger UI에서 "Authorize" 버튼 추가
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

/// 전체 애플리케이션 라우터 (API + Swagger + 요청 트레이싱)
/// Full application router; CORS is layered on by the binary
pub fn build_app(app_state: AppState) -> Router {
    Router::new()
        .merge(create_router())
        .merge(
            SwaggerUi::new("/api")
                .url("/api-docs/openapi.json", ApiDoc::openapi())
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
