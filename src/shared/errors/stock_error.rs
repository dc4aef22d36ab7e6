use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde_json::json;

use crate::domains::stock::policy::SortieAction;
use crate::domains::stock::validation::ValidationErrors;

/// 재고 도메인 에러 (자재/입고/출고)
/// Stock domain errors (materiels, receptions, sorties)
#[derive(Error, Debug)]
pub enum StockError {
    /// 필드 검증 실패 (400)
    #[error("{}", .0.first_message().unwrap_or("Données invalides."))]
    Validation(ValidationErrors),

    #[error("Sortie non trouvée")]
    SortieNotFound { bon_sortie: String },

    #[error("Matériel non trouvé.")]
    MaterielNotFound { code_materiel: String },

    #[error("Réception non trouvée")]
    ReceptionNotFound { bon_reception: String },

    /// 출고 생성 시 재고 부족
    /// Stock below the requested withdrawal at creation
    #[error("Stock insuffisant, quantité demandée supérieure au stock disponible.")]
    InsufficientStock {
        code_materiel: String,
        available: i64,
        requested: i64,
    },

    /// 출고 수정 후 재고가 음수가 되는 경우
    /// Revised withdrawal would drive stock negative
    #[error("Le stock est insuffisant pour cette sortie.")]
    InsufficientStockForUpdate {
        code_materiel: String,
        available: i64,
        requested: i64,
    },

    #[error("La quantité en stock dépasse la capacité autorisée.")]
    QuantityOverflow { code_materiel: String },

    #[error("{}", forbidden_message(.action))]
    Forbidden { action: SortieAction },

    #[error("Database error: {0}")]
    DatabaseError(String),
}

fn forbidden_message(action: &SortieAction) -> &'static str {
    match action {
        SortieAction::Update => "Vous n'avez pas la permission de mettre à jour cette sortie",
        SortieAction::Delete => "Vous n'avez pas la permission de supprimer cette sortie",
    }
}

impl StockError {
    pub fn status(&self) -> StatusCode {
        match self {
            StockError::Validation(_)
            | StockError::InsufficientStock { .. }
            | StockError::InsufficientStockForUpdate { .. }
            | StockError::QuantityOverflow { .. } => StatusCode::BAD_REQUEST,
            StockError::Forbidden { .. } => StatusCode::FORBIDDEN,
            StockError::SortieNotFound { .. }
            | StockError::MaterielNotFound { .. }
            | StockError::ReceptionNotFound { .. } => StatusCode::NOT_FOUND,
            StockError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// StockError를 HTTP 응답으로 변환
///
/// 비즈니스 규칙/검증 오류는 `message`, 권한/미존재 오류는 `error` 키 사용
impl From<StockError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: StockError) -> Self {
        let status = err.status();
        let body = match &err {
            StockError::Validation(errors) => json!({
                "message": err.to_string(),
                "errors": errors,
            }),
            StockError::InsufficientStock { .. }
            | StockError::InsufficientStockForUpdate { .. }
            | StockError::QuantityOverflow { .. }
            | StockError::MaterielNotFound { .. } => json!({ "message": err.to_string() }),
            StockError::SortieNotFound { .. }
            | StockError::ReceptionNotFound { .. }
            | StockError::Forbidden { .. } => json!({ "error": err.to_string() }),
            StockError::DatabaseError(_) => {
                tracing::error!(error = %err, "stock request failed");
                json!({ "error": "Erreur interne du serveur" })
            }
        };

        (status, Json(body))
    }
}

impl From<ValidationErrors> for StockError {
    fn from(errors: ValidationErrors) -> Self {
        StockError::Validation(errors)
    }
}

/// 저장소 조회 실패 (anyhow) → 500
impl From<anyhow::Error> for StockError {
    fn from(err: anyhow::Error) -> Self {
        StockError::DatabaseError(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stock_maps_to_400_with_message() {
        let (status, Json(body)): (StatusCode, Json<serde_json::Value>) = StockError::InsufficientStock {
            code_materiel: "MAT-001".into(),
            available: 1,
            requested: 2,
        }
        .into();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Stock insuffisant, quantité demandée supérieure au stock disponible."
        );
    }

    #[test]
    fn forbidden_maps_to_403_with_error_key() {
        let (status, Json(body)): (StatusCode, Json<serde_json::Value>) = StockError::Forbidden { action: SortieAction::Delete }.into();

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Vous n'avez pas la permission de supprimer cette sortie");
    }

    #[test]
    fn validation_carries_first_message_and_field_map() {
        let (status, Json(body)): (StatusCode, Json<serde_json::Value>) =
            StockError::from(ValidationErrors::single("BonSortie", "Ce bon de sortie existe déjà.")).into();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Ce bon de sortie existe déjà.");
        assert_eq!(body["errors"]["BonSortie"][0], "Ce bon de sortie existe déjà.");
    }

    #[test]
    fn database_errors_do_not_leak_details() {
        let (status, Json(body)): (StatusCode, Json<serde_json::Value>) = StockError::DatabaseError("connection refused".into()).into();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Erreur interne du serveur");
    }
}
