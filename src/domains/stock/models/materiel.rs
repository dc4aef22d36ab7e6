use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 자재 (재고 품목)
/// Inventory item with its on-hand quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(as = Materiel)]
pub struct Materiel {
    #[serde(rename = "CodeMateriel")]
    #[schema(example = "MAT-001")]
    pub code_materiel: String,

    /// 현재 재고 수량 (항상 0 이상)
    /// Current stock, never negative
    #[serde(rename = "Quantite")]
    #[schema(example = 100)]
    pub quantite: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 검증을 통과한 자재 생성 데이터
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterielDraft {
    pub code_materiel: String,
    pub quantite: i64,
}

/// 자재 생성 요청
/// Create materiel request (fields are checked by the validation layer)
#[derive(Debug, Default, Deserialize, ToSchema)]
#[schema(as = CreateMaterielRequest)]
pub struct CreateMaterielRequest {
    #[serde(rename = "CodeMateriel", default)]
    #[schema(value_type = Option<String>, example = "MAT-001")]
    pub code_materiel: Option<serde_json::Value>,

    #[serde(rename = "Quantite", default)]
    #[schema(value_type = Option<i64>, example = 100)]
    pub quantite: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(as = MaterielResponse)]
pub struct MaterielResponse {
    pub materiel: Materiel,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(as = CreateMaterielResponse)]
pub struct CreateMaterielResponse {
    pub message: String,
    pub materiel: Materiel,
}
