use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domains::auth::models::UserResponse;

/// 출고 (Sortie)
/// Outgoing stock event (withdrawal)
///
/// 생성 시 자재 재고에서 `quantite_sortant` 만큼 차감됩니다.
/// Creating a sortie decrements its materiel's stock by `quantite_sortant`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(as = Sortie)]
pub struct Sortie {
    #[serde(rename = "BonSortie")]
    #[schema(example = "BS-2024-001")]
    pub bon_sortie: String,

    #[serde(rename = "CodeMateriel")]
    #[schema(example = "MAT-001")]
    pub code_materiel: String,

    /// 출고를 등록한 사용자 (소유자)
    /// Owning user
    pub user_id: u64,

    #[serde(rename = "QuantiteSortant")]
    #[schema(example = 30)]
    pub quantite_sortant: i64,

    #[serde(rename = "Destinataire")]
    #[schema(example = "Atelier maintenance")]
    pub destinataire: String,

    #[serde(rename = "DateSortie")]
    #[schema(value_type = String, example = "2024-10-20")]
    pub date_sortie: NaiveDate,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 소유자 정보를 포함한 출고
/// Sortie with its owning user embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(as = SortieWithUser)]
pub struct SortieWithUser {
    #[serde(flatten)]
    pub sortie: Sortie,

    pub user: Option<UserResponse>,
}

/// 검증을 통과한 출고 데이터 (생성/수정 공용)
/// Validated sortie fields, shared by create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortieDraft {
    pub bon_sortie: String,
    pub code_materiel: String,
    pub quantite_sortant: i64,
    pub destinataire: String,
    pub date_sortie: NaiveDate,
}

/// 출고 생성/수정 요청
/// Create/update sortie request
///
/// 필드 타입 검사는 검증 단계에서 수행 (프랑스어 메시지)
#[derive(Debug, Default, Deserialize, ToSchema)]
#[schema(as = SortieRequest)]
pub struct SortieRequest {
    #[serde(rename = "BonSortie", default)]
    #[schema(value_type = Option<String>, example = "BS-2024-001")]
    pub bon_sortie: Option<serde_json::Value>,

    #[serde(rename = "CodeMateriel", default)]
    #[schema(value_type = Option<String>, example = "MAT-001")]
    pub code_materiel: Option<serde_json::Value>,

    #[serde(rename = "QuantiteSortant", default)]
    #[schema(value_type = Option<i64>, example = 30)]
    pub quantite_sortant: Option<serde_json::Value>,

    #[serde(rename = "Destinataire", default)]
    #[schema(value_type = Option<String>, example = "Atelier maintenance")]
    pub destinataire: Option<serde_json::Value>,

    #[serde(rename = "DateSortie", default)]
    #[schema(value_type = Option<String>, example = "2024-10-20")]
    pub date_sortie: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(as = CreateSortieResponse)]
pub struct CreateSortieResponse {
    pub sortie: Sortie,
    pub user: Option<UserResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(as = SortieResponse)]
pub struct SortieResponse {
    pub sortie: SortieWithUser,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(as = UpdateSortieResponse)]
pub struct UpdateSortieResponse {
    pub message: String,
    pub sortie: Sortie,
}
