use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 입고 (Reception)
/// Incoming stock event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(as = Reception)]
pub struct Reception {
    #[serde(rename = "BonReception")]
    #[schema(example = "BR-2024-001")]
    pub bon_reception: String,

    #[serde(rename = "CodeMateriel")]
    #[schema(example = "MAT-001")]
    pub code_materiel: String,

    pub user_id: u64,

    #[serde(rename = "QuantiteRecu")]
    #[schema(example = 50)]
    pub quantite_recu: i64,

    #[serde(rename = "DateReception")]
    #[schema(value_type = String, example = "2024-10-14")]
    pub date_reception: NaiveDate,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 검증을 통과한 입고 생성 데이터
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceptionDraft {
    pub bon_reception: String,
    pub code_materiel: String,
    pub quantite_recu: i64,
    pub date_reception: NaiveDate,
}

/// 입고 생성 요청
/// Create reception request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[schema(as = CreateReceptionRequest)]
pub struct CreateReceptionRequest {
    #[serde(rename = "BonReception", default)]
    #[schema(value_type = Option<String>, example = "BR-2024-001")]
    pub bon_reception: Option<serde_json::Value>,

    #[serde(rename = "CodeMateriel", default)]
    #[schema(value_type = Option<String>, example = "MAT-001")]
    pub code_materiel: Option<serde_json::Value>,

    #[serde(rename = "QuantiteRecu", default)]
    #[schema(value_type = Option<i64>, example = 50)]
    pub quantite_recu: Option<serde_json::Value>,

    #[serde(rename = "DateReception", default)]
    #[schema(value_type = Option<String>, example = "2024-10-14")]
    pub date_reception: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(as = ReceptionResponse)]
pub struct ReceptionResponse {
    pub reception: Reception,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(as = CreateReceptionResponse)]
pub struct CreateReceptionResponse {
    pub message: String,
    pub reception: Reception,
}
