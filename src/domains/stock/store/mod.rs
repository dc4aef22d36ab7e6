// =====================================================
// 재고 저장소 인터페이스
// Stock store interface
// =====================================================
// Service 계층은 이 trait 만 사용합니다.
//
// 구현체:
// - `PgStockStore` (shared::database): PostgreSQL, 트랜잭션 + 행 잠금
// - `InMemoryStockStore`: 테스트용, 단일 Mutex
//
// 출고 변경(record/revise/remove)은 반드시 원자적으로 수행해야 합니다:
// 자재 재고 읽기 → reconcile 계산 → 자재/출고 쓰기가 하나의 격리된 단위.
// =====================================================

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domains::stock::models::{
    Materiel, MaterielDraft, Reception, ReceptionDraft, Sortie, SortieDraft, SortieWithUser,
};
use crate::domains::stock::reconcile::{ReconcileError, ReviseError};
use crate::shared::errors::StockError;

pub use memory::InMemoryStockStore;

/// 자재 재고 변화 (before → after)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelChange {
    pub code_materiel: String,
    pub before: i64,
    pub after: i64,
}

/// 출고 변경 결과: 저장된 출고 + 영향받은 자재 재고
/// Result of a sortie mutation: the stored sortie and every stock level it touched
#[derive(Debug, Clone)]
pub struct SortieMovement {
    pub sortie: Sortie,
    pub levels: Vec<LevelChange>,
}

#[async_trait]
pub trait StockStore: Send + Sync {
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 자재 (Materiel)
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    async fn list_materiels(&self) -> Result<Vec<Materiel>>;

    async fn find_materiel(&self, code_materiel: &str) -> Result<Option<Materiel>>;

    /// 자재 생성 (초기 재고 설정). 코드 중복 시 Validation 에러
    async fn create_materiel(&self, draft: &MaterielDraft) -> Result<Materiel, StockError>;

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 입고 (Reception)
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    async fn list_receptions(&self) -> Result<Vec<Reception>>;

    async fn find_reception(&self, bon_reception: &str) -> Result<Option<Reception>>;

    /// 자재의 가장 최근 입고일
    /// Latest DateReception recorded for a materiel
    async fn latest_reception_date(&self, code_materiel: &str) -> Result<Option<NaiveDate>>;

    /// 입고 기록. 재고 수량은 변경하지 않음
    async fn create_reception(&self, user_id: u64, draft: &ReceptionDraft) -> Result<Reception, StockError>;

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 출고 (Sortie)
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    async fn list_sorties(&self) -> Result<Vec<SortieWithUser>>;

    async fn find_sortie(&self, bon_sortie: &str) -> Result<Option<SortieWithUser>>;

    async fn sortie_exists(&self, bon_sortie: &str) -> Result<bool>;

    /// 출고 생성 + 재고 차감 (원자적)
    /// Insert a sortie and withdraw its quantity, atomically
    async fn record_sortie(&self, user_id: u64, draft: &SortieDraft) -> Result<SortieMovement, StockError>;

    /// 출고 수정 + 재고 재정산 (원자적)
    /// Replace a sortie's fields and re-apply the withdrawal, atomically
    async fn revise_sortie(&self, bon_sortie: &str, draft: &SortieDraft) -> Result<SortieMovement, StockError>;

    /// 출고 삭제 + 재고 복원 (원자적)
    /// Delete a sortie and give its quantity back, atomically
    async fn remove_sortie(&self, bon_sortie: &str) -> Result<SortieMovement, StockError>;
}

/// 출고 생성 시 정산 실패 → StockError
pub(crate) fn creation_error(code_materiel: &str, err: ReconcileError) -> StockError {
    match err {
        ReconcileError::Insufficient { available, requested } => StockError::InsufficientStock {
            code_materiel: code_materiel.to_string(),
            available,
            requested,
        },
        ReconcileError::Overflow => StockError::QuantityOverflow {
            code_materiel: code_materiel.to_string(),
        },
    }
}

/// 출고 수정 시 정산 실패 → StockError
pub(crate) fn revision_error(code_materiel: &str, err: ReviseError) -> StockError {
    match err {
        ReviseError::MissingMateriel => StockError::MaterielNotFound {
            code_materiel: code_materiel.to_string(),
        },
        ReviseError::Reconcile(ReconcileError::Insufficient { available, requested }) => {
            StockError::InsufficientStockForUpdate {
                code_materiel: code_materiel.to_string(),
                available,
                requested,
            }
        }
        ReviseError::Reconcile(ReconcileError::Overflow) => StockError::QuantityOverflow {
            code_materiel: code_materiel.to_string(),
        },
    }
}
