use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::domains::stock::models::{Sortie, SortieRequest, SortieWithUser};
use crate::domains::stock::policy::{self, SortieAction};
use crate::domains::stock::store::{SortieMovement, StockStore};
use crate::domains::stock::validation::{
    self, SortieFields, SortieMode, CODE_MATERIEL_EXISTS, DATE_SORTIE_AFTER_RECEPTION,
};
use crate::shared::errors::StockError;
use crate::shared::middleware::auth::AuthenticatedUser;

// =====================================================
// 출고 서비스
// Sortie Service
// =====================================================
// 처리 흐름 (수정/삭제):
// 1. 출고 조회            → 없으면 404
// 2. 권한 정책 평가       → Deny 면 403
// 3. 필드 형식 + 저장소 규칙 검사 → 모든 필드 오류를 한 번에 400
// 4. 저장소 원자적 처리   → 재고 정산 + 출고 쓰기
// =====================================================

/// 출고 서비스
/// Sortie Service
///
/// 역할:
/// - 출고 조회/생성/수정/삭제
/// - 출고 변경 시 자재 재고 정산 (저장소가 원자적으로 수행)
#[derive(Clone)]
pub struct SortieService {
    store: Arc<dyn StockStore>,
}

impl SortieService {
    pub fn new(store: Arc<dyn StockStore>) -> Self {
        Self { store }
    }

    /// 모든 출고 조회 (사용자 포함)
    /// List every sortie with its owner
    pub async fn list(&self) -> Result<Vec<SortieWithUser>, StockError> {
        Ok(self.store.list_sorties().await?)
    }

    /// 출고 단건 조회
    /// Get one sortie by BonSortie
    pub async fn show(&self, bon_sortie: &str) -> Result<SortieWithUser, StockError> {
        self.store
            .find_sortie(bon_sortie)
            .await?
            .ok_or_else(|| StockError::SortieNotFound {
                bon_sortie: bon_sortie.to_string(),
            })
    }

    /// 출고 생성 + 재고 차감
    /// Create a sortie owned by `actor` and withdraw its quantity
    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: &SortieRequest,
    ) -> Result<SortieWithUser, StockError> {
        let mut fields = validation::check_sortie(request, SortieMode::Create);
        self.check_rules(&mut fields, SortieMode::Create, None).await?;
        let draft = fields.into_draft()?;

        let movement = self
            .store
            .record_sortie(actor.user_id, &draft)
            .await
            .inspect_err(|e| log_rejection("create", &draft.bon_sortie, e))?;

        log_movement("sortie created", &movement);

        // 응답에 소유자 정보 포함
        let bon_sortie = movement.sortie.bon_sortie.clone();
        let with_user = self.store.find_sortie(&bon_sortie).await?;
        Ok(with_user.unwrap_or(SortieWithUser {
            sortie: movement.sortie,
            user: None,
        }))
    }

    /// 출고 수정 + 재고 재정산
    /// Replace a sortie's fields and re-apply the withdrawal
    pub async fn update(
        &self,
        actor: &AuthenticatedUser,
        bon_sortie: &str,
        request: &SortieRequest,
    ) -> Result<Sortie, StockError> {
        let existing = self.authorize(actor, SortieAction::Update, bon_sortie).await?;

        let mut fields = validation::check_sortie(request, SortieMode::Update);
        self.check_rules(&mut fields, SortieMode::Update, Some(&existing)).await?;
        let draft = fields.into_draft()?;

        let movement = self
            .store
            .revise_sortie(bon_sortie, &draft)
            .await
            .inspect_err(|e| log_rejection("update", bon_sortie, e))?;

        log_movement("sortie updated", &movement);

        Ok(movement.sortie)
    }

    /// 출고 삭제 + 재고 복원
    /// Delete a sortie and give its quantity back
    pub async fn delete(&self, actor: &AuthenticatedUser, bon_sortie: &str) -> Result<Sortie, StockError> {
        self.authorize(actor, SortieAction::Delete, bon_sortie).await?;

        let movement = self
            .store
            .remove_sortie(bon_sortie)
            .await
            .inspect_err(|e| log_rejection("delete", bon_sortie, e))?;

        log_movement("sortie deleted", &movement);

        Ok(movement.sortie)
    }

    /// 출고 존재 확인 후 권한 정책 평가
    async fn authorize(
        &self,
        actor: &AuthenticatedUser,
        action: SortieAction,
        bon_sortie: &str,
    ) -> Result<Sortie, StockError> {
        let existing = self.show(bon_sortie).await?.sortie;

        if !policy::evaluate(actor, action, &existing).is_allowed() {
            tracing::warn!(
                bon_sortie,
                user_id = actor.user_id,
                owner_id = existing.user_id,
                ?action,
                "sortie action denied"
            );
            return Err(StockError::Forbidden { action });
        }

        Ok(existing)
    }

    /// 저장소 상태에 의존하는 규칙 (unique / exists / 입고일 이후)
    ///
    /// 형식이 맞는 필드만 검사하고 오류는 `fields.errors` 에 누적합니다.
    /// `current` 는 수정 중인 출고 (자기 자신은 unique 검사에서 제외)
    async fn check_rules(
        &self,
        fields: &mut SortieFields,
        mode: SortieMode,
        current: Option<&Sortie>,
    ) -> Result<(), StockError> {
        if let Some(bon) = fields.bon_sortie.as_deref() {
            let renamed = current.is_none_or(|sortie| sortie.bon_sortie != bon);
            if renamed && self.store.sortie_exists(bon).await? {
                fields.errors.add("BonSortie", mode.messages().bon_unique);
            }
        }

        let Some(code) = fields.code_materiel.as_deref() else {
            return Ok(());
        };

        if self.store.find_materiel(code).await?.is_none() {
            fields.errors.add("CodeMateriel", CODE_MATERIEL_EXISTS);
            return Ok(());
        }

        let Some(date) = fields.date_sortie else {
            return Ok(());
        };

        // 날짜와 자재가 그대로인 수정은 이후 입고와 무관하게 허용
        let moved = current.is_none_or(|sortie| sortie.date_sortie != date || sortie.code_materiel != code);
        if moved {
            let latest = self.store.latest_reception_date(code).await?;
            if earliest_sortie_date(latest, mode).is_some_and(|bound| date < bound) {
                fields.errors.add("DateSortie", DATE_SORTIE_AFTER_RECEPTION);
            }
        }

        Ok(())
    }
}

/// 출고일 하한: 최근 입고일, 입고가 없으면 생성 시에만 오늘
/// Lower bound for DateSortie
fn earliest_sortie_date(latest_reception: Option<NaiveDate>, mode: SortieMode) -> Option<NaiveDate> {
    match (latest_reception, mode) {
        (Some(date), _) => Some(date),
        (None, SortieMode::Create) => Some(Utc::now().date_naive()),
        (None, SortieMode::Update) => None,
    }
}

fn log_movement(event: &'static str, movement: &SortieMovement) {
    for level in &movement.levels {
        tracing::info!(
            bon_sortie = %movement.sortie.bon_sortie,
            code_materiel = %level.code_materiel,
            before = level.before,
            after = level.after,
            "{}",
            event
        );
    }
}

fn log_rejection(operation: &'static str, bon_sortie: &str, err: &StockError) {
    if err.status().is_client_error() {
        tracing::warn!(operation, bon_sortie, error = %err, "sortie rejected");
    }
}
