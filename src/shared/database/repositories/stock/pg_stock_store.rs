// =====================================================
// PostgreSQL 재고 저장소
// PostgreSQL stock store
// =====================================================
// 출고 변경은 모두 하나의 트랜잭션 안에서 처리합니다.
//
// 1. BEGIN
// 2. 출고 행 잠금 (수정/삭제)         SELECT ... FOR UPDATE
// 3. 관련 자재 행 잠금 (코드 순서)     SELECT ... FOR UPDATE
// 4. reconcile 계산
// 5. 자재/출고 쓰기
// 6. COMMIT (에러 시 drop 으로 자동 ROLLBACK)
//
// 같은 자재에 대한 동시 출고는 행 잠금에서 직렬화되므로 lost update 가 없습니다.
// =====================================================

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use super::{MaterielRepository, ReceptionRepository, SortieRepository};
use crate::domains::stock::models::{
    Materiel, MaterielDraft, Reception, ReceptionDraft, SortieDraft, SortieWithUser,
};
use crate::domains::stock::reconcile::{self, Withdrawal};
use crate::domains::stock::store::{
    creation_error, revision_error, LevelChange, SortieMovement, StockStore,
};
use crate::domains::stock::validation::{
    SortieMode, ValidationErrors, BON_RECEPTION_UNIQUE, CODE_MATERIEL_UNIQUE,
};
use crate::shared::database::repositories::is_unique_violation;
use crate::shared::database::Database;
use crate::shared::errors::StockError;

#[derive(Clone)]
pub struct PgStockStore {
    db: Database,
}

impl PgStockStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn materiels(&self) -> MaterielRepository {
        MaterielRepository::new(self.db.pool().clone())
    }

    fn receptions(&self) -> ReceptionRepository {
        ReceptionRepository::new(self.db.pool().clone())
    }

    fn sorties(&self) -> SortieRepository {
        SortieRepository::new(self.db.pool().clone())
    }
}

fn db_error(err: impl std::fmt::Display) -> StockError {
    StockError::DatabaseError(err.to_string())
}

fn anyhow_error(err: anyhow::Error) -> StockError {
    StockError::DatabaseError(format!("{:#}", err))
}

/// 잠금 전/후 재고로 변경 내역 구성
fn level_changes(before: &BTreeMap<String, i64>, after: &BTreeMap<String, i64>) -> Vec<LevelChange> {
    after
        .iter()
        .filter_map(|(code, after)| {
            before.get(code).map(|before| LevelChange {
                code_materiel: code.clone(),
                before: *before,
                after: *after,
            })
        })
        .collect()
}

#[async_trait]
impl StockStore for PgStockStore {
    async fn list_materiels(&self) -> Result<Vec<Materiel>> {
        self.materiels().list().await
    }

    async fn find_materiel(&self, code_materiel: &str) -> Result<Option<Materiel>> {
        self.materiels().get_by_code(code_materiel).await
    }

    async fn create_materiel(&self, draft: &MaterielDraft) -> Result<Materiel, StockError> {
        self.materiels().create(draft).await.map_err(|e| {
            if is_unique_violation(&e) {
                ValidationErrors::single("CodeMateriel", CODE_MATERIEL_UNIQUE).into()
            } else {
                anyhow_error(e)
            }
        })
    }

    async fn list_receptions(&self) -> Result<Vec<Reception>> {
        self.receptions().list().await
    }

    async fn find_reception(&self, bon_reception: &str) -> Result<Option<Reception>> {
        self.receptions().get_by_bon(bon_reception).await
    }

    async fn latest_reception_date(&self, code_materiel: &str) -> Result<Option<NaiveDate>> {
        self.receptions().latest_date_for(code_materiel).await
    }

    async fn create_reception(&self, user_id: u64, draft: &ReceptionDraft) -> Result<Reception, StockError> {
        self.receptions().create(user_id, draft).await.map_err(|e| {
            if is_unique_violation(&e) {
                ValidationErrors::single("BonReception", BON_RECEPTION_UNIQUE).into()
            } else {
                anyhow_error(e)
            }
        })
    }

    async fn list_sorties(&self) -> Result<Vec<SortieWithUser>> {
        self.sorties().list_with_users().await
    }

    async fn find_sortie(&self, bon_sortie: &str) -> Result<Option<SortieWithUser>> {
        self.sorties().get_with_user(bon_sortie).await
    }

    async fn sortie_exists(&self, bon_sortie: &str) -> Result<bool> {
        self.sorties().exists(bon_sortie).await
    }

    async fn record_sortie(&self, user_id: u64, draft: &SortieDraft) -> Result<SortieMovement, StockError> {
        let mut tx = self.db.pool().begin().await.map_err(db_error)?;

        let before = MaterielRepository::lock_levels(&mut *tx, vec![draft.code_materiel.clone()])
            .await
            .map_err(anyhow_error)?;

        let stock = *before
            .get(&draft.code_materiel)
            .ok_or_else(|| StockError::MaterielNotFound {
                code_materiel: draft.code_materiel.clone(),
            })?;

        let after = reconcile::withdraw(stock, draft.quantite_sortant)
            .map_err(|e| creation_error(&draft.code_materiel, e))?;

        MaterielRepository::set_quantite(&mut *tx, &draft.code_materiel, after)
            .await
            .map_err(anyhow_error)?;

        let sortie = SortieRepository::insert(&mut *tx, user_id, draft)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ValidationErrors::single("BonSortie", SortieMode::Create.messages().bon_unique).into()
                } else {
                    anyhow_error(e)
                }
            })?;

        tx.commit().await.map_err(db_error)?;

        let next = BTreeMap::from([(draft.code_materiel.clone(), after)]);
        Ok(SortieMovement {
            sortie,
            levels: level_changes(&before, &next),
        })
    }

    async fn revise_sortie(&self, bon_sortie: &str, draft: &SortieDraft) -> Result<SortieMovement, StockError> {
        let mut tx = self.db.pool().begin().await.map_err(db_error)?;

        let previous = SortieRepository::lock(&mut *tx, bon_sortie)
            .await
            .map_err(anyhow_error)?
            .ok_or_else(|| StockError::SortieNotFound {
                bon_sortie: bon_sortie.to_string(),
            })?;

        let mut codes = vec![previous.code_materiel.clone(), draft.code_materiel.clone()];
        codes.sort();
        codes.dedup();

        let before = MaterielRepository::lock_levels(&mut *tx, codes)
            .await
            .map_err(anyhow_error)?;

        let next = reconcile::revise(
            Withdrawal {
                code_materiel: &previous.code_materiel,
                quantity: previous.quantite_sortant,
            },
            Withdrawal {
                code_materiel: &draft.code_materiel,
                quantity: draft.quantite_sortant,
            },
            &before,
        )
        .map_err(|e| revision_error(&draft.code_materiel, e))?;

        for (code, quantite) in &next {
            MaterielRepository::set_quantite(&mut *tx, code, *quantite)
                .await
                .map_err(anyhow_error)?;
        }

        let sortie = SortieRepository::update(&mut *tx, bon_sortie, draft)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ValidationErrors::single("BonSortie", SortieMode::Update.messages().bon_unique).into()
                } else {
                    anyhow_error(e)
                }
            })?;

        tx.commit().await.map_err(db_error)?;

        Ok(SortieMovement {
            sortie,
            levels: level_changes(&before, &next),
        })
    }

    async fn remove_sortie(&self, bon_sortie: &str) -> Result<SortieMovement, StockError> {
        let mut tx = self.db.pool().begin().await.map_err(db_error)?;

        let sortie = SortieRepository::lock(&mut *tx, bon_sortie)
            .await
            .map_err(anyhow_error)?
            .ok_or_else(|| StockError::SortieNotFound {
                bon_sortie: bon_sortie.to_string(),
            })?;

        let before = MaterielRepository::lock_levels(&mut *tx, vec![sortie.code_materiel.clone()])
            .await
            .map_err(anyhow_error)?;

        let mut next = BTreeMap::new();
        if let Some(stock) = before.get(&sortie.code_materiel) {
            let after = reconcile::restore(*stock, sortie.quantite_sortant)
                .map_err(|e| creation_error(&sortie.code_materiel, e))?;
            MaterielRepository::set_quantite(&mut *tx, &sortie.code_materiel, after)
                .await
                .map_err(anyhow_error)?;
            next.insert(sortie.code_materiel.clone(), after);
        }

        SortieRepository::delete(&mut *tx, bon_sortie)
            .await
            .map_err(anyhow_error)?;

        tx.commit().await.map_err(db_error)?;

        Ok(SortieMovement {
            sortie,
            levels: level_changes(&before, &next),
        })
    }
}
