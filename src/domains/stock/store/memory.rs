use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;

use super::{creation_error, revision_error, LevelChange, SortieMovement, StockStore};
use crate::domains::auth::models::UserResponse;
use crate::domains::stock::models::{
    Materiel, MaterielDraft, Reception, ReceptionDraft, Sortie, SortieDraft, SortieWithUser,
};
use crate::domains::stock::reconcile::{self, Withdrawal};
use crate::domains::stock::validation::{
    SortieMode, ValidationErrors, BON_RECEPTION_UNIQUE, CODE_MATERIEL_UNIQUE,
};
use crate::shared::errors::StockError;

/// 메모리 기반 재고 저장소 (테스트용)
/// In-memory stock store
///
/// 모든 상태를 하나의 Mutex 로 보호하므로 출고 변경은 서로 직렬화됩니다.
/// Every mutation runs under one lock, so sortie changes serialize the same
/// way row locks serialize them in PostgreSQL.
#[derive(Default)]
pub struct InMemoryStockStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<u64, UserResponse>,
    materiels: BTreeMap<String, Materiel>,
    receptions: BTreeMap<String, Reception>,
    sorties: BTreeMap<String, Sortie>,
}

impl Inner {
    fn with_user(&self, sortie: Sortie) -> SortieWithUser {
        let user = self.users.get(&sortie.user_id).cloned();
        SortieWithUser { sortie, user }
    }

    /// 잠금 상태에서 자재 재고를 새 값으로 기록
    fn apply_levels(&mut self, next: BTreeMap<String, i64>) -> Vec<LevelChange> {
        let now = Utc::now();
        let mut changes = Vec::with_capacity(next.len());
        for (code, after) in next {
            if let Some(materiel) = self.materiels.get_mut(&code) {
                changes.push(LevelChange {
                    code_materiel: code,
                    before: materiel.quantite,
                    after,
                });
                materiel.quantite = after;
                materiel.updated_at = now;
            }
        }
        changes
    }
}

impl InMemoryStockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 출고 목록에 포함될 사용자 등록
    /// Register a user so sorties can embed it
    pub fn register_user(&self, user: UserResponse) {
        self.inner.lock().users.insert(user.id, user);
    }
}

#[async_trait]
impl StockStore for InMemoryStockStore {
    async fn list_materiels(&self) -> Result<Vec<Materiel>> {
        Ok(self.inner.lock().materiels.values().cloned().collect())
    }

    async fn find_materiel(&self, code_materiel: &str) -> Result<Option<Materiel>> {
        Ok(self.inner.lock().materiels.get(code_materiel).cloned())
    }

    async fn create_materiel(&self, draft: &MaterielDraft) -> Result<Materiel, StockError> {
        let mut inner = self.inner.lock();
        if inner.materiels.contains_key(&draft.code_materiel) {
            return Err(ValidationErrors::single("CodeMateriel", CODE_MATERIEL_UNIQUE).into());
        }

        let now = Utc::now();
        let materiel = Materiel {
            code_materiel: draft.code_materiel.clone(),
            quantite: draft.quantite,
            created_at: now,
            updated_at: now,
        };
        inner.materiels.insert(materiel.code_materiel.clone(), materiel.clone());
        Ok(materiel)
    }

    async fn list_receptions(&self) -> Result<Vec<Reception>> {
        Ok(self.inner.lock().receptions.values().cloned().collect())
    }

    async fn find_reception(&self, bon_reception: &str) -> Result<Option<Reception>> {
        Ok(self.inner.lock().receptions.get(bon_reception).cloned())
    }

    async fn latest_reception_date(&self, code_materiel: &str) -> Result<Option<NaiveDate>> {
        Ok(self
            .inner
            .lock()
            .receptions
            .values()
            .filter(|r| r.code_materiel == code_materiel)
            .map(|r| r.date_reception)
            .max())
    }

    async fn create_reception(&self, user_id: u64, draft: &ReceptionDraft) -> Result<Reception, StockError> {
        let mut inner = self.inner.lock();
        if inner.receptions.contains_key(&draft.bon_reception) {
            return Err(ValidationErrors::single("BonReception", BON_RECEPTION_UNIQUE).into());
        }
        if !inner.materiels.contains_key(&draft.code_materiel) {
            return Err(StockError::MaterielNotFound {
                code_materiel: draft.code_materiel.clone(),
            });
        }

        let now = Utc::now();
        let reception = Reception {
            bon_reception: draft.bon_reception.clone(),
            code_materiel: draft.code_materiel.clone(),
            user_id,
            quantite_recu: draft.quantite_recu,
            date_reception: draft.date_reception,
            created_at: now,
            updated_at: now,
        };
        inner.receptions.insert(reception.bon_reception.clone(), reception.clone());
        Ok(reception)
    }

    async fn list_sorties(&self) -> Result<Vec<SortieWithUser>> {
        let inner = self.inner.lock();
        Ok(inner
            .sorties
            .values()
            .cloned()
            .map(|s| inner.with_user(s))
            .collect())
    }

    async fn find_sortie(&self, bon_sortie: &str) -> Result<Option<SortieWithUser>> {
        let inner = self.inner.lock();
        Ok(inner.sorties.get(bon_sortie).cloned().map(|s| inner.with_user(s)))
    }

    async fn sortie_exists(&self, bon_sortie: &str) -> Result<bool> {
        Ok(self.inner.lock().sorties.contains_key(bon_sortie))
    }

    async fn record_sortie(&self, user_id: u64, draft: &SortieDraft) -> Result<SortieMovement, StockError> {
        let mut inner = self.inner.lock();

        if inner.sorties.contains_key(&draft.bon_sortie) {
            return Err(ValidationErrors::single("BonSortie", SortieMode::Create.messages().bon_unique).into());
        }

        let stock = inner
            .materiels
            .get(&draft.code_materiel)
            .map(|m| m.quantite)
            .ok_or_else(|| StockError::MaterielNotFound {
                code_materiel: draft.code_materiel.clone(),
            })?;

        let after = reconcile::withdraw(stock, draft.quantite_sortant)
            .map_err(|e| creation_error(&draft.code_materiel, e))?;

        let levels = inner.apply_levels(BTreeMap::from([(draft.code_materiel.clone(), after)]));

        let now = Utc::now();
        let sortie = Sortie {
            bon_sortie: draft.bon_sortie.clone(),
            code_materiel: draft.code_materiel.clone(),
            user_id,
            quantite_sortant: draft.quantite_sortant,
            destinataire: draft.destinataire.clone(),
            date_sortie: draft.date_sortie,
            created_at: now,
            updated_at: now,
        };
        inner.sorties.insert(sortie.bon_sortie.clone(), sortie.clone());

        Ok(SortieMovement { sortie, levels })
    }

    async fn revise_sortie(&self, bon_sortie: &str, draft: &SortieDraft) -> Result<SortieMovement, StockError> {
        let mut inner = self.inner.lock();

        let previous = inner
            .sorties
            .get(bon_sortie)
            .cloned()
            .ok_or_else(|| StockError::SortieNotFound {
                bon_sortie: bon_sortie.to_string(),
            })?;

        if draft.bon_sortie != bon_sortie && inner.sorties.contains_key(&draft.bon_sortie) {
            return Err(ValidationErrors::single("BonSortie", SortieMode::Update.messages().bon_unique).into());
        }

        let levels: BTreeMap<String, i64> = [&previous.code_materiel, &draft.code_materiel]
            .into_iter()
            .filter_map(|code| inner.materiels.get(code).map(|m| (code.clone(), m.quantite)))
            .collect();

        let next = reconcile::revise(
            Withdrawal {
                code_materiel: &previous.code_materiel,
                quantity: previous.quantite_sortant,
            },
            Withdrawal {
                code_materiel: &draft.code_materiel,
                quantity: draft.quantite_sortant,
            },
            &levels,
        )
        .map_err(|e| revision_error(&draft.code_materiel, e))?;

        let changes = inner.apply_levels(next);

        let sortie = Sortie {
            bon_sortie: draft.bon_sortie.clone(),
            code_materiel: draft.code_materiel.clone(),
            user_id: previous.user_id,
            quantite_sortant: draft.quantite_sortant,
            destinataire: draft.destinataire.clone(),
            date_sortie: draft.date_sortie,
            created_at: previous.created_at,
            updated_at: Utc::now(),
        };
        inner.sorties.remove(bon_sortie);
        inner.sorties.insert(sortie.bon_sortie.clone(), sortie.clone());

        Ok(SortieMovement { sortie, levels: changes })
    }

    async fn remove_sortie(&self, bon_sortie: &str) -> Result<SortieMovement, StockError> {
        let mut inner = self.inner.lock();

        let sortie = inner
            .sorties
            .get(bon_sortie)
            .cloned()
            .ok_or_else(|| StockError::SortieNotFound {
                bon_sortie: bon_sortie.to_string(),
            })?;

        // 자재가 없으면 복원 없이 삭제만 수행
        let mut next = BTreeMap::new();
        if let Some(materiel) = inner.materiels.get(&sortie.code_materiel) {
            let after = reconcile::restore(materiel.quantite, sortie.quantite_sortant)
                .map_err(|e| creation_error(&sortie.code_materiel, e))?;
            next.insert(sortie.code_materiel.clone(), after);
        }

        let levels = inner.apply_levels(next);
        inner.sorties.remove(bon_sortie);

        Ok(SortieMovement { sortie, levels })
    }
}
