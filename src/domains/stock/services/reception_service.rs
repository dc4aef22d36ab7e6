use std::sync::Arc;

use crate::domains::stock::models::{CreateReceptionRequest, Reception};
use crate::domains::stock::store::StockStore;
use crate::domains::stock::validation::{self, ValidationErrors, BON_RECEPTION_UNIQUE, CODE_MATERIEL_EXISTS};
use crate::shared::errors::StockError;
use crate::shared::middleware::auth::AuthenticatedUser;

/// 입고 서비스
/// Reception Service
///
/// 입고는 이벤트 기록만 하며 자재 재고는 변경하지 않습니다.
/// 최근 입고일은 출고일 검증의 하한으로 사용됩니다.
#[derive(Clone)]
pub struct ReceptionService {
    store: Arc<dyn StockStore>,
}

impl ReceptionService {
    pub fn new(store: Arc<dyn StockStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Reception>, StockError> {
        Ok(self.store.list_receptions().await?)
    }

    pub async fn show(&self, bon_reception: &str) -> Result<Reception, StockError> {
        self.store
            .find_reception(bon_reception)
            .await?
            .ok_or_else(|| StockError::ReceptionNotFound {
                bon_reception: bon_reception.to_string(),
            })
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: &CreateReceptionRequest,
    ) -> Result<Reception, StockError> {
        let draft = validation::reception_fields(request)?;

        let mut errors = ValidationErrors::new();
        if self.store.find_reception(&draft.bon_reception).await?.is_some() {
            errors.add("BonReception", BON_RECEPTION_UNIQUE);
        }
        if self.store.find_materiel(&draft.code_materiel).await?.is_none() {
            errors.add("CodeMateriel", CODE_MATERIEL_EXISTS);
        }
        errors.into_result(())?;

        let reception = self.store.create_reception(actor.user_id, &draft).await?;

        tracing::info!(
            bon_reception = %reception.bon_reception,
            code_materiel = %reception.code_materiel,
            quantite_recu = reception.quantite_recu,
            user_id = actor.user_id,
            "reception recorded"
        );

        Ok(reception)
    }
}
