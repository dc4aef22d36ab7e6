use std::sync::Arc;

use crate::domains::stock::models::{CreateMaterielRequest, Materiel};
use crate::domains::stock::store::StockStore;
use crate::domains::stock::validation;
use crate::shared::errors::StockError;

/// 자재 서비스
/// Materiel Service
///
/// 자재 생성 시 초기 재고를 설정합니다. 이후 재고는 출고에 의해서만 변경됩니다.
#[derive(Clone)]
pub struct MaterielService {
    store: Arc<dyn StockStore>,
}

impl MaterielService {
    pub fn new(store: Arc<dyn StockStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Materiel>, StockError> {
        Ok(self.store.list_materiels().await?)
    }

    pub async fn show(&self, code_materiel: &str) -> Result<Materiel, StockError> {
        self.store
            .find_materiel(code_materiel)
            .await?
            .ok_or_else(|| StockError::MaterielNotFound {
                code_materiel: code_materiel.to_string(),
            })
    }

    /// 자재 생성 (코드 중복 검사는 저장소에서)
    /// Create a materiel with its initial stock
    pub async fn create(&self, request: &CreateMaterielRequest) -> Result<Materiel, StockError> {
        let draft = validation::materiel_fields(request)?;
        let materiel = self.store.create_materiel(&draft).await?;

        tracing::info!(
            code_materiel = %materiel.code_materiel,
            quantite = materiel.quantite,
            "materiel created"
        );

        Ok(materiel)
    }
}
