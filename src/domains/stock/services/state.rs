// Stock domain state
// 재고 도메인 상태
use std::sync::Arc;

use crate::domains::stock::services::{MaterielService, ReceptionService, SortieService};
use crate::domains::stock::store::StockStore;

/// Stock domain state
/// 재고 도메인 서비스들 (모두 같은 저장소를 공유)
#[derive(Clone)]
pub struct StockState {
    pub materiel_service: MaterielService,
    pub reception_service: ReceptionService,
    pub sortie_service: SortieService,
}

impl StockState {
    /// Create StockState over a shared store
    /// StockState 생성 (저장소 주입)
    pub fn new(store: Arc<dyn StockStore>) -> Self {
        Self {
            materiel_service: MaterielService::new(store.clone()),
            reception_service: ReceptionService::new(store.clone()),
            sortie_service: SortieService::new(store),
        }
    }
}
