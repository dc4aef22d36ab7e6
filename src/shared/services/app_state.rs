use std::sync::Arc;
use crate::shared::config::AppConfig;
use crate::shared::database::{Database, PgStockStore};
use crate::domains::auth::services::state::AuthState;
use crate::domains::auth::services::JwtService;
use crate::domains::stock::services::state::StockState;
use crate::domains::stock::store::StockStore;

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
///
/// 각 도메인의 State를 조합하여 전체 애플리케이션 상태를 관리
#[derive(Clone)]
pub struct AppState {
    /// 데이터베이스 연결 (공유)
    /// Database connection (shared)
    pub db: Database,
    pub auth_state: AuthState,
    pub stock_state: StockState,
}

impl AppState {
    /// Create AppState with database (PostgreSQL 재고 저장소 사용)
    /// 모든 도메인 State를 초기화하고 조합
    pub fn new(db: Database, config: &AppConfig) -> Self {
        let jwt_service = JwtService::new(&config.jwt_secret, config.access_token_ttl_hours);
        let store: Arc<dyn StockStore> = Arc::new(PgStockStore::new(db.clone()));

        Self::with_store(db, jwt_service, config.refresh_token_ttl_days, store)
    }

    /// 재고 저장소를 직접 주입 (테스트에서 InMemoryStockStore 사용)
    /// Build the state over an explicit stock store
    pub fn with_store(
        db: Database,
        jwt_service: JwtService,
        refresh_token_ttl_days: i64,
        store: Arc<dyn StockStore>,
    ) -> Self {
        Self {
            auth_state: AuthState::new(db.clone(), jwt_service, refresh_token_ttl_days),
            stock_state: StockState::new(store),
            db,
        }
    }
}
