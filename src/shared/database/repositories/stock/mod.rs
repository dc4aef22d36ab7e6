// Stock repositories
pub mod materiel_repository;
pub mod reception_repository;
pub mod sortie_repository;
pub mod pg_stock_store;

pub use materiel_repository::*;
pub use reception_repository::*;
pub use sortie_repository::*;
pub use pg_stock_store::*;
