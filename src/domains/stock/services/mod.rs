// Stock domain services
pub mod materiel_service;
pub mod reception_service;
pub mod sortie_service;
pub mod state;

pub use materiel_service::*;
pub use reception_service::*;
pub use sortie_service::*;
pub use state::*;
