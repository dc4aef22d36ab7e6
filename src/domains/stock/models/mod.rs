// Stock domain models
pub mod materiel;
pub mod reception;
pub mod sortie;

pub use materiel::*;
pub use reception::*;
pub use sortie::*;

use serde::Serialize;
use utoipa::ToSchema;

/// 단순 메시지 응답
/// Plain message response
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = MessageResponse)]
pub struct MessageResponse {
    #[schema(example = "Sortie supprimée avec succès")]
    pub message: String,
}
