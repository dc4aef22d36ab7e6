// Stock domain handlers
pub mod materiel_handler;
pub mod reception_handler;
pub mod sortie_handler;

pub use materiel_handler::*;
pub use reception_handler::*;
pub use sortie_handler::*;

use crate::shared::errors::StockError;

pub(crate) use crate::shared::errors::{json_body, ApiError};

pub(crate) fn into_api_error(err: StockError) -> ApiError {
    err.into()
}
