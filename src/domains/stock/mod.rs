// Stock domain module (materiels, receptions, sorties)
pub mod handlers;
pub mod models;
pub mod policy;
pub mod reconcile;
pub mod routes;
pub mod services;
pub mod store;
pub mod validation;

pub use models::*;
pub use routes::*;
pub use services::*;
