// Shared module
pub mod config;
pub mod middleware;
pub mod database;
pub mod errors;
pub mod services;
pub mod telemetry;

pub use database::*;
pub use errors::*;
pub use services::*;
