// Shared errors
pub mod api_error;
pub mod auth_error;
pub mod stock_error;

pub use api_error::*;
pub use auth_error::*;
pub use stock_error::*;
