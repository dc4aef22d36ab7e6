// All repositories module
pub mod auth;
pub mod stock;

// Re-export all repositories for convenience
pub use auth::*;
pub use stock::*;

/// PostgreSQL unique_violation (23505) 여부
/// Whether a repository error is a unique-key violation
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| match e {
            sqlx::Error::Database(db) => db.code().map(|code| code == "23505"),
            _ => None,
        })
        .unwrap_or(false)
}
