use sqlx::{PgPool, Row};
use anyhow::{Context, Result};
use crate::domains::auth::models::refresh_token::{RefreshToken, RefreshTokenCreate};

/// Refresh Token Repository
/// Refresh Token 데이터베이스 작업 처리
pub struct RefreshTokenRepository {
    pool: PgPool,
}

impl RefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Refresh Token 저장
    /// Store a refresh token hash
    pub async fn create(&self, data: RefreshTokenCreate) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token_hash, expires_at, revoked, created_at, updated_at)
            VALUES ($1, $2, $3, FALSE, NOW(), NOW())
            "#,
        )
        .bind(data.user_id as i64)
        .bind(&data.token_hash)
        .bind(data.expires_at)
        .execute(&self.pool)
        .await
        .context("Failed to create refresh token")?;

        Ok(())
    }

    /// Refresh Token 조회 (token_hash로)
    /// Find refresh token by token hash
    pub async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, token_hash, expires_at, revoked
            FROM refresh_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find refresh token")?;

        Ok(row.map(|row| RefreshToken {
            id: row.get("id"),
            user_id: row.get::<i64, _>("user_id") as u64,
            token_hash: row.get("token_hash"),
            expires_at: row.get("expires_at"),
            revoked: row.get("revoked"),
        }))
    }

    /// Refresh Token 무효화 (revoked = true)
    /// Revoke refresh token
    pub async fn revoke(&self, token_hash: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked = TRUE, updated_at = NOW()
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .context("Failed to revoke refresh token")?;

        Ok(())
    }

    /// 사용자의 모든 Refresh Token 무효화 (재로그인 시)
    /// Revoke all refresh tokens for a user
    pub async fn revoke_all_for_user(&self, user_id: u64) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked = TRUE, updated_at = NOW()
            WHERE user_id = $1 AND revoked = FALSE
            "#,
        )
        .bind(user_id as i64)
        .execute(&self.pool)
        .await
        .context("Failed to revoke all refresh tokens for user")?;

        Ok(())
    }
}
