use sqlx::{PgPool, Row};
use sqlx::postgres::PgRow;
use anyhow::{Context, Result};
use chrono::Utc;
use crate::domains::auth::models::user::{Role, User};

const USER_COLUMNS: &str = "id, email, password_hash, username, role, created_at, updated_at";

pub struct UserRepository {
    pool: PgPool
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        username: Option<&str>,
        role: Role,
    ) -> Result<User> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (email, password_hash, username, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(password_hash)
        .bind(username)
        .bind(role.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Failed to create user")?;

        Ok(map_user(&row))
    }

    // 이메일로 사용자 조회 (로그인용)
    // Get user by email (for login)
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by email")?;

        Ok(row.as_ref().map(map_user))
    }

    // ID로 사용자 조회
    // Get user by ID
    pub async fn get_user_by_id(&self, id: u64) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id as i64)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by id")?;

        Ok(row.as_ref().map(map_user))
    }
}

fn map_user(row: &PgRow) -> User {
    User {
        id: row.get::<i64, _>("id") as u64,
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        username: row.get("username"),
        role: Role::from_db(row.get::<&str, _>("role")),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
