use sqlx::{PgConnection, PgPool, Row};
use sqlx::postgres::PgRow;
use anyhow::{Context, Result};
use chrono::Utc;
use crate::domains::auth::models::{Role, UserResponse};
use crate::domains::stock::models::{Sortie, SortieDraft, SortieWithUser};

const SORTIE_COLUMNS: &str =
    "bon_sortie, code_materiel, user_id, quantite_sortant, destinataire, date_sortie, created_at, updated_at";

/// 출고 + 소유자 (LEFT JOIN users)
const SORTIE_WITH_USER_SELECT: &str = r#"
    SELECT s.bon_sortie, s.code_materiel, s.user_id, s.quantite_sortant, s.destinataire,
           s.date_sortie, s.created_at, s.updated_at,
           u.id AS u_id, u.email AS u_email, u.username AS u_username,
           u.role AS u_role, u.created_at AS u_created_at
    FROM sorties s
    LEFT JOIN users u ON u.id = s.user_id
"#;

pub struct SortieRepository {
    pool: PgPool,
}

impl SortieRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_with_users(&self) -> Result<Vec<SortieWithUser>> {
        let rows = sqlx::query(&format!(
            "{SORTIE_WITH_USER_SELECT} ORDER BY s.created_at ASC, s.bon_sortie ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch sorties")?;

        Ok(rows.iter().map(map_sortie_with_user).collect())
    }

    pub async fn get_with_user(&self, bon_sortie: &str) -> Result<Option<SortieWithUser>> {
        let row = sqlx::query(&format!("{SORTIE_WITH_USER_SELECT} WHERE s.bon_sortie = $1"))
            .bind(bon_sortie)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch sortie by bon")?;

        Ok(row.as_ref().map(map_sortie_with_user))
    }

    pub async fn exists(&self, bon_sortie: &str) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM sorties WHERE bon_sortie = $1) AS found")
            .bind(bon_sortie)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check sortie existence")?;

        Ok(row.get("found"))
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 트랜잭션 내부 전용
    // Transaction-scoped helpers
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// 출고 행 잠금
    /// Lock a sortie row for update
    pub async fn lock(conn: &mut PgConnection, bon_sortie: &str) -> Result<Option<Sortie>> {
        let row = sqlx::query(&format!(
            "SELECT {SORTIE_COLUMNS} FROM sorties WHERE bon_sortie = $1 FOR UPDATE"
        ))
        .bind(bon_sortie)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to lock sortie row")?;

        Ok(row.as_ref().map(map_sortie))
    }

    pub async fn insert(conn: &mut PgConnection, user_id: u64, draft: &SortieDraft) -> Result<Sortie> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO sorties (
                bon_sortie, code_materiel, user_id, quantite_sortant, destinataire, date_sortie,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {SORTIE_COLUMNS}
            "#
        ))
        .bind(&draft.bon_sortie)
        .bind(&draft.code_materiel)
        .bind(user_id as i64)
        .bind(draft.quantite_sortant)
        .bind(&draft.destinataire)
        .bind(draft.date_sortie)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await
        .context("Failed to insert sortie")?;

        Ok(map_sortie(&row))
    }

    /// 출고 필드 교체 (BonSortie 변경 가능, 소유자는 유지)
    pub async fn update(conn: &mut PgConnection, bon_sortie: &str, draft: &SortieDraft) -> Result<Sortie> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE sorties
            SET bon_sortie = $1, code_materiel = $2, quantite_sortant = $3,
                destinataire = $4, date_sortie = $5, updated_at = $6
            WHERE bon_sortie = $7
            RETURNING {SORTIE_COLUMNS}
            "#
        ))
        .bind(&draft.bon_sortie)
        .bind(&draft.code_materiel)
        .bind(draft.quantite_sortant)
        .bind(&draft.destinataire)
        .bind(draft.date_sortie)
        .bind(Utc::now())
        .bind(bon_sortie)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to update sortie")?;

        Ok(map_sortie(&row))
    }

    pub async fn delete(conn: &mut PgConnection, bon_sortie: &str) -> Result<()> {
        sqlx::query("DELETE FROM sorties WHERE bon_sortie = $1")
            .bind(bon_sortie)
            .execute(&mut *conn)
            .await
            .context("Failed to delete sortie")?;

        Ok(())
    }
}

fn map_sortie(row: &PgRow) -> Sortie {
    Sortie {
        bon_sortie: row.get("bon_sortie"),
        code_materiel: row.get("code_materiel"),
        user_id: row.get::<i64, _>("user_id") as u64,
        quantite_sortant: row.get("quantite_sortant"),
        destinataire: row.get("destinataire"),
        date_sortie: row.get("date_sortie"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn map_sortie_with_user(row: &PgRow) -> SortieWithUser {
    let user = row.get::<Option<i64>, _>("u_id").map(|id| UserResponse {
        id: id as u64,
        email: row.get("u_email"),
        username: row.get("u_username"),
        role: Role::from_db(row.get::<&str, _>("u_role")),
        created_at: row.get("u_created_at"),
    });

    SortieWithUser {
        sortie: map_sortie(row),
        user,
    }
}
