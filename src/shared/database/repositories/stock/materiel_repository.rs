use std::collections::BTreeMap;

use sqlx::{PgConnection, PgPool, Row};
use sqlx::postgres::PgRow;
use anyhow::{Context, Result};
use chrono::Utc;
use crate::domains::stock::models::{Materiel, MaterielDraft};

pub struct MaterielRepository {
    pool: PgPool,
}

impl MaterielRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, draft: &MaterielDraft) -> Result<Materiel> {
        let row = sqlx::query(
            r#"
            INSERT INTO materiels (code_materiel, quantite, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING code_materiel, quantite, created_at, updated_at
            "#,
        )
        .bind(&draft.code_materiel)
        .bind(draft.quantite)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Failed to create materiel")?;

        Ok(map_materiel(&row))
    }

    pub async fn list(&self) -> Result<Vec<Materiel>> {
        let rows = sqlx::query(
            r#"
            SELECT code_materiel, quantite, created_at, updated_at
            FROM materiels
            ORDER BY code_materiel ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch materiels")?;

        Ok(rows.iter().map(map_materiel).collect())
    }

    pub async fn get_by_code(&self, code_materiel: &str) -> Result<Option<Materiel>> {
        let row = sqlx::query(
            r#"
            SELECT code_materiel, quantite, created_at, updated_at
            FROM materiels
            WHERE code_materiel = $1
            "#,
        )
        .bind(code_materiel)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch materiel by code")?;

        Ok(row.as_ref().map(map_materiel))
    }

    /// 자재 재고 행 잠금 (트랜잭션 내부에서 호출)
    /// Lock materiel rows for update, always in code order so concurrent
    /// transactions acquire them in the same sequence
    pub async fn lock_levels(
        conn: &mut PgConnection,
        codes: Vec<String>,
    ) -> Result<BTreeMap<String, i64>> {
        let rows = sqlx::query(
            r#"
            SELECT code_materiel, quantite
            FROM materiels
            WHERE code_materiel = ANY($1)
            ORDER BY code_materiel ASC
            FOR UPDATE
            "#,
        )
        .bind(codes)
        .fetch_all(&mut *conn)
        .await
        .context("Failed to lock materiel rows")?;

        Ok(rows
            .into_iter()
            .map(|row| (row.get("code_materiel"), row.get("quantite")))
            .collect())
    }

    /// 잠긴 자재의 재고 수량 갱신
    pub async fn set_quantite(conn: &mut PgConnection, code_materiel: &str, quantite: i64) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE materiels
            SET quantite = $1, updated_at = $2
            WHERE code_materiel = $3
            "#,
        )
        .bind(quantite)
        .bind(Utc::now())
        .bind(code_materiel)
        .execute(&mut *conn)
        .await
        .context("Failed to update materiel quantity")?;

        Ok(())
    }
}

fn map_materiel(row: &PgRow) -> Materiel {
    Materiel {
        code_materiel: row.get("code_materiel"),
        quantite: row.get("quantite"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
