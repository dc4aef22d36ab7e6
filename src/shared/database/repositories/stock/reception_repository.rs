use sqlx::{PgPool, Row};
use sqlx::postgres::PgRow;
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use crate::domains::stock::models::{Reception, ReceptionDraft};

pub struct ReceptionRepository {
    pool: PgPool,
}

impl ReceptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: u64, draft: &ReceptionDraft) -> Result<Reception> {
        let row = sqlx::query(
            r#"
            INSERT INTO receptions (
                bon_reception, code_materiel, user_id, quantite_recu, date_reception,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING bon_reception, code_materiel, user_id, quantite_recu, date_reception,
                      created_at, updated_at
            "#,
        )
        .bind(&draft.bon_reception)
        .bind(&draft.code_materiel)
        .bind(user_id as i64)
        .bind(draft.quantite_recu)
        .bind(draft.date_reception)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Failed to create reception")?;

        Ok(map_reception(&row))
    }

    pub async fn list(&self) -> Result<Vec<Reception>> {
        let rows = sqlx::query(
            r#"
            SELECT bon_reception, code_materiel, user_id, quantite_recu, date_reception,
                   created_at, updated_at
            FROM receptions
            ORDER BY date_reception DESC, bon_reception ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch receptions")?;

        Ok(rows.iter().map(map_reception).collect())
    }

    pub async fn get_by_bon(&self, bon_reception: &str) -> Result<Option<Reception>> {
        let row = sqlx::query(
            r#"
            SELECT bon_reception, code_materiel, user_id, quantite_recu, date_reception,
                   created_at, updated_at
            FROM receptions
            WHERE bon_reception = $1
            "#,
        )
        .bind(bon_reception)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch reception by bon")?;

        Ok(row.as_ref().map(map_reception))
    }

    /// 자재의 가장 최근 입고일
    /// Latest reception date for a materiel
    pub async fn latest_date_for(&self, code_materiel: &str) -> Result<Option<NaiveDate>> {
        let row = sqlx::query(
            r#"
            SELECT MAX(date_reception) AS latest
            FROM receptions
            WHERE code_materiel = $1
            "#,
        )
        .bind(code_materiel)
        .fetch_one(&self.pool)
        .await
        .context("Failed to fetch latest reception date")?;

        Ok(row.get("latest"))
    }
}

fn map_reception(row: &PgRow) -> Reception {
    Reception {
        bon_reception: row.get("bon_reception"),
        code_materiel: row.get("code_materiel"),
        user_id: row.get::<i64, _>("user_id") as u64,
        quantite_recu: row.get("quantite_recu"),
        date_reception: row.get("date_reception"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
