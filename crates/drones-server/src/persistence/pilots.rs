//! Pilot persistence operations.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use drones_core::models::{Gender, Pilot};
use sqlx::SqlitePool;

pub async fn insert_pilot(pool: &SqlitePool, pilot: &Pilot) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO pilots (id, name, gender, races_count, inserted_timestamp)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(pilot.id)
    .bind(&pilot.name)
    .bind(pilot.gender.code())
    .bind(pilot.races_count)
    .bind(pilot.inserted_timestamp.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update_pilot(pool: &SqlitePool, pilot: &Pilot) -> Result<()> {
    sqlx::query("UPDATE pilots SET name = ?2, gender = ?3, races_count = ?4 WHERE id = ?1")
        .bind(pilot.id)
        .bind(&pilot.name)
        .bind(pilot.gender.code())
        .bind(pilot.races_count)
        .execute(pool)
        .await?;

    Ok(())
}

/// Delete a pilot and their competitions.
pub async fn delete_pilot(pool: &SqlitePool, id: i64) -> Result<bool> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM competitions WHERE pilot_id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM pilots WHERE id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}

pub async fn load_all_pilots(pool: &SqlitePool) -> Result<Vec<Pilot>> {
    let rows = sqlx::query_as::<_, PilotRow>(
        "SELECT id, name, gender, races_count, inserted_timestamp FROM pilots",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
}

#[derive(sqlx::FromRow)]
struct PilotRow {
    id: i64,
    name: String,
    gender: String,
    races_count: i32,
    inserted_timestamp: String,
}

impl TryFrom<PilotRow> for Pilot {
    type Error = anyhow::Error;

    fn try_from(row: PilotRow) -> Result<Self> {
        let gender = Gender::from_code(&row.gender).ok_or_else(|| {
            anyhow::anyhow!("pilot {} has unknown gender code {:?}", row.id, row.gender)
        })?;

        let inserted_timestamp = DateTime::parse_from_rfc3339(&row.inserted_timestamp)
            .map(|dt| dt.with_timezone(&Utc))
            .with_context(|| format!("pilot {} has a bad inserted_timestamp", row.id))?;

        Ok(Pilot {
            id: row.id,
            name: row.name,
            gender,
            races_count: row.races_count,
            inserted_timestamp,
        })
    }
}
