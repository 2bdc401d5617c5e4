//! Drone persistence operations.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use drones_core::fields::DATE_FORMAT;
use drones_core::models::Drone;
use sqlx::SqlitePool;

pub async fn insert_drone(pool: &SqlitePool, drone: &Drone) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO drones (id, name, drone_category_id, manufacturing_date, has_it_competed, inserted_timestamp)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(drone.id)
    .bind(&drone.name)
    .bind(drone.drone_category_id)
    .bind(drone.manufacturing_date.format(DATE_FORMAT).to_string())
    .bind(drone.has_it_competed)
    .bind(drone.inserted_timestamp.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update_drone(pool: &SqlitePool, drone: &Drone) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE drones SET
            name = ?2, drone_category_id = ?3,
            manufacturing_date = ?4, has_it_competed = ?5
        WHERE id = ?1
        "#,
    )
    .bind(drone.id)
    .bind(&drone.name)
    .bind(drone.drone_category_id)
    .bind(drone.manufacturing_date.format(DATE_FORMAT).to_string())
    .bind(drone.has_it_competed)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete a drone and every competition flown with it.
pub async fn delete_drone(pool: &SqlitePool, id: i64) -> Result<bool> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM competitions WHERE drone_id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM drones WHERE id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}

pub async fn load_all_drones(pool: &SqlitePool) -> Result<Vec<Drone>> {
    let rows = sqlx::query_as::<_, DroneRow>(
        "SELECT id, name, drone_category_id, manufacturing_date, has_it_competed, inserted_timestamp FROM drones",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
}

// Internal row type for SQLx
#[derive(sqlx::FromRow)]
struct DroneRow {
    id: i64,
    name: String,
    drone_category_id: i64,
    manufacturing_date: String,
    has_it_competed: bool,
    inserted_timestamp: String,
}

impl TryFrom<DroneRow> for Drone {
    type Error = anyhow::Error;

    fn try_from(row: DroneRow) -> Result<Self> {
        let manufacturing_date = NaiveDate::parse_from_str(&row.manufacturing_date, DATE_FORMAT)
            .with_context(|| format!("drone {} has a bad manufacturing_date", row.id))?;

        let inserted_timestamp = DateTime::parse_from_rfc3339(&row.inserted_timestamp)
            .map(|dt| dt.with_timezone(&Utc))
            .with_context(|| format!("drone {} has a bad inserted_timestamp", row.id))?;

        Ok(Drone {
            id: row.id,
            name: row.name,
            drone_category_id: row.drone_category_id,
            manufacturing_date,
            has_it_competed: row.has_it_competed,
            inserted_timestamp,
        })
    }
}
