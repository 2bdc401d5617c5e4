//! Competition persistence operations.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use drones_core::fields::DATE_FORMAT;
use drones_core::models::Competition;
use sqlx::SqlitePool;

pub async fn insert_competition(pool: &SqlitePool, competition: &Competition) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO competitions (id, pilot_id, drone_id, distance_in_feet, distance_achievement_date)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(competition.id)
    .bind(competition.pilot_id)
    .bind(competition.drone_id)
    .bind(competition.distance_in_feet)
    .bind(competition.distance_achievement_date.format(DATE_FORMAT).to_string())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn update_competition(pool: &SqlitePool, competition: &Competition) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE competitions SET
            pilot_id = ?2, drone_id = ?3,
            distance_in_feet = ?4, distance_achievement_date = ?5
        WHERE id = ?1
        "#,
    )
    .bind(competition.id)
    .bind(competition.pilot_id)
    .bind(competition.drone_id)
    .bind(competition.distance_in_feet)
    .bind(competition.distance_achievement_date.format(DATE_FORMAT).to_string())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_competition(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM competitions WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn load_all_competitions(pool: &SqlitePool) -> Result<Vec<Competition>> {
    let rows = sqlx::query_as::<_, CompetitionRow>(
        "SELECT id, pilot_id, drone_id, distance_in_feet, distance_achievement_date FROM competitions",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
}

#[derive(sqlx::FromRow)]
struct CompetitionRow {
    id: i64,
    pilot_id: i64,
    drone_id: i64,
    distance_in_feet: i32,
    distance_achievement_date: String,
}

impl TryFrom<CompetitionRow> for Competition {
    type Error = anyhow::Error;

    fn try_from(row: CompetitionRow) -> Result<Self> {
        let distance_achievement_date =
            NaiveDate::parse_from_str(&row.distance_achievement_date, DATE_FORMAT)
                .with_context(|| format!("competition {} has a bad achievement date", row.id))?;

        Ok(Competition {
            id: row.id,
            pilot_id: row.pilot_id,
            drone_id: row.drone_id,
            distance_in_feet: row.distance_in_feet,
            distance_achievement_date,
        })
    }
}
