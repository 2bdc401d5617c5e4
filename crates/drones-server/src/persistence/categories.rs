//! Drone category persistence operations.

use anyhow::Result;
use drones_core::models::DroneCategory;
use sqlx::SqlitePool;

pub async fn insert_category(pool: &SqlitePool, category: &DroneCategory) -> Result<()> {
    sqlx::query("INSERT INTO drone_categories (id, name) VALUES (?1, ?2)")
        .bind(category.id)
        .bind(&category.name)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_category(pool: &SqlitePool, category: &DroneCategory) -> Result<()> {
    sqlx::query("UPDATE drone_categories SET name = ?2 WHERE id = ?1")
        .bind(category.id)
        .bind(&category.name)
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete a category together with its drones and their competitions.
pub async fn delete_category(pool: &SqlitePool, id: i64) -> Result<bool> {
    let mut tx = pool.begin().await?;
    sqlx::query(
        "DELETE FROM competitions WHERE drone_id IN (SELECT id FROM drones WHERE drone_category_id = ?1)",
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;
    sqlx::query("DELETE FROM drones WHERE drone_category_id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM drone_categories WHERE id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}

pub async fn load_all_categories(pool: &SqlitePool) -> Result<Vec<DroneCategory>> {
    let rows = sqlx::query_as::<_, CategoryRow>("SELECT id, name FROM drone_categories")
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
}

impl From<CategoryRow> for DroneCategory {
    fn from(row: CategoryRow) -> Self {
        DroneCategory {
            id: row.id,
            name: row.name,
        }
    }
}
