//! Museum and visit queries

use museum_common::db::Museum;
use museum_common::{Error, Result};
use sqlx::SqlitePool;

pub async fn all(db: &SqlitePool) -> Result<Vec<Museum>> {
    let museums = sqlx::query_as::<_, Museum>("SELECT name, address FROM museums ORDER BY name")
        .fetch_all(db)
        .await?;
    Ok(museums)
}

pub async fn exists(db: &SqlitePool, address: &str) -> Result<bool> {
    let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM museums WHERE address = ?)")
        .bind(address)
        .fetch_one(db)
        .await?;
    Ok(found)
}

/// Museums a visitor has recorded visiting
pub async fn visited(db: &SqlitePool, visitor_email: &str) -> Result<Vec<Museum>> {
    let museums = sqlx::query_as::<_, Museum>(
        r#"
        SELECT m.name, m.address
        FROM visits v
        JOIN museums m ON v.museum_address = m.address
        WHERE v.visitor_email = ?
        ORDER BY m.name
        "#,
    )
    .bind(visitor_email)
    .fetch_all(db)
    .await?;
    Ok(museums)
}

pub async fn add_visit(db: &SqlitePool, visitor_email: &str, museum_address: &str) -> Result<()> {
    sqlx::query("INSERT INTO visits (visitor_email, museum_address) VALUES (?, ?)")
        .bind(visitor_email)
        .bind(museum_address)
        .execute(db)
        .await
        .map_err(|e| Error::from_constraint(e, "Visit"))?;
    Ok(())
}

/// Returns false when the visit was not recorded
pub async fn delete_visit(db: &SqlitePool, visitor_email: &str, museum_address: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM visits WHERE visitor_email = ? AND museum_address = ?")
        .bind(visitor_email)
        .bind(museum_address)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
