//! Exhibit queries

use museum_common::db::{EditLogEntry, Exhibit};
use museum_common::events::EditType;
use museum_common::{Error, Result};
use sqlx::SqlitePool;

use super::edit_logs;

/// Exhibits in one museum, or all exhibits when `address` is `None`
pub async fn list(db: &SqlitePool, address: Option<&str>) -> Result<Vec<Exhibit>> {
    let exhibits = match address {
        Some(address) => {
            sqlx::query_as::<_, Exhibit>(
                "SELECT exid, name, address FROM exhibits WHERE address = ? ORDER BY exid",
            )
            .bind(address)
            .fetch_all(db)
            .await?
        }
        None => {
            sqlx::query_as::<_, Exhibit>("SELECT exid, name, address FROM exhibits ORDER BY exid")
                .fetch_all(db)
                .await?
        }
    };
    Ok(exhibits)
}

/// Insert an exhibit and return its id
pub async fn add(db: &SqlitePool, name: &str, address: &str) -> Result<i64> {
    let result = sqlx::query("INSERT INTO exhibits (name, address) VALUES (?, ?)")
        .bind(name)
        .bind(address)
        .execute(db)
        .await
        .map_err(|e| Error::from_constraint(e, "Exhibit"))?;
    Ok(result.last_insert_rowid())
}

/// Rename an exhibit, logging the edit when `editor` is given
pub async fn rename(
    db: &SqlitePool,
    exid: i64,
    name: &str,
    editor: Option<&str>,
) -> Result<Option<EditLogEntry>> {
    let mut tx = db.begin().await?;

    let result = sqlx::query("UPDATE exhibits SET name = ? WHERE exid = ?")
        .bind(name)
        .bind(exid)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Exhibit {} not found", exid)));
    }

    let entry = match editor {
        Some(email) => Some(edit_logs::record_in(&mut *tx, email, EditType::Exhibit, exid).await?),
        None => None,
    };

    tx.commit().await?;
    Ok(entry)
}

/// Delete an exhibit; refused while artifacts still reference it
pub async fn delete(db: &SqlitePool, exid: i64) -> Result<bool> {
    let held: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM artifacts WHERE exid = ?")
        .bind(exid)
        .fetch_one(db)
        .await?;
    if held > 0 {
        return Err(Error::Conflict(format!(
            "Exhibit {} still holds {} artifact(s)",
            exid, held
        )));
    }

    let result = sqlx::query("DELETE FROM exhibits WHERE exid = ?")
        .bind(exid)
        .execute(db)
        .await
        .map_err(|e| Error::from_constraint(e, "Exhibit"))?;
    Ok(result.rows_affected() > 0)
}
