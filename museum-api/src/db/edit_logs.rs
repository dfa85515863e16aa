//! Edit audit trail
//!
//! Log rows hold plain emails and ids, not foreign keys, so the trail keeps
//! its history after an employee or an edited record is deleted.

use museum_common::db::EditLogEntry;
use museum_common::events::EditType;
use museum_common::time;
use museum_common::{Error, Result};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use super::accounts;

/// Write one log row on an open connection or transaction
///
/// The employee must exist (their supervisor is copied onto the row) and so
/// must the edited record.
pub async fn record_in(
    conn: &mut SqliteConnection,
    employee_email: &str,
    edit_type: EditType,
    target_id: i64,
) -> Result<EditLogEntry> {
    let supervisor_email = accounts::supervisor_of(&mut *conn, employee_email)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Employee {} not found", employee_email)))?;

    let (table, key) = edit_type.target_table();
    let exists: bool = sqlx::query_scalar(&format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?)",
        table, key
    ))
    .bind(target_id)
    .fetch_one(&mut *conn)
    .await?;
    if !exists {
        return Err(Error::NotFound(format!(
            "{} {} not found",
            edit_type.as_str(),
            target_id
        )));
    }

    let edit_time = time::to_db_string(time::now());
    let result = sqlx::query(
        r#"
        INSERT INTO edit_logs (employee_email, supervisor_email, edit_type, target_id, edit_time)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_email)
    .bind(&supervisor_email)
    .bind(edit_type.as_str())
    .bind(target_id)
    .bind(&edit_time)
    .execute(&mut *conn)
    .await?;

    let entry = EditLogEntry {
        edit_id: result.last_insert_rowid(),
        eemail: employee_email.to_string(),
        semail: supervisor_email,
        edit_type: edit_type.as_str().to_string(),
        target_id,
        edit_time,
    };

    info!(
        "Recorded {} edit of {} by {} (edit_id {})",
        entry.edit_type, entry.target_id, entry.eemail, entry.edit_id
    );
    Ok(entry)
}

/// Write one log row in its own transaction
pub async fn record(
    db: &SqlitePool,
    employee_email: &str,
    edit_type: EditType,
    target_id: i64,
) -> Result<EditLogEntry> {
    let mut tx = db.begin().await?;
    let entry = record_in(&mut *tx, employee_email, edit_type, target_id).await?;
    tx.commit().await?;
    Ok(entry)
}

/// Log rows for one supervisor, newest first
pub async fn for_supervisor(db: &SqlitePool, supervisor_email: &str) -> Result<Vec<EditLogEntry>> {
    let logs = sqlx::query_as::<_, EditLogEntry>(
        r#"
        SELECT edit_id,
               employee_email AS eemail,
               supervisor_email AS semail,
               edit_type,
               target_id,
               edit_time
        FROM edit_logs
        WHERE supervisor_email = ?
        ORDER BY edit_id DESC
        "#,
    )
    .bind(supervisor_email)
    .fetch_all(db)
    .await?;
    Ok(logs)
}
