//! Event queries
//!
//! An event is linked to exhibits through `event_exhibits`. The API exposes a
//! single `exid` per event: the lowest linked exhibit id.

use museum_common::db::{EditLogEntry, Event, EventListing};
use museum_common::events::EditType;
use museum_common::validate::validate_date_range;
use museum_common::{Error, Result};
use sqlx::{SqliteConnection, SqlitePool};

use super::edit_logs;

const EVENT_SELECT: &str = r#"
    SELECT e.evid, e.name, e.start_date, e.end_date, e.address,
           (SELECT MIN(x.exid) FROM event_exhibits x WHERE x.evid = e.evid) AS exid
    FROM events e
"#;

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub address: Option<String>,
    pub exid: Option<i64>,
}

/// Fields to overwrite; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub exid: Option<i64>,
}

/// Events at one museum, or all events when `address` is `None`
pub async fn list(db: &SqlitePool, address: Option<&str>) -> Result<Vec<Event>> {
    let events = match address {
        Some(address) => {
            sqlx::query_as::<_, Event>(&format!("{} WHERE e.address = ? ORDER BY e.start_date, e.evid", EVENT_SELECT))
                .bind(address)
                .fetch_all(db)
                .await?
        }
        None => {
            sqlx::query_as::<_, Event>(&format!("{} ORDER BY e.start_date, e.evid", EVENT_SELECT))
                .fetch_all(db)
                .await?
        }
    };
    Ok(events)
}

/// Public listing with exhibit and museum names resolved
pub async fn listings(db: &SqlitePool) -> Result<Vec<EventListing>> {
    let events = sqlx::query_as::<_, EventListing>(
        r#"
        SELECT e.evid AS eid, e.name, e.start_date, e.end_date,
               x.name AS exhibit_name,
               m.name AS museum_name,
               m.address AS location
        FROM events e
        LEFT JOIN exhibits x
               ON x.exid = (SELECT MIN(ee.exid) FROM event_exhibits ee WHERE ee.evid = e.evid)
        LEFT JOIN museums m ON m.address = e.address
        ORDER BY e.start_date, e.evid
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(events)
}

async fn link_exhibit(conn: &mut SqliteConnection, evid: i64, exid: i64) -> Result<()> {
    sqlx::query("DELETE FROM event_exhibits WHERE evid = ?")
        .bind(evid)
        .execute(&mut *conn)
        .await?;
    sqlx::query("INSERT INTO event_exhibits (evid, exid) VALUES (?, ?)")
        .bind(evid)
        .bind(exid)
        .execute(&mut *conn)
        .await
        .map_err(|e| Error::from_constraint(e, "Event exhibit"))?;
    Ok(())
}

/// Insert an event (dates already validated) and return its id
pub async fn add(db: &SqlitePool, event: &NewEvent) -> Result<i64> {
    let mut tx = db.begin().await?;

    let result = sqlx::query(
        "INSERT INTO events (name, start_date, end_date, address) VALUES (?, ?, ?, ?)",
    )
    .bind(&event.name)
    .bind(&event.start_date)
    .bind(&event.end_date)
    .bind(&event.address)
    .execute(&mut *tx)
    .await
    .map_err(|e| Error::from_constraint(e, "Event"))?;
    let evid = result.last_insert_rowid();

    if let Some(exid) = event.exid {
        link_exhibit(&mut *tx, evid, exid).await?;
    }

    tx.commit().await?;
    Ok(evid)
}

/// Apply `changes`, revalidating the merged date range
///
/// Logs the edit in the same transaction when `editor` is given.
pub async fn update(
    db: &SqlitePool,
    evid: i64,
    changes: &EventChanges,
    editor: Option<&str>,
) -> Result<Option<EditLogEntry>> {
    let mut tx = db.begin().await?;

    let current = sqlx::query_as::<_, Event>(&format!("{} WHERE e.evid = ?", EVENT_SELECT))
        .bind(evid)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Event {} not found", evid)))?;

    let name = changes.name.as_ref().unwrap_or(&current.name);
    let start_date = changes.start_date.as_ref().unwrap_or(&current.start_date);
    let end_date = changes.end_date.as_ref().unwrap_or(&current.end_date);
    validate_date_range(start_date, end_date)?;

    sqlx::query("UPDATE events SET name = ?, start_date = ?, end_date = ? WHERE evid = ?")
        .bind(name)
        .bind(start_date)
        .bind(end_date)
        .bind(evid)
        .execute(&mut *tx)
        .await?;

    if let Some(exid) = changes.exid {
        link_exhibit(&mut *tx, evid, exid).await?;
    }

    let entry = match editor {
        Some(email) => Some(edit_logs::record_in(&mut *tx, email, EditType::Event, evid).await?),
        None => None,
    };

    tx.commit().await?;
    Ok(entry)
}

/// Delete an event with its reviews and exhibit links
pub async fn delete(db: &SqlitePool, evid: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM events WHERE evid = ?")
        .bind(evid)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
