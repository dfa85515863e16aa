//! Artifact queries

use museum_common::db::{Artifact, ArtifactRef, EditLogEntry};
use museum_common::events::EditType;
use museum_common::{Error, Result};
use sqlx::SqlitePool;

use super::edit_logs;

pub const DEFAULT_DISPLAY_STATUS: &str = "On Display";

const ARTIFACT_COLUMNS: &str = "artid, name, description, year_made, display_status, exid";

#[derive(Debug, Clone)]
pub struct NewArtifact {
    pub name: String,
    pub description: String,
    pub year_made: Option<i64>,
    pub display_status: Option<String>,
    pub exid: i64,
    pub supervisor_email: String,
}

/// Fields to overwrite; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ArtifactChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub year_made: Option<i64>,
    pub display_status: Option<String>,
    pub exid: Option<i64>,
}

pub async fn all(db: &SqlitePool) -> Result<Vec<Artifact>> {
    let artifacts = sqlx::query_as::<_, Artifact>(&format!(
        "SELECT {} FROM artifacts ORDER BY artid",
        ARTIFACT_COLUMNS
    ))
    .fetch_all(db)
    .await?;
    Ok(artifacts)
}

/// Artifacts a supervisor manages
pub async fn for_supervisor(db: &SqlitePool, supervisor_email: &str) -> Result<Vec<Artifact>> {
    let artifacts = sqlx::query_as::<_, Artifact>(&format!(
        "SELECT {} FROM artifacts WHERE supervisor_email = ? ORDER BY artid",
        ARTIFACT_COLUMNS
    ))
    .bind(supervisor_email)
    .fetch_all(db)
    .await?;
    Ok(artifacts)
}

/// Id and name pairs offered when crediting an artist
pub async fn refs_for_supervisor(db: &SqlitePool, supervisor_email: &str) -> Result<Vec<ArtifactRef>> {
    let refs = sqlx::query_as::<_, ArtifactRef>(
        "SELECT artid, name FROM artifacts WHERE supervisor_email = ? ORDER BY name",
    )
    .bind(supervisor_email)
    .fetch_all(db)
    .await?;
    Ok(refs)
}

/// Insert an artifact and return its id
pub async fn add(db: &SqlitePool, artifact: &NewArtifact) -> Result<i64> {
    let display_status = artifact
        .display_status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(DEFAULT_DISPLAY_STATUS);

    let result = sqlx::query(
        r#"
        INSERT INTO artifacts (name, description, year_made, display_status, exid, supervisor_email)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&artifact.name)
    .bind(&artifact.description)
    .bind(artifact.year_made)
    .bind(display_status)
    .bind(artifact.exid)
    .bind(&artifact.supervisor_email)
    .execute(db)
    .await
    .map_err(|e| Error::from_constraint(e, "Artifact"))?;
    Ok(result.last_insert_rowid())
}

/// Apply `changes` to an artifact, logging the edit when `editor` is given
pub async fn update(
    db: &SqlitePool,
    artid: i64,
    changes: &ArtifactChanges,
    editor: Option<&str>,
) -> Result<Option<EditLogEntry>> {
    let mut tx = db.begin().await?;

    let current = sqlx::query_as::<_, Artifact>(&format!(
        "SELECT {} FROM artifacts WHERE artid = ?",
        ARTIFACT_COLUMNS
    ))
    .bind(artid)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Artifact {} not found", artid)))?;

    sqlx::query(
        r#"
        UPDATE artifacts
        SET name = ?, description = ?, year_made = ?, display_status = ?, exid = ?
        WHERE artid = ?
        "#,
    )
    .bind(changes.name.as_ref().unwrap_or(&current.name))
    .bind(changes.description.as_ref().unwrap_or(&current.description))
    .bind(changes.year_made.or(current.year_made))
    .bind(changes.display_status.as_ref().unwrap_or(&current.display_status))
    .bind(changes.exid.or(current.exid))
    .bind(artid)
    .execute(&mut *tx)
    .await
    .map_err(|e| Error::from_constraint(e, "Artifact"))?;

    let entry = match editor {
        Some(email) => Some(edit_logs::record_in(&mut *tx, email, EditType::Artifact, artid).await?),
        None => None,
    };

    tx.commit().await?;
    Ok(entry)
}

/// Delete an artifact with its reviews and artist credits
pub async fn delete(db: &SqlitePool, artid: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM artifacts WHERE artid = ?")
        .bind(artid)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
