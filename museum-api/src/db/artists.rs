//! Artist queries
//!
//! Credits live in `artist_works`; an update replaces the whole set.

use std::collections::HashMap;

use museum_common::db::Artist;
use museum_common::{Error, Result};
use sqlx::{FromRow, SqliteConnection, SqlitePool};

#[derive(Debug, Clone, Default)]
pub struct ArtistFields {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub date_of_death: Option<String>,
    pub artifact_ids: Vec<i64>,
}

#[derive(FromRow)]
struct ArtistRow {
    aid: i64,
    first_name: String,
    middle_name: String,
    last_name: String,
    date_of_birth: Option<String>,
    date_of_death: Option<String>,
}

#[derive(FromRow)]
struct CreditRow {
    aid: i64,
    artid: i64,
    name: String,
}

/// Every artist with the artifacts credited to them
pub async fn all(db: &SqlitePool) -> Result<Vec<Artist>> {
    let rows = sqlx::query_as::<_, ArtistRow>(
        r#"
        SELECT aid, first_name, middle_name, last_name, date_of_birth, date_of_death
        FROM artists
        ORDER BY aid
        "#,
    )
    .fetch_all(db)
    .await?;

    let credits = sqlx::query_as::<_, CreditRow>(
        r#"
        SELECT w.aid, a.artid, a.name
        FROM artist_works w
        JOIN artifacts a ON w.artid = a.artid
        ORDER BY w.aid, a.artid
        "#,
    )
    .fetch_all(db)
    .await?;

    let mut by_artist: HashMap<i64, Vec<CreditRow>> = HashMap::new();
    for credit in credits {
        by_artist.entry(credit.aid).or_default().push(credit);
    }

    let artists = rows
        .into_iter()
        .map(|row| {
            let credits = by_artist.remove(&row.aid).unwrap_or_default();
            Artist {
                aid: row.aid,
                first_name: row.first_name,
                middle_name: row.middle_name,
                last_name: row.last_name,
                date_of_birth: row.date_of_birth,
                date_of_death: row.date_of_death,
                artifacts: credits.iter().map(|c| c.name.clone()).collect(),
                artifacts_ids: credits.iter().map(|c| c.artid).collect(),
            }
        })
        .collect();
    Ok(artists)
}

async fn replace_credits(conn: &mut SqliteConnection, aid: i64, artifact_ids: &[i64]) -> Result<()> {
    sqlx::query("DELETE FROM artist_works WHERE aid = ?")
        .bind(aid)
        .execute(&mut *conn)
        .await?;

    for artid in artifact_ids {
        sqlx::query("INSERT OR IGNORE INTO artist_works (aid, artid) VALUES (?, ?)")
            .bind(aid)
            .bind(artid)
            .execute(&mut *conn)
            .await
            .map_err(|e| Error::from_constraint(e, "Artist credit"))?;
    }
    Ok(())
}

/// Insert an artist with their credits and return the new id
pub async fn add(db: &SqlitePool, fields: &ArtistFields) -> Result<i64> {
    let mut tx = db.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO artists (first_name, middle_name, last_name, date_of_birth, date_of_death)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&fields.first_name)
    .bind(&fields.middle_name)
    .bind(&fields.last_name)
    .bind(&fields.date_of_birth)
    .bind(&fields.date_of_death)
    .execute(&mut *tx)
    .await?;
    let aid = result.last_insert_rowid();

    replace_credits(&mut *tx, aid, &fields.artifact_ids).await?;
    tx.commit().await?;
    Ok(aid)
}

/// Overwrite an artist and their credits; false when the artist is unknown
pub async fn update(db: &SqlitePool, aid: i64, fields: &ArtistFields) -> Result<bool> {
    let mut tx = db.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE artists
        SET first_name = ?, middle_name = ?, last_name = ?, date_of_birth = ?, date_of_death = ?
        WHERE aid = ?
        "#,
    )
    .bind(&fields.first_name)
    .bind(&fields.middle_name)
    .bind(&fields.last_name)
    .bind(&fields.date_of_birth)
    .bind(&fields.date_of_death)
    .bind(aid)
    .execute(&mut *tx)
    .await?;
    if result.rows_affected() == 0 {
        return Ok(false);
    }

    replace_credits(&mut *tx, aid, &fields.artifact_ids).await?;
    tx.commit().await?;
    Ok(true)
}

pub async fn delete(db: &SqlitePool, aid: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM artists WHERE aid = ?")
        .bind(aid)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
