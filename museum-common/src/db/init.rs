//! Database initialization
//!
//! Creates the database file on first run and brings every table up to the
//! current schema. All statements are `CREATE ... IF NOT EXISTS`, so opening
//! an existing database is a no-op apart from the pragmas.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Current schema version recorded in `schema_version`
pub const SCHEMA_VERSION: i64 = 1;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Foreign keys are a per-connection pragma, so they go on the connect
    // options rather than a one-off query against the pool
    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create every table (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_schema_version_table(pool).await?;
    create_settings_table(pool).await?;

    // Accounts and roles
    create_users_table(pool).await?;
    create_museums_table(pool).await?;
    create_role_tables(pool).await?;
    create_visits_table(pool).await?;

    // Collection records
    create_exhibits_table(pool).await?;
    create_artifacts_table(pool).await?;
    create_artists_tables(pool).await?;
    create_events_tables(pool).await?;

    // Reviews and audit trail
    create_review_tables(pool).await?;
    create_edit_logs_table(pool).await?;

    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(SCHEMA_VERSION)
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the settings table
///
/// Stores service-wide key-value pairs (token signing secret).
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            email TEXT PRIMARY KEY,
            first_name TEXT NOT NULL,
            middle_name TEXT NOT NULL DEFAULT '',
            last_name TEXT NOT NULL,
            username TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            password_salt TEXT NOT NULL,
            year_of_birth INTEGER,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_museums_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS museums (
            address TEXT PRIMARY KEY,
            name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_role_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS visitors (
            email TEXT PRIMARY KEY REFERENCES users(email) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS supervisors (
            email TEXT PRIMARY KEY REFERENCES users(email) ON DELETE CASCADE,
            museum_address TEXT REFERENCES museums(address) ON DELETE SET NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            email TEXT PRIMARY KEY REFERENCES users(email) ON DELETE CASCADE,
            supervisor_email TEXT NOT NULL REFERENCES supervisors(email) ON DELETE CASCADE,
            museum_address TEXT REFERENCES museums(address) ON DELETE SET NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_employees_supervisor ON employees(supervisor_email)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_visits_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS visits (
            visitor_email TEXT NOT NULL REFERENCES visitors(email) ON DELETE CASCADE,
            museum_address TEXT NOT NULL REFERENCES museums(address) ON DELETE CASCADE,
            PRIMARY KEY (visitor_email, museum_address)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_exhibits_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS exhibits (
            exid INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            address TEXT NOT NULL REFERENCES museums(address) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_artifacts_table(pool: &SqlitePool) -> Result<()> {
    // Artifacts block exhibit deletion (no cascade on exid)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artifacts (
            artid INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            year_made INTEGER,
            supervisor_email TEXT REFERENCES supervisors(email) ON DELETE SET NULL,
            exid INTEGER REFERENCES exhibits(exid),
            display_status TEXT NOT NULL DEFAULT 'On Display'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_artifacts_supervisor ON artifacts(supervisor_email)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_artists_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artists (
            aid INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            middle_name TEXT NOT NULL DEFAULT '',
            last_name TEXT NOT NULL,
            date_of_birth TEXT,
            date_of_death TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artist_works (
            aid INTEGER NOT NULL REFERENCES artists(aid) ON DELETE CASCADE,
            artid INTEGER NOT NULL REFERENCES artifacts(artid) ON DELETE CASCADE,
            PRIMARY KEY (aid, artid)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_events_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            evid INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            address TEXT REFERENCES museums(address) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS event_exhibits (
            evid INTEGER NOT NULL REFERENCES events(evid) ON DELETE CASCADE,
            exid INTEGER NOT NULL REFERENCES exhibits(exid) ON DELETE CASCADE,
            PRIMARY KEY (evid, exid)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_review_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artifact_reviews (
            visitor_email TEXT NOT NULL REFERENCES visitors(email) ON DELETE CASCADE,
            artid INTEGER NOT NULL REFERENCES artifacts(artid) ON DELETE CASCADE,
            rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
            review_desc TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            PRIMARY KEY (visitor_email, artid)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS event_reviews (
            visitor_email TEXT NOT NULL REFERENCES visitors(email) ON DELETE CASCADE,
            evid INTEGER NOT NULL REFERENCES events(evid) ON DELETE CASCADE,
            rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
            review_desc TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            PRIMARY KEY (visitor_email, evid)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_edit_logs_table(pool: &SqlitePool) -> Result<()> {
    // No foreign keys: log rows must survive deletion of the employee or target
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS edit_logs (
            edit_id INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_email TEXT NOT NULL,
            supervisor_email TEXT NOT NULL,
            edit_type TEXT NOT NULL CHECK (edit_type IN ('artifact', 'event', 'exhibit')),
            target_id INTEGER NOT NULL,
            edit_time TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_edit_logs_supervisor ON edit_logs(supervisor_email, edit_id)")
        .execute(pool)
        .await?;

    Ok(())
}
