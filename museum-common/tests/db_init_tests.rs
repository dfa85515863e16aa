//! Tests for database initialization
//!
//! Covers first-run creation, reopening an existing database, and the
//! cascade/restrict rules the schema relies on.

use museum_common::api::auth::{load_signing_secret, SECRET_SETTING_KEY};
use museum_common::db::init::{init_database, SCHEMA_VERSION};
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn fresh_db() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("temp dir");
    let pool = init_database(&dir.path().join("museum.db"))
        .await
        .expect("database should initialize");
    (dir, pool)
}

async fn insert_user(pool: &SqlitePool, email: &str) {
    sqlx::query(
        "INSERT INTO users (email, first_name, last_name, username, password_hash, password_salt)
         VALUES (?, 'First', 'Last', 'user', 'h', 's')",
    )
    .bind(email)
    .execute(pool)
    .await
    .unwrap();
}

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("museum.db");
    assert!(!db_path.exists());

    let result = init_database(&db_path).await;
    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("museum.db");

    let pool1 = init_database(&db_path).await.unwrap();
    insert_user(&pool1, "keep@museum.org").await;
    pool1.close().await;

    let pool2 = init_database(&db_path).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool2)
        .await
        .unwrap();
    assert_eq!(count, 1, "Reopening must not wipe existing rows");
}

#[tokio::test]
async fn test_schema_version_recorded() {
    let (_dir, pool) = fresh_db().await;
    let version: i64 = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(version, SCHEMA_VERSION);
}

#[tokio::test]
async fn test_all_tables_exist() {
    let (_dir, pool) = fresh_db().await;
    let tables: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table'")
            .fetch_all(&pool)
            .await
            .unwrap();

    for expected in [
        "users",
        "visitors",
        "supervisors",
        "employees",
        "museums",
        "visits",
        "exhibits",
        "artifacts",
        "artists",
        "artist_works",
        "events",
        "event_exhibits",
        "artifact_reviews",
        "event_reviews",
        "edit_logs",
        "settings",
    ] {
        assert!(tables.iter().any(|t| t == expected), "missing table {}", expected);
    }
}

#[tokio::test]
async fn test_deleting_user_cascades_to_roles() {
    let (_dir, pool) = fresh_db().await;
    insert_user(&pool, "v@museum.org").await;
    sqlx::query("INSERT INTO visitors (email) VALUES ('v@museum.org')")
        .execute(&pool)
        .await
        .unwrap();

    sqlx::query("DELETE FROM users WHERE email = 'v@museum.org'")
        .execute(&pool)
        .await
        .unwrap();

    let visitors: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visitors")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(visitors, 0);
}

#[tokio::test]
async fn test_exhibit_with_artifacts_cannot_be_deleted() {
    let (_dir, pool) = fresh_db().await;
    sqlx::query("INSERT INTO museums (address, name) VALUES ('1 Main St', 'City Museum')")
        .execute(&pool)
        .await
        .unwrap();
    let exid: i64 = sqlx::query_scalar(
        "INSERT INTO exhibits (name, address) VALUES ('Bronze Age', '1 Main St') RETURNING exid",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO artifacts (name, exid) VALUES ('Helmet', ?)")
        .bind(exid)
        .execute(&pool)
        .await
        .unwrap();

    let result = sqlx::query("DELETE FROM exhibits WHERE exid = ?")
        .bind(exid)
        .execute(&pool)
        .await;
    assert!(result.is_err(), "foreign key should block the delete");
}

#[tokio::test]
async fn test_review_rating_check_constraint() {
    let (_dir, pool) = fresh_db().await;
    insert_user(&pool, "v@museum.org").await;
    sqlx::query("INSERT INTO visitors (email) VALUES ('v@museum.org')")
        .execute(&pool)
        .await
        .unwrap();
    let artid: i64 = sqlx::query_scalar("INSERT INTO artifacts (name) VALUES ('Vase') RETURNING artid")
        .fetch_one(&pool)
        .await
        .unwrap();

    let result = sqlx::query(
        "INSERT INTO artifact_reviews (visitor_email, artid, rating, created_at)
         VALUES ('v@museum.org', ?, 6, '2024-01-01T00:00:00Z')",
    )
    .bind(artid)
    .execute(&pool)
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_signing_secret_is_stable_across_loads() {
    let (_dir, pool) = fresh_db().await;

    let first = load_signing_secret(&pool).await.unwrap();
    let second = load_signing_secret(&pool).await.unwrap();
    assert_ne!(first, 0);
    assert_eq!(first, second);

    let stored: String = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(SECRET_SETTING_KEY)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, first.to_string());
}
