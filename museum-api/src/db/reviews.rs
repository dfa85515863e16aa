//! Star reviews of artifacts and events

use museum_common::db::{Review, VisitorArtifactReview, VisitorEventReview};
use museum_common::time;
use museum_common::{Error, Result};
use sqlx::SqlitePool;

/// What a review is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewTarget {
    Artifact,
    Event,
}

impl ReviewTarget {
    fn review_table(&self) -> &'static str {
        match self {
            ReviewTarget::Artifact => "artifact_reviews",
            ReviewTarget::Event => "event_reviews",
        }
    }

    fn subject_table(&self) -> &'static str {
        match self {
            ReviewTarget::Artifact => "artifacts",
            ReviewTarget::Event => "events",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            ReviewTarget::Artifact => "artid",
            ReviewTarget::Event => "evid",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReviewTarget::Artifact => "Artifact",
            ReviewTarget::Event => "Event",
        }
    }
}

/// Store a visitor's review; one per visitor per target
pub async fn submit(
    db: &SqlitePool,
    target: ReviewTarget,
    visitor_email: &str,
    target_id: i64,
    rating: i64,
    review_desc: &str,
) -> Result<()> {
    let exists: bool = sqlx::query_scalar(&format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?)",
        target.subject_table(),
        target.key()
    ))
    .bind(target_id)
    .fetch_one(db)
    .await?;
    if !exists {
        return Err(Error::NotFound(format!("{} {} not found", target.label(), target_id)));
    }

    sqlx::query(&format!(
        "INSERT INTO {} (visitor_email, {}, rating, review_desc, created_at) VALUES (?, ?, ?, ?, ?)",
        target.review_table(),
        target.key()
    ))
    .bind(visitor_email)
    .bind(target_id)
    .bind(rating)
    .bind(review_desc)
    .bind(time::to_db_string(time::now()))
    .execute(db)
    .await
    .map_err(|e| Error::from_constraint(e, "Review"))?;
    Ok(())
}

/// Reviews of one artifact or event, newest first
pub async fn for_target(db: &SqlitePool, target: ReviewTarget, target_id: i64) -> Result<Vec<Review>> {
    let reviews = sqlx::query_as::<_, Review>(&format!(
        r#"
        SELECT r.visitor_email AS email, u.username, r.rating, r.review_desc, r.created_at
        FROM {} r
        JOIN users u ON r.visitor_email = u.email
        WHERE r.{} = ?
        ORDER BY r.created_at DESC, r.visitor_email
        "#,
        target.review_table(),
        target.key()
    ))
    .bind(target_id)
    .fetch_all(db)
    .await?;
    Ok(reviews)
}

pub async fn artifact_reviews_by(db: &SqlitePool, visitor_email: &str) -> Result<Vec<VisitorArtifactReview>> {
    let reviews = sqlx::query_as::<_, VisitorArtifactReview>(
        r#"
        SELECT r.artid, a.name AS artifact_name, r.rating, r.review_desc, r.created_at
        FROM artifact_reviews r
        JOIN artifacts a ON r.artid = a.artid
        WHERE r.visitor_email = ?
        ORDER BY r.created_at DESC
        "#,
    )
    .bind(visitor_email)
    .fetch_all(db)
    .await?;
    Ok(reviews)
}

pub async fn event_reviews_by(db: &SqlitePool, visitor_email: &str) -> Result<Vec<VisitorEventReview>> {
    let reviews = sqlx::query_as::<_, VisitorEventReview>(
        r#"
        SELECT r.evid, e.name AS event_name, r.rating, r.review_desc, r.created_at
        FROM event_reviews r
        JOIN events e ON r.evid = e.evid
        WHERE r.visitor_email = ?
        ORDER BY r.created_at DESC
        "#,
    )
    .bind(visitor_email)
    .fetch_all(db)
    .await?;
    Ok(reviews)
}

/// Returns false when the visitor had no review of the target
pub async fn delete(
    db: &SqlitePool,
    target: ReviewTarget,
    visitor_email: &str,
    target_id: i64,
) -> Result<bool> {
    let result = sqlx::query(&format!(
        "DELETE FROM {} WHERE visitor_email = ? AND {} = ?",
        target.review_table(),
        target.key()
    ))
    .bind(visitor_email)
    .bind(target_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}
