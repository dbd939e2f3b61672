use sqlx::{PgExecutor, PgPool};

use super::types::{BugReport, NewBugReport};
use crate::errors::AppError;

const SELECT_BUG_REPORT: &str = "\
    SELECT b.id, b.title, b.severity, b.steps_to_reproduce, b.expected_result, b.actual_result, \
           b.environment, b.status, b.attachments, b.reporter_id, b.test_cycle_id, \
           b.created_at, b.updated_at \
    FROM bug_reports b";

/// Newest reports filed by one tester. `limit = None` returns all of them.
pub async fn find_recent_by_reporter(
    pool: &PgPool,
    reporter_id: &str,
    limit: Option<i64>,
) -> Result<Vec<BugReport>, AppError> {
    let rows = sqlx::query_as::<_, BugReport>(&format!(
        "{SELECT_BUG_REPORT} WHERE b.reporter_id = $1 ORDER BY b.created_at DESC, b.id LIMIT $2"
    ))
    .bind(reporter_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Newest reports against any project owned by `owner_id`.
pub async fn find_recent_for_owner(
    pool: &PgPool,
    owner_id: &str,
    limit: Option<i64>,
) -> Result<Vec<BugReport>, AppError> {
    let rows = sqlx::query_as::<_, BugReport>(&format!(
        "{SELECT_BUG_REPORT} \
         JOIN test_cycles c ON c.id = b.test_cycle_id \
         JOIN projects p ON p.id = c.project_id \
         WHERE p.owner_id = $1 \
         ORDER BY b.created_at DESC, b.id LIMIT $2"
    ))
    .bind(owner_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Newest reports platform-wide.
pub async fn find_recent(pool: &PgPool, limit: i64) -> Result<Vec<BugReport>, AppError> {
    let rows = sqlx::query_as::<_, BugReport>(&format!(
        "{SELECT_BUG_REPORT} ORDER BY b.created_at DESC, b.id LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_cycle_ids(pool: &PgPool, cycle_ids: &[String]) -> Result<Vec<BugReport>, AppError> {
    if cycle_ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query_as::<_, BugReport>(&format!(
        "{SELECT_BUG_REPORT} WHERE b.test_cycle_id = ANY($1) ORDER BY b.created_at, b.id"
    ))
    .bind(cycle_ids)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn count_by_reporter(pool: &PgPool, reporter_id: &str) -> Result<i64, AppError> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bug_reports WHERE reporter_id = $1")
        .bind(reporter_id)
        .fetch_one(pool)
        .await?;
    Ok(n)
}

pub async fn create(conn: impl PgExecutor<'_>, report: &NewBugReport) -> Result<BugReport, AppError> {
    let created = sqlx::query_as::<_, BugReport>(
        "INSERT INTO bug_reports (id, title, severity, steps_to_reproduce, expected_result, \
                                  actual_result, environment, attachments, reporter_id, test_cycle_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING id, title, severity, steps_to_reproduce, expected_result, actual_result, \
                   environment, status, attachments, reporter_id, test_cycle_id, created_at, updated_at",
    )
    .bind(&report.id)
    .bind(&report.title)
    .bind(&report.severity)
    .bind(&report.steps_to_reproduce)
    .bind(&report.expected_result)
    .bind(&report.actual_result)
    .bind(&report.environment)
    .bind(&report.attachments)
    .bind(&report.reporter_id)
    .bind(&report.test_cycle_id)
    .fetch_one(conn)
    .await?;
    Ok(created)
}
