use sqlx::{PgExecutor, PgPool};

use super::types::TestAssignment;
use crate::errors::AppError;

const SELECT_ASSIGNMENT: &str = "\
    SELECT a.id, a.tester_id, a.test_cycle_id, a.status, a.notes, a.created_at, a.updated_at \
    FROM test_assignments a";

/// Most recently updated assignments for one tester.
pub async fn find_recent_for_tester(
    pool: &PgPool,
    tester_id: &str,
    limit: i64,
) -> Result<Vec<TestAssignment>, AppError> {
    let rows = sqlx::query_as::<_, TestAssignment>(&format!(
        "{SELECT_ASSIGNMENT} WHERE a.tester_id = $1 ORDER BY a.updated_at DESC, a.id LIMIT $2"
    ))
    .bind(tester_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Most recently updated assignments across the whole platform.
pub async fn find_recent(pool: &PgPool, limit: i64) -> Result<Vec<TestAssignment>, AppError> {
    let rows = sqlx::query_as::<_, TestAssignment>(&format!(
        "{SELECT_ASSIGNMENT} ORDER BY a.updated_at DESC, a.id LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Number of assignments whose cycle belongs to any of the given projects.
pub async fn count_in_projects(pool: &PgPool, project_ids: &[String]) -> Result<i64, AppError> {
    if project_ids.is_empty() {
        return Ok(0);
    }
    let n: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM test_assignments a \
         JOIN test_cycles c ON c.id = a.test_cycle_id \
         WHERE c.project_id = ANY($1)",
    )
    .bind(project_ids)
    .fetch_one(pool)
    .await?;
    Ok(n)
}

pub struct NewAssignment<'a> {
    pub id: &'a str,
    pub tester_id: &'a str,
    pub test_cycle_id: &'a str,
    pub status: &'a str,
    pub notes: Option<&'a str>,
}

pub async fn create(conn: impl PgExecutor<'_>, assignment: &NewAssignment<'_>) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO test_assignments (id, tester_id, test_cycle_id, status, notes) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(assignment.id)
    .bind(assignment.tester_id)
    .bind(assignment.test_cycle_id)
    .bind(assignment.status)
    .bind(assignment.notes)
    .execute(conn)
    .await?;
    Ok(())
}
