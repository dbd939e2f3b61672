use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

use super::types::TestCycle;
use crate::errors::AppError;

const SELECT_CYCLE: &str = "\
    SELECT c.id, c.name, c.scope, c.status, c.start_date, c.end_date, c.project_id, \
           c.created_at, c.updated_at \
    FROM test_cycles c";

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<TestCycle>, AppError> {
    let cycle = sqlx::query_as::<_, TestCycle>(&format!("{SELECT_CYCLE} WHERE c.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(cycle)
}

pub async fn find_by_ids(pool: &PgPool, ids: &[String]) -> Result<Vec<TestCycle>, AppError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let cycles = sqlx::query_as::<_, TestCycle>(&format!("{SELECT_CYCLE} WHERE c.id = ANY($1)"))
        .bind(ids)
        .fetch_all(pool)
        .await?;
    Ok(cycles)
}

/// Cycles of the given projects, in a stable order (start date, then id).
/// The dashboard's "first cycle" rules depend on this ordering.
pub async fn find_by_project_ids(pool: &PgPool, project_ids: &[String]) -> Result<Vec<TestCycle>, AppError> {
    if project_ids.is_empty() {
        return Ok(Vec::new());
    }
    let cycles = sqlx::query_as::<_, TestCycle>(&format!(
        "{SELECT_CYCLE} WHERE c.project_id = ANY($1) ORDER BY c.start_date, c.id"
    ))
    .bind(project_ids)
    .fetch_all(pool)
    .await?;
    Ok(cycles)
}

/// Cycles a tester holds an assignment in, newest start first.
pub async fn find_for_tester(pool: &PgPool, tester_id: &str) -> Result<Vec<TestCycle>, AppError> {
    let cycles = sqlx::query_as::<_, TestCycle>(&format!(
        "{SELECT_CYCLE} \
         WHERE EXISTS (SELECT 1 FROM test_assignments a WHERE a.test_cycle_id = c.id AND a.tester_id = $1) \
         ORDER BY c.start_date DESC, c.id"
    ))
    .bind(tester_id)
    .fetch_all(pool)
    .await?;
    Ok(cycles)
}

/// Cycles under projects owned by the given user, newest start first.
pub async fn find_for_owner(pool: &PgPool, owner_id: &str) -> Result<Vec<TestCycle>, AppError> {
    let cycles = sqlx::query_as::<_, TestCycle>(&format!(
        "{SELECT_CYCLE} JOIN projects p ON p.id = c.project_id \
         WHERE p.owner_id = $1 \
         ORDER BY c.start_date DESC, c.id"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await?;
    Ok(cycles)
}

pub async fn count_by_status(pool: &PgPool, status: &str) -> Result<i64, AppError> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM test_cycles WHERE status = $1")
        .bind(status)
        .fetch_one(pool)
        .await?;
    Ok(n)
}

pub struct NewTestCycle<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub scope: &'a str,
    pub status: &'a str,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub project_id: &'a str,
}

pub async fn create(conn: impl PgExecutor<'_>, cycle: &NewTestCycle<'_>) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO test_cycles (id, name, scope, status, start_date, end_date, project_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(cycle.id)
    .bind(cycle.name)
    .bind(cycle.scope)
    .bind(cycle.status)
    .bind(cycle.start_date)
    .bind(cycle.end_date)
    .bind(cycle.project_id)
    .execute(conn)
    .await?;
    Ok(())
}
