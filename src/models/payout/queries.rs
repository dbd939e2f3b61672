use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

use super::types::Payout;
use crate::errors::AppError;

pub async fn find_recent_for_tester(
    pool: &PgPool,
    tester_id: &str,
    limit: i64,
) -> Result<Vec<Payout>, AppError> {
    let rows = sqlx::query_as::<_, Payout>(
        "SELECT id, tester_id, amount, currency, status, paid_at, created_at \
         FROM payouts WHERE tester_id = $1 \
         ORDER BY created_at DESC, id LIMIT $2",
    )
    .bind(tester_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Sum of every payout amount regardless of status; zero on an empty table.
pub async fn sum_amounts(pool: &PgPool) -> Result<f64, AppError> {
    let total: f64 = sqlx::query_scalar("SELECT COALESCE(SUM(amount), 0)::FLOAT8 FROM payouts")
        .fetch_one(pool)
        .await?;
    Ok(total)
}

pub struct NewPayout<'a> {
    pub id: &'a str,
    pub tester_id: &'a str,
    pub amount: f64,
    pub status: &'a str,
    pub paid_at: Option<DateTime<Utc>>,
}

pub async fn create(conn: impl PgExecutor<'_>, payout: &NewPayout<'_>) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO payouts (id, tester_id, amount, status, paid_at) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(payout.id)
    .bind(payout.tester_id)
    .bind(payout.amount)
    .bind(payout.status)
    .bind(payout.paid_at)
    .execute(conn)
    .await?;
    Ok(())
}
