use sqlx::{PgExecutor, PgPool};

use super::types::Project;
use crate::errors::AppError;

const SELECT_PROJECT: &str = "\
    SELECT id, name, description, status, owner_id, created_at, updated_at \
    FROM projects";

/// All projects, oldest first.
pub async fn find_all(pool: &PgPool) -> Result<Vec<Project>, AppError> {
    let projects = sqlx::query_as::<_, Project>(&format!("{SELECT_PROJECT} ORDER BY created_at, id"))
        .fetch_all(pool)
        .await?;
    Ok(projects)
}

pub async fn find_by_owner(pool: &PgPool, owner_id: &str) -> Result<Vec<Project>, AppError> {
    let projects = sqlx::query_as::<_, Project>(&format!(
        "{SELECT_PROJECT} WHERE owner_id = $1 ORDER BY created_at, id"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await?;
    Ok(projects)
}

pub async fn find_by_ids(pool: &PgPool, ids: &[String]) -> Result<Vec<Project>, AppError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let projects = sqlx::query_as::<_, Project>(&format!("{SELECT_PROJECT} WHERE id = ANY($1)"))
        .bind(ids)
        .fetch_all(pool)
        .await?;
    Ok(projects)
}

pub struct NewProject<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub status: &'a str,
    pub owner_id: &'a str,
}

pub async fn create(conn: impl PgExecutor<'_>, project: &NewProject<'_>) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO projects (id, name, description, status, owner_id) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(project.id)
    .bind(project.name)
    .bind(project.description)
    .bind(project.status)
    .bind(project.owner_id)
    .execute(conn)
    .await?;
    Ok(())
}
