use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

use super::types::{Role, User, UserCredentials};
use crate::errors::AppError;

const SELECT_USER: &str = "\
    SELECT id, email, name, role, password_hash, avatar_url, bio, \
           tester_reputation, skills, created_at, updated_at \
    FROM users";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    name: String,
    role: String,
    password_hash: String,
    avatar_url: Option<String>,
    bio: Option<String>,
    tester_reputation: i32,
    skills: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_credentials(self) -> UserCredentials {
        UserCredentials {
            password_hash: self.password_hash,
            user: User {
                id: self.id,
                email: self.email,
                name: self.name,
                role: Role::from_db(&self.role),
                avatar_url: self.avatar_url,
                bio: self.bio,
                tester_reputation: self.tester_reputation,
                skills: self.skills,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
        }
    }
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, AppError> {
    let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.into_credentials().user))
}

/// Load several users at once, in no particular order.
pub async fn find_by_ids(pool: &PgPool, ids: &[String]) -> Result<Vec<User>, AppError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE id = ANY($1)"))
        .bind(ids)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|r| r.into_credentials().user).collect())
}

/// Lookup for login. The only place the password hash leaves the database.
pub async fn find_credentials_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<UserCredentials>, AppError> {
    let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE email = $1"))
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(UserRow::into_credentials))
}

pub async fn count(conn: impl PgExecutor<'_>) -> Result<i64, AppError> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(conn)
        .await?;
    Ok(n)
}

pub async fn count_by_role(pool: &PgPool, role: Role) -> Result<i64, AppError> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = $1")
        .bind(role.as_str())
        .fetch_one(pool)
        .await?;
    Ok(n)
}

/// New user data for creation. `password_hash` must already be hashed.
pub struct NewUser<'a> {
    pub id: &'a str,
    pub email: &'a str,
    pub name: &'a str,
    pub role: Role,
    pub password_hash: &'a str,
    pub avatar_url: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub tester_reputation: i32,
    pub skills: &'a [&'a str],
}

pub async fn create(conn: impl PgExecutor<'_>, user: &NewUser<'_>) -> Result<(), AppError> {
    let skills: Vec<String> = user.skills.iter().map(|s| s.to_string()).collect();
    sqlx::query(
        "INSERT INTO users (id, email, name, role, password_hash, avatar_url, bio, tester_reputation, skills) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(user.id)
    .bind(user.email)
    .bind(user.name)
    .bind(user.role.as_str())
    .bind(user.password_hash)
    .bind(user.avatar_url)
    .bind(user.bio)
    .bind(user.tester_reputation)
    .bind(&skills)
    .execute(conn)
    .await?;
    Ok(())
}
