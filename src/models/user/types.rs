use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

const MAX_ID_LEN: usize = 128;

/// Platform role. Drives which dashboard a user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Tester,
    Client,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tester => "TESTER",
            Role::Client => "CLIENT",
            Role::Manager => "MANAGER",
        }
    }

    /// Map a stored role string. Anything unrecognised gets the manager view.
    pub fn from_db(value: &str) -> Self {
        match value {
            "TESTER" => Role::Tester,
            "CLIENT" => Role::Client,
            "MANAGER" => Role::Manager,
            other => {
                log::warn!("Unknown stored role '{other}', falling back to MANAGER");
                Role::Manager
            }
        }
    }
}

/// Public user record, without the password hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub tester_reputation: i32,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User plus stored password hash, for login only.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// A validated, opaque user identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(String);

impl UserId {
    /// Parse a raw identifier from the request. Blank input is "missing";
    /// overlong input or characters outside `[A-Za-z0-9_-]` are "malformed".
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidInput("Missing userId".to_string()));
        }
        if trimmed.len() > MAX_ID_LEN
            || !trimmed.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(AppError::InvalidInput("Malformed userId".to_string()));
        }
        Ok(UserId(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
