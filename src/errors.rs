use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use crate::api_structs::ApiErrorResponse;

#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    Migrate(sqlx::migrate::MigrateError),
    Session(String),
    Hash(String),
    /// Missing or malformed request input, rejected before any query runs.
    InvalidInput(String),
    Validation(Vec<String>),
    NotFound(String),
    Unauthorized,
    Forbidden(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Migrate(e) => write!(f, "Migration error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
            AppError::InvalidInput(msg) => write!(f, "{msg}"),
            AppError::Validation(errors) => write!(f, "Validation failed: {}", errors.join("; ")),
            AppError::NotFound(msg) => write!(f, "{msg}"),
            AppError::Unauthorized => write!(f, "Invalid credentials"),
            AppError::Forbidden(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation(errors) => ApiErrorResponse {
                error: "Validation failed".to_string(),
                details: Some(errors.join("; ")),
            },
            AppError::InvalidInput(_)
            | AppError::NotFound(_)
            | AppError::Unauthorized
            | AppError::Forbidden(_) => ApiErrorResponse {
                error: self.to_string(),
                details: None,
            },
            _ => {
                log::error!("{self}");
                ApiErrorResponse {
                    error: "Internal Server Error".to_string(),
                    details: None,
                }
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        AppError::Migrate(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(AppError::InvalidInput("Missing userId".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Validation(vec!["Title is required".into()]).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("User not found".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden("nope".into()).status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn storage_errors_are_opaque_500s() {
        let err = AppError::Db(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("Database error"));
    }
}
