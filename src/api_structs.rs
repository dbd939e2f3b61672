use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// API error response.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// `?userId=` query string shared by the read endpoints.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize, Debug)]
pub struct LoginResponse {
    pub user: User,
}

/// Create bug report request for API.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BugReportRequest {
    pub user_id: String,
    pub title: String,
    pub severity: String,
    pub steps_to_reproduce: String,
    pub expected_result: String,
    pub actual_result: String,
    pub environment: String,
    pub test_cycle_id: String,
    pub attachments: Option<Vec<String>>,
}
