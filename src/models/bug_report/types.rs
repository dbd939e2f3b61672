use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::test_cycle::TestCycleWithProject;
use crate::models::user::User;

pub const STATUS_OPEN: &str = "OPEN";
pub const STATUS_RESOLVED: &str = "RESOLVED";

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BugReport {
    pub id: String,
    pub title: String,
    pub severity: String,
    pub steps_to_reproduce: String,
    pub expected_result: String,
    pub actual_result: String,
    pub environment: String,
    pub status: String,
    pub attachments: Vec<String>,
    pub reporter_id: String,
    pub test_cycle_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_cycle: Option<TestCycleWithProject>,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter: Option<User>,
}

impl BugReport {
    pub fn is_open(&self) -> bool {
        self.status != STATUS_RESOLVED
    }

    /// Project id via the joined cycle; `None` when the cycle was not loaded.
    pub fn project_id(&self) -> Option<&str> {
        self.test_cycle.as_ref().map(|c| c.cycle.project_id.as_str())
    }
}

/// Validated input for filing a bug report.
#[derive(Debug, Clone)]
pub struct NewBugReport {
    pub id: String,
    pub title: String,
    pub severity: String,
    pub steps_to_reproduce: String,
    pub expected_result: String,
    pub actual_result: String,
    pub environment: String,
    pub attachments: Vec<String>,
    pub reporter_id: String,
    pub test_cycle_id: String,
}
