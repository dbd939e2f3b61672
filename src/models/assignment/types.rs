use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::test_cycle::TestCycleWithProject;
use crate::models::user::User;

pub const STATUS_ASSIGNED: &str = "ASSIGNED";
pub const STATUS_IN_PROGRESS: &str = "IN_PROGRESS";
pub const STATUS_AWAITING_FEEDBACK: &str = "AWAITING_FEEDBACK";
pub const STATUS_COMPLETED: &str = "COMPLETED";

/// Binding of one tester to one test cycle.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TestAssignment {
    pub id: String,
    pub tester_id: String,
    pub test_cycle_id: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_cycle: Option<TestCycleWithProject>,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tester: Option<User>,
}

impl TestAssignment {
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }
}
