use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::project::{Project, ProjectSummary};

pub const STATUS_PLANNING: &str = "PLANNING";
pub const STATUS_ACTIVE: &str = "ACTIVE";
pub const STATUS_COMPLETED: &str = "COMPLETED";

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TestCycle {
    pub id: String,
    pub name: String,
    pub scope: String,
    pub status: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub project_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TestCycle {
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }
}

/// Cycle with its parent project joined, as embedded in assignments and bug reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCycleWithProject {
    #[serde(flatten)]
    pub cycle: TestCycle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<Project>,
}

/// Row for the test-cycle listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleListItem {
    pub id: String,
    pub name: String,
    pub scope: String,
    pub status: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub project: ProjectSummary,
}

impl CycleListItem {
    pub fn new(cycle: TestCycle, project: &Project) -> Self {
        CycleListItem {
            id: cycle.id,
            name: cycle.name,
            scope: cycle.scope,
            status: cycle.status,
            start_date: cycle.start_date,
            end_date: cycle.end_date,
            project: ProjectSummary::from(project),
        }
    }
}
