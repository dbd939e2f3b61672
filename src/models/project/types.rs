use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::bug_report::BugReport;
use crate::models::test_cycle::TestCycle;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal project reference embedded in list payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
}

impl From<&Project> for ProjectSummary {
    fn from(p: &Project) -> Self {
        ProjectSummary { id: p.id.clone(), name: p.name.clone() }
    }
}

/// A project with its cycles in fetch order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectWithCycles {
    pub project: Project,
    pub cycles: Vec<CycleWithIssues>,
}

/// A cycle and its bug reports. `issues` is only loaded where a caller asks for it.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleWithIssues {
    pub cycle: TestCycle,
    pub issues: Vec<BugReport>,
}
