//! Postgres implementation of the storage traits.
//!
//! Joins ("cycle with its project", "assignment with its tester") are
//! resolved with one batched `= ANY($1)` query per related table rather than
//! wide multi-table selects, so every row type keeps a single SQL shape.

use std::collections::{HashMap, HashSet};

use sqlx::PgPool;

use crate::dashboard::DashboardStore;
use crate::errors::AppError;
use crate::models::assignment::{self, TestAssignment};
use crate::models::bug_report::{self, BugReport, NewBugReport};
use crate::models::payout::{self, Payout};
use crate::models::project::{self, CycleWithIssues, Project, ProjectWithCycles};
use crate::models::test_cycle::{self, CycleListItem, TestCycle, TestCycleWithProject};
use crate::models::user::{self, Role, User, UserCredentials};
use crate::tracker::TrackerStore;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

/// Distinct ids in first-seen order.
fn unique_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    async fn projects_by_id(&self, ids: &[String]) -> Result<HashMap<String, Project>, AppError> {
        let projects = project::find_by_ids(&self.pool, ids).await?;
        Ok(projects.into_iter().map(|p| (p.id.clone(), p)).collect())
    }

    async fn users_by_id(&self, ids: &[String]) -> Result<HashMap<String, User>, AppError> {
        let users = user::find_by_ids(&self.pool, ids).await?;
        Ok(users.into_iter().map(|u| (u.id.clone(), u)).collect())
    }

    /// Load the given cycles with their projects, keyed by cycle id.
    async fn cycles_with_projects(&self, cycle_ids: &[String]) -> Result<HashMap<String, TestCycleWithProject>, AppError> {
        let cycles = test_cycle::find_by_ids(&self.pool, cycle_ids).await?;
        let project_ids = unique_ids(cycles.iter().map(|c| c.project_id.as_str()));
        let projects = self.projects_by_id(&project_ids).await?;
        Ok(cycles
            .into_iter()
            .map(|cycle| {
                let project = projects.get(&cycle.project_id).cloned();
                (cycle.id.clone(), TestCycleWithProject { cycle, project })
            })
            .collect())
    }

    async fn join_assignment_cycles(&self, mut rows: Vec<TestAssignment>) -> Result<Vec<TestAssignment>, AppError> {
        let cycle_ids = unique_ids(rows.iter().map(|a| a.test_cycle_id.as_str()));
        let cycles = self.cycles_with_projects(&cycle_ids).await?;
        for row in &mut rows {
            row.test_cycle = cycles.get(&row.test_cycle_id).cloned();
        }
        Ok(rows)
    }

    async fn join_report_cycles(&self, mut rows: Vec<BugReport>) -> Result<Vec<BugReport>, AppError> {
        let cycle_ids = unique_ids(rows.iter().map(|b| b.test_cycle_id.as_str()));
        let cycles = self.cycles_with_projects(&cycle_ids).await?;
        for row in &mut rows {
            row.test_cycle = cycles.get(&row.test_cycle_id).cloned();
        }
        Ok(rows)
    }

    /// Group cycles (and optionally their issues) under each project, keeping project order.
    async fn group_cycles(&self, projects: Vec<Project>, with_issues: bool) -> Result<Vec<ProjectWithCycles>, AppError> {
        let project_ids: Vec<String> = projects.iter().map(|p| p.id.clone()).collect();
        let cycles = test_cycle::find_by_project_ids(&self.pool, &project_ids).await?;

        let mut issues_by_cycle: HashMap<String, Vec<BugReport>> = HashMap::new();
        if with_issues {
            let cycle_ids: Vec<String> = cycles.iter().map(|c| c.id.clone()).collect();
            for issue in bug_report::find_by_cycle_ids(&self.pool, &cycle_ids).await? {
                issues_by_cycle.entry(issue.test_cycle_id.clone()).or_default().push(issue);
            }
        }

        let mut cycles_by_project: HashMap<String, Vec<CycleWithIssues>> = HashMap::new();
        for cycle in cycles {
            let issues = issues_by_cycle.remove(&cycle.id).unwrap_or_default();
            cycles_by_project
                .entry(cycle.project_id.clone())
                .or_default()
                .push(CycleWithIssues { cycle, issues });
        }

        Ok(projects
            .into_iter()
            .map(|project| {
                let cycles = cycles_by_project.remove(&project.id).unwrap_or_default();
                ProjectWithCycles { project, cycles }
            })
            .collect())
    }

    async fn cycle_list(&self, cycles: Vec<TestCycle>) -> Result<Vec<CycleListItem>, AppError> {
        let project_ids = unique_ids(cycles.iter().map(|c| c.project_id.as_str()));
        let projects = self.projects_by_id(&project_ids).await?;
        // Foreign keys guarantee the project; skip rather than fail on a race with a delete.
        Ok(cycles
            .into_iter()
            .filter_map(|cycle| {
                let project = projects.get(&cycle.project_id)?;
                Some(CycleListItem::new(cycle, project))
            })
            .collect())
    }
}

impl DashboardStore for PgStore {
    async fn find_user(&self, id: &str) -> Result<Option<User>, AppError> {
        user::find_by_id(&self.pool, id).await
    }

    async fn recent_assignments_for_tester(&self, tester_id: &str, limit: i64) -> Result<Vec<TestAssignment>, AppError> {
        let rows = assignment::find_recent_for_tester(&self.pool, tester_id, limit).await?;
        self.join_assignment_cycles(rows).await
    }

    async fn recent_bug_reports_by_reporter(&self, reporter_id: &str, limit: i64) -> Result<Vec<BugReport>, AppError> {
        let rows = bug_report::find_recent_by_reporter(&self.pool, reporter_id, Some(limit)).await?;
        self.join_report_cycles(rows).await
    }

    async fn count_bug_reports_by_reporter(&self, reporter_id: &str) -> Result<i64, AppError> {
        bug_report::count_by_reporter(&self.pool, reporter_id).await
    }

    async fn recent_payouts_for_tester(&self, tester_id: &str, limit: i64) -> Result<Vec<Payout>, AppError> {
        payout::find_recent_for_tester(&self.pool, tester_id, limit).await
    }

    async fn projects_with_issues_for_owner(&self, owner_id: &str) -> Result<Vec<ProjectWithCycles>, AppError> {
        let projects = project::find_by_owner(&self.pool, owner_id).await?;
        self.group_cycles(projects, true).await
    }

    async fn recent_bug_reports_for_owner(&self, owner_id: &str, limit: i64) -> Result<Vec<BugReport>, AppError> {
        let rows = bug_report::find_recent_for_owner(&self.pool, owner_id, Some(limit)).await?;
        self.join_report_cycles(rows).await
    }

    async fn count_assignments_in_projects(&self, project_ids: &[String]) -> Result<i64, AppError> {
        assignment::count_in_projects(&self.pool, project_ids).await
    }

    async fn recent_assignments(&self, limit: i64) -> Result<Vec<TestAssignment>, AppError> {
        let rows = assignment::find_recent(&self.pool, limit).await?;
        let mut rows = self.join_assignment_cycles(rows).await?;
        let tester_ids = unique_ids(rows.iter().map(|a| a.tester_id.as_str()));
        let testers = self.users_by_id(&tester_ids).await?;
        for row in &mut rows {
            row.tester = testers.get(&row.tester_id).cloned();
        }
        Ok(rows)
    }

    async fn projects_with_cycles(&self) -> Result<Vec<ProjectWithCycles>, AppError> {
        let projects = project::find_all(&self.pool).await?;
        self.group_cycles(projects, false).await
    }

    async fn recent_bug_reports(&self, limit: i64) -> Result<Vec<BugReport>, AppError> {
        let rows = bug_report::find_recent(&self.pool, limit).await?;
        let mut rows = self.join_report_cycles(rows).await?;
        let reporter_ids = unique_ids(rows.iter().map(|b| b.reporter_id.as_str()));
        let reporters = self.users_by_id(&reporter_ids).await?;
        for row in &mut rows {
            row.reporter = reporters.get(&row.reporter_id).cloned();
        }
        Ok(rows)
    }

    async fn count_users_by_role(&self, role: Role) -> Result<i64, AppError> {
        user::count_by_role(&self.pool, role).await
    }

    async fn count_cycles_by_status(&self, status: &str) -> Result<i64, AppError> {
        test_cycle::count_by_status(&self.pool, status).await
    }

    async fn sum_payout_amounts(&self) -> Result<f64, AppError> {
        payout::sum_amounts(&self.pool).await
    }
}

impl TrackerStore for PgStore {
    async fn find_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>, AppError> {
        user::find_credentials_by_email(&self.pool, email).await
    }

    async fn find_cycle(&self, id: &str) -> Result<Option<TestCycle>, AppError> {
        test_cycle::find_by_id(&self.pool, id).await
    }

    async fn cycles_for_tester(&self, tester_id: &str) -> Result<Vec<CycleListItem>, AppError> {
        let cycles = test_cycle::find_for_tester(&self.pool, tester_id).await?;
        self.cycle_list(cycles).await
    }

    async fn cycles_for_owner(&self, owner_id: &str) -> Result<Vec<CycleListItem>, AppError> {
        let cycles = test_cycle::find_for_owner(&self.pool, owner_id).await?;
        self.cycle_list(cycles).await
    }

    async fn bug_reports_by_reporter(&self, reporter_id: &str) -> Result<Vec<BugReport>, AppError> {
        let rows = bug_report::find_recent_by_reporter(&self.pool, reporter_id, None).await?;
        self.join_report_cycles(rows).await
    }

    async fn bug_reports_for_owner(&self, owner_id: &str) -> Result<Vec<BugReport>, AppError> {
        let rows = bug_report::find_recent_for_owner(&self.pool, owner_id, None).await?;
        self.join_report_cycles(rows).await
    }

    async fn create_bug_report(&self, report: NewBugReport) -> Result<BugReport, AppError> {
        let created = bug_report::create(&self.pool, &report).await?;
        let mut joined = self.join_report_cycles(vec![created]).await?;
        joined.pop().ok_or_else(|| AppError::NotFound("Bug report not found".to_string()))
    }
}
