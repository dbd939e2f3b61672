//! Shared test infrastructure.
//!
//! `MemoryStore` is an in-process implementation of the storage traits with
//! the same ordering, limit and join rules as the Postgres store, so the
//! dashboard and API can be exercised without a database.
//!
//! # Fixtures
//! - `MemoryStore::new()` + `with_*` builders - hand-built scenarios
//! - `demo_store()` - the same organisation the demo seed creates

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crowdtest::dashboard::DashboardStore;
use crowdtest::errors::AppError;
use crowdtest::models::assignment::TestAssignment;
use crowdtest::models::bug_report::{BugReport, NewBugReport, STATUS_OPEN};
use crowdtest::models::payout::Payout;
use crowdtest::models::project::{CycleWithIssues, Project, ProjectWithCycles};
use crowdtest::models::test_cycle::{CycleListItem, TestCycle, TestCycleWithProject};
use crowdtest::models::user::{Role, User, UserCredentials};
use crowdtest::tracker::TrackerStore;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const DEMO_PASSWORD: &str = "password123";

/// Fixed base instant; `ts(n)` is `n` minutes later.
pub fn ts(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes)
}

// ============================================================================
// MEMORY STORE
// ============================================================================

#[derive(Default)]
pub struct MemoryStore {
    pub users: Vec<UserCredentials>,
    pub projects: Vec<Project>,
    pub cycles: Vec<TestCycle>,
    pub assignments: Vec<TestAssignment>,
    pub bug_reports: Mutex<Vec<BugReport>>,
    pub payouts: Vec<Payout>,
    queries: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of storage calls made so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }

    // ---- builders ----

    pub fn with_user(self, id: &str, role: Role) -> Self {
        self.with_user_credentials(id, role, "not-a-hash")
    }

    pub fn with_user_credentials(mut self, id: &str, role: Role, password_hash: &str) -> Self {
        self.users.push(UserCredentials {
            user: User {
                id: id.to_string(),
                email: format!("{id}@crowdtest.io"),
                name: id.to_string(),
                role,
                avatar_url: None,
                bio: None,
                tester_reputation: 0,
                skills: vec![],
                created_at: ts(0),
                updated_at: ts(0),
            },
            password_hash: password_hash.to_string(),
        });
        self
    }

    pub fn with_project(mut self, id: &str, owner_id: &str) -> Self {
        let n = self.projects.len() as i64;
        self.projects.push(Project {
            id: id.to_string(),
            name: format!("Project {id}"),
            description: String::new(),
            status: "IN_PROGRESS".to_string(),
            owner_id: owner_id.to_string(),
            created_at: ts(n),
            updated_at: ts(n),
        });
        self
    }

    /// `end` is minutes after the base instant.
    pub fn with_cycle(mut self, id: &str, project_id: &str, status: &str, end: Option<i64>) -> Self {
        let n = self.cycles.len() as i64;
        self.cycles.push(TestCycle {
            id: id.to_string(),
            name: format!("Cycle {id}"),
            scope: String::new(),
            status: status.to_string(),
            start_date: ts(n),
            end_date: end.map(ts),
            project_id: project_id.to_string(),
            created_at: ts(n),
            updated_at: ts(n),
        });
        self
    }

    /// `updated` orders "recently updated" queries.
    pub fn with_assignment(mut self, id: &str, tester_id: &str, cycle_id: &str, status: &str, updated: i64) -> Self {
        self.assignments.push(TestAssignment {
            id: id.to_string(),
            tester_id: tester_id.to_string(),
            test_cycle_id: cycle_id.to_string(),
            status: status.to_string(),
            notes: None,
            created_at: ts(0),
            updated_at: ts(updated),
            test_cycle: None,
            tester: None,
        });
        self
    }

    /// `created` orders "recent" queries.
    pub fn with_bug(self, id: &str, reporter_id: &str, cycle_id: &str, status: &str, created: i64) -> Self {
        self.bug_reports.lock().unwrap().push(BugReport {
            id: id.to_string(),
            title: format!("Bug {id}"),
            severity: "HIGH".to_string(),
            steps_to_reproduce: "1. Open app".to_string(),
            expected_result: "Works".to_string(),
            actual_result: "Broken".to_string(),
            environment: "Pixel 8".to_string(),
            status: status.to_string(),
            attachments: vec![],
            reporter_id: reporter_id.to_string(),
            test_cycle_id: cycle_id.to_string(),
            created_at: ts(created),
            updated_at: ts(created),
            test_cycle: None,
            reporter: None,
        });
        self
    }

    pub fn with_payout(mut self, id: &str, tester_id: &str, amount: f64, status: &str, created: i64) -> Self {
        self.payouts.push(Payout {
            id: id.to_string(),
            tester_id: tester_id.to_string(),
            amount,
            currency: "USD".to_string(),
            status: status.to_string(),
            paid_at: None,
            created_at: ts(created),
        });
        self
    }

    // ---- joins ----

    fn user(&self, id: &str) -> Option<User> {
        self.users.iter().find(|c| c.user.id == id).map(|c| c.user.clone())
    }

    fn project(&self, id: &str) -> Option<Project> {
        self.projects.iter().find(|p| p.id == id).cloned()
    }

    fn cycle_with_project(&self, cycle_id: &str) -> Option<TestCycleWithProject> {
        let cycle = self.cycles.iter().find(|c| c.id == cycle_id)?.clone();
        let project = self.project(&cycle.project_id);
        Some(TestCycleWithProject { cycle, project })
    }

    fn joined_assignment(&self, a: &TestAssignment) -> TestAssignment {
        let mut a = a.clone();
        a.test_cycle = self.cycle_with_project(&a.test_cycle_id);
        a
    }

    fn joined_report(&self, b: &BugReport) -> BugReport {
        let mut b = b.clone();
        b.test_cycle = self.cycle_with_project(&b.test_cycle_id);
        b
    }

    fn owned_project_ids(&self, owner_id: &str) -> HashSet<String> {
        self.projects.iter().filter(|p| p.owner_id == owner_id).map(|p| p.id.clone()).collect()
    }

    fn cycle_project_id(&self, cycle_id: &str) -> Option<String> {
        self.cycles.iter().find(|c| c.id == cycle_id).map(|c| c.project_id.clone())
    }

    fn assignments_newest_first(&self) -> Vec<TestAssignment> {
        let mut rows = self.assignments.clone();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        rows
    }

    fn reports_newest_first(&self) -> Vec<BugReport> {
        let mut rows = self.bug_reports.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        rows
    }

    fn group_cycles(&self, projects: Vec<Project>, with_issues: bool) -> Vec<ProjectWithCycles> {
        let reports = self.bug_reports.lock().unwrap().clone();
        projects
            .into_iter()
            .map(|project| {
                let mut cycles: Vec<TestCycle> =
                    self.cycles.iter().filter(|c| c.project_id == project.id).cloned().collect();
                cycles.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.id.cmp(&b.id)));
                let cycles = cycles
                    .into_iter()
                    .map(|cycle| {
                        let issues = if with_issues {
                            reports.iter().filter(|r| r.test_cycle_id == cycle.id).cloned().collect()
                        } else {
                            Vec::new()
                        };
                        CycleWithIssues { cycle, issues }
                    })
                    .collect();
                ProjectWithCycles { project, cycles }
            })
            .collect()
    }

    fn cycle_items(&self, mut cycles: Vec<TestCycle>) -> Vec<CycleListItem> {
        cycles.sort_by(|a, b| b.start_date.cmp(&a.start_date).then_with(|| a.id.cmp(&b.id)));
        cycles
            .into_iter()
            .filter_map(|c| {
                let project = self.project(&c.project_id)?;
                Some(CycleListItem::new(c, &project))
            })
            .collect()
    }
}

impl DashboardStore for MemoryStore {
    async fn find_user(&self, id: &str) -> Result<Option<User>, AppError> {
        self.hit();
        Ok(self.user(id))
    }

    async fn recent_assignments_for_tester(&self, tester_id: &str, limit: i64) -> Result<Vec<TestAssignment>, AppError> {
        self.hit();
        Ok(self
            .assignments_newest_first()
            .iter()
            .filter(|a| a.tester_id == tester_id)
            .take(limit as usize)
            .map(|a| self.joined_assignment(a))
            .collect())
    }

    async fn recent_bug_reports_by_reporter(&self, reporter_id: &str, limit: i64) -> Result<Vec<BugReport>, AppError> {
        self.hit();
        Ok(self
            .reports_newest_first()
            .iter()
            .filter(|b| b.reporter_id == reporter_id)
            .take(limit as usize)
            .map(|b| self.joined_report(b))
            .collect())
    }

    async fn count_bug_reports_by_reporter(&self, reporter_id: &str) -> Result<i64, AppError> {
        self.hit();
        Ok(self.bug_reports.lock().unwrap().iter().filter(|b| b.reporter_id == reporter_id).count() as i64)
    }

    async fn recent_payouts_for_tester(&self, tester_id: &str, limit: i64) -> Result<Vec<Payout>, AppError> {
        self.hit();
        let mut rows: Vec<Payout> = self.payouts.iter().filter(|p| p.tester_id == tester_id).cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn projects_with_issues_for_owner(&self, owner_id: &str) -> Result<Vec<ProjectWithCycles>, AppError> {
        self.hit();
        let projects = self.projects.iter().filter(|p| p.owner_id == owner_id).cloned().collect();
        Ok(self.group_cycles(projects, true))
    }

    async fn recent_bug_reports_for_owner(&self, owner_id: &str, limit: i64) -> Result<Vec<BugReport>, AppError> {
        self.hit();
        let owned = self.owned_project_ids(owner_id);
        Ok(self
            .reports_newest_first()
            .iter()
            .filter(|b| self.cycle_project_id(&b.test_cycle_id).is_some_and(|p| owned.contains(&p)))
            .take(limit as usize)
            .map(|b| self.joined_report(b))
            .collect())
    }

    async fn count_assignments_in_projects(&self, project_ids: &[String]) -> Result<i64, AppError> {
        self.hit();
        Ok(self
            .assignments
            .iter()
            .filter(|a| self.cycle_project_id(&a.test_cycle_id).is_some_and(|p| project_ids.contains(&p)))
            .count() as i64)
    }

    async fn recent_assignments(&self, limit: i64) -> Result<Vec<TestAssignment>, AppError> {
        self.hit();
        Ok(self
            .assignments_newest_first()
            .iter()
            .take(limit as usize)
            .map(|a| {
                let mut a = self.joined_assignment(a);
                a.tester = self.user(&a.tester_id);
                a
            })
            .collect())
    }

    async fn projects_with_cycles(&self) -> Result<Vec<ProjectWithCycles>, AppError> {
        self.hit();
        Ok(self.group_cycles(self.projects.clone(), false))
    }

    async fn recent_bug_reports(&self, limit: i64) -> Result<Vec<BugReport>, AppError> {
        self.hit();
        Ok(self
            .reports_newest_first()
            .iter()
            .take(limit as usize)
            .map(|b| {
                let mut b = self.joined_report(b);
                b.reporter = self.user(&b.reporter_id);
                b
            })
            .collect())
    }

    async fn count_users_by_role(&self, role: Role) -> Result<i64, AppError> {
        self.hit();
        Ok(self.users.iter().filter(|c| c.user.role == role).count() as i64)
    }

    async fn count_cycles_by_status(&self, status: &str) -> Result<i64, AppError> {
        self.hit();
        Ok(self.cycles.iter().filter(|c| c.status == status).count() as i64)
    }

    async fn sum_payout_amounts(&self) -> Result<f64, AppError> {
        self.hit();
        Ok(self.payouts.iter().map(|p| p.amount).sum())
    }
}

impl TrackerStore for MemoryStore {
    async fn find_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>, AppError> {
        self.hit();
        Ok(self.users.iter().find(|c| c.user.email == email).cloned())
    }

    async fn find_cycle(&self, id: &str) -> Result<Option<TestCycle>, AppError> {
        self.hit();
        Ok(self.cycles.iter().find(|c| c.id == id).cloned())
    }

    async fn cycles_for_tester(&self, tester_id: &str) -> Result<Vec<CycleListItem>, AppError> {
        self.hit();
        let cycles = self
            .cycles
            .iter()
            .filter(|c| self.assignments.iter().any(|a| a.tester_id == tester_id && a.test_cycle_id == c.id))
            .cloned()
            .collect();
        Ok(self.cycle_items(cycles))
    }

    async fn cycles_for_owner(&self, owner_id: &str) -> Result<Vec<CycleListItem>, AppError> {
        self.hit();
        let owned = self.owned_project_ids(owner_id);
        let cycles = self.cycles.iter().filter(|c| owned.contains(&c.project_id)).cloned().collect();
        Ok(self.cycle_items(cycles))
    }

    async fn bug_reports_by_reporter(&self, reporter_id: &str) -> Result<Vec<BugReport>, AppError> {
        self.hit();
        Ok(self
            .reports_newest_first()
            .iter()
            .filter(|b| b.reporter_id == reporter_id)
            .map(|b| self.joined_report(b))
            .collect())
    }

    async fn bug_reports_for_owner(&self, owner_id: &str) -> Result<Vec<BugReport>, AppError> {
        self.hit();
        let owned = self.owned_project_ids(owner_id);
        Ok(self
            .reports_newest_first()
            .iter()
            .filter(|b| self.cycle_project_id(&b.test_cycle_id).is_some_and(|p| owned.contains(&p)))
            .map(|b| self.joined_report(b))
            .collect())
    }

    async fn create_bug_report(&self, report: NewBugReport) -> Result<BugReport, AppError> {
        self.hit();
        let created = BugReport {
            id: report.id,
            title: report.title,
            severity: report.severity,
            steps_to_reproduce: report.steps_to_reproduce,
            expected_result: report.expected_result,
            actual_result: report.actual_result,
            environment: report.environment,
            status: STATUS_OPEN.to_string(),
            attachments: report.attachments,
            reporter_id: report.reporter_id,
            test_cycle_id: report.test_cycle_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            test_cycle: None,
            reporter: None,
        };
        self.bug_reports.lock().unwrap().push(created.clone());
        Ok(self.joined_report(&created))
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

/// The demo organisation: one manager, two clients, three testers, the
/// FinPulse project with an active beta cycle, and an empty HealthSync project.
pub fn demo_store() -> MemoryStore {
    let hash = crowdtest::auth::password::hash_password(DEMO_PASSWORD).expect("hash demo password");
    let mut store = MemoryStore::new()
        .with_user_credentials("user-manager", Role::Manager, &hash)
        .with_user_credentials("user-client-finpulse", Role::Client, &hash)
        .with_user_credentials("user-client-healthsync", Role::Client, &hash)
        .with_user_credentials("user-tester-ava", Role::Tester, &hash)
        .with_user_credentials("user-tester-leon", Role::Tester, &hash)
        .with_user_credentials("user-tester-valentina", Role::Tester, &hash)
        .with_project("project-finpulse", "user-client-finpulse")
        .with_project("project-healthsync", "user-client-healthsync")
        .with_cycle("cycle-beta-launch", "project-finpulse", "ACTIVE", Some(14 * 24 * 60))
        .with_assignment("assignment-ava-beta", "user-tester-ava", "cycle-beta-launch", "IN_PROGRESS", 3)
        .with_assignment("assignment-leon-beta", "user-tester-leon", "cycle-beta-launch", "ASSIGNED", 2)
        .with_assignment("assignment-valentina-beta", "user-tester-valentina", "cycle-beta-launch", "AWAITING_FEEDBACK", 1)
        .with_bug("bug-payment-freeze", "user-tester-ava", "cycle-beta-launch", "OPEN", 5)
        .with_payout("payout-ava-1", "user-tester-ava", 250.0, "PAID", 1)
        .with_payout("payout-leon-1", "user-tester-leon", 180.0, "PENDING", 2)
        .with_payout("payout-valentina-1", "user-tester-valentina", 320.0, "PAID", 3);
    for c in &mut store.users {
        c.user.email = match c.user.id.as_str() {
            "user-manager" => "manager@crowdtest.io",
            "user-client-finpulse" => "product@finpulse.io",
            "user-client-healthsync" => "cto@healthsync.io",
            "user-tester-ava" => "ava.dawson@testers.io",
            "user-tester-leon" => "leon.kim@testers.io",
            _ => "valentina.ortiz@testers.io",
        }
        .to_string();
    }
    store
}
