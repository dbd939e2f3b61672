use std::future::Future;

use crate::errors::AppError;
use crate::models::assignment::TestAssignment;
use crate::models::bug_report::BugReport;
use crate::models::payout::Payout;
use crate::models::project::ProjectWithCycles;
use crate::models::user::{Role, User};

/// Read-side storage the dashboard builder folds over.
///
/// "Recent" lists come back newest first. Joined variants attach the
/// cycle and its project (`test_cycle.project`) to every row whose cycle
/// still resolves; the manager variants also attach the tester/reporter.
pub trait DashboardStore: Send + Sync {
    fn find_user(&self, id: &str) -> impl Future<Output = Result<Option<User>, AppError>> + Send;

    // ---- tester ----

    /// Most recently updated assignments of one tester, cycle → project joined.
    fn recent_assignments_for_tester(
        &self,
        tester_id: &str,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<TestAssignment>, AppError>> + Send;

    /// Newest bug reports by one reporter, cycle → project joined.
    fn recent_bug_reports_by_reporter(
        &self,
        reporter_id: &str,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<BugReport>, AppError>> + Send;

    fn count_bug_reports_by_reporter(
        &self,
        reporter_id: &str,
    ) -> impl Future<Output = Result<i64, AppError>> + Send;

    fn recent_payouts_for_tester(
        &self,
        tester_id: &str,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<Payout>, AppError>> + Send;

    // ---- client ----

    /// Projects owned by the user with every cycle and each cycle's issues.
    fn projects_with_issues_for_owner(
        &self,
        owner_id: &str,
    ) -> impl Future<Output = Result<Vec<ProjectWithCycles>, AppError>> + Send;

    /// Newest bug reports against any project the user owns, cycle → project joined.
    fn recent_bug_reports_for_owner(
        &self,
        owner_id: &str,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<BugReport>, AppError>> + Send;

    fn count_assignments_in_projects(
        &self,
        project_ids: &[String],
    ) -> impl Future<Output = Result<i64, AppError>> + Send;

    // ---- manager ----

    /// Platform-wide recent assignments, cycle → project and tester joined.
    fn recent_assignments(&self, limit: i64) -> impl Future<Output = Result<Vec<TestAssignment>, AppError>> + Send;

    /// Every project with its cycles; `issues` is left empty.
    fn projects_with_cycles(&self) -> impl Future<Output = Result<Vec<ProjectWithCycles>, AppError>> + Send;

    /// Platform-wide recent bug reports, cycle → project and reporter joined.
    fn recent_bug_reports(&self, limit: i64) -> impl Future<Output = Result<Vec<BugReport>, AppError>> + Send;

    fn count_users_by_role(&self, role: Role) -> impl Future<Output = Result<i64, AppError>> + Send;

    fn count_cycles_by_status(&self, status: &str) -> impl Future<Output = Result<i64, AppError>> + Send;

    fn sum_payout_amounts(&self) -> impl Future<Output = Result<f64, AppError>> + Send;
}
