use std::future::Future;

use crate::dashboard::DashboardStore;
use crate::errors::AppError;
use crate::models::bug_report::{BugReport, NewBugReport};
use crate::models::test_cycle::{CycleListItem, TestCycle};
use crate::models::user::UserCredentials;

/// Storage behind the login, test-cycle and bug-report endpoints.
pub trait TrackerStore: DashboardStore {
    fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<UserCredentials>, AppError>> + Send;

    fn find_cycle(&self, id: &str) -> impl Future<Output = Result<Option<TestCycle>, AppError>> + Send;

    /// Cycles the tester is assigned to, newest start date first.
    fn cycles_for_tester(&self, tester_id: &str) -> impl Future<Output = Result<Vec<CycleListItem>, AppError>> + Send;

    /// Cycles under the owner's projects, newest start date first.
    fn cycles_for_owner(&self, owner_id: &str) -> impl Future<Output = Result<Vec<CycleListItem>, AppError>> + Send;

    /// Every report by the reporter, newest first, cycle → project joined.
    fn bug_reports_by_reporter(&self, reporter_id: &str) -> impl Future<Output = Result<Vec<BugReport>, AppError>> + Send;

    /// Every report against the owner's projects, newest first, cycle → project joined.
    fn bug_reports_for_owner(&self, owner_id: &str) -> impl Future<Output = Result<Vec<BugReport>, AppError>> + Send;

    /// Insert and return the report with cycle → project joined.
    fn create_bug_report(&self, report: NewBugReport) -> impl Future<Output = Result<BugReport, AppError>> + Send;
}
