//! Role-specific dashboard summaries.
//!
//! [`build_summary`] resolves the user, runs the queries for that user's
//! role against a [`DashboardStore`] and folds the rows into a
//! [`DashboardSummary`]. It never writes.

pub mod focus;
pub mod store;
pub mod summary;

pub use store::DashboardStore;
pub use summary::{DashboardSummary, FocusProject, Stats};

use crate::errors::AppError;
use crate::models::test_cycle::STATUS_ACTIVE;
use crate::models::user::{Role, User, UserId};

pub const TESTER_ASSIGNMENT_LIMIT: i64 = 6;
pub const TESTER_ISSUE_LIMIT: i64 = 5;
pub const TESTER_PAYOUT_LIMIT: i64 = 6;
pub const CLIENT_ISSUE_LIMIT: i64 = 6;
pub const MANAGER_ASSIGNMENT_LIMIT: i64 = 8;
pub const MANAGER_ISSUE_LIMIT: i64 = 8;
pub const MANAGER_FOCUS_LIMIT: usize = 6;

/// Build the dashboard for `raw_user_id`.
///
/// Fails with `InvalidInput` before touching the store when the id is
/// blank or malformed, and with `NotFound` when it does not resolve.
pub async fn build_summary<S: DashboardStore>(store: &S, raw_user_id: &str) -> Result<DashboardSummary, AppError> {
    let user_id = UserId::parse(raw_user_id)?;
    let user = store
        .find_user(user_id.as_str())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    log::debug!("Building {} dashboard for {}", user.role.as_str(), user.id);

    match user.role {
        Role::Tester => tester_summary(store, user).await,
        Role::Client => client_summary(store, user).await,
        Role::Manager => manager_summary(store, user).await,
    }
}

async fn tester_summary<S: DashboardStore>(store: &S, user: User) -> Result<DashboardSummary, AppError> {
    let (assignments, recent_issues, payouts, total_bugs) = tokio::try_join!(
        store.recent_assignments_for_tester(&user.id, TESTER_ASSIGNMENT_LIMIT),
        store.recent_bug_reports_by_reporter(&user.id, TESTER_ISSUE_LIMIT),
        store.recent_payouts_for_tester(&user.id, TESTER_PAYOUT_LIMIT),
        store.count_bug_reports_by_reporter(&user.id),
    )?;

    let mut stats = Stats::new();
    stats.insert_count(
        "activeAssignments",
        assignments.iter().filter(|a| !a.is_completed()).count() as i64,
    );
    stats.insert_count("totalBugsFiled", total_bugs);
    // Only the fetched page of payouts, not the tester's full history.
    stats.insert_amount(
        "lifetimeEarnings",
        payouts.iter().filter(|p| p.is_paid()).map(|p| p.amount).sum(),
    );

    let focus_projects = focus::from_assignments(&assignments, &recent_issues);

    Ok(DashboardSummary {
        user,
        stats,
        active_assignments: assignments,
        focus_projects,
        recent_issues,
        payouts: Some(payouts),
    })
}

async fn client_summary<S: DashboardStore>(store: &S, user: User) -> Result<DashboardSummary, AppError> {
    let (projects, recent_issues) = tokio::try_join!(
        store.projects_with_issues_for_owner(&user.id),
        store.recent_bug_reports_for_owner(&user.id, CLIENT_ISSUE_LIMIT),
    )?;
    let project_ids: Vec<String> = projects.iter().map(|p| p.project.id.clone()).collect();
    let testers_assigned = store.count_assignments_in_projects(&project_ids).await?;

    let active_cycles = projects
        .iter()
        .flat_map(|p| &p.cycles)
        .filter(|c| c.cycle.is_active())
        .count() as i64;

    let mut stats = Stats::new();
    stats.insert_count("activeCycles", active_cycles);
    // Size of the fetched page, capped at CLIENT_ISSUE_LIMIT.
    stats.insert_count("totalIssues", recent_issues.len() as i64);
    stats.insert_count("testersAssigned", testers_assigned);

    Ok(DashboardSummary {
        user,
        stats,
        active_assignments: Vec::new(),
        focus_projects: focus::from_owned_projects(&projects),
        recent_issues,
        payouts: None,
    })
}

async fn manager_summary<S: DashboardStore>(store: &S, user: User) -> Result<DashboardSummary, AppError> {
    let (assignments, projects, recent_issues, total_payouts, testers, active_cycles) = tokio::try_join!(
        store.recent_assignments(MANAGER_ASSIGNMENT_LIMIT),
        store.projects_with_cycles(),
        store.recent_bug_reports(MANAGER_ISSUE_LIMIT),
        store.sum_payout_amounts(),
        store.count_users_by_role(Role::Tester),
        store.count_cycles_by_status(STATUS_ACTIVE),
    )?;

    let mut stats = Stats::new();
    stats.insert_count("testersEngaged", testers);
    stats.insert_count("activeCycles", active_cycles);
    stats.insert_amount("totalPayouts", total_payouts);

    let focus_projects = focus::from_all_projects(&projects, &recent_issues, MANAGER_FOCUS_LIMIT);

    Ok(DashboardSummary {
        user,
        stats,
        active_assignments: assignments,
        focus_projects,
        recent_issues,
        payouts: None,
    })
}
