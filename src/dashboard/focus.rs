//! Folding fetched rows into focus projects.

use std::collections::HashSet;

use super::summary::FocusProject;
use crate::models::assignment::TestAssignment;
use crate::models::bug_report::BugReport;
use crate::models::project::ProjectWithCycles;
use crate::models::test_cycle::STATUS_PLANNING;

/// Which of a project's issues count toward `openIssues`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueFilter {
    /// Everything except resolved issues.
    Open,
    /// Every fetched issue, whatever its status.
    Any,
}

impl IssueFilter {
    fn accepts(self, issue: &BugReport) -> bool {
        match self {
            IssueFilter::Open => issue.is_open(),
            IssueFilter::Any => true,
        }
    }
}

/// Count issues belonging to `project_id` (via their joined cycle).
/// Issues without a loaded cycle belong to no project.
pub fn count_project_issues(issues: &[BugReport], project_id: &str, filter: IssueFilter) -> i64 {
    issues
        .iter()
        .filter(|issue| issue.project_id() == Some(project_id) && filter.accepts(issue))
        .count() as i64
}

/// Tester view: one entry per project in assignment order, first assignment wins.
pub fn from_assignments(assignments: &[TestAssignment], recent_issues: &[BugReport]) -> Vec<FocusProject> {
    let mut seen = HashSet::new();
    let mut focus = Vec::new();

    for assignment in assignments {
        let Some(cycle) = &assignment.test_cycle else { continue };
        let Some(project) = &cycle.project else { continue };
        if !seen.insert(project.id.as_str()) {
            continue;
        }
        focus.push(FocusProject {
            open_issues: count_project_issues(recent_issues, &project.id, IssueFilter::Open),
            cycle_status: cycle.cycle.status.clone(),
            next_milestone: cycle.cycle.end_date,
            project: project.clone(),
        });
    }
    focus
}

/// Client view: open issues summed over all cycles, status and milestone
/// from the first cycle in fetch order.
pub fn from_owned_projects(projects: &[ProjectWithCycles]) -> Vec<FocusProject> {
    projects
        .iter()
        .map(|p| {
            let first = p.cycles.first();
            let open_issues = p
                .cycles
                .iter()
                .map(|c| c.issues.iter().filter(|i| i.is_open()).count() as i64)
                .sum();
            FocusProject {
                project: p.project.clone(),
                open_issues,
                cycle_status: first
                    .map(|c| c.cycle.status.clone())
                    .unwrap_or_else(|| STATUS_PLANNING.to_string()),
                next_milestone: first.and_then(|c| c.cycle.end_date),
            }
        })
        .collect()
}

/// Manager view: the first `cap` projects, counted against the recent-issue page.
pub fn from_all_projects(projects: &[ProjectWithCycles], recent_issues: &[BugReport], cap: usize) -> Vec<FocusProject> {
    projects
        .iter()
        .take(cap)
        .map(|p| FocusProject {
            project: p.project.clone(),
            open_issues: count_project_issues(recent_issues, &p.project.id, IssueFilter::Any),
            cycle_status: p
                .cycles
                .iter()
                .find(|c| c.cycle.is_active())
                .map(|c| c.cycle.status.clone())
                .unwrap_or_else(|| STATUS_PLANNING.to_string()),
            next_milestone: p.cycles.iter().filter_map(|c| c.cycle.end_date).min(),
        })
        .collect()
}
