use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::models::assignment::TestAssignment;
use crate::models::bug_report::BugReport;
use crate::models::payout::Payout;
use crate::models::project::Project;
use crate::models::user::User;

/// Everything the dashboard page needs for one user, shaped per role.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub user: User,
    pub stats: Stats,
    pub active_assignments: Vec<TestAssignment>,
    pub focus_projects: Vec<FocusProject>,
    pub recent_issues: Vec<BugReport>,
    /// Only present on the tester dashboard.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payouts: Option<Vec<Payout>>,
}

/// A project plus the dashboard-only fields derived for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusProject {
    #[serde(flatten)]
    pub project: Project,
    pub open_issues: i64,
    pub cycle_status: String,
    pub next_milestone: Option<DateTime<Utc>>,
}

/// Flat `name -> number` statistics, kept in insertion order.
///
/// Values are clamped at zero. Whole amounts serialize as integers
/// (`250`, not `250.0`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Stats(Map<String, Value>);

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_count(&mut self, name: &str, value: i64) {
        self.0.insert(name.to_string(), Value::from(value.max(0)));
    }

    pub fn insert_amount(&mut self, name: &str, value: f64) {
        let value = if value.is_finite() && value > 0.0 { value } else { 0.0 };
        let number = if value.fract() == 0.0 && value < i64::MAX as f64 {
            Number::from(value as i64)
        } else {
            // finite by construction
            Number::from_f64(value).unwrap_or_else(|| Number::from(0))
        };
        self.0.insert(name.to_string(), Value::Number(number));
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(Value::as_f64)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
