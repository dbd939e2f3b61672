//! Login, test-cycle listing and bug-report filing.

pub mod store;

pub use store::TrackerStore;

use crate::api_structs::{BugReportRequest, LoginRequest};
use crate::auth::{password, validate};
use crate::errors::AppError;
use crate::models::bug_report::{BugReport, NewBugReport};
use crate::models::generate_id;
use crate::models::test_cycle::CycleListItem;
use crate::models::user::{Role, User, UserId};

const MIN_PASSWORD_LEN: usize = 6;

/// Check an email/password pair. Unknown emails and wrong passwords are
/// indistinguishable to the caller.
pub async fn authenticate<S: TrackerStore>(store: &S, req: &LoginRequest) -> Result<User, AppError> {
    let payload_ok = validate::validate_email(&req.email).is_none()
        && validate::validate_min_len(&req.password, "Password", MIN_PASSWORD_LEN).is_none();
    if !payload_ok {
        return Err(AppError::InvalidInput("Invalid login payload".to_string()));
    }

    let Some(credentials) = store.find_credentials_by_email(req.email.trim()).await? else {
        log::info!("Login failed: unknown email");
        return Err(AppError::Unauthorized);
    };

    let valid = password::verify_password(&req.password, &credentials.password_hash)?;
    if !valid {
        log::info!("Login failed for {}", credentials.user.id);
        return Err(AppError::Unauthorized);
    }

    log::info!("User {} logged in", credentials.user.id);
    Ok(credentials.user)
}

async fn resolve_user<S: TrackerStore>(store: &S, raw_user_id: &str) -> Result<User, AppError> {
    let user_id = UserId::parse(raw_user_id)?;
    store
        .find_user(user_id.as_str())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Testers see the cycles they are assigned to; everyone else the cycles
/// of projects they own.
pub async fn list_cycles<S: TrackerStore>(store: &S, raw_user_id: &str) -> Result<Vec<CycleListItem>, AppError> {
    let user = resolve_user(store, raw_user_id).await?;
    match user.role {
        Role::Tester => store.cycles_for_tester(&user.id).await,
        Role::Client | Role::Manager => store.cycles_for_owner(&user.id).await,
    }
}

/// Testers see their own reports; everyone else reports against projects they own.
pub async fn list_bug_reports<S: TrackerStore>(store: &S, raw_user_id: &str) -> Result<Vec<BugReport>, AppError> {
    let user = resolve_user(store, raw_user_id).await?;
    match user.role {
        Role::Tester => store.bug_reports_by_reporter(&user.id).await,
        Role::Client | Role::Manager => store.bug_reports_for_owner(&user.id).await,
    }
}

fn validate_bug_report(req: &BugReportRequest) -> Vec<String> {
    let mut errors = Vec::new();
    errors.extend(validate::validate_min_len(&req.user_id, "User id", 3));
    errors.extend(validate::validate_min_len(&req.title, "Title", 3));
    errors.extend(validate::validate_min_len(&req.severity, "Severity", 1));
    errors.extend(validate::validate_min_len(&req.steps_to_reproduce, "Steps to reproduce", 5));
    errors.extend(validate::validate_min_len(&req.expected_result, "Expected result", 3));
    errors.extend(validate::validate_min_len(&req.actual_result, "Actual result", 3));
    errors.extend(validate::validate_min_len(&req.environment, "Environment", 3));
    errors.extend(validate::validate_min_len(&req.test_cycle_id, "Test cycle id", 3));
    for url in req.attachments.iter().flatten() {
        errors.extend(validate::validate_url(url, "Attachment"));
    }
    errors
}

/// File a bug report on behalf of a tester.
pub async fn file_bug_report<S: TrackerStore>(store: &S, req: BugReportRequest) -> Result<BugReport, AppError> {
    let errors = validate_bug_report(&req);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    // A reporter id that cannot name a user is refused like any non-tester.
    let reporter = match UserId::parse(&req.user_id) {
        Ok(id) => store.find_user(id.as_str()).await?,
        Err(_) => None,
    };
    let reporter = match reporter {
        Some(user) if user.role == Role::Tester => user,
        _ => return Err(AppError::Forbidden("Only testers can submit issues".to_string())),
    };

    let cycle_id = req.test_cycle_id.trim();
    if store.find_cycle(cycle_id).await?.is_none() {
        return Err(AppError::NotFound("Test cycle not found".to_string()));
    }

    let report = NewBugReport {
        id: generate_id("bug"),
        title: req.title.trim().to_string(),
        severity: req.severity.trim().to_string(),
        steps_to_reproduce: req.steps_to_reproduce,
        expected_result: req.expected_result,
        actual_result: req.actual_result,
        environment: req.environment,
        attachments: req.attachments.unwrap_or_default(),
        reporter_id: reporter.id,
        test_cycle_id: cycle_id.to_string(),
    };
    let created = store.create_bug_report(report).await?;
    log::info!("Bug report {} filed against cycle {}", created.id, created.test_cycle_id);
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> BugReportRequest {
        BugReportRequest {
            user_id: "user-tester-ava".into(),
            title: "Checkout button dead".into(),
            severity: "HIGH".into(),
            steps_to_reproduce: "1. Open cart\n2. Tap checkout".into(),
            expected_result: "Payment sheet opens".into(),
            actual_result: "Nothing happens".into(),
            environment: "Pixel 8, Android 15".into(),
            test_cycle_id: "cycle-beta-launch".into(),
            attachments: Some(vec!["https://cdn.example.com/a.png".into()]),
        }
    }

    #[test]
    fn valid_payload_has_no_errors() {
        assert!(validate_bug_report(&valid_request()).is_empty());
    }

    #[test]
    fn every_short_field_is_reported() {
        let req = BugReportRequest {
            title: "ab".into(),
            steps_to_reproduce: "tap".into(),
            attachments: Some(vec!["file:///etc/passwd".into()]),
            ..valid_request()
        };
        let errors = validate_bug_report(&req);
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(errors[0].starts_with("Title"));
        assert!(errors[1].starts_with("Steps to reproduce"));
        assert!(errors[2].starts_with("Attachment"));
    }
}
