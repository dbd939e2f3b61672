use chrono::{Duration, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool};

use crate::errors::AppError;
use crate::models::assignment::{self, NewAssignment};
use crate::models::bug_report::{self, NewBugReport};
use crate::models::payout::{self, NewPayout};
use crate::models::project::{self, NewProject};
use crate::models::test_cycle::{self, NewTestCycle};
use crate::models::user::{self, NewUser, Role};

pub type DbPool = PgPool;

/// Advisory lock key held while seeding, so concurrent starts serialize.
const SEED_LOCK_KEY: i64 = 0x6372_6f77_6474_6573;

pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<DbPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &DbPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Seed the demo organisation in one transaction. Skips when any user
/// already exists, so it is safe to call on every start; a failed seed
/// leaves nothing behind.
pub async fn seed_demo_data(pool: &DbPool, password_hash: &str) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    let seeded = seed_demo_org(&mut *tx, password_hash).await?;
    tx.commit().await?;
    if seeded {
        log::info!("Demo seed committed");
    }
    Ok(())
}

/// Insert the demo organisation on `conn` unless users already exist.
/// Returns whether anything was written. The caller owns the transaction.
pub async fn seed_demo_org(conn: &mut PgConnection, password_hash: &str) -> Result<bool, AppError> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SEED_LOCK_KEY)
        .execute(&mut *conn)
        .await?;

    let count = user::count(&mut *conn).await?;
    if count > 0 {
        log::info!("Database already seeded ({count} users), skipping demo seed");
        return Ok(false);
    }

    let users = [
        NewUser {
            id: "user-manager",
            email: "manager@crowdtest.io",
            name: "Morgan Rivera",
            role: Role::Manager,
            password_hash,
            avatar_url: None,
            bio: Some("Seasoned QA director overseeing distributed testing teams."),
            tester_reputation: 0,
            skills: &["Leadership", "Test Strategy", "Automation"],
        },
        NewUser {
            id: "user-client-finpulse",
            email: "product@finpulse.io",
            name: "FinPulse PM",
            role: Role::Client,
            password_hash,
            avatar_url: None,
            bio: Some("Fintech product owner focused on mobile banking excellence."),
            tester_reputation: 0,
            skills: &["Mobile QA", "Payments", "Compliance"],
        },
        NewUser {
            id: "user-client-healthsync",
            email: "cto@healthsync.io",
            name: "HealthSync CTO",
            role: Role::Client,
            password_hash,
            avatar_url: None,
            bio: Some("Healthcare platform innovator working on patient apps."),
            tester_reputation: 0,
            skills: &["Healthcare", "Security", "Accessibility"],
        },
        NewUser {
            id: "user-tester-ava",
            email: "ava.dawson@testers.io",
            name: "Ava Dawson",
            role: Role::Tester,
            password_hash,
            avatar_url: None,
            bio: Some("Mobile QA specialist with a passion for fintech apps."),
            tester_reputation: 820,
            skills: &["iOS", "Android", "Mobile Banking", "Payments"],
        },
        NewUser {
            id: "user-tester-leon",
            email: "leon.kim@testers.io",
            name: "Leon Kim",
            role: Role::Tester,
            password_hash,
            avatar_url: None,
            bio: Some("Automation-first QA with CI/CD integration expertise."),
            tester_reputation: 910,
            skills: &["Web", "API", "Cypress", "Postman"],
        },
        NewUser {
            id: "user-tester-valentina",
            email: "valentina.ortiz@testers.io",
            name: "Valentina Ortiz",
            role: Role::Tester,
            password_hash,
            avatar_url: None,
            bio: Some("Accessibility advocate ensuring inclusive user experiences."),
            tester_reputation: 740,
            skills: &["Accessibility", "WCAG", "Screen Readers"],
        },
    ];
    for u in &users {
        user::create(&mut *conn, u).await?;
    }

    project::create(&mut *conn, &NewProject {
        id: "project-finpulse",
        name: "FinPulse Banking App",
        description: "Consumer mobile banking application supporting peer-to-peer payments and card management.",
        status: "IN_PROGRESS",
        owner_id: "user-client-finpulse",
    })
    .await?;
    project::create(&mut *conn, &NewProject {
        id: "project-healthsync",
        name: "HealthSync Patient Portal",
        description: "Web portal enabling patients to manage appointments and medical records.",
        status: "RECRUITING_TESTERS",
        owner_id: "user-client-healthsync",
    })
    .await?;

    let now = Utc::now();
    test_cycle::create(&mut *conn, &NewTestCycle {
        id: "cycle-beta-launch",
        name: "Beta Launch Cycle",
        scope: "Regression testing across iOS and Android releases with focus on payments.",
        status: test_cycle::STATUS_ACTIVE,
        start_date: now,
        end_date: Some(now + Duration::days(14)),
        project_id: "project-finpulse",
    })
    .await?;

    let assignments = [
        NewAssignment {
            id: "assignment-ava-beta",
            tester_id: "user-tester-ava",
            test_cycle_id: "cycle-beta-launch",
            status: assignment::STATUS_IN_PROGRESS,
            notes: None,
        },
        NewAssignment {
            id: "assignment-leon-beta",
            tester_id: "user-tester-leon",
            test_cycle_id: "cycle-beta-launch",
            status: assignment::STATUS_ASSIGNED,
            notes: None,
        },
        NewAssignment {
            id: "assignment-valentina-beta",
            tester_id: "user-tester-valentina",
            test_cycle_id: "cycle-beta-launch",
            status: assignment::STATUS_AWAITING_FEEDBACK,
            notes: Some("Need accessibility audit for voiceover and high contrast mode coverage."),
        },
    ];
    for a in &assignments {
        assignment::create(&mut *conn, a).await?;
    }

    bug_report::create(&mut *conn, &NewBugReport {
        id: "bug-payment-freeze".to_string(),
        title: "Payment confirmation screen freezes".to_string(),
        severity: "HIGH".to_string(),
        steps_to_reproduce: "1. Initiate transfer\n2. Confirm with FaceID\n3. Observe freeze on confirmation screen"
            .to_string(),
        expected_result: "App should display success message and updated balance".to_string(),
        actual_result: "Confirmation screen hangs indefinitely without updating balance.".to_string(),
        environment: "iPhone 14 Pro, iOS 17.2, WiFi".to_string(),
        attachments: Vec::new(),
        reporter_id: "user-tester-ava".to_string(),
        test_cycle_id: "cycle-beta-launch".to_string(),
    })
    .await?;

    let payouts = [
        NewPayout {
            id: "payout-ava-1",
            tester_id: "user-tester-ava",
            amount: 250.0,
            status: payout::STATUS_PAID,
            paid_at: Some(now - Duration::days(7)),
        },
        NewPayout {
            id: "payout-leon-1",
            tester_id: "user-tester-leon",
            amount: 180.0,
            status: payout::STATUS_PENDING,
            paid_at: None,
        },
        NewPayout {
            id: "payout-valentina-1",
            tester_id: "user-tester-valentina",
            amount: 320.0,
            status: payout::STATUS_PAID,
            paid_at: Some(now - Duration::days(3)),
        },
    ];
    for p in &payouts {
        payout::create(&mut *conn, p).await?;
    }

    log::info!(
        "Demo seed complete: {} users, 2 projects, {} assignments, {} payouts",
        users.len(),
        assignments.len(),
        payouts.len()
    );
    Ok(true)
}
