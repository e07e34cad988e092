//! Shared test utilities for `Wedlock`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    cache::InMemoryInviteCodeStore,
    config::InviteCodeConfig,
    core::{budget, couple, profile},
    entities::{BudgetCategory, budget_detail, user_profile},
    errors::Result,
};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Initializes tracing for tests, honoring `RUST_LOG` when set.
/// Safe to call from multiple tests; only the first call installs.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Invite-code settings used throughout the tests (10-minute TTL).
pub fn test_invite_config() -> InviteCodeConfig {
    InviteCodeConfig { ttl_secs: 600 }
}

/// Creates a test profile with a default phone number.
pub async fn create_test_profile(
    db: &DatabaseConnection,
    name: &str,
) -> Result<user_profile::Model> {
    profile::create_profile(db, name.to_string(), "010-1234-5678".to_string()).await
}

/// Links two existing profiles through the full invite-code flow and
/// returns the minted couple id.
pub async fn link_test_couple(
    db: &DatabaseConnection,
    issuer_user_id: i64,
    redeemer_user_id: i64,
) -> Result<Uuid> {
    let store = InMemoryInviteCodeStore::new();
    let config = test_invite_config();

    let code = couple::issue_invite_code(&store, &config, issuer_user_id).await?;
    couple::connect_couple(db, &store, redeemer_user_id, &code).await
}

/// Creates two fresh profiles and links them.
/// Returns (`couple_id`, issuer, redeemer) for couple-scoped tests.
pub async fn setup_linked_couple(
    db: &DatabaseConnection,
) -> Result<(Uuid, user_profile::Model, user_profile::Model)> {
    let issuer = create_test_profile(db, "Test Issuer").await?;
    let redeemer = create_test_profile(db, "Test Redeemer").await?;
    let couple_id = link_test_couple(db, issuer.user_id, redeemer.user_id).await?;
    Ok((couple_id, issuer, redeemer))
}

/// Records a test expense with a fixed date and description.
pub async fn record_test_detail(
    db: &DatabaseConnection,
    couple_id: Uuid,
    category: BudgetCategory,
    amount: i64,
) -> Result<budget_detail::Model> {
    budget::record_detail(
        db,
        couple_id,
        category,
        amount,
        chrono::NaiveDate::from_ymd_opt(2026, 5, 1).unwrap_or_default(),
        "Test expense".to_string(),
    )
    .await
}
