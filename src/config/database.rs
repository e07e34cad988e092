//! Database configuration module.
//!
//! This module handles database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary tables
//! based on the entity definitions. The module uses `SeaORM`'s `Schema::create_table_from_entity`
//! method to automatically generate SQL statements from the entity models, ensuring that the
//! database schema matches the Rust struct definitions without requiring manual SQL.

use crate::entities::{BudgetDetail, BudgetSummary, Schedule, UserProfile};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/wedlock.sqlite".to_string())
}

/// Establishes a connection to the database using the `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
/// This function handles connection errors and provides a clean interface for database access
/// throughout the application.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// This function uses the `DeriveEntityModel` macros to automatically generate proper SQL
/// statements for table creation, ensuring the database schema matches the Rust struct definitions.
/// It creates tables for user profiles, budget summaries, budget details, and schedules.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let user_profile_table = schema.create_table_from_entity(UserProfile);
    let budget_summary_table = schema.create_table_from_entity(BudgetSummary);
    let budget_detail_table = schema.create_table_from_entity(BudgetDetail);
    let schedule_table = schema.create_table_from_entity(Schedule);

    db.execute(builder.build(&user_profile_table)).await?;
    db.execute(builder.build(&budget_summary_table)).await?;
    db.execute(builder.build(&budget_detail_table)).await?;
    db.execute(builder.build(&schedule_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        BudgetDetailModel, BudgetSummaryModel, ScheduleModel, UserProfileModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_connection() -> Result<()> {
        // Use in-memory database for testing to avoid schema conflicts with existing database
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that we can execute a query to verify the connection is working
        let _: Vec<UserProfileModel> = UserProfile::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<UserProfileModel> = UserProfile::find().limit(1).all(&db).await?;
        let _: Vec<BudgetSummaryModel> = BudgetSummary::find().limit(1).all(&db).await?;
        let _: Vec<BudgetDetailModel> = BudgetDetail::find().limit(1).all(&db).await?;
        let _: Vec<ScheduleModel> = Schedule::find().limit(1).all(&db).await?;

        Ok(())
    }
}
