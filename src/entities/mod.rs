//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod budget_detail;
pub mod budget_summary;
pub mod schedule;
pub mod user_profile;

// Re-export specific types to avoid conflicts
pub use budget_detail::{
    BudgetCategory, Column as BudgetDetailColumn, Entity as BudgetDetail, Model as BudgetDetailModel,
};
pub use budget_summary::{
    Column as BudgetSummaryColumn, Entity as BudgetSummary, Model as BudgetSummaryModel,
};
pub use schedule::{Column as ScheduleColumn, Entity as Schedule, Model as ScheduleModel};
pub use user_profile::{
    Column as UserProfileColumn, Entity as UserProfile, Model as UserProfileModel,
};
