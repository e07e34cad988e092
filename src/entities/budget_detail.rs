//! Couple budget detail entity - One row per recorded expense.
//!
//! Detail rows are the source of truth the summary tracks: created on
//! expense registration, destroyed on expense deletion, never edited in
//! place. Listing is by `couple_id` ordered by spend date descending.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Closed set of expense categories. Each maps to its own subtotal column
/// on the summary row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum BudgetCategory {
    /// Wedding hall
    #[sea_orm(string_value = "HALL")]
    Hall,
    /// Studio, dress, and makeup
    #[sea_orm(string_value = "SDM")]
    Sdm,
    /// The ceremony itself
    #[sea_orm(string_value = "CEREMONY")]
    Ceremony,
    /// Household supplies
    #[sea_orm(string_value = "SUPPLIES")]
    Supplies,
    /// Anything else
    #[sea_orm(string_value = "ETC")]
    Etc,
}

/// Couple budget detail database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "couple_budget_detail")]
pub struct Model {
    /// Surrogate key for the expense record
    #[sea_orm(primary_key)]
    pub budget_detail_id: i64,
    /// Couple this expense belongs to
    pub couple_id: Uuid,
    /// Expense category
    pub category: BudgetCategory,
    /// Amount spent, always non-negative
    pub spent_amount: i64,
    /// Date the expense occurred
    pub date: Date,
    /// What the money was spent on (1-500 characters)
    pub content: String,
}

/// Detail rows stand alone; they are correlated to the summary by `couple_id`.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
