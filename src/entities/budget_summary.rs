//! Couple budget summary entity - The denormalized spending aggregate.
//!
//! Exactly one row per couple. The row is a cache of a computable quantity:
//! `total_spent` always equals the sum of the five category subtotals, which
//! in turn equals the sum over the couple's live detail rows. `total_budget`
//! is tri-state (never registered / registered / explicitly cleared) folded
//! into one nullable column; `remaining_budget` is present exactly when
//! `total_budget` is, and may go negative when overspent.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Couple budget summary database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "couple_budget_summary")]
pub struct Model {
    /// Surrogate key for the summary row
    #[sea_orm(primary_key)]
    pub budget_summary_id: i64,
    /// Couple this summary belongs to, unique per row
    #[sea_orm(unique)]
    pub couple_id: Uuid,
    /// Registered spending limit, None while unset or after clearing
    pub total_budget: Option<i64>,
    /// Sum of all recorded expenses
    pub total_spent: i64,
    /// `total_budget - total_spent`, None whenever `total_budget` is None
    pub remaining_budget: Option<i64>,
    /// Wedding hall spending subtotal
    pub hall_spent: i64,
    /// Studio/dress/makeup spending subtotal
    pub sdm_spent: i64,
    /// Ceremony spending subtotal
    pub ceremony_spent: i64,
    /// Household supplies spending subtotal
    pub supplies_spent: i64,
    /// Everything-else spending subtotal
    pub etc_spent: i64,
}

/// Summary rows stand alone; detail rows reference the couple, not the summary.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
