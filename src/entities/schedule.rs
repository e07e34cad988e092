//! Couple schedule entity - One row per planned event.
//!
//! Independent of the budget subsystem; scoped to a couple and listed by
//! calendar month, ordered by date then time.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Couple schedule database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "couple_schedule")]
pub struct Model {
    /// Surrogate key for the event
    #[sea_orm(primary_key)]
    pub schedule_id: i64,
    /// Couple this event belongs to
    pub couple_id: Uuid,
    /// Event title (1-50 characters)
    pub title: String,
    /// Event description (1-500 characters)
    pub content: String,
    /// Date of the event
    pub date: Date,
    /// Time of the event
    pub time: Time,
}

/// Schedule rows stand alone.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
