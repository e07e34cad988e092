//! User profile entity - One row per registered person.
//!
//! The `couple_id` column is the only mutable identity field: null means
//! unattached, and at most two rows may share the same non-null value.
//! It transitions null -> value on linking and value -> null on release,
//! never directly between two values.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User profile database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profile")]
pub struct Model {
    /// Stable user identity, assigned at creation and immutable
    #[sea_orm(primary_key)]
    pub user_id: i64,
    /// Opaque group identifier shared by exactly the two linked profiles, None while unattached
    pub couple_id: Option<Uuid>,
    /// Display name (1-50 characters)
    pub name: String,
    /// Contact phone number
    pub phone: String,
    /// Profile image location, None until one is uploaded
    pub profile_image_url: Option<String>,
    /// When the profile was created
    pub created_at: DateTimeUtc,
}

/// User profiles have no owned relations; couple-scoped rows are keyed by
/// `couple_id`, which is not a foreign key to this table.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
