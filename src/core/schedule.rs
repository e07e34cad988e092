//! Couple schedule business logic.
//!
//! Schedules are independent of the budget subsystem: plain couple-scoped
//! rows listed by calendar month. Ownership is enforced on every mutation -
//! touching another couple's event is forbidden, not "not found".

use crate::{
    entities::{Schedule, schedule},
    errors::{Error, Result},
    masking,
};
use chrono::{Months, NaiveDate, NaiveTime};
use sea_orm::{DatabaseConnection, QueryOrder, Set, prelude::*};
use tracing::{debug, error};
use uuid::Uuid;

/// Field-wise schedule update. `None` leaves the field untouched.
#[derive(Debug, Default, Clone)]
pub struct ScheduleChanges {
    /// New event title
    pub title: Option<String>,
    /// New event description
    pub content: Option<String>,
    /// New event date
    pub date: Option<NaiveDate>,
    /// New event time
    pub time: Option<NaiveTime>,
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() || title.chars().count() > 50 {
        return Err(Error::Validation {
            field: "title",
            message: "must be 1~50 characters and not blank".to_string(),
        });
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() || content.chars().count() > 500 {
        return Err(Error::Validation {
            field: "content",
            message: "must be 1~500 characters and not blank".to_string(),
        });
    }
    Ok(())
}

/// Creates an event for the couple.
pub async fn create_schedule(
    db: &DatabaseConnection,
    couple_id: Uuid,
    title: String,
    content: String,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<schedule::Model> {
    validate_title(&title)?;
    validate_content(&content)?;

    schedule::ActiveModel {
        couple_id: Set(couple_id),
        title: Set(title),
        content: Set(content),
        date: Set(date),
        time: Set(time),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Lists the couple's events within one calendar month, earliest first
/// (by date, then time).
pub async fn monthly_schedule(
    db: &DatabaseConnection,
    couple_id: Uuid,
    year: i32,
    month: u32,
) -> Result<Vec<schedule::Model>> {
    let start_of_month = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        Error::Validation {
            field: "month",
            message: format!("{year}-{month} is not a valid calendar month"),
        }
    })?;
    let end_of_month = start_of_month
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| Error::Validation {
            field: "month",
            message: format!("{year}-{month} is not a valid calendar month"),
        })?;

    Schedule::find()
        .filter(schedule::Column::CoupleId.eq(couple_id))
        .filter(schedule::Column::Date.between(start_of_month, end_of_month))
        .order_by_asc(schedule::Column::Date)
        .order_by_asc(schedule::Column::Time)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a field-wise update to an event and returns the updated model.
pub async fn update_schedule(
    db: &DatabaseConnection,
    couple_id: Uuid,
    schedule_id: i64,
    changes: ScheduleChanges,
) -> Result<schedule::Model> {
    let existing = require_owned_schedule(db, couple_id, schedule_id).await?;
    let mut active: schedule::ActiveModel = existing.into();

    if let Some(title) = changes.title {
        validate_title(&title)?;
        active.title = Set(title);
    }

    if let Some(content) = changes.content {
        validate_content(&content)?;
        active.content = Set(content);
    }

    if let Some(date) = changes.date {
        active.date = Set(date);
    }

    if let Some(time) = changes.time {
        active.time = Set(time);
    }

    active.update(db).await.map_err(Into::into)
}

/// Deletes an event.
pub async fn delete_schedule(
    db: &DatabaseConnection,
    couple_id: Uuid,
    schedule_id: i64,
) -> Result<()> {
    let existing = require_owned_schedule(db, couple_id, schedule_id).await?;
    existing.delete(db).await?;
    Ok(())
}

async fn require_owned_schedule(
    db: &DatabaseConnection,
    couple_id: Uuid,
    schedule_id: i64,
) -> Result<schedule::Model> {
    let existing = Schedule::find_by_id(schedule_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            error!(
                "Couple schedule not found: identifierType=scheduleId, identifierValue={schedule_id}"
            );
            Error::ScheduleNotFound { schedule_id }
        })?;

    if existing.couple_id != couple_id {
        debug!(
            "Schedule belongs to another couple: identifierType=coupleId, identifierValue={}",
            masking::mask_couple_id(couple_id)
        );
        return Err(Error::Forbidden);
    }

    Ok(existing)
}
