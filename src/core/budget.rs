//! Budget business logic - the expense ledger and its denormalized summary.
//!
//! The summary row is a cache of a computable quantity: the multiset of
//! detail rows for a couple plus the last registered total-budget value
//! fully determine it, and this module is its only writer. Every summary
//! recomputation is expressed as a single UPDATE built from column
//! expressions over the pre-update row, so concurrent ledger mutations for
//! the same couple cannot lose updates. `remaining_budget` is derived in
//! the same statement as `total_budget - total_spent`, which is NULL
//! exactly when no total budget is registered.

use crate::{
    entities::{BudgetCategory, BudgetDetail, BudgetSummary, budget_detail, budget_summary},
    errors::{Error, Result},
    masking,
};
use chrono::NaiveDate;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, error};
use uuid::Uuid;

/// The registered-limit state of a summary row.
///
/// The storage column is a nullable integer, but "no limit registered" is a
/// state with its own arithmetic (no remaining budget exists), so the
/// variants are matched explicitly instead of null-checking in every branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetLimit {
    /// No total budget registered (never set, or explicitly cleared)
    Unset,
    /// A registered total budget
    Set(i64),
}

impl BudgetLimit {
    /// Reads the limit state off a summary row.
    pub fn of(summary: &budget_summary::Model) -> Self {
        match summary.total_budget {
            None => Self::Unset,
            Some(amount) => Self::Set(amount),
        }
    }

    /// The remaining budget for a given spend total: present only when a
    /// limit is registered, negative when overspent.
    pub const fn remaining(self, total_spent: i64) -> Option<i64> {
        match self {
            Self::Unset => None,
            Self::Set(amount) => Some(amount - total_spent),
        }
    }
}

const fn spent_column(category: BudgetCategory) -> budget_summary::Column {
    match category {
        BudgetCategory::Hall => budget_summary::Column::HallSpent,
        BudgetCategory::Sdm => budget_summary::Column::SdmSpent,
        BudgetCategory::Ceremony => budget_summary::Column::CeremonySpent,
        BudgetCategory::Supplies => budget_summary::Column::SuppliesSpent,
        BudgetCategory::Etc => budget_summary::Column::EtcSpent,
    }
}

fn category_spent(summary: &budget_summary::Model, category: BudgetCategory) -> i64 {
    match category {
        BudgetCategory::Hall => summary.hall_spent,
        BudgetCategory::Sdm => summary.sdm_spent,
        BudgetCategory::Ceremony => summary.ceremony_spent,
        BudgetCategory::Supplies => summary.supplies_spent,
        BudgetCategory::Etc => summary.etc_spent,
    }
}

fn ensure_non_negative(amount: i64) -> Result<()> {
    if amount < 0 {
        return Err(Error::InvalidAmount { amount });
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

/// Registers the couple's total budget.
///
/// Registration is a one-time action until explicitly cleared: a summary
/// row whose limit is already set fails with
/// [`Error::TotalBudgetAlreadyExists`]. The first registration for a couple
/// with no summary row creates the row.
pub async fn register_total_budget(
    db: &DatabaseConnection,
    couple_id: Uuid,
    amount: i64,
) -> Result<()> {
    ensure_non_negative(amount)?;

    let txn = db.begin().await?;

    let existing = BudgetSummary::find()
        .filter(budget_summary::Column::CoupleId.eq(couple_id))
        .one(&txn)
        .await?;

    match existing {
        Some(summary) => match BudgetLimit::of(&summary) {
            BudgetLimit::Set(_) => {
                debug!(
                    "Total budget already exists: identifierType=coupleId, identifierValue={}",
                    masking::mask_couple_id(couple_id)
                );
                return Err(Error::TotalBudgetAlreadyExists);
            }
            BudgetLimit::Unset => {
                // Guarded against a racing registration: only an
                // unregistered row accepts the limit
                let res = BudgetSummary::update_many()
                    .col_expr(budget_summary::Column::TotalBudget, Expr::value(amount))
                    .col_expr(
                        budget_summary::Column::RemainingBudget,
                        Expr::val(amount).sub(Expr::col(budget_summary::Column::TotalSpent)),
                    )
                    .filter(budget_summary::Column::CoupleId.eq(couple_id))
                    .filter(budget_summary::Column::TotalBudget.is_null())
                    .exec(&txn)
                    .await?;
                if res.rows_affected == 0 {
                    return Err(Error::TotalBudgetAlreadyExists);
                }
            }
        },
        None => {
            let limit = BudgetLimit::Set(amount);
            budget_summary::ActiveModel {
                couple_id: Set(couple_id),
                total_budget: Set(Some(amount)),
                total_spent: Set(0),
                remaining_budget: Set(limit.remaining(0)),
                hall_spent: Set(0),
                sdm_spent: Set(0),
                ceremony_spent: Set(0),
                supplies_spent: Set(0),
                etc_spent: Set(0),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await.map_err(Into::into)
}

/// Replaces an already-registered total budget with a new amount.
pub async fn update_total_budget(
    db: &DatabaseConnection,
    couple_id: Uuid,
    new_amount: i64,
) -> Result<()> {
    ensure_non_negative(new_amount)?;

    let txn = db.begin().await?;
    let summary = require_summary(&txn, couple_id).await?;

    if BudgetLimit::of(&summary) == BudgetLimit::Unset {
        debug!(
            "Total budget not registered: identifierType=coupleId, identifierValue={}",
            masking::mask_couple_id(couple_id)
        );
        return Err(Error::TotalBudgetNotRegistered);
    }

    let res = BudgetSummary::update_many()
        .col_expr(budget_summary::Column::TotalBudget, Expr::value(new_amount))
        .col_expr(
            budget_summary::Column::RemainingBudget,
            Expr::val(new_amount).sub(Expr::col(budget_summary::Column::TotalSpent)),
        )
        .filter(budget_summary::Column::CoupleId.eq(couple_id))
        .filter(budget_summary::Column::TotalBudget.is_not_null())
        .exec(&txn)
        .await?;
    if res.rows_affected == 0 {
        // cleared concurrently after the snapshot read
        return Err(Error::TotalBudgetNotRegistered);
    }

    txn.commit().await.map_err(Into::into)
}

/// Clears the registered total budget.
///
/// The spend totals survive; only the limit and the derived remaining
/// budget are removed. A subsequent registration starts the lifecycle over.
pub async fn clear_total_budget(db: &DatabaseConnection, couple_id: Uuid) -> Result<()> {
    let txn = db.begin().await?;
    let summary = require_summary(&txn, couple_id).await?;

    if BudgetLimit::of(&summary) == BudgetLimit::Unset {
        debug!(
            "Total budget not registered: identifierType=coupleId, identifierValue={}",
            masking::mask_couple_id(couple_id)
        );
        return Err(Error::TotalBudgetNotRegistered);
    }

    let res = BudgetSummary::update_many()
        .col_expr(budget_summary::Column::TotalBudget, Expr::value(None::<i64>))
        .col_expr(
            budget_summary::Column::RemainingBudget,
            Expr::value(None::<i64>),
        )
        .filter(budget_summary::Column::CoupleId.eq(couple_id))
        .filter(budget_summary::Column::TotalBudget.is_not_null())
        .exec(&txn)
        .await?;
    if res.rows_affected == 0 {
        return Err(Error::TotalBudgetNotRegistered);
    }

    txn.commit().await.map_err(Into::into)
}

/// Records an expense and folds it into the summary.
///
/// The detail insert and the summary maintenance share one storage
/// transaction. The first expense for a couple with no summary row creates
/// the row, seeded with the single matching category subtotal and no
/// registered limit.
pub async fn record_detail(
    db: &DatabaseConnection,
    couple_id: Uuid,
    category: BudgetCategory,
    amount: i64,
    date: NaiveDate,
    content: String,
) -> Result<budget_detail::Model> {
    ensure_non_negative(amount)?;
    validate_content(&content)?;

    let txn = db.begin().await?;

    let detail = budget_detail::ActiveModel {
        couple_id: Set(couple_id),
        category: Set(category),
        spent_amount: Set(amount),
        date: Set(date),
        content: Set(content),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let category_col = spent_column(category);

    // One atomic statement over the pre-update row; with no registered
    // limit, NULL total_budget carries through to remaining_budget
    let res = BudgetSummary::update_many()
        .col_expr(
            budget_summary::Column::TotalSpent,
            Expr::col(budget_summary::Column::TotalSpent).add(amount),
        )
        .col_expr(category_col, Expr::col(category_col).add(amount))
        .col_expr(
            budget_summary::Column::RemainingBudget,
            Expr::col(budget_summary::Column::TotalBudget)
                .sub(Expr::col(budget_summary::Column::TotalSpent).add(amount)),
        )
        .filter(budget_summary::Column::CoupleId.eq(couple_id))
        .exec(&txn)
        .await?;

    if res.rows_affected == 0 {
        // First expense for this couple creates the summary row
        let mut fresh = budget_summary::ActiveModel {
            couple_id: Set(couple_id),
            total_budget: Set(None),
            total_spent: Set(amount),
            remaining_budget: Set(BudgetLimit::Unset.remaining(amount)),
            hall_spent: Set(0),
            sdm_spent: Set(0),
            ceremony_spent: Set(0),
            supplies_spent: Set(0),
            etc_spent: Set(0),
            ..Default::default()
        };
        match category {
            BudgetCategory::Hall => fresh.hall_spent = Set(amount),
            BudgetCategory::Sdm => fresh.sdm_spent = Set(amount),
            BudgetCategory::Ceremony => fresh.ceremony_spent = Set(amount),
            BudgetCategory::Supplies => fresh.supplies_spent = Set(amount),
            BudgetCategory::Etc => fresh.etc_spent = Set(amount),
        }
        fresh.insert(&txn).await?;
    }

    txn.commit().await?;
    Ok(detail)
}

/// Deletes an expense and subtracts it back out of the summary.
///
/// The victim row is read first: it is the only authority on the amount and
/// category to subtract. A summary that cannot absorb the subtraction
/// without going negative has diverged from the ledger and is reported as
/// an integrity fault rather than clamped.
pub async fn delete_detail(
    db: &DatabaseConnection,
    couple_id: Uuid,
    budget_detail_id: i64,
) -> Result<()> {
    let txn = db.begin().await?;

    let detail = BudgetDetail::find_by_id(budget_detail_id)
        .one(&txn)
        .await?
        .ok_or_else(|| {
            error!(
                "Couple budget detail not found: identifierType=budgetDetailId, identifierValue={budget_detail_id}"
            );
            Error::DetailNotFound { budget_detail_id }
        })?;

    if detail.couple_id != couple_id {
        debug!(
            "Budget detail belongs to another couple: identifierType=coupleId, identifierValue={}",
            masking::mask_couple_id(couple_id)
        );
        return Err(Error::Forbidden);
    }

    let amount = detail.spent_amount;
    let category = detail.category;

    let summary = require_summary(&txn, couple_id).await?;
    if summary.total_spent < amount || category_spent(&summary, category) < amount {
        error!(
            "Summary does not cover deleted detail: identifierType=coupleId, identifierValue={}",
            masking::mask_couple_id(couple_id)
        );
        return Err(Error::SummaryInconsistent { couple_id });
    }

    detail.delete(&txn).await?;

    let category_col = spent_column(category);
    BudgetSummary::update_many()
        .col_expr(
            budget_summary::Column::TotalSpent,
            Expr::col(budget_summary::Column::TotalSpent).sub(amount),
        )
        .col_expr(category_col, Expr::col(category_col).sub(amount))
        .col_expr(
            budget_summary::Column::RemainingBudget,
            Expr::col(budget_summary::Column::TotalBudget)
                .sub(Expr::col(budget_summary::Column::TotalSpent).sub(amount)),
        )
        .filter(budget_summary::Column::CoupleId.eq(couple_id))
        .exec(&txn)
        .await?;

    txn.commit().await.map_err(Into::into)
}

/// Loads the couple's budget summary.
pub async fn get_budget_summary(
    db: &DatabaseConnection,
    couple_id: Uuid,
) -> Result<budget_summary::Model> {
    BudgetSummary::find()
        .filter(budget_summary::Column::CoupleId.eq(couple_id))
        .one(db)
        .await?
        .ok_or_else(|| {
            error!(
                "Couple budget summary not found: identifierType=coupleId, identifierValue={}",
                masking::mask_couple_id(couple_id)
            );
            Error::SummaryNotFound { couple_id }
        })
}

/// Lists the couple's expenses, newest spend date first, one page at a time.
pub async fn list_budget_details(
    db: &DatabaseConnection,
    couple_id: Uuid,
    page: u64,
    size: u64,
) -> Result<Vec<budget_detail::Model>> {
    if size == 0 {
        return Err(Error::Validation {
            field: "size",
            message: "page size must be at least 1".to_string(),
        });
    }

    BudgetDetail::find()
        .filter(budget_detail::Column::CoupleId.eq(couple_id))
        .order_by_desc(budget_detail::Column::Date)
        .paginate(db, size)
        .fetch_page(page)
        .await
        .map_err(Into::into)
}

async fn require_summary<C>(db: &C, couple_id: Uuid) -> Result<budget_summary::Model>
where
    C: ConnectionTrait,
{
    BudgetSummary::find()
        .filter(budget_summary::Column::CoupleId.eq(couple_id))
        .one(db)
        .await?
        .ok_or_else(|| {
            error!(
                "Couple budget summary not found: identifierType=coupleId, identifierValue={}",
                masking::mask_couple_id(couple_id)
            );
            Error::SummaryNotFound { couple_id }
        })
}
