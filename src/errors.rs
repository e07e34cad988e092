//! Unified error types for the couple subsystem.
//!
//! Variants fall into four tiers: validation faults (rejected before any
//! store access), business-rule faults (expected outcomes of normal use,
//! reported with a stable numeric code), integrity faults (references that
//! must exist by invariant but don't), and infrastructure faults (store
//! failures, retryable at the caller's discretion).

use thiserror::Error;
use uuid::Uuid;

/// Unified error type for all core operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Validation faults ---
    /// A monetary amount was negative.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: i64,
    },

    /// A request field failed validation.
    #[error("Invalid value for {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: &'static str,
        /// Human-readable constraint description
        message: String,
    },

    // --- Business-rule faults ---
    /// The caller's profile has no couple id.
    #[error("Couple is not connected")]
    CoupleNotConnected,

    /// The redeemed invite code was issued by the redeemer.
    #[error("Cannot connect a couple to yourself")]
    CannotConnectToSelf,

    /// The redeemer already belongs to a couple.
    #[error("You are already connected to a couple")]
    AlreadyConnectedSelf,

    /// The code issuer already belongs to a couple.
    #[error("The invited partner is already connected to a couple")]
    AlreadyConnectedPartner,

    /// Release was requested but the profile is not linked.
    #[error("Couple is already released")]
    AlreadyReleased,

    /// A total budget is already registered for this couple.
    #[error("Total budget already exists")]
    TotalBudgetAlreadyExists,

    /// No total budget has been registered for this couple.
    #[error("Total budget is not registered")]
    TotalBudgetNotRegistered,

    /// The invite code is unknown, consumed, or expired.
    #[error("Invalid invite code")]
    InvalidInviteCode,

    /// The resource belongs to a different couple.
    #[error("Forbidden")]
    Forbidden,

    // --- Integrity faults ---
    /// No profile row exists for a user id that must exist.
    #[error("User profile not found: userId={user_id}")]
    ProfileNotFound {
        /// The missing user id
        user_id: i64,
    },

    /// A linked profile has no counterpart sharing its couple id.
    #[error("Partner profile not found: coupleId={couple_id}")]
    PartnerNotFound {
        /// The orphaned couple id
        couple_id: Uuid,
    },

    /// No summary row exists for a couple that must have one.
    #[error("Couple budget summary not found: coupleId={couple_id}")]
    SummaryNotFound {
        /// The couple id with no summary row
        couple_id: Uuid,
    },

    /// No detail row exists for the given id.
    #[error("Couple budget detail not found: budgetDetailId={budget_detail_id}")]
    DetailNotFound {
        /// The missing detail id
        budget_detail_id: i64,
    },

    /// No schedule row exists for the given id.
    #[error("Couple schedule not found: scheduleId={schedule_id}")]
    ScheduleNotFound {
        /// The missing schedule id
        schedule_id: i64,
    },

    /// The summary row no longer matches the detail ledger.
    #[error("Couple budget summary inconsistent with details: coupleId={couple_id}")]
    SummaryInconsistent {
        /// The couple id whose summary diverged
        couple_id: Uuid,
    },

    // --- Infrastructure faults ---
    /// All invite-code candidates collided with live codes.
    #[error("Failed to generate a unique invite code")]
    CodeGenerationExhausted,

    /// Database error from the relational store.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Configuration loading or parsing failure.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong while loading configuration
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Stable numeric code reported to callers: 1xxx for business-rule
    /// faults, 2xxx for infrastructure faults, 0 for everything else
    /// (validation and integrity faults map onto transport-level outcomes
    /// in the excluded controller layer).
    pub const fn code(&self) -> u16 {
        match self {
            Self::CoupleNotConnected => 1101,
            Self::CannotConnectToSelf => 1102,
            Self::AlreadyConnectedSelf => 1103,
            Self::AlreadyConnectedPartner => 1104,
            Self::AlreadyReleased => 1105,
            Self::InvalidInviteCode => 1106,
            Self::TotalBudgetAlreadyExists => 1201,
            Self::TotalBudgetNotRegistered => 1202,
            Self::Forbidden => 1301,
            Self::Database(_) => 2101,
            Self::CodeGenerationExhausted => 2105,
            Self::Config { .. } | Self::Io(_) | Self::EnvVar(_) => 2100,
            _ => 0,
        }
    }

    /// Whether this error is an expected outcome of normal use rather than
    /// a fault requiring operator attention.
    pub const fn is_business(&self) -> bool {
        matches!(
            self,
            Self::CoupleNotConnected
                | Self::CannotConnectToSelf
                | Self::AlreadyConnectedSelf
                | Self::AlreadyConnectedPartner
                | Self::AlreadyReleased
                | Self::TotalBudgetAlreadyExists
                | Self::TotalBudgetNotRegistered
                | Self::InvalidInviteCode
                | Self::Forbidden
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
