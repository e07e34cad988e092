//! Core business logic - framework-agnostic couple, budget, profile, and
//! schedule operations.
//!
//! All functions are async, operate on a `SeaORM` connection plus (where
//! invite codes are involved) an [`crate::cache::InviteCodeStore`], and
//! return crate [`Result`](crate::errors::Result)s. The transport layer
//! that resolves callers to user ids sits above this module.

/// Budget aggregate maintenance and the expense ledger
pub mod budget;
/// Invite-code issuance, redemption, and couple release
pub mod couple;
/// Profile management and userId -> coupleId resolution
pub mod profile;
/// Couple schedule management
pub mod schedule;
