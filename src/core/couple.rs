//! Couple linking business logic - invite-code issuance, redemption, and release.
//!
//! Linking is the only path that creates a couple id. An issuer hands a
//! short-lived code to their partner out of band; redeeming it mints a fresh
//! couple id and stamps it onto both profiles in one storage transaction.
//! The ephemeral store holding the codes is independent of the relational
//! store, so redemption is not atomic across the two: the code delete after
//! a successful link is best-effort cleanup, and a stale code is rendered
//! harmless by the already-connected guards.

use crate::{
    cache::InviteCodeStore,
    config::InviteCodeConfig,
    entities::{UserProfile, user_profile},
    errors::{Error, Result},
    masking,
};
use rand::Rng;
use sea_orm::sea_query::Expr;
use sea_orm::{DatabaseConnection, TransactionTrait, prelude::*};
use tracing::{debug, error, info};
use uuid::Uuid;

/// Invite codes are fixed-length uppercase alphanumerics.
const CODE_LENGTH: usize = 6;
/// Candidate attempts before code generation is reported exhausted.
const MAX_CODE_ATTEMPTS: usize = 5;
const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn generate_candidate() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..CODE_CHARSET.len());
            CODE_CHARSET[idx] as char
        })
        .collect()
}

/// Issues a fresh invite code bound to `user_id` for the configured TTL.
///
/// Candidates already live in the store are collisions and are retried, up
/// to [`MAX_CODE_ATTEMPTS`]; exhausting every attempt is an infrastructure
/// failure, not a business outcome. The code is only returned once the
/// store write succeeded. Issuing again while an earlier code is still live
/// does not invalidate the earlier one.
pub async fn issue_invite_code<S: InviteCodeStore>(
    store: &S,
    config: &InviteCodeConfig,
    user_id: i64,
) -> Result<String> {
    for _ in 0..MAX_CODE_ATTEMPTS {
        let candidate = generate_candidate();
        if store.get(&candidate).await?.is_some() {
            continue;
        }

        store.put(&candidate, user_id, config.ttl()).await?;
        return Ok(candidate);
    }

    error!(
        "Invite code generation exhausted: identifierType=userId, identifierValue={}",
        masking::mask_user_id(user_id)
    );
    Err(Error::CodeGenerationExhausted)
}

/// Redeems an invite code, linking the redeemer to the code's issuer under
/// a freshly minted couple id, and returns that id.
///
/// The already-connected checks run against one snapshot of both profiles,
/// but a concurrent redemption naming either party could link them between
/// that read and our write. The writes therefore re-validate: each profile
/// is only stamped where its `couple_id` is still null, and a failed guard
/// rolls the transaction back so no profile is ever left half-linked.
pub async fn connect_couple<S: InviteCodeStore>(
    db: &DatabaseConnection,
    store: &S,
    user_id: i64,
    code: &str,
) -> Result<Uuid> {
    // 1) Resolve the issuer; an unknown code may be expired or consumed
    let issuer_id = store.get(code).await?.ok_or_else(|| {
        debug!(
            "Invalid invite code: identifierType=inviteCode, identifierValue={}",
            masking::mask_invite_code(code)
        );
        Error::InvalidInviteCode
    })?;

    // 2) Self-linking is forbidden regardless of store state
    if issuer_id == user_id {
        debug!(
            "Attempted self connection: identifierType=userId, identifierValue={}",
            masking::mask_user_id(user_id)
        );
        return Err(Error::CannotConnectToSelf);
    }

    let txn = db.begin().await?;

    // 3) One snapshot of both profiles governs the decision
    let me = UserProfile::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| {
            error!(
                "User profile not found: identifierType=userId, identifierValue={}",
                masking::mask_user_id(user_id)
            );
            Error::ProfileNotFound { user_id }
        })?;

    let partner = UserProfile::find_by_id(issuer_id)
        .one(&txn)
        .await?
        .ok_or_else(|| {
            error!(
                "Issuer profile not found: identifierType=userId, identifierValue={}",
                masking::mask_user_id(issuer_id)
            );
            Error::ProfileNotFound { user_id: issuer_id }
        })?;

    if me.couple_id.is_some() {
        debug!(
            "Redeemer already connected: identifierType=userId, identifierValue={}",
            masking::mask_user_id(user_id)
        );
        return Err(Error::AlreadyConnectedSelf);
    }

    if partner.couple_id.is_some() {
        debug!(
            "Issuer already connected: identifierType=userId, identifierValue={}",
            masking::mask_user_id(issuer_id)
        );
        return Err(Error::AlreadyConnectedPartner);
    }

    // 4) Stamp both profiles, guarded against a racing redemption
    let couple_id = Uuid::new_v4();

    let res = UserProfile::update_many()
        .col_expr(user_profile::Column::CoupleId, Expr::value(couple_id))
        .filter(user_profile::Column::UserId.eq(user_id))
        .filter(user_profile::Column::CoupleId.is_null())
        .exec(&txn)
        .await?;
    if res.rows_affected == 0 {
        return Err(Error::AlreadyConnectedSelf);
    }

    let res = UserProfile::update_many()
        .col_expr(user_profile::Column::CoupleId, Expr::value(couple_id))
        .filter(user_profile::Column::UserId.eq(issuer_id))
        .filter(user_profile::Column::CoupleId.is_null())
        .exec(&txn)
        .await?;
    if res.rows_affected == 0 {
        // rolls back the redeemer's write too
        return Err(Error::AlreadyConnectedPartner);
    }

    txn.commit().await?;

    info!(
        "Couple connected: identifierType=coupleId, identifierValue={}",
        masking::mask_couple_id(couple_id)
    );

    // 5) Consume the code. The link above is already committed and is not
    // rolled back if this delete fails: a retried redemption of the stale
    // code dies on the already-connected guard.
    store.remove(code).await?;

    Ok(couple_id)
}

/// Releases the caller's couple, clearing the couple id from both profiles.
pub async fn release_couple(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let me = UserProfile::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            error!(
                "User profile not found: identifierType=userId, identifierValue={}",
                masking::mask_user_id(user_id)
            );
            Error::ProfileNotFound { user_id }
        })?;

    let Some(couple_id) = me.couple_id else {
        debug!(
            "Couple already released: identifierType=userId, identifierValue={}",
            masking::mask_user_id(user_id)
        );
        return Err(Error::AlreadyReleased);
    };

    // The partner is the other profile carrying the same couple id; its
    // absence means a previous link or release only half-applied
    UserProfile::find()
        .filter(user_profile::Column::CoupleId.eq(couple_id))
        .filter(user_profile::Column::UserId.ne(user_id))
        .one(db)
        .await?
        .ok_or_else(|| {
            error!(
                "Partner profile not found: identifierType=coupleId, identifierValue={}",
                masking::mask_couple_id(couple_id)
            );
            Error::PartnerNotFound { couple_id }
        })?;

    // One statement unlinks both rows
    UserProfile::update_many()
        .col_expr(user_profile::Column::CoupleId, Expr::value(None::<Uuid>))
        .filter(user_profile::Column::CoupleId.eq(couple_id))
        .exec(db)
        .await?;

    info!(
        "Couple released: identifierType=coupleId, identifierValue={}",
        masking::mask_couple_id(couple_id)
    );

    Ok(())
}
