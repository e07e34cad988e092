//! User profile business logic - profile lifecycle and identity resolution.
//!
//! Profiles are created once by the onboarding flow and updated field-wise
//! afterwards. `resolve_couple_id` is the one identity-resolution seam the
//! rest of the couple subsystem goes through: every couple-scoped operation
//! starts by exchanging the caller's user id for their couple id here.

use crate::{
    entities::{UserProfile, user_profile},
    errors::{Error, Result},
    masking,
};
use sea_orm::{Set, prelude::*};
use tracing::{debug, error};
use uuid::Uuid;

/// Field-wise profile update. `None` leaves the field untouched.
#[derive(Debug, Default, Clone)]
pub struct ProfileChanges {
    /// New display name
    pub name: Option<String>,
    /// New phone number
    pub phone: Option<String>,
    /// New profile image location (already uploaded by the caller)
    pub profile_image_url: Option<String>,
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() || name.chars().count() > 50 {
        return Err(Error::Validation {
            field: "name",
            message: "must be 1~50 characters and not blank".to_string(),
        });
    }
    Ok(())
}

fn validate_phone(phone: &str) -> Result<()> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let count = digits.chars().count();
    let well_formed =
        (1..=20).contains(&count) && digits.chars().all(|c| c.is_ascii_digit() || c == '-');
    if !well_formed {
        return Err(Error::Validation {
            field: "phone",
            message: "Invalid phone number format".to_string(),
        });
    }
    Ok(())
}

/// Creates a new user profile. Called by the onboarding flow; the returned
/// model carries the freshly assigned user id.
pub async fn create_profile(
    db: &DatabaseConnection,
    name: String,
    phone: String,
) -> Result<user_profile::Model> {
    validate_name(&name)?;
    validate_phone(&phone)?;

    let masked_phone = masking::mask_phone(&phone);
    let profile = user_profile::ActiveModel {
        couple_id: Set(None),
        name: Set(name),
        phone: Set(phone),
        profile_image_url: Set(None),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    profile.insert(db).await.map_err(|err| {
        error!(
            "Failed to save user profile: identifierType=phone, identifierValue={masked_phone}"
        );
        err.into()
    })
}

/// Loads a profile by user id.
pub async fn get_profile(db: &DatabaseConnection, user_id: i64) -> Result<user_profile::Model> {
    UserProfile::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            error!(
                "User profile not found: identifierType=userId, identifierValue={}",
                masking::mask_user_id(user_id)
            );
            Error::ProfileNotFound { user_id }
        })
}

/// Applies a field-wise update to a profile and returns the updated model.
///
/// Name and phone are validated with the same rules as creation; the image
/// URL is stored opaquely (the upload itself happens outside this crate).
pub async fn update_profile(
    db: &DatabaseConnection,
    user_id: i64,
    changes: ProfileChanges,
) -> Result<user_profile::Model> {
    let profile = get_profile(db, user_id).await?;
    let mut active: user_profile::ActiveModel = profile.into();

    if let Some(name) = changes.name {
        validate_name(&name)?;
        active.name = Set(name);
    }

    if let Some(phone) = changes.phone {
        validate_phone(&phone)?;
        active.phone = Set(phone);
    }

    if let Some(url) = changes.profile_image_url {
        active.profile_image_url = Set(Some(url));
    }

    active.update(db).await.map_err(Into::into)
}

/// Resolves a user id to the couple id their profile carries.
///
/// This is the narrow lookup every couple-scoped module consumes: fails
/// with [`Error::CoupleNotConnected`] for an unattached profile and
/// [`Error::ProfileNotFound`] when no profile exists at all.
pub async fn resolve_couple_id(db: &DatabaseConnection, user_id: i64) -> Result<Uuid> {
    let profile = get_profile(db, user_id).await?;

    profile.couple_id.ok_or_else(|| {
        debug!(
            "Couple not connected: identifierType=userId, identifierValue={}",
            masking::mask_user_id(user_id)
        );
        Error::CoupleNotConnected
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{create_test_profile, link_test_couple, setup_test_db};
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_profile_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        // Blank name is rejected before any query runs
        let result = create_profile(&db, "   ".to_string(), "010-1234-5678".to_string()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "name", .. }
        ));

        // Over-long name
        let result = create_profile(&db, "x".repeat(51), "010-1234-5678".to_string()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "name", .. }
        ));

        // Phone with letters
        let result = create_profile(&db, "Yuna".to_string(), "010-abcd-5678".to_string()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "phone", .. }
        ));

        // Over-long phone
        let result = create_profile(&db, "Yuna".to_string(), "1".repeat(21)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "phone", .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_get_profile() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_profile(&db, "Yuna".to_string(), "+82-10-1234-5678".to_string())
            .await?;
        assert!(created.couple_id.is_none());
        assert!(created.profile_image_url.is_none());

        let fetched = get_profile(&db, created.user_id).await?;
        assert_eq!(fetched, created);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_profile_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = get_profile(&db, 999).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::ProfileNotFound { user_id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_profile_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let profile = create_test_profile(&db, "Yuna").await?;

        let updated = update_profile(
            &db,
            profile.user_id,
            ProfileChanges {
                name: Some("Yuna Kim".to_string()),
                phone: None,
                profile_image_url: Some("https://img.example/1.png".to_string()),
            },
        )
        .await?;

        assert_eq!(updated.name, "Yuna Kim");
        assert_eq!(updated.phone, profile.phone, "untouched field survives");
        assert_eq!(
            updated.profile_image_url.as_deref(),
            Some("https://img.example/1.png")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_update_profile_rejects_bad_phone() -> Result<()> {
        let db = setup_test_db().await?;
        let profile = create_test_profile(&db, "Yuna").await?;

        let result = update_profile(
            &db,
            profile.user_id,
            ProfileChanges {
                phone: Some("call me".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "phone", .. }
        ));

        // Nothing was persisted
        let fetched = get_profile(&db, profile.user_id).await?;
        assert_eq!(fetched.phone, profile.phone);

        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_couple_id() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_profile(&db, "Yuna").await?;
        let b = create_test_profile(&db, "Minho").await?;

        // Unattached profile
        let result = resolve_couple_id(&db, a.user_id).await;
        assert!(matches!(result.unwrap_err(), Error::CoupleNotConnected));

        // Missing profile
        let result = resolve_couple_id(&db, 999).await;
        assert!(matches!(result.unwrap_err(), Error::ProfileNotFound { .. }));

        let couple_id = link_test_couple(&db, a.user_id, b.user_id).await?;
        assert_eq!(resolve_couple_id(&db, a.user_id).await?, couple_id);
        assert_eq!(resolve_couple_id(&db, b.user_id).await?, couple_id);

        Ok(())
    }
}
