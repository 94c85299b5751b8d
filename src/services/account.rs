// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account service: registration, login, and the unified session view.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{Identity, Profile, RoleDetails, VolunteerRecord};
use crate::services::password;
use crate::time_utils::now_rfc3339;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A new account request, already form-validated by the route layer.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: RoleDetails,
}

/// Unified view of the current session.
///
/// `profile == None` means the profile document is not loaded (the fetch
/// failed or the stored document did not decode). Consumers treat that as
/// still-loading, never as "no role".
#[derive(Debug, Clone)]
pub struct Session {
    pub uid: String,
    pub email: String,
    pub profile: Option<Profile>,
}

/// Registration, credential checks, and session composition over the
/// identity and profile collections.
#[derive(Clone)]
pub struct AccountService {
    db: FirestoreDb,
}

impl AccountService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Register a new account.
    ///
    /// Writes the identity, the profile, and (for volunteers) the roster
    /// record in one transaction, so no partially-registered state exists.
    pub async fn register(&self, account: NewAccount) -> Result<Profile> {
        if account.password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::WeakPassword(MIN_PASSWORD_LEN));
        }

        let email = account.email.trim().to_string();
        let uid = uuid::Uuid::new_v4().to_string();
        let now = now_rfc3339();

        let identity = Identity {
            uid: uid.clone(),
            email: email.clone(),
            password_hash: password::hash_password(&account.password)?,
            created_at: now.clone(),
        };

        let profile = Profile {
            uid: uid.clone(),
            email: email.clone(),
            display_name: account.display_name.clone(),
            role: account.role.clone(),
        };

        let volunteer = match &account.role {
            RoleDetails::Volunteer {
                location,
                educational_qualification,
            } => Some(VolunteerRecord {
                uid,
                display_name: account.display_name,
                email,
                location: location.clone(),
                educational_qualification: educational_qualification.clone(),
                created_at: now,
                is_active: true,
            }),
            _ => None,
        };

        self.db
            .register_account(&identity, &profile, volunteer.as_ref())
            .await?;

        Ok(profile)
    }

    /// Check credentials and return the signed-in identity.
    ///
    /// A missing account and a wrong password are indistinguishable to the
    /// caller. Login does not load the profile; that happens when the
    /// session view is requested.
    pub async fn login(&self, email: &str, password_input: &str) -> Result<Identity> {
        let identity = self
            .db
            .get_identity(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !password::verify_password(&identity.password_hash, password_input) {
            return Err(AppError::InvalidCredentials);
        }

        Ok(identity)
    }

    /// Compose the unified session view for an authenticated identity.
    pub async fn current_session(&self, uid: &str, email: &str) -> Session {
        let profile = match self.db.get_profile(uid).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(
                    uid,
                    error = %e,
                    "Profile fetch failed; session continues without profile"
                );
                None
            }
        };

        Session {
            uid: uid.to_string(),
            email: email.to_string(),
            profile,
        }
    }
}
