// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Identities (login credentials)
//! - Users (profile storage) and Volunteers (denormalized roster)
//! - Food donations (create / list / claim)
//! - Community issues (create / list / verify)
//!
//! Status transitions (claim, verify) run inside Firestore transactions with
//! the current document read under the transaction, so two actors racing for
//! the same pending record cannot both win.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{
    CommunityIssue, DonationStatus, FoodDonation, Identity, IssueStatus, Profile, VolunteerRecord,
};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

/// Result of a conditional status transition.
enum TransitionOutcome<T> {
    Missing,
    NotPending,
    Updated(T),
}

/// Document id for an identity: percent-encoded lowercased email, so email
/// uniqueness is enforced by the document key itself.
pub fn identity_doc_id(email: &str) -> String {
    urlencoding::encode(&email.trim().to_lowercase()).into_owned()
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing async-trait
        // or a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Identity Operations ─────────────────────────────────────

    /// Look up login credentials by email.
    pub async fn get_identity(&self, email: &str) -> Result<Option<Identity>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::IDENTITIES)
            .obj()
            .one(&identity_doc_id(email))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Registration ────────────────────────────────────────────

    /// Create an account: identity, profile, and (for volunteers) the roster
    /// record, committed in a single transaction.
    ///
    /// Fails with `EmailInUse` when an identity document already exists for
    /// the email. The uniqueness check is a read before the transaction;
    /// partial state cannot occur, but two truly simultaneous registrations
    /// for the same email resolve last-write-wins on the identity document.
    pub async fn register_account(
        &self,
        identity: &Identity,
        profile: &Profile,
        volunteer: Option<&VolunteerRecord>,
    ) -> Result<(), AppError> {
        if self.get_identity(&identity.email).await?.is_some() {
            return Err(AppError::EmailInUse);
        }

        let mut transaction = self
            .get_client()?
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::IDENTITIES)
            .document_id(identity_doc_id(&identity.email))
            .object(identity)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add identity to transaction: {}", e))
            })?;

        self.get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&profile.uid)
            .object(profile)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add profile to transaction: {}", e))
            })?;

        if let Some(record) = volunteer {
            self.get_client()?
                .fluent()
                .update()
                .in_col(collections::VOLUNTEERS)
                .document_id(&record.uid)
                .object(record)
                .add_to_transaction(&mut transaction)
                .map_err(|e| {
                    AppError::Database(format!(
                        "Failed to add volunteer record to transaction: {}",
                        e
                    ))
                })?;
        }

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::info!(
            uid = %profile.uid,
            role = profile.role.kind(),
            "Account registered"
        );

        Ok(())
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get a user profile by uid.
    pub async fn get_profile(&self, uid: &str) -> Result<Option<Profile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a volunteer roster record by uid.
    pub async fn get_volunteer(&self, uid: &str) -> Result<Option<VolunteerRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::VOLUNTEERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Food Donation Operations ────────────────────────────────

    /// Get a food donation by id.
    pub async fn get_food_donation(&self, id: &str) -> Result<Option<FoodDonation>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::FOOD_DONATIONS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a new food donation.
    pub async fn create_food_donation(&self, donation: &FoodDonation) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::FOOD_DONATIONS)
            .document_id(&donation.id)
            .object(donation)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List food donations, newest first, optionally filtered by status.
    ///
    /// An empty status slice returns the whole collection. Ordering is
    /// applied by the server query, never re-sorted locally.
    pub async fn list_food_donations(
        &self,
        statuses: &[DonationStatus],
    ) -> Result<Vec<FoodDonation>, AppError> {
        let status_names: Vec<&'static str> = statuses.iter().map(|s| s.as_str()).collect();

        self.get_client()?
            .fluent()
            .select()
            .from(collections::FOOD_DONATIONS)
            .filter(move |q| q.for_any(status_names.iter().map(|s| q.field("status").eq(*s))))
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Claim a pending donation for a volunteer (pending → assigned).
    ///
    /// The current document is read inside the transaction; when the record
    /// is no longer pending the claim fails with `AlreadyAssigned`, so a
    /// double-claim race has exactly one winner.
    pub async fn claim_food_donation(
        &self,
        id: &str,
        volunteer_id: &str,
        volunteer_name: &str,
        now: &str,
    ) -> Result<FoodDonation, AppError> {
        let donation_id = id.to_string();
        let volunteer_id = volunteer_id.to_string();
        let volunteer_name = volunteer_name.to_string();
        let now = now.to_string();

        let outcome = self
            .get_client()?
            .run_transaction(|db, transaction| {
                let donation_id = donation_id.clone();
                let volunteer_id = volunteer_id.clone();
                let volunteer_name = volunteer_name.clone();
                let now = now.clone();
                Box::pin(async move {
                    let current: Option<FoodDonation> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::FOOD_DONATIONS)
                        .obj()
                        .one(&donation_id)
                        .await?;

                    let Some(current) = current else {
                        return Ok(TransitionOutcome::Missing);
                    };

                    if current.status != DonationStatus::Pending {
                        return Ok(TransitionOutcome::NotPending);
                    }

                    let mut updated = current;
                    updated.status = DonationStatus::Assigned;
                    updated.volunteer_id = Some(volunteer_id);
                    updated.volunteer_name = Some(volunteer_name);
                    updated.assigned_at = Some(now);

                    db.fluent()
                        .update()
                        .in_col(collections::FOOD_DONATIONS)
                        .document_id(&updated.id)
                        .object(&updated)
                        .add_to_transaction(transaction)?;

                    Ok(TransitionOutcome::Updated(updated))
                })
            })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match outcome {
            TransitionOutcome::Missing => {
                Err(AppError::NotFound(format!("Food donation {} not found", id)))
            }
            TransitionOutcome::NotPending => Err(AppError::AlreadyAssigned),
            TransitionOutcome::Updated(donation) => {
                tracing::info!(donation_id = %donation.id, "Food donation claimed");
                Ok(donation)
            }
        }
    }

    // ─── Community Issue Operations ──────────────────────────────

    /// Get a community issue by id.
    pub async fn get_community_issue(&self, id: &str) -> Result<Option<CommunityIssue>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::COMMUNITY_ISSUES)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a new community issue.
    pub async fn create_community_issue(&self, issue: &CommunityIssue) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::COMMUNITY_ISSUES)
            .document_id(&issue.id)
            .object(issue)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List community issues, newest first, optionally filtered by status.
    pub async fn list_community_issues(
        &self,
        statuses: &[IssueStatus],
    ) -> Result<Vec<CommunityIssue>, AppError> {
        let status_names: Vec<&'static str> = statuses.iter().map(|s| s.as_str()).collect();

        self.get_client()?
            .fluent()
            .select()
            .from(collections::COMMUNITY_ISSUES)
            .filter(move |q| q.for_any(status_names.iter().map(|s| q.field("status").eq(*s))))
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Verify a pending issue (pending → verified) with volunteer attribution.
    ///
    /// Same conditional-transition shape as donation claims; a record that is
    /// no longer pending fails with `PreconditionFailed`.
    pub async fn verify_community_issue(
        &self,
        id: &str,
        volunteer_id: &str,
        volunteer_name: &str,
        now: &str,
    ) -> Result<CommunityIssue, AppError> {
        let issue_id = id.to_string();
        let volunteer_id = volunteer_id.to_string();
        let volunteer_name = volunteer_name.to_string();
        let now = now.to_string();

        let outcome = self
            .get_client()?
            .run_transaction(|db, transaction| {
                let issue_id = issue_id.clone();
                let volunteer_id = volunteer_id.clone();
                let volunteer_name = volunteer_name.clone();
                let now = now.clone();
                Box::pin(async move {
                    let current: Option<CommunityIssue> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::COMMUNITY_ISSUES)
                        .obj()
                        .one(&issue_id)
                        .await?;

                    let Some(current) = current else {
                        return Ok(TransitionOutcome::Missing);
                    };

                    if current.status != IssueStatus::Pending {
                        return Ok(TransitionOutcome::NotPending);
                    }

                    let mut updated = current;
                    updated.status = IssueStatus::Verified;
                    updated.verified_by = Some(volunteer_id);
                    updated.verifier_name = Some(volunteer_name);
                    updated.verified_at = Some(now.clone());
                    updated.updated_at = now;

                    db.fluent()
                        .update()
                        .in_col(collections::COMMUNITY_ISSUES)
                        .document_id(&updated.id)
                        .object(&updated)
                        .add_to_transaction(transaction)?;

                    Ok(TransitionOutcome::Updated(updated))
                })
            })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match outcome {
            TransitionOutcome::Missing => Err(AppError::NotFound(format!(
                "Community issue {} not found",
                id
            ))),
            TransitionOutcome::NotPending => Err(AppError::PreconditionFailed(format!(
                "Community issue {} is no longer pending",
                id
            ))),
            TransitionOutcome::Updated(issue) => {
                tracing::info!(issue_id = %issue.id, "Community issue verified");
                Ok(issue)
            }
        }
    }
}
