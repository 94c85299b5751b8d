// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Food donation routes (Annamitra Seva module).

use crate::db::collections;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{DonationStatus, FoodDonation, Profile, RoleDetails};
use crate::services::sync::snapshot_stream;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    response::sse::{KeepAlive, Sse},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/food-donation", get(list_donations).post(create_donation))
        .route("/food-donation/{id}/claim", post(claim_donation))
        .route("/food-donation/stream", get(stream_donations))
}

/// Optional comma-separated status filter, e.g. `?status=pending,assigned`.
#[derive(Deserialize)]
struct StatusFilterQuery {
    status: Option<String>,
}

fn parse_status_filter(raw: Option<&str>) -> Result<Vec<DonationStatus>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            DonationStatus::parse(s)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown status filter: {}", s)))
        })
        .collect()
}

/// Fetch the authenticated user's profile or fail; mutations cannot proceed
/// while the profile is still loading.
async fn require_profile(state: &AppState, user: &AuthUser) -> Result<Profile> {
    state
        .accounts
        .current_session(&user.uid, &user.email)
        .await
        .profile
        .ok_or_else(|| AppError::Forbidden("profile not loaded".to_string()))
}

// ─── List ────────────────────────────────────────────────────

/// List food donations, newest first, optionally filtered by status.
async fn list_donations(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<StatusFilterQuery>,
) -> Result<Json<Vec<FoodDonation>>> {
    let statuses = parse_status_filter(params.status.as_deref())?;

    tracing::debug!(
        uid = %user.uid,
        filter = ?params.status,
        "Listing food donations"
    );

    let donations = state.db.list_food_donations(&statuses).await?;
    Ok(Json(donations))
}

// ─── Create ──────────────────────────────────────────────────

/// New donation form payload.
#[derive(Debug, Deserialize, Validate)]
pub struct DonationForm {
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    #[validate(length(min = 1, max = 60))]
    pub food_type: String,
    #[validate(length(min = 1, max = 60))]
    pub quantity: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    /// Preferred pickup time (RFC3339)
    pub pickup_time: String,
}

/// Create a food donation (donors and admins only).
async fn create_donation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(form): Json<DonationForm>,
) -> Result<Json<FoodDonation>> {
    form.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if chrono::DateTime::parse_from_rfc3339(&form.pickup_time).is_err() {
        return Err(AppError::BadRequest(
            "pickup_time must be an RFC3339 datetime".to_string(),
        ));
    }

    let profile = require_profile(&state, &user).await?;
    if !matches!(profile.role, RoleDetails::Donor | RoleDetails::Admin) {
        return Err(AppError::Forbidden(profile.role.kind().to_string()));
    }

    let donation = FoodDonation {
        id: uuid::Uuid::new_v4().to_string(),
        title: form.title,
        description: form.description,
        food_type: form.food_type,
        quantity: form.quantity,
        location: form.location,
        pickup_time: form.pickup_time,
        donor_name: profile.display_name,
        donor_id: profile.uid,
        status: DonationStatus::Pending,
        volunteer_id: None,
        volunteer_name: None,
        assigned_at: None,
        created_at: now_rfc3339(),
    };

    state.db.create_food_donation(&donation).await?;
    state.changes.publish(collections::FOOD_DONATIONS);

    tracing::info!(donation_id = %donation.id, "Food donation created");

    Ok(Json(donation))
}

// ─── Claim ───────────────────────────────────────────────────

/// Claim a pending donation (volunteers only, pending → assigned).
///
/// A donation that is no longer pending fails with `already_assigned`;
/// two volunteers racing for the same record get exactly one winner.
async fn claim_donation(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<FoodDonation>> {
    let profile = require_profile(&state, &user).await?;
    if !matches!(profile.role, RoleDetails::Volunteer { .. }) {
        return Err(AppError::Forbidden(profile.role.kind().to_string()));
    }

    let updated = state
        .db
        .claim_food_donation(&id, &profile.uid, &profile.display_name, &now_rfc3339())
        .await?;

    state.changes.publish(collections::FOOD_DONATIONS);

    Ok(Json(updated))
}

// ─── Live Stream ─────────────────────────────────────────────

/// Live snapshots of the donation list as server-sent events.
///
/// Emits the full filtered result set immediately and again after every
/// donation mutation. Closing the connection cancels the subscription.
async fn stream_donations(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<StatusFilterQuery>,
) -> Result<Sse<impl futures_util::Stream<Item = std::result::Result<axum::response::sse::Event, std::convert::Infallible>>>>
{
    let statuses = parse_status_filter(params.status.as_deref())?;

    tracing::debug!(uid = %user.uid, filter = ?params.status, "Donation stream opened");

    let rx = state.changes.subscribe(collections::FOOD_DONATIONS);
    let db = state.db.clone();

    let stream = snapshot_stream(rx, move || {
        let db = db.clone();
        let statuses = statuses.clone();
        async move { db.list_food_donations(&statuses).await }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
