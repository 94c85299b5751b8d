// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Community issue routes (Vidya Jyothi education-aid module).

use crate::db::collections;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{CommunityIssue, IssueStatus, Profile, RoleDetails, UrgencyLevel};
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
        .route("/education-aid", get(list_issues))
        .route("/education-aid/issues", post(create_issue))
        .route("/education-aid/issues/{id}/verify", post(verify_issue))
        .route("/education-aid/stream", get(stream_issues))
}

/// Optional comma-separated status filter, e.g. `?status=verified`.
#[derive(Deserialize)]
struct StatusFilterQuery {
    status: Option<String>,
}

fn parse_status_filter(raw: Option<&str>) -> Result<Vec<IssueStatus>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            IssueStatus::parse(s)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown status filter: {}", s)))
        })
        .collect()
}

async fn require_profile(state: &AppState, user: &AuthUser) -> Result<Profile> {
    state
        .accounts
        .current_session(&user.uid, &user.email)
        .await
        .profile
        .ok_or_else(|| AppError::Forbidden("profile not loaded".to_string()))
}

// ─── List ────────────────────────────────────────────────────

/// List community issues, newest first, optionally filtered by status.
///
/// Donor-facing views filter on `status=verified`; the volunteer dashboard
/// uses `status=pending,verified`.
async fn list_issues(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<StatusFilterQuery>,
) -> Result<Json<Vec<CommunityIssue>>> {
    let statuses = parse_status_filter(params.status.as_deref())?;

    tracing::debug!(uid = %user.uid, filter = ?params.status, "Listing community issues");

    let issues = state.db.list_community_issues(&statuses).await?;
    Ok(Json(issues))
}

// ─── Create ──────────────────────────────────────────────────

/// Community issue form payload. The city is not part of the form; it comes
/// from the submitting representative's profile.
#[derive(Debug, Deserialize, Validate)]
pub struct IssueForm {
    #[validate(length(min = 1, max = 100))]
    pub student_name: String,
    #[validate(range(min = 5, max = 25))]
    pub age: u32,
    #[validate(length(min = 1, max = 100))]
    pub required_support: String,
    #[validate(length(min = 1, max = 2000))]
    pub support_details: String,
    pub urgency_level: UrgencyLevel,
    #[validate(length(min = 5, max = 20))]
    pub contact_number: String,
    #[validate(length(max = 20))]
    pub alternate_contact: Option<String>,
}

/// Submit a community issue (community-support representatives only).
async fn create_issue(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(form): Json<IssueForm>,
) -> Result<Json<CommunityIssue>> {
    form.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let profile = require_profile(&state, &user).await?;
    let RoleDetails::CommunitySupport { city } = &profile.role else {
        return Err(AppError::Forbidden(profile.role.kind().to_string()));
    };

    let now = now_rfc3339();
    let issue = CommunityIssue {
        id: uuid::Uuid::new_v4().to_string(),
        student_name: form.student_name,
        age: form.age,
        required_support: form.required_support,
        support_details: form.support_details,
        urgency_level: form.urgency_level,
        contact_number: form.contact_number,
        alternate_contact: form
            .alternate_contact
            .filter(|contact| !contact.trim().is_empty()),
        submitted_by: profile.uid.clone(),
        submitter_name: profile.display_name.clone(),
        submitter_email: profile.email.clone(),
        city: city.clone(),
        status: IssueStatus::Pending,
        verified_by: None,
        verifier_name: None,
        verified_at: None,
        created_at: now.clone(),
        updated_at: now,
    };

    state.db.create_community_issue(&issue).await?;
    state.changes.publish(collections::COMMUNITY_ISSUES);

    tracing::info!(issue_id = %issue.id, city = %issue.city, "Community issue submitted");

    Ok(Json(issue))
}

// ─── Verify ──────────────────────────────────────────────────

/// Verify a pending issue (volunteers only, pending → verified).
async fn verify_issue(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<CommunityIssue>> {
    let profile = require_profile(&state, &user).await?;
    if !matches!(profile.role, RoleDetails::Volunteer { .. }) {
        return Err(AppError::Forbidden(profile.role.kind().to_string()));
    }

    let updated = state
        .db
        .verify_community_issue(&id, &profile.uid, &profile.display_name, &now_rfc3339())
        .await?;

    state.changes.publish(collections::COMMUNITY_ISSUES);

    Ok(Json(updated))
}

// ─── Live Stream ─────────────────────────────────────────────

/// Live snapshots of the issue list as server-sent events.
async fn stream_issues(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<StatusFilterQuery>,
) -> Result<Sse<impl futures_util::Stream<Item = std::result::Result<axum::response::sse::Event, std::convert::Infallible>>>>
{
    let statuses = parse_status_filter(params.status.as_deref())?;

    tracing::debug!(uid = %user.uid, filter = ?params.status, "Issue stream opened");

    let rx = state.changes.subscribe(collections::COMMUNITY_ISSUES);
    let db = state.db.clone();

    let stream = snapshot_stream(rx, move || {
        let db = db.clone();
        let statuses = statuses.clone();
        async move { db.list_community_issues(&statuses).await }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_filter() {
        assert!(parse_status_filter(None).unwrap().is_empty());
        assert_eq!(
            parse_status_filter(Some("pending,verified")).unwrap(),
            vec![IssueStatus::Pending, IssueStatus::Verified]
        );
        assert!(parse_status_filter(Some("unknown")).is_err());
    }
}
