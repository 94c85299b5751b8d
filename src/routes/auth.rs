// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email/password authentication routes.

use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::models::RoleDetails;
use crate::services::NewAccount;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Registration form payload.
///
/// Role-specific fields are accepted for every role but only the fields
/// matching the selected role are kept; the rest are discarded.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: String,
    // Volunteer specific fields
    pub location: Option<String>,
    pub educational_qualification: Option<String>,
    // Community Support specific fields
    pub city: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Response for successful login or registration.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthResponse {
    /// Session JWT, also set as an http-only cookie
    pub token: String,
    pub uid: String,
    pub email: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Build the http-only session cookie carrying the JWT.
fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Map the submitted role string plus role-specific fields onto the typed
/// role, enforcing the role-conditional required fields.
fn role_details_from_request(req: &RegisterRequest) -> Result<RoleDetails> {
    fn required(value: &Option<String>, message: &str) -> Result<String> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation(message.to_string()))
    }

    match req.role.as_str() {
        "donor" => Ok(RoleDetails::Donor),
        "admin" => Ok(RoleDetails::Admin),
        "volunteer" => Ok(RoleDetails::Volunteer {
            location: required(&req.location, "Location is required for volunteers")?,
            educational_qualification: required(
                &req.educational_qualification,
                "Educational qualification is required for volunteers",
            )?,
        }),
        "community-support" => Ok(RoleDetails::CommunitySupport {
            city: required(&req.city, "City selection is required for Community Support")?,
        }),
        other => Err(AppError::BadRequest(format!("Unknown role: {}", other))),
    }
}

/// Create an account and start a session.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if req.password != req.confirm_password {
        return Err(AppError::Validation("Passwords do not match".to_string()));
    }

    let role = role_details_from_request(&req)?;

    let profile = state
        .accounts
        .register(NewAccount {
            email: req.email,
            password: req.password,
            display_name: req.display_name,
            role,
        })
        .await?;

    tracing::info!(uid = %profile.uid, "New account registered");

    let token = create_jwt(&profile.uid, &profile.email, &state.config.jwt_signing_key)
        .map_err(AppError::Internal)?;

    let response = AuthResponse {
        token: token.clone(),
        uid: profile.uid,
        email: profile.email,
    };

    Ok((jar.add(session_cookie(token)), Json(response)))
}

/// Check credentials and start a session.
///
/// Returns once the credentials are acknowledged; the profile is loaded
/// separately via `/me`.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let identity = state.accounts.login(&req.email, &req.password).await?;

    tracing::info!(uid = %identity.uid, "User signed in");

    let token = create_jwt(&identity.uid, &identity.email, &state.config.jwt_signing_key)
        .map_err(AppError::Internal)?;

    let response = AuthResponse {
        token: token.clone(),
        uid: identity.uid,
        email: identity.email,
    };

    Ok((jar.add(session_cookie(token)), Json(response)))
}

/// End the session by clearing the session cookie.
///
/// JWTs are stateless; a token presented via the Authorization header stays
/// valid until expiry.
async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (
        jar.remove(removal),
        Json(LogoutResponse { success: true }),
    )
}
