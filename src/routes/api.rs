// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session and dashboard routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::dashboard::{dashboard_for_role, module_by_path, modules_for_role, ModuleCard};
use crate::models::{DashboardView, Profile};
use crate::AppState;
use axum::{
    extract::State,
    http::Uri,
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Routes requiring authentication; the auth middleware is applied in
/// routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(get_me))
        .route("/dashboard", get(get_dashboard))
        // Placeholder modules: descriptor only, no feature routes behind them
        .route("/ngo-support", get(get_module_info))
        .route("/waste-donation", get(get_module_info))
        .route("/emergency-rescue", get(get_module_info))
        .route("/shelter", get(get_module_info))
}

// ─── Current Session ─────────────────────────────────────────

/// Unified current-session view.
#[derive(Serialize)]
pub struct MeResponse {
    pub uid: String,
    pub email: String,
    /// `null` while the profile has not loaded; clients treat that as
    /// still-loading, not as a missing role.
    pub profile: Option<Profile>,
}

/// Get the current session: identity plus profile, if loaded.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let session = state.accounts.current_session(&user.uid, &user.email).await;

    Ok(Json(MeResponse {
        uid: session.uid,
        email: session.email,
        profile: session.profile,
    }))
}

// ─── Role-Dispatched Dashboard ───────────────────────────────

/// Dashboard payload: the selected variant plus the role-filtered module
/// grid for the general view.
#[derive(Serialize)]
pub struct DashboardResponse {
    pub view: DashboardView,
    /// Profile details backing the variant (volunteer location, city, ...)
    pub profile: Option<Profile>,
    pub modules: Vec<&'static ModuleCard>,
}

/// Select the dashboard variant for the authenticated user.
///
/// A session whose profile has not loaded gets the general view with the
/// default donor module grid, mirroring the role fallback on the client.
async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DashboardResponse>> {
    let session = state.accounts.current_session(&user.uid, &user.email).await;

    let role = session
        .profile
        .as_ref()
        .map(|p| p.role.kind())
        .unwrap_or("donor");

    tracing::debug!(uid = %user.uid, role, "Dispatching dashboard");

    Ok(Json(DashboardResponse {
        view: dashboard_for_role(role),
        profile: session.profile,
        modules: modules_for_role(role),
    }))
}

// ─── Placeholder Modules ─────────────────────────────────────

#[derive(Serialize)]
pub struct ModuleInfoResponse {
    pub module: &'static ModuleCard,
}

/// Return the module descriptor for a placeholder module path.
async fn get_module_info(uri: Uri) -> Result<Json<ModuleInfoResponse>> {
    let module = module_by_path(uri.path())
        .ok_or_else(|| AppError::NotFound(format!("No module at {}", uri.path())))?;

    Ok(Json(ModuleInfoResponse { module }))
}
