// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Hungry Saver: donation-coordination platform backend
//!
//! This crate provides the backend API connecting donors, volunteers, and
//! community-support representatives around food donations and
//! education-aid sponsorship requests.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{AccountService, ChangeBus};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub accounts: AccountService,
    pub changes: ChangeBus,
}
