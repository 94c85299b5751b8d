// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod dashboard;
pub mod donation;
pub mod issue;
pub mod profile;

pub use dashboard::{dashboard_for_role, DashboardView, ModuleCard, MODULES};
pub use donation::{DonationStatus, FoodDonation};
pub use issue::{CommunityIssue, IssueStatus, UrgencyLevel};
pub use profile::{Identity, Profile, RoleDetails, VolunteerRecord};
