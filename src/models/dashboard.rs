// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role-dispatched dashboard selection and the impact-module grid.

use serde::Serialize;

/// Dashboard variant selected for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DashboardView {
    Volunteer,
    Community,
    General,
}

/// Select the dashboard variant for a role name.
///
/// Total over arbitrary strings: anything that is not a recognized
/// role-specific variant (including empty or unknown values) falls back to
/// the general view.
pub fn dashboard_for_role(role: &str) -> DashboardView {
    match role {
        "volunteer" => DashboardView::Volunteer,
        "community-support" => DashboardView::Community,
        _ => DashboardView::General,
    }
}

/// One card in the general dashboard's module grid.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleCard {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub path: &'static str,
    pub allowed_roles: &'static [&'static str],
    /// Placeholder modules have no feature routes behind them
    pub under_development: bool,
}

/// The six impact modules, in display order.
pub const MODULES: &[ModuleCard] = &[
    ModuleCard {
        id: "food-donation",
        title: "Annamitra Seva",
        subtitle: "Food Donation",
        description: "Connect donors with volunteers to distribute surplus food to those in need",
        path: "/food-donation",
        allowed_roles: &["donor", "admin"],
        under_development: false,
    },
    ModuleCard {
        id: "education-aid",
        title: "Vidya Jyothi",
        subtitle: "Education Aid",
        description: "Sponsor students and provide educational resources for underprivileged children",
        path: "/education-aid",
        allowed_roles: &["donor", "admin"],
        under_development: false,
    },
    ModuleCard {
        id: "ngo-support",
        title: "Suraksha Setu",
        subtitle: "NGO Support",
        description: "Support NGOs with resources and connect volunteers for various causes",
        path: "/ngo-support",
        allowed_roles: &["donor", "admin"],
        under_development: true,
    },
    ModuleCard {
        id: "waste-donation",
        title: "PunarAsha",
        subtitle: "Recyclable Waste",
        description: "Donate recyclable items and organize collection events for sustainability",
        path: "/waste-donation",
        allowed_roles: &["donor", "admin"],
        under_development: true,
    },
    ModuleCard {
        id: "emergency-rescue",
        title: "Raksha Jyothi",
        subtitle: "Emergency Rescue",
        description: "Report emergencies and coordinate rescue operations for humans and animals",
        path: "/emergency-rescue",
        allowed_roles: &["donor", "admin"],
        under_development: true,
    },
    ModuleCard {
        id: "shelter",
        title: "Jyothi Nilayam",
        subtitle: "Shelter Management",
        description: "Manage shelters for humans and animals, track residents and resources",
        path: "/shelter",
        allowed_roles: &["donor", "admin"],
        under_development: true,
    },
];

/// Look up a module card by its navigation path.
pub fn module_by_path(path: &str) -> Option<&'static ModuleCard> {
    MODULES.iter().find(|m| m.path == path)
}

/// Filter the module grid by role.
pub fn modules_for_role(role: &str) -> Vec<&'static ModuleCard> {
    MODULES
        .iter()
        .filter(|m| m.allowed_roles.contains(&role))
        .collect()
}
