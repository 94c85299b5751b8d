// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Food donation model (Annamitra Seva module).

use serde::{Deserialize, Serialize};

/// A food donation posted by a donor, stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodDonation {
    /// Server-assigned id (also used as document ID)
    pub id: String,
    /// Short headline, e.g. "Fresh vegetables from restaurant"
    pub title: String,
    pub description: String,
    /// Category, e.g. "Cooked Food"
    pub food_type: String,
    /// Free-form amount, e.g. "10 kg" or "50 servings"
    pub quantity: String,
    /// Pickup address
    pub location: String,
    /// Preferred pickup time (ISO 8601)
    pub pickup_time: String,
    /// Denormalized author attribution
    pub donor_name: String,
    pub donor_id: String,
    pub status: DonationStatus,
    /// Set when a volunteer claims the donation
    pub volunteer_id: Option<String>,
    pub volunteer_name: Option<String>,
    pub assigned_at: Option<String>,
    pub created_at: String,
}

/// Donation lifecycle.
///
/// `Picked` and `Delivered` are declared in the schema but no code path
/// transitions into them; stored records carrying them still decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Pending,
    Assigned,
    Picked,
    Delivered,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "pending",
            DonationStatus::Assigned => "assigned",
            DonationStatus::Picked => "picked",
            DonationStatus::Delivered => "delivered",
        }
    }

    /// Parse a status filter value from a query parameter.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(DonationStatus::Pending),
            "assigned" => Some(DonationStatus::Assigned),
            "picked" => Some(DonationStatus::Picked),
            "delivered" => Some(DonationStatus::Delivered),
            _ => None,
        }
    }
}
