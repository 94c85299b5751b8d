//! User identity, profile, and volunteer roster models.

use serde::{Deserialize, Serialize};

/// Login credentials, stored separately from the profile.
///
/// Keyed by percent-encoded lowercased email, so email uniqueness is a
/// document-id property rather than a query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Server-generated user id (document key for the profile)
    pub uid: String,
    /// Email address as entered at registration
    pub email: String,
    /// Argon2 hash in PHC string format
    pub password_hash: String,
    /// When the account was created (ISO 8601)
    pub created_at: String,
}

/// Application-level user record keyed by uid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    /// Role plus the fields that exist only for that role
    #[serde(flatten)]
    pub role: RoleDetails,
}

/// Role with its role-specific required fields.
///
/// Stored flattened into the profile document under a `role` tag, so a
/// donor document physically cannot carry a volunteer's fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "kebab-case")]
pub enum RoleDetails {
    Donor,
    Volunteer {
        location: String,
        educational_qualification: String,
    },
    Admin,
    CommunitySupport {
        city: String,
    },
}

impl RoleDetails {
    /// Wire name of the role, as used in module `allowed_roles` sets.
    pub fn kind(&self) -> &'static str {
        match self {
            RoleDetails::Donor => "donor",
            RoleDetails::Volunteer { .. } => "volunteer",
            RoleDetails::Admin => "admin",
            RoleDetails::CommunitySupport { .. } => "community-support",
        }
    }
}

/// Denormalized volunteer roster entry.
///
/// Written in the same transaction as the profile when a volunteer
/// registers, so the two documents cannot diverge at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolunteerRecord {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub location: String,
    pub educational_qualification: String,
    pub created_at: String,
    pub is_active: bool,
}
