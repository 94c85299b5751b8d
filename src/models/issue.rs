//! Community issue model (Vidya Jyothi education-aid requests).

use serde::{Deserialize, Serialize};

/// An educational-support request raised by a community-support
/// representative, stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityIssue {
    /// Server-assigned id (also used as document ID)
    pub id: String,
    pub student_name: String,
    pub age: u32,
    /// Support category, e.g. "School Fees"
    pub required_support: String,
    pub support_details: String,
    pub urgency_level: UrgencyLevel,
    pub contact_number: String,
    pub alternate_contact: Option<String>,
    /// Denormalized submitter attribution
    pub submitted_by: String,
    pub submitter_name: String,
    pub submitter_email: String,
    /// City taken from the submitting representative's profile
    pub city: String,
    pub status: IssueStatus,
    /// Set when a volunteer verifies the request
    pub verified_by: Option<String>,
    pub verifier_name: Option<String>,
    pub verified_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Issue lifecycle.
///
/// `InProgress` and `Resolved` are declared in the schema but no code path
/// transitions into them; stored records carrying them still decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueStatus {
    Pending,
    Verified,
    InProgress,
    Resolved,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Pending => "pending",
            IssueStatus::Verified => "verified",
            IssueStatus::InProgress => "in-progress",
            IssueStatus::Resolved => "resolved",
        }
    }

    /// Parse a status filter value from a query parameter.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(IssueStatus::Pending),
            "verified" => Some(IssueStatus::Verified),
            "in-progress" => Some(IssueStatus::InProgress),
            "resolved" => Some(IssueStatus::Resolved),
            _ => None,
        }
    }
}

/// How urgently the request needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
    Urgent,
}
