// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (set FIRESTORE_EMULATOR_HOST).
//!
//! The emulator provides a clean state for each test run.

use hungry_saver::error::AppError;
use hungry_saver::models::{
    CommunityIssue, DonationStatus, FoodDonation, IssueStatus, RoleDetails, UrgencyLevel,
};
use hungry_saver::services::{AccountService, NewAccount};
use hungry_saver::time_utils::now_rfc3339;

mod common;
use common::{test_db, unique_suffix};

fn volunteer_account(suffix: u64) -> NewAccount {
    NewAccount {
        email: format!("volunteer-{}@example.com", suffix),
        password: "secret123".to_string(),
        display_name: "Test Volunteer".to_string(),
        role: RoleDetails::Volunteer {
            location: "Guntur".to_string(),
            educational_qualification: "Bachelor's Degree".to_string(),
        },
    }
}

fn donor_account(suffix: u64) -> NewAccount {
    NewAccount {
        email: format!("donor-{}@example.com", suffix),
        password: "secret123".to_string(),
        display_name: "Test Donor".to_string(),
        role: RoleDetails::Donor,
    }
}

fn test_donation(donor_id: &str, suffix: u64) -> FoodDonation {
    FoodDonation {
        id: format!("donation-{}", suffix),
        title: "Fresh vegetables from restaurant".to_string(),
        description: "Leftover produce in good condition".to_string(),
        food_type: "Vegetables & Fruits".to_string(),
        quantity: "10 kg".to_string(),
        location: "MG Road, Guntur".to_string(),
        pickup_time: "2026-01-15T18:00:00Z".to_string(),
        donor_name: "Test Donor".to_string(),
        donor_id: donor_id.to_string(),
        status: DonationStatus::Pending,
        volunteer_id: None,
        volunteer_name: None,
        assigned_at: None,
        created_at: now_rfc3339(),
    }
}

fn test_issue(submitter_uid: &str, city: &str, suffix: u64) -> CommunityIssue {
    let now = now_rfc3339();
    CommunityIssue {
        id: format!("issue-{}", suffix),
        student_name: "Priya".to_string(),
        age: 12,
        required_support: "School Fees".to_string(),
        support_details: "Needs support for the coming term".to_string(),
        urgency_level: UrgencyLevel::High,
        contact_number: "9876543210".to_string(),
        alternate_contact: None,
        submitted_by: submitter_uid.to_string(),
        submitter_name: "Test Rep".to_string(),
        submitter_email: "rep@example.com".to_string(),
        city: city.to_string(),
        status: IssueStatus::Pending,
        verified_by: None,
        verifier_name: None,
        verified_at: None,
        created_at: now.clone(),
        updated_at: now,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// REGISTRATION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_register_volunteer_creates_profile_and_roster_entry() {
    require_emulator!();

    let db = test_db().await;
    let accounts = AccountService::new(db.clone());
    let suffix = unique_suffix();

    let profile = accounts.register(volunteer_account(suffix)).await.unwrap();

    // Profile is independently readable with the volunteer role
    let stored = db.get_profile(&profile.uid).await.unwrap().unwrap();
    assert_eq!(stored.role.kind(), "volunteer");
    assert_eq!(stored.display_name, "Test Volunteer");

    // Roster record exists with the matching uid (written in the same
    // transaction as the profile)
    let roster = db.get_volunteer(&profile.uid).await.unwrap().unwrap();
    assert_eq!(roster.uid, profile.uid);
    assert_eq!(roster.location, "Guntur");
    assert!(roster.is_active);
}

#[tokio::test]
async fn test_register_donor_writes_no_roster_entry() {
    require_emulator!();

    let db = test_db().await;
    let accounts = AccountService::new(db.clone());
    let suffix = unique_suffix();

    let profile = accounts.register(donor_account(suffix)).await.unwrap();

    assert!(db.get_volunteer(&profile.uid).await.unwrap().is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_rejected() {
    require_emulator!();

    let db = test_db().await;
    let accounts = AccountService::new(db.clone());
    let suffix = unique_suffix();

    accounts.register(donor_account(suffix)).await.unwrap();

    let err = accounts.register(donor_account(suffix)).await.unwrap_err();
    assert!(matches!(err, AppError::EmailInUse));
}

#[tokio::test]
async fn test_email_lookup_is_case_insensitive() {
    require_emulator!();

    let db = test_db().await;
    let accounts = AccountService::new(db.clone());
    let suffix = unique_suffix();

    let account = donor_account(suffix);
    let email_upper = account.email.to_uppercase();
    accounts.register(account).await.unwrap();

    let identity = db.get_identity(&email_upper).await.unwrap();
    assert!(identity.is_some(), "lookup should normalize email case");
}

// ═══════════════════════════════════════════════════════════════════════════
// LOGIN TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_login_roundtrip() {
    require_emulator!();

    let db = test_db().await;
    let accounts = AccountService::new(db.clone());
    let suffix = unique_suffix();

    let account = donor_account(suffix);
    let email = account.email.clone();
    let registered = accounts.register(account).await.unwrap();

    let identity = accounts.login(&email, "secret123").await.unwrap();
    assert_eq!(identity.uid, registered.uid);
}

#[tokio::test]
async fn test_login_wrong_password_rejected() {
    require_emulator!();

    let db = test_db().await;
    let accounts = AccountService::new(db.clone());
    let suffix = unique_suffix();

    let account = donor_account(suffix);
    let email = account.email.clone();
    accounts.register(account).await.unwrap();

    let err = accounts.login(&email, "wrong-password").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
}

#[tokio::test]
async fn test_login_unknown_account_indistinguishable_from_bad_password() {
    require_emulator!();

    let db = test_db().await;
    let accounts = AccountService::new(db);

    let err = accounts
        .login("nobody@example.com", "whatever")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
}

// ═══════════════════════════════════════════════════════════════════════════
// FOOD DONATION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_created_donation_appears_in_pending_list() {
    require_emulator!();

    let db = test_db().await;
    let suffix = unique_suffix();
    let donation = test_donation("donor-uid", suffix);

    db.create_food_donation(&donation).await.unwrap();

    let pending = db
        .list_food_donations(&[DonationStatus::Pending])
        .await
        .unwrap();
    let found = pending
        .iter()
        .find(|d| d.id == donation.id)
        .expect("created donation should appear in the pending snapshot");
    assert_eq!(found.status, DonationStatus::Pending);
    assert_eq!(found.donor_id, "donor-uid");
}

#[tokio::test]
async fn test_claim_pending_donation() {
    require_emulator!();

    let db = test_db().await;
    let suffix = unique_suffix();
    let donation = test_donation("donor-uid", suffix);
    db.create_food_donation(&donation).await.unwrap();

    let updated = db
        .claim_food_donation(&donation.id, "vol-uid", "Test Volunteer", &now_rfc3339())
        .await
        .unwrap();

    assert_eq!(updated.status, DonationStatus::Assigned);
    assert_eq!(updated.volunteer_id.as_deref(), Some("vol-uid"));
    assert_eq!(updated.volunteer_name.as_deref(), Some("Test Volunteer"));
    assert!(updated.assigned_at.is_some());

    // Stored state matches
    let stored = db.get_food_donation(&donation.id).await.unwrap().unwrap();
    assert_eq!(stored.status, DonationStatus::Assigned);
}

#[tokio::test]
async fn test_double_claim_has_exactly_one_winner() {
    require_emulator!();

    let db = test_db().await;
    let suffix = unique_suffix();
    let donation = test_donation("donor-uid", suffix);
    db.create_food_donation(&donation).await.unwrap();

    let now = now_rfc3339();
    let (first, second) = tokio::join!(
        db.claim_food_donation(&donation.id, "vol-a", "Volunteer A", &now),
        db.claim_food_donation(&donation.id, "vol-b", "Volunteer B", &now),
    );

    let winners = [&first, &second]
        .iter()
        .filter(|r| r.is_ok())
        .count();
    assert_eq!(winners, 1, "exactly one claim should win");

    let loser = if first.is_ok() { second } else { first };
    assert!(matches!(loser.unwrap_err(), AppError::AlreadyAssigned));

    // Final state carries exactly one volunteer attribution
    let stored = db.get_food_donation(&donation.id).await.unwrap().unwrap();
    assert_eq!(stored.status, DonationStatus::Assigned);
    assert!(
        stored.volunteer_id.as_deref() == Some("vol-a")
            || stored.volunteer_id.as_deref() == Some("vol-b")
    );
}

#[tokio::test]
async fn test_claim_missing_donation_not_found() {
    require_emulator!();

    let db = test_db().await;

    let err = db
        .claim_food_donation("no-such-id", "vol-uid", "Volunteer", &now_rfc3339())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// ═══════════════════════════════════════════════════════════════════════════
// COMMUNITY ISSUE TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_community_issue_verification_flow() {
    require_emulator!();

    let db = test_db().await;
    let accounts = AccountService::new(db.clone());
    let suffix = unique_suffix();

    // Register a community-support representative in Guntur
    let rep = accounts
        .register(NewAccount {
            email: format!("rep-{}@example.com", suffix),
            password: "secret123".to_string(),
            display_name: "Test Rep".to_string(),
            role: RoleDetails::CommunitySupport {
                city: "Guntur".to_string(),
            },
        })
        .await
        .unwrap();

    // Submit an issue for their city
    let issue = test_issue(&rep.uid, "Guntur", suffix);
    db.create_community_issue(&issue).await.unwrap();

    // Volunteer verifies it: pending → verified
    let verified = db
        .verify_community_issue(&issue.id, "vol-uid", "Test Volunteer", &now_rfc3339())
        .await
        .unwrap();
    assert_eq!(verified.status, IssueStatus::Verified);
    assert_eq!(verified.verified_by.as_deref(), Some("vol-uid"));
    assert!(verified.verified_at.is_some());

    // The donor-facing verified query includes the record
    let verified_list = db
        .list_community_issues(&[IssueStatus::Verified])
        .await
        .unwrap();
    let found = verified_list
        .iter()
        .find(|i| i.id == issue.id)
        .expect("verified issue should appear in the donor-facing query");
    assert_eq!(found.city, "Guntur");
}

#[tokio::test]
async fn test_second_verification_rejected() {
    require_emulator!();

    let db = test_db().await;
    let suffix = unique_suffix();

    let issue = test_issue("rep-uid", "Guntur", suffix);
    db.create_community_issue(&issue).await.unwrap();

    db.verify_community_issue(&issue.id, "vol-a", "Volunteer A", &now_rfc3339())
        .await
        .unwrap();

    let err = db
        .verify_community_issue(&issue.id, "vol-b", "Volunteer B", &now_rfc3339())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PreconditionFailed(_)));

    // First verifier's attribution is untouched
    let stored = db.get_community_issue(&issue.id).await.unwrap().unwrap();
    assert_eq!(stored.verified_by.as_deref(), Some("vol-a"));
}

#[tokio::test]
async fn test_pending_filter_excludes_verified_issues() {
    require_emulator!();

    let db = test_db().await;
    let suffix = unique_suffix();

    let issue = test_issue("rep-uid", "Guntur", suffix);
    db.create_community_issue(&issue).await.unwrap();
    db.verify_community_issue(&issue.id, "vol-uid", "Volunteer", &now_rfc3339())
        .await
        .unwrap();

    let pending = db
        .list_community_issues(&[IssueStatus::Pending])
        .await
        .unwrap();
    assert!(pending.iter().all(|i| i.id != issue.id));
}
