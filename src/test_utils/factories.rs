//! Test data factories. Each function builds a complete, valid object
//! with sensible defaults; use the closure parameter to override fields.

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::domain::entities::application::{ApplicationStatus, MembershipApplication};
use crate::domain::entities::content::ContentRecord;
use crate::domain::entities::user::{User, UserStatus, UserType};
use crate::domain::entities::voice::{VoiceMessage, VoiceStatus};

/// Create a test user: an active guest with a unique email.
pub fn create_test_user(overrides: impl FnOnce(&mut User)) -> User {
    let id = Uuid::new_v4();
    let mut user = User {
        id,
        name: "Test Person".to_string(),
        email: format!("user-{}@example.org", id.simple()),
        user_type: UserType::Guest,
        status: UserStatus::Active,
        is_active: true,
        membership_number: None,
        phone: None,
        address: None,
        date_of_birth: None,
        gender: None,
        designation: None,
        profile_photo: None,
        created_at: Some(test_datetime()),
        updated_at: Some(test_datetime()),
    };
    overrides(&mut user);
    user
}

/// Create a pending membership application for the given user.
pub fn create_test_application(
    user_id: Uuid,
    overrides: impl FnOnce(&mut MembershipApplication),
) -> MembershipApplication {
    let mut application = MembershipApplication {
        id: Uuid::new_v4(),
        user_id,
        requested_user_type: UserType::Member,
        application_data: serde_json::json!({"motivation": "test"}),
        status: ApplicationStatus::Pending,
        admin_notes: None,
        processed_by: None,
        processed_at: None,
        created_at: Some(test_datetime()),
        updated_at: Some(test_datetime()),
    };
    overrides(&mut application);
    application
}

/// Create a pending voice-of-change message for the given user.
pub fn create_test_voice(
    user_id: Uuid,
    overrides: impl FnOnce(&mut VoiceMessage),
) -> VoiceMessage {
    let mut message = VoiceMessage {
        id: Uuid::new_v4(),
        user_id,
        title: "A voice for change".to_string(),
        message: "Something that matters to the community.".to_string(),
        status: VoiceStatus::Pending,
        admin_notes: None,
        published_online: false,
        published_at: None,
        created_at: Some(test_datetime()),
        updated_at: Some(test_datetime()),
    };
    overrides(&mut message);
    message
}

/// Create an active content record.
pub fn create_test_content(overrides: impl FnOnce(&mut ContentRecord)) -> ContentRecord {
    let mut record = ContentRecord {
        id: Uuid::new_v4(),
        name: "Example record".to_string(),
        description: Some("A description".to_string()),
        photo: None,
        is_active: true,
        display_order: 0,
        created_at: Some(test_datetime()),
        updated_at: Some(test_datetime()),
    };
    overrides(&mut record);
    record
}

/// Returns a consistent test datetime (2024-01-15 12:00:00 UTC).
pub fn test_datetime() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2024-01-15 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_defaults() {
        let user = create_test_user(|_| {});
        assert_eq!(user.user_type, UserType::Guest);
        assert_eq!(user.status, UserStatus::Active);
        assert!(user.is_active);
    }

    #[test]
    fn test_user_overrides() {
        let user = create_test_user(|u| {
            u.user_type = UserType::SystemAdmin;
            u.is_active = false;
        });
        assert_eq!(user.user_type, UserType::SystemAdmin);
        assert!(!user.is_active);
    }

    #[test]
    fn test_unique_emails() {
        let a = create_test_user(|_| {});
        let b = create_test_user(|_| {});
        assert_ne!(a.email, b.email);
    }
}
