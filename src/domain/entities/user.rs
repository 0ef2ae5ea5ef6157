use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

/// Authoritative role enumeration. The deprecated three-valued `role`
/// column is translated into sets of these via `domain::permissions`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[derive(Default)]
pub enum UserType {
    #[default]
    Guest,
    Member,
    Volunteer,
    Intern,
    Employee,
    SystemAdmin,
    SystemManager,
}

impl UserType {
    /// Human-readable label as shown in the admin UI.
    pub fn label(&self) -> &'static str {
        match self {
            UserType::Guest => "Guest",
            UserType::Member => "Member",
            UserType::Volunteer => "Volunteer",
            UserType::Intern => "Intern",
            UserType::Employee => "Employee",
            UserType::SystemAdmin => "System Admin",
            UserType::SystemManager => "System Manager",
        }
    }

    /// Types a guest may request through a membership application.
    pub fn is_applicable(&self) -> bool {
        matches!(
            self,
            UserType::Member | UserType::Volunteer | UserType::Intern
        )
    }
}

/// Account status, independent of `is_active`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[derive(Default)]
pub enum UserStatus {
    Pending,
    #[default]
    Active,
    Inactive,
    Rejected,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub user_type: UserType,
    pub status: UserStatus,
    pub is_active: bool,
    pub membership_number: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub designation: Option<String>,
    pub profile_photo: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}
