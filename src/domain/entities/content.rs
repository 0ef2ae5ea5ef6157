use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

/// The public site's content resources. They all share one record shape
/// and carry no workflow: admins manage them, the public lists them.
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
pub enum ContentKind {
    MemberProfiles,
    Teams,
    Supporters,
    Activities,
    Resources,
    GalleryImages,
    WorkingAreas,
}

/// One content record: a name, an optional description and photo, an
/// active flag and a display order.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Stable reference returned by the file store.
    pub photo: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Input shared by all content create/update operations.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFields {
    pub name: String,
    pub description: Option<String>,
    pub photo: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i32,
}

fn default_true() -> bool {
    true
}
