use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Moderation status of a voice-of-change message. No state is fully
/// terminal: editing a pending or rejected message moves it back to
/// pending, and an approved message can be unpublished without leaving
/// the approved status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[derive(Default)]
pub enum VoiceStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl VoiceStatus {
    /// Whether the owner may still edit or delete the message. An
    /// admin's approve/reject carries no status precondition; this
    /// guard is the owner's side of the machine.
    pub fn is_owner_editable(&self) -> bool {
        matches!(self, VoiceStatus::Pending | VoiceStatus::Rejected)
    }
}

/// A community message subject to admin moderation before public display.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceMessage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub status: VoiceStatus,
    pub admin_notes: Option<String>,
    pub published_online: bool,
    pub published_at: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl VoiceMessage {
    /// The public listing predicate: approved, switched online, and the
    /// publication timestamp has passed.
    pub fn is_publicly_visible(&self, now: NaiveDateTime) -> bool {
        self.status == VoiceStatus::Approved
            && self.published_online
            && self.published_at.is_some_and(|at| at <= now)
    }
}
