//! The single place role and permission rules live. Handlers and use
//! cases call `User::can` (or one of the named predicates) instead of
//! re-deriving role checks at each call site.

use std::str::FromStr;

use crate::domain::entities::user::{User, UserStatus, UserType};
use crate::domain::entities::voice::VoiceMessage;

/// An action a caller may request. Checked through the one entry point,
/// `User::can`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ApplyForMembership,
    ManageContent,
    SubmitVoiceMessages,
    ApproveApplications,
    ApproveVoiceMessages,
    ManageUsers,
    ModifySystemSettings,
}

const ADMIN_TYPES: &[UserType] = &[UserType::SystemAdmin, UserType::SystemManager];
const MEMBER_TYPES: &[UserType] = &[
    UserType::Member,
    UserType::Volunteer,
    UserType::Intern,
    UserType::Employee,
];
const GUEST_TYPES: &[UserType] = &[UserType::Guest];

const SINGLETONS: &[&[UserType]] = &[
    &[UserType::Guest],
    &[UserType::Member],
    &[UserType::Volunteer],
    &[UserType::Intern],
    &[UserType::Employee],
    &[UserType::SystemAdmin],
    &[UserType::SystemManager],
];

/// Translate a role name into the set of `user_type`s it covers.
///
/// The deprecated three-valued `role` column ("admin"/"member"/"user")
/// still appears in old data and in callers; its mapping is fixed and
/// must not change. The seven `user_type` names are also accepted
/// directly and map to themselves. Anything else grants nothing.
pub fn allowed_user_types(name: &str) -> &'static [UserType] {
    let normalized = name.trim().to_lowercase().replace([' ', '-'], "_");
    match normalized.as_str() {
        "admin" => ADMIN_TYPES,
        "member" => MEMBER_TYPES,
        "user" => GUEST_TYPES,
        other => match UserType::from_str(other) {
            Ok(t) => SINGLETONS[t as usize],
            Err(_) => &[],
        },
    }
}

/// Whether `user_type` is covered by any of the given role names
/// (legacy or literal).
pub fn matches_any_role(user_type: UserType, names: &[&str]) -> bool {
    names
        .iter()
        .any(|name| allowed_user_types(name).contains(&user_type))
}

impl User {
    /// System Admin and System Manager are the two administrative types.
    pub fn is_admin(&self) -> bool {
        ADMIN_TYPES.contains(&self.user_type)
    }

    /// A user counts as active only when both the status and the flag say so.
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active && self.is_active
    }

    /// Types that carry a membership number once approved.
    pub fn has_membership_number(&self) -> bool {
        MEMBER_TYPES.contains(&self.user_type)
    }

    /// Owners may edit or delete their message while it is pending or
    /// rejected; approval freezes it.
    pub fn can_edit_voice(&self, message: &VoiceMessage) -> bool {
        self.id == message.user_id && message.status.is_owner_editable()
    }

    /// The capability table. Pure; no lookups, no side effects.
    pub fn can(&self, capability: Capability) -> bool {
        match capability {
            Capability::ApplyForMembership => {
                self.user_type == UserType::Guest && self.status == UserStatus::Active
            }
            Capability::ManageContent => {
                self.is_admin()
                    || matches!(self.user_type, UserType::Member | UserType::Employee)
            }
            Capability::SubmitVoiceMessages => self.is_active(),
            Capability::ApproveApplications
            | Capability::ApproveVoiceMessages
            | Capability::ManageUsers => self.is_admin(),
            Capability::ModifySystemSettings => self.user_type == UserType::SystemAdmin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::voice::VoiceStatus;
    use crate::test_utils::{create_test_user, create_test_voice};
    use strum::IntoEnumIterator;

    #[test]
    fn test_is_admin_iff_system_type() {
        for t in UserType::iter() {
            let user = create_test_user(|u| u.user_type = t);
            let expected = matches!(t, UserType::SystemAdmin | UserType::SystemManager);
            assert_eq!(user.is_admin(), expected, "user_type {t}");
        }
    }

    #[test]
    fn test_legacy_admin_mapping() {
        assert_eq!(
            allowed_user_types("admin"),
            &[UserType::SystemAdmin, UserType::SystemManager]
        );
    }

    #[test]
    fn test_legacy_member_mapping() {
        assert_eq!(
            allowed_user_types("member"),
            &[
                UserType::Member,
                UserType::Volunteer,
                UserType::Intern,
                UserType::Employee
            ]
        );
    }

    #[test]
    fn test_legacy_user_mapping() {
        assert_eq!(allowed_user_types("user"), &[UserType::Guest]);
    }

    #[test]
    fn test_literal_names_map_to_themselves() {
        for t in UserType::iter() {
            // Legacy "member" shadows the literal Member name on purpose;
            // the legacy mapping wins for backward compatibility.
            if t == UserType::Member {
                continue;
            }
            assert_eq!(allowed_user_types(t.as_ref()), &[t], "literal {t}");
            assert_eq!(allowed_user_types(t.label()), &[t], "label {}", t.label());
        }
    }

    #[test]
    fn test_unknown_role_grants_nothing() {
        assert!(allowed_user_types("").is_empty());
        assert!(allowed_user_types("superuser").is_empty());
        assert!(allowed_user_types("root").is_empty());
    }

    #[test]
    fn test_matches_any_role() {
        assert!(matches_any_role(UserType::SystemManager, &["admin"]));
        assert!(matches_any_role(UserType::Intern, &["member"]));
        assert!(matches_any_role(UserType::Guest, &["user", "admin"]));
        assert!(!matches_any_role(UserType::Guest, &["member", "admin"]));
        assert!(matches_any_role(UserType::Volunteer, &["volunteer"]));
    }

    #[test]
    fn test_is_active_requires_both() {
        let user = create_test_user(|_| {});
        assert!(user.is_active());

        let inactive_flag = create_test_user(|u| u.is_active = false);
        assert!(!inactive_flag.is_active());

        let pending = create_test_user(|u| u.status = UserStatus::Pending);
        assert!(!pending.is_active());
    }

    #[test]
    fn test_has_membership_number_types() {
        for t in UserType::iter() {
            let user = create_test_user(|u| u.user_type = t);
            let expected = matches!(
                t,
                UserType::Member | UserType::Volunteer | UserType::Intern | UserType::Employee
            );
            assert_eq!(user.has_membership_number(), expected, "user_type {t}");
        }
    }

    #[test]
    fn test_apply_for_membership_needs_active_guest() {
        let guest = create_test_user(|_| {});
        assert!(guest.can(Capability::ApplyForMembership));

        let pending_guest = create_test_user(|u| u.status = UserStatus::Pending);
        assert!(!pending_guest.can(Capability::ApplyForMembership));

        let member = create_test_user(|u| u.user_type = UserType::Member);
        assert!(!member.can(Capability::ApplyForMembership));
    }

    #[test]
    fn test_manage_content_types() {
        for t in UserType::iter() {
            let user = create_test_user(|u| u.user_type = t);
            let expected = matches!(
                t,
                UserType::Member
                    | UserType::Employee
                    | UserType::SystemAdmin
                    | UserType::SystemManager
            );
            assert_eq!(user.can(Capability::ManageContent), expected, "user_type {t}");
        }
    }

    #[test]
    fn test_admin_only_capabilities() {
        for cap in [
            Capability::ApproveApplications,
            Capability::ApproveVoiceMessages,
            Capability::ManageUsers,
        ] {
            for t in UserType::iter() {
                let user = create_test_user(|u| u.user_type = t);
                let expected = matches!(t, UserType::SystemAdmin | UserType::SystemManager);
                assert_eq!(user.can(cap), expected, "{cap:?} for {t}");
            }
        }
    }

    #[test]
    fn test_system_settings_is_system_admin_only() {
        let admin = create_test_user(|u| u.user_type = UserType::SystemAdmin);
        assert!(admin.can(Capability::ModifySystemSettings));

        let manager = create_test_user(|u| u.user_type = UserType::SystemManager);
        assert!(!manager.can(Capability::ModifySystemSettings));
    }

    #[test]
    fn test_submit_voice_needs_active_account() {
        let member = create_test_user(|u| u.user_type = UserType::Member);
        assert!(member.can(Capability::SubmitVoiceMessages));

        let suspended = create_test_user(|u| {
            u.user_type = UserType::Member;
            u.is_active = false;
        });
        assert!(!suspended.can(Capability::SubmitVoiceMessages));
    }

    #[test]
    fn test_can_edit_voice_ownership_and_status() {
        let owner = create_test_user(|_| {});
        let stranger = create_test_user(|_| {});

        for (status, editable) in [
            (VoiceStatus::Pending, true),
            (VoiceStatus::Rejected, true),
            (VoiceStatus::Approved, false),
        ] {
            let msg = create_test_voice(owner.id, |m| m.status = status);
            assert_eq!(owner.can_edit_voice(&msg), editable, "{status}");
            assert!(!stranger.can_edit_voice(&msg), "{status} stranger");
        }
    }
}
