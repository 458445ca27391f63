//! Role-based permission table
//!
//! One static table decides every (role, action) pair. Adding a role or an
//! action is a data change here, not a new check at each call site.

use crate::account::Role;

/// Privileged actions gated by role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewAllAccounts,
    BanUser,
    SetRole,
    DeleteUser,
    RenameSelf,
    GiftVip,
    ExtendedMode,
    UnlockUser,
    ViewAuditLog,
}

impl Action {
    pub const ALL: &'static [Action] = &[
        Action::ViewAllAccounts,
        Action::BanUser,
        Action::SetRole,
        Action::DeleteUser,
        Action::RenameSelf,
        Action::GiftVip,
        Action::ExtendedMode,
        Action::UnlockUser,
        Action::ViewAuditLog,
    ];
}

const VIP_ACTIONS: &[Action] = &[Action::RenameSelf, Action::GiftVip, Action::ExtendedMode];

#[derive(Default)]
pub struct RoleAuthorizer;

impl RoleAuthorizer {
    pub fn new() -> Self {
        Self
    }

    /// Pure predicate; the caller decides the user-visible message
    pub fn can_perform(&self, role: Role, action: Action) -> bool {
        match role {
            Role::Admin => true,
            Role::Vip => VIP_ACTIONS.contains(&action),
            Role::User => false,
        }
    }
}
