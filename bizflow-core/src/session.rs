//! Read-only view of the session, handed to renderers once per render.

use crate::identity::{Role, SessionId, User};
use crate::tenant::Tenant;

/// Borrowed snapshot of the current authentication state.
///
/// `user == None` means "unauthenticated, show login". The selected tenant
/// is only ever set while a user is signed in.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Session<'a> {
    pub id: Option<SessionId>,
    pub user: Option<&'a User>,
    pub current_tenant: Option<&'a Tenant>,
    pub tenants: &'a [Tenant],
}

impl<'a> Session<'a> {
    /// A signed-out session over `tenants`.
    pub fn anonymous(tenants: &'a [Tenant]) -> Self {
        Self {
            id: None,
            user: None,
            current_tenant: None,
            tenants,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.map(User::role)
    }
}
