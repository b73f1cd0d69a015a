//! Session/identity store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use bizflow_core::{
    EventListener, EventPat, ListenerId, NewTenant, Role, Session, SessionEvent, SessionEventHub, SessionId, Tenant,
    TenantDirectory, TenantId, User,
};
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult};
use crate::options::{AuthOptions, ProviderKind, DEFAULT_LOGIN_ERROR};
use crate::provider::{Credentials, DemoDirectory, IdentityProvider, LocalDirectory, QuickLogin};

#[derive(Debug, Clone)]
struct ActiveSession {
    id: SessionId,
    user: User,
    tenant: Option<TenantId>,
    authenticated_at: DateTime<Utc>,
}

/// Owns the authentication state and the tenant selection.
///
/// Every operation is a single synchronous step on `&mut self`; a rejected
/// operation leaves the state exactly as it was.
pub struct SessionStore {
    provider: Arc<dyn IdentityProvider>,
    tenants: TenantDirectory,
    active: Option<ActiveSession>,
    events: SessionEventHub,
    quick_login: bool,
    rejection: String,
}

impl SessionStore {
    pub fn new(provider: Arc<dyn IdentityProvider>, tenants: TenantDirectory) -> Self {
        Self {
            provider,
            tenants,
            active: None,
            events: SessionEventHub::new(),
            quick_login: true,
            rejection: DEFAULT_LOGIN_ERROR.to_string(),
        }
    }

    /// Demo provider over the seeded tenants.
    pub fn demo() -> Self {
        Self::new(Arc::new(DemoDirectory::new()), TenantDirectory::seeded())
    }

    /// Build a store from options. A `Local` provider uses `local` when
    /// given, otherwise a directory built from `options.local`; its
    /// configured message is used for rejected logins.
    pub fn from_options(options: &AuthOptions, local: Option<LocalDirectory>) -> anyhow::Result<Self> {
        let mut rejection = DEFAULT_LOGIN_ERROR.to_string();
        let provider: Arc<dyn IdentityProvider> = match options.provider {
            ProviderKind::Demo => Arc::new(DemoDirectory::new()),
            ProviderKind::Local => {
                rejection = options.local.error_message.clone();
                match local {
                    Some(local) => Arc::new(local),
                    None => Arc::new(LocalDirectory::from_options(options.local.clone())?),
                }
            }
        };
        let tenants = if options.seed_tenants {
            TenantDirectory::seeded()
        } else {
            TenantDirectory::new()
        };
        let mut store = Self::new(provider, tenants);
        store.quick_login = options.quick_login;
        store.rejection = rejection;
        Ok(store)
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    // ---- commands ----

    /// Sign in. Unknown credentials leave the session untouched.
    ///
    /// On success the previous session (if any) is replaced and the selected
    /// tenant is reset: the first tenant for the platform admin, the
    /// affiliated tenant for everyone else.
    pub fn login(&mut self, email: &str, password: &str) -> SessionResult<&User> {
        let credentials = Credentials::new(email, password);
        let user = match self.provider.resolve(&credentials)? {
            Some(user) => user,
            None => {
                warn!(email, provider = self.provider.name(), "login rejected: invalid credentials");
                return Err(SessionError::InvalidCredentials(self.rejection.clone()));
            }
        };

        let tenant = self.initial_tenant(&user)?;
        let session = ActiveSession {
            id: SessionId::new(),
            user,
            tenant,
            authenticated_at: Utc::now(),
        };

        info!(
            session_id = %session.id,
            user_id = %session.user.id(),
            role = %session.user.role(),
            tenant = ?session.tenant.as_ref().map(TenantId::as_str),
            "login succeeded"
        );

        let event = SessionEvent::LoggedIn {
            session_id: session.id,
            user_id: session.user.id().clone(),
            role: session.user.role(),
            tenant_id: session.tenant.clone(),
        };
        let session = self.active.insert(session);
        self.events.emit(&event);

        Ok(&session.user)
    }

    fn initial_tenant(&self, user: &User) -> SessionResult<Option<TenantId>> {
        if user.role().is_platform_admin() {
            return Ok(self.tenants.first().map(|t| t.id.clone()));
        }
        let affiliation = user
            .tenant_id()
            .ok_or_else(|| SessionError::Unaffiliated(user.id().clone()))?;
        if !self.tenants.contains(affiliation) {
            warn!(user_id = %user.id(), tenant = %affiliation, "login rejected: affiliated tenant missing");
            return Err(SessionError::TenantNotFound(affiliation.clone()));
        }
        Ok(Some(affiliation.clone()))
    }

    /// Sign out. Returns whether a user was signed in.
    pub fn logout(&mut self) -> bool {
        match self.active.take() {
            Some(session) => {
                info!(session_id = %session.id, user_id = %session.user.id(), "logout");
                self.events.emit(&SessionEvent::LoggedOut {
                    session_id: session.id,
                    user_id: session.user.id().clone(),
                });
                true
            }
            None => {
                debug!("logout without an active session");
                false
            }
        }
    }

    /// Change the selected tenant. Platform admin only.
    pub fn switch_tenant(&mut self, tenant_id: &TenantId) -> SessionResult<&Tenant> {
        let session = self.active.as_ref().ok_or(SessionError::NotAuthenticated)?;
        let role = session.user.role();
        if !role.is_platform_admin() {
            debug!(session_id = %session.id, %role, "switch tenant denied");
            return Err(SessionError::unauthorized(role, "switch tenant"));
        }
        if !self.tenants.contains(tenant_id) {
            debug!(session_id = %session.id, tenant = %tenant_id, "switch tenant: unknown tenant");
            return Err(SessionError::TenantNotFound(tenant_id.clone()));
        }

        let session = self.active.as_mut().ok_or(SessionError::NotAuthenticated)?;
        let from = session.tenant.replace(tenant_id.clone());
        info!(session_id = %session.id, from = ?from.as_ref().map(TenantId::as_str), to = %tenant_id, "tenant switched");

        let event = SessionEvent::TenantSwitched {
            session_id: session.id,
            from,
            to: tenant_id.clone(),
        };
        self.events.emit(&event);

        self.tenants
            .get(tenant_id)
            .ok_or_else(|| SessionError::TenantNotFound(tenant_id.clone()))
    }

    /// Append a tenant. Platform admin only.
    pub fn add_tenant(&mut self, new_tenant: NewTenant) -> SessionResult<Tenant> {
        let session = self.active.as_ref().ok_or(SessionError::NotAuthenticated)?;
        let role = session.user.role();
        if !role.is_platform_admin() {
            debug!(session_id = %session.id, %role, "add tenant denied");
            return Err(SessionError::unauthorized(role, "add tenant"));
        }
        new_tenant.validate().map_err(SessionError::InvalidTenant)?;

        let session_id = session.id;
        let tenant = self.tenants.insert(new_tenant);
        info!(
            %session_id,
            tenant = %tenant.id,
            name = %tenant.name,
            business_type = tenant.business_type.as_str(),
            "tenant added"
        );
        self.events.emit(&SessionEvent::TenantAdded {
            session_id,
            tenant: tenant.clone(),
        });
        Ok(tenant)
    }

    // ---- queries ----

    pub fn session(&self) -> Session<'_> {
        Session {
            id: self.session_id(),
            user: self.user(),
            current_tenant: self.current_tenant(),
            tenants: self.tenants.as_slice(),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.active.as_ref().map(|s| &s.user)
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(User::role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.active.is_some()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.active.as_ref().map(|s| s.id)
    }

    pub fn authenticated_at(&self) -> Option<DateTime<Utc>> {
        self.active.as_ref().map(|s| s.authenticated_at)
    }

    pub fn current_tenant(&self) -> Option<&Tenant> {
        let id = self.active.as_ref()?.tenant.as_ref()?;
        self.tenants.get(id)
    }

    pub fn tenants(&self) -> &[Tenant] {
        self.tenants.as_slice()
    }

    pub fn tenant(&self, id: &TenantId) -> Option<&Tenant> {
        self.tenants.get(id)
    }

    pub fn active_tenant_count(&self) -> usize {
        self.tenants.active_count()
    }

    /// Demo accounts for the login screen; empty when disabled.
    pub fn quick_logins(&self) -> Vec<QuickLogin> {
        if !self.quick_login {
            return Vec::new();
        }
        self.provider.quick_logins()
    }

    // ---- events ----

    pub fn on(&mut self, pattern: EventPat, listener: EventListener) -> ListenerId {
        self.events.on(pattern, listener)
    }

    pub fn once(&mut self, pattern: EventPat, listener: EventListener) -> ListenerId {
        self.events.once(pattern, listener)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.events.off(id)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("provider", &self.provider.name())
            .field("tenants", &self.tenants.len())
            .field("active", &self.active)
            .field("events", &self.events)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::LocalOptions;
    use bizflow_core::{BusinessType, SessionEventKind};
    use std::sync::Mutex;
    use tracing_test::traced_test;

    fn admin_store() -> SessionStore {
        let mut store = SessionStore::demo();
        store.login("admin@saas.com", "x").unwrap();
        store
    }

    #[test]
    fn starts_signed_out() {
        let store = SessionStore::demo();
        assert!(!store.is_authenticated());
        assert!(store.current_tenant().is_none());
        assert_eq!(store.tenants().len(), 3);
        assert_eq!(store.provider_name(), "demo");
    }

    #[test]
    fn unknown_email_keeps_previous_user() {
        let mut store = SessionStore::demo();
        store.login("owner@hotel.com", "pw").unwrap();
        let before = store.session_id();

        let err = store.login("intruder@evil.com", "pw").unwrap_err();
        assert!(matches!(err, SessionError::InvalidCredentials(_)));
        assert_eq!(err.to_string(), "Invalid login");
        assert_eq!(store.role(), Some(Role::BusinessOwner));
        assert_eq!(store.session_id(), before);
    }

    #[test]
    fn relogin_mints_new_session_and_resets_tenant() {
        let mut store = admin_store();
        let first = store.session_id().unwrap();
        store.switch_tenant(&TenantId::from("3")).unwrap();

        store.login("admin@saas.com", "x").unwrap();
        assert_ne!(store.session_id(), Some(first));
        assert_eq!(store.current_tenant().map(|t| t.id.as_str()), Some("1"));
        assert!(store.authenticated_at().is_some());
    }

    #[test]
    fn non_admin_cannot_switch_or_add() {
        let mut store = SessionStore::demo();
        store.login("cashier@hotel.com", "x").unwrap();

        let err = store.switch_tenant(&TenantId::from("2")).unwrap_err();
        assert!(matches!(err, SessionError::Unauthorized { role: Role::Cashier, .. }));
        assert_eq!(store.current_tenant().map(|t| t.id.as_str()), Some("1"));

        let err = store
            .add_tenant(NewTenant::new("Pop-up", BusinessType::Shop, "Kim"))
            .unwrap_err();
        assert!(matches!(err, SessionError::Unauthorized { .. }));
        assert_eq!(store.tenants().len(), 3);
    }

    #[test]
    fn signed_out_operations_report_not_authenticated() {
        let mut store = SessionStore::demo();
        assert!(matches!(
            store.switch_tenant(&TenantId::from("1")),
            Err(SessionError::NotAuthenticated)
        ));
        assert!(matches!(
            store.add_tenant(NewTenant::new("X", BusinessType::Hotel, "Y")),
            Err(SessionError::NotAuthenticated)
        ));
        assert!(!store.logout());
    }

    #[test]
    fn add_tenant_validates_input() {
        let mut store = admin_store();
        let err = store
            .add_tenant(NewTenant::new(" ", BusinessType::Hotel, "Owner"))
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidTenant(_)));
        assert_eq!(store.tenants().len(), 3);
    }

    #[test]
    fn affiliation_must_exist() {
        let mut store = SessionStore::new(Arc::new(DemoDirectory::new()), TenantDirectory::new());
        let err = store.login("owner@hotel.com", "x").unwrap_err();
        assert!(matches!(err, SessionError::TenantNotFound(_)));
        assert!(!store.is_authenticated());

        // The admin has no affiliation and an empty directory gives no selection.
        store.login("admin@saas.com", "x").unwrap();
        assert!(store.current_tenant().is_none());
    }

    #[test]
    fn events_follow_state_changes() {
        let mut store = SessionStore::demo();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.on(
            EventPat::Any,
            Arc::new(move |e: &SessionEvent| sink.lock().unwrap().push(e.kind())),
        );

        let _ = store.login("nobody@saas.com", "x");
        store.login("admin@saas.com", "x").unwrap();
        store.switch_tenant(&TenantId::from("2")).unwrap();
        let _ = store.switch_tenant(&TenantId::from("99"));
        store
            .add_tenant(NewTenant::new("Harbor Inn", BusinessType::Hotel, "Lee"))
            .unwrap();
        store.logout();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                SessionEventKind::LoggedIn,
                SessionEventKind::TenantSwitched,
                SessionEventKind::TenantAdded,
                SessionEventKind::LoggedOut,
            ]
        );
    }

    #[test]
    fn quick_login_can_be_disabled() {
        let opts = AuthOptions::builder().quick_login(false).build();
        let store = SessionStore::from_options(&opts, None).unwrap();
        assert!(store.quick_logins().is_empty());
        assert_eq!(SessionStore::demo().quick_logins().len(), 4);
    }

    #[test]
    fn from_options_without_seed_has_no_tenants() {
        let opts = AuthOptions::builder().seed_tenants(false).build();
        let store = SessionStore::from_options(&opts, None).unwrap();
        assert!(store.tenants().is_empty());
        assert_eq!(store.active_tenant_count(), 0);
    }

    #[test]
    fn local_provider_checks_passwords_and_uses_configured_message() {
        let opts = AuthOptions::builder()
            .provider(ProviderKind::Local)
            .local(LocalOptions {
                hash_cost: 4,
                error_message: "Bad email or password".into(),
                demo_password: Some("letmein".into()),
            })
            .build_validated()
            .unwrap();
        let mut store = SessionStore::from_options(&opts, None).unwrap();
        assert_eq!(store.provider_name(), "local");
        assert_eq!(store.quick_logins().len(), 4);

        let err = store.login("cashier@hotel.com", "x").unwrap_err();
        assert_eq!(err.to_string(), "Bad email or password");
        assert!(!store.is_authenticated());

        assert_eq!(store.login("cashier@hotel.com", "letmein").unwrap().role(), Role::Cashier);
        assert_eq!(store.current_tenant().map(|t| t.id.as_str()), Some("1"));
    }

    #[test]
    fn supplied_local_directory_is_used() {
        let mut local = LocalDirectory::new(LocalOptions {
            hash_cost: 4,
            ..Default::default()
        });
        let user = User::new("9", "Night Cashier", "night@hotel.com", Role::Cashier, Some(TenantId::from("2")));
        local.register(user, "s3cret").unwrap();

        let opts = AuthOptions::builder().provider(ProviderKind::Local).build();
        let mut store = SessionStore::from_options(&opts, Some(local)).unwrap();
        store.login("night@hotel.com", "s3cret").unwrap();
        assert_eq!(store.current_tenant().map(|t| t.name.as_str()), Some("Corner Supermarket"));
    }

    #[traced_test]
    #[test]
    fn rejected_login_is_logged_without_password() {
        let mut store = SessionStore::demo();
        let _ = store.login("nobody@saas.com", "hunter2");
        assert!(logs_contain("login rejected: invalid credentials"));
        assert!(!logs_contain("hunter2"));
    }
}
