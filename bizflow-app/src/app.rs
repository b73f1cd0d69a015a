use bizflow_auth::{QuickLogin, SessionError, SessionResult, SessionStore};
use bizflow_core::{BizError, EventListener, EventPat, ListenerId, NewTenant, Role, Tenant, TenantId, User, UserId};
use bizflow_views::{Destination, Navigation, ViewPolicy, ViewResolver};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::AppConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub role_label: &'static str,
}

impl From<&User> for UserSummary {
    fn from(u: &User) -> Self {
        Self {
            id: u.id().clone(),
            name: u.name().to_string(),
            email: u.email().to_string(),
            role: u.role(),
            role_label: u.role().label(),
        }
    }
}

/// Cross-tenant figures on the system overview panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SystemOverview {
    pub total_tenants: usize,
    pub active_tenants: usize,
}

/// What the next render shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "kebab-case")]
pub enum Screen {
    Login {
        quick_logins: Vec<QuickLogin>,
    },
    Workspace {
        user: UserSummary,
        navigation: Navigation,
        overview: Option<SystemOverview>,
    },
}

/// JSON payload for showing `err` to the user.
pub fn client_error(err: SessionError) -> serde_json::Value {
    BizError::from(err).sanitize_for_client().to_json()
}

/// Top-level controller: owns the session store and the view resolver and
/// remembers the open destination between renders.
#[derive(Debug)]
pub struct BizFlowApp {
    store: SessionStore,
    resolver: ViewResolver,
    active: Option<Destination>,
}

impl Default for BizFlowApp {
    fn default() -> Self {
        Self::new(SessionStore::demo(), ViewResolver::default())
    }
}

impl BizFlowApp {
    pub fn new(store: SessionStore, resolver: ViewResolver) -> Self {
        Self {
            store,
            resolver,
            active: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let store = SessionStore::from_options(&config.auth, None)?;
        Ok(Self::new(store, ViewResolver::new(ViewPolicy::standard())))
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn resolver(&self) -> &ViewResolver {
        &self.resolver
    }

    pub fn active_destination(&self) -> Option<Destination> {
        self.active
    }

    /// Sign in and open the role's landing destination.
    pub fn login(&mut self, email: &str, password: &str) -> SessionResult<Option<Destination>> {
        let role = self.store.login(email, password)?.role();
        self.active = self.resolver.default_destination(role);
        info!(%role, destination = ?self.active.map(|d| d.slug()), "landing destination");
        Ok(self.active)
    }

    pub fn logout(&mut self) -> bool {
        self.active = None;
        self.store.logout()
    }

    /// Open `destination` if the signed-in role may render it.
    pub fn select(&mut self, destination: Destination) -> SessionResult<Destination> {
        let role = self.store.role().ok_or(SessionError::NotAuthenticated)?;
        if !self.resolver.may_render(role, destination) {
            debug!(%role, %destination, "destination denied");
            return Err(SessionError::unauthorized(role, format!("open {}", destination.slug())));
        }
        self.active = Some(destination);
        Ok(destination)
    }

    /// Select a destination by slug. Unknown slugs are a bad request.
    pub fn select_named(&mut self, slug: &str) -> anyhow::Result<Destination> {
        let destination = Destination::parse(slug).ok_or_else(|| {
            BizError::bad_request(format!("Unknown destination '{slug}'")).into_anyhow()
        })?;
        self.select(destination)
            .map_err(|e| BizError::from(e).into_anyhow())
    }

    pub fn switch_tenant(&mut self, tenant_id: &TenantId) -> SessionResult<&Tenant> {
        self.store.switch_tenant(tenant_id)
    }

    pub fn add_tenant(&mut self, new_tenant: NewTenant) -> SessionResult<Tenant> {
        self.store.add_tenant(new_tenant)
    }

    pub fn on(&mut self, pattern: EventPat, listener: EventListener) -> ListenerId {
        self.store.on(pattern, listener)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.store.off(id)
    }

    /// Consult the session once and describe the screen to mount.
    pub fn render(&self) -> Screen {
        let session = self.store.session();
        let (Some(user), Some(navigation)) = (session.user, self.resolver.resolve(&session, self.active)) else {
            return Screen::Login {
                quick_logins: self.store.quick_logins(),
            };
        };

        let overview = (navigation.active == Some(Destination::SystemOverview)).then(|| SystemOverview {
            total_tenants: self.store.tenants().len(),
            active_tenants: self.store.active_tenant_count(),
        });

        Screen::Workspace {
            user: UserSummary::from(user),
            navigation,
            overview,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizflow_core::BusinessType;

    #[test]
    fn signed_out_renders_login_with_quick_logins() {
        let app = BizFlowApp::default();
        match app.render() {
            Screen::Login { quick_logins } => {
                assert_eq!(quick_logins.len(), 4);
                assert_eq!(quick_logins[0].email, "admin@saas.com");
            }
            other => panic!("expected login screen, got {other:?}"),
        }
    }

    #[test]
    fn select_respects_policy() {
        let mut app = BizFlowApp::default();
        assert!(matches!(app.select(Destination::Dashboard), Err(SessionError::NotAuthenticated)));

        app.login("inventory@hotel.com", "pw").unwrap();
        assert_eq!(app.select(Destination::Inventory).unwrap(), Destination::Inventory);
        let err = app.select(Destination::CashFlow).unwrap_err();
        assert_eq!(err.to_string(), "Role inventory-manager may not open cash-flow");
        assert_eq!(app.active_destination(), Some(Destination::Inventory));
    }

    #[test]
    fn select_named_reports_error_classes() {
        let mut app = BizFlowApp::default();
        app.login("cashier@hotel.com", "pw").unwrap();

        assert_eq!(app.select_named("transactions").unwrap(), Destination::Transactions);

        let err = app.select_named("settings").unwrap_err();
        assert_eq!(BizError::from_anyhow(&err).unwrap().class_name(), "bad-request");

        let err = app.select_named("reports").unwrap_err();
        assert_eq!(BizError::from_anyhow(&err).unwrap().class_name(), "forbidden");
    }

    #[test]
    fn overview_only_on_system_panel() {
        let mut app = BizFlowApp::default();
        app.login("admin@saas.com", "pw").unwrap();
        app.add_tenant(NewTenant::new("Closed Shop", BusinessType::Shop, "Ex Owner").inactive())
            .unwrap();

        match app.render() {
            Screen::Workspace { overview, .. } => {
                assert_eq!(
                    overview,
                    Some(SystemOverview {
                        total_tenants: 4,
                        active_tenants: 3
                    })
                );
            }
            other => panic!("expected workspace, got {other:?}"),
        }

        app.select(Destination::Reports).unwrap();
        match app.render() {
            Screen::Workspace { overview, .. } => assert!(overview.is_none()),
            other => panic!("expected workspace, got {other:?}"),
        }
    }

    #[test]
    fn client_errors_hide_provider_details() {
        let json = client_error(SessionError::unauthorized(Role::Cashier, "open reports"));
        assert_eq!(json["className"], "forbidden");
        assert_eq!(json["message"], "Role cashier may not open reports");

        let json = client_error(SessionError::Provider(anyhow::anyhow!("bcrypt: invalid hash")));
        assert_eq!(json["code"], 500);
        assert_eq!(json["message"], "Something went wrong");
    }

    #[test]
    fn logout_clears_active_destination() {
        let mut app = BizFlowApp::default();
        app.login("owner@hotel.com", "pw").unwrap();
        assert!(app.logout());
        assert_eq!(app.active_destination(), None);
        assert!(matches!(app.render(), Screen::Login { .. }));
    }
}
