use std::sync::Arc;

use anyhow::Result;
use bizflow_app::{client_error, config, logging, BizFlowApp, Screen};
use bizflow_core::{BusinessType, EventListener, EventPat, NewTenant, SessionEvent, TenantId};
use bizflow_views::Destination;
use tracing::{info, warn};

fn main() -> Result<()> {
    let cfg = config::load()?;
    logging::init(&cfg.log_filter)?;

    let mut app = BizFlowApp::from_config(&cfg)?;
    info!(provider = app.store().provider_name(), "bizflow demo starting");

    let listener: EventListener = Arc::new(|event: &SessionEvent| info!(kind = ?event.kind(), "session event"));
    app.on(EventPat::Any, listener);

    let accounts = match app.render() {
        Screen::Login { quick_logins } => quick_logins,
        Screen::Workspace { .. } => Vec::new(),
    };
    if accounts.is_empty() {
        println!("[bizflow-demo] no quick-login accounts configured");
    }

    let password = cfg.auth.local.demo_password.clone().unwrap_or_else(|| "demo".to_string());
    for account in accounts {
        println!("[bizflow-demo] signing in as {} <{}>", account.label, account.email);
        if let Err(e) = app.login(&account.email, &password) {
            warn!(email = %account.email, "login failed: {e}");
            println!("{}", client_error(e));
            continue;
        }
        println!("{}", serde_json::to_string_pretty(&app.render())?);

        for destination in Destination::ALL {
            match app.select(destination) {
                Ok(_) => println!("  open {:<16} ok", destination.slug()),
                Err(e) => println!("  open {:<16} {}", destination.slug(), client_error(e)),
            }
        }

        if account.role.is_platform_admin() {
            let added = app.add_tenant(NewTenant::new("Airport Kiosk", BusinessType::Shop, "Dana Lee"))?;
            println!("  added tenant {} ({})", added.name, added.id);
            let selected = app.switch_tenant(&TenantId::from("2"))?;
            println!("  switched to {}", selected.name);
        }

        app.logout();
    }

    Ok(())
}
