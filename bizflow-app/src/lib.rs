//! bizflow-app: the composed BizFlow dashboard.
//!
//! [`BizFlowApp`] wires a [`bizflow_auth::SessionStore`] to a
//! [`bizflow_views::ViewResolver`] and produces one [`Screen`] per render.

pub mod app;
pub mod config;
pub mod logging;

pub use app::{client_error, BizFlowApp, Screen, SystemOverview, UserSummary};
pub use config::AppConfig;
