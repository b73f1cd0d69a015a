//! bizflow-core: shared domain types for BizFlow.
//!
//! Tenants, roles and users, the structured error type, the key/value
//! configuration store and the session event hub. Nothing here performs
//! I/O; every type is plain in-memory data.

pub mod config;
pub mod errors;
pub mod events;
pub mod identity;
pub mod session;
pub mod tenant;

pub use config::{BizConfig, BizConfigSnapshot};
pub use errors::{BizError, ErrorKind};
pub use events::{
    EventListener, EventPat, ListenerId, SessionEvent, SessionEventHub, SessionEventKind,
};
pub use identity::{Role, SessionId, User, UserId};
pub use session::Session;
pub use tenant::{BusinessType, NewTenant, Tenant, TenantDirectory, TenantId};
