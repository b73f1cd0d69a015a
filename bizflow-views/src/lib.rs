//! bizflow-views: which panels a role may see.
//!
//! [`ViewPolicy`] holds the permitted-roles table, [`ViewResolver`] turns a
//! [`bizflow_core::Session`] into the tab list and panel visibility for one
//! render.

pub mod destination;
pub mod policy;
pub mod resolver;

pub use destination::Destination;
pub use policy::{Grant, TabList, ViewPolicy};
pub use resolver::{NavTab, Navigation, PanelVisibility, TenantSelector, TenantSummary, ViewResolver};
