//! bizflow-auth: the session/identity store.
//!
//! [`SessionStore`] owns who is signed in and which tenant is selected.
//! Credentials are resolved through an [`IdentityProvider`]; the bundled
//! [`DemoDirectory`] knows the four demo accounts and [`LocalDirectory`]
//! checks bcrypt-hashed passwords.

pub mod error;
pub mod options;
pub mod provider;
pub mod session;

pub use error::{SessionError, SessionResult};
pub use options::{AuthOptions, AuthOptionsBuilder, LocalOptions, ProviderKind};
pub use provider::{Credentials, DemoDirectory, IdentityProvider, LocalDirectory, QuickLogin};
pub use session::SessionStore;
