use bizflow_core::errors::BizError;
use bizflow_core::{Role, TenantId, UserId};
use thiserror::Error;

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Recoverable rejections reported by the session store. None are fatal.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Unknown account or wrong password. Carries the configured message.
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Tenant not found: {0}")]
    TenantNotFound(TenantId),

    #[error("Role {role} may not {action}")]
    Unauthorized { role: Role, action: String },

    #[error("User {0} has no tenant affiliation")]
    Unaffiliated(UserId),

    #[error("Invalid tenant: {0}")]
    InvalidTenant(String),

    #[error("Identity provider failed: {0}")]
    Provider(#[from] anyhow::Error),
}

impl SessionError {
    pub fn unauthorized(role: Role, action: impl Into<String>) -> Self {
        Self::Unauthorized {
            role,
            action: action.into(),
        }
    }

    pub fn to_biz_error(&self) -> BizError {
        let message = self.to_string();
        match self {
            SessionError::InvalidCredentials(_) | SessionError::NotAuthenticated => {
                BizError::not_authenticated(message)
            }
            SessionError::TenantNotFound(_) => BizError::not_found(message),
            SessionError::Unauthorized { .. } | SessionError::Unaffiliated(_) => BizError::forbidden(message),
            SessionError::InvalidTenant(_) => BizError::bad_request(message),
            SessionError::Provider(_) => BizError::general_error(message),
        }
    }
}

impl From<SessionError> for BizError {
    fn from(err: SessionError) -> Self {
        let biz = err.to_biz_error();
        match err {
            SessionError::Provider(source) => biz.with_source(source),
            _ => biz,
        }
    }
}
