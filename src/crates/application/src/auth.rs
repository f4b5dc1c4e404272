use std::fmt::{self, Display};
use std::sync::Arc;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq)]
pub struct UserClaims {
    pub user_name: String, // user name
    pub is_admin: bool,    // is admin
}

pub trait TokenService: Send + Sync {
    fn issue(&self, claims: &UserClaims) -> Result<String, AppError>;
    fn verify(&self, token: &str) -> Result<UserClaims, AppError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DenyReason {
    MissingCredentials,
    InvalidCredentials(String),
    NotAdmin(String),
}

impl Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::MissingCredentials => write!(f, "no token provided"),
            DenyReason::InvalidCredentials(e) => write!(f, "invalid token: {}", e),
            DenyReason::NotAdmin(user) => write!(f, "{} is not an admin", user),
        }
    }
}

impl From<DenyReason> for AppError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::NotAdmin(_) => AppError::Forbidden(reason.to_string()),
            _ => AppError::Unauthorized(reason.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Allow(UserClaims),
    Deny(DenyReason),
}

/// Decides whether a caller may touch the catalog at all. Runs before any
/// store or asset host interaction.
pub trait AdminGate: Send + Sync {
    fn authorize(&self, credentials: Option<&str>) -> GateDecision;
}

/// Admin gate backed by signed tokens. A caller is an admin when the token
/// carries the admin flag or its subject is on the configured allow list.
#[derive(Clone)]
pub struct TokenAdminGate {
    token_svc: Arc<dyn TokenService>,
    admin_usernames: Vec<String>,
}

impl TokenAdminGate {
    pub fn new(token_svc: Arc<dyn TokenService>, admin_usernames: Vec<String>) -> Self {
        Self {
            token_svc,
            admin_usernames,
        }
    }
}

impl AdminGate for TokenAdminGate {
    fn authorize(&self, credentials: Option<&str>) -> GateDecision {
        let Some(token) = credentials.map(str::trim).filter(|t| !t.is_empty()) else {
            return GateDecision::Deny(DenyReason::MissingCredentials);
        };
        let claims = match self.token_svc.verify(token) {
            Ok(claims) => claims,
            Err(e) => return GateDecision::Deny(DenyReason::InvalidCredentials(e.to_string())),
        };
        if claims.is_admin || self.admin_usernames.iter().any(|u| u == &claims.user_name) {
            GateDecision::Allow(claims)
        } else {
            GateDecision::Deny(DenyReason::NotAdmin(claims.user_name))
        }
    }
}
