//! Authenticated session

use super::principal::Principal;

/// The identity every remote call is attributed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub principal: Principal,
    /// Signed assertion issued by the identity provider
    pub token: String,
}

impl Session {
    pub fn new(principal: Principal, token: impl Into<String>) -> Self {
        Self {
            principal,
            token: token.into(),
        }
    }
}
