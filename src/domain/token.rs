//! Token verification seam.
//!
//! Token issuance lives with the external identity collaborator; the
//! domain only needs to verify a presented token and learn who it names.

use async_trait::async_trait;

use super::{
    error::TokenError,
    value_object::{UserId, Username},
};

/// Identity carried by a successfully verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub username: Username,
}

/// Verifier for user identity tokens
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a token and return the identity it names
    async fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
