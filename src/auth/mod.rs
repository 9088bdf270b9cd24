//! Auth provider protocol.
//!
//! Token format and cryptography are owned entirely by the external provider;
//! this module only moves opaque token pairs around and asks the provider who
//! they belong to.

pub mod gotrue;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use gotrue::GoTrueProvider;

/// The opaque access/refresh token pair held in session cookies. The gate
/// reads and may rewrite it; only the provider ever originates one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Identity the provider resolved for a token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Result of a successful "who is this" call. `refreshed` is set when the
/// provider transparently rotated an expired access token; the caller must
/// propagate the new pair to the browser.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub user: AuthUser,
    pub refreshed: Option<SessionTokens>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No session tokens on request")]
    NoSession,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Session rejected by auth provider")]
    SessionRejected,

    #[error("Auth provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// External auth provider operations this system consumes. Object-safe so the
/// session gate can run against a stub in tests.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve the user behind a token pair, refreshing the access token
    /// transparently if it has expired.
    async fn current_user(&self, tokens: &SessionTokens) -> Result<AuthOutcome, AuthError>;

    /// Exchange credentials for a fresh token pair.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionTokens, AuthError>;

    /// Invalidate the session behind a token pair.
    async fn sign_out(&self, tokens: &SessionTokens) -> Result<(), AuthError>;
}
