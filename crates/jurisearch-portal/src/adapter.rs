//! The network seam between the engine and a concrete portal.

use async_trait::async_trait;
use jurisearch_core::{SearchQuery, SessionToken};

use crate::PortalError;
use crate::cookies::CookieSet;

/// State threaded through the handshake steps.
#[derive(Debug, Clone, Default)]
pub struct Handshake {
    pub cookies: CookieSet,
    /// Anti-forgery token scraped from the landing page, if the portal uses one.
    pub csrf_token: Option<String>,
}

/// A well-formed answer to a search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalReply {
    /// Total matching records; zero is a legitimate answer.
    Count(u64),
    /// The portal no longer accepts the session token.
    SessionExpired,
}

/// Portal-specific request/response handling.
///
/// Steps run strictly in order (`open` → `accept` → `confirm`), each depending
/// on the previous response. Implementations must bound every round-trip with
/// a timeout.
#[async_trait]
pub trait PortalAdapter: Send + Sync {
    /// Fetch the landing page: initial cookies and anti-forgery token.
    async fn open(&self) -> Result<Handshake, PortalError>;

    /// Submit the preconditions the portal requires before searching.
    async fn accept(&self, handshake: &mut Handshake) -> Result<(), PortalError>;

    /// Confirm the session cookie is set and turn the handshake into a token.
    async fn confirm(&self, handshake: Handshake) -> Result<SessionToken, PortalError>;

    /// Submit one search authenticated by `token`.
    async fn search(
        &self,
        token: &SessionToken,
        query: &SearchQuery,
    ) -> Result<PortalReply, PortalError>;
}
