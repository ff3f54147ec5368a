//! Search execution against an established session.

use std::sync::Arc;

use jurisearch_core::{Jurisdiction, PreconditionViolation, SearchQuery, SessionToken};
use tracing::{info, warn};

use crate::SearchError;
use crate::adapter::{PortalAdapter, PortalReply};

/// Runs searches with a caller-owned [`SessionToken`].
///
/// Holds no state besides the adapter, so one engine may serve concurrent
/// searches. Nothing is retried here.
pub struct QueryEngine<P: ?Sized> {
    portal: Arc<P>,
}

impl<P: ?Sized> Clone for QueryEngine<P> {
    fn clone(&self) -> Self {
        Self {
            portal: Arc::clone(&self.portal),
        }
    }
}

impl<P: PortalAdapter + ?Sized> QueryEngine<P> {
    pub fn new(portal: Arc<P>) -> Self {
        Self { portal }
    }

    /// Search `text` across `jurisdictions`, returning the total result count.
    ///
    /// Input is validated before any network call. `None` for `token` (no
    /// session was ever established) is a precondition violation.
    pub async fn search(
        &self,
        token: Option<&SessionToken>,
        text: &str,
        jurisdictions: &[Jurisdiction],
    ) -> Result<u64, SearchError> {
        let query = SearchQuery::new(text, jurisdictions.iter().copied())?;
        self.submit(token, &query).await
    }

    /// Like [`search`](Self::search), taking jurisdiction labels such as `"Civil"`.
    pub async fn search_labels<S: AsRef<str>>(
        &self,
        token: Option<&SessionToken>,
        text: &str,
        labels: &[S],
    ) -> Result<u64, SearchError> {
        let query = SearchQuery::from_labels(text, labels)?;
        self.submit(token, &query).await
    }

    /// Submit an already validated query.
    pub async fn submit(
        &self,
        token: Option<&SessionToken>,
        query: &SearchQuery,
    ) -> Result<u64, SearchError> {
        let token = token.ok_or(PreconditionViolation::MissingToken)?;
        match self.portal.search(token, query).await {
            Ok(PortalReply::Count(count)) => {
                info!(
                    query = query.text(),
                    jurisdictions = %query.joined_labels(),
                    count,
                    "search complete"
                );
                Ok(count)
            }
            Ok(PortalReply::SessionExpired) => {
                warn!(token_age_secs = token.age_secs(), "session expired");
                Err(SearchError::SessionExpired)
            }
            Err(err) => {
                warn!(error = %err, "search failed");
                Err(SearchError::Transient(err))
            }
        }
    }
}
