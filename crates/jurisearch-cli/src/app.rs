//! Caller-side orchestration: one session, many searches, results logging.

use std::sync::Arc;

use jurisearch_core::{SearchQuery, SearchRecord, SessionToken};
use jurisearch_portal::{
    HttpPortal, PortalAdapter, PortalConfig, PortalError, QueryEngine, SearchError, SessionError,
    SessionManager,
};
use tracing::{info, warn};

use crate::display;
use crate::results_log::ResultsLog;

pub struct App<P: ?Sized = HttpPortal> {
    sessions: SessionManager<P>,
    engine: QueryEngine<P>,
    token: Option<SessionToken>,
    log: ResultsLog,
    reauth: bool,
}

impl App {
    pub fn connect(config: PortalConfig, log: ResultsLog, reauth: bool) -> Result<Self, PortalError> {
        Ok(Self::new(Arc::new(HttpPortal::new(config)?), log, reauth))
    }
}

impl<P: PortalAdapter + ?Sized + 'static> App<P> {
    pub fn new(portal: Arc<P>, log: ResultsLog, reauth: bool) -> Self {
        Self {
            sessions: SessionManager::new(Arc::clone(&portal)),
            engine: QueryEngine::new(portal),
            token: None,
            log,
            reauth,
        }
    }

    pub fn reauth(&self) -> bool {
        self.reauth
    }

    /// Negotiate a fresh session, rendering progress on stderr.
    ///
    /// The previous token is discarded first, so a failed attempt leaves no token.
    pub async fn negotiate(&mut self) -> Result<(), SessionError> {
        self.token = None;
        let result = self
            .sessions
            .negotiate_in_background()
            .wait(display::render_progress)
            .await;
        display::finish_progress();
        self.token = Some(result?);
        Ok(())
    }

    /// Run one search and log it if it produced a count.
    ///
    /// With `reauth` set, an expired session is renegotiated once and the
    /// search retried once.
    pub async fn search<S: AsRef<str>>(
        &mut self,
        text: &str,
        labels: &[S],
    ) -> Result<u64, SearchError> {
        let query = SearchQuery::from_labels(text, labels)?;
        let mut result = self.engine.submit(self.token.as_ref(), &query).await;

        if self.reauth && matches!(result, Err(SearchError::SessionExpired)) {
            info!("session expired; renegotiating");
            match self.negotiate().await {
                Ok(()) => result = self.engine.submit(self.token.as_ref(), &query).await,
                Err(e) => warn!(error = %e, "renegotiation failed"),
            }
        }

        if let Ok(count) = result {
            let record = SearchRecord::new(&query, count);
            if let Err(e) = self.log.append(&record) {
                warn!(error = %e, "could not append to results log");
                eprintln!("Warning: result not saved to {}: {e:#}", self.log.path().display());
            }
        }
        result
    }
}
