//! Session negotiation: walks the portal handshake and reports progress.

use std::sync::Arc;

use jurisearch_core::SessionToken;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::adapter::PortalAdapter;
use crate::progress::{HandshakeStep, Negotiation, NegotiationEvent, ProgressReporter};
use crate::{PortalError, SessionError};

/// Obtains session tokens from a portal.
///
/// Negotiation is not retried here: a caller that wants another attempt calls
/// [`obtain_session`](Self::obtain_session) again.
pub struct SessionManager<P: ?Sized> {
    portal: Arc<P>,
}

impl<P: ?Sized> Clone for SessionManager<P> {
    fn clone(&self) -> Self {
        Self {
            portal: Arc::clone(&self.portal),
        }
    }
}

impl<P: PortalAdapter + ?Sized + 'static> SessionManager<P> {
    pub fn new(portal: Arc<P>) -> Self {
        Self { portal }
    }

    /// Run the handshake to completion.
    ///
    /// Progress is non-decreasing and reaches 100 only once the session cookie
    /// is confirmed. Any failing step fails the whole negotiation.
    pub async fn obtain_session(
        &self,
        progress: &mut ProgressReporter,
    ) -> Result<SessionToken, SessionError> {
        progress.report(HandshakeStep::Start.progress());
        info!("negotiating portal session");

        let mut handshake = self
            .portal
            .open()
            .await
            .map_err(|e| step_failed(HandshakeStep::Open, e))?;
        progress.report(HandshakeStep::Open.progress());

        self.portal
            .accept(&mut handshake)
            .await
            .map_err(|e| step_failed(HandshakeStep::Accept, e))?;
        progress.report(HandshakeStep::Accept.progress());

        let token = self
            .portal
            .confirm(handshake)
            .await
            .map_err(|e| step_failed(HandshakeStep::Confirm, e))?;
        progress.report(HandshakeStep::Confirm.progress());

        info!("portal session established");
        Ok(token)
    }

    /// Spawn [`obtain_session`](Self::obtain_session) on the tokio runtime.
    ///
    /// The returned handle yields progress events followed by exactly one
    /// `Completed` or `Failed` event.
    pub fn negotiate_in_background(&self) -> Negotiation {
        let (tx, events) = mpsc::unbounded_channel();
        let manager = self.clone();
        let handle = tokio::spawn(async move {
            let mut reporter = ProgressReporter::new(tx);
            let event = match manager.obtain_session(&mut reporter).await {
                Ok(token) => NegotiationEvent::Completed(token),
                Err(err) => NegotiationEvent::Failed(err),
            };
            reporter.publish(event);
        });
        Negotiation { events, handle }
    }
}

fn step_failed(step: HandshakeStep, source: PortalError) -> SessionError {
    warn!(%step, error = %source, "session negotiation failed");
    SessionError::Step { step, source }
}
