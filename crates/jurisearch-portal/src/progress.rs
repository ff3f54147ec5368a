//! Progress reporting for session negotiation.
//!
//! A background negotiation publishes [`NegotiationEvent`]s on an unbounded
//! channel, so sending never waits on the observer.

use std::fmt;

use jurisearch_core::{Progress, SessionToken};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::SessionError;

/// Handshake milestones and the progress each one represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeStep {
    Start,
    Open,
    Accept,
    Confirm,
}

impl HandshakeStep {
    /// Progress reported once this step has completed.
    pub fn progress(self) -> Progress {
        match self {
            HandshakeStep::Start => Progress::START,
            HandshakeStep::Open => Progress::new(35),
            HandshakeStep::Accept => Progress::new(70),
            HandshakeStep::Confirm => Progress::DONE,
        }
    }
}

impl fmt::Display for HandshakeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HandshakeStep::Start => "start",
            HandshakeStep::Open => "open",
            HandshakeStep::Accept => "accept",
            HandshakeStep::Confirm => "confirm",
        })
    }
}

/// Typed events published by a background negotiation.
#[derive(Debug)]
pub enum NegotiationEvent {
    Progress(Progress),
    Completed(SessionToken),
    Failed(SessionError),
}

/// Sink for negotiation progress. Never reports a value lower than one
/// already reported. A reporter without a channel only tracks the high-water mark.
#[derive(Debug, Default)]
pub struct ProgressReporter {
    tx: Option<mpsc::UnboundedSender<NegotiationEvent>>,
    last: Option<Progress>,
}

impl ProgressReporter {
    pub fn new(tx: mpsc::UnboundedSender<NegotiationEvent>) -> Self {
        Self {
            tx: Some(tx),
            last: None,
        }
    }

    /// Reporter that publishes nowhere.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn report(&mut self, progress: Progress) {
        if self.last.is_some_and(|last| progress < last) {
            debug!(%progress, "ignoring regressing progress");
            return;
        }
        if self.last == Some(progress) {
            return;
        }
        self.last = Some(progress);
        self.publish(NegotiationEvent::Progress(progress));
    }

    pub fn last(&self) -> Option<Progress> {
        self.last
    }

    pub(crate) fn publish(&self, event: NegotiationEvent) {
        // A dropped receiver only means nobody is watching.
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}

/// Handle on a negotiation running in the background.
pub struct Negotiation {
    pub(crate) events: mpsc::UnboundedReceiver<NegotiationEvent>,
    pub(crate) handle: JoinHandle<()>,
}

impl Negotiation {
    /// Next event, or `None` once the negotiation task has finished and the
    /// channel is drained.
    pub async fn next_event(&mut self) -> Option<NegotiationEvent> {
        self.events.recv().await
    }

    /// Drain events until the negotiation finishes, forwarding progress to
    /// `on_progress`.
    pub async fn wait<F>(mut self, mut on_progress: F) -> Result<SessionToken, SessionError>
    where
        F: FnMut(Progress),
    {
        while let Some(event) = self.events.recv().await {
            match event {
                NegotiationEvent::Progress(p) => on_progress(p),
                NegotiationEvent::Completed(token) => return Ok(token),
                NegotiationEvent::Failed(err) => return Err(err),
            }
        }
        // Channel closed without a terminal event: the task died.
        match self.handle.await {
            Err(e) => Err(SessionError::Aborted(e.to_string())),
            Ok(()) => Err(SessionError::Aborted(
                "negotiation ended without a result".into(),
            )),
        }
    }
}
