//! Recording in-memory portal for engine and session tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use jurisearch_core::{SearchQuery, SessionToken};

use crate::PortalError;
use crate::adapter::{Handshake, PortalAdapter, PortalReply};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Open,
    Accept,
    Confirm,
}

/// What the stub answers to every search.
#[derive(Debug, Clone, Copy)]
pub enum SearchBehaviour {
    Count(u64),
    Expired,
    Malformed,
}

pub struct StubPortal {
    fail_at: Option<Step>,
    search: SearchBehaviour,
    handshake_calls: AtomicUsize,
    search_calls: AtomicUsize,
}

impl StubPortal {
    pub fn healthy() -> Self {
        Self::with_search(SearchBehaviour::Count(0))
    }

    pub fn failing_at(step: Step) -> Self {
        Self {
            fail_at: Some(step),
            ..Self::healthy()
        }
    }

    pub fn with_search(search: SearchBehaviour) -> Self {
        Self {
            fail_at: None,
            search,
            handshake_calls: AtomicUsize::new(0),
            search_calls: AtomicUsize::new(0),
        }
    }

    pub fn handshake_calls(&self) -> usize {
        self.handshake_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    fn step(&self, step: Step) -> Result<(), PortalError> {
        self.handshake_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(step) {
            return Err(PortalError::Server {
                status: 503,
                body: format!("stub failure at {step:?}"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PortalAdapter for StubPortal {
    async fn open(&self) -> Result<Handshake, PortalError> {
        self.step(Step::Open)?;
        Ok(Handshake::default())
    }

    async fn accept(&self, _handshake: &mut Handshake) -> Result<(), PortalError> {
        self.step(Step::Accept)
    }

    async fn confirm(&self, _handshake: Handshake) -> Result<SessionToken, PortalError> {
        self.step(Step::Confirm)?;
        SessionToken::new("JSESSIONID=stub")
            .map_err(|e| PortalError::UnexpectedResponse(e.to_string()))
    }

    async fn search(
        &self,
        _token: &SessionToken,
        _query: &SearchQuery,
    ) -> Result<PortalReply, PortalError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        match self.search {
            SearchBehaviour::Count(n) => Ok(PortalReply::Count(n)),
            SearchBehaviour::Expired => Ok(PortalReply::SessionExpired),
            SearchBehaviour::Malformed => {
                Err(PortalError::UnexpectedResponse("stub malformed page".into()))
            }
        }
    }
}
