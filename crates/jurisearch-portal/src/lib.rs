//! Automation engine for the judicial-records portal: session negotiation,
//! search submission and result-count extraction.

pub mod adapter;
mod config;
pub mod cookies;
mod engine;
mod error;
pub mod extract;
mod http;
pub mod progress;
mod session;

#[cfg(test)]
mod stub;

pub use adapter::{Handshake, PortalAdapter, PortalReply};
pub use config::PortalConfig;
pub use engine::QueryEngine;
pub use error::{PortalError, SearchError, SessionError};
pub use http::HttpPortal;
pub use progress::{HandshakeStep, Negotiation, NegotiationEvent, ProgressReporter};
pub use session::SessionManager;
