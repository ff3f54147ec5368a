use thiserror::Error;

/// Invalid input supplied by the caller.
///
/// Raised before any network call is attempted; never affects session state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionViolation {
    #[error("search query is empty")]
    EmptyQuery,

    #[error("no jurisdiction selected")]
    NoJurisdictions,

    #[error("no session token: negotiate a session before searching")]
    MissingToken,

    #[error("session token is empty")]
    EmptyToken,

    #[error("unknown jurisdiction: {0}")]
    UnknownJurisdiction(String),
}
