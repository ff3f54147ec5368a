//! Session credentials obtained from the portal.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::PreconditionViolation;

/// Opaque session credential: the `Cookie` header value collected while
/// negotiating, plus the instant it was obtained.
///
/// Expiry is decided by the portal and cannot be predicted client-side.
/// The value is never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    cookie_header: String,
    obtained_at: DateTime<Utc>,
}

impl SessionToken {
    pub fn new(cookie_header: impl Into<String>) -> Result<Self, PreconditionViolation> {
        let cookie_header = cookie_header.into();
        if cookie_header.trim().is_empty() {
            return Err(PreconditionViolation::EmptyToken);
        }
        Ok(Self {
            cookie_header,
            obtained_at: Utc::now(),
        })
    }

    pub fn cookie_header(&self) -> &str {
        &self.cookie_header
    }

    pub fn obtained_at(&self) -> DateTime<Utc> {
        self.obtained_at
    }

    /// Seconds elapsed since the token was obtained.
    pub fn age_secs(&self) -> i64 {
        (Utc::now() - self.obtained_at).num_seconds()
    }
}

// Cookie values are credentials; keep them out of logs.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("cookie_header", &"<redacted>")
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_header_is_rejected() {
        assert_eq!(
            SessionToken::new("  ").unwrap_err(),
            PreconditionViolation::EmptyToken
        );
    }

    #[test]
    fn keeps_header_verbatim() {
        let token = SessionToken::new("JSESSIONID=abc; lang=es").unwrap();
        assert_eq!(token.cookie_header(), "JSESSIONID=abc; lang=es");
        assert!(token.age_secs() >= 0);
    }

    #[test]
    fn debug_redacts_cookie() {
        let token = SessionToken::new("JSESSIONID=secret").unwrap();
        let dbg = format!("{token:?}");
        assert!(!dbg.contains("secret"));
        assert!(dbg.contains("redacted"));
    }
}
