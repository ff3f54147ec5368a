//! HTML extraction: anti-forgery tokens and search result counts.
//!
//! Search responses are classified in a fixed order so that expiry is never
//! mistaken for a zero count:
//! 1. 401/403 or any redirect → expired
//! 2. other non-2xx → server error
//! 3. count pattern → count
//! 4. expired marker in body → expired
//! 5. zero-results marker → 0
//! 6. anything else → unexpected response

use regex::Regex;
use reqwest::StatusCode;
use tracing::debug;

use crate::adapter::PortalReply;
use crate::{PortalConfig, PortalError};

/// Longest body excerpt carried in an error.
const MAX_ERROR_BODY: usize = 200;

/// Compiled response-matching rules derived from [`PortalConfig`].
#[derive(Debug, Clone)]
pub struct ResponseRules {
    count: Regex,
    zero_markers: Vec<String>,
    expired_markers: Vec<String>,
}

impl ResponseRules {
    pub fn from_config(config: &PortalConfig) -> Result<Self, PortalError> {
        let count = Regex::new(&config.count_pattern)
            .map_err(|e| PortalError::Config(format!("count_pattern: {e}")))?;
        if count.captures_len() < 2 {
            return Err(PortalError::Config(
                "count_pattern needs a capture group".into(),
            ));
        }
        Ok(Self {
            count,
            zero_markers: lowercase_all(&config.zero_results_markers),
            expired_markers: lowercase_all(&config.expired_markers),
        })
    }

    pub fn classify_search(&self, status: StatusCode, body: &str) -> Result<PortalReply, PortalError> {
        if status == StatusCode::UNAUTHORIZED
            || status == StatusCode::FORBIDDEN
            || status.is_redirection()
        {
            debug!(status = status.as_u16(), "search bounced: session rejected");
            return Ok(PortalReply::SessionExpired);
        }
        if !status.is_success() {
            return Err(PortalError::Server {
                status: status.as_u16(),
                body: excerpt(body),
            });
        }

        // A count outranks body markers: result pages can echo the query text.
        if let Some(caps) = self.count.captures(body) {
            let raw = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            return parse_count(raw).map(PortalReply::Count);
        }

        let lowered = body.to_lowercase();
        if contains_any(&lowered, &self.expired_markers) {
            debug!("search body carries an expiry marker");
            return Ok(PortalReply::SessionExpired);
        }

        if contains_any(&lowered, &self.zero_markers) {
            return Ok(PortalReply::Count(0));
        }

        Err(PortalError::UnexpectedResponse(format!(
            "no result count in response: {}",
            excerpt(body)
        )))
    }
}

/// Parse a displayed count such as `1.234`, `1,234` or `12 345`.
pub fn parse_count(raw: &str) -> Result<u64, PortalError> {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, '.' | ',') && !c.is_whitespace())
        .collect();
    digits
        .parse::<u64>()
        .map_err(|_| PortalError::UnexpectedResponse(format!("unparsable result count {raw:?}")))
}

/// Find the value of the hidden input named `field`, whatever the attribute order.
pub fn extract_hidden_input(body: &str, field: &str) -> Option<String> {
    let name = regex::escape(field);
    let value = r#"\bvalue\s*=\s*(?:"([^"]*)"|'([^']*)')"#;
    let patterns = [
        format!(r#"(?is)<input[^>]*\bname\s*=\s*["']{name}["'][^>]*{value}"#),
        format!(r#"(?is)<input[^>]*{value}[^>]*\bname\s*=\s*["']{name}["']"#),
    ];
    patterns.iter().find_map(|p| {
        let caps = Regex::new(p).ok()?.captures(body)?;
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    })
}

fn lowercase_all(markers: &[String]) -> Vec<String> {
    markers
        .iter()
        .filter(|m| !m.is_empty())
        .map(|m| m.to_lowercase())
        .collect()
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

fn excerpt(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY).collect()
}
