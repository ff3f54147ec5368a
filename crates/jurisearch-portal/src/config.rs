//! Portal-specific endpoints, form fields and response markers.
//!
//! Defaults target the CENDOJ search portal. Everything the portal owns lives
//! here so a change on their side is a config change, not a code change.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::PortalError;

/// Configuration for [`HttpPortal`](crate::HttpPortal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Scheme and host, e.g. `https://www.poderjudicial.es` (no trailing slash needed).
    pub base_url: String,
    /// Page fetched first to collect cookies and the anti-forgery token.
    pub landing_path: String,
    /// Endpoint the preconditions form (cookie consent) is posted to.
    pub accept_path: String,
    /// Fields posted to `accept_path`.
    pub accept_form: BTreeMap<String, String>,
    /// Page requested to confirm the session cookie is set.
    pub confirm_path: String,
    /// Search endpoint.
    pub search_path: String,
    /// Cookie whose presence marks an established session.
    pub session_cookie: String,
    /// Hidden input carrying the anti-forgery token. `None` if the portal has none.
    pub csrf_field: Option<String>,
    /// Form field for the free-text query.
    pub query_field: String,
    /// Form field for the jurisdiction filter.
    pub jurisdiction_field: String,
    /// Separator between jurisdiction filter ids.
    pub jurisdiction_separator: String,
    /// Fixed fields sent with every search.
    pub search_form: BTreeMap<String, String>,
    /// Regex with one capture group holding the total result count.
    pub count_pattern: String,
    /// Body fragments meaning "no records matched".
    pub zero_results_markers: Vec<String>,
    /// Body fragments meaning "session no longer valid".
    pub expired_markers: Vec<String>,
    /// Bound on each request round-trip.
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub user_agent: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.poderjudicial.es".into(),
            landing_path: "/search/indexAN.jsp".into(),
            accept_path: "/search/cookies.action".into(),
            accept_form: BTreeMap::from([("acceptCookies".into(), "true".into())]),
            confirm_path: "/search/indexAN.jsp".into(),
            search_path: "/search/search.action".into(),
            session_cookie: "JSESSIONID".into(),
            csrf_field: None,
            query_field: "TEXT".into(),
            jurisdiction_field: "JURISDICCION".into(),
            jurisdiction_separator: "|".into(),
            search_form: BTreeMap::from([
                ("action".into(), "query".into()),
                ("databasematch".into(), "TS".into()),
                ("sort".into(), "IN_FECHARESOLUCION:decreasing".into()),
                ("recordsPerPage".into(), "10".into()),
                ("start".into(), "1".into()),
            ]),
            count_pattern: r#"(?is)class="numDocs"[^>]*>\s*([0-9][0-9.,\s]*)<"#.into(),
            zero_results_markers: vec!["No se han encontrado resultados".into()],
            expired_markers: vec![
                "sesión ha caducado".into(),
                "sesion ha caducado".into(),
                "session has expired".into(),
            ],
            timeout_ms: 30_000,
            connect_timeout_ms: 10_000,
            user_agent: concat!("jurisearch/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl PortalConfig {
    /// Load a (possibly partial) JSON override; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, PortalError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PortalError::Config(format!("reading {}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| PortalError::Config(format!("parsing {}: {e}", path.display())))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}
