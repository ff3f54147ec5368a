//! HTTP adapter for the judicial-records portal.

use async_trait::async_trait;
use jurisearch_core::{SearchQuery, SessionToken};
use reqwest::header::COOKIE;
use reqwest::{RequestBuilder, StatusCode};
use tracing::{debug, info};
use url::Url;

use crate::adapter::{Handshake, PortalAdapter, PortalReply};
use crate::cookies::CookieSet;
use crate::extract::{ResponseRules, extract_hidden_input};
use crate::{PortalConfig, PortalError};

/// [`PortalAdapter`] over `reqwest`.
///
/// Redirects are not followed: the handshake needs every intermediate
/// `Set-Cookie`, and a redirect on search means the session was dropped.
/// Cookies are sent explicitly from the token, so two tokens never share
/// state even though they share the connection pool.
pub struct HttpPortal {
    client: reqwest::Client,
    base_url: Url,
    config: PortalConfig,
    rules: ResponseRules,
}

impl HttpPortal {
    pub fn new(config: PortalConfig) -> Result<Self, PortalError> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))?;
        let rules = ResponseRules::from_config(&config)?;
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            base_url,
            config,
            rules,
        })
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    fn url(&self, path: &str) -> Result<Url, PortalError> {
        Ok(self.base_url.join(path)?)
    }
}

#[async_trait]
impl PortalAdapter for HttpPortal {
    async fn open(&self) -> Result<Handshake, PortalError> {
        let url = self.url(&self.config.landing_path)?;
        info!(url = %url, "fetching landing page");

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        let mut handshake = Handshake::default();
        handshake.cookies.absorb(resp.headers());
        let body = resp.text().await?;
        ensure_handshake_status(status, &body)?;

        if let Some(field) = &self.config.csrf_field {
            let token = extract_hidden_input(&body, field).ok_or_else(|| {
                PortalError::UnexpectedResponse(format!("landing page has no `{field}` input"))
            })?;
            handshake.csrf_token = Some(token);
        }

        debug!(
            cookies = handshake.cookies.len(),
            csrf = handshake.csrf_token.is_some(),
            "landing page fetched"
        );
        Ok(handshake)
    }

    async fn accept(&self, handshake: &mut Handshake) -> Result<(), PortalError> {
        let url = self.url(&self.config.accept_path)?;
        info!(url = %url, "submitting preconditions");

        let mut form = self.config.accept_form.clone();
        if let (Some(field), Some(token)) = (&self.config.csrf_field, &handshake.csrf_token) {
            form.insert(field.clone(), token.clone());
        }

        let req = with_cookies(self.client.post(url).form(&form), &handshake.cookies);
        let resp = req.send().await?;
        let status = resp.status();
        handshake.cookies.absorb(resp.headers());
        let body = resp.text().await?;
        ensure_handshake_status(status, &body)
    }

    async fn confirm(&self, mut handshake: Handshake) -> Result<SessionToken, PortalError> {
        let url = self.url(&self.config.confirm_path)?;
        info!(url = %url, "confirming session cookie");

        let req = with_cookies(self.client.get(url), &handshake.cookies);
        let resp = req.send().await?;
        let status = resp.status();
        handshake.cookies.absorb(resp.headers());
        let body = resp.text().await?;
        ensure_handshake_status(status, &body)?;

        let cookie = &self.config.session_cookie;
        if handshake.cookies.get(cookie).is_none() {
            return Err(PortalError::UnexpectedResponse(format!(
                "session cookie `{cookie}` was never set"
            )));
        }
        SessionToken::new(handshake.cookies.header_value())
            .map_err(|e| PortalError::UnexpectedResponse(e.to_string()))
    }

    async fn search(
        &self,
        token: &SessionToken,
        query: &SearchQuery,
    ) -> Result<PortalReply, PortalError> {
        let url = self.url(&self.config.search_path)?;
        let filters = query
            .filter_ids()
            .collect::<Vec<_>>()
            .join(&self.config.jurisdiction_separator);

        let mut form: Vec<(&str, &str)> = self
            .config
            .search_form
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        form.push((self.config.query_field.as_str(), query.text()));
        form.push((self.config.jurisdiction_field.as_str(), filters.as_str()));

        info!(url = %url, query = query.text(), filters = %filters, "submitting search");
        let resp = self
            .client
            .post(url)
            .header(COOKIE, token.cookie_header())
            .form(&form)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        self.rules.classify_search(status, &body)
    }
}

fn with_cookies(req: RequestBuilder, cookies: &CookieSet) -> RequestBuilder {
    if cookies.is_empty() {
        req
    } else {
        req.header(COOKIE, cookies.header_value())
    }
}

/// Handshake pages may answer directly or redirect onwards; anything else fails.
fn ensure_handshake_status(status: StatusCode, body: &str) -> Result<(), PortalError> {
    if status.is_success() || status.is_redirection() {
        return Ok(());
    }
    Err(PortalError::Server {
        status: status.as_u16(),
        body: body.chars().take(200).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jurisearch_core::Jurisdiction;
    use std::time::Duration;
    use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

    fn test_config(base: &str) -> PortalConfig {
        PortalConfig {
            base_url: base.into(),
            landing_path: "/landing".into(),
            accept_path: "/accept".into(),
            confirm_path: "/confirm".into(),
            search_path: "/search".into(),
            csrf_field: Some("_csrf".into()),
            timeout_ms: 2_000,
            ..PortalConfig::default()
        }
    }

    fn query() -> SearchQuery {
        SearchQuery::new("desahucio", [Jurisdiction::Penal, Jurisdiction::Civil]).unwrap()
    }

    async fn mount_handshake(server: &MockServer) {
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/landing"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "lang=es; Path=/")
                    .set_body_string(
                        r#"<form><input type="hidden" name="_csrf" value="tok-123"></form>"#,
                    ),
            )
            .expect(1)
            .mount(server)
            .await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/accept"))
            .and(matchers::header("cookie", "lang=es"))
            .and(matchers::body_string_contains("_csrf=tok-123"))
            .and(matchers::body_string_contains("acceptCookies=true"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("set-cookie", "consent=yes; Path=/")
                    .insert_header("location", "/confirm"),
            )
            .expect(1)
            .mount(server)
            .await;
    }

    #[test]
    fn new_rejects_invalid_base_url() {
        let err = HttpPortal::new(PortalConfig {
            base_url: "not a url".into(),
            ..PortalConfig::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, PortalError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn handshake_yields_token_with_session_cookie() {
        let server = MockServer::start().await;
        mount_handshake(&server).await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/confirm"))
            .and(matchers::header("cookie", "consent=yes; lang=es"))
            .respond_with(
                ResponseTemplate::new(200).insert_header("set-cookie", "JSESSIONID=s1; HttpOnly"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let portal = HttpPortal::new(test_config(&server.uri())).unwrap();
        let mut handshake = portal.open().await.unwrap();
        assert_eq!(handshake.csrf_token.as_deref(), Some("tok-123"));
        portal.accept(&mut handshake).await.unwrap();
        let token = portal.confirm(handshake).await.unwrap();
        assert_eq!(token.cookie_header(), "JSESSIONID=s1; consent=yes; lang=es");
    }

    #[tokio::test]
    async fn confirm_without_session_cookie_fails() {
        let server = MockServer::start().await;
        mount_handshake(&server).await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/confirm"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let portal = HttpPortal::new(test_config(&server.uri())).unwrap();
        let mut handshake = portal.open().await.unwrap();
        portal.accept(&mut handshake).await.unwrap();
        let err = portal.confirm(handshake).await.unwrap_err();
        assert!(matches!(err, PortalError::UnexpectedResponse(_)));
    }

    #[tokio::test]
    async fn landing_without_csrf_input_fails() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/landing"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>challenge</html>"))
            .mount(&server)
            .await;

        let portal = HttpPortal::new(test_config(&server.uri())).unwrap();
        let err = portal.open().await.unwrap_err();
        assert!(matches!(err, PortalError::UnexpectedResponse(_)));
    }

    #[tokio::test]
    async fn landing_server_error_fails() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/landing"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let portal = HttpPortal::new(test_config(&server.uri())).unwrap();
        let err = portal.open().await.unwrap_err();
        assert!(matches!(err, PortalError::Server { status: 503, .. }));
    }

    #[tokio::test]
    async fn search_encodes_query_and_parses_count() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/search"))
            .and(matchers::header("cookie", "JSESSIONID=s1"))
            .and(matchers::body_string_contains("TEXT=desahucio"))
            .and(matchers::body_string_contains("JURISDICCION=CIVIL%7CPENAL"))
            .and(matchers::body_string_contains("action=query"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<div><span class="numDocs">1.234</span> resultados</div>"#),
            )
            .expect(2)
            .mount(&server)
            .await;

        let portal = HttpPortal::new(test_config(&server.uri())).unwrap();
        let token = SessionToken::new("JSESSIONID=s1").unwrap();
        for _ in 0..2 {
            let reply = portal.search(&token, &query()).await.unwrap();
            assert_eq!(reply, PortalReply::Count(1234));
        }
    }

    #[tokio::test]
    async fn search_redirect_means_expired() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/search"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", "/landing"))
            .mount(&server)
            .await;

        let portal = HttpPortal::new(test_config(&server.uri())).unwrap();
        let token = SessionToken::new("JSESSIONID=stale").unwrap();
        let reply = portal.search(&token, &query()).await.unwrap();
        assert_eq!(reply, PortalReply::SessionExpired);
    }

    #[tokio::test]
    async fn search_zero_marker_is_zero() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<p>No se han encontrado resultados</p>"),
            )
            .mount(&server)
            .await;

        let portal = HttpPortal::new(test_config(&server.uri())).unwrap();
        let token = SessionToken::new("JSESSIONID=s1").unwrap();
        assert_eq!(
            portal.search(&token, &query()).await.unwrap(),
            PortalReply::Count(0)
        );
    }

    #[tokio::test]
    async fn search_times_out() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/search"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(1_000)))
            .mount(&server)
            .await;

        let config = PortalConfig {
            timeout_ms: 100,
            ..test_config(&server.uri())
        };
        let portal = HttpPortal::new(config).unwrap();
        let token = SessionToken::new("JSESSIONID=s1").unwrap();
        let err = portal.search(&token, &query()).await.unwrap_err();
        assert!(matches!(err, PortalError::Timeout(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let portal = HttpPortal::new(PortalConfig {
            base_url: "http://localhost:4000/".into(),
            ..PortalConfig::default()
        })
        .unwrap();
        assert_eq!(
            portal.url("/search/search.action").unwrap().as_str(),
            "http://localhost:4000/search/search.action"
        );
    }
}
