//! Typed client for the Fastly REST API.

pub mod types;

mod entries;
mod kv;
mod services;
mod versioned;

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use types::ErrorBody;

pub const DEFAULT_ENDPOINT: &str = "https://api.fastly.com";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API endpoint '{0}'")]
    Endpoint(String),

    #[error("failed to reach the Fastly API")]
    Transport(#[from] reqwest::Error),

    #[error("Fastly API returned {status}: {message}")]
    Status {
        status: u16,
        message: String,
        detail: Option<String>,
    },

    #[error("failed to decode Fastly API response")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    #[cfg(test)]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}

/// Build an [`ApiError::Status`] from a non-2xx response body.
fn status_error(status: u16, body: &str) -> ApiError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .msg
        .or(parsed.title)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "no error message".to_string()
            } else {
                trimmed.to_string()
            }
        });
    let detail = parsed.detail.map(|d| match d {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    });
    ApiError::Status {
        status,
        message,
        detail,
    }
}

pub struct Client {
    http: reqwest::Client,
    base: Url,
    token: String,
}

impl Client {
    pub fn new(endpoint: &str, token: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base = Url::parse(endpoint).map_err(|_| ApiError::Endpoint(endpoint.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Endpoint(endpoint.to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fastly-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base,
            token: token.to_string(),
        })
    }

    /// Endpoint URL with each segment percent-encoded.
    pub(crate) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // `new` rejects cannot-be-a-base URLs, so this never fails.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, path = url.path(), "fastly api request");
        self.http
            .request(method, url)
            .header("Fastly-Key", &self.token)
            .header(ACCEPT, "application/json")
    }

    /// Send and turn non-2xx responses into [`ApiError::Status`].
    pub(crate) async fn execute(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = req.send().await?;
        let status = resp.status();
        debug!(status = status.as_u16(), "fastly api response");
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(status_error(status.as_u16(), &body))
    }

    pub(crate) async fn json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let bytes = self.execute(req).await?.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ApiError::Decode)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.url(segments);
        self.json(self.request(Method::GET, url)).await
    }

    pub(crate) async fn send_form<T, I>(
        &self,
        method: Method,
        segments: &[&str],
        input: &I,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        I: Serialize + ?Sized,
    {
        let url = self.url(segments);
        self.json(self.request(method, url).form(input)).await
    }

    pub(crate) async fn put<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.url(segments);
        self.json(self.request(Method::PUT, url)).await
    }

    /// DELETE and discard the `{"status": "ok"}` body.
    pub(crate) async fn delete(&self, segments: &[&str]) -> Result<(), ApiError> {
        let url = self.url(segments);
        self.execute(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::Server) -> Client {
        Client::new(&server.url(), "s3cr3t", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn rejects_invalid_endpoint() {
        assert!(matches!(
            Client::new("not a url", "t", Duration::from_secs(1)),
            Err(ApiError::Endpoint(_))
        ));
        assert!(matches!(
            Client::new("mailto:ops@example.com", "t", Duration::from_secs(1)),
            Err(ApiError::Endpoint(_))
        ));
    }

    #[test]
    fn url_segments_are_encoded() {
        let c = Client::new("https://api.fastly.com", "t", Duration::from_secs(1)).unwrap();
        let url = c.url(&["service", "abc", "version", "1", "backend", "my backend/1"]);
        assert_eq!(
            url.as_str(),
            "https://api.fastly.com/service/abc/version/1/backend/my%20backend%2F1"
        );
    }

    #[tokio::test]
    async fn sends_token_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/service/abc/version")
            .match_header("fastly-key", "s3cr3t")
            .match_header("accept", "application/json")
            .with_body(r#"[{"number":1,"active":true,"locked":true}]"#)
            .create_async()
            .await;

        let versions = client(&server).list_versions("abc").await.unwrap();
        assert_eq!(versions.len(), 1);
        assert!(versions[0].active);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn decodes_error_bodies() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/service/abc/version")
            .with_status(401)
            .with_body(r#"{"msg":"Provided credentials are missing or invalid","detail":"bad token"}"#)
            .create_async()
            .await;

        let err = client(&server).list_versions("abc").await.unwrap_err();
        match err {
            ApiError::Status {
                status,
                message,
                detail,
            } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Provided credentials are missing or invalid");
                assert_eq!(detail.as_deref(), Some("bad token"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn falls_back_to_raw_body_for_unknown_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/service/abc/version/3/domain/www.example.com")
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        let err = client(&server)
            .delete(&["service", "abc", "version", "3", "domain", "www.example.com"])
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.to_string(), "Fastly API returned 502: Bad Gateway");
    }

    #[tokio::test]
    async fn form_bodies_are_url_encoded() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/service/abc/version/2/acl")
            .match_body(Matcher::UrlEncoded("name".into(), "blocklist".into()))
            .with_body(r#"{"id":"x1","name":"blocklist","service_id":"abc","version":2}"#)
            .create_async()
            .await;

        let input = types::AclInput {
            name: Some("blocklist".into()),
        };
        let acl: types::Acl = client(&server)
            .send_form(Method::POST, &["service", "abc", "version", "2", "acl"], &input)
            .await
            .unwrap();
        assert_eq!(acl.id, "x1");
        mock.assert_async().await;
    }
}
