// Management center HTTP client
//
// Wraps `reqwest::Client` with domain-scoped URL construction, paginated
// listing, and error-envelope decoding. Authentication lives in `auth.rs`
// as inherent methods so this module stays focused on transport mechanics.

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::types::{ErrorEnvelope, Page, ServerVersion};

/// Items requested per page when walking a collection.
pub const PAGE_LIMIT: u64 = 1000;

const CONFIG_ROOT: &str = "api/fmc_config/v1/domain";
const SERVER_VERSION_PATH: &str = "api/fmc_platform/v1/info/serverversion";

/// Raw HTTP client for the management center's configuration API.
///
/// Every relative path handed to this client is resolved under
/// `{base}/api/fmc_config/v1/domain/{domainUUID}/`. The access token is
/// carried as a default header on the wrapped `reqwest::Client`.
pub struct FmcClient {
    http: reqwest::Client,
    base_url: Url,
    domain_uuid: String,
    server_version: Option<String>,
}

impl FmcClient {
    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    ///
    /// Use this when the token header is already installed, or in tests
    /// against a mock server.
    pub fn with_client(http: reqwest::Client, mut base_url: Url, domain_uuid: String) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            http,
            base_url,
            domain_uuid,
            server_version: None,
        }
    }

    /// Record the controller version (normally fetched during login).
    pub fn with_server_version(mut self, version: impl Into<String>) -> Self {
        self.server_version = Some(version.into());
        self
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The domain every configuration request is scoped to.
    pub fn domain_uuid(&self) -> &str {
        &self.domain_uuid
    }

    /// The controller version string, e.g. `"6.4.0 (build 102)"`.
    pub fn server_version(&self) -> Option<&str> {
        self.server_version.as_deref()
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for a path relative to the domain configuration root.
    ///
    /// `policy/accesspolicies` becomes
    /// `{base}/api/fmc_config/v1/domain/{uuid}/policy/accesspolicies`.
    /// Query strings embedded in `path` are preserved.
    pub fn config_url(&self, path: &str) -> Result<Url, Error> {
        let relative = format!(
            "{CONFIG_ROOT}/{}/{}",
            self.domain_uuid,
            path.trim_start_matches('/')
        );
        Ok(self.base_url.join(&relative)?)
    }

    // ── Requests ─────────────────────────────────────────────────────

    /// Send a request with an optional JSON body and decode the JSON reply.
    ///
    /// An empty success body decodes to `Value::Null`.
    pub async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, Error> {
        let url = self.config_url(path)?;
        debug!("{method} {url}");

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let resp = request.send().await?;
        self.handle_response(resp).await
    }

    /// Fetch every item of a collection, walking pages until `paging.count`
    /// items have been seen or the controller returns an empty page.
    pub async fn list_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, Error> {
        let mut all = Vec::new();
        let mut offset: u64 = 0;

        loop {
            let url = self.config_url(path)?;
            debug!("GET {url} offset={offset}");

            let resp = self
                .http
                .get(url)
                .query(&[
                    ("offset", offset.to_string()),
                    ("limit", PAGE_LIMIT.to_string()),
                    ("expanded", "true".to_owned()),
                ])
                .send()
                .await?;
            let page: Page<T> = self.handle_response(resp).await?;

            let received = u64::try_from(page.items.len()).unwrap_or(u64::MAX);
            all.extend(page.items);
            offset = offset.saturating_add(received);

            if received == 0 || offset >= page.paging.count {
                break;
            }
        }

        Ok(all)
    }

    /// Ask the controller for its version string.
    pub async fn fetch_server_version(&self) -> Result<Option<String>, Error> {
        let url = self.base_url.join(SERVER_VERSION_PATH)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        let page: Page<ServerVersion> = self.handle_response(resp).await?;
        Ok(page.items.into_iter().next().map(|v| v.server_version))
    }

    // ── Response handling ────────────────────────────────────────────

    pub(crate) async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            let source = if body.trim().is_empty() { "null" } else { body.as_str() };
            serde_json::from_str(source).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::TokenExpired;
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Error::RateLimited;
        }

        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&raw)
            .ok()
            .and_then(|env| env.summary())
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                }
            });

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }
}
