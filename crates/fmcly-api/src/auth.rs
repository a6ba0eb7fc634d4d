// Token authentication
//
// The management center issues an access token from a basic-auth POST.
// The token comes back in response headers together with the default
// domain and the list of domains the user may act in.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::client::FmcClient;
use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::DomainInfo;

const TOKEN_PATH: &str = "api/fmc_platform/v1/auth/generatetoken";
// Header names are matched case-insensitively; `HeaderName::from_static`
// requires the lowercase form.
const ACCESS_TOKEN_HEADER: &str = "x-auth-access-token";
const REFRESH_TOKEN_HEADER: &str = "x-auth-refresh-token";
const DOMAIN_UUID_HEADER: &str = "domain_uuid";
const DOMAINS_HEADER: &str = "domains";

/// Result of a successful token generation.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    /// Default domain of the authenticated user.
    pub domain_uuid: String,
    /// Every domain advertised by the controller.
    pub domains: Vec<DomainInfo>,
}

impl AuthToken {
    /// Pick the domain to operate in: the named one, or the default.
    pub fn select_domain(&self, name: Option<&str>) -> Result<String, Error> {
        match name {
            None => Ok(self.domain_uuid.clone()),
            Some(name) => self
                .domains
                .iter()
                .find(|d| d.name == name)
                .map(|d| d.uuid.clone())
                .ok_or_else(|| Error::UnknownDomain { name: name.into() }),
        }
    }
}

impl FmcClient {
    /// Request an access token with username/password basic auth.
    pub async fn generate_token(
        http: &reqwest::Client,
        base_url: &Url,
        username: &str,
        password: &SecretString,
    ) -> Result<AuthToken, Error> {
        let url = base_url.join(TOKEN_PATH)?;
        debug!("requesting token at {}", url);

        let resp = http
            .post(url)
            .basic_auth(username, Some(password.expose_secret()))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("token request failed (HTTP {status}): {body}"),
            });
        }

        let headers = resp.headers();
        let access_token = header_str(headers, ACCESS_TOKEN_HEADER).ok_or_else(|| {
            Error::Authentication {
                message: format!("response did not carry {ACCESS_TOKEN_HEADER}"),
            }
        })?;
        let domain_uuid =
            header_str(headers, DOMAIN_UUID_HEADER).ok_or_else(|| Error::Authentication {
                message: format!("response did not carry {DOMAIN_UUID_HEADER}"),
            })?;
        let domains = header_str(headers, DOMAINS_HEADER)
            .and_then(|raw| serde_json::from_str::<Vec<DomainInfo>>(&raw).ok())
            .unwrap_or_default();

        debug!(domains = domains.len(), "token issued");
        Ok(AuthToken {
            access_token: SecretString::from(access_token),
            refresh_token: header_str(headers, REFRESH_TOKEN_HEADER).map(SecretString::from),
            domain_uuid,
            domains,
        })
    }

    /// Authenticate, select a domain, and build a token-carrying client.
    ///
    /// The controller version is fetched once here so callers can gate
    /// version-dependent lookups without another round trip.
    pub async fn login(
        base_url: &str,
        username: &str,
        password: &SecretString,
        domain: Option<&str>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let bootstrap = transport.build_client()?;
        let token = Self::generate_token(&bootstrap, &base, username, password).await?;
        let domain_uuid = token.select_domain(domain)?;

        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(token.access_token.expose_secret()).map_err(|e| {
            Error::Authentication {
                message: format!("invalid access token header value: {e}"),
            }
        })?;
        value.set_sensitive(true);
        headers.insert(HeaderName::from_static(ACCESS_TOKEN_HEADER), value);

        let http = transport.build_client_with_headers(headers)?;
        let mut client = Self::with_client(http, base, domain_uuid);
        if let Some(version) = client.fetch_server_version().await? {
            debug!(version = %version, "controller version");
            client = client.with_server_version(version);
        }
        Ok(client)
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> AuthToken {
        AuthToken {
            access_token: SecretString::from("t".to_owned()),
            refresh_token: None,
            domain_uuid: "global-uuid".into(),
            domains: vec![
                DomainInfo {
                    name: "Global".into(),
                    uuid: "global-uuid".into(),
                },
                DomainInfo {
                    name: "Global/Branch".into(),
                    uuid: "branch-uuid".into(),
                },
            ],
        }
    }

    #[test]
    fn select_domain_defaults_to_token_domain() {
        assert_eq!(token().select_domain(None).ok().as_deref(), Some("global-uuid"));
    }

    #[test]
    fn select_domain_by_name() {
        assert_eq!(
            token().select_domain(Some("Global/Branch")).ok().as_deref(),
            Some("branch-uuid")
        );
    }

    #[test]
    fn select_unknown_domain_fails() {
        assert!(matches!(
            token().select_domain(Some("Nope")),
            Err(Error::UnknownDomain { .. })
        ));
    }
}
