// ── Controller session ──

use secrecy::ExposeSecret;
use tracing::info;

use fmcly_api::FmcClient;

use crate::config::ControllerConfig;
use crate::error::CoreError;

/// Authenticate against the controller described by `config`.
///
/// The returned client carries the access token, is scoped to the
/// configured domain (or the user's default domain), and knows the
/// controller version used to gate FQDN lookups.
pub async fn connect(config: &ControllerConfig) -> Result<FmcClient, CoreError> {
    if config.username.is_empty() || config.password.expose_secret().is_empty() {
        return Err(CoreError::Config {
            message: "username and password are required".into(),
        });
    }

    info!(
        url = %config.url,
        domain = config.domain.as_deref().unwrap_or("<default>"),
        "connecting to management center"
    );

    let client = FmcClient::login(
        config.url.as_str(),
        &config.username,
        &config.password,
        config.domain.as_deref(),
        &config.transport(),
    )
    .await?;

    info!(
        domain_uuid = client.domain_uuid(),
        version = client.server_version().unwrap_or("unknown"),
        "session established"
    );
    Ok(client)
}
