use crate::core::ConfigProvider;
use crate::utils::error::{PluginError, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Builds a client carrying `token` as bearer auth and the instance's
/// timeout and user agent. `token_field` names the setting in errors.
pub(crate) fn build_client<C: ConfigProvider + ?Sized>(
    config: &C,
    token_field: &str,
    token: &str,
    mut headers: HeaderMap,
) -> Result<Client> {
    let mut auth = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
        PluginError::InvalidConfigValueError {
            field: token_field.to_string(),
            value: "<redacted>".to_string(),
            reason: e.to_string(),
        }
    })?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    let client = Client::builder()
        .default_headers(headers)
        .user_agent(config.user_agent())
        .timeout(Duration::from_secs(config.timeout_seconds()))
        .connect_timeout(Duration::from_secs(config.timeout_seconds()))
        .build()?;
    Ok(client)
}

/// Sends the request and decodes a JSON body. Non-2xx responses keep
/// their body text so the caller can report what the remote said.
pub(crate) async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = request.send().await?;
    let status = response.status();
    tracing::debug!("{} {}", status, response.url());

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(PluginError::GitHubStatusError {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.json::<T>().await?)
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
