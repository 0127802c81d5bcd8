//! The single request pattern shared by every upstream: one GET, no retries,
//! JSON back.

use crate::error::{SetupError, UpstreamError};
use anyhow::{anyhow, Context};
use reqwest::Url;
use serde_json::Value;
use std::time::{Duration, Instant};

/// User-Agent sent to upstream services.
const REQWEST_USER_AGENT: &str = concat!("marquee/", env!("CARGO_PKG_VERSION"));

/// How much of an error response body is kept for diagnostics.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Build the HTTP client used for one upstream.
pub(crate) fn build_client(
    timeout: Duration,
    connect_timeout: Duration,
) -> Result<reqwest::Client, SetupError> {
    reqwest::Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(timeout)
        .user_agent(REQWEST_USER_AGENT)
        .build()
        .context("Unable to create the Reqwest client")
        .map_err(SetupError::Network)
}

/// Parse a configured upstream URL, rejecting URLs that paths can't be
/// appended to, such as `mailto:` URLs.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, SetupError> {
    let url = Url::parse(raw)
        .with_context(|| format!("parsing upstream URL {:?}", raw))
        .map_err(SetupError::InvalidConfiguration)?;
    if url.cannot_be_a_base() {
        return Err(SetupError::InvalidConfiguration(anyhow!(
            "upstream URL {:?} cannot have paths appended",
            raw
        )));
    }
    Ok(url)
}

/// An upstream credential and the query parameter it is sent in.
pub(crate) struct Credential<'a> {
    /// The query parameter name, such as `apikey`.
    pub param: &'static str,
    /// The secret itself. Never logged.
    pub value: &'a str,
}

/// Send a GET request and decode the response body as JSON.
///
/// `params` are logged at debug level. The credential is appended separately
/// so that it never is.
pub(crate) async fn get_json(
    client: &reqwest::Client,
    service: &'static str,
    url: Url,
    params: &[(&str, String)],
    credential: Credential<'_>,
) -> Result<Value, UpstreamError> {
    tracing::debug!(
        r#type = "discovery.upstream.request",
        %service,
        %url,
        ?params,
        "Calling upstream"
    );
    let started = Instant::now();

    let result = send(client, service, url, params, credential).await;

    match &result {
        Ok(_) => tracing::debug!(
            r#type = "discovery.upstream.response",
            %service,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Upstream responded"
        ),
        Err(error) => tracing::warn!(
            r#type = "discovery.upstream.error",
            %service,
            %error,
            upstream_status = error.upstream_status(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Upstream request failed"
        ),
    }

    result
}

/// The request itself, without logging.
async fn send(
    client: &reqwest::Client,
    service: &'static str,
    url: Url,
    params: &[(&str, String)],
    credential: Credential<'_>,
) -> Result<Value, UpstreamError> {
    let response = client
        .get(url)
        .query(params)
        .query(&[(credential.param, credential.value)])
        .send()
        .await
        // reqwest errors print the request URL, which carries the credential.
        .map_err(|source| UpstreamError::Transport {
            service,
            source: source.without_url(),
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(UpstreamError::Status {
            service,
            status: status.as_u16(),
            body: body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect(),
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|error| UpstreamError::Decode {
            service,
            reason: error.without_url().to_string(),
        })
}
