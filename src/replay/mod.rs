//! Query replay against the remote capture service.
//!
//! Qualifying payloads are re-issued as blocking HTTPS GETs with the
//! payload in the `q` query parameter, authenticated with a client
//! certificate. The pipeline talks to the [`QueryService`] trait rather
//! than the HTTP client directly, so replay bookkeeping is testable
//! without a network.

use std::fs;
use std::time::Duration;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::QueryConfig;

/// Result of replaying one payload. The service answered; whether it
/// liked the query is carried in the status split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Status below 400.
    Success { status: u16, body: String },
    /// Status 400 and above.
    Failure { status: u16, body: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The TLS handshake itself failed - almost always a missing or
    /// rejected client credential. Not worth retrying; the run aborts.
    #[error("TLS handshake with {host} failed: {message}")]
    TlsHandshake { host: String, message: String },
    /// Any other transport-level failure; recorded and the run continues.
    #[error("request to {host} failed: {message}")]
    Transport { host: String, message: String },
}

/// Seam between the pipeline and the wire.
pub trait QueryService {
    fn send(&self, payload: &str) -> Result<QueryOutcome, QueryError>;
}

/// Blocking mutual-TLS client for the capture service.
pub struct HttpsQueryClient {
    http: reqwest::blocking::Client,
    host: String,
}

impl HttpsQueryClient {
    /// Build the client from config: loads the PEM certificate and key,
    /// and only disables server verification when the config explicitly
    /// asks for it.
    pub fn new(config: &QueryConfig) -> Result<Self> {
        let mut pem = fs::read(&config.client_cert).with_context(|| {
            format!(
                "failed to read client certificate: {}",
                config.client_cert.display()
            )
        })?;
        pem.extend(fs::read(&config.client_key).with_context(|| {
            format!("failed to read client key: {}", config.client_key.display())
        })?);

        let identity = reqwest::Identity::from_pem(&pem)
            .context("failed to parse client certificate/key PEM")?;

        let mut builder = reqwest::blocking::Client::builder()
            .identity(identity)
            .timeout(Duration::from_secs(config.timeout_secs));

        if config.danger_accept_invalid_certs {
            warn!("server certificate verification is DISABLED for this run");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().context("failed to build HTTPS client")?;

        Ok(Self {
            http,
            host: config.host.clone(),
        })
    }

    fn classify(&self, err: reqwest::Error) -> QueryError {
        if is_tls_failure(&err) {
            QueryError::TlsHandshake {
                host: self.host.clone(),
                message: format_chain(&err),
            }
        } else {
            QueryError::Transport {
                host: self.host.clone(),
                message: format_chain(&err),
            }
        }
    }
}

impl QueryService for HttpsQueryClient {
    fn send(&self, payload: &str) -> Result<QueryOutcome, QueryError> {
        let url = format!("https://{}/", self.host);
        debug!(%url, payload, "replaying query");

        let response = self
            .http
            .get(&url)
            .query(&[("q", payload)])
            .send()
            .map_err(|e| self.classify(e))?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| self.classify(e))?;

        if status < 400 {
            Ok(QueryOutcome::Success { status, body })
        } else {
            Ok(QueryOutcome::Failure { status, body })
        }
    }
}

/// Pull the human-readable answer out of a service response body:
/// `{"fulfillment": [{"text": ...}]}`.
pub fn fulfillment_text(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("fulfillment")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(str::to_string)
}

/// reqwest does not expose a TLS error kind, so walk the source chain and
/// look for handshake vocabulary.
fn is_tls_failure(err: &reqwest::Error) -> bool {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(cause) = current {
        let text = cause.to_string().to_ascii_lowercase();
        if text.contains("tls")
            || text.contains("ssl")
            || text.contains("certificate")
            || text.contains("handshake")
        {
            return true;
        }
        current = cause.source();
    }
    false
}

/// Flatten an error and its causes into one line for the artifacts.
fn format_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut current = std::error::Error::source(err);
    while let Some(cause) = current {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        current = cause.source();
    }
    message
}
