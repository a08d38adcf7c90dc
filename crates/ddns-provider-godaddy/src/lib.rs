// # GoDaddy DNS Provider
//
// This crate provides a GoDaddy DNS provider implementation for the DDNS system.
//
// ## Behaviour
//
// - ✅ One HTTP request per call (GET to read, PUT to replace)
// - ✅ Full error propagation to the engine (the engine logs and moves on)
// - ✅ HTTP timeout configured (30 seconds by default)
// - ✅ Specific error messages for HTTP status codes (401/403, 404, 422, 429, 5xx)
// - ✅ Dry-run mode for safe testing
// - ❌ NO retry or backoff (the polling interval is the only throttle)
// - ❌ NO caching (every cycle re-reads the published value)
//
// ## Security Requirements
//
// - API key and secret NEVER appear in logs or Debug output
// - Provider MUST fail fast if the key or secret is empty
//
// ## API Reference
//
// - Domains API v1: https://developer.godaddy.com/doc/endpoint/domains
// - Read records:    GET `/v1/domains/{domain}/records/A/{name}`
// - Replace records: PUT `/v1/domains/{domain}/records/A/{name}` with `[{"data": "..."}]`
// - Auth header:     `Authorization: sso-key {key}:{secret}`

use async_trait::async_trait;
use ddns_core::config::{Credentials, ProviderConfig, RecordConfig};
use ddns_core::traits::DnsProvider;
use ddns_core::{Error, Result};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record type managed by this provider
const RECORD_TYPE: &str = "A";

/// One entry of the records array; other fields are ignored
#[derive(Debug, Deserialize)]
struct GoDaddyRecord {
    data: String,
}

/// Replacement payload entry
#[derive(Debug, Serialize)]
struct RecordData<'a> {
    data: &'a str,
}

/// Error body returned on non-2xx responses
#[derive(Debug, Deserialize)]
struct GoDaddyError {
    code: Option<String>,
    message: Option<String>,
}

/// GoDaddy DNS provider
///
/// Stateless and single-shot: it holds the credentials and an HTTP client,
/// nothing else.
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform the GET request
/// - Log the intended PUT payload
/// - **NOT** actually modify the record
pub struct GoDaddyProvider {
    /// API key pair
    /// ⚠️ NEVER log this value
    credentials: Credentials,

    /// API base URL
    api_base: Url,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform GET requests but skip PUT updates
    dry_run: bool,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for GoDaddyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoDaddyProvider")
            .field("credentials", &"<REDACTED>")
            .field("api_base", &self.api_base.as_str())
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl GoDaddyProvider {
    /// Create a new GoDaddy provider
    ///
    /// # Parameters
    ///
    /// - `credentials`: Production API key and secret
    /// - `api_base`: API base URL (`config::DEFAULT_API_BASE` for production)
    /// - `timeout`: Per-request timeout
    /// - `dry_run`: If true, perform GET requests but skip PUT updates
    pub fn new(
        credentials: Credentials,
        api_base: &str,
        timeout: Duration,
        dry_run: bool,
    ) -> Result<Self> {
        if credentials.key().is_empty() || credentials.secret().is_empty() {
            return Err(Error::config("GoDaddy API key and secret are required"));
        }

        let api_base = Url::parse(api_base)
            .map_err(|e| Error::config(format!("Invalid API base URL '{}': {}", api_base, e)))?;
        if api_base.cannot_be_a_base() {
            return Err(Error::config(format!(
                "API base URL '{}' cannot carry a path",
                api_base
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            credentials,
            api_base,
            client,
            dry_run,
        })
    }

    /// Create from the configuration section
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;

        if config.dry_run {
            tracing::warn!("GoDaddy provider running in DRY-RUN mode - no changes will be made");
        }

        Self::new(
            config.credentials.clone(),
            &config.api_base,
            Duration::from_secs(config.timeout_secs),
            config.dry_run,
        )
    }

    /// Whether updates are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// `{base}/v1/domains/{domain}/records/A/{subdomain}`, each segment percent-encoded
    fn records_url(&self, domain: &str, subdomain: &str) -> Url {
        let mut url = self.api_base.clone();
        // Checked in new(): the base always carries a path
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v1", "domains", domain, "records", RECORD_TYPE, subdomain]);
        }
        url
    }

    fn authorization(&self) -> String {
        format!(
            "sso-key {}:{}",
            self.credentials.key(),
            self.credentials.secret()
        )
    }

    /// Turn a non-2xx response into a readable message
    async fn describe_failure(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        describe_status(status, &body)
    }
}

/// Map an HTTP status and GoDaddy error body to a message
fn describe_status(status: StatusCode, body: &str) -> String {
    let detail = match serde_json::from_str::<GoDaddyError>(body) {
        Ok(GoDaddyError {
            code: Some(code),
            message: Some(message),
        }) => format!("{}: {}", code, message),
        Ok(GoDaddyError {
            message: Some(message),
            ..
        }) => message,
        _ => body.to_string(),
    };

    match status.as_u16() {
        401 | 403 => format!(
            "Authentication failed: Invalid API key/secret or insufficient permissions. Status: {}",
            status
        ),
        404 => format!("Domain or record not found. Status: {} - {}", status, detail),
        422 => format!("Request rejected as invalid. Status: {} - {}", status, detail),
        429 => format!(
            "Rate limit exceeded. Increase the polling interval. Status: {}",
            status
        ),
        500..=599 => format!("GoDaddy server error (transient): {} - {}", status, detail),
        _ => format!("Unexpected response: {} - {}", status, detail),
    }
}

#[async_trait]
impl DnsProvider for GoDaddyProvider {
    /// Read the published address
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /v1/domains/example.com/records/A/home
    /// Authorization: sso-key <key>:<secret>
    /// ```
    async fn get_record(&self, domain: &str, subdomain: &str) -> Result<String> {
        let record = RecordConfig::new(domain, subdomain).fqdn();
        let url = self.records_url(domain, subdomain);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Authorization", self.authorization())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::record_read(&record, format!("HTTP request failed: {}", e)))?;

        tracing::debug!("Response Status: {}", response.status());

        if !response.status().is_success() {
            let message = Self::describe_failure(response).await;
            return Err(Error::record_read(&record, message));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::record_read(&record, format!("Failed to read response: {}", e)))?;

        let records: Vec<GoDaddyRecord> = serde_json::from_str(&body).map_err(|e| {
            tracing::debug!("Unparseable response body: {}", body);
            Error::record_read(&record, format!("Failed to parse response: {}", e))
        })?;

        records
            .into_iter()
            .next()
            .map(|r| r.data)
            .ok_or_else(|| Error::empty_record_set(record))
    }

    /// Replace the A record
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /v1/domains/example.com/records/A/home
    /// Authorization: sso-key <key>:<secret>
    ///
    /// [{ "data": "203.0.113.9" }]
    /// ```
    async fn update_record(&self, domain: &str, subdomain: &str, ip: &str) -> Result<()> {
        let record = RecordConfig::new(domain, subdomain).fqdn();
        let url = self.records_url(domain, subdomain);
        let payload = [RecordData { data: ip }];

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PUT request to {} with payload: {}",
                url,
                serde_json::to_string(&payload)?
            );
            return Ok(());
        }

        tracing::debug!("PUT {}", url);

        let response = self
            .client
            .put(url)
            .header("Authorization", self.authorization())
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::record_write(&record, ip, format!("HTTP request failed: {}", e)))?;

        tracing::debug!("Response Status: {}", response.status());

        if !response.status().is_success() {
            let message = Self::describe_failure(response).await;
            return Err(Error::record_write(&record, ip, message));
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "godaddy"
    }
}
