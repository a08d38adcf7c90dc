//! Configuration types for the DDNS system
//!
//! This module defines all configuration structures used throughout the crate.
//! A [`DdnsConfig`] is built once at startup and never mutated afterwards.

use serde::Deserialize;

/// Default polling interval in seconds
pub const DEFAULT_INTERVAL_SECS: u64 = 360;

/// Default IPv4 echo service
pub const DEFAULT_IP_SOURCE_URL: &str = "https://v4.ident.me/";

/// Default GoDaddy production API base
pub const DEFAULT_API_BASE: &str = "https://api.godaddy.com";

/// Default per-request HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Record name used for the zone apex
pub const APEX_RECORD: &str = "@";

/// Main DDNS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DdnsConfig {
    /// IP source configuration
    #[serde(default)]
    pub ip_source: IpSourceConfig,

    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// The A record to manage
    pub record: RecordConfig,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl DdnsConfig {
    /// Create a configuration from the four explicit values, defaults elsewhere
    pub fn new(
        key: impl Into<String>,
        secret: impl Into<String>,
        domain: impl Into<String>,
        subdomain: impl Into<String>,
    ) -> Self {
        Self {
            ip_source: IpSourceConfig::default(),
            provider: ProviderConfig::new(Credentials::new(key, secret)),
            record: RecordConfig::new(domain, subdomain),
            engine: EngineConfig::default(),
        }
    }

    /// Validate the configuration
    ///
    /// Domain, key and secret are checked in that order so the first missing
    /// value is the one reported.
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.record.validate()?;
        self.provider.validate()?;
        self.ip_source.validate()?;
        self.engine.validate()?;
        Ok(())
    }
}

/// GoDaddy API key pair
///
/// The Debug implementation never exposes the values.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    key: String,
    secret: String,
}

impl Credentials {
    /// Create a credential pair
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// API key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// API secret
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &"<REDACTED>")
            .field("secret", &"<REDACTED>")
            .finish()
    }
}

/// IP source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IpSourceConfig {
    /// URL of a service that echoes the caller's IPv4 address as plain text
    #[serde(default = "default_ip_source_url")]
    pub url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl IpSourceConfig {
    /// Validate the IP source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.url.is_empty() {
            return Err(crate::Error::config("IP source URL cannot be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("IP source timeout must be > 0"));
        }
        Ok(())
    }
}

impl Default for IpSourceConfig {
    fn default() -> Self {
        Self {
            url: default_ip_source_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// DNS provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// API credentials
    pub credentials: Credentials,

    /// API base URL (production by default)
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Read records but never send the replacement
    #[serde(default)]
    pub dry_run: bool,
}

impl ProviderConfig {
    /// Create a provider configuration with defaults
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
            dry_run: false,
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.credentials.secret.is_empty() {
            return Err(crate::Error::config("You need to provide your API secret"));
        }
        if self.credentials.key.is_empty() {
            return Err(crate::Error::config("You need to provide your API key"));
        }
        if self.api_base.is_empty() {
            return Err(crate::Error::config("Provider API base cannot be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("Provider timeout must be > 0"));
        }
        Ok(())
    }
}

/// DNS record configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RecordConfig {
    /// Registered domain (e.g., "example.com")
    pub domain: String,

    /// Host part of the A record (e.g., "home"); empty means the apex
    #[serde(default)]
    pub subdomain: String,
}

impl RecordConfig {
    /// Create a new record configuration
    pub fn new(domain: impl Into<String>, subdomain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            subdomain: subdomain.into(),
        }
    }

    /// Record name as the provider expects it (`@` for the apex)
    pub fn name(&self) -> &str {
        if self.subdomain.is_empty() {
            APEX_RECORD
        } else {
            &self.subdomain
        }
    }

    /// Fully qualified name, for logs
    pub fn fqdn(&self) -> String {
        match self.name() {
            APEX_RECORD => self.domain.clone(),
            name => format!("{}.{}", name, self.domain),
        }
    }

    /// Validate the record configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.domain.is_empty() {
            return Err(crate::Error::config("You need to provide your domain"));
        }
        Ok(())
    }
}

/// What the engine does when one of the two lookups failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchPolicy {
    /// Skip the write for the cycle if either lookup failed
    #[default]
    SkipOnFailure,

    /// Compare the empty placeholder like any other value
    ///
    /// A failed lookup then counts as a mismatch and the record is
    /// overwritten with whatever the resolver returned, possibly `""`.
    Legacy,
}

/// Engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Seconds to sleep between reconcile cycles
    ///
    /// Check the provider's rate limits before setting this low.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Handling of failed lookups
    #[serde(default)]
    pub mismatch_policy: MismatchPolicy,
}

impl EngineConfig {
    /// Validate the engine configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.interval_secs == 0 {
            return Err(crate::Error::config("Polling interval must be > 0"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            mismatch_policy: MismatchPolicy::default(),
        }
    }
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

fn default_ip_source_url() -> String {
    DEFAULT_IP_SOURCE_URL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_new_uses_defaults() {
        let config = DdnsConfig::new("key", "secret", "example.com", "home");

        assert_eq!(config.engine.interval_secs, 360);
        assert_eq!(config.engine.mismatch_policy, MismatchPolicy::SkipOnFailure);
        assert_eq!(config.ip_source.url, "https://v4.ident.me/");
        assert_eq!(config.provider.api_base, "https://api.godaddy.com");
        assert!(!config.provider.dry_run);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_domain_is_reported_first() {
        let config = DdnsConfig::new("", "", "", "home");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("domain")));
    }

    #[test]
    fn test_missing_secret_and_key() {
        let err = DdnsConfig::new("key", "", "example.com", "")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("secret")));

        let err = DdnsConfig::new("", "secret", "example.com", "")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("key")));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = DdnsConfig::new("key", "secret", "example.com", "home");
        config.engine.interval_secs = 0;
        assert!(config.validate().unwrap_err().is_fatal());
    }

    #[test]
    fn test_empty_subdomain_is_apex() {
        let apex = RecordConfig::new("example.com", "");
        assert_eq!(apex.name(), "@");
        assert_eq!(apex.fqdn(), "example.com");

        let home = RecordConfig::new("example.com", "home");
        assert_eq!(home.name(), "home");
        assert_eq!(home.fqdn(), "home.example.com");
    }

    #[test]
    fn test_credentials_not_exposed_in_debug() {
        let config = DdnsConfig::new("key_12345", "secret_67890", "example.com", "home");
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("key_12345"));
        assert!(!debug_str.contains("secret_67890"));
        assert!(debug_str.contains("<REDACTED>"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: DdnsConfig = serde_json::from_value(serde_json::json!({
            "provider": { "credentials": { "key": "k", "secret": "s" } },
            "record": { "domain": "example.com" },
            "engine": { "mismatch_policy": "legacy" }
        }))
        .unwrap();

        assert_eq!(config.record.name(), "@");
        assert_eq!(config.engine.interval_secs, 360);
        assert_eq!(config.engine.mismatch_policy, MismatchPolicy::Legacy);
        assert_eq!(config.provider.timeout_secs, 30);
        assert_eq!(config.ip_source.timeout_secs, 30);
        assert!(config.validate().is_ok());
    }
}
