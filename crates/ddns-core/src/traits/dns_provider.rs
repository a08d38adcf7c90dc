// # DNS Provider Trait
//
// Defines the interface for reading and replacing the managed A record via a
// provider API.
//
// ## Implementations
//
// - GoDaddy: `ddns-provider-godaddy` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let published = provider.get_record("example.com", "home").await?;
//     if published != "203.0.113.9" {
//         provider.update_record("example.com", "home", "203.0.113.9").await?;
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for DNS provider implementations
///
/// Credentials are owned by the implementation; callers pass only the
/// record coordinates.
///
/// # Trust Level: Untrusted
///
/// ## Allowed Capabilities
/// - ✅ Perform HTTP/HTTPS API calls to the provider's endpoints only
/// - ✅ Parse provider-specific responses
/// - ✅ Return success or failure (the engine logs and moves on)
///
/// ## Forbidden Capabilities
/// - ❌ Spawn tasks or threads
/// - ❌ Implement retry logic or backoff
/// - ❌ Cache the published or written value between calls
/// - ❌ Decide whether an update is needed (owned by `DdnsEngine`)
///
/// The provider is the only source of truth for the record. Every cycle
/// reads it fresh.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Read the address currently published in the A record
    ///
    /// # Parameters
    ///
    /// - `domain`: The registered domain (e.g., "example.com")
    /// - `subdomain`: The record name (e.g., "home", or "@" for the apex)
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The `data` value of the first matching record
    /// - `Err(Error::EmptyRecordSet)`: If the provider has no such record
    /// - `Err(Error::RecordRead)`: If the request failed
    async fn get_record(&self, domain: &str, subdomain: &str) -> Result<String, crate::Error>;

    /// Replace the A record with a new address
    ///
    /// Replace-by-type-and-name: after a successful call at most one A record
    /// with this name exists. Whether a missing record is created or rejected
    /// is up to the provider; its answer is surfaced unchanged.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The provider accepted the replacement
    /// - `Err(Error::RecordWrite)`: If the request failed
    async fn update_record(
        &self,
        domain: &str,
        subdomain: &str,
        ip: &str,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
