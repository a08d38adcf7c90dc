// # IP Source Trait
//
// Defines the interface for discovering the caller's public IPv4 address.
//
// ## Implementations
//
// - HTTP echo service: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let current_ip = source.current().await?;
//     println!("public address: {}", current_ip);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for IP source implementations
///
/// # Trust Level: Semi-Trusted
///
/// IP sources are observers, not decision-makers.
///
/// ## Allowed Capabilities
/// - ✅ Perform one outbound request per call
/// - ✅ Strip transport noise (surrounding whitespace) from the answer
///
/// ## Forbidden Capabilities
/// - ❌ Retry or sleep (the engine's interval is the only throttle)
/// - ❌ Cache the previous answer between calls
/// - ❌ Decide whether the DNS record needs updating
///
/// # Address Format
///
/// The address is an opaque string. It is not parsed or validated here; the
/// engine compares it verbatim against the provider's published value.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The address as returned by the source
    /// - `Err(Error::IpResolution)`: If the address could not be determined
    async fn current(&self) -> Result<String, crate::Error>;

    /// Short identifier of the source (for logging)
    fn source_name(&self) -> &str;
}
