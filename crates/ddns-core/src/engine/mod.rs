//! Core DDNS engine
//!
//! The DdnsEngine is responsible for:
//! - Resolving the caller's public address via IpSource
//! - Reading the published address via DnsProvider
//! - Replacing the record when the two differ
//! - Repeating the cycle at a fixed interval
//!
//! ## Architecture
//!
//! ```text
//!          ┌──────────────┐
//!          │  Scheduler   │◄──────── sleep(interval) ────────┐
//!          └──────────────┘                                  │
//!                 │                                          │
//!                 ▼                                          │
//!          ┌──────────────┐                                  │
//!          │  reconcile   │──────────────────────────────────┘
//!          └──────────────┘
//!                 │
//!     ┌───────────┼───────────────┐
//!     ▼           ▼               ▼
//! ┌─────────┐ ┌─────────────┐ ┌───────────────┐
//! │IpSource │ │ DnsProvider │ │  DnsProvider  │
//! │(current)│ │ (get_record)│ │(update_record)│
//! └─────────┘ └─────────────┘ └───────────────┘
//! ```
//!
//! ## Cycle
//!
//! 1. Resolve own IP (failure → empty placeholder, continue)
//! 2. Read published IP (failure → empty placeholder, continue)
//! 3. Log `published -> own`
//! 4. Write own IP if they differ, subject to [`MismatchPolicy`]
//!
//! Errors never leave a cycle. The loop always proceeds to the next tick.

use crate::config::{DdnsConfig, MismatchPolicy, RecordConfig};
use crate::error::{Error, Result};
use crate::traits::{DnsProvider, IpSource};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

/// Placeholder used for an address that could not be determined
pub const UNKNOWN_IP: &str = "";

/// Outcome of one reconcile cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Published record already matches the public address
    Unchanged {
        ip: String,
    },

    /// Record was replaced
    Updated {
        previous: String,
        current: String,
    },

    /// The provider rejected the replacement
    UpdateFailed {
        ip: String,
        error: String,
    },

    /// No write was attempted because a lookup failed
    Skipped {
        reason: String,
    },
}

/// Core DDNS engine
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`]
/// 2. Start with [`DdnsEngine::run()`]
/// 3. Engine polls until the process is stopped
///
/// ## Threading
///
/// Everything runs sequentially on the caller's task. Nothing is spawned and
/// no state is shared; the only suspension besides HTTP I/O is the sleep
/// between cycles.
pub struct DdnsEngine {
    /// IP source for the public address
    ip_source: Box<dyn IpSource>,

    /// DNS provider for the managed record
    provider: Box<dyn DnsProvider>,

    /// The managed A record
    record: RecordConfig,

    /// Sleep between cycles
    interval: Duration,

    /// Handling of failed lookups
    mismatch_policy: MismatchPolicy,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `provider`: DNS provider implementation
    /// - `config`: DDNS configuration (validated here)
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        config: DdnsConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            ip_source,
            provider,
            record: config.record,
            interval: Duration::from_secs(config.engine.interval_secs),
            mismatch_policy: config.engine.mismatch_policy,
        })
    }

    /// Polling interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run the engine
    ///
    /// Polls until SIGINT or SIGTERM is received. The listeners are installed
    /// before the first cycle, so a signal that arrives while a cycle is in
    /// flight stops the loop as soon as that cycle completes.
    pub async fn run(&self) -> Result<()> {
        let mut shutdown = ShutdownSignals::install()?;

        info!(
            "Polling {} every {}s via {} / {}",
            self.record.fqdn(),
            self.interval.as_secs(),
            self.ip_source.source_name(),
            self.provider.provider_name()
        );

        loop {
            self.reconcile().await;

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                signal = shutdown.recv() => {
                    info!("Received {}, stopping", signal);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Run the engine until `shutdown_rx` fires
    ///
    /// `None` polls forever. The signal is only observed while sleeping, so
    /// an in-flight cycle always completes.
    pub async fn run_with_shutdown(&self, shutdown_rx: Option<oneshot::Receiver<()>>) -> Result<()> {
        let Some(mut rx) = shutdown_rx else {
            loop {
                self.reconcile().await;
                tokio::time::sleep(self.interval).await;
            }
        };

        loop {
            self.reconcile().await;

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = &mut rx => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Execute one reconcile cycle
    ///
    /// Never fails: every error is logged and folded into the outcome.
    pub async fn reconcile(&self) -> CycleOutcome {
        let domain = &self.record.domain;
        let subdomain = self.record.name();

        let own_ip = match self.ip_source.current().await {
            Ok(ip) => Some(ip),
            Err(e) => {
                error!("Failed to resolve own IP via {}: {}", self.ip_source.source_name(), e);
                None
            }
        };

        let domain_ip = match self.provider.get_record(domain, subdomain).await {
            Ok(ip) => Some(ip),
            Err(e) => {
                error!("Failed to read {} from {}: {}", self.record.fqdn(), self.provider.provider_name(), e);
                None
            }
        };

        let own = own_ip.as_deref().unwrap_or(UNKNOWN_IP);
        let published = domain_ip.as_deref().unwrap_or(UNKNOWN_IP);
        info!("{} -> {}", published, own);

        if self.mismatch_policy == MismatchPolicy::SkipOnFailure
            && (own_ip.is_none() || domain_ip.is_none())
        {
            let reason = match (&own_ip, &domain_ip) {
                (None, None) => "own IP and published IP unknown",
                (None, Some(_)) => "own IP unknown",
                _ => "published IP unknown",
            };
            warn!("Skipping update of {}: {}", self.record.fqdn(), reason);
            return CycleOutcome::Skipped {
                reason: reason.to_string(),
            };
        }

        if published == own {
            debug!("{} already points to {}", self.record.fqdn(), own);
            return CycleOutcome::Unchanged { ip: own.to_string() };
        }

        match self.provider.update_record(domain, subdomain, own).await {
            Ok(()) => {
                info!("Updated {}: {} -> {}", self.record.fqdn(), published, own);
                CycleOutcome::Updated {
                    previous: published.to_string(),
                    current: own.to_string(),
                }
            }
            Err(e) => {
                error!("Failed to update {}: {}", self.record.fqdn(), e);
                CycleOutcome::UpdateFailed {
                    ip: own.to_string(),
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Process signals that stop [`DdnsEngine::run`]
#[cfg(unix)]
struct ShutdownSignals {
    sigterm: tokio::signal::unix::Signal,
    sigint: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl ShutdownSignals {
    fn install() -> Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        let sigterm = signal(SignalKind::terminate())
            .map_err(|e| Error::Other(format!("Failed to setup SIGTERM handler: {}", e)))?;
        let sigint = signal(SignalKind::interrupt())
            .map_err(|e| Error::Other(format!("Failed to setup SIGINT handler: {}", e)))?;

        Ok(Self { sigterm, sigint })
    }

    async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.sigterm.recv() => "SIGTERM",
            _ = self.sigint.recv() => "SIGINT",
        }
    }
}

/// Ctrl-C only on non-Unix platforms
#[cfg(not(unix))]
struct ShutdownSignals {
    ctrl_c: tokio::signal::windows::CtrlC,
}

#[cfg(not(unix))]
impl ShutdownSignals {
    fn install() -> Result<Self> {
        let ctrl_c = tokio::signal::windows::ctrl_c()
            .map_err(|e| Error::Other(format!("Failed to setup Ctrl-C handler: {}", e)))?;
        Ok(Self { ctrl_c })
    }

    async fn recv(&mut self) -> &'static str {
        self.ctrl_c.recv().await;
        "Ctrl-C"
    }
}
