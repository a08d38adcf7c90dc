// # ddnsd - DDNS Daemon
//
// This is a THIN integration layer. All reconcile logic lives in ddns-core.
//
// The ddnsd daemon is responsible for:
// 1. Reading configuration from arguments, flags, environment and `.env`
// 2. Setting up logging (stdout or an appended log file)
// 3. Validating the startup invariants
// 4. Wiring the IP source and provider into the engine and starting it
//
// ## Configuration
//
// Highest precedence first:
//
// ### Positional overrides
// - `ddnsd KEY SECRET DOMAIN SUBDOMAIN` (all four or none)
//
// ### Flags / environment
// - `--key` / `GODADDY_KEY`: GoDaddy API key (required)
// - `--secret` / `GODADDY_SECRET`: GoDaddy API secret (required)
// - `--domain` / `GODADDY_DOMAIN`: Registered domain, e.g. example.com (required)
// - `--subdomain` / `GODADDY_SUBDOMAIN`: A record name, defaults to `@`
// - `--interval`: Polling interval in seconds (default 360)
// - `--log`: Log file path, appended to; stdout when empty
// - `--log-level` / `DDNS_LOG_LEVEL`: trace, debug, info, warn, error
// - `--ip-url` / `DDNS_IP_URL`: IPv4 echo service
// - `--api-base` / `GODADDY_API_BASE`: GoDaddy API base URL
// - `--timeout` / `DDNS_HTTP_TIMEOUT_SECS`: Per-request timeout
// - `--dry-run` or `DDNS_MODE=dry-run`: Read but never write the record
// - `--legacy-compare` / `DDNS_LEGACY_COMPARE`: Treat a failed lookup as a mismatch
//
// The single-dash spellings `-key`, `-secret`, `-domain`, `-subdomain`,
// `-interval` and `-log` are accepted as well.
//
// Check GoDaddy's current API rate limits before lowering the interval.
//
// ## Example
//
// ```bash
// export GODADDY_KEY=your_key
// export GODADDY_SECRET=your_secret
// ddnsd -domain example.com -subdomain home -log /var/log/ddnsd.log
// ```

use anyhow::{Context, Result};
use clap::Parser;
use ddns_core::config::{
    DEFAULT_API_BASE, DEFAULT_INTERVAL_SECS, DEFAULT_IP_SOURCE_URL, DEFAULT_TIMEOUT_SECS,
};
use ddns_core::{DdnsConfig, DdnsEngine, MismatchPolicy};
use ddns_ip_http::HttpIpSource;
use ddns_provider_godaddy::GoDaddyProvider;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

/// Flags that may be spelled with a single dash
const LEGACY_FLAGS: &[&str] = &["key", "secret", "domain", "subdomain", "interval", "log"];

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Command line interface
#[derive(Parser, Debug)]
#[command(
    name = "ddnsd",
    version,
    about = "Keeps a GoDaddy A record pointed at this host's public IPv4 address"
)]
struct Cli {
    /// GoDaddy API key
    #[arg(long, env = "GODADDY_KEY", default_value = "", hide_env_values = true)]
    key: String,

    /// GoDaddy API secret
    #[arg(long, env = "GODADDY_SECRET", default_value = "", hide_env_values = true)]
    secret: String,

    /// Your top level domain (e.g., example.com), on the same account as the API key
    #[arg(long, env = "GODADDY_DOMAIN", default_value = "")]
    domain: String,

    /// Name of the A record (e.g., "home" for home.example.com); the record must already exist. Defaults to @
    #[arg(long, env = "GODADDY_SUBDOMAIN", default_value = "")]
    subdomain: String,

    /// Polling interval in seconds
    #[arg(long, default_value_t = DEFAULT_INTERVAL_SECS)]
    interval: u64,

    /// Path for log file (created if it doesn't exist); stdout when empty
    #[arg(long, default_value = "")]
    log: String,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, env = "DDNS_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Service that echoes the caller's IPv4 address
    #[arg(long, env = "DDNS_IP_URL", default_value = DEFAULT_IP_SOURCE_URL)]
    ip_url: String,

    /// GoDaddy API base URL
    #[arg(long, env = "GODADDY_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "DDNS_HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Read the record but never write it
    #[arg(long)]
    dry_run: bool,

    /// Overwrite the record even when a lookup failed in that cycle
    #[arg(long, env = "DDNS_LEGACY_COMPARE")]
    legacy_compare: bool,

    /// Override: API key
    #[arg(value_name = "KEY")]
    key_override: Option<String>,

    /// Override: API secret
    #[arg(value_name = "SECRET")]
    secret_override: Option<String>,

    /// Override: domain
    #[arg(value_name = "DOMAIN")]
    domain_override: Option<String>,

    /// Override: subdomain
    #[arg(value_name = "SUBDOMAIN")]
    subdomain_override: Option<String>,
}

/// Everything the daemon needs to start
#[derive(Debug)]
struct Settings {
    config: DdnsConfig,
    log_file: Option<PathBuf>,
    log_level: Level,
}

impl Cli {
    /// Apply precedence rules and build the daemon settings
    ///
    /// Does not validate required values; see [`DdnsConfig::validate`].
    fn resolve(self, dry_run_env: bool) -> Result<Settings> {
        let (key, secret, domain, subdomain) = match (
            self.key_override,
            self.secret_override,
            self.domain_override,
            self.subdomain_override,
        ) {
            (Some(key), Some(secret), Some(domain), Some(subdomain)) => {
                (key, secret, domain, subdomain)
            }
            (None, None, None, None) => (self.key, self.secret, self.domain, self.subdomain),
            _ => anyhow::bail!(
                "Positional overrides need all four values: KEY SECRET DOMAIN SUBDOMAIN"
            ),
        };

        let log_level = self
            .log_level
            .parse::<Level>()
            .map_err(|_| {
                anyhow::anyhow!(
                    "Log level '{}' is not valid. Valid levels: trace, debug, info, warn, error",
                    self.log_level
                )
            })?;

        let mut config = DdnsConfig::new(key, secret, domain, subdomain);
        config.engine.interval_secs = self.interval;
        config.engine.mismatch_policy = if self.legacy_compare {
            MismatchPolicy::Legacy
        } else {
            MismatchPolicy::SkipOnFailure
        };
        config.ip_source.url = self.ip_url;
        config.ip_source.timeout_secs = self.timeout;
        config.provider.api_base = self.api_base;
        config.provider.timeout_secs = self.timeout;
        config.provider.dry_run = self.dry_run || dry_run_env;

        Ok(Settings {
            config,
            log_file: (!self.log.is_empty()).then(|| PathBuf::from(self.log)),
            log_level,
        })
    }
}

/// Rewrite `-key value` / `-key=value` into the double-dash form clap expects
fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            let Some(rest) = text.strip_prefix('-') else {
                return arg;
            };
            if rest.starts_with('-') {
                return arg;
            }
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            if LEGACY_FLAGS.contains(&name) {
                OsString::from(format!("-{}", text))
            } else {
                arg
            }
        })
        .collect()
}

/// Whether `DDNS_MODE` asks for dry-run
fn dry_run_from_env() -> bool {
    std::env::var("DDNS_MODE")
        .map(|mode| mode.eq_ignore_ascii_case("dry-run"))
        .unwrap_or(false)
}

/// Open the log file for appending, creating it if needed
fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Couldn't open log file: {}", path.display()))
}

/// Install the global tracing subscriber
fn init_logging(settings: &Settings) -> Result<()> {
    let builder = FmtSubscriber::builder().with_max_level(settings.log_level);

    match &settings.log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            let subscriber = builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("Failed to set tracing subscriber")?;
        }
        None => {
            tracing::subscriber::set_global_default(builder.finish())
                .context("Failed to set tracing subscriber")?;
        }
    }

    Ok(())
}

/// Build the engine from validated configuration
fn build_engine(config: DdnsConfig) -> ddns_core::Result<DdnsEngine> {
    config.validate()?;

    let ip_source = HttpIpSource::from_config(&config.ip_source)?;
    let provider = GoDaddyProvider::from_config(&config.provider)?;

    DdnsEngine::new(Box::new(ip_source), Box::new(provider), config)
}

fn main() -> ExitCode {
    // A missing .env is fine; the environment and flags still apply
    let dotenv = dotenvy::dotenv();

    let cli = match Cli::try_parse_from(normalize_legacy_flags(std::env::args_os())) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                DdnsExitCode::ConfigError.into()
            } else {
                DdnsExitCode::CleanShutdown.into()
            };
        }
    };

    let settings = match cli.resolve(dry_run_from_env()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = init_logging(&settings) {
        eprintln!("{:#}", e);
        return DdnsExitCode::ConfigError.into();
    }

    match dotenv {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) => debug!("No .env loaded: {}", e),
    }

    let engine = match build_engine(settings.config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    info!("Starting ddnsd daemon v{}", env!("CARGO_PKG_VERSION"));

    // Single logical thread of control
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = engine.run().await {
            error!("Daemon error: {}", e);
            DdnsExitCode::RuntimeError
        } else {
            info!("Shutting down daemon");
            DdnsExitCode::CleanShutdown
        }
    });

    result.into()
}
