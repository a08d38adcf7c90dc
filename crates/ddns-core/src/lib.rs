// # ddns-core
//
// Core library for the polling DDNS updater.
//
// ## Architecture Overview
//
// This library provides the core functionality for dynamic DNS updates:
// - **IpSource**: Trait for discovering the caller's public address
// - **DnsProvider**: Trait for reading and replacing the published A record
// - **DdnsEngine**: Reconcile cycle and the fixed-interval loop around it
// - **DdnsConfig**: Immutable configuration, validated once at startup
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from HTTP implementations
// 2. **Failure Isolation**: A failed step is logged, never fatal to the loop
// 3. **Provider as Truth**: The published value is re-read every cycle, never cached
// 4. **Library-First**: All core functionality can be used as a library

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{IpSource, DnsProvider};
pub use engine::{CycleOutcome, DdnsEngine};
pub use config::{Credentials, DdnsConfig, MismatchPolicy};
pub use error::{Error, Result};
