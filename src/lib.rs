//! Spur Context enrichment for IPv4 addresses.
//!
//! Looks up batches of addresses against the Spur Context API and turns the
//! responses into short summaries for display.
//!
//! # Features
//!
//! - **Pre-flight filtering** - Private, loopback and link-local addresses are never sent upstream
//! - **Ignore ranges** - Skip user-configured addresses and CIDR ranges
//! - **Bounded concurrency** - At most `concurrency_limit` requests in flight
//! - **Fail-fast batches** - The first failed lookup fails the whole batch
//! - **Summary tags** - Organization, country, services and risks from v2 responses
//!
//! # Example Configuration
//!
//! ```yaml
//! settings:
//!   api_key: "${SPUR_API_KEY}"
//!   api_version: v2
//!   ignore_ips: "203.0.113.0/24, 198.51.100.7"
//!   concurrency_limit: 10
//!
//! request:
//!   proxy: "http://proxy.internal:3128"
//!   reject_unauthorized: true
//! ```

pub mod address;
pub mod config;
pub mod engine;
pub mod error;
pub mod ignore;
pub mod model;
pub mod providers;
pub mod response;
pub mod summary;
pub mod transport;

pub use config::Config;
pub use engine::{EnrichmentEngine, LookupOptions};
pub use error::{BatchError, LookupError};
pub use model::{DisplayResult, Entity, LookupOutcome, ResultBatch};
pub use providers::spur::SpurProvider;
