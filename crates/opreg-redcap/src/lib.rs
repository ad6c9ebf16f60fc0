//! REDCap registry access for the surgical case dashboard.
//!
//! This crate performs the single network interaction of the system: a
//! form-encoded record export returning raw codes as JSON.
//!
//! # Overview
//!
//! - [`RegistryConfig`] reads the endpoint and API token from the environment
//!   (`REDCAP_API_URL`, `REDCAP_API_TOKEN`). The token is never hard-coded and
//!   never logged.
//! - [`RedcapClient`] sends the export with a bounded timeout and keeps the
//!   result in a short-lived process-local cache (5 minutes by default).
//! - [`RecordPayload`] holds the string-typed records and converts them into
//!   a Polars data frame for the transformer.
//!
//! There is no retry logic. Transport failures, non-2xx answers and
//! undecodable bodies are returned as [`FetchError`]s, each with a
//! [`FetchError::user_message`] for display; [`RedcapClient::fetch_or_report`]
//! folds them into [`FetchOutcome::NoData`] for callers that must not fail.
//!
//! # Example
//!
//! ```no_run
//! use opreg_redcap::{FetchOutcome, RedcapClient, RegistryConfig};
//!
//! fn load() -> opreg_redcap::Result<()> {
//!     let config = RegistryConfig::from_env(None)?;
//!     let client = RedcapClient::new(config)?;
//!     match client.fetch_or_report(false) {
//!         FetchOutcome::Data(payload) => println!("{} records", payload.len()),
//!         FetchOutcome::NoData { reason } => eprintln!("{reason}"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod payload;

pub use client::{FetchOutcome, RedcapClient};
pub use config::RegistryConfig;
pub use error::{ConfigError, FetchError, Result};
pub use payload::{RawRecord, RecordPayload};
