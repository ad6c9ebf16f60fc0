//! REDCap export client.
//!
//! Sends one form-encoded export request per fetch and keeps the decoded
//! payload in a process-local cache for the configured lifetime, so that
//! repeated report runs within a session do not hit the registry each time.

use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use tracing::{debug, info, info_span, warn};

use opreg_model::EXPORT_FIELDS;

use crate::config::RegistryConfig;
use crate::error::{FetchError, Result};
use crate::payload::RecordPayload;

/// User agent string for export requests.
const USER_AGENT_VALUE: &str = concat!("opreg/", env!("CARGO_PKG_VERSION"));

/// Maximum number of response body characters kept in error messages.
const ERROR_BODY_LIMIT: usize = 200;

/// Cached export data.
struct CachedPayload {
    /// The cached payload.
    payload: RecordPayload,
    /// When the cache was populated.
    fetched_at: Instant,
}

/// Result of a fetch that never fails outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The registry returned at least one record.
    Data(RecordPayload),
    /// Nothing to show; `reason` is a user-facing explanation.
    NoData {
        /// Why no data is available.
        reason: String,
    },
}

impl FetchOutcome {
    pub fn into_payload(self) -> Option<RecordPayload> {
        match self {
            Self::Data(payload) => Some(payload),
            Self::NoData { .. } => None,
        }
    }
}

/// Client for the registry's record export API.
pub struct RedcapClient {
    /// HTTP client.
    client: Client,
    /// Connection settings.
    config: RegistryConfig,
    /// Cached export to avoid repeated API calls.
    cache: Mutex<Option<CachedPayload>>,
}

impl RedcapClient {
    /// Create a new client with the configured request timeout.
    pub fn new(config: RegistryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            cache: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Form parameters of the export request, in send order.
    ///
    /// Raw codes only: labels and checkbox labels are switched off.
    pub fn export_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = [
            ("token", self.config.token()),
            ("content", "record"),
            ("action", "export"),
            ("format", "json"),
            ("type", "flat"),
            ("rawOrLabel", "raw"),
            ("rawOrLabelHeaders", "raw"),
            ("exportCheckboxLabel", "false"),
            ("exportSurveyFields", "false"),
            ("exportDataAccessGroups", "false"),
            ("returnFormat", "json"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
        for (idx, field) in EXPORT_FIELDS.iter().enumerate() {
            params.push((format!("fields[{idx}]"), (*field).to_string()));
        }
        params
    }

    /// Export records, serving from cache while it is fresh.
    pub fn fetch_records(&self, force_refresh: bool) -> Result<RecordPayload> {
        if !force_refresh && let Some(payload) = self.cached() {
            return Ok(payload);
        }

        let span = info_span!("fetch", force_refresh);
        let _guard = span.enter();
        debug!(url = %self.config.api_url, fields = EXPORT_FIELDS.len(), "exporting records");
        let started = Instant::now();

        let response = self
            .client
            .post(&self.config.api_url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(ACCEPT, "application/json")
            .form(&self.export_params())
            .send()
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let body = response.text().map_err(|e| self.transport_error(&e))?;
        let payload = RecordPayload::from_json_str(&body)?;
        info!(
            records = payload.len(),
            duration_ms = started.elapsed().as_millis(),
            "registry export complete"
        );

        *self.lock_cache() = Some(CachedPayload {
            payload: payload.clone(),
            fetched_at: Instant::now(),
        });

        Ok(payload)
    }

    /// Fetch and fold every failure into [`FetchOutcome::NoData`].
    ///
    /// The reason is logged and returned for display; the caller decides
    /// whether to stop rendering.
    pub fn fetch_or_report(&self, force_refresh: bool) -> FetchOutcome {
        match self.fetch_records(force_refresh) {
            Ok(payload) if payload.is_empty() => {
                warn!("registry export returned no records");
                FetchOutcome::NoData {
                    reason: "The registry returned no records.".to_string(),
                }
            }
            Ok(payload) => FetchOutcome::Data(payload),
            Err(err) => {
                warn!(error = %err, "registry export failed");
                FetchOutcome::NoData {
                    reason: err.user_message(),
                }
            }
        }
    }

    /// Drop the cached export.
    pub fn clear_cache(&self) {
        *self.lock_cache() = None;
    }

    /// Age of the cached export, if any.
    pub fn cache_age(&self) -> Option<std::time::Duration> {
        self.lock_cache()
            .as_ref()
            .map(|cached| cached.fetched_at.elapsed())
    }

    fn cached(&self) -> Option<RecordPayload> {
        let cache = self.lock_cache();
        let cached = cache.as_ref()?;
        let age = cached.fetched_at.elapsed();
        if age < self.config.cache_ttl {
            debug!("Using cached export (age: {:?})", age);
            Some(cached.payload.clone())
        } else {
            None
        }
    }

    /// Store a payload as if it had just been fetched.
    #[cfg(test)]
    fn prime_cache(&self, payload: RecordPayload, fetched_at: Instant) {
        *self.lock_cache() = Some(CachedPayload {
            payload,
            fetched_at,
        });
    }

    // A poisoned cache only means a previous fetch panicked mid-update; the
    // Option inside is still a valid cache state.
    fn lock_cache(&self) -> MutexGuard<'_, Option<CachedPayload>> {
        self.cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn transport_error(&self, err: &reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                seconds: self.config.timeout.as_secs(),
            }
        } else {
            FetchError::Network(err.to_string())
        }
    }
}
