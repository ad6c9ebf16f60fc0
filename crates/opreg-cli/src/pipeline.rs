//! Load records from the registry or a saved export and normalize them.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{info, trace};

use opreg_model::CaseSet;
use opreg_redcap::{FetchOutcome, RecordPayload, RedcapClient, RegistryConfig};
use opreg_transform::transform_records;

use crate::cli::SourceArgs;
use crate::logging::redact_value;

/// Shown when the export has no records at all.
pub const EMPTY_EXPORT_MESSAGE: &str = "The registry returned no records.";

/// Raw export records, from `--input` when given and the registry otherwise.
pub fn load_payload(source: &SourceArgs) -> Result<RecordPayload> {
    let payload = match &source.input {
        Some(path) => read_payload(path)?,
        None => fetch_payload(source.url.as_deref(), source.refresh)?,
    };
    if payload.is_empty() {
        bail!(EMPTY_EXPORT_MESSAGE);
    }
    Ok(payload)
}

/// Parse a saved JSON export.
pub fn read_payload(path: &Path) -> Result<RecordPayload> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("read export file {}", path.display()))?;
    let payload = RecordPayload::from_json_str(&body)
        .map_err(|err| anyhow!(err.user_message()))
        .with_context(|| format!("parse export file {}", path.display()))?;
    info!(records = payload.len(), "loaded saved export");
    Ok(payload)
}

fn fetch_payload(url: Option<&str>, refresh: bool) -> Result<RecordPayload> {
    let config = RegistryConfig::from_env(url).map_err(|err| anyhow!(err.user_message()))?;
    let client = RedcapClient::new(config).map_err(|err| anyhow!(err.user_message()))?;
    match client.fetch_or_report(refresh) {
        FetchOutcome::Data(payload) => Ok(payload),
        FetchOutcome::NoData { reason } => Err(anyhow!(reason)),
    }
}

/// Normalize a payload into the case set.
pub fn normalize(payload: &RecordPayload) -> Result<CaseSet> {
    let frame = payload
        .to_frame()
        .map_err(|err| anyhow!(err.user_message()))?;
    let cases = transform_records(frame.as_ref()).ok_or_else(|| anyhow!(EMPTY_EXPORT_MESSAGE))?;
    for record in cases.records() {
        trace!(
            record_id = %redact_value(&record.record_id),
            date = %redact_value(&record.procedure_date.to_string()),
            area = %record.area_label,
            "case loaded"
        );
    }
    Ok(cases)
}

pub fn load_cases(source: &SourceArgs) -> Result<CaseSet> {
    let payload = load_payload(source)?;
    normalize(&payload)
}
