//! Ingestion adapter (C9): fetch raw records through an injected fetcher,
//! parse into the canonical `Opportunity` shape, and upsert via the
//! repository keyed by `(source_system, source_id)`. Fetch-level failure
//! aborts the job; per-record failure is isolated and only increments the
//! failed counter. The only I/O suspension points in the whole core live
//! here and in `crate::repository`.

pub mod sam_gov;

use crate::error::AppError;
use crate::models::{IngestionLog, IngestionStatus, Opportunity};
use crate::repository::Repository;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

pub use sam_gov::SamGovFetcher;

/// Parameters accepted by a fetch call. Every field is optional; the
/// fetcher is responsible for applying its own defaults (e.g. SAM.gov
/// defaults to the last 30 days when `posted_from` is absent).
#[derive(Debug, Clone, Default)]
pub struct FetchParams {
    pub naics_codes: Vec<String>,
    pub posted_from: Option<String>,
    pub posted_to: Option<String>,
    pub notice_types: Vec<String>,
    pub set_aside_codes: Vec<String>,
    pub limit: u32,
}

/// A raw, source-shaped record before parsing into the canonical model.
/// Opaque to the orchestration layer; only the fetcher and its matching
/// parser understand the shape.
#[derive(Debug, Clone)]
pub struct RawRecord(pub serde_json::Value);

/// Injected at the ingestion boundary so the orchestration logic never
/// talks to a concrete feed. `fetch` failing aborts the whole job; per-record
/// parse/store failures inside the returned batch are handled by the caller.
#[async_trait]
pub trait IngestionFetcher: Send + Sync {
    fn source_system(&self) -> &'static str;

    async fn fetch(&self, params: &FetchParams) -> Result<Vec<RawRecord>, AppError>;

    /// Parse one raw record into the canonical shape. Returning `Err` marks
    /// only this record as failed; it does not abort the batch.
    fn parse(&self, raw: &RawRecord) -> Result<Opportunity, AppError>;
}

/// Run one ingestion job end to end, updating `log` in place as it
/// progresses. Returns the finished log (also already persisted via
/// `repo.update_ingestion_log`).
pub async fn run(
    repo: &dyn Repository,
    fetcher: &dyn IngestionFetcher,
    params: FetchParams,
) -> Result<IngestionLog, AppError> {
    let log = IngestionLog {
        id: Uuid::new_v4(),
        source_system: fetcher.source_system().to_string(),
        started_at: Utc::now(),
        completed_at: None,
        status: IngestionStatus::Queued,
        records_fetched: 0,
        records_inserted: 0,
        records_updated: 0,
        records_failed: 0,
        error_message: None,
    };
    let log = repo.create_ingestion_log(log).await?;
    run_with_log(repo, fetcher, log, params).await
}

/// Same as `run`, but against an already-created log row. Lets a caller
/// (e.g. the HTTP trigger handler) hand back the queued log's id to the
/// client before the fetch/parse/upsert work runs to completion.
pub async fn run_with_log(
    repo: &dyn Repository,
    fetcher: &dyn IngestionFetcher,
    mut log: IngestionLog,
    params: FetchParams,
) -> Result<IngestionLog, AppError> {
    log.status = IngestionStatus::Running;
    log = repo.update_ingestion_log(log).await?;

    let raw_records = match fetcher.fetch(&params).await {
        Ok(records) => records,
        Err(e) => {
            log.status = IngestionStatus::Failed;
            log.completed_at = Some(Utc::now());
            log.error_message = Some(e.to_string());
            return Ok(repo.update_ingestion_log(log).await?);
        }
    };

    log.records_fetched = raw_records.len() as u32;

    for raw in &raw_records {
        match fetcher.parse(raw) {
            Ok(opportunity) => match repo.upsert_opportunity(opportunity).await {
                Ok(upserted) if upserted.inserted => log.records_inserted += 1,
                Ok(_) => log.records_updated += 1,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to store ingested opportunity");
                    log.records_failed += 1;
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse ingested record");
                log.records_failed += 1;
            }
        }
    }

    log.status = IngestionStatus::Completed;
    log.completed_at = Some(Utc::now());
    Ok(repo.update_ingestion_log(log).await?)
}

/// Try a fixed sequence of formats in order; `None` once every format has
/// been exhausted. All resulting timestamps are UTC.
pub fn parse_feed_date(raw: &str) -> Option<chrono::DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    let truncated: String = raw.chars().take(19).collect();

    const FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y-%m-%dT%H:%M:%S"];
    for fmt in FORMATS {
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(&truncated, fmt) {
            return Some(chrono::DateTime::from_naive_utc_and_offset(naive, Utc));
        }
        if let Ok(date) = chrono::NaiveDate::parse_from_str(&truncated, fmt) {
            let naive = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
            return Some(chrono::DateTime::from_naive_utc_and_offset(naive, Utc));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_date_only_parses() {
        let dt = parse_feed_date("2025-06-01").unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2025-06-01");
    }

    #[test]
    fn us_slash_date_parses() {
        let dt = parse_feed_date("06/01/2025").unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2025-06-01");
    }

    #[test]
    fn iso_datetime_parses_and_truncates_fractional_seconds() {
        let dt = parse_feed_date("2025-06-01T12:30:45.123456Z").unwrap();
        assert_eq!(dt.format("%Y-%m-%dT%H:%M:%S").to_string(), "2025-06-01T12:30:45");
    }

    #[test]
    fn unparseable_date_is_none() {
        assert!(parse_feed_date("not a date").is_none());
    }

    #[test]
    fn empty_date_is_none() {
        assert!(parse_feed_date("").is_none());
    }
}
