//! Ingestion trigger/status/history endpoints. `trigger` queues the job
//! and returns immediately; the fetch/parse/upsert work runs on a spawned
//! task so the caller is never blocked on an external feed.

use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::ingestion::{self, FetchParams, IngestionFetcher};
use crate::models::{IngestionLog, IngestionStatus};
use crate::repository::Repository;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize, Default)]
pub struct TriggerRequest {
    #[serde(default)]
    pub naics_codes: Vec<String>,
    pub posted_from: Option<String>,
    pub posted_to: Option<String>,
    #[serde(default)]
    pub notice_types: Vec<String>,
    #[serde(default)]
    pub set_aside_codes: Vec<String>,
    pub limit: Option<u32>,
}

impl From<TriggerRequest> for FetchParams {
    fn from(req: TriggerRequest) -> Self {
        FetchParams {
            naics_codes: req.naics_codes,
            posted_from: req.posted_from,
            posted_to: req.posted_to,
            notice_types: req.notice_types,
            set_aside_codes: req.set_aside_codes,
            limit: req.limit.unwrap_or(0),
        }
    }
}

pub async fn trigger(
    State(state): State<AppState>,
    Json(req): Json<TriggerRequest>,
) -> AppResult<Json<IngestionLog>> {
    let queued = IngestionLog {
        id: Uuid::new_v4(),
        source_system: state.fetcher.source_system().to_string(),
        started_at: Utc::now(),
        completed_at: None,
        status: IngestionStatus::Queued,
        records_fetched: 0,
        records_inserted: 0,
        records_updated: 0,
        records_failed: 0,
        error_message: None,
    };
    let queued = state.repo.create_ingestion_log(queued).await?;

    let params: FetchParams = req.into();
    let repo = state.repo.clone();
    let fetcher = state.fetcher.clone();
    let response = queued.clone();

    tokio::spawn(async move {
        if let Err(e) = ingestion::run_with_log(repo.as_ref(), fetcher.as_ref(), queued, params).await {
            tracing::error!(error = %e, "ingestion job failed to run");
        }
    });

    Ok(Json(response))
}

pub async fn status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<IngestionLog>> {
    let log = state.repo.get_ingestion_log(id).await?;
    Ok(Json(log))
}

#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    pub source: Option<String>,
    pub limit: Option<u32>,
}

pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<IngestionLog>>> {
    let limit = query.limit.unwrap_or(20).min(100);
    if limit == 0 {
        return Err(AppError::Validation("limit must be greater than zero".into()));
    }
    let logs = state
        .repo
        .list_ingestion_logs(query.source.as_deref(), limit)
        .await?;
    Ok(Json(logs))
}
